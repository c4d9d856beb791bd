fn main() -> anyhow::Result<()> {
    area51_client::run()
}

//! Area 51 Client
//!
//! Native window host for the scene core: forwards winit events, runs the
//! refresh timer and carries out pointer commands.

pub mod app;
pub mod input;
pub mod picking;

/// Run the scene (native entry point).
pub fn run() -> anyhow::Result<()> {
    use app::App;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    use winit::event_loop::EventLoop;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("area51=debug".parse()?))
        .init();

    tracing::info!("Starting Area 51");

    let event_loop = EventLoop::new()?;
    let mut app = App::with_random_seed()?;

    event_loop.run_app(&mut app)?;

    Ok(())
}

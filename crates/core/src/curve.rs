//! Closed curves sampled by the curve-following actors.
//!
//! The simulation only talks to [`CurveSampler`]; hosts may plug in their own
//! evaluators. [`ClosedCurve`] is the built-in one: a uniform Catmull-Rom loop
//! through a constant control-point table, parameterised in control-point
//! units (t = 1.0 is one segment, t wraps after `len` segments).

use glam::Vec3;

use crate::config::ConfigError;

/// Evaluates a closed path and its first derivative at a scalar parameter.
pub trait CurveSampler {
    fn evaluate(&self, t: f32) -> Vec3;
    fn evaluate_derivative(&self, t: f32) -> Vec3;
}

/// Which curve an actor follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveId {
    Scanner,
    Alien,
}

/// Elevated sweep flown by the scanner, relative to its anchor.
pub const SCANNER_CURVE: [Vec3; 8] = [
    Vec3::new(0.80, 0.00, 0.00),
    Vec3::new(0.55, 0.60, 0.05),
    Vec3::new(-0.10, 0.85, 0.00),
    Vec3::new(-0.70, 0.45, -0.05),
    Vec3::new(-0.85, -0.20, 0.00),
    Vec3::new(-0.35, -0.75, 0.05),
    Vec3::new(0.30, -0.80, 0.00),
    Vec3::new(0.75, -0.45, -0.05),
];

/// Ground loop whose tangent gives the alien its facing.
pub const ALIEN_CURVE: [Vec3; 6] = [
    Vec3::new(0.30, 0.00, 0.0),
    Vec3::new(0.15, 0.26, 0.0),
    Vec3::new(-0.15, 0.26, 0.0),
    Vec3::new(-0.30, 0.00, 0.0),
    Vec3::new(-0.15, -0.26, 0.0),
    Vec3::new(0.15, -0.26, 0.0),
];

/// Uniform closed Catmull-Rom spline.
#[derive(Debug, Clone)]
pub struct ClosedCurve {
    points: Vec<Vec3>,
}

impl ClosedCurve {
    /// Build a curve from at least four control points.
    pub fn new(name: &'static str, points: &[Vec3]) -> Result<Self, ConfigError> {
        if points.len() < 4 {
            return Err(ConfigError::CurveTooShort(name));
        }
        Ok(Self {
            points: points.to_vec(),
        })
    }

    pub fn scanner() -> Result<Self, ConfigError> {
        Self::new("scanner", &SCANNER_CURVE)
    }

    pub fn alien() -> Result<Self, ConfigError> {
        Self::new("alien", &ALIEN_CURVE)
    }

    /// Number of segments in one lap.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Control points around segment containing `t`, plus the local parameter.
    fn segment(&self, t: f32) -> ([Vec3; 4], f32) {
        let n = self.points.len();
        let t = t.rem_euclid(n as f32);
        let base = t.floor();
        let local = t - base;
        // rem_euclid may round up to n; wrap the index as well.
        let i = (base as usize) % n;

        let p0 = self.points[(i + n - 1) % n];
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % n];
        let p3 = self.points[(i + 2) % n];
        ([p0, p1, p2, p3], local)
    }
}

impl CurveSampler for ClosedCurve {
    fn evaluate(&self, t: f32) -> Vec3 {
        let ([p0, p1, p2, p3], u) = self.segment(t);
        let u2 = u * u;
        let u3 = u2 * u;

        let c0 = -0.5 * u3 + u2 - 0.5 * u;
        let c1 = 1.5 * u3 - 2.5 * u2 + 1.0;
        let c2 = -1.5 * u3 + 2.0 * u2 + 0.5 * u;
        let c3 = 0.5 * u3 - 0.5 * u2;

        p0 * c0 + p1 * c1 + p2 * c2 + p3 * c3
    }

    fn evaluate_derivative(&self, t: f32) -> Vec3 {
        let ([p0, p1, p2, p3], u) = self.segment(t);
        let u2 = u * u;

        let d0 = -1.5 * u2 + 2.0 * u - 0.5;
        let d1 = 4.5 * u2 - 5.0 * u;
        let d2 = -4.5 * u2 + 4.0 * u + 0.5;
        let d3 = 1.5 * u2 - u;

        p0 * d0 + p1 * d1 + p2 * d2 + p3 * d3
    }
}

/// The curves used by the scene, looked up by [`CurveId`].
pub struct CurveSet {
    scanner: Box<dyn CurveSampler>,
    alien: Box<dyn CurveSampler>,
}

impl CurveSet {
    pub fn new(scanner: Box<dyn CurveSampler>, alien: Box<dyn CurveSampler>) -> Self {
        Self { scanner, alien }
    }

    pub fn get(&self, id: CurveId) -> &dyn CurveSampler {
        match id {
            CurveId::Scanner => self.scanner.as_ref(),
            CurveId::Alien => self.alien.as_ref(),
        }
    }
}

impl CurveSet {
    /// The shipped scanner and alien tables.
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self::new(
            Box::new(ClosedCurve::scanner()?),
            Box::new(ClosedCurve::alien()?),
        ))
    }
}

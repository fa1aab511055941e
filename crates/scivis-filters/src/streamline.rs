//! Bidirectional streamline tracing with classic 4th-order Runge–Kutta.
//!
//! A trace integrates `dx/dt = v(x)` from a seed point in both temporal
//! directions and joins the halves into one polyline:
//!
//! ```text
//! reverse(backward) ++ [seed] ++ forward
//! ```
//!
//! Each direction stops at the first step that leaves the field's
//! bounding box (or produces a non-finite point), or after
//! `max_steps` accepted points. The offending point is discarded.
//!
//! RK4 stage samples use [`VectorField::sample_or_zero`], so a stage that lands
//! outside the domain contributes a zero vector rather than failing.

use crate::config::{ConfigError, TracerConfig};
use crate::error::FilterError;
use crate::metrics::TraceMetrics;
use scivis_core::{Bounds, PolyData, Vec3, VectorField};
use std::fmt;
use std::iter::FusedIterator;
use std::time::Instant;
use tracing::debug;

/// Advance `current` by one RK4 step of size `h`.
///
/// ```text
/// k1 = h * f(p)
/// k2 = h * f(p + k1/2)
/// k3 = h * f(p + k2/2)
/// k4 = h * f(p + k3)
/// next = p + (k1 + 2*k2 + 2*k3 + k4) / 6
/// ```
///
/// A negative `h` integrates backward in time.
pub fn rk4_step<F: VectorField + ?Sized>(field: &F, current: Vec3, h: f64) -> Vec3 {
    let k1 = h * field.sample_or_zero(current);
    let k2 = h * field.sample_or_zero(current + k1 / 2.0);
    let k3 = h * field.sample_or_zero(current + k2 / 2.0);
    let k4 = h * field.sample_or_zero(current + k3);
    current + (k1 + 2.0 * k2 + 2.0 * k3 + k4) / 6.0
}

/// Temporal direction of a half-trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Integrate with `+h`.
    Forward,
    /// Integrate with `-h`.
    Backward,
}

impl Direction {
    /// `1.0` for forward, `-1.0` for backward.
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

/// Why a half-trace stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The next point fell outside the field's bounding box.
    LeftDomain,
    /// The next point had a NaN or infinite component.
    NonFinite,
    /// The step ceiling was reached.
    MaxSteps,
}

/// Lazy single-direction trace from a seed.
///
/// Yields each accepted point in time order (the seed itself is not
/// yielded). Finite and not restartable: once it returns `None`,
/// [`termination`](Self::termination) reports why.
pub struct DirectionalTrace<'f, F: VectorField + ?Sized> {
    field: &'f F,
    bounds: Bounds,
    current: Vec3,
    h: f64,
    remaining: usize,
    steps: usize,
    termination: Option<Termination>,
}

impl<'f, F: VectorField + ?Sized> DirectionalTrace<'f, F> {
    /// Start a trace at `seed` with signed step size `h`.
    ///
    /// The seed is not bounds-checked here; a seed outside the domain
    /// simply terminates on the first step.
    pub fn new(field: &'f F, seed: Vec3, h: f64, max_steps: usize) -> Self {
        Self {
            field,
            bounds: field.bounds(),
            current: seed,
            h,
            remaining: max_steps,
            steps: 0,
            termination: None,
        }
    }

    /// Why the trace stopped, or `None` while it is still running.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// RK4 steps computed so far, including a final step rejected for
    /// leaving the domain or for being non-finite.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The most recently accepted point (the seed before any step).
    pub fn position(&self) -> Vec3 {
        self.current
    }
}

impl<F: VectorField + ?Sized> Iterator for DirectionalTrace<'_, F> {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.termination.is_some() {
            return None;
        }
        if self.remaining == 0 {
            self.termination = Some(Termination::MaxSteps);
            return None;
        }
        self.remaining -= 1;
        self.steps += 1;

        let next = rk4_step(self.field, self.current, self.h);
        if !next.is_finite() {
            self.termination = Some(Termination::NonFinite);
            return None;
        }
        if !self.bounds.contains(next) {
            self.termination = Some(Termination::LeftDomain);
            return None;
        }
        self.current = next;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.termination.is_some() {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

impl<F: VectorField + ?Sized> FusedIterator for DirectionalTrace<'_, F> {}

/// Summary of one half of a [`Streamline`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HalfTrace {
    /// Points accepted in this direction (excluding the seed).
    pub points: usize,
    /// Why this direction stopped.
    pub termination: Termination,
}

/// A bidirectional trace result.
#[derive(Clone, Debug)]
pub struct Streamline {
    points: Vec<Vec3>,
    seed_index: usize,
    backward: HalfTrace,
    forward: HalfTrace,
    metrics: TraceMetrics,
}

impl Streamline {
    /// All points in time order: reversed backward half, seed, forward half.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Index of the seed in [`points`](Self::points); equals the number
    /// of backward points.
    pub fn seed_index(&self) -> usize {
        self.seed_index
    }

    /// The seed point.
    pub fn seed(&self) -> Vec3 {
        self.points[self.seed_index]
    }

    /// Total point count, always at least 1.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: the seed is always present.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Backward half summary.
    pub fn backward(&self) -> HalfTrace {
        self.backward
    }

    /// Forward half summary.
    pub fn forward(&self) -> HalfTrace {
        self.forward
    }

    /// Counters for this run.
    pub fn metrics(&self) -> &TraceMetrics {
        &self.metrics
    }

    /// Convert into a single connected chain.
    pub fn into_polydata(self) -> PolyData {
        PolyData::chain(self.points)
    }
}

/// Traces streamlines through a vector field.
///
/// # Examples
///
/// ```
/// use scivis_core::{Bounds, Vec3};
/// use scivis_filters::{StreamlineTracer, TracerConfig};
/// # use scivis_core::{SampleError, VectorField};
/// # struct Uniform(Bounds);
/// # impl VectorField for Uniform {
/// #     fn bounds(&self) -> Bounds { self.0 }
/// #     fn sample(&self, p: Vec3) -> Result<Vec3, SampleError> {
/// #         if self.0.contains(p) { Ok(Vec3::new(1.0, 0.0, 0.0)) }
/// #         else { Err(SampleError::OutOfBounds { point: p, bounds: self.0 }) }
/// #     }
/// # }
/// let field = Uniform(Bounds::from_extents([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).unwrap());
/// let tracer = StreamlineTracer::new(TracerConfig { step_size: 0.1, max_steps: 100 }).unwrap();
///
/// let line = tracer.trace(&field, Vec3::new(0.5, 0.5, 0.5)).unwrap();
/// assert_eq!(line.seed(), Vec3::new(0.5, 0.5, 0.5));
/// assert_eq!(line.len(), line.backward().points + 1 + line.forward().points);
/// ```
#[derive(Clone, Debug)]
pub struct StreamlineTracer {
    config: TracerConfig,
}

impl StreamlineTracer {
    /// Create a tracer, validating `config`.
    pub fn new(config: TracerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The integration parameters.
    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// A lazy half-trace from `seed` in `direction`.
    pub fn directional<'f, F: VectorField + ?Sized>(
        &self,
        field: &'f F,
        seed: Vec3,
        direction: Direction,
    ) -> DirectionalTrace<'f, F> {
        DirectionalTrace::new(
            field,
            seed,
            direction.sign() * self.config.step_size,
            self.config.max_steps,
        )
    }

    /// Trace both directions from `seed` and assemble the polyline.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::SeedOutOfBounds`] if the seed is not
    /// finite or lies outside the field's bounding box.
    pub fn trace<F: VectorField + ?Sized>(
        &self,
        field: &F,
        seed: Vec3,
    ) -> Result<Streamline, FilterError> {
        let start = Instant::now();
        let bounds = field.bounds();
        if !seed.is_finite() || !bounds.contains(seed) {
            return Err(FilterError::SeedOutOfBounds { seed, bounds });
        }

        let (backward_points, backward, backward_steps) =
            self.run_half(field, seed, Direction::Backward);
        let (forward_points, forward, forward_steps) =
            self.run_half(field, seed, Direction::Forward);

        let mut points = Vec::with_capacity(backward_points.len() + 1 + forward_points.len());
        points.extend(backward_points.into_iter().rev());
        let seed_index = points.len();
        points.push(seed);
        points.extend(forward_points);

        let metrics = TraceMetrics {
            backward_points: backward.points,
            forward_points: forward.points,
            rk4_steps: backward_steps + forward_steps,
            elapsed_us: start.elapsed().as_micros() as u64,
        };
        Ok(Streamline {
            points,
            seed_index,
            backward,
            forward,
            metrics,
        })
    }

    fn run_half<F: VectorField + ?Sized>(
        &self,
        field: &F,
        seed: Vec3,
        direction: Direction,
    ) -> (Vec<Vec3>, HalfTrace, usize) {
        let mut trace = self.directional(field, seed, direction);
        let points: Vec<Vec3> = trace.by_ref().collect();
        let termination = trace.termination().unwrap_or(Termination::MaxSteps);
        debug!(
            %direction,
            points = points.len(),
            ?termination,
            "half-trace finished"
        );
        let half = HalfTrace {
            points: points.len(),
            termination,
        };
        (points, half, trace.steps())
    }
}

impl Default for StreamlineTracer {
    fn default() -> Self {
        Self {
            config: TracerConfig::default(),
        }
    }
}

//! Filter configuration, validation, and error types.
//!
//! [`TracerConfig`] holds the integration parameters for the streamline
//! tracer. [`validate()`](TracerConfig::validate) checks them once at
//! construction; the tracer never re-checks during a trace.

use thiserror::Error;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while configuring a filter.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Step size is NaN, infinite, zero, or negative.
    #[error("step_size must be finite and positive, got {value}")]
    InvalidStepSize {
        /// The invalid value.
        value: f64,
    },
    /// Iso value is NaN or infinite.
    #[error("iso_value must be finite, got {value}")]
    InvalidIsoValue {
        /// The invalid value.
        value: f64,
    },
    /// A required builder field was not set.
    #[error("{field} is required")]
    Missing {
        /// Name of the missing field.
        field: &'static str,
    },
}

// ── TracerConfig ───────────────────────────────────────────────────

/// Integration parameters for [`StreamlineTracer`](crate::StreamlineTracer).
///
/// Immutable once handed to the tracer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TracerConfig {
    /// RK4 step size `h`. Default: 0.05. Must be finite and > 0; the
    /// backward half of a trace uses `-h`.
    pub step_size: f64,
    /// Maximum number of steps per direction. Default: 1000.
    pub max_steps: usize,
}

impl TracerConfig {
    /// Default RK4 step size.
    pub const DEFAULT_STEP_SIZE: f64 = 0.05;
    /// Default per-direction step ceiling.
    pub const DEFAULT_MAX_STEPS: usize = 1000;

    /// Check all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(ConfigError::InvalidStepSize {
                value: self.step_size,
            });
        }
        Ok(())
    }
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            step_size: Self::DEFAULT_STEP_SIZE,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }
}

pub mod charge;
pub mod commands;
pub mod config;
pub mod configuration;
pub mod field_grid;
pub mod integrator;
pub mod profiler;
pub mod tracer;

pub use charge::{Charge, ChargeId};
pub use configuration::{ChargeConfiguration, ConfigError};
pub use tracer::{trace_all_field_lines, FieldLineSet};

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));

//! A small unit-test framework. Test programs register named test cases, run them one at a time
//! under a per-test timeout, and get type-directed diagnostics when an assertion fails.
//!
//! ```no_run
//! fn arithmetic(registry: &mut stf::Registry) {
//!     stf::declare_test!(registry, Arithmetic, Widening, || {
//!         stf::stf_assert_eq!(1u32, 1u64);
//!     });
//!     stf::declare_test!(registry, Arithmetic, Slow, timeout = 5, || {
//!         stf::stf_assert_close!(0.1f64 + 0.2, 0.3, 1e-9);
//!     });
//! }
//!
//! stf::main!(arithmetic);
//! ```

pub mod adapters;
pub mod assert;
pub mod compare;
pub mod config;
pub mod context;
mod engine;
mod error;
mod events;
pub mod format;
pub mod panics;
pub mod registry;
mod timing;
mod trace_categories;

pub use assert::AssertionFailure;
pub use config::{RunnerConfig, TestOptions};
pub use context::{CapturedOutput, Console};
pub use engine::{RunReport, RunResult, Runner, TestRecord, run_main};
pub use error::Error;
pub use events::TraceEvent;
pub use format::FormattedValue;
pub use panics::{PanicKind, PanicMessage};
pub use registry::{
    DEFAULT_TIMEOUT_SECS, Registry, TestCase, exclude_test, register_test, register_unit,
};
pub use timing::format_duration;

//! Trace utilities

/// Trace category for assertion evaluation.
pub const ASSERT: &str = "assert";
/// Trace category for the execution engine.
pub const ENGINE: &str = "engine";
/// Trace category for test registration.
pub const REGISTRY: &str = "registry";

//! Test registration.
//!
//! A [`Registry`] holds test cases in registration order, plus the set of
//! qualified names to exclude from a run. Appends never panic or abort: when
//! storage cannot grow, the failure is counted and the run refuses to start.
//!
//! Test programs normally fill the process-wide registry through registration
//! units, plain `fn(&mut Registry)` functions passed to [`main!`](crate::main).
//! Units run in the order they are listed; within a unit, tests keep the order in
//! which they were declared. No other ordering across units is implied.
//!
//! Qualified names are not required to be unique. Two tests registered under the
//! same name both run, and both are reported under that name; an exclusion of
//! that name skips both.

use crate::trace_categories;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use std::time::Duration;

/// Timeout applied to tests registered without an explicit one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// A test body as stored in the registry.
pub type TestBody = Arc<dyn Fn() -> Result<(), String> + Send + Sync>;

/// Values a test body may return.
///
/// Bodies returning `()` succeed unless an assertion fails. Bodies returning a
/// `Result` also fail when they return `Err`, which lets test code use `?`.
pub trait IntoTestResult {
    /// Converts the body's return value, rendering any error as text.
    fn into_test_result(self) -> Result<(), String>;
}

impl IntoTestResult for () {
    fn into_test_result(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: Display> IntoTestResult for Result<(), E> {
    fn into_test_result(self) -> Result<(), String> {
        self.map_err(|err| err.to_string())
    }
}

/// A registered test.
#[derive(Clone)]
pub struct TestCase {
    name: String,
    body: TestBody,
    timeout_secs: u64,
}

impl TestCase {
    /// Qualified name of the test (`group::name`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How long the test may run before the run is abandoned, in seconds.
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// How long the test may run before the run is abandoned.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns a shared handle to the test body.
    pub fn body(&self) -> TestBody {
        Arc::clone(&self.body)
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Composes the qualified name of a test.
pub fn qualified_name(group: &str, name: &str) -> String {
    format!("{group}::{name}")
}

/// Ordered collection of test cases plus the names excluded from a run.
#[derive(Debug, Default)]
pub struct Registry {
    tests: Vec<TestCase>,
    exclusions: HashSet<String>,
    failed_registrations: u32,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a test, returning its 1-based id, or 0 if it could not be stored.
    ///
    /// # Arguments
    ///
    /// * `name` - Qualified name of the test.
    /// * `body` - The test body.
    /// * `timeout_secs` - Bound on the test's running time, in seconds.
    pub fn register<F, R>(&mut self, name: impl Into<String>, body: F, timeout_secs: u64) -> usize
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: IntoTestResult,
    {
        let name = name.into();

        if let Err(err) = self.tests.try_reserve(1) {
            tracing::warn!(target: trace_categories::REGISTRY, "failed to register test {name}: {err}");
            self.record_failure();
            return 0;
        }

        tracing::debug!(target: trace_categories::REGISTRY, "registered test {name} (timeout {timeout_secs}s)");

        self.tests.push(TestCase {
            name,
            body: Arc::new(move || body().into_test_result()),
            timeout_secs,
        });

        self.tests.len()
    }

    /// Marks a qualified name as excluded from the run. Returns whether the
    /// exclusion could be stored.
    pub fn exclude(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();

        if let Err(err) = self.exclusions.try_reserve(1) {
            tracing::warn!(target: trace_categories::REGISTRY, "failed to exclude test {name}: {err}");
            self.record_failure();
            return false;
        }

        tracing::debug!(target: trace_categories::REGISTRY, "excluded test {name}");
        self.exclusions.insert(name);
        true
    }

    /// Registers `group::name` with the default timeout.
    pub fn declare_test<F, R>(&mut self, group: &str, name: &str, body: F) -> usize
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: IntoTestResult,
    {
        self.register(qualified_name(group, name), body, DEFAULT_TIMEOUT_SECS)
    }

    /// Registers `group::name` with an explicit timeout, in seconds.
    pub fn declare_test_with_timeout<F, R>(
        &mut self,
        group: &str,
        name: &str,
        timeout_secs: u64,
        body: F,
    ) -> usize
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: IntoTestResult,
    {
        self.register(qualified_name(group, name), body, timeout_secs)
    }

    /// Excludes `group::name` from the run.
    pub fn declare_exclusion(&mut self, group: &str, name: &str) -> bool {
        self.exclude(qualified_name(group, name))
    }

    /// Registered tests, in registration order.
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Number of registered tests, excluded ones included.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns whether no tests have been registered.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Returns whether the given qualified name is excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }

    /// Number of registrations or exclusions that could not be stored.
    pub const fn failed_registrations(&self) -> u32 {
        self.failed_registrations
    }

    /// Moves every test, exclusion and failure count of `other` into `self`,
    /// keeping registration order.
    pub fn append(&mut self, other: Self) {
        self.failed_registrations = self
            .failed_registrations
            .saturating_add(other.failed_registrations);

        for test in other.tests {
            if let Err(err) = self.tests.try_reserve(1) {
                tracing::warn!(target: trace_categories::REGISTRY, "failed to register test {}: {err}", test.name);
                self.record_failure();
                continue;
            }
            self.tests.push(test);
        }

        for name in other.exclusions {
            self.exclude(name);
        }
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed_registrations = self.failed_registrations.saturating_add(1);
    }
}

struct GlobalRegistry {
    registry: Registry,
    sealed: bool,
}

static GLOBAL: LazyLock<Mutex<GlobalRegistry>> = LazyLock::new(|| {
    Mutex::new(GlobalRegistry {
        registry: Registry::new(),
        sealed: false,
    })
});

fn with_global<T>(f: impl FnOnce(&mut GlobalRegistry) -> T) -> T {
    let mut global = GLOBAL.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut global)
}

/// Registers a test in the process-wide registry. Returns its 1-based id, or 0 if
/// it could not be stored or the run has already started.
pub fn register_test<F, R>(name: impl Into<String>, body: F, timeout_secs: u64) -> usize
where
    F: Fn() -> R + Send + Sync + 'static,
    R: IntoTestResult,
{
    let name = name.into();
    with_global(|global| {
        if global.sealed {
            tracing::warn!(target: trace_categories::REGISTRY, "ignoring registration of {name}: the run has started");
            return 0;
        }
        global.registry.register(name, body, timeout_secs)
    })
}

/// Excludes a qualified name in the process-wide registry.
pub fn exclude_test(name: impl Into<String>) -> bool {
    let name = name.into();
    with_global(|global| {
        if global.sealed {
            tracing::warn!(target: trace_categories::REGISTRY, "ignoring exclusion of {name}: the run has started");
            return false;
        }
        global.registry.exclude(name)
    })
}

/// Runs a registration unit and appends what it registered to the process-wide
/// registry.
pub fn register_unit(unit: fn(&mut Registry)) {
    let mut registry = Registry::new();
    unit(&mut registry);

    with_global(|global| {
        if global.sealed {
            tracing::warn!(target: trace_categories::REGISTRY, "ignoring registration unit: the run has started");
            return;
        }
        global.registry.append(registry);
    });
}

/// Takes the process-wide registry for a run. Later registrations are rejected.
pub(crate) fn take_global() -> Registry {
    with_global(|global| {
        global.sealed = true;
        std::mem::take(&mut global.registry)
    })
}

/// Registers a test given bare identifiers for its group and name.
///
/// ```
/// let mut registry = stf::Registry::new();
/// stf::declare_test!(registry, Parser, EmptyInput, || {
///     stf::stf_assert_true!("".is_empty());
/// });
/// stf::declare_test!(registry, Parser, LongInput, timeout = 5, || {});
/// assert_eq!(registry.tests()[0].name(), "Parser::EmptyInput");
/// assert_eq!(registry.tests()[1].timeout_secs(), 5);
/// ```
#[macro_export]
macro_rules! declare_test {
    ($registry:expr, $group:ident, $name:ident, timeout = $timeout:expr, $body:expr $(,)?) => {
        $registry.declare_test_with_timeout(
            stringify!($group),
            stringify!($name),
            $timeout,
            $body,
        )
    };
    ($registry:expr, $group:ident, $name:ident, $body:expr $(,)?) => {
        $registry.declare_test(stringify!($group), stringify!($name), $body)
    };
}

/// Excludes a test given bare identifiers for its group and name.
#[macro_export]
macro_rules! declare_exclusion {
    ($registry:expr, $group:ident, $name:ident $(,)?) => {
        $registry.declare_exclusion(stringify!($group), stringify!($name))
    };
}

/// Defines `main` for a test program: runs each registration unit, in the order
/// listed, against the process-wide registry, then runs the tests.
///
/// ```no_run
/// fn arithmetic(registry: &mut stf::Registry) {
///     stf::declare_test!(registry, Arithmetic, Addition, || {
///         stf::stf_assert_eq!(4, 2 + 2);
///     });
/// }
///
/// stf::main!(arithmetic);
/// ```
#[macro_export]
macro_rules! main {
    ($($unit:path),* $(,)?) => {
        fn main() -> ::std::process::ExitCode {
            $( $crate::register_unit($unit); )*
            $crate::run_main()
        }
    };
}

//! The execution engine.
//!
//! Tests run one at a time, in registration order. Each test body runs on its own
//! worker thread while the engine waits on a condition variable bounded by the
//! test's timeout. The first failing test ends the run. A test that does not
//! finish within its timeout ends the process: the worker cannot be stopped
//! safely, so it is abandoned along with everything else.

use crate::config::{RunnerConfig, TestOptions};
use crate::context::{self, Console, TestContext};
use crate::error::Error;
use crate::panics::{self, CaughtPanic};
use crate::registry::{self, Registry, TestBody, TestCase};
use crate::timing::{Stopwatch, format_duration};
use crate::{events, trace_categories};
use clap::Parser;
use std::process::ExitCode;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Outcome of a single test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunResult {
    /// The test completed without failures in the given time.
    Passed(Duration),
    /// An assertion failed, or the body panicked or returned an error.
    Failed,
    /// The test was skipped by exclusion.
    Excluded,
}

/// Outcome of a test, by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRecord {
    /// Qualified name of the test.
    pub name: String,
    /// What happened when the test was considered.
    pub result: RunResult,
}

/// Results of a completed (or fail-fast stopped) run.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    records: Vec<TestRecord>,
    total_duration: Duration,
}

impl RunReport {
    /// Tests considered by the run, in the order they were considered. Tests after
    /// the first failure do not appear.
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// Returns whether no test failed.
    pub fn all_passed(&self) -> bool {
        !self
            .records
            .iter()
            .any(|record| record.result == RunResult::Failed)
    }

    /// Sum of the durations of the tests that passed.
    pub const fn total_duration(&self) -> Duration {
        self.total_duration
    }

    fn record(&mut self, name: &str, result: RunResult) {
        if let RunResult::Passed(elapsed) = result {
            self.total_duration += elapsed;
        }
        self.records.push(TestRecord {
            name: name.to_owned(),
            result,
        });
    }
}

/// Completion signal shared between the engine and a worker.
#[derive(Default)]
struct Completion {
    elapsed: Mutex<Option<Duration>>,
    signal: Condvar,
}

impl Completion {
    fn complete(&self, elapsed: Duration) {
        let mut state = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *state = Some(elapsed);
        self.signal.notify_one();
    }

    /// Waits up to `timeout` for the worker to complete, returning the body's
    /// running time if it did.
    fn wait(&self, timeout: Duration) -> Option<Duration> {
        let state = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        let (state, _) = self
            .signal
            .wait_timeout_while(state, timeout, |elapsed| elapsed.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        *state
    }
}

/// How a supervised test ended.
enum Supervision {
    Completed { elapsed: Duration, failed: bool },
    TimedOut,
}

/// Runs the tests of a registry.
#[derive(Clone, Debug)]
pub struct Runner {
    config: RunnerConfig,
    console: Console,
}

impl Runner {
    /// Creates a runner that writes to standard output.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            console: Console::stdout(),
        }
    }

    /// Directs all runner and assertion output to the given console.
    #[must_use]
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Runs every non-excluded test in `registry`, stopping at the first failure.
    ///
    /// Errors are reported to the console before they are returned. With the
    /// default configuration a timeout does not return at all: the process exits
    /// with a failure status.
    pub fn execute(&self, registry: &Registry) -> Result<RunReport, Error> {
        let result = self.execute_tests(registry);

        match &result {
            Err(err @ Error::TimeoutExceeded { .. }) => {
                self.console.write_line(&format!("\n{}", err.console_message()))?;
                if self.config.terminate_on_timeout {
                    tracing::debug!(target: trace_categories::ENGINE, "terminating process after timeout");
                    std::process::exit(1);
                }
            }
            Err(err) => {
                // Best effort; the console itself may be what failed.
                if let Err(write_err) = self.console.write_line(&err.console_message()) {
                    tracing::warn!(target: trace_categories::ENGINE, "failed to report error: {write_err}");
                }
            }
            Ok(_) => (),
        }

        result
    }

    /// Runs the tests and maps the outcome to a process exit status.
    pub fn run(&self, registry: &Registry) -> ExitCode {
        match self.execute(registry) {
            Ok(report) if report.all_passed() => ExitCode::SUCCESS,
            Ok(_) => ExitCode::FAILURE,
            Err(err) => {
                tracing::debug!(target: trace_categories::ENGINE, "run stopped: {err}");
                ExitCode::FAILURE
            }
        }
    }

    fn execute_tests(&self, registry: &Registry) -> Result<RunReport, Error> {
        if registry.is_empty() {
            return Err(Error::NoRegisteredTests);
        }

        let failed_registrations = registry.failed_registrations();
        if failed_registrations > 0 {
            return Err(Error::RegistrationFailures(failed_registrations));
        }

        if self.config.print_test_count {
            self.console
                .write_line(&format!("Total number of tests: {}", registry.len()))?;
        }

        let mut report = RunReport::default();

        for test in registry.tests() {
            if registry.is_excluded(test.name()) {
                tracing::debug!(target: trace_categories::ENGINE, "excluding {}", test.name());
                self.console
                    .write_line(&format!("Excluding test {}", test.name()))?;
                report.record(test.name(), RunResult::Excluded);
                continue;
            }

            self.console
                .write_str(&format!("Running test {}", test.name()))?;

            match self.supervise(test)? {
                Supervision::Completed {
                    failed: true,
                    elapsed,
                } => {
                    tracing::debug!(target: trace_categories::ENGINE, "{} failed after {elapsed:?}; stopping run", test.name());
                    report.record(test.name(), RunResult::Failed);
                    return Ok(report);
                }
                Supervision::Completed {
                    failed: false,
                    elapsed,
                } => {
                    self.console
                        .write_line(&format!(" ({})", format_duration(&elapsed)))?;
                    report.record(test.name(), RunResult::Passed(elapsed));
                }
                Supervision::TimedOut => {
                    return Err(Error::TimeoutExceeded {
                        name: test.name().to_owned(),
                        seconds: test.timeout_secs(),
                    });
                }
            }
        }

        self.console.write_line(&format!(
            "All test(s) passed successfully ({} total)",
            format_duration(&report.total_duration())
        ))?;

        Ok(report)
    }

    /// Runs one test body on a worker thread and waits for it, bounded by the
    /// test's timeout.
    fn supervise(&self, test: &TestCase) -> Result<Supervision, Error> {
        let context = TestContext::new(self.console.clone());
        let completion = Arc::new(Completion::default());

        // Assertions on threads the body spawns report to this test until it ends.
        let _active = context.activate();

        let handle = std::thread::Builder::new()
            .name(test.name().to_owned())
            .spawn({
                let body = test.body();
                let context = context.clone();
                let completion = Arc::clone(&completion);
                move || {
                    let _guard = context.enter();
                    let watch = Stopwatch::start();
                    run_body(&body, &context);
                    completion.complete(watch.stop());
                }
            })
            .map_err(|err| Error::WorkerSpawn(test.name().to_owned(), err))?;

        tracing::debug!(
            target: trace_categories::ENGINE,
            "started worker for {} (timeout {}s)",
            test.name(),
            test.timeout_secs()
        );

        let Some(elapsed) = completion.wait(test.timeout()) else {
            tracing::warn!(target: trace_categories::ENGINE, "{} did not complete within {}s", test.name(), test.timeout_secs());
            // The worker is abandoned, not joined.
            drop(handle);
            return Ok(Supervision::TimedOut);
        };

        let worker_panicked = handle.join().is_err();
        if worker_panicked {
            tracing::warn!(target: trace_categories::ENGINE, "worker for {} panicked after completing", test.name());
        }
        let failed = worker_panicked || context.has_failed();

        Ok(Supervision::Completed { elapsed, failed })
    }
}

/// Invokes a test body, reporting any panic or error escaping it as a failure of
/// the test.
fn run_body(body: &TestBody, context: &TestContext) {
    match panics::catch(|| (**body)()) {
        Ok(Ok(())) => (),
        Ok(Err(message)) => {
            // An assertion failure has already been reported.
            if !context.has_failed() {
                context::report_failure(&format!("Unexpected error returned: {message}\n"));
            }
        }
        Err(caught) => context::report_failure(&unexpected_panic_report(&caught)),
    }
}

fn unexpected_panic_report(caught: &CaughtPanic) -> String {
    let mut report = String::from("Unexpected panic");
    if let Some(location) = caught.location() {
        report.push_str(" at ");
        report.push_str(location);
    }
    if let Some(message) = caught.message() {
        report.push_str(": ");
        report.push_str(message);
    }
    report.push('\n');
    report
}

fn list_tests(registry: &Registry, console: &Console) -> Result<(), Error> {
    for test in registry.tests() {
        if !registry.is_excluded(test.name()) {
            console.write_line(&format!("{}: test", test.name()))?;
        }
    }
    Ok(())
}

/// Entry point for test programs: parses the command line, runs the tests in the
/// process-wide registry, and returns the exit status. Used by
/// [`main!`](crate::main).
pub fn run_main() -> ExitCode {
    let options = TestOptions::parse();

    if options.logging_requested() {
        events::init(&options.log_events());
    }

    panics::install_quiet_hook();

    let registry = registry::take_global();
    let console = Console::stdout();

    if options.list_tests_only {
        return match list_tests(&registry, &console) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    }

    Runner::new(RunnerConfig::default())
        .with_console(console)
        .run(&registry)
}

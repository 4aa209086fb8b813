//! Configuration types for the test runner.

use crate::events::TraceEvent;
use clap::Parser;

/// Configuration for the test runner.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Whether a timed-out test ends the process. When false, the run stops with
    /// [`Error::TimeoutExceeded`](crate::Error::TimeoutExceeded) instead and the
    /// hung worker is left running.
    pub terminate_on_timeout: bool,
    /// Whether to print the number of registered tests before running them.
    pub print_test_count: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            terminate_on_timeout: true,
            print_test_count: true,
        }
    }
}

impl RunnerConfig {
    /// Creates a new runner config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether a timed-out test ends the process.
    #[must_use]
    pub const fn with_terminate_on_timeout(mut self, terminate: bool) -> Self {
        self.terminate_on_timeout = terminate;
        self
    }

    /// Sets whether to print the number of registered tests.
    #[must_use]
    pub const fn with_print_test_count(mut self, print: bool) -> Self {
        self.print_test_count = print;
        self
    }
}

/// Command-line options for a test program.
#[derive(Clone, Parser, Debug)]
#[clap(about, disable_help_flag = true, disable_version_flag = true)]
pub struct TestOptions {
    /// Display usage information.
    #[clap(long = "help", action = clap::ArgAction::HelpLong)]
    pub help: Option<bool>,

    /// Log runner activity to stderr.
    #[clap(short = 'v', long = "verbose", env = "STF_VERBOSE")]
    pub verbose: bool,

    /// Enable debug logging for the given categories.
    #[clap(long = "log-enable", value_enum)]
    pub enabled_log_events: Vec<TraceEvent>,

    /// List registered tests without running them.
    #[clap(long = "list")]
    pub list_tests_only: bool,

    /// Show output from test cases (for compatibility only, has no effect).
    #[clap(long = "show-output")]
    pub show_output: bool,

    /// Capture output? (for compatibility only, has no effect).
    #[clap(long = "nocapture")]
    pub no_capture: bool,

    /// Colorize output? (for compatibility only, has no effect).
    #[clap(long = "color", default_value_t = clap::ColorChoice::Auto)]
    pub color: clap::ColorChoice,

    /// Number of test threads (for compatibility only, has no effect).
    #[clap(long = "test-threads")]
    pub test_threads: Option<usize>,

    /// Exactly match filters (for compatibility only, has no effect).
    #[clap(long = "exact")]
    pub exact_match: bool,

    /// Run ignored tests (for compatibility only, has no effect).
    #[clap(long = "ignored")]
    pub ignored_only: bool,

    /// Unstable flags (for compatibility only, has no effect).
    #[clap(short = 'Z')]
    pub unstable_flag: Vec<String>,

    /// Patterns for tests to be excluded (for compatibility only, has no effect).
    #[clap(long = "skip")]
    pub exclude_filters: Vec<String>,

    /// Patterns for tests to be included (for compatibility only, has no effect).
    pub include_filters: Vec<String>,
}

impl TestOptions {
    /// Returns the categories to enable debug logging for.
    pub fn log_events(&self) -> Vec<TraceEvent> {
        if self.verbose && self.enabled_log_events.is_empty() {
            TraceEvent::all().to_vec()
        } else {
            self.enabled_log_events.clone()
        }
    }

    /// Returns whether any logging was requested.
    pub fn logging_requested(&self) -> bool {
        self.verbose || !self.enabled_log_events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_fail_fast_contract() {
        let config = RunnerConfig::new();
        assert!(config.terminate_on_timeout);
        assert!(config.print_test_count);

        let config = config
            .with_terminate_on_timeout(false)
            .with_print_test_count(false);
        assert!(!config.terminate_on_timeout);
        assert!(!config.print_test_count);
    }

    #[test]
    fn libtest_flags_are_accepted() {
        let options = TestOptions::try_parse_from([
            "suite",
            "--nocapture",
            "--show-output",
            "--color",
            "never",
            "--test-threads",
            "1",
            "-Z",
            "unstable-options",
            "--exact",
            "--skip",
            "slow",
            "some_filter",
        ])
        .unwrap();

        assert!(options.no_capture);
        assert_eq!(options.include_filters, ["some_filter"]);
        assert!(!options.logging_requested());
    }

    #[test]
    fn verbose_enables_every_category() {
        let options = TestOptions::try_parse_from(["suite", "-v"]).unwrap();
        assert_eq!(options.log_events(), TraceEvent::all());

        let options = TestOptions::try_parse_from(["suite", "--log-enable", "engine"]).unwrap();
        assert_eq!(options.log_events(), [TraceEvent::Engine]);
        assert!(options.logging_requested());
    }
}

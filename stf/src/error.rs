//! Error types for the framework.

/// Errors that stop a test run before or while tests execute.
///
/// Assertion failures are not represented here; they are local to a test body
/// and surface as [`crate::RunResult::Failed`] entries in the run report.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No tests were registered before the run started.
    #[error("there are no registered tests")]
    NoRegisteredTests,

    /// One or more registrations or exclusions could not be recorded.
    #[error("{0} test(s) failed to register or get excluded")]
    RegistrationFailures(u32),

    /// A test did not signal completion within its timeout.
    #[error("test \"{name}\" exceeded {seconds} second timeout")]
    TimeoutExceeded {
        /// Qualified name of the test.
        name: String,
        /// The configured bound, in seconds.
        seconds: u64,
    },

    /// The worker thread for a test could not be started.
    #[error("failed to spawn worker for test \"{0}\": {1}")]
    WorkerSpawn(String, #[source] std::io::Error),

    /// Writing to the console failed.
    #[error("console output failed: {0}")]
    Console(#[from] std::io::Error),
}

impl Error {
    /// Returns the line the engine prints for this error before exiting.
    pub fn console_message(&self) -> String {
        match self {
            Self::TimeoutExceeded { name, seconds } => {
                format!("Test \"{name}\" exceeded {seconds} second timeout; terminating")
            }
            other => format!("Error: {other}"),
        }
    }
}

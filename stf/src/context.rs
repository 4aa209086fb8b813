//! Per-test context shared between the engine and the worker running a test body.
//!
//! The engine installs a [`TestContext`] on each worker thread before invoking the
//! test body. Assertions evaluated on that thread report through it: they write
//! their diagnostics to its console and raise its failure flag.
//!
//! Threads spawned by a test body do not inherit the context. While the engine
//! supervises a test it also publishes the test's context process-wide, and
//! assertions on threads without a context of their own report to that one. An
//! assertion that fails while no test is running is written to stdout and affects
//! no test.

use crate::trace_categories;
use std::cell::RefCell;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Context of the test currently under supervision.
static ACTIVE: Mutex<Option<TestContext>> = Mutex::new(None);

thread_local! {
    static CURRENT: RefCell<Option<TestContext>> = const { RefCell::new(None) };
}

/// Shared, line-oriented console sink.
///
/// All harness output goes through a console so that it can be redirected into a
/// buffer when the engine is driven in-process.
#[derive(Clone)]
pub struct Console {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    /// Creates a console that writes to the process's standard output.
    pub fn stdout() -> Self {
        Self::from_writer(std::io::stdout())
    }

    /// Creates a console that writes to the given writer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Creates a console that captures output in memory, along with a handle to
    /// read what was written.
    pub fn buffered() -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        (Self::from_writer(captured.clone()), captured)
    }

    /// Writes `text` verbatim and flushes.
    pub fn write_str(&self, text: &str) -> std::io::Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_all(text.as_bytes())?;
        sink.flush()
    }

    /// Writes `text` followed by a newline and flushes.
    pub fn write_line(&self, text: &str) -> std::io::Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(sink, "{text}")?;
        sink.flush()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// In-memory capture of console output.
#[derive(Clone, Debug, Default)]
pub struct CapturedOutput {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    /// Returns everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// State visible to a running test body.
#[derive(Clone, Debug)]
pub struct TestContext {
    failed: Arc<AtomicBool>,
    console: Console,
}

impl TestContext {
    /// Creates a fresh context with its failure flag cleared.
    pub fn new(console: Console) -> Self {
        Self {
            failed: Arc::new(AtomicBool::new(false)),
            console,
        }
    }

    /// Returns whether the test has been marked as failed.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    /// Marks the test as failed.
    pub fn mark_failed(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    /// Returns the console this test reports to.
    pub const fn console(&self) -> &Console {
        &self.console
    }

    /// Installs this context on the current thread for the lifetime of the
    /// returned guard.
    pub fn enter(&self) -> ContextGuard {
        let previous = CURRENT.with(|current| current.replace(Some(self.clone())));
        ContextGuard { previous }
    }

    /// Publishes this context to threads that have none installed, for the
    /// lifetime of the returned guard.
    pub fn activate(&self) -> ActivationGuard {
        *lock_active() = Some(self.clone());
        ActivationGuard {
            context: self.clone(),
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.failed, &other.failed)
    }
}

fn lock_active() -> std::sync::MutexGuard<'static, Option<TestContext>> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Withdraws a published context when dropped, unless another has replaced it.
#[must_use = "the context is withdrawn when the guard is dropped"]
pub struct ActivationGuard {
    context: TestContext,
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        let mut active = lock_active();
        if active
            .as_ref()
            .is_some_and(|context| context.is_same(&self.context))
        {
            *active = None;
        }
    }
}

/// Returns whether a context is installed on the current thread.
pub fn is_entered() -> bool {
    CURRENT.with(|current| current.borrow().is_some())
}

/// Restores the previously installed context when dropped.
#[must_use = "the context is uninstalled when the guard is dropped"]
pub struct ContextGuard {
    previous: Option<TestContext>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|current| {
            *current.borrow_mut() = previous;
        });
    }
}

/// Reports a failure from an assertion evaluated on the current thread.
///
/// Writes `report` (already formatted, without the leading blank line) to the
/// current test's console and raises its failure flag. The current test is the
/// one installed on this thread, or else the one under supervision.
pub fn report_failure(report: &str) {
    let text = format!("\n{report}");
    let context = CURRENT
        .with(|current| current.borrow().clone())
        .or_else(|| lock_active().clone());

    match context {
        Some(context) => {
            if let Err(err) = context.console().write_str(&text) {
                tracing::warn!(target: trace_categories::ASSERT, "failed to write assertion report: {err}");
            }
            context.mark_failed();
        }
        None => {
            tracing::warn!(target: trace_categories::ASSERT, "assertion failed while no test was running");
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_is_reported_to_current_context() {
        let (console, output) = Console::buffered();
        let context = TestContext::new(console);

        {
            let _guard = context.enter();
            report_failure("Assertion failed at a.rs:1\n");
        }

        assert!(context.has_failed());
        assert_eq!(output.contents(), "\nAssertion failed at a.rs:1\n");
    }

    #[test]
    fn guard_restores_previous_context() {
        let (outer_console, outer_output) = Console::buffered();
        let (inner_console, inner_output) = Console::buffered();
        let outer = TestContext::new(outer_console);
        let inner = TestContext::new(inner_console);

        let _outer_guard = outer.enter();
        {
            let _inner_guard = inner.enter();
            report_failure("inner\n");
        }
        report_failure("outer\n");

        assert_eq!(inner_output.contents(), "\ninner\n");
        assert_eq!(outer_output.contents(), "\nouter\n");
    }

    #[test]
    fn entered_tracks_installed_context() {
        let (console, _output) = Console::buffered();
        let context = TestContext::new(console);

        assert!(!is_entered());
        {
            let _guard = context.enter();
            assert!(is_entered());
        }
        assert!(!is_entered());
    }

    #[test]
    fn fresh_context_has_not_failed() {
        let (console, _output) = Console::buffered();
        assert!(!TestContext::new(console).has_failed());
    }
}

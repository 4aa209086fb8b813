//! Panic interception and panic-kind matching.
//!
//! A panic payload is the Rust analogue of a thrown value. The panic assertions
//! intercept it with `catch_unwind`; [`PanicKind`] decides whether an intercepted
//! payload is of the requested kind. A kind may accept narrower kinds as well (see
//! [`panic_kind!`](crate::panic_kind)), so requesting a broad kind passes for any
//! of its narrower ones. Request the most specific kind a test means to check.

use crate::{context, trace_categories};
use std::any::Any;
use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, PanicHookInfo};
use std::sync::Once;

thread_local! {
    static LAST_PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static QUIET_HOOK: Once = Once::new();

/// A kind of panic payload that a panic assertion can require.
pub trait PanicKind {
    /// Returns whether `payload` is of this kind, or of a kind this one accepts.
    fn matches(payload: &(dyn Any + Send)) -> bool;

    /// Name used for this kind in failure diagnostics.
    fn kind_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Payload of a formatted `panic!("...")`.
impl PanicKind for String {
    fn matches(payload: &(dyn Any + Send)) -> bool {
        payload.is::<String>()
    }
}

/// Payload of a `panic!` with a literal message and no arguments.
impl PanicKind for &'static str {
    fn matches(payload: &(dyn Any + Send)) -> bool {
        payload.is::<&'static str>()
    }
}

/// Any panic raised with a textual message, whichever payload type carries it.
#[derive(Clone, Copy, Debug)]
pub struct PanicMessage;

impl PanicKind for PanicMessage {
    fn matches(payload: &(dyn Any + Send)) -> bool {
        <String as PanicKind>::matches(payload) || <&'static str as PanicKind>::matches(payload)
    }

    fn kind_name() -> &'static str {
        "PanicMessage"
    }
}

/// Declares a type as a panic kind, for use with
/// [`stf_assert_panics_with!`](crate::stf_assert_panics_with) and
/// [`std::panic::panic_any`].
///
/// The second form lists narrower kinds the declared kind also accepts. Acceptance
/// is transitive: a narrower kind's own accepted kinds are accepted too.
///
/// ```
/// #[derive(Debug)]
/// struct IoFailure;
/// #[derive(Debug)]
/// struct Failure;
///
/// stf::panic_kind!(IoFailure);
/// stf::panic_kind!(Failure => [IoFailure]);
///
/// use stf::PanicKind;
/// let payload: Box<dyn std::any::Any + Send> = Box::new(IoFailure);
/// assert!(<Failure as PanicKind>::matches(payload.as_ref()));
/// ```
#[macro_export]
macro_rules! panic_kind {
    ($kind:ty) => {
        impl $crate::panics::PanicKind for $kind {
            fn matches(payload: &(dyn ::std::any::Any + Send)) -> bool {
                payload.is::<$kind>()
            }

            fn kind_name() -> &'static str {
                stringify!($kind)
            }
        }
    };
    ($kind:ty => [$($narrower:ty),* $(,)?]) => {
        impl $crate::panics::PanicKind for $kind {
            fn matches(payload: &(dyn ::std::any::Any + Send)) -> bool {
                payload.is::<$kind>()
                    $(|| <$narrower as $crate::panics::PanicKind>::matches(payload))*
            }

            fn kind_name() -> &'static str {
                stringify!($kind)
            }
        }
    };
}

/// A panic intercepted by [`catch`].
pub struct CaughtPanic {
    payload: Box<dyn Any + Send>,
    location: Option<String>,
}

impl CaughtPanic {
    /// Returns the panic payload.
    pub fn payload(&self) -> &(dyn Any + Send) {
        self.payload.as_ref()
    }

    /// Returns whether the payload is of kind `K`.
    pub fn is<K: PanicKind + ?Sized>(&self) -> bool {
        K::matches(self.payload())
    }

    /// Returns where the panic was raised, when the harness hook recorded it.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the panic message, if the payload carries one.
    pub fn message(&self) -> Option<&str> {
        payload_message(self.payload())
    }
}

impl std::fmt::Debug for CaughtPanic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaughtPanic")
            .field("message", &self.message())
            .field("location", &self.location)
            .finish()
    }
}

/// Extracts the text of a panic raised with a message.
pub fn payload_message(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Some(message)
    } else {
        payload.downcast_ref::<String>().map(String::as_str)
    }
}

/// Runs `f`, intercepting any panic it raises.
pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| CaughtPanic {
        payload,
        location: take_last_panic_location(),
    })
}

/// Wraps the process panic hook. Panics on a thread running a test body are
/// recorded for that thread instead of printed, since the engine reports them
/// itself; panics anywhere else go on to the previous hook. Idempotent.
pub fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            let location = info.location().map(|location| location.to_string());

            tracing::debug!(
                target: trace_categories::ENGINE,
                "panic raised at {}: {}",
                location.as_deref().unwrap_or("<unknown>"),
                payload_message(info.payload()).unwrap_or("<non-text payload>")
            );

            LAST_PANIC_LOCATION.with(|last| *last.borrow_mut() = location);

            if !context::is_entered() {
                previous(info);
            }
        }));
    });
}

/// Returns (and clears) the location of the last panic raised on this thread.
pub fn take_last_panic_location() -> Option<String> {
    LAST_PANIC_LOCATION.with(|last| last.borrow_mut().take())
}

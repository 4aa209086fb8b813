//! Assertion predicates and the assertion macros.
//!
//! Each `check_*` function evaluates one predicate and, on failure, returns an
//! [`AssertionFailure`] holding the rendered diagnostic. The `stf_assert_*!`
//! macros wrap them: a failure is reported to the running test's console, the
//! test is marked as failed, and the enclosing test body returns immediately.
//!
//! The macros may be used in any function returning `()` or a `Result<T, E>`
//! whose error type implements `From<AssertionFailure>` (which includes
//! `anyhow::Error` and `Box<dyn Error>`).

use crate::compare::{self, Float};
use crate::context;
use crate::format::{self, Describe, FormattedValue};
use crate::panics::{self, PanicKind};
use crate::trace_categories;

/// Label for the expected value of an expectation failure.
pub const EXPECTED_LABEL: &str = "  expected: ";
/// Label for the actual value of an expectation failure.
pub const ACTUAL_LABEL: &str = "    actual: ";
/// Label for the left-hand operand of a comparison failure.
pub const LHS_LABEL: &str = "  lhs: ";
/// Label for the right-hand operand of a comparison failure.
pub const RHS_LABEL: &str = "  rhs: ";

/// A failed assertion: where it was evaluated, and the labelled values to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionFailure {
    file: &'static str,
    line: u32,
    values: Vec<(&'static str, FormattedValue)>,
}

impl AssertionFailure {
    /// Creates a failure with no value lines.
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self {
            file,
            line,
            values: Vec::new(),
        }
    }

    /// Appends a labelled value line.
    #[must_use]
    pub fn with_value(mut self, label: &'static str, value: FormattedValue) -> Self {
        self.values.push((label, value));
        self
    }

    /// Source file in which the assertion was evaluated.
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// Source line at which the assertion was evaluated.
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Labelled value lines, in display order.
    pub fn values(&self) -> &[(&'static str, FormattedValue)] {
        &self.values
    }

    /// Writes this failure to the current test's console and marks the test as
    /// failed.
    pub fn report(&self) {
        tracing::debug!(
            target: trace_categories::ASSERT,
            "assertion failed at {}:{}",
            self.file,
            self.line
        );
        context::report_failure(&self.to_string());
    }
}

impl std::fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Assertion failed at {}:{}", self.file, self.line)?;
        for (label, value) in &self.values {
            writeln!(f, "{label}{value}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AssertionFailure {}

/// Return types a test body (or helper) can produce when an assertion in it fails.
pub trait FromAssertionFailure {
    /// Produces the value returned from the enclosing function after `failure` has
    /// been reported.
    fn from_assertion_failure(failure: AssertionFailure) -> Self;
}

impl FromAssertionFailure for () {
    fn from_assertion_failure(_failure: AssertionFailure) -> Self {}
}

impl<T, E: From<AssertionFailure>> FromAssertionFailure for Result<T, E> {
    fn from_assertion_failure(failure: AssertionFailure) -> Self {
        Err(E::from(failure))
    }
}

/// Builds a failure showing an expected and an actual value.
pub fn expectation_failure(
    file: &'static str,
    line: u32,
    expected: FormattedValue,
    actual: FormattedValue,
) -> AssertionFailure {
    AssertionFailure::new(file, line)
        .with_value(EXPECTED_LABEL, expected)
        .with_value(ACTUAL_LABEL, actual)
}

/// Builds a failure showing the two operands of a comparison.
pub fn operand_failure(
    file: &'static str,
    line: u32,
    lhs: FormattedValue,
    rhs: FormattedValue,
) -> AssertionFailure {
    AssertionFailure::new(file, line)
        .with_value(LHS_LABEL, lhs)
        .with_value(RHS_LABEL, rhs)
}

fn check_boolean(
    file: &'static str,
    line: u32,
    value: bool,
    expected: bool,
) -> Result<(), AssertionFailure> {
    if value == expected {
        return Ok(());
    }
    Err(expectation_failure(
        file,
        line,
        expected.describe(),
        value.describe(),
    ))
}

/// Succeeds iff `value` is true.
pub fn check_true(file: &'static str, line: u32, value: bool) -> Result<(), AssertionFailure> {
    check_boolean(file, line, value, true)
}

/// Succeeds iff `value` is false.
pub fn check_false(file: &'static str, line: u32, value: bool) -> Result<(), AssertionFailure> {
    check_boolean(file, line, value, false)
}

/// Succeeds iff `|lhs - rhs| < epsilon`.
pub fn check_close<F: Float>(
    file: &'static str,
    line: u32,
    lhs: F,
    rhs: F,
    epsilon: F,
) -> Result<(), AssertionFailure> {
    if compare::is_close(lhs, rhs, epsilon) {
        return Ok(());
    }
    Err(operand_failure(file, line, lhs.describe(), rhs.describe()))
}

/// Views a value as the octets a memory assertion compares.
pub fn octets<T: AsRef<[u8]> + ?Sized>(value: &T) -> &[u8] {
    value.as_ref()
}

/// Returns the first `length` octets of both ranges, or `None` if either range is
/// shorter than that.
fn leading_octets<'a>(
    lhs: &'a [u8],
    rhs: &'a [u8],
    length: usize,
) -> Option<(&'a [u8], &'a [u8])> {
    Some((lhs.get(..length)?, rhs.get(..length)?))
}

/// Succeeds iff the first `length` octets of `expected` and `actual` all match.
///
/// A range holding fewer than `length` octets fails the assertion.
pub fn check_mem_eq(
    file: &'static str,
    line: u32,
    expected: &[u8],
    actual: &[u8],
    length: usize,
) -> Result<(), AssertionFailure> {
    if leading_octets(expected, actual, length).is_some_and(|(lhs, rhs)| lhs == rhs) {
        return Ok(());
    }
    Err(expectation_failure(
        file,
        line,
        format::format_memory(expected, length),
        format::format_memory(actual, length),
    ))
}

/// Succeeds iff at least one pair among the first `length` octets of `lhs` and
/// `rhs` differs.
///
/// A range holding fewer than `length` octets fails the assertion.
pub fn check_mem_ne(
    file: &'static str,
    line: u32,
    lhs: &[u8],
    rhs: &[u8],
    length: usize,
) -> Result<(), AssertionFailure> {
    if leading_octets(lhs, rhs, length).is_some_and(|(left, right)| left != right) {
        return Ok(());
    }
    Err(operand_failure(
        file,
        line,
        format::format_memory(lhs, length),
        format::format_memory(rhs, length),
    ))
}

/// Succeeds iff `f` panics, whatever the payload. The panic is intercepted.
pub fn check_panics<R>(
    file: &'static str,
    line: u32,
    f: impl FnOnce() -> R,
) -> Result<(), AssertionFailure> {
    match panics::catch(f) {
        Err(_) => Ok(()),
        Ok(_) => Err(expectation_failure(
            file,
            line,
            FormattedValue::text("any panic raised"),
            FormattedValue::text("no panic raised"),
        )),
    }
}

/// Succeeds iff `f` panics with a payload of kind `K` (or of a kind `K` accepts).
/// The panic is intercepted whatever its kind.
pub fn check_panics_with<K: PanicKind + ?Sized, R>(
    file: &'static str,
    line: u32,
    f: impl FnOnce() -> R,
) -> Result<(), AssertionFailure> {
    let actual = match panics::catch(f) {
        Err(caught) if caught.is::<K>() => return Ok(()),
        Err(caught) => {
            tracing::debug!(
                target: trace_categories::ASSERT,
                "intercepted panic of another kind: {caught:?}"
            );
            "some other panic raised"
        }
        Ok(_) => "no panic raised",
    };
    Err(expectation_failure(
        file,
        line,
        FormattedValue::text(format!("panic of kind {}", K::kind_name())),
        FormattedValue::text(actual),
    ))
}

/// Reports an assertion failure and returns from the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! __stf_fail {
    ($failure:expr) => {{
        let failure: $crate::assert::AssertionFailure = $failure;
        failure.report();
        return $crate::assert::FromAssertionFailure::from_assertion_failure(failure);
    }};
}

/// Reports the failure of a `check_*` result and returns from the enclosing
/// function.
#[doc(hidden)]
#[macro_export]
macro_rules! __stf_check {
    ($result:expr) => {
        if let ::std::result::Result::Err(failure) = $result {
            $crate::__stf_fail!(failure);
        }
    };
}

/// Compares two operands with an ordering relation.
#[doc(hidden)]
#[macro_export]
macro_rules! __stf_relation {
    ($relation:ident, $lhs:expr, $rhs:expr) => {{
        #[allow(unused_imports)]
        use $crate::compare::dispatch::{ViaNumericOrd as _, ViaPartialOrd as _};
        let lhs = &$lhs;
        let rhs = &$rhs;
        let ordering = (&$crate::compare::dispatch::Operands(lhs, rhs)).value_ordering();
        if !$crate::compare::Relation::$relation.holds(ordering) {
            $crate::__stf_fail!($crate::assert::operand_failure(
                file!(),
                line!(),
                $crate::format_value!(*lhs),
                $crate::format_value!(*rhs),
            ));
        }
    }};
}

/// Asserts `expected == actual`. Numeric primitives compare by value across widths.
///
/// ```
/// fn body() {
///     stf::stf_assert_eq!(1u32, 1u64);
///     stf::stf_assert_eq!("text", String::from("text"));
/// }
/// body();
/// ```
#[macro_export]
macro_rules! stf_assert_eq {
    ($expected:expr, $actual:expr $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::compare::dispatch::{ViaNumericEq as _, ViaPartialEq as _};
        let expected = &$expected;
        let actual = &$actual;
        if !(&$crate::compare::dispatch::Operands(expected, actual)).values_equal() {
            $crate::__stf_fail!($crate::assert::expectation_failure(
                file!(),
                line!(),
                $crate::format_value!(*expected),
                $crate::format_value!(*actual),
            ));
        }
    }};
}

/// Asserts `lhs != rhs`.
#[macro_export]
macro_rules! stf_assert_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::compare::dispatch::{ViaNumericEq as _, ViaPartialEq as _};
        let lhs = &$lhs;
        let rhs = &$rhs;
        if !(&$crate::compare::dispatch::Operands(lhs, rhs)).values_differ() {
            $crate::__stf_fail!($crate::assert::operand_failure(
                file!(),
                line!(),
                $crate::format_value!(*lhs),
                $crate::format_value!(*rhs),
            ));
        }
    }};
}

/// Asserts `lhs > rhs`.
#[macro_export]
macro_rules! stf_assert_gt {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::__stf_relation!(Greater, $lhs, $rhs)
    };
}

/// Asserts `lhs >= rhs`.
#[macro_export]
macro_rules! stf_assert_ge {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::__stf_relation!(GreaterOrEqual, $lhs, $rhs)
    };
}

/// Asserts `lhs < rhs`.
#[macro_export]
macro_rules! stf_assert_lt {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::__stf_relation!(Less, $lhs, $rhs)
    };
}

/// Asserts `lhs <= rhs`.
#[macro_export]
macro_rules! stf_assert_le {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::__stf_relation!(LessOrEqual, $lhs, $rhs)
    };
}

/// Asserts that a boolean expression is true.
#[macro_export]
macro_rules! stf_assert_true {
    ($value:expr $(,)?) => {
        $crate::__stf_check!($crate::assert::check_true(file!(), line!(), $value))
    };
}

/// Asserts that a boolean expression is false.
#[macro_export]
macro_rules! stf_assert_false {
    ($value:expr $(,)?) => {
        $crate::__stf_check!($crate::assert::check_false(file!(), line!(), $value))
    };
}

/// Asserts `|lhs - rhs| < epsilon` for `f32` or `f64` operands.
#[macro_export]
macro_rules! stf_assert_close {
    ($lhs:expr, $rhs:expr, $epsilon:expr $(,)?) => {
        $crate::__stf_check!($crate::assert::check_close(
            file!(),
            line!(),
            $lhs,
            $rhs,
            $epsilon
        ))
    };
}

/// Asserts that the first `length` octets of two byte ranges are identical.
#[macro_export]
macro_rules! stf_assert_mem_eq {
    ($expected:expr, $actual:expr, $length:expr $(,)?) => {
        $crate::__stf_check!($crate::assert::check_mem_eq(
            file!(),
            line!(),
            $crate::assert::octets(&$expected),
            $crate::assert::octets(&$actual),
            $length
        ))
    };
}

/// Asserts that the first `length` octets of two byte ranges differ somewhere.
#[macro_export]
macro_rules! stf_assert_mem_ne {
    ($lhs:expr, $rhs:expr, $length:expr $(,)?) => {
        $crate::__stf_check!($crate::assert::check_mem_ne(
            file!(),
            line!(),
            $crate::assert::octets(&$lhs),
            $crate::assert::octets(&$rhs),
            $length
        ))
    };
}

/// Asserts that calling `f` panics, with any payload.
#[macro_export]
macro_rules! stf_assert_panics {
    ($f:expr $(,)?) => {
        $crate::__stf_check!($crate::assert::check_panics(file!(), line!(), $f))
    };
}

/// Asserts that calling `f` panics with a payload of the given [`PanicKind`].
///
/// A kind declared with narrower kinds (see [`panic_kind!`](crate::panic_kind))
/// accepts those as well.
///
/// [`PanicKind`]: crate::PanicKind
#[macro_export]
macro_rules! stf_assert_panics_with {
    ($f:expr, $kind:ty $(,)?) => {
        $crate::__stf_check!($crate::assert::check_panics_with::<$kind, _>(
            file!(),
            line!(),
            $f
        ))
    };
}

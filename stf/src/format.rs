//! Type-directed rendering of values for failure diagnostics.
//!
//! A value is rendered by the first capability it has, in this order:
//!
//! 1. booleans render as `true` / `false`;
//! 2. `char` renders as the quoted character (when printable) and its code point;
//! 3. integers render in decimal and in zero-padded hexadecimal;
//! 4. floating-point values render with 26 significant digits;
//! 5. raw pointers and fixed-size arrays render as their address;
//! 6. anything else implementing [`Display`], then [`Debug`], renders through it;
//! 7. everything else renders as unprintable, with its address.
//!
//! Tiers 1 through 5 are the [`Describe`] trait. The selection between tiers is made
//! at the macro call site by [`format_value!`](crate::format_value), which inspects
//! the capabilities of the value's concrete type (see [`dispatch`]).

use std::fmt::{Debug, Display, Write as _};

/// Number of significant digits used when rendering floating-point values.
pub const FLOAT_SIGNIFICANT_DIGITS: usize = 26;

/// How a rendered value was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueClass {
    /// Literal `true` or `false`.
    Boolean,
    /// Character with its code point.
    Character,
    /// Integer in decimal and hexadecimal.
    Integral,
    /// Floating-point value at high precision.
    Float,
    /// Address of a pointer or array.
    Address,
    /// Output of the value's own `Display` or `Debug` implementation.
    Text,
    /// Tag plus address for values with no way to render themselves.
    Unprintable,
    /// A memory range rendered as contiguous hexadecimal octets.
    Octets,
}

/// A value rendered for a diagnostic line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedValue {
    class: ValueClass,
    text: String,
}

impl FormattedValue {
    /// Creates a rendered value.
    pub fn new(class: ValueClass, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
        }
    }

    /// Creates a rendered value from free-form text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ValueClass::Text, text)
    }

    /// Returns how the value was rendered.
    pub const fn class(&self) -> ValueClass {
        self.class
    }

    /// Returns the rendered text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for FormattedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Built-in diagnostic rendering for primitive kinds.
pub trait Describe {
    /// Renders `self` for a failure diagnostic.
    fn describe(&self) -> FormattedValue;
}

impl Describe for bool {
    fn describe(&self) -> FormattedValue {
        FormattedValue::new(ValueClass::Boolean, if *self { "true" } else { "false" })
    }
}

impl Describe for char {
    fn describe(&self) -> FormattedValue {
        let code_point = u32::from(*self);
        let text = if self.is_control() {
            format!("(char 0x{code_point:08x})")
        } else {
            format!("'{}' (char 0x{code_point:08x})", self)
        };
        FormattedValue::new(ValueClass::Character, text)
    }
}

macro_rules! describe_integral {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Describe for $t {
                fn describe(&self) -> FormattedValue {
                    const WIDTH: usize = std::mem::size_of::<$t>() * 2;
                    FormattedValue::new(
                        ValueClass::Integral,
                        format!("{} (0x{:0width$x})", self, self, width = WIDTH),
                    )
                }
            }
        )+
    };
}

describe_integral!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

impl Describe for f32 {
    fn describe(&self) -> FormattedValue {
        FormattedValue::new(
            ValueClass::Float,
            format_significant(f64::from(*self), FLOAT_SIGNIFICANT_DIGITS),
        )
    }
}

impl Describe for f64 {
    fn describe(&self) -> FormattedValue {
        FormattedValue::new(
            ValueClass::Float,
            format_significant(*self, FLOAT_SIGNIFICANT_DIGITS),
        )
    }
}

impl<T: ?Sized> Describe for *const T {
    fn describe(&self) -> FormattedValue {
        FormattedValue::new(ValueClass::Address, format!("{:p} (memory address)", *self))
    }
}

impl<T: ?Sized> Describe for *mut T {
    fn describe(&self) -> FormattedValue {
        FormattedValue::new(ValueClass::Address, format!("{:p} (memory address)", *self))
    }
}

impl<T, const N: usize> Describe for [T; N] {
    fn describe(&self) -> FormattedValue {
        FormattedValue::new(ValueClass::Address, format!("{:p} (memory address)", self))
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(&self) -> FormattedValue {
        (**self).describe()
    }
}

impl<T: Describe + ?Sized> Describe for &mut T {
    fn describe(&self) -> FormattedValue {
        (**self).describe()
    }
}

/// Renders `value` with `digits` significant digits, choosing fixed or
/// exponent notation the way C's `%g` conversion does and trimming trailing
/// zeros.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }
    if value == 0.0 {
        return String::from(if value.is_sign_negative() { "-0" } else { "0" });
    }

    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Renders octets as space-separated, two-digit hexadecimal pairs.
pub fn hex_octets(octets: &[u8]) -> String {
    octets
        .iter()
        .map(|octet| format!("{octet:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a memory range as a single `0x`-prefixed hexadecimal string.
///
/// When fewer than `length` octets are available, the available ones are rendered
/// and the shortfall is noted.
pub fn format_memory(octets: &[u8], length: usize) -> FormattedValue {
    let available = octets.len().min(length);
    let mut text = format!("0x{}", hex_octets(&octets[..available]));
    if available < length {
        let _ = write!(text, " ({available} of {length} octets available)");
    }
    FormattedValue::new(ValueClass::Octets, text)
}

/// Capability probing used by [`format_value!`](crate::format_value).
///
/// Each tier is a trait implemented for a different level of reference to
/// [`Subject`]. Method resolution on `&&&Subject(value)` tries the implementations in
/// order of reference depth, so the first tier whose bound the value's type
/// satisfies is the one used.
pub mod dispatch {
    use super::{Debug, Describe, Display, FormattedValue, ValueClass};

    /// Wraps a reference to the value being rendered.
    pub struct Subject<'a, T: ?Sized>(pub &'a T);

    impl<T: ?Sized> Clone for Subject<'_, T> {
        fn clone(&self) -> Self {
            *self
        }
    }

    impl<T: ?Sized> Copy for Subject<'_, T> {}

    /// Tiers 1 through 5: built-in kinds.
    pub trait ViaDescribe {
        /// Renders the wrapped value.
        fn formatted_value(self) -> FormattedValue;
    }

    impl<T: Describe + ?Sized> ViaDescribe for &&&Subject<'_, T> {
        fn formatted_value(self) -> FormattedValue {
            self.0.describe()
        }
    }

    /// Tier 6: the value's own `Display` rendering.
    pub trait ViaDisplay {
        /// Renders the wrapped value.
        fn formatted_value(self) -> FormattedValue;
    }

    impl<T: Display + ?Sized> ViaDisplay for &&Subject<'_, T> {
        fn formatted_value(self) -> FormattedValue {
            FormattedValue::text(self.0.to_string())
        }
    }

    /// Tier 6, second choice: the value's own `Debug` rendering.
    pub trait ViaDebug {
        /// Renders the wrapped value.
        fn formatted_value(self) -> FormattedValue;
    }

    impl<T: Debug + ?Sized> ViaDebug for &Subject<'_, T> {
        fn formatted_value(self) -> FormattedValue {
            FormattedValue::text(format!("{:?}", self.0))
        }
    }

    /// Tier 7: unprintable.
    pub trait ViaOpaque {
        /// Renders the wrapped value.
        fn formatted_value(self) -> FormattedValue;
    }

    impl<T: ?Sized> ViaOpaque for Subject<'_, T> {
        fn formatted_value(self) -> FormattedValue {
            FormattedValue::new(
                ValueClass::Unprintable,
                format!("[Unprintable object at address {:p}]", self.0),
            )
        }
    }
}

/// Renders a value for a diagnostic line, choosing the most specific rendering
/// its type supports.
///
/// ```
/// assert_eq!(stf::format_value!(true).as_str(), "true");
/// assert_eq!(stf::format_value!(255u8).as_str(), "255 (0xff)");
/// assert_eq!(stf::format_value!("text").as_str(), "text");
/// ```
#[macro_export]
macro_rules! format_value {
    ($value:expr) => {{
        #[allow(unused_imports)]
        use $crate::format::dispatch::{
            ViaDebug as _, ViaDescribe as _, ViaDisplay as _, ViaOpaque as _,
        };
        (&&&$crate::format::dispatch::Subject(&$value)).formatted_value()
    }};
}

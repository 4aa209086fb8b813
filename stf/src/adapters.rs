//! Display adapters for values whose default rendering hides the detail a
//! failure diagnostic needs.

use std::fmt::{self, Display, LowerHex};

/// Renders a sequence of integers as `0x` followed by space-separated hex
/// elements, each zero-padded to the width of the element type.
///
/// Comparing through the adapter keeps failure output readable for byte and word
/// buffers:
///
/// ```
/// use stf::adapters::Hex;
///
/// assert_eq!(Hex(&[1u8, 2, 0xff]).to_string(), "0x01 02 ff");
/// assert_eq!(Hex(&vec![0x1234u16, 7]).to_string(), "0x1234 0007");
/// assert_eq!(Hex(&[1u8, 2]), Hex(&vec![1u8, 2]));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Hex<'a, T>(pub &'a [T]);

impl<T: LowerHex> Display for Hex<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = std::mem::size_of::<T>() * 2;
        f.write_str("0x")?;
        for (index, element) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{element:0width$x}")?;
        }
        Ok(())
    }
}

impl<T: PartialEq> PartialEq for Hex<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Eq> Eq for Hex<'_, T> {}

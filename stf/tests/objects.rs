//! Assertions over user-defined types, exclusions, and the hex adapter.

use std::fmt;

use stf::adapters::Hex;
use stf::{
    Registry, declare_exclusion, declare_test, stf_assert_eq, stf_assert_false, stf_assert_ge,
    stf_assert_gt, stf_assert_le, stf_assert_lt, stf_assert_ne, stf_assert_true,
};

#[derive(Clone, Copy, PartialEq, PartialOrd)]
struct SomeObject {
    value: u32,
}

impl SomeObject {
    const fn new(value: u32) -> Self {
        Self { value }
    }
}

impl fmt::Display for SomeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object{{{}}}", self.value)
    }
}

/// Renders only through `Debug`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Ticket(u16);

/// No way to render itself at all.
#[derive(PartialEq)]
struct Handle {
    id: u64,
}

fn objects(registry: &mut Registry) {
    declare_test!(registry, Objects, Equal, || {
        stf_assert_eq!(SomeObject::new(10), SomeObject::new(10));
    });

    declare_test!(registry, Objects, Inequality, || {
        stf_assert_ne!(SomeObject::new(10), SomeObject::new(20));
    });

    declare_test!(registry, Objects, Greater, || {
        stf_assert_gt!(SomeObject::new(20), SomeObject::new(10));
    });

    declare_test!(registry, Objects, GreaterEqual, || {
        stf_assert_ge!(SomeObject::new(10), SomeObject::new(10));
    });

    declare_test!(registry, Objects, Less, || {
        stf_assert_lt!(SomeObject::new(10), SomeObject::new(20));
    });

    declare_test!(registry, Objects, LessEqual, || {
        stf_assert_le!(SomeObject::new(20), SomeObject::new(20));
    });

    declare_test!(registry, Objects, True, || {
        let (object1, object2) = (SomeObject::new(20), SomeObject::new(20));
        stf_assert_true!(object1 == object2);
    });

    declare_test!(registry, Objects, False, || {
        let (object1, object2) = (SomeObject::new(10), SomeObject::new(20));
        stf_assert_false!(object1 == object2);
    });

    declare_test!(registry, Objects, DebugOnly, || {
        stf_assert_eq!(Ticket(7), Ticket(7));
        stf_assert_lt!(Ticket(7), Ticket(8));
    });

    declare_test!(registry, Objects, Unprintable, || {
        stf_assert_eq!(Handle { id: 1 }, Handle { id: 1 });
        stf_assert_ne!(Handle { id: 1 }, Handle { id: 2 });
    });

    declare_test!(registry, Objects, Strings, || {
        stf_assert_eq!("text", String::from("text"));
        stf_assert_lt!("abc", "abd");
    });
}

fn miscellaneous(registry: &mut Registry) {
    declare_test!(registry, Miscellaneous, TestToRun, || {
        stf_assert_true!(true);
    });

    // Would fail if it ran.
    declare_test!(registry, Miscellaneous, TestToExclude, || {
        stf_assert_true!(false);
    });

    declare_test!(registry, Miscellaneous, AnotherTestToRun, || {
        stf_assert_true!(true);
    });

    declare_test!(registry, Miscellaneous, SecondTestToExclude, || {
        stf_assert_true!(false);
    });

    declare_exclusion!(registry, Miscellaneous, TestToExclude);
    declare_exclusion!(registry, Miscellaneous, SecondTestToExclude);
}

fn adapters(registry: &mut Registry) {
    declare_test!(registry, Adapters, IntegralArrays, || {
        let first: [u8; 16] = [
            0xa4, 0x4a, 0x82, 0x66, 0xee, 0x1c, 0x8e, 0xb0, 0xc8, 0xb5, 0xd4, 0xcf, 0x5a, 0xe9,
            0xf1, 0x9a,
        ];
        let second = first;
        stf_assert_eq!(first, second);
        stf_assert_eq!(Hex(&first), Hex(&second));
    });

    declare_test!(registry, Adapters, IntegralVector, || {
        let first: Vec<u8> = vec![
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let second = first.clone();
        stf_assert_eq!(first, second);
        stf_assert_eq!(Hex(&first), Hex(&second));
        stf_assert_ne!(Hex(&first[..4]), Hex(&second[4..8]));
    });

    declare_test!(registry, Adapters, WideElements, || {
        let words = [0x0102u16, 0xfffe];
        stf_assert_eq!(Hex(&words).to_string(), "0x0102 fffe");
    });
}

stf::main!(objects, miscellaneous, adapters);

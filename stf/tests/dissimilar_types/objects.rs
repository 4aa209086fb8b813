use std::cmp::Ordering;
use std::fmt;

use stf::{
    Registry, declare_test, stf_assert_eq, stf_assert_false, stf_assert_ge, stf_assert_gt,
    stf_assert_le, stf_assert_lt, stf_assert_ne, stf_assert_true,
};

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
struct SomeObject(u32);

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
struct SomeOtherObject(u32);

impl fmt::Display for SomeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SomeObject{{{}}}", self.0)
    }
}

impl fmt::Display for SomeOtherObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SomeOtherObject{{{}}}", self.0)
    }
}

impl PartialEq<SomeOtherObject> for SomeObject {
    fn eq(&self, other: &SomeOtherObject) -> bool {
        self.0 == other.0
    }
}

impl PartialEq<SomeObject> for SomeOtherObject {
    fn eq(&self, other: &SomeObject) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd<SomeOtherObject> for SomeObject {
    fn partial_cmp(&self, other: &SomeOtherObject) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

pub(crate) fn register(registry: &mut Registry) {
    declare_test!(registry, DissimilarObjects, Equal, || {
        stf_assert_eq!(SomeObject(10), SomeOtherObject(10));
    });

    declare_test!(registry, DissimilarObjects, Inequality, || {
        let (object1, object2) = (SomeObject(10), SomeOtherObject(20));
        stf_assert_ne!(object1, object2);
        stf_assert_ne!(object2, object1);
    });

    declare_test!(registry, DissimilarObjects, Greater, || {
        stf_assert_gt!(SomeObject(20), SomeOtherObject(10));
    });

    declare_test!(registry, DissimilarObjects, GreaterEqual, || {
        stf_assert_ge!(SomeObject(10), SomeOtherObject(10));
    });

    declare_test!(registry, DissimilarObjects, Less, || {
        stf_assert_lt!(SomeObject(10), SomeOtherObject(20));
    });

    declare_test!(registry, DissimilarObjects, LessEqual, || {
        stf_assert_le!(SomeObject(20), SomeOtherObject(20));
    });

    declare_test!(registry, DissimilarObjects, True, || {
        let (object1, object2) = (SomeObject(20), SomeOtherObject(20));
        stf_assert_true!(object1 == object2);
    });

    declare_test!(registry, DissimilarObjects, False, || {
        let (object1, object2) = (SomeObject(10), SomeOtherObject(20));
        stf_assert_false!(object1 == object2);
    });
}

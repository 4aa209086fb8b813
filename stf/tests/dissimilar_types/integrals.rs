use stf::{
    Registry, declare_test, stf_assert_eq, stf_assert_false, stf_assert_ge, stf_assert_gt,
    stf_assert_le, stf_assert_lt, stf_assert_ne, stf_assert_true,
};

pub(crate) fn register(registry: &mut Registry) {
    declare_test!(registry, DissimilarTypes, Equal, || {
        stf_assert_eq!(b'a' as i8, b'a');
        stf_assert_eq!(1i32, 1i64);
        stf_assert_eq!(1u32, 1u64);
        stf_assert_eq!(0u32, 0u64);
        stf_assert_eq!(1usize, 1u8);
        stf_assert_eq!(u64::MAX, u128::from(u64::MAX));
    });

    declare_test!(registry, DissimilarTypes, Inequality, || {
        stf_assert_ne!(b'a' as i8, b'b');
        stf_assert_ne!(1i32, 2i64);
        stf_assert_ne!(1u32, 2u64);
        stf_assert_ne!(-1i32, u32::MAX);
        stf_assert_ne!(i64::MIN, 0u64);
    });

    declare_test!(registry, DissimilarTypes, Greater, || {
        stf_assert_gt!(b'b' as i8, b'a');
        stf_assert_gt!(2i32, 1i64);
        stf_assert_gt!(2u32, 1u64);
        stf_assert_gt!(0u8, -1i64);
    });

    declare_test!(registry, DissimilarTypes, GreaterEqual, || {
        stf_assert_ge!(b'a' as i8, b'a');
        stf_assert_ge!(2i32, 1i64);
        stf_assert_ge!(2u32, 1u64);
        stf_assert_ge!(2i32, 2i32);
        stf_assert_ge!(2u32, 2u64);
    });

    declare_test!(registry, DissimilarTypes, Less, || {
        stf_assert_lt!(b'a' as i8, b'b');
        stf_assert_lt!(1i32, 2i64);
        stf_assert_lt!(1u32, 2u64);
        stf_assert_lt!(i128::MIN, u128::MAX);
    });

    declare_test!(registry, DissimilarTypes, LessEqual, || {
        stf_assert_le!(b'a' as i8, b'a');
        stf_assert_le!(1i32, 2i64);
        stf_assert_le!(1u32, 2u64);
        stf_assert_le!(2i16, 2u16);
        stf_assert_le!(2u32, 2u64);
    });

    declare_test!(registry, DissimilarTypes, True, || {
        let (i, j) = (1i32, 1i64);
        stf_assert_true!(i64::from(i) == j);
    });

    declare_test!(registry, DissimilarTypes, False, || {
        let (i, j) = (1i32, 2i64);
        stf_assert_false!(i64::from(i) == j);
    });
}

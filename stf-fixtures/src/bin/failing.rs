//! A failing test between a passing one and one that must never run.

use stf::{Registry, declare_test, stf_assert_eq, stf_assert_mem_eq};

fn failing(registry: &mut Registry) {
    declare_test!(registry, FailFast, Passes, || {
        stf_assert_mem_eq!([1u8, 2], [1u8, 2], 2);
    });

    declare_test!(registry, FailFast, Fails, || {
        stf_assert_eq!(1u8, 2u8);
    });

    declare_test!(registry, FailFast, NeverRuns, || {
        println!("this test should not have run");
    });
}

stf::main!(failing);

//! Three tests, the middle one excluded.

use stf::{Registry, declare_exclusion, declare_test, stf_assert_eq, stf_assert_true};

fn ordered(registry: &mut Registry) {
    declare_test!(registry, Ordered, A, || {
        stf_assert_true!(true);
    });

    declare_test!(registry, Ordered, B, || {
        stf_assert_true!(false);
    });

    declare_test!(registry, Ordered, C, || -> anyhow::Result<()> {
        let parsed: u64 = "42".parse()?;
        stf_assert_eq!(42u8, parsed);
        Ok(())
    });

    declare_exclusion!(registry, Ordered, B);
}

stf::main!(ordered);

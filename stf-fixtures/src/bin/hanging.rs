//! A test that never finishes within its one-second bound.

use std::time::Duration;
use stf::{Registry, declare_test};

fn spin() {
    loop {
        std::thread::sleep(Duration::from_millis(100));
    }
}

fn hanging(registry: &mut Registry) {
    declare_test!(registry, Timeout, Quick, || {});

    declare_test!(registry, Timeout, Hang, timeout = 1, spin);

    declare_test!(registry, Timeout, After, || {
        println!("this test should not have run");
    });
}

stf::main!(hanging);

//! Panic assertions and panic-kind matching.

use stf::{PanicMessage, Registry, declare_test, stf_assert_eq, stf_assert_panics, stf_assert_panics_with};

#[derive(Debug)]
struct RuntimeError;

#[derive(Debug)]
struct CustomError;

#[derive(Debug)]
struct ParseError;

stf::panic_kind!(CustomError);
stf::panic_kind!(ParseError);
// A broad kind accepts the narrower kinds listed for it.
stf::panic_kind!(RuntimeError => [CustomError, ParseError]);

fn raise_custom() {
    std::panic::panic_any(CustomError);
}

fn unnamed(registry: &mut Registry) {
    declare_test!(registry, Panics, LiteralMessage, || {
        stf_assert_panics!(|| panic!("Unnamed"));
    });

    declare_test!(registry, Panics, FormattedMessage, || {
        let limit = 3;
        stf_assert_panics!(|| panic!("index {} out of range", limit + 1));
        stf_assert_panics_with!(|| panic!("index {} out of range", limit + 1), String);
        stf_assert_panics_with!(|| panic!("index {} out of range", limit + 1), PanicMessage);
    });

    declare_test!(registry, Panics, StandardLibraryPanics, || {
        let values: Vec<u8> = Vec::new();
        stf_assert_panics!(|| values[1]);
        stf_assert_panics!(|| "abc".parse::<u32>().unwrap());
    });
}

fn kinds(registry: &mut Registry) {
    declare_test!(registry, Panics, ExpectedKind, || {
        stf_assert_panics_with!(raise_custom, CustomError);
    });

    // Passes because RuntimeError accepts CustomError.
    declare_test!(registry, Panics, BroaderKind, || {
        stf_assert_panics_with!(raise_custom, RuntimeError);
        stf_assert_panics_with!(
            || std::panic::panic_any(ParseError),
            RuntimeError
        );
    });

    declare_test!(registry, Panics, DirectClosure, || {
        stf_assert_panics!(|| std::panic::panic_any(CustomError));
        stf_assert_panics_with!(
            || std::panic::panic_any(RuntimeError),
            RuntimeError
        );
    });

    declare_test!(registry, Panics, ExecutionContinues, || {
        let mut attempts = 0;
        stf_assert_panics!(|| {
            attempts += 1;
            panic!("first attempt");
        });
        stf_assert_eq!(attempts, 1);
    });
}

stf::main!(unnamed, kinds);

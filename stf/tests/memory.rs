//! Memory-range assertions and pointer comparisons.

use stf::{Registry, declare_test, stf_assert_eq, stf_assert_mem_eq, stf_assert_mem_ne, stf_assert_ne};

fn ranges(registry: &mut Registry) {
    declare_test!(registry, Memory, Identical, || {
        let first = [0x01u8, 0x02, 0x08, 0x04];
        let second = [0x01u8, 0x02, 0x08, 0x04];
        stf_assert_mem_eq!(first, second, first.len());
    });

    declare_test!(registry, Memory, Different, || {
        let first = [0x01u8, 0x02, 0x08, 0x04];
        let second = [0x01u8, 0x02, 0x08, 0x05];
        stf_assert_mem_ne!(first, second, first.len());
        // Only the leading octets take part.
        stf_assert_mem_eq!(first, second, 3);
    });

    declare_test!(registry, Memory, Buffers, || {
        let mut first = vec![0u8; 100];
        let mut second = [0u8; 100];
        stf_assert_eq!(first.len(), second.len());

        first[50] = b'a';
        second[50] = b'a';
        stf_assert_mem_eq!(first, second, 100);

        second[99] = b'z';
        stf_assert_mem_ne!(first, second, 100);
        stf_assert_mem_eq!(first, second, 99);
    });

    declare_test!(registry, Memory, WordsAsOctets, || {
        let word = 0x0102_0304u32;
        stf_assert_mem_eq!(word.to_be_bytes(), [1u8, 2, 3, 4], 4);
        stf_assert_mem_ne!(word.to_le_bytes(), word.to_be_bytes(), 4);
        stf_assert_mem_eq!("text", b"text", 4);
    });

    declare_test!(registry, Memory, ZeroLength, || {
        stf_assert_mem_eq!([1u8], [2u8], 0);
    });
}

fn pointers(registry: &mut Registry) {
    declare_test!(registry, Memory, SamePointer, || {
        let value = 0i32;
        let first: *const i32 = &value;
        let second: *const i32 = &value;
        stf_assert_eq!(first, second);
    });

    declare_test!(registry, Memory, DistinctPointers, || {
        let (a, b) = (0i32, 0i32);
        let first: *const i32 = &a;
        let second: *const i32 = &b;
        stf_assert_ne!(first, second);
    });

    declare_test!(registry, Memory, NullPointer, || {
        let buffer = [0u8; 20];
        let mut pointer: *const u8 = std::ptr::null();
        stf_assert_ne!(pointer, buffer.as_ptr());

        pointer = buffer.as_ptr();
        stf_assert_eq!(pointer, buffer.as_ptr());
    });
}

stf::main!(ranges, pointers);

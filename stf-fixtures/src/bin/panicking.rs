//! Panics outside of any panic assertion, on a spawned thread and in a test body.

use stf::{Registry, declare_test};

fn lookup(table: &[u32], key: &str) -> u32 {
    let index: usize = key.parse().unwrap_or(usize::MAX);
    table.get(index).copied().unwrap_or_else(|| panic!("no entry for key {key}"))
}

fn lose_worker() {
    let shard = 3;
    panic!("worker lost shard {shard}");
}

fn panicking(registry: &mut Registry) {
    declare_test!(registry, Panics, SpawnedThread, || {
        let worker = std::thread::spawn(lose_worker);
        stf::stf_assert_true!(worker.join().is_err());
    });

    declare_test!(registry, Panics, Unexpected, || {
        let table = [7u32, 11];
        stf::stf_assert_eq!(11u32, lookup(&table, "1"));
        lookup(&table, "missing");
    });
}

stf::main!(panicking);

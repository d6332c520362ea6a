//! Benchmarks comparing the crate's maps against the standard library.

#[macro_use]
extern crate criterion;


criterion_group!(
    benches,
    crate::btreemap::insert,
    crate::btreemap::rand_access,
    crate::skiplist::insert,
    crate::skiplist::rand_access,
    crate::skiplist::tall_rand_access,
    crate::skiplist::remove,
    crate::ziptree::insert,
    crate::ziptree::rand_access,
    crate::ziptree::remove,
    crate::ziptree::to_skiplist,
);
criterion_main!(benches);

//! Model-based fuzzing: the real decoder against the reference model.

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use feiyu_harness::{DecoderWorld, Operation};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(operations) = Vec::<Operation>::arbitrary(&mut unstructured) else {
        return;
    };

    let mut world = DecoderWorld::new();
    if let Err(divergence) = world.run(&operations) {
        panic!("{divergence}");
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use saphyr_decode::{from_str, RecordType, Target};

// Anchors and aliases around fuzzed scalars, decoded both dynamically and
// through a record whose fields narrow numbers.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);

    let yaml = format!("a: &A {s}\nb: *A\nseq: &S [1, {s}, 3]\nseq_alias: *S\n");

    let doc = Target::record(
        RecordType::builder("AliasDoc")
            .field("a", Target::nullable(Target::Str))
            .field("b", Target::nullable(Target::I64))
            .field("seq", Target::seq(Target::U8))
            .field("seq_alias", Target::seq(Target::F32))
            .build(),
    );

    let _dynamic = from_str(&yaml, &Target::Dynamic);
    let _typed = from_str(&yaml, &doc);
    let _raw = from_str(&s, &Target::Dynamic);
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use saphyr_decode::{from_str_with_options, options, DuplicateKeyPolicy, Target};

// Mappings with intentional duplicate keys, run under every duplicate-key policy.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);

    let yaml_top = format!("a: 1\na: 2\nkey: {s}\nkey: {s}\n");
    let yaml_nested = format!("outer:\n  inner: {{x: 1, x: 2}}\n  arr: [{{k: {s}}}, {{k: {s}}}]\n");
    let yaml_flow = format!("{{'{s}': 1, '{s}': 2}}\n");

    let targets = [
        Target::Dynamic,
        Target::map(Target::Str, Target::Dynamic),
        Target::map(Target::Dynamic, Target::I64),
    ];

    for policy in [
        DuplicateKeyPolicy::Error,
        DuplicateKeyPolicy::FirstWins,
        DuplicateKeyPolicy::LastWins,
    ] {
        for yaml in [&yaml_top, &yaml_nested, &yaml_flow] {
            for target in &targets {
                let _ = from_str_with_options(yaml, target, options! { duplicate_keys: policy });
            }
        }
    }
});

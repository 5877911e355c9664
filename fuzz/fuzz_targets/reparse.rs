#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

// Parse-deparse round trip (§8): re-parsing the canonical deparse of a tree
// must yield a tree structurally equal to the original.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(source) = rl_fuzzgen::requirement_source(&mut u) else {
        return;
    };
    let Ok(tree) = rl_parser::parse(&source) else {
        return;
    };

    let printed = rl_printer::reprint(&tree);
    let reparsed = rl_parser::parse(&printed).unwrap_or_else(|err| {
        panic!("canonical deparse failed to reparse: {printed:?} ({err:?})")
    });

    assert!(
        rl_parser::tree_eq(&tree, &reparsed),
        "round trip changed structure: {source:?} -> {printed:?}"
    );
});

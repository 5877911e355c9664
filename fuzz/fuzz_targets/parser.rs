#![no_main]

use libfuzzer_sys::fuzz_target;

// The parser must never panic on arbitrary input (§4.2 "must not throw
// across the public boundary"); a `ParseError` is an ordinary `Err`.
fuzz_target!(|input: &str| {
    let _ = rl_parser::parse(input);
});

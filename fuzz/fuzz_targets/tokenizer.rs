#![no_main]

use libfuzzer_sys::fuzz_target;

// Tokeniser totality (§8): any input terminates and produces exactly one
// trailing `Eol`, regardless of how malformed the input is.
fuzz_target!(|input: &str| {
    let tokens = rl_parser::tokenize(input);
    assert_eq!(tokens.last().map(|t| t.kind), Some(rl_parser::TokenKind::Eol));
    assert_eq!(
        tokens.iter().filter(|t| t.kind == rl_parser::TokenKind::Eol).count(),
        1
    );
});

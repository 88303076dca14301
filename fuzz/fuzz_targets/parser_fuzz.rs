//! Parser fuzz target: feed arbitrary text to the declaration parser.
//! The parser must not panic; it returns Ok(DefinitionCollection) or Err(ParseError).
//! A successful parse re-printed as canonical source must parse back equal.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(collection) = fppdsl::parse(s) {
        let canonical = collection.to_source();
        assert_eq!(fppdsl::parse(&canonical).as_ref(), Ok(&collection), "{:?}", canonical);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}

//! Conversion fuzz target: feed arbitrary text to a non-interactive session.
//! Conversion must not panic; it returns generated source or a ConvertError.
//! Build with: cargo fuzz run convert_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let mut session = structgen::ConversionSession::non_interactive("crate::fuzz");
    let _ = session.convert_str(s);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run convert_fuzz");
}

//! Golden IL tests.
//!
//! Discovers `tests/cases/*.uil` sources paired with `.il` expectation
//! files and verifies that compiling each source yields exactly the
//! expected instruction text. Adding a test is creating a pair of files.

use std::fs;
use std::path::{Path, PathBuf};

fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/cases")
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}

#[test]
fn emitted_il_matches_expectations() {
    let mut checked = 0;
    for entry in fs::read_dir(cases_dir()).expect("tests/cases exists") {
        let source_path = entry.expect("readable dir entry").path();
        if source_path.extension().and_then(|e| e.to_str()) != Some("uil") {
            continue;
        }
        let expected_path = source_path.with_extension("il");

        let source = fs::read_to_string(&source_path).expect("readable source");
        let expected = fs::read_to_string(&expected_path).expect("readable expectation");

        let compilation = uilc::compile(&source)
            .unwrap_or_else(|e| panic!("{} failed to compile: {e}", source_path.display()));
        assert!(
            compilation.diagnostics.is_empty(),
            "{} produced diagnostics: {:?}",
            source_path.display(),
            compilation.diagnostics
        );
        assert_eq!(
            normalize(&compilation.il()),
            normalize(&expected),
            "IL mismatch for {}",
            source_path.display()
        );
        checked += 1;
    }
    assert!(checked > 0, "no golden cases discovered");
}

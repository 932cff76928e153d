//! Tests for the text and JSON output formats.

use std::path::PathBuf;

use pystylecheck::cli::collect_files;
use pystylecheck::detect::Runner;
use pystylecheck::report;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run_testdata() -> pystylecheck::CheckReport {
    let runner = Runner::new();
    let files = collect_files(&testdata_path(), runner.analyzer()).unwrap();
    runner.check_files(&files)
}

#[test]
fn test_text_line_shape() {
    let report = run_testdata();
    let mut out = Vec::new();
    report::write_text(&mut out, &report).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.lines().count(), report.diagnostics.len());
    for line in text.lines() {
        let (path, rest) = line.split_once(": Line ").expect("line shape");
        assert!(path.ends_with(".py"));
        let (number, rest) = rest.split_once(": ").expect("line number");
        assert!(number.parse::<usize>().unwrap() > 0);
        assert!(rest.starts_with('S'));
        assert_eq!(rest.as_bytes()[4], b' ');
    }
}

#[test]
fn test_json_matches_text_order() {
    let report = run_testdata();
    let mut out = Vec::new();
    let path = testdata_path().to_string_lossy().to_string();
    report::write_json(&mut out, &path, &report).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(value["files_scanned"], 4);
    assert_eq!(value["parse_failures"], 1);
    assert!(value["errors"].as_array().unwrap().is_empty());

    let diagnostics = value["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), report.diagnostics.len());
    for (json, diag) in diagnostics.iter().zip(&report.diagnostics) {
        assert_eq!(json["file"], diag.file.as_str());
        assert_eq!(json["line"], diag.line);
        assert_eq!(json["code"], diag.code.as_str());
        assert_eq!(json["message"], diag.message.as_str());
    }
}

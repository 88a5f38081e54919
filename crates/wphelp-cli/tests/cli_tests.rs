//! Integration tests for the `wphelp` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive each subcommand
//! through the actual binary, covering stdin/stdout piping, file I/O, config
//! loading, error reporting and an xml → parse pipeline.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn wphelp() -> Command {
    Command::cargo_bin("wphelp").unwrap()
}

/// A per-process scratch path so parallel test binaries don't collide.
fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("wphelp-test-{}-{}", std::process::id(), name))
}

// ─────────────────────────────────────────────────────────────────────────────
// xml subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn xml_stdin_to_stdout() {
    wphelp()
        .arg("xml")
        .write_stdin(r#"{"order":{"@attributes":{"id":"5"},"total":"9.99"}}"#)
        .assert()
        .success()
        .stdout(r#"<order id="5"><total>9.99</total></order>"#);
}

#[test]
fn xml_file_to_stdout() {
    wphelp()
        .args(["xml", "-i", fixture("order.json").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#"<order id="1001" status="processing">"#,
        ))
        .stdout(predicate::str::contains(
            "<items><item><sku>HD-01</sku><qty>2</qty></item><item><sku>MG-07</sku><qty>1</qty></item></items>",
        ))
        .stdout(predicate::str::contains(
            "<note><![CDATA[Leave at <front> door]]></note>",
        ))
        .stdout(predicate::str::contains("<total>59.5</total>"));
}

#[test]
fn xml_file_to_file() {
    let output_path = scratch_path("order.xml");
    let _ = std::fs::remove_file(&output_path);

    wphelp()
        .args(["xml", "-i", fixture("order.json").as_str(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert!(content.starts_with("<order "));
    assert!(content.ends_with("</order>"));

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn xml_with_declaration_and_indent() {
    wphelp()
        .args(["xml", "--declaration", "--indent", "2"])
        .write_stdin(r#"{"a":{"b":"1"}}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        ))
        .stdout(predicate::str::contains("\n  <b>1</b>"));
}

#[test]
fn xml_config_file() {
    wphelp()
        .args([
            "xml",
            "--config",
            fixture("config.json").as_str(),
            "-i",
            fixture("order.json").as_str(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains("\n  <customer>Jane Doe</customer>"));
}

#[test]
fn xml_numeric_first_key_is_sequence_by_default() {
    wphelp()
        .arg("xml")
        .write_stdin(r#"{"row":{"0":{"n":"a"},"1":{"n":"b"}}}"#)
        .assert()
        .success()
        .stdout("<row><n>a</n></row><row><n>b</n></row>");
}

#[test]
fn xml_arrays_only_rejects_numeric_keys() {
    wphelp()
        .args(["xml", "--arrays-only"])
        .write_stdin(r#"{"row":{"0":{"n":"a"}}}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to serialize JSON to XML"));
}

#[test]
fn xml_invalid_json_fails() {
    wphelp()
        .arg("xml")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to serialize"));
}

#[test]
fn xml_non_object_document_fails() {
    wphelp()
        .arg("xml")
        .write_stdin("[1, 2, 3]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON object"));
}

#[test]
fn xml_bad_config_fails() {
    let config_path = scratch_path("bad-config.json");
    std::fs::write(&config_path, r#"{"indent": "wide"}"#).unwrap();

    wphelp()
        .args(["xml", "--config"])
        .arg(&config_path)
        .write_stdin(r#"{"a":"1"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));

    let _ = std::fs::remove_file(&config_path);
}

#[test]
fn xml_missing_input_file_fails() {
    wphelp()
        .args(["xml", "-i", "/nonexistent/wphelp/input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// parse subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn parse_stdin_to_stdout() {
    let output = wphelp()
        .arg("parse")
        .write_stdin(r#"<order id="5"><total>9.99</total></order>"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("stdout is JSON");
    assert_eq!(
        value,
        serde_json::json!({"order": {"@attributes": {"id": "5"}, "total": "9.99"}})
    );
}

#[test]
fn parse_invalid_xml_fails() {
    wphelp()
        .arg("parse")
        .write_stdin("<a><b></a>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse XML"));
}

#[test]
fn xml_parse_pipeline() {
    let xml = wphelp()
        .args(["xml", "-i", fixture("order.json").as_str()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = wphelp()
        .arg("parse")
        .write_stdin(xml)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&json).expect("stdout is JSON");
    let order = &value["order"];
    assert_eq!(order["@attributes"]["status"], "processing");
    assert_eq!(order["customer"], "Jane Doe");
    assert_eq!(order["items"]["item"][1]["sku"], "MG-07");
    assert_eq!(order["note"], "Leave at <front> door");
    assert_eq!(order["total"], "59.5");
}

// ─────────────────────────────────────────────────────────────────────────────
// text subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn text_truncate_from_stdin() {
    wphelp()
        .args(["text", "truncate", "--length", "10"])
        .write_stdin("The quick brown fox\n")
        .assert()
        .success()
        .stdout("The qui...\n");
}

#[test]
fn text_truncate_custom_omission() {
    wphelp()
        .args(["text", "truncate", "The quick brown fox", "-l", "10", "--omission", "…"])
        .assert()
        .success()
        .stdout("The quick…\n");
}

#[test]
fn text_ascii() {
    wphelp()
        .args(["text", "ascii", "café au lait!"])
        .assert()
        .success()
        .stdout("cafaulait!\n");
}

#[test]
fn text_sanitize() {
    wphelp()
        .args(["text", "sanitize", "ab\u{200d}cd"])
        .assert()
        .success()
        .stdout("abcd\n");
}

#[test]
fn text_excerpt() {
    wphelp()
        .args(["text", "excerpt", "--length", "12"])
        .write_stdin("<p>The quick <b>brown</b> fox jumps</p>")
        .assert()
        .success()
        .stdout("The quick\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// size / human / country
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn size_converts_units() {
    wphelp()
        .args(["size", "2M"])
        .assert()
        .success()
        .stdout("2097152\n");
}

#[test]
fn size_unknown_suffix_is_ignored() {
    wphelp()
        .args(["size", "10X"])
        .assert()
        .success()
        .stdout("10\n");
}

#[test]
fn size_invalid_fails() {
    wphelp()
        .args(["size", "ten"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse size"));
}

#[test]
fn human_abbreviates() {
    wphelp()
        .args(["human", "1500"])
        .assert()
        .success()
        .stdout("1.5K\n");
    wphelp()
        .args(["human", "-2000000"])
        .assert()
        .success()
        .stdout("-2M\n");
    wphelp()
        .args(["human", "999"])
        .assert()
        .success()
        .stdout("999\n");
}

#[test]
fn country_codes() {
    wphelp()
        .args(["country", "USA"])
        .assert()
        .success()
        .stdout("US\n");
    wphelp()
        .args(["country", "DE"])
        .assert()
        .success()
        .stdout("DEU\n");
    wphelp()
        .args(["country", "XX"])
        .assert()
        .success()
        .stdout("XX\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// line-items subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn line_items_from_file() {
    let output = wphelp()
        .args(["line-items", "-i", fixture("items.json").as_str()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines: serde_json::Value = serde_json::from_slice(&output).expect("stdout is JSON");
    assert_eq!(lines[0]["name"], "Hoodie &amp; Cap");
    assert_eq!(lines[0]["description"], "SKU: HD-01, Size: Medium, Color: Blue");
    assert_eq!(lines[0]["item_total"], 33.33);
    assert_eq!(lines[1]["item_total"], 19.99);
    assert_eq!(lines[1]["description"], "");
}

#[test]
fn line_items_invalid_input_fails() {
    wphelp()
        .arg("line-items")
        .write_stdin(r#"{"not": "a list"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read order items"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn verbose_logs_to_stderr_only() {
    wphelp()
        .args(["-v", "xml"])
        .env_remove("RUST_LOG")
        .write_stdin(r#"{"tag":["a","b"]}"#)
        .assert()
        .success()
        .stdout("<tag>a</tag><tag>b</tag>")
        .stderr(predicate::str::contains("writing repeated elements"));
}

#[test]
fn help_flag_shows_usage() {
    wphelp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xml"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("line-items"));
}

#[test]
fn unknown_subcommand_fails() {
    wphelp()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}

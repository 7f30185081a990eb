use std::path::Path;

use drawio_rs_generator::{Config, LayoutConfig, RequestHandler, Theme, load_config};
use serde_json::json;

fn handler_in(dir: &Path) -> RequestHandler {
    RequestHandler::new(Config {
        output_dir: dir.to_path_buf(),
        theme: Theme::drawio_default(),
        layout: LayoutConfig::default(),
    })
}

fn read_request(rel: &str) -> serde_json::Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn every_fixture_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_in(dir.path());
    let cases = [
        ("flowchart/basic.json", "basic.drawio"),
        ("sequence/basic.json", "login.drawio"),
        ("erd/basic.json", "shop.drawio"),
        ("network/basic.json", "office.drawio"),
        ("custom/basic.json", "sketch.drawio"),
    ];
    for (rel, expected) in cases {
        let result = handler.handle(&read_request(rel));
        assert!(result.success, "{rel}: {}", result.message);
        let path = result.path.unwrap();
        assert_eq!(path.file_name().unwrap(), expected);
        let xml = std::fs::read_to_string(&path).unwrap();
        roxmltree::Document::parse(&xml).unwrap_or_else(|err| panic!("{rel}: {err}"));
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), cases.len());
}

#[test]
fn second_write_replaces_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_in(dir.path());
    let request = |label: &str| {
        json!({
            "type": "flowchart",
            "filename": "same.drawio",
            "data": {"steps": [{"label": label}]}
        })
    };
    let first = handler.handle(&request("First"));
    let second = handler.handle(&request("Second"));
    assert_eq!(first.path, second.path);
    let xml = std::fs::read_to_string(second.path.unwrap()).unwrap();
    assert!(xml.contains("value=\"Second\""));
    assert!(!xml.contains("value=\"First\""));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn filename_may_name_a_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_in(dir.path());
    let result = handler.handle(&json!({
        "type": "custom",
        "filename": "team/board",
        "data": {"shapes": []}
    }));
    assert!(result.success, "{}", result.message);
    assert!(dir.path().join("team").join("board.drawio").exists());
}

#[test]
fn invalid_data_is_reported_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_in(dir.path());
    let result = handler.handle(&json!({
        "type": "network",
        "filename": "broken",
        "data": {"nodes": [{"label": "no id"}], "connections": []}
    }));
    assert!(!result.success);
    assert!(result.message.starts_with("Invalid network data"));
    assert!(result.path.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn config_file_sets_output_dir_and_theme() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("diagrams");
    let config_path = dir.path().join("drgen.json");
    std::fs::write(
        &config_path,
        json!({
            "theme": "monochrome",
            "outputDir": out,
            "flowchart": {"levelHeight": 200}
        })
        .to_string(),
    )
    .unwrap();

    let config = load_config(Some(&config_path)).unwrap();
    assert_eq!(config.output_dir, out);
    let handler = RequestHandler::new(config);
    let result = handler.handle(&json!({
        "type": "flowchart",
        "filename": "mono",
        "data": {"steps": [{"label": "A"}, {"label": "B"}]}
    }));
    assert!(result.success, "{}", result.message);
    let xml = std::fs::read_to_string(out.join("mono.drawio")).unwrap();
    assert!(xml.contains("fillColor=#ffffff;"));
    assert!(xml.contains("y=\"240\""));
}

#[test]
fn filenames_cannot_leave_the_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let handler = handler_in(&out);
    let absolute = dir.path().join("escaped");
    for filename in [absolute.to_str().unwrap(), "../dotdot", "team/../../up"] {
        let result = handler.handle(&json!({
            "type": "custom",
            "filename": filename,
            "data": {"shapes": []}
        }));
        assert!(!result.success, "{filename} was accepted");
        assert!(result.path.is_none());
        assert!(result.message.starts_with("Invalid filename"), "{}", result.message);
    }
    assert!(!dir.path().join("escaped.drawio").exists());
    assert!(!dir.path().join("dotdot.drawio").exists());
    assert!(!dir.path().join("up.drawio").exists());
    assert!(!out.exists());
}

#[test]
fn unwritable_output_dir_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let request = json!({
        "type": "flowchart",
        "filename": "blocked",
        "data": {"steps": [{"label": "A"}]}
    });

    for output_dir in [blocker.clone(), blocker.join("nested")] {
        let result = handler_in(&output_dir).handle(&request);
        assert!(!result.success);
        assert!(result.path.is_none());
        assert!(result.message.starts_with("I/O error: "), "{}", result.message);
    }

    // Only the blocking file remains: no document and no temp file.
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("blocker")]);
    assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "not a directory");
}

//! Integration tests for the qbc binary.
//!
//! Every test runs with HOME and XDG_CONFIG_HOME pointed at a temp dir so a
//! developer's own config never leaks in.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for running qbc in an isolated environment.
fn qbc(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("qbc").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("xdg"))
        .env_remove("QBC_CONFIG");
    cmd
}

const TRIANGLE: &str = r#"{
    "vertex_config": {
        "vertices": [
            { "id": 0, "x": 0, "y": 0 },
            { "id": 1, "x": 4, "y": 0 },
            { "id": 2, "x": 2, "y": 3 }
        ]
    },
    "character_map": { "A": [0, 1], "B": [1, 2], "C": [2, 0] }
}"#;

// =============================================================================
// normalize / encode / decode
// =============================================================================

#[test]
fn normalize_prints_canonical_text() {
    let temp = TempDir::new().unwrap();
    qbc(temp.path())
        .args(["normalize", "Hello,", "World!", "123"])
        .assert()
        .success()
        .stdout("HELLO WORLD\n");

    qbc(temp.path())
        .args(["normalize", "--strip", "x1y2z"])
        .assert()
        .success()
        .stdout("XYZ\n");
}

#[test]
fn encode_then_decode_json() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("hello.json");

    qbc(temp.path())
        .args(["encode", "Hello", "there"])
        .arg("-o")
        .arg(&pkg)
        .assert()
        .success();

    let json = fs::read_to_string(&pkg).unwrap();
    assert!(json.contains("\"version\": \"1.0\""));
    assert!(json.contains("\"latticeKey\": \"standard\""));

    qbc(temp.path())
        .arg("decode")
        .arg(&pkg)
        .assert()
        .success()
        .stdout("HELLO THERE\n");
}

#[test]
fn encode_rejects_text_without_supported_characters() {
    let temp = TempDir::new().unwrap();
    qbc(temp.path())
        .args(["encode", "123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to encode"));
}

#[test]
fn decode_refuses_png() {
    let temp = TempDir::new().unwrap();
    let png = temp.path().join("glyph.png");
    fs::write(&png, [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0]).unwrap();

    qbc(temp.path())
        .arg("decode")
        .arg(&png)
        .assert()
        .failure()
        .stderr(predicate::str::contains("raster image"));
}

#[test]
fn decode_plain_svg_fails() {
    let temp = TempDir::new().unwrap();
    let svg = temp.path().join("plain.svg");
    fs::write(&svg, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

    qbc(temp.path())
        .arg("decode")
        .arg(&svg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No decodable package"));
}

// =============================================================================
// render
// =============================================================================

#[test]
fn render_embeds_and_decodes() {
    let temp = TempDir::new().unwrap();
    let svg = temp.path().join("hi.svg");

    qbc(temp.path())
        .args(["render", "--rotate", "-90", "--grid", "hi", "you"])
        .arg("-o")
        .arg(&svg)
        .assert()
        .success();

    let markup = fs::read_to_string(&svg).unwrap();
    assert!(markup.starts_with("<svg"));
    assert!(markup.contains("<!--QBC-DATA:"));
    assert!(markup.contains("<line"));

    qbc(temp.path())
        .arg("decode")
        .arg(&svg)
        .assert()
        .success()
        .stdout("HI YOU\n");
}

#[test]
fn render_no_embed_to_stdout() {
    let temp = TempDir::new().unwrap();
    qbc(temp.path())
        .args(["render", "--no-embed", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<path d=\"M "))
        .stdout(predicate::str::contains("QBC-DATA").not());
}

#[test]
fn render_rejects_non_finite_rotation() {
    let temp = TempDir::new().unwrap();
    for value in ["nan", "inf"] {
        qbc(temp.path())
            .args(["render", "--rotate", value, "hello"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("finite"))
            .stdout(predicate::str::is_empty());
    }
}

#[test]
fn render_exports_png() {
    let temp = TempDir::new().unwrap();
    let svg = temp.path().join("glyph.svg");
    let png = temp.path().join("glyph.png");

    qbc(temp.path())
        .args(["render", "glyph", "--raster-size", "64"])
        .arg("-o")
        .arg(&svg)
        .arg("--png")
        .arg(&png)
        .assert()
        .success();

    let bytes = fs::read(&png).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn config_disables_embedding() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("qbc.toml");
    fs::write(&config, "[render]\nembed = false\n").unwrap();

    qbc(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["render", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("QBC-DATA").not());
}

#[test]
fn unknown_config_key_is_an_error() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("qbc.toml");
    fs::write(&config, "colour = \"red\"\n").unwrap();

    qbc(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["normalize", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

// =============================================================================
// lattice
// =============================================================================

#[test]
fn lattice_show_lists_anchors() {
    let temp = TempDir::new().unwrap();
    qbc(temp.path())
        .args(["lattice", "show", "--anchors", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SPACE"))
        .stdout(predicate::str::contains("    A  "));
}

#[test]
fn external_lattice_import_and_use() {
    let temp = TempDir::new().unwrap();
    let external = temp.path().join("tri.json");
    let imported = temp.path().join("imported.json");
    fs::write(&external, TRIANGLE).unwrap();

    qbc(temp.path())
        .args(["lattice", "validate", "--external"])
        .arg(&external)
        .assert()
        .success()
        .stderr(predicate::str::contains("valid external lattice"));

    qbc(temp.path())
        .args(["lattice", "import", "--key", "tri", "--lattice-version", "2"])
        .arg(&external)
        .arg("-o")
        .arg(&imported)
        .assert()
        .success();

    qbc(temp.path())
        .args(["lattice", "validate"])
        .arg(&imported)
        .assert()
        .success()
        .stderr(predicate::str::contains("tri@2"));

    let pkg = temp.path().join("cab.json");
    qbc(temp.path())
        .arg("encode")
        .arg("--external")
        .arg(&external)
        .args(["cab", "-o"])
        .arg(&pkg)
        .assert()
        .success();
    let json = fs::read_to_string(&pkg).unwrap();
    assert!(json.contains("\"latticeKey\": \"tri\""));

    qbc(temp.path())
        .arg("decode")
        .arg(&pkg)
        .assert()
        .success()
        .stdout("CAB\n");
}

#[test]
fn decode_checks_lattice_identity() {
    let temp = TempDir::new().unwrap();
    let external = temp.path().join("tri.json");
    let imported = temp.path().join("imported.json");
    let pkg = temp.path().join("abc.json");
    fs::write(&external, TRIANGLE).unwrap();

    qbc(temp.path())
        .args(["lattice", "import", "--key", "tri"])
        .arg(&external)
        .arg("-o")
        .arg(&imported)
        .assert()
        .success();

    qbc(temp.path())
        .args(["encode", "abc", "-o"])
        .arg(&pkg)
        .assert()
        .success();

    qbc(temp.path())
        .arg("decode")
        .arg(&pkg)
        .arg("--lattice")
        .arg(&imported)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match"));
}

// =============================================================================
// config / completion
// =============================================================================

#[test]
fn config_init_then_path() {
    let temp = TempDir::new().unwrap();

    qbc(temp.path()).args(["config", "init"]).assert().success();
    assert!(temp.path().join(".qbc/config.toml").exists());

    qbc(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".qbc/config.toml"));

    qbc(temp.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn config_show_prints_effective_values() {
    let temp = TempDir::new().unwrap();
    qbc(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[render]"))
        .stdout(predicate::str::contains("embed = true"));
}

#[test]
fn completion_generates_script() {
    let temp = TempDir::new().unwrap();
    qbc(temp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("qbc"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn definitions() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("resources");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("songs.yaml"),
        r#"
name: songs
fields:
  - name: ID
    type: { kind: id, as_big_int: true }
  - name: Theme Song
    type: { kind: audio, preload: auto }
  - name: Credits
    type: { kind: line, as_small: true }
"#,
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("song.json"),
        r#"{"id": 12, "theme_song": "songs/intro.mp3"}"#,
    )
    .unwrap();
    tmp
}

fn fieldset() -> Command {
    let mut cmd = Command::cargo_bin("fieldset").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn render_prints_wire_json() {
    let tmp = definitions();
    fieldset()
        .arg("--definitions")
        .arg(tmp.path())
        .args(["render", "--resource", "songs", "--view", "index", "--record"])
        .arg(tmp.path().join("song.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"audio-field\""))
        .stdout(predicate::str::contains("\"preload\": \"auto\""))
        .stdout(predicate::str::contains("\"value\": \"12\""))
        .stdout(predicate::str::contains("\"value\": \"Credits\""));
}

#[test]
fn fill_skips_id_and_line() {
    let tmp = definitions();
    let request = tmp.path().join("request.json");
    std::fs::write(
        &request,
        r#"{"id": 1, "credits": "x", "theme_song": "songs/outro.mp3"}"#,
    )
    .unwrap();

    fieldset()
        .arg("--definitions")
        .arg(tmp.path())
        .args(["fill", "--resource", "songs", "--request"])
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("songs/outro.mp3"))
        .stdout(predicate::str::contains("credits").not())
        .stdout(predicate::str::contains("\"id\"").not());
}

#[test]
fn missing_resource_exits_with_error() {
    let tmp = definitions();
    fieldset()
        .arg("--definitions")
        .arg(tmp.path())
        .args(["render", "--resource", "albums", "--record"])
        .arg(tmp.path().join("song.json"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("albums"));
}

#[test]
fn missing_definitions_directory_exits_with_error() {
    let tmp = TempDir::new().unwrap();
    fieldset()
        .arg("--definitions")
        .arg(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("definitions directory not found"));
}

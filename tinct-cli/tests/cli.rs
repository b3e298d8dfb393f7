use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture_path(kind: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(kind)
        .join(name)
}

fn grammar(name: &str) -> PathBuf {
    fixture_path("grammars", name)
}

#[test]
fn highlights_source_as_html_by_default() {
    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg(fixture_path("sources", "sample.mini"))
        .arg("--grammar")
        .arg(grammar("clike.yaml"))
        .arg("--grammar")
        .arg(grammar("mini.yaml"));

    let output = predicate::str::contains(r#"<span class="token comment">// greet</span>"#)
        .and(predicate::str::contains(r#"<span class="token keyword">let</span>"#))
        .and(predicate::str::contains(
            r#"<span class="token interpolation-punctuation punctuation">${</span>"#,
        ));

    cmd.assert().success().stdout(output);
}

#[test]
fn text_format_reproduces_source() {
    let source_path = fixture_path("sources", "sample.mini");
    let source = std::fs::read_to_string(&source_path).unwrap();

    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg(&source_path)
        .args(["-g"])
        .arg(grammar("clike.yaml"))
        .args(["-g"])
        .arg(grammar("mini.yaml"))
        .args(["--format", "text"]);

    cmd.assert().success().stdout(source);
}

#[test]
fn tree_format_with_explicit_language() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("input.txt");
    std::fs::write(&source, "ab12cd").unwrap();

    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg(&source)
        .arg("--grammar")
        .arg(grammar("numbers.json"))
        .args(["--language", "numbers", "--format", "tree"]);

    cmd.assert()
        .success()
        .stdout("word \"ab\"\nnumber \"12\"\nword \"cd\"\n");
}

#[test]
fn config_file_changes_html_element() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("input.txt");
    std::fs::write(&source, "7").unwrap();
    let config = dir.path().join("tinct.toml");
    std::fs::write(&config, "[html]\ntag = \"code\"\ntoken_class = \"tk\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg(&source)
        .arg("--grammar")
        .arg(grammar("numbers.json"))
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(r#"<code class="tk number">7</code>"#);
}

#[test]
fn lists_formats() {
    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg("--list-formats");

    cmd.assert().success().stdout(
        predicate::str::contains("html - ")
            .and(predicate::str::contains("json - "))
            .and(predicate::str::contains("tree - "))
            .and(predicate::str::contains("text - ")),
    );
}

#[test]
fn lists_languages_with_aliases() {
    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg("--list-languages")
        .arg("--grammar")
        .arg(grammar("markup.yaml"));

    cmd.assert()
        .success()
        .stdout("markup [html, xml]\n");
}

#[test]
fn unknown_language_fails() {
    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg(fixture_path("sources", "sample.mini"))
        .arg("--grammar")
        .arg(grammar("clike.yaml"))
        .args(["--language", "cobol"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No grammar registered for language 'cobol'"));
}

#[test]
fn missing_base_grammar_fails() {
    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg(fixture_path("sources", "sample.mini"))
        .arg("--grammar")
        .arg(grammar("mini.yaml"));

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown grammar 'clike'"));
}

#[test]
fn unknown_format_fails() {
    let mut cmd = cargo_bin_cmd!("tinct");
    cmd.arg(fixture_path("sources", "sample.mini"))
        .arg("--grammar")
        .arg(grammar("clike.yaml"))
        .args(["--format", "pdf"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Available formats: html, json, text, tree"));
}

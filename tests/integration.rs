use std::path::Path;
use std::process::Command;

const STRUCT_PAGE: &str = r#"<!DOCTYPE html><html><head><meta charset="utf-8"></head><body>
<h1 class="fqn"><span class="in-band">Struct <a href="index.html">pub_sub</a>::<a class="struct" href="">Sender</a></span>
<span class="out-of-band"><a class="srclink" href="../src/pub_sub/lib.rs.html#84-86" title="goto source code">[src]</a></span></h1>
<h4 id="method.send" class="method"><code>fn send(&self)</code><a class="srclink" href="../src/pub_sub/lib.rs.html#98" title="goto source code">[src]</a></h4>
<h4 class="method"><code>fn clone(&self)</code><a class="srclink" href="../src/core/clone.rs.html#108" title="goto source code">[src]</a></h4>
</body></html>
"#;

fn srclink_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_srclink"));
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_doc_tree(dir: &Path) {
    std::fs::create_dir_all(dir.join("doc/pub_sub")).unwrap();
    std::fs::write(dir.join("doc/pub_sub/struct.Sender.html"), STRUCT_PAGE).unwrap();
}

const GITLAB_FLAGS: [&str; 6] = [
    "--label",
    "GitLab",
    "--base-url",
    "https://gitlab.com/creato/pub-sub/blob/master/",
    "--root-marker",
    "pub_sub",
];

#[test]
fn inject_links_project_sources_only() {
    let dir = tempfile::tempdir().unwrap();
    write_doc_tree(dir.path());

    let out = srclink_cmd(dir.path()).args(["inject", "doc"]).args(GITLAB_FLAGS).output().unwrap();
    assert!(out.status.success(), "inject failed: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("LINKED  pub_sub/struct.Sender.html (1)"), "stdout: {stdout}");
    assert!(stdout.contains("Inserted 1 permalinks into 1 of 1 pages (2 skipped, 0 already linked)"));

    let page = std::fs::read_to_string(dir.path().join("doc/pub_sub/struct.Sender.html")).unwrap();
    assert!(page.contains(
        "<a class=\"srclink-permalink\" href=\"https://gitlab.com/creato/pub-sub/blob/master/lib.rs#L98\" \
         style=\"margin-right: 0.5em\">[src on GitLab]</a><a class=\"srclink\" href=\"../src/pub_sub/lib.rs.html#98\""
    ));
    // Line ranges and dependency sources get no permalink.
    assert_eq!(page.matches("srclink-permalink").count(), 1);
}

#[test]
fn inject_twice_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    write_doc_tree(dir.path());

    let first = srclink_cmd(dir.path()).args(["inject", "doc"]).args(GITLAB_FLAGS).output().unwrap();
    assert!(first.status.success());
    let once = std::fs::read_to_string(dir.path().join("doc/pub_sub/struct.Sender.html")).unwrap();

    let second = srclink_cmd(dir.path()).args(["inject", "doc"]).args(GITLAB_FLAGS).output().unwrap();
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("Inserted 0 permalinks into 0 of 1 pages (2 skipped, 1 already linked)"));

    let twice = std::fs::read_to_string(dir.path().join("doc/pub_sub/struct.Sender.html")).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn init_then_inject_uses_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_doc_tree(dir.path());

    let init = srclink_cmd(dir.path())
        .args([
            "init",
            "--label",
            "GitHub",
            "--base-url",
            "https://github.com/creato/pub-sub/blob/main/src/",
            "--root-marker",
            "pub_sub",
        ])
        .output()
        .unwrap();
    assert!(init.status.success(), "init failed: {}", String::from_utf8_lossy(&init.stderr));
    assert!(dir.path().join(".srclink.toml").exists());

    let out = srclink_cmd(dir.path())
        .args(["inject", "doc", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success(), "inject failed: {}", String::from_utf8_lossy(&out.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["report"]["inserted"], 1);
    assert_eq!(summary["pages"], 1);
    assert_eq!(summary["changed"][0]["path"], "pub_sub/struct.Sender.html");

    let page = std::fs::read_to_string(dir.path().join("doc/pub_sub/struct.Sender.html")).unwrap();
    assert!(page.contains("https://github.com/creato/pub-sub/blob/main/src/lib.rs#L98"));
    assert!(page.contains("[src on GitHub]"));
}

#[test]
fn dry_run_leaves_pages_alone() {
    let dir = tempfile::tempdir().unwrap();
    write_doc_tree(dir.path());

    let out = srclink_cmd(dir.path())
        .args(["inject", "doc", "--dry-run"])
        .args(GITLAB_FLAGS)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Would insert 1 permalinks"));

    let page = std::fs::read_to_string(dir.path().join("doc/pub_sub/struct.Sender.html")).unwrap();
    assert_eq!(page, STRUCT_PAGE);
}

#[test]
fn resolve_prints_permalink() {
    let dir = tempfile::tempdir().unwrap();

    let out = srclink_cmd(dir.path())
        .args(["resolve", "../src/pub_sub/lib.rs.html#42"])
        .args(GITLAB_FLAGS)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "[src on GitLab]  https://gitlab.com/creato/pub-sub/blob/master/lib.rs#L42"
    );
}

#[test]
fn resolve_dependency_is_not_applicable() {
    let dir = tempfile::tempdir().unwrap();

    let out = srclink_cmd(dir.path())
        .args(["resolve", "../src/some_dependency/other.rs.html#7"])
        .args(GITLAB_FLAGS)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("not applicable"));
}

#[test]
fn missing_config_fails_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    write_doc_tree(dir.path());

    let out = srclink_cmd(dir.path()).args(["inject", "doc", "--label", "GitLab"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Missing Config"), "stderr: {stderr}");
}

#[test]
fn missing_doc_dir_fails() {
    let dir = tempfile::tempdir().unwrap();

    let out = srclink_cmd(dir.path()).args(["inject", "nope"]).args(GITLAB_FLAGS).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Documentation Not Found"));
}

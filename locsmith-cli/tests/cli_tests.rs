use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn locsmith_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("locsmith"))
}

const REFERENCE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name" translatable="false">Contacts</string>
    <string name="add_contact">Add contact</string>
    <string name="delete_confirm">Delete %s from %s?</string>
</resources>
"#;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn res_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("values/strings.xml"), REFERENCE);
    write(
        &dir.path().join("values-br/strings.xml"),
        r#"<resources><string name="add_contact">Ouzhpennañ</string></resources>"#,
    );
    dir
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_missing_lists_reference_entries() {
    let dir = res_tree();
    let output = locsmith_cmd()
        .args(["missing", "--reference"])
        .arg(dir.path().join("values/strings.xml"))
        .arg("--target")
        .arg(dir.path().join("values-br/strings.xml"))
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let keys: Vec<_> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["app_name", "delete_confirm"]);
}

#[test]
fn test_missing_with_absent_target_lists_everything() {
    let dir = res_tree();
    let output = locsmith_cmd()
        .args(["missing", "-r"])
        .arg(dir.path().join("values/strings.xml"))
        .arg("-t")
        .arg(dir.path().join("values-xx/strings.xml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("missing=3"));
}

#[test]
fn test_missing_fails_on_unknown_reference() {
    let output = locsmith_cmd()
        .args(["missing", "-r", "/nonexistent/strings.xml", "-t", "x.xml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_merge_keeps_existing_values() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base.xml");
    let new = dir.path().join("new.json");
    let out = dir.path().join("out/strings.xml");
    write(&base, r#"<resources><string name="a">old</string></resources>"#);
    write(
        &new,
        r#"[{"key": "a", "text": "new"}, {"key": "b", "text": "b-val"}]"#,
    );

    let output = locsmith_cmd()
        .args(["merge", "--base"])
        .arg(&base)
        .arg("--new")
        .arg(&new)
        .arg("--output")
        .arg(&out)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let merged = fs::read_to_string(&out).unwrap();
    assert!(merged.contains(r#"<string name="a">old</string>"#));
    assert!(merged.contains(r#"<string name="b">b-val</string>"#));
}

#[test]
fn test_normalize_check_then_fix() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("values-fr/strings.xml");
    write(
        &file,
        r#"<resources><string name="a">L\\'appli de %s et %s</string></resources>"#,
    );

    let check = locsmith_cmd()
        .args(["normalize", "--check", "-i"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(!check.status.success());

    let fix = locsmith_cmd()
        .args(["normalize", "-i"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(fix.status.success());
    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains(r"L\'appli de %1$s et %2$s"));

    let recheck = locsmith_cmd()
        .args(["normalize", "--check", "-i"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(recheck.status.success());
}

#[test]
fn test_normalize_entity_policy_with_glob() {
    let dir = TempDir::new().unwrap();
    for locale in ["fr", "de"] {
        write(
            &dir.path().join(format!("values-{}/strings.xml", locale)),
            r#"<resources><string name="a">It\'s</string></resources>"#,
        );
    }
    let pattern = format!("{}/values-*/strings.xml", dir.path().display());
    let output = locsmith_cmd()
        .args(["normalize", "--policy", "entity", "-i", &pattern])
        .output()
        .unwrap();
    assert!(output.status.success());
    for locale in ["fr", "de"] {
        let content =
            fs::read_to_string(dir.path().join(format!("values-{}/strings.xml", locale))).unwrap();
        assert!(content.contains("It&amp;#39;s"), "{}", content);
    }
}

#[test]
fn test_audit_reports_issues() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("strings.xml");
    write(
        &file,
        r#"<resources><string name="ok">Fine</string><string name="bad">It's</string></resources>"#,
    );
    let output = locsmith_cmd()
        .args(["audit", "--json", "-i"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let issues = report[0]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["key"], "bad");
}

#[test]
fn test_transliterate_to_adlam() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("values-b+ff+Latn/strings.xml");
    let out = dir.path().join("values-b+ff+Adlm/strings.xml");
    write(
        &input,
        r#"<resources><string name="a">%1$s a</string></resources>"#,
    );
    let output = locsmith_cmd()
        .args(["transliterate", "--script", "Latn-Adlm", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("%1$s \u{1E922}"), "{}", content);
}

#[test]
fn test_transliterate_unknown_script_without_map_fails() {
    let dir = res_tree();
    let output = locsmith_cmd()
        .args(["transliterate", "--script", "Latn-Cyrl", "-i"])
        .arg(dir.path().join("values/strings.xml"))
        .arg("-o")
        .arg(dir.path().join("out.xml"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_verify_and_reconcile() {
    let dir = res_tree();
    let verify = locsmith_cmd()
        .args(["verify", "--res"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(!verify.status.success());
    assert!(stdout(&verify).contains("br: 1 missing (delete_confirm)"));

    let dry = locsmith_cmd()
        .args(["reconcile", "--dry-run", "--res"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(dry.status.success());
    assert!(stdout(&dry).contains("(dry run)"));

    let config = dir.path().join("locsmith.toml");
    write(
        &config,
        "translator = { kind = \"copy\" }\nskip_placeholder_strings = true\n",
    );
    let reconcile = locsmith_cmd()
        .args(["reconcile", "--res"])
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(
        reconcile.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&reconcile.stderr)
    );
    let br = fs::read_to_string(dir.path().join("values-br/strings.xml")).unwrap();
    assert!(br.contains(r#"<string name="delete_confirm">Delete %1$s from %2$s?</string>"#));
    assert!(!br.contains("app_name"));

    let verify = locsmith_cmd()
        .args(["verify", "--res"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(verify.status.success());
}

#[test]
fn test_reconcile_without_res_fails() {
    let dir = TempDir::new().unwrap();
    let output = locsmith_cmd()
        .current_dir(dir.path())
        .arg("reconcile")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No res directory"));
}

#[test]
fn test_reconcile_resolves_reference_next_to_config() {
    let dir = res_tree();
    let config = dir.path().join("locsmith.toml");
    write(
        &config,
        "reference = \"values/strings.xml\"\ntranslator = { kind = \"copy\" }\n",
    );
    let elsewhere = TempDir::new().unwrap();
    let output = locsmith_cmd()
        .current_dir(elsewhere.path())
        .arg("reconcile")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let br = fs::read_to_string(dir.path().join("values-br/strings.xml")).unwrap();
    assert!(br.contains("delete_confirm"), "{}", br);
}

#[test]
fn test_normalize_keeps_plurals_and_inline_markup() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("values-fr/strings.xml");
    write(
        &file,
        r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <!-- Onboarding -->
    <string name="tap">Appuyez <b>ici</b></string>
    <string name="fix">L\\'appli</string>
    <plurals name="files">
        <item quantity="one">%d fichier</item>
        <item quantity="other">%d fichiers</item>
    </plurals>
    <string-array name="sizes">
        <item>Petit</item>
    </string-array>
</resources>
"#,
    );

    let output = locsmith_cmd()
        .args(["normalize", "-i"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let content = fs::read_to_string(&file).unwrap();
    assert_eq!(
        content,
        r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <!-- Onboarding -->
    <string name="tap">Appuyez <b>ici</b></string>
    <string name="fix">L\'appli</string>
    <plurals name="files">
        <item quantity="one">%d fichier</item>
        <item quantity="other">%d fichiers</item>
    </plurals>
    <string-array name="sizes">
        <item>Petit</item>
    </string-array>
</resources>
"#
    );
}

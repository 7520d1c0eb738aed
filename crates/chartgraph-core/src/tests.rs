use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use semver::Version;

use super::*;

fn temp_chart_dir(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("chartgraph-core-{label}-{suffix}"));
    fs::create_dir_all(&dir).expect("must create temp chart dir");
    dir
}

#[test]
fn parse_manifest() {
    let content = r#"
name: gateway
type: application
version: 1.4.0
description: Edge gateway chart
dependencies:
  - name: auth
    version: 0.3.1
    repository: https://charts.example.test
  - name: cache
    version: 2.0.0
    alias: redis
    condition: cache.enabled
"#;

    let parsed = ChartManifest::from_yaml_str(content, Path::new("charts/gateway/Chart.yaml"))
        .expect("manifest should parse");
    assert_eq!(parsed.name, "gateway");
    assert_eq!(parsed.kind, "application");
    assert_eq!(parsed.version, "1.4.0");
    assert_eq!(parsed.path, Path::new("charts/gateway"));
    assert_eq!(parsed.dependencies.len(), 2);
    assert_eq!(parsed.dependencies[0].name, "auth");
    assert_eq!(parsed.dependencies[0].version.as_deref(), Some("0.3.1"));
    assert!(parsed.dependencies[0].extra.contains_key("repository"));
    assert_eq!(parsed.dependencies[1].alias.as_deref(), Some("redis"));
    assert_eq!(
        parsed.dependencies[1].condition.as_deref(),
        Some("cache.enabled")
    );
}

#[test]
fn missing_name_falls_back_to_directory_name() {
    let parsed = ChartManifest::from_yaml_str(
        "version: 0.1.0\n",
        Path::new("charts/metrics/Chart.yaml"),
    )
    .expect("manifest should parse");
    assert_eq!(parsed.name, "metrics");
    assert_eq!(parsed.kind, "application");
}

#[test]
fn null_dependencies_parse_as_empty() {
    let parsed = ChartManifest::from_yaml_str(
        "name: solo\nversion: 0.1.0\ndependencies:\n",
        Path::new("charts/solo/Chart.yaml"),
    )
    .expect("manifest should parse");
    assert!(parsed.dependencies.is_empty());
}

#[test]
fn malformed_manifest_is_an_error() {
    let err = ChartManifest::from_yaml_str("name: [broken", Path::new("charts/bad/Chart.yaml"))
        .expect_err("malformed yaml should fail");
    assert!(err.to_string().contains("charts/bad/Chart.yaml"));
}

#[test]
fn effective_child_prefers_alias_and_drops_blanks() {
    let mut dependency = ChartDependency {
        name: "cache".to_string(),
        version: Some("1.0.0".to_string()),
        alias: None,
        condition: None,
        extra: serde_yaml::Mapping::new(),
    };
    assert_eq!(dependency.effective_child(), Some("cache"));

    dependency.alias = Some("redis".to_string());
    assert_eq!(dependency.effective_child(), Some("redis"));

    dependency.alias = Some("   ".to_string());
    assert_eq!(dependency.effective_child(), None);

    dependency.alias = None;
    dependency.name = "".to_string();
    assert_eq!(dependency.effective_child(), None);
}

#[test]
fn save_preserves_unmanaged_fields() {
    let dir = temp_chart_dir("save");
    let manifest_path = dir.join(MANIFEST_FILE_NAME);
    fs::write(
        &manifest_path,
        "name: web\nversion: 1.0.0\nicon: https://example.test/icon.png\nappVersion: \"9.9\"\ndependencies:\n  - name: auth\n    version: 0.1.0\n    repository: https://charts.example.test\n",
    )
    .expect("must write fixture manifest");

    let mut manifest = ChartManifest::load(&manifest_path).expect("manifest should load");
    manifest.version = "1.0.1".to_string();
    manifest.save().expect("manifest should save");

    let rewritten = fs::read_to_string(&manifest_path).expect("must read rewritten manifest");
    assert!(rewritten.contains("icon: https://example.test/icon.png"));
    assert!(rewritten.contains("appVersion: '9.9'") || rewritten.contains("appVersion: \"9.9\""));
    assert!(rewritten.contains("version: 1.0.1"));
    assert!(rewritten.contains("repository: https://charts.example.test"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn reload_after_save_reproduces_the_record() {
    let dir = temp_chart_dir("roundtrip");
    let manifest_path = dir.join(MANIFEST_FILE_NAME);
    fs::write(
        &manifest_path,
        "name: web\ntype: application\nversion: 1.0.0\ndependencies:\n  - name: auth\n    version: 0.1.0\n",
    )
    .expect("must write fixture manifest");

    let manifest = ChartManifest::load(&manifest_path).expect("manifest should load");
    manifest.save().expect("manifest should save");
    let reloaded = ChartManifest::load(&manifest_path).expect("manifest should reload");
    assert_eq!(manifest, reloaded);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bump_part_applies_semver_semantics() {
    let version = Version::parse("1.4.9").expect("valid version");
    assert_eq!(BumpPart::Major.apply(&version), Version::new(2, 0, 0));
    assert_eq!(BumpPart::Minor.apply(&version), Version::new(1, 5, 0));
    assert_eq!(BumpPart::Patch.apply(&version), Version::new(1, 4, 10));

    let prerelease = Version::parse("2.0.0-rc.1").expect("valid version");
    assert_eq!(BumpPart::Patch.apply(&prerelease), Version::new(2, 0, 1));
}

#[test]
fn bump_part_rejects_unknown_values() {
    assert_eq!("major".parse::<BumpPart>().expect("valid part"), BumpPart::Major);
    let err = "majour".parse::<BumpPart>().expect_err("unknown part should fail");
    assert!(err.to_string().contains("majour"));
}

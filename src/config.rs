use crate::error::{Result, ScoreError};
use crate::rubric::{self, RuleTable};
use crate::types::config::RubricConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/eligibility-score/config.toml";

fn global_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE))
}

/// Loads the rubric revision from the global file and `explicit`, the latter
/// taking precedence. `None` when neither exists.
pub fn load_config(explicit: Option<&Path>) -> Result<Option<RubricConfig>> {
    load_config_with_global(explicit, global_config_path().as_deref())
}

pub(crate) fn load_config_with_global(
    explicit: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<Option<RubricConfig>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ScoreError::PathNotFound(path.display().to_string()));
        }
    }

    let mut merged = Value::Table(Map::new());
    let mut found = false;
    for path in global_path.into_iter().chain(explicit) {
        found |= merge_file_if_exists(&mut merged, path)?;
    }
    if !found {
        return Ok(None);
    }

    let cfg: RubricConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| {
            ScoreError::ConfigParse(format!("merged rubric config: {e}"))
        })?;
    cfg.validate()?;
    Ok(Some(cfg))
}

/// The effective rubric: the standard table with any configured revision
/// applied.
pub fn load_rubric(explicit: Option<&Path>) -> Result<RuleTable> {
    resolve_rubric(load_config(explicit)?)
}

pub(crate) fn resolve_rubric(cfg: Option<RubricConfig>) -> Result<RuleTable> {
    match cfg {
        Some(cfg) => cfg.apply(rubric::standard()),
        None => Ok(rubric::standard().clone()),
    }
}

/// Parses and validates a single rubric file without any layering.
pub fn check_file(path: &Path) -> Result<RuleTable> {
    if !path.exists() {
        return Err(ScoreError::PathNotFound(path.display().to_string()));
    }
    let cfg: RubricConfig = read_toml_value(path)?
        .try_into()
        .map_err(|e: toml::de::Error| {
            ScoreError::ConfigParse(format!("rubric config {}: {}", path.display(), e))
        })?;
    cfg.apply(rubric::standard())
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    debug!(path = %path.display(), "merging rubric config");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(true)
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        ScoreError::ConfigParse(format!("rubric config {}: {}", path.display(), e))
    })
}

/// Overlays `revision` onto `base`: tables merge key by key, any other
/// value in `revision` replaces the one in `base`.
fn merge_toml(base: &mut Value, revision: Value) {
    let Value::Table(revision_table) = revision else {
        *base = revision;
        return;
    };
    let Value::Table(base_table) = base else {
        *base = Value::Table(revision_table);
        return;
    };
    for (key, value) in revision_table {
        match base_table.get_mut(&key) {
            Some(existing) => merge_toml(existing, value),
            None => {
                base_table.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldKey, Section};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_returns_none_without_files() {
        let dir = TempDir::new().expect("temp dir should be created");
        let missing_global = dir.path().join("config.toml");
        let cfg = load_config_with_global(None, Some(&missing_global))
            .expect("load should not fail");
        assert!(cfg.is_none());
        let table = resolve_rubric(cfg).expect("standard rubric");
        assert_eq!(&table, rubric::standard());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = load_config_with_global(Some(&dir.path().join("absent.toml")), None)
            .expect_err("missing explicit file should fail");
        assert!(matches!(err, ScoreError::PathNotFound(_)));
    }

    #[test]
    fn load_config_merges_global_then_explicit() {
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");
        fs::write(
            &global_path,
            r#"
[rubric]
version = "global"

[points]
largeFamily = 6

[policy.caps]
living = 25
total = 120
"#,
        )
        .expect("global config should write");

        let local_root = TempDir::new().expect("local temp dir should be created");
        let explicit = local_root.path().join("rubric.toml");
        fs::write(
            &explicit,
            r#"
[rubric]
version = "faculty"

[policy.caps]
living = 30
"#,
        )
        .expect("explicit config should write");

        let cfg = load_config_with_global(Some(&explicit), Some(&global_path))
            .expect("load should succeed")
            .expect("merged config should exist");
        let table = resolve_rubric(Some(cfg)).expect("apply should succeed");

        assert_eq!(table.version(), "faculty");
        assert_eq!(table.points_for_flag(FieldKey::LargeFamily).expect("flag"), 6);
        assert_eq!(table.policy().caps.get(Section::Living), Some(30));
        assert_eq!(table.policy().caps.total(), Some(120));
    }

    #[test]
    fn invalid_merged_config_is_rejected() {
        let dir = TempDir::new().expect("temp dir should be created");
        let explicit = dir.path().join("rubric.toml");
        fs::write(&explicit, "[points]\nnotAFlag = 3\n").expect("config should write");
        let err = load_config_with_global(Some(&explicit), None)
            .expect_err("unknown point key should fail");
        assert!(err.is_config_error());
    }

    #[test]
    fn merge_replaces_scalars_and_arrays_but_merges_tables() {
        let mut base: Value = toml::from_str(
            r#"
[policy]
exclusivity = [["orphanUnder25", "halfOrphanUnder25"]]

[policy.caps]
living = 25
"#,
        )
        .expect("base should parse");
        let revision: Value = toml::from_str(
            r#"
[policy]
exclusivity = [["orphanOver25", "halfOrphanOver25"]]

[policy.caps]
income = 40
"#,
        )
        .expect("revision should parse");

        merge_toml(&mut base, revision);
        let cfg: RubricConfig = base.try_into().expect("merged config should deserialize");
        let policy = cfg.policy.expect("policy should survive merge");
        assert_eq!(
            policy.exclusivity,
            vec![vec!["orphanOver25".to_string(), "halfOrphanOver25".to_string()]]
        );
        let caps = policy.caps.expect("caps should survive merge");
        assert_eq!((caps.living, caps.income), (Some(25), Some(40)));
    }

    #[test]
    fn check_file_reports_parse_errors_with_path() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[points\n").expect("config should write");
        let err = check_file(&path).expect_err("broken toml should fail");
        let message = err.to_string();
        assert!(message.contains("rubric config"));
        assert!(message.contains("broken.toml"));
    }
}

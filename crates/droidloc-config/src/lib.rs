use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DroidLocConfig {
    pub module_root: Option<String>,
    pub module_name: Option<String>,
    pub export: Option<ExportCfg>,
    pub translate: Option<TranslateCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportCfg {
    pub out_dir: Option<String>,
    /// "csv" or "xlsx".
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateCfg {
    pub project_id: Option<String>,
    pub location: Option<String>,
    pub api_key: Option<String>,
    pub backup: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

pub fn load_config() -> Result<DroidLocConfig, ConfigError> {
    // Search order: CWD/droidloc.toml, then <config-dir>/droidloc/droidloc.toml.
    let mut merged = DroidLocConfig::default();
    if let Ok(p) = std::env::current_dir() {
        merged = merge_file(merged, &p.join("droidloc.toml"))?;
    }
    if let Some(base) = dirs::config_dir() {
        merged = merge_file(merged, &base.join("droidloc").join("droidloc.toml"))?;
    }
    Ok(merged)
}

/// A missing file is skipped; a file that exists but does not parse is an
/// error naming the offending path.
fn merge_file(
    acc: DroidLocConfig,
    path: &std::path::Path,
) -> Result<DroidLocConfig, ConfigError> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return Ok(acc);
    };
    let cfg: DroidLocConfig = toml::from_str(&raw)
        .map_err(|e| ConfigError::Other(format!("{}: {e}", path.display())))?;
    Ok(merge(acc, cfg))
}

fn merge(mut a: DroidLocConfig, b: DroidLocConfig) -> DroidLocConfig {
    if a.module_root.is_none() {
        a.module_root = b.module_root;
    }
    if a.module_name.is_none() {
        a.module_name = b.module_name;
    }
    a.export = merge_opt(a.export, b.export, merge_export);
    a.translate = merge_opt(a.translate, b.translate, merge_translate);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_export(mut a: ExportCfg, b: ExportCfg) -> ExportCfg {
    if a.out_dir.is_none() {
        a.out_dir = b.out_dir;
    }
    if a.format.is_none() {
        a.format = b.format;
    }
    a
}

fn merge_translate(mut a: TranslateCfg, b: TranslateCfg) -> TranslateCfg {
    if a.project_id.is_none() {
        a.project_id = b.project_id;
    }
    if a.location.is_none() {
        a.location = b.location;
    }
    if a.api_key.is_none() {
        a.api_key = b.api_key;
    }
    if a.backup.is_none() {
        a.backup = b.backup;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_sections_deserialize() {
        let cfg: DroidLocConfig = toml::from_str(
            r#"
module_root = "app"
[export]
format = "xlsx"
[translate]
project_id = "my-proj"
backup = true
"#,
        )
        .unwrap();
        assert_eq!(cfg.module_root.as_deref(), Some("app"));
        assert_eq!(cfg.export.unwrap().format.as_deref(), Some("xlsx"));
        let tr = cfg.translate.unwrap();
        assert_eq!(tr.project_id.as_deref(), Some("my-proj"));
        assert_eq!(tr.backup, Some(true));
    }

    #[test]
    fn merge_keeps_first_value() {
        let near: DroidLocConfig = toml::from_str("module_root = \"near\"").unwrap();
        let far: DroidLocConfig = toml::from_str(
            "module_root = \"far\"\nmodule_name = \"Far\"\n[export]\nout_dir = \"exports\"",
        )
        .unwrap();
        let merged = merge(near, far);
        assert_eq!(merged.module_root.as_deref(), Some("near"));
        assert_eq!(merged.module_name.as_deref(), Some("Far"));
        assert_eq!(merged.export.unwrap().out_dir.as_deref(), Some("exports"));
    }

    #[test]
    fn section_fields_merge_individually() {
        let near: DroidLocConfig = toml::from_str("[translate]\nproject_id = \"p1\"").unwrap();
        let far: DroidLocConfig =
            toml::from_str("[translate]\nproject_id = \"p2\"\nlocation = \"global\"").unwrap();
        let merged = merge(near, far);
        let tr = merged.translate.unwrap();
        assert_eq!(tr.project_id.as_deref(), Some("p1"));
        assert_eq!(tr.location.as_deref(), Some("global"));
    }
}

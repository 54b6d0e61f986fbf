use std::io::Write;
use std::path::PathBuf;

use color_eyre::eyre::{bail, Result};
use droidloc_config::TranslateCfg;
use droidloc_parsers_xml::XmlResourceAdapter;
use droidloc_services::{apply_gaps, dry_run_summary, find_gaps, scan_module, ApplyOptions};
use droidloc_translate::{
    translator_for, TranslateCredentials, DEFAULT_LOCATION, ENV_ACCESS_TOKEN, ENV_API_KEY,
};

#[allow(clippy::too_many_arguments)]
pub fn run_translate(
    root: Option<PathBuf>,
    project_id: Option<String>,
    location: Option<String>,
    api_key: Option<String>,
    yes: bool,
    dry_run: bool,
    backup: bool,
) -> Result<()> {
    tracing::debug!(
        event = "translate_args",
        root = ?root,
        project_id = ?project_id,
        location = ?location,
        api_key = api_key.is_some(),
        yes,
        dry_run,
        backup,
    );

    let cfg = super::load_config()?;
    let root = super::resolve_module_root(root, &cfg)?;
    let translate_cfg = cfg.translate.unwrap_or_default();

    let scan = scan_module(&root, &XmlResourceAdapter)?;
    let gaps = find_gaps(&scan.table, &scan.documents)?;
    if gaps.is_empty() {
        ui_ok!("No missing translations found");
        return Ok(());
    }

    for gap in &gaps {
        ui_out!("  {}  {} ({})  {:?}", gap.key, gap.locale, gap.language, gap.source);
    }
    ui_info!("{} string(s) missing a translation", gaps.len());

    if dry_run {
        let summary = dry_run_summary(&gaps);
        for file in &summary.files {
            ui_out!("  {}: {} key(s) {}", file.path, file.keys, file.status);
        }
        ui_ok!("DRY-RUN: {} string(s) would be translated, nothing written", gaps.len());
        return Ok(());
    }

    if !yes && !confirm(&format!("Proceed with translation of {} strings?", gaps.len()))? {
        ui_warn!("Translation cancelled, nothing written");
        return Ok(());
    }

    let creds = resolve_credentials(project_id, location, api_key, &translate_cfg)?;
    let translator = translator_for(&creds)?;
    ui_info!("Using {}", translator.label());

    let backup = backup || translate_cfg.backup.unwrap_or(false);
    let summary = apply_gaps(&gaps, translator.as_ref(), &XmlResourceAdapter, ApplyOptions { backup })?;

    for file in &summary.files {
        ui_out!("  {}: {} key(s) {}", file.path, file.keys, file.status);
    }
    ui_ok!("Translated {} string(s)", summary.translated);
    if summary.failed > 0 {
        ui_warn!("{} string(s) failed and were left untranslated, see the log", summary.failed);
    }
    Ok(())
}

/// Flags win over droidloc.toml, which wins over environment variables. The
/// access token is never read from config files, only from the environment.
fn resolve_credentials(
    project_id: Option<String>,
    location: Option<String>,
    api_key: Option<String>,
    cfg: &TranslateCfg,
) -> Result<TranslateCredentials> {
    let location = location
        .or_else(|| cfg.location.clone())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    if let Some(key) = api_key {
        return Ok(TranslateCredentials::ApiKey(key));
    }
    if let Some(project_id) = project_id {
        return Ok(TranslateCredentials::CloudProject {
            project_id,
            location,
            access_token: access_token_from_env()?,
        });
    }
    if let Some(key) = cfg.api_key.clone() {
        return Ok(TranslateCredentials::ApiKey(key));
    }
    if let Some(project_id) = cfg.project_id.clone() {
        return Ok(TranslateCredentials::CloudProject {
            project_id,
            location,
            access_token: access_token_from_env()?,
        });
    }
    if let Ok(key) = std::env::var(ENV_API_KEY) {
        if !key.is_empty() {
            return Ok(TranslateCredentials::ApiKey(key));
        }
    }
    bail!("no translation credentials; pass --project-id or --api-key, or set {ENV_API_KEY}");
}

fn access_token_from_env() -> Result<String> {
    match std::env::var(ENV_ACCESS_TOKEN) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => bail!(
            "{ENV_ACCESS_TOKEN} is not set; run `gcloud auth application-default print-access-token` and export it"
        ),
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N]: ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

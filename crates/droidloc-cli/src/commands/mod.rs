pub mod export;
pub mod gaps;
pub mod translate;

use std::path::PathBuf;

use color_eyre::eyre::{bail, Result};
use droidloc_config::DroidLocConfig;

pub(crate) fn load_config() -> Result<DroidLocConfig> {
    Ok(droidloc_config::load_config()?)
}

/// Flag wins over `module_root` from droidloc.toml.
pub(crate) fn resolve_module_root(
    flag: Option<PathBuf>,
    cfg: &DroidLocConfig,
) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root);
    }
    if let Some(root) = &cfg.module_root {
        return Ok(PathBuf::from(root));
    }
    bail!("no module root given; pass --root or set module_root in droidloc.toml");
}

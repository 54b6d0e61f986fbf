use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// JSON projection of one missing translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapRecord {
    pub schema_version: u32,
    pub key: String,
    pub source: String,
    pub locale: String,
    pub language: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateFileStat {
    pub path: String,
    pub keys: usize,
    pub status: String,
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateSummary {
    pub schema_version: u32,
    pub mode: String,
    pub translated: usize,
    pub failed: usize,
    pub files: Vec<TranslateFileStat>,
}

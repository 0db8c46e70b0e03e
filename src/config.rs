use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hard safety ceiling: files larger than this are never parsed, regardless
/// of config. They still appear in listings as plain entries.
pub const ABSOLUTE_MAX_PARSE_BYTES: u64 = 1_000_000; // 1 MB

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the ignore-pattern file looked up at the listing root.
    pub ignore_file: String,

    /// The tool's own working directory name, always part of the default
    /// ignore set so a scan never recurses into its own output.
    pub work_dir: String,

    /// Files above this size are listed but not parsed for virtual entries.
    pub max_parse_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_file: ".ignore".to_string(),
            work_dir: ".arbor".to_string(),
            // 512 KB default — enough for any real source file, blocks
            // generated bloat.
            max_parse_bytes: 512 * 1024,
        }
    }
}

impl Config {
    pub fn parse_ceiling(&self) -> u64 {
        self.max_parse_bytes.min(ABSOLUTE_MAX_PARSE_BYTES)
    }
}

pub fn load_config(root: &Path) -> Config {
    let primary = root.join(".arbor.json");

    let text = std::fs::read_to_string(&primary);
    let Ok(text) = text else { return Config::default() };

    serde_json::from_str::<Config>(&text).unwrap_or_else(|_| Config::default())
}

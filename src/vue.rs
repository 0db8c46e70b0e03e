use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::model::SourceUnit;
use crate::script::{extract_source, ScriptDialect};

fn script_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // First <script> block only; `(?s)` so the body spans newlines.
    RE.get_or_init(|| Regex::new(r"(?s)<script[^>]*>(.*?)</script>").unwrap())
}

/// Extract from a Vue single-file component: isolate the first
/// `<script>...</script>` block and run the script extractor on it.
/// No script block means no entries. Spans and line numbers are relative
/// to the script block, not the surrounding SFC.
pub fn extract_content(content: &str) -> SourceUnit {
    let Some(caps) = script_block_re().captures(content) else {
        return SourceUnit::default();
    };

    let open_tag = &caps[0][..caps[0].find('>').map(|i| i + 1).unwrap_or(0)];
    let dialect = if open_tag.contains("lang=\"ts\"") || open_tag.contains("lang='ts'") {
        ScriptDialect::TypeScript
    } else {
        ScriptDialect::Tsx
    };

    extract_source(caps.get(1).map(|m| m.as_str()).unwrap_or(""), dialect)
}

/// File-path variant used by the walker. Never fails.
pub fn extract_file(path: &Path) -> SourceUnit {
    match std::fs::read_to_string(path) {
        Ok(content) => extract_content(&content),
        Err(e) => {
            debug_log!("arbor: failed to read {}: {e}", path.display());
            SourceUnit::default()
        }
    }
}

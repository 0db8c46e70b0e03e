use std::path::Path;

use crate::config::Config;
use crate::model::SourceUnit;
use crate::script::ScriptDialect;
use crate::{python, script, vue};

/// Supported source languages. The walker and the resolver both go through
/// this dispatch, so they agree exactly on which files can back virtual
/// paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Python,
    Script(ScriptDialect),
    Vue,
}

impl Lang {
    /// Extension-based detection. `.d.ts` and `.min.js` still map to
    /// `Script` — they are valid resolver anchors, they just parse to
    /// nothing.
    pub fn for_path(path: &Path) -> Option<Lang> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "py" => Some(Lang::Python),
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => {
                Some(Lang::Script(ScriptDialect::for_path(path)))
            }
            "vue" => Some(Lang::Vue),
            _ => None,
        }
    }
}

/// Parse a file into its structural summary. Never fails: unreadable,
/// oversized, skipped, or unparseable files yield an empty unit, and the
/// file still appears in listings as a plain entry.
pub fn extract_path(path: &Path, cfg: &Config) -> SourceUnit {
    let Some(lang) = Lang::for_path(path) else {
        return SourceUnit::default();
    };

    if let Ok(meta) = std::fs::metadata(path) {
        if meta.len() > cfg.parse_ceiling() {
            debug_log!("arbor: {} exceeds parse ceiling, listed unparsed", path.display());
            return SourceUnit::default();
        }
    }

    match lang {
        Lang::Python => match std::fs::read_to_string(path) {
            Ok(content) => python::extract(&content),
            Err(e) => {
                debug_log!("arbor: failed to read {}: {e}", path.display());
                SourceUnit::default()
            }
        },
        Lang::Script(_) => script::extract_file(path),
        Lang::Vue => vue::extract_file(path),
    }
}

/// Parse already-read source text for the given path's language.
pub fn extract_text(path: &Path, content: &str) -> SourceUnit {
    match Lang::for_path(path) {
        Some(Lang::Python) => python::extract(content),
        Some(Lang::Script(dialect)) => {
            if script::is_skipped_script(path) {
                SourceUnit::default()
            } else {
                script::extract_source(content, dialect)
            }
        }
        Some(Lang::Vue) => vue::extract_content(content),
        None => SourceUnit::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detection_by_extension() {
        assert_eq!(Lang::for_path(Path::new("a/b.py")), Some(Lang::Python));
        assert_eq!(
            Lang::for_path(Path::new("a/b.ts")),
            Some(Lang::Script(ScriptDialect::TypeScript))
        );
        assert_eq!(
            Lang::for_path(Path::new("a/b.jsx")),
            Some(Lang::Script(ScriptDialect::Tsx))
        );
        assert_eq!(Lang::for_path(Path::new("a/b.vue")), Some(Lang::Vue));
        assert_eq!(Lang::for_path(Path::new("a/b.rs")), None);
        assert_eq!(Lang::for_path(Path::new("Makefile")), None);
    }

    #[test]
    fn declaration_files_anchor_but_parse_to_nothing() {
        let path = PathBuf::from("types/api.d.ts");
        assert!(Lang::for_path(&path).is_some());
        assert!(extract_text(&path, "export declare function f(): void;\n").is_empty());
    }
}

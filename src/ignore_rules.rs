use regex::Regex;
use std::path::Path;

use crate::config::Config;

/// Compiled ignore predicate applied to forward-slash relative paths.
///
/// Pattern syntax (from the listing root's ignore file): `*` matches any
/// run of non-separator characters, `**` matches anything including
/// separators, a trailing `/` marks a directory pattern (the trailing slash
/// is dropped; descendants match through the `(/.*)?` suffix), `#` starts a
/// comment line. Patterns are anchored to the start of the relative path.
#[derive(Debug)]
pub struct IgnoreRules {
    patterns: Vec<Regex>,
}

impl IgnoreRules {
    /// Load rules from `<root>/<cfg.ignore_file>`. A missing file — or any
    /// pattern that fails to compile — falls back to the default set.
    pub fn load(root: &Path, cfg: &Config) -> IgnoreRules {
        let path = root.join(&cfg.ignore_file);
        match std::fs::read_to_string(&path) {
            Ok(text) => match Self::compile(&text) {
                Some(rules) => rules,
                None => {
                    debug_log!("arbor: bad pattern in {}, using defaults", path.display());
                    Self::defaults(cfg)
                }
            },
            Err(_) => Self::defaults(cfg),
        }
    }

    /// Compile an ignore file's text. Returns None if any pattern is
    /// uncompilable, so the caller can fall back wholesale.
    pub fn compile(text: &str) -> Option<IgnoreRules> {
        let mut patterns = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            patterns.push(Regex::new(&translate(line)).ok()?);
        }
        Some(IgnoreRules { patterns })
    }

    /// Hard-coded fallback: dependency dirs, VCS metadata, env files, and
    /// the tool's own working directory.
    pub fn defaults(cfg: &Config) -> IgnoreRules {
        let work_dir = regex::escape(&cfg.work_dir);
        let patterns = vec![
            Regex::new(r"^node_modules(/.*)?$").unwrap(),
            Regex::new(r"^\.git(/.*)?$").unwrap(),
            Regex::new(r"^\.DS_Store$").unwrap(),
            Regex::new(r"^\.env$").unwrap(),
            Regex::new(&format!("^{work_dir}(/.*)?$")).unwrap(),
        ];
        IgnoreRules { patterns }
    }

    /// `relative` uses forward slashes, no leading separator.
    pub fn should_ignore(&self, relative: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(relative))
    }
}

/// Translate one glob-like pattern into an anchored regex.
fn translate(pattern: &str) -> String {
    // Directory patterns drop the trailing slash; the descendant suffix
    // below covers everything underneath.
    let pattern = pattern.strip_suffix('/').unwrap_or(pattern);

    let escaped = pattern.replace('.', r"\.");
    let escaped = escaped.replace("**", "\u{0}");
    let escaped = escaped.replace('*', "[^/]*");
    let escaped = escaped.replace('\u{0}', ".*");

    format!("^{escaped}(/.*)?$")
}

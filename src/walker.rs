use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{load_config, Config};
use crate::ignore_rules::IgnoreRules;
use crate::language::{extract_path, Lang};
use crate::vpath;

/// List a directory tree as a flat sequence of real relative paths,
/// directory markers (trailing `/`), and virtual paths, in walk order:
/// a directory before its own children, siblings sorted by name.
///
/// Ignore rules come from the root's ignore file (or the defaults);
/// `node_modules` is excluded unconditionally. A single file or subtree
/// that cannot be read is skipped, never aborting the walk.
pub fn list_all(root: &Path) -> Result<Vec<String>> {
    let cfg = load_config(root);
    let rules = IgnoreRules::load(root, &cfg);
    list_all_filtered(root, &rules, &cfg)
}

/// Same as [`list_all`] with an externally supplied ignore predicate and
/// config (the serving layer loads these once per root).
pub fn list_all_filtered(root: &Path, rules: &IgnoreRules, cfg: &Config) -> Result<Vec<String>> {
    let mut out = Vec::new();
    walk_dir(root, "", rules, cfg, &mut out)
        .with_context(|| format!("Failed to list {}", root.display()))?;
    Ok(out)
}

fn walk_dir(
    dir: &Path,
    base: &str,
    rules: &IgnoreRules,
    cfg: &Config,
    out: &mut Vec<String>,
) -> std::io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        let relative = if base.is_empty() {
            name.to_string()
        } else {
            format!("{base}/{name}")
        };

        if rules.should_ignore(&relative) {
            continue;
        }

        // fs::metadata follows symlinks, so a link to a source file or
        // directory is walked like its target. Broken links are skipped.
        let Ok(meta) = std::fs::metadata(entry.path()) else {
            continue;
        };

        if meta.is_dir() {
            // Defense in depth: never recurse into dependency trees, no
            // matter what the ignore file says.
            if name == "node_modules" {
                continue;
            }
            out.push(format!("{relative}/"));
            // A subtree that vanishes or denies access mid-walk is skipped.
            if let Err(e) = walk_dir(&entry.path(), &relative, rules, cfg, out) {
                debug_log!("arbor: skipping {relative}: {e}");
            }
        } else if meta.is_file() {
            out.push(relative.clone());

            if Lang::for_path(Path::new(name)).is_some() {
                let unit = extract_path(&entry.path(), cfg);
                out.extend(vpath::synthesize(&relative, &unit));
            }
        }
    }

    Ok(())
}

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::language::{extract_text, Lang};
use crate::model::SourceUnit;
use crate::vpath::{self, EntryKind};

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request does not end in `.function`/`.class`/`.method`; the
    /// serving layer should have routed it to a plain file read.
    #[error("not a virtual entry path")]
    NotVirtual,

    /// The request would leave the configured root. Rejected before any
    /// filesystem access.
    #[error("path escapes the listing root")]
    OutsideRoot,

    /// No enclosing real source file exists on the upward walk.
    #[error("source file not found for virtual path")]
    SourceNotFound,

    /// The enclosing file parses, but no declaration matches.
    #[error("{kind} '{name}' not found in source file")]
    EntryNotFound { kind: EntryKind, name: String },

    /// The identified source file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolve a virtual path to its declaration's exact source text.
///
/// The suffix names the kind, the final component (suffix stripped) the
/// bare name. The nearest enclosing real source file is found by walking
/// upward from the requested path's parent — `foo.js/C.class/m.method`
/// anchors at `foo.js` — then re-parsed fresh (no cache) and searched.
pub fn resolve_virtual(root: &Path, virtual_path: &str) -> Result<String, ResolveError> {
    let (kind, name) = vpath::split_request(virtual_path).ok_or(ResolveError::NotVirtual)?;

    let requested = sanitize(virtual_path)?;
    let source_file = find_enclosing_source(root, &requested)?;

    let content = std::fs::read_to_string(&source_file)?;
    let unit = extract_text(&source_file, &content);

    first_match(&unit, kind, &name)
        .map(|c| c.to_string())
        .ok_or(ResolveError::EntryNotFound { kind, name })
}

/// Reject absolute requests and `..` components before touching the
/// filesystem; the walk below then only ever moves toward the root.
fn sanitize(virtual_path: &str) -> Result<PathBuf, ResolveError> {
    let normalized = vpath::normalize(virtual_path);
    let rel = Path::new(normalized.trim_start_matches('/'));
    for component in Path::new(&normalized).components() {
        match component {
            Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                return Err(ResolveError::OutsideRoot);
            }
            _ => {}
        }
    }
    Ok(rel.to_path_buf())
}

/// Walk upward from the virtual path's parent to the first existing
/// regular file with a supported extension, staying inside `root`.
fn find_enclosing_source(root: &Path, requested: &Path) -> Result<PathBuf, ResolveError> {
    let mut current = requested.parent();

    while let Some(rel) = current {
        if rel.as_os_str().is_empty() {
            break;
        }
        let candidate = root.join(rel);
        if candidate.is_file() && Lang::for_path(&candidate).is_some() {
            return Ok(candidate);
        }
        current = rel.parent();
    }

    Err(ResolveError::SourceNotFound)
}

/// Single tie-break point for duplicate names: the first entry in
/// declaration order wins. Methods match by bare name across all classes —
/// the class component of the request is not used to disambiguate.
fn first_match<'a>(unit: &'a SourceUnit, kind: EntryKind, name: &str) -> Option<&'a str> {
    match kind {
        EntryKind::Function => unit
            .functions
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.content.as_str()),
        EntryKind::Class => unit
            .classes
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.content.as_str()),
        EntryKind::Method => unit
            .classes
            .iter()
            .flat_map(|c| c.methods.iter())
            .find(|m| m.bare_name() == name)
            .map(|m| m.content.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn resolves_function_method_and_class() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/a.py",
            "def helper(): return 1\n\nclass Greeter:\n    def greet(self): return \"hi\"\n",
        );

        let f = resolve_virtual(tmp.path(), "src/a.py/helper.function").unwrap();
        assert_eq!(f, "def helper(): return 1");

        let c = resolve_virtual(tmp.path(), "src/a.py/Greeter.class").unwrap();
        assert!(c.starts_with("class Greeter:"));
        assert!(c.contains("def greet"));

        let m = resolve_virtual(tmp.path(), "src/a.py/Greeter.class/greet.method").unwrap();
        assert_eq!(m, "def greet(self): return \"hi\"");
    }

    #[test]
    fn entry_not_found_vs_source_not_found() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.py", "def present(): pass\n");

        let err = resolve_virtual(tmp.path(), "a.py/missing.function").unwrap_err();
        assert!(matches!(err, ResolveError::EntryNotFound { .. }));

        let err = resolve_virtual(tmp.path(), "missing.py/x.function").unwrap_err();
        assert!(matches!(err, ResolveError::SourceNotFound));

        // The two conditions must render distinct messages.
        let entry = ResolveError::EntryNotFound {
            kind: EntryKind::Function,
            name: "missing".into(),
        };
        assert_ne!(entry.to_string(), ResolveError::SourceNotFound.to_string());
    }

    #[test]
    fn non_virtual_and_escaping_requests_are_rejected() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.py", "def f(): pass\n");

        assert!(matches!(
            resolve_virtual(tmp.path(), "a.py").unwrap_err(),
            ResolveError::NotVirtual
        ));
        assert!(matches!(
            resolve_virtual(tmp.path(), "../a.py/f.function").unwrap_err(),
            ResolveError::OutsideRoot
        ));
    }

    #[test]
    fn method_request_ignores_class_qualification() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "two.py",
            "class A:\n    def run(self): return \"A\"\nclass B:\n    def run(self): return \"B\"\n",
        );

        // First class in declaration order wins, whichever class the path names.
        let via_a = resolve_virtual(tmp.path(), "two.py/A.class/run.method").unwrap();
        let via_b = resolve_virtual(tmp.path(), "two.py/B.class/run.method").unwrap();
        assert_eq!(via_a, via_b);
        assert!(via_a.contains("return \"A\""));
    }

    #[test]
    fn idempotent_reads() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.js", "function stable() { return 42; }\n");

        let first = resolve_virtual(tmp.path(), "a.js/stable.function").unwrap();
        let second = resolve_virtual(tmp.path(), "a.js/stable.function").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn declaration_file_anchors_but_has_no_entries() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "api.d.ts", "export declare function f(): void;\n");

        let err = resolve_virtual(tmp.path(), "api.d.ts/f.function").unwrap_err();
        assert!(matches!(err, ResolveError::EntryNotFound { .. }));
    }
}

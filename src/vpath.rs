use std::fmt;

use crate::model::SourceUnit;

pub const FUNCTION_SUFFIX: &str = ".function";
pub const CLASS_SUFFIX: &str = ".class";
pub const METHOD_SUFFIX: &str = ".method";

/// Kind of declaration a virtual path addresses, taken from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Function,
    Class,
    Method,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Function => write!(f, "function"),
            EntryKind::Class => write!(f, "class"),
            EntryKind::Method => write!(f, "method"),
        }
    }
}

/// True when the path's last component carries a virtual suffix.
pub fn is_virtual(path: &str) -> bool {
    path.ends_with(FUNCTION_SUFFIX) || path.ends_with(CLASS_SUFFIX) || path.ends_with(METHOD_SUFFIX)
}

/// Split a requested virtual path into its target kind and bare name.
/// The name is the final component with the suffix stripped; any
/// class-qualifying parent components are left to the resolver's upward
/// walk.
pub fn split_request(path: &str) -> Option<(EntryKind, String)> {
    let norm = normalize(path);
    let last = norm.rsplit('/').next().unwrap_or(&norm);

    for (suffix, kind) in [
        (FUNCTION_SUFFIX, EntryKind::Function),
        (CLASS_SUFFIX, EntryKind::Class),
        (METHOD_SUFFIX, EntryKind::Method),
    ] {
        if let Some(name) = last.strip_suffix(suffix) {
            if name.is_empty() {
                return None;
            }
            return Some((kind, name.to_string()));
        }
    }
    None
}

/// Normalize separators to forward slashes regardless of host OS.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Derive the virtual paths a file contributes to a listing: functions in
/// encounter order, then each class immediately followed by its methods.
pub fn synthesize(relative_real_path: &str, unit: &SourceUnit) -> Vec<String> {
    let base = normalize(relative_real_path);
    let mut out = Vec::new();

    for func in &unit.functions {
        out.push(format!("{base}/{}{FUNCTION_SUFFIX}", func.bare_name()));
    }

    for class in &unit.classes {
        let class_path = format!("{base}/{}{CLASS_SUFFIX}", class.name);
        out.push(class_path.clone());
        for method in &class.methods {
            out.push(format!("{class_path}/{}{METHOD_SUFFIX}", method.bare_name()));
        }
    }

    out
}

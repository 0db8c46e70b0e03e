use serde::Serialize;

/// Member kind for JS/TS class methods. Python methods carry no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

/// A single extracted function or method.
///
/// `content` is the exact source slice of the declaration (decorators
/// prepended for top-level Python entries), trimmed of leading/trailing
/// blank lines. Lines are 1-based and inclusive.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntry {
    /// Display name. Methods are class-qualified (`Cls.method`); free
    /// functions use the bare identifier.
    pub name: String,
    pub content: String,
    pub start_line: u32,
    pub end_line: u32,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_exported: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_default_export: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_method: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Bare method name without class qualification. Virtual path
    /// components and resolver lookups use this, never the display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MethodKind>,
    #[serde(rename = "static", skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
}

impl FunctionEntry {
    pub fn function(name: impl Into<String>, content: String, start_line: u32, end_line: u32) -> Self {
        Self {
            name: name.into(),
            content,
            start_line,
            end_line,
            is_exported: false,
            is_default_export: false,
            is_method: false,
            class_name: None,
            method_name: None,
            kind: None,
            is_static: false,
        }
    }

    pub fn method(
        class_name: &str,
        method_name: impl Into<String>,
        content: String,
        start_line: u32,
        end_line: u32,
    ) -> Self {
        let method_name = method_name.into();
        Self {
            name: format!("{class_name}.{method_name}"),
            content,
            start_line,
            end_line,
            is_exported: false,
            is_default_export: false,
            is_method: true,
            class_name: Some(class_name.to_string()),
            method_name: Some(method_name),
            kind: None,
            is_static: false,
        }
    }

    /// The name a virtual path component is built from (and matched against).
    pub fn bare_name(&self) -> &str {
        self.method_name.as_deref().unwrap_or(&self.name)
    }
}

/// A class with its extracted methods. `content` spans the whole class.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub name: String,
    pub content: String,
    pub methods: Vec<FunctionEntry>,
    pub start_line: u32,
    pub end_line: u32,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_exported: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_default_export: bool,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>, content: String, start_line: u32, end_line: u32) -> Self {
        Self {
            name: name.into(),
            content,
            methods: Vec::new(),
            start_line,
            end_line,
            is_exported: false,
            is_default_export: false,
        }
    }
}

/// One file's parse result. Recomputed on every listing or read — never
/// cached across requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceUnit {
    pub functions: Vec<FunctionEntry>,
    pub classes: Vec<ClassEntry>,
}

impl SourceUnit {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }
}

/// Strip surrounding whitespace (blank edge lines, edge indentation) from an
/// extracted slice. Interior blank lines are preserved untouched.
pub fn trim_entry_content(content: &str) -> String {
    content.trim().to_string()
}

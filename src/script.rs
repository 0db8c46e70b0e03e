use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Language, Node, Parser};

use crate::model::{trim_entry_content, ClassEntry, FunctionEntry, MethodKind, SourceUnit};

/// Grammar dialect engaged for a script. The TSX grammar parses JS, JSX and
/// TSX; plain TypeScript needs its own grammar because `<T>expr` casts are
/// ambiguous with JSX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    TypeScript,
    Tsx,
}

impl ScriptDialect {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase().as_str() {
            "ts" | "mts" | "cts" => ScriptDialect::TypeScript,
            _ => ScriptDialect::Tsx,
        }
    }

    fn language(self) -> Language {
        match self {
            ScriptDialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            ScriptDialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Declaration files and minified bundles never contribute entries.
pub fn is_skipped_script(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();
    name.ends_with(".d.ts") || name.ends_with(".min.js")
}

/// Safety net: a file whose first non-empty lines exceed 2 000 chars is
/// almost certainly minified or machine-generated; parsing it wastes CPU
/// and produces junk entries.
fn is_minified_like(source_text: &str) -> bool {
    const MAX_SAFE_LINE_CHARS: usize = 2_000;
    source_text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(5)
        .any(|l| l.len() > MAX_SAFE_LINE_CHARS)
}

/// Extract functions, classes, and methods from a JS/TS/JSX/TSX file.
/// Never fails: unreadable or skipped files yield an empty unit.
pub fn extract_file(path: &Path) -> SourceUnit {
    if is_skipped_script(path) {
        return SourceUnit::default();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug_log!("arbor: failed to read {}: {e}", path.display());
            return SourceUnit::default();
        }
    };
    extract_source(&content, ScriptDialect::for_path(path))
}

/// Extract from script source text. A source the grammar cannot parse
/// cleanly yields an empty unit (the original stack's parser throws on any
/// syntax error; a root with error nodes is treated the same way here).
pub fn extract_source(content: &str, dialect: ScriptDialect) -> SourceUnit {
    if is_minified_like(content) {
        return SourceUnit::default();
    }

    let mut parser = Parser::new();
    if parser.set_language(&dialect.language()).is_err() {
        debug_log!("arbor: tree-sitter language rejected for {dialect:?}");
        return SourceUnit::default();
    }
    let Some(tree) = parser.parse(content, None) else {
        return SourceUnit::default();
    };
    let root = tree.root_node();
    if root.has_error() {
        return SourceUnit::default();
    }

    let mut extraction = Extraction {
        content,
        unit: SourceUnit::default(),
        visited: HashSet::new(),
    };
    extraction.walk(root, None);
    extraction.unit
}

/// Closed classification of the node kinds the extraction dispatches on.
/// Everything else recurses generically.
enum NodeRule {
    FunctionDecl,
    VarBinding,
    ClassDecl,
    ExportWrapper,
    Other,
}

fn classify(kind: &str) -> NodeRule {
    match kind {
        "function_declaration" | "generator_function_declaration" => NodeRule::FunctionDecl,
        "variable_declarator" => NodeRule::VarBinding,
        "class_declaration" => NodeRule::ClassDecl,
        "export_statement" => NodeRule::ExportWrapper,
        _ => NodeRule::Other,
    }
}

/// Per-call traversal state. Fresh for every extraction; nothing outlives
/// the call.
struct Extraction<'a> {
    content: &'a str,
    unit: SourceUnit,
    visited: HashSet<usize>,
}

impl<'a> Extraction<'a> {
    fn slice(&self, node: Node) -> String {
        trim_entry_content(&self.content[node.start_byte()..node.end_byte()])
    }

    fn lines(node: Node) -> (u32, u32) {
        (
            node.start_position().row as u32 + 1,
            node.end_position().row as u32 + 1,
        )
    }

    fn walk(&mut self, node: Node, parent_kind: Option<&str>) {
        // Export-unwrapped declarations are marked visited so the generic
        // rules cannot double-record them.
        if !self.visited.insert(node.id()) {
            return;
        }

        match classify(node.kind()) {
            NodeRule::FunctionDecl => {
                if parent_kind != Some("export_statement") {
                    if let Some(entry) = self.function_entry(node) {
                        self.unit.functions.push(entry);
                    }
                }
            }
            NodeRule::VarBinding => {
                if let Some(entry) = self.var_binding_entry(node) {
                    self.unit.functions.push(entry);
                }
            }
            NodeRule::ClassDecl => {
                if parent_kind != Some("export_statement") {
                    if let Some(entry) = self.class_entry(node) {
                        self.unit.classes.push(entry);
                    }
                }
            }
            NodeRule::ExportWrapper => self.unwrap_export(node),
            NodeRule::Other => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child, Some(node.kind()));
        }
    }

    /// `function myFunc() {}` (and generator variants) with a name.
    fn function_entry(&self, node: Node) -> Option<FunctionEntry> {
        let name = node.child_by_field_name("name")?;
        let (start, end) = Self::lines(node);
        Some(FunctionEntry::function(
            &self.content[name.start_byte()..name.end_byte()],
            self.slice(node),
            start,
            end,
        ))
    }

    /// `const myFunc = () => {}` / `= function () {}`, bound to a simple
    /// identifier. Destructured or computed targets are not captured.
    fn var_binding_entry(&self, node: Node) -> Option<FunctionEntry> {
        let name = node.child_by_field_name("name")?;
        if name.kind() != "identifier" {
            return None;
        }
        let value = node.child_by_field_name("value")?;
        if !matches!(value.kind(), "arrow_function" | "function_expression" | "function") {
            return None;
        }
        let (start, end) = Self::lines(node);
        Some(FunctionEntry::function(
            &self.content[name.start_byte()..name.end_byte()],
            self.slice(node),
            start,
            end,
        ))
    }

    fn class_entry(&self, node: Node) -> Option<ClassEntry> {
        let name = node.child_by_field_name("name")?;
        let class_name = self.content[name.start_byte()..name.end_byte()].to_string();
        let (start, end) = Self::lines(node);
        let mut entry = ClassEntry::new(&class_name, self.slice(node), start, end);
        entry.methods = self.class_methods(node, &class_name);
        Some(entry)
    }

    fn class_methods(&self, class_node: Node, class_name: &str) -> Vec<FunctionEntry> {
        let Some(body) = class_node.child_by_field_name("body") else {
            return Vec::new();
        };

        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "method_definition" {
                continue;
            }
            let Some(key) = member.child_by_field_name("name") else {
                continue;
            };

            let method_name = match key.kind() {
                "property_identifier" | "private_property_identifier" => {
                    self.content[key.start_byte()..key.end_byte()].to_string()
                }
                "string" => strip_string_quotes(&self.content[key.start_byte()..key.end_byte()]),
                "number" => self.content[key.start_byte()..key.end_byte()].to_string(),
                _ => "unknown".to_string(),
            };

            let mut kind = MethodKind::Method;
            let mut is_static = false;
            let mut token_cursor = member.walk();
            for token in member.children(&mut token_cursor) {
                if token.is_named() {
                    continue;
                }
                match token.kind() {
                    "get" => kind = MethodKind::Get,
                    "set" => kind = MethodKind::Set,
                    "static" => is_static = true,
                    _ => {}
                }
            }
            if key.kind() == "property_identifier" && method_name == "constructor" {
                kind = MethodKind::Constructor;
            }

            let (start, end) = Self::lines(member);
            let mut entry =
                FunctionEntry::method(class_name, method_name, self.slice(member), start, end);
            entry.kind = Some(kind);
            entry.is_static = is_static;
            methods.push(entry);
        }
        methods
    }

    /// `export function f` / `export class C` / `export default ...` wrap an
    /// inner declaration: record the inner node (exact span), tag export
    /// flags, and mark it visited.
    fn unwrap_export(&mut self, node: Node) {
        let Some(decl) = node.child_by_field_name("declaration") else {
            return;
        };
        let mut cursor = node.walk();
        let is_default = node
            .children(&mut cursor)
            .any(|c| !c.is_named() && c.kind() == "default");

        match classify(decl.kind()) {
            NodeRule::FunctionDecl => {
                if let Some(mut entry) = self.function_entry(decl) {
                    entry.is_exported = true;
                    entry.is_default_export = is_default;
                    self.unit.functions.push(entry);
                    self.visited.insert(decl.id());
                }
            }
            NodeRule::ClassDecl => {
                if let Some(mut entry) = self.class_entry(decl) {
                    entry.is_exported = true;
                    entry.is_default_export = is_default;
                    self.unit.classes.push(entry);
                    self.visited.insert(decl.id());
                }
            }
            // `export const f = ...` falls through to the generic var
            // binding rule (unflagged), same as the original stack.
            _ => {}
        }
    }
}

fn strip_string_quotes(s: &str) -> String {
    let t = s.trim();
    if t.len() >= 2 {
        let bytes = t.as_bytes();
        let first = bytes[0];
        let last = bytes[t.len() - 1];
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') || (first == b'`' && last == b'`') {
            return t[1..t.len() - 1].to_string();
        }
    }
    t.to_string()
}

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{trim_entry_content, ClassEntry, FunctionEntry, SourceUnit};

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^class\s+(\w+)").unwrap())
}

fn def_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^def\s+(\w+)\s*\(").unwrap())
}

fn leading_ws_len(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// In-progress function or method accumulator.
struct OpenFunction {
    name: String,
    content: String,
    start_line: u32,
    end_line: u32,
    /// Set when this entry belongs to the currently open class.
    class_name: Option<String>,
}

struct OpenClass {
    name: String,
    content: String,
    indent: usize,
    start_line: u32,
    end_line: u32,
    methods: Vec<FunctionEntry>,
}

fn close_function(open: OpenFunction, unit: &mut SourceUnit, class: &mut Option<OpenClass>) {
    let content = trim_entry_content(&open.content);
    match (&open.class_name, class.as_mut()) {
        (Some(cls), Some(open_class)) if *cls == open_class.name => {
            open_class.methods.push(FunctionEntry::method(
                cls,
                open.name,
                content,
                open.start_line,
                open.end_line,
            ));
        }
        _ => {
            unit.functions
                .push(FunctionEntry::function(open.name, content, open.start_line, open.end_line));
        }
    }
}

fn close_class(open: OpenClass, unit: &mut SourceUnit) {
    let mut entry = ClassEntry::new(
        open.name,
        trim_entry_content(&open.content),
        open.start_line,
        open.end_line,
    );
    entry.methods = open.methods;
    unit.classes.push(entry);
}

/// Extract top-level functions and classes (with one level of methods) from
/// Python source.
///
/// This is a deliberate indentation heuristic, not a Python grammar: an open
/// block absorbs every following line — blank lines and `#` comments never
/// terminate it, even at column 0 — until a dedented non-comment statement
/// or EOF closes it. Multi-line strings and parenthesized continuations that
/// dedent will mislead it; that trade-off is accepted. Never fails: any
/// input yields a (possibly empty) `SourceUnit`.
pub fn extract(content: &str) -> SourceUnit {
    let mut unit = SourceUnit::default();
    let mut current_fn: Option<OpenFunction> = None;
    let mut current_class: Option<OpenClass> = None;
    let mut decorators: Vec<&str> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = (idx + 1) as u32;
        let trimmed = line.trim();
        let indent = leading_ws_len(line);

        // Top-level decorators accumulate until the def/class they annotate.
        if trimmed.starts_with('@') && indent == 0 {
            decorators.push(line);
            continue;
        }

        // New top-level class closes whatever is open.
        if let Some(cap) = class_re().captures(trimmed) {
            if indent == 0 {
                if let Some(open) = current_fn.take() {
                    close_function(open, &mut unit, &mut current_class);
                }
                if let Some(open) = current_class.take() {
                    close_class(open, &mut unit);
                }

                let mut class_content = String::new();
                if !decorators.is_empty() {
                    class_content.push_str(&decorators.join("\n"));
                    class_content.push('\n');
                    decorators.clear();
                }
                class_content.push_str(line);

                current_class = Some(OpenClass {
                    name: cap[1].to_string(),
                    content: class_content,
                    indent,
                    start_line: line_no,
                    end_line: line_no,
                    methods: Vec::new(),
                });
                continue;
            }
        }

        if let Some(cap) = def_re().captures(trimmed) {
            // `def` indented inside an open class is a method of that class.
            let inside_class = current_class
                .as_ref()
                .is_some_and(|c| indent > c.indent);
            if inside_class {
                if let Some(open) = current_fn.take() {
                    close_function(open, &mut unit, &mut current_class);
                }
                let open_class = current_class.as_mut().unwrap();

                // The def line belongs to the class span too.
                open_class.content.push('\n');
                open_class.content.push_str(line);
                open_class.end_line = line_no;

                current_fn = Some(OpenFunction {
                    name: cap[1].to_string(),
                    content: line.to_string(),
                    start_line: line_no,
                    end_line: line_no,
                    class_name: Some(open_class.name.clone()),
                });
                continue;
            }

            // Top-level function closes whatever is open.
            if indent == 0 {
                if let Some(open) = current_fn.take() {
                    close_function(open, &mut unit, &mut current_class);
                }
                if let Some(open) = current_class.take() {
                    close_class(open, &mut unit);
                }

                let mut fn_content = String::new();
                if !decorators.is_empty() {
                    fn_content.push_str(&decorators.join("\n"));
                    fn_content.push('\n');
                    decorators.clear();
                }
                fn_content.push_str(line);

                current_fn = Some(OpenFunction {
                    name: cap[1].to_string(),
                    content: fn_content,
                    start_line: line_no,
                    end_line: line_no,
                    class_name: None,
                });
                continue;
            }
        }

        if current_fn.is_some() || current_class.is_some() {
            if indent == 0 && !trimmed.is_empty() && !trimmed.starts_with('#') {
                // Dedented non-comment statement: the open blocks are done.
                if let Some(open) = current_fn.take() {
                    close_function(open, &mut unit, &mut current_class);
                }
                if let Some(open) = current_class.take() {
                    close_class(open, &mut unit);
                }
            } else {
                // Still inside: blank and comment lines never close a block.
                if let Some(open) = current_fn.as_mut() {
                    open.content.push('\n');
                    open.content.push_str(line);
                    open.end_line = line_no;
                }
                if let Some(open) = current_class.as_mut() {
                    open.content.push('\n');
                    open.content.push_str(line);
                    open.end_line = line_no;
                }
            }
        }
    }

    // EOF force-closes anything still open.
    if let Some(open) = current_fn.take() {
        close_function(open, &mut unit, &mut current_class);
    }
    if let Some(open) = current_class.take() {
        close_class(open, &mut unit);
    }

    unit
}

use std::path::Path;

use arbor::resolver::{resolve_virtual, ResolveError};
use arbor::vpath;
use arbor::walker::list_all;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// A small mixed-language tree used across the tests below.
fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(
        root,
        "lib/shapes.py",
        "def area(w, h):\n    return w * h\n\nclass Circle:\n    def __init__(self, r):\n        self.r = r\n    def area(self):\n        return 3.14 * self.r ** 2\n",
    );
    write(
        root,
        "src/store.js",
        "const load = (key) => JSON.parse(localStorage[key]);\n\nexport class Store {\n  constructor() { this.data = {}; }\n  get size() { return Object.keys(this.data).length; }\n}\n\nfunction persist(store) {\n  localStorage.data = JSON.stringify(store.data);\n}\n",
    );
    write(
        root,
        "src/App.vue",
        "<template><div/></template>\n<script>\nexport default class App {\n  mount(el) { this.el = el; }\n}\n</script>\n",
    );
    write(root, "types/api.d.ts", "export declare function fetchAll(): void;\n");
    write(root, "README.md", "# demo\n");
    write(root, "node_modules/react/index.js", "function secret() {}\n");

    tmp
}

#[test]
fn listing_counts_match_declarations() {
    let tmp = fixture();
    let listing = list_all(tmp.path()).unwrap();

    // shapes.py: 1 function, 1 class, 2 methods.
    let py_functions: Vec<&String> = listing
        .iter()
        .filter(|p| p.starts_with("lib/shapes.py/") && p.ends_with(".function"))
        .collect();
    assert_eq!(py_functions, vec!["lib/shapes.py/area.function"]);

    let py_classes: Vec<&String> = listing
        .iter()
        .filter(|p| p.starts_with("lib/shapes.py/") && p.ends_with(".class"))
        .collect();
    assert_eq!(py_classes, vec!["lib/shapes.py/Circle.class"]);

    let py_methods: Vec<&String> = listing
        .iter()
        .filter(|p| p.starts_with("lib/shapes.py/") && p.ends_with(".method"))
        .collect();
    assert_eq!(
        py_methods,
        vec![
            "lib/shapes.py/Circle.class/__init__.method",
            "lib/shapes.py/Circle.class/area.method",
        ]
    );

    // store.js: arrow binding + free function + exported class with 2 members.
    assert!(listing.contains(&"src/store.js/load.function".to_string()));
    assert!(listing.contains(&"src/store.js/persist.function".to_string()));
    assert!(listing.contains(&"src/store.js/Store.class".to_string()));
    assert!(listing.contains(&"src/store.js/Store.class/constructor.method".to_string()));
    assert!(listing.contains(&"src/store.js/Store.class/size.method".to_string()));

    // App.vue: default-exported class from the script block.
    assert!(listing.contains(&"src/App.vue/App.class".to_string()));
    assert!(listing.contains(&"src/App.vue/App.class/mount.method".to_string()));
}

#[test]
fn round_trip_every_virtual_path() {
    let tmp = fixture();
    let listing = list_all(tmp.path()).unwrap();

    let mut seen = 0;
    for path in listing.iter().filter(|p| vpath::is_virtual(p)) {
        let content = resolve_virtual(tmp.path(), path)
            .unwrap_or_else(|e| panic!("resolve({path}) failed: {e}"));
        assert!(!content.trim().is_empty(), "{path} resolved to empty content");

        // The resolved slice must come verbatim out of the backing file.
        let file_rel = path
            .split('/')
            .scan(String::new(), |acc, seg| {
                if acc.is_empty() {
                    *acc = seg.to_string();
                } else {
                    *acc = format!("{acc}/{seg}");
                }
                Some(acc.clone())
            })
            .find(|candidate| tmp.path().join(candidate).is_file())
            .expect("virtual path has a backing file");
        let original = std::fs::read_to_string(tmp.path().join(&file_rel)).unwrap();
        assert!(
            original.contains(content.trim()),
            "{path}: content is not a slice of {file_rel}"
        );
        seen += 1;
    }
    assert!(seen >= 10, "expected a meaningful number of virtual paths, got {seen}");
}

#[test]
fn repeated_reads_are_identical() {
    let tmp = fixture();
    let path = "lib/shapes.py/Circle.class/area.method";
    let first = resolve_virtual(tmp.path(), path).unwrap();
    let second = resolve_virtual(tmp.path(), path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn not_found_conditions_are_distinct() {
    let tmp = fixture();

    let entry = resolve_virtual(tmp.path(), "lib/shapes.py/missing.function").unwrap_err();
    assert!(matches!(entry, ResolveError::EntryNotFound { .. }));

    let source = resolve_virtual(tmp.path(), "lib/missing.py/x.function").unwrap_err();
    assert!(matches!(source, ResolveError::SourceNotFound));

    assert_ne!(entry.to_string(), source.to_string());
}

#[test]
fn excluded_files_never_gain_virtual_children() {
    let tmp = fixture();
    let listing = list_all(tmp.path()).unwrap();

    assert!(listing.contains(&"types/api.d.ts".to_string()));
    assert!(!listing.iter().any(|p| p.starts_with("types/api.d.ts/")));
    assert!(!listing.iter().any(|p| p.contains("node_modules")));
}

#[test]
fn duplicate_method_names_resolve_to_first_class() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "dup.js",
        "class First {\n  run() { return 'first'; }\n}\nclass Second {\n  run() { return 'second'; }\n}\n",
    );

    let listing = list_all(tmp.path()).unwrap();
    assert!(listing.contains(&"dup.js/First.class/run.method".to_string()));
    assert!(listing.contains(&"dup.js/Second.class/run.method".to_string()));

    // Ambiguous-by-design: the class component does not disambiguate, so
    // both requests return the first declaration.
    let via_first = resolve_virtual(tmp.path(), "dup.js/First.class/run.method").unwrap();
    let via_second = resolve_virtual(tmp.path(), "dup.js/Second.class/run.method").unwrap();
    assert_eq!(via_first, via_second);
    assert!(via_first.contains("'first'"));
}

#[test]
fn walk_order_lists_directories_before_children() {
    let tmp = fixture();
    let listing = list_all(tmp.path()).unwrap();

    for marker in ["lib/", "src/", "types/"] {
        let dir_pos = listing.iter().position(|p| p == marker).unwrap();
        let child_pos = listing
            .iter()
            .position(|p| p.len() > marker.len() && p.starts_with(marker))
            .unwrap();
        assert!(dir_pos < child_pos, "{marker} listed after its children");
    }
}

//! Output writers and file assembly.
//!
//! [`typescript::GuardWriter`] renders a single guard definition; this module
//! wraps the rendered code with its import section and decides where the
//! file goes.

pub mod typescript;

pub use typescript::GuardWriter;

use crate::deps::Dependencies;
use crate::traits::DeclarationIndex;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// A rendered guard file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// `<dir of the declaring source>/<guardName>.ts`
    pub file_name: PathBuf,
    pub content: String,
    pub type_name: String,
    pub guard_name: String,
}

/// Where the guard for `type_name` is written: next to its declaration.
pub fn guard_file_path(index: &dyn DeclarationIndex, type_name: &str, guard_name: &str) -> PathBuf {
    let file = format!("{guard_name}.ts");
    match index.source_path(type_name).and_then(Path::parent) {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

/// Assemble a complete guard file: imports, a blank line, the guard code and
/// a trailing newline.
///
/// Import groups, in order: declared types, runtime type aliases,
/// `TypeGuardFn`, enums, runtime helpers, other generated guards. Names the
/// index has no source file for are not imported.
pub fn render_file(
    code: &str,
    deps: &Dependencies,
    out_dir: &Path,
    index: &dyn DeclarationIndex,
    runtime_module: &str,
) -> String {
    let mut imports: Vec<String> = Vec::new();

    for name in &deps.types {
        if let Some(source) = index.source_path(name) {
            imports.push(format!(
                "import type {{ {} }} from '{}';",
                name,
                relative_import(out_dir, source)
            ));
        }
    }
    if !deps.runtime_types.is_empty() {
        imports.push(format!(
            "import type {{ {} }} from '{}';",
            deps.runtime_types.join(", "),
            runtime_module
        ));
    }
    if deps.needs_type_guard_fn {
        imports.push(format!("import type {{ TypeGuardFn }} from '{runtime_module}';"));
    }
    for name in &deps.enums {
        if let Some(source) = index.source_path(name) {
            imports.push(format!(
                "import {{ {} }} from '{}';",
                name,
                relative_import(out_dir, source)
            ));
        }
    }
    if !deps.helpers.is_empty() {
        let helpers: Vec<&str> = deps.helpers.iter().map(|h| h.name()).collect();
        imports.push(format!(
            "import {{ {} }} from '{}';",
            helpers.join(", "),
            runtime_module
        ));
    }
    for dep in &deps.guards {
        let target = guard_file_path(index, &dep.type_name, &dep.guard);
        imports.push(format!(
            "import {{ {} }} from '{}';",
            dep.guard,
            relative_import(out_dir, &target)
        ));
    }

    let mut content = imports.join("\n");
    if !content.is_empty() {
        content.push_str("\n\n");
    }
    content.push_str(code);
    content.push('\n');
    content
}

/// Module specifier for `target` as seen from a file in `from_dir`.
///
/// Forward slashes, no `.ts` extension, `./` prefix unless the path climbs
/// out with `../`.
pub fn relative_import(from_dir: &Path, target: &Path) -> String {
    let target = match target.extension().and_then(|e| e.to_str()) {
        Some("ts" | "tsx") => target.with_extension(""),
        _ => target.to_path_buf(),
    };

    let from: Vec<Component<'_>> = from_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component<'_>> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let ups = from.len() - common;

    let mut result = if ups == 0 {
        String::from("./")
    } else {
        "../".repeat(ups)
    };
    let rest: Vec<String> = to[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    result.push_str(&rest.join("/"));
    result
}

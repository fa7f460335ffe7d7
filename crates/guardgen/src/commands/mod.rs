//! Command implementations and shared input handling.

pub mod generate;
pub mod list;

use anyhow::{Context, bail};
use guardgen_core::{SourceIndex, parse_typescript_declarations};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Resolve file arguments to TypeScript files.
///
/// Each argument may be a file, a directory (walked for `.ts` files, skipping
/// declaration files and `node_modules`) or a glob pattern. Order follows the
/// arguments; duplicates are dropped.
pub fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            walk_sources(path, &mut files);
            continue;
        }
        let entries = glob::glob(input).with_context(|| format!("invalid pattern `{input}`"))?;
        for entry in entries {
            let entry = entry?;
            if entry.is_dir() {
                walk_sources(&entry, &mut files);
            } else {
                files.push(entry);
            }
        }
    }

    let mut seen = HashSet::new();
    files.retain(|f| seen.insert(f.clone()));

    if files.is_empty() {
        bail!("no TypeScript files matched {}", inputs.join(", "));
    }
    debug!(count = files.len(), "resolved input files");
    Ok(files)
}

fn walk_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules");
    for entry in walker.filter_map(Result::ok) {
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            out.push(entry.into_path());
        }
    }
}

fn is_source_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".ts") && !name.ends_with(".d.ts")
}

/// Read and parse `files` in parallel into one index, in argument order.
pub fn load_index(files: &[PathBuf]) -> anyhow::Result<SourceIndex> {
    let parsed = files
        .par_iter()
        .map(|path| {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let declarations = parse_typescript_declarations(&source)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            debug!(path = %path.display(), declarations = declarations.len(), "parsed");
            Ok((path.clone(), declarations))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut index = SourceIndex::new();
    for (path, declarations) in parsed {
        index.add_file(path, declarations);
    }
    Ok(index)
}

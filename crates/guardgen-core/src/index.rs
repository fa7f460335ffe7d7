//! Declaration index built from parsed source files.

use crate::ir::Declaration;
use crate::traits::DeclarationIndex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Declarations from one or more source files, in file order.
///
/// When a name is declared more than once, lookups return the first
/// declaration encountered.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    files: Vec<PathBuf>,
    declarations: Vec<Declaration>,
    /// File index for each declaration.
    origins: Vec<usize>,
    by_name: HashMap<String, usize>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file's declarations after those already indexed.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, declarations: Vec<Declaration>) {
        let file = self.files.len();
        self.files.push(path.into());
        for decl in declarations {
            let position = self.declarations.len();
            self.by_name.entry(decl.name.clone()).or_insert(position);
            self.declarations.push(decl);
            self.origins.push(file);
        }
    }

    /// Parse TypeScript source and add its declarations.
    #[cfg(feature = "input-typescript")]
    pub fn add_source(
        &mut self,
        path: impl Into<PathBuf>,
        source: &str,
    ) -> Result<(), crate::input::ParseError> {
        let declarations = crate::input::parse_typescript_declarations(source)?;
        self.add_file(path, declarations);
        Ok(())
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations paired with the file they came from.
    pub fn iter(&self) -> impl Iterator<Item = (&Declaration, &Path)> {
        self.declarations
            .iter()
            .zip(&self.origins)
            .map(|(decl, &file)| (decl, self.files[file].as_path()))
    }
}

impl DeclarationIndex for SourceIndex {
    fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.by_name.get(name).map(|&i| &self.declarations[i])
    }

    fn source_path(&self, name: &str) -> Option<&Path> {
        let &position = self.by_name.get(name)?;
        Some(self.files[self.origins[position]].as_path())
    }
}

//! Public entry points: generate guards by name or for a whole index.

use crate::builder::GuardBuilder;
use crate::deps::{self, Dependencies};
use crate::guard::{GuardDef, default_guard_name};
use crate::ir::Declaration;
use crate::output::{self, GeneratedFile};
use crate::traits::DeclarationIndex;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Module the runtime helpers are imported from by default.
pub const DEFAULT_RUNTIME_MODULE: &str = "guardz";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no interface or type alias named `{0}` found")]
    NotFound(String),
}

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Module that helpers and `TypeGuardFn` come from.
    pub runtime_module: String,
    /// Batch generation skips declarations without `export`.
    pub exported_only: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
            exported_only: true,
        }
    }
}

/// A generated guard with its rendered code and dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardDefinition {
    pub guard_name: String,
    pub type_name: String,
    /// Rendered guard, without imports.
    pub code: String,
    pub dependencies: Dependencies,
    #[serde(skip)]
    pub def: GuardDef,
}

impl GuardDefinition {
    /// Names of other generated guards this one calls.
    pub fn guard_dependencies(&self) -> Vec<&str> {
        self.dependencies
            .guards
            .iter()
            .map(|d| d.guard.as_str())
            .collect()
    }

    /// Declared type and enum names the rendered code mentions.
    pub fn type_dependencies(&self) -> Vec<&str> {
        self.dependencies
            .types
            .iter()
            .chain(&self.dependencies.enums)
            .map(String::as_str)
            .collect()
    }

    pub fn needs_type_guard_fn(&self) -> bool {
        self.dependencies.needs_type_guard_fn
    }
}

/// Guard generator over a fixed declaration index.
pub struct Generator<'a> {
    index: &'a dyn DeclarationIndex,
    options: GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(index: &'a dyn DeclarationIndex) -> Self {
        Self::with_options(index, GenerateOptions::default())
    }

    pub fn with_options(index: &'a dyn DeclarationIndex, options: GenerateOptions) -> Self {
        Self { index, options }
    }

    /// Generate the guard for the interface or type alias called `name`.
    ///
    /// `guard_name` overrides the default `is<Name>`.
    pub fn generate_guard_for(
        &self,
        name: &str,
        guard_name: Option<&str>,
    ) -> Result<GuardDefinition, GenerateError> {
        let decl = self
            .index
            .lookup(name)
            .filter(|d| d.has_guard())
            .ok_or_else(|| GenerateError::NotFound(name.to_string()))?;
        Ok(self.generate(decl, guard_name))
    }

    /// Generate guards for every interface and type alias, in source order.
    ///
    /// Non-exported declarations are skipped unless `exported_only` is off.
    /// `guard_name` applies to every definition when given.
    pub fn generate_all_guards(&self, guard_name: Option<&str>) -> Vec<GuardDefinition> {
        self.index
            .declarations()
            .iter()
            .filter(|d| d.has_guard())
            .filter(|d| d.exported || !self.options.exported_only)
            .filter(|d| self.is_first_declaration(d))
            .map(|d| self.generate(d, guard_name))
            .collect()
    }

    /// Generate the guard for `name` and wrap it in a complete file.
    pub fn generate_file_for(
        &self,
        name: &str,
        guard_name: Option<&str>,
    ) -> Result<GeneratedFile, GenerateError> {
        let definition = self.generate_guard_for(name, guard_name)?;
        Ok(self.render_file(&definition))
    }

    /// Complete files for every guard [`Self::generate_all_guards`] produces.
    pub fn generate_all_files(&self, guard_name: Option<&str>) -> Vec<GeneratedFile> {
        self.generate_all_guards(guard_name)
            .iter()
            .map(|definition| self.render_file(definition))
            .collect()
    }

    /// Wrap a definition with its imports.
    pub fn render_file(&self, definition: &GuardDefinition) -> GeneratedFile {
        let file_name = output::guard_file_path(
            self.index,
            &definition.type_name,
            &definition.guard_name,
        );
        let out_dir = file_name.parent().unwrap_or(Path::new(""));
        let content = output::render_file(
            &definition.code,
            &definition.dependencies,
            out_dir,
            self.index,
            &self.options.runtime_module,
        );
        GeneratedFile {
            file_name,
            content,
            type_name: definition.type_name.clone(),
            guard_name: definition.guard_name.clone(),
        }
    }

    fn generate(&self, decl: &Declaration, guard_name: Option<&str>) -> GuardDefinition {
        let guard_name = guard_name
            .map(str::to_string)
            .unwrap_or_else(|| default_guard_name(&decl.name));
        let def = GuardBuilder::new(self.index).build(decl, &guard_name);
        let dependencies = deps::collect(&def, self.index);
        debug!(name = %decl.name, guard = %guard_name, "generated guard");
        GuardDefinition {
            guard_name,
            type_name: decl.name.clone(),
            code: def.to_string(),
            dependencies,
            def,
        }
    }

    /// Later redeclarations of a name are shadowed by the first one.
    fn is_first_declaration(&self, decl: &Declaration) -> bool {
        self.index
            .lookup(&decl.name)
            .is_some_and(|first| std::ptr::eq(first, decl))
    }
}

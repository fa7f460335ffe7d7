//! Runtime type guard generation from TypeScript declarations.
//!
//! `guardgen-core` reads TypeScript interfaces, type aliases and enums and
//! produces guard functions built from the guardz runtime helpers
//! (`isType`, `isOneOfTypes`, `isArrayWithEachItem`, ...).
//!
//! # Architecture
//!
//! ```text
//! Source              IR                 Guards              Output
//! ──────────     ──────────────     ────────────────     ─────────────────
//! TypeScript ──> Declaration  ──┬─> GuardDef          ──> guard code
//! (input/)       SourceIndex    │   (builder.rs,         (output/typescript.rs)
//!                (index.rs)     │    translate.rs)
//!                               └─> Dependencies      ──> import section
//!                                   (deps.rs)            (output/mod.rs)
//! ```
//!
//! # Example
//!
//! ```
//! use guardgen_core::{Generator, SourceIndex};
//!
//! let mut index = SourceIndex::new();
//! index
//!     .add_source("src/user.ts", "export interface User { id: number; name?: string }")
//!     .unwrap();
//!
//! let guard = Generator::new(&index).generate_guard_for("User", None).unwrap();
//! assert_eq!(
//!     guard.code,
//!     "export const isUser = isType<User>({\n  id: isNumber,\n  name: isUndefinedOr(isString)\n});"
//! );
//! ```
//!
//! # Feature Flags
//!
//! - `input-typescript` (default) - tree-sitter TypeScript front-end

pub mod builder;
pub mod deps;
pub mod generator;
pub mod guard;
pub mod index;
pub mod input;
pub mod ir;
pub mod output;
pub mod traits;
pub mod translate;

pub use builder::GuardBuilder;
pub use deps::Dependencies;
pub use generator::{GenerateError, GenerateOptions, Generator, GuardDefinition};
pub use guard::{GuardDef, GuardExpr};
pub use index::SourceIndex;
pub use input::ParseError;
#[cfg(feature = "input-typescript")]
pub use input::parse_typescript_declarations;
pub use output::GeneratedFile;
pub use traits::DeclarationIndex;
pub use translate::{translate, translate_generic};

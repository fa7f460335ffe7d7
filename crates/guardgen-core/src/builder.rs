//! Per-declaration guard construction.

use crate::guard::{GuardDef, GuardExpr, GuardForm, Helper, self_type};
use crate::ir::{DeclKind, Declaration, Member, ObjectShape, TypeExpr, TypeParam};
use crate::traits::DeclarationIndex;
use crate::translate::Translator;
use tracing::debug;

/// Builds a [`GuardDef`] for one declaration against a fixed index.
pub struct GuardBuilder<'a> {
    index: &'a dyn DeclarationIndex,
}

impl<'a> GuardBuilder<'a> {
    pub fn new(index: &'a dyn DeclarationIndex) -> Self {
        Self { index }
    }

    /// Build the guard for `decl`, named `guard_name`.
    ///
    /// Never fails: shapes without a precise guard degrade inside the body.
    pub fn build(&self, decl: &Declaration, guard_name: &str) -> GuardDef {
        let type_params = self.index.resolve_type_parameters(decl).to_vec();
        let translator = Translator::new(self.index)
            .with_params(type_params.iter().map(|p| p.name.clone()))
            .with_self_guard(&decl.name, guard_name);

        let (form, body) = match &decl.kind {
            DeclKind::Interface(iface) => {
                let members = self.index.resolve_members(decl);
                match &iface.index_value {
                    Some(value) if members.is_empty() => (
                        GuardForm::Constant,
                        GuardExpr::apply(Helper::IsObjectWithEachItem, translator.translate(value)),
                    ),
                    _ => self.object_guard(&translator, decl, &type_params, members),
                }
            }
            DeclKind::Alias(alias) => match alias.definition.unparen() {
                TypeExpr::Object(ObjectShape { members, index }) => match index {
                    Some(value) if members.is_empty() => (
                        GuardForm::Constant,
                        GuardExpr::apply(Helper::IsObjectWithEachItem, translator.translate(value)),
                    ),
                    _ => self.object_guard(&translator, decl, &type_params, members.clone()),
                },
                definition => (GuardForm::Constant, translator.translate(definition)),
            },
            DeclKind::Enum(_) => (GuardForm::Constant, GuardExpr::Enum(decl.name.clone())),
        };

        debug!(
            name = %decl.name,
            guard = guard_name,
            recursive = form == GuardForm::SelfReferencing,
            generic = !type_params.is_empty(),
            "built guard"
        );

        GuardDef {
            guard_name: guard_name.to_string(),
            type_name: decl.name.clone(),
            type_params,
            form,
            body,
        }
    }

    fn object_guard(
        &self,
        translator: &Translator<'_>,
        decl: &Declaration,
        type_params: &[TypeParam],
        members: Vec<Member>,
    ) -> (GuardForm, GuardExpr) {
        let form = if is_self_referencing(&decl.name, &members) {
            GuardForm::SelfReferencing
        } else {
            GuardForm::Constant
        };
        let shape = ObjectShape {
            members,
            index: None,
        };
        let annotation = self_type(&decl.name, type_params);
        (form, translator.object(&shape, Some(annotation), false))
    }
}

/// Whether any member's type names `name` directly.
///
/// Only the member types themselves are searched (through unions, arrays,
/// parentheses and container generics); references reached through other
/// declarations are not followed.
pub fn is_self_referencing(name: &str, members: &[Member]) -> bool {
    members.iter().any(|m| mentions(name, &m.ty))
}

fn mentions(name: &str, ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Reference { name: target, args } => {
            target == name
                || (is_container(target) && args.iter().any(|arg| mentions(name, arg)))
        }
        TypeExpr::Union(members) => members.iter().any(|m| mentions(name, m)),
        TypeExpr::Array(element) | TypeExpr::Paren(element) => mentions(name, element),
        TypeExpr::Object(_)
        | TypeExpr::Primitive(_)
        | TypeExpr::Literal(_)
        | TypeExpr::Unsupported(_) => false,
    }
}

fn is_container(name: &str) -> bool {
    matches!(
        name,
        "Array" | "array" | "Nullable" | "NonEmptyArray" | "Partial" | "Record"
    )
}

//! Type expression to guard expression translation.
//!
//! Dispatch is by expression kind, first match wins:
//!
//! 1. parentheses are transparent
//! 2. unions: optional idioms, literal unions, nullable wrappers, then the
//!    general sorted `isOneOfTypes`
//! 3. references: type parameters, primitives, special forms, enums, other
//!    generated guards, then an empty-shape placeholder
//! 4. inline objects, 5. arrays, 6. literals, 7. keyword types
//!
//! Translation is total. Shapes with no precise guard degrade to `isUnknown`
//! or a placeholder, never to an error.

use crate::guard::{
    GuardExpr, Helper, MemberGuard, ObjectGuard, UnionBranch, default_guard_name,
};
use crate::ir::{Literal, Member, ObjectShape, Primitive, TypeExpr};
use crate::traits::DeclarationIndex;
use std::cmp::Ordering;
use tracing::trace;

/// Two-member unions with a dedicated rendering, matched on source text.
const OPTIONAL_IDIOMS: &[(&str, Helper, Helper)] = &[
    ("string | null", Helper::IsNullOr, Helper::IsString),
    ("string | undefined", Helper::IsUndefinedOr, Helper::IsString),
    ("number | undefined", Helper::IsUndefinedOr, Helper::IsNumber),
    ("boolean | undefined", Helper::IsUndefinedOr, Helper::IsBoolean),
    ("Date | undefined", Helper::IsUndefinedOr, Helper::IsDate),
];

/// Translate a type expression outside any generic context.
pub fn translate(expr: &TypeExpr, index: &dyn DeclarationIndex) -> GuardExpr {
    Translator::new(index).translate(expr)
}

/// Translate a type expression with the given type parameters in scope.
pub fn translate_generic(
    expr: &TypeExpr,
    params: &[String],
    index: &dyn DeclarationIndex,
) -> GuardExpr {
    Translator::new(index)
        .with_params(params.iter().cloned())
        .translate(expr)
}

/// Recursive translator over a fixed index snapshot.
pub struct Translator<'a> {
    index: &'a dyn DeclarationIndex,
    /// Type parameters in scope; references to them resolve to injected guards.
    params: Vec<String>,
    /// The declaration being built and the guard name it will get.
    self_guard: Option<(String, String)>,
}

impl<'a> Translator<'a> {
    pub fn new(index: &'a dyn DeclarationIndex) -> Self {
        Self {
            index,
            params: Vec::new(),
            self_guard: None,
        }
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = String>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Route references to `type_name` to `guard_name` instead of `is<Name>`.
    pub fn with_self_guard(mut self, type_name: &str, guard_name: &str) -> Self {
        self.self_guard = Some((type_name.to_string(), guard_name.to_string()));
        self
    }

    pub fn translate(&self, expr: &TypeExpr) -> GuardExpr {
        match expr {
            TypeExpr::Paren(inner) => self.translate(inner),
            TypeExpr::Union(members) => self.union(expr, members),
            TypeExpr::Reference { name, args } => self.reference(name, args),
            TypeExpr::Object(shape) => self.object(shape, None, false),
            TypeExpr::Array(element) => {
                GuardExpr::apply(Helper::IsArrayWithEachItem, self.translate(element))
            }
            TypeExpr::Literal(lit) => GuardExpr::EqualTo(lit.clone()),
            TypeExpr::Primitive(p) => primitive(p),
            TypeExpr::Unsupported(text) => {
                trace!(%text, "no guard for type syntax, accepting unknown");
                GuardExpr::unknown()
            }
        }
    }

    /// Property guards for a member list, in order.
    pub fn members(&self, members: &[Member]) -> Vec<MemberGuard> {
        members
            .iter()
            .map(|member| MemberGuard {
                name: member.name.clone(),
                guard: self.translate(&member.ty),
                optional: member.optional,
            })
            .collect()
    }

    /// Guard for an inline object shape.
    ///
    /// A shape with only an index signature becomes `isObjectWithEachItem`.
    /// `bare` requests the member map alone, as `Partial` needs it.
    pub fn object(
        &self,
        shape: &ObjectShape,
        annotation: Option<TypeExpr>,
        bare: bool,
    ) -> GuardExpr {
        if !bare && shape.members.is_empty() {
            if let Some(value) = &shape.index {
                return GuardExpr::apply(Helper::IsObjectWithEachItem, self.translate(value));
            }
        }
        GuardExpr::Object(ObjectGuard {
            annotation,
            members: self.members(&shape.members),
            bare,
        })
    }

    fn union(&self, expr: &TypeExpr, members: &[TypeExpr]) -> GuardExpr {
        if members.len() == 2 {
            let text = expr.to_string();
            if let Some((_, wrapper, inner)) = OPTIONAL_IDIOMS.iter().find(|(t, ..)| *t == text) {
                return GuardExpr::apply(*wrapper, GuardExpr::Helper(*inner));
            }
        }

        if let Some(values) = literal_values(members.iter()) {
            return GuardExpr::OneOf(values);
        }

        let (nullish, rest): (Vec<&TypeExpr>, Vec<&TypeExpr>) =
            members.iter().partition(|m| m.is_nullish());
        if !nullish.is_empty() && !rest.is_empty() {
            let survivor = match rest.as_slice() {
                [single] => Some(self.translate(single)),
                _ => literal_values(rest.iter().copied()).map(GuardExpr::OneOf),
            };
            if let Some(mut guard) = survivor {
                if nullish.iter().any(|m| m.is_null()) {
                    guard = GuardExpr::apply(Helper::IsNullOr, guard);
                }
                if nullish.iter().any(|m| !m.is_null()) {
                    guard = GuardExpr::apply(Helper::IsUndefinedOr, guard);
                }
                return guard;
            }
        }

        let mut branches: Vec<UnionBranch> = members
            .iter()
            .map(|member| UnionBranch {
                text: member.to_string(),
                ty: member.clone(),
                guard: self.translate(member),
            })
            .collect();
        branches.sort_by(|a, b| union_order(&a.text, &b.text));
        GuardExpr::OneOfTypes(branches)
    }

    fn reference(&self, name: &str, args: &[TypeExpr]) -> GuardExpr {
        if self.params.iter().any(|p| p == name) {
            return GuardExpr::Param(name.to_string());
        }

        let first_arg = || {
            args.first()
                .map(|arg| self.translate(arg))
                .unwrap_or_else(GuardExpr::unknown)
        };

        match name {
            "string" => GuardExpr::Helper(Helper::IsString),
            "number" => GuardExpr::Helper(Helper::IsNumber),
            "boolean" => GuardExpr::Helper(Helper::IsBoolean),
            "Date" => GuardExpr::Helper(Helper::IsDate),
            "Array" | "array" => GuardExpr::apply(Helper::IsArrayWithEachItem, first_arg()),
            "Nullable" => GuardExpr::apply(Helper::IsNullOr, first_arg()),
            "NonEmptyString" => GuardExpr::Helper(Helper::IsNonEmptyString),
            "NonNegativeNumber" => GuardExpr::Helper(Helper::IsNonNegativeNumber),
            "PositiveNumber" => GuardExpr::Helper(Helper::IsPositiveNumber),
            "NonEmptyArray" => {
                GuardExpr::apply(Helper::IsNonEmptyArrayWithEachItem, first_arg())
            }
            // Key type is not checked.
            "Record" => {
                let value = match args {
                    [_, value, ..] => self.translate(value),
                    _ => GuardExpr::unknown(),
                };
                GuardExpr::apply(Helper::IsObjectWithEachItem, value)
            }
            "Partial" => {
                let inner = match args.first() {
                    Some(TypeExpr::Object(shape)) => self.object(shape, None, true),
                    Some(other) => self.translate(other),
                    None => GuardExpr::unknown(),
                };
                GuardExpr::apply(Helper::IsPartialOf, inner)
            }
            _ => self.declared(name, args),
        }
    }

    fn declared(&self, name: &str, args: &[TypeExpr]) -> GuardExpr {
        if self.index.is_enum_name(name) {
            return GuardExpr::Enum(name.to_string());
        }
        if let Some((head, member)) = name.split_once('.') {
            if self.index.is_enum_name(head) {
                return GuardExpr::EnumMember {
                    enum_name: head.to_string(),
                    member: member.to_string(),
                };
            }
        }

        let own_guard = self
            .self_guard
            .as_ref()
            .filter(|(type_name, _)| type_name == name)
            .map(|(_, guard)| guard.clone());
        if own_guard.is_some() || self.index.is_interface_name(name) {
            trace!(name, "reference to generated guard");
            return GuardExpr::Named {
                guard: own_guard.unwrap_or_else(|| default_guard_name(name)),
                type_name: name.to_string(),
                args: self.thread_args(name, args),
            };
        }

        trace!(name, "unresolved reference, emitting placeholder");
        GuardExpr::Placeholder(name.to_string())
    }

    /// Guards for a generic target's parameters: explicit arguments first,
    /// then parameter defaults, then `isUnknown`.
    fn thread_args(&self, name: &str, args: &[TypeExpr]) -> Vec<GuardExpr> {
        let Some(target) = self.index.lookup(name) else {
            return Vec::new();
        };
        self.index
            .resolve_type_parameters(target)
            .iter()
            .enumerate()
            .map(|(i, param)| match args.get(i).or(param.default.as_ref()) {
                Some(ty) => self.translate(ty),
                None => GuardExpr::unknown(),
            })
            .collect()
    }
}

fn primitive(p: &Primitive) -> GuardExpr {
    match p {
        Primitive::String => GuardExpr::Helper(Helper::IsString),
        Primitive::Number => GuardExpr::Helper(Helper::IsNumber),
        Primitive::Boolean => GuardExpr::Helper(Helper::IsBoolean),
        Primitive::Any => GuardExpr::Helper(Helper::IsAny),
        Primitive::Unknown => GuardExpr::Helper(Helper::IsUnknown),
        Primitive::Null => GuardExpr::EqualTo(Literal::Null),
        Primitive::Undefined => GuardExpr::EqualTo(Literal::Undefined),
        Primitive::Other(_) => GuardExpr::unknown(),
    }
}

/// Values of a union made only of string, number and boolean literals.
fn literal_values<'t>(mut members: impl Iterator<Item = &'t TypeExpr>) -> Option<Vec<Literal>> {
    members.try_fold(Vec::new(), |mut values, member| {
        values.push(member.as_value_literal()?.clone());
        Some(values)
    })
}

/// Case-insensitive order of union branch texts, ties broken byte-wise.
pub fn union_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

//! Guard expression tree.
//!
//! The translator produces these trees; the TypeScript writer renders them and
//! the dependency collector walks them. Trees are never mutated after
//! construction.

use crate::ir::{Literal, TypeExpr, TypeParam};
use serde::Serialize;
use std::fmt;

/// Helper predicates exported by the runtime guard library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Helper {
    IsAny,
    IsArrayWithEachItem,
    IsBoolean,
    IsDate,
    IsEnum,
    IsEqualTo,
    IsNonEmptyArrayWithEachItem,
    IsNonEmptyString,
    IsNonNegativeNumber,
    IsNullOr,
    IsNumber,
    IsObjectWithEachItem,
    IsOneOf,
    IsOneOfTypes,
    IsPartialOf,
    IsPositiveNumber,
    IsString,
    IsType,
    IsUndefinedOr,
    IsUnknown,
}

impl Helper {
    /// Identifier exported by the runtime library.
    pub fn name(self) -> &'static str {
        match self {
            Helper::IsAny => "isAny",
            Helper::IsArrayWithEachItem => "isArrayWithEachItem",
            Helper::IsBoolean => "isBoolean",
            Helper::IsDate => "isDate",
            Helper::IsEnum => "isEnum",
            Helper::IsEqualTo => "isEqualTo",
            Helper::IsNonEmptyArrayWithEachItem => "isNonEmptyArrayWithEachItem",
            Helper::IsNonEmptyString => "isNonEmptyString",
            Helper::IsNonNegativeNumber => "isNonNegativeNumber",
            Helper::IsNullOr => "isNullOr",
            Helper::IsNumber => "isNumber",
            Helper::IsObjectWithEachItem => "isObjectWithEachItem",
            Helper::IsOneOf => "isOneOf",
            Helper::IsOneOfTypes => "isOneOfTypes",
            Helper::IsPartialOf => "isPartialOf",
            Helper::IsPositiveNumber => "isPositiveNumber",
            Helper::IsString => "isString",
            Helper::IsType => "isType",
            Helper::IsUndefinedOr => "isUndefinedOr",
            Helper::IsUnknown => "isUnknown",
        }
    }
}

/// A guard: an expression denoting a predicate over `unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GuardExpr {
    /// A helper used directly, e.g. `isString`.
    Helper(Helper),
    /// A helper applied to guards, e.g. `isNullOr(isString)`.
    Apply { helper: Helper, args: Vec<GuardExpr> },
    /// `isOneOfTypes<A | B>(isA, isB)`, branches sorted by type text.
    OneOfTypes(Vec<UnionBranch>),
    /// `isEqualTo(value)`
    EqualTo(Literal),
    /// `isOneOf(a, b, c)`, values in declaration order.
    OneOf(Vec<Literal>),
    /// `isEnum(Name)`
    Enum(String),
    /// `isEqualTo(Enum.Member)`
    EnumMember { enum_name: String, member: String },
    /// Another generated guard, applied to its type arguments' guards when
    /// the target is generic: `isLevel3`, `isPage(isUser)`.
    Named {
        guard: String,
        type_name: String,
        args: Vec<GuardExpr>,
    },
    /// The injected guard for an in-scope type parameter.
    Param(String),
    Object(ObjectGuard),
    /// `isType<Name>({})` for names nothing is known about.
    Placeholder(String),
}

/// One alternative of an `isOneOfTypes` union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionBranch {
    /// Rendered source text of the member type; the sort key.
    pub text: String,
    pub ty: TypeExpr,
    pub guard: GuardExpr,
}

/// A map of property guards, `isType<Name>({ ... })`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectGuard {
    /// Type argument for `isType<...>`; inline shapes have none.
    pub annotation: Option<TypeExpr>,
    pub members: Vec<MemberGuard>,
    /// Render only the `{ ... }` map, without the `isType(...)` wrapper.
    pub bare: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberGuard {
    pub name: String,
    pub guard: GuardExpr,
    /// Rendered as `isUndefinedOr(guard)`.
    pub optional: bool,
}

/// How a guard definition is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuardForm {
    /// `export const isX = ...;`
    Constant,
    /// `export function isX(value: unknown): value is X { ... }`, for
    /// declarations whose members refer back to the declaration itself.
    SelfReferencing,
}

/// A complete guard for one declaration, before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardDef {
    pub guard_name: String,
    /// Name of the declaration being guarded.
    pub type_name: String,
    /// Each parameter becomes an injected `typeGuard<P>` argument.
    pub type_params: Vec<TypeParam>,
    pub form: GuardForm,
    pub body: GuardExpr,
}

impl GuardExpr {
    pub fn apply(helper: Helper, arg: GuardExpr) -> Self {
        GuardExpr::Apply {
            helper,
            args: vec![arg],
        }
    }

    pub fn unknown() -> Self {
        GuardExpr::Helper(Helper::IsUnknown)
    }
}

/// Name of the injected guard argument for a type parameter.
pub fn param_guard_name(param: &str) -> String {
    format!("typeGuard{param}")
}

/// Default guard name for a declaration.
pub fn default_guard_name(type_name: &str) -> String {
    format!("is{type_name}")
}

impl GuardDef {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// The guarded type as written in annotations, `Name` or `Name<T, U>`.
    pub fn self_type(&self) -> TypeExpr {
        self_type(&self.type_name, &self.type_params)
    }
}

pub(crate) fn self_type(name: &str, params: &[TypeParam]) -> TypeExpr {
    TypeExpr::generic(
        name,
        params
            .iter()
            .map(|p| TypeExpr::reference(p.name.as_str()))
            .collect(),
    )
}

impl fmt::Display for GuardExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::output::typescript::GuardWriter::expr_to_string(self))
    }
}

impl fmt::Display for GuardDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::output::typescript::GuardWriter::emit(self))
    }
}

//! Intermediate representation for type declarations.
//!
//! The TypeScript front-end normalizes source declarations to this IR before
//! they reach the translator. Everything here is produced once per run and is
//! read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A named type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declared name (e.g., "User", "Status").
    pub name: String,
    /// Whether the declaration carries an `export` marker.
    pub exported: bool,
    /// The declaration's shape.
    pub kind: DeclKind,
}

/// The kind of declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    /// `interface Name<T> extends Base { ... }`
    Interface(InterfaceDecl),
    /// `type Name<T> = ...`
    Alias(TypeAliasDecl),
    /// `enum Name { ... }`
    Enum(EnumDecl),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    /// Own property signatures, in declaration order.
    pub members: Vec<Member>,
    pub type_params: Vec<TypeParam>,
    /// Types named in the `extends` clause.
    pub extends: Vec<TypeExpr>,
    /// Value type of a `[key: string]: V` index signature.
    pub index_value: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    pub definition: TypeExpr,
    pub type_params: Vec<TypeParam>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    /// Member names in declaration order.
    pub members: Vec<String>,
}

/// A generic type parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    /// `extends` constraint.
    pub constraint: Option<TypeExpr>,
    /// Default type (`= D`).
    pub default: Option<TypeExpr>,
}

/// A property of an interface or inline object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Property name as written (may be quoted, e.g. `'content-type'`).
    pub name: String,
    pub ty: TypeExpr,
    /// Declared with `?`.
    pub optional: bool,
}

/// An inline object type (`{ a: string; [key: string]: V }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectShape {
    pub members: Vec<Member>,
    /// Value type of an index signature, if any.
    pub index: Option<Box<TypeExpr>>,
}

/// A type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeExpr {
    Primitive(Primitive),
    /// A named type with optional generic arguments.
    Reference { name: String, args: Vec<TypeExpr> },
    /// Union members in declaration order.
    Union(Vec<TypeExpr>),
    /// `T[]`
    Array(Box<TypeExpr>),
    Object(ObjectShape),
    /// A literal type such as `'a'` or `42`.
    Literal(Literal),
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// Type syntax with no guard counterpart (tuples, intersections, function
    /// types, conditional types). Holds the source text.
    Unsupported(String),
}

/// Keyword types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Any,
    Unknown,
    Null,
    Undefined,
    /// Any other keyword (`never`, `void`, `object`, `bigint`, `symbol`).
    Other(String),
}

/// A literal value in type position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    /// String literal. `value` is the raw text between the quotes.
    String { value: String, quote: char },
    /// Numeric literal as written (`42`, `-1`, `0x10`).
    Number(String),
    Boolean(bool),
    Null,
    Undefined,
}

impl Declaration {
    pub fn interface(name: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            exported: true,
            kind: DeclKind::Interface(InterfaceDecl {
                members,
                ..Default::default()
            }),
        }
    }

    pub fn alias(name: impl Into<String>, definition: TypeExpr) -> Self {
        Self {
            name: name.into(),
            exported: true,
            kind: DeclKind::Alias(TypeAliasDecl {
                definition,
                type_params: Vec::new(),
            }),
        }
    }

    pub fn enumeration(name: impl Into<String>, members: Vec<&str>) -> Self {
        Self {
            name: name.into(),
            exported: true,
            kind: DeclKind::Enum(EnumDecl {
                members: members.into_iter().map(String::from).collect(),
            }),
        }
    }

    /// Attach generic parameters (no-op for enums).
    pub fn with_type_params(mut self, params: Vec<TypeParam>) -> Self {
        match &mut self.kind {
            DeclKind::Interface(iface) => iface.type_params = params,
            DeclKind::Alias(alias) => alias.type_params = params,
            DeclKind::Enum(_) => {}
        }
        self
    }

    pub fn with_extends(mut self, parents: Vec<TypeExpr>) -> Self {
        if let DeclKind::Interface(iface) = &mut self.kind {
            iface.extends = parents;
        }
        self
    }

    pub fn with_index_signature(mut self, value: TypeExpr) -> Self {
        if let DeclKind::Interface(iface) = &mut self.kind {
            iface.index_value = Some(value);
        }
        self
    }

    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    pub fn type_params(&self) -> &[TypeParam] {
        match &self.kind {
            DeclKind::Interface(iface) => &iface.type_params,
            DeclKind::Alias(alias) => &alias.type_params,
            DeclKind::Enum(_) => &[],
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            DeclKind::Interface(_) => "interface",
            DeclKind::Alias(_) => "type",
            DeclKind::Enum(_) => "enum",
        }
    }

    /// Interfaces and aliases get a generated guard; enums do not.
    pub fn has_guard(&self) -> bool {
        !matches!(self.kind, DeclKind::Enum(_))
    }
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }

    pub fn with_constraint(mut self, constraint: TypeExpr) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_default(mut self, default: TypeExpr) -> Self {
        self.default = Some(default);
        self
    }
}

impl Member {
    pub fn required(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

impl TypeExpr {
    pub fn string() -> Self {
        Self::Primitive(Primitive::String)
    }

    pub fn number() -> Self {
        Self::Primitive(Primitive::Number)
    }

    pub fn boolean() -> Self {
        Self::Primitive(Primitive::Boolean)
    }

    pub fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    pub fn undefined() -> Self {
        Self::Literal(Literal::Undefined)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self::Reference {
            name: name.into(),
            args,
        }
    }

    pub fn array(element: TypeExpr) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn union(members: Vec<TypeExpr>) -> Self {
        Self::Union(members)
    }

    pub fn object(members: Vec<Member>) -> Self {
        Self::Object(ObjectShape {
            members,
            index: None,
        })
    }

    pub fn paren(inner: TypeExpr) -> Self {
        Self::Paren(Box::new(inner))
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String {
            value: value.into(),
            quote: '\'',
        })
    }

    pub fn number_literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Number(value.into()))
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &TypeExpr {
        let mut current = self;
        while let TypeExpr::Paren(inner) = current {
            current = inner;
        }
        current
    }

    /// `null` or `undefined`, whether spelled as a keyword or a literal.
    pub fn is_nullish(&self) -> bool {
        matches!(
            self.unparen(),
            TypeExpr::Literal(Literal::Null | Literal::Undefined)
                | TypeExpr::Primitive(Primitive::Null | Primitive::Undefined)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self.unparen(),
            TypeExpr::Literal(Literal::Null) | TypeExpr::Primitive(Primitive::Null)
        )
    }

    /// A string, numeric or boolean literal.
    pub fn as_value_literal(&self) -> Option<&Literal> {
        match self.unparen() {
            TypeExpr::Literal(
                lit @ (Literal::String { .. } | Literal::Number(_) | Literal::Boolean(_)),
            ) => Some(lit),
            _ => None,
        }
    }

    /// Replace bare references to type parameters with their bound types.
    pub fn substitute(&self, bindings: &HashMap<String, TypeExpr>) -> TypeExpr {
        match self {
            TypeExpr::Reference { name, args } if args.is_empty() => bindings
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeExpr::Reference { name, args } => TypeExpr::Reference {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeExpr::Union(members) => {
                TypeExpr::Union(members.iter().map(|m| m.substitute(bindings)).collect())
            }
            TypeExpr::Array(element) => TypeExpr::Array(Box::new(element.substitute(bindings))),
            TypeExpr::Paren(inner) => TypeExpr::Paren(Box::new(inner.substitute(bindings))),
            TypeExpr::Object(shape) => TypeExpr::Object(ObjectShape {
                members: shape
                    .members
                    .iter()
                    .map(|m| m.substitute(bindings))
                    .collect(),
                index: shape
                    .index
                    .as_ref()
                    .map(|v| Box::new(v.substitute(bindings))),
            }),
            TypeExpr::Primitive(_) | TypeExpr::Literal(_) | TypeExpr::Unsupported(_) => {
                self.clone()
            }
        }
    }
}

impl Member {
    pub fn substitute(&self, bindings: &HashMap<String, TypeExpr>) -> Member {
        Member {
            name: self.name.clone(),
            ty: self.ty.substitute(bindings),
            optional: self.optional,
        }
    }
}

// Source-text rendering. Union type names in `isOneOfTypes<...>` and type
// annotations in emitted guards come from here, so output must be stable.

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(p) => write!(f, "{}", p),
            TypeExpr::Reference { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    write_joined(f, args, ", ")?;
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeExpr::Union(members) => write_joined(f, members, " | "),
            TypeExpr::Array(element) => match element.as_ref() {
                TypeExpr::Union(_) => write!(f, "({})[]", element),
                _ => write!(f, "{}[]", element),
            },
            TypeExpr::Object(shape) => write!(f, "{}", shape),
            TypeExpr::Literal(lit) => write!(f, "{}", lit),
            TypeExpr::Paren(inner) => write!(f, "({})", inner),
            TypeExpr::Unsupported(text) => write!(f, "{}", text),
        }
    }
}

impl fmt::Display for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.members.is_empty() && self.index.is_none() {
            return write!(f, "{{}}");
        }
        write!(f, "{{ ")?;
        for member in &self.members {
            let mark = if member.optional { "?" } else { "" };
            write!(f, "{}{}: {}; ", member.name, mark, member.ty)?;
        }
        if let Some(value) = &self.index {
            write!(f, "[key: string]: {}; ", value)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::Any => "any",
            Primitive::Unknown => "unknown",
            Primitive::Null => "null",
            Primitive::Undefined => "undefined",
            Primitive::Other(keyword) => keyword,
        };
        f.write_str(keyword)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String { value, quote } => write!(f, "{quote}{value}{quote}"),
            Literal::Number(text) => f.write_str(text),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
            Literal::Undefined => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " extends {}", constraint)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_source_text() {
        let ty = TypeExpr::union(vec![
            TypeExpr::array(TypeExpr::paren(TypeExpr::union(vec![
                TypeExpr::string(),
                TypeExpr::number(),
            ]))),
            TypeExpr::generic("Page", vec![TypeExpr::reference("User")]),
            TypeExpr::null(),
        ]);
        assert_eq!(ty.to_string(), "(string | number)[] | Page<User> | null");
    }

    #[test]
    fn renders_type_params() {
        let param = TypeParam::new("T")
            .with_constraint(TypeExpr::reference("Base"))
            .with_default(TypeExpr::string());
        assert_eq!(param.to_string(), "T extends Base = string");
    }

    #[test]
    fn substitutes_bare_parameters_only() {
        let mut bindings = HashMap::new();
        bindings.insert("T".to_string(), TypeExpr::reference("User"));
        let ty = TypeExpr::union(vec![
            TypeExpr::array(TypeExpr::reference("T")),
            TypeExpr::generic("Box", vec![TypeExpr::reference("T")]),
        ]);
        assert_eq!(ty.substitute(&bindings).to_string(), "User[] | Box<User>");
    }

    #[test]
    fn nullish_and_literals() {
        assert!(TypeExpr::paren(TypeExpr::null()).is_nullish());
        assert!(TypeExpr::Primitive(Primitive::Undefined).is_nullish());
        assert!(!TypeExpr::string().is_nullish());
        assert!(TypeExpr::string_literal("a").as_value_literal().is_some());
        assert!(TypeExpr::null().as_value_literal().is_none());
    }
}

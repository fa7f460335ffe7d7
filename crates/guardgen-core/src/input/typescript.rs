//! TypeScript declaration extraction.
//!
//! Extracts top-level interfaces, type aliases and enums from TypeScript
//! source into the guard IR. Type syntax with no guard counterpart is kept
//! as [`TypeExpr::Unsupported`] rather than rejected.

use super::ParseError;
use crate::ir::{
    DeclKind, Declaration, EnumDecl, InterfaceDecl, Literal, Member, ObjectShape, Primitive,
    TypeAliasDecl, TypeExpr, TypeParam,
};
use tracing::trace;
use tree_sitter::{Node, Parser, Tree};

/// Parse TypeScript source and extract its declarations in source order.
pub fn parse_typescript_declarations(source: &str) -> Result<Vec<Declaration>, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_typescript::language().into())
        .map_err(|e| ParseError::Language(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or(ParseError::Parse)?;

    let ctx = ExtractContext::new(source);
    ctx.extract_declarations(&tree)
}

struct ExtractContext<'a> {
    source: &'a str,
}

impl<'a> ExtractContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn extract_declarations(&self, tree: &Tree) -> Result<Vec<Declaration>, ParseError> {
        let root = tree.root_node();
        let mut declarations = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "export_statement" => {
                    if let Some(decl) = child.child_by_field_name("declaration") {
                        if let Some(decl) = self.extract_declaration(decl, true)? {
                            declarations.push(decl);
                        }
                    }
                }
                // `declare interface ...`
                "ambient_declaration" => {
                    let mut inner = child.walk();
                    for decl in child.named_children(&mut inner) {
                        if let Some(decl) = self.extract_declaration(decl, false)? {
                            declarations.push(decl);
                        }
                    }
                }
                _ => {
                    if let Some(decl) = self.extract_declaration(child, false)? {
                        declarations.push(decl);
                    }
                }
            }
        }

        Ok(declarations)
    }

    fn extract_declaration(
        &self,
        node: Node,
        exported: bool,
    ) -> Result<Option<Declaration>, ParseError> {
        let kind = match node.kind() {
            "interface_declaration" => self.extract_interface(node)?,
            "type_alias_declaration" => self.extract_type_alias(node)?,
            "enum_declaration" => self.extract_enum(node)?,
            _ => return Ok(None),
        };
        let name = self.field_text(node, "name")?;
        trace!(name = %name, exported, "extracted declaration");
        Ok(Some(Declaration {
            name,
            exported,
            kind,
        }))
    }

    fn field_text(&self, node: Node, field: &'static str) -> Result<String, ParseError> {
        node.child_by_field_name(field)
            .map(|n| self.node_text(n).to_string())
            .ok_or(ParseError::Malformed {
                kind: declaration_kind(node),
                field,
            })
    }

    fn extract_interface(&self, node: Node) -> Result<DeclKind, ParseError> {
        let body = node
            .child_by_field_name("body")
            .ok_or(ParseError::Malformed {
                kind: "interface",
                field: "body",
            })?;
        let shape = self.extract_object_body(body);

        let mut extends = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "extends_type_clause" {
                let mut inner = child.walk();
                for parent in child.named_children(&mut inner) {
                    extends.push(self.extract_type(parent));
                }
            }
        }

        Ok(DeclKind::Interface(InterfaceDecl {
            members: shape.members,
            type_params: self.extract_type_params(node),
            extends,
            index_value: shape.index.map(|v| *v),
        }))
    }

    fn extract_type_alias(&self, node: Node) -> Result<DeclKind, ParseError> {
        let value = node
            .child_by_field_name("value")
            .ok_or(ParseError::Malformed {
                kind: "type",
                field: "value",
            })?;
        Ok(DeclKind::Alias(TypeAliasDecl {
            definition: self.extract_type(value),
            type_params: self.extract_type_params(node),
        }))
    }

    fn extract_enum(&self, node: Node) -> Result<DeclKind, ParseError> {
        let body = node
            .child_by_field_name("body")
            .ok_or(ParseError::Malformed {
                kind: "enum",
                field: "body",
            })?;

        let mut members = Vec::new();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "enum_assignment" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        members.push(self.node_text(name).to_string());
                    }
                }
                // Bare enum member (no assignment)
                "property_identifier" | "string" => {
                    members.push(self.node_text(child).to_string());
                }
                _ => {}
            }
        }

        Ok(DeclKind::Enum(EnumDecl { members }))
    }

    fn extract_type_params(&self, node: Node) -> Vec<TypeParam> {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };

        let mut result = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "type_parameter" {
                continue;
            }
            let Some(name) = param.child_by_field_name("name") else {
                continue;
            };
            // `constraint` and `default_type` wrap the type after `extends` / `=`.
            let wrapped = |field: &str| {
                param
                    .child_by_field_name(field)
                    .and_then(|n| n.named_child(0))
                    .map(|n| self.extract_type(n))
            };
            result.push(TypeParam {
                name: self.node_text(name).to_string(),
                constraint: wrapped("constraint"),
                default: wrapped("value"),
            });
        }
        result
    }

    /// Members and index signature of an interface body or object type.
    fn extract_object_body(&self, body: Node) -> ObjectShape {
        let mut shape = ObjectShape::default();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "property_signature" => {
                    if let Some(member) = self.extract_property_signature(child) {
                        shape.members.push(member);
                    }
                }
                "index_signature" => {
                    let value = child
                        .child_by_field_name("type")
                        .map(|ann| self.extract_type_from_annotation(ann))
                        .unwrap_or(TypeExpr::Primitive(Primitive::Unknown));
                    shape.index = Some(Box::new(value));
                }
                // Methods, call and construct signatures have no data to check.
                _ => {}
            }
        }
        shape
    }

    fn extract_property_signature(&self, node: Node) -> Option<Member> {
        let name = node.child_by_field_name("name")?;

        let ty = match node.child_by_field_name("type") {
            Some(type_ann) => self.extract_type_from_annotation(type_ann),
            None => TypeExpr::Primitive(Primitive::Any),
        };

        Some(Member {
            name: self.node_text(name).to_string(),
            ty,
            optional: self.has_question_mark(node),
        })
    }

    fn has_question_mark(&self, node: Node) -> bool {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() && self.node_text(child) == "?" {
                return true;
            }
        }
        false
    }

    fn extract_type_from_annotation(&self, node: Node) -> TypeExpr {
        // type_annotation has a `:` child then the actual type node
        match node.named_child(0) {
            Some(child) => self.extract_type(child),
            None => TypeExpr::Primitive(Primitive::Any),
        }
    }

    fn extract_type(&self, node: Node) -> TypeExpr {
        match node.kind() {
            "predefined_type" => match self.node_text(node) {
                "null" => TypeExpr::null(),
                "undefined" => TypeExpr::undefined(),
                keyword => TypeExpr::Primitive(predefined(keyword)),
            },

            "type_identifier" | "nested_type_identifier" | "identifier" => {
                match self.node_text(node) {
                    "undefined" => TypeExpr::Literal(Literal::Undefined),
                    name => TypeExpr::reference(name),
                }
            }

            "generic_type" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.node_text(n))
                    .unwrap_or("");
                let args = match node.child_by_field_name("type_arguments") {
                    Some(ta) => {
                        let mut cursor = ta.walk();
                        ta.named_children(&mut cursor)
                            .map(|arg| self.extract_type(arg))
                            .collect()
                    }
                    None => Vec::new(),
                };
                TypeExpr::generic(name, args)
            }

            "union_type" => {
                let mut members = Vec::new();
                self.flatten_union_type(node, &mut members);
                TypeExpr::Union(members)
            }

            "array_type" => match node.named_child(0) {
                Some(element) => TypeExpr::array(self.extract_type(element)),
                None => TypeExpr::array(TypeExpr::Primitive(Primitive::Unknown)),
            },

            // `readonly T[]` checks the same as `T[]`.
            "readonly_type" => match node.named_child(0) {
                Some(inner) => self.extract_type(inner),
                None => self.unsupported(node),
            },

            "parenthesized_type" => match node.named_child(0) {
                Some(inner) => TypeExpr::paren(self.extract_type(inner)),
                None => self.unsupported(node),
            },

            "literal_type" => self.extract_literal_type(node),

            "object_type" => TypeExpr::Object(self.extract_object_body(node)),

            _ => self.unsupported(node),
        }
    }

    fn unsupported(&self, node: Node) -> TypeExpr {
        trace!(kind = node.kind(), "unsupported type syntax");
        TypeExpr::Unsupported(self.node_text(node).to_string())
    }

    fn flatten_union_type(&self, node: Node, out: &mut Vec<TypeExpr>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "union_type" {
                self.flatten_union_type(child, out);
            } else {
                out.push(self.extract_type(child));
            }
        }
    }

    fn extract_literal_type(&self, node: Node) -> TypeExpr {
        let text = self.node_text(node).trim();
        let literal = match text {
            "true" => Literal::Boolean(true),
            "false" => Literal::Boolean(false),
            "null" => Literal::Null,
            "undefined" => Literal::Undefined,
            _ => match text.chars().next() {
                Some(quote @ ('"' | '\'')) if text.len() >= 2 => Literal::String {
                    value: text[1..text.len() - 1].to_string(),
                    quote,
                },
                Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                    Literal::Number(text.to_string())
                }
                _ => return self.unsupported(node),
            },
        };
        TypeExpr::Literal(literal)
    }
}

fn predefined(text: &str) -> Primitive {
    match text {
        "string" => Primitive::String,
        "number" => Primitive::Number,
        "boolean" => Primitive::Boolean,
        "any" => Primitive::Any,
        "unknown" => Primitive::Unknown,
        other => Primitive::Other(other.to_string()),
    }
}

fn declaration_kind(node: Node) -> &'static str {
    match node.kind() {
        "interface_declaration" => "interface",
        "type_alias_declaration" => "type",
        _ => "enum",
    }
}

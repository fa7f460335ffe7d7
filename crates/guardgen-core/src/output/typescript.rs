//! TypeScript writer for guard definitions.
//!
//! Emits guard trees as TypeScript source targeting the guardz runtime API.

use crate::guard::{GuardDef, GuardExpr, GuardForm, ObjectGuard, param_guard_name};
use crate::ir::TypeParam;
use std::fmt::Write;

/// Emits guard definitions as TypeScript source code.
pub struct GuardWriter {
    output: String,
    indent: usize,
}

impl GuardWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Emit a full guard definition (no imports, no trailing newline).
    pub fn emit(def: &GuardDef) -> String {
        let mut writer = Self::new();
        writer.write_def(def);
        writer.output
    }

    /// Emit a single guard expression at indentation level zero.
    pub fn expr_to_string(expr: &GuardExpr) -> String {
        let mut writer = Self::new();
        writer.write_expr(expr);
        writer.output
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn write_def(&mut self, def: &GuardDef) {
        let self_type = def.self_type();
        match (def.form, def.is_generic()) {
            (GuardForm::Constant, false) => {
                write!(self.output, "export const {} = ", def.guard_name).unwrap();
                self.write_expr(&def.body);
                self.output.push(';');
            }
            (GuardForm::SelfReferencing, false) => {
                write!(
                    self.output,
                    "export function {}(value: unknown): value is {} {{\n",
                    def.guard_name, self_type
                )
                .unwrap();
                self.indent += 1;
                self.write_indent();
                self.output.push_str("return ");
                self.write_expr(&def.body);
                self.output.push_str("(value);\n");
                self.indent -= 1;
                self.output.push('}');
            }
            (GuardForm::Constant, true) => {
                write!(
                    self.output,
                    "export const {} = <{}>({}): TypeGuardFn<{}> =>\n",
                    def.guard_name,
                    type_params(&def.type_params),
                    injected_params(&def.type_params),
                    self_type
                )
                .unwrap();
                self.indent += 1;
                self.write_indent();
                self.write_expr(&def.body);
                self.output.push(';');
                self.indent -= 1;
            }
            // The inner closure defers self-application until a value is
            // checked, so building the guard does not recurse.
            (GuardForm::SelfReferencing, true) => {
                write!(
                    self.output,
                    "export function {}<{}>({}): TypeGuardFn<{}> {{\n",
                    def.guard_name,
                    type_params(&def.type_params),
                    injected_params(&def.type_params),
                    self_type
                )
                .unwrap();
                self.indent += 1;
                self.write_indent();
                write!(self.output, "return (value: unknown): value is {} =>\n", self_type)
                    .unwrap();
                self.indent += 1;
                self.write_indent();
                self.write_expr(&def.body);
                self.output.push_str("(value);\n");
                self.indent -= 2;
                self.output.push('}');
            }
        }
    }

    fn write_expr(&mut self, expr: &GuardExpr) {
        match expr {
            GuardExpr::Helper(helper) => self.output.push_str(helper.name()),
            GuardExpr::Apply { helper, args } => {
                self.output.push_str(helper.name());
                self.write_args(args);
            }
            GuardExpr::OneOfTypes(branches) => {
                self.output.push_str("isOneOfTypes<");
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(" | ");
                    }
                    self.output.push_str(&branch.text);
                }
                self.output.push('>');
                self.output.push('(');
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(&branch.guard);
                }
                self.output.push(')');
            }
            GuardExpr::EqualTo(lit) => write!(self.output, "isEqualTo({})", lit).unwrap(),
            GuardExpr::OneOf(values) => {
                self.output.push_str("isOneOf(");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    write!(self.output, "{}", value).unwrap();
                }
                self.output.push(')');
            }
            GuardExpr::Enum(name) => write!(self.output, "isEnum({})", name).unwrap(),
            GuardExpr::EnumMember { enum_name, member } => {
                write!(self.output, "isEqualTo({}.{})", enum_name, member).unwrap();
            }
            GuardExpr::Named { guard, args, .. } => {
                self.output.push_str(guard);
                if !args.is_empty() {
                    self.write_args(args);
                }
            }
            GuardExpr::Param(name) => self.output.push_str(&param_guard_name(name)),
            GuardExpr::Object(object) => self.write_object(object),
            GuardExpr::Placeholder(name) => write!(self.output, "isType<{}>({{}})", name).unwrap(),
        }
    }

    fn write_args(&mut self, args: &[GuardExpr]) {
        self.output.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_expr(arg);
        }
        self.output.push(')');
    }

    fn write_object(&mut self, object: &ObjectGuard) {
        if !object.bare {
            self.output.push_str("isType");
            if let Some(annotation) = &object.annotation {
                write!(self.output, "<{}>", annotation).unwrap();
            }
            self.output.push('(');
        }

        if object.members.is_empty() {
            self.output.push_str("{}");
        } else {
            self.output.push_str("{\n");
            self.indent += 1;
            for (i, member) in object.members.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(",\n");
                }
                self.write_indent();
                write!(self.output, "{}: ", member.name).unwrap();
                if member.optional {
                    self.output.push_str("isUndefinedOr(");
                    self.write_expr(&member.guard);
                    self.output.push(')');
                } else {
                    self.write_expr(&member.guard);
                }
            }
            self.indent -= 1;
            self.output.push('\n');
            self.write_indent();
            self.output.push('}');
        }

        if !object.bare {
            self.output.push(')');
        }
    }
}

impl Default for GuardWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn type_params(params: &[TypeParam]) -> String {
    params
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn injected_params(params: &[TypeParam]) -> String {
    params
        .iter()
        .map(|p| format!("{}: TypeGuardFn<{}>", param_guard_name(&p.name), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

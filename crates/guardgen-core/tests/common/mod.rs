//! Test-only evaluator for generated guard trees.
//!
//! Runs a [`GuardDef`] against JSON values the way the runtime helpers would.
//! A missing object key stands for `undefined`.

#![allow(dead_code)]

use guardgen_core::guard::{GuardExpr, Helper, ObjectGuard};
use guardgen_core::ir::Literal;
use guardgen_core::{GuardDefinition, SourceIndex};
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;

pub fn index(source: &str) -> SourceIndex {
    let mut index = SourceIndex::new();
    index.add_source("src/types.ts", source).unwrap();
    index
}

/// Parameter bindings: each injected guard with the scope it was written in.
#[derive(Clone, Default)]
struct Env(Rc<HashMap<String, (GuardExpr, Env)>>);

pub struct Interpreter {
    guards: HashMap<String, GuardDefinition>,
    /// Enum name to its members' runtime values.
    enums: HashMap<String, Vec<(String, Value)>>,
}

impl Interpreter {
    pub fn new(definitions: Vec<GuardDefinition>) -> Self {
        Self {
            guards: definitions
                .into_iter()
                .map(|d| (d.guard_name.clone(), d))
                .collect(),
            enums: HashMap::new(),
        }
    }

    pub fn with_enum(mut self, name: &str, members: &[(&str, Value)]) -> Self {
        let members = members
            .iter()
            .map(|(member, value)| (member.to_string(), value.clone()))
            .collect();
        self.enums.insert(name.to_string(), members);
        self
    }

    fn enum_member(&self, enum_name: &str, member: &str) -> Option<&Value> {
        self.enums
            .get(enum_name)?
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| value)
    }

    /// Apply the (non-generic) guard called `guard` to `value`.
    pub fn check(&self, guard: &str, value: &Value) -> bool {
        let def = &self.guards[guard].def;
        self.eval(&def.body, Some(value), &Env::default())
    }

    /// Apply a generic guard with explicit argument guards.
    pub fn check_with(&self, guard: &str, args: &[GuardExpr], value: &Value) -> bool {
        let expr = GuardExpr::Named {
            guard: guard.to_string(),
            type_name: self.guards[guard].type_name.clone(),
            args: args.to_vec(),
        };
        self.eval(&expr, Some(value), &Env::default())
    }

    fn eval(&self, expr: &GuardExpr, value: Option<&Value>, env: &Env) -> bool {
        match expr {
            GuardExpr::Helper(helper) => bare_helper(*helper, value),
            GuardExpr::Apply { helper, args } => {
                let Some(inner) = args.first() else {
                    return false;
                };
                match helper {
                    Helper::IsNullOr => {
                        matches!(value, Some(Value::Null)) || self.eval(inner, value, env)
                    }
                    Helper::IsUndefinedOr => value.is_none() || self.eval(inner, value, env),
                    Helper::IsArrayWithEachItem => match value {
                        Some(Value::Array(items)) => {
                            items.iter().all(|item| self.eval(inner, Some(item), env))
                        }
                        _ => false,
                    },
                    Helper::IsNonEmptyArrayWithEachItem => match value {
                        Some(Value::Array(items)) => {
                            !items.is_empty()
                                && items.iter().all(|item| self.eval(inner, Some(item), env))
                        }
                        _ => false,
                    },
                    Helper::IsObjectWithEachItem => match value {
                        Some(Value::Object(map)) => {
                            map.values().all(|item| self.eval(inner, Some(item), env))
                        }
                        _ => false,
                    },
                    Helper::IsPartialOf => match inner {
                        GuardExpr::Object(object) => self.object(object, value, env, true),
                        other => self.eval(other, value, env),
                    },
                    _ => false,
                }
            }
            GuardExpr::OneOfTypes(branches) => {
                branches.iter().any(|b| self.eval(&b.guard, value, env))
            }
            GuardExpr::EqualTo(lit) => literal_matches(lit, value),
            GuardExpr::OneOf(values) => values.iter().any(|lit| literal_matches(lit, value)),
            GuardExpr::Enum(name) => value.is_some_and(|v| {
                self.enums
                    .get(name)
                    .is_some_and(|members| members.iter().any(|(_, accepted)| accepted == v))
            }),
            GuardExpr::EnumMember { enum_name, member } => {
                value.is_some() && self.enum_member(enum_name, member) == value
            }
            GuardExpr::Named { guard, args, .. } => {
                let def = &self.guards[guard].def;
                let bindings = def
                    .type_params
                    .iter()
                    .zip(args)
                    .map(|(param, arg)| (param.name.clone(), (arg.clone(), env.clone())))
                    .collect();
                self.eval(&def.body, value, &Env(Rc::new(bindings)))
            }
            GuardExpr::Param(name) => {
                let (bound, scope) = &env.0[name];
                self.eval(bound, value, scope)
            }
            GuardExpr::Object(object) => self.object(object, value, env, false),
            GuardExpr::Placeholder(_) => matches!(value, Some(Value::Object(_))),
        }
    }

    fn object(&self, object: &ObjectGuard, value: Option<&Value>, env: &Env, partial: bool) -> bool {
        let Some(Value::Object(map)) = value else {
            return false;
        };
        object.members.iter().all(|member| {
            let key = member.name.trim_matches(|c| c == '\'' || c == '"');
            match map.get(key) {
                None => member.optional || partial,
                Some(field) => self.eval(&member.guard, Some(field), env),
            }
        })
    }
}

fn bare_helper(helper: Helper, value: Option<&Value>) -> bool {
    match helper {
        Helper::IsAny | Helper::IsUnknown => true,
        Helper::IsString => matches!(value, Some(Value::String(_))),
        Helper::IsNumber => matches!(value, Some(Value::Number(_))),
        Helper::IsBoolean => matches!(value, Some(Value::Bool(_))),
        Helper::IsNonEmptyString => matches!(value, Some(Value::String(s)) if !s.is_empty()),
        Helper::IsNonNegativeNumber => {
            value.and_then(Value::as_f64).is_some_and(|n| n >= 0.0)
        }
        Helper::IsPositiveNumber => value.and_then(Value::as_f64).is_some_and(|n| n > 0.0),
        _ => false,
    }
}

fn literal_matches(lit: &Literal, value: Option<&Value>) -> bool {
    match (lit, value) {
        (Literal::Undefined, None) => true,
        (Literal::Null, Some(Value::Null)) => true,
        (Literal::Boolean(b), Some(Value::Bool(v))) => b == v,
        (Literal::String { value: s, .. }, Some(Value::String(v))) => s == v,
        (Literal::Number(text), Some(Value::Number(n))) => {
            text.parse::<f64>().ok() == n.as_f64()
        }
        _ => false,
    }
}

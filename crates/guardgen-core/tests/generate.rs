//! End-to-end generation tests, from TypeScript source to guard files.

mod common;

use common::{Interpreter, index};
use guardgen_core::guard::{GuardExpr, Helper};
use guardgen_core::translate::union_order;
use guardgen_core::{GenerateError, Generator};
use serde_json::json;

fn code(source: &str, name: &str) -> String {
    let index = index(source);
    Generator::new(&index)
        .generate_guard_for(name, None)
        .unwrap()
        .code
}

#[test]
fn generation_is_deterministic() {
    let source = r#"
        export enum Role { Admin = 'admin', Guest = 'guest' }
        export interface User { id: number; role: Role; tags: (string | number)[]; }
        export type Lookup = Record<string, User | null>;
    "#;
    let index = index(source);
    let first = Generator::new(&index).generate_all_files(None);
    let second = Generator::new(&index).generate_all_files(None);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn multi_type_unions_are_sorted() {
    let index = index("export type Value = string | number | boolean | Date;");
    let guard = Generator::new(&index).generate_guard_for("Value", None).unwrap();
    assert_eq!(
        guard.code,
        "export const isValue = isOneOfTypes<boolean | Date | number | string>(isBoolean, isDate, isNumber, isString);"
    );

    let GuardExpr::OneOfTypes(branches) = &guard.def.body else {
        panic!("expected isOneOfTypes, got {:?}", guard.def.body);
    };
    let texts: Vec<_> = branches.iter().map(|b| b.text.as_str()).collect();
    let mut sorted = texts.clone();
    sorted.sort_by(|a, b| union_order(a, b));
    assert_eq!(texts, sorted);
}

#[test]
fn mixed_case_unions_sort_case_insensitively() {
    assert_eq!(
        code(
            "export interface Config { unionConfig: boolean | NonEmptyArray<PositiveNumber> | NonEmptyString; }",
            "Config"
        ),
        "export const isConfig = isType<Config>({\n  unionConfig: isOneOfTypes<boolean | NonEmptyArray<PositiveNumber> | NonEmptyString>(isBoolean, isNonEmptyArrayWithEachItem(isPositiveNumber), isNonEmptyString)\n});"
    );
}

#[test]
fn literal_unions_keep_declaration_order() {
    assert_eq!(
        code("export type Dir = 'up' | 'down' | 'left';", "Dir"),
        "export const isDir = isOneOf('up', 'down', 'left');"
    );
}

#[test]
fn optional_idioms() {
    assert_eq!(
        code(
            "export interface Opt { a: string | undefined; b: Date | undefined; c: string | null; }",
            "Opt"
        ),
        "export const isOpt = isType<Opt>({\n  a: isUndefinedOr(isString),\n  b: isUndefinedOr(isDate),\n  c: isNullOr(isString)\n});"
    );
}

#[test]
fn recursive_interface_round_trip() {
    let source = r#"
        export interface TreeNode {
            value: number;
            children: TreeNode[];
            parent?: TreeNode | null;
        }
    "#;
    let index = index(source);
    let generator = Generator::new(&index);
    let guard = generator.generate_guard_for("TreeNode", None).unwrap();
    assert_eq!(
        guard.code,
        "export function isTreeNode(value: unknown): value is TreeNode {\n  return isType<TreeNode>({\n    value: isNumber,\n    children: isArrayWithEachItem(isTreeNode),\n    parent: isUndefinedOr(isNullOr(isTreeNode))\n  })(value);\n}"
    );
    assert!(guard.guard_dependencies().is_empty());

    let interpreter = Interpreter::new(vec![guard]);
    let deep = json!({
        "value": 1,
        "children": [{
            "value": 2,
            "parent": null,
            "children": [{ "value": 3, "children": [] }]
        }]
    });
    assert!(interpreter.check("isTreeNode", &deep));

    let broken = json!({
        "value": 1,
        "children": [{
            "value": 2,
            "children": [{ "value": "three", "children": [] }]
        }]
    });
    assert!(!interpreter.check("isTreeNode", &broken));
}

#[test]
fn unknown_references_become_placeholders() {
    let index = index("export interface Holder { thing: ExternalThing; }");
    let guard = Generator::new(&index).generate_guard_for("Holder", None).unwrap();
    assert_eq!(
        guard.code,
        "export const isHolder = isType<Holder>({\n  thing: isType<ExternalThing>({})\n});"
    );
    assert_eq!(guard.type_dependencies(), ["Holder"]);
}

#[test]
fn record_key_type_is_ignored() {
    let source = r#"
        export enum Status { On = 'on', Off = 'off' }
        export type ByString = Record<string, number>;
        export type ByStatus = Record<Status, number>;
    "#;
    let index = index(source);
    let generator = Generator::new(&index);
    let by_string = generator.generate_guard_for("ByString", None).unwrap();
    let by_status = generator.generate_guard_for("ByStatus", None).unwrap();
    assert_eq!(by_string.code, "export const isByString = isObjectWithEachItem(isNumber);");
    assert_eq!(by_status.code, "export const isByStatus = isObjectWithEachItem(isNumber);");
    assert!(by_status.dependencies.enums.is_empty());
}

#[test]
fn index_signature_only_matches_record() {
    let index = index(
        r#"
        export interface Flags { [key: string]: boolean; }
        export type FlagMap = Record<string, boolean>;
        "#,
    );
    let generator = Generator::new(&index);
    let flags = generator.generate_guard_for("Flags", None).unwrap();
    let map = generator.generate_guard_for("FlagMap", None).unwrap();
    assert_eq!(flags.code, "export const isFlags = isObjectWithEachItem(isBoolean);");
    assert_eq!(flags.def.body, map.def.body);
}

const GENERIC_SOURCE: &str = r#"
    export interface ApiResponse<T> { data: T; status: number; }
    export interface ComplexGeneric<T> {
        items: T[];
        response: ApiResponse<T>;
        meta: Record<string, T>;
    }
    export interface User { id: number; }
    export interface UserPage { page: ComplexGeneric<User>; }
"#;

#[test]
fn generic_guards_thread_argument_guards() {
    let index = index(GENERIC_SOURCE);
    let generator = Generator::new(&index);

    let file = generator.generate_file_for("ComplexGeneric", None).unwrap();
    assert_eq!(file.file_name.to_string_lossy(), "src/isComplexGeneric.ts");
    insta::assert_snapshot!(file.content, @r"
    import type { ComplexGeneric } from './types';
    import type { TypeGuardFn } from 'guardz';
    import { isArrayWithEachItem, isObjectWithEachItem, isType } from 'guardz';
    import { isApiResponse } from './isApiResponse';

    export const isComplexGeneric = <T>(typeGuardT: TypeGuardFn<T>): TypeGuardFn<ComplexGeneric<T>> =>
      isType<ComplexGeneric<T>>({
        items: isArrayWithEachItem(typeGuardT),
        response: isApiResponse(typeGuardT),
        meta: isObjectWithEachItem(typeGuardT)
      });
    ");

    let page = generator.generate_guard_for("UserPage", None).unwrap();
    assert_eq!(
        page.code,
        "export const isUserPage = isType<UserPage>({\n  page: isComplexGeneric(isUser)\n});"
    );
    assert_eq!(page.guard_dependencies(), ["isComplexGeneric", "isUser"]);
    assert!(!page.needs_type_guard_fn());

    let interpreter = Interpreter::new(generator.generate_all_guards(None));
    let valid = json!({
        "page": {
            "items": [{ "id": 1 }],
            "response": { "data": { "id": 2 }, "status": 200 },
            "meta": { "owner": { "id": 3 } }
        }
    });
    assert!(interpreter.check("isUserPage", &valid));
    let wrong_item = json!({
        "page": {
            "items": [{ "id": "1" }],
            "response": { "data": { "id": 2 }, "status": 200 },
            "meta": {}
        }
    });
    assert!(!interpreter.check("isUserPage", &wrong_item));

    let strings = GuardExpr::Helper(Helper::IsString);
    let response = json!({ "data": "ok", "status": 200 });
    assert!(interpreter.check_with("isApiResponse", &[strings], &response));
    assert!(!interpreter.check_with(
        "isApiResponse",
        &[GuardExpr::Helper(Helper::IsNumber)],
        &response
    ));
}

#[test]
fn generic_aliases_inject_parameter_guards() {
    let source = r#"
        export type ComplexGeneric<T> = { id: number; data: T; optional?: string };
        type Maybe<T> = T | null;
        export interface Holder { maybe: Maybe<string>; }
    "#;
    let index = index(source);
    let generator = Generator::new(&index);

    let complex = generator.generate_guard_for("ComplexGeneric", None).unwrap();
    assert_eq!(
        complex.code,
        "export const isComplexGeneric = <T>(typeGuardT: TypeGuardFn<T>): TypeGuardFn<ComplexGeneric<T>> =>\n  isType<ComplexGeneric<T>>({\n    id: isNumber,\n    data: typeGuardT,\n    optional: isUndefinedOr(isString)\n  });"
    );
    assert!(complex.needs_type_guard_fn());
    assert!(complex.guard_dependencies().is_empty());

    let maybe = generator.generate_guard_for("Maybe", None).unwrap();
    assert_eq!(
        maybe.code,
        "export const isMaybe = <T>(typeGuardT: TypeGuardFn<T>): TypeGuardFn<Maybe<T>> =>\n  isNullOr(typeGuardT);"
    );
    assert!(maybe.needs_type_guard_fn());

    let holder = generator.generate_guard_for("Holder", None).unwrap();
    assert_eq!(
        holder.code,
        "export const isHolder = isType<Holder>({\n  maybe: isMaybe(isString)\n});"
    );
    assert_eq!(holder.guard_dependencies(), ["isMaybe"]);

    let interpreter = Interpreter::new(vec![complex, maybe, holder]);
    let numbers = [GuardExpr::Helper(Helper::IsNumber)];
    assert!(interpreter.check_with("isComplexGeneric", &numbers, &json!({ "id": 1, "data": 2 })));
    assert!(interpreter.check_with(
        "isComplexGeneric",
        &numbers,
        &json!({ "id": 1, "data": 2, "optional": "x" })
    ));
    assert!(!interpreter.check_with("isComplexGeneric", &numbers, &json!({ "id": 1, "data": "2" })));
    assert!(!interpreter.check_with(
        "isComplexGeneric",
        &numbers,
        &json!({ "id": 1, "data": 2, "optional": 3 })
    ));
    assert!(interpreter.check("isHolder", &json!({ "maybe": null })));
    assert!(interpreter.check("isHolder", &json!({ "maybe": "here" })));
    assert!(!interpreter.check("isHolder", &json!({ "maybe": 5 })));
}

#[test]
fn nested_interfaces_import_their_guards_once() {
    let source = r#"
        export interface Level3 { value: string; }
        export interface Level2 { level3: Level3; items: Level3[]; backup?: Level3; }
        export interface Level1 { level2: Level2; }
    "#;
    let index = index(source);
    let generator = Generator::new(&index);

    let level2 = generator.generate_guard_for("Level2", None).unwrap();
    assert_eq!(level2.guard_dependencies(), ["isLevel3"]);

    let file = generator.render_file(&level2);
    assert_eq!(file.content.matches("import { isLevel3 }").count(), 1);
    assert!(file.content.contains("import { isLevel3 } from './isLevel3';"));

    let interpreter = Interpreter::new(generator.generate_all_guards(None));
    let value = json!({
        "level2": {
            "level3": { "value": "a" },
            "items": [{ "value": "b" }]
        }
    });
    assert!(interpreter.check("isLevel1", &value));
    let missing = json!({ "level2": { "items": [] } });
    assert!(!interpreter.check("isLevel1", &missing));
}

#[test]
fn enums_are_imported_at_runtime() {
    let source = r#"
        export enum Role { Admin = 'admin', Guest = 'guest' }
        export interface Member { role: Role; owner: Role.Admin; }
    "#;
    let index = index(source);
    let generator = Generator::new(&index);
    let file = generator.generate_file_for("Member", None).unwrap();
    assert_eq!(
        file.content,
        "import type { Member } from './types';\n\
         import { Role } from './types';\n\
         import { isEnum, isEqualTo, isType } from 'guardz';\n\
         \n\
         export const isMember = isType<Member>({\n  role: isEnum(Role),\n  owner: isEqualTo(Role.Admin)\n});\n"
    );

    let interpreter = Interpreter::new(generator.generate_all_guards(None))
        .with_enum("Role", &[("Admin", json!("admin")), ("Guest", json!("guest"))]);
    assert!(interpreter.check("isMember", &json!({ "role": "guest", "owner": "admin" })));
    assert!(!interpreter.check("isMember", &json!({ "role": "owner", "owner": "admin" })));
    assert!(!interpreter.check("isMember", &json!({ "role": "guest", "owner": "guest" })));
}

#[test]
fn inherited_members_are_checked() {
    let source = r#"
        interface Entity<Id = string> { id: Id; }
        export interface Account extends Entity<number> { email: string; }
    "#;
    assert_eq!(
        code(source, "Account"),
        "export const isAccount = isType<Account>({\n  id: isNumber,\n  email: isString\n});"
    );
}

#[test]
fn custom_guard_name_applies_to_self_references() {
    let index = index("export interface Chain { next: Chain | null; }");
    let guard = Generator::new(&index)
        .generate_guard_for("Chain", Some("isLinkedChain"))
        .unwrap();
    assert_eq!(
        guard.code,
        "export function isLinkedChain(value: unknown): value is Chain {\n  return isType<Chain>({\n    next: isNullOr(isLinkedChain)\n  })(value);\n}"
    );
    let file = Generator::new(&index).render_file(&guard);
    assert_eq!(file.file_name.to_string_lossy(), "src/isLinkedChain.ts");
}

#[test]
fn missing_declarations_are_not_found() {
    let index = index("export interface A { a: string; }");
    let err = Generator::new(&index)
        .generate_guard_for("B", None)
        .unwrap_err();
    assert!(matches!(err, GenerateError::NotFound(ref name) if name == "B"));
    assert_eq!(err.to_string(), "no interface or type alias named `B` found");
}

use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::generator;
use crate::parser;
use crate::transpiler::annotations::classify;
use crate::transpiler::ast::*;
use crate::transpiler::body;
use crate::transpiler::model::*;
use crate::transpiler::types::{convert_type, lookup, StorageType};
use crate::{build_model, convert};

const WINTER: &str = r#"
function view(
    _target: any,
    _context: ClassMethodDecoratorContext
) {
    // View decorator just marks the method
}

function external(
    _target: any,
    _context: ClassMethodDecoratorContext
) {
    // External decorator just marks the method
}

class winter {
    private x: number;
    private y: number;

    constructor(initialValue: number = 0) {
        this.x = initialValue;
        this.y = initialValue;
    }

    @view
    public getX(): number {
        return this.x;
    }

    @external
    public moveX(): number {
        this.x += 1;
        return this.x;
    }

    @external
    public moveY(): number {
        this.y -= 1;
        return this.y;
    }

    @external
    public moveBoth(x: number, y: number): number {
        this.x += x;
        this.y += y;
        return this.x;
    }
}

export default winter;
"#;

fn model(source: &str) -> Result<ContractModel> {
    Ok(build_model(&parser::parse(source)?))
}

/// Parses `statements` as the body of a single method and returns it.
fn method_body(statements: &str) -> Result<Vec<Stmt>> {
    let source = format!("class T {{ m(n: number) {{ {} }} }}", statements);
    let unit = parser::parse(&source)?;
    match unit.statements.as_slice() {
        [Stmt::Class(class)] => match class.members.as_slice() {
            [ClassMember::Method(method)] => Ok(method.body.clone().unwrap_or_default()),
            _ => panic!("Expected a single method"),
        },
        _ => panic!("Expected a single class"),
    }
}

fn decorator(name: &str) -> Decorator {
    Decorator {
        name: name.to_string(),
        arguments: None,
    }
}

fn write(var: &str, value: Expression) -> Instruction {
    Instruction::Write(var.to_string(), value)
}

fn read_return(var: &str) -> Instruction {
    Instruction::ReadReturn(var.to_string())
}

fn offset(var: &str, op: ArithOp, amount: &str) -> Expression {
    Expression::Binary(
        Box::new(Expression::Read(var.to_string())),
        op,
        Box::new(Expression::Raw(amount.to_string())),
    )
}

#[test]
fn test_parse_basic_class() -> Result<()> {
    let unit = parser::parse(
        r#"
        class Counter {
            count: number;
            increment() {
                this.count += 1;
            }
        }
        "#,
    )?;
    match unit.statements.as_slice() {
        [Stmt::Class(class)] => {
            assert_eq!(class.name.as_deref(), Some("Counter"));
            assert_eq!(class.members.len(), 2);
            assert!(matches!(class.members[0], ClassMember::Property(_)));
            assert!(matches!(class.members[1], ClassMember::Method(_)));
        }
        other => panic!("Expected one class, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_parse_winter_source() -> Result<()> {
    let unit = parser::parse(WINTER)?;
    assert_eq!(unit.statements.len(), 4);
    assert!(matches!(unit.statements[0], Stmt::Function(_)));
    assert!(matches!(unit.statements[3], Stmt::ExportDefault(_)));

    let Stmt::Class(class) = &unit.statements[2] else {
        panic!("Expected class declaration");
    };
    assert!(matches!(class.members[2], ClassMember::Constructor(_)));
    let ClassMember::Method(get_x) = &class.members[3] else {
        panic!("Expected method");
    };
    assert_eq!(get_x.name, "getX");
    assert_eq!(get_x.decorators, vec![decorator("view")]);
    assert_eq!(get_x.modifiers, vec!["public".to_string()]);
    assert_eq!(get_x.return_type.as_deref(), Some("number"));
    Ok(())
}

#[test]
fn test_parse_binary_precedence() -> Result<()> {
    let body = method_body("return this.x * 2 + 1;")?;
    let [Stmt::Return(Some(value))] = body.as_slice() else {
        panic!("Expected a return statement");
    };
    assert_eq!(value.text, "this.x * 2 + 1");
    match &value.kind {
        ExprKind::Binary { lhs, op, rhs } => {
            assert_eq!(*op, BinaryOp::Add);
            assert_eq!(lhs.text, "this.x * 2");
            assert!(matches!(lhs.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
            assert_eq!(rhs.text, "1");
        }
        other => panic!("Expected binary expression, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_parse_assignment_text_is_verbatim() -> Result<()> {
    let body = method_body("this.total = this.a  +  compute(n, 2);")?;
    let [Stmt::Expression(expr)] = body.as_slice() else {
        panic!("Expected an expression statement");
    };
    match &expr.kind {
        ExprKind::Assign { target, op, value } => {
            assert_eq!(target.self_member(), Some("total"));
            assert_eq!(*op, AssignOp::Assign);
            assert_eq!(value.text, "this.a  +  compute(n, 2)");
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_parse_invalid_source() {
    let source = r#"
        class Broken {
            invalid syntax here(
        }
    "#;
    assert!(parser::parse(source).is_err());
    assert!(convert(source).is_err());
}

#[test]
fn test_type_conversion() {
    assert_eq!(convert_type("number"), StorageType::Felt252);
    assert_eq!(convert_type("string"), StorageType::Felt252);
    assert_eq!(convert_type("boolean"), StorageType::Bool);
    assert_eq!(convert_type("bigint"), StorageType::U256);
    assert_eq!(convert_type("Address"), StorageType::Felt252); // default case
    assert_eq!(convert_type("number[]"), StorageType::Felt252);

    assert_eq!(lookup("bigint"), Some(StorageType::U256));
    assert_eq!(lookup("Address"), None);
    assert_eq!(StorageType::U256.to_string(), "u256");
}

#[test]
fn test_classify_markers() {
    assert_eq!(classify(&[decorator("view")]), Visibility::View);
    assert_eq!(classify(&[decorator("external")]), Visibility::External);
    assert_eq!(classify(&[]), Visibility::External);
    assert_eq!(classify(&[decorator("memo")]), Visibility::External);
    // read-only wins regardless of order
    assert_eq!(
        classify(&[decorator("external"), decorator("view")]),
        Visibility::View
    );
}

#[test]
fn test_call_form_decorator_is_not_a_marker() -> Result<()> {
    let model = model("class C { x: number; @view() get(): number { return this.x; } }")?;
    assert_eq!(model.functions[0].name, "get");
    assert_eq!(model.functions[0].visibility, Visibility::External);
    assert_eq!(model.functions[0].body, vec![read_return("x")]);

    let call = Decorator {
        name: "view".to_string(),
        arguments: Some(Vec::new()),
    };
    assert_eq!(classify(&[call]), Visibility::External);
    Ok(())
}

#[test]
fn test_storage_matches_property_order() -> Result<()> {
    let model = model(
        r#"
        class Vault {
            public owner: string;
            private balance: bigint;
            readonly open: boolean = true;
            label;
            tags: Array<string>;
        }
        "#,
    )?;
    assert_eq!(
        model.storage,
        vec![
            StorageVariable { name: "owner".into(), ty: StorageType::Felt252 },
            StorageVariable { name: "balance".into(), ty: StorageType::U256 },
            StorageVariable { name: "open".into(), ty: StorageType::Bool },
            StorageVariable { name: "label".into(), ty: StorageType::Felt252 },
            StorageVariable { name: "tags".into(), ty: StorageType::Felt252 },
        ]
    );
    Ok(())
}

#[test]
fn test_duplicate_names_keep_first() -> Result<()> {
    let model = model(
        r#"
        class Dup {
            a: boolean;
            a: number;
            f(): number { return this.a; }
            f(): boolean { this.a = false; }
        }
        "#,
    )?;
    assert_eq!(model.storage.len(), 1);
    assert_eq!(model.storage[0].ty, StorageType::Bool);
    assert_eq!(model.functions.len(), 1);
    assert_eq!(model.functions[0].return_type, StorageType::Felt252);
    Ok(())
}

#[test]
fn test_functions_match_method_order() -> Result<()> {
    let model = model(WINTER)?;
    let names: Vec<&str> = model.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["getX", "moveX", "moveY", "moveBoth"]);
    assert_eq!(model.functions[0].visibility, Visibility::View);
    assert!(model.functions[1..]
        .iter()
        .all(|f| f.visibility == Visibility::External));
    Ok(())
}

#[test]
fn test_parameters_keep_name_and_type_only() -> Result<()> {
    let model = model("class P { set(a: number = 1, b?: boolean, c) {} }")?;
    assert_eq!(
        model.functions[0].params,
        vec![
            ContractParameter { name: "a".into(), ty: StorageType::Felt252 },
            ContractParameter { name: "b".into(), ty: StorageType::Bool },
            ContractParameter { name: "c".into(), ty: StorageType::Felt252 },
        ]
    );
    assert_eq!(model.functions[0].return_type, StorageType::Felt252);
    assert!(model.functions[0].body.is_empty());
    Ok(())
}

#[test]
fn test_view_returns_single_read() -> Result<()> {
    let body = method_body("return this.x;")?;
    assert_eq!(body::analyze_view(&body), vec![read_return("x")]);
    Ok(())
}

#[test]
fn test_view_keeps_first_field_only() -> Result<()> {
    let body = method_body("return this.y + this.x;")?;
    assert_eq!(body::state_accesses(&body), vec!["y", "x"]);
    assert_eq!(body::analyze_view(&body), vec![read_return("y")]);
    Ok(())
}

#[test]
fn test_view_without_state_access_is_empty() -> Result<()> {
    let body = method_body("return 42;")?;
    assert!(body::analyze_view(&body).is_empty());
    Ok(())
}

#[test]
fn test_compound_add() -> Result<()> {
    let body = method_body("this.x += n;")?;
    assert_eq!(
        body::analyze_external(&body),
        vec![write("x", offset("x", ArithOp::Add, "n"))]
    );
    Ok(())
}

#[test]
fn test_compound_subtract() -> Result<()> {
    let body = method_body("this.y -= 1;")?;
    assert_eq!(
        body::analyze_external(&body),
        vec![write("y", offset("y", ArithOp::Sub, "1"))]
    );
    Ok(())
}

#[test]
fn test_plain_assignments() -> Result<()> {
    let body = method_body(
        r#"
        this.a = this.b;
        this.b = 42;
        this.c = this.b + 1;
        local = this.a;
        "#,
    )?;
    assert_eq!(
        body::state_writes(&body),
        vec![
            write("a", Expression::Read("b".into())),
            write("b", Expression::Raw("42".into())),
            write("c", Expression::Raw("this.b + 1".into())),
        ]
    );
    Ok(())
}

#[test]
fn test_nested_assignment_follows_preorder() -> Result<()> {
    let body = method_body("this.a = this.b = 5;")?;
    assert_eq!(
        body::state_writes(&body),
        vec![
            write("a", Expression::Raw("this.b = 5".into())),
            write("b", Expression::Raw("5".into())),
        ]
    );
    Ok(())
}

#[test]
fn test_writes_inside_control_flow_are_flattened() -> Result<()> {
    let body = method_body(
        r#"
        if (n > 0) {
            this.x += n;
        } else {
            this.y -= n;
        }
        while (this.x > 10) this.x -= 10;
        "#,
    )?;
    assert_eq!(
        body::analyze_external(&body),
        vec![
            write("x", offset("x", ArithOp::Add, "n")),
            write("y", offset("y", ArithOp::Sub, "n")),
            write("x", offset("x", ArithOp::Sub, "10")),
        ]
    );
    Ok(())
}

#[test]
fn test_unsupported_shapes_are_dropped() -> Result<()> {
    let body = method_body("this.x *= 2; this.y++; this.z /= n; this.w ??= 1; this.v %= 3; --this.u;")?;
    assert!(body::analyze_external(&body).is_empty());
    Ok(())
}

#[test]
fn test_terminal_return_shapes() -> Result<()> {
    let cases = [
        ("return this.x;", Some(read_return("x"))),
        ("return this.x + this.y;", Some(read_return("x"))),
        ("return this.x, this.y;", Some(read_return("x"))),
        ("return n + this.x;", None),
        ("return this.x * 2 + 1;", None),
        ("return (this.x);", None),
        ("return 5;", None),
        ("return;", None),
        ("this.x += 1;", None),
        ("if (n) { return this.x; } return this.y;", Some(read_return("y"))),
        ("return this.x ?? n;", Some(read_return("x"))),
        ("return n ? this.x : this.y;", None),
        ("for (const k of ks) { return this.x; }", Some(read_return("x"))),
    ];
    for (statements, expected) in cases {
        let body = method_body(statements)?;
        assert_eq!(body::terminal_return(&body), expected, "{}", statements);
    }
    Ok(())
}

#[test]
fn test_no_class_yields_empty_module() -> Result<()> {
    let code = convert("function helper(a: number) { return a; }")?;
    let expected = [
        "#[starknet::interface]",
        "pub trait IContract<TContractState> {",
        "",
        "}",
        "",
        "#[starknet::contract]",
        "mod Contract {",
        "    use core::starknet::storage::{StoragePointerReadAccess, StoragePointerWriteAccess};",
        "",
        "    #[storage]",
        "    struct Storage {",
        "",
        "    }",
        "",
        "    #[abi(embed_v0)]",
        "    impl ContractImpl of super::IContract<ContractState> {",
        "",
        "    }",
        "}",
    ]
    .join("\n");
    assert_eq!(code, expected);
    Ok(())
}

#[test]
fn test_only_first_class_is_translated() -> Result<()> {
    let model = model(
        r#"
        class First { a: number; }
        class Second { b: boolean; run() { this.b = true; } }
        "#,
    )?;
    assert_eq!(model.name, "First");
    assert_eq!(model.storage.len(), 1);
    assert!(model.functions.is_empty());
    Ok(())
}

#[test]
fn test_anonymous_and_nested_classes() -> Result<()> {
    let anonymous = model("export default class { v: number; }")?;
    assert_eq!(anonymous.name, DEFAULT_CONTRACT_NAME);
    assert_eq!(anonymous.storage.len(), 1);

    let nested = model("function make() { if (true) { class Inner { z: bigint; } } }")?;
    assert_eq!(nested.name, "Inner");
    assert_eq!(nested.storage[0].ty, StorageType::U256);
    Ok(())
}

#[test]
fn test_end_to_end_counter() -> Result<()> {
    let code = convert(
        r#"
        export class Counter {
            x: number;

            @view
            getX(): number {
                return this.x;
            }

            @external
            inc(): number {
                this.x += 1;
                return this.x;
            }
        }
        "#,
    )?;
    let expected = r#"#[starknet::interface]
pub trait ICounter<TContractState> {
    fn getX(self: @TContractState) -> felt252;
    fn inc(ref self: TContractState) -> felt252;
}

#[starknet::contract]
mod Counter {
    use core::starknet::storage::{StoragePointerReadAccess, StoragePointerWriteAccess};

    #[storage]
    struct Storage {
        x: felt252
    }

    #[abi(embed_v0)]
    impl CounterImpl of super::ICounter<ContractState> {
        fn getX(self: @ContractState) -> felt252 {
            self.x.read()
        }

        fn inc(ref self: ContractState) -> felt252 {
            self.x.write(self.x.read() + 1);
            self.x.read()
        }
    }
}"#;
    assert_eq!(code, expected);
    Ok(())
}

#[test]
fn test_winter_module() -> Result<()> {
    let code = convert(WINTER)?;
    let expected = r#"#[starknet::interface]
pub trait Iwinter<TContractState> {
    fn getX(self: @TContractState) -> felt252;
    fn moveX(ref self: TContractState) -> felt252;
    fn moveY(ref self: TContractState) -> felt252;
    fn moveBoth(ref self: TContractState, x: felt252, y: felt252) -> felt252;
}

#[starknet::contract]
mod winter {
    use core::starknet::storage::{StoragePointerReadAccess, StoragePointerWriteAccess};

    #[storage]
    struct Storage {
        x: felt252,
        y: felt252
    }

    #[abi(embed_v0)]
    impl winterImpl of super::Iwinter<ContractState> {
        fn getX(self: @ContractState) -> felt252 {
            self.x.read()
        }

        fn moveX(ref self: ContractState) -> felt252 {
            self.x.write(self.x.read() + 1);
            self.x.read()
        }

        fn moveY(ref self: ContractState) -> felt252 {
            self.y.write(self.y.read() - 1);
            self.y.read()
        }

        fn moveBoth(ref self: ContractState, x: felt252, y: felt252) -> felt252 {
            self.x.write(self.x.read() + x);
            self.y.write(self.y.read() + y);
            self.x.read()
        }
    }
}"#;
    assert_eq!(code, expected);
    Ok(())
}

#[test]
fn test_conversion_is_idempotent() -> Result<()> {
    assert_eq!(convert(WINTER)?, convert(WINTER)?);
    Ok(())
}

#[test]
fn test_unmapped_type_still_emitted() -> Result<()> {
    let code = convert("class Registry { owner: Address; count: number; }")?;
    assert!(code.contains("        owner: felt252,\n        count: felt252\n"));
    Ok(())
}

#[test]
fn test_generate_from_model() {
    let contract = ContractModel {
        name: "Flags".to_string(),
        storage: vec![StorageVariable {
            name: "on".to_string(),
            ty: StorageType::Bool,
        }],
        functions: vec![ContractFunction {
            name: "set".to_string(),
            params: vec![ContractParameter {
                name: "value".to_string(),
                ty: StorageType::Bool,
            }],
            return_type: StorageType::Bool,
            visibility: Visibility::External,
            body: vec![
                write("on", Expression::Raw("value".into())),
                read_return("on"),
            ],
        }],
    };

    let code = generator::generate(contract);
    assert!(code.contains("    fn set(ref self: TContractState, value: bool) -> bool;"));
    assert!(code.contains("        on: bool\n"));
    assert!(code.contains(
        "        fn set(ref self: ContractState, value: bool) -> bool {\n            self.on.write(value);\n            self.on.read()\n        }"
    ));
}

#[test]
fn test_both_markers_emit_view_signature() -> Result<()> {
    let code = convert("class B { x: number; @external @view peek() { return this.x; } }")?;
    assert!(code.contains("    fn peek(self: @TContractState) -> felt252;"));
    assert!(code.contains("        fn peek(self: @ContractState) -> felt252 {\n            self.x.read()\n        }"));
    Ok(())
}

#[test]
fn test_template_rendering() {
    let template = "mod {{Caironame}};\n// {{Caironame}} entry\n";
    assert_eq!(
        generator::render_template(template, "winter"),
        "mod winter;\n// winter entry\n"
    );
    assert_eq!(generator::default_lib("winter"), "mod winter;\n");

    let deploy = r#"getCompiledCode("contract_{{Caironame}}");"#;
    assert_eq!(
        generator::render_template(deploy, "winter"),
        r#"getCompiledCode("contract_winter");"#
    );
}

#[test]
fn test_for_loop_writes_are_flattened() -> Result<()> {
    let model = model(
        "class C { x: number; @external f(n: number): number { for (let i = 0; i < n; i++) { this.x += 1; } return this.x; } }",
    )?;
    assert_eq!(
        model.functions[0].body,
        vec![write("x", offset("x", ArithOp::Add, "1")), read_return("x")]
    );
    Ok(())
}

#[test]
fn test_throw_guard_keeps_following_writes() -> Result<()> {
    let code = convert(
        r#"
        class Vault {
            funds: number;
            @external
            withdraw(n: number): number {
                if (n > this.funds) {
                    throw new Error("insufficient funds");
                }
                this.funds -= n;
                return this.funds;
            }
        }
        "#,
    )?;
    assert!(code.contains(
        "        fn withdraw(ref self: ContractState, n: felt252) -> felt252 {\n            self.funds.write(self.funds.read() - n);\n            self.funds.read()\n        }"
    ));
    Ok(())
}

#[test]
fn test_loop_and_switch_bodies_keep_source_order() -> Result<()> {
    let body = method_body(
        r#"
        for (const item of items) {
            this.total += item;
        }
        switch (n) {
            case 0:
                this.mode = "idle";
                break;
            default:
                this.mode = n;
        }
        do {
            this.count -= 1;
        } while (this.count > 0);
        items.forEach((item) => {
            this.last = item;
        });
        "#,
    )?;
    assert_eq!(
        body::state_writes(&body),
        vec![
            write("total", offset("total", ArithOp::Add, "item")),
            write("mode", Expression::Raw("\"idle\"".into())),
            write("mode", Expression::Raw("n".into())),
            write("count", offset("count", ArithOp::Sub, "1")),
            write("last", Expression::Raw("item".into())),
        ]
    );
    Ok(())
}

#[test]
fn test_parse_loop_statements() -> Result<()> {
    let body = method_body("for (let i = 0, j = n; i < j; i++) {} for (const k in this.map) continue;")?;
    let [Stmt::For { init, condition, update, .. }, Stmt::ForEach { binding, kind, iterable, body }] =
        body.as_slice()
    else {
        panic!("Expected two loops, got {:?}", body);
    };
    match init {
        Some(ForInit::Variable(declarators)) => {
            let names: Vec<&str> = declarators.iter().map(|d| d.name.as_str()).collect();
            assert_eq!(names, vec!["i", "j"]);
        }
        other => panic!("Expected variable initializer, got {:?}", other),
    }
    assert_eq!(condition.as_ref().map(|c| c.text.as_str()), Some("i < j"));
    assert_eq!(update.as_ref().map(|u| u.text.as_str()), Some("i++"));
    assert_eq!(binding, "k");
    assert_eq!(*kind, ForEachKind::In);
    assert_eq!(iterable.self_member(), Some("map"));
    assert_eq!(**body, Stmt::Continue);
    Ok(())
}

#[test]
fn test_parse_optional_chain_and_coalesce() -> Result<()> {
    let body = method_body("return this.cache?.get(n) ?? this.fallback;")?;
    let [Stmt::Return(Some(value))] = body.as_slice() else {
        panic!("Expected a return statement");
    };
    let ExprKind::Binary { lhs, op, rhs } = &value.kind else {
        panic!("Expected binary expression, got {:?}", value.kind);
    };
    assert_eq!(*op, BinaryOp::Coalesce);
    assert_eq!(lhs.text, "this.cache?.get(n)");
    assert_eq!(rhs.self_member(), Some("fallback"));
    match &lhs.kind {
        ExprKind::Call { callee, optional, .. } => {
            assert!(!optional);
            assert!(matches!(callee.kind, ExprKind::Member { optional: true, .. }));
        }
        other => panic!("Expected call, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_common_typescript_forms_convert() -> Result<()> {
    let source = r#"
        import { Account } from "starknet";
        import * as fs from "fs";

        interface Ledger<T> extends Base {
            balance(): T;
        }

        type Handler = (amount: number) => void;

        enum Mode { Open, Closed }

        export abstract class Vault<T extends object = {}> extends Base implements Ledger<bigint>, Other {
            private readonly owner: string;
            balance: bigint = 0n;
            limits: Record<string, number> = {};
            mode?: Mode;

            constructor(owner: string) {
                super();
                this.owner = owner;
            }

            get total(): bigint {
                return this.balance;
            }

            @view
            peek<K extends keyof T>(key?: K): bigint {
                return this.balance;
            }

            @external
            deposit(amount: bigint, memo?: string): bigint {
                if (typeof memo !== "string" || memo?.length === 0) {
                    throw new Error(`bad memo ${memo}`);
                }
                const fee = this.limits["fee"] ?? 0;
                const log = (x: number): void => console.log({ amount, fee, x, ...this.limits });
                for (const key of Object.keys(this.limits)) {
                    log(this.limits[key]!);
                }
                switch (this.mode) {
                    case Mode.Closed:
                        return this.balance;
                    default:
                        break;
                }
                try {
                    this.balance += amount;
                } catch (e: unknown) {
                    this.balance = 0n;
                } finally {
                    log(1);
                }
                let i = 0;
                do { i++; } while (i < 3);
                const ok = amount > 0n ? true : false;
                return (this.balance as bigint);
            }
        }

        export { Vault };
    "#;

    let model = model(source)?;
    assert_eq!(model.name, "Vault");
    let storage: Vec<(&str, StorageType)> = model
        .storage
        .iter()
        .map(|var| (var.name.as_str(), var.ty))
        .collect();
    assert_eq!(
        storage,
        vec![
            ("owner", StorageType::Felt252),
            ("balance", StorageType::U256),
            ("limits", StorageType::Felt252),
            ("mode", StorageType::Felt252),
        ]
    );

    let [peek, deposit] = model.functions.as_slice() else {
        panic!("Expected two functions, got {:?}", model.functions);
    };
    assert_eq!(peek.visibility, Visibility::View);
    assert_eq!(peek.body, vec![read_return("balance")]);
    assert_eq!(deposit.visibility, Visibility::External);
    assert_eq!(
        deposit.params,
        vec![
            ContractParameter { name: "amount".into(), ty: StorageType::U256 },
            ContractParameter { name: "memo".into(), ty: StorageType::Felt252 },
        ]
    );
    assert_eq!(
        deposit.body,
        vec![
            write("balance", offset("balance", ArithOp::Add, "amount")),
            write("balance", Expression::Raw("0n".into())),
        ]
    );

    assert!(convert(source).is_ok());
    Ok(())
}

#[test]
fn test_object_literal_is_copied_verbatim() -> Result<()> {
    let body = method_body("this.config = { limit: n, tags: [n, ...rest], nested: { on: true } } ;")?;
    assert_eq!(
        body::state_writes(&body),
        vec![write(
            "config",
            Expression::Raw("{ limit: n, tags: [n, ...rest], nested: { on: true } }".into())
        )]
    );
    Ok(())
}

#[test]
fn test_accessors_are_not_storage_or_functions() -> Result<()> {
    let source = r#"
        class C {
            x: number;
            get value(): number { return this.x; }
            set value(v: number) { this.x = v; }
            get(): number { return this.x; }
        }
    "#;
    let unit = parser::parse(source)?;
    let [Stmt::Class(class)] = unit.statements.as_slice() else {
        panic!("Expected one class");
    };
    assert!(matches!(
        &class.members[1],
        ClassMember::Accessor(AccessorDecl { kind: AccessorKind::Get, name, .. }) if name == "value"
    ));
    assert!(matches!(
        &class.members[2],
        ClassMember::Accessor(AccessorDecl { kind: AccessorKind::Set, .. })
    ));

    let model = build_model(&unit);
    let storage: Vec<&str> = model.storage.iter().map(|var| var.name.as_str()).collect();
    assert_eq!(storage, vec!["x"]);
    let functions: Vec<&str> = model.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(functions, vec!["get"]);
    Ok(())
}

#[test]
fn test_modifier_words_as_member_names() -> Result<()> {
    let model = model(
        r#"
        class C {
            public: number;
            static: boolean;
            readonly readonly: bigint;
            private get: number;
            @view
            static(): boolean { return this.static; }
        }
        "#,
    )?;
    let storage: Vec<(&str, StorageType)> = model
        .storage
        .iter()
        .map(|var| (var.name.as_str(), var.ty))
        .collect();
    assert_eq!(
        storage,
        vec![
            ("public", StorageType::Felt252),
            ("static", StorageType::Bool),
            ("readonly", StorageType::U256),
            ("get", StorageType::Felt252),
        ]
    );
    assert_eq!(model.functions[0].name, "static");
    assert_eq!(model.functions[0].visibility, Visibility::View);
    assert_eq!(model.functions[0].body, vec![read_return("static")]);
    Ok(())
}

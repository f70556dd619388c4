//! Whole-artifact emission: struct declarations and impl blocks.
//!
//! One artifact per descriptor file. Every message becomes a struct whose
//! capacity parameters are const generics in planner order, followed by an
//! impl carrying `decode`, `size` and `encode`.
use crate::codegen::ast::Stmt;
use crate::codegen::decode::decode_fn;
use crate::codegen::encode::{encode_fn, size_fn};
use crate::codegen::printer::render;
use crate::plan::{FieldPlan, MessagePlan, Storage};
use crate::schema::ScalarKind;

pub fn emit_file(source_name: &str, plans: &[MessagePlan]) -> String {
    let mut stmts = vec![
        Stmt::line(format!(
            "// @generated by proto-static from {source_name}; do not edit."
        )),
        Stmt::Blank,
        Stmt::line("use proto_static::rt::{self, Reader, Writer};"),
    ];
    for plan in plans {
        stmts.push(Stmt::Blank);
        stmts.extend(struct_decl(plan));
        stmts.push(Stmt::Blank);
        stmts.push(impl_block(plan));
    }
    render(&stmts)
}

fn struct_decl(plan: &MessagePlan) -> Vec<Stmt> {
    let derive = Stmt::line("#[derive(Debug, Default, Clone, PartialEq)]");
    if plan.fields.is_empty() {
        return vec![derive, Stmt::line(format!("pub struct {};", plan.name))];
    }
    let head = format!("pub struct {}{} {{", plan.name, generic_decls(plan));
    let body = plan
        .fields
        .iter()
        .map(|f| Stmt::line(format!("pub {}: {},", f.name, member_type(f))))
        .collect();
    vec![derive, Stmt::block(head, body)]
}

fn impl_block(plan: &MessagePlan) -> Stmt {
    let head = if plan.params.is_empty() {
        format!("impl {} {{", plan.name)
    } else {
        format!(
            "impl{} {}<{}> {{",
            generic_decls(plan),
            plan.name,
            param_names(plan).join(", ")
        )
    };
    Stmt::block(
        head,
        vec![
            decode_fn(plan),
            Stmt::Blank,
            size_fn(plan),
            Stmt::Blank,
            encode_fn(plan),
        ],
    )
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn generic_decls(plan: &MessagePlan) -> String {
    if plan.params.is_empty() {
        return String::new();
    }
    let decls: Vec<String> = plan
        .params
        .iter()
        .map(|p| format!("const {}: usize", p.name))
        .collect();
    format!("<{}>", decls.join(", "))
}

fn param_names(plan: &MessagePlan) -> Vec<&str> {
    plan.params.iter().map(|p| p.name.as_str()).collect()
}

/// Member type of one field, wrappers applied outside-in: repeated wraps
/// the base in `FixedVec`, explicit presence wraps it in `Option`.
fn member_type(f: &FieldPlan) -> String {
    let base = match &f.storage {
        Storage::Scalar(kind) => scalar_rust_type(*kind).to_string(),
        Storage::Str { param } => format!("rt::FixedString<{param}>"),
        Storage::Bytes { param } => format!("rt::FixedBytes<{param}>"),
        Storage::Message { type_name, args } => {
            if args.is_empty() {
                type_name.clone()
            } else {
                format!("{type_name}<{}>", args.join(", "))
            }
        }
    };
    if let Some(count) = &f.count_param {
        format!("rt::FixedVec<{base}, {count}>")
    } else if f.optional {
        format!("Option<{base}>")
    } else {
        base
    }
}

fn scalar_rust_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "bool",
        ScalarKind::Int32 | ScalarKind::Sint32 | ScalarKind::Sfixed32 | ScalarKind::Enum => "i32",
        ScalarKind::Uint32 | ScalarKind::Fixed32 => "u32",
        ScalarKind::Int64 | ScalarKind::Sint64 | ScalarKind::Sfixed64 => "i64",
        ScalarKind::Uint64 | ScalarKind::Fixed64 => "u64",
        ScalarKind::Float => "f32",
        ScalarKind::Double => "f64",
        ScalarKind::String | ScalarKind::Bytes => {
            unreachable!("string/bytes are planned as LEN storage")
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

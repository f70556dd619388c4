//! Size and encode routine generation.
//!
//! Both routines walk the fields in declaration order behind identical
//! presence guards, so the byte count `size()` reports is exactly what
//! `encode()` writes. Field headers are folded to varint literals at
//! generation time.
use crate::codegen::ast::Stmt;
use crate::plan::{FieldPlan, MessagePlan, Storage};
use crate::rt::uvar_size;
use crate::schema::ScalarKind;
use crate::wire::{field_key, WireType};

pub fn size_fn(plan: &MessagePlan) -> Stmt {
    if plan.fields.is_empty() {
        return Stmt::block("pub fn size(&self) -> usize {", vec![Stmt::line("0")]);
    }
    let mut body = vec![Stmt::line("let mut size = 0;")];
    for f in &plan.fields {
        body.push(guarded(f, size_field(f)));
    }
    body.push(Stmt::line("size"));
    Stmt::block("pub fn size(&self) -> usize {", body)
}

pub fn encode_fn(plan: &MessagePlan) -> Stmt {
    if plan.fields.is_empty() {
        return Stmt::line("pub fn encode(&self, _w: &mut Writer<'_>) {}");
    }
    let mut body = Vec::new();
    for f in &plan.fields {
        body.push(guarded(f, encode_field(f)));
    }
    Stmt::block("pub fn encode(&self, w: &mut Writer<'_>) {", body)
}

/// Wraps a field body in its presence guard. Repeated fields and
/// implicit-presence fields test emptiness or the default value;
/// explicit-presence fields destructure the `Option`.
fn guarded(f: &FieldPlan, body: Vec<Stmt>) -> Stmt {
    let name = &f.name;
    if f.repeated() {
        return Stmt::block(format!("if !self.{name}.is_empty() {{"), body);
    }
    if f.optional {
        let head = match &f.storage {
            Storage::Scalar(_) => format!("if let Some(v) = self.{name} {{"),
            _ => format!("if let Some(v) = &self.{name} {{"),
        };
        return Stmt::block(head, body);
    }
    let head = match &f.storage {
        Storage::Scalar(ScalarKind::Bool) => format!("if self.{name} {{"),
        Storage::Scalar(ScalarKind::Float | ScalarKind::Double) => {
            format!("if self.{name} != 0.0 {{")
        }
        Storage::Scalar(_) => format!("if self.{name} != 0 {{"),
        Storage::Str { .. } | Storage::Bytes { .. } => {
            format!("if !self.{name}.is_empty() {{")
        }
        Storage::Message { .. } => {
            unreachable!("singular message fields always carry explicit presence")
        }
    };
    Stmt::block(head, body)
}

/// Size in bytes of the field header, folded at generation time.
fn header_size(f: &FieldPlan) -> usize {
    uvar_size(u64::from(field_key(f.tag, header_wire(f))))
}

/// Varint literal for the field header.
fn header_key(f: &FieldPlan) -> u32 {
    field_key(f.tag, header_wire(f))
}

// Repeated scalars go packed, so their header carries the LEN wire type.
fn header_wire(f: &FieldPlan) -> WireType {
    if f.repeated() {
        WireType::Len
    } else {
        f.wire()
    }
}

fn size_field(f: &FieldPlan) -> Vec<Stmt> {
    let name = &f.name;
    let hdr = header_size(f);
    if f.repeated() {
        return match &f.storage {
            Storage::Scalar(_) if f.wire() == WireType::I32 => packed_fixed_size(f, hdr, 4),
            Storage::Scalar(_) if f.wire() == WireType::I64 => packed_fixed_size(f, hdr, 8),
            Storage::Scalar(kind) => {
                let elem = value_size_expr(*kind, "*v");
                vec![
                    Stmt::line("let mut s = 0;"),
                    Stmt::block(
                        format!("for v in self.{name}.iter() {{"),
                        vec![Stmt::line(format!("s += {elem};"))],
                    ),
                    Stmt::line(format!("size += {hdr} + rt::uvar_size(s as u64) + s;")),
                ]
            }
            Storage::Str { .. } | Storage::Bytes { .. } => vec![Stmt::block(
                format!("for v in self.{name}.iter() {{"),
                vec![Stmt::line(format!(
                    "size += {hdr} + rt::uvar_size(v.len() as u64) + v.len();"
                ))],
            )],
            Storage::Message { .. } => vec![Stmt::block(
                format!("for v in self.{name}.iter() {{"),
                vec![
                    Stmt::line("let n = v.size();"),
                    Stmt::line(format!("size += {hdr} + rt::uvar_size(n as u64) + n;")),
                ],
            )],
        };
    }
    let operand = if f.optional {
        "v".to_string()
    } else {
        format!("self.{name}")
    };
    match &f.storage {
        Storage::Scalar(kind) => match f.wire() {
            WireType::I32 => vec![Stmt::line(format!("size += {hdr} + 4;"))],
            WireType::I64 => vec![Stmt::line(format!("size += {hdr} + 8;"))],
            _ => vec![Stmt::line(format!(
                "size += {hdr} + {};",
                value_size_expr(*kind, &operand)
            ))],
        },
        Storage::Str { .. } | Storage::Bytes { .. } => vec![Stmt::line(format!(
            "size += {hdr} + rt::uvar_size({operand}.len() as u64) + {operand}.len();"
        ))],
        Storage::Message { .. } => vec![
            Stmt::line(format!("let n = {operand}.size();")),
            Stmt::line(format!("size += {hdr} + rt::uvar_size(n as u64) + n;")),
        ],
    }
}

fn packed_fixed_size(f: &FieldPlan, hdr: usize, width: usize) -> Vec<Stmt> {
    vec![
        Stmt::line(format!("let s = self.{}.len() * {width};", f.name)),
        Stmt::line(format!("size += {hdr} + rt::uvar_size(s as u64) + s;")),
    ]
}

fn encode_field(f: &FieldPlan) -> Vec<Stmt> {
    let name = &f.name;
    let key = header_key(f);
    if f.repeated() {
        return match &f.storage {
            Storage::Scalar(kind) if f.wire() == WireType::I32 => {
                packed_fixed_encode(f, *kind, key, 4)
            }
            Storage::Scalar(kind) if f.wire() == WireType::I64 => {
                packed_fixed_encode(f, *kind, key, 8)
            }
            Storage::Scalar(kind) => {
                let elem = value_size_expr(*kind, "*v");
                vec![
                    Stmt::line("let mut s = 0;"),
                    Stmt::block(
                        format!("for v in self.{name}.iter() {{"),
                        vec![Stmt::line(format!("s += {elem};"))],
                    ),
                    Stmt::line(format!("w.uvar({key});")),
                    Stmt::line("w.uvar(s as u64);"),
                    Stmt::block(
                        format!("for v in self.{name}.iter() {{"),
                        vec![Stmt::line(write_stmt(*kind, "*v"))],
                    ),
                ]
            }
            Storage::Str { .. } => vec![Stmt::block(
                format!("for v in self.{name}.iter() {{"),
                vec![
                    Stmt::line(format!("w.uvar({key});")),
                    Stmt::line("w.uvar(v.len() as u64);"),
                    Stmt::line("w.bytes(v.as_bytes());"),
                ],
            )],
            Storage::Bytes { .. } => vec![Stmt::block(
                format!("for v in self.{name}.iter() {{"),
                vec![
                    Stmt::line(format!("w.uvar({key});")),
                    Stmt::line("w.uvar(v.len() as u64);"),
                    Stmt::line("w.bytes(v.as_slice());"),
                ],
            )],
            Storage::Message { .. } => vec![Stmt::block(
                format!("for v in self.{name}.iter() {{"),
                vec![
                    Stmt::line(format!("w.uvar({key});")),
                    Stmt::line("w.uvar(v.size() as u64);"),
                    Stmt::line("v.encode(w);"),
                ],
            )],
        };
    }
    let operand = if f.optional {
        "v".to_string()
    } else {
        format!("self.{name}")
    };
    match &f.storage {
        Storage::Scalar(kind) => vec![
            Stmt::line(format!("w.uvar({key});")),
            Stmt::line(write_stmt(*kind, &operand)),
        ],
        Storage::Str { .. } => vec![
            Stmt::line(format!("w.uvar({key});")),
            Stmt::line(format!("w.uvar({operand}.len() as u64);")),
            Stmt::line(format!("w.bytes({operand}.as_bytes());")),
        ],
        Storage::Bytes { .. } => vec![
            Stmt::line(format!("w.uvar({key});")),
            Stmt::line(format!("w.uvar({operand}.len() as u64);")),
            Stmt::line(format!("w.bytes({operand}.as_slice());")),
        ],
        Storage::Message { .. } => vec![
            Stmt::line(format!("w.uvar({key});")),
            Stmt::line(format!("w.uvar({operand}.size() as u64);")),
            Stmt::line(format!("{operand}.encode(w);")),
        ],
    }
}

fn packed_fixed_encode(f: &FieldPlan, kind: ScalarKind, key: u32, width: usize) -> Vec<Stmt> {
    let name = &f.name;
    vec![
        Stmt::line(format!("w.uvar({key});")),
        Stmt::line(format!("w.uvar((self.{name}.len() * {width}) as u64);")),
        Stmt::block(
            format!("for v in self.{name}.iter() {{"),
            vec![Stmt::line(write_stmt(kind, "*v"))],
        ),
    ]
}

/// Encoded size of one varint-family value. Negative `int32` widens
/// through `u32` so it costs the same ten bytes the wire carries.
fn value_size_expr(kind: ScalarKind, operand: &str) -> String {
    match kind {
        ScalarKind::Bool => format!("rt::uvar_size({operand} as u64)"),
        ScalarKind::Int32 | ScalarKind::Enum => {
            format!("rt::uvar_size({operand} as u32 as u64)")
        }
        ScalarKind::Uint32 | ScalarKind::Int64 => format!("rt::uvar_size({operand} as u64)"),
        ScalarKind::Uint64 => format!("rt::uvar_size({operand})"),
        ScalarKind::Sint32 => format!("rt::ivar_size32({operand})"),
        ScalarKind::Sint64 => format!("rt::ivar_size64({operand})"),
        _ => unreachable!("fixed-width and LEN kinds never take the varint path"),
    }
}

fn write_stmt(kind: ScalarKind, operand: &str) -> String {
    match kind {
        ScalarKind::Bool => format!("w.byte({operand} as u8);"),
        ScalarKind::Int32 | ScalarKind::Enum => format!("w.uvar({operand} as u32 as u64);"),
        ScalarKind::Uint32 | ScalarKind::Int64 => format!("w.uvar({operand} as u64);"),
        ScalarKind::Uint64 => format!("w.uvar({operand});"),
        ScalarKind::Sint32 => format!("w.ivar32({operand});"),
        ScalarKind::Sint64 => format!("w.ivar64({operand});"),
        ScalarKind::Fixed32 => format!("w.u32_le({operand});"),
        ScalarKind::Sfixed32 => format!("w.i32_le({operand});"),
        ScalarKind::Float => format!("w.f32_le({operand});"),
        ScalarKind::Fixed64 => format!("w.u64_le({operand});"),
        ScalarKind::Sfixed64 => format!("w.i64_le({operand});"),
        ScalarKind::Double => format!("w.f64_le({operand});"),
        ScalarKind::String | ScalarKind::Bytes => {
            unreachable!("string/bytes are planned as LEN storage")
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

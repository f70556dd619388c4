//! Decode-routine generation: the two-level dispatch state machine.
//!
//! Outer match on the wire type in the fixed order 5, 1, 0, 2 with a
//! default `return` (end of message, not an error); inner match on the
//! field tag over the fields declared with that wire type. Unknown or
//! mismatched fields skip their raw payload. The LEN arm computes a
//! clamped scan boundary once and restores it unconditionally, so a
//! malformed length can never desynchronize the cursor.
use crate::codegen::ast::Stmt;
use crate::plan::{FieldPlan, MessagePlan, Storage};
use crate::schema::ScalarKind;
use crate::wire::WireType;

pub fn decode_fn(plan: &MessagePlan) -> Stmt {
    let mut loop_body = vec![Stmt::line("let key = r.uvar();")];
    if !plan.fields.is_empty() {
        loop_body.push(Stmt::line("let field = (key >> 3) as u32;"));
    }
    let arms = vec![
        scalar_arm(plan, WireType::I32, "5 => {", "r.skip(4);"),
        scalar_arm(plan, WireType::I64, "1 => {", "r.skip(8);"),
        scalar_arm(plan, WireType::Varint, "0 => {", "r.uvar();"),
        len_arm(plan),
        Stmt::block("_ => {", vec![Stmt::line("return;")]),
    ];
    loop_body.push(Stmt::block("match key & 7 {", arms));
    Stmt::block(
        "pub fn decode(&mut self, r: &mut Reader<'_>) {",
        vec![Stmt::block("while !r.at_end() {", loop_body)],
    )
}

/// One non-LEN wire arm: dispatch over the singular fields of that wire
/// type, or a bare payload skip when the message declares none.
fn scalar_arm(plan: &MessagePlan, wire: WireType, head: &str, skip: &str) -> Stmt {
    let singular: Vec<&FieldPlan> = plan
        .fields
        .iter()
        .filter(|f| !f.repeated() && f.wire() == wire)
        .collect();
    if singular.is_empty() {
        return Stmt::block(head, vec![Stmt::line(skip)]);
    }
    let mut arms = Vec::new();
    for f in singular {
        arms.push(Stmt::block(
            format!("{} => {{", f.tag),
            vec![Stmt::line(read_assign(f))],
        ));
    }
    arms.push(Stmt::block("_ => {", vec![Stmt::line(skip)]));
    Stmt::block(head, vec![Stmt::block("match field {", arms)])
}

fn len_arm(plan: &MessagePlan) -> Stmt {
    let dispatch: Vec<&FieldPlan> = plan
        .fields
        .iter()
        .filter(|f| f.repeated() || f.wire() == WireType::Len)
        .collect();
    if dispatch.is_empty() {
        return Stmt::block(
            "2 => {",
            vec![
                Stmt::line("let len = r.uvar() as usize;"),
                Stmt::line("r.skip(len);"),
            ],
        );
    }
    let mut arms = Vec::new();
    for f in dispatch {
        arms.push(Stmt::block(format!("{} => {{", f.tag), len_field(f)));
    }
    arms.push(Stmt::line("_ => {}"));
    Stmt::block(
        "2 => {",
        vec![
            Stmt::line("let len = r.uvar() as usize;"),
            Stmt::line("let end = r.mark(len);"),
            Stmt::block("match field {", arms),
            Stmt::line("r.seek(end);"),
        ],
    )
}

/// Body of one tag arm inside the LEN dispatch.
fn len_field(f: &FieldPlan) -> Vec<Stmt> {
    let name = &f.name;
    if f.repeated() {
        return match &f.storage {
            // Packed fixed-width: element count comes from the length.
            Storage::Scalar(kind) if f.wire() == WireType::I32 => packed_fixed(f, *kind, 4),
            Storage::Scalar(kind) if f.wire() == WireType::I64 => packed_fixed(f, *kind, 8),
            // Packed varints: element by element up to the boundary.
            Storage::Scalar(kind) => vec![Stmt::block(
                format!("while !r.done(end) && !self.{name}.is_full() {{"),
                vec![Stmt::line(format!("self.{name}.push({});", read_expr(*kind)))],
            )],
            // One element per tag occurrence; over capacity drops it whole.
            Storage::Str { .. } => vec![Stmt::block(
                format!("if !self.{name}.is_full() {{"),
                vec![
                    Stmt::line("let mut v = rt::FixedString::new();"),
                    Stmt::line("r.read_str(len, &mut v);"),
                    Stmt::line(format!("self.{name}.push(v);")),
                ],
            )],
            Storage::Bytes { .. } => vec![Stmt::block(
                format!("if !self.{name}.is_full() {{"),
                vec![
                    Stmt::line("let mut v = rt::FixedBytes::new();"),
                    Stmt::line("r.read_bytes(len, &mut v);"),
                    Stmt::line(format!("self.{name}.push(v);")),
                ],
            )],
            Storage::Message { type_name, .. } => vec![Stmt::block(
                format!("if !self.{name}.is_full() {{"),
                vec![
                    Stmt::line(format!("let mut v = {type_name}::default();")),
                    Stmt::line("v.decode(&mut r.sub(len));"),
                    Stmt::line(format!("self.{name}.push(v);")),
                ],
            )],
        };
    }
    match &f.storage {
        Storage::Str { .. } if f.optional => vec![
            Stmt::line(format!("let v = self.{name}.insert(rt::FixedString::new());")),
            Stmt::line("r.read_str(len, v);"),
        ],
        Storage::Str { .. } => vec![Stmt::line(format!("r.read_str(len, &mut self.{name});"))],
        Storage::Bytes { .. } if f.optional => vec![
            Stmt::line(format!("let v = self.{name}.insert(rt::FixedBytes::new());")),
            Stmt::line("r.read_bytes(len, v);"),
        ],
        Storage::Bytes { .. } => vec![Stmt::line(format!("r.read_bytes(len, &mut self.{name});"))],
        Storage::Message { type_name, .. } => vec![
            Stmt::line(format!("let v = self.{name}.insert({type_name}::default());")),
            Stmt::line("v.decode(&mut r.sub(len));"),
        ],
        Storage::Scalar(_) => unreachable!("non-LEN scalars never reach the LEN dispatch"),
    }
}

fn packed_fixed(f: &FieldPlan, kind: ScalarKind, width: usize) -> Vec<Stmt> {
    let name = &f.name;
    vec![Stmt::block(
        format!("for _ in 0..len / {width} {{"),
        vec![
            Stmt::block(
                format!("if self.{name}.is_full() {{"),
                vec![Stmt::line("break;")],
            ),
            Stmt::line(format!("self.{name}.push({});", read_expr(kind))),
        ],
    )]
}

fn read_assign(f: &FieldPlan) -> String {
    let Storage::Scalar(kind) = &f.storage else {
        unreachable!("LEN-backed fields never reach a scalar arm");
    };
    let expr = read_expr(*kind);
    if f.optional {
        format!("self.{} = Some({expr});", f.name)
    } else {
        format!("self.{} = {expr};", f.name)
    }
}

/// Reader expression producing one value of the scalar kind.
fn read_expr(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "r.uvar() != 0",
        ScalarKind::Int32 | ScalarKind::Enum => "r.uvar() as i32",
        ScalarKind::Uint32 => "r.uvar() as u32",
        ScalarKind::Int64 => "r.uvar() as i64",
        ScalarKind::Uint64 => "r.uvar()",
        ScalarKind::Sint32 => "r.ivar32()",
        ScalarKind::Sint64 => "r.ivar64()",
        ScalarKind::Fixed32 => "r.u32_le()",
        ScalarKind::Sfixed32 => "r.i32_le()",
        ScalarKind::Float => "r.f32_le()",
        ScalarKind::Fixed64 => "r.u64_le()",
        ScalarKind::Sfixed64 => "r.i64_le()",
        ScalarKind::Double => "r.f64_le()",
        ScalarKind::String | ScalarKind::Bytes => {
            unreachable!("string/bytes are planned as LEN storage")
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod test {
    use super::*;
    use crate::codegen::printer::render;
    use crate::plan::plan_message;
    use crate::schema::parse_schema;

    fn render_decode(src: &str, root: &str) -> String {
        let schema = parse_schema(src).unwrap();
        let index = schema.index();
        let message = schema.messages.iter().find(|m| m.name == root).unwrap();
        let plan = plan_message(&index, message).unwrap();
        render(&[decode_fn(&plan)])
    }

    #[test]
    fn bare_skips_when_no_field_uses_a_wire_type() {
        let out = render_decode(
            r#"{
                "version": 1,
                "messages": [{
                    "name": "Counter",
                    "fields": [{ "name": "n", "tag": 1, "type": "uint64" }]
                }]
            }"#,
            "Counter",
        );
        assert!(out.contains("5 => {\n                r.skip(4);"), "{out}");
        assert!(out.contains("1 => {\n                r.skip(8);"), "{out}");
        assert!(out.contains("self.n = r.uvar();"), "{out}");
        assert!(out.contains("let len = r.uvar() as usize;"), "{out}");
        assert!(out.contains("r.skip(len);"), "{out}");
    }

    #[test]
    fn len_boundary_is_restored_unconditionally() {
        let out = render_decode(
            r#"{
                "version": 1,
                "messages": [{
                    "name": "Doc",
                    "fields": [{ "name": "body", "tag": 2, "type": "string" }]
                }]
            }"#,
            "Doc",
        );
        assert!(out.contains("let end = r.mark(len);"), "{out}");
        assert!(out.contains("r.seek(end);"), "{out}");
        assert!(out.contains("r.read_str(len, &mut self.body);"), "{out}");
    }

    #[test]
    fn packed_decoding_per_wire_family() {
        let out = render_decode(
            r#"{
                "version": 1,
                "messages": [{
                    "name": "Series",
                    "fields": [
                        { "name": "ids",  "tag": 1, "type": "uint32",  "repeated": true },
                        { "name": "crcs", "tag": 2, "type": "fixed32", "repeated": true },
                        { "name": "ts",   "tag": 3, "type": "fixed64", "repeated": true }
                    ]
                }]
            }"#,
            "Series",
        );
        assert!(
            out.contains("while !r.done(end) && !self.ids.is_full() {"),
            "{out}"
        );
        assert!(out.contains("for _ in 0..len / 4 {"), "{out}");
        assert!(out.contains("for _ in 0..len / 8 {"), "{out}");
        assert!(out.contains("self.crcs.push(r.u32_le());"), "{out}");
    }

    #[test]
    fn nested_messages_decode_through_a_bounded_sub_reader() {
        let out = render_decode(
            r#"{
                "version": 1,
                "messages": [
                    {
                        "name": "Person",
                        "fields": [{ "name": "home", "tag": 4, "type": { "message": "Address" } }]
                    },
                    {
                        "name": "Address",
                        "fields": [{ "name": "street", "tag": 1, "type": "string" }]
                    }
                ]
            }"#,
            "Person",
        );
        assert!(
            out.contains("let v = self.home.insert(Address::default());"),
            "{out}"
        );
        assert!(out.contains("v.decode(&mut r.sub(len));"), "{out}");
    }
}

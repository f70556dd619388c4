//! Capacity-parameter planning.
//!
//! Bounded storage pushes every variable-size decision to compile time: each
//! repeated field needs an element-count bound and each string/bytes field a
//! byte-length bound. The planner walks one message type (recursing through
//! nested message references with the chain of enclosing type names) and
//! produces:
//!
//!   - the ordered list of const-generic capacity parameters the generated
//!     struct declares, `A_*` counts before `B_*` byte bounds per field,
//!     nested parameters spliced in at the referencing field's position;
//!   - one `Storage` classification per field, consumed by member emission
//!     and by the decode/size/encode generators alike.
//!
//! The walk fails on a self-referential type (inline storage cannot
//! represent a cycle) and on parameter names that collide after the
//! upper-casing step.
use serde::Serialize;

use crate::error::GenError;
use crate::schema::{FieldSchema, FieldType, MessageIndex, MessageSchema, ScalarKind};
use crate::wire::{WireType, wire_type};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamRole {
    /// Maximum element count of a repeated field.
    Count,
    /// Maximum byte length of a string/bytes field.
    ByteLen,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapacityParam {
    /// Const-generic parameter name, e.g. `A_TAGS` or `B_ADDRESS_STREET`.
    pub name: String,
    pub role: ParamRole,
    /// Dotted field path from the planned root, e.g. `home.street`.
    pub field: String,
}

/// How a field's value is stored in the generated struct, before the
/// repeated/optional wrappers are applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Scalar(ScalarKind),
    Str { param: String },
    Bytes { param: String },
    Message { type_name: String, args: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct FieldPlan {
    pub name: String,
    pub tag: u32,
    pub storage: Storage,
    /// Count parameter name, present iff the field is repeated.
    pub count_param: Option<String>,
    /// Explicit presence: declared `optional`, or forced for a singular
    /// message-typed field.
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub struct MessagePlan {
    pub name: String,
    pub params: Vec<CapacityParam>,
    pub fields: Vec<FieldPlan>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl FieldPlan {
    pub fn repeated(&self) -> bool {
        self.count_param.is_some()
    }

    pub fn wire(&self) -> WireType {
        match &self.storage {
            Storage::Scalar(kind) => wire_type(*kind),
            Storage::Str { .. } | Storage::Bytes { .. } | Storage::Message { .. } => WireType::Len,
        }
    }
}

pub fn plan_message(
    index: &MessageIndex<'_>,
    message: &MessageSchema,
) -> Result<MessagePlan, GenError> {
    let mut params = Vec::new();
    let mut stack = vec![message.name.clone()];
    collect_params(index, message, "", "", &mut stack, &mut params)?;
    check_collisions(&params)?;

    let fields = message
        .fields
        .iter()
        .map(|field| plan_field(index, message, field))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MessagePlan {
        name: message.name.clone(),
        params,
        fields,
    })
}

fn plan_field(
    index: &MessageIndex<'_>,
    message: &MessageSchema,
    field: &FieldSchema,
) -> Result<FieldPlan, GenError> {
    let storage = match &field.ty {
        FieldType::Scalar(ScalarKind::String) => Storage::Str {
            param: param_name("B_", &field.name),
        },
        FieldType::Scalar(ScalarKind::Bytes) => Storage::Bytes {
            param: param_name("B_", &field.name),
        },
        FieldType::Scalar(kind) => Storage::Scalar(*kind),
        FieldType::Message(r) => {
            let nested = resolve(index, message, field, &r.message)?;
            let mut nested_params = Vec::new();
            let mut stack = vec![message.name.clone(), nested.name.clone()];
            collect_params(
                index,
                nested,
                &format!("{}_", nested.name),
                "",
                &mut stack,
                &mut nested_params,
            )?;
            Storage::Message {
                type_name: nested.name.clone(),
                args: nested_params.into_iter().map(|p| p.name).collect(),
            }
        }
    };

    let count_param = field
        .repeated
        .then(|| param_name("A_", &field.name));

    // Singular nested messages always carry explicit presence.
    let optional =
        field.optional || (!field.repeated && matches!(storage, Storage::Message { .. }));

    Ok(FieldPlan {
        name: field.name.clone(),
        tag: field.tag,
        storage,
        count_param,
        optional,
    })
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Append the capacity parameters of `message` to `out`, in field order.
/// `name_prefix` is the accumulated chain of nested type names (each
/// followed by `_`), `field_prefix` the dotted field path, `stack` the
/// expansion path used for cycle detection.
fn collect_params(
    index: &MessageIndex<'_>,
    message: &MessageSchema,
    name_prefix: &str,
    field_prefix: &str,
    stack: &mut Vec<String>,
    out: &mut Vec<CapacityParam>,
) -> Result<(), GenError> {
    for field in &message.fields {
        let base = format!("{name_prefix}{}", field.name);
        let path = format!("{field_prefix}{}", field.name);

        if field.repeated {
            out.push(CapacityParam {
                name: param_name("A_", &base),
                role: ParamRole::Count,
                field: path.clone(),
            });
        }
        match &field.ty {
            FieldType::Scalar(ScalarKind::String) | FieldType::Scalar(ScalarKind::Bytes) => {
                out.push(CapacityParam {
                    name: param_name("B_", &base),
                    role: ParamRole::ByteLen,
                    field: path.clone(),
                });
            }
            FieldType::Scalar(_) => {}
            FieldType::Message(r) => {
                let nested = resolve(index, message, field, &r.message)?;
                if stack.iter().any(|n| n == &nested.name) {
                    let mut cycle = stack.clone();
                    cycle.push(nested.name.clone());
                    return Err(GenError::CyclicType { path: cycle });
                }
                stack.push(nested.name.clone());
                collect_params(
                    index,
                    nested,
                    &format!("{name_prefix}{}_", nested.name),
                    &format!("{path}."),
                    stack,
                    out,
                )?;
                stack.pop();
            }
        }
    }
    Ok(())
}

fn resolve<'a>(
    index: &MessageIndex<'a>,
    message: &MessageSchema,
    field: &FieldSchema,
    referenced: &str,
) -> Result<&'a MessageSchema, GenError> {
    index.get(referenced).copied().ok_or_else(|| GenError::UnknownType {
        message: message.name.clone(),
        field: field.name.clone(),
        referenced: referenced.to_string(),
    })
}

fn param_name(prefix: &str, base: &str) -> String {
    format!("{prefix}{}", base.to_uppercase())
}

fn check_collisions(params: &[CapacityParam]) -> Result<(), GenError> {
    for (i, param) in params.iter().enumerate() {
        if let Some(clash) = params[..i].iter().find(|p| p.name == param.name) {
            return Err(GenError::ParamCollision {
                name: param.name.clone(),
                first: clash.field.clone(),
                second: param.field.clone(),
            });
        }
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

//! File-level orchestration: one descriptor file in, one artifact out.
use std::path::Path;

use serde::Serialize;

use crate::error::GenError;
use crate::codegen::emit::emit_file;
use crate::plan::{CapacityParam, MessagePlan, plan_message};
use crate::schema::{SchemaFile, load_schema};

/// A generated source file, ready to be written next to its siblings.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub source: String,
}

/// Capacity parameters of every message in one descriptor file, the
/// payload of the `params` subcommand.
#[derive(Debug, Serialize)]
pub struct ParamsReport {
    pub file: String,
    pub messages: Vec<MessageParams>,
}

#[derive(Debug, Serialize)]
pub struct MessageParams {
    pub name: String,
    pub params: Vec<CapacityParam>,
}

/// Plan every message of a validated schema, in declaration order.
pub fn plan_file(schema: &SchemaFile) -> Result<Vec<MessagePlan>, GenError> {
    let index = schema.index();
    schema
        .messages
        .iter()
        .map(|message| plan_message(&index, message))
        .collect()
}

pub fn generate_source(source_name: &str, schema: &SchemaFile) -> Result<String, GenError> {
    let plans = plan_file(schema)?;
    Ok(emit_file(source_name, &plans))
}

/// Load a descriptor file and generate its artifact.
pub fn generate_file(path: &Path) -> Result<Artifact, GenError> {
    let schema = load_schema(path)?;
    let source = generate_source(&display_name(path), &schema)?;
    Ok(Artifact {
        file_name: artifact_name(path),
        source,
    })
}

/// Load a descriptor file and report its capacity parameters.
pub fn params_report(path: &Path) -> Result<ParamsReport, GenError> {
    let schema = load_schema(path)?;
    let plans = plan_file(&schema)?;
    Ok(ParamsReport {
        file: display_name(path),
        messages: plans
            .into_iter()
            .map(|plan| MessageParams {
                name: plan.name,
                params: plan.params,
            })
            .collect(),
    })
}

/// Artifact file name: the descriptor's stem with a `.rs` suffix, so
/// `person.schema.json` becomes `person.schema.rs`.
pub fn artifact_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_string());
    format!("{stem}.rs")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

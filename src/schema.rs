//! Descriptor ingestion: serde model of a schema file plus validation.
//!
//! One JSON file describes one schema: a `version`, the `features` the
//! producer requires of this generator, and an ordered list of message
//! types with ordered, numbered fields. Order is significant and preserved
//! end to end so that generation is reproducible.
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GenError;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaFile {
    pub version: u32,
    #[serde(default)]
    pub features: Vec<String>,
    pub messages: Vec<MessageSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSchema {
    pub name: String,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub tag: u32,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default)]
    pub repeated: bool,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    Scalar(ScalarKind),
    Message(MessageRef),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageRef {
    pub message: String,
}

/// The closed scalar kind set. An unlisted kind fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Sfixed32,
    Float,
    Fixed64,
    Sfixed64,
    Double,
    String,
    Bytes,
    Enum,
}

/// Order-preserving name lookup over the messages of one file.
pub type MessageIndex<'a> = IndexMap<&'a str, &'a MessageSchema>;

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

const KNOWN_FEATURES: &[&str] = &["explicit-presence"];

/// Largest field number the key encoding can carry (29 bits).
const MAX_TAG: u32 = (1 << 29) - 1;

impl FieldType {
    pub fn as_message(&self) -> Option<&str> {
        match self {
            FieldType::Scalar(_) => None,
            FieldType::Message(r) => Some(&r.message),
        }
    }
}

impl SchemaFile {
    pub fn index(&self) -> MessageIndex<'_> {
        self.messages.iter().map(|m| (m.name.as_str(), m)).collect()
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.version != 1 {
            return Err(GenError::Version(self.version));
        }
        for feature in &self.features {
            if !KNOWN_FEATURES.contains(&feature.as_str()) {
                return Err(GenError::UnsupportedFeature(feature.clone()));
            }
        }

        let mut names = Vec::<&str>::new();
        for message in &self.messages {
            check_identifier(&message.name)?;
            if names.contains(&message.name.as_str()) {
                return Err(GenError::DuplicateMessage(message.name.clone()));
            }
            names.push(&message.name);
        }

        let index = self.index();
        for message in &self.messages {
            let mut field_names = Vec::<&str>::new();
            let mut tags = Vec::<u32>::new();
            for field in &message.fields {
                check_identifier(&field.name)?;
                if field_names.contains(&field.name.as_str()) {
                    return Err(GenError::DuplicateField {
                        message: message.name.clone(),
                        field: field.name.clone(),
                    });
                }
                field_names.push(&field.name);

                if field.tag == 0 || field.tag > MAX_TAG {
                    return Err(GenError::InvalidTag {
                        message: message.name.clone(),
                        field: field.name.clone(),
                    });
                }
                if tags.contains(&field.tag) {
                    return Err(GenError::DuplicateTag {
                        message: message.name.clone(),
                        tag: field.tag,
                    });
                }
                tags.push(field.tag);

                if field.repeated && field.optional {
                    return Err(GenError::RepeatedOptional {
                        message: message.name.clone(),
                        field: field.name.clone(),
                    });
                }

                if let Some(referenced) = field.ty.as_message() {
                    if !index.contains_key(referenced) {
                        return Err(GenError::UnknownType {
                            message: message.name.clone(),
                            field: field.name.clone(),
                            referenced: referenced.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Parse and validate one descriptor source.
pub fn parse_schema(src: &str) -> Result<SchemaFile, GenError> {
    let schema: SchemaFile = from_str_with_path(src)?;
    schema.validate()?;
    Ok(schema)
}

/// Read, parse and validate one descriptor file.
pub fn load_schema(path: &Path) -> Result<SchemaFile, GenError> {
    let src = std::fs::read_to_string(path)?;
    parse_schema(&src)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Rust keywords a schema name would collide with in generated source.
const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while",
];

fn check_identifier(name: &str) -> Result<(), GenError> {
    if IDENTIFIER.is_match(name) && !RESERVED.contains(&name) {
        Ok(())
    } else {
        Err(GenError::BadIdentifier(name.to_string()))
    }
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, GenError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(GenError::Parse(format!(
                "at JSON path {path}: {}",
                err.into_inner()
            )))
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

//! Structural checks of JSON response bodies.
//!
//! A [`Schema`] names the fields a body must carry and their JSON types. Field
//! values are never compared, only shape.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

pub const ERROR_RESPONSE: &str = "error-response";
pub const AUTHENTICATION_RESPONSE: &str = "authentication-response";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    fn accepts(
        &self,
        value: &Value,
    ) -> bool {
        let found = Self::of(value);
        found == *self || (*self == Self::Number && found == Self::Integer)
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FieldRule {
    #[serde(rename = "type")]
    pub json_type: JsonType,
    #[serde(default)]
    pub required: bool,
    /// Minimum character count for string fields.
    #[serde(default)]
    pub min_length: Option<usize>,
}

impl FieldRule {
    pub fn required(json_type: JsonType) -> Self {
        Self {
            json_type,
            required: true,
            min_length: None,
        }
    }

    pub fn min_length(
        mut self,
        min_length: usize,
    ) -> Self {
        self.min_length = Some(min_length);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Schema {
    pub name: String,
    pub fields: BTreeMap<String, FieldRule>,
    /// Whether fields not listed in `fields` are tolerated.
    #[serde(default = "default_additional_fields")]
    pub additional_fields: bool,
}

fn default_additional_fields() -> bool {
    true
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SchemaViolation {
    NotJson,
    NotAnObject { found: JsonType },
    MissingField { field: String },
    WrongType {
        field: String,
        expected: JsonType,
        found: JsonType,
    },
    TooShort {
        field: String,
        min: usize,
        len: usize,
    },
    UnexpectedField { field: String },
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::NotJson => write!(f, "body is not valid JSON"),
            Self::NotAnObject { found } => write!(f, "body is {found} instead of object"),
            Self::MissingField { field } => write!(f, "missing required field {field}"),
            Self::WrongType {
                field,
                expected,
                found,
            } => write!(f, "field {field} expected {expected} but found {found}"),
            Self::TooShort { field, min, len } => {
                write!(f, "field {field} has {len} characters and needs at least {min}")
            },
            Self::UnexpectedField { field } => write!(f, "unexpected field {field}"),
        }
    }
}

pub(crate) fn render(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
            additional_fields: true,
        }
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        rule: FieldRule,
    ) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    pub fn strict(mut self) -> Self {
        self.additional_fields = false;
        self
    }

    /// Documented failure body: `{status, errorCode, message}`.
    pub fn error_response() -> Self {
        Self::new(ERROR_RESPONSE)
            .field("status", FieldRule::required(JsonType::Integer))
            .field(
                "errorCode",
                FieldRule::required(JsonType::String).min_length(1),
            )
            .field(
                "message",
                FieldRule::required(JsonType::String).min_length(1),
            )
    }

    /// Successful registration: both tokens present, access token longer than ten characters.
    pub fn authentication_response() -> Self {
        Self::new(AUTHENTICATION_RESPONSE)
            .field(
                "accessToken",
                FieldRule::required(JsonType::String).min_length(11),
            )
            .field(
                "refreshToken",
                FieldRule::required(JsonType::String).min_length(1),
            )
    }

    pub fn validate(
        &self,
        body: &Value,
    ) -> Vec<SchemaViolation> {
        let Value::Object(map) = body else {
            return vec![SchemaViolation::NotAnObject {
                found: JsonType::of(body),
            }];
        };

        let mut violations = vec![];

        for (name, rule) in &self.fields {
            let Some(value) = map.get(name) else {
                if rule.required {
                    violations.push(SchemaViolation::MissingField {
                        field: name.clone(),
                    });
                }
                continue;
            };

            if !rule.json_type.accepts(value) {
                violations.push(SchemaViolation::WrongType {
                    field: name.clone(),
                    expected: rule.json_type,
                    found: JsonType::of(value),
                });
                continue;
            }

            if let (Some(min), Value::String(s)) = (rule.min_length, value) {
                let len = s.chars().count();
                if len < min {
                    violations.push(SchemaViolation::TooShort {
                        field: name.clone(),
                        min,
                        len,
                    });
                }
            }
        }

        if !self.additional_fields {
            violations.extend(
                map.keys()
                    .filter(|key| !self.fields.contains_key(*key))
                    .map(|key| SchemaViolation::UnexpectedField { field: key.clone() }),
            );
        }

        violations
    }

    /// Validates raw bytes, reporting unparsable bodies as a violation.
    pub fn validate_bytes(
        &self,
        body: &[u8],
    ) -> Vec<SchemaViolation> {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => self.validate(&value),
            Err(_) => vec![SchemaViolation::NotJson],
        }
    }
}

/// Named schemas that response expectations refer to.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    schemas: HashMap<String, Arc<Schema>>,
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        let mut this = Self::empty();
        this.register(Schema::error_response());
        this.register(Schema::authentication_response());
        this
    }
}

impl SchemaCatalog {
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        schema: Schema,
    ) {
        self.schemas
            .insert(schema.name.clone(), Arc::new(schema));
    }

    /// Registers a schema described as JSON, e.g. loaded from a fixtures directory.
    pub fn register_json(
        &mut self,
        json: &str,
    ) -> Result<()> {
        let schema: Schema = serde_json::from_str(json)?;
        self.register(schema);
        Ok(())
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Result<Arc<Schema>> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownSchema(name.to_string()))
    }
}

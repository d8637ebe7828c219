use crate::block::BlockKind;
use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{kind} block requires `{field}`")]
    MissingField { kind: BlockKind, field: &'static str },

    #[error("{kind} block has invalid `{field}`: {reason}")]
    InvalidField {
        kind: BlockKind,
        field: &'static str,
        reason: String,
    },

    #[error("{kind} is a content block and cannot carry exercise config")]
    UnexpectedConfig { kind: BlockKind },

    #[error("`{group}` does not apply to {kind} blocks")]
    MisplacedConfig { kind: BlockKind, group: &'static str },
}

impl SchemaError {
    pub fn missing(kind: BlockKind, field: &'static str) -> Self {
        Self::MissingField { kind, field }
    }

    pub fn invalid(kind: BlockKind, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            kind,
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the error points at one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. } | Self::InvalidField { field, .. } => Some(field),
            Self::MisplacedConfig { group, .. } => Some(group),
            Self::UnexpectedConfig { .. } => None,
        }
    }
}

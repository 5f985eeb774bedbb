//! Definition load errors

use thiserror::Error;

use crate::json::JsonError;

/// A definition that could not be registered at all.
///
/// Problems with single members are diagnostics instead; this error rejects
/// only the record it came from.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{kind} definition has no id")]
    MissingId { kind: &'static str },

    #[error("invalid examine actor \"{0}\"")]
    UnknownActor(String),

    #[error("record has no \"type\"")]
    MissingType,

    #[error("unknown definition type \"{0}\"")]
    UnknownType(String),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(JsonError::Syntax(err))
    }
}

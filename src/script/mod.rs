//! Request scripts - the notation executor sources are written in
//!
//! A script is a flat sequence of `name = value` assignments whose values are
//! data literals (strings, numbers, dicts, lists, `None`/`True`/`False`).
//! Evaluation is restricted: besides names bound earlier in the script, only
//! `BASE_URL` and `get_api_key()` resolve. Nothing else is reachable.

pub mod eval;
pub mod lexer;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::credentials::CredentialSource;
use crate::error::RunnerError;

pub use eval::Evaluator;

/// Names bound by a script, in assignment order
pub type Bindings = Map<String, Value>;

/// Collaborators a script may reference
pub struct EvalContext<'a> {
    pub base_url: &'a str,
    pub credentials: &'a dyn CredentialSource,
}

impl<'a> EvalContext<'a> {
    pub fn new(base_url: &'a str, credentials: &'a dyn CredentialSource) -> Self {
        EvalContext {
            base_url,
            credentials,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("name '{0}' is not defined")]
    UnknownName(String),

    #[error("line {line}: {message}")]
    Type { line: usize, message: String },

    #[error(transparent)]
    Credential(RunnerError),
}

impl ScriptError {
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        ScriptError::Syntax {
            line,
            message: message.into(),
        }
    }

    pub fn type_error(line: usize, message: impl Into<String>) -> Self {
        ScriptError::Type {
            line,
            message: message.into(),
        }
    }

    /// Pure syntax-level failure (the snippet never started evaluating)
    pub fn is_syntax(&self) -> bool {
        matches!(self, ScriptError::Syntax { .. })
    }
}

/// Evaluate a script and return everything it bound
pub fn evaluate(source: &str, ctx: &EvalContext<'_>) -> Result<Bindings, ScriptError> {
    let tokens = lexer::tokenize(source)?;
    Evaluator::new(&tokens, ctx).run()
}

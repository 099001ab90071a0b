//! Default expression type.
//!
//! Array sizes, initializers and enumerator values are expressions, whose
//! node family lives outside this crate. Every node that owns one is
//! generic over it; `Expr` keeps the expression as written so a DOM can be
//! built without a full expression model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An expression kept verbatim as source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Expr {
    text: String,
}

impl Expr {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Expr {
    fn from(text: String) -> Self {
        Self { text }
    }
}

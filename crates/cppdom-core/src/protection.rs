//! Access levels of class members and base classes.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Access level of a member or of an inheritance edge.
///
/// Every node carries one, even where the language gives it no meaning.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Protection {
    #[default]
    Unknown,
    Public,
    Private,
    Protected,
}

impl Protection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
        }
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

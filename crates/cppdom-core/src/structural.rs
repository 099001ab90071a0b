//! Structural records: blank-line runs, comments, forward declarations,
//! inheritance edges and unparsed blobs.

use std::num::NonZeroU32;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flags::CompoundKind;
use crate::protection::Protection;

/// A run of consecutive blank source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BlankLine {
    count: NonZeroU32,
}

impl BlankLine {
    #[must_use]
    pub const fn new(count: NonZeroU32) -> Self {
        Self { count }
    }

    /// A single blank line.
    #[must_use]
    pub const fn single() -> Self {
        Self {
            count: NonZeroU32::MIN,
        }
    }

    #[must_use]
    pub const fn count(self) -> NonZeroU32 {
        self.count
    }

    /// Absorb a following run into this one.
    pub(crate) fn extend(&mut self, other: Self) {
        self.count = self.count.saturating_add(other.count.get());
    }
}

impl Default for BlankLine {
    fn default() -> Self {
        Self::single()
    }
}

/// A documentation comment, kept verbatim including its markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct DocComment {
    pub text: String,
}

impl DocComment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Forward declaration such as `class Foo;` or `struct Bar;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct FwdClsDecl {
    pub kind: CompoundKind,
    pub name: String,
}

impl FwdClsDecl {
    pub fn new(kind: CompoundKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// One base-class edge: `public Base` in `struct S : public Base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Inheritance {
    pub base_name: String,
    pub protection: Protection,
}

impl Inheritance {
    pub fn new(base_name: impl Into<String>, protection: Protection) -> Self {
        Self {
            base_name: base_name.into(),
            protection,
        }
    }
}

/// Source the recognizer could not classify, passed through as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Blob {
    pub text: String,
}

impl Blob {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

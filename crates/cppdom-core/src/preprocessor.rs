//! Preprocessor directive records. Every one is a leaf holding raw text.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// #define / #undef
// ---------------------------------------------------------------------------

/// Lexical classification of a macro body, supplied by the recognizer.
///
/// This is a hint only; it is never checked against the definition text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DefineKind {
    /// `#define BOOL int`
    Rename,
    /// `#define MAX 10`
    NumericConst,
    /// `#define NAME "cppdom"`
    StringConst,
    /// `#define SEP ';'`
    CharConst,
    /// Function-like or otherwise non-trivial macros.
    ComplexMacro,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Define {
    pub kind: DefineKind,
    pub name: String,
    pub definition: String,
}

impl Define {
    pub fn new(kind: DefineKind, name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            definition: definition.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Undef {
    pub name: String,
}

impl Undef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ---------------------------------------------------------------------------
// #include
// ---------------------------------------------------------------------------

/// `#include` target exactly as written, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Include {
    pub target: String,
}

impl Include {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Angle-bracket include, e.g. `<vector>`.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.target.starts_with('<')
    }
}

// ---------------------------------------------------------------------------
// Conditionals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HashIfKind {
    If,
    Else,
    Ifdef,
    Ifndef,
    Elif,
    Endif,
}

impl HashIfKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Else => "else",
            Self::Ifdef => "ifdef",
            Self::Ifndef => "ifndef",
            Self::Elif => "elif",
            Self::Endif => "endif",
        }
    }

    /// Whether directives of this kind carry condition text.
    #[must_use]
    pub const fn has_condition(self) -> bool {
        !matches!(self, Self::Else | Self::Endif)
    }
}

impl fmt::Display for HashIfKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `#if`, `#ifdef`, `#ifndef`, `#elif` (with condition text, possibly
/// empty, kept verbatim) and `#else`, `#endif` (never with text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "cond", content = "text", rename_all = "snake_case")]
pub enum HashIf {
    If(String),
    Else,
    Ifdef(String),
    Ifndef(String),
    Elif(String),
    Endif,
}

impl HashIf {
    /// Build from a kind and text. The text is dropped for `else`/`endif`.
    pub fn new(kind: HashIfKind, text: impl Into<String>) -> Self {
        match kind {
            HashIfKind::If => Self::If(text.into()),
            HashIfKind::Else => Self::Else,
            HashIfKind::Ifdef => Self::Ifdef(text.into()),
            HashIfKind::Ifndef => Self::Ifndef(text.into()),
            HashIfKind::Elif => Self::Elif(text.into()),
            HashIfKind::Endif => Self::Endif,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> HashIfKind {
        match self {
            Self::If(_) => HashIfKind::If,
            Self::Else => HashIfKind::Else,
            Self::Ifdef(_) => HashIfKind::Ifdef,
            Self::Ifndef(_) => HashIfKind::Ifndef,
            Self::Elif(_) => HashIfKind::Elif,
            Self::Endif => HashIfKind::Endif,
        }
    }

    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        match self {
            Self::If(text) | Self::Ifdef(text) | Self::Ifndef(text) | Self::Elif(text) => {
                Some(text.as_str())
            }
            Self::Else | Self::Endif => None,
        }
    }
}

// ---------------------------------------------------------------------------
// #pragma and everything else
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Pragma {
    pub text: String,
}

impl Pragma {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A directive with no structural model, e.g. `#error` or `#line`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct UnrecognizedPreprocessor {
    pub name: String,
    pub body: String,
}

impl UnrecognizedPreprocessor {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn ifdef_keeps_condition() {
        let directive = HashIf::new(HashIfKind::Ifdef, "DEBUG");
        assert_eq!(directive.kind(), HashIfKind::Ifdef);
        assert_eq!(directive.condition(), Some("DEBUG"));
    }

    #[rstest]
    #[case(HashIfKind::If, Some(""))]
    #[case(HashIfKind::Ifdef, Some(""))]
    #[case(HashIfKind::Ifndef, Some(""))]
    #[case(HashIfKind::Elif, Some(""))]
    #[case(HashIfKind::Else, None)]
    #[case(HashIfKind::Endif, None)]
    fn condition_text_convention(#[case] kind: HashIfKind, #[case] expected: Option<&str>) {
        let directive = HashIf::new(kind, "");
        assert_eq!(directive.kind(), kind);
        assert_eq!(directive.condition(), expected);
        assert_eq!(kind.has_condition(), expected.is_some());
    }

    #[test]
    fn endif_drops_supplied_text() {
        let directive = HashIf::new(HashIfKind::Endif, "// DEBUG");
        assert_eq!(directive, HashIf::Endif);
        assert_eq!(directive.condition(), None);
    }

    #[test]
    fn condition_whitespace_is_preserved() {
        let directive = HashIf::new(HashIfKind::If, "  defined(_WIN32) /* win */ ");
        assert_eq!(directive.condition(), Some("  defined(_WIN32) /* win */ "));
    }

    #[test]
    fn define_kind_is_not_checked_against_text() {
        let define = Define::new(DefineKind::NumericConst, "NAME", "\"not a number\"");
        assert_eq!(define.kind, DefineKind::NumericConst);
        assert_eq!(define.definition, "\"not a number\"");
    }

    #[test]
    fn include_delimiters_are_kept() {
        let system = Include::new("<vector>");
        let local = Include::new("\"cppdom.h\"");
        assert!(system.is_system());
        assert!(!local.is_system());
        assert_eq!(local.target, "\"cppdom.h\"");
    }

    #[test]
    fn hash_if_serializes_adjacently_tagged() {
        let json = serde_json::to_value(HashIf::new(HashIfKind::Ifndef, "GUARD_H")).unwrap();
        assert_eq!(json, serde_json::json!({"cond": "ifndef", "text": "GUARD_H"}));
        let json = serde_json::to_value(HashIf::Else).unwrap();
        assert_eq!(json, serde_json::json!({"cond": "else"}));
    }
}

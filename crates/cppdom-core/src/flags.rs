//! Flag algebra: compound kinds, identifier attributes, operators and
//! reference/pointer arity.
//!
//! Composite constants are precomputed unions of more primitive bits, so a
//! single mask test answers "is this at least a class" or "is this at least
//! virtual" without walking any hierarchy.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::InvalidAttribBits;

// ---------------------------------------------------------------------------
// CompoundKind
// ---------------------------------------------------------------------------

const FILE: u8 = 0x01;
const NAMESPACE: u8 = 0x02;
const CLASS: u8 = 0x04 | NAMESPACE;
const STRUCT: u8 = 0x08 | CLASS;
const UNION: u8 = 0x10 | CLASS;
const BLOCK: u8 = 0x20;
const EXTERN_C_BLOCK: u8 = 0x40;

/// Kind of a scope-introducing construct.
///
/// Discriminants are the bit patterns themselves: `Struct` and `Union`
/// carry every `Class` bit, and `Class` carries the `Namespace` bit. Only
/// the named patterns are representable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CompoundKind {
    #[default]
    Unknown = 0x00,
    File = FILE,
    Namespace = NAMESPACE,
    Class = CLASS,
    Struct = STRUCT,
    Union = UNION,
    Block = BLOCK,
    ExternCBlock = EXTERN_C_BLOCK,
}

impl CompoundKind {
    /// Raw flag bits of this kind.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Map raw bits back to a kind. Patterns that are not one of the named
    /// kinds (e.g. the struct bit without the class bits) are rejected.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Self::Unknown),
            FILE => Some(Self::File),
            NAMESPACE => Some(Self::Namespace),
            CLASS => Some(Self::Class),
            STRUCT => Some(Self::Struct),
            UNION => Some(Self::Union),
            BLOCK => Some(Self::Block),
            EXTERN_C_BLOCK => Some(Self::ExternCBlock),
            _ => None,
        }
    }

    /// Whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn is_at_least(self, other: Self) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    /// True for namespace, class, struct and union.
    #[must_use]
    pub const fn is_namespace_like(self) -> bool {
        self.bits() & NAMESPACE != 0
    }

    /// True for class, struct and union.
    #[must_use]
    pub const fn is_class_like(self) -> bool {
        self.is_at_least(Self::Class)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::File => "file",
            Self::Namespace => "namespace",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Block => "block",
            Self::ExternCBlock => "extern_c_block",
        }
    }
}

impl fmt::Display for CompoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Identifier attributes
// ---------------------------------------------------------------------------

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct IdentBits: u16 {
        const FUNC_PARAM = 0x001;
        const CONST = 0x002;
        const STATIC = 0x004;
        const EXTERN = 0x008;
        const INLINE = 0x010;
        const VIRTUAL = 0x020;
        const PURE_VIRTUAL = 0x040 | Self::VIRTUAL.bits();
        const EXPLICIT = 0x100;
        const FRIEND = 0x200;
        const TYPEDEF_FN_PTR = 0x400;
        const ARRAY = 0x800;
    }
}

/// The bit that `PURE_VIRTUAL` adds on top of `VIRTUAL`.
const PURE_BIT: u16 = 0x040;

const fn is_consistent(bits: IdentBits) -> bool {
    bits.bits() & PURE_BIT == 0 || bits.contains(IdentBits::VIRTUAL)
}

/// Declares a checked attribute set over the shared identifier bit algebra.
///
/// Each invocation yields a distinct type, so type-level and
/// declaration-level attributes cannot be mixed in one word.
macro_rules! ident_attrib_set {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u16", into = "u16")]
        pub struct $name(IdentBits);

        impl $name {
            /// The identifier is a function parameter.
            pub const FUNC_PARAM: Self = Self(IdentBits::FUNC_PARAM);
            pub const CONST: Self = Self(IdentBits::CONST);
            pub const STATIC: Self = Self(IdentBits::STATIC);
            pub const EXTERN: Self = Self(IdentBits::EXTERN);
            pub const INLINE: Self = Self(IdentBits::INLINE);
            pub const VIRTUAL: Self = Self(IdentBits::VIRTUAL);
            /// Always includes [`Self::VIRTUAL`].
            pub const PURE_VIRTUAL: Self = Self(IdentBits::PURE_VIRTUAL);
            pub const EXPLICIT: Self = Self(IdentBits::EXPLICIT);
            pub const FRIEND: Self = Self(IdentBits::FRIEND);
            /// A function pointer introduced by `typedef`.
            pub const TYPEDEF_FN_PTR: Self = Self(IdentBits::TYPEDEF_FN_PTR);
            pub const ARRAY: Self = Self(IdentBits::ARRAY);

            #[must_use]
            pub const fn empty() -> Self {
                Self(IdentBits::empty())
            }

            #[must_use]
            pub const fn bits(self) -> u16 {
                self.0.bits()
            }

            /// Rebuild a set from raw bits. Unknown bits, and the pure bit
            /// without the virtual bit, are rejected.
            #[must_use]
            pub const fn from_bits(bits: u16) -> Option<Self> {
                match IdentBits::from_bits(bits) {
                    Some(parsed) if is_consistent(parsed) => Some(Self(parsed)),
                    _ => None,
                }
            }

            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0.is_empty()
            }

            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0.contains(other.0)
            }

            #[must_use]
            pub const fn intersects(self, other: Self) -> bool {
                self.0.intersects(other.0)
            }

            pub fn insert(&mut self, other: Self) {
                self.0.insert(other.0);
            }

            /// Clear every bit of `other`. Clearing `VIRTUAL` also clears
            /// the pure bit.
            #[must_use]
            pub fn without(self, other: Self) -> Self {
                let mut bits = self.0;
                bits.remove(other.0);
                if !bits.contains(IdentBits::VIRTUAL) {
                    bits.remove(IdentBits::PURE_VIRTUAL);
                }
                Self(bits)
            }

            /// Names of the flags present, in declaration order.
            pub fn iter_names(self) -> impl Iterator<Item = &'static str> {
                self.0.iter_names().map(|(name, _)| name)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl TryFrom<u16> for $name {
            type Error = InvalidAttribBits;

            fn try_from(bits: u16) -> Result<Self, Self::Error> {
                Self::from_bits(bits).ok_or(InvalidAttribBits(bits))
            }
        }

        impl From<$name> for u16 {
            fn from(value: $name) -> Self {
                value.bits()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                for (i, name) in self.iter_names().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    f.write_str(name)?;
                }
                f.write_str(")")
            }
        }
    };
}

ident_attrib_set!(
    /// Attributes of a type occurrence, e.g. the `const` in `const int*`.
    TypeAttribs
);

ident_attrib_set!(
    /// Attributes of a declared name, e.g. the `const` in `int* const p`
    /// or the `static` in `static int n`.
    VarAttribs
);

// ---------------------------------------------------------------------------
// OperatorKind
// ---------------------------------------------------------------------------

const UNARY_BASE: u8 = 1;
const BINARY_BASE: u8 = 50;
const SPECIAL_BASE: u8 = 100;

/// Operator category, identified purely by code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperatorCategory {
    Unary,
    Binary,
    Special,
}

impl OperatorCategory {
    /// First code of the range; operators of this category start just after it.
    #[must_use]
    pub const fn base(self) -> u8 {
        match self {
            Self::Unary => UNARY_BASE,
            Self::Binary => BINARY_BASE,
            Self::Special => SPECIAL_BASE,
        }
    }
}

/// Operators appearing in expressions, grouped into disjoint code ranges.
///
/// New operators are appended inside their range; existing codes never move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OperatorKind {
    UnaryMinus = UNARY_BASE + 1,
    BitToggle,
    LogNot,
    Deref,
    AddressOf,

    Dot = BINARY_BASE + 1,
    Arrow,
    Plus,
    Minus,
    Mul,
    Div,
    Assign,
    CmpEqual,
    BitAnd,
    BitOr,

    FunctionCall = SPECIAL_BASE + 1,
}

impl OperatorKind {
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        let op = match code {
            2 => Self::UnaryMinus,
            3 => Self::BitToggle,
            4 => Self::LogNot,
            5 => Self::Deref,
            6 => Self::AddressOf,
            51 => Self::Dot,
            52 => Self::Arrow,
            53 => Self::Plus,
            54 => Self::Minus,
            55 => Self::Mul,
            56 => Self::Div,
            57 => Self::Assign,
            58 => Self::CmpEqual,
            59 => Self::BitAnd,
            60 => Self::BitOr,
            101 => Self::FunctionCall,
            _ => return None,
        };
        Some(op)
    }

    /// Category derived from the code range alone.
    #[must_use]
    pub const fn category(self) -> OperatorCategory {
        let code = self.code();
        if code > SPECIAL_BASE {
            OperatorCategory::Special
        } else if code > BINARY_BASE {
            OperatorCategory::Binary
        } else {
            OperatorCategory::Unary
        }
    }

    /// Source spelling of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::UnaryMinus | Self::Minus => "-",
            Self::BitToggle => "~",
            Self::LogNot => "!",
            Self::Deref | Self::Mul => "*",
            Self::AddressOf | Self::BitAnd => "&",
            Self::Dot => ".",
            Self::Arrow => "->",
            Self::Plus => "+",
            Self::Div => "/",
            Self::Assign => "=",
            Self::CmpEqual => "==",
            Self::BitOr => "|",
            Self::FunctionCall => "()",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// References and pointers
// ---------------------------------------------------------------------------

/// Reference qualifier of a type occurrence. Orthogonal to pointer depth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    #[default]
    None,
    /// `int& x`
    Lvalue,
    /// `T&& x`, as in move constructors.
    Rvalue,
}

impl RefKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Lvalue => "&",
            Self::Rvalue => "&&",
        }
    }
}

pub const NO_PTR: u32 = 0;
pub const PTR: u32 = 1;
pub const DBL_PTR: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(CompoundKind::Unknown, false, false)]
    #[case(CompoundKind::File, false, false)]
    #[case(CompoundKind::Namespace, true, false)]
    #[case(CompoundKind::Class, true, true)]
    #[case(CompoundKind::Struct, true, true)]
    #[case(CompoundKind::Union, true, true)]
    #[case(CompoundKind::Block, false, false)]
    #[case(CompoundKind::ExternCBlock, false, false)]
    fn compound_kind_tests(
        #[case] kind: CompoundKind,
        #[case] namespace_like: bool,
        #[case] class_like: bool,
    ) {
        assert_eq!(kind.bits() & CompoundKind::Namespace.bits() != 0, namespace_like);
        assert_eq!(kind.is_namespace_like(), namespace_like);
        assert_eq!(kind.is_class_like(), class_like);
        assert_eq!(CompoundKind::from_bits(kind.bits()), Some(kind));
    }

    #[test]
    fn struct_and_union_are_supersets_of_class() {
        assert!(CompoundKind::Struct.is_at_least(CompoundKind::Class));
        assert!(CompoundKind::Union.is_at_least(CompoundKind::Class));
        assert!(!CompoundKind::Struct.is_at_least(CompoundKind::Union));
        assert!(!CompoundKind::Namespace.is_at_least(CompoundKind::Class));
        assert_eq!(CompoundKind::Struct.bits(), 0x0e);
        assert_eq!(CompoundKind::Union.bits(), 0x16);
    }

    #[test]
    fn compound_from_bits_rejects_partial_patterns() {
        assert_eq!(CompoundKind::from_bits(0x08), None);
        assert_eq!(CompoundKind::from_bits(0x04), None);
        assert_eq!(CompoundKind::from_bits(0x03), None);
    }

    #[test]
    fn pure_virtual_implies_virtual() {
        assert!(TypeAttribs::PURE_VIRTUAL.contains(TypeAttribs::VIRTUAL));
        assert!(VarAttribs::PURE_VIRTUAL.contains(VarAttribs::VIRTUAL));

        for raw in 0..=u16::MAX {
            if let Some(attribs) = VarAttribs::from_bits(raw) {
                if raw & PURE_BIT != 0 {
                    assert!(attribs.contains(VarAttribs::VIRTUAL), "bits {raw:#x}");
                }
            }
        }
    }

    #[test]
    fn from_bits_rejects_inconsistent_and_unknown() {
        assert_eq!(VarAttribs::from_bits(PURE_BIT), None);
        assert_eq!(VarAttribs::from_bits(0x080), None);
        assert_eq!(VarAttribs::from_bits(0x060), Some(VarAttribs::PURE_VIRTUAL));
        assert_eq!(
            TypeAttribs::from_bits(0x002 | 0x800),
            Some(TypeAttribs::CONST | TypeAttribs::ARRAY)
        );
    }

    #[test]
    fn removing_virtual_clears_pure() {
        let attribs = VarAttribs::PURE_VIRTUAL | VarAttribs::INLINE;
        let stripped = attribs.without(VarAttribs::VIRTUAL);
        assert_eq!(stripped, VarAttribs::INLINE);
        assert!(VarAttribs::from_bits(stripped.bits()).is_some());
    }

    #[test]
    fn attrib_debug_lists_names() {
        let attribs = TypeAttribs::CONST | TypeAttribs::STATIC;
        assert_eq!(format!("{attribs:?}"), "TypeAttribs(CONST | STATIC)");
        assert_eq!(format!("{:?}", VarAttribs::empty()), "VarAttribs()");
    }

    #[test]
    fn attribs_serialize_as_raw_bits() {
        let attribs = VarAttribs::STATIC | VarAttribs::CONST;
        let json = serde_json::to_string(&attribs).unwrap();
        assert_eq!(json, "6");
        let back: VarAttribs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attribs);
        assert!(serde_json::from_str::<VarAttribs>("64").is_err());
    }

    #[test]
    fn operator_ranges_identify_category() {
        assert_eq!(OperatorKind::UnaryMinus.code(), 2);
        assert_eq!(OperatorKind::AddressOf.code(), 6);
        assert_eq!(OperatorKind::Dot.code(), 51);
        assert_eq!(OperatorKind::BitOr.code(), 60);
        assert_eq!(OperatorKind::FunctionCall.code(), 101);

        for code in 0..=u8::MAX {
            let Some(op) = OperatorKind::from_code(code) else {
                continue;
            };
            assert_eq!(op.code(), code);
            let expected = if code > 100 {
                OperatorCategory::Special
            } else if code > 50 {
                OperatorCategory::Binary
            } else {
                OperatorCategory::Unary
            };
            assert_eq!(op.category(), expected);
            assert!(code > op.category().base());
        }
    }

    #[rstest]
    #[case(OperatorKind::UnaryMinus, "-")]
    #[case(OperatorKind::BitToggle, "~")]
    #[case(OperatorKind::Deref, "*")]
    #[case(OperatorKind::AddressOf, "&")]
    #[case(OperatorKind::Arrow, "->")]
    #[case(OperatorKind::CmpEqual, "==")]
    #[case(OperatorKind::BitOr, "|")]
    #[case(OperatorKind::FunctionCall, "()")]
    fn operator_symbols(#[case] op: OperatorKind, #[case] symbol: &str) {
        assert_eq!(op.symbol(), symbol);
        assert_eq!(op.to_string(), symbol);
    }

    #[test]
    fn ref_kind_defaults_to_none() {
        assert_eq!(RefKind::default(), RefKind::None);
        assert_eq!(RefKind::Rvalue.as_str(), "&&");
    }
}

//! The node family every DOM entry belongs to.
//!
//! `NodeData` is closed over the kinds below; consumers dispatch with an
//! exhaustive `match`, so adding a kind is a compile error in every
//! consumer that has not handled it yet.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decl::{Enum, Typedef, Var, VarList};
use crate::dom::CompoundId;
use crate::expr::Expr;
use crate::preprocessor::{Define, HashIf, Include, Pragma, Undef, UnrecognizedPreprocessor};
use crate::protection::Protection;
use crate::structural::{BlankLine, Blob, DocComment, FwdClsDecl};
use crate::var_type::VarType;

/// Discriminant of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    BlankLine,
    DocComment,
    VarType,
    Var,
    VarList,
    Typedef,
    Enum,
    Compound,
    FwdClsDecl,
    Define,
    Undef,
    Include,
    HashIf,
    Pragma,
    UnrecognizedPreprocessor,
    Blob,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlankLine => "blank_line",
            Self::DocComment => "doc_comment",
            Self::VarType => "var_type",
            Self::Var => "var",
            Self::VarList => "var_list",
            Self::Typedef => "typedef",
            Self::Enum => "enum",
            Self::Compound => "compound",
            Self::FwdClsDecl => "fwd_cls_decl",
            Self::Define => "define",
            Self::Undef => "undef",
            Self::Include => "include",
            Self::HashIf => "hash_if",
            Self::Pragma => "pragma",
            Self::UnrecognizedPreprocessor => "unrecognized_preprocessor",
            Self::Blob => "blob",
        }
    }

    /// Preprocessor directive kinds.
    #[must_use]
    pub const fn is_preprocessor(self) -> bool {
        matches!(
            self,
            Self::Define
                | Self::Undef
                | Self::Include
                | Self::HashIf
                | Self::Pragma
                | Self::UnrecognizedPreprocessor
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum NodeData<E = Expr> {
    BlankLine(BlankLine),
    DocComment(DocComment),
    VarType(VarType<E>),
    Var(Var<E>),
    VarList(VarList<E>),
    Typedef(Typedef<E>),
    Enum(Enum<E>),
    /// A nested compound, held by the arena under this handle.
    Compound(CompoundId),
    FwdClsDecl(FwdClsDecl),
    Define(Define),
    Undef(Undef),
    Include(Include),
    HashIf(HashIf),
    Pragma(Pragma),
    UnrecognizedPreprocessor(UnrecognizedPreprocessor),
    Blob(Blob),
}

impl<E> NodeData<E> {
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::BlankLine(_) => NodeKind::BlankLine,
            Self::DocComment(_) => NodeKind::DocComment,
            Self::VarType(_) => NodeKind::VarType,
            Self::Var(_) => NodeKind::Var,
            Self::VarList(_) => NodeKind::VarList,
            Self::Typedef(_) => NodeKind::Typedef,
            Self::Enum(_) => NodeKind::Enum,
            Self::Compound(_) => NodeKind::Compound,
            Self::FwdClsDecl(_) => NodeKind::FwdClsDecl,
            Self::Define(_) => NodeKind::Define,
            Self::Undef(_) => NodeKind::Undef,
            Self::Include(_) => NodeKind::Include,
            Self::HashIf(_) => NodeKind::HashIf,
            Self::Pragma(_) => NodeKind::Pragma,
            Self::UnrecognizedPreprocessor(_) => NodeKind::UnrecognizedPreprocessor,
            Self::Blob(_) => NodeKind::Blob,
        }
    }
}

macro_rules! node_data_from {
    ($($variant:ident($payload:ty)),* $(,)?) => {
        $(
            impl<E> From<$payload> for NodeData<E> {
                fn from(payload: $payload) -> Self {
                    Self::$variant(payload)
                }
            }
        )*
    };
}

node_data_from!(
    BlankLine(BlankLine),
    DocComment(DocComment),
    VarType(VarType<E>),
    Var(Var<E>),
    VarList(VarList<E>),
    Typedef(Typedef<E>),
    Enum(Enum<E>),
    Compound(CompoundId),
    FwdClsDecl(FwdClsDecl),
    Define(Define),
    Undef(Undef),
    Include(Include),
    HashIf(HashIf),
    Pragma(Pragma),
    UnrecognizedPreprocessor(UnrecognizedPreprocessor),
    Blob(Blob),
);

/// A DOM node: payload, protection level and the enclosing compound.
///
/// `owner` is a navigational handle only. It is `None` until the node is
/// attached through [`crate::Dom::attach`] and never decides lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Node<E = Expr> {
    protection: Protection,
    owner: Option<CompoundId>,
    data: NodeData<E>,
}

impl<E> Node<E> {
    pub fn new(data: impl Into<NodeData<E>>, protection: Protection) -> Self {
        Self {
            protection,
            owner: None,
            data: data.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    #[must_use]
    pub const fn protection(&self) -> Protection {
        self.protection
    }

    #[must_use]
    pub const fn owner(&self) -> Option<CompoundId> {
        self.owner
    }

    #[must_use]
    pub const fn data(&self) -> &NodeData<E> {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> NodeData<E> {
        self.data
    }

    pub(crate) fn set_owner(&mut self, owner: Option<CompoundId>) {
        self.owner = owner;
    }

    pub(crate) fn data_mut(&mut self) -> &mut NodeData<E> {
        &mut self.data
    }
}

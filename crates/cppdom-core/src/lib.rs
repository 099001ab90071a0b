//! # cppdom-core
//!
//! Typed document object model for parsed C++ source.
//!
//! This crate provides the node vocabulary a C++ recognizer builds and that
//! documentation generators, binding generators and analyzers traverse:
//! - Flag algebra for compound kinds, identifier attributes and operators
//! - A closed node family (`Node` / `NodeData`) dispatched by `match`
//! - Type descriptors and declaration nodes (variables, lists, typedefs, enums)
//! - Structural and preprocessor leaf nodes
//! - The compound arena (`Dom`) that owns every scope and sets owner handles
//!
//! The DOM is a syntactic record. It performs no type resolution, overload
//! resolution or macro expansion, and node construction never fails.

pub mod decl;
pub mod dom;
pub mod error;
pub mod expr;
pub mod flags;
pub mod node;
pub mod preprocessor;
pub mod protection;
pub mod structural;
pub mod var_type;

pub use decl::{Declarator, Enum, Enumerator, Typedef, Var, VarList};
pub use dom::{BuildOptions, Compound, CompoundId, Dom, Walk};
pub use error::{DomError, InvalidAttribBits};
pub use expr::Expr;
pub use flags::{
    CompoundKind, DBL_PTR, NO_PTR, OperatorCategory, OperatorKind, PTR, RefKind, TypeAttribs,
    VarAttribs,
};
pub use node::{Node, NodeData, NodeKind};
pub use preprocessor::{
    Define, DefineKind, HashIf, HashIfKind, Include, Pragma, Undef, UnrecognizedPreprocessor,
};
pub use protection::Protection;
pub use structural::{BlankLine, Blob, DocComment, FwdClsDecl, Inheritance};
pub use var_type::VarType;

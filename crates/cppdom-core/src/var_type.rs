//! Type descriptor for one occurrence of a type in a declaration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::flags::{RefKind, TypeAttribs};

/// A type occurrence: `const char* const*&`, `int[16]`, `void`.
///
/// Construction never validates C++ legality. A reference to a pointer to a
/// pointer is as representable as a plain `int`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VarType<E = Expr> {
    base_type: String,
    #[schemars(with = "u16")]
    attribs: TypeAttribs,
    ptr_depth: u32,
    ref_kind: RefKind,
    array_size: Option<Box<E>>,
}

impl<E> VarType<E> {
    pub fn new(
        base_type: impl Into<String>,
        attribs: TypeAttribs,
        ptr_depth: u32,
        ref_kind: RefKind,
    ) -> Self {
        Self {
            base_type: base_type.into(),
            attribs,
            ptr_depth,
            ref_kind,
            array_size: None,
        }
    }

    /// A plain value type with no attributes, pointers or references.
    pub fn plain(base_type: impl Into<String>) -> Self {
        Self::new(base_type, TypeAttribs::empty(), 0, RefKind::None)
    }

    /// Attach the array-size expression, e.g. the `16` in `int a[16]`.
    ///
    /// An array of unspecified size (`int a[]`) carries
    /// [`TypeAttribs::ARRAY`] and no size instead.
    #[must_use]
    pub fn with_array_size(mut self, size: E) -> Self {
        self.array_size = Some(Box::new(size));
        self
    }

    pub(crate) fn from_parts(
        base_type: String,
        attribs: TypeAttribs,
        ptr_depth: u32,
        ref_kind: RefKind,
        array_size: Option<Box<E>>,
    ) -> Self {
        Self {
            base_type,
            attribs,
            ptr_depth,
            ref_kind,
            array_size,
        }
    }

    pub(crate) fn into_parts(self) -> (String, TypeAttribs, u32, RefKind, Option<Box<E>>) {
        (
            self.base_type,
            self.attribs,
            self.ptr_depth,
            self.ref_kind,
            self.array_size,
        )
    }

    pub(crate) fn add_attribs(&mut self, attribs: TypeAttribs) {
        self.attribs.insert(attribs);
    }

    #[must_use]
    pub fn base_type(&self) -> &str {
        &self.base_type
    }

    #[must_use]
    pub const fn attribs(&self) -> TypeAttribs {
        self.attribs
    }

    #[must_use]
    pub const fn ptr_depth(&self) -> u32 {
        self.ptr_depth
    }

    #[must_use]
    pub const fn ref_kind(&self) -> RefKind {
        self.ref_kind
    }

    #[must_use]
    pub fn array_size(&self) -> Option<&E> {
        self.array_size.as_deref()
    }

    /// Bare `void`: no attributes, no pointer, no reference.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.base_type == "void"
            && self.attribs.is_empty()
            && self.ptr_depth == 0
            && self.ref_kind == RefKind::None
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.array_size.is_some() || self.attribs.contains(TypeAttribs::ARRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{DBL_PTR, PTR};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(VarType::plain("void"), true)]
    #[case(VarType::new("void", TypeAttribs::CONST, 0, RefKind::None), false)]
    #[case(VarType::new("void", TypeAttribs::empty(), PTR, RefKind::None), false)]
    #[case(VarType::new("void", TypeAttribs::empty(), 0, RefKind::Lvalue), false)]
    #[case(VarType::new("void", TypeAttribs::empty(), 0, RefKind::Rvalue), false)]
    #[case(VarType::plain("int"), false)]
    #[case(VarType::plain("Void"), false)]
    fn is_void_tests(#[case] ty: VarType, #[case] expected: bool) {
        assert_eq!(ty.is_void(), expected);
    }

    #[test]
    fn pointer_depth_and_reference_are_independent() {
        let ty: VarType = VarType::new("Widget", TypeAttribs::empty(), DBL_PTR, RefKind::Rvalue);
        assert_eq!(ty.ptr_depth(), 2);
        assert_eq!(ty.ref_kind(), RefKind::Rvalue);
        assert_eq!(ty.base_type(), "Widget");
    }

    #[test]
    fn sized_and_unsized_arrays() {
        let sized: VarType = VarType::plain("int").with_array_size(Expr::new("16"));
        assert!(sized.is_array());
        assert_eq!(sized.array_size().map(Expr::as_str), Some("16"));

        let unsized_array: VarType =
            VarType::new("char", TypeAttribs::ARRAY, 0, RefKind::None);
        assert!(unsized_array.is_array());
        assert!(unsized_array.array_size().is_none());

        let scalar: VarType = VarType::plain("char");
        assert!(!scalar.is_array());
    }

    #[test]
    fn construction_accepts_meaningless_combinations() {
        let ty: VarType = VarType::new(
            "int",
            TypeAttribs::PURE_VIRTUAL | TypeAttribs::FUNC_PARAM,
            u32::MAX,
            RefKind::Lvalue,
        );
        assert_eq!(ty.ptr_depth(), u32::MAX);
        assert!(ty.attribs().contains(TypeAttribs::VIRTUAL));
    }
}

//! Declaration nodes built on top of [`VarType`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::flags::{RefKind, TypeAttribs, VarAttribs};
use crate::var_type::VarType;

// ---------------------------------------------------------------------------
// Var
// ---------------------------------------------------------------------------

/// A variable, member or parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Var<E = Expr> {
    ty: VarType<E>,
    /// Empty only for anonymous parameters.
    name: String,
    #[schemars(with = "u16")]
    attribs: VarAttribs,
    init: Option<Box<E>>,
    /// Calling-convention or export annotation, kept verbatim.
    decor: Option<String>,
}

impl<E> Var<E> {
    pub fn new(ty: VarType<E>, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            attribs: VarAttribs::empty(),
            init: None,
            decor: None,
        }
    }

    #[must_use]
    pub fn with_attribs(mut self, attribs: VarAttribs) -> Self {
        self.attribs = attribs;
        self
    }

    #[must_use]
    pub fn with_init(mut self, init: E) -> Self {
        self.init = Some(Box::new(init));
        self
    }

    #[must_use]
    pub fn with_decor(mut self, decor: impl Into<String>) -> Self {
        self.decor = Some(decor.into());
        self
    }

    #[must_use]
    pub const fn ty(&self) -> &VarType<E> {
        &self.ty
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn attribs(&self) -> VarAttribs {
        self.attribs
    }

    #[must_use]
    pub fn init(&self) -> Option<&E> {
        self.init.as_deref()
    }

    #[must_use]
    pub fn decor(&self) -> Option<&str> {
        self.decor.as_deref()
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Declarator
// ---------------------------------------------------------------------------

/// The per-name part of a declaration inside a [`VarList`]: what differs
/// between `i`, `*p` and `a[4]` in `int i, *p, a[4];`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Declarator<E = Expr> {
    name: String,
    ptr_depth: u32,
    ref_kind: RefKind,
    array_size: Option<Box<E>>,
    /// `a[]`: an array with no size expression.
    unsized_array: bool,
    #[schemars(with = "u16")]
    attribs: VarAttribs,
    init: Option<Box<E>>,
    decor: Option<String>,
}

impl<E> Declarator<E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ptr_depth: 0,
            ref_kind: RefKind::None,
            array_size: None,
            unsized_array: false,
            attribs: VarAttribs::empty(),
            init: None,
            decor: None,
        }
    }

    #[must_use]
    pub fn with_ptr_depth(mut self, ptr_depth: u32) -> Self {
        self.ptr_depth = ptr_depth;
        self
    }

    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    #[must_use]
    pub fn with_array_size(mut self, size: E) -> Self {
        self.array_size = Some(Box::new(size));
        self
    }

    #[must_use]
    pub fn unsized_array(mut self) -> Self {
        self.unsized_array = true;
        self
    }

    #[must_use]
    pub fn with_attribs(mut self, attribs: VarAttribs) -> Self {
        self.attribs = attribs;
        self
    }

    #[must_use]
    pub fn with_init(mut self, init: E) -> Self {
        self.init = Some(Box::new(init));
        self
    }

    #[must_use]
    pub fn with_decor(mut self, decor: impl Into<String>) -> Self {
        self.decor = Some(decor.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
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

    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.array_size.is_some() || self.unsized_array
    }

    #[must_use]
    pub const fn attribs(&self) -> VarAttribs {
        self.attribs
    }

    #[must_use]
    pub fn init(&self) -> Option<&E> {
        self.init.as_deref()
    }

    #[must_use]
    pub fn decor(&self) -> Option<&str> {
        self.decor.as_deref()
    }
}

// ---------------------------------------------------------------------------
// VarList
// ---------------------------------------------------------------------------

/// Variables declared together, as in `int i, *p, a[4];`.
///
/// The common type (`int` and its attributes) is stored once; members only
/// carry their declarators, so they cannot disagree about it. Members can
/// only be appended. Dropping the list drops each member once, in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VarList<E = Expr> {
    base_type: String,
    /// Shared type attributes, never including [`TypeAttribs::ARRAY`].
    #[schemars(with = "u16")]
    attribs: TypeAttribs,
    members: Vec<Declarator<E>>,
}

impl<E> VarList<E> {
    /// Start a list from its first variable, whose base type and type
    /// attributes become the shared type.
    pub fn new(first: Var<E>) -> Self {
        let Var {
            ty,
            name,
            attribs,
            init,
            decor,
        } = first;
        let (base_type, type_attribs, ptr_depth, ref_kind, array_size) = ty.into_parts();
        let declarator = Declarator {
            name,
            ptr_depth,
            ref_kind,
            array_size,
            unsized_array: type_attribs.contains(TypeAttribs::ARRAY),
            attribs,
            init,
            decor,
        };
        Self::with_shared_type(base_type, type_attribs, declarator)
    }

    /// Start a list from the shared type and the first declarator.
    pub fn with_shared_type(
        base_type: impl Into<String>,
        attribs: TypeAttribs,
        first: Declarator<E>,
    ) -> Self {
        Self {
            base_type: base_type.into(),
            attribs: attribs.without(TypeAttribs::ARRAY),
            members: vec![first],
        }
    }

    pub fn push(&mut self, declarator: Declarator<E>) {
        self.members.push(declarator);
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
    pub fn members(&self) -> &[Declarator<E>] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Split the list into one standalone [`Var`] per member, each with the
    /// shared type.
    #[must_use]
    pub fn into_vars(self) -> Vec<Var<E>> {
        let Self {
            base_type,
            attribs,
            members,
        } = self;
        members
            .into_iter()
            .map(|d| {
                let mut type_attribs = attribs;
                if d.unsized_array {
                    type_attribs.insert(TypeAttribs::ARRAY);
                }
                Var {
                    ty: VarType::from_parts(
                        base_type.clone(),
                        type_attribs,
                        d.ptr_depth,
                        d.ref_kind,
                        d.array_size,
                    ),
                    name: d.name,
                    attribs: d.attribs,
                    init: d.init,
                    decor: d.decor,
                }
            })
            .collect()
    }
}

impl<E> Extend<Declarator<E>> for VarList<E> {
    fn extend<I: IntoIterator<Item = Declarator<E>>>(&mut self, iter: I) {
        self.members.extend(iter);
    }
}

// ---------------------------------------------------------------------------
// Typedef
// ---------------------------------------------------------------------------

/// A `typedef` statement. One statement may introduce several names for the
/// same type, as in `typedef unsigned long DWORD, ULONG;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Typedef<E = Expr> {
    ty: VarType<E>,
    names: Vec<String>,
    /// Parameters of a function-pointer typedef, in order.
    params: Vec<Var<E>>,
}

impl<E> Typedef<E> {
    pub fn new<I, S>(ty: VarType<E>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ty,
            names: names.into_iter().map(Into::into).collect(),
            params: Vec::new(),
        }
    }

    /// `typedef ret (*name)(params...);`
    ///
    /// `ret` describes the function's return type; the result carries
    /// [`TypeAttribs::TYPEDEF_FN_PTR`].
    pub fn function_pointer(ret: VarType<E>, name: impl Into<String>, params: Vec<Var<E>>) -> Self {
        let mut ty = ret;
        ty.add_attribs(TypeAttribs::TYPEDEF_FN_PTR);
        Self {
            ty,
            names: vec![name.into()],
            params,
        }
    }

    #[must_use]
    pub const fn ty(&self) -> &VarType<E> {
        &self.ty
    }

    /// Alias names in source order. Empty when the recognizer found a
    /// `typedef` with no alias, which is recorded as is.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn params(&self) -> &[Var<E>] {
        &self.params
    }

    #[must_use]
    pub const fn is_function_pointer(&self) -> bool {
        self.ty.attribs().contains(TypeAttribs::TYPEDEF_FN_PTR)
    }
}

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// One enumerator, optionally with an explicit value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Enumerator<E = Expr> {
    name: String,
    value: Option<Box<E>>,
}

impl<E> Enumerator<E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: E) -> Self {
        self.value = Some(Box::new(value));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&E> {
        self.value.as_deref()
    }
}

/// An `enum` or `enum class` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Enum<E = Expr> {
    /// `None` for anonymous enums.
    name: Option<String>,
    scoped: bool,
    underlying: Option<String>,
    items: Vec<Enumerator<E>>,
}

impl<E> Enum<E> {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            scoped: false,
            underlying: None,
            items: Vec::new(),
        }
    }

    /// Mark as `enum class` / `enum struct`.
    #[must_use]
    pub fn scoped(mut self) -> Self {
        self.scoped = true;
        self
    }

    #[must_use]
    pub fn with_underlying(mut self, underlying: impl Into<String>) -> Self {
        self.underlying = Some(underlying.into());
        self
    }

    pub fn push(&mut self, item: Enumerator<E>) {
        self.items.push(item);
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        self.scoped
    }

    #[must_use]
    pub fn underlying(&self) -> Option<&str> {
        self.underlying.as_deref()
    }

    #[must_use]
    pub fn items(&self) -> &[Enumerator<E>] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{DBL_PTR, PTR, RefKind};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Expression stand-in that counts its own drops.
    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn tracked_var(name: &str, drops: &Rc<Cell<usize>>) -> Var<Tracked> {
        Var::new(VarType::plain("int"), name).with_init(Tracked(Rc::clone(drops)))
    }

    #[test]
    fn var_list_drops_each_member_once() {
        let drops = Rc::new(Cell::new(0));
        let mut list = VarList::new(tracked_var("a", &drops));
        list.extend(
            ["b", "c", "d"]
                .into_iter()
                .map(|n| Declarator::new(n).with_init(Tracked(Rc::clone(&drops)))),
        );
        assert_eq!(list.len(), 4);
        assert_eq!(drops.get(), 0);

        drop(list);
        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn var_exposes_fields_unchanged() {
        let var: Var = Var::new(
            VarType::new("int", TypeAttribs::empty(), DBL_PTR, RefKind::None),
            "ppi",
        );
        assert_eq!(var.ty().ptr_depth(), 2);
        assert_eq!(var.ty().base_type(), "int");
        assert_eq!(var.ty().ref_kind(), RefKind::None);
        assert_eq!(var.name(), "ppi");
        assert!(var.attribs().is_empty());
        assert!(var.init().is_none());
    }

    #[test]
    fn declaration_and_type_attributes_stay_apart() {
        // int* const p = nullptr;
        let var: Var = Var::new(
            VarType::new("int", TypeAttribs::empty(), PTR, RefKind::None),
            "p",
        )
        .with_attribs(VarAttribs::CONST)
        .with_init(Expr::new("nullptr"));
        assert!(var.ty().attribs().is_empty());
        assert!(var.attribs().contains(VarAttribs::CONST));
        assert_eq!(var.init().map(Expr::as_str), Some("nullptr"));
    }

    #[test]
    fn decor_is_kept_verbatim() {
        let var: Var = Var::new(VarType::plain("int"), "")
            .with_attribs(VarAttribs::FUNC_PARAM)
            .with_decor("__declspec(dllexport)");
        assert!(var.is_anonymous());
        assert_eq!(var.decor(), Some("__declspec(dllexport)"));
    }

    #[test]
    fn var_list_members_share_one_type() {
        // const int i, *p, a[4];
        let first = Var::new(
            VarType::new("int", TypeAttribs::CONST, 0, RefKind::None),
            "i",
        );
        let mut list: VarList = VarList::new(first);
        list.push(Declarator::new("p").with_ptr_depth(PTR));
        list.push(Declarator::new("a").with_array_size(Expr::new("4")));

        assert_eq!(list.base_type(), "int");
        assert_eq!(list.attribs(), TypeAttribs::CONST);
        let names: Vec<_> = list.members().iter().map(Declarator::name).collect();
        assert_eq!(names, vec!["i", "p", "a"]);
        assert_eq!(list.members()[1].ptr_depth(), 1);
        assert!(list.members()[2].is_array());

        let vars = list.into_vars();
        assert_eq!(vars.len(), 3);
        for var in &vars {
            assert_eq!(var.ty().base_type(), "int");
            assert!(var.ty().attribs().contains(TypeAttribs::CONST));
        }
        assert_eq!(vars[1].ty().ptr_depth(), 1);
        assert_eq!(vars[2].ty().array_size().map(Expr::as_str), Some("4"));
    }

    #[test]
    fn unsized_array_stays_with_its_declarator() {
        // char buf[], c;
        let first = Var::new(
            VarType::new("char", TypeAttribs::ARRAY, 0, RefKind::None),
            "buf",
        );
        let mut list: VarList = VarList::new(first);
        list.push(Declarator::new("c"));

        assert!(list.attribs().is_empty());
        assert!(list.members()[0].is_array());
        assert!(!list.members()[1].is_array());

        let vars = list.into_vars();
        assert!(vars[0].ty().is_array());
        assert!(!vars[1].ty().is_array());
    }

    #[test]
    fn declarator_keeps_declaration_parts() {
        let d: Declarator = Declarator::new("r")
            .with_ref_kind(RefKind::Lvalue)
            .with_attribs(VarAttribs::STATIC)
            .with_init(Expr::new("other"))
            .with_decor("__cdecl");
        assert_eq!(d.ref_kind(), RefKind::Lvalue);
        assert!(d.attribs().contains(VarAttribs::STATIC));
        assert_eq!(d.init().map(Expr::as_str), Some("other"));
        assert_eq!(d.decor(), Some("__cdecl"));
        assert!(d.array_size().is_none());
    }

    #[test]
    fn typedef_without_names_is_representable() {
        // typedef struct { int x; };  (recognizer saw no alias)
        let td: Typedef = Typedef::new(VarType::plain("struct"), Vec::<String>::new());
        assert!(td.names().is_empty());
        assert!(td.params().is_empty());
    }

    #[test]
    fn typedef_keeps_alias_order() {
        let td: Typedef = Typedef::new(
            VarType::new("void", TypeAttribs::empty(), PTR, RefKind::None),
            ["Handle", "HANDLE"],
        );
        assert_eq!(td.names(), ["Handle".to_string(), "HANDLE".to_string()]);
        assert!(!td.is_function_pointer());
    }

    #[test]
    fn function_pointer_typedef_sets_attribute() {
        let param = Var::new(VarType::plain("int"), "").with_attribs(VarAttribs::FUNC_PARAM);
        let td: Typedef = Typedef::function_pointer(VarType::plain("void"), "Callback", vec![param]);
        assert!(td.is_function_pointer());
        assert_eq!(td.ty().base_type(), "void");
        assert_eq!(td.ty().ptr_depth(), 0);
        assert_eq!(td.names(), ["Callback".to_string()]);
        assert_eq!(td.params().len(), 1);
        assert_eq!(td.params()[0].ty().base_type(), "int");
    }

    #[test]
    fn enum_collects_enumerators() {
        let mut color: Enum = Enum::new(Some("Color".into()))
            .scoped()
            .with_underlying("uint8_t");
        color.push(Enumerator::new("Red"));
        color.push(Enumerator::new("Green").with_value(Expr::new("4")));
        assert!(color.is_scoped());
        assert_eq!(color.underlying(), Some("uint8_t"));
        assert_eq!(color.items().len(), 2);
        assert!(color.items()[0].value().is_none());
        assert_eq!(color.items()[1].value().map(Expr::as_str), Some("4"));
    }
}

//! The compound arena.
//!
//! Every scope (file, namespace, class, struct, union, block, `extern "C"`)
//! lives in one `Dom` and is addressed by a [`CompoundId`]. A compound owns
//! its members and inheritance edges; a nested scope appears among its
//! parent's members as a `NodeData::Compound` handle. Handles are the only
//! back-references, so the tree has no reference cycles and drops as a
//! whole with the arena.

use std::fmt;
use std::slice;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DomError;
use crate::expr::Expr;
use crate::flags::CompoundKind;
use crate::node::{Node, NodeData};
use crate::protection::Protection;
use crate::structural::Inheritance;

// ---------------------------------------------------------------------------
// CompoundId
// ---------------------------------------------------------------------------

/// Handle of a compound inside its [`Dom`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct CompoundId(u32);

impl CompoundId {
    /// The file compound every `Dom` starts with.
    pub const ROOT: Self = Self(0);

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BuildOptions
// ---------------------------------------------------------------------------

const fn default_coalesce() -> bool {
    true
}

const fn default_max_depth() -> u32 {
    256
}

/// Knobs for how the arena records what the recognizer hands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BuildOptions {
    /// Merge a blank-line node into an immediately preceding blank-line run.
    #[serde(default = "default_coalesce")]
    pub coalesce_blank_lines: bool,

    /// Deepest allowed compound nesting; the root file is depth 0.
    #[serde(default = "default_max_depth")]
    pub max_compound_depth: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            coalesce_blank_lines: default_coalesce(),
            max_compound_depth: default_max_depth(),
        }
    }
}

// ---------------------------------------------------------------------------
// Compound
// ---------------------------------------------------------------------------

/// A scope and everything declared directly in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Compound<E = Expr> {
    kind: CompoundKind,
    /// Empty for anonymous scopes.
    name: String,
    protection: Protection,
    parent: Option<CompoundId>,
    inheritance: Vec<Inheritance>,
    members: Vec<Node<E>>,
}

impl<E> Compound<E> {
    fn new(
        kind: CompoundKind,
        name: String,
        protection: Protection,
        parent: Option<CompoundId>,
    ) -> Self {
        Self {
            kind,
            name,
            protection,
            parent,
            inheritance: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> CompoundKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn protection(&self) -> Protection {
        self.protection
    }

    #[must_use]
    pub const fn parent(&self) -> Option<CompoundId> {
        self.parent
    }

    /// Base classes in declaration order.
    #[must_use]
    pub fn inheritance(&self) -> &[Inheritance] {
        &self.inheritance
    }

    #[must_use]
    pub fn members(&self) -> &[Node<E>] {
        &self.members
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    fn nested(&self) -> impl Iterator<Item = CompoundId> + '_ {
        self.members.iter().filter_map(|node| match node.data() {
            NodeData::Compound(id) => Some(*id),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Dom
// ---------------------------------------------------------------------------

/// A parsed translation unit: the arena of compounds rooted at one file.
///
/// Deserialization checks the tree shape before handing out a `Dom`, so
/// every navigation method terminates on trees read from JSON too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "RawDom<E>",
    bound(deserialize = "E: Deserialize<'de>")
)]
pub struct Dom<E = Expr> {
    compounds: Vec<Compound<E>>,
    options: BuildOptions,
}

/// Wire shape of a [`Dom`] before its tree is checked.
#[derive(Deserialize, JsonSchema)]
struct RawDom<E> {
    compounds: Vec<Compound<E>>,
    options: BuildOptions,
}

impl<E> TryFrom<RawDom<E>> for Dom<E> {
    type Error = DomError;

    fn try_from(raw: RawDom<E>) -> Result<Self, Self::Error> {
        let dom = Self {
            compounds: raw.compounds,
            options: raw.options,
        };
        dom.check_tree()?;
        Ok(dom)
    }
}

impl<E> Dom<E> {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self::with_options(file_name, BuildOptions::default())
    }

    pub fn with_options(file_name: impl Into<String>, options: BuildOptions) -> Self {
        let root = Compound::new(
            CompoundKind::File,
            file_name.into(),
            Protection::Unknown,
            None,
        );
        Self {
            compounds: vec![root],
            options,
        }
    }

    #[must_use]
    pub const fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// The file compound. The arena always holds it at [`CompoundId::ROOT`].
    #[must_use]
    pub fn root(&self) -> &Compound<E> {
        &self.compounds[CompoundId::ROOT.index()]
    }

    /// Number of compounds in the arena, root included.
    #[must_use]
    pub fn compound_count(&self) -> usize {
        self.compounds.len()
    }

    #[must_use]
    pub fn compound(&self, id: CompoundId) -> Option<&Compound<E>> {
        self.compounds.get(id.index())
    }

    /// All compounds with their handles, in allocation order.
    pub fn compounds(&self) -> impl Iterator<Item = (CompoundId, &Compound<E>)> {
        (0u32..)
            .map(CompoundId)
            .zip(self.compounds.iter())
    }

    pub fn members(&self, id: CompoundId) -> Result<&[Node<E>], DomError> {
        Ok(self.get(id)?.members())
    }

    pub fn parent(&self, id: CompoundId) -> Result<Option<CompoundId>, DomError> {
        Ok(self.get(id)?.parent)
    }

    /// Number of enclosing compounds above `id`.
    pub fn depth(&self, id: CompoundId) -> Result<u32, DomError> {
        let mut depth = 0;
        let mut cursor = self.get(id)?.parent;
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.get(parent)?.parent;
        }
        Ok(depth)
    }

    /// `::`-joined names from the outermost named scope down to `id`.
    /// Files and anonymous scopes contribute nothing.
    pub fn qualified_name(&self, id: CompoundId) -> Result<String, DomError> {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let compound = self.get(current)?;
            if compound.kind != CompoundKind::File && !compound.is_anonymous() {
                names.push(compound.name.as_str());
            }
            cursor = compound.parent;
        }
        names.reverse();
        Ok(names.join("::"))
    }

    /// Open a nested scope under `parent` and record it as `parent`'s next
    /// member.
    pub fn open_compound(
        &mut self,
        parent: CompoundId,
        kind: CompoundKind,
        name: impl Into<String>,
        protection: Protection,
    ) -> Result<CompoundId, DomError> {
        let depth = self.depth(parent)? + 1;
        self.check_depth(depth)?;
        let id = self.next_id()?;
        let name = name.into();

        tracing::debug!(compound = %id, %parent, %kind, name = name.as_str(), "opened compound");

        self.compounds
            .push(Compound::new(kind, name, protection, Some(parent)));
        let mut node = Node::new(NodeData::Compound(id), protection);
        node.set_owner(Some(parent));
        self.get_mut(parent)?.members.push(node);
        Ok(id)
    }

    pub fn add_inheritance(
        &mut self,
        compound: CompoundId,
        edge: Inheritance,
    ) -> Result<(), DomError> {
        self.get_mut(compound)?.inheritance.push(edge);
        Ok(())
    }

    /// Append `node` to `parent`, setting its owner. Returns the member
    /// index the node now occupies.
    ///
    /// A `Compound` payload re-links that compound under `parent`. With
    /// `coalesce_blank_lines`, a blank-line node directly after a blank-line
    /// member extends that run and the existing index is returned.
    pub fn attach(&mut self, parent: CompoundId, mut node: Node<E>) -> Result<usize, DomError> {
        self.get(parent)?;
        if let NodeData::Compound(child) = node.data() {
            self.link(*child, parent)?;
        }

        let coalesce = self.options.coalesce_blank_lines;
        let kind = node.kind();
        let compound = self.get_mut(parent)?;

        if coalesce {
            if let NodeData::BlankLine(incoming) = node.data() {
                let incoming = *incoming;
                let last_index = compound.members.len().saturating_sub(1);
                if let Some(NodeData::BlankLine(run)) =
                    compound.members.last_mut().map(Node::data_mut)
                {
                    run.extend(incoming);
                    tracing::trace!(%parent, lines = run.count().get(), "coalesced blank lines");
                    return Ok(last_index);
                }
            }
        }

        node.set_owner(Some(parent));
        compound.members.push(node);
        let index = compound.members.len() - 1;
        tracing::debug!(%parent, %kind, index, "attached node");
        Ok(index)
    }

    /// Remove the member at `index`, clearing its owner. A nested compound
    /// stays in the arena, unparented, until it is attached again.
    pub fn detach(&mut self, parent: CompoundId, index: usize) -> Result<Node<E>, DomError> {
        let members = &self.get(parent)?.members;
        let Some(target) = members.get(index) else {
            return Err(DomError::MemberOutOfRange {
                compound: parent,
                index,
                len: members.len(),
            });
        };
        let child = match target.data() {
            NodeData::Compound(child) => Some(*child),
            _ => None,
        };
        if let Some(child) = child {
            self.get(child)?;
        }

        let mut node = self.get_mut(parent)?.members.remove(index);
        node.set_owner(None);
        if let Some(child) = child {
            self.get_mut(child)?.parent = None;
        }
        tracing::debug!(%parent, kind = %node.kind(), index, "detached node");
        Ok(node)
    }

    /// Pre-order traversal of the members of `id`, descending into nested
    /// compounds. Yields each node with its nesting depth below `id`.
    pub fn walk(&self, id: CompoundId) -> Result<Walk<'_, E>, DomError> {
        let start = self.get(id)?;
        Ok(Walk {
            dom: self,
            stack: vec![(start.members.iter(), 0)],
        })
    }

    /// Shape checks for a tree that did not come from the builder methods:
    /// a parentless file root, parent links mirrored by exactly one
    /// `Compound` member in the parent, owners matching their compound,
    /// acyclic parent chains within the depth limit.
    fn check_tree(&self) -> Result<(), DomError> {
        let root = self.compounds.first().ok_or(DomError::MissingRoot)?;
        if root.kind != CompoundKind::File || root.parent.is_some() {
            return Err(DomError::MissingRoot);
        }

        let mut references = vec![0_usize; self.compounds.len()];
        for (id, compound) in self.compounds() {
            for (index, node) in compound.members.iter().enumerate() {
                if node.owner() != Some(id) {
                    return Err(DomError::OwnerMismatch { compound: id, index });
                }
                if let NodeData::Compound(child) = node.data() {
                    if self.get(*child)?.parent != Some(id) {
                        return Err(DomError::BrokenParentLink {
                            child: *child,
                            parent: id,
                        });
                    }
                    references[child.index()] += 1;
                }
            }
        }

        for (id, compound) in self.compounds() {
            let Some(parent) = compound.parent else {
                continue;
            };
            if references[id.index()] != 1 {
                return Err(DomError::BrokenParentLink { child: id, parent });
            }

            let mut steps = 0_usize;
            let mut cursor = Some(parent);
            while let Some(current) = cursor {
                steps += 1;
                if steps > self.compounds.len() {
                    return Err(DomError::Cycle { child: id, parent });
                }
                cursor = self.get(current)?.parent;
            }
            let depth = u32::try_from(steps).map_err(|_| DomError::CapacityExceeded)?;
            self.check_depth(depth)?;
        }
        Ok(())
    }

    fn get(&self, id: CompoundId) -> Result<&Compound<E>, DomError> {
        self.compounds
            .get(id.index())
            .ok_or(DomError::UnknownCompound(id))
    }

    fn get_mut(&mut self, id: CompoundId) -> Result<&mut Compound<E>, DomError> {
        self.compounds
            .get_mut(id.index())
            .ok_or(DomError::UnknownCompound(id))
    }

    fn next_id(&self) -> Result<CompoundId, DomError> {
        u32::try_from(self.compounds.len())
            .map(CompoundId)
            .map_err(|_| DomError::CapacityExceeded)
    }

    fn check_depth(&self, depth: u32) -> Result<(), DomError> {
        let limit = self.options.max_compound_depth;
        if depth > limit {
            tracing::warn!(depth, limit, "compound nesting limit reached");
            return Err(DomError::DepthExceeded { limit });
        }
        Ok(())
    }

    /// Levels of nested compounds below `id` (0 for a scope with none).
    fn height(&self, id: CompoundId) -> Result<u32, DomError> {
        let mut height = 0;
        for child in self.get(id)?.nested() {
            height = height.max(self.height(child)? + 1);
        }
        Ok(height)
    }

    fn link(&mut self, child: CompoundId, parent: CompoundId) -> Result<(), DomError> {
        if child == CompoundId::ROOT {
            return Err(DomError::RootNotAttachable);
        }
        if self.get(child)?.parent.is_some() {
            return Err(DomError::AlreadyAttached(child));
        }

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(DomError::Cycle { child, parent });
            }
            cursor = self.get(current)?.parent;
        }

        let depth = self.depth(parent)? + 1 + self.height(child)?;
        self.check_depth(depth)?;
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

/// Iterator returned by [`Dom::walk`].
#[derive(Debug)]
pub struct Walk<'a, E = Expr> {
    dom: &'a Dom<E>,
    stack: Vec<(slice::Iter<'a, Node<E>>, usize)>,
}

impl<'a, E> Iterator for Walk<'a, E> {
    type Item = (usize, &'a Node<E>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (members, depth) = self.stack.last_mut()?;
            let depth = *depth;
            let Some(node) = members.next() else {
                self.stack.pop();
                continue;
            };
            if let NodeData::Compound(id) = node.data() {
                if let Some(nested) = self.dom.compound(*id) {
                    self.stack.push((nested.members.iter(), depth + 1));
                }
            }
            return Some((depth, node));
        }
    }
}

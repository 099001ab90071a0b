//! Error types for the compound arena.
//!
//! Node construction is total and has no error type. Only arena operations
//! that address compounds by handle, or re-link nested compounds, can fail.

use thiserror::Error;

use crate::dom::CompoundId;

/// Errors raised by [`crate::Dom`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The handle does not address a compound in this arena.
    #[error("Unknown compound: {0}")]
    UnknownCompound(CompoundId),

    /// A member index past the end of a compound's member list.
    #[error("Member index {index} out of range for compound {compound} ({len} members)")]
    MemberOutOfRange {
        compound: CompoundId,
        index: usize,
        len: usize,
    },

    /// The nested compound already has an enclosing compound.
    #[error("Compound {0} is already attached")]
    AlreadyAttached(CompoundId),

    /// Attaching `child` under `parent` would make a compound its own ancestor.
    #[error("Attaching compound {child} under {parent} would create a cycle")]
    Cycle {
        child: CompoundId,
        parent: CompoundId,
    },

    /// The root file compound cannot be nested anywhere.
    #[error("The root compound cannot be attached")]
    RootNotAttachable,

    /// The arena ran out of compound handles.
    #[error("Compound arena is full")]
    CapacityExceeded,

    /// A tree read from outside has no parentless file compound at the root.
    #[error("The arena has no parentless file compound at the root")]
    MissingRoot,

    /// A parent link that is not mirrored by exactly one `Compound` member
    /// of the parent, or a member whose compound points elsewhere.
    #[error("Compound {child} and its parent {parent} disagree about nesting")]
    BrokenParentLink {
        child: CompoundId,
        parent: CompoundId,
    },

    /// A member whose owner handle is not the compound holding it.
    #[error("Member {index} of compound {compound} has a foreign owner")]
    OwnerMismatch { compound: CompoundId, index: usize },

    /// Compound nesting went past the configured limit.
    #[error("Compound nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: u32 },
}

/// Raw bits that do not form a valid identifier-attribute set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid identifier attribute bits: {0:#05x}")]
pub struct InvalidAttribBits(pub u16);

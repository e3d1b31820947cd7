//! Typed error kinds raised by the container and mediator operations.
//!
//! Operations return [`Report`](color_eyre::eyre::Report), the kind is recovered with
//! [`downcast_ref`](color_eyre::eyre::Report::downcast_ref).
//!
//! ```rust
//! use biophylo_core::{Error, Listable, Kind};
//! let list = Listable::new(0, Kind::Tree);
//! let result = list.get_by_index(3);
//! let report = result.unwrap_err();
//! assert!(matches!(report.downcast_ref::<Error>(), Some(Error::OutOfBounds { index: 3, .. })));
//! ```

use crate::{Id, Kind, Operation};
use thiserror::Error;

/// Errors that can occur when mutating or querying entities.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// An entity's required container kind does not match the container.
    #[error("entity {id} may only be held by a {required} container, not a {container} container")]
    KindMismatch {
        /// Identifier of the rejected entity.
        id: Id,
        /// The container kind the entity requires.
        required: Kind,
        /// The kind of the container that rejected it.
        container: Kind,
    },

    /// A referenced entity (or set) is not a member.
    #[error("not found: {0}")]
    NotFound(String),

    /// An index has no corresponding element.
    #[error("index {index} is out of bounds for a container with {len} slots")]
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of slots in the container.
        len: usize,
    },

    /// An argument lacks a capability the operation needs.
    #[error("object mismatch: {0}")]
    ObjectMismatch(String),

    /// Malformed input.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// A listener tried to mutate the container that notified it.
    #[error("container {container} was mutated from inside its own {operation} notification")]
    Reentrant {
        /// Identifier of the container's owner.
        container: Id,
        /// The operation being notified.
        operation: Operation,
    },

    /// A uniqueness policy of a specialised container was violated.
    #[error("duplicate: {0}")]
    Duplicate(String),
}

#![doc = include_str!("../README.md")]

pub mod entity;
pub mod error;
pub mod identity;
pub mod listable;
pub mod mediator;
mod set;

#[cfg(test)]
pub(crate) mod fixtures;

#[doc(inline)]
pub use crate::entity::{downcast, Core, Entity, Handle, IntoHandle, Kind, NumericField, TextField};
#[doc(inline)]
pub use crate::error::Error;
#[doc(inline)]
pub use crate::identity::Id;
#[doc(inline)]
pub use crate::listable::{Comparator, Listable, Listener, Operation};
#[doc(inline)]
pub use crate::mediator::cross_reference;
#[doc(inline)]
pub use crate::set::Set;

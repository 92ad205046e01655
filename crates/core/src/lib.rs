//! Domain layer for the item catalog: the `Item` model, the validation and
//! sanitization rules applied at the service boundary, and the error taxonomy
//! shared with the service/HTTP layers.
//!
//! This crate is pure: no I/O, no async, no store knowledge.

pub mod error;
pub mod item;
pub mod validate;

pub use error::ValidationError;
pub use item::{Catalog, Item, ItemId};
pub use validate::{ItemInput, ItemPatch, NewItem};

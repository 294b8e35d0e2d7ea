//! # Domain Module
//!
//! Core types for the ticket contract: the record model, argument
//! validation, the error taxonomy and the write invariants.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;

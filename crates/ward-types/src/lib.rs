//! Shared primitive types for the ward data layer.
//!
//! These types sit underneath every other crate in the workspace:
//! - [`Field`]: three-state presence for partial updates (absent / null / value)
//! - [`RecordId`] and [`ToRecordId`]: integer record identifiers with string coercion
//! - [`IntLike`]: an integer that may arrive as a number or as text
//! - [`LooseText`]: text that may arrive as a string, number or boolean
//! - [`NonEmptyText`]: trimmed text guaranteed to contain something

mod field;
mod id;
mod text;

pub use field::Field;
pub use id::{IdError, IntLike, RecordId, ToRecordId};
pub use text::{LooseText, NonEmptyText, TextError};

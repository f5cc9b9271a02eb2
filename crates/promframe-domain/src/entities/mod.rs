//! Domain entities

pub mod field;
pub mod frame;

pub use field::{Field, FieldType, FieldValues};
pub use frame::{Frame, FrameKind, FrameMeta};

//! Domain Value Objects
//!
//! Immutable objects that describe series identity and parse diagnostics.

mod label_set;
mod notice;

pub use label_set::LabelSet;
pub use notice::{Notice, NoticeSeverity};

//! Tags module - coloured subscription labels.

mod tags_model;

pub use tags_model::{Tag, TagRegistry};

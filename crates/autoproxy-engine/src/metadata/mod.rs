//! Tag Metadata
//!
//! Descriptor model for declarative tags, the cloner that turns live tags
//! into descriptors, and the merger that combines descriptor sets.

mod cloner;
mod descriptor;
mod merger;

pub use cloner::TagCloner;
pub use descriptor::{MemberValue, TagDescriptor, TagSet, ValueKind};
pub use merger::{merge, merge_class_tags, merge_parameters, TagKinds};

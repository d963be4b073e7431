//! Host Reflection Facility
//!
//! The read side the synthesizer consumes: live tag instances with their
//! typed member values, tag and enum definitions, and remote interface
//! definitions with method and parameter tags.
//!
//! ```ignore
//! let mut catalog = TypeCatalog::with_standard_tags();
//! catalog.define_interface(
//!     InterfaceBuilder::new("sample.client.TestClient")
//!         .tag(LiveTag::new(REMOTE_INTERFACE_TAG).with("path", LiveValue::str("/test")))
//!         .method(MethodDef::new("index", "core.String"))
//!         .build(),
//! );
//! ```

mod catalog;
mod live;
mod types;

pub use catalog::{EnumDefinition, InterfaceBuilder, InterfaceDef, MethodDef, ParamDef, TypeCatalog};
pub use live::{DefaultAccessor, LiveTag, LiveValue, MemberAccessor, MemberDecl, TagDefinition};
pub use types::{DeclaredType, MethodSignature, SignatureKey};

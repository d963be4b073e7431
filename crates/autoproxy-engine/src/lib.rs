//! Autoproxy Engine
//!
//! Synthesizes forwarding types from remote interface descriptors.
//!
//! Given an interface carrying declarative tags, the engine builds a new
//! type that forwards every declared method to an injected delegate and
//! carries a merged copy of the interface's tags, extended with the
//! controller and routing tags an inbound request router looks for.
//!
//! ## Modules
//!
//! - [`reflect`]: host reflection facility (live tags, type catalog)
//! - [`metadata`]: tag descriptor model, cloner, and merger
//! - [`synth`]: shell pool, type loader, and the synthesis pass

pub mod error;
pub mod metadata;
pub mod reflect;
pub mod synth;
pub mod well_known;

pub use error::{SynthesisError, SynthesisResult};
pub use metadata::{MemberValue, TagCloner, TagDescriptor, TagSet, ValueKind};
pub use reflect::{DeclaredType, InterfaceBuilder, LiveTag, LiveValue, TagDefinition, TypeCatalog};
pub use synth::{
    MethodSignature, ProxyInstance, ShellPool, SynthesisContext, SynthesisOptions,
    SynthesizedType, TypeLoader, TypeShell,
};

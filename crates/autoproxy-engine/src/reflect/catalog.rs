//! Type Catalog
//!
//! The host type system: remote interface definitions, enum definitions,
//! and tag definitions, looked up by fully qualified name.

use rustc_hash::FxHashMap;

use super::live::{LiveTag, LiveValue, TagDefinition};
use super::types::{DeclaredType, MethodSignature};
use crate::error::{SynthesisError, SynthesisResult};
use crate::well_known::{
    CONTROLLER_TAG, INJECT_TAG, PATH_MEMBER, REMOTE_INTERFACE_TAG, REQUEST_MAPPING_TAG,
    STRING_TYPE, VOID_TYPE,
};

/// Enum definition: constants in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDefinition {
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumDefinition {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Ordinal of a constant
    pub fn ordinal_of(&self, constant: &str) -> Option<u32> {
        self.constants
            .iter()
            .position(|c| c == constant)
            .map(|i| i as u32)
    }
}

/// A method parameter: its type and tags
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    pub type_name: String,
    pub tags: Vec<LiveTag>,
}

/// A method declared on a remote interface
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<ParamDef>,
    pub return_type: String,
    pub tags: Vec<LiveTag>,
}

impl MethodDef {
    /// Create a method with no parameters and no tags
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: return_type.into(),
            tags: Vec::new(),
        }
    }

    /// Create a method returning nothing
    pub fn void(name: impl Into<String>) -> Self {
        Self::new(name, VOID_TYPE)
    }

    /// Add a parameter
    pub fn param(mut self, type_name: impl Into<String>, tags: Vec<LiveTag>) -> Self {
        self.params.push(ParamDef {
            type_name: type_name.into(),
            tags,
        });
        self
    }

    /// Attach a method-level tag
    pub fn tag(mut self, tag: LiveTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(
            self.name.clone(),
            self.params.iter().map(|p| p.type_name.clone()).collect(),
            self.return_type.clone(),
        )
    }
}

/// A remote interface descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDef {
    pub name: String,
    pub tags: Vec<LiveTag>,
    pub methods: Vec<MethodDef>,
}

impl InterfaceDef {
    /// Get a type-level tag by kind
    pub fn tag(&self, kind: &str) -> Option<&LiveTag> {
        self.tags.iter().find(|t| t.kind() == kind)
    }

    /// Check if a type-level tag of this kind is present
    pub fn has_tag(&self, kind: &str) -> bool {
        self.tag(kind).is_some()
    }

    /// Package part of the name (everything before the last `.`)
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
    }
}

/// Builder for [`InterfaceDef`]
#[derive(Debug, Clone)]
pub struct InterfaceBuilder {
    def: InterfaceDef,
}

impl InterfaceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: InterfaceDef {
                name: name.into(),
                tags: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    /// Attach a type-level tag
    pub fn tag(mut self, tag: LiveTag) -> Self {
        self.def.tags.push(tag);
        self
    }

    /// Declare a method
    pub fn method(mut self, method: MethodDef) -> Self {
        self.def.methods.push(method);
        self
    }

    pub fn build(self) -> InterfaceDef {
        self.def
    }
}

/// Registry of every type the synthesizer can resolve
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    interfaces: FxHashMap<String, InterfaceDef>,
    enums: FxHashMap<String, EnumDefinition>,
    tags: FxHashMap<String, TagDefinition>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog preloaded with the marker, routing, controller,
    /// and injection tag definitions
    pub fn with_standard_tags() -> Self {
        let string = || DeclaredType::named(STRING_TYPE);
        let blank = || LiveValue::str("");

        let mut catalog = Self::new();
        catalog.define_tag(
            TagDefinition::new(REMOTE_INTERFACE_TAG)
                .member_with_default("name", string(), blank())
                .member_with_default("qualifier", string(), blank())
                .member_with_default("url", string(), blank())
                .member_with_default(PATH_MEMBER, string(), blank()),
        );
        catalog.define_tag(
            TagDefinition::new(REQUEST_MAPPING_TAG)
                .member_with_default("name", string(), blank())
                .member_with_default(
                    PATH_MEMBER,
                    DeclaredType::array_of(string()),
                    LiveValue::Array(Vec::new()),
                ),
        );
        catalog.define_tag(
            TagDefinition::new(CONTROLLER_TAG).member_with_default("value", string(), blank()),
        );
        catalog.define_tag(
            TagDefinition::new(INJECT_TAG).member_with_default("name", string(), blank()),
        );
        catalog
    }

    /// Register an interface, replacing one with the same name
    pub fn define_interface(&mut self, def: InterfaceDef) {
        self.interfaces.insert(def.name.clone(), def);
    }

    /// Register an enum
    pub fn define_enum(&mut self, def: EnumDefinition) {
        self.enums.insert(def.name.clone(), def);
    }

    /// Register a tag definition
    pub fn define_tag(&mut self, def: TagDefinition) {
        self.tags.insert(def.kind().to_string(), def);
    }

    /// Resolve an interface by name
    pub fn resolve_interface(&self, name: &str) -> SynthesisResult<&InterfaceDef> {
        self.interfaces
            .get(name)
            .ok_or_else(|| SynthesisError::NotFound(name.to_string()))
    }

    /// Resolve a tag definition by kind
    pub fn tag_definition(&self, kind: &str) -> SynthesisResult<&TagDefinition> {
        self.tags
            .get(kind)
            .ok_or_else(|| SynthesisError::NotFound(kind.to_string()))
    }

    /// Resolve an enum definition by name
    pub fn enum_definition(&self, name: &str) -> SynthesisResult<&EnumDefinition> {
        self.enums
            .get(name)
            .ok_or_else(|| SynthesisError::NotFound(name.to_string()))
    }

    /// Build a live enum constant, resolving its ordinal
    pub fn enum_value(&self, type_name: &str, constant: &str) -> SynthesisResult<LiveValue> {
        let def = self.enum_definition(type_name)?;
        let ordinal = def
            .ordinal_of(constant)
            .ok_or_else(|| SynthesisError::NotFound(format!("{type_name}.{constant}")))?;
        Ok(LiveValue::Enum {
            type_name: type_name.to_string(),
            constant: constant.to_string(),
            ordinal,
        })
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Check if `name` is a tag-defining type
    pub fn is_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// All interface definitions, sorted by name
    pub fn interfaces(&self) -> Vec<&InterfaceDef> {
        let mut all: Vec<_> = self.interfaces.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Number of registered interfaces
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_interface_not_found() {
        let catalog = TypeCatalog::new();
        assert_eq!(
            catalog.resolve_interface("missing.Client").unwrap_err(),
            SynthesisError::NotFound("missing.Client".to_string())
        );
    }

    #[test]
    fn test_enum_value_resolves_ordinal() {
        let mut catalog = TypeCatalog::new();
        catalog.define_enum(EnumDefinition::new("web.Method", ["GET", "POST", "PUT"]));

        assert_eq!(
            catalog.enum_value("web.Method", "POST").unwrap(),
            LiveValue::Enum {
                type_name: "web.Method".to_string(),
                constant: "POST".to_string(),
                ordinal: 1,
            }
        );
        assert!(catalog.enum_value("web.Method", "PATCH").is_err());
        assert!(catalog.is_enum("web.Method"));
        assert!(!catalog.is_tag("web.Method"));
    }

    #[test]
    fn test_standard_tags() {
        let catalog = TypeCatalog::with_standard_tags();
        assert!(catalog.is_tag(REMOTE_INTERFACE_TAG));
        assert!(catalog.is_tag(REQUEST_MAPPING_TAG));
        assert!(catalog.is_tag(CONTROLLER_TAG));
        assert!(catalog.is_tag(INJECT_TAG));
        let marker = catalog.tag_definition(REMOTE_INTERFACE_TAG).unwrap();
        assert!(marker.get_member(PATH_MEMBER).is_some());
    }

    #[test]
    fn test_interface_builder_and_signature() {
        let iface = InterfaceBuilder::new("sample.client.TestClient")
            .tag(LiveTag::new(REMOTE_INTERFACE_TAG))
            .method(MethodDef::new("testPost", STRING_TYPE).param("core.Map", vec![]))
            .build();

        assert_eq!(iface.package(), "sample.client");
        assert!(iface.has_tag(REMOTE_INTERFACE_TAG));
        let sig = iface.methods[0].signature();
        assert_eq!(sig.name, "testPost");
        assert_eq!(sig.params, vec!["core.Map".to_string()]);
        assert_eq!(sig.return_type, STRING_TYPE);
    }

    #[test]
    fn test_interfaces_sorted() {
        let mut catalog = TypeCatalog::new();
        catalog.define_interface(InterfaceBuilder::new("b.B").build());
        catalog.define_interface(InterfaceBuilder::new("a.A").build());
        let names: Vec<_> = catalog.interfaces().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.A", "b.B"]);
        assert_eq!(catalog.interface_count(), 2);
    }
}

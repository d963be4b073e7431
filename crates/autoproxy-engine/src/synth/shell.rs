//! Type shells: the mutable shape of a type under construction

use crate::metadata::TagSet;
use crate::reflect::{MethodSignature, SignatureKey};

/// A field on a type shell
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShell {
    pub name: String,
    pub type_name: String,
    pub tags: TagSet,
}

/// What a method does when invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBody {
    /// No body yet
    Abstract,
    /// Call `method` on the value held in `field` with the same arguments
    /// and return its result
    Forward { field: String, method: String },
}

/// A method on a type shell
#[derive(Debug, Clone, PartialEq)]
pub struct MethodShell {
    pub signature: MethodSignature,
    pub body: MethodBody,
    pub tags: TagSet,
    /// One tag set per parameter position
    pub param_tags: Vec<TagSet>,
}

/// A type under construction
#[derive(Debug, Clone, PartialEq)]
pub struct TypeShell {
    name: String,
    superclass: Option<String>,
    fields: Vec<FieldShell>,
    methods: Vec<MethodShell>,
    tags: TagSet,
}

impl TypeShell {
    /// Create an empty shell with no superclass
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            tags: TagSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    pub fn set_superclass(&mut self, superclass: Option<String>) {
        self.superclass = superclass;
    }

    /// Class-level tags
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: TagSet) {
        self.tags = tags;
    }

    pub fn fields(&self) -> &[FieldShell] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldShell> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the field called `name` with type `type_name`, adding it if
    /// absent. An existing field keeps its tags.
    pub fn ensure_field(&mut self, name: &str, type_name: &str) -> &mut FieldShell {
        let index = match self.fields.iter().position(|f| f.name == name) {
            Some(index) => index,
            None => {
                self.fields.push(FieldShell {
                    name: name.to_string(),
                    type_name: type_name.to_string(),
                    tags: TagSet::new(),
                });
                self.fields.len() - 1
            }
        };
        let field = &mut self.fields[index];
        field.type_name = type_name.to_string();
        field
    }

    pub fn methods(&self) -> &[MethodShell] {
        &self.methods
    }

    /// Get the method matching `key` (name and parameter types)
    pub fn declared_method(&self, key: &SignatureKey) -> Option<&MethodShell> {
        self.methods
            .iter()
            .find(|m| m.signature.name == key.name && m.signature.params == key.params)
    }

    pub fn declared_method_mut(&mut self, key: &SignatureKey) -> Option<&mut MethodShell> {
        self.methods
            .iter_mut()
            .find(|m| m.signature.name == key.name && m.signature.params == key.params)
    }

    /// Declare a method with `body`. A method with a matching signature is
    /// given the new body and return type and keeps its tags.
    pub fn ensure_method(
        &mut self,
        signature: MethodSignature,
        body: MethodBody,
    ) -> &mut MethodShell {
        let index = match self.methods.iter().position(|m| m.signature.matches(&signature)) {
            Some(index) => index,
            None => {
                self.methods.push(MethodShell {
                    signature: signature.clone(),
                    body: MethodBody::Abstract,
                    tags: TagSet::new(),
                    param_tags: Vec::new(),
                });
                self.methods.len() - 1
            }
        };
        let method = &mut self.methods[index];
        method.signature = signature;
        method.body = body;
        method
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TagDescriptor;

    #[test]
    fn test_ensure_field_keeps_tags() {
        let mut shell = TypeShell::new("a.A$AutoProxy");
        shell
            .ensure_field("delegate", "a.A")
            .tags
            .insert_if_absent(TagDescriptor::new("inject.Resource"));
        let again = shell.ensure_field("delegate", "a.A");
        assert!(again.tags.contains_kind("inject.Resource"));
        assert_eq!(shell.fields().len(), 1);
    }

    #[test]
    fn test_ensure_method_replaces_body_only() {
        let mut shell = TypeShell::new("a.A$AutoProxy");
        let sig = MethodSignature::new("index", vec![], "core.String");
        shell
            .ensure_method(sig.clone(), MethodBody::Abstract)
            .tags
            .insert_if_absent(TagDescriptor::new("web.GetMapping"));

        let body = MethodBody::Forward {
            field: "delegate".to_string(),
            method: "index".to_string(),
        };
        let method = shell.ensure_method(sig.clone(), body.clone());
        assert_eq!(method.body, body);
        assert!(method.tags.contains_kind("web.GetMapping"));
        assert_eq!(shell.methods().len(), 1);
        assert!(shell.declared_method(&sig.key()).is_some());
    }

    #[test]
    fn test_overloads_are_distinct() {
        let mut shell = TypeShell::new("a.A$AutoProxy");
        shell.ensure_method(MethodSignature::new("get", vec![], "int"), MethodBody::Abstract);
        shell.ensure_method(
            MethodSignature::new("get", vec!["int".to_string()], "int"),
            MethodBody::Abstract,
        );
        assert_eq!(shell.methods().len(), 2);
    }
}

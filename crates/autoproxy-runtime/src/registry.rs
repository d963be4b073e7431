//! Bean Registry
//!
//! Holds bean definitions for synthesized types and creates their
//! instances on first request, binding every injection point to a
//! delegate looked up by the field's type.

use std::fmt;
use std::sync::Arc;

use autoproxy_engine::well_known::INJECT_TAG;
use autoproxy_engine::{ProxyInstance, SynthesizedType};
use autoproxy_sdk::Delegate;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::RegistryError;

/// Instance lifetime of a bean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// One shared instance, created on first request
    Singleton,
    /// A new instance for every request
    Prototype,
}

/// How to create a bean
#[derive(Debug, Clone)]
pub struct BeanDefinition {
    pub name: String,
    pub ty: Arc<SynthesizedType>,
    pub scope: Scope,
    pub lazy: bool,
}

impl BeanDefinition {
    /// Lazy singleton named after the type
    pub fn lazy_singleton(ty: Arc<SynthesizedType>) -> Self {
        Self {
            name: bean_name(ty.name()),
            ty,
            scope: Scope::Singleton,
            lazy: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Default bean name for a type: the simple name, with nested-type
/// separators shown as `.`, and the first letter lowered unless the name
/// starts with two capitals.
///
/// `demo.TestClient$AutoProxy` becomes `testClient.AutoProxy`.
pub fn bean_name(type_name: &str) -> String {
    let simple = type_name.rsplit_once('.').map_or(type_name, |(_, s)| s);
    let simple = simple.replace('$', ".");

    let mut chars = simple.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a.is_uppercase() && b.is_uppercase() => simple,
        (Some(a), _) => a.to_lowercase().chain(simple.chars().skip(1)).collect(),
        (None, _) => simple,
    }
}

/// Source of delegates for injection points
pub trait DelegateProvider: Send + Sync {
    /// Delegate for a field declared as `type_name`
    fn delegate_for(&self, type_name: &str) -> Option<Arc<dyn Delegate>>;
}

/// Delegates keyed by the type they implement
#[derive(Default)]
pub struct DelegateMap {
    delegates: FxHashMap<String, Arc<dyn Delegate>>,
}

impl DelegateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>, delegate: Arc<dyn Delegate>) {
        self.delegates.insert(type_name.into(), delegate);
    }

    pub fn with(mut self, type_name: impl Into<String>, delegate: impl Delegate + 'static) -> Self {
        self.insert(type_name, Arc::new(delegate));
        self
    }
}

impl DelegateProvider for DelegateMap {
    fn delegate_for(&self, type_name: &str) -> Option<Arc<dyn Delegate>> {
        self.delegates.get(type_name).cloned()
    }
}

impl fmt::Debug for DelegateMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.delegates.keys().collect();
        types.sort();
        f.debug_struct("DelegateMap").field("types", &types).finish()
    }
}

struct BeanEntry {
    definition: BeanDefinition,
    instance: OnceCell<Arc<ProxyInstance>>,
}

/// Registered beans and their singleton instances
pub struct BeanRegistry {
    beans: FxHashMap<String, BeanEntry>,
    provider: Box<dyn DelegateProvider>,
    inject_kind: String,
}

impl BeanRegistry {
    /// Create an empty registry resolving delegates from `provider`
    pub fn new(provider: impl DelegateProvider + 'static) -> Self {
        Self {
            beans: FxHashMap::default(),
            provider: Box::new(provider),
            inject_kind: INJECT_TAG.to_string(),
        }
    }

    /// Use a different tag kind to find injection points
    pub fn with_inject_kind(mut self, kind: impl Into<String>) -> Self {
        self.inject_kind = kind.into();
        self
    }

    /// Register a definition. Names are unique.
    ///
    /// Eager singletons are instantiated here, so their missing
    /// dependencies fail registration.
    pub fn register(&mut self, definition: BeanDefinition) -> Result<(), RegistryError> {
        if self.beans.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateBean(definition.name));
        }

        let instance = if definition.scope == Scope::Singleton && !definition.lazy {
            OnceCell::with_value(self.create(&definition)?)
        } else {
            OnceCell::new()
        };
        let entry = BeanEntry {
            definition,
            instance,
        };

        debug!(
            bean = %entry.definition.name,
            type_name = entry.definition.ty.name(),
            lazy = entry.definition.lazy,
            "registered bean"
        );
        self.beans.insert(entry.definition.name.clone(), entry);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.beans.contains_key(name)
    }

    pub fn definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.beans.get(name).map(|e| &e.definition)
    }

    /// Registered bean names, sorted
    pub fn bean_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.beans.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    /// Whether a singleton has been created yet
    pub fn is_instantiated(&self, name: &str) -> bool {
        self.beans.get(name).is_some_and(|e| e.instance.get().is_some())
    }

    /// Get the instance for `name`, creating it if needed
    pub fn get_bean(&self, name: &str) -> Result<Arc<ProxyInstance>, RegistryError> {
        let entry = self
            .beans
            .get(name)
            .ok_or_else(|| RegistryError::UnknownBean(name.to_string()))?;
        match entry.definition.scope {
            Scope::Singleton => entry
                .instance
                .get_or_try_init(|| self.create(&entry.definition))
                .cloned(),
            Scope::Prototype => self.create(&entry.definition),
        }
    }

    fn create(&self, definition: &BeanDefinition) -> Result<Arc<ProxyInstance>, RegistryError> {
        let mut instance = definition.ty.instantiate();
        for field in definition.ty.fields_tagged(&self.inject_kind) {
            let delegate = self.provider.delegate_for(&field.type_name).ok_or_else(|| {
                RegistryError::UnresolvedDependency {
                    bean: definition.name.clone(),
                    field: field.name.clone(),
                    type_name: field.type_name.clone(),
                }
            })?;
            instance.inject(&field.name, delegate)?;
        }
        debug!(bean = %definition.name, "instantiated bean");
        Ok(Arc::new(instance))
    }
}

impl fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanRegistry")
            .field("beans", &self.bean_names())
            .field("inject_kind", &self.inject_kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoproxy_engine::reflect::MethodDef;
    use autoproxy_engine::well_known::REMOTE_INTERFACE_TAG;
    use autoproxy_engine::{InterfaceBuilder, LiveTag, SynthesisContext, TypeCatalog};
    use autoproxy_sdk::{MethodTable, Value};

    fn proxy_type() -> Arc<SynthesizedType> {
        let mut catalog = TypeCatalog::with_standard_tags();
        catalog.define_interface(
            InterfaceBuilder::new("demo.TestClient")
                .tag(LiveTag::new(REMOTE_INTERFACE_TAG))
                .method(MethodDef::new("index", "core.String"))
                .build(),
        );
        SynthesisContext::new(catalog).synthesize("demo.TestClient").unwrap()
    }

    fn delegates() -> DelegateMap {
        DelegateMap::new().with(
            "demo.TestClient",
            MethodTable::new().with("index", |_| Ok(Value::str("OK"))),
        )
    }

    #[test]
    fn test_bean_name() {
        assert_eq!(bean_name("demo.TestClient$AutoProxy"), "testClient.AutoProxy");
        assert_eq!(bean_name("demo.UserService"), "userService");
        assert_eq!(bean_name("demo.URLClient"), "URLClient");
        assert_eq!(bean_name("Bare"), "bare");
    }

    #[test]
    fn test_lazy_singleton() {
        let mut registry = BeanRegistry::new(delegates());
        let definition = BeanDefinition::lazy_singleton(proxy_type());
        let name = definition.name.clone();
        registry.register(definition).unwrap();

        assert!(!registry.is_instantiated(&name));
        let first = registry.get_bean(&name).unwrap();
        assert!(registry.is_instantiated(&name));
        let second = registry.get_bean(&name).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.invoke_by_name("index", &[]).unwrap(), Value::str("OK"));
    }

    #[test]
    fn test_prototype_creates_fresh_instances() {
        let mut registry = BeanRegistry::new(delegates());
        let mut definition = BeanDefinition::lazy_singleton(proxy_type());
        definition.scope = Scope::Prototype;
        registry.register(definition.clone()).unwrap();

        let a = registry.get_bean(&definition.name).unwrap();
        let b = registry.get_bean(&definition.name).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!registry.is_instantiated(&definition.name));
    }

    #[test]
    fn test_duplicate_and_unknown() {
        let ty = proxy_type();
        let mut registry = BeanRegistry::new(delegates());
        registry.register(BeanDefinition::lazy_singleton(Arc::clone(&ty))).unwrap();
        assert!(matches!(
            registry.register(BeanDefinition::lazy_singleton(ty)),
            Err(RegistryError::DuplicateBean(_))
        ));
        assert!(matches!(
            registry.get_bean("nothing"),
            Err(RegistryError::UnknownBean(_))
        ));
    }

    #[test]
    fn test_unresolved_dependency() {
        let mut registry = BeanRegistry::new(DelegateMap::new());
        let definition = BeanDefinition::lazy_singleton(proxy_type());
        let name = definition.name.clone();
        registry.register(definition).unwrap();

        match registry.get_bean(&name) {
            Err(RegistryError::UnresolvedDependency { field, type_name, .. }) => {
                assert_eq!(field, "delegate");
                assert_eq!(type_name, "demo.TestClient");
            }
            other => panic!("expected unresolved dependency, got {:?}", other),
        }
        assert!(!registry.is_instantiated(&name));
    }

    #[test]
    fn test_eager_singleton_fails_on_register() {
        let mut registry = BeanRegistry::new(DelegateMap::new());
        let mut definition = BeanDefinition::lazy_singleton(proxy_type());
        definition.lazy = false;
        assert!(matches!(
            registry.register(definition),
            Err(RegistryError::UnresolvedDependency { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_eager_singleton_created_on_register() {
        let mut registry = BeanRegistry::new(delegates());
        let mut definition = BeanDefinition::lazy_singleton(proxy_type());
        definition.lazy = false;
        let name = definition.name.clone();
        registry.register(definition).unwrap();

        assert!(registry.is_instantiated(&name));
        let proxy = registry.get_bean(&name).unwrap();
        assert_eq!(proxy.invoke_by_name("index", &[]).unwrap(), Value::str("OK"));
    }
}

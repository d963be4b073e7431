//! Type Loader
//!
//! The set of types made loadable in this process, plus the runtime side
//! of a loaded type: instantiation, delegate injection, and forwarding.

use std::fmt;
use std::sync::Arc;

use autoproxy_sdk::{Delegate, InvokeError, InvokeResult, Value};
use rustc_hash::FxHashMap;
use tracing::debug;

use super::shell::{FieldShell, MethodBody, MethodShell, TypeShell};
use crate::error::{SynthesisError, SynthesisResult};
use crate::metadata::TagSet;
use crate::reflect::SignatureKey;

/// A loaded, immutable synthesized type
#[derive(Debug)]
pub struct SynthesizedType {
    source: String,
    shell: TypeShell,
}

impl SynthesizedType {
    /// Name of the synthesized type
    pub fn name(&self) -> &str {
        self.shell.name()
    }

    /// Name of the interface it was synthesized from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn superclass(&self) -> Option<&str> {
        self.shell.superclass()
    }

    pub fn class_tags(&self) -> &TagSet {
        self.shell.tags()
    }

    pub fn fields(&self) -> &[FieldShell] {
        self.shell.fields()
    }

    pub fn field(&self, name: &str) -> Option<&FieldShell> {
        self.shell.field(name)
    }

    pub fn methods(&self) -> &[MethodShell] {
        self.shell.methods()
    }

    pub fn method(&self, key: &SignatureKey) -> Option<&MethodShell> {
        self.shell.declared_method(key)
    }

    /// Fields carrying a tag of `kind`
    pub fn fields_tagged(&self, kind: &str) -> impl Iterator<Item = &FieldShell> {
        let kind = kind.to_string();
        self.shell
            .fields()
            .iter()
            .filter(move |f| f.tags.contains_kind(&kind))
    }

    /// Zero-argument constructor: every field starts unbound
    pub fn instantiate(self: &Arc<Self>) -> ProxyInstance {
        ProxyInstance {
            ty: Arc::clone(self),
            slots: FxHashMap::default(),
        }
    }
}

/// Process-wide set of loaded types
#[derive(Debug, Default)]
pub struct TypeLoader {
    loaded: FxHashMap<String, Arc<SynthesizedType>>,
}

impl TypeLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `shell` as a type built from `source`.
    ///
    /// A name can be loaded once; a second attempt fails with
    /// `AlreadyLoaded` and leaves the first type in place.
    pub fn define(
        &mut self,
        source: &str,
        shell: TypeShell,
    ) -> SynthesisResult<Arc<SynthesizedType>> {
        if self.loaded.contains_key(shell.name()) {
            return Err(SynthesisError::AlreadyLoaded(shell.name().to_string()));
        }
        let name = shell.name().to_string();
        let ty = Arc::new(SynthesizedType {
            source: source.to_string(),
            shell,
        });
        debug!(type_name = %name, source, "loaded type");
        self.loaded.insert(name, Arc::clone(&ty));
        Ok(ty)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SynthesizedType>> {
        self.loaded.get(name)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Loaded type names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.loaded.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

/// An instance of a synthesized type
pub struct ProxyInstance {
    ty: Arc<SynthesizedType>,
    slots: FxHashMap<String, Arc<dyn Delegate>>,
}

impl ProxyInstance {
    /// The instance's type
    pub fn type_handle(&self) -> &Arc<SynthesizedType> {
        &self.ty
    }

    /// Bind `delegate` to the field called `field`
    pub fn inject(&mut self, field: &str, delegate: Arc<dyn Delegate>) -> InvokeResult<()> {
        if self.ty.field(field).is_none() {
            return Err(InvokeError::NoSuchField(field.to_string()));
        }
        self.slots.insert(field.to_string(), delegate);
        Ok(())
    }

    pub fn is_bound(&self, field: &str) -> bool {
        self.slots.contains_key(field)
    }

    /// Invoke the method matching `key`
    pub fn invoke(&self, key: &SignatureKey, args: &[Value]) -> InvokeResult<Value> {
        let method = self
            .ty
            .method(key)
            .ok_or_else(|| InvokeError::NoSuchMethod(key.to_string()))?;
        self.dispatch(method, args)
    }

    /// Invoke the only method called `name` that takes `args.len()` arguments
    pub fn invoke_by_name(&self, name: &str, args: &[Value]) -> InvokeResult<Value> {
        let mut candidates = self
            .ty
            .methods()
            .iter()
            .filter(|m| m.signature.name == name && m.signature.arity() == args.len());
        let method = candidates
            .next()
            .ok_or_else(|| InvokeError::NoSuchMethod(name.to_string()))?;
        if candidates.next().is_some() {
            return Err(InvokeError::Ambiguous(name.to_string()));
        }
        self.dispatch(method, args)
    }

    fn dispatch(&self, method: &MethodShell, args: &[Value]) -> InvokeResult<Value> {
        let signature = &method.signature;
        if args.len() != signature.arity() {
            return Err(InvokeError::Arity {
                method: signature.name.clone(),
                expected: signature.arity(),
                got: args.len(),
            });
        }
        match &method.body {
            MethodBody::Abstract => Err(InvokeError::Unimplemented(signature.name.clone())),
            MethodBody::Forward { field, method: target } => {
                let delegate = self
                    .slots
                    .get(field)
                    .ok_or_else(|| InvokeError::Unbound(field.clone()))?;
                let result = delegate.invoke(target, args)?;
                Ok(if signature.is_void() { Value::Void } else { result })
            }
        }
    }
}

impl fmt::Debug for ProxyInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<_> = self.slots.keys().collect();
        bound.sort();
        f.debug_struct("ProxyInstance")
            .field("type", &self.ty.name())
            .field("bound", &bound)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::MethodSignature;
    use autoproxy_sdk::MethodTable;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn forwarding_type() -> TypeShell {
        let mut shell = TypeShell::new("a.A$AutoProxy");
        shell.ensure_field("delegate", "a.A");
        for (name, params, ret) in [
            ("index", vec![], "core.String"),
            ("reset", vec![], "void"),
            ("get", vec!["int"], "int"),
            ("get", vec!["core.String"], "int"),
        ] {
            shell.ensure_method(
                MethodSignature::new(name, params.into_iter().map(String::from).collect(), ret),
                MethodBody::Forward {
                    field: "delegate".to_string(),
                    method: name.to_string(),
                },
            );
        }
        shell
    }

    #[test]
    fn test_define_twice_fails() {
        let mut loader = TypeLoader::new();
        loader.define("a.A", TypeShell::new("a.A$AutoProxy")).unwrap();
        assert_eq!(
            loader.define("a.A", TypeShell::new("a.A$AutoProxy")).unwrap_err(),
            SynthesisError::AlreadyLoaded("a.A$AutoProxy".to_string())
        );
        assert_eq!(loader.len(), 1);
        assert_eq!(loader.names(), vec!["a.A$AutoProxy"]);
    }

    #[test]
    fn test_forward_returns_delegate_result() {
        let mut loader = TypeLoader::new();
        let ty = loader.define("a.A", forwarding_type()).unwrap();
        let mut proxy = ty.instantiate();
        let table = MethodTable::new().with("index", |_| Ok(Value::str("OK")));
        proxy.inject("delegate", Arc::new(table)).unwrap();

        let key = MethodSignature::new("index", vec![], "core.String").key();
        assert_eq!(proxy.invoke(&key, &[]).unwrap(), Value::str("OK"));
    }

    #[test]
    fn test_void_method_still_calls_delegate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let table = MethodTable::new().with("reset", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::str("ignored"))
        });

        let mut loader = TypeLoader::new();
        let ty = loader.define("a.A", forwarding_type()).unwrap();
        let mut proxy = ty.instantiate();
        proxy.inject("delegate", Arc::new(table)).unwrap();

        assert_eq!(proxy.invoke_by_name("reset", &[]).unwrap(), Value::Void);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unbound_and_unknown_field() {
        let mut loader = TypeLoader::new();
        let ty = loader.define("a.A", forwarding_type()).unwrap();
        let mut proxy = ty.instantiate();

        assert_eq!(
            proxy.invoke_by_name("index", &[]).unwrap_err(),
            InvokeError::Unbound("delegate".to_string())
        );
        assert_eq!(
            proxy.inject("other", Arc::new(MethodTable::new())).unwrap_err(),
            InvokeError::NoSuchField("other".to_string())
        );
    }

    #[test]
    fn test_by_name_resolution() {
        let mut loader = TypeLoader::new();
        let ty = loader.define("a.A", forwarding_type()).unwrap();
        let mut proxy = ty.instantiate();
        let table = MethodTable::new().with("get", |args| Ok(args[0].clone()));
        proxy.inject("delegate", Arc::new(table)).unwrap();

        assert_eq!(
            proxy.invoke_by_name("get", &[Value::Int(1)]).unwrap_err(),
            InvokeError::Ambiguous("get".to_string())
        );
        assert_eq!(
            proxy.invoke_by_name("missing", &[]).unwrap_err(),
            InvokeError::NoSuchMethod("missing".to_string())
        );

        let key = MethodSignature::new("get", vec!["int".to_string()], "int").key();
        assert_eq!(proxy.invoke(&key, &[Value::Int(5)]).unwrap(), Value::Int(5));
        assert!(matches!(
            proxy.invoke(&key, &[]).unwrap_err(),
            InvokeError::Arity { expected: 1, got: 0, .. }
        ));
    }

    #[test]
    fn test_abstract_method_unimplemented() {
        let mut shell = TypeShell::new("a.B$AutoProxy");
        shell.ensure_method(MethodSignature::new("noop", vec![], "void"), MethodBody::Abstract);
        let mut loader = TypeLoader::new();
        let proxy = loader.define("a.B", shell).unwrap().instantiate();
        assert_eq!(
            proxy.invoke_by_name("noop", &[]).unwrap_err(),
            InvokeError::Unimplemented("noop".to_string())
        );
    }
}

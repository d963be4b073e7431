//! Delegate trait: the target every forwarding method calls into
//!
//! A synthesized proxy holds one delegate per injected field and forwards
//! each call by method name with the caller's arguments untouched.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{InvokeError, InvokeResult};
use crate::value::Value;

/// Implementation side of a remote interface.
///
/// Implementors dispatch on `method` themselves. Overloads that share a
/// name are told apart by the argument count or shape.
pub trait Delegate: Send + Sync {
    /// Invoke `method` with `args` and return its result
    fn invoke(&self, method: &str, args: &[Value]) -> InvokeResult<Value>;
}

impl<D: Delegate + ?Sized> Delegate for Arc<D> {
    fn invoke(&self, method: &str, args: &[Value]) -> InvokeResult<Value> {
        (**self).invoke(method, args)
    }
}

/// A single method body registered in a [`MethodTable`]
pub type MethodFn = Arc<dyn Fn(&[Value]) -> InvokeResult<Value> + Send + Sync>;

/// Name-based method table usable as a delegate.
///
/// Handy for wiring closures as an interface implementation without
/// writing a dedicated type.
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, MethodFn>,
}

impl MethodTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method body by name, replacing any previous one
    pub fn register(
        &mut self,
        name: &str,
        body: impl Fn(&[Value]) -> InvokeResult<Value> + Send + Sync + 'static,
    ) {
        self.methods.insert(name.to_string(), Arc::new(body));
    }

    /// Builder form of [`MethodTable::register`]
    pub fn with(
        mut self,
        name: &str,
        body: impl Fn(&[Value]) -> InvokeResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.register(name, body);
        self
    }

    /// Check if a method is registered
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Get the number of registered methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Delegate for MethodTable {
    fn invoke(&self, method: &str, args: &[Value]) -> InvokeResult<Value> {
        let body = self
            .methods
            .get(method)
            .ok_or_else(|| InvokeError::NoSuchMethod(method.to_string()))?;
        body(args)
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.methods.keys().collect();
        names.sort();
        f.debug_struct("MethodTable").field("methods", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_table_dispatch() {
        let table = MethodTable::new()
            .with("index", |_| Ok(Value::str("OK")))
            .with("echo", |args| Ok(args.first().cloned().unwrap_or_default()));

        assert_eq!(table.len(), 2);
        assert_eq!(table.invoke("index", &[]).unwrap(), Value::str("OK"));
        assert_eq!(table.invoke("echo", &[Value::Int(3)]).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_method_table_missing() {
        let table = MethodTable::new();
        assert!(table.is_empty());
        assert_eq!(
            table.invoke("nope", &[]),
            Err(InvokeError::NoSuchMethod("nope".to_string()))
        );
    }

    #[test]
    fn test_arc_delegate() {
        let table: Arc<dyn Delegate> =
            Arc::new(MethodTable::new().with("a", |_| Ok(Value::Int(1))));
        assert_eq!(table.invoke("a", &[]).unwrap(), Value::Int(1));
    }
}

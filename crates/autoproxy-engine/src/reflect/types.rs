//! Declared types and method signatures

use std::fmt;

use crate::well_known::VOID_TYPE;

/// Declared type of a tag member, as the host type system reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Any named type: class reference, string, enum, tag, or other
    Named(String),
    /// Array of the component type
    Array(Box<DeclaredType>),
}

impl DeclaredType {
    /// Create a named type
    pub fn named(name: impl Into<String>) -> Self {
        DeclaredType::Named(name.into())
    }

    /// Create an array of `component`
    pub fn array_of(component: DeclaredType) -> Self {
        DeclaredType::Array(Box::new(component))
    }

    /// Parse a type identifier such as `int`, `core.String` or `web.Method[]`
    pub fn parse(name: &str) -> Self {
        if let Some(component) = name.strip_suffix("[]") {
            return Self::array_of(Self::parse(component));
        }
        match name {
            "boolean" => DeclaredType::Boolean,
            "byte" => DeclaredType::Byte,
            "char" => DeclaredType::Char,
            "short" => DeclaredType::Short,
            "int" => DeclaredType::Int,
            "long" => DeclaredType::Long,
            "float" => DeclaredType::Float,
            "double" => DeclaredType::Double,
            other => DeclaredType::Named(other.to_string()),
        }
    }

    /// Component type if this is an array
    pub fn component(&self) -> Option<&DeclaredType> {
        match self {
            DeclaredType::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Check if this is one of the eight primitive types
    pub fn is_primitive(&self) -> bool {
        !matches!(self, DeclaredType::Named(_) | DeclaredType::Array(_))
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Boolean => write!(f, "boolean"),
            DeclaredType::Byte => write!(f, "byte"),
            DeclaredType::Char => write!(f, "char"),
            DeclaredType::Short => write!(f, "short"),
            DeclaredType::Int => write!(f, "int"),
            DeclaredType::Long => write!(f, "long"),
            DeclaredType::Float => write!(f, "float"),
            DeclaredType::Double => write!(f, "double"),
            DeclaredType::Named(name) => write!(f, "{name}"),
            DeclaredType::Array(component) => write!(f, "{component}[]"),
        }
    }
}

/// Join key between a source method and its forwarding method.
///
/// Two methods match when name and parameter types are identical; the
/// return type takes no part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureKey {
    pub name: String,
    pub params: Vec<String>,
}

/// Method signature: name, ordered parameter types, return type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<String>,
    pub return_type: String,
}

impl MethodSignature {
    /// Create a signature
    pub fn new(
        name: impl Into<String>,
        params: Vec<String>,
        return_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type: return_type.into(),
        }
    }

    /// Matching key (name + parameter types)
    pub fn key(&self) -> SignatureKey {
        SignatureKey {
            name: self.name.clone(),
            params: self.params.clone(),
        }
    }

    /// Check if `other` has the same name and parameter types
    pub fn matches(&self, other: &MethodSignature) -> bool {
        self.name == other.name && self.params == other.params
    }

    /// Check if the method returns nothing
    pub fn is_void(&self) -> bool {
        self.return_type == VOID_TYPE
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}({})", self.return_type, self.name, self.params.join(", "))
    }
}

impl fmt::Display for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

//! Live tag instances and tag definitions

use super::types::DeclaredType;

/// A member value as the host reflection facility hands it out.
///
/// Unlike the descriptor model this is untyped: the declared member type
/// decides how a value is read, and a value may be `Null` or of a shape
/// the declared type does not expect.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveValue {
    Null,
    Bool(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    /// A class literal, by type name
    Type(String),
    /// An enum constant
    Enum {
        type_name: String,
        constant: String,
        ordinal: u32,
    },
    /// A nested tag instance
    Tag(LiveTag),
    Array(Vec<LiveValue>),
}

impl LiveValue {
    /// Create a string value
    pub fn str(s: impl Into<String>) -> Self {
        LiveValue::Str(s.into())
    }

    /// Create a class literal
    pub fn type_ref(name: impl Into<String>) -> Self {
        LiveValue::Type(name.into())
    }

    /// Create an array of strings
    pub fn str_array<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        LiveValue::Array(items.into_iter().map(|s| LiveValue::Str(s.into())).collect())
    }

    /// Short name of the variant, used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            LiveValue::Null => "null",
            LiveValue::Bool(_) => "boolean",
            LiveValue::Byte(_) => "byte",
            LiveValue::Char(_) => "char",
            LiveValue::Short(_) => "short",
            LiveValue::Int(_) => "int",
            LiveValue::Long(_) => "long",
            LiveValue::Float(_) => "float",
            LiveValue::Double(_) => "double",
            LiveValue::Str(_) => "string",
            LiveValue::Type(_) => "class",
            LiveValue::Enum { .. } => "enum",
            LiveValue::Tag(_) => "tag",
            LiveValue::Array(_) => "array",
        }
    }
}

/// A tag instance attached to an interface, method, or parameter.
///
/// Only explicitly given values are stored; members left out fall back
/// to the definition's defaults when read through a [`MemberAccessor`].
#[derive(Debug, Clone, PartialEq)]
pub struct LiveTag {
    kind: String,
    values: Vec<(String, LiveValue)>,
}

impl LiveTag {
    /// Create a tag instance with no explicit values
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            values: Vec::new(),
        }
    }

    /// Builder form of [`LiveTag::set`]
    pub fn with(mut self, member: impl Into<String>, value: LiveValue) -> Self {
        self.set(member, value);
        self
    }

    /// Set an explicit member value, replacing a previous one
    pub fn set(&mut self, member: impl Into<String>, value: LiveValue) {
        let member = member.into();
        match self.values.iter_mut().find(|(name, _)| *name == member) {
            Some(slot) => slot.1 = value,
            None => self.values.push((member, value)),
        }
    }

    /// Kind of this tag (its definition's name)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Explicit value of a member, if one was given
    pub fn value(&self, member: &str) -> Option<&LiveValue> {
        self.values
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| value)
    }

    /// Explicit values in insertion order
    pub fn values(&self) -> impl Iterator<Item = (&str, &LiveValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// A declared member of a tag definition
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDecl {
    pub name: String,
    pub declared_type: DeclaredType,
    pub default: Option<LiveValue>,
}

/// Definition of a tag kind: its members in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct TagDefinition {
    kind: String,
    members: Vec<MemberDecl>,
}

impl TagDefinition {
    /// Create a definition with no members
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            members: Vec::new(),
        }
    }

    /// Declare a member with no default
    pub fn member(mut self, name: impl Into<String>, declared_type: DeclaredType) -> Self {
        self.members.push(MemberDecl {
            name: name.into(),
            declared_type,
            default: None,
        });
        self
    }

    /// Declare a member with a default value
    pub fn member_with_default(
        mut self,
        name: impl Into<String>,
        declared_type: DeclaredType,
        default: LiveValue,
    ) -> Self {
        self.members.push(MemberDecl {
            name: name.into(),
            declared_type,
            default: Some(default),
        });
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Members in declaration order
    pub fn members(&self) -> &[MemberDecl] {
        &self.members
    }

    pub fn get_member(&self, name: &str) -> Option<&MemberDecl> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Reads the runtime value of a declared member from a tag instance.
pub trait MemberAccessor {
    fn read(&self, tag: &LiveTag, member: &MemberDecl) -> LiveValue;
}

/// Explicit value, then the declared default, then `Null`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAccessor;

impl MemberAccessor for DefaultAccessor {
    fn read(&self, tag: &LiveTag, member: &MemberDecl) -> LiveValue {
        tag.value(&member.name)
            .cloned()
            .or_else(|| member.default.clone())
            .unwrap_or(LiveValue::Null)
    }
}

impl<F> MemberAccessor for F
where
    F: Fn(&LiveTag, &MemberDecl) -> LiveValue,
{
    fn read(&self, tag: &LiveTag, member: &MemberDecl) -> LiveValue {
        self(tag, member)
    }
}

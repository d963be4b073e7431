//! Tag Descriptor Model
//!
//! Pure value types describing a tag and its typed member values.
//! Enums are held by (type name, constant name), never by ordinal.

use std::fmt;

/// Kind of a member value.
///
/// Also the classification target for declared member types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Class,
    /// Enum constants of the named enum type
    Enum(String),
    /// Nested tags of the named kind
    Tag(String),
    Array(Box<ValueKind>),
}

impl ValueKind {
    /// Zero value for scalar kinds (`false`, `0`, `'\0'`, blank string).
    ///
    /// Returns `None` for class references, enums, tags, and arrays.
    pub fn zero_value(&self) -> Option<MemberValue> {
        let zero = match self {
            ValueKind::Boolean => MemberValue::Boolean(false),
            ValueKind::Byte => MemberValue::Byte(0),
            ValueKind::Char => MemberValue::Char('\0'),
            ValueKind::Short => MemberValue::Short(0),
            ValueKind::Int => MemberValue::Int(0),
            ValueKind::Long => MemberValue::Long(0),
            ValueKind::Float => MemberValue::Float(0.0),
            ValueKind::Double => MemberValue::Double(0.0),
            ValueKind::String => MemberValue::String(String::new()),
            ValueKind::Class | ValueKind::Enum(_) | ValueKind::Tag(_) | ValueKind::Array(_) => {
                return None
            }
        };
        Some(zero)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Byte => write!(f, "byte"),
            ValueKind::Char => write!(f, "char"),
            ValueKind::Short => write!(f, "short"),
            ValueKind::Int => write!(f, "int"),
            ValueKind::Long => write!(f, "long"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::Double => write!(f, "double"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Class => write!(f, "class"),
            ValueKind::Enum(name) => write!(f, "enum {name}"),
            ValueKind::Tag(kind) => write!(f, "@{kind}"),
            ValueKind::Array(element) => write!(f, "{element}[]"),
        }
    }
}

/// A typed member value
#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue {
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Class reference, by type name
    Class(String),
    Enum {
        type_name: String,
        constant: String,
    },
    Tag(TagDescriptor),
    /// Homogeneous array; every element is of `element` kind
    Array {
        element: ValueKind,
        values: Vec<MemberValue>,
    },
}

impl MemberValue {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        MemberValue::String(s.into())
    }

    /// Create an array, rejecting elements of a different kind
    pub fn array(element: ValueKind, values: Vec<MemberValue>) -> Option<Self> {
        if values.iter().all(|v| v.kind() == element) {
            Some(MemberValue::Array { element, values })
        } else {
            None
        }
    }

    /// Create a string array
    pub fn string_array<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        MemberValue::Array {
            element: ValueKind::String,
            values: items.into_iter().map(|s| MemberValue::String(s.into())).collect(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            MemberValue::Boolean(_) => ValueKind::Boolean,
            MemberValue::Byte(_) => ValueKind::Byte,
            MemberValue::Char(_) => ValueKind::Char,
            MemberValue::Short(_) => ValueKind::Short,
            MemberValue::Int(_) => ValueKind::Int,
            MemberValue::Long(_) => ValueKind::Long,
            MemberValue::Float(_) => ValueKind::Float,
            MemberValue::Double(_) => ValueKind::Double,
            MemberValue::String(_) => ValueKind::String,
            MemberValue::Class(_) => ValueKind::Class,
            MemberValue::Enum { type_name, .. } => ValueKind::Enum(type_name.clone()),
            MemberValue::Tag(tag) => ValueKind::Tag(tag.kind().to_string()),
            MemberValue::Array { element, .. } => ValueKind::Array(Box::new(element.clone())),
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MemberValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get array elements if this is an array
    pub fn as_array(&self) -> Option<&[MemberValue]> {
        match self {
            MemberValue::Array { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Check the array homogeneity invariant, recursively
    pub fn is_well_formed(&self) -> bool {
        match self {
            MemberValue::Array { element, values } => values
                .iter()
                .all(|v| v.kind() == *element && v.is_well_formed()),
            MemberValue::Tag(tag) => tag.members().all(|(_, v)| v.is_well_formed()),
            _ => true,
        }
    }
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Boolean(b) => write!(f, "{b}"),
            MemberValue::Byte(b) => write!(f, "{b}"),
            MemberValue::Char(c) => write!(f, "{c:?}"),
            MemberValue::Short(s) => write!(f, "{s}"),
            MemberValue::Int(i) => write!(f, "{i}"),
            MemberValue::Long(l) => write!(f, "{l}L"),
            MemberValue::Float(x) => write!(f, "{x}F"),
            MemberValue::Double(d) => write!(f, "{d}"),
            MemberValue::String(s) => write!(f, "{s:?}"),
            MemberValue::Class(name) => write!(f, "{name}.class"),
            MemberValue::Enum {
                type_name,
                constant,
            } => write!(f, "{type_name}.{constant}"),
            MemberValue::Tag(tag) => write!(f, "{tag}"),
            MemberValue::Array { values, .. } => {
                write!(f, "{{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A tag: its kind and ordered, uniquely named member values
#[derive(Debug, Clone, PartialEq)]
pub struct TagDescriptor {
    kind: String,
    members: Vec<(String, MemberValue)>,
}

impl TagDescriptor {
    /// Create a tag with no members. `kind` must not be empty.
    pub fn new(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        debug_assert!(!kind.is_empty(), "tag kind must not be empty");
        Self {
            kind,
            members: Vec::new(),
        }
    }

    /// Builder form of [`TagDescriptor::set_member`]
    pub fn with_member(mut self, name: impl Into<String>, value: MemberValue) -> Self {
        self.set_member(name, value);
        self
    }

    /// Set a member, replacing any value already stored under `name`
    pub fn set_member(&mut self, name: impl Into<String>, value: MemberValue) {
        let name = name.into();
        match self.members.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.members.push((name, value)),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn member(&self, name: &str) -> Option<&MemberValue> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Members in insertion order
    pub fn members(&self) -> impl Iterator<Item = (&str, &MemberValue)> {
        self.members.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl fmt::Display for TagDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.kind)?;
        if self.members.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, (name, value)) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, ")")
    }
}

/// Ordered set of tags, at most one per kind
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagSet {
    tags: Vec<TagDescriptor>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tag of a kind
    pub fn get(&self, kind: &str) -> Option<&TagDescriptor> {
        self.tags.iter().find(|t| t.kind == kind)
    }

    pub fn contains_kind(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// Add `tag` unless a tag of the same kind is present.
    /// Returns whether it was added.
    pub fn insert_if_absent(&mut self, tag: TagDescriptor) -> bool {
        if self.contains_kind(&tag.kind) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TagDescriptor> {
        self.tags.iter()
    }

    /// Kinds in order
    pub fn kinds(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.kind.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<TagDescriptor> for TagSet {
    /// Later tags of an already-seen kind are dropped
    fn from_iter<I: IntoIterator<Item = TagDescriptor>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert_if_absent(tag);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a TagDescriptor;
    type IntoIter = std::slice::Iter<'a, TagDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_member_keeps_names_unique() {
        let tag = TagDescriptor::new("web.GetMapping")
            .with_member("value", MemberValue::string_array(["/a"]))
            .with_member("value", MemberValue::string_array(["/b"]));
        assert_eq!(tag.member_count(), 1);
        assert_eq!(tag.member("value"), Some(&MemberValue::string_array(["/b"])));
    }

    #[test]
    fn test_array_rejects_mixed_kinds() {
        assert!(MemberValue::array(ValueKind::Int, vec![MemberValue::Int(1)]).is_some());
        assert!(MemberValue::array(
            ValueKind::Int,
            vec![MemberValue::Int(1), MemberValue::Long(2)]
        )
        .is_none());
        assert!(MemberValue::array(ValueKind::Int, vec![]).is_some());
    }

    #[test]
    fn test_enum_kind_carries_type_name() {
        let v = MemberValue::Enum {
            type_name: "web.Method".to_string(),
            constant: "GET".to_string(),
        };
        assert_eq!(v.kind(), ValueKind::Enum("web.Method".to_string()));
        assert_eq!(v.to_string(), "web.Method.GET");
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(ValueKind::Boolean.zero_value(), Some(MemberValue::Boolean(false)));
        assert_eq!(ValueKind::Char.zero_value(), Some(MemberValue::Char('\0')));
        assert_eq!(ValueKind::String.zero_value(), Some(MemberValue::string("")));
        assert_eq!(ValueKind::Class.zero_value(), None);
        assert_eq!(ValueKind::Array(Box::new(ValueKind::Int)).zero_value(), None);
    }

    #[test]
    fn test_tag_set_dedups_by_kind() {
        let set: TagSet = [
            TagDescriptor::new("a.A").with_member("x", MemberValue::Int(1)),
            TagDescriptor::new("b.B"),
            TagDescriptor::new("a.A").with_member("x", MemberValue::Int(2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.kinds(), vec!["a.A", "b.B"]);
        assert_eq!(set.get("a.A").unwrap().member("x"), Some(&MemberValue::Int(1)));
    }

    #[test]
    fn test_display() {
        let tag = TagDescriptor::new("web.RequestMapping")
            .with_member("path", MemberValue::string_array(["/test"]));
        assert_eq!(tag.to_string(), "@web.RequestMapping(path={\"/test\"})");
        assert_eq!(TagDescriptor::new("web.RestController").to_string(), "@web.RestController");
    }

    #[test]
    fn test_well_formed_nested() {
        let inner = TagDescriptor::new("n.Inner").with_member(
            "xs",
            MemberValue::Array {
                element: ValueKind::Int,
                values: vec![MemberValue::Long(1)],
            },
        );
        assert!(!MemberValue::Tag(inner).is_well_formed());
    }
}

//! Tag Cloner
//!
//! Converts live tag instances into [`TagDescriptor`]s, member by member,
//! and back again.
//!
//! Each declared member is classified by its declared type, in this order:
//! the eight primitives, class reference, string, array (classified by its
//! component), enum, nested tag. A member whose type falls outside these
//! kinds is left out of the clone.
//!
//! Value policy:
//! - `Null` scalars become the kind's zero value, so the member stays present
//! - `Null` class references, enums, and nested tags drop the member
//! - `Null` arrays become empty arrays
//! - array elements that cannot be converted are dropped from the array
//! - any other value whose shape disagrees with the declared type drops
//!   the member, except a class reference that is neither a class literal
//!   nor a type name string, which fails the clone

use tracing::trace;

use super::descriptor::{MemberValue, TagDescriptor, TagSet, ValueKind};
use crate::error::{SynthesisError, SynthesisResult};
use crate::reflect::{
    DeclaredType, DefaultAccessor, LiveTag, LiveValue, MemberAccessor, TypeCatalog,
};
use crate::well_known::{CLASS_TYPE, STRING_TYPE};

/// Clones live tags into descriptors using a catalog for type lookups.
pub struct TagCloner<'a, A = DefaultAccessor> {
    catalog: &'a TypeCatalog,
    accessor: A,
}

impl<'a> TagCloner<'a, DefaultAccessor> {
    /// Create a cloner that reads members with [`DefaultAccessor`]
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog,
            accessor: DefaultAccessor,
        }
    }
}

impl<'a, A: MemberAccessor> TagCloner<'a, A> {
    /// Create a cloner with a custom member accessor
    pub fn with_accessor(catalog: &'a TypeCatalog, accessor: A) -> Self {
        Self { catalog, accessor }
    }

    /// Clone one live tag.
    ///
    /// Fails with `NotFound` if the tag's definition is unknown and with
    /// `UnsupportedValueKind` for a malformed class reference anywhere in
    /// the tag, including nested tags and arrays.
    pub fn clone_tag(&self, tag: &LiveTag) -> SynthesisResult<TagDescriptor> {
        let definition = self.catalog.tag_definition(tag.kind())?;
        let mut descriptor = TagDescriptor::new(tag.kind());

        for member in definition.members() {
            let Some(kind) = self.classify(&member.declared_type) else {
                trace!(
                    tag = tag.kind(),
                    member = %member.name,
                    ty = %member.declared_type,
                    "unclassified member skipped"
                );
                continue;
            };
            let value = self.accessor.read(tag, member);
            let ctx = MemberContext {
                tag: tag.kind(),
                member: &member.name,
            };
            match self.convert(&ctx, &kind, &value)? {
                Some(converted) => descriptor.set_member(member.name.clone(), converted),
                None => {
                    trace!(
                        tag = tag.kind(),
                        member = %member.name,
                        shape = value.shape(),
                        "member omitted"
                    )
                }
            }
        }

        Ok(descriptor)
    }

    /// Clone a list of live tags into a set (first tag of a kind wins)
    pub fn clone_all(&self, tags: &[LiveTag]) -> SynthesisResult<TagSet> {
        tags.iter().map(|tag| self.clone_tag(tag)).collect()
    }

    /// Classify a declared member type.
    ///
    /// Returns `None` for types outside the supported kinds, including
    /// arrays whose component is unsupported.
    pub fn classify(&self, declared: &DeclaredType) -> Option<ValueKind> {
        let kind = match declared {
            DeclaredType::Boolean => ValueKind::Boolean,
            DeclaredType::Byte => ValueKind::Byte,
            DeclaredType::Char => ValueKind::Char,
            DeclaredType::Short => ValueKind::Short,
            DeclaredType::Int => ValueKind::Int,
            DeclaredType::Long => ValueKind::Long,
            DeclaredType::Float => ValueKind::Float,
            DeclaredType::Double => ValueKind::Double,
            DeclaredType::Named(name) if name == CLASS_TYPE => ValueKind::Class,
            DeclaredType::Named(name) if name == STRING_TYPE => ValueKind::String,
            DeclaredType::Array(component) => ValueKind::Array(Box::new(self.classify(component)?)),
            DeclaredType::Named(name) if self.catalog.is_enum(name) => {
                ValueKind::Enum(name.clone())
            }
            DeclaredType::Named(name) if self.catalog.is_tag(name) => ValueKind::Tag(name.clone()),
            DeclaredType::Named(_) => return None,
        };
        Some(kind)
    }

    fn convert(
        &self,
        ctx: &MemberContext<'_>,
        kind: &ValueKind,
        value: &LiveValue,
    ) -> SynthesisResult<Option<MemberValue>> {
        if matches!(value, LiveValue::Null) {
            return Ok(match kind {
                ValueKind::Array(element) => Some(MemberValue::Array {
                    element: (**element).clone(),
                    values: Vec::new(),
                }),
                other => other.zero_value(),
            });
        }

        let converted = match (kind, value) {
            (ValueKind::Boolean, LiveValue::Bool(b)) => MemberValue::Boolean(*b),
            (ValueKind::Byte, LiveValue::Byte(b)) => MemberValue::Byte(*b),
            (ValueKind::Char, LiveValue::Char(c)) => MemberValue::Char(*c),
            (ValueKind::Short, LiveValue::Short(s)) => MemberValue::Short(*s),
            (ValueKind::Int, LiveValue::Int(i)) => MemberValue::Int(*i),
            (ValueKind::Long, LiveValue::Long(l)) => MemberValue::Long(*l),
            (ValueKind::Float, LiveValue::Float(x)) => MemberValue::Float(*x),
            (ValueKind::Double, LiveValue::Double(d)) => MemberValue::Double(*d),
            (ValueKind::String, LiveValue::Str(s)) => MemberValue::String(s.clone()),
            (ValueKind::Class, LiveValue::Type(name) | LiveValue::Str(name)) => {
                MemberValue::Class(name.clone())
            }
            (ValueKind::Class, other) => {
                return Err(SynthesisError::UnsupportedValueKind {
                    tag: ctx.tag.to_string(),
                    member: ctx.member.to_string(),
                    found: other.shape(),
                })
            }
            (ValueKind::Array(element), LiveValue::Array(items)) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(v) = self.convert(ctx, element, item)? {
                        values.push(v);
                    }
                }
                MemberValue::Array {
                    element: (**element).clone(),
                    values,
                }
            }
            (
                ValueKind::Enum(expected),
                LiveValue::Enum {
                    type_name,
                    constant,
                    ..
                },
            ) if type_name == expected => MemberValue::Enum {
                type_name: type_name.clone(),
                constant: constant.clone(),
            },
            (ValueKind::Tag(expected), LiveValue::Tag(nested))
                if nested.kind() == expected.as_str() =>
            {
                MemberValue::Tag(self.clone_tag(nested)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(converted))
    }

    /// Turn a descriptor back into a live tag.
    ///
    /// Enum ordinals are resolved from the catalog by constant name, so a
    /// descriptor materializes correctly even if the enum was reordered.
    pub fn materialize(&self, descriptor: &TagDescriptor) -> SynthesisResult<LiveTag> {
        let mut tag = LiveTag::new(descriptor.kind());
        for (name, value) in descriptor.members() {
            tag.set(name, self.materialize_value(value)?);
        }
        Ok(tag)
    }

    fn materialize_value(&self, value: &MemberValue) -> SynthesisResult<LiveValue> {
        let live = match value {
            MemberValue::Boolean(b) => LiveValue::Bool(*b),
            MemberValue::Byte(b) => LiveValue::Byte(*b),
            MemberValue::Char(c) => LiveValue::Char(*c),
            MemberValue::Short(s) => LiveValue::Short(*s),
            MemberValue::Int(i) => LiveValue::Int(*i),
            MemberValue::Long(l) => LiveValue::Long(*l),
            MemberValue::Float(x) => LiveValue::Float(*x),
            MemberValue::Double(d) => LiveValue::Double(*d),
            MemberValue::String(s) => LiveValue::Str(s.clone()),
            MemberValue::Class(name) => LiveValue::Type(name.clone()),
            MemberValue::Enum {
                type_name,
                constant,
            } => self.catalog.enum_value(type_name, constant)?,
            MemberValue::Tag(nested) => LiveValue::Tag(self.materialize(nested)?),
            MemberValue::Array { values, .. } => LiveValue::Array(
                values
                    .iter()
                    .map(|v| self.materialize_value(v))
                    .collect::<SynthesisResult<_>>()?,
            ),
        };
        Ok(live)
    }
}

/// Location of the member being converted, for error reports
struct MemberContext<'a> {
    tag: &'a str,
    member: &'a str,
}

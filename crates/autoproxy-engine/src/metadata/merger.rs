//! Tag Merger
//!
//! Combines tags cloned from a source with the tags a target already
//! carries. Tags are identified by kind only: when the target has a tag
//! of some kind, the source tag of that kind is skipped, whatever either
//! one contains.

use tracing::debug;

use super::descriptor::{MemberValue, TagDescriptor, TagSet};
use crate::well_known::{CONTROLLER_TAG, PATH_MEMBER, REMOTE_INTERFACE_TAG, REQUEST_MAPPING_TAG};

/// Tag kinds that get special treatment at class level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagKinds {
    /// Marker on the source interface; never copied, only read for `path`
    pub marker: String,
    /// Routing tag derived from the marker's `path`
    pub routing: String,
    /// Controller tag always present on the result
    pub controller: String,
}

impl Default for TagKinds {
    fn default() -> Self {
        Self {
            marker: REMOTE_INTERFACE_TAG.to_string(),
            routing: REQUEST_MAPPING_TAG.to_string(),
            controller: CONTROLLER_TAG.to_string(),
        }
    }
}

/// Existing tags, followed by every source tag whose kind is absent from them
pub fn merge(source: &TagSet, existing: &TagSet) -> TagSet {
    let mut merged = existing.clone();
    for tag in source {
        if merged.insert_if_absent(tag.clone()) {
            debug!(tag = %tag, "merged source tag");
        }
    }
    merged
}

/// Class-level merge.
///
/// Like [`merge`], except that the marker tag is not copied: a non-blank
/// marker `path` yields a routing tag with that single path instead (unless
/// a routing tag is already present), and a controller tag is added if
/// missing.
pub fn merge_class_tags(source: &TagSet, existing: &TagSet, kinds: &TagKinds) -> TagSet {
    let mut merged = existing.clone();

    for tag in source {
        if tag.kind() == kinds.marker {
            if let Some(routing) = derive_routing(tag, &kinds.routing) {
                if merged.insert_if_absent(routing.clone()) {
                    debug!(tag = %routing, "derived routing tag");
                }
            }
            continue;
        }
        if merged.insert_if_absent(tag.clone()) {
            debug!(tag = %tag, "merged source tag");
        }
    }

    let controller = TagDescriptor::new(kinds.controller.as_str());
    if merged.insert_if_absent(controller.clone()) {
        debug!(tag = %controller, "added controller tag");
    }

    merged
}

/// Positional merge of per-parameter tag sets.
///
/// Position `i` of `source` merges only with position `i` of `existing`;
/// missing existing positions count as empty. Existing positions beyond
/// the source length are kept as they are.
pub fn merge_parameters(source: &[TagSet], existing: &[TagSet]) -> Vec<TagSet> {
    let empty = TagSet::new();
    let len = source.len().max(existing.len());
    (0..len)
        .map(|i| match source.get(i) {
            Some(src) => merge(src, existing.get(i).unwrap_or(&empty)),
            None => existing[i].clone(),
        })
        .collect()
}

fn derive_routing(marker: &TagDescriptor, routing_kind: &str) -> Option<TagDescriptor> {
    let path = marker.member(PATH_MEMBER)?.as_str()?;
    if path.trim().is_empty() {
        return None;
    }
    Some(
        TagDescriptor::new(routing_kind)
            .with_member(PATH_MEMBER, MemberValue::string_array([path])),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(kind: &str, v: i32) -> TagDescriptor {
        TagDescriptor::new(kind).with_member("v", MemberValue::Int(v))
    }

    fn set(tags: Vec<TagDescriptor>) -> TagSet {
        tags.into_iter().collect()
    }

    fn marker(path: &str) -> TagDescriptor {
        TagDescriptor::new(REMOTE_INTERFACE_TAG)
            .with_member("name", MemberValue::string("testClient"))
            .with_member(PATH_MEMBER, MemberValue::string(path))
    }

    #[test]
    fn test_merge_existing_wins() {
        let source = set(vec![tag("a.A", 1), tag("b.B", 1)]);
        let existing = set(vec![tag("a.A", 2)]);
        let merged = merge(&source, &existing);

        assert_eq!(merged.kinds(), vec!["a.A", "b.B"]);
        assert_eq!(merged.get("a.A"), Some(&tag("a.A", 2)));
    }

    #[test]
    fn test_merge_idempotent() {
        let source = set(vec![tag("a.A", 1), tag("b.B", 1), tag("c.C", 1)]);
        let existing = set(vec![tag("b.B", 9), tag("d.D", 9)]);
        let once = merge(&source, &existing);
        let twice = merge(&source, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_class_merge_derives_routing_from_path() {
        let merged = merge_class_tags(
            &set(vec![marker("/test")]),
            &TagSet::new(),
            &TagKinds::default(),
        );

        let routing = merged.get(REQUEST_MAPPING_TAG).expect("routing tag");
        assert_eq!(routing.member(PATH_MEMBER), Some(&MemberValue::string_array(["/test"])));
        // the marker itself is not copied
        assert!(!merged.contains_kind(REMOTE_INTERFACE_TAG));
        assert!(merged.contains_kind(CONTROLLER_TAG));
    }

    #[test]
    fn test_class_merge_blank_path_derives_nothing() {
        for path in ["", "   "] {
            let merged =
                merge_class_tags(&set(vec![marker(path)]), &TagSet::new(), &TagKinds::default());
            assert!(!merged.contains_kind(REQUEST_MAPPING_TAG), "path {path:?}");
            assert_eq!(merged.kinds(), vec![CONTROLLER_TAG]);
        }
    }

    #[test]
    fn test_class_merge_keeps_existing_routing() {
        let existing_routing = TagDescriptor::new(REQUEST_MAPPING_TAG)
            .with_member(PATH_MEMBER, MemberValue::string_array(["/custom"]));
        let merged = merge_class_tags(
            &set(vec![marker("/test")]),
            &set(vec![existing_routing.clone()]),
            &TagKinds::default(),
        );
        assert_eq!(merged.get(REQUEST_MAPPING_TAG), Some(&existing_routing));
    }

    #[test]
    fn test_class_merge_single_controller() {
        let existing = set(vec![TagDescriptor::new(CONTROLLER_TAG)
            .with_member("value", MemberValue::string("named"))]);
        let source = set(vec![TagDescriptor::new(CONTROLLER_TAG), marker("/x")]);
        let merged = merge_class_tags(&source, &existing, &TagKinds::default());

        let controllers = merged.iter().filter(|t| t.kind() == CONTROLLER_TAG).count();
        assert_eq!(controllers, 1);
        assert_eq!(
            merged.get(CONTROLLER_TAG).unwrap().member("value"),
            Some(&MemberValue::string("named"))
        );
    }

    #[test]
    fn test_class_merge_idempotent() {
        let source = set(vec![tag("api.Api", 1), marker("/test")]);
        let kinds = TagKinds::default();
        let once = merge_class_tags(&source, &TagSet::new(), &kinds);
        let twice = merge_class_tags(&source, &once, &kinds);
        assert_eq!(once, twice);
        assert_eq!(once.kinds(), vec!["api.Api", REQUEST_MAPPING_TAG, CONTROLLER_TAG]);
    }

    #[test]
    fn test_parameter_merge_is_positional() {
        let source = vec![set(vec![tag("p.Body", 1)]), set(vec![tag("p.Param", 1)])];
        let existing = vec![set(vec![tag("p.Param", 2)]), set(vec![tag("p.Body", 2)])];
        let merged = merge_parameters(&source, &existing);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].kinds(), vec!["p.Param", "p.Body"]);
        assert_eq!(merged[0].get("p.Body"), Some(&tag("p.Body", 1)));
        assert_eq!(merged[1].kinds(), vec!["p.Body", "p.Param"]);
        assert_eq!(merged[1].get("p.Param"), Some(&tag("p.Param", 1)));
    }

    #[test]
    fn test_parameter_merge_short_existing() {
        let source = vec![set(vec![tag("p.Body", 1)]), set(vec![tag("p.Param", 1)])];
        let merged = merge_parameters(&source, &[]);
        assert_eq!(merged, source);
    }

    #[test]
    fn test_parameter_merge_same_kind_existing_wins() {
        let source = vec![set(vec![tag("p.Body", 1)])];
        let existing = vec![set(vec![tag("p.Body", 2)])];
        let merged = merge_parameters(&source, &existing);
        assert_eq!(merged, existing);
    }
}

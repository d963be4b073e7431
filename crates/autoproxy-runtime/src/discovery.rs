//! Remote interface discovery
//!
//! Scans the catalog for interfaces carrying the marker tag inside a set
//! of base packages.

use autoproxy_engine::TypeCatalog;
use tracing::debug;

/// Package part of a qualified type name
pub fn package_of(type_name: &str) -> &str {
    type_name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
}

/// Check if `package` is `base` or nested under it. The root package
/// `""` contains every package.
pub fn in_package(package: &str, base: &str) -> bool {
    base.is_empty()
        || package == base
        || package
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Names of marker-tagged interfaces under any of `base_packages`,
/// sorted and deduplicated
pub fn find_candidates(
    catalog: &TypeCatalog,
    base_packages: &[String],
    marker: &str,
) -> Vec<String> {
    let mut found: Vec<String> = catalog
        .interfaces()
        .into_iter()
        .filter(|i| i.has_tag(marker))
        .filter(|i| base_packages.iter().any(|base| in_package(i.package(), base)))
        .map(|i| i.name.clone())
        .collect();
    found.sort();
    found.dedup();
    debug!(?base_packages, clients = ?found, "found clients to proxy");
    found
}

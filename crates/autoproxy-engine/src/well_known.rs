//! Well-known type names and tag kinds
//!
//! Names the host type system and the external collaborators agree on.

/// Class-reference member type
pub const CLASS_TYPE: &str = "core.Class";
/// String member type
pub const STRING_TYPE: &str = "core.String";
/// Return type of methods with no result
pub const VOID_TYPE: &str = "void";

/// Marker tag identifying a remote interface descriptor
pub const REMOTE_INTERFACE_TAG: &str = "remote.RemoteInterface";
/// Request-routing tag understood by the inbound router
pub const REQUEST_MAPPING_TAG: &str = "web.RequestMapping";
/// Controller-marker tag understood by the inbound router
pub const CONTROLLER_TAG: &str = "web.RestController";
/// Injection-request tag understood by the DI collaborator
pub const INJECT_TAG: &str = "inject.Resource";

/// Marker member holding the base path
pub const PATH_MEMBER: &str = "path";

/// Name of the delegate field on every synthesized type
pub const DELEGATE_FIELD: &str = "delegate";
/// Suffix appended to the source name to form the synthesized name
pub const PROXY_SUFFIX: &str = "$AutoProxy";

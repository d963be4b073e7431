//! Autoproxy Runtime
//!
//! Discovers remote interfaces, synthesizes their forwarding types with
//! the engine, and registers them as lazily created singletons whose
//! delegate fields are filled from a [`DelegateProvider`].
//!
//! | Module        | Role                                           |
//! |---------------|------------------------------------------------|
//! | [`config`]    | `autoproxy.toml` and the enable flags          |
//! | [`discovery`] | package scan for marker-tagged interfaces      |
//! | [`registry`]  | bean definitions and lazy singleton instances  |
//! | [`registrar`] | the startup registration run                   |

pub mod config;
pub mod discovery;
pub mod error;
pub mod registrar;
pub mod registry;

pub use config::{ProxyConfig, ENABLE_ENV};
pub use error::{ConfigError, RegistrarError, RegistrarResult, RegistryError};
pub use registrar::{ProxyRegistrar, Registered, RegistrationReport};
pub use registry::{bean_name, BeanDefinition, BeanRegistry, DelegateMap, DelegateProvider, Scope};

//! Proxy Registrar
//!
//! Startup driver: picks the remote interfaces to proxy, synthesizes a
//! forwarding type for each, and registers it as a lazy singleton. One
//! failing interface never stops the others.

use autoproxy_engine::SynthesisContext;
use tracing::{debug, error, warn};

use crate::config::ProxyConfig;
use crate::discovery::find_candidates;
use crate::error::{RegistrarError, RegistrarResult, RegistryError};
use crate::registry::{bean_name, BeanDefinition, BeanRegistry};

/// A successfully registered interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub client: String,
    pub bean: String,
}

/// Outcome of a registration run
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// False when proxying was switched off
    pub enabled: bool,
    pub registered: Vec<Registered>,
    pub failed: Vec<(String, RegistrarError)>,
}

impl RegistrationReport {
    /// Check if every candidate was registered
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_clients(&self) -> Vec<&str> {
        self.failed.iter().map(|(c, _)| c.as_str()).collect()
    }
}

/// Registers proxies for remote interfaces
#[derive(Debug, Clone)]
pub struct ProxyRegistrar {
    config: ProxyConfig,
}

impl ProxyRegistrar {
    pub fn new(config: ProxyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Register proxies, consulting the process environment for the
    /// enable flag
    pub fn register_all(
        &self,
        ctx: &mut SynthesisContext,
        registry: &mut BeanRegistry,
    ) -> RegistrarResult<RegistrationReport> {
        let enabled = self.config.is_enabled()?;
        Ok(self.register_if(enabled, ctx, registry))
    }

    /// Register proxies when `enabled`, otherwise do nothing
    pub fn register_if(
        &self,
        enabled: bool,
        ctx: &mut SynthesisContext,
        registry: &mut BeanRegistry,
    ) -> RegistrationReport {
        let mut report = RegistrationReport {
            enabled,
            ..Default::default()
        };
        if !enabled {
            debug!("proxying disabled");
            return report;
        }

        for client in self.candidates(ctx) {
            match register_client(ctx, registry, &client) {
                Ok(bean) => report.registered.push(Registered { client, bean }),
                Err(err) => {
                    error!(%client, error = %err, "proxy client failed");
                    report.failed.push((client, err));
                }
            }
        }

        if !report.is_clean() {
            warn!(
                failed = report.failed.len(),
                registered = report.registered.len(),
                "some clients were not proxied"
            );
        }
        report
    }

    /// Interfaces to proxy: the configured clients, or else every
    /// marker-tagged interface under the base packages
    pub fn candidates(&self, ctx: &SynthesisContext) -> Vec<String> {
        if !self.config.clients.is_empty() {
            return self.config.clients.clone();
        }
        let base_packages = self.config.resolved_base_packages();
        debug!(?base_packages, "scanning base packages");
        find_candidates(ctx.catalog(), &base_packages, &ctx.options().kinds.marker)
    }
}

/// A bean name that is already taken fails before synthesis, leaving
/// nothing loaded.
fn register_client(
    ctx: &mut SynthesisContext,
    registry: &mut BeanRegistry,
    client: &str,
) -> RegistrarResult<String> {
    let planned = bean_name(&ctx.options().target_name(client));
    if registry.contains(&planned) {
        return Err(RegistryError::DuplicateBean(planned).into());
    }

    let ty = ctx.synthesize(client)?;
    let definition = BeanDefinition::lazy_singleton(ty);
    let bean = definition.name.clone();
    registry.register(definition).map_err(RegistrarError::from)?;
    Ok(bean)
}

//! Synthesis Context
//!
//! Threads the catalog, shell pool, and type loader through each
//! synthesis pass. A context is single-writer: callers serialize passes.

use std::sync::Arc;

use tracing::{debug, trace};

use super::loader::{SynthesizedType, TypeLoader};
use super::pool::ShellPool;
use super::shell::{MethodBody, TypeShell};
use crate::error::{SynthesisError, SynthesisResult};
use crate::metadata::{
    merge, merge_class_tags, merge_parameters, TagCloner, TagDescriptor, TagKinds, TagSet,
};
use crate::reflect::{InterfaceDef, TypeCatalog};
use crate::well_known::{DELEGATE_FIELD, INJECT_TAG, PROXY_SUFFIX};

/// Naming and tag conventions for synthesized types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub kinds: TagKinds,
    /// Tag kind attached to the delegate field to request injection
    pub inject_kind: String,
    pub delegate_field: String,
    /// Appended to the source name to form the synthesized name
    pub suffix: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            kinds: TagKinds::default(),
            inject_kind: INJECT_TAG.to_string(),
            delegate_field: DELEGATE_FIELD.to_string(),
            suffix: PROXY_SUFFIX.to_string(),
        }
    }
}

impl SynthesisOptions {
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_delegate_field(mut self, field: impl Into<String>) -> Self {
        self.delegate_field = field.into();
        self
    }

    /// Synthesized type name for `source`
    pub fn target_name(&self, source: &str) -> String {
        format!("{}{}", source, self.suffix)
    }
}

/// Steps of a synthesis pass, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SynthesisState {
    ShellResolved,
    FieldsAdded,
    ClassTagsAttached,
    MethodsGenerated,
    MethodTagsAttached,
    Finalized,
}

impl SynthesisState {
    /// The state that follows this one
    pub fn next(self) -> Option<Self> {
        use SynthesisState::*;
        match self {
            ShellResolved => Some(FieldsAdded),
            FieldsAdded => Some(ClassTagsAttached),
            ClassTagsAttached => Some(MethodsGenerated),
            MethodsGenerated => Some(MethodTagsAttached),
            MethodTagsAttached => Some(Finalized),
            Finalized => None,
        }
    }
}

/// Build context for synthesis: catalog, pool, loader, and options
#[derive(Debug)]
pub struct SynthesisContext {
    catalog: TypeCatalog,
    pool: ShellPool,
    loader: TypeLoader,
    options: SynthesisOptions,
}

impl SynthesisContext {
    /// Create a context over `catalog` with default options
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            pool: ShellPool::new(),
            loader: TypeLoader::new(),
            options: SynthesisOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut TypeCatalog {
        &mut self.catalog
    }

    pub fn pool(&self) -> &ShellPool {
        &self.pool
    }

    pub fn loader(&self) -> &TypeLoader {
        &self.loader
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Open the shell for `target` for edits ahead of synthesis.
    ///
    /// Fails once the name is loaded, since a loaded type cannot change.
    pub fn shell_mut(&mut self, target: &str) -> SynthesisResult<&mut TypeShell> {
        if self.loader.is_loaded(target) {
            return Err(SynthesisError::AlreadyLoaded(target.to_string()));
        }
        Ok(self.pool.get_or_create(target))
    }

    /// Synthesize and load the forwarding type for the interface `source`.
    ///
    /// Returns the earlier handle when the target was already loaded from
    /// the same source. Interfaces without the marker tag are rejected.
    /// On failure neither the pool nor the loader change.
    #[tracing::instrument(skip(self))]
    pub fn synthesize(&mut self, source: &str) -> SynthesisResult<Arc<SynthesizedType>> {
        let interface = self.catalog.resolve_interface(source)?;
        if !interface.has_tag(&self.options.kinds.marker) {
            return Err(SynthesisError::NotRemoteInterface(source.to_string()));
        }

        let target = self.options.target_name(source);

        if let Some(loaded) = self.loader.get(&target) {
            if loaded.source() == source {
                debug!(type_name = %target, "reusing loaded type");
                return Ok(Arc::clone(loaded));
            }
            return Err(SynthesisError::AlreadyLoaded(target));
        }

        let shell = self.pool.checkout(&target);
        let mut pass = SynthesisPass::new(&self.catalog, &self.options, interface, shell);
        pass.add_delegate_field();
        pass.attach_class_tags()?;
        pass.generate_methods();
        pass.attach_method_tags()?;
        let shell = pass.finish();

        let ty = self.loader.define(source, shell.clone())?;
        self.pool.commit(shell);
        Ok(ty)
    }
}

struct SynthesisPass<'a> {
    cloner: TagCloner<'a>,
    options: &'a SynthesisOptions,
    interface: &'a InterfaceDef,
    shell: TypeShell,
    state: SynthesisState,
}

impl<'a> SynthesisPass<'a> {
    fn new(
        catalog: &'a TypeCatalog,
        options: &'a SynthesisOptions,
        interface: &'a InterfaceDef,
        shell: TypeShell,
    ) -> Self {
        trace!(shell = shell.name(), state = ?SynthesisState::ShellResolved, "synthesis state");
        Self {
            cloner: TagCloner::new(catalog),
            options,
            interface,
            shell,
            state: SynthesisState::ShellResolved,
        }
    }

    fn advance(&mut self, to: SynthesisState) {
        debug_assert_eq!(self.state.next(), Some(to), "out-of-order synthesis step");
        trace!(shell = self.shell.name(), state = ?to, "synthesis state");
        self.state = to;
    }

    fn add_delegate_field(&mut self) {
        let inject = TagDescriptor::new(self.options.inject_kind.as_str());
        let field = self
            .shell
            .ensure_field(&self.options.delegate_field, &self.interface.name);
        if field.tags.insert_if_absent(inject) {
            debug!(field = %field.name, "added injection tag");
        }
        self.advance(SynthesisState::FieldsAdded);
    }

    fn attach_class_tags(&mut self) -> SynthesisResult<()> {
        let source = self.cloner.clone_all(&self.interface.tags)?;
        let merged = merge_class_tags(&source, self.shell.tags(), &self.options.kinds);
        self.shell.set_tags(merged);
        self.advance(SynthesisState::ClassTagsAttached);
        Ok(())
    }

    fn generate_methods(&mut self) {
        for method in &self.interface.methods {
            let body = MethodBody::Forward {
                field: self.options.delegate_field.clone(),
                method: method.name.clone(),
            };
            self.shell.ensure_method(method.signature(), body);
        }
        self.advance(SynthesisState::MethodsGenerated);
    }

    fn attach_method_tags(&mut self) -> SynthesisResult<()> {
        for method in &self.interface.methods {
            let tags = self.cloner.clone_all(&method.tags)?;
            let param_tags = method
                .params
                .iter()
                .map(|p| self.cloner.clone_all(&p.tags))
                .collect::<SynthesisResult<Vec<TagSet>>>()?;

            let signature = method.signature();
            let type_name = self.shell.name().to_string();
            let target = self
                .shell
                .declared_method_mut(&signature.key())
                .filter(|m| m.signature == signature)
                .ok_or_else(|| SynthesisError::SignatureMismatch {
                    type_name,
                    signature: signature.to_string(),
                })?;
            target.tags = merge(&tags, &target.tags);
            target.param_tags = merge_parameters(&param_tags, &target.param_tags);
        }
        self.advance(SynthesisState::MethodTagsAttached);
        Ok(())
    }

    fn finish(mut self) -> TypeShell {
        self.advance(SynthesisState::Finalized);
        self.shell
    }
}

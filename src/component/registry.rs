//! Explicit component registry
//!
//! Components are registered by value; nothing is registered implicitly.
//! The registry is the lookup table for building one-of sets by name.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::document::Fragment;
use crate::error::{ConfigError, Result};

use super::args::Bound;
use super::resolver::{self, OneOf, Resolver};

/// Resolvers keyed by their discriminator name
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: FxHashMap<String, Arc<dyn Resolver>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the resolver's own name, replacing any previous entry
    pub fn register<R: Resolver + 'static>(&mut self, resolver: R) -> &mut Self {
        self.register_shared(Arc::new(resolver))
    }

    pub fn register_shared(&mut self, resolver: Arc<dyn Resolver>) -> &mut Self {
        self.components
            .insert(resolver.name().to_string(), resolver);
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Resolver>> {
        self.components
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::ComponentNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// One-of set over registered components, in the given order
    pub fn one_of(&self, names: &[&str]) -> Result<OneOf> {
        names
            .iter()
            .try_fold(OneOf::new(), |set, name| Ok(set.variant_shared(self.get(name)?)))
    }

    /// Bind `fragment` through the component registered as `name`
    pub fn bind(&self, name: &str, fragment: Fragment) -> Result<Bound> {
        let component = self.get(name)?;
        resolver::bind(component.as_ref(), fragment)
    }
}

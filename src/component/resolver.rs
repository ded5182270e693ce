//! Resolver seam - how one argument value is produced
//!
//! A [`Resolver`] turns a raw document value into a [`Bound`] argument.
//! Resolvers that can build themselves from a whole mapping also expose
//! [`Bindable`]; that capability is what lets binding recurse into nested
//! mappings.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::{self, Fragment, DISCRIMINATOR_KEY};
use crate::error::{ConfigError, Result};

use super::args::Bound;

/// Produces an argument value from a raw document node
pub trait Resolver: Send + Sync {
    /// Discriminator name used when this resolver sits in a [`OneOf`] set
    fn name(&self) -> &str;

    /// Single-argument construction over the raw value
    fn resolve(&self, value: Value) -> Result<Bound>;

    /// Resolve the value bound to `argument`.
    ///
    /// Wrappers override this to hand the argument name to the resolver they
    /// wrap, so nested errors name the real argument.
    fn resolve_argument(&self, _argument: &str, value: Value) -> Result<Bound> {
        self.resolve(value)
    }

    /// Bind support, if this resolver can construct from a whole mapping
    fn as_bindable(&self) -> Option<&dyn Bindable> {
        None
    }
}

/// Constructs an instance from a mapping of keyword arguments
pub trait Bindable: Send + Sync {
    fn bind_fragment(&self, fragment: Fragment) -> Result<Bound>;
}

/// Bind `fragment` through `resolver`.
///
/// Fails with [`ConfigError::DoesNotSupportBind`] only when `resolver` itself
/// lacks bind support; errors raised further down come back unchanged.
pub fn bind(resolver: &dyn Resolver, fragment: Fragment) -> Result<Bound> {
    match resolver.as_bindable() {
        Some(bindable) => bindable.bind_fragment(fragment),
        None => Err(ConfigError::DoesNotSupportBind {
            name: resolver.name().to_string(),
        }),
    }
}

/// Recurse into mappings when the resolver supports it, else resolve directly
pub(crate) fn construct(resolver: &dyn Resolver, argument: &str, value: Value) -> Result<Bound> {
    match (value, resolver.as_bindable()) {
        (Value::Object(fragment), Some(bindable)) => bindable.bind_fragment(fragment),
        (value, _) => resolver.resolve_argument(argument, value),
    }
}

/// Declared resolver for one argument
#[derive(Clone)]
pub enum ResolverSpec {
    /// One resolver, used for every value
    Single(Arc<dyn Resolver>),
    /// Variant chosen by the fragment's `type` key
    OneOf(OneOf),
}

impl ResolverSpec {
    /// Produce the bound value for `argument` from its raw document value
    pub fn bind_value(&self, argument: &str, value: Value) -> Result<Bound> {
        match self {
            ResolverSpec::Single(resolver) => construct(resolver.as_ref(), argument, value),
            ResolverSpec::OneOf(set) if set.is_empty() => {
                warn!(argument, "empty one-of set, forwarding value unchanged");
                Ok(Bound::Value(value))
            }
            ResolverSpec::OneOf(set) => {
                let (resolver, value) = set.select(argument, value)?;
                construct(resolver, argument, value)
            }
        }
    }
}

impl<R: Resolver + 'static> From<R> for ResolverSpec {
    fn from(resolver: R) -> Self {
        ResolverSpec::Single(Arc::new(resolver))
    }
}

impl From<Arc<dyn Resolver>> for ResolverSpec {
    fn from(resolver: Arc<dyn Resolver>) -> Self {
        ResolverSpec::Single(resolver)
    }
}

impl From<OneOf> for ResolverSpec {
    fn from(set: OneOf) -> Self {
        ResolverSpec::OneOf(set)
    }
}

/// Ordered set of named variants for a polymorphic argument
#[derive(Clone, Default)]
pub struct OneOf {
    variants: Vec<(String, Arc<dyn Resolver>)>,
}

impl OneOf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variant under its own name
    pub fn variant<R: Resolver + 'static>(self, resolver: R) -> Self {
        self.variant_shared(Arc::new(resolver))
    }

    /// Add a shared variant under its own name
    pub fn variant_shared(mut self, resolver: Arc<dyn Resolver>) -> Self {
        let name = resolver.name().to_string();
        self.variants.push((name, resolver));
        self
    }

    /// Add a variant under an explicit discriminator name
    pub fn variant_named<R: Resolver + 'static>(mut self, name: impl Into<String>, resolver: R) -> Self {
        self.variants.push((name.into(), Arc::new(resolver)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Discriminator names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|(name, _)| name.as_str())
    }

    /// Pick the variant named by the fragment's `type` key.
    ///
    /// The key is removed from the returned value. With duplicate names the
    /// later declaration wins.
    pub fn select(&self, argument: &str, value: Value) -> Result<(&dyn Resolver, Value)> {
        let mut fragment = match value {
            Value::Object(fragment) => fragment,
            other => {
                return Err(ConfigError::InvalidConfigValue {
                    argument: argument.to_string(),
                    reason: format!("expected a mapping, found {}", document::kind(&other)),
                })
            }
        };

        let type_value =
            fragment
                .shift_remove(DISCRIMINATOR_KEY)
                .ok_or_else(|| ConfigError::KeyNotInConfig {
                    key: DISCRIMINATOR_KEY.to_string(),
                    argument: argument.to_string(),
                })?;

        let type_name = match type_value {
            Value::String(s) => s,
            other => other.to_string(),
        };

        let resolver = self
            .variants
            .iter()
            .rev()
            .find(|(name, _)| *name == type_name)
            .map(|(_, resolver)| resolver.as_ref())
            .ok_or_else(|| ConfigError::TypeNotDefined {
                type_name: type_name.clone(),
                argument: argument.to_string(),
            })?;

        debug!(argument, variant = %type_name, "selected one-of variant");
        Ok((resolver, Value::Object(fragment)))
    }
}

//! Component descriptors - a constructor plus per-argument resolvers
//!
//! ```text
//! fragment {cats1: 1, cats2: 2}
//!      │
//!      ├─ cats1 → int   → 1
//!      ├─ cats2 → str   → "2"
//!      └─ other → passed through unchanged
//!      ↓
//! constructor(BoundArgs) → T
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::document::{self, Fragment};
use crate::error::{ConfigError, Result};

use super::args::{Bound, BoundArgs};
use super::resolver::{Bindable, Resolver, ResolverSpec};

type Constructor<T> = dyn Fn(BoundArgs) -> Result<T> + Send + Sync;

/// A bindable component: constructor plus argument resolvers
///
/// Built once and reused; clones share the constructor.
///
/// ```
/// use confbind::{cast, ComponentDescriptor};
/// use serde_json::json;
///
/// struct Cats {
///     cats1: i64,
///     cats2: String,
/// }
///
/// let cats = ComponentDescriptor::new("Cats", |mut args| {
///     Ok(Cats {
///         cats1: args.int("cats1")?,
///         cats2: args.string("cats2")?,
///     })
/// })
/// .arg("cats1", cast::int())
/// .arg("cats2", cast::string());
///
/// let fragment = json!({"cats1": 1, "cats2": 2});
/// let built = cats.bind(fragment.as_object().unwrap().clone()).unwrap();
/// assert_eq!(built.cats1, 1);
/// assert_eq!(built.cats2, "2");
/// ```
pub struct ComponentDescriptor<T> {
    name: Arc<str>,
    constructor: Arc<Constructor<T>>,
    resolvers: FxHashMap<String, ResolverSpec>,
}

impl<T> Clone for ComponentDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            constructor: Arc::clone(&self.constructor),
            resolvers: self.resolvers.clone(),
        }
    }
}

impl<T> fmt::Debug for ComponentDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut args: Vec<_> = self.resolvers.keys().collect();
        args.sort_unstable();
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("args", &args)
            .finish_non_exhaustive()
    }
}

impl<T: Any + Send> ComponentDescriptor<T> {
    pub fn new<F>(name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(BoundArgs) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            constructor: Arc::new(constructor),
            resolvers: FxHashMap::default(),
        }
    }

    /// Declare the resolver for one argument
    pub fn arg(mut self, name: impl Into<String>, resolver: impl Into<ResolverSpec>) -> Self {
        self.resolvers.insert(name.into(), resolver.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolver_for(&self, argument: &str) -> Option<&ResolverSpec> {
        self.resolvers.get(argument)
    }

    /// Arguments with a declared resolver, sorted
    pub fn declared_args(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.resolvers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Bind every key of `fragment` and call the constructor.
    ///
    /// Declared keys go through their resolver (recursing into mappings
    /// when the resolver supports bind); undeclared keys pass through.
    #[instrument(name = "bind", skip_all, fields(component = %self.name))]
    pub fn bind(&self, fragment: Fragment) -> Result<T> {
        debug!(args = fragment.len(), "binding component");

        let mut args = BoundArgs::new(self.name.as_ref());
        for (key, value) in fragment {
            let bound = match self.resolvers.get(&key) {
                Some(spec) => spec.bind_value(&key, value)?,
                None => Bound::Value(value),
            };
            args.insert(key, bound);
        }

        self.call(args)
    }

    /// Invoke the constructor on already-bound arguments
    pub fn call(&self, args: BoundArgs) -> Result<T> {
        (self.constructor)(args)
    }
}

impl<T: Any + Send> Bindable for ComponentDescriptor<T> {
    fn bind_fragment(&self, fragment: Fragment) -> Result<Bound> {
        self.bind(fragment).map(Bound::instance)
    }
}

impl<T: Any + Send> Resolver for ComponentDescriptor<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, value: Value) -> Result<Bound> {
        self.resolve_argument(&self.name, value)
    }

    fn resolve_argument(&self, argument: &str, value: Value) -> Result<Bound> {
        match value {
            Value::Object(fragment) => self.bind_fragment(fragment),
            other => Err(ConfigError::InvalidConfigValue {
                argument: argument.to_string(),
                reason: format!("expected a mapping, found {}", document::kind(&other)),
            }),
        }
    }

    fn as_bindable(&self) -> Option<&dyn Bindable> {
        Some(self)
    }
}

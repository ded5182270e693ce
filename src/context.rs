//! Binding context - a mutable view over a document subtree
//!
//! A root context owns the document; child contexts returned by [`get`]
//! share that root and remember their path, so a write through a child is
//! visible from the root:
//!
//! ```text
//! root ──get("app")──▶ app ──get("controller")──▶ controller
//!   ▲                                               │
//!   └──────────── same Rc<RefCell<Value>> ──────────┘
//! ```
//!
//! Contexts are single-threaded (`!Send`); callers sharing one across
//! threads must serialize access themselves.
//!
//! [`get`]: BindingContext::get

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::component::{self, Bound, ComponentDescriptor, Resolver};
use crate::document::{self, Document, Fragment};
use crate::error::{ConfigError, Result};
use crate::loader;
use crate::path::{self, Segment};
use crate::placeholder::PlaceholderResolver;

/// Result of a lookup: a nested mapping comes back as a context
#[derive(Debug, Clone)]
pub enum Entry {
    Context(BindingContext),
    Value(Value),
}

impl Entry {
    pub fn into_context(self) -> Option<BindingContext> {
        match self {
            Entry::Context(ctx) => Some(ctx),
            Entry::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Context(_) => None,
            Entry::Value(v) => Some(v),
        }
    }

    /// Raw value; a context is snapshotted into its mapping
    pub fn into_value(self) -> Value {
        match self {
            Entry::Context(ctx) => ctx.to_value(),
            Entry::Value(v) => v,
        }
    }
}

/// Mutable document view with placeholder-aware loading and instantiation
#[derive(Clone)]
pub struct BindingContext {
    root: Rc<RefCell<Value>>,
    path: Vec<Segment>,
    resolver: PlaceholderResolver,
}

impl Default for BindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("path", &path::display(&self.path))
            .field("document", &self.to_value())
            .finish()
    }
}

impl BindingContext {
    /// Empty context reading placeholders from the process environment
    pub fn new() -> Self {
        Self::with_resolver(PlaceholderResolver::default())
    }

    /// Empty context using `resolver` for placeholder substitution
    pub fn with_resolver(resolver: PlaceholderResolver) -> Self {
        Self {
            root: Rc::new(RefCell::new(Value::Object(Fragment::new()))),
            path: Vec::new(),
            resolver,
        }
    }

    /// Context over `document`, placeholders resolved
    pub fn from_document(document: Document) -> Result<Self> {
        let ctx = Self::new();
        ctx.load(document)?;
        Ok(ctx)
    }

    /// Context over a JSON/TOML/YAML file, placeholders resolved
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let ctx = Self::new();
        ctx.load_file(file)?;
        Ok(ctx)
    }

    pub fn resolver(&self) -> &PlaceholderResolver {
        &self.resolver
    }

    /// Dotted path of this context from the root (`$` for the root)
    pub fn path(&self) -> String {
        path::display(&self.path)
    }

    /// False once a parent write has replaced this context's mapping
    pub fn is_attached(&self) -> bool {
        self.read(|_| ()).is_some()
    }

    fn child(&self, segments: Vec<Segment>) -> Self {
        Self {
            root: Rc::clone(&self.root),
            path: segments,
            resolver: self.resolver.clone(),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Fragment) -> R) -> Option<R> {
        let root = self.root.borrow();
        path::lookup(&root, &self.path)
            .and_then(Value::as_object)
            .map(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Fragment) -> R) -> Result<R> {
        let mut root = self.root.borrow_mut();
        path::lookup_mut(&mut root, &self.path)
            .and_then(Value::as_object_mut)
            .map(f)
            .ok_or_else(|| ConfigError::MissingKey { path: self.path() })
    }

    fn entry_at(&self, segments: Vec<Segment>, value: &Value) -> Entry {
        match value {
            Value::Object(_) => Entry::Context(self.child(segments)),
            other => Entry::Value(other.clone()),
        }
    }

    /// Look up `key`; nested mappings come back as child contexts
    pub fn get(&self, key: &str) -> Option<Entry> {
        let mut segments = self.path.clone();
        segments.push(Segment::Key(key.to_string()));

        let root = self.root.borrow();
        let value = path::lookup(&root, &segments)?;
        Some(self.entry_at(segments, value))
    }

    /// Look up a dotted path relative to this context, e.g. `things.t0[1]`
    pub fn get_path(&self, key_path: &str) -> Result<Entry> {
        let mut segments = self.path.clone();
        segments.extend(path::parse(key_path)?);

        let root = self.root.borrow();
        match path::lookup(&root, &segments) {
            Some(value) => Ok(self.entry_at(segments, value)),
            None => Err(ConfigError::MissingKey {
                path: path::display(&segments),
            }),
        }
    }

    /// Write `key` directly; no placeholder substitution
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let (key, value) = (key.into(), value.into());
        self.write(|node| {
            node.insert(key, value);
        })
    }

    /// Write at a dotted path relative to this context; parents must exist
    pub fn set_path(&self, key_path: &str, value: impl Into<Value>) -> Result<()> {
        let mut relative = path::parse(key_path)?;
        let Some(last) = relative.pop() else {
            return Err(ConfigError::InvalidConfigKey {
                path: key_path.to_string(),
            });
        };
        let mut parent_path = self.path.clone();
        parent_path.extend(relative);

        let missing = || {
            let mut full = parent_path.clone();
            full.push(last.clone());
            ConfigError::MissingKey {
                path: path::display(&full),
            }
        };

        let mut root = self.root.borrow_mut();
        let parent = path::lookup_mut(&mut root, &parent_path).ok_or_else(missing)?;
        match (&last, parent) {
            (Segment::Key(key), Value::Object(map)) => {
                map.insert(key.clone(), value.into());
            }
            (Segment::Index(i), Value::Object(map)) => {
                map.insert(i.to_string(), value.into());
            }
            (Segment::Index(i), Value::Array(items)) => {
                let slot = items.get_mut(*i).ok_or_else(missing)?;
                *slot = value.into();
            }
            _ => return Err(missing()),
        }
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write(|node| node.shift_remove(key)).ok().flatten()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read(|node| node.contains_key(key)).unwrap_or(false)
    }

    /// Keys in document order
    pub fn keys(&self) -> Vec<String> {
        self.read(|node| node.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Key/entry pairs in document order
    pub fn entries(&self) -> Vec<(String, Entry)> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(&key).map(|entry| (key, entry)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read(Fragment::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) -> Result<()> {
        self.write(Fragment::clear)
    }

    /// Snapshot of this context's mapping (empty once detached)
    pub fn to_fragment(&self) -> Fragment {
        self.read(Fragment::clone).unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_fragment())
    }

    fn resolved_mapping(&self, fragment: &Document) -> Result<Fragment> {
        match fragment {
            Value::Object(map) => self.resolver.resolve_map(map),
            other => Err(ConfigError::ExpectedMapping {
                path: self.path(),
                found: document::kind(other).to_string(),
            }),
        }
    }

    /// Resolve placeholders in `fragment`, then merge it key by key.
    ///
    /// Existing keys are overwritten wholesale (no deep merge). Nothing is
    /// merged if resolution fails.
    pub fn load(&self, fragment: Document) -> Result<()> {
        let resolved = self.resolved_mapping(&fragment)?;
        let count = resolved.len();
        self.write(|node| node.extend(resolved))?;
        debug!(path = %self.path(), keys = count, "merged fragment");
        Ok(())
    }

    /// Like [`load`](Self::load) but refuses to overwrite existing keys
    pub fn load_strict(&self, fragment: Document) -> Result<()> {
        let resolved = self.resolved_mapping(&fragment)?;
        let collisions: Vec<String> = self
            .read(|node| {
                resolved
                    .keys()
                    .filter(|key| node.contains_key(*key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if !collisions.is_empty() {
            return Err(ConfigError::MergeCollision { keys: collisions });
        }
        self.write(|node| node.extend(resolved))
    }

    /// Read, parse and [`load`](Self::load) a JSON/TOML/YAML file
    pub fn load_file(&self, file: impl AsRef<Path>) -> Result<()> {
        let file = file.as_ref();
        let document = loader::load_document(file)?;
        debug!(file = %file.display(), "loaded configuration file");
        self.load(document)
    }

    fn bind_fragment(&self) -> Result<Fragment> {
        self.read(Fragment::clone)
            .ok_or_else(|| ConfigError::MissingKey { path: self.path() })
    }

    /// Bind this context's mapping through `descriptor`
    pub fn instantiate<T: Any + Send>(&self, descriptor: &ComponentDescriptor<T>) -> Result<T> {
        descriptor.bind(self.bind_fragment()?)
    }

    /// Bind through any resolver; fails if it has no bind support
    pub fn instantiate_with(&self, resolver: &dyn Resolver) -> Result<Bound> {
        component::bind(resolver, self.bind_fragment()?)
    }
}

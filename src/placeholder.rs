//! Placeholder resolution - `${NAME}` substitution from the environment
//!
//! Scans every string leaf of a document and splices in environment values.
//! Mapping keys are never substituted. Malformed tokens (`$NAME`, `${a b}`,
//! `${NAME` without a closing brace) are left verbatim.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{ConfigError, Result};

/// Pre-compiled regex for `${IDENT}` placeholders
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// Source of variable values for placeholder substitution
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment on every lookup (no caching)
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }
}

/// Fixed set of variables held in memory
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: FxHashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Substitutes `${NAME}` placeholders in documents
#[derive(Clone)]
pub struct PlaceholderResolver {
    env: Arc<dyn EnvSource>,
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        Self::new(ProcessEnv)
    }
}

impl fmt::Debug for PlaceholderResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceholderResolver").finish_non_exhaustive()
    }
}

impl PlaceholderResolver {
    pub fn new(env: impl EnvSource + 'static) -> Self {
        Self { env: Arc::new(env) }
    }

    /// Resolver reading the process environment
    pub fn from_process_env() -> Self {
        Self::default()
    }

    /// Return a copy of `node` with every string leaf substituted.
    ///
    /// Fails on the first undefined variable; `node` is left untouched.
    pub fn resolve(&self, node: &Value) -> Result<Value> {
        match node {
            Value::String(s) => Ok(Value::String(self.resolve_str(s)?.into_owned())),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => self.resolve_map(map).map(Value::Object),
            other => Ok(other.clone()),
        }
    }

    /// Mapping variant of [`resolve`](Self::resolve); keys are kept as-is
    pub fn resolve_map(&self, map: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut out = Map::with_capacity(map.len());
        for (key, value) in map {
            out.insert(key.clone(), self.resolve(value)?);
        }
        Ok(out)
    }

    /// Substitute placeholders in a single string.
    ///
    /// Returns `Cow::Borrowed` when the string has no `${` at all.
    pub fn resolve_str<'a>(&self, template: &'a str) -> Result<Cow<'a, str>> {
        if !template.contains("${") {
            return Ok(Cow::Borrowed(template));
        }

        let mut result = String::with_capacity(template.len() + 32);
        let mut last_end = 0;

        for cap in PLACEHOLDER_RE.captures_iter(template) {
            let m = cap.get(0).unwrap();
            let name = &cap[1];

            let value = self.env.var(name).ok_or_else(|| {
                ConfigError::EnvironmentVariableNotFound {
                    variable_name: name.to_string(),
                }
            })?;
            trace!(variable = name, "substituted placeholder");

            result.push_str(&template[last_end..m.start()]);
            result.push_str(&value);
            last_end = m.end();
        }

        if last_end == 0 {
            return Ok(Cow::Borrowed(template));
        }
        result.push_str(&template[last_end..]);
        Ok(Cow::Owned(result))
    }

    /// Referenced names the environment source cannot supply, sorted
    pub fn missing_variables(&self, node: &Value) -> Vec<String> {
        referenced_variables(node)
            .into_iter()
            .filter(|name| self.env.var(name).is_none())
            .collect()
    }
}

/// Every variable named by a well-formed placeholder in `node`'s string leaves
pub fn referenced_variables(node: &Value) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_variables(node, &mut names);
    names
}

fn collect_variables(node: &Value, names: &mut BTreeSet<String>) {
    match node {
        Value::String(s) => {
            for cap in PLACEHOLDER_RE.captures_iter(s) {
                names.insert(cap[1].to_string());
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_variables(v, names)),
        Value::Object(map) => map.values().for_each(|v| collect_variables(v, names)),
        _ => {}
    }
}

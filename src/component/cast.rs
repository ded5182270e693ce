//! Scalar resolvers - single-argument conversions over raw values
//!
//! These adapt plain conversions to the [`Resolver`] seam. None of them
//! support bind, so a mapping handed to them is converted as a whole.

use std::any::Any;
use std::sync::Arc;

use serde_json::{Number, Value};

use crate::document::{self, preview};
use crate::error::{ConfigError, Result};

use super::args::Bound;
use super::resolver::{Resolver, ResolverSpec};

type CastFn = dyn Fn(Value) -> Result<Value> + Send + Sync;

/// Named conversion producing a document value
#[derive(Clone)]
pub struct Cast {
    name: Arc<str>,
    convert: Arc<CastFn>,
}

impl Cast {
    pub fn new<F>(name: impl Into<String>, convert: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            convert: Arc::new(convert),
        }
    }
}

impl Resolver for Cast {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, value: Value) -> Result<Bound> {
        (self.convert)(value).map(Bound::Value)
    }
}

type FactoryFn<T> = dyn Fn(Value) -> Result<T> + Send + Sync;

/// Named conversion producing a typed instance
pub struct Factory<T> {
    name: Arc<str>,
    build: Arc<FactoryFn<T>>,
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            build: Arc::clone(&self.build),
        }
    }
}

impl<T: Any + Send> Factory<T> {
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(Value) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            build: Arc::new(build),
        }
    }
}

impl<T: Any + Send> Resolver for Factory<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, value: Value) -> Result<Bound> {
        (self.build)(value).map(Bound::instance)
    }
}

/// Lets `null` through, otherwise defers to the inner resolver
#[derive(Clone)]
pub struct Optional {
    inner: ResolverSpec,
}

impl Resolver for Optional {
    fn name(&self) -> &str {
        "optional"
    }

    fn resolve(&self, value: Value) -> Result<Bound> {
        self.resolve_argument(self.name(), value)
    }

    fn resolve_argument(&self, argument: &str, value: Value) -> Result<Bound> {
        match value {
            Value::Null => Ok(Bound::Value(Value::Null)),
            value => self.inner.bind_value(argument, value),
        }
    }
}

/// Applies the inner resolver to every element of a sequence
#[derive(Clone)]
pub struct ListOf {
    inner: ResolverSpec,
}

impl Resolver for ListOf {
    fn name(&self) -> &str {
        "list"
    }

    fn resolve(&self, value: Value) -> Result<Bound> {
        self.resolve_argument(self.name(), value)
    }

    /// Elements are bound as `argument[i]`
    fn resolve_argument(&self, argument: &str, value: Value) -> Result<Bound> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.inner.bind_value(&format!("{argument}[{i}]"), item))
                .collect::<Result<Vec<_>>>()
                .map(Bound::List),
            other => Err(failed(self.name(), &other)),
        }
    }
}

// i64 bounds as f64; 2^63 itself does not fit
const I64_MIN_F64: f64 = i64::MIN as f64;
const I64_MAX_EXCLUSIVE_F64: f64 = 9_223_372_036_854_775_808.0;

fn failed(resolver: &str, value: &Value) -> ConfigError {
    ConfigError::CastFailed {
        resolver: resolver.to_string(),
        value: format!("{} {}", document::kind(value), preview(value)),
    }
}

/// Integer: integers as-is, floats truncated, decimal strings parsed, bools as 0/1.
/// Anything outside the i64 range fails.
pub fn int() -> Cast {
    Cast::new("int", |value| {
        let out = match &value {
            Value::Number(n) if n.is_f64() => n
                .as_f64()
                .map(f64::trunc)
                .filter(|f| (I64_MIN_F64..I64_MAX_EXCLUSIVE_F64).contains(f))
                .map(|f| f as i64),
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        };
        out.map(Value::from).ok_or_else(|| failed("int", &value))
    })
}

/// Float: any number or numeric string; bools as 0.0/1.0
pub fn float() -> Cast {
    Cast::new("float", |value| {
        let out = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        out.and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| failed("float", &value))
    })
}

/// String: scalars rendered, sequences and mappings as compact JSON
pub fn string() -> Cast {
    Cast::new("str", |value| match value {
        Value::String(s) => Ok(Value::String(s)),
        Value::Null => Err(failed("str", &Value::Null)),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Ok(Value::String(other.to_string())),
    })
}

/// Bool: booleans, 0/1, and common words (true/false, yes/no, on/off)
pub fn boolean() -> Cast {
    Cast::new("bool", |value| {
        let out = match &value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        out.map(Value::Bool).ok_or_else(|| failed("bool", &value))
    })
}

/// Identity: forwards the value unchanged
pub fn raw() -> Cast {
    Cast::new("raw", Ok)
}

/// `null` stays `null`, anything else goes through `inner`
pub fn optional(inner: impl Into<ResolverSpec>) -> Optional {
    Optional {
        inner: inner.into(),
    }
}

/// Element-wise resolution of a sequence
pub fn list(inner: impl Into<ResolverSpec>) -> ListOf {
    ListOf {
        inner: inner.into(),
    }
}

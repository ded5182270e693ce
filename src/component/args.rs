//! Bound arguments handed to component constructors

use std::any::{type_name, Any};
use std::fmt;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::document;
use crate::error::{ConfigError, Result};

/// One argument after binding
pub enum Bound {
    /// Document value, cast or passed through
    Value(Value),
    /// Nested component instance
    Instance(Box<dyn Any + Send>),
    /// Element-wise bound sequence
    List(Vec<Bound>),
}

impl Bound {
    pub fn instance<T: Any + Send>(value: T) -> Self {
        Bound::Instance(Box::new(value))
    }

    /// Short shape name, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Bound::Value(v) => document::kind(v),
            Bound::Instance(_) => "instance",
            Bound::List(_) => "list",
        }
    }

    /// Back to a document value; `None` if an instance is involved
    pub fn into_value(self) -> Option<Value> {
        match self {
            Bound::Value(v) => Some(v),
            Bound::Instance(_) => None,
            Bound::List(items) => items
                .into_iter()
                .map(Bound::into_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
        }
    }

    /// Take the instance out if it is a `T`
    pub fn downcast<T: Any>(self) -> std::result::Result<T, Bound> {
        match self {
            Bound::Instance(boxed) => boxed.downcast::<T>().map(|b| *b).map_err(Bound::Instance),
            other => Err(other),
        }
    }
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Bound::Instance(_) => f.write_str("Instance(..)"),
            Bound::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl From<Value> for Bound {
    fn from(value: Value) -> Self {
        Bound::Value(value)
    }
}

/// Keyword arguments for one constructor call
///
/// Accessors consume the argument they read, so [`finish`](Self::finish)
/// can reject anything the constructor did not use.
#[derive(Debug)]
pub struct BoundArgs {
    component: String,
    args: FxHashMap<String, Bound>,
}

impl BoundArgs {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            args: FxHashMap::default(),
        }
    }

    /// Name of the component being constructed
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Bound>) {
        self.args.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Bound>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Remaining argument names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.args.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn take(&mut self, name: &str) -> Option<Bound> {
        self.args.remove(name)
    }

    pub fn require(&mut self, name: &str) -> Result<Bound> {
        self.take(name).ok_or_else(|| ConfigError::MissingArgument {
            component: self.component.clone(),
            argument: name.to_string(),
        })
    }

    fn mismatch(&self, name: &str, expected: &str, found: &str) -> ConfigError {
        ConfigError::ArgumentType {
            component: self.component.clone(),
            argument: name.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn value(&mut self, name: &str) -> Result<Value> {
        let bound = self.require(name)?;
        let kind = bound.kind();
        bound
            .into_value()
            .ok_or_else(|| self.mismatch(name, "document value", kind))
    }

    pub fn string(&mut self, name: &str) -> Result<String> {
        match self.value(name)? {
            Value::String(s) => Ok(s),
            other => Err(self.mismatch(name, "string", document::kind(&other))),
        }
    }

    pub fn int(&mut self, name: &str) -> Result<i64> {
        let value = self.value(name)?;
        value
            .as_i64()
            .ok_or_else(|| self.mismatch(name, "integer", document::kind(&value)))
    }

    pub fn float(&mut self, name: &str) -> Result<f64> {
        let value = self.value(name)?;
        value
            .as_f64()
            .ok_or_else(|| self.mismatch(name, "float", document::kind(&value)))
    }

    pub fn bool(&mut self, name: &str) -> Result<bool> {
        let value = self.value(name)?;
        value
            .as_bool()
            .ok_or_else(|| self.mismatch(name, "bool", document::kind(&value)))
    }

    /// Nested component instance of type `T`
    pub fn instance<T: Any>(&mut self, name: &str) -> Result<T> {
        self.require(name)?
            .downcast::<T>()
            .map_err(|other| self.mismatch(name, type_name::<T>(), other.kind()))
    }

    /// Sequence whose elements were all bound to `T` instances
    pub fn list<T: Any>(&mut self, name: &str) -> Result<Vec<T>> {
        match self.require(name)? {
            Bound::List(items) => items
                .into_iter()
                .map(|item| {
                    item.downcast::<T>()
                        .map_err(|other| self.mismatch(name, type_name::<T>(), other.kind()))
                })
                .collect(),
            other => Err(self.mismatch(name, "list", other.kind())),
        }
    }

    /// Deserialize the argument's document value with serde
    pub fn deserialize<D: DeserializeOwned>(&mut self, name: &str) -> Result<D> {
        let value = self.value(name)?;
        serde_json::from_value(value)
            .map_err(|e| self.mismatch(name, type_name::<D>(), &e.to_string()))
    }

    fn optional<T>(
        &mut self,
        name: &str,
        read: impl FnOnce(&mut Self, &str) -> Result<T>,
    ) -> Result<Option<T>> {
        let is_null = match self.args.get(name) {
            None => return Ok(None),
            Some(bound) => matches!(bound, Bound::Value(Value::Null)),
        };
        if is_null {
            self.args.remove(name);
            return Ok(None);
        }
        read(self, name).map(Some)
    }

    pub fn opt_value(&mut self, name: &str) -> Result<Option<Value>> {
        self.optional(name, Self::value)
    }

    pub fn opt_string(&mut self, name: &str) -> Result<Option<String>> {
        self.optional(name, Self::string)
    }

    pub fn opt_int(&mut self, name: &str) -> Result<Option<i64>> {
        self.optional(name, Self::int)
    }

    pub fn opt_float(&mut self, name: &str) -> Result<Option<f64>> {
        self.optional(name, Self::float)
    }

    pub fn opt_bool(&mut self, name: &str) -> Result<Option<bool>> {
        self.optional(name, Self::bool)
    }

    pub fn opt_instance<T: Any>(&mut self, name: &str) -> Result<Option<T>> {
        self.optional(name, Self::instance::<T>)
    }

    /// Reject arguments the constructor did not consume
    pub fn finish(self) -> Result<()> {
        if self.args.is_empty() {
            return Ok(());
        }
        let mut arguments: Vec<String> = self.args.into_keys().collect();
        arguments.sort_unstable();
        Err(ConfigError::UnexpectedArgument {
            component: self.component,
            arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Pet(&'static str);

    fn args() -> BoundArgs {
        BoundArgs::new("Owner")
            .with("name", json!("Ada"))
            .with("age", json!(36))
            .with("score", json!(1.5))
            .with("active", json!(true))
            .with("nothing", Value::Null)
            .with("pet", Bound::instance(Pet("Rex")))
    }

    #[test]
    fn typed_accessors() {
        let mut args = args();
        assert_eq!(args.string("name").unwrap(), "Ada");
        assert_eq!(args.int("age").unwrap(), 36);
        assert_eq!(args.float("score").unwrap(), 1.5);
        assert!(args.bool("active").unwrap());
        assert_eq!(args.instance::<Pet>("pet").unwrap(), Pet("Rex"));
        assert_eq!(args.names(), vec!["nothing"]);
    }

    #[test]
    fn missing_argument() {
        let err = args().string("email").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingArgument { ref component, ref argument }
                if component == "Owner" && argument == "email"
        ));
    }

    #[test]
    fn type_mismatch_names_both_sides() {
        let err = args().string("age").unwrap_err();
        match err {
            ConfigError::ArgumentType { expected, found, .. } => {
                assert_eq!(expected, "string");
                assert_eq!(found, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn instance_of_wrong_type() {
        let err = args().instance::<String>("pet").unwrap_err();
        assert!(matches!(err, ConfigError::ArgumentType { .. }));
    }

    #[test]
    fn optional_accessors() {
        let mut args = args();
        assert_eq!(args.opt_string("nothing").unwrap(), None);
        assert_eq!(args.opt_string("absent").unwrap(), None);
        assert_eq!(args.opt_int("age").unwrap(), Some(36));
        assert!(!args.contains("nothing"));
    }

    #[test]
    fn list_of_instances() {
        let mut args = BoundArgs::new("Zoo").with(
            "pets",
            Bound::List(vec![Bound::instance(Pet("a")), Bound::instance(Pet("b"))]),
        );
        assert_eq!(args.list::<Pet>("pets").unwrap(), vec![Pet("a"), Pet("b")]);
    }

    #[test]
    fn list_of_values_reads_as_value() {
        let mut args = BoundArgs::new("Zoo").with(
            "tags",
            Bound::List(vec![Bound::Value(json!("a")), Bound::Value(json!("b"))]),
        );
        assert_eq!(args.value("tags").unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn deserialize_with_serde() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Limits {
            max: u32,
        }
        let mut args = BoundArgs::new("Server").with("limits", json!({"max": 5}));
        assert_eq!(args.deserialize::<Limits>("limits").unwrap(), Limits { max: 5 });
    }

    #[test]
    fn finish_rejects_leftovers() {
        let mut args = args();
        args.string("name").unwrap();
        let err = args.finish().unwrap_err();
        match err {
            ConfigError::UnexpectedArgument { arguments, .. } => {
                assert_eq!(arguments, vec!["active", "age", "nothing", "pet", "score"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Integration tests for component binding through a BindingContext
//!
//! Covers nested descriptors, one-of dispatch, casts and the error kinds
//! a caller can match on.

use confbind::{
    bind, cast, BindingContext, ComponentDescriptor, ComponentRegistry, ConfigError, Entry,
    Fragment, MapEnv, OneOf, PlaceholderResolver,
};
use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::{json, Value};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, PartialEq)]
struct Labels {
    arg_1: String,
    arg_2: String,
    arg_3: String,
    arg_4: String,
}

#[derive(Debug, PartialEq)]
struct Counters {
    arg_5: i64,
    arg_6: i64,
    arg_7: i64,
    arg_8: i64,
}

#[derive(Debug, PartialEq)]
struct Things {
    t0: Labels,
    t1: Counters,
    arg_9: String,
}

fn labels() -> ComponentDescriptor<Labels> {
    ComponentDescriptor::new("Labels", |mut args| {
        Ok(Labels {
            arg_1: args.string("arg_1")?,
            arg_2: args.string("arg_2")?,
            arg_3: args.string("arg_3")?,
            arg_4: args.string("arg_4")?,
        })
    })
    .arg("arg_1", cast::string())
    .arg("arg_2", cast::string())
    .arg("arg_3", cast::string())
    .arg("arg_4", cast::string())
}

fn counters() -> ComponentDescriptor<Counters> {
    ComponentDescriptor::new("Counters", |mut args| {
        Ok(Counters {
            arg_5: args.int("arg_5")?,
            arg_6: args.int("arg_6")?,
            arg_7: args.int("arg_7")?,
            arg_8: args.int("arg_8")?,
        })
    })
    .arg("arg_5", cast::int())
    .arg("arg_6", cast::int())
    .arg("arg_7", cast::int())
    .arg("arg_8", cast::int())
}

fn things() -> ComponentDescriptor<Things> {
    ComponentDescriptor::new("Things", |mut args| {
        Ok(Things {
            t0: args.instance("t0")?,
            t1: args.instance("t1")?,
            arg_9: args.string("arg_9")?,
        })
    })
    .arg("t0", labels())
    .arg("t1", counters())
    .arg("arg_9", cast::string())
}

fn context() -> BindingContext {
    BindingContext::from_document(json!({
        "things": {
            "t0": {"arg_1": "a", "arg_2": "b", "arg_3": "c", "arg_4": "d"},
            "t1": {"arg_5": 1, "arg_6": 2, "arg_7": 3, "arg_8": 4},
            "arg_9": "e"
        }
    }))
    .unwrap()
}

fn fragment(value: Value) -> Fragment {
    value.as_object().cloned().expect("mapping")
}

// ============================================================================
// Nested instantiation
// ============================================================================

#[test]
fn test_instantiate_leaf_component() {
    let ctx = context();
    let t1 = ctx.get_path("things.t1").unwrap().into_context().unwrap();
    let built = t1.instantiate(&counters()).unwrap();

    assert_eq!(t1.get("arg_5").unwrap().into_value(), json!(built.arg_5));
    assert_eq!(t1.get("arg_6").unwrap().into_value(), json!(built.arg_6));
}

#[test]
fn test_instantiate_nested_components() {
    let ctx = context();
    let things_ctx = ctx.get("things").and_then(Entry::into_context).unwrap();
    let built = things_ctx.instantiate(&things()).unwrap();

    assert_eq!(
        built,
        Things {
            t0: Labels {
                arg_1: "a".into(),
                arg_2: "b".into(),
                arg_3: "c".into(),
                arg_4: "d".into(),
            },
            t1: Counters {
                arg_5: 1,
                arg_6: 2,
                arg_7: 3,
                arg_8: 4,
            },
            arg_9: "e".into(),
        }
    );
}

#[test]
fn test_nested_failure_aborts_whole_bind() {
    let ctx = context();
    ctx.set_path("things.t1.arg_7", "three").unwrap();

    let things_ctx = ctx.get("things").and_then(Entry::into_context).unwrap();
    let err = things_ctx.instantiate(&things()).unwrap_err();
    assert!(matches!(err, ConfigError::CastFailed { ref resolver, .. } if resolver == "int"));
}

#[test]
fn test_placeholders_reach_constructors() {
    let ctx = BindingContext::with_resolver(PlaceholderResolver::new(
        MapEnv::new().with("LABEL", "from-env"),
    ));
    ctx.load(json!({"arg_1": "${LABEL}", "arg_2": "b", "arg_3": "c", "arg_4": "x-${LABEL}"}))
        .unwrap();

    let built = ctx.instantiate(&labels()).unwrap();
    assert_eq!(built.arg_1, "from-env");
    assert_eq!(built.arg_4, "x-from-env");
}

// ============================================================================
// Casts and pass-through
// ============================================================================

#[derive(Debug, PartialEq)]
enum Pet {
    Cat { cats1: i64, cats2: String },
    Dog { dogs1: f64 },
}

fn cat() -> ComponentDescriptor<Pet> {
    ComponentDescriptor::new("MockThing1", |mut args| {
        Ok(Pet::Cat {
            cats1: args.int("cats1")?,
            cats2: args.string("cats2")?,
        })
    })
    .arg("cats1", cast::int())
    .arg("cats2", cast::string())
}

fn dog() -> ComponentDescriptor<Pet> {
    ComponentDescriptor::new("MockThing2", |mut args| {
        Ok(Pet::Dog {
            dogs1: args.float("dogs1")?,
        })
    })
    .arg("dogs1", cast::float())
}

#[test]
fn test_declared_arguments_are_cast() {
    let pet = cat().bind(fragment(json!({"cats1": 1, "cats2": 2}))).unwrap();
    assert_eq!(
        pet,
        Pet::Cat {
            cats1: 1,
            cats2: "2".into()
        }
    );
}

#[test]
fn test_undeclared_arguments_pass_through() {
    let tagged = ComponentDescriptor::new("Tagged", |mut args| {
        let name = args.string("name")?;
        let extra = args.value("extra")?;
        args.finish()?;
        Ok((name, extra))
    })
    .arg("name", cast::string());

    let (name, extra) = tagged
        .bind(fragment(json!({"name": 7, "extra": [1, "two"]})))
        .unwrap();
    assert_eq!(name, "7");
    assert_eq!(extra, json!([1, "two"]));
}

#[test]
fn test_finish_rejects_unknown_keyword() {
    let strict = ComponentDescriptor::new("Strict", |mut args| {
        let size = args.int("size")?;
        args.finish()?;
        Ok(size)
    })
    .arg("size", cast::int());

    let err = strict
        .bind(fragment(json!({"size": 1, "colour": "red"})))
        .unwrap_err();
    match err {
        ConfigError::UnexpectedArgument {
            component,
            arguments,
        } => {
            assert_eq!(component, "Strict");
            assert_eq!(arguments, vec!["colour"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// One-of dispatch
// ============================================================================

fn owner() -> ComponentDescriptor<Pet> {
    ComponentDescriptor::new("Owner", |mut args| args.instance::<Pet>("pets"))
        .arg("pets", OneOf::new().variant(cat()).variant(dog()))
}

#[test]
fn test_one_of_selects_by_type() {
    let pet = owner()
        .bind(fragment(
            json!({"pets": {"type": "MockThing1", "cats1": 1, "cats2": 2}}),
        ))
        .unwrap();
    assert_eq!(
        pet,
        Pet::Cat {
            cats1: 1,
            cats2: "2".into()
        }
    );

    let pet = owner()
        .bind(fragment(json!({"pets": {"type": "MockThing2", "dogs1": "2.5"}})))
        .unwrap();
    assert_eq!(pet, Pet::Dog { dogs1: 2.5 });
}

#[test]
fn test_one_of_type_key_not_forwarded() {
    let seen = ComponentDescriptor::new("A", |args| {
        Ok(args.names().into_iter().map(String::from).collect::<Vec<_>>())
    });
    let holder = ComponentDescriptor::new("Holder", |mut args| args.instance::<Vec<String>>("x"))
        .arg("x", OneOf::new().variant(seen));

    let names = holder
        .bind(fragment(json!({"x": {"type": "A", "b": 1, "a": 2}})))
        .unwrap();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_one_of_missing_type_key() {
    let err = owner()
        .bind(fragment(json!({"pets": {"cats1": 1, "cats2": 2}})))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::KeyNotInConfig { ref key, ref argument } if key == "type" && argument == "pets"
    ));
}

#[test]
fn test_one_of_unknown_type() {
    let err = owner()
        .bind(fragment(json!({"pets": {"type": "Fish"}})))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::TypeNotDefined { ref type_name, .. } if type_name == "Fish"
    ));
}

#[test]
fn test_one_of_value_not_a_mapping() {
    let err = owner()
        .bind(fragment(json!({"pets": "MockThing1"})))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfigValue { .. }));
}

#[test]
fn test_one_of_from_registry() {
    let mut registry = ComponentRegistry::new();
    registry.register(cat()).register(dog());

    let pets = registry.one_of(&["MockThing2", "MockThing1"]).unwrap();
    let holder = ComponentDescriptor::new("Holder", |mut args| args.list::<Pet>("pets"))
        .arg("pets", cast::list(pets));

    let pets = holder
        .bind(fragment(json!({"pets": [
            {"type": "MockThing2", "dogs1": 1},
            {"type": "MockThing1", "cats1": "4", "cats2": "x"}
        ]})))
        .unwrap();
    assert_eq!(
        pets,
        vec![
            Pet::Dog { dogs1: 1.0 },
            Pet::Cat {
                cats1: 4,
                cats2: "x".into()
            }
        ]
    );

    let err = registry.one_of(&["MockThing3"]).err().unwrap();
    assert!(matches!(err, ConfigError::ComponentNotFound { ref name } if name == "MockThing3"));
}

#[test]
fn test_optional_argument() {
    let holder = ComponentDescriptor::new("Holder", |mut args| args.opt_instance::<Pet>("pet"))
        .arg("pet", cast::optional(dog()));

    assert_eq!(holder.bind(fragment(json!({"pet": null}))).unwrap(), None);
    assert_eq!(holder.bind(fragment(json!({}))).unwrap(), None);
    assert_eq!(
        holder
            .bind(fragment(json!({"pet": {"dogs1": 3}})))
            .unwrap(),
        Some(Pet::Dog { dogs1: 3.0 })
    );
}

// ============================================================================
// Bind support
// ============================================================================

#[test]
fn test_scalar_resolver_does_not_support_bind() {
    let err = bind(&cast::string(), Fragment::new()).unwrap_err();
    assert!(matches!(err, ConfigError::DoesNotSupportBind { ref name } if name == "str"));

    let ctx = context();
    let err = ctx.instantiate_with(&cast::int()).unwrap_err();
    assert!(matches!(err, ConfigError::DoesNotSupportBind { .. }));
}

#[test]
fn test_instantiate_with_descriptor() {
    let ctx = context();
    let t0 = ctx.get_path("things.t0").unwrap().into_context().unwrap();
    let built = t0
        .instantiate_with(&labels())
        .unwrap()
        .downcast::<Labels>()
        .unwrap();
    assert_eq!(built.arg_1, "a");
}

// ============================================================================
// Round trip: serialize constructor output, bind it back
// ============================================================================

#[derive(Debug, PartialEq, Serialize)]
struct Endpoint {
    host: String,
    port: i64,
    weight: f64,
    secure: bool,
}

fn endpoint() -> ComponentDescriptor<Endpoint> {
    ComponentDescriptor::new("Endpoint", |mut args| {
        Ok(Endpoint {
            host: args.string("host")?,
            port: args.int("port")?,
            weight: args.float("weight")?,
            secure: args.bool("secure")?,
        })
    })
    .arg("host", cast::string())
    .arg("port", cast::int())
    .arg("weight", cast::float())
    .arg("secure", cast::boolean())
}

#[test]
fn test_serialize_then_bind_round_trip() {
    let original = Endpoint {
        host: "db.internal".into(),
        port: 5432,
        weight: 0.25,
        secure: true,
    };
    let document = serde_json::to_value(&original).unwrap();
    let ctx = BindingContext::from_document(document).unwrap();

    assert_eq!(ctx.instantiate(&endpoint()).unwrap(), original);
}

//! confbind - bind configuration documents to typed components
//!
//! ## Module Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         DOCUMENTS                            │
//! │  loader/       .json/.toml/.yaml → Document                  │
//! │  placeholder/  ${NAME} → environment value                   │
//! │  path/         a.b[0].c key paths                            │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          BINDING                             │
//! │  context/      BindingContext (lookup, merge, instantiate)   │
//! │  component/    ComponentDescriptor, resolvers, one-of sets   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use confbind::{cast, BindingContext, ComponentDescriptor, OneOf};
//! use serde_json::json;
//!
//! #[derive(Debug, PartialEq)]
//! enum Store {
//!     Memory { capacity: i64 },
//!     Disk { path: String },
//! }
//!
//! let memory = ComponentDescriptor::new("memory", |mut args| {
//!     Ok(Store::Memory { capacity: args.int("capacity")? })
//! })
//! .arg("capacity", cast::int());
//!
//! let disk = ComponentDescriptor::new("disk", |mut args| {
//!     Ok(Store::Disk { path: args.string("path")? })
//! });
//!
//! let app = ComponentDescriptor::new("app", |mut args| args.instance::<Store>("store"))
//!     .arg("store", OneOf::new().variant(memory).variant(disk));
//!
//! let ctx = BindingContext::from_document(json!({
//!     "store": {"type": "memory", "capacity": "128"}
//! }))
//! .unwrap();
//!
//! assert_eq!(ctx.instantiate(&app).unwrap(), Store::Memory { capacity: 128 });
//! ```

// ═══════════════════════════════════════════════════════════════
// DOCUMENTS - parsing, placeholders, paths
// ═══════════════════════════════════════════════════════════════
pub mod document;
pub mod loader;
pub mod path;
pub mod placeholder;

// ═══════════════════════════════════════════════════════════════
// BINDING - components and contexts
// ═══════════════════════════════════════════════════════════════
pub mod component;
pub mod context;

// ═══════════════════════════════════════════════════════════════
// CROSS-CUTTING - Error handling
// ═══════════════════════════════════════════════════════════════
pub mod error;

// ═══════════════════════════════════════════════════════════════
// PUBLIC API RE-EXPORTS
// ═══════════════════════════════════════════════════════════════

pub use component::{
    bind, cast, Bindable, Bound, BoundArgs, Cast, ComponentDescriptor, ComponentRegistry,
    Factory, OneOf, Resolver, ResolverSpec,
};
pub use context::{BindingContext, Entry};
pub use document::{Document, Fragment, DISCRIMINATOR_KEY};
pub use error::{ConfigError, FixSuggestion, Result};
pub use loader::FileFormat;
pub use placeholder::{EnvSource, MapEnv, PlaceholderResolver, ProcessEnv};

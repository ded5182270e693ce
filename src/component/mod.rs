//! Component Module - binding documents to constructors
//!
//! - `resolver`: the `Resolver`/`Bindable` seam, `ResolverSpec`, `OneOf`
//! - `descriptor`: `ComponentDescriptor`, the recursive bind
//! - `args`: `Bound` values and the `BoundArgs` constructors read from
//! - `cast`: scalar resolvers (`int`, `string`, ...) and user adapters
//! - `registry`: explicit name → resolver table
//!
//! Data flow:
//! ```text
//! fragment (mapping)
//!      ↓
//! ComponentDescriptor::bind
//!      ├─ declared key, Single   → resolver (recurse if mapping + Bindable)
//!      ├─ declared key, OneOf    → pick by `type`, strip it, then as Single
//!      └─ undeclared key         → passed through
//!      ↓
//! constructor(BoundArgs) → instance
//! ```

mod args;
pub mod cast;
mod descriptor;
mod registry;
mod resolver;

pub use args::{Bound, BoundArgs};
pub use cast::{Cast, Factory};
pub use descriptor::ComponentDescriptor;
pub use registry::ComponentRegistry;
pub use resolver::{bind, Bindable, OneOf, Resolver, ResolverSpec};

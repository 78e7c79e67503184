//! Domain types.

mod context;
mod pattern;
mod scope;

pub use context::{DeployContext, DeployGroup};
pub use pattern::KeyPattern;
pub use scope::{ScopeParts, SecretIdParts};

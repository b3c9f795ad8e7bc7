//! Safe SQL construction: identifiers from whitelisted config only, values as parameters.

pub mod builder;
pub mod identifier;
pub mod params;
pub mod query;
pub use builder::*;
pub use identifier::*;
pub use params::*;
pub use query::*;

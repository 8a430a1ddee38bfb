//! Configuration: schema, file discovery/loading, `${ENV}` substitution.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use loader::{discover_and_load, load_config};
pub use schema::WasendConfig;

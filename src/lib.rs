pub mod cli;
pub mod config;
pub mod format;
pub mod index;
pub mod lookup;
pub mod model;
pub mod router;
pub mod schema;
pub mod store;
pub mod watch;

pub use lookup::{DEFAULT_BUILD_CONFIG, ExtApi};
pub use schema::LoadError;
pub use store::ApiStore;

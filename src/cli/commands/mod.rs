//! CLI command implementations

pub mod config;
pub mod get;
pub mod put;
pub mod rm;
pub mod versions;

pub use config::execute as config;
pub use get::execute as get;
pub use put::execute as put;
pub use rm::execute as rm;
pub use versions::execute as versions;

//! TOML config file loading.

mod loader;
mod paths;


pub use loader::{load_from_path, load_layered_file};
pub use paths::default_config_path;

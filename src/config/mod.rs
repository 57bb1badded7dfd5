pub mod loader;
pub mod types;

pub use loader::{CONFIG_FILE, load, load_path};
pub use types::Config;

pub mod env;
mod loader;

pub use env::{AppConfig, BrowserConfig, DirectoryConfig, NotifyPolicy, PushoverConfig, SiteConfig};
pub use loader::load_config;

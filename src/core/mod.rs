//! Core configuration abstractions shared by every configuration kind.

mod change_event;
mod configuration;
mod file_config;
mod listener;
mod loader;
mod map_config;
pub mod value;

pub use change_event::{ChangeType, ConfigurationChangeEvent};
pub use configuration::{Configuration, DEFAULT_CONFIG_TIMEOUT, parse_bool, parse_duration};
pub use file_config::{FileConfiguration, FileConfigurationBuilder};
pub use listener::{ConfigurationChangeListener, ListenerRef, ListenerRegistry};
pub(crate) use loader::ConfigLoader;
pub use map_config::MapConfiguration;

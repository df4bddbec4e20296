//! Home-page content block registry.
//!
//! Modules declare the sections ("content blocks") they contribute to the home
//! page: a unique name, the cell that renders it, and a fixed list of image
//! slots and settings. The registry keeps those declarations in registration
//! order for the rendering layer.

mod block;
mod config;
mod error;
mod registry;

pub use block::{
    ContentBlock, ContentBlockField, SettingDefinition, SettingType, ValidationErrorKind,
    ValidationErrors,
};
pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use registry::ContentBlockRegistry;

//! Content block registry - collects home-page block definitions from modules.
//!
//! Modules register their blocks once during startup; the rendering layer then
//! walks [`ContentBlockRegistry::content_blocks`] in registration order.
//!
//! ```
//! use content_blocks::ContentBlockRegistry;
//!
//! let mut registry = ContentBlockRegistry::new();
//! registry
//!     .register("carousel", |block| {
//!         block.image("image_1");
//!         block.image("image_2");
//!         block.cell("decidim/content_blocks/carousel_block");
//!     })
//!     .unwrap();
//!
//! assert_eq!(registry.len(), 1);
//! ```

use serde_json::json;
use tracing::{debug, info, warn};

use crate::block::{ContentBlock, SettingType, ValidationErrors};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};

/// Priority levels offered by the stock `stats` block.
const HIGH_PRIORITY: i64 = 1;
const MEDIUM_PRIORITY: i64 = 2;

/// Append-only, ordered registry of content block definitions.
#[derive(Debug, Default)]
pub struct ContentBlockRegistry {
    blocks: Vec<ContentBlock>,
    config: RegistryConfig,
}

impl ContentBlockRegistry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            blocks: Vec::new(),
            config,
        }
    }

    /// Create a registry pre-populated with the stock home-page blocks.
    ///
    /// Uses the default configuration. For a strict registry, call
    /// [`with_config`](Self::with_config) followed by
    /// [`register_default_blocks`](Self::register_default_blocks).
    pub fn with_default_blocks() -> RegistryResult<Self> {
        let mut registry = Self::new();
        registry.register_default_blocks()?;
        Ok(registry)
    }

    /// Register a content block.
    ///
    /// `setup` receives a fresh block named `name` and declares its cell,
    /// images and settings. Fails if a block with that name already exists;
    /// the block's own validity is only enforced in strict mode.
    pub fn register<F>(&mut self, name: impl Into<String>, setup: F) -> RegistryResult<()>
    where
        F: FnOnce(&mut ContentBlock),
    {
        let name = name.into();

        if self.contains(&name) {
            warn!(name = %name, "content block already registered");
            return Err(RegistryError::already_registered(name));
        }

        let mut block = ContentBlock::new(name);
        setup(&mut block);

        if self.config.strict {
            let errors = block.validate();
            if !errors.is_empty() {
                warn!(name = %block.name(), errors = %errors, "rejected invalid content block");
                return Err(RegistryError::InvalidContentBlock {
                    name: block.name().to_string(),
                    errors,
                });
            }
        }

        debug!(
            name = %block.name(),
            cell = block.cell_name().unwrap_or_default(),
            images = block.image_names().len(),
            "registered content block"
        );
        self.blocks.push(block);
        Ok(())
    }

    /// All registered blocks, in registration order.
    pub fn content_blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Look up a block by name.
    pub fn get(&self, name: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.name() == name)
    }

    /// Check whether a block is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered block names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(ContentBlock::name)
    }

    /// Return the number of registered blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks that fail validation, paired with their errors.
    pub fn invalid_blocks(&self) -> Vec<(&ContentBlock, ValidationErrors)> {
        self.blocks
            .iter()
            .filter_map(|block| {
                let errors = block.validate();
                (!errors.is_empty()).then_some((block, errors))
            })
            .collect()
    }

    /// Serialize the registered blocks, in order, as a JSON array.
    pub fn to_json(&self) -> RegistryResult<String> {
        Ok(serde_json::to_string(&self.blocks)?)
    }

    /// Register the stock home-page blocks: hero, sub_hero,
    /// highlighted_content_banner, how_to_participate, stats, footer_sub_hero
    /// and html.
    ///
    /// Either every stock block is added or none is: on a name conflict (or a
    /// strict-mode rejection) the registry is left untouched.
    pub fn register_default_blocks(&mut self) -> RegistryResult<()> {
        let mut defaults = Self::with_config(self.config.clone());
        defaults.populate_default_blocks()?;

        if let Some(name) = defaults.names().find(|name| self.contains(name)) {
            warn!(name = %name, "stock content block conflicts with a registered block");
            return Err(RegistryError::already_registered(name));
        }

        self.blocks.append(&mut defaults.blocks);
        info!(count = self.len(), "registered default content blocks");
        Ok(())
    }

    fn populate_default_blocks(&mut self) -> RegistryResult<()> {
        self.register("hero", |block| {
            block
                .image("background_image")
                .setting("welcome_text", SettingType::Text)
                .cell("decidim/content_blocks/hero");
        })?;

        self.register("sub_hero", |block| {
            block.cell("decidim/content_blocks/sub_hero");
        })?;

        self.register("highlighted_content_banner", |block| {
            block
                .image("banner_image")
                .setting("title", SettingType::String)
                .setting("short_description", SettingType::Text)
                .setting("action_url", SettingType::String)
                .cell("decidim/content_blocks/highlighted_content_banner");
        })?;

        self.register("how_to_participate", |block| {
            block.cell("decidim/content_blocks/how_to_participate");
        })?;

        self.register("stats", |block| {
            block
                .setting_with_values(
                    "minimum_priority_level",
                    SettingType::Integer,
                    vec![json!(HIGH_PRIORITY), json!(MEDIUM_PRIORITY)],
                    Some(json!(HIGH_PRIORITY)),
                )
                .cell("decidim/content_blocks/stats");
        })?;

        self.register("footer_sub_hero", |block| {
            block.cell("decidim/content_blocks/footer_sub_hero");
        })?;

        self.register("html", |block| {
            block
                .setting_with_default("html_content", SettingType::Text, json!(""))
                .cell("decidim/content_blocks/html");
        })
    }
}

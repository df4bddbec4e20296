//! Content block definitions and their validation rules.
//!
//! A content block is a section of the home page. It is backed by a cell (the
//! rendering component) and may declare a fixed list of image slots and
//! settings. Blocks are built inside the setup closure passed to
//! [`ContentBlockRegistry::register`](crate::ContentBlockRegistry::register).

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Declared shape of a single home-page section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlock {
    name: String,
    cell_name: Option<String>,
    image_names: Vec<String>,
    settings: Vec<SettingDefinition>,
}

impl ContentBlock {
    /// Create an empty block with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell_name: None,
            image_names: Vec::new(),
            settings: Vec::new(),
        }
    }

    /// Unique name of the block (e.g. "global_stats").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the cell that renders this block, if one was set.
    pub fn cell_name(&self) -> Option<&str> {
        self.cell_name.as_deref()
    }

    /// Image slots in declaration order.
    pub fn image_names(&self) -> &[String] {
        &self.image_names
    }

    /// Declared settings in declaration order.
    pub fn settings(&self) -> &[SettingDefinition] {
        &self.settings
    }

    /// Declare an image slot.
    ///
    /// Repeated slots are accepted here and reported by [`validate`](Self::validate).
    pub fn image(&mut self, slot: impl Into<String>) -> &mut Self {
        self.image_names.push(slot.into());
        self
    }

    /// Set the cell that renders this block. The last call wins.
    pub fn cell(&mut self, cell_name: impl Into<String>) -> &mut Self {
        self.cell_name = Some(cell_name.into());
        self
    }

    /// Declare a setting without a default value.
    pub fn setting(&mut self, name: impl Into<String>, setting_type: SettingType) -> &mut Self {
        self.settings.push(SettingDefinition {
            name: name.into(),
            setting_type,
            default: None,
            values: Vec::new(),
        });
        self
    }

    /// Declare a setting with a default value.
    pub fn setting_with_default(
        &mut self,
        name: impl Into<String>,
        setting_type: SettingType,
        default: Value,
    ) -> &mut Self {
        self.settings.push(SettingDefinition {
            name: name.into(),
            setting_type,
            default: Some(default),
            values: Vec::new(),
        });
        self
    }

    /// Declare a setting restricted to a fixed set of values.
    ///
    /// A default, when given, must be one of `values`.
    pub fn setting_with_values(
        &mut self,
        name: impl Into<String>,
        setting_type: SettingType,
        values: Vec<Value>,
        default: Option<Value>,
    ) -> &mut Self {
        self.settings.push(SettingDefinition {
            name: name.into(),
            setting_type,
            default,
            values,
        });
        self
    }

    /// Run every check against the block and collect the failures.
    ///
    /// An empty result means the block is valid.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        if is_blank(&self.name) {
            errors.add(ContentBlockField::Name, ValidationErrorKind::Blank);
        }

        if self.cell_name.as_deref().is_none_or(is_blank) {
            errors.add(ContentBlockField::CellName, ValidationErrorKind::Blank);
        }

        if has_duplicates(self.image_names.iter().map(String::as_str)) {
            errors.add(ContentBlockField::ImageNames, ValidationErrorKind::Invalid);
        }

        let bad_setting = self.settings.iter().any(|s| !s.is_valid());
        if bad_setting || has_duplicates(self.settings.iter().map(|s| s.name.as_str())) {
            errors.add(ContentBlockField::Settings, ValidationErrorKind::Invalid);
        }

        errors
    }

    /// Whether every check in [`validate`](Self::validate) passes.
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn has_duplicates<'a>(mut values: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    values.any(|v| !seen.insert(v))
}

/// A per-instance option a block accepts, e.g. a priority level or a welcome text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values; empty means any value of `setting_type`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

impl SettingDefinition {
    /// Check the name, the allowed values and the default against the declared type.
    fn is_valid(&self) -> bool {
        if is_blank(&self.name) {
            return false;
        }

        if !self.values.iter().all(|v| self.setting_type.accepts(v)) {
            return false;
        }

        match &self.default {
            Some(default) => {
                self.setting_type.accepts(default)
                    && (self.values.is_empty() || self.values.contains(default))
            }
            None => true,
        }
    }
}

/// Value type of a block setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    /// Single-line string.
    String,
    /// Multi-line text.
    Text,
    Integer,
    Boolean,
}

impl SettingType {
    /// Check whether a JSON value fits this setting type.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String | Self::Text => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// Field of a [`ContentBlock`] that a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentBlockField {
    Name,
    CellName,
    ImageNames,
    Settings,
}

impl ContentBlockField {
    /// Snake-case field name, as shown in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CellName => "cell_name",
            Self::ImageNames => "image_names",
            Self::Settings => "settings",
        }
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A required value is missing or empty.
    Blank,
    /// The value is present but malformed.
    Invalid,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("can't be blank"),
            Self::Invalid => f.write_str("is invalid"),
        }
    }
}

/// Field-level validation failures of a content block, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<(ContentBlockField, ValidationErrorKind)>,
}

impl ValidationErrors {
    fn add(&mut self, field: ContentBlockField, kind: ValidationErrorKind) {
        if !self.contains(field) {
            self.errors.push((field, kind));
        }
    }

    /// Check if no field failed validation.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Return the number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the failing fields in check order.
    pub fn iter(&self) -> impl Iterator<Item = &(ContentBlockField, ValidationErrorKind)> {
        self.errors.iter()
    }

    /// Check whether a field failed validation.
    pub fn contains(&self, field: ContentBlockField) -> bool {
        self.kind_for(field).is_some()
    }

    /// Get the failure recorded for a field.
    pub fn kind_for(&self, field: ContentBlockField) -> Option<ValidationErrorKind> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, kind)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {kind}", field.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block_with_cell() -> ContentBlock {
        let mut block = ContentBlock::new("my_block");
        block.cell("my/fake/cell");
        block
    }

    #[test]
    fn block_with_name_and_cell_is_valid() {
        let block = block_with_cell();
        assert!(block.is_valid());
        assert!(block.validate().is_empty());
    }

    #[test]
    fn block_without_name_is_invalid() {
        let mut block = ContentBlock::new("");
        block.cell("my/fake/cell");

        let errors = block.validate();
        assert!(!block.is_valid());
        assert_eq!(
            errors.kind_for(ContentBlockField::Name),
            Some(ValidationErrorKind::Blank)
        );
        assert!(!errors.contains(ContentBlockField::CellName));
    }

    #[test]
    fn whitespace_name_counts_as_blank() {
        let mut block = ContentBlock::new("   ");
        block.cell("my/fake/cell");
        assert!(block.validate().contains(ContentBlockField::Name));
    }

    #[test]
    fn block_without_cell_is_invalid() {
        let block = ContentBlock::new("my_block");

        let errors = block.validate();
        assert!(!block.is_valid());
        assert_eq!(
            errors.kind_for(ContentBlockField::CellName),
            Some(ValidationErrorKind::Blank)
        );
    }

    #[test]
    fn empty_cell_is_invalid() {
        let mut block = ContentBlock::new("my_block");
        block.cell("");
        assert!(block.validate().contains(ContentBlockField::CellName));
    }

    #[test]
    fn repeated_images_are_invalid() {
        let mut block = block_with_cell();
        block.image("image");
        block.image("image");

        // Both declarations are kept; only validation complains.
        assert_eq!(block.image_names(), ["image", "image"]);
        assert_eq!(
            block.validate().kind_for(ContentBlockField::ImageNames),
            Some(ValidationErrorKind::Invalid)
        );
    }

    #[test]
    fn distinct_images_are_valid() {
        let mut block = block_with_cell();
        block.image("x").image("y");
        assert!(block.is_valid());
    }

    #[test]
    fn last_cell_wins() {
        let mut block = ContentBlock::new("my_block");
        block.cell("first/cell").cell("second/cell");
        assert_eq!(block.cell_name(), Some("second/cell"));
    }

    #[test]
    fn call_order_does_not_matter() {
        let mut a = ContentBlock::new("carousel");
        a.image("image_1").cell("carousel_block");

        let mut b = ContentBlock::new("carousel");
        b.cell("carousel_block").image("image_1");

        assert_eq!(a, b);
    }

    #[test]
    fn reports_every_failing_field() {
        let mut block = ContentBlock::new("");
        block.image("a").image("a");

        let errors = block.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.to_string(),
            "name can't be blank, cell_name can't be blank, image_names is invalid"
        );
    }

    #[test]
    fn settings_with_matching_defaults_are_valid() {
        let mut block = block_with_cell();
        block
            .setting("welcome_text", SettingType::Text)
            .setting_with_default("minimum_priority_level", SettingType::Integer, 1.into())
            .setting_with_default("show_map", SettingType::Boolean, true.into());
        assert!(block.is_valid());
        assert_eq!(block.settings().len(), 3);
    }

    #[test]
    fn setting_default_of_wrong_type_is_invalid() {
        let mut block = block_with_cell();
        block.setting_with_default("minimum_priority_level", SettingType::Integer, "high".into());
        assert_eq!(
            block.validate().kind_for(ContentBlockField::Settings),
            Some(ValidationErrorKind::Invalid)
        );
    }

    #[test]
    fn setting_values_must_match_type() {
        let mut block = block_with_cell();
        block.setting_with_values(
            "minimum_priority_level",
            SettingType::Integer,
            vec![json!(1), json!("medium")],
            None,
        );
        assert_eq!(
            block.validate().kind_for(ContentBlockField::Settings),
            Some(ValidationErrorKind::Invalid)
        );
    }

    #[test]
    fn setting_default_must_be_an_allowed_value() {
        let mut block = block_with_cell();
        block.setting_with_values(
            "minimum_priority_level",
            SettingType::Integer,
            vec![json!(1), json!(2)],
            Some(json!(3)),
        );
        assert!(block.validate().contains(ContentBlockField::Settings));
    }

    #[test]
    fn setting_with_allowed_default_is_valid() {
        let mut block = block_with_cell();
        block.setting_with_values(
            "minimum_priority_level",
            SettingType::Integer,
            vec![json!(1), json!(2)],
            Some(json!(2)),
        );
        assert!(block.is_valid());
        assert_eq!(block.settings()[0].values, [json!(1), json!(2)]);
    }

    #[test]
    fn blank_setting_name_is_invalid() {
        let mut block = block_with_cell();
        block.setting("  ", SettingType::String);
        assert_eq!(
            block.validate().kind_for(ContentBlockField::Settings),
            Some(ValidationErrorKind::Invalid)
        );

        let mut block = block_with_cell();
        block.setting("", SettingType::String);
        assert!(!block.is_valid());
    }

    #[test]
    fn repeated_settings_are_invalid() {
        let mut block = block_with_cell();
        block
            .setting("title", SettingType::String)
            .setting("title", SettingType::Text);
        assert!(block.validate().contains(ContentBlockField::Settings));
    }

    #[test]
    fn serializes_declared_shape() {
        let mut block = ContentBlock::new("hero");
        block
            .image("background_image")
            .setting("welcome_text", SettingType::Text)
            .cell("decidim/content_blocks/hero");

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["name"], "hero");
        assert_eq!(json["cell_name"], "decidim/content_blocks/hero");
        assert_eq!(json["image_names"], serde_json::json!(["background_image"]));
        assert_eq!(json["settings"][0]["type"], "text");
        assert!(json["settings"][0].get("default").is_none());
        assert!(json["settings"][0].get("values").is_none());
    }
}

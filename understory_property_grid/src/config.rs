// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration.

use kurbo::Size;
use understory_property::{Color, Font};

use crate::tree::Column;

/// Presentation and behavior settings for a [`PropertyGrid`](crate::PropertyGrid).
///
/// # Example
///
/// ```rust
/// use understory_property_grid::GridConfig;
///
/// let config = GridConfig::builder()
///     .default_category("General")
///     .show_categories(false)
///     .build();
///
/// assert_eq!(config.default_category(), "General");
/// assert!(!config.show_categories());
/// assert_eq!(config.header_text(understory_property_grid::Column::Value), "Value");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    default_category: String,
    show_categories: bool,
    category_font: Font,
    category_background: Color,
    read_only_foreground: Color,
    decoration_size: Size,
    headers: [String; 2],
    builtin_editors: bool,
}

impl GridConfig {
    /// Grey used for category rows.
    pub const DEFAULT_CATEGORY_BACKGROUND: Color = Color::rgb(0xE8, 0xE8, 0xE8);
    /// Grey used for read-only text.
    pub const DEFAULT_READ_ONLY_FOREGROUND: Color = Color::rgb(0x78, 0x78, 0x78);
    /// Size of the preview glyph box.
    pub const DEFAULT_DECORATION_SIZE: Size = Size::new(20.0, 16.0);

    /// Returns a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> GridConfigBuilder {
        GridConfigBuilder::new()
    }

    /// Category for properties without a `Category` attribute.
    #[must_use]
    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Whether category nodes start visible.
    #[must_use]
    pub fn show_categories(&self) -> bool {
        self.show_categories
    }

    /// Font applied to both columns of category rows.
    #[must_use]
    pub fn category_font(&self) -> &Font {
        &self.category_font
    }

    /// Background applied to both columns of category rows.
    #[must_use]
    pub fn category_background(&self) -> Color {
        self.category_background
    }

    /// Foreground applied to both columns of read-only rows.
    #[must_use]
    pub fn read_only_foreground(&self) -> Color {
        self.read_only_foreground
    }

    /// Box that preview glyphs are fitted into.
    #[must_use]
    pub fn decoration_size(&self) -> Size {
        self.decoration_size
    }

    /// Caption of a column header.
    #[must_use]
    pub fn header_text(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.headers[0],
            Column::Value => &self.headers[1],
        }
    }

    /// Whether the built-in editors are registered on construction.
    #[must_use]
    pub fn builtin_editors(&self) -> bool {
        self.builtin_editors
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_category: String::from("Misc"),
            show_categories: true,
            category_font: Font::default().bold(),
            category_background: Self::DEFAULT_CATEGORY_BACKGROUND,
            read_only_foreground: Self::DEFAULT_READ_ONLY_FOREGROUND,
            decoration_size: Self::DEFAULT_DECORATION_SIZE,
            headers: [String::from("Name"), String::from("Value")],
            builtin_editors: true,
        }
    }
}

/// Builder for [`GridConfig`].
#[derive(Clone, Debug, Default)]
pub struct GridConfigBuilder {
    config: GridConfig,
}

impl GridConfigBuilder {
    /// Creates a builder holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the category used for properties without a `Category` attribute.
    #[must_use]
    pub fn default_category(mut self, name: impl Into<String>) -> Self {
        self.config.default_category = name.into();
        self
    }

    /// Sets whether category nodes start visible.
    #[must_use]
    pub fn show_categories(mut self, show: bool) -> Self {
        self.config.show_categories = show;
        self
    }

    /// Sets the font of category rows.
    #[must_use]
    pub fn category_font(mut self, font: Font) -> Self {
        self.config.category_font = font;
        self
    }

    /// Sets the background of category rows.
    #[must_use]
    pub fn category_background(mut self, color: Color) -> Self {
        self.config.category_background = color;
        self
    }

    /// Sets the text color of read-only rows.
    #[must_use]
    pub fn read_only_foreground(mut self, color: Color) -> Self {
        self.config.read_only_foreground = color;
        self
    }

    /// Sets the preview glyph box.
    #[must_use]
    pub fn decoration_size(mut self, size: Size) -> Self {
        self.config.decoration_size = size;
        self
    }

    /// Sets a column header caption.
    #[must_use]
    pub fn header_text(mut self, column: Column, text: impl Into<String>) -> Self {
        let slot = match column {
            Column::Name => 0,
            Column::Value => 1,
        };
        self.config.headers[slot] = text.into();
        self
    }

    /// Sets whether the built-in editors are registered on construction.
    ///
    /// When `false` every property resolves to the default editor until the
    /// host adds editors.
    #[must_use]
    pub fn builtin_editors(mut self, enabled: bool) -> Self {
        self.config.builtin_editors = enabled;
        self
    }

    /// Builds the [`GridConfig`].
    #[must_use]
    pub fn build(self) -> GridConfig {
        self.config
    }
}

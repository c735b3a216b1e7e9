//! Configuration types for schematic placement.
//!
//! This module provides configuration structures that control how scenes are
//! laid out and written back. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources, and every field has a default, so a
//! partial (or empty) configuration file is valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and output settings.
//! - [`LayoutConfig`] - Spacing constants and the optional post-placement stages.
//! - [`OutputConfig`] - Controls how laid-out scenes are serialized.
//!
//! # Example
//!
//! ```
//! # use schemplace::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().row_height(), 1.25);
//! assert!(config.layout().validate().is_ok());
//! ```

use serde::Deserialize;

/// Top-level application configuration combining layout and output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and output configurations.
    pub fn new(layout: LayoutConfig, output: OutputConfig) -> Self {
        Self { layout, output }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Spacing constants and stage toggles for the placement pipeline.
///
/// The defaults reproduce the reference grid: the first column sits three
/// quarters of the central box width away from it, columns are at least half a
/// unit wide with half a step of extra margin, and rows are 1.25 units apart.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Offset of the first column from the central box, as a factor of its width.
    center_offset_factor: f32,

    /// Minimum horizontal advance for a column.
    min_column_width: f32,

    /// Extra advance after a column, as a factor of the column's advance.
    column_margin_factor: f32,

    /// Vertical distance between consecutive ascending indices.
    row_height: f32,

    /// Minimum clearance between boxes stacked in one slot.
    slot_gap: f32,

    /// Separate boxes that share an index, keeping boxes on a common net together.
    slide_net_boxes: bool,

    /// Replace bus nets with one alias box per index.
    insert_net_aliases: bool,

    /// Center each side vertically on the central box.
    center_sides: bool,

    /// Rotate two-port boxes towards their connections.
    auto_rotate: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_offset_factor: 0.75,
            min_column_width: 0.5,
            column_margin_factor: 0.5,
            row_height: 1.25,
            slot_gap: 0.25,
            slide_net_boxes: true,
            insert_net_aliases: true,
            center_sides: true,
            auto_rotate: true,
        }
    }
}

impl LayoutConfig {
    /// Returns the offset factor of the first column.
    pub fn center_offset_factor(&self) -> f32 {
        self.center_offset_factor
    }

    /// Returns the minimum horizontal advance for a column.
    pub fn min_column_width(&self) -> f32 {
        self.min_column_width
    }

    /// Returns the extra advance factor applied after each column.
    pub fn column_margin_factor(&self) -> f32 {
        self.column_margin_factor
    }

    /// Returns the vertical distance between ascending indices.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Returns the clearance kept between boxes stacked in one slot.
    pub fn slot_gap(&self) -> f32 {
        self.slot_gap
    }

    pub fn slide_net_boxes(&self) -> bool {
        self.slide_net_boxes
    }

    pub fn insert_net_aliases(&self) -> bool {
        self.insert_net_aliases
    }

    pub fn center_sides(&self) -> bool {
        self.center_sides
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Sets the vertical distance between ascending indices.
    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the clearance kept between boxes stacked in one slot.
    pub fn with_slot_gap(mut self, slot_gap: f32) -> Self {
        self.slot_gap = slot_gap;
        self
    }

    /// Enables or disables net sliding.
    pub fn with_slide_net_boxes(mut self, enabled: bool) -> Self {
        self.slide_net_boxes = enabled;
        self
    }

    /// Enables or disables net alias insertion.
    pub fn with_insert_net_aliases(mut self, enabled: bool) -> Self {
        self.insert_net_aliases = enabled;
        self
    }

    /// Enables or disables side centering.
    pub fn with_center_sides(mut self, enabled: bool) -> Self {
        self.center_sides = enabled;
        self
    }

    /// Enables or disables two-port auto-rotation.
    pub fn with_auto_rotate(mut self, enabled: bool) -> Self {
        self.auto_rotate = enabled;
        self
    }

    /// Checks that every spacing constant is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("center_offset_factor", self.center_offset_factor),
            ("column_margin_factor", self.column_margin_factor),
        ];
        let positive = [
            ("min_column_width", self.min_column_width),
            ("row_height", self.row_height),
            ("slot_gap", self.slot_gap),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("`{name}` must be a finite value >= 0, got {value}"));
            }
        }
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("`{name}` must be a finite value > 0, got {value}"));
            }
        }
        Ok(())
    }
}

/// Serialization settings for laid-out scenes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pretty: bool,
}

impl OutputConfig {
    /// Creates an output configuration.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Returns whether JSON output is pretty-printed.
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

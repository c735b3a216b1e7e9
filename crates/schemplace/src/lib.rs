//! Schemplace - central-anchored placement for electronic schematics.
//!
//! A scene of boxes (components with ports), connections and nets is laid out
//! around the box with the most ports. Every other box is sent to the left or
//! right of it and ranked top to bottom by the central port it attaches to, so
//! that wires fan out from the center without crossing. Optional stages stack
//! boxes that share a rank, replace shared nets with alias boxes, center each
//! side vertically and turn two-port parts towards their connections.

pub mod config;

mod error;
mod layout;

pub use schemplace_core::{geometry, identifier, scene};

pub use error::{LayoutError, SchemplaceError};

use std::io::Read;

use log::{debug, info, trace};

use config::AppConfig;
use scene::Scene;

/// Builder for parsing, laying out and serializing schematic scenes.
///
/// # Examples
///
/// ```rust
/// use schemplace::{Placer, config::AppConfig};
///
/// let source = r#"{
///     "boxes": [
///         {"box_id": "U1", "x": 0, "y": 0, "ports": [
///             {"port_id": "U1.1", "rx": 1.0, "ry": 0.0}
///         ]},
///         {"box_id": "R1", "x": 0, "y": 0, "ports": [
///             {"port_id": "R1.1", "rx": -0.5, "ry": 0.0}
///         ]}
///     ],
///     "connections": [{"from": "U1.1", "to": "R1.1"}],
///     "nets": []
/// }"#;
///
/// let placer = Placer::new(AppConfig::default());
/// let scene = placer.parse(source).expect("Failed to parse");
/// let placed = placer.layout(&scene).expect("Failed to lay out");
///
/// let r1 = placed.find_box("R1").expect("R1 is kept");
/// assert!(r1.x > 0.0);
///
/// // Or use default config
/// let placer = Placer::default();
/// ```
#[derive(Debug, Default)]
pub struct Placer {
    config: AppConfig,
}

impl Placer {
    /// Create a new placer with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and output settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this placer runs with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON scene.
    ///
    /// Placement annotations and orientations present in the input are kept
    /// as is; [`Placer::layout`] replaces them.
    ///
    /// # Errors
    ///
    /// Returns [`SchemplaceError::Parse`] when the source is not a valid scene.
    pub fn parse(&self, source: &str) -> Result<Scene, SchemplaceError> {
        info!("Parsing scene");

        let scene: Scene = serde_json::from_str(source)
            .map_err(|err| SchemplaceError::new_parse_error(err, source))?;

        debug!(
            boxes = scene.boxes.len(),
            connections = scene.connections.len(),
            nets = scene.nets.len();
            "Scene parsed successfully"
        );
        trace!(scene:?; "Parsed scene");

        Ok(scene)
    }

    /// Read and parse a JSON scene from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemplaceError::Io`] when reading fails and
    /// [`SchemplaceError::Parse`] when the content is not a valid scene.
    pub fn parse_reader(&self, mut reader: impl Read) -> Result<Scene, SchemplaceError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.parse(&source)
    }

    /// Lay out a scene.
    ///
    /// The input scene is left untouched; a new scene carrying positions,
    /// placement annotations, alias boxes and rewritten connections is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SchemplaceError::Config`] for out-of-range spacing settings and
    /// [`SchemplaceError::Layout`] for scenes that cannot be placed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schemplace::{Placer, LayoutError, SchemplaceError, scene::Scene};
    ///
    /// let err = Placer::default().layout(&Scene::default()).unwrap_err();
    /// assert!(matches!(err, SchemplaceError::Layout(LayoutError::EmptyScene)));
    /// ```
    pub fn layout(&self, scene: &Scene) -> Result<Scene, SchemplaceError> {
        self.config
            .layout()
            .validate()
            .map_err(SchemplaceError::Config)?;

        let placed = layout::run(scene, self.config.layout())?;
        info!(boxes = placed.boxes.len(); "Scene laid out");

        Ok(placed)
    }

    /// Serialize a scene to JSON, pretty-printed when the output config asks for it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemplaceError::Json`] if serialization fails.
    pub fn to_json(&self, scene: &Scene) -> Result<String, SchemplaceError> {
        let json = if self.config.output().pretty() {
            serde_json::to_string_pretty(scene)?
        } else {
            serde_json::to_string(scene)?
        };
        Ok(json)
    }
}

/// Lay out a scene with the default configuration.
///
/// # Errors
///
/// Returns a [`LayoutError`] for empty scenes, scenes whose busiest box has no
/// ports, connections to unknown endpoints and duplicated ids.
pub fn layout(scene: &Scene) -> Result<Scene, LayoutError> {
    layout::run(scene, AppConfig::default().layout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{LayoutConfig, OutputConfig};

    const SOURCE: &str = r#"{
        "boxes": [
            {"box_id": "U1", "x": 3, "y": 4, "ports": [
                {"port_id": "U1.1", "rx": 1.0, "ry": 0.0},
                {"port_id": "U1.2", "rx": -1.0, "ry": 0.0}
            ]},
            {"box_id": "R1", "x": 0, "y": 0, "ports": [
                {"port_id": "R1.1", "rx": -0.5, "ry": 0.0}
            ]}
        ],
        "connections": [{"from": "U1.1", "to": "R1.1"}],
        "nets": []
    }"#;

    #[test]
    fn test_parse_and_layout() {
        let placer = Placer::default();
        let scene = placer.parse(SOURCE).unwrap();
        assert_eq!(scene.boxes.len(), 2);

        let placed = placer.layout(&scene).unwrap();
        let u1 = placed.find_box("U1").unwrap();
        assert_eq!((u1.x, u1.y), (0.0, 0.0));
        assert!(u1.placement.is_none());

        let r1 = placed.find_box("R1").unwrap();
        let annotation = r1.placement.unwrap();
        assert_eq!(annotation.side, scene::Side::Right);
        assert_eq!(annotation.ascending_box_index, 0);
    }

    #[test]
    fn test_parse_reader() {
        let scene = Placer::default().parse_reader(SOURCE.as_bytes()).unwrap();
        assert_eq!(scene.connections.len(), 1);
    }

    #[test]
    fn test_parse_error() {
        let err = Placer::default().parse("{\"boxes\": 3}").unwrap_err();
        assert!(matches!(err, SchemplaceError::Parse { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AppConfig::new(
            LayoutConfig::default().with_row_height(0.0),
            OutputConfig::default(),
        );
        let placer = Placer::new(config);
        let scene = placer.parse(SOURCE).unwrap();
        let err = placer.layout(&scene).unwrap_err();
        assert!(matches!(err, SchemplaceError::Config(_)));
    }

    #[test]
    fn test_pretty_output() {
        let scene = Placer::default().parse(SOURCE).unwrap();

        let compact = Placer::default().to_json(&scene).unwrap();
        assert!(!compact.contains('\n'));

        let pretty = Placer::new(AppConfig::new(LayoutConfig::default(), OutputConfig::new(true)))
            .to_json(&scene)
            .unwrap();
        assert!(pretty.contains('\n'));

        let back: Scene = serde_json::from_str(&pretty).unwrap();
        assert_eq!(back, scene);
    }
}

//! Render configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable config files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::rasterizer::{Color, RasterSettings, HEIGHT, WIDTH};

/// Everything one render run needs besides the mesh itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// OBJ file to render
    pub model: Option<PathBuf>,
    /// Diffuse texture for textured shading
    pub texture: Option<PathBuf>,
    /// Output image; format follows the extension
    pub output: PathBuf,
    pub background: Color,
    pub raster: RasterSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            model: None,
            texture: None,
            output: PathBuf::from("output.tga"),
            background: Color::BLACK,
            raster: RasterSettings::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, RenderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RenderError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, RenderError> {
    let config: RenderConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), RenderError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::ShadingMode;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = load_config_from_str("(width: 64, raster: (shading: Wireframe))").unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, HEIGHT);
        assert_eq!(config.raster.shading, ShadingMode::Wireframe);
        assert_eq!(config.output, PathBuf::from("output.tga"));
    }

    #[test]
    fn test_visibility_is_not_configurable() {
        // Back faces are always culled and the light is fixed to the view direction
        for source in ["(raster: (backface_cull: false))", "(raster: (light_dir: (x: 1.0, y: 0.0, z: 0.0)))"] {
            let err = load_config_from_str(source).unwrap_err();
            assert!(matches!(err, RenderError::Config(_)), "{}", source);
        }
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let result = load_config_from_str("(width: 0)");
        assert!(matches!(result, Err(RenderError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(load_config_from_str("(width: "), Err(RenderError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/render.ron");
        assert!(matches!(result, Err(RenderError::ConfigNotFound(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.ron");
        let config = RenderConfig {
            width: 320,
            height: 200,
            model: Some(PathBuf::from("obj/head.obj")),
            texture: Some(PathBuf::from("obj/head_diffuse.tga")),
            raster: RasterSettings {
                shading: ShadingMode::Textured,
                ..RasterSettings::default()
            },
            ..RenderConfig::default()
        };
        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }
}

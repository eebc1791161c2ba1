//! One render run: load inputs, rasterize, write the image
//!
//! Load failures are logged and degrade the result instead of aborting:
//! a missing model renders a blank image, a missing texture renders flat.

use std::path::{Path, PathBuf};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::model::{load_obj, Mesh};
use crate::rasterizer::{render_mesh, Color, Framebuffer, Rasterizer, RenderStats, ShadingMode, Texture};

/// Where the mesh comes from
#[derive(Debug, Clone, PartialEq)]
pub enum MeshSource {
    File(PathBuf),
    /// Built-in rotated cube
    Demo,
}

/// Load the mesh, falling back to an empty one on failure
pub fn load_mesh(source: &MeshSource) -> Mesh {
    match source {
        MeshSource::File(path) => match load_obj(path) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::error!("Failed to load model {}: {}", path.display(), e);
                Mesh::default()
            }
        },
        MeshSource::Demo => {
            let mut cube = Mesh::test_cube(0.5);
            cube.rotate(0.6, 0.45);
            cube
        }
    }
}

/// Load the texture if one is configured; failures are logged
pub fn load_texture(path: Option<&Path>) -> Option<Texture> {
    let path = path?;
    match Texture::from_file(path) {
        Ok(tex) => Some(tex),
        Err(e) => {
            log::error!("Failed to load texture {}: {}", path.display(), e);
            None
        }
    }
}

/// Rasterize into a fresh framebuffer with the origin at the bottom-left
pub fn render(
    config: &RenderConfig,
    mesh: &Mesh,
    texture: Option<&Texture>,
) -> Result<(Framebuffer, RenderStats), RenderError> {
    config.validate()?;

    let mut fb = Framebuffer::new(config.width, config.height);
    fb.clear(config.background);

    let stats = {
        let mut raster = Rasterizer::new(&mut fb);
        render_mesh(&mut raster, mesh, texture, &config.raster)?
    };

    fb.flip_vertically();
    Ok((fb, stats))
}

/// Full run: load, render, save to `config.output`
pub fn run(config: &RenderConfig, source: &MeshSource) -> Result<RenderStats, RenderError> {
    let mesh = load_mesh(source);
    if mesh.is_empty() {
        log::warn!("Nothing to draw, the output image will be blank");
    }

    let mut texture = load_texture(config.texture.as_deref());
    if texture.is_none() && *source == MeshSource::Demo && config.raster.shading == ShadingMode::Textured {
        texture = Some(Texture::checkerboard(64, 64, Color::WHITE, Color::new(200, 40, 40)));
    }

    let (fb, stats) = render(config, &mesh, texture.as_ref())?;
    log::info!(
        "{} faces, {} triangles ({} culled, {} degenerate), {} pixels",
        stats.faces,
        stats.triangles,
        stats.culled,
        stats.degenerate,
        stats.pixels
    );

    fb.save(&config.output)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(output: PathBuf) -> RenderConfig {
        RenderConfig {
            width: 64,
            height: 64,
            output,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_missing_model_yields_blank_image() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("blank.png");
        let config = small_config(output.clone());

        let stats = run(&config, &MeshSource::File(dir.path().join("missing.obj"))).unwrap();
        assert_eq!(stats, RenderStats::default());

        let img = image::open(&output).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (64, 64));
        assert!(img.pixels().all(|p| p.0 == Color::BLACK.to_bytes()));
    }

    #[test]
    fn test_missing_texture_is_none() {
        assert!(load_texture(Some(Path::new("/nonexistent/tex.tga"))).is_none());
        assert!(load_texture(None).is_none());
    }

    #[test]
    fn test_demo_cube_draws_pixels() {
        let config = small_config(PathBuf::from("unused.png"));
        let mesh = load_mesh(&MeshSource::Demo);
        let (fb, stats) = render(&config, &mesh, None).unwrap();
        assert_eq!(stats.faces, 6);
        assert_eq!(stats.triangles, 12);
        assert!(stats.culled >= 6);
        assert!(stats.pixels > 0);
        assert!(fb.count_pixels_not(Color::BLACK) > 0);
    }

    #[test]
    fn test_render_flips_to_bottom_left_origin() {
        // Triangle in the lower-left quadrant of the view volume
        let mesh = Mesh::new(
            vec![-1.0, -1.0, 0.0, -0.5, -1.0, 0.0, -1.0, -0.5, 0.0],
            vec![],
            vec![crate::model::Face::from_positions(&[0, 1, 2])],
        );
        let config = small_config(PathBuf::from("unused.png"));
        let (fb, _) = render(&config, &mesh, None).unwrap();
        // Stored row 63 is the bottom of the image
        assert_eq!(fb.get_pixel(1, 62), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(1, 1), Some(Color::BLACK));
    }
}

//! Mesh-to-screen pipeline
//!
//! Fans faces into triangles, projects them orthographically, lights them
//! with one directional light and hands them to the rasterizer. All faces
//! share the rasterizer's framebuffer and z-buffer.

use super::math::{is_degenerate, project, Vec2i, Vec3};
use super::render::{Fill, Rasterizer};
use super::types::{RasterSettings, ShadingMode, Texture};
use crate::error::RenderError;
use crate::model::{Corner, Mesh};

/// Counters from one `render_mesh` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub faces: usize,
    /// Triangles after fan triangulation
    pub triangles: usize,
    /// Back faces (facing away from the viewer and the light)
    pub culled: usize,
    /// Triangles with a zero-length normal or zero screen area
    pub degenerate: usize,
    /// Pixels written
    pub pixels: usize,
}

/// Shading mode that can actually be honoured with the inputs at hand
pub fn effective_shading(requested: ShadingMode, mesh: &Mesh, texture: Option<&Texture>) -> ShadingMode {
    if requested != ShadingMode::Textured {
        return requested;
    }
    if texture.is_none() {
        log::warn!("Textured shading requested without a texture, using flat shading");
        return ShadingMode::Flat;
    }
    if !mesh.is_textured() {
        log::warn!("Mesh has no texture coordinates, using flat shading");
        return ShadingMode::Flat;
    }
    ShadingMode::Textured
}

/// Render every face of `mesh` into the rasterizer's buffers
pub fn render_mesh(
    raster: &mut Rasterizer,
    mesh: &Mesh,
    texture: Option<&Texture>,
    settings: &RasterSettings,
) -> Result<RenderStats, RenderError> {
    mesh.validate()?;

    let mut stats = RenderStats::default();
    let shading = effective_shading(settings.shading, mesh, texture);

    match (shading, texture) {
        (ShadingMode::Wireframe, _) => draw_wireframe(raster, mesh, settings, &mut stats),
        (ShadingMode::Textured, Some(tex)) => draw_faces(raster, mesh, Some(tex), settings, &mut stats),
        _ => draw_faces(raster, mesh, None, settings, &mut stats),
    }

    log::debug!(
        "Rendered {} faces: {} triangles, {} culled, {} degenerate, {} pixels",
        stats.faces,
        stats.triangles,
        stats.culled,
        stats.degenerate,
        stats.pixels
    );
    Ok(stats)
}

/// Outline every face as a closed loop; no depth test, no culling
fn draw_wireframe(raster: &mut Rasterizer, mesh: &Mesh, settings: &RasterSettings, stats: &mut RenderStats) {
    let (width, height) = (raster.width(), raster.height());
    let to_screen = |c: Corner| Vec2i::from_screen(project(mesh.position(c.position), width, height));

    for face in &mesh.faces {
        stats.faces += 1;
        for (a, b) in face.edges() {
            stats.pixels += raster.draw_line(to_screen(a), to_screen(b), settings.wireframe_color);
        }
    }
}

fn draw_faces(
    raster: &mut Rasterizer,
    mesh: &Mesh,
    texture: Option<&Texture>,
    settings: &RasterSettings,
    stats: &mut RenderStats,
) {
    let (width, height) = (raster.width(), raster.height());

    for face in &mesh.faces {
        stats.faces += 1;
        for corners in face.triangles() {
            stats.triangles += 1;

            let world = corners.map(|c| mesh.position(c.position));

            // Colinear or coincident corners have no normal to light with
            let normal = match (world[2] - world[0]).cross(world[1] - world[0]).try_normalize() {
                Some(n) => n,
                None => {
                    stats.degenerate += 1;
                    continue;
                }
            };

            // The light shines along the view direction, so unlit faces are back faces
            let intensity = normal.dot(Vec3::FORWARD);
            if intensity <= 0.0 {
                stats.culled += 1;
                continue;
            }

            let screen = world.map(|p| project(p, width, height));
            if is_degenerate(screen) {
                stats.degenerate += 1;
                continue;
            }

            let fill = match texture {
                Some(texture) => Fill::Textured {
                    texture,
                    uvs: corners.map(|c| c.texcoord.map(|t| mesh.texcoord(t)).unwrap_or_default()),
                    intensity,
                },
                None => Fill::Solid(settings.base_color.shade(intensity)),
            };
            stats.pixels += raster.draw_triangle(screen, &fill);
        }
    }
}

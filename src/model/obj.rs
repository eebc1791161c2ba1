//! Wavefront OBJ loading
//!
//! Faces are loaded untriangulated so quads and larger polygons reach the
//! pipeline intact. Multiple objects in one file are merged into one mesh.

use std::path::Path;

use super::{Corner, Face, Mesh};
use crate::error::RenderError;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load a mesh from an OBJ file. Material libraries are not needed;
/// failures to read them are only logged.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, RenderError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(path, &load_options())?;

    if let Err(e) = materials {
        log::warn!("{}: materials not loaded: {}", path.display(), e);
    }

    let mut mesh = Mesh::default();
    for model in models {
        append_model(&mut mesh, &model);
    }
    mesh.validate()?;

    let (min, max) = mesh.bounds();
    log::debug!("Model bounds: {:?} .. {:?}", min, max);

    log::info!(
        "Loaded model: {} ({} vertices, {} faces, {} texcoords)",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.texcoord_count()
    );
    Ok(mesh)
}

/// Append one tobj model, offsetting its indices past what is already there
fn append_model(mesh: &mut Mesh, model: &tobj::Model) {
    let src = &model.mesh;
    let position_base = mesh.vertex_count();
    let texcoord_base = mesh.texcoord_count();
    let textured = !src.texcoords.is_empty() && src.texcoord_indices.len() == src.indices.len();

    if !src.texcoords.is_empty() && !textured {
        log::warn!("{}: texcoords present but not on every corner, ignoring them", model.name);
    }

    mesh.positions.extend_from_slice(&src.positions);
    if textured {
        mesh.texcoords.extend_from_slice(&src.texcoords);
    }

    // No arities means every face is a triangle
    let arities: Vec<usize> = if src.face_arities.is_empty() {
        vec![3; src.indices.len() / 3]
    } else {
        src.face_arities.iter().map(|&a| a as usize).collect()
    };

    let mut offset = 0;
    for arity in arities {
        let corners = (offset..offset + arity)
            .map(|i| Corner {
                position: position_base + src.indices[i] as usize,
                texcoord: textured.then(|| texcoord_base + src.texcoord_indices[i] as usize),
            })
            .collect();
        mesh.faces.push(Face::new(corners));
        offset += arity;
    }

    log::debug!("Merged object '{}': {} faces", model.name, mesh.faces.len());
}

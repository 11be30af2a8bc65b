use crate::rasterizer::{Face, Mesh, Vec2, Vec3, Vertex};

/// Subdivided plane in the XY plane, centered on the origin, facing +Z.
/// Row 0 is the top edge; UV v runs 1 (top) to 0 (bottom).
pub fn plane(width: f32, height: f32, segments_x: usize, segments_y: usize) -> Mesh {
    let sx = segments_x.max(1);
    let sy = segments_y.max(1);
    let stride = sx + 1;

    let mut vertices = Vec::with_capacity(stride * (sy + 1));
    for iy in 0..=sy {
        let fy = iy as f32 / sy as f32;
        for ix in 0..=sx {
            let fx = ix as f32 / sx as f32;
            vertices.push(Vertex::new(
                Vec3::new((fx - 0.5) * width, (0.5 - fy) * height, 0.0),
                Vec2::new(fx, 1.0 - fy),
            ));
        }
    }

    let mut faces = Vec::with_capacity(sx * sy * 2);
    for iy in 0..sy {
        for ix in 0..sx {
            let a = ix + stride * iy;
            let b = ix + stride * (iy + 1);
            let c = ix + 1 + stride * (iy + 1);
            let d = ix + 1 + stride * iy;
            faces.push(Face::with_texture(a, b, d, 0));
            faces.push(Face::with_texture(b, c, d, 0));
        }
    }

    Mesh {
        vertices,
        faces,
        rotation: Vec3::ZERO,
    }
}

//! Core rendering functions
//! Triangle rasterization with a programmable shading stage

use super::math::{barycentric, focal_length, perspective_transform, project, Vec2, Vec3};
use super::shader::{ShadingStage, Uniforms};
use super::types::{Color, Mesh, RasterSettings, Texture};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    /// Reallocate for a new size (contents are cleared to transparent)
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height * 4, 0);
        self.zbuffer.clear();
        self.zbuffer.resize(width * height, f32::MAX);
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                let pixel_idx = idx * 4;
                self.pixels[pixel_idx..pixel_idx + 4].copy_from_slice(&color.to_bytes());
                return true;
            }
        }
        false
    }

    /// Nearest-neighbour scale into `out` (RGBA, `cols * rows * 4` bytes).
    /// No smoothing: every output cell copies exactly one source pixel.
    pub fn downsample(&self, cols: usize, rows: usize, out: &mut Vec<u8>) {
        out.clear();
        out.resize(cols * rows * 4, 0);
        if self.width == 0 || self.height == 0 {
            return;
        }

        for row in 0..rows {
            let sy = (row * self.height / rows).min(self.height - 1);
            for col in 0..cols {
                let sx = (col * self.width / cols).min(self.width - 1);
                let src = (sy * self.width + sx) * 4;
                let dst = (row * cols + col) * 4;
                out[dst..dst + 4].copy_from_slice(&self.pixels[src..src + 4]);
            }
        }
    }
}

/// Camera state
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32, // Pitch
    pub rotation_y: f32, // Yaw

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    /// Camera on the +Z axis looking back at the origin (+X right, +Y up on screen)
    pub fn facing_origin(distance: f32) -> Self {
        let mut cam = Self::new();
        cam.position = Vec3::new(0.0, 0.0, distance);
        cam.rotation_y = std::f32::consts::PI;
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        let upward = Vec3::new(0.0, -1.0, 0.0);  // Use -Y as up to match screen coordinates

        // Forward vector based on rotation
        self.basis_z = Vec3 {
            x: self.rotation_x.cos() * self.rotation_y.sin(),
            y: -self.rotation_x.sin(),
            z: self.rotation_x.cos() * self.rotation_y.cos(),
        };

        // Right vector
        self.basis_x = upward.cross(self.basis_z).normalize();

        // Up vector
        self.basis_y = self.basis_z.cross(self.basis_x);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Projected surface (triangle ready for rasterization)
struct Surface {
    pub v1: Vec3, // Screen-space vertex 1
    pub v2: Vec3, // Screen-space vertex 2
    pub v3: Vec3, // Screen-space vertex 3
    pub uv1: Vec2,
    pub uv2: Vec2,
    pub uv3: Vec2,
    pub face_idx: usize,
}

/// Rasterize a single triangle
fn rasterize_triangle(
    fb: &mut Framebuffer,
    surface: &Surface,
    texture: Option<&Texture>,
    stage: &dyn ShadingStage,
    uniforms: &Uniforms,
) {
    // Bounding box
    let min_x = surface.v1.x.min(surface.v2.x).min(surface.v3.x).max(0.0) as usize;
    let max_x = (surface.v1.x.max(surface.v2.x).max(surface.v3.x) + 1.0).min(fb.width as f32) as usize;
    let min_y = surface.v1.y.min(surface.v2.y).min(surface.v3.y).max(0.0) as usize;
    let max_y = (surface.v1.y.max(surface.v2.y).max(surface.v3.y) + 1.0).min(fb.height as f32) as usize;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Vec3::new(x as f32, y as f32, 0.0);
            let bc = barycentric(p, surface.v1, surface.v2, surface.v3);

            // Check if inside triangle
            const ERR: f32 = -0.0001;
            if bc.x < ERR || bc.y < ERR || bc.z < ERR {
                continue;
            }

            let z = bc.x * surface.v1.z + bc.y * surface.v2.z + bc.z * surface.v3.z;

            if z >= fb.zbuffer[y * fb.width + x] {
                continue;
            }

            // Perspective-correct UV interpolation
            let mut bcc = Vec3::new(bc.x / surface.v1.z, bc.y / surface.v2.z, bc.z / surface.v3.z);
            let bd = bcc.x + bcc.y + bcc.z;
            bcc = bcc.scale(1.0 / bd);
            let uv = Vec2::new(
                bcc.x * surface.uv1.x + bcc.y * surface.uv2.x + bcc.z * surface.uv3.x,
                bcc.x * surface.uv1.y + bcc.y * surface.uv2.y + bcc.z * surface.uv3.y,
            );

            let color = stage.fragment(texture, uv, uniforms);
            if color.a == 0 {
                continue;
            }

            fb.set_pixel_with_depth(x, y, z, color);
        }
    }
}

/// Render a mesh to the framebuffer
pub fn render_mesh(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    textures: &[Texture],
    camera: &Camera,
    settings: &RasterSettings,
    stage: &dyn ShadingStage,
    uniforms: &Uniforms,
) {
    if fb.width == 0 || fb.height == 0 {
        return;
    }

    let focal = focal_length(settings.fov_y_deg, fb.height);

    // Displace, rotate, transform and project all vertices
    let mut projected: Vec<Vec3> = Vec::with_capacity(mesh.vertices.len());
    let mut cam_space_positions: Vec<Vec3> = Vec::with_capacity(mesh.vertices.len());

    for v in &mesh.vertices {
        let local = stage.vertex(v.pos, uniforms);
        let world = local.rotate_xyz(mesh.rotation);

        let rel_pos = world - camera.position;
        let cam_pos = perspective_transform(rel_pos, camera.basis_x, camera.basis_y, camera.basis_z);
        cam_space_positions.push(cam_pos);

        projected.push(project(cam_pos, focal, fb.width, fb.height));
    }

    let mut surfaces: Vec<Surface> = Vec::with_capacity(mesh.faces.len());

    for (face_idx, face) in mesh.faces.iter().enumerate() {
        let cv1 = cam_space_positions[face.v0];
        let cv2 = cam_space_positions[face.v1];
        let cv3 = cam_space_positions[face.v2];

        // Near plane: skip triangles reaching behind it
        if cv1.z <= settings.near || cv2.z <= settings.near || cv3.z <= settings.near {
            continue;
        }

        surfaces.push(Surface {
            v1: projected[face.v0],
            v2: projected[face.v1],
            v3: projected[face.v2],
            uv1: mesh.vertices[face.v0].uv,
            uv2: mesh.vertices[face.v1].uv,
            uv3: mesh.vertices[face.v2].uv,
            face_idx,
        });
    }

    for surface in &surfaces {
        let texture = mesh.faces[surface.face_idx]
            .texture_id
            .and_then(|id| textures.get(id));
        rasterize_triangle(fb, surface, texture, stage, uniforms);
    }
}

//! Scene renderer
//!
//! Owns the text plane, its camera and the offscreen framebuffer. Each
//! frame advances the animation clock, pushes time, pointer and the wave
//! flag to the shading stage, and rasterizes the plane.

mod mesh;
mod shading;

pub use mesh::plane;
pub use shading::*;

use tracing::{debug, info};

use crate::config::SceneOptions;
use crate::error::{Error, Result};
use crate::input::PointerSample;
use crate::rasterizer::{
    map_range, render_mesh, Camera, Color, Framebuffer, Mesh, RasterSettings, Uniforms, Vec2, MAX_SURFACE_DIM,
};
use crate::text_texture::TextTexture;

/// Plane subdivisions along each axis
pub const PLANE_SEGMENTS: usize = 36;
/// Camera distance from the plane
pub const CAMERA_DISTANCE: f32 = 30.0;
/// Fraction of the remaining tilt covered per frame
const TILT_EASING: f32 = 0.05;
/// Largest tilt toward the pointer, radians
const MAX_TILT: f32 = 0.5;

/// Per-frame animation state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderState {
    /// Seconds since initialize
    pub elapsed_time: f32,
    /// Device pixels
    pub pointer_position: PointerSample,
    pub enable_waves: bool,
}

pub struct SceneRenderer {
    state: RenderState,
    framebuffer: Framebuffer,
    camera: Camera,
    settings: RasterSettings,
    mesh: Mesh,
    text: TextTexture,
    stage: TextShading,
    plane_base_height: f32,
}

fn check_surface(width: usize, height: usize) -> Result<()> {
    if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
        return Err(Error::UnsupportedContext(format!(
            "offscreen surface {}x{} exceeds {}px",
            width, height, MAX_SURFACE_DIM
        )));
    }
    Ok(())
}

impl SceneRenderer {
    /// Build the scene and an offscreen surface of `width x height` pixels
    pub fn initialize(width: usize, height: usize, options: &SceneOptions) -> Result<Self> {
        check_surface(width, height)?;

        let color = Color::from_hex(&options.text_color)?;
        let text = TextTexture::new(options.text.clone(), options.font(), color);

        let mut renderer = Self {
            state: RenderState {
                elapsed_time: 0.0,
                pointer_position: PointerSample {
                    x: width as f32 / 2.0,
                    y: height as f32 / 2.0,
                },
                enable_waves: options.enable_waves,
            },
            framebuffer: Framebuffer::new(width, height),
            camera: Camera::facing_origin(CAMERA_DISTANCE),
            settings: RasterSettings::default(),
            mesh: Mesh::default(),
            text,
            stage: TextShading::default(),
            plane_base_height: options.plane_base_height,
        };
        renderer.rebuild_plane();

        info!(width, height, text = %renderer.text.text(), "scene initialized");
        Ok(renderer)
    }

    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        check_surface(width, height)?;
        if (width, height) != (self.framebuffer.width, self.framebuffer.height) {
            self.framebuffer.resize(width, height);
            debug!(width, height, "scene surface resized");
        }
        Ok(())
    }

    pub fn set_pointer(&mut self, pointer: PointerSample) {
        if pointer.x.is_finite() && pointer.y.is_finite() {
            self.state.pointer_position = pointer;
        }
    }

    pub fn set_waves(&mut self, enabled: bool) {
        self.state.enable_waves = enabled;
    }

    pub fn set_text(&mut self, text: &str) {
        if text != self.text.text() {
            self.text.set_text(text);
            self.rebuild_plane();
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Plane rotation in radians
    pub fn tilt(&self) -> Vec2 {
        Vec2::new(self.mesh.rotation.x, self.mesh.rotation.y)
    }

    pub fn text_texture(&self) -> &TextTexture {
        &self.text
    }

    /// Advance by `dt` seconds and draw into the framebuffer
    pub fn render_frame(&mut self, dt: f32) -> &Framebuffer {
        if dt.is_finite() && dt > 0.0 {
            self.state.elapsed_time += dt;
        }

        let (w, h) = (self.framebuffer.width as f32, self.framebuffer.height as f32);
        let pointer = self.state.pointer_position;
        if w > 0.0 && h > 0.0 {
            let target_x = map_range(pointer.y, 0.0, h, MAX_TILT, -MAX_TILT);
            let target_y = map_range(pointer.x, 0.0, w, -MAX_TILT, MAX_TILT);
            self.mesh.rotation.x += (target_x - self.mesh.rotation.x) * TILT_EASING;
            self.mesh.rotation.y += (target_y - self.mesh.rotation.y) * TILT_EASING;
        }

        let uniforms = Uniforms {
            time: self.state.elapsed_time.sin(),
            pointer: if w > 0.0 && h > 0.0 {
                Vec2::new(pointer.x / w, pointer.y / h)
            } else {
                Vec2::default()
            },
            enable_waves: self.state.enable_waves,
        };

        self.framebuffer.clear(Color::TRANSPARENT);
        render_mesh(
            &mut self.framebuffer,
            &self.mesh,
            std::slice::from_ref(self.text.texture()),
            &self.camera,
            &self.settings,
            &self.stage,
            &uniforms,
        );
        &self.framebuffer
    }

    /// Plane width follows the text texture's aspect so glyphs keep their shape
    fn rebuild_plane(&mut self) {
        let tex = self.text.texture();
        let aspect = if tex.height > 0 { tex.width as f32 / tex.height as f32 } else { 1.0 };
        let height = self.plane_base_height;
        let rotation = self.mesh.rotation;
        self.mesh = plane(height * aspect, height, PLANE_SEGMENTS, PLANE_SEGMENTS);
        self.mesh.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SceneOptions {
        SceneOptions {
            text: "HI".to_string(),
            text_font_size: 16.0,
            enable_waves: false,
            ..SceneOptions::default()
        }
    }

    fn opaque(fb: &Framebuffer) -> usize {
        fb.pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
    }

    #[test]
    fn oversized_surface_is_unsupported() {
        let err = SceneRenderer::initialize(MAX_SURFACE_DIM + 1, 10, &options());
        assert!(matches!(err, Err(Error::UnsupportedContext(_))));

        let mut scene = SceneRenderer::initialize(10, 10, &options()).unwrap();
        assert!(matches!(scene.resize(10, MAX_SURFACE_DIM * 2), Err(Error::UnsupportedContext(_))));
    }

    #[test]
    fn bad_text_color_is_rejected() {
        let opts = SceneOptions {
            text_color: "tomato".to_string(),
            ..options()
        };
        assert!(matches!(SceneRenderer::initialize(10, 10, &opts), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn frame_draws_text_and_keeps_corners_clear() {
        let mut scene = SceneRenderer::initialize(160, 90, &options()).unwrap();
        let fb = scene.render_frame(1.0 / 60.0);
        assert!(opaque(fb) > 0);
        assert_eq!(fb.pixels[3], 0);
        let last = fb.pixels.len() - 1;
        assert_eq!(fb.pixels[last], 0);
    }

    #[test]
    fn elapsed_time_accumulates() {
        let mut scene = SceneRenderer::initialize(32, 32, &options()).unwrap();
        scene.render_frame(0.5);
        scene.render_frame(0.25);
        scene.render_frame(f32::NAN);
        assert!((scene.state().elapsed_time - 0.75).abs() < 1e-6);
    }

    #[test]
    fn plane_eases_toward_pointer() {
        let mut scene = SceneRenderer::initialize(100, 100, &options()).unwrap();
        scene.render_frame(0.016);
        // Centered pointer keeps the plane flat
        assert!(scene.tilt().x.abs() < 1e-6 && scene.tilt().y.abs() < 1e-6);

        scene.set_pointer(PointerSample { x: 0.0, y: 0.0 });
        scene.render_frame(0.016);
        let first = scene.tilt();
        assert!((first.x - 0.5 * TILT_EASING).abs() < 1e-6);
        assert!((first.y + 0.5 * TILT_EASING).abs() < 1e-6);
        for _ in 0..200 {
            scene.render_frame(0.016);
        }
        assert!((scene.tilt().x - 0.5).abs() < 1e-3);
    }

    #[test]
    fn zero_surface_renders_nothing() {
        let mut scene = SceneRenderer::initialize(0, 0, &options()).unwrap();
        assert!(scene.render_frame(0.016).pixels.is_empty());
    }

    #[test]
    fn new_text_reshapes_plane() {
        let mut scene = SceneRenderer::initialize(64, 64, &options()).unwrap();
        let narrow = scene.mesh.vertices[0].pos.x;
        scene.set_text("a much longer line");
        assert!(scene.mesh.vertices[0].pos.x < narrow);
    }
}

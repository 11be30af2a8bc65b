//! Spring-driven surface transform and its style output

use super::spring::{Spring, SpringConfig};
use crate::rasterizer::{Vec2, Vec3};

/// Snapshot of the rendered transform (rotations in degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub translation: Vec2,
    pub rotation: Vec3,
    pub scale: f32,
    pub zoom: f32,
    pub wheel_offset: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            translation: Vec2::default(),
            rotation: Vec3::ZERO,
            scale: 1.0,
            zoom: 0.0,
            wheel_offset: 0.0,
        }
    }
}

/// Partial retarget; `None` fields keep their current target
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformTarget {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub rotate_x: Option<f32>,
    pub rotate_y: Option<f32>,
    pub rotate_z: Option<f32>,
    pub scale: Option<f32>,
    pub zoom: Option<f32>,
}

/// One spring per transform field, sharing a config
#[derive(Debug, Clone)]
pub struct AnimatedTransform {
    x: Spring,
    y: Spring,
    rotate_x: Spring,
    rotate_y: Spring,
    rotate_z: Spring,
    scale: Spring,
    zoom: Spring,
}

impl AnimatedTransform {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            x: Spring::new(0.0, config),
            y: Spring::new(0.0, config),
            rotate_x: Spring::new(0.0, config),
            rotate_y: Spring::new(0.0, config),
            rotate_z: Spring::new(0.0, config),
            scale: Spring::new(1.0, config),
            zoom: Spring::new(0.0, config),
        }
    }

    pub fn start(&mut self, target: TransformTarget) {
        let pairs = [
            (&mut self.x, target.x),
            (&mut self.y, target.y),
            (&mut self.rotate_x, target.rotate_x),
            (&mut self.rotate_y, target.rotate_y),
            (&mut self.rotate_z, target.rotate_z),
            (&mut self.scale, target.scale),
            (&mut self.zoom, target.zoom),
        ];
        for (spring, value) in pairs {
            if let Some(v) = value {
                spring.set_target(v);
            }
        }
    }

    pub fn tick(&mut self, dt: f32) {
        for spring in [
            &mut self.x,
            &mut self.y,
            &mut self.rotate_x,
            &mut self.rotate_y,
            &mut self.rotate_z,
            &mut self.scale,
            &mut self.zoom,
        ] {
            spring.tick(dt);
        }
    }

    pub fn is_resting(&self) -> bool {
        [&self.x, &self.y, &self.rotate_x, &self.rotate_y, &self.rotate_z, &self.scale, &self.zoom]
            .iter()
            .all(|s| s.is_resting())
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }

    pub fn rotation(&self) -> Vec3 {
        Vec3::new(self.rotate_x.value(), self.rotate_y.value(), self.rotate_z.value())
    }

    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.value()
    }

    /// Targets the springs are heading for
    pub fn target(&self) -> TransformState {
        TransformState {
            translation: Vec2::new(self.x.target(), self.y.target()),
            rotation: Vec3::new(self.rotate_x.target(), self.rotate_y.target(), self.rotate_z.target()),
            scale: self.scale.target(),
            zoom: self.zoom.target(),
            wheel_offset: 0.0,
        }
    }
}

/// Style-applicable transform for the surface element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    /// Perspective distance in px
    pub perspective: f32,
    pub translate: Vec2,
    /// Combined `scale + zoom`
    pub scale: f32,
    /// Degrees; disabled axes are zero
    pub rotate: Vec3,
    /// Vertical offset of the surface content from wheel scrolling
    pub content_translate_y: f32,
}

impl SurfaceStyle {
    pub fn to_css(&self) -> String {
        format!(
            "perspective({}px) translate3d({:.2}px, {:.2}px, 0) scale({:.4}) rotateX({:.2}deg) rotateY({:.2}deg) rotateZ({:.2}deg)",
            self.perspective,
            self.translate.x,
            self.translate.y,
            self.scale,
            self.rotate.x,
            self.rotate.y,
            self.rotate.z
        )
    }

    /// Corners of a `width x height` element (top-left, top-right,
    /// bottom-right, bottom-left) after the transform, relative to the
    /// element's untransformed center. Screen axes: +x right, +y down.
    pub fn project_quad(&self, width: f32, height: f32) -> [Vec2; 4] {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let corners = [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ];
        let rotation = Vec3::new(
            self.rotate.x.to_radians(),
            self.rotate.y.to_radians(),
            self.rotate.z.to_radians(),
        );

        corners.map(|c| {
            // CSS applies the rightmost function first: rotateZ, rotateY, rotateX, scale, translate
            let p = c
                .rotate_z(rotation.z)
                .rotate_y(rotation.y)
                .rotate_x(rotation.x)
                .scale(self.scale)
                + Vec3::new(self.translate.x, self.translate.y, 0.0);
            let w = if self.perspective > 0.0 {
                let denom = (self.perspective - p.z).max(1.0);
                self.perspective / denom
            } else {
                1.0
            };
            Vec2::new(p.x * w, p.y * w)
        })
    }
}

/// Whether `p` lies inside a convex quad given in winding order
pub fn quad_contains(quad: &[Vec2; 4], p: Vec2) -> bool {
    let mut sign = 0.0f32;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_start_leaves_other_targets() {
        let mut t = AnimatedTransform::new(SpringConfig::default());
        t.start(TransformTarget { x: Some(10.0), scale: Some(1.1), ..Default::default() });
        t.start(TransformTarget { y: Some(-4.0), ..Default::default() });
        let target = t.target();
        assert_eq!(target.translation, Vec2::new(10.0, -4.0));
        assert_eq!(target.scale, 1.1);
        assert_eq!(t.translation(), Vec2::default());
    }

    #[test]
    fn identity_style_projects_flat_quad() {
        let style = SurfaceStyle {
            perspective: 300.0,
            translate: Vec2::default(),
            scale: 1.0,
            rotate: Vec3::ZERO,
            content_translate_y: 0.0,
        };
        let quad = style.project_quad(200.0, 150.0);
        assert_eq!(quad[0], Vec2::new(-100.0, -75.0));
        assert_eq!(quad[2], Vec2::new(100.0, 75.0));
    }

    #[test]
    fn tilt_foreshortens_one_edge() {
        let style = SurfaceStyle {
            perspective: 300.0,
            translate: Vec2::default(),
            scale: 1.0,
            rotate: Vec3::new(0.0, 20.0, 0.0),
            content_translate_y: 0.0,
        };
        let quad = style.project_quad(200.0, 150.0);
        let left_edge = quad[3].y - quad[0].y;
        let right_edge = quad[2].y - quad[1].y;
        assert!((left_edge - right_edge).abs() > 1.0);
    }

    #[test]
    fn css_lists_every_function() {
        let style = SurfaceStyle {
            perspective: 300.0,
            translate: Vec2::new(1.0, 2.0),
            scale: 1.1,
            rotate: Vec3::new(3.0, 4.0, 5.0),
            content_translate_y: 0.0,
        };
        let css = style.to_css();
        assert!(css.starts_with("perspective(300px)"));
        assert!(css.contains("rotateZ(5.00deg)"));
        assert!(css.contains("scale(1.1000)"));
    }

    #[test]
    fn hit_test_follows_projected_quad() {
        let style = SurfaceStyle {
            perspective: 300.0,
            translate: Vec2::new(100.0, 0.0),
            scale: 1.0,
            rotate: Vec3::ZERO,
            content_translate_y: 0.0,
        };
        let quad = style.project_quad(50.0, 50.0);
        assert!(quad_contains(&quad, Vec2::new(100.0, 0.0)));
        assert!(!quad_contains(&quad, Vec2::new(0.0, 0.0)));
    }
}

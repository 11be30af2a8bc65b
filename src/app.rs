//! Front-end state: splash screen, glyph layer and gesture card
//!
//! Everything macroquad-specific lives here; the library stays headless.

use macroquad::input::{simulate_mouse_with_touch, TouchPhase as MqTouchPhase};
use macroquad::prelude::*;
use tracing::{error, info, warn};

use glyphwave::drift::{gradient_at, hue_rotate};
use glyphwave::gesture::{
    quad_contains, GestureEngine, SurfaceBounds, SurfaceEvent, SurfaceStyle, TouchInput, TouchPhase, TouchPoint,
};
use glyphwave::glyph::{GlyphFrame, GlyphMetrics};
use glyphwave::input::PointerHub;
use glyphwave::rasterizer::{Texture as RasterTexture, Vec2 as Point};
use glyphwave::schedule::Timeout;
use glyphwave::{AsciiEffect, Container, Error, Options};

const BG_COLOR: Color = Color::new(0.06, 0.06, 0.07, 1.0);
const TEXT_COLOR: Color = Color::new(0.9, 0.9, 0.9, 1.0);
const MUTED_COLOR: Color = Color::new(0.6, 0.6, 0.65, 1.0);
const CARD_COLOR: Color = Color::new(0.12, 0.12, 0.14, 0.85);
const STRIPE_COLOR: Color = Color::new(0.99, 0.6, 0.4, 0.35);
const CARD_EDGE: Color = Color::new(1.0, 0.85, 0.4, 0.9);

const SPLASH_TEXT: &str = "Welcome! Loading...";
/// Horizontal gradient samples per glyph row
const GRADIENT_SEGMENTS: usize = 8;
/// Wheel notch to scroll distance in px
const WHEEL_STEP: f32 = 100.0;
/// Card height relative to its width
const CARD_ASPECT: f32 = 1.3;
/// Content stripes drawn across the card
const STRIPES: usize = 6;
/// Pseudo touch id for mouse drags
const MOUSE_TOUCH_ID: u64 = u64::MAX;

/// Cell width from macroquad's built-in monospace font
pub struct MacroquadMetrics;

impl GlyphMetrics for MacroquadMetrics {
    fn cell_width(&self, font_size: f32, _font_family: &str) -> f32 {
        if !(font_size.is_finite() && font_size >= 1.0) {
            return 0.0;
        }
        measure_text("M", None, font_size.round() as u16, 1.0).width
    }
}

enum Stage {
    Splash(Timeout),
    Running(AsciiEffect),
    Fallback,
}

/// Touch and mouse state carried between frames
#[derive(Default)]
struct InputAdapter {
    mouse_down: bool,
    hovering: bool,
    last_mouse: (f32, f32),
}

pub struct App {
    options: Options,
    hub: PointerHub,
    stage: Stage,
    gesture: GestureEngine,
    input: InputAdapter,
    screen: (f32, f32),
    fallback_texture: Option<Texture2D>,
}

impl App {
    pub fn new(options: Options) -> Self {
        simulate_mouse_with_touch(false);
        let hub = PointerHub::new(options.scene.pixel_ratio);
        let gesture = GestureEngine::new(options.gesture.clone());
        let splash = Timeout::from_millis(options.splash_ms);
        let fallback_texture = options.fallback_image.as_ref().and_then(|path| {
            match RasterTexture::from_file(path) {
                Ok(tex) => {
                    let bytes: Vec<u8> = tex.pixels.iter().flat_map(|c| c.to_bytes()).collect();
                    let texture = Texture2D::from_rgba8(tex.width as u16, tex.height as u16, &bytes);
                    texture.set_filter(FilterMode::Linear);
                    Some(texture)
                }
                Err(e) => {
                    warn!("Failed to load fallback image {}: {}", path.display(), e);
                    None
                }
            }
        });

        Self {
            options,
            hub,
            stage: Stage::Splash(splash),
            gesture,
            input: InputAdapter::default(),
            screen: (screen_width(), screen_height()),
            fallback_texture,
        }
    }

    /// Run one frame. Returns false once the app should quit.
    pub fn frame(&mut self) -> bool {
        let dt = get_frame_time();
        let screen = (screen_width(), screen_height());

        if is_key_pressed(KeyCode::Escape) {
            self.shutdown();
            return false;
        }

        clear_background(BG_COLOR);

        let stage = std::mem::replace(&mut self.stage, Stage::Fallback);
        self.stage = match stage {
            Stage::Splash(mut timeout) => {
                draw_splash(screen, timeout.progress());
                if timeout.advance(dt) {
                    self.start_effect(screen)
                } else {
                    Stage::Splash(timeout)
                }
            }
            Stage::Running(mut effect) => {
                if screen != self.screen {
                    effect.resize(screen.0, screen.1);
                }
                self.publish_pointer();
                match effect.render_frame(dt) {
                    Ok(frame) => {
                        draw_glyph_layer(frame, self.options.glyph.font_size, screen);
                        Stage::Running(effect)
                    }
                    Err(e) => {
                        warn!("ASCII effect stopped: {}", e);
                        effect.dispose();
                        Stage::Fallback
                    }
                }
            }
            Stage::Fallback => {
                self.draw_fallback(screen);
                Stage::Fallback
            }
        };
        self.screen = screen;

        if !matches!(self.stage, Stage::Splash(_)) {
            self.update_card(screen, dt);
        }
        true
    }

    fn start_effect(&mut self, screen: (f32, f32)) -> Stage {
        let container = Container::new(screen.0, screen.1);
        match AsciiEffect::initialize(container, &self.options, &self.hub, &MacroquadMetrics) {
            Ok(effect) => Stage::Running(effect),
            Err(e @ Error::UnsupportedContext(_)) => {
                warn!("{}; showing static fallback", e);
                Stage::Fallback
            }
            Err(e) => {
                error!("Could not start the ASCII effect: {}", e);
                Stage::Fallback
            }
        }
    }

    fn shutdown(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Fallback) {
            Stage::Splash(mut timeout) => timeout.cancel(),
            Stage::Running(effect) => effect.dispose(),
            Stage::Fallback => {}
        }
        info!("Shutting down");
    }

    fn publish_pointer(&mut self) {
        let touches = touches();
        if let Some(t) = touches.first() {
            self.hub.publish(t.position.x, t.position.y);
            return;
        }
        let pos = mouse_position();
        if pos != self.input.last_mouse {
            self.input.last_mouse = pos;
            self.hub.publish(pos.0, pos.1);
        }
    }

    fn draw_fallback(&self, screen: (f32, f32)) {
        if let Some(tex) = &self.fallback_texture {
            let scale = (screen.0 / tex.width()).min(screen.1 / tex.height()).min(1.0);
            let (w, h) = (tex.width() * scale, tex.height() * scale);
            draw_texture_ex(
                tex,
                ((screen.0 - w) / 2.0).round(),
                ((screen.1 - h) / 2.0).round(),
                WHITE,
                DrawTextureParams {
                    dest_size: Some(Vec2::new(w, h)),
                    ..Default::default()
                },
            );
        } else {
            draw_centered(&self.options.scene.text, screen, 48.0, TEXT_COLOR);
        }
    }

    fn card_size(&self) -> (f32, f32) {
        let w = self.options.gesture.card_width;
        (w, w * CARD_ASPECT)
    }

    fn update_card(&mut self, screen: (f32, f32), dt: f32) {
        let center = Point::new(screen.0 / 2.0, screen.1 / 2.0);
        let (card_w, card_h) = self.card_size();
        self.gesture.set_bounds(SurfaceBounds {
            center,
            container_width: Some(card_w),
            viewport_width: screen.0,
        });

        for event in self.collect_events(center, card_w, card_h) {
            self.gesture.handle(&event);
        }
        self.gesture.tick(dt);
        draw_card(&self.gesture.style(), center, card_w, card_h);
    }

    /// Translate this frame's macroquad input into surface events
    fn collect_events(&mut self, center: Point, card_w: f32, card_h: f32) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();

        let touches = touches();
        if !touches.is_empty() {
            let phase = if touches.iter().any(|t| matches!(t.phase, MqTouchPhase::Started)) {
                Some(TouchPhase::Start)
            } else if touches.iter().any(|t| matches!(t.phase, MqTouchPhase::Ended)) {
                Some(TouchPhase::End)
            } else if touches.iter().any(|t| matches!(t.phase, MqTouchPhase::Cancelled)) {
                Some(TouchPhase::Cancel)
            } else if touches.iter().any(|t| matches!(t.phase, MqTouchPhase::Moved)) {
                Some(TouchPhase::Move)
            } else {
                None
            };
            if let Some(phase) = phase {
                let active = touches
                    .iter()
                    .filter(|t| !matches!(t.phase, MqTouchPhase::Ended | MqTouchPhase::Cancelled))
                    .map(|t| TouchPoint::new(t.id, t.position.x, t.position.y))
                    .collect();
                events.push(SurfaceEvent::Touch(TouchInput::new(phase, active)));
            }
        } else {
            let (mx, my) = mouse_position();
            let mouse = TouchPoint::new(MOUSE_TOUCH_ID, mx, my);
            let quad = self.gesture.style().project_quad(card_w, card_h).map(|p| p + center);
            let inside = quad_contains(&quad, Point::new(mx, my));

            if is_mouse_button_pressed(MouseButton::Left) && inside {
                self.input.mouse_down = true;
                events.push(SurfaceEvent::Touch(TouchInput::new(TouchPhase::Start, vec![mouse])));
            } else if self.input.mouse_down {
                if is_mouse_button_down(MouseButton::Left) {
                    events.push(SurfaceEvent::Touch(TouchInput::new(TouchPhase::Move, vec![mouse])));
                } else {
                    self.input.mouse_down = false;
                    events.push(SurfaceEvent::Touch(TouchInput::new(TouchPhase::End, Vec::new())));
                }
            } else if inside {
                let p = Point::new(mx, my);
                events.push(if self.input.hovering {
                    SurfaceEvent::HoverMove(p)
                } else {
                    SurfaceEvent::HoverEnter(p)
                });
                self.input.hovering = true;
            } else if self.input.hovering {
                self.input.hovering = false;
                events.push(SurfaceEvent::HoverLeave);
            }
        }

        let wheel = mouse_wheel().1;
        if wheel != 0.0 {
            // Scrolling down moves content up, like a page
            events.push(SurfaceEvent::Wheel { dy: -wheel.signum() * WHEEL_STEP });
        }
        events
    }
}

fn draw_centered(text: &str, screen: (f32, f32), size: f32, color: Color) {
    let dims = measure_text(text, None, size as u16, 1.0);
    draw_text(
        text,
        ((screen.0 - dims.width) / 2.0).round(),
        ((screen.1 + dims.offset_y) / 2.0).round(),
        size,
        color,
    );
}

fn draw_splash(screen: (f32, f32), progress: f32) {
    draw_centered(SPLASH_TEXT, screen, 32.0, TEXT_COLOR);
    let bar_w = 240.0;
    let x = ((screen.0 - bar_w) / 2.0).round();
    let y = (screen.1 / 2.0 + 40.0).round();
    draw_rectangle(x, y, bar_w, 2.0, MUTED_COLOR);
    draw_rectangle(x, y, bar_w * progress, 2.0, TEXT_COLOR);
}

/// Draw glyph rows, colored by the hue-rotated radial gradient
fn draw_glyph_layer(frame: &GlyphFrame, font_size: f32, screen: (f32, f32)) {
    if frame.columns == 0 || frame.rows == 0 {
        return;
    }
    let cell_w = MacroquadMetrics.cell_width(font_size, "");
    let center = (screen.0 / 2.0, screen.1 / 2.0);
    // CSS `circle` gradients reach the farthest corner
    let radius = (center.0 * center.0 + center.1 * center.1).sqrt().max(1.0);
    let segment = frame.columns.div_ceil(GRADIENT_SEGMENTS).max(1);

    for (row, line) in frame.text.lines().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        let baseline = (row as f32 + 1.0) * font_size;
        for (i, chunk) in chars.chunks(segment).enumerate() {
            if chunk.iter().all(|c| *c == ' ') {
                continue;
            }
            let col = i * segment;
            let x = col as f32 * cell_w;
            let mid = (x + chunk.len() as f32 * cell_w / 2.0, baseline - font_size / 2.0);
            let dist = ((mid.0 - center.0).powi(2) + (mid.1 - center.1).powi(2)).sqrt();
            let [r, g, b] = hue_rotate(gradient_at(dist / radius), frame.hue_deg);
            let text: String = chunk.iter().collect();
            draw_text(&text, x, baseline, font_size, Color::from_rgba(r, g, b, 255));
        }
    }
}

fn lerp_point(a: Point, b: Point, t: f32) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Bilinear point on a quad (u across, v down)
fn quad_point(q: &[Point; 4], u: f32, v: f32) -> Vec2 {
    let top = lerp_point(q[0], q[1], u);
    let bottom = lerp_point(q[3], q[2], u);
    let p = lerp_point(top, bottom, v);
    Vec2::new(p.x, p.y)
}

fn fill_quad(q: [Vec2; 4], color: Color) {
    draw_triangle(q[0], q[1], q[2], color);
    draw_triangle(q[0], q[2], q[3], color);
}

/// Card quad plus wheel-scrolled content stripes
fn draw_card(style: &SurfaceStyle, center: Point, w: f32, h: f32) {
    let quad = style.project_quad(w, h).map(|p| p + center);
    fill_quad(quad.map(|p| Vec2::new(p.x, p.y)), CARD_COLOR);

    // Stripes repeat every `period` px; the wheel offset slides them
    let band = h / (2 * STRIPES) as f32;
    let period = band * 2.0;
    let offset = style.content_translate_y.rem_euclid(period);
    let inset = 0.08;
    for i in -1..=(2 * STRIPES as i32) {
        let top = (i as f32 * period + offset).clamp(0.0, h);
        let bottom = (i as f32 * period + offset + band).clamp(0.0, h);
        if bottom <= top {
            continue;
        }
        let (v0, v1) = (top / h, bottom / h);
        fill_quad(
            [
                quad_point(&quad, inset, v0),
                quad_point(&quad, 1.0 - inset, v0),
                quad_point(&quad, 1.0 - inset, v1),
                quad_point(&quad, inset, v1),
            ],
            STRIPE_COLOR,
        );
    }

    for i in 0..4 {
        let (a, b) = (quad[i], quad[(i + 1) % 4]);
        draw_line(a.x, a.y, b.x, b.y, 2.0, CARD_EDGE);
    }
}

//! Rope and confetti drawing on a 2D canvas

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::sim::{ConfettiField, PALETTE, RopeRender, Segment, TextureSize};

pub const CANVAS_ID: &str = "rope-canvas";

/// Stroke color used when the rope texture is missing
const ROPE_FALLBACK_COLOR: &str = "#9a6b3f";

/// Canvas overlay covering the scene
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    rope_texture: Option<HtmlImageElement>,
    /// CSS pixel size of the canvas
    pub size: Vec2,
    dpr: f64,
}

impl CanvasRenderer {
    pub fn new(document: &Document, rope_texture: Option<HtmlImageElement>) -> Option<Self> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)?
            .dyn_into()
            .ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some(Self {
            canvas,
            ctx,
            rope_texture,
            size: Vec2::ZERO,
            dpr: 1.0,
        })
    }

    /// Natural size of the rope texture, if it decoded
    pub fn texture_size(&self) -> Option<TextureSize> {
        self.rope_texture.as_ref().map(|img| TextureSize {
            width: img.natural_width() as f32,
            height: img.natural_height() as f32,
        })
    }

    /// Match the backing store to the container
    pub fn resize(&mut self, size: Vec2, dpr: f64) {
        self.size = size;
        self.dpr = dpr;
        self.canvas.set_width((size.x as f64 * dpr).round() as u32);
        self.canvas.set_height((size.y as f64 * dpr).round() as u32);
    }

    /// Draw one frame
    pub fn render(&self, rope: &RopeRender, rope_offset: Vec2, confetti: &ConfettiField) {
        let ctx = &self.ctx;
        let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);

        match rope {
            RopeRender::Hidden => {}
            RopeRender::Tiled(tiles) => match &self.rope_texture {
                Some(img) => {
                    for tile in tiles {
                        self.draw_tile(img, tile, rope_offset);
                    }
                }
                None => log::debug!("Tiled rope without a texture"),
            },
            RopeRender::Stroke { from, to, width } => {
                ctx.begin_path();
                ctx.set_stroke_style_str(ROPE_FALLBACK_COLOR);
                ctx.set_line_width(*width as f64);
                ctx.set_line_cap("round");
                ctx.move_to((from.x + rope_offset.x) as f64, (from.y + rope_offset.y) as f64);
                ctx.line_to((to.x + rope_offset.x) as f64, (to.y + rope_offset.y) as f64);
                ctx.stroke();
            }
        }

        if !confetti.is_idle() {
            self.draw_confetti(confetti);
        }
    }

    /// One texture tile, cropped to its visible part
    fn draw_tile(&self, img: &HtmlImageElement, tile: &Segment, offset: Vec2) {
        let ctx = &self.ctx;
        let tex_w = img.natural_width() as f64;
        let tex_h = img.natural_height() as f64;
        let visible = (tile.visible_length / tile.length) as f64;
        let length = tile.length as f64;
        let thickness = tile.thickness as f64;

        ctx.save();
        let _ = ctx.translate(
            (tile.center.x + offset.x) as f64,
            (tile.center.y + offset.y) as f64,
        );
        let _ = ctx.rotate(tile.angle as f64);
        let _ = ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            img,
            0.0,
            0.0,
            tex_w * visible,
            tex_h,
            -length / 2.0,
            -thickness / 2.0,
            length * visible,
            thickness,
        );
        ctx.restore();
    }

    fn draw_confetti(&self, confetti: &ConfettiField) {
        let ctx = &self.ctx;
        for p in &confetti.particles {
            ctx.save();
            let _ = ctx.translate(p.pos.x as f64, p.pos.y as f64);
            let _ = ctx.rotate(p.rotation as f64);
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(PALETTE[p.color]);
            let size = p.size as f64;
            ctx.fill_rect(-size / 2.0, -size * 0.3, size, size * 0.6);
            ctx.restore();
        }
    }
}

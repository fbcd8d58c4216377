//! Frame drawing with the 2D canvas context

use std::f64::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::assets::{Assets, SpriteKind};
use super::palette;
use crate::settings::Settings;
use crate::sim::{GameState, ThreatKind};

/// Dome sprite size on screen
const DOME_WIDTH: f64 = 100.0;
const DOME_HEIGHT: f64 = 50.0;
/// Fallback dome block size
const BASE_WIDTH: f64 = 60.0;
const BASE_HEIGHT: f64 = 30.0;
/// Trail dot radius
const TRAIL_RADIUS: f64 = 2.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    /// Visual-only noise (star flicker); never touches the simulation RNG
    rng: Pcg32,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, seed: u64) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            ctx,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Draw one frame
    pub fn render(
        &mut self,
        state: &GameState,
        assets: &Assets,
        settings: &Settings,
    ) -> Result<(), JsValue> {
        let w = state.arena.width as f64;
        let h = state.arena.height as f64;

        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.draw_background(w, h, assets, settings.star_count())?;
        if settings.effective_trails() {
            self.draw_trails(state)?;
        }
        self.draw_threats(state, assets)?;
        self.draw_interceptors(state, assets)?;
        self.draw_explosions(state)?;
        self.draw_dome(w, h, assets)?;
        Ok(())
    }

    fn draw_background(
        &mut self,
        w: f64,
        h: f64,
        assets: &Assets,
        stars: usize,
    ) -> Result<(), JsValue> {
        if let Some(img) = assets.get(SpriteKind::Background) {
            return self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h);
        }

        self.ctx.set_fill_style_str(palette::BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(palette::STAR);
        for _ in 0..stars {
            let x = self.rng.random::<f64>() * w;
            let y = self.rng.random::<f64>() * h;
            self.ctx.fill_rect(x, y, 1.0, 1.0);
        }
        Ok(())
    }

    fn draw_trails(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_line_width(2.0);

        for threat in &state.threats {
            ctx.set_fill_style_str(palette::threat_trail_color(threat.kind));
            for pt in &threat.trail {
                ctx.set_global_alpha(pt.alpha as f64);
                self.dot(pt.pos.x as f64, pt.pos.y as f64, TRAIL_RADIUS)?;
            }
        }

        ctx.set_fill_style_str(palette::INTERCEPTOR_TRAIL);
        for m in &state.interceptors {
            for pt in &m.trail {
                ctx.set_global_alpha(pt.alpha as f64);
                self.dot(pt.pos.x as f64, pt.pos.y as f64, TRAIL_RADIUS)?;
            }
        }

        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_threats(&self, state: &GameState, assets: &Assets) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for t in &state.threats {
            let (x, y) = (t.pos.x as f64, t.pos.y as f64);
            let size = t.size as f64;
            let half = size / 2.0;

            if let Some(img) = assets.get(SpriteKind::for_threat(t.kind)) {
                ctx.save();
                ctx.translate(x, y)?;
                ctx.rotate(t.rotation as f64)?;
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -half, -half, size, size)?;
                ctx.restore();
                continue;
            }

            // Fallback: colored disc plus a class marker
            ctx.set_fill_style_str(palette::threat_color(t.kind));
            self.dot(x, y, half)?;
            match t.kind {
                ThreatKind::Drone => ctx.stroke_rect(x - half, y - half, size, size),
                ThreatKind::Ballistic => ctx.fill_rect(x - 2.0, y - 2.0, 4.0, 4.0),
                ThreatKind::Cruise => {}
            }
        }
        Ok(())
    }

    fn draw_interceptors(&self, state: &GameState, assets: &Assets) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let sprite = assets.get(SpriteKind::Interceptor);
        for m in &state.interceptors {
            ctx.save();
            ctx.translate(m.pos.x as f64, m.pos.y as f64)?;
            ctx.rotate(m.angle as f64)?;

            if let Some(img) = sprite {
                let (w, h) = (m.width as f64, m.height as f64);
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h / 2.0, w, h)?;
            } else {
                // Triangle body with a flame below it
                ctx.set_fill_style_str(palette::INTERCEPTOR_BODY);
                ctx.begin_path();
                ctx.move_to(0.0, -12.0);
                ctx.line_to(-4.0, 0.0);
                ctx.line_to(4.0, 0.0);
                ctx.close_path();
                ctx.fill();
                ctx.set_fill_style_str(palette::FLAME);
                ctx.fill_rect(-2.0, 0.0, 4.0, 6.0);
            }

            ctx.restore();
        }
        Ok(())
    }

    fn draw_explosions(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for e in &state.explosions {
            let (x, y, r) = (e.pos.x as f64, e.pos.y as f64, e.radius as f64);
            ctx.set_global_alpha(e.alpha as f64);
            let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
            gradient.add_color_stop(0.0, palette::EXPLOSION_CORE)?;
            gradient.add_color_stop(0.5, palette::explosion_color(e.color))?;
            gradient.add_color_stop(1.0, "transparent")?;
            ctx.set_fill_style_canvas_gradient(&gradient);
            self.dot(x, y, r)?;
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_dome(&self, w: f64, h: f64, assets: &Assets) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        if let Some(img) = assets.get(SpriteKind::IronDome) {
            return ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                w / 2.0 - DOME_WIDTH / 2.0,
                h - DOME_HEIGHT,
                DOME_WIDTH,
                DOME_HEIGHT,
            );
        }

        ctx.set_fill_style_str(palette::DOME_BASE);
        ctx.fill_rect(w / 2.0 - BASE_WIDTH / 2.0, h - BASE_HEIGHT, BASE_WIDTH, BASE_HEIGHT);
        ctx.set_fill_style_str(palette::DOME_CAP);
        ctx.begin_path();
        ctx.arc(w / 2.0, h - BASE_HEIGHT, BASE_WIDTH / 2.0, PI, TAU)?;
        ctx.fill();
        Ok(())
    }

    /// Filled circle in the current fill style
    fn dot(&self, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(x, y, r, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }
}

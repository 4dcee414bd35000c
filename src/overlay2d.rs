use crate::core::counters::{RadialCounters, COUNTER_LABELS};
use crate::core::decision_tree::{DecisionTree, LeafKind};
use crate::core::reveal_grid::{CellVisual, RevealGrid};
use crate::core::streams::StreamRain;
use crate::core::{OverlayLayer, OverlayState, SceneId, SceneTimeline};
use wasm_bindgen::JsCast;
use web_sys as web;

const ACCENT: [u8; 3] = [120, 190, 255];
const DIM: [u8; 3] = [70, 80, 110];
const WARM: [u8; 3] = [255, 196, 120];
const FONT: &str = "12px system-ui, sans-serif";
const FONT_LARGE: &str = "600 28px system-ui, sans-serif";

#[inline]
fn rgba(c: [u8; 3], a: f32) -> String {
    format!("rgba({},{},{},{:.3})", c[0], c[1], c[2], a.clamp(0.0, 1.0))
}

/// 2D canvas layered over the particles. Owns the per-scene state.
pub struct Overlay2d {
    canvas: web::HtmlCanvasElement,
    ctx: Option<web::CanvasRenderingContext2d>,
    pub state: OverlayState,
}

impl Overlay2d {
    pub fn new(canvas: web::HtmlCanvasElement, state: OverlayState) -> Self {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("[overlay] no 2d context; overlay disabled");
        }
        Self { canvas, ctx, state }
    }

    #[inline]
    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    /// Rebuild geometry for the canvas' current backing size.
    pub fn resize(&mut self) {
        let w = self.canvas.width() as f32;
        let h = self.canvas.height() as f32;
        log::info!("[overlay] resize {}x{}", w, h);
        self.state.resize(w, h);
    }

    pub fn frame(&mut self, progress: f32, timeline: &SceneTimeline) {
        let layers = self.state.advance(progress, timeline);
        let Some(ctx) = self.ctx.as_ref() else {
            return;
        };
        ctx.set_global_alpha(1.0);
        ctx.clear_rect(0.0, 0.0, self.state.width as f64, self.state.height as f64);
        for layer in &layers {
            draw_layer(ctx, &self.state, layer);
        }
        ctx.set_global_alpha(1.0);
    }
}

fn draw_layer(ctx: &web::CanvasRenderingContext2d, state: &OverlayState, layer: &OverlayLayer) {
    ctx.set_global_alpha(layer.opacity as f64);
    match layer.scene {
        SceneId::Inventory => draw_grid(ctx, &state.inventory, state.frame, "indexed"),
        SceneId::Decision => draw_tree(ctx, &state.decision, layer.local, state.frame),
        SceneId::Assembly => draw_streams(ctx, &state.assembly, layer.local),
        SceneId::Verification => draw_grid(ctx, &state.verification, state.frame, "verified"),
        SceneId::Outcome => draw_counters(ctx, &state.outcome, layer.local, state.frame),
    }
}

fn draw_grid(ctx: &web::CanvasRenderingContext2d, grid: &RevealGrid, frame: u64, noun: &str) {
    let geo = grid.geometry();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = row * grid.cols() + col;
            let (x, y, w, h) = geo.rect(col, row);
            let fill = match grid.cell_visual(cell, frame) {
                CellVisual::Pending => rgba(DIM, 0.18),
                CellVisual::Scanning { pulse } => rgba(ACCENT, 0.25 + 0.35 * pulse),
                CellVisual::Revealed => rgba(ACCENT, 0.55),
            };
            ctx.set_fill_style_str(&fill);
            ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
        }
    }
    for flash in grid.flashes() {
        let a = RevealGrid::flash_intensity(flash, frame);
        let col = flash.cell % grid.cols().max(1);
        let row = flash.cell / grid.cols().max(1);
        let (x, y, w, h) = geo.rect(col, row);
        let grow = (1.0 - a) * geo.gap;
        ctx.set_stroke_style_str(&rgba([255, 255, 255], a));
        ctx.set_line_width(1.5);
        ctx.stroke_rect(
            (x - grow) as f64,
            (y - grow) as f64,
            (w + 2.0 * grow) as f64,
            (h + 2.0 * grow) as f64,
        );
    }
    ctx.set_font(FONT);
    ctx.set_fill_style_str(&rgba([220, 230, 255], 0.9));
    _ = ctx.fill_text(
        &format!("{} / {} {}", grid.revealed_count(), grid.total(), noun),
        geo.origin_x as f64,
        (geo.origin_y - 10.0) as f64,
    );
}

fn draw_tree(ctx: &web::CanvasRenderingContext2d, tree: &DecisionTree, local: f32, frame: u64) {
    let nodes = tree.nodes();
    ctx.set_line_width(1.5);
    for (i, node) in nodes.iter().enumerate() {
        let Some(parent) = node.parent.and_then(|p| nodes.get(p)) else {
            continue;
        };
        let reveal = tree.node_reveal(i, local);
        if reveal <= 0.0 {
            continue;
        }
        let ex = parent.x + (node.x - parent.x) * reveal;
        let ey = parent.y + (node.y - parent.y) * reveal;
        ctx.set_stroke_style_str(&rgba(ACCENT, 0.5));
        ctx.begin_path();
        ctx.move_to(parent.x as f64, parent.y as f64);
        ctx.line_to(ex as f64, ey as f64);
        ctx.stroke();
        if reveal >= 1.0 {
            let t = DecisionTree::pulse_position(i, frame);
            let px = parent.x + (node.x - parent.x) * t;
            let py = parent.y + (node.y - parent.y) * t;
            ctx.set_fill_style_str(&rgba([255, 255, 255], 0.85));
            ctx.begin_path();
            _ = ctx.arc(px as f64, py as f64, 2.0, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
    }
    ctx.set_font(FONT);
    for (i, node) in nodes.iter().enumerate() {
        let reveal = tree.node_reveal(i, local);
        if reveal <= 0.0 {
            continue;
        }
        ctx.set_fill_style_str(&rgba(ACCENT, reveal));
        ctx.begin_path();
        _ = ctx.arc(
            node.x as f64,
            node.y as f64,
            (3.0 + 2.0 * reveal) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
        if let Some(label) = node.label.filter(|_| tree.label_visible(i, local)) {
            let color = match label.kind {
                LeafKind::Retained => WARM,
                LeafKind::Delegated => ACCENT,
            };
            ctx.set_fill_style_str(&rgba(color, 0.95));
            _ = ctx.fill_text(label.text, (node.x - 20.0) as f64, (node.y + 18.0) as f64);
        }
    }
}

fn draw_streams(ctx: &web::CanvasRenderingContext2d, rain: &StreamRain, local: f32) {
    for col in rain.columns() {
        let c = col.color;
        ctx.set_fill_style_str(&rgba(c, 0.7));
        for block in &col.blocks {
            let top = block.y.max(0.0);
            let bottom = (block.y + block.len).min(rain.fall_height());
            if bottom > top {
                ctx.fill_rect(
                    col.x as f64,
                    top as f64,
                    col.width as f64,
                    (bottom - top) as f64,
                );
            }
        }
    }
    let (x, y, w, h) = rain.bar_rect();
    ctx.set_fill_style_str(&rgba(DIM, 0.4));
    ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    ctx.set_fill_style_str(&rgba(ACCENT, 0.9));
    ctx.fill_rect(
        x as f64,
        y as f64,
        (w * StreamRain::bar_fill(local)) as f64,
        h as f64,
    );
}

fn draw_counters(
    ctx: &web::CanvasRenderingContext2d,
    counters: &RadialCounters,
    local: f32,
    frame: u64,
) {
    let (cx, cy) = counters.center();
    let values = RadialCounters::values(local);
    ctx.set_text_align("center");
    for (i, (value, label)) in values.iter().zip(COUNTER_LABELS).enumerate() {
        let dx = (i as f32 - 1.5) * counters.radius() * 0.55;
        ctx.set_font(FONT_LARGE);
        ctx.set_fill_style_str(&rgba([235, 240, 255], 0.95));
        _ = ctx.fill_text(&value.to_string(), (cx + dx) as f64, cy as f64);
        ctx.set_font(FONT);
        ctx.set_fill_style_str(&rgba(ACCENT, 0.8));
        _ = ctx.fill_text(label, (cx + dx) as f64, (cy + 20.0) as f64);
    }
    for sat in counters.satellites(local, frame) {
        if sat.alpha <= 0.0 {
            continue;
        }
        ctx.set_stroke_style_str(&rgba(DIM, 0.4 * sat.alpha));
        ctx.begin_path();
        ctx.move_to(cx as f64, cy as f64);
        ctx.line_to(sat.x as f64, sat.y as f64);
        ctx.stroke();
        let px = cx + (sat.x - cx) * sat.pulse;
        let py = cy + (sat.y - cy) * sat.pulse;
        ctx.set_fill_style_str(&rgba(WARM, sat.alpha));
        ctx.begin_path();
        _ = ctx.arc(px as f64, py as f64, 2.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
        ctx.set_fill_style_str(&rgba(ACCENT, sat.alpha));
        ctx.begin_path();
        _ = ctx.arc(sat.x as f64, sat.y as f64, 5.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
        ctx.set_font(FONT);
        _ = ctx.fill_text(sat.label, sat.x as f64, (sat.y - 10.0) as f64);
    }
    ctx.set_text_align("start");
}

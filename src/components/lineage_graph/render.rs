use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::LineageGraphState;
use crate::lineage::{DisplayEdge, DisplayNode};

const BACKGROUND: &str = "#f8fafc";
const GRID_DOT: &str = "#e2e8f0";
const GRID_GAP: f64 = 20.0;
const CORNER: f64 = 6.0;
const ACCENT_WIDTH: f64 = 4.0;
const ARROW: f64 = 7.0;
/// Labels longer than this are cut with an ellipsis.
const LABEL_CHARS: usize = 22;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &LineageGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

/// Dot grid that pans and scales with the view.
fn draw_grid(state: &LineageGraphState, ctx: &CanvasRenderingContext2d) {
	let gap = GRID_GAP * state.transform.k;
	if gap < 6.0 {
		return;
	}
	ctx.set_fill_style_str(GRID_DOT);
	let mut x = state.transform.x.rem_euclid(gap);
	while x < state.width {
		let mut y = state.transform.y.rem_euclid(gap);
		while y < state.height {
			ctx.fill_rect(x, y, 1.0, 1.0);
			y += gap;
		}
		x += gap;
	}
}

fn draw_edges(state: &LineageGraphState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();
	let (dash, gap) = (6.0, 4.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	for edge in &state.scene.edges {
		let Some(end) = edge.points.last() else {
			continue;
		};
		let touches_hover = |id: &str| state.is_hovered(id);
		let highlighted = has_highlight
			&& (touches_hover(&edge.source) || touches_hover(&edge.target));

		let (alpha, width) = match (has_highlight, highlighted) {
			(false, _) => (1.0, edge.stroke_width),
			(true, true) => (1.0, edge.stroke_width * (1.0 + 0.4 * t)),
			(true, false) => (1.0 - 0.75 * t, edge.stroke_width),
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge.stroke);
		ctx.set_line_width(width);
		if highlighted {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}
		trace_route(edge, ctx);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if let Some(before) = edge.points.iter().rev().nth(1) {
			draw_arrow(ctx, edge.stroke, (before.x, before.y), (end.x, end.y));
		}
	}
	ctx.set_global_alpha(1.0);
}

/// Polyline with rounded bends.
fn trace_route(edge: &DisplayEdge, ctx: &CanvasRenderingContext2d) {
	let points = &edge.points;
	ctx.begin_path();
	let Some(first) = points.first() else {
		return;
	};
	ctx.move_to(first.x, first.y);
	for window in points.windows(3) {
		let (a, b, c) = (&window[0], &window[1], &window[2]);
		let leg = ((b.x - a.x).abs() + (b.y - a.y).abs())
			.min((c.x - b.x).abs() + (c.y - b.y).abs());
		let _ = ctx.arc_to(b.x, b.y, c.x, c.y, (leg / 2.0).min(8.0));
	}
	if let Some(last) = points.last() {
		ctx.line_to(last.x, last.y);
	}
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, color: &str, from: (f64, f64), tip: (f64, f64)) {
	let (dx, dy) = (tip.0 - from.0, tip.1 - from.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (back_x, back_y) = (tip.0 - ux * ARROW, tip.1 - uy * ARROW);
	let (px, py) = (-uy * ARROW * 0.5, ux * ARROW * 0.5);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip.0, tip.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn truncate(label: &str) -> String {
	if label.chars().count() <= LABEL_CHARS {
		return label.to_string();
	}
	let cut: String = label.chars().take(LABEL_CHARS - 1).collect();
	format!("{cut}…")
}

fn draw_nodes(state: &LineageGraphState, ctx: &CanvasRenderingContext2d) {
	let has_highlight = state.has_active_highlight();
	let t = ease_out_cubic(state.hover.highlight_t);

	for node in &state.scene.nodes {
		let alpha = if has_highlight && !state.is_highlighted(&node.id) {
			1.0 - 0.6 * t
		} else {
			1.0
		};
		ctx.set_global_alpha(alpha);
		draw_node(node, state.is_hovered(&node.id) && has_highlight, t, ctx);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(node: &DisplayNode, hovered: bool, t: f64, ctx: &CanvasRenderingContext2d) {
	let (x, y, w, h) = (node.x, node.y, node.width, node.height);

	if let Some(ring) = node.ring() {
		rounded_rect(ctx, x - 3.0, y - 3.0, w + 6.0, h + 6.0, CORNER + 3.0);
		ctx.set_stroke_style_str(ring);
		ctx.set_line_width(2.0);
		ctx.stroke();
	}

	rounded_rect(ctx, x, y, w, h, CORNER);
	ctx.set_fill_style_str("#ffffff");
	ctx.fill();
	ctx.set_stroke_style_str(if hovered { "#64748b" } else { "#cbd5e1" });
	ctx.set_line_width(if hovered { 1.0 + 0.5 * t } else { 1.0 });
	ctx.stroke();

	// Accent border, clipped to the card's rounded corners.
	ctx.save();
	rounded_rect(ctx, x, y, w, h, CORNER);
	ctx.clip();
	ctx.set_fill_style_str(node.accent);
	ctx.fill_rect(x, y, ACCENT_WIDTH, h);
	ctx.restore();

	let text_x = x + ACCENT_WIDTH + 10.0;
	ctx.set_fill_style_str("#0f172a");
	ctx.set_font("600 12px sans-serif");
	let _ = ctx.fill_text(&truncate(&node.label), text_x, y + h / 2.0 - 2.0);
	ctx.set_fill_style_str("#64748b");
	ctx.set_font("10px sans-serif");
	let _ = ctx.fill_text(
		&format!("{} · {}", node.resource_type.label(), node.materialization.label()),
		text_x,
		y + h / 2.0 + 12.0,
	);

	ctx.begin_path();
	let _ = ctx.arc(x + w - 10.0, y + 10.0, 3.5, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(if node.healthy { "#22c55e" } else { "#ef4444" });
	ctx.fill();
}

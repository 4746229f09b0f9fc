use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, ViewTransform, node_radius};
use super::types::Selection;
use crate::document::EntityKind;

const EDGE_COLOR: &str = "rgba(51, 51, 68, 0.6)";
const SELECTED_COLOR: &str = "#ffffff";
pub const BACKGROUND: &str = "#0a0a0f";

/// Target of one frame: the on-screen canvas or an offscreen export.
pub struct Frame<'a> {
	pub width: f64,
	pub height: f64,
	pub transform: &'a ViewTransform,
	pub background: &'a str,
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	render_frame(
		state,
		ctx,
		&Frame {
			width: state.width,
			height: state.height,
			transform: &state.transform,
			background: BACKGROUND,
		},
	);
}

pub fn render_frame(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, frame: &Frame) {
	ctx.set_fill_style_str(frame.background);
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
	ctx.save();
	let _ = ctx.translate(frame.transform.x, frame.transform.y);
	let _ = ctx.scale(frame.transform.k, frame.transform.k);
	draw_edges(state, ctx, frame.transform.k);
	draw_nodes(state, ctx, frame.transform.k);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, k: f64) {
	let positions = state.positions();
	let mut radii = HashMap::new();
	state.graph.visit_nodes(|node| {
		radii.insert(node.index(), node_radius(&node.data.user_data.fields.kind));
	});
	let arrow_size = 8.0;

	for i in state.visible_edges() {
		let edge = &state.edges()[i];
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let selected = state.selection == Selection::Edge(i);
		let (color, width) = if selected {
			(SELECTED_COLOR, 3.0 / k.max(0.5))
		} else {
			(EDGE_COLOR, 1.5 / k.max(0.5))
		};
		let source_r = radii.get(&edge.source).copied().unwrap_or(0.0);
		let target_r = radii.get(&edge.target).copied().unwrap_or(0.0);

		if edge.source == edge.target {
			// Loop above the node.
			ctx.set_stroke_style_str(color);
			ctx.set_line_width(width);
			ctx.begin_path();
			let _ = ctx.arc(x1, y1 - source_r, source_r * 0.8, 0.0, 2.0 * PI);
			ctx.stroke();
			continue;
		}

		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1 + ux * source_r, y1 + uy * source_r);
		ctx.line_to(
			x2 - ux * (target_r + arrow_size),
			y2 - uy * (target_r + arrow_size),
		);
		ctx.stroke();

		ctx.set_fill_style_str(color);
		let (tip_x, tip_y) = (x2 - ux * target_r, y2 - uy * target_r);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, k: f64) {
	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		if info.hidden {
			return;
		}
		let kind = &info.fields.kind;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let r = node_radius(kind);
		let selected = state.selection == Selection::Node(node.index());

		if *kind == EntityKind::Central {
			ctx.begin_path();
			let _ = ctx.arc(x, y, r + 4.0, 0.0, 2.0 * PI);
			ctx.set_fill_style_str("rgba(0, 240, 255, 0.2)");
			ctx.fill();
		}

		trace_shape(ctx, kind, x, y, r);
		ctx.set_fill_style_str(if selected { SELECTED_COLOR } else { kind.color() });
		ctx.fill();
		if selected {
			ctx.set_stroke_style_str(SELECTED_COLOR);
			ctx.set_line_width(2.0 / k.max(0.5));
			trace_shape(ctx, kind, x, y, r + 3.0 / k.max(0.5));
			ctx.stroke();
		}

		let font_px = if *kind == EntityKind::Central { 14.0 } else { 10.0 };
		ctx.set_fill_style_str("white");
		ctx.set_font(&format!("{}px Inter, sans-serif", font_px / k.max(0.5)));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(info.fields.display_label(), x, y + r + 4.0 + font_px);
	});
}

/// Path of a node's outline: rounded rectangle for organisations, diamond for
/// places, circle for everything else.
fn trace_shape(ctx: &CanvasRenderingContext2d, kind: &EntityKind, x: f64, y: f64, r: f64) {
	ctx.begin_path();
	match kind {
		EntityKind::Org => {
			let c = r * 0.35;
			ctx.move_to(x - r + c, y - r);
			ctx.line_to(x + r - c, y - r);
			ctx.quadratic_curve_to(x + r, y - r, x + r, y - r + c);
			ctx.line_to(x + r, y + r - c);
			ctx.quadratic_curve_to(x + r, y + r, x + r - c, y + r);
			ctx.line_to(x - r + c, y + r);
			ctx.quadratic_curve_to(x - r, y + r, x - r, y + r - c);
			ctx.line_to(x - r, y - r + c);
			ctx.quadratic_curve_to(x - r, y - r, x - r + c, y - r);
			ctx.close_path();
		}
		EntityKind::Gpe => {
			let d = r * 1.2;
			ctx.move_to(x, y - d);
			ctx.line_to(x + d, y);
			ctx.line_to(x, y + d);
			ctx.line_to(x - d, y);
			ctx.close_path();
		}
		_ => {
			let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		}
	}
}

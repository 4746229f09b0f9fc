use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::render::{Frame, render_frame};
use super::state::{ForceGraphState, ViewTransform};
use crate::error::{AppError, AppResult};

/// World-space margin around the graph, leaves room for labels.
const PADDING: f64 = 40.0;

/// Size and transform of an export covering the whole graph.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterPlan {
	pub width: u32,
	pub height: u32,
	pub transform: ViewTransform,
}

/// Largest canvas side browsers render reliably.
pub const MAX_SIDE: f64 = 16_384.0;
/// Largest canvas area, in pixels, Safari will allocate.
pub const MAX_AREA: f64 = 16_777_216.0;

/// `scale` is reduced when the full graph would exceed the canvas limits.
pub fn raster_plan(bounds: Option<(f64, f64, f64, f64)>, scale: f64) -> RasterPlan {
	let (x0, y0, x1, y1) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));
	let (x0, y0, x1, y1) = (x0 - PADDING, y0 - PADDING, x1 + PADDING, y1 + PADDING);
	let (w, h) = (x1 - x0, y1 - y0);
	let fit = (MAX_SIDE / w).min(MAX_SIDE / h).min((MAX_AREA / (w * h)).sqrt());
	let scale = if scale > fit {
		warn!("export scale {scale} exceeds canvas limits, using {fit:.3}");
		fit
	} else {
		scale
	};
	RasterPlan {
		width: ((w * scale).floor() as u32).max(1),
		height: ((h * scale).floor() as u32).max(1),
		transform: ViewTransform {
			x: -x0 * scale,
			y: -y0 * scale,
			k: scale,
		},
	}
}

/// Draw the full graph into an offscreen canvas and return it as a PNG data URL.
pub fn rasterize_png(state: &ForceGraphState, scale: f64, background: &str) -> AppResult<String> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| AppError::Browser("no document".into()))?;
	let canvas: HtmlCanvasElement = document
		.create_element("canvas")
		.map_err(AppError::browser)?
		.dyn_into()
		.map_err(|_| AppError::Browser("created element is not a canvas".into()))?;

	let plan = raster_plan(state.graph_bounds(), scale);
	canvas.set_width(plan.width);
	canvas.set_height(plan.height);
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(AppError::browser)?
		.ok_or_else(|| AppError::Browser("2d context unavailable".into()))?
		.dyn_into()
		.map_err(|_| AppError::Browser("unexpected context type".into()))?;

	render_frame(
		state,
		&ctx,
		&Frame {
			width: plan.width as f64,
			height: plan.height as f64,
			transform: &plan.transform,
			background,
		},
	);
	let png = canvas
		.to_data_url_with_type("image/png")
		.map_err(AppError::browser)?;
	// Browsers return an empty data URL when the canvas could not be allocated.
	if png == "data:," {
		return Err(AppError::Browser(format!(
			"canvas of {}x{} could not be encoded",
			plan.width, plan.height
		)));
	}
	Ok(png)
}

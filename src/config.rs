//! Startup configuration.
//!
//! Defaults can be overridden at build time (`OSINT_GRAPH_API`,
//! `OSINT_GRAPH_STORE`) and at page load by an inline
//! `<script id="app-config" type="application/json">` element.

use log::Level;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_ELEMENT_ID: &str = "app-config";

/// Where snapshots are written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum PersistenceConfig {
	/// Browser `localStorage`.
	Local,
	/// HTTP document store accepting `PUT <endpoint>/<key>`.
	Remote { endpoint: String },
}

impl Default for PersistenceConfig {
	fn default() -> Self {
		match option_env!("OSINT_GRAPH_STORE") {
			Some(endpoint) if !endpoint.is_empty() => Self::Remote {
				endpoint: endpoint.to_string(),
			},
			_ => Self::Local,
		}
	}
}

/// Force simulation constants, applied on every full data replacement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Node repulsion strength.
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	/// Radius of the ring the non-central nodes start on.
	pub ideal_edge_length: f32,
	/// Simulation steps run before the first frame is drawn.
	pub warmup_iterations: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			force_charge: 450.0,
			force_spring: 0.05,
			force_max: 120.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			ideal_edge_length: 80.0,
			warmup_iterations: 300,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
	/// Resolution multiplier of the PNG export.
	pub image_scale: f64,
	pub background: String,
	pub image_file_name: String,
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			image_scale: 2.0,
			background: "#0a0a0f".to_string(),
			image_file_name: "social_graph_snapshot.png".to_string(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Graph search endpoint; the query is appended as `?q=`.
	pub api_endpoint: String,
	pub persistence: PersistenceConfig,
	/// Minimum time the loading overlay stays up, to avoid flicker.
	pub loader_min_visible_ms: u32,
	pub log_level: String,
	pub layout: LayoutConfig,
	pub export: ExportConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_endpoint: option_env!("OSINT_GRAPH_API")
				.unwrap_or("/api/graph")
				.to_string(),
			persistence: PersistenceConfig::default(),
			loader_min_visible_ms: 500,
			log_level: if cfg!(debug_assertions) { "debug" } else { "info" }.to_string(),
			layout: LayoutConfig::default(),
			export: ExportConfig::default(),
		}
	}
}

impl AppConfig {
	pub fn from_json(json: &str) -> AppResult<Self> {
		serde_json::from_str(json).map_err(|e| AppError::Config(e.to_string()))
	}

	/// Read the inline config element, or fall back to defaults when it is absent.
	pub fn load() -> AppResult<Self> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| AppError::Browser("no document".into()))?;
		match document.get_element_by_id(CONFIG_ELEMENT_ID) {
			Some(element) => Self::from_json(&element.text_content().unwrap_or_default()),
			None => Ok(Self::default()),
		}
	}

	/// Log level, `Info` when the configured value is not recognised.
	pub fn log_level(&self) -> Level {
		self.log_level.parse().unwrap_or(Level::Info)
	}
}

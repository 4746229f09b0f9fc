//! Error type shared by every user-triggered action.

use thiserror::Error;

/// Result alias used across the crate.
pub type AppResult<T> = Result<T, AppError>;

/// Everything that can go wrong while searching, annotating, exporting or saving.
///
/// Every variant is terminal for the action that produced it; the UI reports it
/// and the user retries manually.
#[derive(Error, Debug)]
pub enum AppError {
	/// The graph API answered with a non-2xx status.
	#[error("Server API Error: {status}")]
	Http { status: u16 },

	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),

	/// The response body was not a graph document.
	#[error("could not decode graph document: {0}")]
	Decode(String),

	/// A response arrived for a search that has since been superseded.
	#[error("search #{ticket} superseded by #{latest}")]
	StaleResponse { ticket: u64, latest: u64 },

	#[error("no element selected")]
	NothingSelected,

	#[error("an edge is selected, annotations are only stored on nodes")]
	EdgeSelected,

	#[error("no graph loaded")]
	NoGraph,

	/// Browser storage refused the write (quota, private mode, ...).
	#[error("storage error: {0}")]
	Storage(String),

	#[error("serialization error: {0}")]
	Serialize(#[from] serde_json::Error),

	/// A browser API was missing or failed.
	#[error("browser error: {0}")]
	Browser(String),

	#[error("invalid configuration: {0}")]
	Config(String),
}

impl AppError {
	/// Wrap a `JsValue` error thrown by a browser API.
	pub fn browser(err: wasm_bindgen::JsValue) -> Self {
		Self::Browser(format!("{err:?}"))
	}

	/// Text shown to the user in the blocking alert.
	pub fn user_message(&self) -> String {
		match self {
			Self::Http { .. } | Self::Network(_) | Self::Decode(_) => format!(
				"Search failed. Ensure backend is running.\nError: {}",
				self
			),
			Self::NothingSelected | Self::EdgeSelected => {
				"Please select a node to save a note.".to_string()
			}
			Self::NoGraph => "No graph loaded. Perform a search first.".to_string(),
			Self::Storage(_) | Self::Serialize(_) => format!("Error saving graph: {self}"),
			Self::StaleResponse { .. } | Self::Browser(_) | Self::Config(_) => self.to_string(),
		}
	}
}

impl From<gloo_net::Error> for AppError {
	fn from(err: gloo_net::Error) -> Self {
		match err {
			gloo_net::Error::SerdeError(e) => Self::Decode(e.to_string()),
			other => Self::Network(other.to_string()),
		}
	}
}

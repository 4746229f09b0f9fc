//! Markdown report and client-side downloads.

use std::fmt::Write;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::components::force_graph::NodeInfo;
use crate::document::EntityKind;
use crate::error::{AppError, AppResult};

/// Markdown summary of the graph: one entry per non-central node, with its
/// annotation when one is set. Edges are not listed.
pub fn build_report<'a>(query: &str, nodes: impl IntoIterator<Item = &'a NodeInfo>) -> String {
	let mut report = String::from("# OSINT Graph Report\nGenerated by OSINT Graph Explorer\n\n");
	let _ = write!(report, "## Target: {query}\n\n");
	report.push_str("### Nodes Found:\n");
	for node in nodes {
		let fields = &node.fields;
		if fields.kind == EntityKind::Central {
			continue;
		}
		let _ = writeln!(report, "- **{}** ({})", fields.display_label(), fields.kind);
		if let Some(note) = fields.annotation.as_deref().filter(|n| !n.is_empty()) {
			let _ = writeln!(report, "  - Note: {note}");
		}
	}
	report
}

/// `graph_report_<query>.md`, with characters that are unsafe in file names
/// replaced by `_`.
pub fn report_file_name(query: &str) -> String {
	let safe: String = query
		.chars()
		.map(|c| match c {
			'/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
			c if c.is_control() => '_',
			c => c,
		})
		.collect();
	format!("graph_report_{safe}.md")
}

fn click_download(href: &str, file_name: &str) -> AppResult<()> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| AppError::Browser("no document".into()))?;
	let anchor: HtmlAnchorElement = document
		.create_element("a")
		.map_err(AppError::browser)?
		.dyn_into()
		.map_err(|_| AppError::Browser("created element is not an anchor".into()))?;
	anchor.set_href(href);
	anchor.set_download(file_name);
	anchor.click();
	Ok(())
}

/// Offer `text` as a file download.
pub fn download_text(text: &str, mime: &str, file_name: &str) -> AppResult<()> {
	let parts = js_sys::Array::of1(&JsValue::from_str(text));
	let options = BlobPropertyBag::new();
	options.set_type(mime);
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(AppError::browser)?;
	let url = Url::create_object_url_with_blob(&blob).map_err(AppError::browser)?;
	let result = click_download(&url, file_name);
	let _ = Url::revoke_object_url(&url);
	result
}

/// Offer an already encoded `data:` URL as a file download.
pub fn download_data_url(data_url: &str, file_name: &str) -> AppResult<()> {
	click_download(data_url, file_name)
}

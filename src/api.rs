//! Client for the graph search API.

use gloo_net::http::Request;
use log::debug;

use crate::document::GraphDocument;
use crate::error::{AppError, AppResult};

/// Percent-encode `query` into the `q` parameter of `endpoint`.
pub fn search_url(endpoint: &str, query: &str) -> String {
	// form encoding writes spaces as '+' and a literal '+' as %2B
	let encoded = url::form_urlencoded::byte_serialize(query.as_bytes())
		.collect::<String>()
		.replace('+', "%20");
	let sep = if endpoint.contains('?') { '&' } else { '?' };
	format!("{endpoint}{sep}q={encoded}")
}

#[derive(Clone, Debug)]
pub struct GraphClient {
	endpoint: String,
}

impl GraphClient {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
		}
	}

	/// Fetch the graph for `query`. Any non-2xx status is an error.
	pub async fn search(&self, query: &str) -> AppResult<GraphDocument> {
		let url = search_url(&self.endpoint, query);
		debug!("GET {url}");
		let response = Request::get(&url).send().await?;
		if !response.ok() {
			return Err(AppError::Http {
				status: response.status(),
			});
		}
		let body = response.text().await?;
		GraphDocument::from_json(&body).map_err(|e| AppError::Decode(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_is_percent_encoded() {
		assert_eq!(
			search_url("/api/graph", "Jane Doe"),
			"/api/graph?q=Jane%20Doe"
		);
		assert_eq!(
			search_url("/api/graph", "a+b&c=d/é"),
			"/api/graph?q=a%2Bb%26c%3Dd%2F%C3%A9"
		);
	}

	#[test]
	fn existing_query_string_is_extended() {
		assert_eq!(
			search_url("https://osint.example/graph?v=2", "x"),
			"https://osint.example/graph?v=2&q=x"
		);
	}
}

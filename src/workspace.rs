//! The explorer's view-model: which query is active, which document is
//! current, and which search is allowed to replace it.

use crate::document::GraphDocument;
use crate::error::{AppError, AppResult};

/// Identifies one issued search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTicket {
	pub seq: u64,
	pub query: String,
}

/// Owned application state, created once at startup and shared by the page's
/// handlers.
#[derive(Debug, Default)]
pub struct Workspace {
	issued: u64,
	current: Option<(String, GraphDocument)>,
}

impl Workspace {
	pub fn new() -> Self {
		Self::default()
	}

	/// Start a search for `raw`. Returns `None` for blank input, in which case
	/// nothing changes.
	pub fn begin_search(&mut self, raw: &str) -> Option<SearchTicket> {
		let query = raw.trim();
		if query.is_empty() {
			return None;
		}
		self.issued += 1;
		Some(SearchTicket {
			seq: self.issued,
			query: query.to_string(),
		})
	}

	pub fn is_latest(&self, ticket: &SearchTicket) -> bool {
		ticket.seq == self.issued
	}

	/// Make `document` current if `ticket` is still the latest search.
	pub fn accept(&mut self, ticket: SearchTicket, document: GraphDocument) -> AppResult<&GraphDocument> {
		if !self.is_latest(&ticket) {
			return Err(AppError::StaleResponse {
				ticket: ticket.seq,
				latest: self.issued,
			});
		}
		let (_, document) = self.current.insert((ticket.query, document));
		Ok(&*document)
	}

	/// Query of the current graph.
	pub fn query(&self) -> Option<&str> {
		self.current.as_ref().map(|(q, _)| q.as_str())
	}

	pub fn document(&self) -> Option<&GraphDocument> {
		self.current.as_ref().map(|(_, d)| d)
	}

	/// Query of the current graph, or `NoGraph` when nothing has loaded yet.
	pub fn require_graph(&self) -> AppResult<&str> {
		self.query().ok_or(AppError::NoGraph)
	}
}

//! Wire format of the graph API.
//!
//! A search answers with `{ "elements": ... }` where `elements` is either
//! `{ "nodes": [...], "edges": [...] }` or a single flat array mixing both.
//! Each element wraps its fields in a `data` object.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity category of a node, as labelled by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
	/// The searched subject itself.
	Central,
	Person,
	Org,
	/// Geo-political entity (country, city, state).
	Gpe,
	/// Any other label the backend emits, kept verbatim.
	Other(String),
}

impl EntityKind {
	/// Kinds that can be toggled from the filter bar.
	pub const FILTERABLE: [EntityKind; 3] = [EntityKind::Person, EntityKind::Org, EntityKind::Gpe];

	pub fn as_str(&self) -> &str {
		match self {
			Self::Central => "Central",
			Self::Person => "PERSON",
			Self::Org => "ORG",
			Self::Gpe => "GPE",
			Self::Other(label) => label,
		}
	}

	/// Badge and fill colour.
	pub fn color(&self) -> &'static str {
		match self {
			Self::Central | Self::Person => "#00f0ff",
			Self::Org => "#ff0055",
			Self::Gpe => "#00ff9d",
			Self::Other(_) => "#888888",
		}
	}
}

impl Default for EntityKind {
	fn default() -> Self {
		Self::Other(String::new())
	}
}

impl From<String> for EntityKind {
	fn from(label: String) -> Self {
		match label.as_str() {
			"Central" => Self::Central,
			"PERSON" => Self::Person,
			"ORG" => Self::Org,
			"GPE" => Self::Gpe,
			_ => Self::Other(label),
		}
	}
}

impl From<EntityKind> for String {
	fn from(kind: EntityKind) -> Self {
		kind.as_str().to_string()
	}
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Fields of a node element.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeFields {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(rename = "type")]
	pub kind: EntityKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub snippet: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub annotation: Option<String>,
}

impl NodeFields {
	/// Label to draw; falls back to the id when the backend sent none.
	pub fn display_label(&self) -> &str {
		if self.label.is_empty() { &self.id } else { &self.label }
	}
}

/// Fields of an edge element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeFields {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub source: String,
	pub target: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub snippet: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
	pub data: NodeFields,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeElement {
	pub data: EdgeFields,
}

/// Nodes and edges of one search result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementsWire")]
pub struct Elements {
	#[serde(default)]
	pub nodes: Vec<NodeElement>,
	#[serde(default)]
	pub edges: Vec<EdgeElement>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ElementsWire {
	Grouped {
		#[serde(default)]
		nodes: Vec<NodeElement>,
		#[serde(default)]
		edges: Vec<EdgeElement>,
	},
	Flat(Vec<AnyElement>),
}

// Edge first: a node never carries both `source` and `target`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnyElement {
	Edge(EdgeElement),
	Node(NodeElement),
}

impl From<ElementsWire> for Elements {
	fn from(wire: ElementsWire) -> Self {
		match wire {
			ElementsWire::Grouped { nodes, edges } => Self { nodes, edges },
			ElementsWire::Flat(all) => {
				let mut elements = Self::default();
				for element in all {
					match element {
						AnyElement::Edge(e) => elements.edges.push(e),
						AnyElement::Node(n) => elements.nodes.push(n),
					}
				}
				elements
			}
		}
	}
}

/// One search result, replaced wholesale by the next accepted search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
	#[serde(default)]
	pub elements: Elements,
}

impl GraphDocument {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn node_count(&self) -> usize {
		self.elements.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.elements.edges.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_grouped_elements() {
		let doc = GraphDocument::from_json(
			r#"{"elements":{"nodes":[{"data":{"id":"c","label":"Jane Doe","type":"Central"}},
			{"data":{"id":"n1","label":"Acme Corp","type":"ORG"}}],
			"edges":[{"data":{"source":"c","target":"n1","snippet":"works at"}}]}}"#,
		)
		.unwrap();
		assert_eq!(doc.node_count(), 2);
		assert_eq!(doc.edge_count(), 1);
		assert_eq!(doc.elements.nodes[1].data.kind, EntityKind::Org);
		assert_eq!(doc.elements.edges[0].data.snippet.as_deref(), Some("works at"));
	}

	#[test]
	fn decodes_flat_element_array() {
		let doc = GraphDocument::from_json(
			r#"{"elements":[
			{"data":{"id":"Jane","label":"Jane","type":"Central"}},
			{"data":{"id":"Paris","label":"Paris","type":"GPE"}},
			{"data":{"id":"e0","source":"Jane","target":"Paris","label":"MENTIONED_WITH",
			"snippet":"...","url":"https://example.org","title":"t"}}]}"#,
		)
		.unwrap();
		assert_eq!(doc.node_count(), 2);
		assert_eq!(doc.edge_count(), 1);
		assert_eq!(doc.elements.edges[0].data.id.as_deref(), Some("e0"));
		assert_eq!(doc.elements.edges[0].data.url.as_deref(), Some("https://example.org"));
	}

	#[test]
	fn empty_flat_array_is_an_empty_graph() {
		let doc = GraphDocument::from_json(r#"{"elements":[]}"#).unwrap();
		assert_eq!(doc, GraphDocument::default());
	}

	#[test]
	fn unknown_kinds_survive_a_round_trip() {
		let doc = GraphDocument::from_json(
			r#"{"elements":{"nodes":[{"data":{"id":"x","label":"Alps","type":"LOC"}}]}}"#,
		)
		.unwrap();
		let kind = &doc.elements.nodes[0].data.kind;
		assert_eq!(kind, &EntityKind::Other("LOC".into()));
		assert_eq!(kind.color(), "#888888");
		let json = serde_json::to_string(&doc.elements.nodes[0]).unwrap();
		assert!(json.contains(r#""type":"LOC""#));
	}

	#[test]
	fn missing_label_falls_back_to_id() {
		let node: NodeElement =
			serde_json::from_str(r#"{"data":{"id":"n9","type":"PERSON"}}"#).unwrap();
		assert_eq!(node.data.display_label(), "n9");
	}

	#[test]
	fn rejects_non_documents() {
		assert!(GraphDocument::from_json("[1,2,3]").is_err());
	}
}

use force_graph::DefaultNodeIdx;
use serde::{Deserialize, Serialize};

use crate::document::{EdgeFields, EntityKind, NodeFields};

/// Per-node data owned by the surface: the fetched fields plus live edits.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub fields: NodeFields,
	pub hidden: bool,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub fields: EdgeFields,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
}

/// The surface holds at most one selected element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	None,
	Node(DefaultNodeIdx),
	/// Index into the surface's edge list.
	Edge(usize),
}

/// What the details panel shows for the selected element.
#[derive(Clone, Debug, PartialEq)]
pub enum Details {
	Node {
		id: String,
		label: String,
		kind: EntityKind,
		snippet: Option<String>,
		annotation: Option<String>,
	},
	Edge {
		source: String,
		target: String,
		snippet: Option<String>,
		url: Option<String>,
	},
}

/// Emitted by the canvas when a pointer press ends without dragging.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
	Selected(Details),
	BackgroundTapped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
	pub data: NodeFields,
	pub position: Point,
	pub selected: bool,
	pub hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
	pub data: EdgeFields,
	pub selected: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotElements {
	pub nodes: Vec<NodeSnapshot>,
	pub edges: Vec<EdgeSnapshot>,
}

/// Serialized surface state: data, annotations, layout and viewport.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
	pub query: String,
	pub elements: SnapshotElements,
	pub zoom: f64,
	pub pan: Point,
}

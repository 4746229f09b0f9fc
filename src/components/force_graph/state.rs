use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};

use super::types::{
	Details, EdgeInfo, EdgeSnapshot, GraphSnapshot, NodeInfo, NodeSnapshot, Point, Selection,
	SnapshotElements, SurfaceEvent,
};
use crate::config::LayoutConfig;
use crate::document::{EntityKind, GraphDocument};
use crate::error::{AppError, AppResult};

pub const CENTRAL_RADIUS: f64 = 14.0;
pub const NODE_RADIUS: f64 = 8.0;
/// Extra world-space slack around a node when hit testing.
pub const HIT_PADDING: f64 = 4.0;
/// Screen-space distance under which a pointer is on an edge.
pub const EDGE_HIT_DISTANCE: f64 = 5.0;
/// A press that moves less than this many pixels is a tap.
pub const TAP_SLOP: f64 = 4.0;
pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 3.0;
pub const FRAME_DT: f32 = 0.016;

pub fn node_radius(kind: &EntityKind) -> f64 {
	match kind {
		EntityKind::Central => CENTRAL_RADIUS,
		_ => NODE_RADIUS,
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Where the current press started and whether it has turned into a drag.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub x: f64,
	pub y: f64,
	pub moved: bool,
}

/// Retained state of the render surface: element data, positions, selection
/// and viewport.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub press: Option<PressState>,
	pub selection: Selection,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	layout: LayoutConfig,
	nodes: Vec<DefaultNodeIdx>,
	edges: Vec<EdgeInfo>,
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		let layout = LayoutConfig::default();
		Self {
			graph: ForceGraph::new(simulation_parameters(&layout)),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			press: None,
			selection: Selection::None,
			width,
			height,
			animation_running: true,
			layout,
			nodes: Vec::new(),
			edges: Vec::new(),
		}
	}

	/// Replace every element with the contents of `doc` and re-run the layout.
	///
	/// Returns the number of nodes and edges now on the surface. Duplicate node
	/// ids and edges with a missing endpoint are skipped.
	pub fn load(&mut self, doc: &GraphDocument, layout: &LayoutConfig) -> (usize, usize) {
		self.layout = layout.clone();
		self.clear();

		let ring = doc
			.elements
			.nodes
			.iter()
			.filter(|n| n.data.kind != EntityKind::Central)
			.count()
			.max(1);
		let mut id_to_idx = HashMap::new();
		let mut slot = 0usize;

		for node in &doc.elements.nodes {
			if id_to_idx.contains_key(&node.data.id) {
				warn!("duplicate node id {:?} ignored", node.data.id);
				continue;
			}
			let central = node.data.kind == EntityKind::Central;
			let (x, y) = if central {
				(0.0, 0.0)
			} else {
				let angle = (slot as f64) * 2.0 * PI / ring as f64;
				slot += 1;
				let r = layout.ideal_edge_length as f64;
				((r * angle.cos()) as f32, (r * angle.sin()) as f32)
			};

			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: if central { 30.0 } else { 10.0 },
				is_anchor: central,
				user_data: NodeInfo {
					fields: node.data.clone(),
					hidden: false,
				},
			});
			id_to_idx.insert(node.data.id.clone(), idx);
			self.nodes.push(idx);
		}

		for edge in &doc.elements.edges {
			let (Some(&source), Some(&target)) =
				(id_to_idx.get(&edge.data.source), id_to_idx.get(&edge.data.target))
			else {
				warn!(
					"edge {} -> {} references a missing node, dropped",
					edge.data.source, edge.data.target
				);
				continue;
			};
			// The simulation cannot integrate a node against itself; loops are drawn only.
			if source != target {
				self.graph.add_edge(source, target, EdgeData::default());
			}
			self.edges.push(EdgeInfo {
				fields: edge.data.clone(),
				source,
				target,
			});
		}

		for _ in 0..layout.warmup_iterations {
			self.graph.update(FRAME_DT);
		}
		self.transform = ViewTransform {
			x: self.width / 2.0,
			y: self.height / 2.0,
			k: 1.0,
		};
		self.animation_running = true;
		debug!(
			"surface loaded {} nodes, {} edges",
			self.nodes.len(),
			self.edges.len()
		);
		(self.nodes.len(), self.edges.len())
	}

	/// Remove every element.
	pub fn clear(&mut self) {
		self.graph = ForceGraph::new(simulation_parameters(&self.layout));
		self.nodes.clear();
		self.edges.clear();
		self.selection = Selection::None;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.press = None;
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn edges(&self) -> &[EdgeInfo] {
		&self.edges
	}

	/// Node data in load order.
	pub fn nodes(&self) -> Vec<NodeInfo> {
		let mut by_idx = HashMap::with_capacity(self.nodes.len());
		self.graph.visit_nodes(|node| {
			by_idx.insert(node.index(), node.data.user_data.clone());
		});
		self.nodes
			.iter()
			.filter_map(|idx| by_idx.remove(idx))
			.collect()
	}

	pub fn node_index(&self, id: &str) -> Option<DefaultNodeIdx> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.data.user_data.fields.id == id {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node(&self, idx: DefaultNodeIdx) -> Option<NodeInfo> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.clone());
			}
		});
		found
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::with_capacity(self.nodes.len());
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	fn hidden_nodes(&self) -> Vec<DefaultNodeIdx> {
		let mut hidden = Vec::new();
		self.graph.visit_nodes(|node| {
			if node.data.user_data.hidden {
				hidden.push(node.index());
			}
		});
		hidden
	}

	/// Show or hide every node of `kind`. Data is left untouched; edges touching
	/// a hidden node are hidden with it. Returns the number of nodes affected.
	pub fn set_kind_visible(&mut self, kind: &EntityKind, visible: bool) -> usize {
		let mut affected = 0;
		self.graph.visit_nodes_mut(|node| {
			if &node.data.user_data.fields.kind == kind {
				node.data.user_data.hidden = !visible;
				affected += 1;
			}
		});
		if !visible {
			let hidden = self.hidden_nodes();
			let selection_hidden = match self.selection {
				Selection::Node(idx) => hidden.contains(&idx),
				Selection::Edge(i) => self
					.edges
					.get(i)
					.is_some_and(|e| hidden.contains(&e.source) || hidden.contains(&e.target)),
				Selection::None => false,
			};
			if selection_hidden {
				self.selection = Selection::None;
			}
		}
		affected
	}

	/// Edge indices whose endpoints are both visible.
	pub fn visible_edges(&self) -> Vec<usize> {
		let hidden = self.hidden_nodes();
		self.edges
			.iter()
			.enumerate()
			.filter(|(_, e)| !hidden.contains(&e.source) && !hidden.contains(&e.target))
			.map(|(i, _)| i)
			.collect()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if info.hidden {
				return;
			}
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node_radius(&info.fields.kind) + HIT_PADDING {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		let limit = EDGE_HIT_DISTANCE / self.transform.k;
		self.visible_edges()
			.into_iter()
			.filter_map(|i| {
				let edge = &self.edges[i];
				let (a, b) = (positions.get(&edge.source)?, positions.get(&edge.target)?);
				Some((i, segment_distance((gx, gy), *a, *b)))
			})
			.filter(|&(_, d)| d < limit)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	pub fn details(&self, selection: Selection) -> Option<Details> {
		match selection {
			Selection::None => None,
			Selection::Node(idx) => self.node(idx).map(|info| Details::Node {
				id: info.fields.id.clone(),
				label: info.fields.display_label().to_string(),
				kind: info.fields.kind,
				snippet: info.fields.snippet,
				annotation: info.fields.annotation,
			}),
			Selection::Edge(i) => self.edges.get(i).map(|edge| Details::Edge {
				source: edge.fields.source.clone(),
				target: edge.fields.target.clone(),
				snippet: edge.fields.snippet.clone(),
				url: edge.fields.url.clone(),
			}),
		}
	}

	/// Select whatever lies under the screen point; a miss clears the selection.
	pub fn tap(&mut self, sx: f64, sy: f64) -> SurfaceEvent {
		self.selection = if let Some(idx) = self.node_at_position(sx, sy) {
			Selection::Node(idx)
		} else if let Some(i) = self.edge_at_position(sx, sy) {
			Selection::Edge(i)
		} else {
			Selection::None
		};
		match self.details(self.selection) {
			Some(details) => SurfaceEvent::Selected(details),
			None => SurfaceEvent::BackgroundTapped,
		}
	}

	/// Store `text` on the selected node's live data. Returns the node id.
	pub fn annotate_selected(&mut self, text: &str) -> AppResult<String> {
		let idx = match self.selection {
			Selection::Node(idx) => idx,
			Selection::Edge(_) => return Err(AppError::EdgeSelected),
			Selection::None => return Err(AppError::NothingSelected),
		};
		let mut annotated = None;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.user_data.fields.annotation = Some(text.to_string());
				annotated = Some(node.data.user_data.fields.id.clone());
			}
		});
		annotated.ok_or(AppError::NothingSelected)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.press = Some(PressState { x, y, moved: false });
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					self.drag.node_start_x = node.x();
					self.drag.node_start_y = node.y();
				}
			});
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if let Some(press) = self.press.as_mut() {
			if (x - press.x).hypot(y - press.y) >= TAP_SLOP {
				press.moved = true;
			}
		}
		if self.press.as_ref().is_some_and(|p| !p.moved) {
			return;
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// End the press; a press that never moved is reported as a tap.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<SurfaceEvent> {
		let press = self.press.take();
		self.drag = DragState::default();
		self.pan.active = false;
		match press {
			Some(p) if !p.moved => Some(self.tap(x, y)),
			_ => None,
		}
	}

	pub fn pointer_leave(&mut self) {
		self.press = None;
		self.drag = DragState::default();
		self.pan.active = false;
	}

	/// Zoom by `factor` keeping the screen point (x, y) fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// World-space bounding box of the visible nodes, `None` when nothing is shown.
	pub fn graph_bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if info.hidden {
				return;
			}
			let r = node_radius(&info.fields.kind);
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x - r, y - r, x + r, y + r),
				Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
			});
		});
		bounds
	}

	pub fn snapshot(&self, query: &str) -> GraphSnapshot {
		let positions = self.positions();
		let nodes = self
			.nodes
			.iter()
			.zip(self.nodes())
			.map(|(idx, info)| {
				let (x, y) = positions.get(idx).copied().unwrap_or_default();
				NodeSnapshot {
					data: info.fields,
					position: Point { x, y },
					selected: self.selection == Selection::Node(*idx),
					hidden: info.hidden,
				}
			})
			.collect();
		let edges = self
			.edges
			.iter()
			.enumerate()
			.map(|(i, edge)| EdgeSnapshot {
				data: edge.fields.clone(),
				selected: self.selection == Selection::Edge(i),
			})
			.collect();
		GraphSnapshot {
			query: query.to_string(),
			elements: SnapshotElements { nodes, edges },
			zoom: self.transform.k,
			pan: Point {
				x: self.transform.x,
				y: self.transform.y,
			},
		}
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn simulation_parameters(layout: &LayoutConfig) -> SimulationParameters {
	SimulationParameters {
		force_charge: layout.force_charge,
		force_spring: layout.force_spring,
		force_max: layout.force_max,
		node_speed: layout.node_speed,
		damping_factor: layout.damping_factor,
	}
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let len2 = abx * abx + aby * aby;
	if len2 < f64::EPSILON {
		return (p.0 - a.0).hypot(p.1 - a.1);
	}
	let t = (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len2).clamp(0.0, 1.0);
	(p.0 - (a.0 + t * abx)).hypot(p.1 - (a.1 + t * aby))
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	const JANE_DOE: &str = r#"{"elements":{"nodes":[
		{"data":{"id":"c","label":"Jane Doe","type":"Central"}},
		{"data":{"id":"n1","label":"Acme Corp","type":"ORG"}}],
		"edges":[{"data":{"source":"c","target":"n1","snippet":"works at"}}]}}"#;

	/// Load without warm-up so nodes sit exactly on the initial ring.
	fn loaded(json: &str) -> ForceGraphState {
		let mut state = ForceGraphState::new(800.0, 600.0);
		let doc = GraphDocument::from_json(json).unwrap();
		let layout = LayoutConfig {
			warmup_iterations: 0,
			..LayoutConfig::default()
		};
		state.load(&doc, &layout);
		state
	}

	/// Screen coordinates of a node's centre.
	fn screen_pos(state: &ForceGraphState, id: &str) -> (f64, f64) {
		let idx = state.node_index(id).unwrap();
		let (x, y) = state.positions()[&idx];
		(
			x * state.transform.k + state.transform.x,
			y * state.transform.k + state.transform.y,
		)
	}

	fn mixed_graph() -> ForceGraphState {
		loaded(
			r#"{"elements":{"nodes":[
			{"data":{"id":"c","label":"Jane","type":"Central"}},
			{"data":{"id":"p","label":"John","type":"PERSON","snippet":"met John"}},
			{"data":{"id":"o","label":"Acme","type":"ORG","annotation":"employer"}},
			{"data":{"id":"g","label":"Paris","type":"GPE"}}],
			"edges":[{"data":{"source":"c","target":"p"}},{"data":{"source":"c","target":"o"}},
			{"data":{"source":"c","target":"g","url":"https://example.org"}}]}}"#,
		)
	}

	#[test]
	fn load_counts_every_element() {
		let state = loaded(JANE_DOE);
		assert_eq!(state.node_count(), 2);
		assert_eq!(state.edge_count(), 1);
		assert_eq!(state.nodes()[1].fields.label, "Acme Corp");
	}

	#[test]
	fn load_replaces_previous_elements() {
		let mut state = mixed_graph();
		state.selection = Selection::Node(state.node_index("p").unwrap());
		let counts = state.load(&GraphDocument::from_json(JANE_DOE).unwrap(), &LayoutConfig::default());
		assert_eq!(counts, (2, 1));
		assert_eq!(state.selection, Selection::None);
		assert!(state.node_index("p").is_none());
	}

	#[test]
	fn warmup_keeps_the_central_node_anchored() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.load(&GraphDocument::from_json(JANE_DOE).unwrap(), &LayoutConfig::default());
		let c = state.node_index("c").unwrap();
		assert_eq!(state.positions()[&c], (0.0, 0.0));
	}

	#[test]
	fn self_loops_are_kept_and_survive_the_simulation() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		let doc = GraphDocument::from_json(
			r#"{"elements":{"nodes":[
			{"data":{"id":"c","label":"Jane","type":"Central"}},
			{"data":{"id":"p","label":"John","type":"PERSON"}}],
			"edges":[{"data":{"source":"p","target":"p","snippet":"alias of"}}]}}"#,
		)
		.unwrap();
		assert_eq!(state.load(&doc, &LayoutConfig::default()), (2, 1));
		for _ in 0..10 {
			state.tick(FRAME_DT);
		}
		let p = state.node_index("p").unwrap();
		assert_eq!((state.edges()[0].source, state.edges()[0].target), (p, p));
		assert_eq!(state.visible_edges(), vec![0]);
		let (x, y) = state.positions()[&p];
		assert!(x.is_finite() && y.is_finite());
	}

	#[test]
	fn dangling_edges_and_duplicate_ids_are_skipped() {
		let state = loaded(
			r#"{"elements":{"nodes":[
			{"data":{"id":"a","label":"A","type":"Central"}},
			{"data":{"id":"a","label":"A again","type":"PERSON"}}],
			"edges":[{"data":{"source":"a","target":"ghost"}}]}}"#,
		);
		assert_eq!(state.node_count(), 1);
		assert_eq!(state.edge_count(), 0);
		assert_eq!(state.nodes()[0].fields.label, "A");
	}

	#[test]
	fn tapping_a_node_selects_it() {
		let mut state = mixed_graph();
		let (x, y) = screen_pos(&state, "p");
		let event = state.tap(x, y);
		assert_eq!(
			event,
			SurfaceEvent::Selected(Details::Node {
				id: "p".into(),
				label: "John".into(),
				kind: EntityKind::Person,
				snippet: Some("met John".into()),
				annotation: None,
			})
		);
		assert_eq!(state.selection, Selection::Node(state.node_index("p").unwrap()));
	}

	#[test]
	fn tapping_an_edge_midpoint_selects_the_edge() {
		let mut state = mixed_graph();
		let (ax, ay) = screen_pos(&state, "c");
		let (bx, by) = screen_pos(&state, "g");
		let event = state.tap((ax + bx) / 2.0, (ay + by) / 2.0);
		match event {
			SurfaceEvent::Selected(Details::Edge { source, target, url, .. }) => {
				assert_eq!(source, "c");
				assert_eq!(target, "g");
				assert_eq!(url.as_deref(), Some("https://example.org"));
			}
			other => panic!("expected edge details, got {other:?}"),
		}
	}

	#[test]
	fn tapping_the_background_clears_selection() {
		let mut state = mixed_graph();
		let (x, y) = screen_pos(&state, "o");
		state.tap(x, y);
		assert_eq!(state.tap(-10_000.0, -10_000.0), SurfaceEvent::BackgroundTapped);
		assert_eq!(state.selection, Selection::None);
	}

	#[test]
	fn drag_is_not_a_tap() {
		let mut state = mixed_graph();
		let (x, y) = screen_pos(&state, "p");
		state.pointer_down(x, y);
		state.pointer_move(x + 40.0, y + 40.0);
		assert!(state.pointer_up(x + 40.0, y + 40.0).is_none());
		assert_eq!(state.selection, Selection::None);

		state.pointer_down(x + 40.0, y + 40.0);
		state.pointer_move(x + 41.0, y + 40.0);
		assert!(matches!(
			state.pointer_up(x + 41.0, y + 40.0),
			Some(SurfaceEvent::Selected(Details::Node { .. }))
		));
	}

	#[test]
	fn background_drag_pans() {
		let mut state = mixed_graph();
		let (tx, ty) = (state.transform.x, state.transform.y);
		state.pointer_down(5.0, 5.0);
		state.pointer_move(55.0, 25.0);
		state.pointer_up(55.0, 25.0);
		assert_eq!(state.transform.x, tx + 50.0);
		assert_eq!(state.transform.y, ty + 20.0);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = ForceGraphState::new(100.0, 100.0);
		for _ in 0..50 {
			state.zoom_at(50.0, 50.0, 1.1);
		}
		assert_eq!(state.transform.k, MAX_ZOOM);
		for _ in 0..100 {
			state.zoom_at(50.0, 50.0, 0.9);
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn annotate_without_selection_changes_nothing() {
		let mut state = mixed_graph();
		let before = state.nodes();
		assert!(matches!(state.annotate_selected("x"), Err(AppError::NothingSelected)));
		assert_eq!(
			state.nodes().iter().map(|n| n.fields.annotation.clone()).collect::<Vec<_>>(),
			before.iter().map(|n| n.fields.annotation.clone()).collect::<Vec<_>>()
		);
	}

	#[test]
	fn annotate_with_an_edge_selected_is_rejected() {
		let mut state = mixed_graph();
		state.selection = Selection::Edge(0);
		assert!(matches!(state.annotate_selected("x"), Err(AppError::EdgeSelected)));
		assert!(state.edges()[0].fields.snippet.is_none());
	}

	#[test]
	fn annotate_touches_only_the_selected_node() {
		let mut state = mixed_graph();
		state.selection = Selection::Node(state.node_index("p").unwrap());
		assert_eq!(state.annotate_selected("board member").unwrap(), "p");
		let annotations: Vec<_> = state
			.nodes()
			.into_iter()
			.map(|n| (n.fields.id, n.fields.annotation))
			.collect();
		assert_eq!(
			annotations,
			vec![
				("c".to_string(), None),
				("p".to_string(), Some("board member".to_string())),
				("o".to_string(), Some("employer".to_string())),
				("g".to_string(), None),
			]
		);
	}

	#[test]
	fn hidden_nodes_cannot_be_tapped_and_hide_their_edges() {
		let mut state = mixed_graph();
		let (x, y) = screen_pos(&state, "o");
		state.tap(x, y);
		assert_eq!(state.set_kind_visible(&EntityKind::Org, false), 1);
		assert_eq!(state.selection, Selection::None);
		assert_eq!(state.visible_edges(), vec![0, 2]);
		assert_ne!(state.node_at_position(x, y), state.node_index("o"));

		state.set_kind_visible(&EntityKind::Org, true);
		assert_eq!(state.visible_edges(), vec![0, 1, 2]);
		assert_eq!(state.node_at_position(x, y), state.node_index("o"));
	}

	#[test]
	fn snapshot_captures_annotations_layout_and_selection() {
		let mut state = mixed_graph();
		state.selection = Selection::Node(state.node_index("g").unwrap());
		state.annotate_selected("capital").unwrap();
		state.set_kind_visible(&EntityKind::Person, false);

		let snapshot = state.snapshot("Jane");
		assert_eq!(snapshot.query, "Jane");
		assert_eq!(snapshot.elements.nodes.len(), 4);
		assert_eq!(snapshot.elements.edges.len(), 3);
		let g = &snapshot.elements.nodes[3];
		assert!(g.selected);
		assert_eq!(g.data.annotation.as_deref(), Some("capital"));
		assert!(snapshot.elements.nodes[1].hidden);
		assert_eq!(snapshot.elements.nodes[0].position, Point { x: 0.0, y: 0.0 });
		assert_eq!(snapshot.zoom, 1.0);
	}

	#[test]
	fn bounds_cover_visible_nodes_only() {
		let state = loaded(r#"{"elements":{"nodes":[{"data":{"id":"c","label":"c","type":"Central"}}]}}"#);
		assert_eq!(
			state.graph_bounds(),
			Some((-CENTRAL_RADIUS, -CENTRAL_RADIUS, CENTRAL_RADIUS, CENTRAL_RADIUS))
		);
		let mut empty = ForceGraphState::new(10.0, 10.0);
		assert!(empty.graph_bounds().is_none());
		empty.clear();
		assert_eq!(empty.node_count(), 0);
	}

	#[test]
	fn segment_distance_clamps_to_endpoints() {
		assert_eq!(segment_distance((0.0, 5.0), (-10.0, 0.0), (10.0, 0.0)), 5.0);
		assert_eq!(segment_distance((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
	}

	proptest! {
		#[test]
		fn filtering_never_alters_node_data(hide_mask in proptest::collection::vec(any::<bool>(), 3)) {
			let mut state = mixed_graph();
			let before: Vec<_> = state.nodes().into_iter().map(|n| n.fields).collect();
			for (kind, hide) in EntityKind::FILTERABLE.iter().zip(&hide_mask) {
				state.set_kind_visible(kind, !hide);
			}
			for info in state.nodes() {
				let hidden_kind = EntityKind::FILTERABLE
					.iter()
					.zip(&hide_mask)
					.any(|(k, hide)| *hide && *k == info.fields.kind);
				prop_assert_eq!(info.hidden, hidden_kind);
			}
			for kind in &EntityKind::FILTERABLE {
				state.set_kind_visible(kind, true);
			}
			let after: Vec<_> = state.nodes().into_iter().map(|n| n.fields).collect();
			prop_assert_eq!(before, after);
			prop_assert!(state.nodes().iter().all(|n| !n.hidden));
		}
	}
}

//! End-to-end flows over the view-model, the render surface and the exporters,
//! without a browser.

use std::rc::Rc;

use osint_graph_explorer::AppError;
use osint_graph_explorer::components::force_graph::{ForceGraphState, Selection, SurfaceEvent};
use osint_graph_explorer::config::LayoutConfig;
use osint_graph_explorer::document::{EntityKind, GraphDocument};
use osint_graph_explorer::export::{build_report, report_file_name};
use osint_graph_explorer::persistence::{LocalSnapshotStore, MemoryStorage};
use osint_graph_explorer::workspace::Workspace;

const JANE_DOE: &str = r#"{"elements":{"nodes":[
	{"data":{"id":"c","label":"Jane Doe","type":"Central"}},
	{"data":{"id":"n1","label":"Acme Corp","type":"ORG"}}],
	"edges":[{"data":{"source":"c","target":"n1","snippet":"works at"}}]}}"#;

fn layout() -> LayoutConfig {
	LayoutConfig {
		warmup_iterations: 20,
		..LayoutConfig::default()
	}
}

fn search(ws: &mut Workspace, surface: &mut ForceGraphState, query: &str, body: &str) -> (usize, usize) {
	let ticket = ws.begin_search(query).expect("non-empty query");
	let doc = GraphDocument::from_json(body).unwrap();
	let doc = ws.accept(ticket, doc).unwrap();
	surface.load(doc, &layout())
}

#[test]
fn jane_doe_scenario() {
	let mut ws = Workspace::new();
	let mut surface = ForceGraphState::new(1024.0, 768.0);

	assert_eq!(search(&mut ws, &mut surface, "Jane Doe", JANE_DOE), (2, 1));
	assert_eq!(surface.node_count(), 2);
	assert_eq!(surface.edge_count(), 1);

	let report = build_report(ws.require_graph().unwrap(), &surface.nodes());
	assert!(report.contains("## Target: Jane Doe"));
	assert!(report.contains("- **Acme Corp** (ORG)"));
	assert!(!report.contains("**Jane Doe**"));
	assert_eq!(report_file_name(ws.require_graph().unwrap()), "graph_report_Jane Doe.md");
}

#[test]
fn counts_follow_the_response() {
	let nodes: Vec<String> = (0..12)
		.map(|i| {
			let kind = if i == 0 { "Central" } else { ["PERSON", "ORG", "GPE"][i % 3] };
			format!(r#"{{"data":{{"id":"n{i}","label":"N{i}","type":"{kind}"}}}}"#)
		})
		.collect();
	let edges: Vec<String> = (1..12)
		.map(|i| format!(r#"{{"data":{{"source":"n0","target":"n{i}"}}}}"#))
		.collect();
	let body = format!(
		r#"{{"elements":{{"nodes":[{}],"edges":[{}]}}}}"#,
		nodes.join(","),
		edges.join(",")
	);

	let mut ws = Workspace::new();
	let mut surface = ForceGraphState::new(800.0, 600.0);
	assert_eq!(search(&mut ws, &mut surface, "many", &body), (12, 11));
	assert_eq!(search(&mut ws, &mut surface, "Jane Doe", JANE_DOE), (2, 1));
}

#[test]
fn blank_search_changes_nothing() {
	let mut ws = Workspace::new();
	let mut surface = ForceGraphState::new(800.0, 600.0);
	search(&mut ws, &mut surface, "Jane Doe", JANE_DOE);

	assert!(ws.begin_search("   ").is_none());
	assert_eq!(ws.query(), Some("Jane Doe"));
	assert_eq!(surface.node_count(), 2);
}

#[test]
fn stale_response_leaves_the_newer_graph() {
	let mut ws = Workspace::new();
	let mut surface = ForceGraphState::new(800.0, 600.0);
	let slow = ws.begin_search("slow").unwrap();
	search(&mut ws, &mut surface, "Jane Doe", JANE_DOE);

	let late = ws.accept(slow, GraphDocument::default());
	assert!(matches!(late, Err(AppError::StaleResponse { .. })));
	assert_eq!(ws.query(), Some("Jane Doe"));
	assert_eq!(surface.node_count(), 2);
}

#[test]
fn failed_search_keeps_the_previous_graph() {
	let mut ws = Workspace::new();
	let mut surface = ForceGraphState::new(800.0, 600.0);
	search(&mut ws, &mut surface, "Jane Doe", JANE_DOE);

	// HTTP, network and decode failures never reach `accept`.
	let failed = ws.begin_search("other").unwrap();
	assert!(GraphDocument::from_json("<html>502</html>").is_err());

	assert!(ws.is_latest(&failed));
	assert_eq!((surface.node_count(), surface.edge_count()), (2, 1));
	assert_eq!(ws.query(), Some("Jane Doe"));
	assert_eq!(ws.require_graph().unwrap(), "Jane Doe");
	assert_eq!(ws.document().unwrap().node_count(), 2);
}

#[test]
fn export_without_graph_fails() {
	let ws = Workspace::new();
	assert!(matches!(ws.require_graph(), Err(AppError::NoGraph)));
}

#[test]
fn annotations_reach_the_report_and_the_snapshot() {
	let mut ws = Workspace::new();
	let mut surface = ForceGraphState::new(800.0, 600.0);
	search(&mut ws, &mut surface, "Jane Doe", JANE_DOE);

	assert!(matches!(surface.annotate_selected("x"), Err(AppError::NothingSelected)));
	surface.selection = Selection::Node(surface.node_index("n1").unwrap());
	surface.annotate_selected("Supplier since 2020").unwrap();

	let report = build_report("Jane Doe", &surface.nodes());
	assert!(report.contains("- **Acme Corp** (ORG)\n  - Note: Supplier since 2020\n"));

	let storage = Rc::new(MemoryStorage::default());
	let store = LocalSnapshotStore::new(storage);
	store.save("Jane Doe", &surface.snapshot("Jane Doe")).unwrap();
	let saved = store.load("Jane Doe").unwrap().unwrap();
	assert_eq!(
		saved.elements.nodes[1].data.annotation.as_deref(),
		Some("Supplier since 2020")
	);
	// The fetched document itself is untouched.
	assert!(ws.document().unwrap().elements.nodes[1].data.annotation.is_none());
}

#[test]
fn filter_round_trip_keeps_data() {
	let mut ws = Workspace::new();
	let mut surface = ForceGraphState::new(800.0, 600.0);
	search(&mut ws, &mut surface, "Jane Doe", JANE_DOE);
	let before = surface.snapshot("Jane Doe");

	assert_eq!(surface.set_kind_visible(&EntityKind::Org, false), 1);
	assert!(surface.visible_edges().is_empty());
	assert!(surface.nodes()[1].hidden);
	assert!(!surface.nodes()[0].hidden);

	surface.set_kind_visible(&EntityKind::Org, true);
	let after = surface.snapshot("Jane Doe");
	assert_eq!(
		before.elements.nodes.iter().map(|n| &n.data).collect::<Vec<_>>(),
		after.elements.nodes.iter().map(|n| &n.data).collect::<Vec<_>>()
	);
	assert_eq!(surface.visible_edges(), vec![0]);
}

#[test]
fn background_tap_reports_background() {
	let mut surface = ForceGraphState::new(800.0, 600.0);
	assert_eq!(surface.tap(1.0, 1.0), SurfaceEvent::BackgroundTapped);
}

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, info};

use crate::api::GraphClient;
use crate::components::details_panel::DetailsPanel;
use crate::components::force_graph::{
	Details, ForceGraphCanvas, Selection, SurfaceEvent, SurfaceHandle, rasterize_png,
};
use crate::components::toolbar::Toolbar;
use crate::config::AppConfig;
use crate::document::EntityKind;
use crate::error::AppError;
use crate::export::{build_report, download_data_url, download_text, report_file_name};
use crate::notify;
use crate::persistence::SnapshotStore;
use crate::workspace::Workspace;

const SAVED_FLASH: Duration = Duration::from_millis(1500);

/// The graph explorer: search, inspect, annotate, filter, export and save.
#[component]
pub fn Explorer() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let surface = SurfaceHandle::new();
	let workspace = Rc::new(RefCell::new(Workspace::new()));
	let client = GraphClient::new(config.api_endpoint.clone());
	let store = SnapshotStore::from_config(&config.persistence);

	let query = RwSignal::new(String::new());
	let note = RwSignal::new(String::new());
	let (loading, set_loading) = signal(false);
	let (counts, set_counts) = signal((0usize, 0usize));
	let (details, set_details) = signal(None::<Details>);
	let (panel_open, set_panel_open) = signal(false);
	let (note_saved, set_note_saved) = signal(false);

	let on_surface_event = Callback::new(move |event: SurfaceEvent| match event {
		SurfaceEvent::Selected(selected) => {
			note.set(match &selected {
				Details::Node { annotation, .. } => annotation.clone().unwrap_or_default(),
				Details::Edge { .. } => String::new(),
			});
			set_details.set(Some(selected));
			set_panel_open.set(true);
		}
		SurfaceEvent::BackgroundTapped => {
			set_details.set(None);
			set_panel_open.set(false);
		}
	});

	let perform_search = {
		let (surface, workspace) = (surface.clone(), workspace.clone());
		let layout = config.layout.clone();
		let min_visible = config.loader_min_visible_ms as f64;
		UnsyncCallback::new(move |_: ()| {
			let Some(ticket) = workspace.borrow_mut().begin_search(&query.get_untracked()) else {
				return;
			};
			set_loading.set(true);
			let started = js_sys::Date::now();
			let (surface, workspace, client, layout) =
				(surface.clone(), workspace.clone(), client.clone(), layout.clone());

			wasm_bindgen_futures::spawn_local(async move {
				info!("search #{} for {:?}", ticket.seq, ticket.query);
				let result = client.search(&ticket.query).await;
				let latest = workspace.borrow().is_latest(&ticket);

				// The surface is only replaced once a response is decoded and current.
				let pending = ticket.clone();
				let outcome = result.and_then(|doc| {
					let mut ws = workspace.borrow_mut();
					let doc = ws.accept(ticket, doc)?;
					Ok(surface.with_mut(|s| s.load(doc, &layout)))
				});
				match outcome {
					Ok((nodes, edges)) => {
						set_counts.set((nodes, edges));
						set_details.set(None);
						set_panel_open.set(false);
					}
					Err(err @ AppError::StaleResponse { .. }) => debug!("{err}, response dropped"),
					Err(err) if latest => notify::report(&err),
					Err(err) => debug!("superseded search failed: {err}"),
				}

				if latest {
					let remaining = (min_visible - (js_sys::Date::now() - started)).max(0.0);
					// A newer search may have started while the timer was pending.
					set_timeout(
						move || {
							if workspace.borrow().is_latest(&pending) {
								set_loading.set(false);
							}
						},
						Duration::from_millis(remaining as u64),
					);
				}
			});
		})
	};

	let filter_graph = {
		let surface = surface.clone();
		UnsyncCallback::new(move |(kind, visible): (EntityKind, bool)| {
			let affected = surface.with_mut(|s| s.set_kind_visible(&kind, visible));
			debug!("{} {affected} {kind} node(s)", if visible { "showing" } else { "hiding" });
			if surface.with(|s| s.selection == Selection::None) && details.get_untracked().is_some() {
				set_details.set(None);
				set_panel_open.set(false);
			}
		})
	};

	let save_annotation = {
		let surface = surface.clone();
		UnsyncCallback::new(move |_: ()| {
			let text = note.get_untracked();
			match surface.with_mut(|s| s.annotate_selected(&text)) {
				Ok(id) => {
					debug!("annotated {id}");
					set_details.update(|d| {
						if let Some(Details::Node { annotation, .. }) = d {
							*annotation = Some(text);
						}
					});
					set_note_saved.set(true);
					set_timeout(move || set_note_saved.set(false), SAVED_FLASH);
				}
				Err(err) => notify::report(&err),
			}
		})
	};

	let close_details = UnsyncCallback::new(move |_: ()| set_panel_open.set(false));

	let export_report = {
		let (surface, workspace) = (surface.clone(), workspace.clone());
		UnsyncCallback::new(move |_: ()| {
			let query = match workspace.borrow().require_graph() {
				Ok(q) => q.to_string(),
				Err(err) => return notify::report(&err),
			};
			let nodes = surface.with(|s| s.nodes());
			let report = build_report(&query, &nodes);
			if let Err(err) = download_text(&report, "text/markdown", &report_file_name(&query)) {
				notify::report(&err);
			}
		})
	};

	let export_image = {
		let surface = surface.clone();
		let export = config.export.clone();
		UnsyncCallback::new(move |_: ()| {
			let result = surface
				.with(|s| rasterize_png(s, export.image_scale, &export.background))
				.and_then(|png| download_data_url(&png, &export.image_file_name));
			if let Err(err) = result {
				notify::report(&err);
			}
		})
	};

	let save_to_cloud = {
		let (surface, workspace) = (surface.clone(), workspace.clone());
		UnsyncCallback::new(move |_: ()| {
			let query = match workspace.borrow().require_graph() {
				Ok(q) => q.to_string(),
				Err(err) => return notify::report(&err),
			};
			let snapshot = surface.with(|s| s.snapshot(&query));
			let store = store.clone();
			wasm_bindgen_futures::spawn_local(async move {
				match store.save_graph(&query, &snapshot).await {
					Ok(()) => {
						info!("saved snapshot for {query:?}");
						notify::alert(store.saved_message());
					}
					Err(err) => notify::report(&err),
				}
			});
		})
	};

	view! {
		<div class="explorer">
			<Toolbar
				query=query
				node_count=Signal::derive(move || counts.get().0)
				edge_count=Signal::derive(move || counts.get().1)
				on_search=perform_search
				on_filter=filter_graph
				on_export_report=export_report
				on_export_image=export_image
				on_save=save_to_cloud
			/>
			<main class="graph-area">
				<ForceGraphCanvas surface=surface on_event=on_surface_event />
				<DetailsPanel
					details=details
					open=panel_open
					note=note
					saved=note_saved
					on_save=save_annotation
					on_close=close_details
				/>
				<div class="loader-overlay" class:hidden=move || !loading.get()>
					<div class="spinner"></div>
					<p>"Gathering intelligence..."</p>
				</div>
			</main>
		</div>
	}
}

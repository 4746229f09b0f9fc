use leptos::prelude::*;

use crate::document::EntityKind;

/// Search box, type filters, counters and export/save actions.
#[component]
pub fn Toolbar(
	query: RwSignal<String>,
	node_count: Signal<usize>,
	edge_count: Signal<usize>,
	on_search: UnsyncCallback<()>,
	on_filter: UnsyncCallback<(EntityKind, bool)>,
	on_export_report: UnsyncCallback<()>,
	on_export_image: UnsyncCallback<()>,
	on_save: UnsyncCallback<()>,
) -> impl IntoView {
	let search_on_enter = on_search.clone();

	let filters = EntityKind::FILTERABLE
		.into_iter()
		.map(|kind| {
			let on_filter = on_filter.clone();
			let label = kind.to_string();
			let color = kind.color();
			view! {
				<label class="filter" style=format!("--swatch:{color}")>
					<input
						type="checkbox"
						checked=true
						on:change=move |ev| on_filter.run((kind.clone(), event_target_checked(&ev)))
					/>
					{label}
				</label>
			}
		})
		.collect_view();

	view! {
		<header class="toolbar">
			<div class="search">
				<input
					id="searchInput"
					type="text"
					placeholder="Search a person or organisation..."
					prop:value=move || query.get()
					on:input=move |ev| query.set(event_target_value(&ev))
					on:keydown=move |ev| {
						if ev.key() == "Enter" {
							search_on_enter.run(());
						}
					}
				/>
				<button on:click=move |_| on_search.run(())>"Search"</button>
			</div>
			<div class="filters">{filters}</div>
			<div class="stats">
				<span>"Nodes: " <strong id="nodeCount">{move || node_count.get()}</strong></span>
				<span>"Edges: " <strong id="edgeCount">{move || edge_count.get()}</strong></span>
			</div>
			<div class="actions">
				<button on:click=move |_| on_export_report.run(())>"Export Report"</button>
				<button on:click=move |_| on_export_image.run(())>"Export Image"</button>
				<button on:click=move |_| on_save.run(())>"Save"</button>
			</div>
		</header>
	}
}

use leptos::prelude::*;

use super::force_graph::Details;

/// Side panel describing the selected node or edge, with the annotation editor.
#[component]
pub fn DetailsPanel(
	details: ReadSignal<Option<Details>>,
	open: ReadSignal<bool>,
	note: RwSignal<String>,
	saved: ReadSignal<bool>,
	on_save: UnsyncCallback<()>,
	on_close: UnsyncCallback<()>,
) -> impl IntoView {
	let title = move || match details.get() {
		Some(Details::Node { label, .. }) => label,
		Some(Details::Edge { .. }) => "Connection".to_string(),
		None => "Details".to_string(),
	};

	let body = move || {
		details.get().map(|d| match d {
			Details::Node { kind, snippet, .. } => view! {
				<div class="details-badge">
					<span class="type-badge" style=format!("background:{}", kind.color())>
						{kind.to_string()}
					</span>
				</div>
				{snippet.map(|s| view! { <p class="snippet">"\"" {s} "\""</p> })}
			}
			.into_any(),
			Details::Edge { source, target, snippet, url } => view! {
				<div class="edge-endpoints">{source} " → " {target}</div>
				{snippet.map(|s| view! { <p class="snippet">"\"" {s} "\""</p> })}
				{url.map(|u| view! {
					<a class="source-link" href=u target="_blank" rel="noopener">"Source Link"</a>
				})}
			}
			.into_any(),
		})
	};

	let is_node = move || matches!(details.get(), Some(Details::Node { .. }));

	view! {
		<aside id="details-panel" class="details-panel" class:hidden=move || !open.get()>
			<header>
				<h2 id="details-title">{title}</h2>
				<button class="close-btn" on:click=move |_| on_close.run(())>"×"</button>
			</header>
			<div id="details-content">{body}</div>
			<label for="annotationInput">"Notes"</label>
			<textarea
				id="annotationInput"
				prop:value=move || note.get()
				prop:disabled=move || !is_node()
				on:input=move |ev| note.set(event_target_value(&ev))
			/>
			<button class="save-note-btn" on:click=move |_| on_save.run(())>
				{move || if saved.get() { "Saved!" } else { "Save Note" }}
			</button>
		</aside>
	}
}

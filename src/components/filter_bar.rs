use leptos::prelude::*;
use log::debug;

use crate::lineage::{ResourceFilter, ResourceType};

/// One toggle per resource type. Disabled types are hidden from the graph.
#[component]
pub fn FilterBar(filter: RwSignal<ResourceFilter>) -> impl IntoView {
	let chips = ResourceType::ALL
		.into_iter()
		.map(|rt| {
			let enabled = move || filter.with(|f| f.is_enabled(rt));
			let toggle = move |_: leptos::ev::MouseEvent| {
				filter.update(|f| f.toggle(rt));
				debug!("resource filter: {} toggled", rt.key());
			};
			view! {
				<button class="filter-chip" class:enabled=enabled on:click=toggle>
					<span
						class="filter-chip__dot"
						style:background-color=move || if enabled() { rt.color() } else { "transparent" }
						style:border-color=rt.color()
					></span>
					{rt.label()}
				</button>
			}
		})
		.collect_view();

	let enabled_count = move || filter.with(|f| f.iter().count());

	view! {
		<div class="filter-bar">
			<span class="filter-bar__label">"Resource type"</span>
			{chips}
			<span class="filter-bar__count muted">
				{move || format!("{} of {} shown", enabled_count(), ResourceType::ALL.len())}
			</span>
			<button class="link-button" on:click=move |_| filter.set(ResourceFilter::all())>"All"</button>
			<button class="link-button" on:click=move |_| filter.set(ResourceFilter::default())>"Reset"</button>
		</div>
	}
}

use leptos::prelude::*;
use leptos_router::components::A;
use log::debug;

use crate::components::detail_panel::NodeDetailPanel;
use crate::components::filter_bar::FilterBar;
use crate::components::lineage_graph::LineageGraphCanvas;
use crate::lineage::{LayoutConfig, ResourceFilter, Scene, Selection, SelectionEvent, overview_scene};
use crate::project::use_project;

/// Whole-project lineage with type filters and a selection detail panel.
#[component]
pub fn LineagePage() -> impl IntoView {
	let project = use_project();
	let selection = RwSignal::new(Selection::default());
	let filter = RwSignal::new(ResourceFilter::default());

	let catalog = project.catalog.clone();
	let scene = Memo::new(move |_| {
		filter.with(|f| {
			selection.with(|s| overview_scene(&catalog, f, s, &LayoutConfig::default()))
		})
	});

	let dispatch = move |event: SelectionEvent| {
		selection.update(|s| *s = s.apply(event));
		debug!("selection: {:?}", selection.get_untracked());
	};
	let on_node_click = Callback::new(move |id: String| dispatch(SelectionEvent::NodeClicked(id)));
	let on_background_click = Callback::new(move |_: ()| dispatch(SelectionEvent::BackgroundClicked));
	let on_close = Callback::new(move |_: ()| dispatch(SelectionEvent::Dismissed));

	let panel = move || {
		selection.with(|s| {
			s.selected().map(|id| {
				let id = id.to_string();
				view! { <NodeDetailPanel model_id=id on_close=on_close /> }
			})
		})
	};

	view! {
		<div class="page page--lineage">
			<header class="page-header">
				<div class="breadcrumbs muted">
					<span>{project.meta.account.clone()}</span>
					" / "
					<span>{project.meta.name.clone()}</span>
				</div>
				<h1>"Lineage"</h1>
				<p class="subtitle">"Model dependency graph. Click a node for details; scroll to zoom, drag to pan."</p>
				<A href="/catalog">"Browse catalog"</A>
			</header>
			<FilterBar filter=filter />
			<div class="lineage-layout">
				<div class="lineage-layout__graph">
					<LineageGraphCanvas
						scene=scene
						on_node_click=on_node_click
						on_background_click=on_background_click
					/>
					<Show when=move || scene.with(Scene::is_empty)>
						<p class="graph-empty">"No resources match the current filter."</p>
					</Show>
				</div>
				{panel}
			</div>
		</div>
	}
}

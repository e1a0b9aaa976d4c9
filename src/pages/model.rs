use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};
use log::{debug, info};

use crate::components::detail_panel::{ModelDetails, model_href};
use crate::components::lineage_graph::LineageGraphCanvas;
use crate::lineage::{LayoutConfig, collect_lineage, focused_scene};
use crate::project::use_project;

/// One model: its metadata and the lineage centred on it.
///
/// Clicking another node in the graph moves to that model's page.
#[component]
pub fn ModelPage() -> impl IntoView {
	let project = use_project();
	let params = use_params_map();
	let model_id = Memo::new(move |_| params.read().get("id").unwrap_or_default());

	let catalog = project.catalog.clone();
	let focused = Memo::new(move |_| {
		model_id.with(|id| focused_scene(&catalog, id, &LayoutConfig::default()))
	});
	let scene = Signal::derive(move || focused.get().unwrap_or_default());

	// Navigation happens in an effect: the router's navigate fn is not Send.
	let pending = RwSignal::new(None::<String>);
	let navigate = use_navigate();
	Effect::new(move |_| {
		if let Some(target) = pending.get() {
			info!("navigating to {target}");
			navigate(&model_href(&target), Default::default());
		}
	});
	let on_node_click = Callback::new(move |id: String| {
		if model_id.with_untracked(|focal| *focal != id) {
			pending.set(Some(id));
		}
	});

	let catalog = project.catalog.clone();
	let summary = move || {
		let id = model_id.get();
		collect_lineage(&catalog, &id).map(|set| {
			debug!("{id}: {} upstream, {} downstream", set.ancestors.len(), set.descendants.len());
			format!(
				"{} upstream · {} downstream",
				set.ancestors.len(),
				set.descendants.len()
			)
		})
	};

	let catalog = project.catalog.clone();
	let sql = move || model_id.with(|id| catalog.resolve(id).map(|m| m.sql.clone()).unwrap_or_default());

	let found = move || focused.with(Option::is_some);

	view! {
		<div class="page page--model">
			<header class="page-header">
				<div class="breadcrumbs muted">
					<span>{project.meta.account.clone()}</span>
					" / "
					<A href="/catalog">{project.meta.name.clone()}</A>
					" / "
					<span class="strong">{move || model_id.get()}</span>
				</div>
			</header>
			<Show
				when=found
				fallback=move || {
					view! {
						<h1>"Model not found"</h1>
						<p class="muted">
							{move || format!("The model with ID \"{}\" could not be found in the project.", model_id.get())}
						</p>
					}
				}
			>
				<div class="model-layout">
					<section class="model-layout__details">
						<ModelDetails model_id=model_id />
					</section>
					<section class="model-layout__lineage">
						<h3>"Lineage"</h3>
						<p class="muted">{summary.clone()}</p>
						<div class="lineage-layout__graph lineage-layout__graph--compact">
							<LineageGraphCanvas scene=scene on_node_click=on_node_click />
						</div>
					</section>
					<section class="model-layout__code">
						<h3>"Code"</h3>
						<pre class="sql">{sql.clone()}</pre>
					</section>
				</div>
			</Show>
		</div>
	}
}

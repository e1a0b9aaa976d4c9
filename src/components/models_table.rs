use leptos::prelude::*;
use leptos_router::components::A;
use log::debug;

use crate::components::detail_panel::model_href;
use crate::lineage::{AssetKind, CatalogQuery, Materialization, Model};
use crate::project::use_project;

fn asset_label(kind: AssetKind) -> &'static str {
	match kind {
		AssetKind::Model => "Model",
		AssetKind::Source => "Source",
		AssetKind::All => "All",
	}
}

/// Asset-kind tree with per-kind totals.
#[component]
pub fn AssetTree(query: RwSignal<CatalogQuery>) -> impl IntoView {
	let project = use_project();
	let counts = project.catalog.asset_counts();

	let entry = move |kind: AssetKind, count: usize| {
		let active = move || query.with(|q| q.asset == kind);
		view! {
			<button
				class="asset-tree__entry"
				class:active=active
				on:click=move |_| query.update(|q| q.asset = kind)
			>
				<span>{asset_label(kind)}</span>
				<span class="tabular">{count}</span>
			</button>
		}
	};

	view! {
		<nav class="asset-tree">
			<p class="asset-tree__heading">"Projects"</p>
			<p class="asset-tree__project">{project.meta.name.clone()}</p>
			{entry(AssetKind::Model, counts.models)}
			{entry(AssetKind::Source, counts.sources)}
			{entry(AssetKind::All, counts.total)}
			<div class="asset-tree__entry asset-tree__entry--static">
				<span>"Test"</span>
				<span class="tabular">{counts.tests}</span>
			</div>
		</nav>
	}
}

fn row(model: &Model) -> impl IntoView + use<> {
	let tags = model
		.tags
		.iter()
		.map(|t| view! { <span class="badge badge--tag">{t.clone()}</span> })
		.collect_view();
	let name = model.name.clone();
	let health = if model.is_healthy() { "health-dot health-dot--ok" } else { "health-dot health-dot--failing" };
	view! {
		<tr>
			<td>
				<span class=health></span>
				<A href=model_href(&model.id)>{name}</A>
			</td>
			<td>
				<span class=format!("badge badge--{}", model.materialization.key())>
					{model.materialization.label()}
				</span>
			</td>
			<td>{model.layer().label()}</td>
			<td class="mono muted">{model.schema.clone()}</td>
			<td>{tags}</td>
			<td class="tabular">{format!("{}/{}", model.tests_passing, model.tests_passing + model.tests_failing)}</td>
		</tr>
	}
}

/// Searchable table of catalog models.
#[component]
pub fn ModelsTable(query: RwSignal<CatalogQuery>) -> impl IntoView {
	let project = use_project();
	let tags: Vec<String> = project.catalog.all_tags().into_iter().map(str::to_string).collect();
	let catalog = project.catalog.clone();

	let rows = move || {
		query.with(|q| {
			let matches = q.run(&catalog);
			debug!("catalog query matched {} model(s)", matches.len());
			if matches.is_empty() {
				return view! {
					<tr>
						<td colspan="6" class="muted">"No models match the current filters."</td>
					</tr>
				}
				.into_any();
			}
			matches.into_iter().map(row).collect_view().into_any()
		})
	};

	let on_search = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		query.update(|q| q.search = value);
	};
	let on_materialization = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		query.update(|q| q.materialization = Materialization::from_key(&value));
	};
	let on_tag = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		query.update(|q| q.tag = (!value.is_empty()).then_some(value));
	};

	view! {
		<div class="models-table">
			<div class="models-table__filters">
				<input
					type="search"
					placeholder="Search models"
					prop:value=move || query.with(|q| q.search.clone())
					on:input=on_search
				/>
				<select on:change=on_materialization>
					<option value="">"All materializations"</option>
					{Materialization::ALL
						.into_iter()
						.map(|m| view! { <option value=m.key()>{m.label()}</option> })
						.collect_view()}
				</select>
				<select on:change=on_tag>
					<option value="">"All tags"</option>
					{tags.into_iter().map(|t| view! { <option value=t.clone()>{t.clone()}</option> }).collect_view()}
				</select>
			</div>
			<table class="data-table">
				<thead>
					<tr>
						<th>"Name"</th>
						<th>"Materialization"</th>
						<th>"Layer"</th>
						<th>"Schema"</th>
						<th>"Tags"</th>
						<th>"Tests"</th>
					</tr>
				</thead>
				<tbody>{rows}</tbody>
			</table>
		</div>
	}
}

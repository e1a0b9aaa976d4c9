use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::model_columns::ModelColumns;
use crate::lineage::{Model, ModelRef, Relationships, classify};
use crate::project::use_project;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
	General,
	Columns,
	Relationships,
}

impl Tab {
	const ALL: [Self; 3] = [Self::General, Self::Columns, Self::Relationships];

	fn label(self) -> &'static str {
		match self {
			Self::General => "General",
			Self::Columns => "Columns",
			Self::Relationships => "Relationships",
		}
	}
}

pub fn model_href(id: &str) -> String {
	format!("/models/{id}")
}

/// Header line with the health dot and materialization badge.
#[component]
pub fn ModelHeading(model: Model) -> impl IntoView {
	let health = if model.is_healthy() { "health-dot health-dot--ok" } else { "health-dot health-dot--failing" };
	let rt = classify(&model);
	view! {
		<div class="model-heading">
			<span class=health title=format!("{} passing, {} failing", model.tests_passing, model.tests_failing)></span>
			<h2>{model.name}</h2>
			<span class=format!("badge badge--{}", model.materialization.key())>
				{model.materialization.label()}
			</span>
			<span class="badge" style:border-color=rt.color()>{rt.label()}</span>
		</div>
	}
}

fn general(model: &Model, package: String) -> impl IntoView + use<> {
	let tags = model.tags.clone();
	let tags = if tags.is_empty() {
		view! { <span class="muted">"No tags"</span> }.into_any()
	} else {
		tags.into_iter()
			.map(|t| view! { <span class="badge badge--tag">{t}</span> })
			.collect_view()
			.into_any()
	};
	view! {
		<p class="description">{model.description.clone()}</p>
		<dl class="detail-list">
			<dt>"Owner"</dt>
			<dd>{model.owner()}</dd>
			<dt>"Package"</dt>
			<dd>{package}</dd>
			<dt>"Layer"</dt>
			<dd>{model.layer().label()}</dd>
			<dt>"Schema"</dt>
			<dd class="mono">{model.schema.clone()}</dd>
			<dt>"Database"</dt>
			<dd class="mono">{model.database.clone()}</dd>
			<dt>"Tests"</dt>
			<dd>{format!("{} passing, {} failing", model.tests_passing, model.tests_failing)}</dd>
		</dl>
		<div class="tag-list">{tags}</div>
	}
}

fn related_list(title: &'static str, refs: Vec<ModelRef>, empty: &'static str) -> impl IntoView {
	let count = refs.len();
	let body = if refs.is_empty() {
		view! { <p class="muted">{empty}</p> }.into_any()
	} else {
		view! {
			<ul class="related-list">
				{refs
					.into_iter()
					.map(|r| {
						view! {
							<li>
								<A href=model_href(&r.id)>{r.name}</A>
							</li>
						}
					})
					.collect_view()}
			</ul>
		}
		.into_any()
	};
	view! {
		<section class="related">
			<h3>{title} <span class="muted">{format!(" ({count})")}</span></h3>
			{body}
		</section>
	}
}

fn relationships(rel: Relationships<'_>) -> impl IntoView + use<> {
	view! {
		{related_list("Depends on", rel.depends_on, "No upstream dependencies")}
		{related_list("Referenced by", rel.referenced_by, "No downstream references")}
	}
}

fn tab_bar(tab: RwSignal<Tab>) -> impl IntoView {
	Tab::ALL
		.into_iter()
		.map(|t| {
			view! {
				<button class="tabs__tab" class:active=move || tab.get() == t on:click=move |_| tab.set(t)>
					{t.label()}
				</button>
			}
		})
		.collect_view()
}

/// Tabbed metadata of one model: general fields, columns and direct neighbours.
#[component]
pub fn ModelDetails(#[prop(into)] model_id: Signal<String>) -> impl IntoView {
	let project = use_project();
	let tab = RwSignal::new(Tab::General);

	let body = move || {
		let id = model_id.get();
		let Some(rel) = project.catalog.relationships(&id) else {
			return view! { <p class="muted">{format!("Model \"{id}\" is not in this project.")}</p> }
				.into_any();
		};
		let model = rel.model.clone();
		let content = match tab.get() {
			Tab::General => general(&model, project.package()).into_any(),
			Tab::Columns => view! { <ModelColumns columns=model.columns.clone() /> }.into_any(),
			Tab::Relationships => relationships(rel).into_any(),
		};
		view! {
			<ModelHeading model=model />
			<div class="tabs">{tab_bar(tab)}</div>
			<div class="tabs__body">{content}</div>
		}
		.into_any()
	};

	view! { <div class="model-details">{body}</div> }
}

/// Side panel shown while a node is selected on the lineage graph.
#[component]
pub fn NodeDetailPanel(
	#[prop(into)] model_id: Signal<String>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	view! {
		<aside class="detail-panel">
			<div class="detail-panel__bar">
				<A href=move || model_href(&model_id.get())>"Open model"</A>
				<button class="icon-button" title="Close" on:click=move |_| on_close.run(())>
					"×"
				</button>
			</div>
			<ModelDetails model_id=model_id />
		</aside>
	}
}

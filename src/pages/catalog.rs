use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::models_table::{AssetTree, ModelsTable};
use crate::lineage::CatalogQuery;
use crate::project::use_project;

/// Searchable catalog of models and sources.
#[component]
pub fn CatalogPage() -> impl IntoView {
	let project = use_project();
	let query = RwSignal::new(CatalogQuery::default());

	view! {
		<div class="page page--catalog">
			<header class="page-header">
				<div class="breadcrumbs muted">
					<span>{project.meta.account.clone()}</span>
					" / "
					<span>{project.meta.name.clone()}</span>
				</div>
				<h1>"Catalog"</h1>
				<p class="subtitle">
					{format!("{} · branch {}", project.meta.repository, project.meta.default_branch)}
				</p>
				<A href="/">"View lineage"</A>
			</header>
			<div class="catalog-layout">
				<AssetTree query=query />
				<ModelsTable query=query />
			</div>
		</div>
	}
}

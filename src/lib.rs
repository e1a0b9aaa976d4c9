//! Leptos client-side app wiring and routes.
//!
//! The [`lineage`] module is the browser-free engine: catalog indexing,
//! lineage closure, filtering, layered layout and the display model.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, error, info};

// Modules
mod components;
pub mod lineage;
mod pages;
mod project;

// Top-Level pages
use crate::pages::catalog::CatalogPage;
use crate::pages::lineage::LineagePage;
use crate::pages::model::ModelPage;
use crate::pages::not_found::NotFound;
use crate::project::Project;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router over the lineage, catalog and model pages, with a 404 fallback.
///
/// The bundled project is loaded once and provided to every page.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let routes = Project::load().map(|project| {
		provide_context(project);
		view! {
			<Router>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=LineagePage />
					<Route path=path!("/catalog") view=CatalogPage />
					<Route path=path!("/models/:id") view=ModelPage />
				</Routes>
			</Router>
		}
	});
	if let Err(err) = &routes {
		error!("failed to load project: {err}");
	}

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Lineage Explorer" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! The project could not be loaded."</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>{routes}</ErrorBoundary>
	}
}

//! Embedded demo data.

use log::info;
use serde::Deserialize;

use super::catalog::LineageCatalog;
use super::error::CatalogError;
use super::model::{LineageEdge, Model};

const JAFFLE_SHOP: &str = include_str!("../../fixtures/jaffle_shop.json");

/// Project header shown in breadcrumbs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
	/// Project display name.
	pub name: String,
	/// Owning account.
	pub account: String,
	/// `owner/repo` path.
	pub repository: String,
	/// Branch shown in the header.
	pub default_branch: String,
}

/// A parsed fixture file.
#[derive(Clone, Debug, Deserialize)]
pub struct Fixture {
	/// Project header.
	pub project: ProjectMeta,
	/// Models in load order.
	pub models: Vec<Model>,
	/// Canonical edges. When absent they are derived from `dependsOn`.
	#[serde(default)]
	pub edges: Vec<LineageEdge>,
}

impl Fixture {
	/// Parses fixture JSON.
	pub fn parse(json: &str) -> Result<Self, CatalogError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Indexes the fixture.
	pub fn into_catalog(self) -> Result<(ProjectMeta, LineageCatalog), CatalogError> {
		let catalog = if self.edges.is_empty() {
			LineageCatalog::from_models(self.models)?
		} else {
			LineageCatalog::new(self.models, self.edges)?
		};
		info!(
			"loaded project {}: {} model(s), {} edge(s), {} issue(s)",
			self.project.name,
			catalog.len(),
			catalog.edges().len(),
			catalog.issues().len()
		);
		Ok((self.project, catalog))
	}
}

/// The bundled Jaffle Shop project.
pub fn jaffle_shop() -> Result<Fixture, CatalogError> {
	Fixture::parse(JAFFLE_SHOP)
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;
	use crate::lineage::closure::collect_lineage;
	use crate::lineage::display::overview_scene;
	use crate::lineage::filter::filter_by_type;
	use crate::lineage::layout::{LayoutConfig, layout_subgraph};
	use crate::lineage::resource::{ResourceFilter, ResourceType, classify};
	use crate::lineage::selection::Selection;

	fn load() -> LineageCatalog {
		jaffle_shop().unwrap().into_catalog().unwrap().1
	}

	#[test]
	fn fixture_is_consistent() {
		let catalog = load();
		catalog.validate().unwrap();
		for a in catalog.models() {
			for b_id in &a.depends_on {
				let b = catalog.resolve(b_id).unwrap();
				assert!(b.referenced_by.contains(&a.id), "{} -> {}", b.id, a.id);
			}
		}
	}

	#[test]
	fn classification_of_the_fixture() {
		let catalog = load();
		let count = |rt: ResourceType| catalog.models().iter().filter(|m| classify(m) == rt).count();
		assert_eq!(count(ResourceType::Source), 4);
		assert_eq!(count(ResourceType::Metric), 1);
		assert_eq!(count(ResourceType::Model), 10);
	}

	#[test]
	fn lineage_of_staged_orders() {
		let catalog = load();
		let lineage = collect_lineage(&catalog, "model-stg-orders").unwrap();
		assert_eq!(
			lineage.ancestors,
			BTreeSet::from(["model-src-orders".to_string()])
		);
		assert!(lineage.descendants.contains("model-fct-orders"));
		assert!(lineage.descendants.contains("model-metricstore-daily-revenue"));
		assert!(!lineage.contains("model-src-customers"));
	}

	#[test]
	fn layout_ranks_respect_every_edge() {
		let catalog = load();
		let sub = filter_by_type(&catalog, &ResourceFilter::all());
		let layout = layout_subgraph(&sub, &LayoutConfig::default());
		assert_eq!(layout.nodes.len(), catalog.len());
		for edge in catalog.edges() {
			let rank = |id: &str| layout.node(id).unwrap().rank;
			assert!(rank(&edge.source) < rank(&edge.target), "{}", edge.key());
		}
	}

	#[test]
	fn default_filter_hides_nothing_in_this_project() {
		let catalog = load();
		let scene = overview_scene(
			&catalog,
			&ResourceFilter::default(),
			&Selection::NoSelection,
			&LayoutConfig::default(),
		);
		assert_eq!(scene.nodes.len(), catalog.len());
		assert_eq!(scene.edges.len(), catalog.edges().len());
	}

	#[test]
	fn malformed_fixture_is_an_error() {
		assert!(matches!(Fixture::parse("{"), Err(CatalogError::Fixture(_))));
	}
}

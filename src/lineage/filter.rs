//! Induced subgraphs of the catalog.

use super::catalog::LineageCatalog;
use super::closure::collect_lineage;
use super::model::{LineageEdge, Model};
use super::resource::ResourceFilter;

/// A view onto part of the catalog, in catalog order.
///
/// Every edge has both endpoints in `models`.
#[derive(Clone, Debug, Default)]
pub struct Subgraph<'a> {
	/// Kept models.
	pub models: Vec<&'a Model>,
	/// Edges with both endpoints kept.
	pub edges: Vec<&'a LineageEdge>,
}

impl<'a> Subgraph<'a> {
	/// Keeps the models for which `keep` holds and the edges between them.
	pub fn induced(catalog: &'a LineageCatalog, keep: impl Fn(&Model) -> bool) -> Self {
		let mask: Vec<bool> = catalog.models().iter().map(keep).collect();
		let kept = |id: &str| catalog.node_of(id).is_some_and(|n| mask[n.index()]);

		Self {
			models: catalog
				.models()
				.iter()
				.zip(&mask)
				.filter_map(|(m, &k)| k.then_some(m))
				.collect(),
			edges: catalog
				.edges()
				.iter()
				.filter(|e| kept(&e.source) && kept(&e.target))
				.collect(),
		}
	}

	/// Whether no model was kept.
	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}

	/// Whether the model `id` was kept.
	pub fn contains(&self, id: &str) -> bool {
		self.models.iter().any(|m| m.id == id)
	}
}

/// Models whose resource type is enabled, and the edges between them.
pub fn filter_by_type<'a>(catalog: &'a LineageCatalog, filter: &ResourceFilter) -> Subgraph<'a> {
	Subgraph::induced(catalog, |m| filter.admits(m))
}

/// The closure of `focal` as a subgraph, or `None` if `focal` is unknown.
pub fn lineage_subgraph<'a>(catalog: &'a LineageCatalog, focal: &str) -> Option<Subgraph<'a>> {
	let lineage = collect_lineage(catalog, focal)?;
	Some(Subgraph::induced(catalog, |m| lineage.contains(&m.id)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lineage::resource::{ResourceType, classify};
	use crate::lineage::testing::{catalog_of, tagged};

	fn mixed() -> LineageCatalog {
		catalog_of(
			vec![
				tagged("src", "raw", &["source"]),
				tagged("stg", "staging", &[]),
				tagged("fct", "marts", &[]),
				tagged("daily", "metrics", &[]),
			],
			&[("src", "stg"), ("stg", "fct"), ("fct", "daily")],
		)
	}

	fn ids(sub: &Subgraph<'_>) -> Vec<String> {
		sub.models.iter().map(|m| m.id.clone()).collect()
	}

	#[test]
	fn all_types_keeps_everything() {
		let catalog = mixed();
		let sub = filter_by_type(&catalog, &ResourceFilter::all());
		assert_eq!(sub.models.len(), catalog.len());
		assert_eq!(sub.edges.len(), catalog.edges().len());
	}

	#[test]
	fn no_types_keeps_nothing() {
		let catalog = mixed();
		let sub = filter_by_type(&catalog, &ResourceFilter::none());
		assert!(sub.is_empty());
		assert!(sub.edges.is_empty());
	}

	#[test]
	fn dropping_a_type_drops_its_edges() {
		let catalog = mixed();
		let mut filter = ResourceFilter::all();
		filter.toggle(ResourceType::Source);
		let sub = filter_by_type(&catalog, &filter);

		assert_eq!(ids(&sub), vec!["stg", "fct", "daily"]);
		assert!(sub.models.iter().all(|m| classify(m) != ResourceType::Source));
		for edge in &sub.edges {
			assert!(sub.contains(&edge.source) && sub.contains(&edge.target));
		}
		assert_eq!(sub.edges.len(), 2);
	}

	#[test]
	fn filtering_is_pure() {
		let catalog = mixed();
		let mut filter = ResourceFilter::all();
		filter.toggle(ResourceType::Metric);
		let first = ids(&filter_by_type(&catalog, &filter));
		let _ = filter_by_type(&catalog, &ResourceFilter::none());
		assert_eq!(ids(&filter_by_type(&catalog, &filter)), first);
	}

	#[test]
	fn lineage_subgraph_keeps_internal_edges_only() {
		// `x` feeds `fct` but is neither an ancestor nor a descendant of `stg`.
		let catalog = catalog_of(
			vec![
				tagged("src", "raw", &["source"]),
				tagged("stg", "staging", &[]),
				tagged("fct", "marts", &[]),
				tagged("x", "staging", &[]),
			],
			&[("src", "stg"), ("stg", "fct"), ("x", "fct")],
		);
		let sub = lineage_subgraph(&catalog, "stg").unwrap();
		assert_eq!(ids(&sub), vec!["src", "stg", "fct"]);
		assert_eq!(sub.edges.len(), 2);
		assert!(lineage_subgraph(&catalog, "nope").is_none());
	}
}

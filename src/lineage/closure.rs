//! Transitive upstream/downstream closure of a single model.

use std::collections::BTreeSet;

use petgraph::visit::{Dfs, Reversed};

use super::catalog::LineageCatalog;

/// Everything reachable from a focal model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineageSet {
	/// The model the walk started from.
	pub focal: String,
	/// Transitive dependencies, excluding the focal model.
	pub ancestors: BTreeSet<String>,
	/// Transitive dependents, excluding the focal model.
	pub descendants: BTreeSet<String>,
}

impl LineageSet {
	/// Ancestors, descendants and the focal model, each exactly once.
	pub fn members(&self) -> BTreeSet<&str> {
		self.ancestors
			.iter()
			.chain(&self.descendants)
			.map(String::as_str)
			.chain(std::iter::once(self.focal.as_str()))
			.collect()
	}

	/// Whether `id` is the focal model or one of its relatives.
	pub fn contains(&self, id: &str) -> bool {
		self.focal == id || self.ancestors.contains(id) || self.descendants.contains(id)
	}
}

/// Walks the canonical edges upstream and downstream from `focal`.
///
/// Returns `None` when `focal` is not in the catalog.
pub fn collect_lineage(catalog: &LineageCatalog, focal: &str) -> Option<LineageSet> {
	let start = catalog.node_of(focal)?;
	let graph = catalog.graph();

	let mut ancestors = BTreeSet::new();
	let reversed = Reversed(graph);
	let mut up = Dfs::new(reversed, start);
	while let Some(node) = up.next(reversed) {
		if node != start {
			ancestors.insert(graph[node].clone());
		}
	}

	let mut descendants = BTreeSet::new();
	let mut down = Dfs::new(graph, start);
	while let Some(node) = down.next(graph) {
		if node != start {
			descendants.insert(graph[node].clone());
		}
	}

	Some(LineageSet {
		focal: focal.to_string(),
		ancestors,
		descendants,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lineage::testing::{catalog, chain};

	fn set(ids: &[&str]) -> BTreeSet<String> {
		ids.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn isolated_model_yields_itself() {
		let catalog = catalog(&["lonely", "a", "b"], &[("a", "b")]);
		let lineage = collect_lineage(&catalog, "lonely").unwrap();
		assert_eq!(lineage.members().into_iter().collect::<Vec<_>>(), vec!["lonely"]);
	}

	#[test]
	fn orders_chain() {
		let catalog = chain(&["src-orders", "stg-orders", "fct-orders"]);

		let mid = collect_lineage(&catalog, "stg-orders").unwrap();
		assert_eq!(mid.ancestors, set(&["src-orders"]));
		assert_eq!(mid.descendants, set(&["fct-orders"]));
		assert_eq!(mid.members().len(), 3);

		let head = collect_lineage(&catalog, "src-orders").unwrap();
		assert!(head.ancestors.is_empty());
		assert_eq!(head.descendants, set(&["stg-orders", "fct-orders"]));
		assert!(head.contains("src-orders"));
	}

	#[test]
	fn walk_does_not_cross_into_siblings() {
		// a -> c <- b ; c -> d
		let catalog = catalog(&["a", "b", "c", "d"], &[("a", "c"), ("b", "c"), ("c", "d")]);
		let lineage = collect_lineage(&catalog, "a").unwrap();
		assert_eq!(lineage.descendants, set(&["c", "d"]));
		assert!(!lineage.contains("b"));
	}

	#[test]
	fn cycles_terminate_and_overlap() {
		let catalog = catalog(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
		let lineage = collect_lineage(&catalog, "a").unwrap();
		assert_eq!(lineage.ancestors, set(&["b", "c"]));
		assert_eq!(lineage.descendants, set(&["b", "c"]));
		assert_eq!(lineage.members().len(), 3);
	}

	#[test]
	fn idempotent() {
		let catalog = chain(&["a", "b", "c", "d"]);
		assert_eq!(collect_lineage(&catalog, "b"), collect_lineage(&catalog, "b"));
	}

	#[test]
	fn unknown_focal_is_none() {
		assert!(collect_lineage(&chain(&["a"]), "nope").is_none());
	}
}

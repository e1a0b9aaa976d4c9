//! Synthetic graphs for unit tests.

use super::catalog::LineageCatalog;
use super::model::{LineageEdge, Materialization, Model};

pub(crate) fn model(id: &str) -> Model {
	Model {
		id: id.into(),
		name: id.into(),
		schema: "marts".into(),
		database: "analytics".into(),
		materialization: Materialization::Table,
		description: String::new(),
		tags: Vec::new(),
		columns: Vec::new(),
		sql: String::new(),
		depends_on: Vec::new(),
		referenced_by: Vec::new(),
		tests_passing: 0,
		tests_failing: 0,
	}
}

/// Builds a consistent catalog: back-references are filled in from `edges`.
pub(crate) fn catalog(ids: &[&str], edges: &[(&str, &str)]) -> LineageCatalog {
	catalog_of(ids.iter().map(|id| model(id)).collect(), edges)
}

pub(crate) fn catalog_of(mut models: Vec<Model>, edges: &[(&str, &str)]) -> LineageCatalog {
	for &(source, target) in edges {
		for m in models.iter_mut() {
			if m.id == target {
				m.depends_on.push(source.into());
			}
			if m.id == source {
				m.referenced_by.push(target.into());
			}
		}
	}
	let edges = edges
		.iter()
		.map(|&(s, t)| LineageEdge::new(s, t))
		.collect();
	LineageCatalog::new(models, edges).expect("synthetic catalog")
}

/// `ids[0] -> ids[1] -> ...`
pub(crate) fn chain(ids: &[&str]) -> LineageCatalog {
	let edges: Vec<_> = ids.windows(2).map(|w| (w[0], w[1])).collect();
	catalog(ids, &edges)
}

pub(crate) fn tagged(id: &str, schema: &str, tags: &[&str]) -> Model {
	let mut m = model(id);
	m.schema = schema.into();
	m.tags = tags.iter().map(|t| t.to_string()).collect();
	m
}

//! Immutable model arena backed by a directed lineage graph.
//!
//! The edge list is canonical: the graph is built from it once, at
//! construction. The per-model `dependsOn`/`referencedBy` attributes are only
//! cross-checked against it and reported through [`LineageCatalog::issues`].

use std::collections::{BTreeSet, HashMap};

use log::warn;
use petgraph::graph::{DiGraph, NodeIndex};

use super::error::{CatalogError, CatalogIssue};
use super::model::{LineageEdge, Model, ModelRef};

/// The read-only data context every lineage operation runs against.
#[derive(Clone, Debug, Default)]
pub struct LineageCatalog {
	models: Vec<Model>,
	/// Node `i` is `models[i]`; edges point from upstream to downstream.
	graph: DiGraph<String, ()>,
	index: HashMap<String, NodeIndex>,
	edges: Vec<LineageEdge>,
	issues: Vec<CatalogIssue>,
}

/// A model together with its resolved neighbours, for the detail panel.
#[derive(Clone, Debug)]
pub struct Relationships<'a> {
	/// The resolved model.
	pub model: &'a Model,
	/// Resolved `dependsOn`, in declaration order, dangling ids skipped.
	pub depends_on: Vec<ModelRef>,
	/// Resolved `referencedBy`, in declaration order, dangling ids skipped.
	pub referenced_by: Vec<ModelRef>,
}

/// Per-kind asset totals shown in the catalog sidebar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssetCounts {
	/// Models not tagged `source`.
	pub models: usize,
	/// Models tagged `source`.
	pub sources: usize,
	/// Passing plus failing tests over every model.
	pub tests: usize,
	/// Every model, sources included.
	pub total: usize,
}

impl LineageCatalog {
	/// Indexes `models` and `edges`.
	///
	/// Only duplicate model ids are fatal. Dangling edges are dropped and
	/// recorded as issues, as are mismatches between the edge list and the
	/// per-model back-references.
	pub fn new(models: Vec<Model>, edges: Vec<LineageEdge>) -> Result<Self, CatalogError> {
		let mut graph = DiGraph::with_capacity(models.len(), edges.len());
		let mut index = HashMap::with_capacity(models.len());
		for model in &models {
			let node = graph.add_node(model.id.clone());
			if index.insert(model.id.clone(), node).is_some() {
				return Err(CatalogError::DuplicateModel(model.id.clone()));
			}
		}

		let mut issues = Vec::new();
		let mut kept = Vec::with_capacity(edges.len());

		for edge in edges {
			let (Some(&src), Some(&tgt)) = (index.get(&edge.source), index.get(&edge.target)) else {
				issues.push(CatalogIssue::DanglingEdge {
					upstream: edge.source,
					downstream: edge.target,
				});
				continue;
			};
			if graph.contains_edge(src, tgt) {
				continue;
			}
			// One-sided declarations are reported by the back-reference pass.
			if !models[tgt.index()].depends_on.contains(&edge.source)
				&& !models[src.index()].referenced_by.contains(&edge.target)
			{
				issues.push(CatalogIssue::EdgeNotDeclared {
					upstream: edge.source.clone(),
					downstream: edge.target.clone(),
				});
			}
			graph.add_edge(src, tgt, ());
			kept.push(edge);
		}

		check_back_references(&models, &index, &graph, &mut issues);
		for issue in &issues {
			warn!("lineage catalog: {issue}");
		}

		Ok(Self {
			models,
			graph,
			index,
			edges: kept,
			issues,
		})
	}

	/// Builds the catalog from the models alone, deriving one edge per
	/// `dependsOn` entry.
	pub fn from_models(models: Vec<Model>) -> Result<Self, CatalogError> {
		let edges = models
			.iter()
			.flat_map(|m| {
				m.depends_on
					.iter()
					.map(move |dep| LineageEdge::new(dep.clone(), m.id.clone()))
			})
			.collect();
		Self::new(models, edges)
	}

	/// Looks a model up by id. Absent ids are not an error.
	pub fn resolve(&self, id: &str) -> Option<&Model> {
		self.index.get(id).map(|n| &self.models[n.index()])
	}

	/// Models in load order.
	pub fn models(&self) -> &[Model] {
		&self.models
	}

	/// Canonical edges in load order, dangling and duplicate edges removed.
	pub fn edges(&self) -> &[LineageEdge] {
		&self.edges
	}

	/// Number of models.
	pub fn len(&self) -> usize {
		self.models.len()
	}

	/// Whether the catalog holds no models.
	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}

	/// Defects found at load time.
	pub fn issues(&self) -> &[CatalogIssue] {
		&self.issues
	}

	/// Fails if any defect was found at load time.
	pub fn validate(&self) -> Result<(), CatalogError> {
		if self.issues.is_empty() {
			Ok(())
		} else {
			Err(CatalogError::Inconsistent {
				issues: self.issues.clone(),
			})
		}
	}

	pub(crate) fn graph(&self) -> &DiGraph<String, ()> {
		&self.graph
	}

	pub(crate) fn node_of(&self, id: &str) -> Option<NodeIndex> {
		self.index.get(id).copied()
	}

	/// Resolves a model and its declared neighbours.
	pub fn relationships(&self, id: &str) -> Option<Relationships<'_>> {
		let model = self.resolve(id)?;
		Some(Relationships {
			model,
			depends_on: self.resolve_refs(&model.depends_on),
			referenced_by: self.resolve_refs(&model.referenced_by),
		})
	}

	fn resolve_refs(&self, ids: &[String]) -> Vec<ModelRef> {
		ids.iter()
			.filter_map(|id| self.resolve(id))
			.map(|m| ModelRef {
				id: m.id.clone(),
				name: m.name.clone(),
			})
			.collect()
	}

	/// Sorted, de-duplicated tags over every model.
	pub fn all_tags(&self) -> Vec<&str> {
		self.models
			.iter()
			.flat_map(|m| m.tags.iter().map(String::as_str))
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}

	/// Totals for the catalog sidebar.
	pub fn asset_counts(&self) -> AssetCounts {
		let sources = self.models.iter().filter(|m| m.has_tag("source")).count();
		let tests = self
			.models
			.iter()
			.map(|m| (m.tests_passing + m.tests_failing) as usize)
			.sum();
		AssetCounts {
			models: self.models.len() - sources,
			sources,
			tests,
			total: self.models.len(),
		}
	}
}

fn check_back_references(
	models: &[Model],
	index: &HashMap<String, NodeIndex>,
	graph: &DiGraph<String, ()>,
	issues: &mut Vec<CatalogIssue>,
) {
	for (node, model) in graph.node_indices().zip(models) {
		for dep in &model.depends_on {
			let Some(&up) = index.get(dep) else {
				issues.push(CatalogIssue::DanglingReference {
					model: model.id.clone(),
					reference: dep.clone(),
				});
				continue;
			};
			if !models[up.index()].referenced_by.contains(&model.id) {
				issues.push(CatalogIssue::MissingBackReference {
					upstream: dep.clone(),
					downstream: model.id.clone(),
				});
			}
			if !graph.contains_edge(up, node) {
				issues.push(CatalogIssue::MissingEdge {
					upstream: dep.clone(),
					downstream: model.id.clone(),
				});
			}
		}
		for referrer in &model.referenced_by {
			let Some(&down) = index.get(referrer) else {
				issues.push(CatalogIssue::DanglingReference {
					model: model.id.clone(),
					reference: referrer.clone(),
				});
				continue;
			};
			if !models[down.index()].depends_on.contains(&model.id) {
				issues.push(CatalogIssue::MissingDependency {
					upstream: model.id.clone(),
					downstream: referrer.clone(),
				});
			}
		}
	}
}

//! Catalog entities: models, their columns and the edges between them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a model is persisted in the warehouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Materialization {
	/// Rebuilt as a table on every run.
	Table,
	/// Stored as a view.
	View,
	/// Appended to on each run.
	Incremental,
	/// Inlined into downstream models, never persisted.
	Ephemeral,
}

impl Materialization {
	/// Every materialization, in display order.
	pub const ALL: [Self; 4] = [Self::Table, Self::View, Self::Incremental, Self::Ephemeral];

	/// Lowercase key used in fixtures and query strings.
	pub fn key(self) -> &'static str {
		match self {
			Self::Table => "table",
			Self::View => "view",
			Self::Incremental => "incremental",
			Self::Ephemeral => "ephemeral",
		}
	}

	/// Title-case label.
	pub fn label(self) -> &'static str {
		match self {
			Self::Table => "Table",
			Self::View => "View",
			Self::Incremental => "Incremental",
			Self::Ephemeral => "Ephemeral",
		}
	}

	/// Parses a [`key`](Self::key) back into a materialization.
	pub fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|m| m.key() == key)
	}
}

impl fmt::Display for Materialization {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

/// A typed column of a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
	/// Column name.
	pub name: String,
	/// Warehouse type, e.g. `INT64`.
	#[serde(rename = "type")]
	pub data_type: String,
	/// Free-text description.
	pub description: String,
	/// Names of the validation rules attached to this column.
	#[serde(default)]
	pub tests: Vec<String>,
}

/// One node of the dependency graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
	/// Unique identifier.
	pub id: String,
	/// Display label.
	pub name: String,
	/// Schema (namespace) the model is built into.
	pub schema: String,
	/// Database the model is built into.
	#[serde(default)]
	pub database: String,
	/// Persistence strategy.
	pub materialization: Materialization,
	/// Free-text description.
	#[serde(default)]
	pub description: String,
	/// Free-form tags.
	#[serde(default)]
	pub tags: Vec<String>,
	/// Typed columns.
	#[serde(default)]
	pub columns: Vec<Column>,
	/// Source text of the model.
	#[serde(default)]
	pub sql: String,
	/// Ids of the models this one depends on (upstream).
	#[serde(default)]
	pub depends_on: Vec<String>,
	/// Ids of the models that depend on this one (downstream).
	#[serde(default)]
	pub referenced_by: Vec<String>,
	/// Passing test count.
	#[serde(default)]
	pub tests_passing: u32,
	/// Failing test count.
	#[serde(default)]
	pub tests_failing: u32,
}

impl Model {
	/// Whether the model carries `tag`.
	pub fn has_tag(&self, tag: &str) -> bool {
		self.tags.iter().any(|t| t == tag)
	}

	/// A model is healthy when none of its tests fail.
	pub fn is_healthy(&self) -> bool {
		self.tests_failing == 0
	}

	/// Team that owns the model, inferred from its tags.
	pub fn owner(&self) -> &'static str {
		if self.has_tag("finance") {
			"Finance Team"
		} else if self.has_tag("product") {
			"Product Team"
		} else {
			"Analytics Engineering"
		}
	}

	/// Modeling layer, inferred from the schema.
	pub fn layer(&self) -> ModelingLayer {
		ModelingLayer::from_schema(&self.schema)
	}
}

/// Coarse position of a model in the transformation pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelingLayer {
	/// The `raw` schema.
	Source,
	/// The `staging` schema.
	Staging,
	/// The `intermediate` schema.
	Intermediate,
	/// The `marts` schema.
	Marts,
	/// The `metrics` schema.
	Metrics,
	/// Any schema outside the conventional layers.
	Other,
}

impl ModelingLayer {
	/// Maps a schema name onto its layer.
	pub fn from_schema(schema: &str) -> Self {
		match schema {
			"raw" => Self::Source,
			"staging" => Self::Staging,
			"intermediate" => Self::Intermediate,
			"marts" => Self::Marts,
			"metrics" => Self::Metrics,
			_ => Self::Other,
		}
	}

	/// Display label.
	pub fn label(self) -> &'static str {
		match self {
			Self::Source => "Source",
			Self::Staging => "Staging",
			Self::Intermediate => "Intermediate",
			Self::Marts => "Marts",
			Self::Metrics => "Metrics",
			Self::Other => "Other",
		}
	}
}

/// A directed dependency: `source` is upstream of `target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineageEdge {
	/// Upstream model id.
	pub source: String,
	/// Downstream model id.
	pub target: String,
}

impl LineageEdge {
	/// Edge from `source` (upstream) to `target` (downstream).
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}

	/// Stable key of the form `source->target`.
	pub fn key(&self) -> String {
		format!("{}->{}", self.source, self.target)
	}
}

/// Name and id of a related model, as shown in relationship lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelRef {
	/// Model id.
	pub id: String,
	/// Display name.
	pub name: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn owner_prefers_finance_over_product() {
		let mut model = bare("m");
		model.tags = vec!["product".into(), "finance".into()];
		assert_eq!(model.owner(), "Finance Team");

		model.tags = vec!["product".into()];
		assert_eq!(model.owner(), "Product Team");

		model.tags.clear();
		assert_eq!(model.owner(), "Analytics Engineering");
	}

	#[test]
	fn layer_falls_back_to_other() {
		assert_eq!(ModelingLayer::from_schema("staging"), ModelingLayer::Staging);
		assert_eq!(ModelingLayer::from_schema("scratch"), ModelingLayer::Other);
	}

	#[test]
	fn deserializes_camel_case_fields() {
		let json = r#"{
			"id": "model-a",
			"name": "a",
			"schema": "marts",
			"materialization": "incremental",
			"columns": [{ "name": "id", "type": "INT64", "description": "pk", "tests": ["unique"] }],
			"dependsOn": ["model-b"],
			"testsFailing": 2
		}"#;
		let model: Model = serde_json::from_str(json).unwrap();
		assert_eq!(model.materialization, Materialization::Incremental);
		assert_eq!(model.depends_on, vec!["model-b".to_string()]);
		assert!(model.referenced_by.is_empty());
		assert_eq!(model.columns[0].data_type, "INT64");
		assert!(!model.is_healthy());
	}

	fn bare(id: &str) -> Model {
		Model {
			id: id.into(),
			name: id.into(),
			schema: "marts".into(),
			database: String::new(),
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
}

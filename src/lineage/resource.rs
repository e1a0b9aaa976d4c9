//! Resource-type classification and the visibility filter built on it.

use std::collections::BTreeSet;

use super::model::Model;

/// Visual grouping of a catalog entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceType {
	/// Anything no other rule matches.
	Model,
	/// A model tagged `source`.
	Source,
	/// A snapshot.
	Snapshot,
	/// A seed.
	Seed,
	/// A model in the `metrics` schema.
	Metric,
	/// A semantic model.
	SemanticModel,
	/// A saved query.
	SavedQuery,
}

/// Accent used when a resource type has no palette entry.
pub const DEFAULT_ACCENT: &str = "#FF694A";

impl ResourceType {
	/// Every resource type, in filter-bar order.
	pub const ALL: [Self; 7] = [
		Self::Model,
		Self::Source,
		Self::Snapshot,
		Self::Seed,
		Self::Metric,
		Self::SemanticModel,
		Self::SavedQuery,
	];

	/// Stable lowercase key.
	pub fn key(self) -> &'static str {
		match self {
			Self::Model => "model",
			Self::Source => "source",
			Self::Snapshot => "snapshot",
			Self::Seed => "seed",
			Self::Metric => "metric",
			Self::SemanticModel => "semantic_model",
			Self::SavedQuery => "saved_query",
		}
	}

	/// Human-readable name.
	pub fn label(self) -> &'static str {
		match self {
			Self::Model => "Model",
			Self::Source => "Source",
			Self::Snapshot => "Snapshot",
			Self::Seed => "Seed",
			Self::Metric => "Metric",
			Self::SemanticModel => "Semantic Model",
			Self::SavedQuery => "Saved Query",
		}
	}

	/// Border/accent color of nodes of this type.
	pub fn color(self) -> &'static str {
		match self {
			Self::Model => DEFAULT_ACCENT,
			Self::Source => "#27AE60",
			Self::Snapshot => "#9B59B6",
			Self::Seed => "#0EA5E9",
			Self::Metric => "#F59E0B",
			Self::SemanticModel => "#EC4899",
			Self::SavedQuery => "#6366F1",
		}
	}

	/// Inverse of [`key`](Self::key).
	pub fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|rt| rt.key() == key)
	}
}

/// A single classification condition.
#[derive(Clone, Copy, Debug)]
enum Rule {
	Tag(&'static str),
	Schema(&'static str),
}

impl Rule {
	fn matches(self, model: &Model) -> bool {
		match self {
			Rule::Tag(tag) => model.has_tag(tag),
			Rule::Schema(schema) => model.schema == schema,
		}
	}
}

/// Decision table, evaluated top to bottom; the first matching row wins.
///
/// | priority | condition          | type   |
/// |----------|--------------------|--------|
/// | 1        | tagged `source`    | Source |
/// | 2        | schema `metrics`   | Metric |
/// | -        | otherwise          | Model  |
const RULES: &[(Rule, ResourceType)] = &[
	(Rule::Tag("source"), ResourceType::Source),
	(Rule::Schema("metrics"), ResourceType::Metric),
];

/// Classifies a model. Total and independent of graph context.
pub fn classify(model: &Model) -> ResourceType {
	RULES
		.iter()
		.find(|(rule, _)| rule.matches(model))
		.map(|&(_, rt)| rt)
		.unwrap_or(ResourceType::Model)
}

/// The set of resource types currently shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceFilter {
	enabled: BTreeSet<ResourceType>,
}

impl ResourceFilter {
	/// Every type enabled.
	pub fn all() -> Self {
		ResourceType::ALL.into_iter().collect()
	}

	/// Nothing enabled.
	pub fn none() -> Self {
		Self {
			enabled: BTreeSet::new(),
		}
	}

	/// Whether `rt` is shown.
	pub fn is_enabled(&self, rt: ResourceType) -> bool {
		self.enabled.contains(&rt)
	}

	/// Whether `model` survives the filter.
	pub fn admits(&self, model: &Model) -> bool {
		self.is_enabled(classify(model))
	}

	/// Flips one type on or off.
	pub fn toggle(&mut self, rt: ResourceType) {
		if !self.enabled.remove(&rt) {
			self.enabled.insert(rt);
		}
	}

	/// Enabled types in filter-bar order.
	pub fn iter(&self) -> impl Iterator<Item = ResourceType> + '_ {
		self.enabled.iter().copied()
	}
}

impl Default for ResourceFilter {
	fn default() -> Self {
		[ResourceType::Model, ResourceType::Source, ResourceType::Metric]
			.into_iter()
			.collect()
	}
}

impl FromIterator<ResourceType> for ResourceFilter {
	fn from_iter<I: IntoIterator<Item = ResourceType>>(iter: I) -> Self {
		Self {
			enabled: iter.into_iter().collect(),
		}
	}
}

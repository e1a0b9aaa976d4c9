//! Catalog table filtering.

use super::catalog::LineageCatalog;
use super::model::{Materialization, Model};

/// Which side of the source/model split to list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssetKind {
	/// Models not tagged `source`.
	#[default]
	Model,
	/// Models tagged `source`.
	Source,
	/// Every model.
	All,
}

/// Criteria of the catalog table. Every criterion must hold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogQuery {
	/// Case-insensitive substring of the model name.
	pub search: String,
	/// `None` means all materializations.
	pub materialization: Option<Materialization>,
	/// `None` means any tag.
	pub tag: Option<String>,
	/// Sidebar asset kind.
	pub asset: AssetKind,
}

impl CatalogQuery {
	/// Whether `model` satisfies the query.
	pub fn matches(&self, model: &Model) -> bool {
		let needle = self.search.to_lowercase();
		let is_source = model.has_tag("source");
		model.name.to_lowercase().contains(&needle)
			&& self.materialization.is_none_or(|m| model.materialization == m)
			&& self.tag.as_deref().is_none_or(|t| model.has_tag(t))
			&& match self.asset {
				AssetKind::Model => !is_source,
				AssetKind::Source => is_source,
				AssetKind::All => true,
			}
	}

	/// Matching models in catalog order.
	pub fn run<'a>(&self, catalog: &'a LineageCatalog) -> Vec<&'a Model> {
		catalog.models().iter().filter(|m| self.matches(m)).collect()
	}
}

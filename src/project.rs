//! The loaded project, shared with every page through context.

use std::sync::Arc;

use leptos::prelude::*;

use crate::lineage::fixtures::{ProjectMeta, jaffle_shop};
use crate::lineage::{CatalogError, LineageCatalog};

/// Catalog plus project header. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Project {
	/// Project header.
	pub meta: Arc<ProjectMeta>,
	/// Every model and edge of the project.
	pub catalog: Arc<LineageCatalog>,
}

impl Project {
	/// Loads the bundled project.
	pub fn load() -> Result<Self, CatalogError> {
		let (meta, catalog) = jaffle_shop()?.into_catalog()?;
		Ok(Self {
			meta: Arc::new(meta),
			catalog: Arc::new(catalog),
		})
	}

	/// Package name, taken from the repository's last path segment.
	pub fn package(&self) -> String {
		self.meta
			.repository
			.rsplit('/')
			.next()
			.unwrap_or(&self.meta.name)
			.replace('-', "_")
	}
}

/// The project provided by `App`.
pub fn use_project() -> Project {
	expect_context::<Project>()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_project_loads() {
		let project = Project::load().unwrap();
		assert_eq!(project.meta.name, "Jaffle Shop");
		assert!(!project.catalog.is_empty());
		assert!(project.catalog.issues().is_empty());
		assert_eq!(project.package(), "jaffle_shop");
	}
}

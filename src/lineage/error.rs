//! Load errors and tolerated catalog defects.

use thiserror::Error;

/// Errors raised while building or validating a [`LineageCatalog`](super::LineageCatalog).
#[derive(Debug, Error)]
pub enum CatalogError {
	/// Two models share an id.
	#[error("duplicate model id: {0}")]
	DuplicateModel(String),

	/// The fixture JSON does not parse.
	#[error("invalid fixture: {0}")]
	Fixture(#[from] serde_json::Error),

	/// Returned by `validate` when load found defects.
	#[error("catalog is inconsistent ({} issue(s))", issues.len())]
	Inconsistent {
		/// Every defect, in detection order.
		issues: Vec<CatalogIssue>,
	},
}

/// A data defect found while indexing. Defects are tolerated by omission.
///
/// `upstream` is always the dependency and `downstream` the model that
/// depends on it, whichever side declared the relation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogIssue {
	/// An edge endpoint is not in the catalog. The edge is dropped.
	#[error("edge {upstream} -> {downstream} points at a missing model")]
	DanglingEdge {
		/// The dependency.
		upstream: String,
		/// The dependent model.
		downstream: String,
	},

	/// A `dependsOn` or `referencedBy` entry names an unknown model.
	#[error("model {model} references missing model {reference}")]
	DanglingReference {
		/// The model holding the reference.
		model: String,
		/// The unknown id.
		reference: String,
	},

	/// `downstream` depends on `upstream`, which does not list it back.
	#[error("{downstream} depends on {upstream} but {upstream} does not list it in referencedBy")]
	MissingBackReference {
		/// The dependency.
		upstream: String,
		/// The dependent model.
		downstream: String,
	},

	/// `upstream` lists `downstream` in `referencedBy`, which does not depend on it.
	#[error("{upstream} lists {downstream} in referencedBy but {downstream} does not depend on it")]
	MissingDependency {
		/// The dependency.
		upstream: String,
		/// The dependent model.
		downstream: String,
	},

	/// An edge neither endpoint declares.
	#[error("edge {upstream} -> {downstream} is not declared in dependsOn/referencedBy")]
	EdgeNotDeclared {
		/// The dependency.
		upstream: String,
		/// The dependent model.
		downstream: String,
	},

	/// A `dependsOn` entry with no matching edge.
	#[error("{downstream} depends on {upstream} but the edge list has no such edge")]
	MissingEdge {
		/// The dependency.
		upstream: String,
		/// The dependent model.
		downstream: String,
	},
}

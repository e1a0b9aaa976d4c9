//! Lineage engine: catalog indexing, closure, filtering, layout and the
//! display model handed to the canvas.
//!
//! Everything here is synchronous and free of browser APIs.

pub mod catalog;
pub mod closure;
pub mod display;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod layout;
pub mod model;
pub mod resource;
pub mod search;
pub mod selection;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{AssetCounts, LineageCatalog, Relationships};
pub use closure::{LineageSet, collect_lineage};
pub use display::{DisplayEdge, DisplayNode, Scene, build_scene, focused_scene, overview_scene};
pub use error::{CatalogError, CatalogIssue};
pub use filter::{Subgraph, filter_by_type, lineage_subgraph};
pub use layout::{Layout, LayoutConfig, LayoutNode, RankDirection, layout, layout_subgraph};
pub use model::{Column, LineageEdge, Materialization, Model, ModelRef, ModelingLayer};
pub use resource::{ResourceFilter, ResourceType, classify};
pub use search::{AssetKind, CatalogQuery};
pub use selection::{Selection, SelectionEvent};

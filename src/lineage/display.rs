//! Maps laid-out nodes and interaction state onto what the canvas draws.

use log::debug;

use super::catalog::LineageCatalog;
use super::filter::{Subgraph, filter_by_type, lineage_subgraph};
use super::layout::{Layout, LayoutConfig, Point, layout_subgraph};
use super::model::Materialization;
use super::resource::{ResourceFilter, ResourceType, classify};
use super::selection::Selection;

/// Stroke of every edge.
pub const EDGE_STROKE: &str = "#94a3b8";
/// Stroke width of every edge.
pub const EDGE_STROKE_WIDTH: f64 = 1.5;
/// Ring around the selected node.
pub const SELECTED_RING: &str = "#60a5fa";
/// Ring around the focal node of a focused view.
pub const FOCAL_RING: &str = "#3b82f6";

/// One drawable node.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNode {
	/// Model id.
	pub id: String,
	/// Text drawn in the box.
	pub label: String,
	/// Drives the badge.
	pub materialization: Materialization,
	/// Drives the accent.
	pub resource_type: ResourceType,
	/// Left-border color.
	pub accent: &'static str,
	/// Left edge in graph space.
	pub x: f64,
	/// Top edge in graph space.
	pub y: f64,
	/// Box width.
	pub width: f64,
	/// Box height.
	pub height: f64,
	/// The current selection.
	pub selected: bool,
	/// The model a focused view is centred on.
	pub focal: bool,
	/// No failing tests.
	pub healthy: bool,
}

impl DisplayNode {
	/// Ring color, if the node is emphasised. Focal wins over selected.
	pub fn ring(&self) -> Option<&'static str> {
		if self.focal {
			Some(FOCAL_RING)
		} else if self.selected {
			Some(SELECTED_RING)
		} else {
			None
		}
	}

	/// Whether a graph-space point hits the node.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
	}
}

/// One drawable edge.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayEdge {
	/// `e-source->target`
	pub id: String,
	/// Upstream model id.
	pub source: String,
	/// Downstream model id.
	pub target: String,
	/// Polyline in graph space.
	pub points: Vec<Point>,
	/// Stroke color.
	pub stroke: &'static str,
	/// Stroke width.
	pub stroke_width: f64,
}

/// Everything the rendering surface needs for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	/// Nodes in draw order.
	pub nodes: Vec<DisplayNode>,
	/// Edges, drawn beneath the nodes.
	pub edges: Vec<DisplayEdge>,
	/// Drawing width in graph space.
	pub width: f64,
	/// Drawing height in graph space.
	pub height: f64,
}

impl Scene {
	/// Whether there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Topmost node under a graph-space point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&DisplayNode> {
		self.nodes.iter().rev().find(|n| n.contains(x, y))
	}

	/// Ids of the nodes sharing an edge with `id`.
	pub fn neighbours<'s>(&'s self, id: &'s str) -> impl Iterator<Item = &'s str> + 's {
		self.edges.iter().filter_map(move |e| {
			if e.source == id {
				Some(e.target.as_str())
			} else if e.target == id {
				Some(e.source.as_str())
			} else {
				None
			}
		})
	}
}

/// Pairs every laid-out node with its model and the interaction state.
///
/// Laid-out ids that do not resolve in `catalog` are skipped.
pub fn build_scene(
	catalog: &LineageCatalog,
	layout: &Layout,
	selection: &Selection,
	focal: Option<&str>,
) -> Scene {
	let nodes = layout
		.nodes
		.iter()
		.filter_map(|placed| {
			let model = catalog.resolve(&placed.id)?;
			let resource_type = classify(model);
			Some(DisplayNode {
				id: model.id.clone(),
				label: model.name.clone(),
				materialization: model.materialization,
				resource_type,
				accent: resource_type.color(),
				x: placed.x,
				y: placed.y,
				width: placed.width,
				height: placed.height,
				selected: selection.is_selected(&model.id),
				focal: focal == Some(model.id.as_str()),
				healthy: model.is_healthy(),
			})
		})
		.collect();

	let edges = layout
		.edges
		.iter()
		.map(|e| DisplayEdge {
			id: format!("e-{}->{}", e.source, e.target),
			source: e.source.clone(),
			target: e.target.clone(),
			points: e.points.clone(),
			stroke: EDGE_STROKE,
			stroke_width: EDGE_STROKE_WIDTH,
		})
		.collect();

	Scene {
		nodes,
		edges,
		width: layout.width,
		height: layout.height,
	}
}

fn scene_for(
	catalog: &LineageCatalog,
	subgraph: &Subgraph<'_>,
	selection: &Selection,
	focal: Option<&str>,
	config: &LayoutConfig,
) -> Scene {
	let layout = layout_subgraph(subgraph, config);
	build_scene(catalog, &layout, selection, focal)
}

/// Filter, lay out and map the whole catalog.
pub fn overview_scene(
	catalog: &LineageCatalog,
	filter: &ResourceFilter,
	selection: &Selection,
	config: &LayoutConfig,
) -> Scene {
	let subgraph = filter_by_type(catalog, filter);
	debug!(
		"overview: {} of {} model(s) visible",
		subgraph.models.len(),
		catalog.len()
	);
	scene_for(catalog, &subgraph, selection, None, config)
}

/// Lay out and map the closure of `focal`, or `None` if it is unknown.
pub fn focused_scene(catalog: &LineageCatalog, focal: &str, config: &LayoutConfig) -> Option<Scene> {
	let subgraph = lineage_subgraph(catalog, focal)?;
	debug!("focused view of {focal}: {} model(s)", subgraph.models.len());
	Some(scene_for(
		catalog,
		&subgraph,
		&Selection::NoSelection,
		Some(focal),
		config,
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lineage::testing::{catalog_of, tagged};

	fn sample() -> LineageCatalog {
		catalog_of(
			vec![
				tagged("src", "raw", &["source"]),
				tagged("stg", "staging", &[]),
				tagged("daily", "metrics", &[]),
				tagged("other", "marts", &[]),
			],
			&[("src", "stg"), ("stg", "daily")],
		)
	}

	#[test]
	fn accents_follow_resource_type() {
		let catalog = sample();
		let scene = overview_scene(
			&catalog,
			&ResourceFilter::all(),
			&Selection::NoSelection,
			&LayoutConfig::default(),
		);
		let accent = |id: &str| scene.nodes.iter().find(|n| n.id == id).unwrap().accent;
		assert_eq!(accent("src"), ResourceType::Source.color());
		assert_eq!(accent("stg"), ResourceType::Model.color());
		assert_eq!(accent("daily"), ResourceType::Metric.color());
		assert!(scene.edges.iter().all(|e| e.stroke == EDGE_STROKE));
		assert_eq!(scene.edges[0].id, "e-src->stg");
	}

	#[test]
	fn selection_flags_exactly_one_node() {
		let catalog = sample();
		let scene = overview_scene(
			&catalog,
			&ResourceFilter::all(),
			&Selection::Selected("stg".into()),
			&LayoutConfig::default(),
		);
		let flagged: Vec<_> = scene.nodes.iter().filter(|n| n.selected).map(|n| n.id.as_str()).collect();
		assert_eq!(flagged, vec!["stg"]);
		assert_eq!(scene.nodes.iter().find(|n| n.selected).unwrap().ring(), Some(SELECTED_RING));
	}

	#[test]
	fn focused_scene_marks_the_focal_node() {
		let catalog = sample();
		let scene = focused_scene(&catalog, "stg", &LayoutConfig::default()).unwrap();
		let ids: Vec<_> = scene.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["src", "stg", "daily"]);
		assert!(scene.nodes.iter().filter(|n| n.focal).all(|n| n.id == "stg"));
		assert_eq!(scene.nodes.iter().filter(|n| n.focal).count(), 1);
		assert!(focused_scene(&catalog, "ghost", &LayoutConfig::default()).is_none());
	}

	#[test]
	fn hit_testing_and_neighbours() {
		let catalog = sample();
		let scene = focused_scene(&catalog, "stg", &LayoutConfig::default()).unwrap();
		let stg = scene.nodes.iter().find(|n| n.id == "stg").unwrap();
		let hit = scene.node_at(stg.x + 1.0, stg.y + 1.0).map(|n| n.id.as_str());
		assert_eq!(hit, Some("stg"));
		assert!(scene.node_at(-10.0, -10.0).is_none());

		let mut neighbours: Vec<_> = scene.neighbours("stg").collect();
		neighbours.sort();
		assert_eq!(neighbours, vec!["daily", "src"]);
	}

	#[test]
	fn empty_filter_gives_empty_scene() {
		let scene = overview_scene(
			&sample(),
			&ResourceFilter::none(),
			&Selection::NoSelection,
			&LayoutConfig::default(),
		);
		assert!(scene.is_empty());
		assert!(scene.edges.is_empty());
	}
}

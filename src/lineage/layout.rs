//! Layered (Sugiyama-style) layout for dependency graphs.
//!
//! Ranks come from a longest-path pass over the graph with back edges
//! removed, nodes inside a rank are ordered by alternating barycenter sweeps,
//! and disconnected components are stacked along the cross axis. Every step
//! iterates in input order, so equal inputs give equal layouts.

use std::collections::HashMap;

use log::{debug, warn};
use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::{DfsEvent, EdgeRef, depth_first_search};

use super::filter::Subgraph;

/// Direction edges flow in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankDirection {
	/// Ranks are columns, upstream on the left.
	#[default]
	LeftRight,
	/// Ranks are rows, upstream on top.
	TopBottom,
}

/// Layout geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Width given to every node built from a [`Subgraph`].
	pub node_width: f64,
	/// Height given to every node built from a [`Subgraph`].
	pub node_height: f64,
	/// Minimum gap between neighbours within one rank.
	pub node_sep: f64,
	/// Gap between consecutive ranks.
	pub rank_sep: f64,
	/// Gap between disconnected components.
	pub component_sep: f64,
	/// Direction edges flow in.
	pub direction: RankDirection,
	/// Barycenter sweeps, alternating down and up.
	pub ordering_passes: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_width: 200.0,
			node_height: 50.0,
			node_sep: 40.0,
			rank_sep: 120.0,
			component_sep: 80.0,
			direction: RankDirection::LeftRight,
			ordering_passes: 4,
		}
	}
}

/// A node to be placed.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	/// Unique id; later duplicates are ignored.
	pub id: String,
	/// Box width.
	pub width: f64,
	/// Box height.
	pub height: f64,
}

/// A point in layout coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

/// A placed node. `x`/`y` is the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	/// Id of the input node.
	pub id: String,
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Box width.
	pub width: f64,
	/// Box height.
	pub height: f64,
	/// Layer index within the node's component.
	pub rank: usize,
	/// Index of the connected component the node belongs to.
	pub component: usize,
}

impl PositionedNode {
	/// Center of the node's box.
	pub fn center(&self) -> Point {
		Point {
			x: self.x + self.width / 2.0,
			y: self.y + self.height / 2.0,
		}
	}

	/// Whether the point lies inside the node's box.
	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
	}
}

/// An edge with its polyline route.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedEdge {
	/// Upstream node id.
	pub source: String,
	/// Downstream node id.
	pub target: String,
	/// Start, two elbows, end.
	pub points: Vec<Point>,
}

/// Result of a layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	/// Nodes in input order.
	pub nodes: Vec<PositionedNode>,
	/// Edges in input order, unknown endpoints and duplicates removed.
	pub edges: Vec<RoutedEdge>,
	/// Horizontal extent of the whole drawing.
	pub width: f64,
	/// Vertical extent of the whole drawing.
	pub height: f64,
}

impl Layout {
	/// Looks a placed node up by id.
	pub fn node(&self, id: &str) -> Option<&PositionedNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Whether nothing was placed.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Lays a subgraph out with uniform node sizes from `config`.
pub fn layout_subgraph(subgraph: &Subgraph<'_>, config: &LayoutConfig) -> Layout {
	let nodes: Vec<LayoutNode> = subgraph
		.models
		.iter()
		.map(|m| LayoutNode {
			id: m.id.clone(),
			width: config.node_width,
			height: config.node_height,
		})
		.collect();
	let edges = subgraph
		.edges
		.iter()
		.map(|e| (e.source.as_str(), e.target.as_str()));
	layout(&nodes, edges, config)
}

/// Places `nodes` and routes `edges`.
///
/// Edges naming an unknown node, self loops and repeated edges are dropped
/// before layout. Cycles are tolerated: the edges closing them are ignored
/// for ranking and still routed.
pub fn layout<'a>(
	nodes: &[LayoutNode],
	edges: impl IntoIterator<Item = (&'a str, &'a str)>,
	config: &LayoutConfig,
) -> Layout {
	if nodes.is_empty() {
		return Layout::default();
	}

	let graph = Graph::build(nodes, edges);
	let back = graph.back_edges();
	if back.iter().any(|&b| b) {
		warn!(
			"layout: {} edge(s) close a cycle and were ignored for ranking",
			back.iter().filter(|&&b| b).count()
		);
	}

	let components = graph.components();
	let ranks = graph.ranks(&back, &components);
	let mut layers = graph.layers(&ranks, &components);
	graph.order_layers(&mut layers, &ranks, config.ordering_passes);
	let result = graph.place(&layers, &ranks, &components, config);

	debug!(
		"layout: {} node(s), {} edge(s), {} component(s)",
		result.nodes.len(),
		result.edges.len(),
		layers.len()
	);
	result
}

struct Graph<'n> {
	graph: DiGraph<&'n LayoutNode, ()>,
}

impl<'n> Graph<'n> {
	fn build<'a>(input: &'n [LayoutNode], edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		let mut graph = DiGraph::with_capacity(input.len(), 0);
		let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(input.len());
		for node in input {
			if !index.contains_key(node.id.as_str()) {
				index.insert(node.id.as_str(), graph.add_node(node));
			}
		}

		let mut dropped = 0usize;
		for (source, target) in edges {
			match (index.get(source), index.get(target)) {
				(Some(&u), Some(&v)) if u != v => {
					if !graph.contains_edge(u, v) {
						graph.add_edge(u, v, ());
					}
				}
				_ => dropped += 1,
			}
		}
		if dropped > 0 {
			debug!("layout: dropped {dropped} edge(s) with unknown or identical endpoints");
		}

		Self { graph }
	}

	fn len(&self) -> usize {
		self.graph.node_count()
	}

	fn node(&self, v: usize) -> &'n LayoutNode {
		self.graph[NodeIndex::new(v)]
	}

	/// Marks the edges that point back into the active DFS path.
	fn back_edges(&self) -> Vec<bool> {
		let mut back = vec![false; self.graph.edge_count()];
		if !is_cyclic_directed(&self.graph) {
			return back;
		}
		depth_first_search(&self.graph, self.graph.node_indices(), |event| {
			let edge = match event {
				DfsEvent::BackEdge(u, v) => self.graph.find_edge(u, v),
				_ => None,
			};
			if let Some(e) = edge {
				back[e.index()] = true;
			}
		});
		back
	}

	/// Component id per node, numbered by first appearance.
	fn components(&self) -> Vec<usize> {
		let mut sets = UnionFind::new(self.len());
		for edge in self.graph.edge_references() {
			sets.union(edge.source().index(), edge.target().index());
		}
		let mut ids = HashMap::new();
		sets.into_labeling()
			.into_iter()
			.map(|root| {
				let next = ids.len();
				*ids.entry(root).or_insert(next)
			})
			.collect()
	}

	/// Longest-path ranking over forward edges, with pure sources pulled up
	/// against their nearest consumer.
	fn ranks(&self, back: &[bool], components: &[usize]) -> Vec<usize> {
		// Node indices survive the filter; only back edges are removed.
		let dag = self
			.graph
			.filter_map(|_, &n| Some(n), |e, _| (!back[e.index()]).then_some(()));
		let order = toposort(&dag, None).unwrap_or_else(|cycle| {
			warn!("layout: cycle through node {} survived back-edge removal", cycle.node_id().index());
			dag.node_indices().collect()
		});

		let mut rank = vec![0usize; self.len()];
		for &u in &order {
			for v in dag.neighbors(u) {
				rank[v.index()] = rank[v.index()].max(rank[u.index()] + 1);
			}
		}

		for u in dag.node_indices() {
			if dag.neighbors_directed(u, Direction::Incoming).next().is_some() {
				continue;
			}
			if let Some(nearest) = dag.neighbors(u).map(|v| rank[v.index()]).min() {
				rank[u.index()] = nearest.saturating_sub(1);
			}
		}

		// Each component starts at rank 0.
		let count = components.iter().max().map_or(0, |&c| c + 1);
		let mut floor = vec![usize::MAX; count];
		for (v, &c) in components.iter().enumerate() {
			floor[c] = floor[c].min(rank[v]);
		}
		for (v, &c) in components.iter().enumerate() {
			rank[v] -= floor[c];
		}
		rank
	}

	/// `layers[component][rank]`, nodes in input order.
	fn layers(&self, ranks: &[usize], components: &[usize]) -> Vec<Vec<Vec<usize>>> {
		let count = components.iter().max().map_or(0, |&c| c + 1);
		let mut layers: Vec<Vec<Vec<usize>>> = vec![Vec::new(); count];
		for v in 0..self.len() {
			let layer = &mut layers[components[v]];
			if layer.len() <= ranks[v] {
				layer.resize(ranks[v] + 1, Vec::new());
			}
			layer[ranks[v]].push(v);
		}
		layers
	}

	/// Reorders each rank by the mean position of its neighbours in
	/// earlier ranks (down sweep) or later ranks (up sweep).
	fn order_layers(&self, layers: &mut [Vec<Vec<usize>>], ranks: &[usize], passes: usize) {
		let mut pos = vec![0usize; self.len()];
		for component in layers.iter() {
			for layer in component {
				for (i, &v) in layer.iter().enumerate() {
					pos[v] = i;
				}
			}
		}

		for pass in 0..passes {
			let downward = pass % 2 == 0;
			for component in layers.iter_mut() {
				let sweep: Vec<usize> = if downward {
					(1..component.len()).collect()
				} else {
					(0..component.len().saturating_sub(1)).rev().collect()
				};
				for r in sweep {
					let mut keyed: Vec<(f64, usize, usize)> = component[r]
						.iter()
						.map(|&v| {
							let (sum, count) = self
								.graph
								.neighbors_undirected(NodeIndex::new(v))
								.map(|u| u.index())
								.filter(|&u| if downward { ranks[u] < r } else { ranks[u] > r })
								.fold((0.0, 0usize), |(s, c), u| (s + pos[u] as f64, c + 1));
							let barycenter = if count == 0 {
								pos[v] as f64
							} else {
								sum / count as f64
							};
							(barycenter, pos[v], v)
						})
						.collect();
					keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
					component[r] = keyed.into_iter().map(|(_, _, v)| v).collect();
					for (i, &v) in component[r].iter().enumerate() {
						pos[v] = i;
					}
				}
			}
		}
	}

	fn place(
		&self,
		layers: &[Vec<Vec<usize>>],
		ranks: &[usize],
		components: &[usize],
		config: &LayoutConfig,
	) -> Layout {
		let horizontal = config.direction == RankDirection::LeftRight;
		// (along the flow, across the flow)
		let extent = |v: usize| {
			let n = self.node(v);
			if horizontal {
				(n.width, n.height)
			} else {
				(n.height, n.width)
			}
		};

		let mut along = vec![0.0; self.len()];
		let mut across = vec![0.0; self.len()];
		let mut base = 0.0;
		let mut total_along: f64 = 0.0;

		for component in layers {
			let mut offset = 0.0;
			let mut span: f64 = 0.0;
			let mut layer_spans = Vec::with_capacity(component.len());

			for layer in component {
				let depth = layer.iter().map(|&v| extent(v).0).fold(0.0, f64::max);
				let mut cursor = 0.0;
				for &v in layer {
					let (a, c) = extent(v);
					along[v] = offset + (depth - a) / 2.0;
					across[v] = cursor;
					cursor += c + config.node_sep;
				}
				let layer_span = (cursor - config.node_sep).max(0.0);
				span = span.max(layer_span);
				layer_spans.push(layer_span);
				offset += depth + config.rank_sep;
			}
			total_along = total_along.max(offset - config.rank_sep);

			for (layer, layer_span) in component.iter().zip(layer_spans) {
				let shift = base + (span - layer_span) / 2.0;
				for &v in layer {
					across[v] += shift;
				}
			}
			base += span + config.component_sep;
		}
		let total_across = (base - config.component_sep).max(0.0);

		let nodes: Vec<PositionedNode> = (0..self.len())
			.map(|v| {
				let n = self.node(v);
				let (x, y) = if horizontal {
					(along[v], across[v])
				} else {
					(across[v], along[v])
				};
				PositionedNode {
					id: n.id.clone(),
					x,
					y,
					width: n.width,
					height: n.height,
					rank: ranks[v],
					component: components[v],
				}
			})
			.collect();

		let edges = self
			.graph
			.edge_references()
			.map(|e| (e.source().index(), e.target().index()))
			.map(|(u, v)| RoutedEdge {
				source: nodes[u].id.clone(),
				target: nodes[v].id.clone(),
				points: route(&nodes[u], &nodes[v], horizontal),
			})
			.collect();

		let (width, height) = if horizontal {
			(total_along, total_across)
		} else {
			(total_across, total_along)
		};
		Layout {
			nodes,
			edges,
			width,
			height,
		}
	}
}

/// Step route from the source's trailing side to the target's leading side.
fn route(from: &PositionedNode, to: &PositionedNode, horizontal: bool) -> Vec<Point> {
	let (a, b) = (from.center(), to.center());
	if horizontal {
		let start = Point { x: from.x + from.width, y: a.y };
		let end = Point { x: to.x, y: b.y };
		let mid = (start.x + end.x) / 2.0;
		vec![start, Point { x: mid, y: start.y }, Point { x: mid, y: end.y }, end]
	} else {
		let start = Point { x: a.x, y: from.y + from.height };
		let end = Point { x: b.x, y: to.y };
		let mid = (start.y + end.y) / 2.0;
		vec![start, Point { x: start.x, y: mid }, Point { x: end.x, y: mid }, end]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nodes(ids: &[&str]) -> Vec<LayoutNode> {
		let config = LayoutConfig::default();
		ids.iter()
			.map(|id| LayoutNode {
				id: id.to_string(),
				width: config.node_width,
				height: config.node_height,
			})
			.collect()
	}

	fn run(ids: &[&str], edges: &[(&str, &str)]) -> Layout {
		layout(&nodes(ids), edges.iter().copied(), &LayoutConfig::default())
	}

	fn rank(layout: &Layout, id: &str) -> usize {
		layout.node(id).unwrap().rank
	}

	fn overlaps(a: &PositionedNode, b: &PositionedNode) -> bool {
		a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
	}

	#[test]
	fn empty_input_is_empty_output() {
		let result = layout(&[], std::iter::empty(), &LayoutConfig::default());
		assert!(result.is_empty());
		assert!(result.edges.is_empty());
	}

	#[test]
	fn edges_to_unknown_nodes_are_dropped() {
		let result = run(&["a", "b"], &[("a", "b"), ("a", "ghost"), ("ghost", "b"), ("a", "a")]);
		assert_eq!(result.nodes.len(), 2);
		assert_eq!(result.edges.len(), 1);
		assert_eq!(result.edges[0].source, "a");
	}

	#[test]
	fn ranks_increase_along_edges() {
		let edges = [("a", "b"), ("b", "c"), ("a", "c"), ("c", "d"), ("b", "d")];
		let result = run(&["d", "c", "b", "a"], &edges);
		for (s, t) in edges {
			assert!(rank(&result, s) < rank(&result, t), "{s} -> {t}");
		}
		assert_eq!(rank(&result, "a"), 0);
		assert_eq!(rank(&result, "d"), 3);
	}

	#[test]
	fn flow_is_left_to_right() {
		let config = LayoutConfig::default();
		let result = run(&["a", "b"], &[("a", "b")]);
		let (a, b) = (result.node("a").unwrap(), result.node("b").unwrap());
		assert!(a.x + a.width + config.rank_sep <= b.x + 1e-9);
		let route = &result.edges[0].points;
		assert_eq!(route.first().unwrap().x, a.x + a.width);
		assert_eq!(route.last().unwrap().x, b.x);
	}

	#[test]
	fn top_bottom_flows_downward() {
		let config = LayoutConfig {
			direction: RankDirection::TopBottom,
			..LayoutConfig::default()
		};
		let result = layout(&nodes(&["a", "b"]), [("a", "b")], &config);
		let (a, b) = (result.node("a").unwrap(), result.node("b").unwrap());
		assert!(a.y + a.height <= b.y);
		assert_eq!(a.x, b.x);
	}

	#[test]
	fn sources_sit_next_to_their_consumer() {
		let result = run(&["a", "b", "c", "d", "x"], &[("a", "b"), ("b", "c"), ("c", "d"), ("x", "d")]);
		assert_eq!(rank(&result, "x"), 2);
	}

	#[test]
	fn nodes_in_a_rank_keep_their_distance() {
		let config = LayoutConfig::default();
		let result = run(&["r", "a", "b", "c"], &[("r", "a"), ("r", "b"), ("r", "c")]);
		let mut column: Vec<_> = result.nodes.iter().filter(|n| n.rank == 1).collect();
		column.sort_by(|a, b| a.y.total_cmp(&b.y));
		assert_eq!(column.len(), 3);
		for pair in column.windows(2) {
			assert!(pair[0].y + pair[0].height + config.node_sep <= pair[1].y + 1e-9);
		}
	}

	#[test]
	fn components_do_not_overlap() {
		let result = run(&["a", "b", "c", "d", "e"], &[("a", "b"), ("c", "d")]);
		assert_eq!(result.node("e").unwrap().component, 2);
		for (i, n) in result.nodes.iter().enumerate() {
			for m in &result.nodes[i + 1..] {
				assert!(!overlaps(n, m), "{} overlaps {}", n.id, m.id);
			}
		}
		assert!(result.nodes.iter().all(|n| n.y + n.height <= result.height + 1e-9));
	}

	#[test]
	fn deterministic() {
		let edges = [("a", "c"), ("b", "c"), ("c", "d"), ("b", "e"), ("e", "d")];
		let ids = ["a", "b", "c", "d", "e"];
		assert_eq!(run(&ids, &edges), run(&ids, &edges));
	}

	#[test]
	fn barycenter_uncrosses_a_swap() {
		// Input order x, y, z in the second rank would cross a -> y with b -> x.
		let result = run(
			&["a", "b", "x", "y", "z"],
			&[("a", "y"), ("b", "x"), ("a", "z"), ("b", "z")],
		);
		let y = |id: &str| result.node(id).unwrap().y;
		assert!(y("a") < y("b"));
		assert!(y("y") < y("z"));
		assert!(y("z") < y("x"));
	}

	#[test]
	fn cycles_are_laid_out() {
		let result = run(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
		assert_eq!(result.nodes.len(), 3);
		assert_eq!(result.edges.len(), 3);
		assert!(rank(&result, "a") < rank(&result, "b"));
		assert!(rank(&result, "b") < rank(&result, "c"));
	}

	#[test]
	fn cycle_inside_a_chain_keeps_one_component() {
		let result = run(&["s", "a", "b", "c"], &[("s", "a"), ("a", "b"), ("b", "a"), ("b", "c")]);
		assert_eq!(result.edges.len(), 4);
		assert!(result.nodes.iter().all(|n| n.component == 0));
		assert_eq!(rank(&result, "s"), 0);
		assert!(rank(&result, "a") < rank(&result, "b"));
		assert!(rank(&result, "b") < rank(&result, "c"));
	}
}

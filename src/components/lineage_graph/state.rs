use std::collections::HashSet;

use crate::lineage::Scene;

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 2.0;
/// Screen-space padding kept around the scene when fitting it to view.
pub const FIT_PADDING: f64 = 40.0;
/// Pointer travel (px) below which a press-release counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub travel: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<String>,
	pub neighbors: HashSet<String>,
	pub highlight_t: f64,
	pub prev_node: Option<String>,
	pub prev_neighbors: HashSet<String>,
	delay_t: f64,
}

/// What a pointer release amounted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Release {
	Node(String),
	Background,
	/// The pointer moved: the gesture was a pan.
	Drag,
}

pub struct LineageGraphState {
	pub scene: Scene,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl LineageGraphState {
	pub fn new(scene: Scene, width: f64, height: f64) -> Self {
		let mut state = Self {
			scene,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		};
		state.fit_to_view();
		state
	}

	/// Swaps in a recomputed scene. The view is refitted only when the set
	/// of nodes changed, so toggling a selection does not jump the camera.
	pub fn set_scene(&mut self, scene: Scene) {
		let same_nodes = scene.nodes.len() == self.scene.nodes.len()
			&& scene
				.nodes
				.iter()
				.zip(&self.scene.nodes)
				.all(|(a, b)| a.id == b.id && a.x == b.x && a.y == b.y);
		self.scene = scene;
		if let Some(id) = self.hover.node.clone() {
			if self.scene.nodes.iter().any(|n| n.id == id) {
				self.hover.neighbors = self.neighbours_of(&id);
			} else {
				self.set_hover(None);
			}
		}
		if !same_nodes {
			self.fit_to_view();
		}
	}

	/// Centers the scene and zooms so it fits, within the zoom clamp.
	pub fn fit_to_view(&mut self) {
		if self.scene.is_empty() || self.width <= 0.0 || self.height <= 0.0 {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		}
		let (avail_w, avail_h) = (
			(self.width - 2.0 * FIT_PADDING).max(1.0),
			(self.height - 2.0 * FIT_PADDING).max(1.0),
		);
		let k = (avail_w / self.scene.width.max(1.0))
			.min(avail_h / self.scene.height.max(1.0))
			.clamp(MIN_ZOOM, MAX_ZOOM);
		self.transform = ViewTransform {
			x: (self.width - self.scene.width * k) / 2.0,
			y: (self.height - self.scene.height * k) / 2.0,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.scene.node_at(gx, gy).map(|n| n.id.clone())
	}

	fn neighbours_of(&self, id: &str) -> HashSet<String> {
		self.scene.neighbours(id).map(str::to_string).collect()
	}

	pub fn set_hover(&mut self, node: Option<String>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the old highlight around so it can fade out.
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.neighbors.clear();
		if let Some(id) = &node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			self.hover.neighbors = self.neighbours_of(id);
		}
		self.hover.node = node;
	}

	pub fn is_highlighted(&self, id: &str) -> bool {
		self.hover.node.as_deref() == Some(id)
			|| self.hover.neighbors.contains(id)
			|| self.hover.prev_node.as_deref() == Some(id)
			|| self.hover.prev_neighbors.contains(id)
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.hover.node.as_deref() == Some(id) || self.hover.prev_node.as_deref() == Some(id)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
			travel: 0.0,
		};
	}

	pub fn pan_to(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		self.pan.travel = self.pan.travel.max((dx * dx + dy * dy).sqrt());
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
	}

	/// Ends a press. Short presses resolve to whatever lies under the pointer.
	pub fn end_pan(&mut self, x: f64, y: f64) -> Release {
		let was_active = std::mem::replace(&mut self.pan.active, false);
		if !was_active || self.pan.travel > CLICK_SLOP {
			return Release::Drag;
		}
		match self.node_at_position(x, y) {
			Some(id) => Release::Node(id),
			None => Release::Background,
		}
	}

	pub fn cancel_pan(&mut self) {
		self.pan.active = false;
	}

	/// Zooms by `factor` keeping the screen point `(x, y)` fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = k;
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.fit_to_view();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lineage::testing::chain;
	use crate::lineage::{LayoutConfig, ResourceFilter, Selection, overview_scene};

	fn state() -> LineageGraphState {
		let catalog = chain(&["a", "b", "c"]);
		let scene = overview_scene(
			&catalog,
			&ResourceFilter::all(),
			&Selection::NoSelection,
			&LayoutConfig::default(),
		);
		LineageGraphState::new(scene, 1200.0, 600.0)
	}

	fn screen_center_of(state: &LineageGraphState, id: &str) -> (f64, f64) {
		let n = state.scene.nodes.iter().find(|n| n.id == id).unwrap();
		let t = &state.transform;
		(
			(n.x + n.width / 2.0) * t.k + t.x,
			(n.y + n.height / 2.0) * t.k + t.y,
		)
	}

	#[test]
	fn fit_keeps_the_scene_on_screen() {
		let s = state();
		let t = &s.transform;
		assert!(t.k >= MIN_ZOOM && t.k <= MAX_ZOOM);
		assert!(t.x >= 0.0 && t.x + s.scene.width * t.k <= s.width + 1e-9);
	}

	#[test]
	fn short_press_on_a_node_is_a_click() {
		let mut s = state();
		let (x, y) = screen_center_of(&s, "b");
		s.begin_pan(x, y);
		s.pan_to(x + 1.0, y);
		assert_eq!(s.end_pan(x + 1.0, y), Release::Node("b".into()));
	}

	#[test]
	fn press_on_empty_space_is_a_background_click() {
		let mut s = state();
		s.begin_pan(1.0, 1.0);
		assert_eq!(s.end_pan(1.0, 1.0), Release::Background);
	}

	#[test]
	fn long_drag_pans_instead_of_clicking() {
		let mut s = state();
		let before = s.transform.clone();
		s.begin_pan(10.0, 10.0);
		s.pan_to(60.0, 30.0);
		assert_eq!(s.end_pan(60.0, 30.0), Release::Drag);
		assert_eq!(s.transform.x, before.x + 50.0);
		assert_eq!(s.transform.y, before.y + 20.0);
	}

	#[test]
	fn hover_highlights_direct_neighbours() {
		let mut s = state();
		s.set_hover(Some("b".into()));
		assert!(s.is_hovered("b"));
		assert!(s.is_highlighted("a") && s.is_highlighted("c"));

		s.set_hover(Some("a".into()));
		assert!(s.is_highlighted("b"));
		assert!(!s.is_highlighted("c"));

		s.set_hover(None);
		assert!(s.has_active_highlight());
		for _ in 0..400 {
			s.tick(0.016);
		}
		assert!(!s.has_active_highlight());
	}

	#[test]
	fn zoom_is_clamped_and_anchored() {
		let mut s = state();
		let anchor = (300.0, 200.0);
		let before = s.screen_to_graph(anchor.0, anchor.1);
		s.zoom_at(anchor.0, anchor.1, 1.1);
		let after = s.screen_to_graph(anchor.0, anchor.1);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);

		for _ in 0..100 {
			s.zoom_at(0.0, 0.0, 10.0);
		}
		assert_eq!(s.transform.k, MAX_ZOOM);
	}

	#[test]
	fn selection_changes_do_not_refit() {
		let mut s = state();
		s.begin_pan(0.0, 0.0);
		s.pan_to(100.0, 0.0);
		s.end_pan(100.0, 0.0);
		let panned = s.transform.clone();

		let mut scene = s.scene.clone();
		scene.nodes[0].selected = true;
		s.set_scene(scene);
		assert_eq!(s.transform, panned);
	}
}

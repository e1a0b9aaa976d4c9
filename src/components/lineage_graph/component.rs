use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{LineageGraphState, Release};
use crate::lineage::Scene;

type SharedState = Rc<RefCell<Option<LineageGraphState>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn with_state(state: &SharedState, f: impl FnOnce(&mut LineageGraphState)) {
	if let Some(ref mut s) = *state.borrow_mut() {
		f(s);
	}
}

/// Pannable, zoomable canvas drawing a lineage [`Scene`].
///
/// Clicks are reported, never acted on: the owning view decides whether a
/// node click selects or navigates.
#[component]
pub fn LineageGraphCanvas(
	#[prop(into)] scene: Signal<Scene>,
	#[prop(into)] on_node_click: Callback<String>,
	#[prop(optional, into)] on_background_click: Option<Callback<()>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (state_init, animate_init, resize_cb_init, alive_init) =
		(state.clone(), animate.clone(), resize_cb.clone(), alive.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window; lineage canvas not started");
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("2d context unavailable; lineage canvas not started");
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		*state_init.borrow_mut() = Some(LineageGraphState::new(scene.get_untracked(), w, h));
		debug!("lineage canvas started at {w}x{h}");

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			with_state(&state_resize, |s| s.resize(nw, nh));
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, resize_inner, alive_anim) = (
			state_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			alive_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if !alive_anim.load(Ordering::Relaxed) {
				if let Some(ref cb) = *resize_inner.borrow() {
					let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				debug!("lineage canvas stopped");
				return;
			}
			with_state(&state_anim, |s| {
				s.tick(0.016);
				render::render(s, &ctx);
			});
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_scene = state.clone();
	Effect::new(move |_| {
		let next = scene.get();
		with_state(&state_scene, |s| s.set_scene(next));
	});

	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		with_state(&state_md, |s| s.begin_pan(x, y));
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		with_state(&state_mm, |s| {
			if s.pan.active {
				s.pan_to(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		});
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		// Release the borrow before handing control to the owner.
		let release = state_mu.borrow_mut().as_mut().map(|s| s.end_pan(x, y));
		match release {
			Some(Release::Node(id)) => on_node_click.run(id),
			Some(Release::Background) => {
				if let Some(cb) = on_background_click {
					cb.run(());
				}
			}
			Some(Release::Drag) | None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state(&state_ml, |s| {
			s.cancel_pan();
			s.set_hover(None);
		});
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		with_state(&state_wh, |s| s.zoom_at(x, y, factor));
	};

	let (state_in, state_out, state_fit) = (state.clone(), state.clone(), state);
	let zoom_center = move |s: &mut LineageGraphState, factor: f64| {
		let (cx, cy) = (s.width / 2.0, s.height / 2.0);
		s.zoom_at(cx, cy, factor);
	};

	view! {
		<div class="lineage-graph">
			<canvas
				node_ref=canvas_ref
				class="lineage-graph__canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="lineage-graph__controls">
				<button title="Zoom in" on:click=move |_| with_state(&state_in, |s| zoom_center(s, 1.2))>
					"+"
				</button>
				<button title="Zoom out" on:click=move |_| with_state(&state_out, |s| zoom_center(s, 1.0 / 1.2))>
					"−"
				</button>
				<button title="Fit view" on:click=move |_| with_state(&state_fit, LineageGraphState::fit_to_view)>
					"Fit"
				</button>
			</div>
		</div>
	}
}

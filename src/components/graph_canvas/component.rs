use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::CanvasState;
use crate::browser_rng;
use crate::config::TransformConfig;
use crate::graph::GraphModel;
use crate::motion::{ControlState, TransformEngine};

/// Longest step the animation clock takes, so a backgrounded tab resumes smoothly.
const MAX_FRAME_DT: f64 = 0.1;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

#[component]
pub fn GraphCanvas(
	#[prop(into)] model: Signal<Arc<GraphModel>>,
	#[prop(into)] control: Signal<ControlState>,
	#[prop(optional)] transform: Option<TransformConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: Rc<RefCell<Option<CanvasState>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas has no 2d context");
			return;
		};
		let engine = TransformEngine::new(transform.clone().unwrap_or_default(), browser_rng());
		*state_init.borrow_mut() = Some(CanvasState::new(model.get_untracked(), engine, w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let mut last = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// A disposed signal means the page is gone; stop scheduling frames.
			let Some(control) = control.try_get_untracked() else {
				debug!("graph canvas unmounted, stopping animation");
				return;
			};
			let now = js_sys::Date::now();
			let dt = ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_DT);
			last = now;

			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(dt, control);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// New models are swapped into the running loop instead of restarting it.
	let state_swap = state.clone();
	Effect::new(move |_| {
		let next = model.get();
		if let Some(ref mut s) = *state_swap.borrow_mut() {
			s.set_model(next);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pan.active = true;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Cursor position relative to the canvas' top-left corner.
fn local_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::CanvasState;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap) = (8.0 / k, 4.0 / k);
	let t = ease_out_cubic(state.hover.highlight_t);
	// Tension speeds up the flow along links.
	let flow = 30.0 * (1.0 + 2.0 * state.control.tension);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
	ctx.set_line_dash_offset(-(state.elapsed * flow) % (dash + gap));

	for &(a, b) in state.edges() {
		let (p1, p2) = (&state.projected[a], &state.projected[b]);
		let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted = state.is_highlighted(a) && state.is_highlighted(b);
		let (alpha, width) = if is_highlighted {
			(0.5 + 0.4 * t, (1.5 + 0.5 * t) / k)
		} else {
			(0.5 - 0.4 * t, (1.5 - 0.5 * t) / k)
		};

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {alpha})"));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(p1.x + ux * p1.radius, p1.y + uy * p1.radius);
		ctx.line_to(p2.x - ux * p2.radius, p2.y - uy * p2.radius);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);
	let font = format!("{}px sans-serif", 10.0 / k.max(0.5));
	ctx.set_font(&font);

	for &idx in &state.draw_order {
		let (Some(node), p) = (state.node(idx), &state.projected[idx]) else {
			continue;
		};
		let highlighted = has_highlight && state.is_highlighted(idx);
		let hovered = highlighted && state.is_hovered(idx);
		let alpha = if has_highlight && !highlighted {
			1.0 - 0.7 * t
		} else {
			1.0
		};
		let radius = if hovered {
			p.radius * (1.0 + 0.35 * t)
		} else {
			p.radius
		};

		if hovered && t > 0.01 {
			let glow = radius * (1.8 + 1.2 * t);
			if let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, radius * 0.3, p.x, p.y, glow) {
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.35 * t));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(p.x, p.y, glow, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius.max(0.5), 0.0, 2.0 * PI);
		if node.is_placeholder() {
			ctx.set_stroke_style_str(&state.colors[idx]);
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		} else {
			ctx.set_fill_style_str(&state.colors[idx]);
			ctx.fill();
		}

		let caption = if hovered {
			node.label.as_deref().or(Some(node.id.as_str()))
		} else {
			node.label.as_deref()
		};
		if let Some(text) = caption {
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
			let _ = ctx.fill_text(text, p.x + radius + 3.0, p.y + 3.0);
		}
		ctx.set_global_alpha(1.0);
	}
}

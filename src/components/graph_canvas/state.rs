use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;

use crate::graph::{GraphModel, GraphNode, Group};
use crate::motion::{ControlState, Pose, TransformEngine};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];
const PLACEHOLDER_COLOR: &str = "#5c6370";

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;
/// Screen pixels per world unit at zoom 1 and zero depth.
pub const PIXELS_PER_UNIT: f64 = 6.0;
const CAMERA_DISTANCE: f64 = 160.0;
const MIN_DEPTH: f64 = 10.0;
/// Camera orbit speed in radians per second.
const ORBIT_SPEED: f64 = 0.15;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// A pose after the camera: graph-space 2D point, depth and on-screen radius.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	pub depth: f64,
	pub radius: f64,
}

pub struct CanvasState {
	pub model: Arc<GraphModel>,
	pub control: ControlState,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub elapsed: f64,
	pub yaw: f64,
	pub projected: Vec<Projected>,
	/// Node indices far to near.
	pub draw_order: Vec<usize>,
	pub colors: Vec<String>,
	engine: TransformEngine<StdRng>,
	poses: Vec<Pose>,
	edges: Vec<(usize, usize)>,
}

impl CanvasState {
	pub fn new(model: Arc<GraphModel>, engine: TransformEngine<StdRng>, width: f64, height: f64) -> Self {
		let mut state = Self {
			model: Arc::new(GraphModel::new()),
			control: ControlState::default(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			elapsed: 0.0,
			yaw: 0.0,
			projected: Vec::new(),
			draw_order: Vec::new(),
			colors: Vec::new(),
			engine,
			poses: Vec::new(),
			edges: Vec::new(),
		};
		state.set_model(model);
		state
	}

	/// Swaps in a new model; the animation clock keeps running.
	pub fn set_model(&mut self, model: Arc<GraphModel>) {
		if Arc::ptr_eq(&self.model, &model) {
			return;
		}
		self.edges = model.link_indices().collect();
		self.colors = model.nodes().iter().map(node_color).collect();
		self.model = model;
		self.hover = HoverState::default();
		self.recompute();
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Nearest node under the cursor, front to back.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.draw_order.iter().rev().copied().find(|&i| {
			let p = &self.projected[i];
			let (dx, dy) = (p.x - gx, p.y - gy);
			(dx * dx + dy * dy).sqrt() < HIT_RADIUS.max(p.radius)
		})
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.model.nodes().get(idx)
	}

	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the previous highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f64, control: ControlState) {
		self.elapsed += dt;
		self.yaw = (self.yaw + ORBIT_SPEED * dt) % std::f64::consts::TAU;
		self.control = control;
		self.recompute();
		self.ease_highlight(dt);
	}

	fn recompute(&mut self) {
		self.engine
			.compute_poses_into(&self.model, self.control, self.elapsed, &mut self.poses);

		let (sin, cos) = self.yaw.sin_cos();
		self.projected.clear();
		self.projected.extend(self.poses.iter().map(|pose| {
			let p = pose.position;
			let (x, z) = (p.x * cos - p.z * sin, p.x * sin + p.z * cos);
			let f = CAMERA_DISTANCE / (CAMERA_DISTANCE + z).max(MIN_DEPTH);
			Projected {
				x: x * f * PIXELS_PER_UNIT,
				y: -p.y * f * PIXELS_PER_UNIT,
				depth: z,
				radius: NODE_RADIUS * pose.scale * f,
			}
		}));

		self.draw_order.clear();
		self.draw_order.extend(0..self.projected.len());
		let projected = &self.projected;
		self.draw_order
			.sort_by(|&a, &b| projected[b].depth.total_cmp(&projected[a].depth));
	}

	fn ease_highlight(&mut self, dt: f64) {
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
	}
}

fn node_color(node: &GraphNode) -> String {
	if let Some(color) = &node.color {
		return color.clone();
	}
	let color = match &node.group {
		Group::Index(i) => COLORS[*i as usize % COLORS.len()],
		Group::Label(label) => {
			let hash = label
				.bytes()
				.fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32));
			COLORS[hash as usize % COLORS.len()]
		}
		Group::Unknown => PLACEHOLDER_COLOR,
	};
	color.to_string()
}

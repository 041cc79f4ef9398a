//! Per-frame pose computation.
//!
//! A node's pose depends only on its ingestion-time position, its base
//! scale, the current [`ControlState`] and the elapsed time. Expansion pushes
//! nodes radially away from the origin; tension adds jitter above one
//! threshold and a pulsing scale above another.

use rand::Rng;

use super::control::ControlState;
use crate::config::{DEFAULT_JITTER_AMPLITUDE, TransformConfig, span_or};
use crate::geometry::Vec3;
use crate::graph::{GraphModel, GraphNode};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
	pub position: Vec3,
	pub scale: f64,
}

pub struct TransformEngine<R> {
	config: TransformConfig,
	jitter: R,
}

impl<R: Rng> TransformEngine<R> {
	pub fn new(mut config: TransformConfig, jitter: R) -> Self {
		config.jitter_amplitude = span_or(config.jitter_amplitude, DEFAULT_JITTER_AMPLITUDE);
		Self { config, jitter }
	}

	pub fn compute_pose(&mut self, node: &GraphNode, control: ControlState, elapsed: f64) -> Pose {
		let cfg = &self.config;
		let ControlState { expansion, tension } = control;

		// Zero-length originals normalize to zero, so the origin never moves.
		let original = node.position;
		let expand = original
			.normalize_or_zero()
			.scale(expansion * cfg.expansion_scale);
		let mut position = original.add(expand);

		if tension > cfg.jitter_threshold {
			let a = cfg.jitter_amplitude;
			let mut noise = || self.jitter.gen_range(-a..=a) * tension;
			position = position.add(Vec3::new(noise(), noise(), noise()));
		}

		let mut scale = node.val * (1.0 + expansion);
		if tension > cfg.pulse_threshold {
			scale *= 1.0 + (elapsed * cfg.pulse_frequency).sin() * tension * cfg.pulse_amplitude;
		}

		Pose { position, scale }
	}

	/// Poses for every node of `model`, index-aligned with `model.nodes()`.
	/// Reuses `out` so steady-state frames do not allocate.
	pub fn compute_poses_into(
		&mut self,
		model: &GraphModel,
		control: ControlState,
		elapsed: f64,
		out: &mut Vec<Pose>,
	) {
		out.clear();
		out.extend(
			model
				.nodes()
				.iter()
				.map(|node| self.compute_pose(node, control, elapsed)),
		);
	}
}

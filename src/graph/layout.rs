use rand::Rng;

use crate::config::{DEFAULT_LAYOUT_HALF_WIDTH, span_or};
use crate::geometry::Vec3;

/// Supplies starting positions for nodes that arrive without coordinates.
pub trait LayoutSource {
	fn place(&mut self) -> Vec3;
}

/// Uniform scatter inside an origin-centered cube.
pub struct RandomCube<R> {
	rng: R,
	half_width: f64,
}

impl<R: Rng> RandomCube<R> {
	/// Negative widths are mirrored; unusable ones fall back to the default.
	pub fn new(rng: R, half_width: f64) -> Self {
		Self {
			rng,
			half_width: span_or(half_width, DEFAULT_LAYOUT_HALF_WIDTH),
		}
	}
}

impl<R: Rng> LayoutSource for RandomCube<R> {
	fn place(&mut self) -> Vec3 {
		if self.half_width == 0.0 {
			return Vec3::ZERO;
		}
		let h = self.half_width;
		Vec3::new(
			self.rng.gen_range(-h..h),
			self.rng.gen_range(-h..h),
			self.rng.gen_range(-h..h),
		)
	}
}

/// Puts every node at the same point.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedLayout(pub Vec3);

impl LayoutSource for FixedLayout {
	fn place(&mut self) -> Vec3 {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn random_cube_stays_inside_bounds() {
		let mut layout = RandomCube::new(StdRng::seed_from_u64(7), 20.0);
		for _ in 0..500 {
			let p = layout.place();
			for c in [p.x, p.y, p.z] {
				assert!((-20.0..20.0).contains(&c), "{c} outside cube");
			}
		}
	}

	#[test]
	fn zero_width_cube_is_the_origin() {
		let mut layout = RandomCube::new(StdRng::seed_from_u64(1), 0.0);
		assert_eq!(layout.place(), Vec3::ZERO);
	}

	#[test]
	fn unusable_widths_never_panic() {
		for width in [-5.0, f64::NAN, f64::INFINITY, 1e308, f64::MAX] {
			let mut layout = RandomCube::new(StdRng::seed_from_u64(4), width);
			let bound = if width == -5.0 { 5.0 } else { DEFAULT_LAYOUT_HALF_WIDTH };
			for _ in 0..50 {
				let p = layout.place();
				assert!(p.is_finite(), "{width}: {p:?}");
				for c in [p.x, p.y, p.z] {
					assert!(c.abs() <= bound, "{width}: {c}");
				}
			}
		}
	}
}

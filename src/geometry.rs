//! Small 3D vector used for node positions and poses.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Vec3 {
	pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
	}

	/// Unit vector in the same direction, or zero when the direction is
	/// undefined (the zero vector or any non-finite component).
	pub fn normalize_or_zero(self) -> Self {
		let max = self.x.abs().max(self.y.abs()).max(self.z.abs());
		if max == 0.0 || !self.is_finite() {
			return Self::ZERO;
		}
		// Rescale first so tiny components do not underflow when squared.
		let v = Self::new(self.x / max, self.y / max, self.z / max);
		v.scale(1.0 / v.length())
	}

	pub fn add(self, other: Vec3) -> Self {
		Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
	}

	pub fn scale(self, k: f64) -> Self {
		Self::new(self.x * k, self.y * k, self.z * k)
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalize_zero_vector_stays_zero() {
		assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
	}

	#[test]
	fn normalize_has_unit_length() {
		let v = Vec3::new(3.0, -4.0, 12.0).normalize_or_zero();
		assert!((v.length() - 1.0).abs() < 1e-12);
		assert!((v.x - 3.0 / 13.0).abs() < 1e-12);
	}

	#[test]
	fn normalize_tiny_and_huge_vectors() {
		assert_eq!(Vec3::new(1e-17, 0.0, 0.0).normalize_or_zero(), Vec3::new(1.0, 0.0, 0.0));
		assert_eq!(Vec3::new(0.0, -5e-324, 0.0).normalize_or_zero(), Vec3::new(0.0, -1.0, 0.0));
		let v = Vec3::new(f64::MAX, f64::MAX, 0.0).normalize_or_zero();
		assert!((v.length() - 1.0).abs() < 1e-12);
	}

	#[test]
	fn normalize_non_finite_is_zero() {
		assert_eq!(Vec3::new(f64::NAN, 1.0, 0.0).normalize_or_zero(), Vec3::ZERO);
		assert_eq!(Vec3::new(f64::INFINITY, 0.0, 0.0).normalize_or_zero(), Vec3::ZERO);
	}
}

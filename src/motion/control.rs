use serde_json::Value;

/// Smoothed control signal read by the transform engine every frame.
///
/// Both fields stay inside `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlState {
	pub expansion: f64,
	pub tension: f64,
}

impl ControlState {
	pub fn new(expansion: f64, tension: f64) -> Self {
		Self {
			expansion: unit(expansion),
			tension: unit(tension),
		}
	}
}

/// One raw reading from the gesture source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSample {
	pub expansion: f64,
	pub tension: f64,
}

impl GestureSample {
	pub fn new(expansion: f64, tension: f64) -> Self {
		Self { expansion, tension }
	}

	/// Lenient decode: anything missing or non-numeric reads as 0.
	pub fn from_json(value: &Value) -> Self {
		let field = |key: &str| value.get(key).and_then(Value::as_f64).unwrap_or(0.0);
		Self::new(field("expansion"), field("tension"))
	}
}

/// Clamps into `[0, 1]`, mapping NaN and infinities to 0.
fn unit(v: f64) -> f64 {
	if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Exponential moving average over incoming gesture samples.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlSmoother {
	state: ControlState,
	alpha: f64,
}

impl Default for ControlSmoother {
	fn default() -> Self {
		Self::new(0.5)
	}
}

impl ControlSmoother {
	/// `alpha` is the weight of each new sample, kept within `(0, 1]`.
	pub fn new(alpha: f64) -> Self {
		let alpha = if alpha.is_finite() && alpha > 0.0 {
			alpha.min(1.0)
		} else {
			0.5
		};
		Self {
			state: ControlState::default(),
			alpha,
		}
	}

	pub fn state(&self) -> ControlState {
		self.state
	}

	pub fn reset(&mut self) {
		self.state = ControlState::default();
	}

	/// Moves the state a fraction `alpha` of the way toward the sample.
	pub fn update(&mut self, sample: GestureSample) -> ControlState {
		let step = |current: f64, raw: f64| unit(current + (unit(raw) - current) * self.alpha);
		self.state = ControlState {
			expansion: step(self.state.expansion, sample.expansion),
			tension: step(self.state.tension, sample.tension),
		};
		self.state
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn converges_geometrically_toward_constant_sample() {
		let mut smoother = ControlSmoother::default();
		for n in 1..=20 {
			let state = smoother.update(GestureSample::new(1.0, 1.0));
			let bound = 0.5f64.powi(n) + 1e-12;
			assert!((1.0 - state.expansion).abs() <= bound, "step {n}: {state:?}");
			assert!((1.0 - state.tension).abs() <= bound, "step {n}: {state:?}");
			assert!(state.expansion < 1.0);
		}
	}

	#[test]
	fn single_step_is_half_way() {
		let mut smoother = ControlSmoother::default();
		let state = smoother.update(GestureSample::new(0.8, 0.2));
		assert!((state.expansion - 0.4).abs() < 1e-12);
		assert!((state.tension - 0.1).abs() < 1e-12);
	}

	#[test]
	fn out_of_range_samples_stay_in_unit_square() {
		let mut smoother = ControlSmoother::new(1.0);
		let samples = [
			GestureSample::new(5.0, -3.0),
			GestureSample::new(f64::NAN, f64::INFINITY),
			GestureSample::new(-1e9, 1e9),
			GestureSample::new(0.3, f64::NEG_INFINITY),
		];
		for sample in samples {
			let s = smoother.update(sample);
			assert!((0.0..=1.0).contains(&s.expansion), "{s:?}");
			assert!((0.0..=1.0).contains(&s.tension), "{s:?}");
		}
		assert_eq!(smoother.state(), ControlState::new(0.3, 0.0));
	}

	#[test]
	fn infinities_read_as_zero() {
		assert_eq!(ControlState::new(f64::INFINITY, f64::NEG_INFINITY), ControlState::default());

		let mut smoother = ControlSmoother::new(1.0);
		smoother.update(GestureSample::new(0.6, 0.6));
		let s = smoother.update(GestureSample::new(f64::INFINITY, f64::NAN));
		assert_eq!(s, ControlState::default());
	}

	#[test]
	fn json_samples_default_missing_fields() {
		assert_eq!(
			GestureSample::from_json(&json!({"expansion": 0.7})),
			GestureSample::new(0.7, 0.0)
		);
		assert_eq!(
			GestureSample::from_json(&json!({"expansion": "lots", "tension": null})),
			GestureSample::default()
		);
		assert_eq!(GestureSample::from_json(&json!(12)), GestureSample::default());
	}

	#[test]
	fn invalid_alpha_falls_back() {
		let first_step = |alpha: f64| ControlSmoother::new(alpha).update(GestureSample::new(1.0, 0.0)).expansion;
		assert_eq!(first_step(0.0), 0.5);
		assert_eq!(first_step(f64::NAN), 0.5);
		assert_eq!(first_step(3.0), 1.0);
	}

	#[test]
	fn reset_returns_to_rest() {
		let mut smoother = ControlSmoother::default();
		smoother.update(GestureSample::new(1.0, 1.0));
		smoother.reset();
		assert_eq!(smoother.state(), ControlState::default());
	}
}

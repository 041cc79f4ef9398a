//! Tunables for the engine and endpoints for the page.

use serde::Deserialize;

const DEFAULT_QUERY_ENDPOINT: &str = "/api/query";
const DEFAULT_DEMO_NODES: usize = 80;
pub const DEFAULT_LAYOUT_HALF_WIDTH: f64 = 20.0;
pub const DEFAULT_JITTER_AMPLITUDE: f64 = 0.5;

/// Magnitude of a symmetric sampling range `-v..v`, or `fallback` when the
/// range would not be finite.
pub fn span_or(value: f64, fallback: f64) -> f64 {
	let span = value.abs();
	if (span * 2.0).is_finite() { span } else { fallback }
}

/// Numeric constants of ingestion layout, smoothing and the per-frame transform.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Half-width of the cube new nodes are scattered in.
	pub layout_half_width: f64,
	/// EMA factor applied to each gesture sample.
	pub smoothing: f64,
	pub transform: TransformConfig,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			layout_half_width: DEFAULT_LAYOUT_HALF_WIDTH,
			smoothing: 0.5,
			transform: TransformConfig::default(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
	/// Radial distance added at full expansion.
	pub expansion_scale: f64,
	/// Jitter engages strictly above this tension.
	pub jitter_threshold: f64,
	/// Per-axis jitter half-width at full tension.
	pub jitter_amplitude: f64,
	/// Pulse engages strictly above this tension.
	pub pulse_threshold: f64,
	/// Angular speed of the pulse, in radians per second.
	pub pulse_frequency: f64,
	/// Pulse amplitude at full tension.
	pub pulse_amplitude: f64,
}

impl Default for TransformConfig {
	fn default() -> Self {
		Self {
			expansion_scale: 20.0,
			jitter_threshold: 0.1,
			jitter_amplitude: DEFAULT_JITTER_AMPLITUDE,
			pulse_threshold: 0.5,
			pulse_frequency: 5.0,
			pulse_amplitude: 0.3,
		}
	}
}

/// Where the page talks to, resolved at build time.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	pub query_endpoint: String,
	pub gesture_endpoint: Option<String>,
	pub demo_nodes: usize,
	pub engine: EngineConfig,
}

impl AppConfig {
	/// Reads `GRAPH_QUERY_ENDPOINT`, `GESTURE_ENDPOINT` and `DEMO_NODES`
	/// from the build environment.
	pub fn from_env() -> Self {
		Self::from_values(
			option_env!("GRAPH_QUERY_ENDPOINT"),
			option_env!("GESTURE_ENDPOINT"),
			option_env!("DEMO_NODES"),
		)
	}

	fn from_values(query: Option<&str>, gesture: Option<&str>, demo_nodes: Option<&str>) -> Self {
		let non_empty = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
		Self {
			query_endpoint: non_empty(query).unwrap_or_else(|| DEFAULT_QUERY_ENDPOINT.into()),
			gesture_endpoint: non_empty(gesture),
			demo_nodes: demo_nodes
				.and_then(|n| n.trim().parse().ok())
				.unwrap_or(DEFAULT_DEMO_NODES),
			engine: EngineConfig::default(),
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self::from_values(None, None, None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_engine_config_keeps_defaults() {
		let cfg: EngineConfig =
			serde_json::from_str(r#"{"smoothing": 0.25, "transform": {"expansion_scale": 10}}"#)
				.unwrap();
		assert_eq!(cfg.smoothing, 0.25);
		assert_eq!(cfg.layout_half_width, 20.0);
		assert_eq!(cfg.transform.expansion_scale, 10.0);
		assert_eq!(cfg.transform.pulse_threshold, 0.5);
	}

	#[test]
	fn blank_env_values_fall_back() {
		let cfg = AppConfig::from_values(Some("  "), Some(""), Some("abc"));
		assert_eq!(cfg.query_endpoint, DEFAULT_QUERY_ENDPOINT);
		assert_eq!(cfg.gesture_endpoint, None);
		assert_eq!(cfg.demo_nodes, DEFAULT_DEMO_NODES);

		let cfg = AppConfig::from_values(Some("http://db/q"), Some("ws://g"), Some("12"));
		assert_eq!(cfg.query_endpoint, "http://db/q");
		assert_eq!(cfg.gesture_endpoint.as_deref(), Some("ws://g"));
		assert_eq!(cfg.demo_nodes, 12);
	}

	#[test]
	fn spans_are_non_negative_and_finite() {
		assert_eq!(span_or(-0.5, 9.0), 0.5);
		assert_eq!(span_or(0.0, 9.0), 0.0);
		assert_eq!(span_or(f64::NAN, 9.0), 9.0);
		assert_eq!(span_or(f64::NEG_INFINITY, 9.0), 9.0);
		// Finite, but the width of -v..v is not.
		assert_eq!(span_or(1e308, 9.0), 9.0);
	}
}

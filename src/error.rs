//! Error types surfaced to the page.
//!
//! Nothing inside the graph core or the motion engine fails; every variant
//! here originates at an I/O boundary (query transport, gesture socket) or at
//! an explicit model-building call made by a caller outside the ingestor.

use crate::gesture::session::SessionPhase;

/// Failures while fetching or decoding a query result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
	/// The request never produced a response (network down, CORS, no window).
	#[error("query transport failed: {0}")]
	Transport(String),

	/// The query service answered with a non-success status.
	#[error("query service returned {status}: {message}")]
	Status { status: u16, message: String },

	/// The service answered 2xx but reported a failure in the payload.
	#[error("query service error: {0}")]
	Service(String),

	/// The response body was not valid JSON.
	#[error("could not decode query result: {0}")]
	Decode(String),
}

impl From<serde_json::Error> for IngestError {
	fn from(err: serde_json::Error) -> Self {
		Self::Decode(err.to_string())
	}
}

/// Violations of the graph model invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
	#[error("link {from} -> {to} references a node that does not exist")]
	DanglingLink { from: String, to: String },
}

/// Failures of the gesture streaming session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
	#[error("cannot {event} while session is {from:?}")]
	InvalidTransition {
		from: SessionPhase,
		event: &'static str,
	},

	#[error("could not open gesture socket: {0}")]
	Connect(String),
}

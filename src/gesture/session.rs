//! Lifecycle of a gesture streaming session.
//!
//! The session owns whatever it acquires while connecting (sockets, event
//! handlers, timers) and releases all of it when it closes, including when it
//! is simply dropped.

use log::{debug, info};

use crate::error::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
	Idle,
	Connecting,
	Streaming,
	Closed,
}

/// Something a session must release when it ends.
pub trait Teardown {
	fn teardown(&mut self);
}

pub struct GestureSession {
	phase: SessionPhase,
	resources: Vec<Box<dyn Teardown>>,
}

impl Default for GestureSession {
	fn default() -> Self {
		Self::new()
	}
}

impl GestureSession {
	pub fn new() -> Self {
		Self {
			phase: SessionPhase::Idle,
			resources: Vec::new(),
		}
	}

	pub fn phase(&self) -> SessionPhase {
		self.phase
	}

	pub fn is_live(&self) -> bool {
		matches!(self.phase, SessionPhase::Connecting | SessionPhase::Streaming)
	}

	pub fn connect(&mut self) -> Result<(), SessionError> {
		self.transition(SessionPhase::Idle, SessionPhase::Connecting, "connect")
	}

	pub fn opened(&mut self) -> Result<(), SessionError> {
		self.transition(SessionPhase::Connecting, SessionPhase::Streaming, "open")
	}

	/// Takes ownership of a resource. A closed session tears it down at once.
	pub fn acquire(&mut self, mut resource: Box<dyn Teardown>) {
		if self.phase == SessionPhase::Closed {
			resource.teardown();
		} else {
			self.resources.push(resource);
		}
	}

	/// Releases every resource, newest first. Safe to call repeatedly.
	pub fn close(&mut self) {
		if self.phase != SessionPhase::Closed {
			info!("gesture session closing from {:?}", self.phase);
		}
		self.phase = SessionPhase::Closed;
		while let Some(mut resource) = self.resources.pop() {
			resource.teardown();
		}
	}

	fn transition(
		&mut self,
		from: SessionPhase,
		to: SessionPhase,
		event: &'static str,
	) -> Result<(), SessionError> {
		if self.phase != from {
			return Err(SessionError::InvalidTransition {
				from: self.phase,
				event,
			});
		}
		debug!("gesture session {:?} -> {:?}", from, to);
		self.phase = to;
		Ok(())
	}
}

impl Drop for GestureSession {
	fn drop(&mut self) {
		self.close();
	}
}

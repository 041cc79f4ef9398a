//! Gesture samples arriving from the recognition service.

pub mod feed;
pub mod session;

pub use feed::GestureFeed;
pub use session::{GestureSession, SessionPhase, Teardown};

//! Gesture smoothing and the per-frame node transform.

pub mod control;
pub mod transform;

pub use control::{ControlSmoother, ControlState, GestureSample};
pub use transform::{Pose, TransformEngine};

//! pose-core: humanoid pose model and rig abstraction
//!
//! This crate defines the sparse per-joint pose representation shared by every other
//! crate in the workspace, the contract a live rig must satisfy, and the conversion
//! between the file interchange convention and the rig runtime convention. The default
//! build enables a `mock` rig so that tools and tests run without a renderer.

mod types;
pub use types::{HumanoidBone, JointId, JointTransform, Pose, PoseDefinition};

mod error;
pub use error::{PoseError, Result};

mod traits;
pub use traits::HumanoidRig;

pub mod convert;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::MockRig;

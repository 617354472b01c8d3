//! pose-control: drive a humanoid rig with named poses
//!
//! [`PoseController`] binds to one rig and applies, captures and persists poses
//! through a shared [`pose_registry::PoseRegistry`]. [`PoseFacade`] offers the same
//! registry and conversion operations to callers that hold no rig. Both are plain
//! values constructed and passed explicitly; nothing here is global.

mod controller;
pub use controller::PoseController;

mod resolve;
pub use resolve::{default_resolvers, DisplayNameResolver, KeyResolver, PoseResolver};

pub mod interpolate;
pub use interpolate::{interpolate, interpolate_with, RotationBlend};

mod facade;
pub use facade::PoseFacade;

mod metrics;
pub use metrics::PoseMetrics;

pub use pose_core::{PoseError, Result};

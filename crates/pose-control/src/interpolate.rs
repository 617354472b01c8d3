//! Blending between two poses.
//!
//! Only joints present in both poses appear in the result. Positions are always
//! blended linearly; rotations follow the chosen [`RotationBlend`]. `t` is not
//! clamped, so values outside `[0, 1]` extrapolate.

use glam::Quat;
use pose_core::{JointTransform, Pose};
use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RotationBlend {
    /// Component-wise lerp of the four quaternion components. The result may
    /// drift from unit length.
    #[default]
    Linear,
    /// Linear, then renormalized.
    Normalized,
    /// Shortest-arc spherical interpolation.
    Spherical,
}

pub fn interpolate(from: &Pose, to: &Pose, t: f32) -> Pose {
    interpolate_with(from, to, t, RotationBlend::Linear)
}

pub fn interpolate_with(from: &Pose, to: &Pose, t: f32, blend: RotationBlend) -> Pose {
    from.iter()
        .filter_map(|(id, a)| {
            let b = to.get(id)?;
            Some((id.clone(), blend_joint(a, b, t, blend)))
        })
        .collect()
}

fn blend_joint(
    a: &JointTransform,
    b: &JointTransform,
    t: f32,
    blend: RotationBlend,
) -> JointTransform {
    let rotation = match blend {
        RotationBlend::Linear => lerp(a.rotation, b.rotation, t),
        RotationBlend::Normalized => {
            let q = Quat::from_array(lerp(a.rotation, b.rotation, t));
            if q.length_squared() > f32::EPSILON {
                q.normalize().to_array()
            } else {
                q.to_array()
            }
        }
        RotationBlend::Spherical => Quat::from_array(a.rotation)
            .slerp(Quat::from_array(b.rotation), t)
            .to_array(),
    };
    JointTransform {
        rotation,
        position: lerp(a.position, b.position, t),
    }
}

fn lerp<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

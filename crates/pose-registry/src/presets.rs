//! Built-in presets, in the rig runtime convention.

use pose_core::{HumanoidBone, JointTransform, Pose, PoseDefinition};
use HumanoidBone::*;

pub const TPOSE_KEY: &str = "tpose";
pub const HI_KEY: &str = "hi";
pub const PEACE_KEY: &str = "peace";

const HI: &[(HumanoidBone, [f32; 4])] = &[
    (LeftShoulder, [-0.009528, -0.065063, -0.144585, 0.987305]),
    (LeftUpperArm, [0.448046, -0.069738, 0.039611, 0.890406]),
    (LeftLowerArm, [0.0, -0.775219, 0.0, 0.631693]),
    (RightShoulder, [-0.048041, 0.370482, 0.119285, 0.919895]),
    (RightUpperArm, [-0.085411, -0.360893, -0.691625, 0.619771]),
    (RightLowerArm, [0.0, 0.520643, 0.0, 0.853774]),
];

const PEACE: &[(HumanoidBone, [f32; 4])] = &[
    (LeftUpperArm, [0.0, 0.0, 0.6, 0.8]),
    (RightUpperArm, [0.0, 0.707, 0.0, 0.707]),
    (RightIndexProximal, [0.0, 0.0, 0.5, 0.866]),
    (RightIndexIntermediate, [0.0, 0.0, 0.3, 0.954]),
    (RightIndexDistal, [0.0, 0.0, 0.2, 0.98]),
    (RightMiddleProximal, [0.0, 0.0, 0.5, 0.866]),
    (RightMiddleIntermediate, [0.0, 0.0, 0.3, 0.954]),
    (RightMiddleDistal, [0.0, 0.0, 0.2, 0.98]),
    (RightRingProximal, [0.0, 0.0, -0.3, 0.954]),
    (RightRingIntermediate, [0.0, 0.0, -0.3, 0.954]),
    (RightRingDistal, [0.0, 0.0, -0.3, 0.954]),
    (RightLittleProximal, [0.0, 0.0, -0.3, 0.954]),
    (RightLittleIntermediate, [0.0, 0.0, -0.3, 0.954]),
    (RightLittleDistal, [0.0, 0.0, -0.3, 0.954]),
    (RightThumbMetacarpal, [0.0, 0.0, 0.3, 0.954]),
    (RightThumbProximal, [0.0, 0.0, 0.5, 0.866]),
    (RightThumbIntermediate, [0.0, 0.0, 0.5, 0.866]),
    (RightThumbDistal, [0.0, 0.0, 0.5, 0.866]),
];

/// Joints every preset writes: the catalog minus `upperChest`, `jaw` and the
/// thumb intermediates.
const STANDING: &[HumanoidBone] = &[
    Hips,
    Spine,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    LeftThumbMetacarpal,
    LeftThumbProximal,
    LeftThumbDistal,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
    RightThumbMetacarpal,
    RightThumbProximal,
    RightThumbDistal,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,
    LeftEye,
    RightEye,
];

/// Identity on `base`, then `rotations` written on top.
fn build(base: &[HumanoidBone], rotations: &[(HumanoidBone, [f32; 4])]) -> Pose {
    let mut pose = Pose::new();
    for b in base {
        pose.insert(*b, JointTransform::IDENTITY);
    }
    for (b, r) in rotations {
        pose.insert(*b, JointTransform::from_rotation(*r));
    }
    pose
}

/// Arms out, everything at rest. `upperChest`, `jaw` and the thumb
/// intermediates are left untouched.
pub fn tpose() -> Pose {
    build(STANDING, &[])
}

pub fn hi() -> Pose {
    let mut pose = build(STANDING, HI);
    pose.insert(LeftThumbIntermediate, JointTransform::IDENTITY);
    pose.insert(RightThumbIntermediate, JointTransform::IDENTITY);
    pose
}

/// Adds `rightThumbIntermediate` to the standing set; the left one stays as is.
pub fn peace() -> Pose {
    build(STANDING, PEACE)
}

/// Keyed default catalog, in display order.
pub fn default_presets() -> Vec<(&'static str, PoseDefinition)> {
    vec![
        (
            TPOSE_KEY,
            PoseDefinition::new("Tポーズ", "Arms stretched straight out to the sides", tpose()),
        ),
        (
            HI_KEY,
            PoseDefinition::new("はーい！", "Right hand raised in greeting", hi()),
        ),
        (
            PEACE_KEY,
            PoseDefinition::new("ピース", "Peace sign with the left arm lowered", peace()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_core::JointId;

    fn omitted(pose: &Pose) -> Vec<HumanoidBone> {
        HumanoidBone::all().filter(|b| pose.bone(*b).is_none()).collect()
    }

    #[test]
    fn test_presets_are_unit_quaternions() {
        for (key, def) in default_presets() {
            for (joint, t) in &def.pose {
                let len = t.rotation.iter().map(|c| c * c).sum::<f32>().sqrt();
                assert!((len - 1.0).abs() < 2e-3, "{key}/{joint}: |q| = {len}");
            }
        }
    }

    #[test]
    fn test_tpose_joint_set() {
        let pose = tpose();
        assert_eq!(
            omitted(&pose),
            vec![UpperChest, Jaw, LeftThumbIntermediate, RightThumbIntermediate]
        );
        assert!(pose.iter().all(|(_, t)| t.is_identity()));
    }

    #[test]
    fn test_peace_joint_set() {
        let pose = peace();
        assert_eq!(omitted(&pose), vec![UpperChest, Jaw, LeftThumbIntermediate]);
        assert!(pose.bone(LeftEye).unwrap().is_identity());
        assert!(pose.bone(RightFoot).unwrap().is_identity());
        assert!(pose.bone(Hips).unwrap().is_identity());
        assert_eq!(pose.bone(RightUpperArm).unwrap().rotation, [0.0, 0.707, 0.0, 0.707]);
        assert_eq!(
            pose.bone(RightThumbIntermediate).unwrap().rotation,
            [0.0, 0.0, 0.5, 0.866]
        );
    }

    #[test]
    fn test_hi_joint_set() {
        let pose = hi();
        assert_eq!(omitted(&pose), vec![UpperChest, Jaw]);
        assert_eq!(
            pose.bone(RightLowerArm).unwrap().rotation,
            [0.0, 0.520643, 0.0, 0.853774]
        );
        assert!(!pose.contains(&JointId::from("upperChest")));
    }
}

use crate::{HumanoidBone, HumanoidRig, JointId, JointTransform, Pose};
use std::collections::BTreeMap;

/// A simple in-process rig. Every bone it carries starts at identity.
#[derive(Debug, Clone)]
pub struct MockRig {
    bones: BTreeMap<HumanoidBone, JointTransform>,
    writes: u64,
}

impl MockRig {
    /// A rig carrying the full joint catalog.
    pub fn new() -> Self {
        Self::with_bones(HumanoidBone::all())
    }

    /// A rig carrying only the given bones (e.g. a model without eyes or jaw).
    pub fn with_bones(bones: impl IntoIterator<Item = HumanoidBone>) -> Self {
        Self {
            bones: bones
                .into_iter()
                .map(|b| (b, JointTransform::IDENTITY))
                .collect(),
            writes: 0,
        }
    }

    pub fn bone(&self, bone: HumanoidBone) -> Option<&JointTransform> {
        self.bones.get(&bone)
    }

    /// Number of `apply_runtime_pose` calls seen so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl Default for MockRig {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanoidRig for MockRig {
    fn apply_runtime_pose(&mut self, pose: &Pose) {
        self.writes += 1;
        for (id, transform) in pose {
            match id {
                JointId::Humanoid(b) if self.bones.contains_key(b) => {
                    self.bones.insert(*b, *transform);
                }
                _ => {
                    tracing::debug!(joint = %id, "mock rig: joint not present, skipped");
                }
            }
        }
    }

    fn read_runtime_pose(&self) -> Pose {
        self.bones
            .iter()
            .map(|(b, t)| (JointId::Humanoid(*b), *t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_rig_reads_full_joint_set() {
        let rig = MockRig::new();
        let pose = rig.read_runtime_pose();
        assert_eq!(pose.len(), HumanoidBone::all().count());
    }

    #[test]
    fn test_mock_rig_ignores_unknown_joints() {
        let mut rig = MockRig::with_bones([HumanoidBone::Hips, HumanoidBone::Spine]);
        let mut pose = Pose::new();
        pose.insert("tail", JointTransform::from_rotation([1.0, 0.0, 0.0, 0.0]));
        pose.insert(
            HumanoidBone::LeftEye,
            JointTransform::from_rotation([1.0, 0.0, 0.0, 0.0]),
        );
        pose.insert(
            HumanoidBone::Hips,
            JointTransform::from_rotation([0.0, 1.0, 0.0, 0.0]),
        );
        rig.apply_runtime_pose(&pose);

        let read = rig.read_runtime_pose();
        assert_eq!(read.len(), 2);
        assert_eq!(
            read.bone(HumanoidBone::Hips).unwrap().rotation,
            [0.0, 1.0, 0.0, 0.0]
        );
        assert!(read.bone(HumanoidBone::LeftEye).is_none());
        assert_eq!(rig.writes(), 1);
    }
}

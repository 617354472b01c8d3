use crate::Pose;

/// A live humanoid rig that poses can be pushed onto and read back from.
pub trait HumanoidRig {
    /// Write the joints present in `pose`; joints absent from it keep their value.
    /// Joints the rig does not have are ignored.
    fn apply_runtime_pose(&mut self, pose: &Pose);

    /// Read the rig's entire current joint set, not just previously written joints.
    fn read_runtime_pose(&self) -> Pose;
}

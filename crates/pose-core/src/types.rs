use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Closed catalog of humanoid rig joints, in skeletal order.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum HumanoidBone {
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    LeftEye,
    RightEye,
    Jaw,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftThumbMetacarpal,
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
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
    RightThumbMetacarpal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
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
}

impl HumanoidBone {
    pub fn all() -> impl Iterator<Item = HumanoidBone> {
        Self::iter()
    }
}

/// A joint name as it appears in a pose. Names outside the catalog are kept
/// verbatim so that documents round-trip even when a rig ignores them.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JointId {
    Humanoid(HumanoidBone),
    Other(String),
}

impl JointId {
    pub fn bone(&self) -> Option<HumanoidBone> {
        match self {
            JointId::Humanoid(b) => Some(*b),
            JointId::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JointId::Humanoid(b) => b.as_ref(),
            JointId::Other(s) => s,
        }
    }
}

impl FromStr for JointId {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match HumanoidBone::from_str(s) {
            Ok(b) => JointId::Humanoid(b),
            Err(_) => JointId::Other(s.to_string()),
        })
    }
}

impl From<&str> for JointId {
    fn from(s: &str) -> Self {
        match HumanoidBone::from_str(s) {
            Ok(b) => JointId::Humanoid(b),
            Err(_) => JointId::Other(s.to_string()),
        }
    }
}

impl From<String> for JointId {
    fn from(s: String) -> Self {
        match HumanoidBone::from_str(&s) {
            Ok(b) => JointId::Humanoid(b),
            Err(_) => JointId::Other(s),
        }
    }
}

impl From<JointId> for String {
    fn from(id: JointId) -> Self {
        match id {
            JointId::Humanoid(b) => b.to_string(),
            JointId::Other(s) => s,
        }
    }
}

impl From<HumanoidBone> for JointId {
    fn from(b: HumanoidBone) -> Self {
        JointId::Humanoid(b)
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local rigid transform of one joint. Rotation is a quaternion `[x, y, z, w]`
/// and is never renormalized implicitly.
///
/// Components are `f32`. Interchange files carry double-precision numbers, so
/// values are narrowed on parse and a re-serialized file may differ from its
/// source past the seventh significant digit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointTransform {
    pub rotation: [f32; 4],
    #[serde(default)]
    pub position: [f32; 3],
}

impl JointTransform {
    pub const IDENTITY: Self = Self {
        rotation: [0.0, 0.0, 0.0, 1.0],
        position: [0.0, 0.0, 0.0],
    };

    pub fn from_rotation(rotation: [f32; 4]) -> Self {
        Self {
            rotation,
            position: [0.0; 3],
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        let rot = self
            .rotation
            .iter()
            .zip(other.rotation.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon);
        let pos = self
            .position
            .iter()
            .zip(other.position.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon);
        rot && pos
    }
}

impl Default for JointTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Sparse mapping from joint to transform. Values are owned; cloning a pose
/// yields an independent snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose(BTreeMap<JointId, JointTransform>);

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every catalog joint at identity.
    pub fn identity() -> Self {
        HumanoidBone::all()
            .map(|b| (JointId::Humanoid(b), JointTransform::IDENTITY))
            .collect()
    }

    pub fn insert(&mut self, joint: impl Into<JointId>, transform: JointTransform) {
        self.0.insert(joint.into(), transform);
    }

    pub fn remove(&mut self, joint: &JointId) -> Option<JointTransform> {
        self.0.remove(joint)
    }

    pub fn get(&self, joint: &JointId) -> Option<&JointTransform> {
        self.0.get(joint)
    }

    pub fn bone(&self, bone: HumanoidBone) -> Option<&JointTransform> {
        self.0.get(&JointId::Humanoid(bone))
    }

    pub fn contains(&self, joint: &JointId) -> bool {
        self.0.contains_key(joint)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JointId, &JointTransform)> {
        self.0.iter()
    }

    pub fn joints(&self) -> impl Iterator<Item = &JointId> {
        self.0.keys()
    }

    /// Component-wise comparison over identical joint sets.
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.len() == other.len()
            && self.iter().all(|(id, t)| {
                other
                    .get(id)
                    .map(|o| t.abs_diff_eq(o, epsilon))
                    .unwrap_or(false)
            })
    }
}

impl FromIterator<(JointId, JointTransform)> for Pose {
    fn from_iter<I: IntoIterator<Item = (JointId, JointTransform)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(JointId, JointTransform)> for Pose {
    fn extend<I: IntoIterator<Item = (JointId, JointTransform)>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for Pose {
    type Item = (JointId, JointTransform);
    type IntoIter = std::collections::btree_map::IntoIter<JointId, JointTransform>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Pose {
    type Item = (&'a JointId, &'a JointTransform);
    type IntoIter = std::collections::btree_map::Iter<'a, JointId, JointTransform>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A named preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pose: Pose,
}

impl PoseDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            pose,
        }
    }
}

use crate::interpolate::{interpolate_with, RotationBlend};
use crate::resolve::{default_resolvers, PoseResolver};
use crate::PoseMetrics;
use pose_core::{convert, HumanoidRig, Pose, PoseDefinition, PoseError, Result};
use pose_registry::SharedRegistry;
use tracing::{debug, info, warn};

/// Stateful bridge between pose values and one live rig.
///
/// The registry is shared, so presets saved here are visible to every other
/// holder of the same [`SharedRegistry`]. Poses cross this boundary by value:
/// nothing returned from the controller aliases its internal state.
pub struct PoseController<R: HumanoidRig> {
    rig: Option<R>,
    registry: SharedRegistry,
    current: Option<Pose>,
    resolvers: Vec<Box<dyn PoseResolver>>,
    blend: RotationBlend,
    metrics: Option<PoseMetrics>,
}

impl<R: HumanoidRig> PoseController<R> {
    pub fn new(rig: R, registry: SharedRegistry) -> Self {
        Self {
            rig: Some(rig),
            ..Self::unbound(registry)
        }
    }

    /// A controller with no rig yet. Rig operations fail with `RigUnavailable`
    /// until [`bind`](Self::bind) is called.
    pub fn unbound(registry: SharedRegistry) -> Self {
        Self {
            rig: None,
            registry,
            current: None,
            resolvers: default_resolvers(),
            blend: RotationBlend::default(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: PoseMetrics) -> Self {
        metrics.set_presets_stored(self.registry.read().len());
        self.metrics = Some(metrics);
        self
    }

    /// Append a resolver after the existing ones.
    pub fn with_resolver(mut self, resolver: impl PoseResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn with_blend(mut self, blend: RotationBlend) -> Self {
        self.blend = blend;
        self
    }

    /// Attach a rig, returning the previous one. The current pose belongs to
    /// the old rig and is cleared.
    pub fn bind(&mut self, rig: R) -> Option<R> {
        self.current = None;
        self.rig.replace(rig)
    }

    pub fn unbind(&mut self) -> Option<R> {
        self.current = None;
        self.rig.take()
    }

    pub fn rig(&self) -> Option<&R> {
        self.rig.as_ref()
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn apply_pose(&mut self, pose: &Pose, full_reset: bool) -> Result<()> {
        let rig = self.rig.as_mut().ok_or(PoseError::RigUnavailable)?;
        if full_reset {
            rig.apply_runtime_pose(&Pose::identity());
        }
        rig.apply_runtime_pose(pose);
        debug!(joints = pose.len(), full_reset, "applied pose");

        if let Some(m) = &self.metrics {
            m.poses_applied.inc();
            if full_reset {
                m.full_resets.inc();
            }
        }
        self.current = Some(pose.clone());
        Ok(())
    }

    /// Resolve `identifier` through the resolver chain and apply the match
    /// without a reset.
    pub fn apply_pose_by_name(&mut self, identifier: &str) -> Result<()> {
        if self.rig.is_none() {
            return Err(PoseError::RigUnavailable);
        }
        let found = {
            let registry = self.registry.read();
            self.resolvers.iter().find_map(|r| {
                r.resolve(&registry, identifier)
                    .map(|def| (r.name(), def.name.clone(), def.pose.clone()))
            })
        };
        let Some((resolver, name, pose)) = found else {
            warn!(identifier = %identifier, "no preset matches");
            if let Some(m) = &self.metrics {
                m.resolve_failures.inc();
            }
            return Err(PoseError::PoseNotFound(identifier.to_string()));
        };
        info!(identifier = %identifier, resolver, name = %name, "applying preset");
        self.apply_pose(&pose, false)
    }

    /// Parse an uploaded interchange document and apply it over a full reset.
    pub fn apply_uploaded(&mut self, json_text: &str) -> Result<Pose> {
        if self.rig.is_none() {
            return Err(PoseError::RigUnavailable);
        }
        let pose = convert::parse(json_text)?;
        self.apply_pose(&pose, true)?;
        Ok(pose)
    }

    pub fn current_pose(&self) -> Option<Pose> {
        self.current.clone()
    }

    /// Snapshot the rig's full joint set and make it the current pose.
    pub fn capture(&mut self) -> Result<Pose> {
        let rig = self.rig.as_ref().ok_or(PoseError::RigUnavailable)?;
        let pose = rig.read_runtime_pose();
        debug!(joints = pose.len(), "captured rig pose");
        self.current = Some(pose.clone());
        Ok(pose)
    }

    pub fn save_preset(&self, name: &str, description: &str) -> Result<()> {
        let pose = self.current.clone().ok_or(PoseError::NoCurrentPose)?;
        let mut registry = self.registry.write();
        registry.save(PoseDefinition::new(name, description, pose));
        self.record_stored(registry.len());
        Ok(())
    }

    pub fn delete_preset(&self, name: &str) -> Option<PoseDefinition> {
        let mut registry = self.registry.write();
        let removed = registry.delete(name);
        self.record_stored(registry.len());
        removed
    }

    pub fn list_presets(&self) -> Vec<PoseDefinition> {
        self.registry.read().list_all()
    }

    /// Blend two poses with the controller's rotation strategy. The rig is not touched.
    pub fn interpolate(&self, from: &Pose, to: &Pose, t: f32) -> Pose {
        interpolate_with(from, to, t, self.blend)
    }

    fn record_stored(&self, n: usize) {
        if let Some(m) = &self.metrics {
            m.set_presets_stored(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_core::{HumanoidBone, JointTransform, MockRig};
    use pose_registry::{presets, shared, PoseRegistry};
    use serde_json::json;

    fn t(rotation: [f32; 4], position: [f32; 3]) -> JointTransform {
        JointTransform { rotation, position }
    }

    fn hips_only(transform: JointTransform) -> Pose {
        let mut p = Pose::new();
        p.insert(HumanoidBone::Hips, transform);
        p
    }

    fn controller() -> PoseController<MockRig> {
        PoseController::new(MockRig::new(), shared(PoseRegistry::with_defaults()))
    }

    #[test]
    fn test_full_reset_is_idempotent() {
        let mut c = controller();
        let pose = presets::hi();
        c.apply_pose(&pose, true).unwrap();
        let first = c.rig().unwrap().read_runtime_pose();
        c.apply_pose(&pose, true).unwrap();
        let second = c.rig().unwrap().read_runtime_pose();
        assert_eq!(first, second);
    }

    #[test]
    fn test_partial_apply_keeps_other_joints() {
        let mut c = controller();
        let arm = JointTransform::from_rotation([0.0, 0.0, 0.6, 0.8]);
        let mut setup = Pose::new();
        setup.insert(HumanoidBone::LeftUpperArm, arm);
        c.apply_pose(&setup, false).unwrap();

        let hips = t([0.0, 0.6, 0.0, 0.8], [0.0, 1.0, 0.0]);
        c.apply_pose(&hips_only(hips), false).unwrap();

        let rig = c.rig().unwrap();
        assert_eq!(rig.bone(HumanoidBone::LeftUpperArm), Some(&arm));
        assert_eq!(rig.bone(HumanoidBone::Hips), Some(&hips));
    }

    #[test]
    fn test_full_reset_clears_other_joints() {
        let mut c = controller();
        c.apply_pose(&presets::hi(), false).unwrap();

        let hips = t([0.0, 0.6, 0.0, 0.8], [0.1, 0.9, 0.0]);
        c.apply_pose(&hips_only(hips), true).unwrap();

        for (id, transform) in &c.rig().unwrap().read_runtime_pose() {
            if id.bone() == Some(HumanoidBone::Hips) {
                assert_eq!(*transform, hips);
            } else {
                assert!(transform.is_identity(), "{id} was not reset");
            }
        }
    }

    #[test]
    fn test_current_pose_is_the_argument_not_rig_state() {
        let mut c = controller();
        assert!(c.current_pose().is_none());
        let pose = hips_only(JointTransform::IDENTITY);
        c.apply_pose(&pose, true).unwrap();
        assert_eq!(c.current_pose(), Some(pose));
    }

    #[test]
    fn test_apply_by_key_and_display_name() {
        let mut c = controller();
        c.apply_pose_by_name("tpose").unwrap();
        let by_key = c.current_pose().unwrap();
        c.apply_pose_by_name("Tポーズ").unwrap();
        let by_name = c.current_pose().unwrap();
        assert_eq!(by_key, by_name);
        assert_eq!(by_key, presets::tpose());

        let err = c.apply_pose_by_name("no-such-pose").unwrap_err();
        assert!(matches!(err, PoseError::PoseNotFound(ref id) if id == "no-such-pose"));
    }

    #[test]
    fn test_apply_by_name_does_not_reset() {
        let mut c = controller();
        let jaw = JointTransform::from_rotation([0.1, 0.0, 0.0, 0.995]);
        let eye = JointTransform::from_rotation([0.0, 0.1, 0.0, 0.995]);
        let mut setup = Pose::new();
        setup.insert(HumanoidBone::Jaw, jaw);
        setup.insert(HumanoidBone::LeftEye, eye);
        c.apply_pose(&setup, false).unwrap();

        c.apply_pose_by_name("peace").unwrap();
        let rig = c.rig().unwrap();
        assert_eq!(rig.bone(HumanoidBone::Jaw), Some(&jaw));
        assert!(rig.bone(HumanoidBone::LeftEye).unwrap().is_identity());
    }

    #[test]
    fn test_unbound_rig_is_reported() {
        let mut c: PoseController<MockRig> = PoseController::unbound(shared(PoseRegistry::new()));
        let pose = hips_only(JointTransform::IDENTITY);
        assert!(matches!(c.apply_pose(&pose, false), Err(PoseError::RigUnavailable)));
        assert!(matches!(c.capture(), Err(PoseError::RigUnavailable)));
        assert!(matches!(c.apply_pose_by_name("tpose"), Err(PoseError::RigUnavailable)));
        assert!(c.current_pose().is_none());

        c.bind(MockRig::new());
        c.apply_pose(&pose, false).unwrap();
        assert!(c.unbind().is_some());
        assert!(matches!(c.apply_pose(&pose, false), Err(PoseError::RigUnavailable)));
    }

    #[test]
    fn test_save_requires_current_pose() {
        let c = controller();
        assert!(matches!(c.save_preset("x", "y"), Err(PoseError::NoCurrentPose)));
    }

    #[test]
    fn test_capture_then_save_preset() {
        let registry = shared(PoseRegistry::new());
        let mut rig = MockRig::with_bones([HumanoidBone::Hips, HumanoidBone::Head]);
        let head = JointTransform::from_rotation([0.2, 0.0, 0.0, 0.98]);
        let mut p = Pose::new();
        p.insert(HumanoidBone::Head, head);
        rig.apply_runtime_pose(&p);

        let mut c = PoseController::new(rig, registry.clone());
        let captured = c.capture().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured.bone(HumanoidBone::Head), Some(&head));
        assert_eq!(c.current_pose(), Some(captured.clone()));

        c.save_preset("Nod Down", "Head tilted forward").unwrap();
        let stored = registry.read().get("noddown").cloned().unwrap();
        assert_eq!(stored.pose, captured);
        assert_eq!(c.list_presets().len(), 1);
        assert!(c.delete_preset("nod down").is_some());
        assert!(c.list_presets().is_empty());
    }

    #[test]
    fn test_returned_poses_are_copies() {
        let mut c = controller();
        c.apply_pose_by_name("hi").unwrap();
        let mut mine = c.current_pose().unwrap();
        mine.insert(HumanoidBone::Hips, t([1.0, 0.0, 0.0, 0.0], [9.0, 9.0, 9.0]));
        mine.remove(&HumanoidBone::Head.into());

        assert_eq!(c.current_pose().unwrap(), presets::hi());
        let stored = c.registry().read().get("hi").cloned().unwrap();
        assert_eq!(stored.pose, presets::hi());
    }

    #[test]
    fn test_apply_uploaded_resets_and_converts() {
        let mut c = controller();
        c.apply_pose_by_name("hi").unwrap();
        let text = json!({
            "version": 1,
            "pose": { "hips": { "rotation": [0.1, 0.2, 0.3, 0.9], "position": [0.0, 1.0, 0.0] } }
        })
        .to_string();
        let pose = c.apply_uploaded(&text).unwrap();
        let rig = c.rig().unwrap();
        assert_eq!(
            rig.bone(HumanoidBone::Hips),
            Some(&t([-0.1, 0.2, -0.3, 0.9], [0.0, 1.0, 0.0]))
        );
        assert!(rig.bone(HumanoidBone::RightUpperArm).unwrap().is_identity());
        assert_eq!(c.current_pose(), Some(pose));

        assert!(matches!(c.apply_uploaded("not json"), Err(PoseError::Format(_))));
    }

    struct PrefixResolver;

    impl PoseResolver for PrefixResolver {
        fn name(&self) -> &'static str {
            "prefix"
        }

        fn resolve<'a>(
            &self,
            registry: &'a pose_registry::PoseRegistry,
            identifier: &str,
        ) -> Option<&'a PoseDefinition> {
            let wanted = pose_registry::normalize_key(identifier);
            registry
                .entries()
                .find(|(key, _)| key.starts_with(&wanted))
                .map(|(_, def)| def)
        }
    }

    #[test]
    fn test_extra_resolver_is_tried_last() {
        let mut c = controller().with_resolver(PrefixResolver);
        c.apply_pose_by_name("pea").unwrap();
        assert_eq!(c.current_pose().unwrap(), presets::peace());
        c.apply_pose_by_name("hi").unwrap();
        assert_eq!(c.current_pose().unwrap(), presets::hi());
    }

    #[test]
    fn test_interpolate_leaves_rig_alone() {
        let c = controller();
        let a = hips_only(t([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0]));
        let b = hips_only(t([0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0]));
        let mid = c.interpolate(&a, &b, 0.25);
        assert_eq!(mid.bone(HumanoidBone::Hips).unwrap().position, [0.25, 0.0, 0.0]);
        assert_eq!(c.rig().unwrap().writes(), 0);
    }

    #[test]
    fn test_metrics_track_applies() {
        let metrics = PoseMetrics::new().unwrap();
        let mut c = controller().with_metrics(metrics.clone());
        c.apply_pose_by_name("tpose").unwrap();
        c.apply_pose(&presets::hi(), true).unwrap();
        let _ = c.apply_pose_by_name("missing");
        assert_eq!(metrics.poses_applied.get(), 2);
        assert_eq!(metrics.full_resets.get(), 1);
        assert_eq!(metrics.resolve_failures.get(), 1);
        assert_eq!(metrics.presets_stored.get(), 3);
    }
}

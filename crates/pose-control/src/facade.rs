use crate::PoseMetrics;
use pose_core::{convert, Pose, PoseDefinition, PoseError, Result};
use pose_registry::{PoseSink, PoseSource, SharedRegistry};
use tracing::{info, warn};

/// Rig-less access point over a shared registry and the converter.
///
/// The facade keeps its own current pose, separate from any controller's.
/// Construct one and pass it where it is needed.
pub struct PoseFacade {
    registry: SharedRegistry,
    current: Option<Pose>,
    metrics: Option<PoseMetrics>,
}

impl PoseFacade {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            current: None,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: PoseMetrics) -> Self {
        metrics.set_presets_stored(self.registry.read().len());
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn current_pose(&self) -> Option<Pose> {
        self.current.clone()
    }

    /// Store a pose as current without touching any rig.
    pub fn set_pose(&mut self, pose: &Pose) {
        self.current = Some(pose.clone());
    }

    /// Fetch and parse one document; it becomes the current pose.
    pub async fn load_from_source(
        &mut self,
        source: &dyn PoseSource,
        locator: &str,
    ) -> Result<PoseDefinition> {
        let def = pose_registry::load_from_source(source, locator)
            .await
            .inspect_err(|e| self.record_failure(locator, e))?;
        if let Some(m) = &self.metrics {
            m.poses_loaded.inc();
        }
        self.current = Some(def.pose.clone());
        Ok(def)
    }

    /// Serialize the current pose to the interchange format and hand it to `sink`.
    pub async fn save_to_source(&self, sink: &dyn PoseSink, locator: &str) -> Result<()> {
        let pose = self.current.as_ref().ok_or(PoseError::NoCurrentPose)?;
        let text = convert::serialize(pose)?;
        sink.store_text(locator, &text).await?;
        info!(locator = %locator, joints = pose.len(), "saved current pose");
        Ok(())
    }

    /// Load every entry of the manifest at `locator` into the registry. Entries
    /// loaded before a failure stay saved.
    pub async fn load_many_from_source(
        &self,
        source: &dyn PoseSource,
        locator: &str,
    ) -> Result<usize> {
        let registry = self.registry.clone();
        let metrics = self.metrics.clone();
        let result = pose_registry::load_many_from_source(source, locator, |def| {
            let mut reg = registry.write();
            reg.save(def);
            if let Some(m) = &metrics {
                m.poses_loaded.inc();
                m.set_presets_stored(reg.len());
            }
        })
        .await;
        result.inspect_err(|e| self.record_failure(locator, e))
    }

    pub fn list_all(&self) -> Vec<PoseDefinition> {
        self.registry.read().list_all()
    }

    /// Save the current pose under `name`.
    pub fn save(&self, name: &str, description: &str) -> Result<()> {
        let pose = self.current.clone().ok_or(PoseError::NoCurrentPose)?;
        self.save_definition(PoseDefinition::new(name, description, pose));
        Ok(())
    }

    pub fn save_definition(&self, def: PoseDefinition) {
        let mut reg = self.registry.write();
        reg.save(def);
        self.record_stored(reg.len());
    }

    pub fn delete(&self, name: &str) -> Option<PoseDefinition> {
        let mut reg = self.registry.write();
        let removed = reg.delete(name);
        self.record_stored(reg.len());
        removed
    }

    fn record_stored(&self, n: usize) {
        if let Some(m) = &self.metrics {
            m.set_presets_stored(n);
        }
    }

    fn record_failure(&self, locator: &str, err: &PoseError) {
        warn!(locator = %locator, error = %err, "pose load failed");
        if let Some(m) = &self.metrics {
            m.load_failures.inc();
        }
    }
}

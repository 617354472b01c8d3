use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, String> {
    let c = IntCounter::new(name, help).map_err(|e| format!("metrics init error: {e}"))?;
    registry
        .register(Box::new(c.clone()))
        .map_err(|e| format!("metrics register error: {e}"))?;
    Ok(c)
}

/// Counters for pose traffic. Cloning shares the underlying series.
#[derive(Clone)]
pub struct PoseMetrics {
    pub registry: Registry,
    pub poses_applied: IntCounter,
    pub full_resets: IntCounter,
    pub resolve_failures: IntCounter,
    pub poses_loaded: IntCounter,
    pub load_failures: IntCounter,
    pub presets_stored: IntGauge,
}

impl PoseMetrics {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();
        let poses_applied = counter(&registry, "pose_applied_total", "Poses written to a rig")?;
        let full_resets = counter(
            &registry,
            "pose_full_resets_total",
            "Applies preceded by an identity reset",
        )?;
        let resolve_failures = counter(
            &registry,
            "pose_resolve_failures_total",
            "Identifiers that matched no preset",
        )?;
        let poses_loaded = counter(&registry, "pose_loaded_total", "Pose documents loaded")?;
        let load_failures = counter(
            &registry,
            "pose_load_failures_total",
            "Source loads that failed",
        )?;
        let presets_stored = IntGauge::new("pose_presets_stored", "Presets in the registry")
            .map_err(|e| format!("metrics init error: {e}"))?;
        registry
            .register(Box::new(presets_stored.clone()))
            .map_err(|e| format!("metrics register error: {e}"))?;
        Ok(Self {
            registry,
            poses_applied,
            full_resets,
            resolve_failures,
            poses_loaded,
            load_failures,
            presets_stored,
        })
    }

    pub fn set_presets_stored(&self, n: usize) {
        self.presets_stored.set(i64::try_from(n).unwrap_or(i64::MAX));
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

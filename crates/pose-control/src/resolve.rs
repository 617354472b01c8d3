use pose_core::PoseDefinition;
use pose_registry::PoseRegistry;

/// One strategy for turning a user-supplied identifier into a preset.
/// Strategies are tried in order; the first hit wins.
pub trait PoseResolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve<'a>(&self, registry: &'a PoseRegistry, identifier: &str)
        -> Option<&'a PoseDefinition>;
}

/// Match on the registry key.
pub struct KeyResolver;

impl PoseResolver for KeyResolver {
    fn name(&self) -> &'static str {
        "key"
    }

    fn resolve<'a>(
        &self,
        registry: &'a PoseRegistry,
        identifier: &str,
    ) -> Option<&'a PoseDefinition> {
        registry.get(identifier)
    }
}

/// Linear scan comparing against each display name.
pub struct DisplayNameResolver;

impl PoseResolver for DisplayNameResolver {
    fn name(&self) -> &'static str {
        "display-name"
    }

    fn resolve<'a>(
        &self,
        registry: &'a PoseRegistry,
        identifier: &str,
    ) -> Option<&'a PoseDefinition> {
        registry.find_by_display_name(identifier)
    }
}

pub fn default_resolvers() -> Vec<Box<dyn PoseResolver>> {
    vec![Box::new(KeyResolver), Box::new(DisplayNameResolver)]
}

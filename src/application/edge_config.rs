// Component metadata lookup
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What the dashboard knows about one configured component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub id: String,
    #[serde(default)]
    pub alias: String,
    pub factory_id: String,
}

#[async_trait]
pub trait EdgeConfigSource: Send + Sync {
    /// Resolve a component id on an edge, `None` when it is not configured
    async fn get_component(
        &self,
        edge_id: &str,
        component_id: &str,
    ) -> anyhow::Result<Option<ComponentMetadata>>;
}

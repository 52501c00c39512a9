// Edge config source backed by the components list of the configuration file
use crate::application::edge_config::{ComponentMetadata, EdgeConfigSource};
use crate::infrastructure::config::ComponentEntry;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct StaticEdgeConfig {
    entries: Vec<ComponentEntry>,
}

impl StaticEdgeConfig {
    pub fn new(entries: Vec<ComponentEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl EdgeConfigSource for StaticEdgeConfig {
    async fn get_component(
        &self,
        edge_id: &str,
        component_id: &str,
    ) -> anyhow::Result<Option<ComponentMetadata>> {
        // edge specific entries win over global ones
        let found = self
            .entries
            .iter()
            .filter(|e| e.id == component_id)
            .find(|e| e.edge.as_deref() == Some(edge_id))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.id == component_id && e.edge.is_none())
            });

        Ok(found.map(ComponentEntry::metadata))
    }
}

use serde::Deserialize;

/// A nested `{ id }` reference to another indexer entity.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityId {
    pub id: String,
}

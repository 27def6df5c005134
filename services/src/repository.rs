use async_trait::async_trait;

use crate::ServiceError;

/// A record with a stable, opaque identifier.
///
/// Identifiers are unique within a collection and immutable after
/// creation.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Per-resource data service: the only way stores reach a backing
/// collection.
///
/// `list` always returns the full backing set; filtering and pagination
/// are the store's job. `update` with an absent id and `delete` of an
/// absent id are silent no-ops, never errors.
#[async_trait]
pub trait ResourceService<R: Record>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, ServiceError>;

    async fn create(&self, record: R) -> Result<R, ServiceError>;

    async fn update(&self, id: &str, record: R) -> Result<R, ServiceError>;

    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

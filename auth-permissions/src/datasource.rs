use crate::{
    config::PermissionConfig,
    error::StoreError,
    store::{postgres::PostgresPermissionStore, InMemoryPermissionStore, PermissionStore},
};
use async_trait::async_trait;
use database_layer::DataSourceRegistry;
use std::sync::Arc;
use tracing::{debug, info};

/// Opens the permission store described by a [`PermissionConfig`]
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn open(&self, config: &PermissionConfig) -> Result<Arc<dyn PermissionStore>, StoreError>;
}

/// Data source handing out one shared in-memory store
#[derive(Clone, Default)]
pub struct InMemoryDataSource {
    store: InMemoryPermissionStore,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing store so callers can inspect it afterwards
    pub fn with_store(store: InMemoryPermissionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &InMemoryPermissionStore {
        &self.store
    }
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    async fn open(&self, config: &PermissionConfig) -> Result<Arc<dyn PermissionStore>, StoreError> {
        debug!("Opening in-memory permission store for {}", config.datasource);
        Ok(Arc::new(self.store.clone()))
    }
}

/// Data source backed by the named PostgreSQL pools of a registry
#[derive(Clone)]
pub struct PostgresDataSource {
    registry: DataSourceRegistry,
}

impl PostgresDataSource {
    pub fn new(registry: DataSourceRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl DataSource for PostgresDataSource {
    async fn open(&self, config: &PermissionConfig) -> Result<Arc<dyn PermissionStore>, StoreError> {
        let pool = self.registry.get(&config.datasource)?;
        let store = PostgresPermissionStore::new(pool.pool().clone(), config);

        if config.create_tables {
            store.ensure_schema().await?;
        }

        info!("Opened PostgreSQL permission store on {}", config.datasource);
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Permission;

    #[tokio::test]
    async fn test_in_memory_source_shares_one_store() {
        let source = InMemoryDataSource::new();
        let config = PermissionConfig::default();

        let first = source.open(&config).await.unwrap();
        let second = source.open(&config).await.unwrap();

        let view = Permission::new("dashboard-1", "view");
        first.insert(&view).await.unwrap();

        assert!(second.granted_roles(&view).await.unwrap().is_empty());
        assert_eq!(source.store().len(), 1);
    }

    #[tokio::test]
    async fn test_postgres_source_requires_registered_pool() {
        let source = PostgresDataSource::new(DataSourceRegistry::new());
        let config = PermissionConfig {
            datasource: "MISSING_DB".to_string(),
            ..PermissionConfig::default()
        };

        match source.open(&config).await {
            Err(StoreError::StorageError(message)) => assert!(message.contains("MISSING_DB")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected missing data source to fail"),
        }
    }
}

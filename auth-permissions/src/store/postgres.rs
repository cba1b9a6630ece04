//! PostgreSQL-backed permission store
//!
//! Two tables hold the relation:
//! - the permissions table, unique on `(resource, action)`
//! - the role grants table, referencing permissions with `ON DELETE RESTRICT`
//!   so a permission can never be removed while a grant still points at it
//!
//! Table names come from [`PermissionConfig`] and are validated as plain
//! identifiers before they reach this module.

use crate::{
    config::PermissionConfig,
    error::StoreError,
    models::{Permission, Role},
    store::PermissionStore,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, info};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn is_violation(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}

fn storage_error(context: &str, err: sqlx::Error) -> StoreError {
    error!("{}: {}", context, err);
    StoreError::StorageError(format!("{}: {}", context, err))
}

/// PostgreSQL-backed permission store
pub struct PostgresPermissionStore {
    pool: PgPool,
    permissions_table: String,
    role_permissions_table: String,
}

impl PostgresPermissionStore {
    pub fn new(pool: PgPool, config: &PermissionConfig) -> Self {
        Self {
            pool,
            permissions_table: config.permissions_table.clone(),
            role_permissions_table: config.role_permissions_table.clone(),
        }
    }

    /// Create the permission tables if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StorageError`] if any DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let statements = [
            format!(
                "CREATE TABLE IF NOT EXISTS {p} (
                    id BIGSERIAL PRIMARY KEY,
                    resource VARCHAR(255) NOT NULL,
                    action VARCHAR(255) NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    UNIQUE (resource, action)
                )",
                p = self.permissions_table
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {rp} (
                    id BIGSERIAL PRIMARY KEY,
                    permission_id BIGINT NOT NULL REFERENCES {p} (id) ON DELETE RESTRICT,
                    role_id VARCHAR(255) NOT NULL,
                    granted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    UNIQUE (permission_id, role_id)
                )",
                p = self.permissions_table,
                rp = self.role_permissions_table
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {rp}_role_id_idx ON {rp} (role_id)",
                rp = self.role_permissions_table
            ),
        ];

        for statement in &statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to create permission tables", e))?;
        }

        info!(
            "Permission tables ready: {}, {}",
            self.permissions_table, self.role_permissions_table
        );
        Ok(())
    }

    async fn permission_id(&self, permission: &Permission) -> Result<Option<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT id FROM {} WHERE resource = $1 AND action = $2",
            self.permissions_table
        ))
        .bind(&permission.resource)
        .bind(&permission.action)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to look up permission", e))
    }

    async fn grant_count(&self, permission: &Permission) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {rp} rp JOIN {p} p ON p.id = rp.permission_id
             WHERE p.resource = $1 AND p.action = $2",
            p = self.permissions_table,
            rp = self.role_permissions_table
        ))
        .bind(&permission.resource)
        .bind(&permission.action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to count grants", e))
    }
}

#[async_trait]
impl PermissionStore for PostgresPermissionStore {
    async fn insert(&self, permission: &Permission) -> Result<(), StoreError> {
        debug!("Inserting permission into PostgreSQL: {}", permission);

        sqlx::query(&format!(
            "INSERT INTO {} (resource, action) VALUES ($1, $2)",
            self.permissions_table
        ))
        .bind(&permission.resource)
        .bind(&permission.action)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_violation(&e, UNIQUE_VIOLATION) {
                StoreError::PermissionExists(permission.clone())
            } else {
                storage_error("Failed to insert permission", e)
            }
        })?;

        Ok(())
    }

    async fn delete(&self, permission: &Permission) -> Result<(), StoreError> {
        debug!("Deleting permission from PostgreSQL: {}", permission);

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE resource = $1 AND action = $2",
            self.permissions_table
        ))
        .bind(&permission.resource)
        .bind(&permission.action)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(StoreError::PermissionNotFound(permission.clone()))
            }
            Ok(_) => Ok(()),
            Err(e) if is_violation(&e, FOREIGN_KEY_VIOLATION) => {
                let roles = self.grant_count(permission).await?;
                Err(StoreError::StillGranted {
                    permission: permission.clone(),
                    roles: usize::try_from(roles).unwrap_or(usize::MAX),
                })
            }
            Err(e) => Err(storage_error("Failed to delete permission", e)),
        }
    }

    async fn grant(&self, permission: &Permission, role: &Role) -> Result<(), StoreError> {
        debug!("Granting {} to {} in PostgreSQL", permission, role);

        let permission_id = self
            .permission_id(permission)
            .await?
            .ok_or_else(|| StoreError::PermissionNotFound(permission.clone()))?;

        sqlx::query(&format!(
            "INSERT INTO {} (permission_id, role_id) VALUES ($1, $2)
             ON CONFLICT (permission_id, role_id) DO NOTHING",
            self.role_permissions_table
        ))
        .bind(permission_id)
        .bind(&role.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // the permission was deleted between the lookup and the insert
            if is_violation(&e, FOREIGN_KEY_VIOLATION) {
                StoreError::PermissionNotFound(permission.clone())
            } else {
                storage_error("Failed to grant permission", e)
            }
        })?;

        Ok(())
    }

    async fn revoke_all(&self, permission: &Permission) -> Result<(), StoreError> {
        debug!("Revoking {} from all roles in PostgreSQL", permission);

        let done = sqlx::query(&format!(
            "DELETE FROM {rp} WHERE permission_id IN
                (SELECT id FROM {p} WHERE resource = $1 AND action = $2)",
            p = self.permissions_table,
            rp = self.role_permissions_table
        ))
        .bind(&permission.resource)
        .bind(&permission.action)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to revoke permission", e))?;

        debug!("Removed {} grants", done.rows_affected());
        Ok(())
    }

    async fn revoke(&self, permission: &Permission, role: &Role) -> Result<(), StoreError> {
        debug!("Revoking {} from {} in PostgreSQL", permission, role);

        sqlx::query(&format!(
            "DELETE FROM {rp} WHERE role_id = $3 AND permission_id IN
                (SELECT id FROM {p} WHERE resource = $1 AND action = $2)",
            p = self.permissions_table,
            rp = self.role_permissions_table
        ))
        .bind(&permission.resource)
        .bind(&permission.action)
        .bind(&role.id)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to revoke permission from role", e))?;

        Ok(())
    }

    async fn has_any(&self, roles: &[Role], permission: &Permission) -> Result<bool, StoreError> {
        let role_ids: Vec<String> = roles.iter().map(|role| role.id.clone()).collect();

        sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(
                SELECT 1 FROM {rp} rp JOIN {p} p ON p.id = rp.permission_id
                WHERE p.resource = $1 AND p.action = $2 AND rp.role_id = ANY($3)
            )",
            p = self.permissions_table,
            rp = self.role_permissions_table
        ))
        .bind(&permission.resource)
        .bind(&permission.action)
        .bind(role_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to check permission", e))
    }

    async fn granted_roles(&self, permission: &Permission) -> Result<Vec<String>, StoreError> {
        let permission_id = self
            .permission_id(permission)
            .await?
            .ok_or_else(|| StoreError::PermissionNotFound(permission.clone()))?;

        sqlx::query_scalar::<_, String>(&format!(
            "SELECT role_id FROM {} WHERE permission_id = $1 ORDER BY role_id",
            self.role_permissions_table
        ))
        .bind(permission_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list granted roles", e))
    }
}

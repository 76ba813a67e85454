//! Base/Rel Link Bookkeeping
//!
//! Applications and note templates share the same storage pattern: one
//! `*_base` table holds each distinct entry exactly once, and a `*_rel` table
//! records which users are linked to it. This module implements the
//! bookkeeping common to both:
//!
//! - linking a user to a base row (idempotent)
//! - unlinking, with the base row deleted once its last link is gone
//!
//! All functions take a `&mut SqliteConnection` so callers can run them
//! inside a transaction opened with [`begin_write`]:
//!
//! ```rust,no_run
//! use despacho::backend::links::{begin_write, APLICATIVOS};
//! # async fn example(pool: sqlx::SqlitePool) -> Result<(), sqlx::Error> {
//! let mut tx = begin_write(&pool).await?;
//! let outcome = APLICATIVOS.unlink(&mut tx, 1, 42).await?;
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```

use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::shared::RemovalResponse;

/// Open a transaction holding the database write lock from its first
/// statement
///
/// Every read-then-write sequence on the base/rel tables runs inside one of
/// these. A deferred transaction that must upgrade its read lock fails with
/// `SQLITE_BUSY` when another writer got there first, without waiting.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Names of a base/rel table pair
///
/// All identifiers are compile-time constants; they are interpolated into
/// SQL, values never are.
#[derive(Debug, Clone, Copy)]
pub struct LinkTable {
    /// Table holding the shared entries
    pub base: &'static str,
    /// Table holding user → entry links
    pub rel: &'static str,
    /// Column of `rel` referencing `base.id`
    pub fk: &'static str,
}

/// Application catalog tables
pub const APLICATIVOS: LinkTable = LinkTable {
    base: "aplicativos_base",
    rel: "aplicativos_rel",
    fk: "aplicativo_id",
};

/// Note template tables
pub const PLANTILLAS: LinkTable = LinkTable {
    base: "plantillas_base",
    rel: "notas_despacho_rel",
    fk: "plantilla_id",
};

impl LinkTable {
    /// Whether a base row with this ID exists
    pub async fn base_exists(
        &self,
        conn: &mut SqliteConnection,
        base_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!("SELECT id FROM {} WHERE id = $1", self.base);
        let row: Option<(i64,)> = sqlx::query_as(&sql)
            .bind(base_id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }

    /// Whether the user is linked to the base row
    pub async fn is_linked(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        base_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "SELECT id FROM {} WHERE usuario_id = $1 AND {} = $2",
            self.rel, self.fk
        );
        let row: Option<(i64,)> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(base_id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }

    /// Number of users linked to the base row
    pub async fn link_count(
        &self,
        conn: &mut SqliteConnection,
        base_id: i64,
    ) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = $1", self.rel, self.fk);
        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(base_id)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }

    /// Link the user to the base row
    ///
    /// Returns `true` when a new link was inserted, `false` when it already
    /// existed.
    pub async fn link(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        base_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "INSERT INTO {rel} (usuario_id, {fk}, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (usuario_id, {fk}) DO NOTHING",
            rel = self.rel,
            fk = self.fk
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(base_id)
            .bind(Utc::now())
            .execute(conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Move the user's link from one base row to another
    ///
    /// The old row is deleted if nothing references it afterwards. Returns
    /// whether the old row was deleted.
    pub async fn relink(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        from_base_id: i64,
        to_base_id: i64,
    ) -> Result<bool, sqlx::Error> {
        if from_base_id == to_base_id {
            return Ok(false);
        }
        self.delete_link(&mut *conn, user_id, from_base_id).await?;
        self.link(&mut *conn, user_id, to_base_id).await?;
        self.delete_if_orphaned(conn, from_base_id).await
    }

    /// Remove the user's link and clean up the base row if it is orphaned
    ///
    /// Returns `None` when the user was not linked to the row.
    pub async fn unlink(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        base_id: i64,
    ) -> Result<Option<RemovalResponse>, sqlx::Error> {
        if !self.delete_link(&mut *conn, user_id, base_id).await? {
            return Ok(None);
        }

        let base_deleted = self.delete_if_orphaned(conn, base_id).await?;
        if base_deleted {
            tracing::info!("Removed orphaned {} row {}", self.base, base_id);
        }

        Ok(Some(RemovalResponse {
            removed: true,
            base_deleted,
        }))
    }

    async fn delete_link(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        base_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "DELETE FROM {} WHERE usuario_id = $1 AND {} = $2",
            self.rel, self.fk
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(base_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the base row if no link references it
    pub async fn delete_if_orphaned(
        &self,
        conn: &mut SqliteConnection,
        base_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "DELETE FROM {base} WHERE id = $1 \
             AND NOT EXISTS (SELECT 1 FROM {rel} WHERE {fk} = $2)",
            base = self.base,
            rel = self.rel,
            fk = self.fk
        );
        let result = sqlx::query(&sql)
            .bind(base_id)
            .bind(base_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

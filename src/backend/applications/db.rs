//! Database operations for the application catalog
//!
//! Entries in `aplicativos_base` are deduplicated on `(nombre, url)`; each
//! user's list is the set of `aplicativos_rel` rows pointing at them.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

use crate::backend::links::{begin_write, APLICATIVOS};
use crate::shared::{Application, CatalogEntry, NewApplication, RemovalResponse};

fn application_from_row(row: &SqliteRow) -> Application {
    Application {
        id: row.get("id"),
        nombre: row.get("nombre"),
        url: row.get("url"),
        icono: row.get("icono"),
        linked_at: row.get("linked_at"),
    }
}

/// Applications linked to a user, ordered by name
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Application>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT b.id, b.nombre, b.url, b.icono, r.created_at AS linked_at
        FROM aplicativos_rel r
        JOIN aplicativos_base b ON b.id = r.aplicativo_id
        WHERE r.usuario_id = $1
        ORDER BY b.nombre COLLATE NOCASE, b.id
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(application_from_row).collect())
}

/// One application as seen by a user, if linked
async fn get_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    app_id: i64,
) -> Result<Option<Application>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT b.id, b.nombre, b.url, b.icono, r.created_at AS linked_at
        FROM aplicativos_rel r
        JOIN aplicativos_base b ON b.id = r.aplicativo_id
        WHERE r.usuario_id = $1 AND b.id = $2
        "#
    )
    .bind(user_id)
    .bind(app_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.as_ref().map(application_from_row))
}

/// Every base entry with its number of linked users
pub async fn list_catalog(pool: &SqlitePool) -> Result<Vec<CatalogEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT b.id, b.nombre, b.url, b.icono, COUNT(r.id) AS users
        FROM aplicativos_base b
        LEFT JOIN aplicativos_rel r ON r.aplicativo_id = b.id
        GROUP BY b.id, b.nombre, b.url, b.icono
        ORDER BY b.nombre COLLATE NOCASE, b.id
        "#
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| CatalogEntry {
        id: row.get("id"),
        nombre: row.get("nombre"),
        url: row.get("url"),
        icono: row.get("icono"),
        users: row.get("users"),
    }).collect())
}

/// Find the base row for `(nombre, url)` or insert it
///
/// An icon supplied for an entry that has none fills the gap; an existing
/// icon is never overwritten.
async fn upsert_base(
    conn: &mut SqliteConnection,
    app: &NewApplication,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO aplicativos_base (nombre, url, icono, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (nombre, url)
        DO UPDATE SET icono = COALESCE(aplicativos_base.icono, excluded.icono)
        RETURNING id
        "#
    )
    .bind(&app.nombre)
    .bind(&app.url)
    .bind(&app.icono)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// Add an application to a user's list
///
/// `app` must already be normalized. Returns the application and whether a
/// new link was created.
pub async fn add_for_user(
    pool: &SqlitePool,
    user_id: i64,
    app: &NewApplication,
) -> Result<(Application, bool), sqlx::Error> {
    let mut tx = begin_write(pool).await?;

    let base_id = upsert_base(&mut tx, app).await?;
    let created = APLICATIVOS.link(&mut tx, user_id, base_id).await?;
    let application = get_for_user(&mut tx, user_id, base_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    tx.commit().await?;
    Ok((application, created))
}

/// Link an existing catalog entry to a user
///
/// Returns `None` when the entry does not exist.
pub async fn link_existing(
    pool: &SqlitePool,
    user_id: i64,
    app_id: i64,
) -> Result<Option<(Application, bool)>, sqlx::Error> {
    let mut tx = begin_write(pool).await?;

    if !APLICATIVOS.base_exists(&mut tx, app_id).await? {
        return Ok(None);
    }
    let created = APLICATIVOS.link(&mut tx, user_id, app_id).await?;
    let application = get_for_user(&mut tx, user_id, app_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    tx.commit().await?;
    Ok(Some((application, created)))
}

/// Remove an application from a user's list
///
/// Deletes the base entry when no other user is linked to it. Returns
/// `None` when the user was not linked.
pub async fn remove_for_user(
    pool: &SqlitePool,
    user_id: i64,
    app_id: i64,
) -> Result<Option<RemovalResponse>, sqlx::Error> {
    let mut tx = begin_write(pool).await?;
    let outcome = APLICATIVOS.unlink(&mut tx, user_id, app_id).await?;
    tx.commit().await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::create_user;
    use crate::backend::server::config::{connect, run_migrations};
    use pretty_assertions::assert_eq;

    async fn setup() -> (SqlitePool, i64, i64) {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let a = create_user(&pool, "operador1", "a@example.com", "h", None).await.unwrap();
        let b = create_user(&pool, "operador2", "b@example.com", "h", None).await.unwrap();
        (pool, a.id, b.id)
    }

    fn app(nombre: &str, url: &str, icono: Option<&str>) -> NewApplication {
        NewApplication {
            nombre: nombre.to_string(),
            url: url.to_string(),
            icono: icono.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_same_entry_is_shared() {
        let (pool, a, b) = setup().await;
        let portal = app("Portal", "https://portal.example.com", None);

        let (first, created_a) = add_for_user(&pool, a, &portal).await.unwrap();
        let (second, created_b) = add_for_user(&pool, b, &portal).await.unwrap();
        assert!(created_a && created_b);
        assert_eq!(first.id, second.id);

        let catalog = list_catalog(&pool).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].users, 2);
    }

    #[tokio::test]
    async fn test_adding_twice_is_idempotent() {
        let (pool, a, _b) = setup().await;
        let portal = app("Portal", "https://portal.example.com", None);

        add_for_user(&pool, a, &portal).await.unwrap();
        let (_, created) = add_for_user(&pool, a, &portal).await.unwrap();
        assert!(!created);
        assert_eq!(list_for_user(&pool, a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_icon_fills_gap_but_never_overwrites() {
        let (pool, a, b) = setup().await;

        add_for_user(&pool, a, &app("Portal", "https://p.example.com", None)).await.unwrap();
        let (with_icon, _) = add_for_user(&pool, b, &app("Portal", "https://p.example.com", Some("globe")))
            .await
            .unwrap();
        assert_eq!(with_icon.icono.as_deref(), Some("globe"));

        let (kept, _) = add_for_user(&pool, a, &app("Portal", "https://p.example.com", Some("star")))
            .await
            .unwrap();
        assert_eq!(kept.icono.as_deref(), Some("globe"));
    }

    #[tokio::test]
    async fn test_list_is_per_user_and_sorted() {
        let (pool, a, b) = setup().await;
        add_for_user(&pool, a, &app("zabbix", "https://z.example.com", None)).await.unwrap();
        add_for_user(&pool, a, &app("Ampere", "https://a.example.com", None)).await.unwrap();
        add_for_user(&pool, b, &app("Otro", "https://o.example.com", None)).await.unwrap();

        let names: Vec<String> = list_for_user(&pool, a)
            .await
            .unwrap()
            .into_iter()
            .map(|app| app.nombre)
            .collect();
        assert_eq!(names, vec!["Ampere".to_string(), "zabbix".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_cleans_up_last_reference() {
        let (pool, a, b) = setup().await;
        let (portal, _) = add_for_user(&pool, a, &app("Portal", "https://p.example.com", None))
            .await
            .unwrap();
        link_existing(&pool, b, portal.id).await.unwrap().unwrap();

        let first = remove_for_user(&pool, a, portal.id).await.unwrap().unwrap();
        assert!(!first.base_deleted);
        assert_eq!(list_catalog(&pool).await.unwrap().len(), 1);

        let second = remove_for_user(&pool, b, portal.id).await.unwrap().unwrap();
        assert!(second.base_deleted);
        assert!(list_catalog(&pool).await.unwrap().is_empty());

        assert!(remove_for_user(&pool, b, portal.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_link_unknown_entry() {
        let (pool, a, _b) = setup().await;
        assert!(link_existing(&pool, a, 999).await.unwrap().is_none());
    }
}

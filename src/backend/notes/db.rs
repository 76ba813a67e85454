//! Database operations for note templates
//!
//! Template bodies live once in `plantillas_base`, keyed on
//! `(titulo, contenido)`. Edits are copy-on-write: a user editing a shared
//! template gets their own row and the other users keep theirs.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

use crate::backend::links::{begin_write, PLANTILLAS};
use crate::shared::{NoteInput, NoteTemplate, RemovalResponse};

const SELECT_FOR_USER: &str = r#"
    SELECT b.id, b.titulo, b.contenido, b.categoria, b.created_at, b.updated_at
    FROM notas_despacho_rel r
    JOIN plantillas_base b ON b.id = r.plantilla_id
"#;

fn note_from_row(row: &SqliteRow) -> NoteTemplate {
    NoteTemplate {
        id: row.get("id"),
        titulo: row.get("titulo"),
        contenido: row.get("contenido"),
        categoria: row.get("categoria"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Templates linked to a user, most recently updated first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<NoteTemplate>, sqlx::Error> {
    let sql = format!(
        "{} WHERE r.usuario_id = $1 ORDER BY b.updated_at DESC, b.id DESC",
        SELECT_FOR_USER
    );
    let rows = sqlx::query(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(note_from_row).collect())
}

async fn get_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    note_id: i64,
) -> Result<NoteTemplate, sqlx::Error> {
    let sql = format!("{} WHERE r.usuario_id = $1 AND b.id = $2", SELECT_FOR_USER);
    let row = sqlx::query(&sql)
        .bind(user_id)
        .bind(note_id)
        .fetch_one(conn)
        .await?;
    Ok(note_from_row(&row))
}

/// ID of the base row holding exactly this title and content
async fn find_base(
    conn: &mut SqliteConnection,
    note: &NoteInput,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM plantillas_base WHERE titulo = $1 AND contenido = $2"
    )
    .bind(&note.titulo)
    .bind(&note.contenido)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|(id,)| id))
}

/// Find or insert the base row for this title and content
///
/// A category supplied for a row without one fills the gap.
async fn upsert_base(
    conn: &mut SqliteConnection,
    note: &NoteInput,
) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO plantillas_base (titulo, contenido, categoria, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (titulo, contenido)
        DO UPDATE SET categoria = COALESCE(plantillas_base.categoria, excluded.categoria)
        RETURNING id
        "#
    )
    .bind(&note.titulo)
    .bind(&note.contenido)
    .bind(&note.categoria)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

async fn update_in_place(
    conn: &mut SqliteConnection,
    note_id: i64,
    note: &NoteInput,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE plantillas_base
        SET titulo = $1, contenido = $2, categoria = $3, updated_at = $4
        WHERE id = $5
        "#
    )
    .bind(&note.titulo)
    .bind(&note.contenido)
    .bind(&note.categoria)
    .bind(Utc::now())
    .bind(note_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Create a template for a user, reusing an identical one if it exists
///
/// `note` must already be normalized. Returns the template and whether a new
/// link was created.
pub async fn create_for_user(
    pool: &SqlitePool,
    user_id: i64,
    note: &NoteInput,
) -> Result<(NoteTemplate, bool), sqlx::Error> {
    let mut tx = begin_write(pool).await?;

    let base_id = upsert_base(&mut tx, note).await?;
    let created = PLANTILLAS.link(&mut tx, user_id, base_id).await?;
    let template = get_for_user(&mut tx, user_id, base_id).await?;

    tx.commit().await?;
    Ok((template, created))
}

/// Edit a user's template
///
/// The row is changed in place only when the user is its sole owner and no
/// other row already holds the new title and content. Otherwise the user is
/// moved to the matching row (or a fresh copy) and the old row is deleted if
/// nobody else links it. Returns `None` when the user is not linked.
pub async fn update_for_user(
    pool: &SqlitePool,
    user_id: i64,
    note_id: i64,
    note: &NoteInput,
) -> Result<Option<NoteTemplate>, sqlx::Error> {
    let mut tx = begin_write(pool).await?;

    if !PLANTILLAS.is_linked(&mut tx, user_id, note_id).await? {
        return Ok(None);
    }

    let sole_owner = PLANTILLAS.link_count(&mut tx, note_id).await? == 1;
    let target_id = match find_base(&mut tx, note).await? {
        // Same title and content; only the category can differ
        Some(existing) if existing == note_id => {
            if sole_owner {
                update_in_place(&mut tx, note_id, note).await?;
            }
            note_id
        }
        Some(existing) => {
            PLANTILLAS.relink(&mut tx, user_id, note_id, existing).await?;
            existing
        }
        None if sole_owner => {
            update_in_place(&mut tx, note_id, note).await?;
            note_id
        }
        None => {
            let copy_id = upsert_base(&mut tx, note).await?;
            PLANTILLAS.relink(&mut tx, user_id, note_id, copy_id).await?;
            tracing::debug!(
                "User {} forked template {} into {}",
                user_id,
                note_id,
                copy_id
            );
            copy_id
        }
    };

    let template = get_for_user(&mut tx, user_id, target_id).await?;
    tx.commit().await?;
    Ok(Some(template))
}

/// Remove a template from a user's list
///
/// Returns `None` when the user was not linked.
pub async fn delete_for_user(
    pool: &SqlitePool,
    user_id: i64,
    note_id: i64,
) -> Result<Option<RemovalResponse>, sqlx::Error> {
    let mut tx = begin_write(pool).await?;
    let outcome = PLANTILLAS.unlink(&mut tx, user_id, note_id).await?;
    tx.commit().await?;
    Ok(outcome)
}

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::{
    error::AppError,
    models::nodes::{ImportItem, NodeKind, NodeRow},
};

pub async fn find_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: &str,
) -> Result<Option<NodeRow>, AppError> {
    sqlx::query_as::<_, NodeRow>(
        "SELECT id, url, parent_id, kind, size, date_updated FROM nodes WHERE id = $1 LIMIT 1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::Database)
}

pub async fn find_folder_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: &str,
) -> Result<Option<NodeRow>, AppError> {
    sqlx::query_as::<_, NodeRow>(
        r#"
        SELECT id, url, parent_id, kind, size, date_updated
        FROM nodes
        WHERE id = $1 AND kind = 'FOLDER'
        LIMIT 1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::Database)
}

/// Resolves the closed descendant set of `root_id` (root included) in one
/// recursive scan. An unknown root yields an empty set.
pub async fn resolve_descendants<'e>(
    executor: impl PgExecutor<'e>,
    root_id: &str,
) -> Result<Vec<NodeRow>, AppError> {
    sqlx::query_as::<_, NodeRow>(
        r#"
        WITH RECURSIVE subtree AS (
            SELECT id, url, parent_id, kind, size, date_updated
            FROM nodes
            WHERE id = $1
            UNION ALL
            SELECT n.id, n.url, n.parent_id, n.kind, n.size, n.date_updated
            FROM nodes n
            JOIN subtree s ON n.parent_id = s.id
        )
        SELECT id, url, parent_id, kind, size, date_updated FROM subtree
        "#,
    )
    .bind(root_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::Database)
}

/// Insert-or-overwrite keyed by id. `date_created` is set by the database
/// on first insert and left untouched on update.
pub async fn upsert_node<'e>(
    executor: impl PgExecutor<'e>,
    item: &ImportItem,
    kind: NodeKind,
    stamp: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO nodes (id, url, parent_id, kind, size, date_updated)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET
            url = EXCLUDED.url,
            parent_id = EXCLUDED.parent_id,
            kind = EXCLUDED.kind,
            size = EXCLUDED.size,
            date_updated = EXCLUDED.date_updated
        "#,
    )
    .bind(&item.id)
    .bind(&item.url)
    .bind(&item.parent_id)
    .bind(kind)
    .bind(item.size)
    .bind(stamp)
    .execute(executor)
    .await
    .map_err(AppError::Database)?;

    Ok(())
}

/// Removes a node and every transitive descendant: the set is resolved
/// explicitly and deleted in a single statement, so the self-referencing
/// foreign key needs no declared cascade.
pub async fn delete_subtree<'e>(executor: impl PgExecutor<'e>, id: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        WITH RECURSIVE subtree AS (
            SELECT id FROM nodes WHERE id = $1
            UNION ALL
            SELECT n.id FROM nodes n JOIN subtree s ON n.parent_id = s.id
        )
        DELETE FROM nodes WHERE id IN (SELECT id FROM subtree)
        "#,
    )
    .bind(id)
    .execute(executor)
    .await
    .map_err(AppError::Database)?;

    Ok(())
}

/// FILE rows whose update stamp falls in `[from, to]`, both bounds
/// inclusive, ordered by id.
pub async fn files_updated_between<'e>(
    executor: impl PgExecutor<'e>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<NodeRow>, AppError> {
    sqlx::query_as::<_, NodeRow>(
        r#"
        SELECT id, url, parent_id, kind, size, date_updated
        FROM nodes
        WHERE kind = 'FILE' AND date_updated BETWEEN $1 AND $2
        ORDER BY id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await
    .map_err(AppError::Database)
}

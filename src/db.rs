use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::error::AppError;

pub fn init_pool(database_url: &str) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)
        .map_err(AppError::Database)
}

pub async fn prepare_schema(pool: &PgPool, reset: bool) -> Result<(), AppError> {
    if reset {
        reset_schema(pool).await?;
    }
    create_schema(pool).await
}

async fn reset_schema(pool: &PgPool) -> Result<(), AppError> {
    let drop_statements = ["DROP TABLE IF EXISTS nodes", "DROP TYPE IF EXISTS node_kind"];

    for statement in drop_statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;
    }

    Ok(())
}

async fn create_schema(pool: &PgPool) -> Result<(), AppError> {
    let statements = [
        r#"
        DO $$
        BEGIN
            IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'node_kind') THEN
                CREATE TYPE node_kind AS ENUM ('FILE', 'FOLDER');
            END IF;
        END
        $$;
        "#,
        // parent_id carries no ON DELETE action: subtree removal resolves
        // the descendant set explicitly and deletes it in one statement.
        r#"
        CREATE TABLE IF NOT EXISTS nodes (
            id TEXT PRIMARY KEY,
            url VARCHAR(250),
            parent_id TEXT REFERENCES nodes(id),
            kind node_kind NOT NULL,
            size BIGINT,
            date_created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            date_updated TIMESTAMPTZ NOT NULL
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes (parent_id)",
        "CREATE INDEX IF NOT EXISTS idx_nodes_kind_updated ON nodes (kind, date_updated)",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;
    }

    Ok(())
}

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Duration;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    error::AppError,
    models::nodes::{ImportRequest, NodeRow, UpdatedNode, UpdatesResponse},
    store, tree, validation,
};

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(import_nodes)
        .service(delete_node)
        .service(get_node_tree)
        .service(get_updates);
}

#[get("/healthz")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "cumulus-backend",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Applies a batch of node upserts as one unit: a single invalid record
/// rolls back the whole transaction. Parent checks run inside it, so a
/// folder introduced earlier in the same batch is a valid parent.
#[post("/imports")]
async fn import_nodes(
    payload: web::Json<ImportRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ImportRequest { items, update_date } = payload.into_inner();
    let stamp = validation::parse_iso_timestamp(&update_date)?;

    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;
    for item in &items {
        let kind = validation::validate_kind(&item.id, &item.kind)?;
        validation::validate_size(&item.id, kind, item.size)?;

        if let Some(parent_id) = item.parent_id.as_deref() {
            store::find_folder_by_id(&mut *tx, parent_id)
                .await?
                .ok_or_else(|| AppError::InvalidParent {
                    id: item.id.clone(),
                    parent_id: parent_id.to_string(),
                })?;
        }

        store::upsert_node(&mut *tx, item, kind, stamp).await?;
    }
    tx.commit().await.map_err(AppError::Database)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "insert or update applied"
    })))
}

#[derive(Deserialize)]
struct DeleteQuery {
    date: String,
}

/// The `date` parameter is required by the request schema but unused
/// beyond format validation; it is kept for interface compatibility.
#[delete("/delete/{id}")]
async fn delete_node(
    path: web::Path<String>,
    query: web::Query<DeleteQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    validation::parse_iso_timestamp(&query.date)?;
    let id = path.into_inner();

    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;
    store::find_by_id(&mut *tx, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("node {id}")))?;
    store::delete_subtree(&mut *tx, &id).await?;
    tx.commit().await.map_err(AppError::Database)?;

    Ok(HttpResponse::Ok().finish())
}

#[get("/nodes/{id}")]
async fn get_node_tree(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let rows = store::resolve_descendants(&state.pool, &id).await?;
    let view =
        tree::assemble_tree(&id, rows).ok_or_else(|| AppError::NotFound(format!("node {id}")))?;

    Ok(HttpResponse::Ok().json(view))
}

#[derive(Deserialize)]
struct UpdatesQuery {
    date: String,
}

/// Files updated within the 24 hours ending at the supplied instant,
/// both bounds inclusive. Folders never appear here.
#[get("/updates")]
async fn get_updates(
    query: web::Query<UpdatesQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let date_to = validation::parse_iso_timestamp(&query.date)?;
    let date_from = date_to - Duration::hours(24);

    let rows = store::files_updated_between(&state.pool, date_from, date_to).await?;
    let response = UpdatesResponse {
        items: rows.into_iter().map(to_updated_node).collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

fn to_updated_node(row: NodeRow) -> UpdatedNode {
    UpdatedNode {
        id: row.id,
        url: row.url,
        parent_id: row.parent_id,
        size: row.size.unwrap_or(0),
        kind: row.kind,
        date: validation::format_iso_timestamp(row.date_updated),
    }
}

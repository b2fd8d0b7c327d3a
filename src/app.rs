use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{debug, info};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::cell::CellId;
use crate::document::SheetDocument;
use crate::store::{SheetStore, StoreError};

pub struct AppState {
    pub store: SheetStore,
}

#[derive(Deserialize)]
struct IdQuery {
    id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CellQuery {
    cell_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CellUpdate {
    cell_id: String,
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewComment {
    cell_id: Option<String>,
    content: Option<String>,
    author: Option<String>,
}

pub async fn run(rows: u32, cols: u32, seed: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = SheetDocument::new(rows, cols);
    if seed {
        doc.seed_sample_values(&mut rand::thread_rng());
    }

    let app_state = Arc::new(AppState {
        store: SheetStore::with_document(doc),
    });

    let app = router(app_state);

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    info!("listening on http://127.0.0.1:3000 ({}x{} grid)", rows, cols);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/sheet", get(get_sheet).post(replace_sheet))
        .route("/sheet/cell", get(get_cell).put(update_cell))
        .route(
            "/sheet/comment",
            get(list_comments).post(add_comment).delete(delete_comment),
        )
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// GET /sheet - the whole document, no envelope.
async fn get_sheet(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.document())
}

/// POST /sheet - wholesale replace. The body is taken raw so the shape
/// check (and its error message) stays with the store.
async fn replace_sheet(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match state.store.replace_from_json(&body) {
        Ok(()) => {
            info!("document replaced");
            Json(json!({ "success": true })).into_response()
        }
        Err(_) => failure(StatusCode::BAD_REQUEST, "Invalid data format"),
    }
}

/// GET /sheet/cell?id=<cellId>
async fn get_cell(
    Query(query): Query<IdQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(cell_id) = query.id else {
        return failure(StatusCode::BAD_REQUEST, "Cell ID is required");
    };

    match state.store.cell(&cell_id) {
        Ok(cell) => Json(json!({ "success": true, "cell": cell })).into_response(),
        Err(_) => failure(StatusCode::NOT_FOUND, "Cell not found"),
    }
}

/// PUT /sheet/cell with `{cellId, value}`.
async fn update_cell(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CellUpdate>, JsonRejection>,
) -> Response {
    let Ok(Json(update)) = body else {
        return store_failure(StoreError::Unexpected("failed to update cell".into()));
    };

    let Some(id) = CellId::parse(&update.cell_id) else {
        return failure(StatusCode::BAD_REQUEST, "Invalid cell ID");
    };

    match state.store.update_cell(&update.cell_id, update.value) {
        Ok(cell) => {
            debug!("cell {} updated", id.label());
            Json(json!({ "success": true, "cell": cell })).into_response()
        }
        Err(_) => failure(StatusCode::NOT_FOUND, "Cell not found"),
    }
}

/// GET /sheet/comment?cellId=<id>
async fn list_comments(
    Query(query): Query<CellQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(cell_id) = query.cell_id else {
        return failure(StatusCode::BAD_REQUEST, "Cell ID is required");
    };

    let comments = state.store.comments_for_cell(&cell_id);
    Json(json!({ "success": true, "comments": comments })).into_response()
}

/// POST /sheet/comment with `{cellId, content, author}`.
async fn add_comment(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewComment>, JsonRejection>,
) -> Response {
    let Ok(Json(new)) = body else {
        return store_failure(StoreError::Unexpected("failed to add comment".into()));
    };

    let (Some(cell_id), Some(content), Some(author)) = (new.cell_id, new.content, new.author)
    else {
        return failure(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    match state.store.add_comment(&cell_id, &content, &author) {
        Ok(comment) => {
            debug!("comment {} added to cell {}", comment.id, cell_id);
            Json(json!({ "success": true, "comment": comment })).into_response()
        }
        Err(err @ StoreError::InvalidInput(_)) => {
            failure(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(_) => failure(StatusCode::NOT_FOUND, "Cell not found"),
    }
}

/// DELETE /sheet/comment?id=<commentId>
async fn delete_comment(
    Query(query): Query<IdQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(comment_id) = query.id else {
        return failure(StatusCode::BAD_REQUEST, "Comment ID is required");
    };

    if state.store.delete_comment(&comment_id) {
        debug!("comment {} deleted", comment_id);
        Json(json!({ "success": true })).into_response()
    } else {
        failure(StatusCode::NOT_FOUND, "Comment not found")
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

fn store_failure(err: StoreError) -> Response {
    let status = match err {
        StoreError::InvalidInput(_) | StoreError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    failure(status, &err.to_string())
}

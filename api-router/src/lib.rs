use api_state::ApiState;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{delete, get, post},
    Router,
};
use routes::{
    documents::{delete_document, list_documents, upload_document},
    liveness::live,
    query::query_document,
    readiness::ready,
};

pub mod api_state;
pub mod error;
pub mod routes;

/// Slack on top of the configured file ceiling for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

/// Router for API functionality, version 1
pub fn api_routes_v1<S>(app_state: &ApiState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Public probe endpoints (for k8s/systemd probes)
    let public = Router::new()
        .route("/ready", get(ready))
        .route("/live", get(live));

    let documents = Router::new()
        .route(
            "/documents",
            post(upload_document).layer(DefaultBodyLimit::max(
                app_state
                    .config
                    .max_file_size
                    .saturating_add(MULTIPART_OVERHEAD_BYTES),
            )),
        )
        .route("/documents", get(list_documents))
        .route("/documents/{document_id}", delete(delete_document))
        .route("/query", post(query_document));

    public.merge(documents)
}

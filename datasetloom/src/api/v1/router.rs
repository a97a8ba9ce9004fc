use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let documents = Router::new()
        .route("/", post(handlers::documents::register_document))
        .route("/{documentId}", get(handlers::documents::get_document));

    let chunks = Router::new()
        .route("/", get(handlers::chunks::list_chunks))
        .route(
            "/{chunkId}",
            get(handlers::chunks::get_chunk)
                .patch(handlers::chunks::update_chunk)
                .delete(handlers::chunks::delete_chunk),
        )
        .route(
            "/{chunkId}/questions",
            get(handlers::questions::list_questions).post(handlers::questions::create_question),
        );

    let chats = Router::new()
        .route(
            "/",
            get(handlers::chats::list_chats).post(handlers::chats::create_chat),
        )
        .route(
            "/{chatId}",
            get(handlers::chats::get_chat).delete(handlers::chats::delete_chat),
        )
        .route(
            "/{chatId}/messages",
            get(handlers::chats::list_messages).post(handlers::chats::save_messages),
        )
        .route(
            "/{chatId}/votes",
            get(handlers::chats::list_votes).patch(handlers::chats::vote_message),
        );

    let project = Router::new()
        .nest("/documents", documents)
        .nest("/chunks", chunks)
        .nest("/chats", chats)
        .route("/chunks:preview", post(handlers::chunks::preview_chunks))
        .route("/chunks:save", post(handlers::chunks::save_chunks))
        .route("/chunks:generate", post(handlers::chunks::generate_chunks))
        .route("/chunks:merge", post(handlers::chunks::merge_chunks))
        .route(
            "/chunks:batchDelete",
            post(handlers::chunks::batch_delete_chunks),
        );

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .nest("/projects/{projectId}", project)
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}

use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DatasetLoom API",
        version = "1.0.0",
        description = "Document chunking and dataset curation for LLM fine-tuning.",
    ),
    paths(
        handlers::health::health_check,
        handlers::documents::register_document,
        handlers::documents::get_document,
        handlers::chunks::preview_chunks,
        handlers::chunks::save_chunks,
        handlers::chunks::generate_chunks,
        handlers::chunks::merge_chunks,
        handlers::chunks::batch_delete_chunks,
        handlers::chunks::list_chunks,
        handlers::chunks::get_chunk,
        handlers::chunks::update_chunk,
        handlers::chunks::delete_chunk,
        handlers::questions::create_question,
        handlers::questions::list_questions,
        handlers::chats::create_chat,
        handlers::chats::list_chats,
        handlers::chats::get_chat,
        handlers::chats::delete_chat,
        handlers::chats::save_messages,
        handlers::chats::list_messages,
        handlers::chats::vote_message,
        handlers::chats::list_votes,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Common
        dto::common::V1Visibility,
        dto::common::V1MessageRole,
        // Documents
        dto::documents::RegisterDocumentRequest,
        dto::documents::DocumentResponse,
        // Chunks
        dto::chunks::ChunkConfigRequest,
        dto::chunks::SaveChunksRequest,
        dto::chunks::MergeChunksRequest,
        dto::chunks::BatchDeleteChunksRequest,
        dto::chunks::UpdateChunkRequest,
        dto::chunks::ListChunksQuery,
        dto::chunks::ChunkResponse,
        dto::chunks::SkippedDocumentResponse,
        dto::chunks::ChunkPreviewResponse,
        dto::chunks::SaveChunksResponse,
        dto::chunks::GenerateChunksResponse,
        dto::chunks::MergeChunksResponse,
        dto::chunks::ChunkListItemResponse,
        dto::chunks::ListChunksResponse,
        dto::chunks::DeleteChunksResponse,
        // Questions
        dto::questions::CreateQuestionRequest,
        dto::questions::QuestionResponse,
        dto::questions::ListQuestionsResponse,
        // Chats
        dto::chats::CreateChatRequest,
        dto::chats::ListChatsQuery,
        dto::chats::MessageInput,
        dto::chats::SaveMessagesRequest,
        dto::chats::VoteMessageRequest,
        dto::chats::VoteType,
        dto::chats::ChatResponse,
        dto::chats::ListChatsResponse,
        dto::chats::MessageResponse,
        dto::chats::ListMessagesResponse,
        dto::chats::VoteResponse,
        dto::chats::ListVotesResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::PreviewCacheStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "documents", description = "Source document registration"),
        (name = "chunks", description = "Chunk preview, commit, merge, listing and CRUD"),
        (name = "questions", description = "Questions attached to chunks"),
        (name = "chats", description = "Chats, messages and votes"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

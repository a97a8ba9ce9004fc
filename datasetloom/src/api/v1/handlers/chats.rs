//! v1 Chat handlers.

use axum::extract::{Path, State};
use axum_extra::extract::Query;

use crate::api::v1::dto::{
    ChatResponse, CreateChatRequest, ListChatsQuery, ListChatsResponse, ListMessagesResponse,
    ListVotesResponse, MessageResponse, SaveMessagesRequest, VoteMessageRequest, VoteResponse,
    VoteType,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::{AppJson, AppState};

/// `POST /api/v1/projects/{projectId}/chats`
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chats",
    tag = "chats",
    operation_id = "chats.create",
    params(("projectId" = String, Path, description = "Project ID")),
    request_body = CreateChatRequest,
    responses(
        (status = 201, description = "Chat created", body = ChatResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn create_chat(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<CreateChatRequest>,
) -> ApiResponse<ChatResponse> {
    if req.user_id.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "userId cannot be empty");
    }

    let user_id = req.user_id.clone();
    match state
        .chats
        .create_chat(&project_id, &user_id, req.into())
        .await
    {
        Ok(chat) => ApiResponse::created(ChatResponse::from(chat)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/projects/{projectId}/chats`
///
/// Newest first. Pass the last chat id as `startingAfter` for the next page,
/// or the first chat id as `endingBefore` for the previous one.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/chats",
    tag = "chats",
    operation_id = "chats.list",
    params(("projectId" = String, Path, description = "Project ID"), ListChatsQuery),
    responses(
        (status = 200, description = "Chats listed", body = ListChatsResponse),
        (status = 400, description = "Both cursors supplied", body = ApiError),
        (status = 404, description = "Cursor chat not found", body = ApiError),
    )
)]
pub async fn list_chats(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(query): Query<ListChatsQuery>,
) -> ApiResponse<ListChatsResponse> {
    let req = query.into_request(project_id);
    match state.chats.get_chats_by_user_id(&req).await {
        Ok(page) => ApiResponse::success_with_meta(
            ListChatsResponse {
                chats: page.chats.into_iter().map(ChatResponse::from).collect(),
            },
            ResponseMeta::has_more(page.has_more),
        ),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/projects/{projectId}/chats/{chatId}`
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/chats/{chatId}",
    tag = "chats",
    operation_id = "chats.get",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chatId" = String, Path, description = "Chat ID"),
    ),
    responses(
        (status = 200, description = "Chat found", body = ChatResponse),
        (status = 404, description = "Chat not found", body = ApiError),
    )
)]
pub async fn get_chat(
    State(state): State<AppState>,
    Path((project_id, chat_id)): Path<(String, String)>,
) -> ApiResponse<ChatResponse> {
    match state.chats.get_chat(&project_id, &chat_id).await {
        Ok(chat) => ApiResponse::success(ChatResponse::from(chat)),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/projects/{projectId}/chats/{chatId}`
///
/// Removes the chat along with its messages and votes.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{projectId}/chats/{chatId}",
    tag = "chats",
    operation_id = "chats.delete",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chatId" = String, Path, description = "Chat ID"),
    ),
    responses(
        (status = 200, description = "Chat deleted", body = ChatResponse),
        (status = 404, description = "Chat not found", body = ApiError),
    )
)]
pub async fn delete_chat(
    State(state): State<AppState>,
    Path((project_id, chat_id)): Path<(String, String)>,
) -> ApiResponse<ChatResponse> {
    let chat = match state.chats.get_chat(&project_id, &chat_id).await {
        Ok(chat) => chat,
        Err(e) => return e.into(),
    };

    match state.chats.delete_chat(&project_id, &chat_id).await {
        Ok(()) => ApiResponse::success(ChatResponse::from(chat)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/projects/{projectId}/chats/{chatId}/messages`
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chats/{chatId}/messages",
    tag = "chats",
    operation_id = "chats.saveMessages",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chatId" = String, Path, description = "Chat ID"),
    ),
    request_body = SaveMessagesRequest,
    responses(
        (status = 201, description = "Messages saved", body = ListMessagesResponse),
        (status = 404, description = "Chat not found", body = ApiError),
    )
)]
pub async fn save_messages(
    State(state): State<AppState>,
    Path((project_id, chat_id)): Path<(String, String)>,
    AppJson(req): AppJson<SaveMessagesRequest>,
) -> ApiResponse<ListMessagesResponse> {
    if req.messages.is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "messages cannot be empty");
    }

    match state
        .chats
        .save_messages(&project_id, &chat_id, req.into_messages())
        .await
    {
        Ok(messages) => ApiResponse::created(ListMessagesResponse {
            messages: messages.into_iter().map(MessageResponse::from).collect(),
        }),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/projects/{projectId}/chats/{chatId}/messages`
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/chats/{chatId}/messages",
    tag = "chats",
    operation_id = "chats.listMessages",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chatId" = String, Path, description = "Chat ID"),
    ),
    responses(
        (status = 200, description = "Messages in creation order", body = ListMessagesResponse),
        (status = 404, description = "Chat not found", body = ApiError),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path((project_id, chat_id)): Path<(String, String)>,
) -> ApiResponse<ListMessagesResponse> {
    match state.chats.get_messages(&project_id, &chat_id).await {
        Ok(messages) => ApiResponse::success(ListMessagesResponse {
            messages: messages.into_iter().map(MessageResponse::from).collect(),
        }),
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/projects/{projectId}/chats/{chatId}/votes`
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{projectId}/chats/{chatId}/votes",
    tag = "chats",
    operation_id = "chats.vote",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chatId" = String, Path, description = "Chat ID"),
    ),
    request_body = VoteMessageRequest,
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 404, description = "Chat or message not found", body = ApiError),
    )
)]
pub async fn vote_message(
    State(state): State<AppState>,
    Path((project_id, chat_id)): Path<(String, String)>,
    AppJson(req): AppJson<VoteMessageRequest>,
) -> ApiResponse<VoteResponse> {
    let is_upvoted = req.vote_type == VoteType::Up;
    match state
        .chats
        .vote_message(&project_id, &chat_id, &req.message_id, is_upvoted)
        .await
    {
        Ok(vote) => ApiResponse::success(VoteResponse::from(vote)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/projects/{projectId}/chats/{chatId}/votes`
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/chats/{chatId}/votes",
    tag = "chats",
    operation_id = "chats.listVotes",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chatId" = String, Path, description = "Chat ID"),
    ),
    responses(
        (status = 200, description = "Votes listed", body = ListVotesResponse),
        (status = 404, description = "Chat not found", body = ApiError),
    )
)]
pub async fn list_votes(
    State(state): State<AppState>,
    Path((project_id, chat_id)): Path<(String, String)>,
) -> ApiResponse<ListVotesResponse> {
    match state.chats.get_votes(&project_id, &chat_id).await {
        Ok(votes) => ApiResponse::success(ListVotesResponse {
            votes: votes.into_iter().map(VoteResponse::from).collect(),
        }),
        Err(e) => e.into(),
    }
}

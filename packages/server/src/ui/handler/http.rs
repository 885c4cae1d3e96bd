//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};

use crate::{
    infrastructure::dto::http::{
        CreateRoomRequest, ListRoomsQuery, RoomDetailDto, RoomSummaryDto,
    },
    ui::state::AppState,
    usecase::{CreateRoomError, EndRoomError, GetRoomDetailError},
};
use hiroba_shared::time::to_jst_rfc3339;

use super::bearer_token;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRoomsQuery>,
) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute(query.limit).await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// POST /api/rooms
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomSummaryDto>), StatusCode> {
    match state
        .create_room_usecase
        .execute(bearer_token(&headers), request.name)
        .await
    {
        Ok(listing) => Ok((StatusCode::CREATED, Json(RoomSummaryDto::from(&listing)))),
        Err(CreateRoomError::Unauthenticated) => Err(StatusCode::UNAUTHORIZED),
        Err(CreateRoomError::InvalidName(e)) => {
            tracing::debug!("Rejected room name: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(CreateRoomError::Registry(e)) => {
            tracing::error!("Failed to create room: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/rooms/{room_id}
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(&room_id).await {
        Ok(detail) => {
            // Domain Model から DTO への変換
            let listing = detail.listing;
            Ok(Json(RoomDetailDto {
                id: listing.id.into_string(),
                name: listing.name.into_string(),
                created_by: listing.created_by.into_string(),
                created_at: to_jst_rfc3339(listing.created_at.value()),
                connection_count: detail.presence.connection_count,
                online_users: detail
                    .presence
                    .online_users
                    .into_iter()
                    .map(|u| u.into_string())
                    .collect(),
                history_length: detail.history_length,
            }))
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /api/rooms/{room_id}
pub async fn end_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    match state
        .end_room_usecase
        .execute(bearer_token(&headers), &room_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(EndRoomError::Unauthenticated) => StatusCode::UNAUTHORIZED,
        Err(EndRoomError::Forbidden(_)) => StatusCode::FORBIDDEN,
        Err(EndRoomError::RoomNotFound(_)) => StatusCode::NOT_FOUND,
        Err(EndRoomError::Registry(e)) => {
            tracing::error!("Failed to end room '{}': {}", room_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

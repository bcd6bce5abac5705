//! Notifications endpoints.

use agora_common::AppResult;
use agora_core::NotificationService;
use agora_db::entities::notification::{Model as NotificationModel, NotificationType};
use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// List notifications query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    /// Maximum results (default: 50, max: 100)
    pub limit: Option<u64>,
    /// Cursor for pagination (before this ID)
    pub until_id: Option<i32>,
    /// Only unread notifications
    #[serde(default)]
    pub unread_only: bool,
}

/// Notifications response with the unread badge count.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: u64,
}

/// Notification response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i32,
    pub created_at: DateTimeWithTimeZone,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub actor_id: Option<i32>,
    pub message: String,
    pub content: Option<String>,
    pub link: Option<String>,
    pub is_read: bool,
}

impl From<NotificationModel> for NotificationResponse {
    fn from(n: NotificationModel) -> Self {
        Self {
            id: n.id,
            created_at: n.created_at,
            notification_type: n.notification_type,
            actor_id: n.actor_id,
            message: n.message,
            content: n.content,
            link: n.link,
            is_read: n.is_read,
        }
    }
}

/// Mark-as-read result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub updated: u64,
}

/// Get notifications.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<NotificationsListResponse>> {
    let limit = query
        .limit
        .unwrap_or(NotificationService::DEFAULT_LIMIT)
        .clamp(1, state.api.max_page_size.max(1));

    let notifications = state
        .notification_service
        .list(user.id, limit, query.until_id, query.unread_only)
        .await?;
    let unread_count = state.notification_service.count_unread(user.id).await?;

    Ok(ApiResponse::ok(NotificationsListResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
        unread_count,
    }))
}

/// Mark one notification as read.
async fn mark_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<i32>,
) -> AppResult<ApiResponse<MarkReadResponse>> {
    let changed = state
        .notification_service
        .mark_as_read(user.id, notification_id)
        .await?;
    Ok(ApiResponse::ok(MarkReadResponse {
        updated: u64::from(changed),
    }))
}

/// Mark all notifications as read.
async fn mark_all_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkReadResponse>> {
    let updated = state.notification_service.mark_all_as_read(user.id).await?;
    Ok(ApiResponse::ok(MarkReadResponse { updated }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/read-all", post(mark_all_read))
        .route("/{id}/read", post(mark_read))
}

//! Client for the hosted backend's row-level REST API.
//!
//! Tables are addressed as `{rest_url}/{table}`, filtered with
//! `column=eq.value` query parameters. Writes ask for the written rows back
//! with `Prefer: return=representation`.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use seniorcare_core::{
    errors::{CareError, CareResult},
    models::{
        friends::{
            FriendRequest, Friendship, NewFriendRequest, NewFriendship, Profile, RequestStatus,
            UserType,
        },
        message::{ChatMessage, DirectMessage, NewChatMessage, NewDirectMessage},
        volunteer::{ChatStatus, NewVolunteerChat, VolunteerChat},
    },
};
use serde_json::json;
use uuid::Uuid;

use crate::backend::Backend;
use crate::config::BackendConfig;
use crate::feed::Table;

/// Storage code for a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";
/// Code returned when a single row was requested and none matched.
pub const NO_ROWS: &str = "PGRST116";

const PROFILES: &str = "profiles";
const PROFILE_COLUMNS: &str = "id,username,nome,avatar_url,user_type,bio";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Maps a failed response to the error taxonomy.
pub fn classify(status: StatusCode, body: &str) -> CareError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.as_deref());
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| body.trim().to_string());

    match code {
        Some(UNIQUE_VIOLATION) => CareError::Conflict(message),
        Some(NO_ROWS) => CareError::NotFound(message),
        _ if status == StatusCode::NOT_FOUND => CareError::NotFound(message),
        _ if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN => {
            CareError::Authentication(message)
        }
        _ => CareError::Backend(format!("{}: {}", status, message)),
    }
}

/// `eq.` filter operand.
pub fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// `or` filter matching rows sent between two users in either direction.
pub fn between_filter(a: Uuid, b: Uuid) -> String {
    format!(
        "(and(from_user_id.eq.{a},to_user_id.eq.{b}),and(from_user_id.eq.{b},to_user_id.eq.{a}))"
    )
}

pub struct RestBackend {
    client: Client,
    rest_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> CareResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CareError::Backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rest_url: config.rest_url(),
            anon_key: config.anon_key.clone(),
            access_token: None,
        })
    }

    /// Sends requests as a signed-in user instead of anonymously.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.client
            .request(method, self.table_url(table))
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(token)
            .header("Prefer", "return=representation")
    }

    async fn rows<T: DeserializeOwned + Send>(&self, request: RequestBuilder) -> CareResult<Vec<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| CareError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify(status, &body);
            tracing::debug!("Backend request failed: {}", err);
            return Err(err);
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| CareError::Backend(format!("unexpected response body: {}", e)))
    }

    async fn insert<B, T>(&self, table: Table, body: &B) -> CareResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        self.rows::<T>(self.request(Method::POST, table.name()).json(body))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CareError::Backend(format!("insert into {} returned no row", table.name())))
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn find_profile_by_username(&self, username: &str) -> CareResult<Option<Profile>> {
        let request = self.request(Method::GET, PROFILES).query(&[
            ("select", PROFILE_COLUMNS.to_string()),
            ("username", eq(username)),
            ("limit", "1".to_string()),
        ]);
        Ok(self.rows::<Profile>(request).await?.into_iter().next())
    }

    async fn insert_friend_request(&self, request: NewFriendRequest) -> CareResult<FriendRequest> {
        self.insert(Table::FriendshipRequests, &request).await
    }

    async fn pending_requests_for(&self, user_id: Uuid) -> CareResult<Vec<FriendRequest>> {
        let request = self
            .request(Method::GET, Table::FriendshipRequests.name())
            .query(&[
                ("to_user_id", eq(user_id)),
                ("status", eq(RequestStatus::Pending.as_str())),
                ("order", "created_at.desc".to_string()),
            ]);
        self.rows(request).await
    }

    async fn update_request_status(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> CareResult<FriendRequest> {
        let request = self
            .request(Method::PATCH, Table::FriendshipRequests.name())
            .query(&[("id", eq(request_id))])
            .json(&json!({ "status": status, "updated_at": Utc::now() }));

        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CareError::NotFound(format!("Friend request {} not found", request_id)))
    }

    async fn insert_friendship(&self, friendship: NewFriendship) -> CareResult<Friendship> {
        self.insert(Table::Friends, &friendship).await
    }

    async fn friends_of(&self, user_id: Uuid) -> CareResult<Vec<Friendship>> {
        let request = self
            .request(Method::GET, Table::Friends.name())
            .query(&[("user_id", eq(user_id))]);
        self.rows(request).await
    }

    async fn insert_direct_message(&self, message: NewDirectMessage) -> CareResult<DirectMessage> {
        self.insert(Table::Messages, &message).await
    }

    async fn conversation(&self, a: Uuid, b: Uuid) -> CareResult<Vec<DirectMessage>> {
        let request = self.request(Method::GET, Table::Messages.name()).query(&[
            ("or", between_filter(a, b)),
            ("order", "created_at.asc".to_string()),
        ]);
        self.rows(request).await
    }

    async fn mark_conversation_read(&self, reader: Uuid, sender: Uuid) -> CareResult<usize> {
        let request = self
            .request(Method::PATCH, Table::Messages.name())
            .query(&[
                ("to_user_id", eq(reader)),
                ("from_user_id", eq(sender)),
                ("read", eq(false)),
            ])
            .json(&json!({ "read": true }));

        Ok(self.rows::<DirectMessage>(request).await?.len())
    }

    async fn available_volunteers(&self, limit: usize) -> CareResult<Vec<Profile>> {
        let request = self.request(Method::GET, PROFILES).query(&[
            ("select", PROFILE_COLUMNS.to_string()),
            ("user_type", eq(UserType::Voluntario.as_str())),
            ("limit", limit.to_string()),
        ]);
        self.rows(request).await
    }

    async fn active_chat_for_elder(&self, elder_id: Uuid) -> CareResult<Option<VolunteerChat>> {
        let request = self
            .request(Method::GET, Table::VolunteerChats.name())
            .query(&[
                ("elder_id", eq(elder_id)),
                ("status", eq(ChatStatus::Active.as_str())),
                ("limit", "1".to_string()),
            ]);
        Ok(self.rows::<VolunteerChat>(request).await?.into_iter().next())
    }

    async fn insert_volunteer_chat(&self, chat: NewVolunteerChat) -> CareResult<VolunteerChat> {
        self.insert(Table::VolunteerChats, &chat).await
    }

    async fn active_chats_for_volunteer(&self, volunteer_id: Uuid) -> CareResult<Vec<VolunteerChat>> {
        let request = self
            .request(Method::GET, Table::VolunteerChats.name())
            .query(&[
                ("volunteer_id", eq(volunteer_id)),
                ("status", eq(ChatStatus::Active.as_str())),
                ("order", "updated_at.desc".to_string()),
            ]);
        self.rows(request).await
    }

    async fn insert_chat_message(&self, message: NewChatMessage) -> CareResult<ChatMessage> {
        self.insert(Table::VolunteerChatMessages, &message).await
    }

    async fn chat_messages(&self, chat_id: Uuid) -> CareResult<Vec<ChatMessage>> {
        let request = self
            .request(Method::GET, Table::VolunteerChatMessages.name())
            .query(&[
                ("chat_id", eq(chat_id)),
                ("order", "created_at.asc".to_string()),
            ]);
        self.rows(request).await
    }
}

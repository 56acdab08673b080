//! HTTP transport: envelope handling, auth, and a read cache for listings.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use util::cache::TtlCache;

use crate::attendance::Mark;

/// Failure modes of a client call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with `success: false`; the message is the
    /// server's own.
    #[error("{0}")]
    Api(String),
}

/// The server's uniform response envelope.
///
/// `data` is optional so a failure envelope with an unexpected or missing
/// payload still deserializes; the `message` is what matters then.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: String,
}

/// Event as the API serializes it: a stored row or an expanded occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDto {
    pub id: Option<i64>,
    pub academy_id: i64,
    pub event_type: String,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub recurring: bool,
    #[serde(default)]
    pub weekdays: Vec<String>,
    pub series_end_date: Option<NaiveDate>,
    pub parent_id: Option<i64>,
    pub occurrence_key: Option<String>,
    pub opponent: Option<String>,
    pub venue: Option<String>,
    pub goals_for: Option<i32>,
    pub goals_against: Option<i32>,
    pub outcome: Option<String>,
    pub status: Option<String>,
}

/// Body for `POST /events`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateEventBody {
    pub academy_id: i64,
    pub event_type: String,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub recurring: bool,
    pub weekdays: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

/// Body for `PATCH /events/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchEventBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_for: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_against: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<HashMap<i64, Mark>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<HashMap<i64, serde_json::Value>>,
}

/// How long listing responses stay fresh before the next call refetches.
const LIST_CACHE_TTL: Duration = Duration::from_secs(30);

/// Typed client over the REST surface.
///
/// Listing calls are served from a TTL cache keyed by request path; any
/// mutation clears the cache so the next read observes the write.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    list_cache: Mutex<TtlCache<String, Vec<EventDto>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
            list_cache: Mutex::new(TtlCache::new(LIST_CACHE_TTL)),
        }
    }

    /// Stores the bearer token used on subsequent calls.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Unwraps an envelope, turning `success: false` into `ClientError::Api`.
    ///
    /// A success envelope whose `data` is missing or has an unexpected shape
    /// degrades to the default value (an empty listing) instead of failing
    /// the whole call.
    async fn unwrap_envelope<T: DeserializeOwned + Default>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let envelope: Envelope<serde_json::Value> = response.json().await?;
        if !envelope.success {
            return Err(ClientError::Api(envelope.message));
        }
        let data = envelope.data.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(data).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "response data had an unexpected shape");
            T::default()
        }))
    }

    /// `POST /auth/login`, storing the returned token on success.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        #[derive(Default, Deserialize)]
        struct LoginData {
            token: String,
        }

        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;
        let data: LoginData = Self::unwrap_envelope(response).await?;
        self.token = Some(data.token);
        Ok(())
    }

    /// `GET /events`, cached per (academy, type) for a short window.
    pub async fn list_events(
        &self,
        academy_id: i64,
        event_type: Option<&str>,
    ) -> Result<Vec<EventDto>, ClientError> {
        let mut path = format!("/api/events?academy_id={academy_id}");
        if let Some(kind) = event_type {
            path.push_str(&format!("&event_type={kind}"));
        }

        if let Ok(mut cache) = self.list_cache.lock() {
            if let Some(cached) = cache.get(&path) {
                return Ok(cached.clone());
            }
        }

        let response = self.authorized(self.http.get(self.url(&path))).send().await?;
        let events: Vec<EventDto> = Self::unwrap_envelope(response).await?;

        if let Ok(mut cache) = self.list_cache.lock() {
            cache.insert(path, events.clone());
        }
        Ok(events)
    }

    /// `GET /events/occurrences` for one rule.
    pub async fn occurrences(
        &self,
        parent_id: i64,
        academy_id: i64,
    ) -> Result<Vec<EventDto>, ClientError> {
        let path =
            format!("/api/events/occurrences?parent_id={parent_id}&academy_id={academy_id}");
        let response = self.authorized(self.http.get(self.url(&path))).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// `POST /events`.
    pub async fn create_event(&self, body: &CreateEventBody) -> Result<EventDto, ClientError> {
        let response = self
            .authorized(self.http.post(self.url("/api/events")))
            .json(body)
            .send()
            .await?;
        let created: Option<EventDto> = Self::unwrap_envelope(response).await?;
        self.invalidate_listings();
        created.ok_or_else(|| ClientError::Api("Server returned an empty event".into()))
    }

    /// `PATCH /events/{id}`.
    pub async fn patch_event(
        &self,
        event_id: i64,
        body: &PatchEventBody,
    ) -> Result<EventDto, ClientError> {
        let response = self
            .authorized(self.http.patch(self.url(&format!("/api/events/{event_id}"))))
            .json(body)
            .send()
            .await?;
        let updated: Option<EventDto> = Self::unwrap_envelope(response).await?;
        self.invalidate_listings();
        updated.ok_or_else(|| ClientError::Api("Server returned an empty event".into()))
    }

    /// `DELETE /events/{id}`.
    pub async fn delete_event(&self, event_id: i64) -> Result<(), ClientError> {
        let response = self
            .authorized(
                self.http
                    .delete(self.url(&format!("/api/events/{event_id}"))),
            )
            .send()
            .await?;
        let _: serde_json::Value = Self::unwrap_envelope(response).await?;
        self.invalidate_listings();
        Ok(())
    }

    /// Drops every cached listing so the next read refetches.
    pub fn invalidate_listings(&self) {
        if let Ok(mut cache) = self.list_cache.lock() {
            cache.clear();
        }
    }
}

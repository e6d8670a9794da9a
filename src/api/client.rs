use chrono::{DateTime, Local};
use reqwest::{header, Client, Response};
use thiserror::Error;

use super::time::format_query_time;
use super::types::*;
use crate::config::Config;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed: {status} - {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP client for the scheduler REST service
#[derive(Clone)]
pub struct ScheduleClient {
    client: Client,
    base_url: String,
}

impl ScheduleClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        Self::with_base_url(&config.base_url())
    }

    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Turn a non-2xx response into `ApiError::Status`
    async fn check(response: Response) -> ApiResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("").to_string()
        } else {
            body
        };
        Err(ApiError::Status { status, message })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(endpoint);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        Self::decode(Self::check(response).await?).await
    }

    async fn send_json<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(endpoint);
        tracing::debug!("{} {}", method, url);

        let response = self.client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        Self::decode(Self::check(response).await?).await
    }

    /// List every coach, for the selector
    pub async fn get_coaches(&self) -> ApiResult<Vec<Coach>> {
        self.get("/coaches/", &[]).await
    }

    /// Open, unavailable and booked slots for `user` browsing `coach`'s
    /// calendar over `[from, to)`
    pub async fn get_calendar(
        &self,
        user_id: i64,
        coach_id: i64,
        from: &DateTime<Local>,
        to: &DateTime<Local>,
    ) -> ApiResult<Vec<Event>> {
        let endpoint = format!("/calendar/{}/{}/", user_id, coach_id);
        let query = [("from", format_query_time(from)), ("to", format_query_time(to))];
        self.get(&endpoint, &query).await
    }

    /// People taking part in a booked event
    pub async fn get_participants(&self, event_id: i64) -> ApiResult<Vec<Participant>> {
        let endpoint = format!("/participants/{}/", event_id);
        self.get(&endpoint, &[]).await
    }

    /// Book a new event
    pub async fn create_event(&self, request: &NewEventRequest) -> ApiResult<Event> {
        self.send_json(reqwest::Method::POST, "/event/", request).await
    }

    /// Replace an existing event's fields
    pub async fn update_event(&self, request: &UpdateEventRequest) -> ApiResult<Event> {
        self.send_json(reqwest::Method::PUT, "/event/", request).await
    }

    /// Delete an event by id. The server echoes the deleted record, which
    /// callers have no use for.
    pub async fn delete_event(&self, event_id: i64) -> ApiResult<()> {
        let url = self.url(&format!("/event/{}/", event_id));
        tracing::debug!("DELETE {}", url);

        let response = self.client
            .delete(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

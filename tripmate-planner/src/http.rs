//! REST client for the TripMate backend.

use crate::error::ServiceError;
use crate::service::{IdentityService, ItineraryStore, PlanningService};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tripmate_core::{
    AuthToken, CustomizeRequest, CustomizeResponse, Itinerary, ItineraryId, ItineraryPatch,
    LoginResponse, NewItinerary, SavedItinerary, TripQuery, TripSession, UserProfile,
};

/// Connection settings for [`RestClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestSettings {
    pub base_url: String,
    /// Word placed before the token in the `Authorization` header.
    pub auth_scheme: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_scheme: String,
}

impl RestClient {
    pub fn new(settings: &RestSettings) -> Result<Self, ServiceError> {
        if settings.base_url.trim().is_empty() {
            return Err(ServiceError::Config("base_url is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            auth_scheme: settings.auth_scheme.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&AuthToken>) -> Result<RequestBuilder, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method.clone(), url);
        if let Some(token) = token {
            builder = builder.headers(self.auth_headers(token)?);
        }
        tracing::debug!(%method, path, authenticated = token.is_some(), "backend request");
        Ok(builder)
    }

    fn auth_headers(&self, token: &AuthToken) -> Result<HeaderMap, ServiceError> {
        let mut headers = HeaderMap::new();
        let value = format!("{} {}", self.auth_scheme, token.expose());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&value).map_err(|e| ServiceError::Config(e.to_string()))?,
        );
        Ok(headers)
    }

    async fn get_json<T>(&self, path: &str, token: Option<&AuthToken>) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, path, token)?.send().await?;
        parse_response(response).await
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&AuthToken>,
        body: &B,
    ) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path, token)?.json(body).send().await?;
        parse_response(response).await
    }

    async fn delete(&self, path: &str, token: Option<&AuthToken>) -> Result<(), ServiceError> {
        let response = self.request(Method::DELETE, path, token)?.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(rejection(status.as_u16(), &text))
        }
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        Ok(serde_json::from_str(&text)?)
    } else {
        Err(rejection(status.as_u16(), &text))
    }
}

fn rejection(status: u16, body: &str) -> ServiceError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| error_message(&value));
    tracing::debug!(status, message = message.as_deref(), "backend rejected request");
    ServiceError::Rejected { status, message }
}

/// Pull the human-readable reason out of an error body.
///
/// Looks at `detail`, `non_field_errors[0]`, `error` (string or first list
/// entry), then the first field-level list entry such as `title[0]`.
pub fn error_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    let first_text = |value: &Value| -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => items.first().and_then(|v| v.as_str()).map(str::to_string),
            _ => None,
        }
    };
    if let Some(detail) = object.get("detail").and_then(first_text) {
        return Some(detail);
    }
    if let Some(reason) = object.get("non_field_errors").and_then(first_text) {
        return Some(reason);
    }
    if let Some(reason) = object.get("error").and_then(first_text) {
        return Some(reason);
    }
    object
        .values()
        .filter(|value| value.is_array())
        .find_map(first_text)
}

#[async_trait]
impl PlanningService for RestClient {
    async fn create_trip(&self, query: &TripQuery) -> Result<TripSession, ServiceError> {
        self.send_json(Method::POST, "/api/trips/create/", None, query)
            .await
    }

    async fn customize_trip(&self, request: &CustomizeRequest) -> Result<Itinerary, ServiceError> {
        let response: CustomizeResponse = self
            .send_json(Method::POST, "/api/trips/customize/", None, request)
            .await?;
        Ok(response.plan)
    }
}

#[async_trait]
impl ItineraryStore for RestClient {
    async fn list_itineraries(&self, token: &AuthToken) -> Result<Vec<SavedItinerary>, ServiceError> {
        self.get_json("/api/itineraries/", Some(token)).await
    }

    async fn get_itinerary(
        &self,
        token: &AuthToken,
        id: ItineraryId,
    ) -> Result<SavedItinerary, ServiceError> {
        let path = format!("/api/itineraries/{}/", id);
        self.get_json(&path, Some(token)).await
    }

    async fn create_itinerary(
        &self,
        token: &AuthToken,
        record: &NewItinerary,
    ) -> Result<SavedItinerary, ServiceError> {
        self.send_json(Method::POST, "/api/itineraries/", Some(token), record)
            .await
    }

    async fn update_itinerary(
        &self,
        token: &AuthToken,
        id: ItineraryId,
        patch: &ItineraryPatch,
    ) -> Result<SavedItinerary, ServiceError> {
        let path = format!("/api/itineraries/{}/", id);
        self.send_json(Method::PATCH, &path, Some(token), patch)
            .await
    }

    async fn delete_itinerary(&self, token: &AuthToken, id: ItineraryId) -> Result<(), ServiceError> {
        let path = format!("/api/itineraries/{}/", id);
        self.delete(&path, Some(token)).await
    }
}

#[async_trait]
impl IdentityService for RestClient {
    async fn login(&self, username: &str, password: &str) -> Result<AuthToken, ServiceError> {
        let body = json!({ "username": username, "password": password });
        let response: LoginResponse = self
            .send_json(Method::POST, "/api/auth/login/", None, &body)
            .await?;
        Ok(response.token)
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserProfile, ServiceError> {
        let body = json!({ "username": username, "password": password, "email": email });
        self.send_json(Method::POST, "/api/auth/register/", None, &body)
            .await
    }

    async fn current_user(&self, token: &AuthToken) -> Result<UserProfile, ServiceError> {
        self.get_json("/api/auth/me/", Some(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_detail() {
        let body = json!({"detail": "Not found.", "error": ["other"]});
        assert_eq!(error_message(&body).as_deref(), Some("Not found."));
    }

    #[test]
    fn error_message_reads_lists_and_fields() {
        assert_eq!(
            error_message(&json!({"non_field_errors": ["Unable to log in."]})).as_deref(),
            Some("Unable to log in.")
        );
        assert_eq!(
            error_message(&json!({"error": ["Invalid destination"]})).as_deref(),
            Some("Invalid destination")
        );
        assert_eq!(
            error_message(&json!({"error": "Username taken"})).as_deref(),
            Some("Username taken")
        );
        assert_eq!(
            error_message(&json!({"title": ["This field may not be blank."]})).as_deref(),
            Some("This field may not be blank.")
        );
    }

    #[test]
    fn error_message_ignores_unusable_bodies() {
        assert_eq!(error_message(&json!([1, 2])), None);
        assert_eq!(error_message(&json!({"detail": ""})), None);
        assert_eq!(error_message(&json!({"count": 3})), None);
    }

    #[test]
    fn empty_base_url_is_a_config_error() {
        let settings = RestSettings {
            base_url: " ".into(),
            auth_scheme: "Token".into(),
            timeout: Duration::from_secs(5),
        };
        assert!(matches!(RestClient::new(&settings), Err(ServiceError::Config(_))));
    }

    #[test]
    fn auth_header_uses_configured_scheme() {
        let settings = RestSettings {
            base_url: "http://localhost:8000/".into(),
            auth_scheme: "Token".into(),
            timeout: Duration::from_secs(5),
        };
        let client = RestClient::new(&settings).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        let headers = client.auth_headers(&AuthToken::new("abc")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Token abc");
    }
}

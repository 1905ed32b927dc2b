//! Stateless HTTP request builder and envelope parser for one REST resource.
//!
//! # Design
//! `ResourceEndpoint` holds only a `base_url` and a `resource` name and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and `parse_envelope`, which
//! consumes the `HttpResponse`. `ResourceClient` runs the round-trip between
//! the two; tests can drive either half on its own.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::id::ResourceId;
use crate::types::{Envelope, Payload};

/// URL and body builder for `{base_url}/{resource}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEndpoint {
    base_url: String,
    resource: String,
}

impl ResourceEndpoint {
    pub fn new(base_url: &str, resource: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            resource: resource.trim_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// `{base_url}/{resource}`
    pub fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.resource)
    }

    fn item_url(&self, id: &ResourceId) -> Result<String, ApiError> {
        if !id.is_provided() {
            return Err(ApiError::InvalidArgument("{id} is not provided".to_string()));
        }
        Ok(format!("{}/{id}", self.collection_url()))
    }

    pub fn build_list(&self, query: Option<&str>, token: Option<&str>) -> HttpRequest {
        let mut url = self.collection_url();
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        request(HttpMethod::Get, url, token, None)
    }

    pub fn build_get(&self, id: &ResourceId, token: Option<&str>) -> Result<HttpRequest, ApiError> {
        let url = self.item_url(id)?;
        Ok(request(HttpMethod::Get, url, token, None))
    }

    pub fn build_create(
        &self,
        data: Payload,
        sub_path: Option<&str>,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.collection_url();
        if let Some(sub_path) = sub_path.filter(|s| !s.is_empty()) {
            url.push('/');
            url.push_str(sub_path);
        }
        let body = encode_body(data)?;
        Ok(request(HttpMethod::Post, url, token, Some(body)))
    }

    pub fn build_update(
        &self,
        id: &ResourceId,
        data: Payload,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.item_url(id)?;
        let body = encode_body(data)?;
        Ok(request(HttpMethod::Put, url, token, Some(body)))
    }

    pub fn build_remove(&self, id: &ResourceId, token: Option<&str>) -> Result<HttpRequest, ApiError> {
        let url = self.item_url(id)?;
        Ok(request(HttpMethod::Delete, url, token, None))
    }

    /// Check the status and decode the `{ result, msg }` envelope.
    pub fn parse_envelope<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<T>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn request(
    method: HttpMethod,
    url: String,
    token: Option<&str>,
    body: Option<RequestBody>,
) -> HttpRequest {
    let mut headers = Vec::new();
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        headers.push(("authorization".to_string(), format!("Bearer {token}")));
    }
    if let Some(RequestBody::Json(_)) = &body {
        headers.push(("content-type".to_string(), "application/json".to_string()));
    }
    HttpRequest {
        method,
        url,
        headers,
        body,
    }
}

fn encode_body(data: Payload) -> Result<RequestBody, ApiError> {
    match data {
        Payload::Json(value) => serde_json::to_string(&value)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::Serialization(e.to_string())),
        Payload::Multipart(form) => Ok(RequestBody::Multipart(form)),
    }
}

/// Any status outside 200..=299 is a failure, whatever the body says.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

//! Async client for one REST resource.
//!
//! # Design
//! `ResourceClient` wraps a `ResourceEndpoint` and runs the round-trip through
//! injected collaborators:
//! - `Transport` performs the HTTP call,
//! - `TokenSource` supplies the bearer token at request time,
//! - `SuccessNotifier` hears about every successful mutating call,
//! - `ErrorHandler` sees every failure after the request was built.
//!
//! Each public call issues exactly one request. The client holds no mutable
//! state, so concurrent calls on a shared instance are independent.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, DEFAULT_SUCCESS_MESSAGE};
use crate::endpoint::ResourceEndpoint;
use crate::error::ApiError;
use crate::handler::{ErrorHandler, LogAndAbsorb};
use crate::http::HttpRequest;
use crate::id::ResourceId;
use crate::notify::{LogNotifier, SuccessNotifier};
use crate::session::TokenSource;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Envelope, Payload};

/// Async CRUD client for `{base_url}/{resource}`. Cheap to clone; clones
/// share the transport, session, notifier and error handler.
#[derive(Clone)]
pub struct ResourceClient {
    endpoint: ResourceEndpoint,
    success_message: String,
    transport: Arc<dyn Transport>,
    session: Arc<dyn TokenSource>,
    notifier: Arc<dyn SuccessNotifier>,
    errors: Arc<dyn ErrorHandler>,
}

impl ResourceClient {
    /// Client with a reqwest transport, no token, a logging notifier and a
    /// log-and-absorb error handler. Use the `with_*` methods to replace them.
    pub fn new(base_url: &str, resource: &str) -> Self {
        Self {
            endpoint: ResourceEndpoint::new(base_url, resource),
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            transport: Arc::new(ReqwestTransport::new()),
            session: Arc::new(None::<String>),
            notifier: Arc::new(LogNotifier),
            errors: Arc::new(LogAndAbsorb),
        }
    }

    pub fn from_config(config: &ClientConfig, resource: &str) -> Result<Self, ApiError> {
        config.validate()?;
        let transport = match &config.user_agent {
            Some(agent) => ReqwestTransport::with_user_agent(agent)?,
            None => ReqwestTransport::new(),
        };
        Ok(Self::new(&config.base_url, resource)
            .with_transport(transport)
            .with_success_message(config.success_message.clone()))
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn with_session(mut self, session: impl TokenSource + 'static) -> Self {
        self.session = Arc::new(session);
        self
    }

    pub fn with_notifier(mut self, notifier: impl SuccessNotifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.errors = Arc::new(handler);
        self
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    pub fn endpoint(&self) -> &ResourceEndpoint {
        &self.endpoint
    }

    /// `GET {base}/{resource}[?{query}]`
    pub async fn list<T: DeserializeOwned>(&self, query: Option<&str>) -> Result<Option<T>, ApiError> {
        let request = self.endpoint.build_list(query, self.token().as_deref());
        let envelope = self.call_api::<T>(request).await?;
        Ok(envelope.and_then(|e| e.result))
    }

    /// `GET {base}/{resource}/{id}`
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        id: impl Into<ResourceId>,
    ) -> Result<Option<T>, ApiError> {
        let request = self.endpoint.build_get(&id.into(), self.token().as_deref())?;
        let envelope = self.call_api::<T>(request).await?;
        Ok(envelope.and_then(|e| e.result))
    }

    /// `POST {base}/{resource}[/{sub_path}]`
    pub async fn create<T: DeserializeOwned>(
        &self,
        data: impl Into<Payload>,
        sub_path: Option<&str>,
    ) -> Result<Option<T>, ApiError> {
        let request = self
            .endpoint
            .build_create(data.into(), sub_path, self.token().as_deref())?;
        self.mutate(request).await
    }

    /// `PUT {base}/{resource}/{id}`
    pub async fn update<T: DeserializeOwned>(
        &self,
        id: impl Into<ResourceId>,
        data: impl Into<Payload>,
    ) -> Result<Option<T>, ApiError> {
        let request = self
            .endpoint
            .build_update(&id.into(), data.into(), self.token().as_deref())?;
        self.mutate(request).await
    }

    /// `DELETE {base}/{resource}/{id}`
    pub async fn remove<T: DeserializeOwned>(
        &self,
        id: impl Into<ResourceId>,
    ) -> Result<Option<T>, ApiError> {
        let request = self.endpoint.build_remove(&id.into(), self.token().as_deref())?;
        self.mutate(request).await
    }

    fn token(&self) -> Option<String> {
        self.session.access_token()
    }

    async fn mutate<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<Option<T>, ApiError> {
        let Some(envelope) = self.call_api::<T>(request).await? else {
            return Ok(None);
        };
        let message = envelope
            .msg
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(self.success_message.as_str());
        self.notifier.notify_success(message);
        Ok(envelope.result)
    }

    /// Runs one request. `Ok(None)` means the failure was absorbed by the
    /// error handler.
    async fn call_api<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<Option<Envelope<T>>, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, "sending request");

        let outcome = match self.transport.execute(request).await {
            Ok(response) => self.endpoint.parse_envelope(response),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(envelope) => Ok(Some(envelope)),
            Err(error) => {
                tracing::warn!(%method, %url, %error, "request failed");
                self.errors.handle_error(error)?;
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("endpoint", &self.endpoint)
            .field("success_message", &self.success_message)
            .finish_non_exhaustive()
    }
}

//! Generic REST resource client.
//!
//! # Overview
//! One `ResourceClient` per backend collection (`users`, `orders`, ...).
//! It builds `{base_url}/{resource}[/{id}]` URLs, attaches the session's
//! bearer token, runs one HTTP call per operation, unwraps the
//! `{ result, msg }` envelope and tells the UI when a write succeeded.
//!
//! # Design
//! - `ResourceEndpoint` is the pure half: `build_*` produces an `HttpRequest`,
//!   `parse_envelope` consumes an `HttpResponse`. No I/O.
//! - `ResourceClient` drives the round-trip through injected collaborators
//!   (`Transport`, `TokenSource`, `SuccessNotifier`, `ErrorHandler`) so it can
//!   be exercised without a network or a UI.
//! - Failures after a request is built go to the `ErrorHandler`, which either
//!   absorbs them (`Ok(None)` to the caller) or hands them back (`Err`).

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod http;
pub mod id;
pub mod notify;
pub mod session;
pub mod transport;
pub mod types;

pub use client::ResourceClient;
pub use config::ClientConfig;
pub use endpoint::ResourceEndpoint;
pub use error::ApiError;
pub use handler::{ErrorHandler, LogAndAbsorb, Propagate};
pub use http::{FormPart, HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use id::ResourceId;
pub use notify::{EventBus, LogNotifier, SuccessNotifier, UiEvent};
pub use session::{SessionStore, StaticToken, TokenSource};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Envelope, Payload};

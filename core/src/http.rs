//! HTTP request and response values as plain data.
//!
//! # Design
//! These types describe a round trip against the remote list store without
//! performing it. The build half of every operation produces an
//! `HttpRequest`; the [`Transport`](crate::transport::Transport) collaborator
//! executes it; the parse half consumes the resulting `HttpResponse`. This
//! keeps all protocol logic deterministic and testable without a network.
//!
//! Only `Get` and `Post` exist: the store tunnels updates and deletes through
//! POST with an `X-HTTP-Method` override header, so no other verb is ever put
//! on the wire.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// Built by `MissionClient::build_*` methods. The headers are a per-request
/// clone of a profile template plus whatever conditional headers the
/// operation adds.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to `MissionClient::parse_*` methods for status mapping and
/// deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

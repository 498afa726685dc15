/// Boxed source error from the underlying HTTP client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in the transport layer.
///
/// These are connection-level failures only. A response with a non-2xx
/// status is NOT a transport error: it is returned as an
/// [`HttpResponse`](crate::HttpResponse) and judged by the layer above.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused connection,
    /// TLS, or a timeout configured on the client).
    #[error("request failed: {0}")]
    Request(#[source] BoxError),

    /// The response arrived but reading its body failed.
    #[error("reading response body failed: {0}")]
    Body(#[source] BoxError),

    /// The request could not be built (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

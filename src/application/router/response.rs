//! Bundle responses and response sinks

use std::fmt;
use std::future::Future;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use http::{header, HeaderMap, HeaderValue, StatusCode};

use super::RenderError;

/// `text/x-component; charset=utf-8`
pub const COMPONENT_RESPONSE_TYPE: &str = "text/x-component; charset=utf-8";
/// `text/html; charset=utf-8`
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Shell served when server-side rendering fails.
pub const SSR_FALLBACK_HTML: &str =
    "<!DOCTYPE html><html><body><noscript>Internal Server Error: SSR failed</noscript></body></html>";

pub type BodyStream = BoxStream<'static, Result<Bytes, RenderError>>;

/// What the bundle handler returns; streamed to the sink verbatim.
pub struct BundleResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

impl BundleResponse {
    pub fn new(status: StatusCode, content_type: &'static str, body: BodyStream) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Streaming response from any chunk stream.
    pub fn streaming<S>(status: StatusCode, content_type: &'static str, body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, RenderError>> + Send + 'static,
    {
        Self::new(status, content_type, body.boxed())
    }

    /// Complete server-components payload.
    pub fn component(payload: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, COMPONENT_RESPONSE_TYPE, once(payload.into()))
    }

    pub fn html(status: StatusCode, document: impl Into<Bytes>) -> Self {
        Self::new(status, HTML_CONTENT_TYPE, once(document.into()))
    }

    pub fn ssr_fallback() -> Self {
        Self::html(
            StatusCode::INTERNAL_SERVER_ERROR,
            Bytes::from_static(SSR_FALLBACK_HTML.as_bytes()),
        )
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl fmt::Debug for BundleResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn once(chunk: Bytes) -> BodyStream {
    stream::once(async move { Ok(chunk) }).boxed()
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("connection closed")]
    Closed,

    #[error("write failed: {0}")]
    Write(String),
}

/// Where a routed response goes. A closed connection surfaces as a
/// write error.
pub trait ResponseSink: Send {
    fn start(
        &mut self,
        status: StatusCode,
        headers: &HeaderMap,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;

    fn write(&mut self, chunk: Bytes) -> impl Future<Output = Result<(), SinkError>> + Send;

    fn finish(&mut self) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Collects a response in memory.
#[derive(Debug, Default)]
pub struct BufferedSink {
    pub status: Option<StatusCode>,
    pub headers: HeaderMap,
    pub body: BytesMut,
    pub chunks: usize,
    pub finished: bool,
    /// Simulated connection closure after this many chunks
    close_after: Option<usize>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn closing_after(chunks: usize) -> Self {
        Self {
            close_after: Some(chunks),
            ..Self::default()
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl ResponseSink for BufferedSink {
    async fn start(&mut self, status: StatusCode, headers: &HeaderMap) -> Result<(), SinkError> {
        self.status = Some(status);
        self.headers = headers.clone();
        Ok(())
    }

    async fn write(&mut self, chunk: Bytes) -> Result<(), SinkError> {
        if self.close_after.is_some_and(|limit| self.chunks >= limit) {
            return Err(SinkError::Closed);
        }
        self.body.extend_from_slice(&chunk);
        self.chunks += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}

//! Runtime request router
//!
//! Development-time dispatcher in front of the server-components bundle.
//! Routes are tried in registration order; the first match loads the bundle
//! (single flight), calls its handler with the captured parameters and
//! streams the response to the sink verbatim. A request no route matches is
//! reported as not handled so the host can fall through to its own stack.

mod bundle;
mod pattern;
mod response;


use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use http::Request;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

pub use bundle::{BundleInvalidator, BundleLoader, BundleSlot, ServerBundle};
pub use pattern::{
    default_routes, HeaderPredicate, ParamValue, PathPattern, PatternError, Route, RouteParams,
    COMPONENT_CONTENT_TYPE,
};
pub use response::{
    BodyStream, BufferedSink, BundleResponse, ResponseSink, SinkError, COMPONENT_RESPONSE_TYPE,
    HTML_CONTENT_TYPE, SSR_FALLBACK_HTML,
};

/// The bundle could not be produced.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("server bundle not found: {0}")]
    NotFound(String),

    #[error("failed to load server bundle: {0}")]
    Failed(String),
}

/// The bundle handler failed to render.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("render failed: {message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The response stream failed after headers were sent
    #[error("response stream failed: {0}")]
    Stream(RenderError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

pub struct Router<L: BundleLoader> {
    routes: RwLock<Arc<[Route]>>,
    slot: Arc<BundleSlot<L>>,
}

impl<L: BundleLoader> Router<L> {
    /// Router with the default route table.
    pub fn new(slot: Arc<BundleSlot<L>>) -> Self {
        Self::with_routes(default_routes(), slot)
    }

    pub fn with_routes(routes: Vec<Route>, slot: Arc<BundleSlot<L>>) -> Self {
        Self {
            routes: RwLock::new(routes.into()),
            slot,
        }
    }

    pub fn slot(&self) -> &Arc<BundleSlot<L>> {
        &self.slot
    }

    pub async fn routes(&self) -> Arc<[Route]> {
        Arc::clone(&*self.routes.read().await)
    }

    /// Swap the whole route table; in-flight requests keep the old one.
    pub async fn replace_routes(&self, routes: Vec<Route>) {
        debug!(routes = routes.len(), "route table rebuilt");
        *self.routes.write().await = routes.into();
    }

    /// Route `request`, writing the response to `sink`.
    ///
    /// Returns `Ok(false)` when no route matches; nothing is written.
    pub async fn route<K: ResponseSink>(
        &self,
        request: &Request<Bytes>,
        sink: &mut K,
    ) -> Result<bool, RouteError> {
        let routes = self.routes().await;
        let Some((route, params)) = routes
            .iter()
            .find_map(|route| route.matches(request).map(|params| (route, params)))
        else {
            return Ok(false);
        };
        debug!(
            route = route.name(),
            method = %request.method(),
            path = request.uri().path(),
            "request matched"
        );

        let bundle = self.slot.get().await?;
        let response = match bundle.handle(request, &params).await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    path = request.uri().path(),
                    error = %err,
                    "render failed, serving fallback shell"
                );
                BundleResponse::ssr_fallback()
            }
        };

        stream_response(response, sink).await?;
        Ok(true)
    }
}

async fn stream_response<K: ResponseSink>(
    response: BundleResponse,
    sink: &mut K,
) -> Result<(), RouteError> {
    let BundleResponse {
        status,
        headers,
        mut body,
    } = response;

    sink.start(status, &headers).await?;
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => {
                if let Err(err) = sink.write(chunk).await {
                    warn!(error = %err, "client went away, response stream stopped");
                    return Err(err.into());
                }
            }
            Err(err) => {
                error!(error = %err, "response stream failed");
                return Err(RouteError::Stream(err));
            }
        }
    }
    sink.finish().await?;
    Ok(())
}

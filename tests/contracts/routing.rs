//! Dev request routing contracts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::join_all;
use http::{header, Method, Request, StatusCode};
use stratum::application::router::{
    BufferedSink, BundleLoader, BundleResponse, BundleSlot, LoadError, RenderError, RouteParams,
    Router, ServerBundle, COMPONENT_CONTENT_TYPE,
};

struct EchoBundle {
    instance: usize,
}

impl ServerBundle for EchoBundle {
    async fn handle(
        &self,
        _request: &Request<Bytes>,
        params: &RouteParams,
    ) -> Result<BundleResponse, RenderError> {
        Ok(BundleResponse::component(format!(
            "{}:{:?}",
            self.instance,
            params.id()
        )))
    }
}

#[derive(Default)]
struct SlowLoader {
    loads: AtomicUsize,
}

impl BundleLoader for SlowLoader {
    type Bundle = EchoBundle;

    async fn load(&self) -> Result<EchoBundle, LoadError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let instance = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(EchoBundle { instance })
    }
}

fn request(method: Method, uri: &str, accept: Option<&str>) -> Request<Bytes> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    builder.body(Bytes::new()).unwrap()
}

fn router() -> Router<SlowLoader> {
    Router::new(Arc::new(BundleSlot::new(SlowLoader::default())))
}

/// CONTRACT: The component media type routes to the server handler on any path.
#[tokio::test]
async fn contract_component_requests_route_with_params() {
    let router = router();
    let mut sink = BufferedSink::new();

    let handled = router
        .route(
            &request(Method::GET, "/todos/42", Some(COMPONENT_CONTENT_TYPE)),
            &mut sink,
        )
        .await
        .unwrap();

    assert!(handled);
    assert_eq!(sink.status, Some(StatusCode::OK));
    assert_eq!(sink.body_text(), "1:Some(42)");
}

/// CONTRACT: Unregistered paths without the header are left to the host.
#[tokio::test]
async fn contract_unknown_paths_are_not_handled() {
    let router = router();
    let mut sink = BufferedSink::new();

    let handled = router
        .route(&request(Method::GET, "/unknown", None), &mut sink)
        .await
        .unwrap();

    assert!(!handled);
    assert_eq!(sink.status, None);
    assert_eq!(router.slot().load_count(), 0);
}

/// CONTRACT: Concurrent first requests share a single bundle load.
#[tokio::test]
async fn contract_bundle_loads_once_under_concurrency() {
    let router = router();

    let requests = (0..8).map(|_| {
        let router = &router;
        async move {
            let mut sink = BufferedSink::new();
            router
                .route(&request(Method::GET, "/", None), &mut sink)
                .await
                .unwrap();
            sink.body_text()
        }
    });
    let bodies = join_all(requests).await;

    assert_eq!(router.slot().load_count(), 1);
    assert!(bodies.iter().all(|body| body.starts_with("1:")));
}

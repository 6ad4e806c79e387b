//! Per-request routing between the gRPC routes and the HTTP router.
//!
//! Both protocols share one listener. A request is gRPC when it arrives over
//! HTTP/2 with a content type starting with `application/grpc`; anything else
//! is plain HTTP. The decision is made independently for every request and
//! the request is forwarded untouched.
//!
//! An HTTP/2 request whose content type is missing, malformed, or simply not
//! gRPC falls back to the HTTP router. A client that is not speaking gRPC but
//! sends an `application/grpc*` content type over HTTP/2 will be routed to
//! the gRPC side.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{Request, Response, Version, header};
use tonic::body::BoxBody;
use tonic::service::Routes;
use tower::util::MapRequest;
use tower::{BoxError, Service, ServiceExt};

/// Content type prefix shared by every gRPC encoding (`+proto`, `+json`, ...).
pub const GRPC_CONTENT_TYPE_PREFIX: &str = "application/grpc";

/// Where a request should be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Grpc,
    Http,
}

/// Classify a request from its HTTP version and `Content-Type` header.
pub fn classify<B>(request: &Request<B>) -> Protocol {
    let is_grpc_content = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(GRPC_CONTENT_TYPE_PREFIX));

    if request.version() == Version::HTTP_2 && is_grpc_content {
        Protocol::Grpc
    } else {
        Protocol::Http
    }
}

/// Forwards each request to `grpc` or `http` according to [`classify`].
#[derive(Debug, Clone)]
pub struct HybridService<G, H> {
    grpc: G,
    http: H,
}

impl<G, H> HybridService<G, H> {
    pub const fn new(grpc: G, http: H) -> Self {
        Self { grpc, http }
    }
}

/// gRPC routes that accept requests with any body type.
pub type BoxedRoutes<B> = MapRequest<Routes, fn(Request<B>) -> Request<BoxBody>>;

/// Box incoming request bodies so `routes` can sit next to the HTTP router.
///
/// `Routes` only serves requests whose body is tonic's `BoxBody`.
pub fn boxed_routes<B>(routes: Routes) -> BoxedRoutes<B>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let box_body: fn(Request<B>) -> Request<BoxBody> = |request| request.map(tonic::body::boxed);
    MapRequest::new(routes, box_body)
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

impl<B, G, GB, H, HB> Service<Request<B>> for HybridService<G, H>
where
    B: Send + 'static,
    G: Service<Request<B>, Response = Response<GB>> + Clone + Send + 'static,
    G::Error: Into<BoxError>,
    G::Future: Send + 'static,
    GB: HttpBody<Data = Bytes> + Send + 'static,
    GB::Error: Into<BoxError>,
    H: Service<Request<B>, Response = Response<HB>> + Clone + Send + 'static,
    H::Error: Into<BoxError>,
    H::Future: Send + 'static,
    HB: HttpBody<Data = Bytes> + Send + 'static,
    HB::Error: Into<BoxError>,
{
    type Response = Response<Body>;
    type Error = BoxError;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness is checked on the chosen inner service once the request is known.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        match classify(&request) {
            Protocol::Grpc => {
                let grpc = self.grpc.clone();
                Box::pin(forward(grpc, request))
            }
            Protocol::Http => {
                let http = self.http.clone();
                Box::pin(forward(http, request))
            }
        }
    }
}

async fn forward<S, B, RB>(service: S, request: Request<B>) -> Result<Response<Body>, BoxError>
where
    S: Service<Request<B>, Response = Response<RB>>,
    S::Error: Into<BoxError>,
    RB: HttpBody<Data = Bytes> + Send + 'static,
    RB::Error: Into<BoxError>,
{
    let response = service.oneshot(request).await.map_err(Into::into)?;
    Ok(response.map(Body::new))
}

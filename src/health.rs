//! Health reporting for both transports.
//!
//! The service has no internal conditions to observe, so `Check` always
//! answers SERVING and `Watch` is refused outright.

use tokio_stream::Empty;
use tonic::{Request, Response, Status};
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_server::Health;
use tonic_health::pb::{HealthCheckRequest, HealthCheckResponse};

/// `grpc.health.v1.Health` implementation with a constant status.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthService;

#[tonic::async_trait]
impl Health for HealthService {
    type WatchStream = Empty<Result<HealthCheckResponse, Status>>;

    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        tracing::debug!(service = %request.get_ref().service, "Answering health check");

        Ok(Response::new(HealthCheckResponse {
            status: ServingStatus::Serving.into(),
        }))
    }

    async fn watch(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        Err(Status::unimplemented("unimplemented"))
    }
}

/// `GET /health`: 200 with an empty body.
#[allow(clippy::unused_async)]
#[tracing::instrument(level = "debug")]
pub async fn health_endpoint_handler() {
    tracing::debug!("Getting service status");
}

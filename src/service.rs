//! gRPC implementation of the `time.Time` service.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::clock::TimeFormatter;
use crate::config::ServerConfig;
use crate::proto::time_server::Time;
use crate::proto::{LocalTimeRequest, LocalTimeResponse};

/// Answers `LocalTime` with the current time in the configured zone.
#[derive(Debug, Clone)]
pub struct TimeService {
    formatter: TimeFormatter,
}

impl TimeService {
    pub fn new(config: &Arc<ServerConfig>) -> Self {
        Self {
            formatter: config.formatter(),
        }
    }

    /// Build the response shared by the gRPC and HTTP surfaces.
    pub fn current(&self) -> LocalTimeResponse {
        LocalTimeResponse {
            local_time: self.formatter.now(),
        }
    }
}

#[tonic::async_trait]
impl Time for TimeService {
    async fn local_time(
        &self,
        _request: Request<LocalTimeRequest>,
    ) -> Result<Response<LocalTimeResponse>, Status> {
        let response = self.current();
        tracing::debug!(local_time = %response.local_time, "Answering LocalTime");

        Ok(Response::new(response))
    }
}

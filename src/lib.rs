//! # local-time
//!
//! A small service reporting the current time in a configured time zone.
//!
//! The same listener speaks gRPC (`time.Time/LocalTime` plus the standard
//! `grpc.health.v1.Health` service) and plain HTTP/JSON (`GET /local`,
//! `GET /health`). Each request is routed by [`dispatch::classify`]: HTTP/2
//! requests carrying an `application/grpc` content type go to the gRPC
//! routes, everything else goes to the HTTP router.

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod http;
pub mod proto;
pub mod server;
pub mod service;

pub use config::{Args, ServeMode, ServerConfig};
pub use error::{Error, Result};
pub use server::Server;

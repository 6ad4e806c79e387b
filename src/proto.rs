//! Generated protobuf types and gRPC stubs for the `time` package.

tonic::include_proto!("time");

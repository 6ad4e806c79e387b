//! Build script for gRPC service code generation.
//!
//! Generates the `time` package messages and the client/server code for the
//! `Time` service. The response message also derives `serde::Serialize` so
//! the plain HTTP endpoint can emit it as camelCase JSON.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protos = ["proto/time.proto"];

    // Use a vendored protoc so the build does not depend on the host toolchain.
    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    // SAFETY: build scripts are single-threaded.
    unsafe { std::env::set_var("PROTOC", protoc) };

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .type_attribute(".time.LocalTimeResponse", "#[derive(serde::Serialize)]")
        .type_attribute(".time.LocalTimeResponse", "#[serde(rename_all = \"camelCase\")]")
        .compile_protos(&protos, &["proto"])?;

    for proto in &protos {
        println!("cargo:rerun-if-changed={proto}");
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true) // Stub services in tests
        .build_client(true)
        .compile_protos(&["proto/inspection.proto"], &["proto/"])?;
    Ok(())
}

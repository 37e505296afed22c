fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protos = ["proto/common.proto", "proto/appcallback.proto"];
    for proto in &protos {
        println!("cargo:rerun-if-changed={proto}");
    }

    let fds = protox::compile(protos, ["proto/"])?;

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_fds(fds)?;

    Ok(())
}

//! Mock app — serves a fake user application over the app callback contract.
//!
//! # Usage
//!
//! ```bash
//! # Empty app on the default port
//! cargo run -p mock-app
//!
//! # Canned subscriptions and responses from a fixture
//! cargo run -p mock-app -- --listen 127.0.0.1:50051 --fixture tools/mock-app/fixtures/orders.json
//! ```
//!
//! Runs until Ctrl-C, then logs the bulk deliveries it recorded.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::info;

use callback_core::config::Config;
use callback_testing::MockAppServer;
use callback_testing::MockServer;
use callback_testing::fixture::MockFixture;

#[derive(Parser)]
#[command(about = "Serve a fake app for the runtime's app callback client")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:50051")]
    listen: SocketAddr,

    /// JSON fixture with canned subscriptions, bindings and responses
    #[arg(long)]
    fixture: Option<PathBuf>,
}

fn load_mock(fixture: Option<&PathBuf>) -> Result<MockServer> {
    match fixture {
        Some(path) => {
            let fixture = MockFixture::from_json_file(path)
                .with_context(|| format!("load fixture {}", path.display()))?;
            Ok(fixture.into_mock())
        }
        None => Ok(MockServer::new()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    callback_core::tracing::init_tracing();

    let args = Args::parse();
    let mock = Arc::new(load_mock(args.fixture.as_ref())?);

    let server = MockAppServer::start_on(args.listen, Arc::clone(&mock))
        .await
        .context("start mock app")?;

    tokio::signal::ctrl_c()
        .await
        .context("wait for ctrl-c")?;

    server.shutdown().await.context("stop mock app")?;

    for (path, request) in mock.requests_received() {
        info!(%path, entries = request.entries.len(), "recorded bulk delivery");
    }
    Ok(())
}

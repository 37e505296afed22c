//! In-process tonic server hosting a [`MockServer`].
//!
//! The runtime under test is pointed at [`MockAppServer::endpoint`]; the test
//! keeps the `Arc<MockServer>` to assert on what was delivered.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use callback_proto::runtime::v1::{
    app_callback_alpha_server::AppCallbackAlphaServer,
    app_callback_health_check_server::AppCallbackHealthCheckServer,
    app_callback_server::AppCallbackServer,
};

use crate::error::MockServerError;
use crate::mock::MockServer;

/// Running mock app. Shuts down on [`MockAppServer::shutdown`] or on drop.
pub struct MockAppServer {
    addr: SocketAddr,
    mock: Arc<MockServer>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), tonic::transport::Error>>>,
}

impl MockAppServer {
    /// Serve `mock` on an ephemeral loopback port.
    pub async fn start(mock: Arc<MockServer>) -> Result<Self, MockServerError> {
        Self::start_on(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)), mock).await
    }

    pub async fn start_on(
        addr: SocketAddr,
        mock: Arc<MockServer>,
    ) -> Result<Self, MockServerError> {
        let listener = TcpListener::bind(addr).await.map_err(MockServerError::Bind)?;
        let addr = listener.local_addr().map_err(MockServerError::Bind)?;
        let (tx, rx) = oneshot::channel::<()>();

        let router = Server::builder()
            .add_service(AppCallbackServer::from_arc(Arc::clone(&mock)))
            .add_service(AppCallbackHealthCheckServer::from_arc(Arc::clone(&mock)))
            .add_service(AppCallbackAlphaServer::from_arc(Arc::clone(&mock)));

        let task = tokio::spawn(router.serve_with_incoming_shutdown(
            TcpListenerStream::new(listener),
            async {
                let _ = rx.await;
            },
        ));

        info!(%addr, "mock app gRPC server listening");
        Ok(Self {
            addr,
            mock,
            shutdown: Some(tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://` URL suitable for `Channel::from_shared` or a generated client.
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn mock(&self) -> &Arc<MockServer> {
        &self.mock
    }

    /// Stop accepting calls and wait for in-flight ones to finish.
    pub async fn shutdown(mut self) -> Result<(), MockServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await??;
        }
        info!(addr = %self.addr, "mock app gRPC server stopped");
        Ok(())
    }
}

impl Drop for MockAppServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

use tonic::{Code, Status};

use callback_proto::common::v1::InvokeRequest;
use callback_proto::runtime::v1::{BindingEventRequest, TopicEventRequest};
use callback_testing::MockServer;

use crate::helpers::{TestApp, bulk_request};

fn assert_injected(status: Status) {
    assert_eq!(status.code(), Code::Unavailable);
    assert_eq!(status.message(), "app down");
}

#[tokio::test]
async fn should_return_injected_error_from_every_rpc() {
    let mut mock = MockServer::new();
    mock.error = Some(Status::unavailable("app down"));
    let mut app = TestApp::start(mock).await;

    assert_injected(
        app.callback
            .on_invoke(InvokeRequest::default())
            .await
            .unwrap_err(),
    );
    assert_injected(app.callback.list_topic_subscriptions(()).await.unwrap_err());
    assert_injected(app.callback.list_input_bindings(()).await.unwrap_err());
    assert_injected(
        app.callback
            .on_binding_event(BindingEventRequest::default())
            .await
            .unwrap_err(),
    );
    assert_injected(
        app.callback
            .on_topic_event(TopicEventRequest::default())
            .await
            .unwrap_err(),
    );
    assert_injected(
        app.alpha
            .on_bulk_topic_event_alpha1(bulk_request("/orders", &["1"]))
            .await
            .unwrap_err(),
    );
    assert_injected(app.health.health_check(()).await.unwrap_err());
}

#[tokio::test]
async fn should_record_bulk_request_when_failing() {
    let mut mock = MockServer::new();
    mock.error = Some(Status::unavailable("app down"));
    let mut app = TestApp::start(mock).await;

    let _ = app
        .alpha
        .on_bulk_topic_event_alpha1(bulk_request("/orders", &["1"]))
        .await;

    assert_eq!(
        app.mock().request_received("/orders"),
        Some(bulk_request("/orders", &["1"]))
    );
}

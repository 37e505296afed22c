use std::collections::HashMap;

use callback_proto::runtime::v1::{
    BindingEventRequest, BindingEventResponse, TopicEventBulkResponse,
    TopicEventBulkResponseEntry, TopicEventRequest,
    topic_event_response::TopicEventResponseStatus,
};
use callback_testing::MockServer;

use crate::helpers::{TestApp, bulk_request};

#[tokio::test]
async fn should_return_configured_topic_status() {
    let mut mock = MockServer::new();
    mock.topic_event_response_status = TopicEventResponseStatus::Drop;
    let mut app = TestApp::start(mock).await;

    let resp = app
        .callback
        .on_topic_event(TopicEventRequest {
            topic: "orders".to_owned(),
            path: "/orders".to_owned(),
            data: b"{}".to_vec(),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp.status(), TopicEventResponseStatus::Drop);
}

#[tokio::test]
async fn should_return_canned_binding_response() {
    let mut mock = MockServer::new();
    mock.binding_event_response = BindingEventResponse {
        to: vec!["out".to_owned()],
        data: b"done".to_vec(),
        ..Default::default()
    };
    let mut app = TestApp::start(mock).await;

    let resp = app
        .callback
        .on_binding_event(BindingEventRequest {
            name: "cron".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp, app.mock().binding_event_response);
}

#[tokio::test]
async fn should_record_latest_bulk_request_per_path() {
    let mut app = TestApp::start(MockServer::new()).await;

    app.alpha
        .on_bulk_topic_event_alpha1(bulk_request("/orders", &["1", "2"]))
        .await
        .unwrap();
    app.alpha
        .on_bulk_topic_event_alpha1(bulk_request("/orders", &["3"]))
        .await
        .unwrap();

    let received = app.mock().requests_received();
    assert_eq!(received.len(), 1);
    assert_eq!(received["/orders"], bulk_request("/orders", &["3"]));
}

#[tokio::test]
async fn should_return_canned_bulk_response_for_path() {
    let canned = TopicEventBulkResponse {
        statuses: vec![TopicEventBulkResponseEntry {
            entry_id: "1".to_owned(),
            status: TopicEventResponseStatus::Retry.into(),
        }],
    };
    let mut mock = MockServer::new();
    mock.bulk_response_per_path = Some(HashMap::from([("/orders".to_owned(), canned.clone())]));
    let mut app = TestApp::start(mock).await;

    let mapped = app
        .alpha
        .on_bulk_topic_event_alpha1(bulk_request("/orders", &["1"]))
        .await
        .unwrap()
        .into_inner();
    let unmapped = app
        .alpha
        .on_bulk_topic_event_alpha1(bulk_request("/payments", &["1"]))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(mapped, canned);
    assert_eq!(unmapped, TopicEventBulkResponse::default());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_record_concurrent_bulk_deliveries_without_lost_updates() {
    const CALLERS: usize = 32;
    let app = TestApp::start(MockServer::new()).await;

    let calls = (0..CALLERS).map(|i| {
        let mut client = app.alpha.clone();
        tokio::spawn(async move {
            let path = format!("/path/{i}");
            let id = i.to_string();
            client
                .on_bulk_topic_event_alpha1(bulk_request(&path, &[id.as_str()]))
                .await
        })
    });
    for result in futures::future::join_all(calls).await {
        result.unwrap().unwrap();
    }

    let received = app.mock().requests_received();
    assert_eq!(received.len(), CALLERS);
    for i in 0..CALLERS {
        let path = format!("/path/{i}");
        let id = i.to_string();
        assert_eq!(received[&path], bulk_request(&path, &[id.as_str()]));
    }
}

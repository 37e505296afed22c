//! Fake user application answering the app callback contract.
//!
//! `MockServer` is configured by direct field assignment before it is shared,
//! then invoked (directly or over gRPC) and inspected. Every operation returns
//! its payload together with the injected error, so a test can check what the
//! app would have answered even when it is told to fail.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use tonic::Status;
use tonic::metadata::{KeyRef, MetadataMap};

use callback_proto::common::v1::{InvokeRequest, InvokeResponse};
use callback_proto::prost_types::Any;
use callback_proto::runtime::v1::{
    BindingEventRequest, BindingEventResponse, HealthCheckResponse, ListInputBindingsResponse,
    ListTopicSubscriptionsResponse, TopicEventBulkRequest, TopicEventBulkResponse,
    TopicEventRequest, TopicEventResponse, TopicSubscription,
    topic_event_response::TopicEventResponseStatus,
};

/// Content type of the payload produced by [`MockServer::on_invoke`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A payload paired with the injected error, if any.
///
/// The payload is always built; `error` does not suppress it.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub response: T,
    pub error: Option<Status>,
}

impl<T> Reply<T> {
    /// Collapse into the shape gRPC can carry: the error wins when present.
    pub fn into_result(self) -> Result<T, Status> {
        match self.error {
            Some(status) => Err(status),
            None => Ok(self.response),
        }
    }
}

/// Configurable fake app. Implements `AppCallback`, `AppCallbackAlpha` and
/// `AppCallbackHealthCheck` (see `grpc`).
#[derive(Debug)]
pub struct MockServer {
    /// Returned by every operation when set.
    pub error: Option<Status>,
    /// Discovery answer unless the override below has subscriptions.
    pub subscriptions: Vec<TopicSubscription>,
    pub bindings: Vec<String>,
    pub binding_event_response: BindingEventResponse,
    pub topic_event_response_status: TopicEventResponseStatus,
    /// Returned verbatim by discovery when its subscription list is non-empty.
    pub list_topic_subscriptions_response: ListTopicSubscriptionsResponse,
    /// Canned bulk answers keyed by delivery path. `None` means bulk delivery
    /// answers with no payload at all.
    pub bulk_response_per_path: Option<HashMap<String, TopicEventBulkResponse>>,
    requests_received: Mutex<HashMap<String, TopicEventBulkRequest>>,
}

impl Default for MockServer {
    fn default() -> Self {
        Self {
            error: None,
            subscriptions: Vec::new(),
            bindings: Vec::new(),
            binding_event_response: BindingEventResponse::default(),
            topic_event_response_status: TopicEventResponseStatus::Success,
            list_topic_subscriptions_response: ListTopicSubscriptionsResponse::default(),
            bulk_response_per_path: None,
            requests_received: Mutex::new(HashMap::new()),
        }
    }
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn reply<T>(&self, response: T) -> Reply<T> {
        Reply {
            response,
            error: self.error.clone(),
        }
    }

    /// Echo the call back as JSON: the method name, the first value of every
    /// incoming metadata key, and the HTTP verb and query string when the call
    /// carries an HTTP extension. Metadata keys overwrite `method`.
    pub fn on_invoke(
        &self,
        request: &InvokeRequest,
        metadata: &MetadataMap,
    ) -> Reply<InvokeResponse> {
        let mut fields = BTreeMap::new();
        fields.insert("method".to_owned(), request.method.clone());

        for key in metadata.keys() {
            let (name, value) = match key {
                KeyRef::Ascii(key) => (
                    key.as_str(),
                    metadata
                        .get(key.as_str())
                        .map(|v| String::from_utf8_lossy(v.as_encoded_bytes()).into_owned()),
                ),
                KeyRef::Binary(key) => (
                    key.as_str(),
                    metadata.get_bin(key.as_str()).map(|v| match v.to_bytes() {
                        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                        Err(_) => String::from_utf8_lossy(v.as_encoded_bytes()).into_owned(),
                    }),
                ),
            };
            if let Some(value) = value {
                fields.insert(name.to_owned(), value);
            }
        }

        if let Some(ext) = &request.http_extension {
            fields.insert("httpverb".to_owned(), ext.verb().as_str_name().to_owned());
            fields.insert("querystring".to_owned(), ext.querystring.clone());
        }

        // A string map always serializes.
        let value = serde_json::to_vec(&fields).unwrap_or_default();

        self.reply(InvokeResponse {
            data: Some(Any {
                type_url: String::new(),
                value,
            }),
            content_type: JSON_CONTENT_TYPE.to_owned(),
        })
    }

    /// The override wins only when it lists at least one subscription.
    pub fn list_topic_subscriptions(&self) -> Reply<ListTopicSubscriptionsResponse> {
        if !self.list_topic_subscriptions_response.subscriptions.is_empty() {
            return self.reply(self.list_topic_subscriptions_response.clone());
        }
        self.reply(ListTopicSubscriptionsResponse {
            subscriptions: self.subscriptions.clone(),
        })
    }

    pub fn list_input_bindings(&self) -> Reply<ListInputBindingsResponse> {
        self.reply(ListInputBindingsResponse {
            bindings: self.bindings.clone(),
        })
    }

    pub fn on_binding_event(
        &self,
        _request: &BindingEventRequest,
    ) -> Reply<BindingEventResponse> {
        self.reply(self.binding_event_response.clone())
    }

    pub fn on_topic_event(&self, _request: &TopicEventRequest) -> Reply<TopicEventResponse> {
        self.reply(TopicEventResponse {
            status: self.topic_event_response_status.into(),
        })
    }

    /// Record `request` as the latest one for its path and answer with the
    /// canned response for that path, if any.
    pub fn on_bulk_topic_event(
        &self,
        request: TopicEventBulkRequest,
    ) -> Reply<Option<TopicEventBulkResponse>> {
        let response = {
            let mut received = self
                .requests_received
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let path = request.path.clone();
            received.insert(path.clone(), request);
            self.bulk_response_per_path
                .as_ref()
                .and_then(|per_path| per_path.get(&path).cloned())
        };
        self.reply(response)
    }

    pub fn health_check(&self) -> Reply<HealthCheckResponse> {
        self.reply(HealthCheckResponse {})
    }

    /// Snapshot of the latest bulk request received per path.
    pub fn requests_received(&self) -> HashMap<String, TopicEventBulkRequest> {
        self.requests_received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_received(&self, path: &str) -> Option<TopicEventBulkRequest> {
        self.requests_received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}

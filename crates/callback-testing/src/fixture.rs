//! JSON fixtures describing a mock app's canned answers.
//!
//! Used when the mock runs as its own process and cannot be configured by
//! field assignment.
//!
//! # Example
//! ```no_run
//! use callback_core::config::Config;
//! use callback_testing::fixture::MockFixture;
//!
//! let mock = MockFixture::from_json_file("fixtures/orders.json")
//!     .unwrap()
//!     .into_mock();
//! ```

use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use tonic::{Code, Status};

use callback_core::config::Config;
use callback_proto::runtime::v1::{
    BindingEventResponse, ListTopicSubscriptionsResponse, TopicEventBulkResponse,
    TopicEventBulkResponseEntry, TopicRoutes, TopicRule, TopicSubscription,
    binding_event_response::BindingEventConcurrency, topic_event_response::TopicEventResponseStatus,
};

use crate::mock::MockServer;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MockFixture {
    pub subscriptions: Vec<SubscriptionFixture>,
    /// Discovery override; wins over `subscriptions` only when non-empty.
    pub subscriptions_override: Vec<SubscriptionFixture>,
    pub bindings: Vec<String>,
    pub topic_status: StatusFixture,
    pub binding_response: BindingResponseFixture,
    /// Absent means bulk delivery answers with no payload.
    pub bulk_responses: Option<HashMap<String, Vec<BulkEntryFixture>>>,
    pub error: Option<ErrorFixture>,
}

impl Config for MockFixture {}

#[derive(Debug, Deserialize)]
pub struct SubscriptionFixture {
    pub pubsub_name: String,
    pub topic: String,
    /// Default route for the topic.
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub rules: Vec<RuleFixture>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub dead_letter_topic: String,
}

#[derive(Debug, Deserialize)]
pub struct RuleFixture {
    #[serde(rename = "match")]
    pub expr: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFixture {
    #[default]
    Success,
    Retry,
    Drop,
}

impl From<StatusFixture> for TopicEventResponseStatus {
    fn from(status: StatusFixture) -> Self {
        match status {
            StatusFixture::Success => Self::Success,
            StatusFixture::Retry => Self::Retry,
            StatusFixture::Drop => Self::Drop,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcurrencyFixture {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BindingResponseFixture {
    pub store_name: String,
    pub to: Vec<String>,
    /// UTF-8 payload sent back to the runtime.
    pub data: String,
    pub concurrency: ConcurrencyFixture,
}

#[derive(Debug, Deserialize)]
pub struct BulkEntryFixture {
    pub entry_id: String,
    #[serde(default)]
    pub status: StatusFixture,
}

impl From<SubscriptionFixture> for TopicSubscription {
    fn from(s: SubscriptionFixture) -> Self {
        Self {
            pubsub_name: s.pubsub_name,
            topic: s.topic,
            metadata: s.metadata,
            routes: Some(TopicRoutes {
                rules: s
                    .rules
                    .into_iter()
                    .map(|r| TopicRule {
                        r#match: r.expr,
                        path: r.path,
                    })
                    .collect(),
                default: s.route,
            }),
            dead_letter_topic: s.dead_letter_topic,
            bulk_subscribe: None,
        }
    }
}

/// Injected failure. `code` is the numeric gRPC status code and defaults to
/// `UNKNOWN`, which is how an untyped app error reaches the runtime.
/// `OK` (0) is rejected: a failure must carry a failing code.
#[derive(Debug, Deserialize)]
pub struct ErrorFixture {
    #[serde(default = "unknown_code", deserialize_with = "failure_code")]
    pub code: i32,
    pub message: String,
}

fn unknown_code() -> i32 {
    Code::Unknown as i32
}

fn failure_code<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let code = i32::deserialize(deserializer)?;
    if code == Code::Ok as i32 {
        return Err(D::Error::custom("error code must not be OK (0)"));
    }
    Ok(code)
}

impl MockFixture {
    pub fn into_mock(self) -> MockServer {
        let mut mock = MockServer::new();

        mock.subscriptions = self.subscriptions.into_iter().map(Into::into).collect();
        mock.list_topic_subscriptions_response = ListTopicSubscriptionsResponse {
            subscriptions: self
                .subscriptions_override
                .into_iter()
                .map(Into::into)
                .collect(),
        };
        mock.bindings = self.bindings;
        mock.topic_event_response_status = self.topic_status.into();

        let concurrency = match self.binding_response.concurrency {
            ConcurrencyFixture::Sequential => BindingEventConcurrency::Sequential,
            ConcurrencyFixture::Parallel => BindingEventConcurrency::Parallel,
        };
        mock.binding_event_response = BindingEventResponse {
            store_name: self.binding_response.store_name,
            states: Vec::new(),
            to: self.binding_response.to,
            data: self.binding_response.data.into_bytes(),
            concurrency: concurrency.into(),
        };

        mock.bulk_response_per_path = self.bulk_responses.map(|per_path| {
            per_path
                .into_iter()
                .map(|(path, entries)| {
                    let statuses = entries
                        .into_iter()
                        .map(|e| TopicEventBulkResponseEntry {
                            entry_id: e.entry_id,
                            status: TopicEventResponseStatus::from(e.status).into(),
                        })
                        .collect();
                    (path, TopicEventBulkResponse { statuses })
                })
                .collect()
        });

        mock.error = self
            .error
            .map(|e| Status::new(Code::from_i32(e.code), e.message));

        mock
    }
}

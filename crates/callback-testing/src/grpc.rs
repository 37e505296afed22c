//! tonic service implementations for [`MockServer`].
//!
//! Each RPC delegates to the inherent operation of the same name and turns
//! its [`Reply`] into a gRPC result. An absent bulk payload goes out as an
//! empty `TopicEventBulkResponse`, since a unary reply must carry a message.

use tonic::{Request, Response, Status};
use tracing::debug;

use callback_proto::common::v1::{InvokeRequest, InvokeResponse};
use callback_proto::runtime::v1::{
    BindingEventRequest, BindingEventResponse, HealthCheckResponse, ListInputBindingsResponse,
    ListTopicSubscriptionsResponse, TopicEventBulkRequest, TopicEventBulkResponse,
    TopicEventRequest, TopicEventResponse, app_callback_alpha_server::AppCallbackAlpha,
    app_callback_health_check_server::AppCallbackHealthCheck, app_callback_server::AppCallback,
};

use crate::mock::{MockServer, Reply};

fn respond<T>(reply: Reply<T>) -> Result<Response<T>, Status> {
    reply.into_result().map(Response::new)
}

#[tonic::async_trait]
impl AppCallback for MockServer {
    async fn on_invoke(
        &self,
        request: Request<InvokeRequest>,
    ) -> Result<Response<InvokeResponse>, Status> {
        debug!(method = %request.get_ref().method, "OnInvoke");
        respond(MockServer::on_invoke(
            self,
            request.get_ref(),
            request.metadata(),
        ))
    }

    async fn list_topic_subscriptions(
        &self,
        _request: Request<()>,
    ) -> Result<Response<ListTopicSubscriptionsResponse>, Status> {
        debug!("ListTopicSubscriptions");
        respond(MockServer::list_topic_subscriptions(self))
    }

    async fn on_topic_event(
        &self,
        request: Request<TopicEventRequest>,
    ) -> Result<Response<TopicEventResponse>, Status> {
        let req = request.into_inner();
        debug!(topic = %req.topic, path = %req.path, "OnTopicEvent");
        respond(MockServer::on_topic_event(self, &req))
    }

    async fn list_input_bindings(
        &self,
        _request: Request<()>,
    ) -> Result<Response<ListInputBindingsResponse>, Status> {
        debug!("ListInputBindings");
        respond(MockServer::list_input_bindings(self))
    }

    async fn on_binding_event(
        &self,
        request: Request<BindingEventRequest>,
    ) -> Result<Response<BindingEventResponse>, Status> {
        let req = request.into_inner();
        debug!(binding = %req.name, "OnBindingEvent");
        respond(MockServer::on_binding_event(self, &req))
    }
}

#[tonic::async_trait]
impl AppCallbackAlpha for MockServer {
    async fn on_bulk_topic_event_alpha1(
        &self,
        request: Request<TopicEventBulkRequest>,
    ) -> Result<Response<TopicEventBulkResponse>, Status> {
        let req = request.into_inner();
        debug!(path = %req.path, entries = req.entries.len(), "OnBulkTopicEventAlpha1");
        let reply = MockServer::on_bulk_topic_event(self, req);
        respond(Reply {
            response: reply.response.unwrap_or_default(),
            error: reply.error,
        })
    }
}

#[tonic::async_trait]
impl AppCallbackHealthCheck for MockServer {
    async fn health_check(
        &self,
        _request: Request<()>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        debug!("HealthCheck");
        respond(MockServer::health_check(self))
    }
}

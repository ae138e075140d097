//! The notification gateway facade

use std::sync::Arc;

use tracing::debug;

use snsgate_core::{ServiceError, SnsConfig};

use crate::api::{
    AddPermissionRequest, AttributeMap, ConfirmSubscriptionRequest, CreateTopicRequest,
    DeleteTopicRequest, GetSubscriptionAttributesRequest, GetTopicAttributesRequest,
    ListSubscriptionsByTopicRequest, PublishRequest, RemovePermissionRequest,
    SetSubscriptionAttributesRequest, SetTopicAttributesRequest, SnsApi, SubscribeRequest,
    SubscriptionSummary, Tag, UnsubscribeRequest,
};
use crate::aws::AwsSns;
use crate::channel::Channel;

/// Typed async facade over the notification service.
///
/// Holds exactly one shared, read-only client handle behind the [`SnsApi`]
/// seam. Every method issues exactly one request and relays the response or
/// error verbatim; concurrent calls share the handle without locking.
#[derive(Clone)]
pub struct SnsGateway {
    api: Arc<dyn SnsApi>,
}

impl SnsGateway {
    /// Build a gateway over an injected client. Tests pass a double here.
    pub fn new(api: Arc<dyn SnsApi>) -> Self {
        Self { api }
    }

    /// Build a gateway from environment configuration.
    ///
    /// Never fails: absent credentials yield a client the service rejects on
    /// first use, surfacing as a [`ServiceError`] from that call.
    pub async fn from_env() -> Self {
        Self::with_config(SnsConfig::from_env()).await
    }

    /// Build a gateway from an explicit configuration.
    pub async fn with_config(config: SnsConfig) -> Self {
        let sdk_config = config.load().await;
        Self::new(Arc::new(AwsSns::new(&sdk_config)))
    }

    /// Publish a plain message to a topic. Returns the delivery receipt.
    pub async fn publish(&self, topic_arn: &str, message: &str) -> Result<String, ServiceError> {
        debug!(topic_arn = %topic_arn, "publish");
        self.api
            .publish(PublishRequest {
                topic_arn: Some(topic_arn.to_string()),
                message: message.to_string(),
                ..PublishRequest::default()
            })
            .await
    }

    /// Publish through a specific delivery channel.
    ///
    /// The channel descriptor carries the destination and produces the fixed
    /// attribute mapping for that channel; this is the single generalization
    /// of the per-channel publish variants.
    pub async fn publish_to(
        &self,
        channel: Channel,
        message: &str,
    ) -> Result<String, ServiceError> {
        let request = channel.into_request(message);
        debug!(
            topic_arn = request.topic_arn.as_deref().unwrap_or(""),
            phone_number = request.phone_number.as_deref().unwrap_or(""),
            "publish_to"
        );
        self.api.publish(request).await
    }

    /// Subscribe an endpoint to a topic. The returned handle may still be
    /// pending confirmation; the confirmed handle is requested when the
    /// service can return it immediately.
    pub async fn subscribe(
        &self,
        topic_arn: &str,
        protocol: &str,
        endpoint: &str,
    ) -> Result<String, ServiceError> {
        debug!(topic_arn = %topic_arn, protocol = %protocol, "subscribe");
        self.api
            .subscribe(SubscribeRequest {
                topic_arn: topic_arn.to_string(),
                protocol: protocol.to_string(),
                endpoint: endpoint.to_string(),
                return_subscription_arn: true,
            })
            .await
    }

    pub async fn unsubscribe(&self, subscription_arn: &str) -> Result<(), ServiceError> {
        debug!(subscription_arn = %subscription_arn, "unsubscribe");
        self.api
            .unsubscribe(UnsubscribeRequest {
                subscription_arn: subscription_arn.to_string(),
            })
            .await
    }

    /// Exchange a confirmation token for the confirmed subscription handle.
    pub async fn confirm_subscription(
        &self,
        topic_arn: &str,
        token: &str,
    ) -> Result<String, ServiceError> {
        self.api
            .confirm_subscription(ConfirmSubscriptionRequest {
                topic_arn: topic_arn.to_string(),
                token: token.to_string(),
            })
            .await
    }

    /// Create a topic (idempotent on the service side). Returns its handle.
    pub async fn create_topic(&self, name: &str) -> Result<String, ServiceError> {
        self.create_topic_with(name, AttributeMap::new(), Vec::new())
            .await
    }

    /// Create a topic with attributes and tags.
    pub async fn create_topic_with(
        &self,
        name: &str,
        attributes: AttributeMap,
        tags: Vec<Tag>,
    ) -> Result<String, ServiceError> {
        debug!(name = %name, "create_topic");
        self.api
            .create_topic(CreateTopicRequest {
                name: name.to_string(),
                attributes,
                tags,
            })
            .await
    }

    pub async fn delete_topic(&self, topic_arn: &str) -> Result<(), ServiceError> {
        debug!(topic_arn = %topic_arn, "delete_topic");
        self.api
            .delete_topic(DeleteTopicRequest {
                topic_arn: topic_arn.to_string(),
            })
            .await
    }

    /// List topic handles (first page; pagination is not surfaced).
    pub async fn list_topics(&self) -> Result<Vec<String>, ServiceError> {
        self.api.list_topics().await
    }

    pub async fn list_subscriptions(&self) -> Result<Vec<SubscriptionSummary>, ServiceError> {
        self.api.list_subscriptions().await
    }

    pub async fn list_subscriptions_by_topic(
        &self,
        topic_arn: &str,
    ) -> Result<Vec<SubscriptionSummary>, ServiceError> {
        self.api
            .list_subscriptions_by_topic(ListSubscriptionsByTopicRequest {
                topic_arn: topic_arn.to_string(),
            })
            .await
    }

    pub async fn get_topic_attributes(
        &self,
        topic_arn: &str,
    ) -> Result<AttributeMap, ServiceError> {
        self.api
            .get_topic_attributes(GetTopicAttributesRequest {
                topic_arn: topic_arn.to_string(),
            })
            .await
    }

    pub async fn set_topic_attributes(
        &self,
        topic_arn: &str,
        attribute_name: &str,
        attribute_value: &str,
    ) -> Result<(), ServiceError> {
        self.api
            .set_topic_attributes(SetTopicAttributesRequest {
                topic_arn: topic_arn.to_string(),
                attribute_name: attribute_name.to_string(),
                attribute_value: attribute_value.to_string(),
            })
            .await
    }

    pub async fn get_subscription_attributes(
        &self,
        subscription_arn: &str,
    ) -> Result<AttributeMap, ServiceError> {
        self.api
            .get_subscription_attributes(GetSubscriptionAttributesRequest {
                subscription_arn: subscription_arn.to_string(),
            })
            .await
    }

    pub async fn set_subscription_attributes(
        &self,
        subscription_arn: &str,
        attribute_name: &str,
        attribute_value: &str,
    ) -> Result<(), ServiceError> {
        self.api
            .set_subscription_attributes(SetSubscriptionAttributesRequest {
                subscription_arn: subscription_arn.to_string(),
                attribute_name: attribute_name.to_string(),
                attribute_value: attribute_value.to_string(),
            })
            .await
    }

    /// Grant the named principals the named actions on a topic.
    pub async fn add_permission(
        &self,
        topic_arn: &str,
        label: &str,
        aws_account_ids: Vec<String>,
        action_names: Vec<String>,
    ) -> Result<(), ServiceError> {
        self.api
            .add_permission(AddPermissionRequest {
                topic_arn: topic_arn.to_string(),
                label: label.to_string(),
                aws_account_ids,
                action_names,
            })
            .await
    }

    /// Remove a permission statement by label.
    pub async fn remove_permission(
        &self,
        topic_arn: &str,
        label: &str,
    ) -> Result<(), ServiceError> {
        self.api
            .remove_permission(RemovePermissionRequest {
                topic_arn: topic_arn.to_string(),
                label: label.to_string(),
            })
            .await
    }
}

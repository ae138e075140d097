//! Typed request records and the service client seam
//!
//! One record per operation, each carrying exactly the fields that operation
//! forwards to the service and nothing else. The [`SnsApi`] trait is the
//! substitution point: the gateway talks only to this trait, backed by the
//! real SDK client in production and by an in-memory double in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use snsgate_core::ServiceError;

/// Attribute name to string value, as the service models resource attributes.
pub type AttributeMap = BTreeMap<String, String>;

/// Per-message attribute mapping keyed by attribute name.
pub type MessageAttributes = BTreeMap<String, MessageAttributeValue>;

/// A single typed message attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttributeValue {
    pub data_type: String,
    pub string_value: String,
}

impl MessageAttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: value.into(),
        }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self {
            data_type: "Number".to_string(),
            string_value: value.into(),
        }
    }
}

/// Key/value tag attached to a topic at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PublishRequest {
    /// Destination topic; exactly one of `topic_arn` / `phone_number` is set.
    pub topic_arn: Option<String>,
    /// Direct-SMS destination, bypassing any topic.
    pub phone_number: Option<String>,
    pub message: String,
    pub subject: Option<String>,
    /// `"json"` or `"text"` when the channel requires one; absent otherwise.
    pub message_structure: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub message_attributes: MessageAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub topic_arn: String,
    pub protocol: String,
    pub endpoint: String,
    /// Ask the service to return the subscription handle even while the
    /// subscription is still pending confirmation.
    pub return_subscription_arn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeRequest {
    pub subscription_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmSubscriptionRequest {
    pub topic_arn: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CreateTopicRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTopicRequest {
    pub topic_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSubscriptionsByTopicRequest {
    pub topic_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTopicAttributesRequest {
    pub topic_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTopicAttributesRequest {
    pub topic_arn: String,
    pub attribute_name: String,
    pub attribute_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSubscriptionAttributesRequest {
    pub subscription_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSubscriptionAttributesRequest {
    pub subscription_arn: String,
    pub attribute_name: String,
    pub attribute_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPermissionRequest {
    pub topic_arn: String,
    pub label: String,
    pub aws_account_ids: Vec<String>,
    pub action_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovePermissionRequest {
    pub topic_arn: String,
    pub label: String,
}

/// One subscription as reported by the list operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub subscription_arn: String,
    pub topic_arn: String,
    pub protocol: String,
    pub endpoint: String,
}

/// The service client seam.
///
/// One async method per service operation; each takes the operation's request
/// record and returns the service's result or error unchanged. Pagination
/// tokens are not surfaced: list operations return the first page.
#[async_trait]
pub trait SnsApi: Send + Sync {
    /// Returns the delivery receipt (message id).
    async fn publish(&self, request: PublishRequest) -> Result<String, ServiceError>;

    /// Returns the subscription handle, which may still be pending.
    async fn subscribe(&self, request: SubscribeRequest) -> Result<String, ServiceError>;

    async fn unsubscribe(&self, request: UnsubscribeRequest) -> Result<(), ServiceError>;

    /// Exchanges a confirmation token for the confirmed subscription handle.
    async fn confirm_subscription(
        &self,
        request: ConfirmSubscriptionRequest,
    ) -> Result<String, ServiceError>;

    /// Returns the topic handle; creating an existing topic returns its handle.
    async fn create_topic(&self, request: CreateTopicRequest) -> Result<String, ServiceError>;

    async fn delete_topic(&self, request: DeleteTopicRequest) -> Result<(), ServiceError>;

    async fn list_topics(&self) -> Result<Vec<String>, ServiceError>;

    async fn list_subscriptions(&self) -> Result<Vec<SubscriptionSummary>, ServiceError>;

    async fn list_subscriptions_by_topic(
        &self,
        request: ListSubscriptionsByTopicRequest,
    ) -> Result<Vec<SubscriptionSummary>, ServiceError>;

    async fn get_topic_attributes(
        &self,
        request: GetTopicAttributesRequest,
    ) -> Result<AttributeMap, ServiceError>;

    async fn set_topic_attributes(
        &self,
        request: SetTopicAttributesRequest,
    ) -> Result<(), ServiceError>;

    async fn get_subscription_attributes(
        &self,
        request: GetSubscriptionAttributesRequest,
    ) -> Result<AttributeMap, ServiceError>;

    async fn set_subscription_attributes(
        &self,
        request: SetSubscriptionAttributesRequest,
    ) -> Result<(), ServiceError>;

    async fn add_permission(&self, request: AddPermissionRequest) -> Result<(), ServiceError>;

    async fn remove_permission(&self, request: RemovePermissionRequest)
        -> Result<(), ServiceError>;
}

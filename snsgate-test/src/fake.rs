//! In-memory service double

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use snsgate::api::{
    AddPermissionRequest, AttributeMap, ConfirmSubscriptionRequest, CreateTopicRequest,
    DeleteTopicRequest, GetSubscriptionAttributesRequest, GetTopicAttributesRequest,
    ListSubscriptionsByTopicRequest, PublishRequest, RemovePermissionRequest,
    SetSubscriptionAttributesRequest, SetTopicAttributesRequest, SnsApi, SubscribeRequest,
    SubscriptionSummary, Tag, UnsubscribeRequest,
};
use snsgate_core::ServiceError;

/// Every request the double has received, verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Publish(PublishRequest),
    Subscribe(SubscribeRequest),
    Unsubscribe(UnsubscribeRequest),
    ConfirmSubscription(ConfirmSubscriptionRequest),
    CreateTopic(CreateTopicRequest),
    DeleteTopic(DeleteTopicRequest),
    ListTopics,
    ListSubscriptions,
    ListSubscriptionsByTopic(ListSubscriptionsByTopicRequest),
    GetTopicAttributes(GetTopicAttributesRequest),
    SetTopicAttributes(SetTopicAttributesRequest),
    GetSubscriptionAttributes(GetSubscriptionAttributesRequest),
    SetSubscriptionAttributes(SetSubscriptionAttributesRequest),
    AddPermission(AddPermissionRequest),
    RemovePermission(RemovePermissionRequest),
}

#[derive(Debug, Clone)]
struct TopicRecord {
    name: String,
    arn: String,
    attributes: AttributeMap,
    tags: Vec<Tag>,
    permissions: BTreeMap<String, (Vec<String>, Vec<String>)>,
    created_timestamp: i64,
}

impl TopicRecord {
    fn new(name: String, attributes: AttributeMap, tags: Vec<Tag>) -> Self {
        let arn = format!("arn:aws:sns:us-east-1:000000000000:{name}");
        Self {
            name,
            arn,
            attributes,
            tags,
            permissions: BTreeMap::new(),
            created_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone)]
struct SubscriptionRecord {
    arn: String,
    topic_arn: String,
    protocol: String,
    endpoint: String,
    confirmed: bool,
    attributes: AttributeMap,
}

/// In-memory stand-in for the notification service.
///
/// Implements `SnsApi` over a DashMap-backed topic/subscription store.
/// Records every request for exact-field assertions, and can be scripted to
/// fail the next call with a given error.
#[derive(Debug, Default)]
pub struct FakeSns {
    topics: DashMap<String, TopicRecord>,
    subscriptions: DashMap<String, SubscriptionRecord>,
    pending_tokens: DashMap<String, String>,
    calls: Mutex<Vec<ApiCall>>,
    fail_next: Mutex<Option<ServiceError>>,
}

impl FakeSns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a topic under an arbitrary opaque handle, without recording a
    /// call. Lets tests address topics by whatever handle they choose.
    pub fn seed_topic(&self, topic_arn: &str) {
        let name = topic_arn.rsplit(':').next().unwrap_or(topic_arn).to_string();
        let mut record = TopicRecord::new(name, AttributeMap::new(), Vec::new());
        record.arn = topic_arn.to_string();
        self.topics.insert(topic_arn.to_string(), record);
    }

    /// Script the next call to fail with exactly this error.
    pub fn fail_next(&self, error: ServiceError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    /// All requests received so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent request, if any.
    pub fn last_call(&self) -> Option<ApiCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// The confirmation token issued for a pending subscription.
    pub fn pending_token(&self, subscription_arn: &str) -> Option<String> {
        self.pending_tokens
            .iter()
            .find(|entry| entry.value() == subscription_arn)
            .map(|entry| entry.key().clone())
    }

    /// Tags stored for a topic at creation.
    pub fn topic_tags(&self, topic_arn: &str) -> Option<Vec<Tag>> {
        self.topics.get(topic_arn).map(|t| t.tags.clone())
    }

    /// Whether a subscription has been confirmed.
    pub fn is_confirmed(&self, subscription_arn: &str) -> bool {
        self.subscriptions
            .get(subscription_arn)
            .is_some_and(|s| s.confirmed)
    }

    fn record(&self, call: ApiCall) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn topic(&self, topic_arn: &str) -> Result<TopicRecord, ServiceError> {
        self.topics.get(topic_arn).map(|t| t.clone()).ok_or_else(|| {
            ServiceError::new("NotFound", format!("Topic does not exist: {topic_arn}"))
        })
    }

    fn summarize(record: &SubscriptionRecord) -> SubscriptionSummary {
        SubscriptionSummary {
            subscription_arn: record.arn.clone(),
            topic_arn: record.topic_arn.clone(),
            protocol: record.protocol.clone(),
            endpoint: record.endpoint.clone(),
        }
    }
}

#[async_trait]
impl SnsApi for FakeSns {
    async fn publish(&self, request: PublishRequest) -> Result<String, ServiceError> {
        self.record(ApiCall::Publish(request.clone()))?;

        if let Some(topic_arn) = &request.topic_arn {
            let topic = self.topic(topic_arn)?;
            info!(topic = %topic.name, "fake publish");
        }

        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn subscribe(&self, request: SubscribeRequest) -> Result<String, ServiceError> {
        self.record(ApiCall::Subscribe(request.clone()))?;

        let _ = self.topic(&request.topic_arn)?;

        let short_uuid = uuid::Uuid::new_v4().to_string();
        let subscription_arn = format!("{}:{}", request.topic_arn, &short_uuid[..8]);
        let token = uuid::Uuid::new_v4().to_string();

        self.subscriptions.insert(
            subscription_arn.clone(),
            SubscriptionRecord {
                arn: subscription_arn.clone(),
                topic_arn: request.topic_arn,
                protocol: request.protocol,
                endpoint: request.endpoint,
                confirmed: false,
                attributes: AttributeMap::new(),
            },
        );
        self.pending_tokens.insert(token, subscription_arn.clone());

        if request.return_subscription_arn {
            Ok(subscription_arn)
        } else {
            Ok("pending confirmation".to_string())
        }
    }

    async fn unsubscribe(&self, request: UnsubscribeRequest) -> Result<(), ServiceError> {
        self.record(ApiCall::Unsubscribe(request.clone()))?;

        self.subscriptions
            .remove(&request.subscription_arn)
            .map(|_| ())
            .ok_or_else(|| {
                ServiceError::new(
                    "NotFound",
                    format!("Subscription does not exist: {}", request.subscription_arn),
                )
            })
    }

    async fn confirm_subscription(
        &self,
        request: ConfirmSubscriptionRequest,
    ) -> Result<String, ServiceError> {
        self.record(ApiCall::ConfirmSubscription(request.clone()))?;

        let subscription_arn = self
            .pending_tokens
            .remove(&request.token)
            .map(|(_, arn)| arn)
            .ok_or_else(|| ServiceError::new("InvalidParameter", "Invalid token"))?;

        let mut subscription = self
            .subscriptions
            .get_mut(&subscription_arn)
            .ok_or_else(|| ServiceError::new("NotFound", "Subscription does not exist"))?;

        if subscription.topic_arn != request.topic_arn {
            return Err(ServiceError::new(
                "InvalidParameter",
                "Token does not match topic",
            ));
        }

        subscription.confirmed = true;
        Ok(subscription_arn)
    }

    async fn create_topic(&self, request: CreateTopicRequest) -> Result<String, ServiceError> {
        self.record(ApiCall::CreateTopic(request.clone()))?;

        let record = TopicRecord::new(request.name.clone(), request.attributes, request.tags);
        let arn = record.arn.clone();

        // Creating an existing topic is idempotent on the real service.
        if !self.topics.contains_key(&arn) {
            info!(name = %request.name, arn = %arn, "fake create topic");
            self.topics.insert(arn.clone(), record);
        }
        Ok(arn)
    }

    async fn delete_topic(&self, request: DeleteTopicRequest) -> Result<(), ServiceError> {
        self.record(ApiCall::DeleteTopic(request.clone()))?;

        self.topics
            .remove(&request.topic_arn)
            .ok_or_else(|| {
                ServiceError::new(
                    "NotFound",
                    format!("Topic does not exist: {}", request.topic_arn),
                )
            })?;
        self.subscriptions
            .retain(|_, s| s.topic_arn != request.topic_arn);
        Ok(())
    }

    async fn list_topics(&self) -> Result<Vec<String>, ServiceError> {
        self.record(ApiCall::ListTopics)?;

        let mut arns: Vec<String> = self.topics.iter().map(|t| t.arn.clone()).collect();
        arns.sort();
        Ok(arns)
    }

    async fn list_subscriptions(&self) -> Result<Vec<SubscriptionSummary>, ServiceError> {
        self.record(ApiCall::ListSubscriptions)?;

        let mut subscriptions: Vec<SubscriptionSummary> = self
            .subscriptions
            .iter()
            .map(|s| Self::summarize(&s))
            .collect();
        subscriptions.sort_by(|a, b| a.subscription_arn.cmp(&b.subscription_arn));
        Ok(subscriptions)
    }

    async fn list_subscriptions_by_topic(
        &self,
        request: ListSubscriptionsByTopicRequest,
    ) -> Result<Vec<SubscriptionSummary>, ServiceError> {
        self.record(ApiCall::ListSubscriptionsByTopic(request.clone()))?;

        let _ = self.topic(&request.topic_arn)?;

        let mut subscriptions: Vec<SubscriptionSummary> = self
            .subscriptions
            .iter()
            .filter(|s| s.topic_arn == request.topic_arn)
            .map(|s| Self::summarize(&s))
            .collect();
        subscriptions.sort_by(|a, b| a.subscription_arn.cmp(&b.subscription_arn));
        Ok(subscriptions)
    }

    async fn get_topic_attributes(
        &self,
        request: GetTopicAttributesRequest,
    ) -> Result<AttributeMap, ServiceError> {
        self.record(ApiCall::GetTopicAttributes(request.clone()))?;

        let topic = self.topic(&request.topic_arn)?;
        let mut attributes = topic.attributes;
        attributes.insert("TopicArn".to_string(), topic.arn);
        attributes.insert("Owner".to_string(), "000000000000".to_string());
        attributes.insert(
            "TopicCreatedTimestamp".to_string(),
            topic.created_timestamp.to_string(),
        );
        Ok(attributes)
    }

    async fn set_topic_attributes(
        &self,
        request: SetTopicAttributesRequest,
    ) -> Result<(), ServiceError> {
        self.record(ApiCall::SetTopicAttributes(request.clone()))?;

        let mut topic = self.topics.get_mut(&request.topic_arn).ok_or_else(|| {
            ServiceError::new(
                "NotFound",
                format!("Topic does not exist: {}", request.topic_arn),
            )
        })?;
        topic
            .attributes
            .insert(request.attribute_name, request.attribute_value);
        Ok(())
    }

    async fn get_subscription_attributes(
        &self,
        request: GetSubscriptionAttributesRequest,
    ) -> Result<AttributeMap, ServiceError> {
        self.record(ApiCall::GetSubscriptionAttributes(request.clone()))?;

        let subscription = self
            .subscriptions
            .get(&request.subscription_arn)
            .ok_or_else(|| {
                ServiceError::new(
                    "NotFound",
                    format!("Subscription does not exist: {}", request.subscription_arn),
                )
            })?;

        let mut attributes = subscription.attributes.clone();
        attributes.insert("SubscriptionArn".to_string(), subscription.arn.clone());
        attributes.insert("TopicArn".to_string(), subscription.topic_arn.clone());
        attributes.insert("Protocol".to_string(), subscription.protocol.clone());
        attributes.insert(
            "PendingConfirmation".to_string(),
            (!subscription.confirmed).to_string(),
        );
        Ok(attributes)
    }

    async fn set_subscription_attributes(
        &self,
        request: SetSubscriptionAttributesRequest,
    ) -> Result<(), ServiceError> {
        self.record(ApiCall::SetSubscriptionAttributes(request.clone()))?;

        let mut subscription = self
            .subscriptions
            .get_mut(&request.subscription_arn)
            .ok_or_else(|| {
                ServiceError::new(
                    "NotFound",
                    format!("Subscription does not exist: {}", request.subscription_arn),
                )
            })?;
        subscription
            .attributes
            .insert(request.attribute_name, request.attribute_value);
        Ok(())
    }

    async fn add_permission(&self, request: AddPermissionRequest) -> Result<(), ServiceError> {
        self.record(ApiCall::AddPermission(request.clone()))?;

        let mut topic = self.topics.get_mut(&request.topic_arn).ok_or_else(|| {
            ServiceError::new(
                "NotFound",
                format!("Topic does not exist: {}", request.topic_arn),
            )
        })?;
        topic.permissions.insert(
            request.label,
            (request.aws_account_ids, request.action_names),
        );
        Ok(())
    }

    async fn remove_permission(
        &self,
        request: RemovePermissionRequest,
    ) -> Result<(), ServiceError> {
        self.record(ApiCall::RemovePermission(request.clone()))?;

        let mut topic = self.topics.get_mut(&request.topic_arn).ok_or_else(|| {
            ServiceError::new(
                "NotFound",
                format!("Topic does not exist: {}", request.topic_arn),
            )
        })?;
        topic.permissions.remove(&request.label).ok_or_else(|| {
            ServiceError::new(
                "NotFound",
                format!("Permission statement does not exist: {}", request.label),
            )
        })?;
        Ok(())
    }
}

//! SDK-backed implementation of the service client seam

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sns::error::{BuildError, ProvideErrorMetadata, SdkError};
use aws_sdk_sns::types as sdk;
use aws_sdk_sns::Client;

use snsgate_core::ServiceError;

use crate::api::{
    AddPermissionRequest, AttributeMap, ConfirmSubscriptionRequest, CreateTopicRequest,
    DeleteTopicRequest, GetSubscriptionAttributesRequest, GetTopicAttributesRequest,
    ListSubscriptionsByTopicRequest, MessageAttributes, PublishRequest, RemovePermissionRequest,
    SetSubscriptionAttributesRequest, SetTopicAttributesRequest, SnsApi, SubscribeRequest,
    SubscriptionSummary, UnsubscribeRequest,
};

/// The real service client: one shared handle, immutable after construction.
#[derive(Debug, Clone)]
pub struct AwsSns {
    client: Arc<Client>,
}

impl AwsSns {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Arc::new(Client::new(sdk_config)),
        }
    }

    /// The underlying SDK client, for callers needing operations outside
    /// the gateway surface.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Carry the service's code and message over unchanged.
fn service_error<E, R>(err: SdkError<E, R>) -> ServiceError
where
    SdkError<E, R>: ProvideErrorMetadata + std::error::Error,
{
    let code = ProvideErrorMetadata::code(&err).map(str::to_string);
    let message =
        ProvideErrorMetadata::message(&err).map_or_else(|| err.to_string(), str::to_string);
    ServiceError { code, message }
}

fn build_error(err: BuildError) -> ServiceError {
    ServiceError::uncoded(err.to_string())
}

fn to_sdk_attributes(
    attributes: MessageAttributes,
) -> Result<Option<HashMap<String, sdk::MessageAttributeValue>>, ServiceError> {
    if attributes.is_empty() {
        return Ok(None);
    }

    let mut map = HashMap::with_capacity(attributes.len());
    for (name, value) in attributes {
        let value = sdk::MessageAttributeValue::builder()
            .data_type(value.data_type)
            .string_value(value.string_value)
            .build()
            .map_err(build_error)?;
        map.insert(name, value);
    }
    Ok(Some(map))
}

fn from_sdk_attributes(attributes: Option<&HashMap<String, String>>) -> AttributeMap {
    attributes
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<AttributeMap>()
        })
        .unwrap_or_default()
}

fn summarize(subscription: &sdk::Subscription) -> SubscriptionSummary {
    SubscriptionSummary {
        subscription_arn: subscription.subscription_arn().unwrap_or_default().to_string(),
        topic_arn: subscription.topic_arn().unwrap_or_default().to_string(),
        protocol: subscription.protocol().unwrap_or_default().to_string(),
        endpoint: subscription.endpoint().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl SnsApi for AwsSns {
    async fn publish(&self, request: PublishRequest) -> Result<String, ServiceError> {
        let attributes = to_sdk_attributes(request.message_attributes)?;
        let output = self
            .client
            .publish()
            .set_topic_arn(request.topic_arn)
            .set_phone_number(request.phone_number)
            .message(request.message)
            .set_subject(request.subject)
            .set_message_structure(request.message_structure)
            .set_message_attributes(attributes)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }

    async fn subscribe(&self, request: SubscribeRequest) -> Result<String, ServiceError> {
        let output = self
            .client
            .subscribe()
            .topic_arn(request.topic_arn)
            .protocol(request.protocol)
            .endpoint(request.endpoint)
            .return_subscription_arn(request.return_subscription_arn)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output.subscription_arn().unwrap_or_default().to_string())
    }

    async fn unsubscribe(&self, request: UnsubscribeRequest) -> Result<(), ServiceError> {
        self.client
            .unsubscribe()
            .subscription_arn(request.subscription_arn)
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }

    async fn confirm_subscription(
        &self,
        request: ConfirmSubscriptionRequest,
    ) -> Result<String, ServiceError> {
        let output = self
            .client
            .confirm_subscription()
            .topic_arn(request.topic_arn)
            .token(request.token)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output.subscription_arn().unwrap_or_default().to_string())
    }

    async fn create_topic(&self, request: CreateTopicRequest) -> Result<String, ServiceError> {
        let attributes = if request.attributes.is_empty() {
            None
        } else {
            Some(request.attributes.into_iter().collect::<HashMap<_, _>>())
        };
        let tags = if request.tags.is_empty() {
            None
        } else {
            let mut tags = Vec::with_capacity(request.tags.len());
            for tag in request.tags {
                tags.push(
                    sdk::Tag::builder()
                        .key(tag.key)
                        .value(tag.value)
                        .build()
                        .map_err(build_error)?,
                );
            }
            Some(tags)
        };

        let output = self
            .client
            .create_topic()
            .name(request.name)
            .set_attributes(attributes)
            .set_tags(tags)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output.topic_arn().unwrap_or_default().to_string())
    }

    async fn delete_topic(&self, request: DeleteTopicRequest) -> Result<(), ServiceError> {
        self.client
            .delete_topic()
            .topic_arn(request.topic_arn)
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }

    async fn list_topics(&self) -> Result<Vec<String>, ServiceError> {
        let output = self.client.list_topics().send().await.map_err(service_error)?;

        Ok(output
            .topics()
            .iter()
            .filter_map(|topic| topic.topic_arn().map(str::to_string))
            .collect())
    }

    async fn list_subscriptions(&self) -> Result<Vec<SubscriptionSummary>, ServiceError> {
        let output = self
            .client
            .list_subscriptions()
            .send()
            .await
            .map_err(service_error)?;

        Ok(output.subscriptions().iter().map(summarize).collect())
    }

    async fn list_subscriptions_by_topic(
        &self,
        request: ListSubscriptionsByTopicRequest,
    ) -> Result<Vec<SubscriptionSummary>, ServiceError> {
        let output = self
            .client
            .list_subscriptions_by_topic()
            .topic_arn(request.topic_arn)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output.subscriptions().iter().map(summarize).collect())
    }

    async fn get_topic_attributes(
        &self,
        request: GetTopicAttributesRequest,
    ) -> Result<AttributeMap, ServiceError> {
        let output = self
            .client
            .get_topic_attributes()
            .topic_arn(request.topic_arn)
            .send()
            .await
            .map_err(service_error)?;

        Ok(from_sdk_attributes(output.attributes()))
    }

    async fn set_topic_attributes(
        &self,
        request: SetTopicAttributesRequest,
    ) -> Result<(), ServiceError> {
        self.client
            .set_topic_attributes()
            .topic_arn(request.topic_arn)
            .attribute_name(request.attribute_name)
            .attribute_value(request.attribute_value)
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }

    async fn get_subscription_attributes(
        &self,
        request: GetSubscriptionAttributesRequest,
    ) -> Result<AttributeMap, ServiceError> {
        let output = self
            .client
            .get_subscription_attributes()
            .subscription_arn(request.subscription_arn)
            .send()
            .await
            .map_err(service_error)?;

        Ok(from_sdk_attributes(output.attributes()))
    }

    async fn set_subscription_attributes(
        &self,
        request: SetSubscriptionAttributesRequest,
    ) -> Result<(), ServiceError> {
        self.client
            .set_subscription_attributes()
            .subscription_arn(request.subscription_arn)
            .attribute_name(request.attribute_name)
            .attribute_value(request.attribute_value)
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }

    async fn add_permission(&self, request: AddPermissionRequest) -> Result<(), ServiceError> {
        self.client
            .add_permission()
            .topic_arn(request.topic_arn)
            .label(request.label)
            .set_aws_account_id(Some(request.aws_account_ids))
            .set_action_name(Some(request.action_names))
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }

    async fn remove_permission(
        &self,
        request: RemovePermissionRequest,
    ) -> Result<(), ServiceError> {
        self.client
            .remove_permission()
            .topic_arn(request.topic_arn)
            .label(request.label)
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }
}

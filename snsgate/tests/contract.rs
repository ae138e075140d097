//! Contract tests for the gateway facade
//!
//! These run against the in-memory service double and assert that each
//! facade method issues exactly one request containing exactly the fields of
//! that operation, and that results and errors pass through unchanged.

use std::sync::Arc;

use snsgate::api::{
    AddPermissionRequest, ConfirmSubscriptionRequest, DeleteTopicRequest,
    GetSubscriptionAttributesRequest, GetTopicAttributesRequest, MessageAttributeValue,
    PublishRequest, SetSubscriptionAttributesRequest, SetTopicAttributesRequest, SubscribeRequest,
    UnsubscribeRequest,
};
use snsgate::{Channel, ServiceError, SnsConfig, SnsGateway, DEFAULT_EMAIL_SUBJECT};
use snsgate_test::{ApiCall, FakeSns};

fn gateway_with_fake() -> (SnsGateway, Arc<FakeSns>) {
    let fake = Arc::new(FakeSns::new());
    (SnsGateway::new(fake.clone()), fake)
}

#[tokio::test]
async fn publish_forwards_exactly_topic_and_message() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    gateway.publish("arn:topic:1", "hello").await.unwrap();

    assert_eq!(fake.calls().len(), 1);
    assert_eq!(
        fake.last_call(),
        Some(ApiCall::Publish(PublishRequest {
            topic_arn: Some("arn:topic:1".to_string()),
            message: "hello".to_string(),
            ..PublishRequest::default()
        }))
    );
}

#[tokio::test]
async fn subscribe_forwards_protocol_endpoint_and_requests_arn() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    let subscription_arn = gateway
        .subscribe("arn:topic:1", "sqs", "https://queue/1")
        .await
        .unwrap();
    assert!(subscription_arn.starts_with("arn:topic:1"));

    assert_eq!(
        fake.last_call(),
        Some(ApiCall::Subscribe(SubscribeRequest {
            topic_arn: "arn:topic:1".to_string(),
            protocol: "sqs".to_string(),
            endpoint: "https://queue/1".to_string(),
            return_subscription_arn: true,
        }))
    );
}

#[tokio::test]
async fn confirm_subscription_exchanges_token_for_confirmed_handle() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    let subscription_arn = gateway
        .subscribe("arn:topic:1", "http", "https://host/cb")
        .await
        .unwrap();
    let token = fake.pending_token(&subscription_arn).unwrap();

    let confirmed = gateway
        .confirm_subscription("arn:topic:1", &token)
        .await
        .unwrap();

    assert_eq!(confirmed, subscription_arn);
    assert!(fake.is_confirmed(&subscription_arn));
    assert_eq!(
        fake.last_call(),
        Some(ApiCall::ConfirmSubscription(ConfirmSubscriptionRequest {
            topic_arn: "arn:topic:1".to_string(),
            token,
        }))
    );
}

#[tokio::test]
async fn unsubscribe_forwards_the_handle_and_acknowledges() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    let subscription_arn = gateway
        .subscribe("arn:topic:1", "email", "a@b.com")
        .await
        .unwrap();
    gateway.unsubscribe(&subscription_arn).await.unwrap();

    assert_eq!(
        fake.calls()[1],
        ApiCall::Unsubscribe(UnsubscribeRequest { subscription_arn })
    );
    assert!(gateway.list_subscriptions().await.unwrap().is_empty());
}

#[tokio::test]
async fn topic_lifecycle_create_list_delete() {
    let (gateway, fake) = gateway_with_fake();

    let topic_arn = gateway.create_topic("orders").await.unwrap();
    assert!(topic_arn.ends_with(":orders"));
    assert_eq!(gateway.list_topics().await.unwrap(), vec![topic_arn.clone()]);

    gateway.delete_topic(&topic_arn).await.unwrap();
    assert!(gateway.list_topics().await.unwrap().is_empty());

    // create, list, delete, list: four calls, nothing extra
    let calls = fake.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[2],
        ApiCall::DeleteTopic(DeleteTopicRequest { topic_arn })
    );
}

#[tokio::test]
async fn create_topic_with_attributes_and_tags_forwards_both() {
    let (gateway, fake) = gateway_with_fake();

    let mut attributes = snsgate::AttributeMap::new();
    attributes.insert("FifoTopic".to_string(), "false".to_string());
    let tags = vec![snsgate::Tag::new("team", "notifications")];

    let topic_arn = gateway
        .create_topic_with("orders", attributes.clone(), tags.clone())
        .await
        .unwrap();

    assert_eq!(
        fake.last_call(),
        Some(ApiCall::CreateTopic(snsgate::CreateTopicRequest {
            name: "orders".to_string(),
            attributes,
            tags: tags.clone(),
        }))
    );
    assert_eq!(fake.topic_tags(&topic_arn), Some(tags));
}

#[tokio::test]
async fn list_subscriptions_by_topic_filters_to_that_topic() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");
    fake.seed_topic("arn:topic:2");

    gateway
        .subscribe("arn:topic:1", "sqs", "https://queue/1")
        .await
        .unwrap();
    gateway
        .subscribe("arn:topic:2", "sqs", "https://queue/2")
        .await
        .unwrap();

    let subscriptions = gateway
        .list_subscriptions_by_topic("arn:topic:1")
        .await
        .unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].topic_arn, "arn:topic:1");
    assert_eq!(subscriptions[0].endpoint, "https://queue/1");
}

#[tokio::test]
async fn topic_attributes_round_trip_through_the_service() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    gateway
        .set_topic_attributes("arn:topic:1", "DisplayName", "Orders")
        .await
        .unwrap();
    assert_eq!(
        fake.last_call(),
        Some(ApiCall::SetTopicAttributes(SetTopicAttributesRequest {
            topic_arn: "arn:topic:1".to_string(),
            attribute_name: "DisplayName".to_string(),
            attribute_value: "Orders".to_string(),
        }))
    );

    let attributes = gateway.get_topic_attributes("arn:topic:1").await.unwrap();
    assert_eq!(attributes.get("DisplayName").map(String::as_str), Some("Orders"));
    assert_eq!(
        fake.last_call(),
        Some(ApiCall::GetTopicAttributes(GetTopicAttributesRequest {
            topic_arn: "arn:topic:1".to_string(),
        }))
    );
}

#[tokio::test]
async fn subscription_attributes_round_trip_through_the_service() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    let subscription_arn = gateway
        .subscribe("arn:topic:1", "sqs", "https://queue/1")
        .await
        .unwrap();
    gateway
        .set_subscription_attributes(&subscription_arn, "RawMessageDelivery", "true")
        .await
        .unwrap();
    assert_eq!(
        fake.last_call(),
        Some(ApiCall::SetSubscriptionAttributes(
            SetSubscriptionAttributesRequest {
                subscription_arn: subscription_arn.clone(),
                attribute_name: "RawMessageDelivery".to_string(),
                attribute_value: "true".to_string(),
            }
        ))
    );

    let attributes = gateway
        .get_subscription_attributes(&subscription_arn)
        .await
        .unwrap();
    assert_eq!(
        attributes.get("RawMessageDelivery").map(String::as_str),
        Some("true")
    );
    assert_eq!(
        fake.last_call(),
        Some(ApiCall::GetSubscriptionAttributes(
            GetSubscriptionAttributesRequest { subscription_arn }
        ))
    );
}

#[tokio::test]
async fn add_permission_forwards_principals_and_actions() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    gateway
        .add_permission(
            "arn:topic:1",
            "publisher-access",
            vec!["111122223333".to_string()],
            vec!["Publish".to_string(), "Subscribe".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(
        fake.last_call(),
        Some(ApiCall::AddPermission(AddPermissionRequest {
            topic_arn: "arn:topic:1".to_string(),
            label: "publisher-access".to_string(),
            aws_account_ids: vec!["111122223333".to_string()],
            action_names: vec!["Publish".to_string(), "Subscribe".to_string()],
        }))
    );

    gateway
        .remove_permission("arn:topic:1", "publisher-access")
        .await
        .unwrap();
    // removing the same label again is a service-side error
    let err = gateway
        .remove_permission("arn:topic:1", "publisher-access")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("NotFound"));
}

#[tokio::test]
async fn lambda_channel_produces_exact_attribute_mapping() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    gateway
        .publish_to(
            Channel::Lambda {
                topic_arn: "arn:topic:1".to_string(),
                function_arn: "arn:lambda:fn".to_string(),
            },
            "hello",
        )
        .await
        .unwrap();

    let Some(ApiCall::Publish(request)) = fake.last_call() else {
        panic!("expected a publish request");
    };
    assert_eq!(request.message_structure.as_deref(), Some("json"));
    assert_eq!(request.message_attributes.len(), 1);
    assert_eq!(
        request.message_attributes.get("Lambda.Function.Name"),
        Some(&MessageAttributeValue::string("arn:lambda:fn"))
    );
}

#[tokio::test]
async fn email_channel_defaults_subject_and_attaches_address() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    gateway
        .publish_to(
            Channel::Email {
                topic_arn: "arn:topic:1".to_string(),
                address: "a@b.com".to_string(),
                subject: None,
            },
            "body",
        )
        .await
        .unwrap();

    let Some(ApiCall::Publish(request)) = fake.last_call() else {
        panic!("expected a publish request");
    };
    assert_eq!(request.subject.as_deref(), Some(DEFAULT_EMAIL_SUBJECT));
    assert_eq!(
        request.message_attributes.get("EmailAddress"),
        Some(&MessageAttributeValue::string("a@b.com"))
    );
}

#[tokio::test]
async fn sms_channel_publishes_without_a_topic() {
    let (gateway, fake) = gateway_with_fake();

    let receipt = gateway
        .publish_to(
            Channel::Sms {
                phone_number: "+15550100".to_string(),
                sender_id: "Orders".to_string(),
            },
            "hello",
        )
        .await
        .unwrap();
    assert!(!receipt.is_empty());

    let Some(ApiCall::Publish(request)) = fake.last_call() else {
        panic!("expected a publish request");
    };
    assert_eq!(request.topic_arn, None);
    assert_eq!(request.phone_number.as_deref(), Some("+15550100"));
}

#[tokio::test]
async fn errors_propagate_unchanged() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");

    let scripted = ServiceError::new("Throttling", "Rate exceeded");
    fake.fail_next(scripted.clone());

    let err = gateway.publish("arn:topic:1", "hello").await.unwrap_err();
    assert_eq!(err, scripted);
}

#[tokio::test]
async fn list_topics_is_idempotent_against_unchanged_backend() {
    let (gateway, fake) = gateway_with_fake();
    fake.seed_topic("arn:topic:1");
    fake.seed_topic("arn:topic:2");

    let first = gateway.list_topics().await.unwrap();
    let second = gateway.list_topics().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn construction_with_empty_credentials_does_not_fail() {
    // Empty credentials defer failure to the first operation; building the
    // gateway itself must succeed.
    let _gateway = SnsGateway::with_config(SnsConfig::default()).await;
}

//! Notification gateway facade over AWS SNS
//!
//! Exposes publish, subscribe, topic/subscription management and permission
//! operations as typed async methods. Every method builds one parameter
//! record, forwards it unchanged to the underlying service client, and
//! returns that call's result or error verbatim. Delivery, ordering, retry
//! and fan-out are all owned by the service, never by this crate.
//!
//! The service client sits behind the [`SnsApi`] trait so tests can inject
//! a double in place of the real SDK client.
//!
//! # Example
//!
//! ```no_run
//! use snsgate::{Channel, SnsGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = SnsGateway::from_env().await;
//!
//!     let topic_arn = gateway.create_topic("orders").await?;
//!     gateway.publish(&topic_arn, "order 42 shipped").await?;
//!
//!     gateway
//!         .publish_to(
//!             Channel::Sms {
//!                 phone_number: "+15550100".to_string(),
//!                 sender_id: "Orders".to_string(),
//!             },
//!             "order 42 shipped",
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod aws;
pub mod channel;
pub mod gateway;

pub use api::{
    AddPermissionRequest, AttributeMap, ConfirmSubscriptionRequest, CreateTopicRequest,
    DeleteTopicRequest, GetSubscriptionAttributesRequest, GetTopicAttributesRequest,
    ListSubscriptionsByTopicRequest, MessageAttributeValue, MessageAttributes, PublishRequest,
    RemovePermissionRequest, SetSubscriptionAttributesRequest, SetTopicAttributesRequest, SnsApi,
    SubscribeRequest, SubscriptionSummary, Tag, UnsubscribeRequest,
};
pub use aws::AwsSns;
pub use channel::{Channel, DEFAULT_EMAIL_SUBJECT};
pub use gateway::SnsGateway;
pub use snsgate_core::{ConfigError, ServiceError, SnsConfig};

//! Channel descriptors for the parameterized publish path
//!
//! Each delivery channel is one variant carrying its addressing fields and
//! producing the fixed attribute mapping the service expects for that
//! channel. This replaces per-channel publish methods: the gateway has one
//! publish function taking a [`Channel`].

use crate::api::{MessageAttributeValue, MessageAttributes, PublishRequest};

/// Subject used for email publishes when the caller supplies none.
pub const DEFAULT_EMAIL_SUBJECT: &str = "Notification";

const ATTR_LAMBDA_FUNCTION_NAME: &str = "Lambda.Function.Name";
const ATTR_QUEUE_URL: &str = "QueueUrl";
const ATTR_EMAIL_ADDRESS: &str = "EmailAddress";
const ATTR_SMS_TYPE: &str = "AWS.SNS.SMS.SMSType";
const ATTR_SMS_SENDER_ID: &str = "AWS.SNS.SMS.SenderID";
const ATTR_SMS_MAX_PRICE: &str = "AWS.SNS.SMS.MaxPrice";
const ATTR_MPNS_TYPE: &str = "AWS.SNS.MOBILE.MPNS.Type";
const ATTR_MPNS_NOTIFICATION_CLASS: &str = "AWS.SNS.MOBILE.MPNS.NotificationClass";
const ATTR_MPNS_DEVICE_STATUS: &str = "AWS.SNS.MOBILE.MPNS.DeviceConnectionStatus";
const ATTR_MPNS_ENDPOINT: &str = "AWS.SNS.MOBILE.MPNS.WindowsLiveEndpoint";

const SMS_TYPE_TRANSACTIONAL: &str = "Transactional";
const SMS_MAX_PRICE: &str = "0.50";

/// Delivery channel descriptor: the destination plus the channel-specific
/// addressing that becomes the message attribute mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    /// JSON-structured publish to a topic with HTTP/S subscribers.
    Http { topic_arn: String },
    /// Publish targeting a Lambda function subscriber.
    Lambda {
        topic_arn: String,
        function_arn: String,
    },
    /// Publish targeting a queue subscriber.
    Queue { topic_arn: String, queue_url: String },
    /// Direct SMS to a phone number, no topic involved.
    Sms {
        phone_number: String,
        sender_id: String,
    },
    /// Text publish to a topic with an email subscriber.
    Email {
        topic_arn: String,
        address: String,
        /// Defaults to [`DEFAULT_EMAIL_SUBJECT`] when `None`.
        subject: Option<String>,
    },
    /// Mobile push through a platform endpoint subscriber.
    PlatformEndpoint {
        topic_arn: String,
        endpoint_arn: String,
        subject: String,
    },
}

impl Channel {
    /// Build the publish parameter record for this channel.
    pub fn into_request(self, message: impl Into<String>) -> PublishRequest {
        let message = message.into();
        match self {
            Channel::Http { topic_arn } => PublishRequest {
                topic_arn: Some(topic_arn),
                message,
                message_structure: Some("json".to_string()),
                ..PublishRequest::default()
            },
            Channel::Lambda {
                topic_arn,
                function_arn,
            } => {
                let mut attributes = MessageAttributes::new();
                attributes.insert(
                    ATTR_LAMBDA_FUNCTION_NAME.to_string(),
                    MessageAttributeValue::string(function_arn),
                );
                PublishRequest {
                    topic_arn: Some(topic_arn),
                    message,
                    message_structure: Some("json".to_string()),
                    message_attributes: attributes,
                    ..PublishRequest::default()
                }
            }
            Channel::Queue {
                topic_arn,
                queue_url,
            } => {
                let mut attributes = MessageAttributes::new();
                attributes.insert(
                    ATTR_QUEUE_URL.to_string(),
                    MessageAttributeValue::string(queue_url),
                );
                PublishRequest {
                    topic_arn: Some(topic_arn),
                    message,
                    message_structure: Some("json".to_string()),
                    message_attributes: attributes,
                    ..PublishRequest::default()
                }
            }
            Channel::Sms {
                phone_number,
                sender_id,
            } => {
                let mut attributes = MessageAttributes::new();
                attributes.insert(
                    ATTR_SMS_TYPE.to_string(),
                    MessageAttributeValue::string(SMS_TYPE_TRANSACTIONAL),
                );
                attributes.insert(
                    ATTR_SMS_SENDER_ID.to_string(),
                    MessageAttributeValue::string(sender_id),
                );
                attributes.insert(
                    ATTR_SMS_MAX_PRICE.to_string(),
                    MessageAttributeValue::number(SMS_MAX_PRICE),
                );
                PublishRequest {
                    phone_number: Some(phone_number),
                    message,
                    message_attributes: attributes,
                    ..PublishRequest::default()
                }
            }
            Channel::Email {
                topic_arn,
                address,
                subject,
            } => {
                let mut attributes = MessageAttributes::new();
                attributes.insert(
                    ATTR_EMAIL_ADDRESS.to_string(),
                    MessageAttributeValue::string(address),
                );
                PublishRequest {
                    topic_arn: Some(topic_arn),
                    message,
                    subject: Some(subject.unwrap_or_else(|| DEFAULT_EMAIL_SUBJECT.to_string())),
                    message_structure: Some("text".to_string()),
                    message_attributes: attributes,
                    ..PublishRequest::default()
                }
            }
            Channel::PlatformEndpoint {
                topic_arn,
                endpoint_arn,
                subject,
            } => {
                let mut attributes = MessageAttributes::new();
                attributes.insert(
                    ATTR_MPNS_TYPE.to_string(),
                    MessageAttributeValue::string("token"),
                );
                attributes.insert(
                    ATTR_MPNS_NOTIFICATION_CLASS.to_string(),
                    MessageAttributeValue::string("realtime"),
                );
                attributes.insert(
                    ATTR_MPNS_DEVICE_STATUS.to_string(),
                    MessageAttributeValue::string("connected"),
                );
                attributes.insert(
                    ATTR_MPNS_ENDPOINT.to_string(),
                    MessageAttributeValue::string(endpoint_arn),
                );
                PublishRequest {
                    topic_arn: Some(topic_arn),
                    message,
                    subject: Some(subject),
                    message_attributes: attributes,
                    ..PublishRequest::default()
                }
            }
        }
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The `{success, data | message}` envelope every endpoint answers with.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Envelope without a data payload.
pub type ApiMessage = ApiResponse<serde_json::Value>;

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_envelope_omits_data() {
        let body = serde_json::to_value(ApiMessage::failure("Invalid action")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Invalid action" })
        );
    }

    #[test]
    fn failure_envelope_reads_back_without_data() {
        let envelope: ApiResponse<crate::models::Product> = serde_json::from_value(
            serde_json::json!({ "success": false, "message": "Product not found" }),
        )
        .unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Product not found"));
    }

    #[test]
    fn data_envelope_omits_message() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": [1, 2] }));
    }
}

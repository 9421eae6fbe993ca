//! API response envelope

use serde::{Deserialize, Serialize};

/// Standard Cloudflare API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    pub result: Option<T>,
    pub result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    pub fn total_pages(&self) -> Option<u32> {
        self.result_info.as_ref().and_then(|info| info.total_pages)
    }
}

/// API error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i32,
    pub message: String,
}

/// API message
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub code: Option<i32>,
    pub message: String,
}

/// Pagination info
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultInfo {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total_pages: Option<u32>,
    pub count: Option<u32>,
    pub total_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn decodes_paged_envelope() {
        let body = r#"{
            "success": true,
            "errors": [],
            "messages": [],
            "result": [{"id": "a"}, {"id": "b"}],
            "result_info": {"page": 1, "per_page": 50, "total_pages": 3, "count": 2, "total_count": 102}
        }"#;
        let response: ApiResponse<Vec<Value>> = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.total_pages(), Some(3));
        assert_eq!(response.result.unwrap().len(), 2);
    }

    #[test]
    fn decodes_error_envelope_without_result() {
        let body = r#"{"success": false, "errors": [{"code": 9109, "message": "Invalid access token"}]}"#;
        let response: ApiResponse<Value> = serde_json::from_str(body).unwrap();
        assert!(!response.success);
        assert_eq!(response.errors[0].message, "Invalid access token");
        assert!(response.result.is_none());
        assert_eq!(response.total_pages(), None);
    }
}

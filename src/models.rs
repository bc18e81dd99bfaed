//! Request, payload and response shapes for the incident service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User contact details attached to a submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserData {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Incident category selected by the citizen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub text: String,
    pub image_url: String,
    /// Fixed description used when no custom text is supplied.
    pub event_call_desc: String,
}

/// Street and house number information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreetNumber {
    pub id: i64,
    pub name: String,
    pub image_url: String,
    pub house_number: String,
}

/// Base64-encoded image evidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageFile {
    pub filename: String,
    pub content_type: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Base64 encoded file data.
    pub data: String,
}

/// Complete inbound submission request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentSubmissionRequest {
    pub user_data: UserData,
    pub category: Category,
    pub street: StreetNumber,
    #[serde(default)]
    pub custom_text: Option<String>,
    #[serde(default)]
    pub extra_files: Option<ImageFile>,
}

/// Flat payload shape expected by the SharePoint endpoint.
///
/// Field names are part of the wire contract and must serialize exactly as
/// written here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiPayload {
    #[serde(rename = "eventCallSourceId")]
    pub event_call_source_id: i64,
    #[serde(rename = "cityCode")]
    pub city_code: String,
    #[serde(rename = "cityDesc")]
    pub city_desc: String,
    #[serde(rename = "eventCallCenterId")]
    pub event_call_center_id: String,
    #[serde(rename = "eventCallDesc")]
    pub event_call_desc: String,
    #[serde(rename = "streetCode")]
    pub street_code: String,
    #[serde(rename = "streetDesc")]
    pub street_desc: String,
    #[serde(rename = "houseNumber")]
    pub house_number: String,
    #[serde(rename = "callerFirstName")]
    pub caller_first_name: String,
    #[serde(rename = "callerLastName")]
    pub caller_last_name: String,
    #[serde(rename = "callerTZ")]
    pub caller_tz: String,
    #[serde(rename = "callerPhone1")]
    pub caller_phone1: String,
    #[serde(rename = "callerEmail")]
    pub caller_email: String,
    #[serde(rename = "contactUsType")]
    pub contact_us_type: String,
}

/// JSON response shape returned by the SharePoint endpoint (and the mock).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ErrorDescription", default)]
    pub error_description: String,
    #[serde(rename = "ResultStatus", default)]
    pub result_status: String,
    #[serde(default)]
    pub data: String,
}

impl ApiResponse {
    pub fn success(ticket_id: impl Into<String>) -> Self {
        Self {
            result_code: 200,
            error_description: String::new(),
            result_status: "SUCCESS CREATE".to_string(),
            data: ticket_id.into(),
        }
    }

    pub fn error(code: i64, description: impl Into<String>) -> Self {
        Self {
            result_code: code,
            error_description: description.into(),
            result_status: "ERROR".to_string(),
            data: String::new(),
        }
    }
}

/// Echo of the validated attachment returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileInfo {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub ticket_id: String,
    pub correlation_id: String,
    pub has_file: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_payload_serializes_wire_field_names() {
        let payload = ApiPayload {
            event_call_source_id: 4,
            city_code: "7400".to_string(),
            city_desc: "נתניה".to_string(),
            event_call_center_id: "3".to_string(),
            event_call_desc: "בור בכביש".to_string(),
            street_code: "898".to_string(),
            street_desc: "קרל פופר".to_string(),
            house_number: "12א".to_string(),
            caller_first_name: "דנה".to_string(),
            caller_last_name: "לוי".to_string(),
            caller_tz: String::new(),
            caller_phone1: "0501234567".to_string(),
            caller_email: String::new(),
            contact_us_type: "3".to_string(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["eventCallSourceId"], 4);
        assert_eq!(json["cityCode"], "7400");
        assert_eq!(json["callerTZ"], "");
        assert_eq!(json["callerPhone1"], "0501234567");
        assert_eq!(json["houseNumber"], "12א");
        // Hebrew text survives serialization unescaped
        assert_eq!(json["eventCallDesc"], "בור בכביש");
    }

    #[test]
    fn api_response_parses_upstream_shape() {
        let body = r#"{"ResultCode":200,"ErrorDescription":"","ResultStatus":"SUCCESS CREATE","data":"NETANYA-2025-000123"}"#;
        let response: ApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.result_code, 200);
        assert_eq!(response.data, "NETANYA-2025-000123");
    }

    #[test]
    fn incident_request_optional_fields_default() {
        let body = r#"{
            "user_data": {"first_name": "דנה", "last_name": "לוי", "phone": "0501234567"},
            "category": {"id": 1, "name": "roads", "text": "roads", "image_url": "", "event_call_desc": "מפגע בכביש"},
            "street": {"id": 1, "name": "קרל פופר", "image_url": "", "house_number": "5"}
        }"#;
        let request: IncidentSubmissionRequest = serde_json::from_str(body).unwrap();
        assert!(request.custom_text.is_none());
        assert!(request.extra_files.is_none());
        assert!(request.user_data.user_id.is_none());
    }
}

//! Transformation of inbound submissions into the fixed SharePoint payload.

use crate::constants::MunicipalityConfig;
use crate::error::Result;
use crate::models::{ApiPayload, IncidentSubmissionRequest};
use tracing::info;

/// Transforms incident requests into the SharePoint payload format.
#[derive(Debug, Default)]
pub struct PayloadTransformer {
    config: MunicipalityConfig,
}

impl PayloadTransformer {
    pub fn new() -> Self {
        Self::with_config(MunicipalityConfig::default())
    }

    pub fn with_config(config: MunicipalityConfig) -> Self {
        Self { config }
    }

    /// Build the outbound payload. Deterministic: the same request always
    /// produces an identical payload. Shapes are pre-validated by request
    /// parsing upstream, so no field is rejected here; `Transformation` is
    /// reserved for serialization invariant violations at the service layer.
    pub fn transform(&self, request: &IncidentSubmissionRequest) -> Result<ApiPayload> {
        let event_call_desc = self.event_call_description(request);

        let payload = ApiPayload {
            event_call_source_id: self.config.event_call_source_id,
            city_code: self.config.city_code.to_string(),
            city_desc: self.config.city_desc.to_string(),
            event_call_center_id: self.config.event_call_center_id.to_string(),
            street_code: self.config.street_code.to_string(),
            street_desc: self.config.street_desc.to_string(),
            contact_us_type: self.config.contact_us_type.to_string(),

            event_call_desc,
            house_number: request.street.house_number.clone(),
            caller_first_name: request.user_data.first_name.clone(),
            caller_last_name: request.user_data.last_name.clone(),
            caller_phone1: request.user_data.phone.clone(),
            caller_tz: request.user_data.user_id.clone().unwrap_or_default(),
            caller_email: request.user_data.email.clone().unwrap_or_default(),
        };

        info!(
            caller = %format!("{} {}", request.user_data.first_name, request.user_data.last_name),
            category = %request.category.name,
            house_number = %request.street.house_number,
            "Transformed incident request"
        );

        Ok(payload)
    }

    /// Custom text takes priority over the category description; whitespace-only
    /// custom text counts as absent.
    fn event_call_description(&self, request: &IncidentSubmissionRequest) -> String {
        match &request.custom_text {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => request.category.event_call_desc.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, StreetNumber, UserData};

    fn request(custom_text: Option<&str>) -> IncidentSubmissionRequest {
        IncidentSubmissionRequest {
            user_data: UserData {
                first_name: "דנה".to_string(),
                last_name: "לוי".to_string(),
                phone: "0501234567".to_string(),
                user_id: None,
                email: None,
            },
            category: Category {
                id: 2,
                name: "roads".to_string(),
                text: "מפגעי כבישים".to_string(),
                image_url: String::new(),
                event_call_desc: "מפגע תשתית בכביש".to_string(),
            },
            street: StreetNumber {
                id: 898,
                name: "קרל פופר".to_string(),
                image_url: String::new(),
                house_number: "12א".to_string(),
            },
            custom_text: custom_text.map(|s| s.to_string()),
            extra_files: None,
        }
    }

    #[test]
    fn constant_fields_are_fixed_regardless_of_input() {
        let transformer = PayloadTransformer::new();
        let payload = transformer.transform(&request(Some("anything"))).unwrap();
        assert_eq!(payload.event_call_source_id, 4);
        assert_eq!(payload.city_code, "7400");
        assert_eq!(payload.city_desc, "נתניה");
        assert_eq!(payload.event_call_center_id, "3");
        assert_eq!(payload.street_code, "898");
        assert_eq!(payload.street_desc, "קרל פופר");
        assert_eq!(payload.contact_us_type, "3");
    }

    #[test]
    fn custom_text_takes_priority_verbatim_after_trim() {
        let transformer = PayloadTransformer::new();
        let payload = transformer.transform(&request(Some("בור בכביש"))).unwrap();
        assert_eq!(payload.event_call_desc, "בור בכביש");

        let padded = transformer.transform(&request(Some("  בור בכביש  "))).unwrap();
        assert_eq!(padded.event_call_desc, "בור בכביש");
    }

    #[test]
    fn blank_custom_text_falls_back_to_category_description() {
        let transformer = PayloadTransformer::new();
        for text in [None, Some(""), Some("   ")] {
            let payload = transformer.transform(&request(text)).unwrap();
            assert_eq!(payload.event_call_desc, "מפגע תשתית בכביש");
        }
    }

    #[test]
    fn optional_caller_fields_default_to_empty_string() {
        let transformer = PayloadTransformer::new();
        let payload = transformer.transform(&request(None)).unwrap();
        assert_eq!(payload.caller_tz, "");
        assert_eq!(payload.caller_email, "");

        let mut with_ids = request(None);
        with_ids.user_data.user_id = Some("123456789".to_string());
        with_ids.user_data.email = Some("dana@example.com".to_string());
        let payload = transformer.transform(&with_ids).unwrap();
        assert_eq!(payload.caller_tz, "123456789");
        assert_eq!(payload.caller_email, "dana@example.com");
    }

    #[test]
    fn house_number_passes_through_verbatim() {
        let transformer = PayloadTransformer::new();
        let payload = transformer.transform(&request(None)).unwrap();
        assert_eq!(payload.house_number, "12א");
    }

    #[test]
    fn transformation_is_idempotent() {
        let transformer = PayloadTransformer::new();
        let request = request(Some("שכנים רועשים"));
        let first = serde_json::to_string(&transformer.transform(&request).unwrap()).unwrap();
        for _ in 0..5 {
            let next = serde_json::to_string(&transformer.transform(&request).unwrap()).unwrap();
            assert_eq!(first, next);
        }
    }
}

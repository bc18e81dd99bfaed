//! Assembly of the browser-identical multipart/form-data body.
//!
//! The upstream endpoint inspects requests for a WebKit-shaped boundary and an
//! exact part layout: one `json` form field, then an optional binary file
//! part. Byte order and CRLF sequencing are part of the contract.

use crate::error::Result;
use crate::models::ApiPayload;
use crate::validation::MultipartFile;
use rand::rngs::OsRng;
use rand::RngCore;

/// Multipart request data ready for submission.
#[derive(Debug, Clone)]
pub struct MultipartRequest {
    pub boundary: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Generate a WebKit-style boundary: `----WebKitFormBoundary` followed by 16
/// lowercase hex characters from OS entropy. Unique per call.
pub fn generate_webkit_boundary() -> String {
    let mut random = [0u8; 8];
    OsRng.fill_bytes(&mut random);
    format!("----WebKitFormBoundary{}", hex::encode(random))
}

/// Build the multipart body for a payload and optional attachment.
///
/// The payload is serialized as single-line UTF-8 JSON (Hebrew text preserved
/// unescaped), so it cannot collide with the boundary.
pub fn build_multipart_request(
    payload: &ApiPayload,
    file: Option<&MultipartFile>,
) -> Result<MultipartRequest> {
    let boundary = generate_webkit_boundary();
    let content_type = format!("multipart/form-data; boundary={}", boundary);

    let json_data = serde_json::to_string(payload)?;

    let mut body: Vec<u8> = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"json\"\r\n\r\n{json_data}\r\n"
        )
        .as_bytes(),
    );

    match file {
        Some(file) => {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    file.field_name, file.filename, file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(&file.data);
            body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        }
        None => {
            body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        }
    }

    Ok(MultipartRequest {
        boundary,
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MunicipalityConfig;
    use crate::models::{Category, IncidentSubmissionRequest, StreetNumber, UserData};
    use crate::transform::PayloadTransformer;

    fn sample_payload() -> ApiPayload {
        let request = IncidentSubmissionRequest {
            user_data: UserData {
                first_name: "דנה".to_string(),
                last_name: "לוי".to_string(),
                phone: "0501234567".to_string(),
                user_id: None,
                email: None,
            },
            category: Category {
                id: 1,
                name: "noise".to_string(),
                text: "רעש".to_string(),
                image_url: String::new(),
                event_call_desc: "מטרד רעש".to_string(),
            },
            street: StreetNumber {
                id: 898,
                name: "קרל פופר".to_string(),
                image_url: String::new(),
                house_number: "7".to_string(),
            },
            custom_text: None,
            extra_files: None,
        };
        PayloadTransformer::with_config(MunicipalityConfig::default())
            .transform(&request)
            .unwrap()
    }

    #[test]
    fn boundary_has_webkit_shape_and_is_unique() {
        let first = generate_webkit_boundary();
        let second = generate_webkit_boundary();
        assert_ne!(first, second);
        for boundary in [&first, &second] {
            let hex_part = boundary
                .strip_prefix("----WebKitFormBoundary")
                .expect("WebKit prefix");
            assert_eq!(hex_part.len(), 16);
            assert!(hex_part
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn body_without_file_round_trips_json_part() {
        let payload = sample_payload();
        let request = build_multipart_request(&payload, None).unwrap();

        let text = String::from_utf8(request.body.clone()).unwrap();
        assert_eq!(
            text.matches("Content-Disposition: form-data; name=\"json\"")
                .count(),
            1
        );
        assert!(text.starts_with(&format!("--{}\r\n", request.boundary)));
        assert!(text.ends_with(&format!("--{}--\r\n", request.boundary)));
        assert_eq!(
            request.content_type,
            format!("multipart/form-data; boundary={}", request.boundary)
        );

        // Extract the JSON section body and deserialize it back
        let json_start = text.find("\r\n\r\n").unwrap() + 4;
        let json_end = text[json_start..].find("\r\n").unwrap() + json_start;
        let parsed: ApiPayload = serde_json::from_str(&text[json_start..json_end]).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn json_part_preserves_hebrew_unescaped() {
        let payload = sample_payload();
        let request = build_multipart_request(&payload, None).unwrap();
        let text = String::from_utf8(request.body).unwrap();
        assert!(text.contains("נתניה"));
        assert!(text.contains("קרל פופר"));
        assert!(!text.contains("\\u05"));
    }

    #[test]
    fn body_with_file_appends_single_binary_part() {
        let payload = sample_payload();
        let file = MultipartFile {
            field_name: "attachment".to_string(),
            filename: "pothole.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: vec![0xFF, 0xD8, 0xFF, 0x00, 0x01],
        };
        let request = build_multipart_request(&payload, Some(&file)).unwrap();

        let text = String::from_utf8_lossy(&request.body);
        assert_eq!(text.matches("Content-Disposition").count(), 2);
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"attachment\"; filename=\"pothole.jpg\""
        ));
        assert!(text.contains("Content-Type: image/jpeg"));
        assert!(text.ends_with(&format!("--{}--\r\n", request.boundary)));

        // Raw bytes are embedded untouched between the file headers and the
        // closing boundary
        let header_end = find_subslice(&request.body, b"Content-Type: image/jpeg\r\n\r\n").unwrap()
            + b"Content-Type: image/jpeg\r\n\r\n".len();
        assert_eq!(
            &request.body[header_end..header_end + file.data.len()],
            file.data.as_slice()
        );
    }

    #[test]
    fn crlf_sequencing_is_exact() {
        let payload = sample_payload();
        let request = build_multipart_request(&payload, None).unwrap();
        let text = String::from_utf8(request.body).unwrap();
        // No bare LF line endings anywhere in the framing
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                assert_eq!(text.as_bytes()[i - 1], b'\r', "bare LF at offset {}", i);
            }
        }
    }

    fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }
}

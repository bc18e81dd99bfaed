//! Attachment validation and multipart file preparation.

use crate::constants::{ATTACHMENT_FIELD_NAME, MAX_FILE_SIZE};
use crate::error::{Result, ServiceError};
use crate::models::ImageFile;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;

/// Supported image MIME types.
pub const SUPPORTED_FORMATS: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

static BASE64_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").expect("valid base64 pattern"));

/// Result of file validation. All applicable errors are collected rather than
/// short-circuiting on the first.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Prepared file for multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartFile {
    pub field_name: String,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Validates image files and prepares them for upload.
#[derive(Debug, Default)]
pub struct FileValidationService;

impl FileValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Validate an image file for upload. Expected validation failures are
    /// reported in the result, never as an `Err`.
    pub fn validate_file(&self, image_file: &ImageFile) -> ValidationResult {
        let mut errors = Vec::new();

        if !Self::is_supported_format(&image_file.content_type) {
            let mut supported: Vec<&str> = SUPPORTED_FORMATS.to_vec();
            supported.sort_unstable();
            errors.push(format!(
                "Unsupported file format: {}. Supported formats: {}",
                image_file.content_type,
                supported.join(", ")
            ));
        }

        if !Self::is_valid_size(image_file.size) {
            if image_file.size == 0 {
                errors.push("File is empty".to_string());
            } else {
                errors.push(format!(
                    "File size ({} bytes) exceeds maximum allowed size of {}MB",
                    image_file.size,
                    MAX_FILE_SIZE / (1024 * 1024)
                ));
            }
        }

        if !Self::is_valid_base64(&image_file.data) {
            errors.push("Invalid base64 encoded data".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Decode a validated file into raw bytes for multipart embedding.
    /// A decode failure here is a hard validation error distinct from the
    /// pre-check above.
    pub fn prepare_multipart_file(&self, image_file: &ImageFile) -> Result<MultipartFile> {
        let data = BASE64.decode(&image_file.data).map_err(|e| {
            ServiceError::Validation(format!("Failed to prepare multipart file: {}", e))
        })?;

        Ok(MultipartFile {
            field_name: ATTACHMENT_FIELD_NAME.to_string(),
            filename: image_file.filename.clone(),
            content_type: image_file.content_type.clone(),
            data,
        })
    }

    fn is_supported_format(content_type: &str) -> bool {
        SUPPORTED_FORMATS.contains(&content_type)
    }

    fn is_valid_size(size: u64) -> bool {
        size > 0 && size <= MAX_FILE_SIZE
    }

    fn is_valid_base64(data: &str) -> bool {
        if data.is_empty() {
            return false;
        }
        BASE64_PATTERN.is_match(data) && BASE64.decode(data).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(content_type: &str, size: u64, data: &str) -> ImageFile {
        ImageFile {
            filename: "evidence.png".to_string(),
            content_type: content_type.to_string(),
            size,
            data: data.to_string(),
        }
    }

    #[test]
    fn accepts_png_with_valid_base64() {
        let service = FileValidationService::new();
        let result = service.validate_file(&image("image/png", 1024, "aGVsbG8="));
        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn rejects_unsupported_content_type() {
        let service = FileValidationService::new();
        let result = service.validate_file(&image("application/pdf", 1024, "aGVsbG8="));
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("application/pdf"));
        assert!(result.errors[0].contains("image/png"));
    }

    #[test]
    fn size_boundary_at_exactly_ten_megabytes() {
        let service = FileValidationService::new();
        assert!(
            service
                .validate_file(&image("image/png", 10_485_760, "aGVsbG8="))
                .is_valid
        );

        let over = service.validate_file(&image("image/png", 10_485_761, "aGVsbG8="));
        assert!(!over.is_valid);
        assert!(over.errors[0].contains("10485761"));
        assert!(over.errors[0].contains("10MB"));
    }

    #[test]
    fn zero_size_reports_empty_file() {
        let service = FileValidationService::new();
        let result = service.validate_file(&image("image/png", 0, "aGVsbG8="));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e == "File is empty"));
    }

    #[test]
    fn rejects_malformed_base64() {
        let service = FileValidationService::new();
        let result = service.validate_file(&image("image/png", 100, "not base64 !!!"));
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e == "Invalid base64 encoded data"));
    }

    #[test]
    fn collects_all_applicable_errors() {
        let service = FileValidationService::new();
        let result = service.validate_file(&image("application/pdf", 0, "???"));
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn prepare_decodes_base64_into_bytes() {
        let service = FileValidationService::new();
        let file = service
            .prepare_multipart_file(&image("image/png", 5, "aGVsbG8="))
            .unwrap();
        assert_eq!(file.field_name, "attachment");
        assert_eq!(file.filename, "evidence.png");
        assert_eq!(file.data, b"hello");
    }

    #[test]
    fn prepare_rejects_undecodable_data() {
        let service = FileValidationService::new();
        let err = service
            .prepare_multipart_file(&image("image/png", 5, "!!!"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}

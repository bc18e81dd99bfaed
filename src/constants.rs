//! Fixed municipality values and upstream endpoint constants.

/// Default SharePoint endpoint for incident creation.
pub const DEFAULT_NETANYA_ENDPOINT: &str =
    "https://www.netanya.muni.il/_layouts/15/NetanyaMuni/incidents.ashx?method=CreateNewIncident";

/// Public complaints page, used as the Referer on submissions.
pub const COMPLAINTS_PAGE_URL: &str =
    "https://www.netanya.muni.il/CityHall/ServicesInnovation/Pages/PublicComplaints.aspx";

/// Public services page visited during best-effort session warmup.
pub const SERVICES_PAGE_URL: &str =
    "https://www.netanya.muni.il/CityHall/ServicesInnovation/Pages/default.aspx";

/// Origin header required by the upstream edge proxy.
pub const MUNICIPALITY_ORIGIN: &str = "https://www.netanya.muni.il";

/// Browser-profile User-Agent sent on warmup GETs and the submission POST.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

/// Maximum accepted attachment size in bytes (10MB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Inbound request body ceiling: a 10MB attachment arrives base64-encoded
/// inside the JSON envelope, so the raw body can reach ~14MB.
pub const MAX_REQUEST_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Multipart field name for the file attachment part.
pub const ATTACHMENT_FIELD_NAME: &str = "attachment";

/// Fixed municipality values injected into every outbound payload.
#[derive(Debug, Clone)]
pub struct MunicipalityConfig {
    pub event_call_source_id: i64,
    pub city_code: &'static str,
    pub city_desc: &'static str,
    pub event_call_center_id: &'static str,
    pub street_code: &'static str,
    pub street_desc: &'static str,
    pub contact_us_type: &'static str,
}

impl Default for MunicipalityConfig {
    fn default() -> Self {
        Self {
            event_call_source_id: 4,
            city_code: "7400",
            city_desc: "נתניה",
            event_call_center_id: "3",
            street_code: "898",
            street_desc: "קרל פופר",
            contact_us_type: "3",
        }
    }
}

use serde::{Deserialize, Serialize};

/// View counter for a content item as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCount {
    pub id: String,
    pub views: u64,
}

// Payload of the `incrementViews` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementViewsResult {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<ViewCount>,
}

// Output of a fingerprint agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintResult {
    pub visitor_id: String,
    pub confidence: f32,
}

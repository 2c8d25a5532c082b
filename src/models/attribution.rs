use serde::{Deserialize, Serialize};

/// UI-facing snapshot of the attribution meter.
///
/// `human_percent` is derived as `100 - ai_percent` rather than computed
/// independently, so the two always sum to 100 when the document is
/// non-empty. Both are 0 on an empty document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionBreakdown {
    pub human_chars: usize,
    pub ai_chars: usize,
    pub ai_percent: u8,
    pub human_percent: u8,
}

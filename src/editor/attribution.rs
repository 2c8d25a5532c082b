use crate::models::AttributionBreakdown;

/// Running human/AI character accounting.
///
/// The ledger is advisory, not a live diff: it reconciles only on raw
/// document-change notifications and on suggestion apply. All length
/// delta from a document change is treated as human-authored, so a hand
/// edit inside AI-inserted text drifts the human share rather than
/// decrementing `ai_chars`. Known limitation of the approximation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributionLedger {
    human_chars: usize,
    ai_chars: usize,
}

impl AttributionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn human_chars(&self) -> usize {
        self.human_chars
    }

    pub fn ai_chars(&self) -> usize {
        self.ai_chars
    }

    /// Raw document-change notification: everything the AI is not already
    /// credited with counts as human.
    pub fn on_document_changed(&mut self, total_len: usize) {
        self.human_chars = total_len.saturating_sub(self.ai_chars);
    }

    /// A suggestion of `suggestion_len` characters was just applied,
    /// leaving the document at `total_after` characters.
    pub fn on_suggestion_applied(&mut self, suggestion_len: usize, total_after: usize) {
        self.ai_chars += suggestion_len;
        self.on_document_changed(total_after);
    }

    /// Zero-total-safe percentages that always sum to exactly 100 when
    /// the document is non-empty.
    pub fn percentages(&self) -> AttributionBreakdown {
        let total = self.human_chars + self.ai_chars;
        let ai_percent = if total == 0 {
            0
        } else {
            (self.ai_chars as f64 / total as f64 * 100.0).round() as u8
        };
        let human_percent = if total == 0 { 0 } else { 100 - ai_percent };

        AttributionBreakdown {
            human_chars: self.human_chars,
            ai_chars: self.ai_chars,
            ai_percent,
            human_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_conserve_total_length() {
        let mut ledger = AttributionLedger::new();

        for total in [0usize, 10, 100, 40, 40, 250] {
            ledger.on_document_changed(total);
            assert_eq!(ledger.human_chars() + ledger.ai_chars(), total);
        }

        ledger.on_suggestion_applied(30, 280);
        assert_eq!(ledger.human_chars() + ledger.ai_chars(), 280);
        assert_eq!(ledger.ai_chars(), 30);
    }

    #[test]
    fn apply_scenario_from_one_hundred_chars() {
        // Suggestion of 20 chars replaces a 10-char selection in a
        // 100-char document.
        let mut ledger = AttributionLedger::new();
        ledger.on_document_changed(100);
        ledger.on_suggestion_applied(20, 110);

        assert_eq!(ledger.ai_chars(), 20);
        assert_eq!(ledger.human_chars(), 90);
    }

    #[test]
    fn manual_edits_never_decrement_ai_share() {
        let mut ledger = AttributionLedger::new();
        ledger.on_document_changed(50);
        ledger.on_suggestion_applied(25, 75);

        // Writer deletes 40 chars, some of them AI-inserted. The whole
        // delta comes out of the human share.
        ledger.on_document_changed(35);
        assert_eq!(ledger.ai_chars(), 25);
        assert_eq!(ledger.human_chars(), 10);

        // Shrinking below the AI share floors the human share at zero.
        ledger.on_document_changed(5);
        assert_eq!(ledger.human_chars(), 0);
        assert_eq!(ledger.ai_chars(), 25);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let mut ledger = AttributionLedger::new();
        assert_eq!(ledger.percentages().ai_percent, 0);
        assert_eq!(ledger.percentages().human_percent, 0);

        ledger.on_document_changed(3);
        ledger.on_suggestion_applied(1, 4);
        let breakdown = ledger.percentages();
        // 1/4 = 25%, rounded.
        assert_eq!(breakdown.ai_percent, 25);
        assert_eq!(breakdown.human_percent, 75);

        // A ratio that does not divide evenly still sums to 100.
        let mut ledger = AttributionLedger::new();
        ledger.on_document_changed(2);
        ledger.on_suggestion_applied(1, 3);
        let breakdown = ledger.percentages();
        assert_eq!(breakdown.ai_percent, 33);
        assert_eq!(breakdown.human_percent, 67);
        assert_eq!(breakdown.ai_percent + breakdown.human_percent, 100);
    }
}

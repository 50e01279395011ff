/// Operations on a prescription beyond plain field updates.
#[derive(Debug, Clone)]
pub enum PrescriptionAction {
    /// Marks the prescription as handed out (`true`) or pending (`false`).
    SetRedeemed(bool),
}

/// Results from PrescriptionActions - variants match 1:1 with PrescriptionAction
#[derive(Debug, Clone, PartialEq)]
pub enum PrescriptionActionResult {
    /// The redeemed flag before the change.
    SetRedeemed { was_redeemed: bool },
}

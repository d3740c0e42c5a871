//! Partner inference from device naming conventions.

use super::models::Partner;

/// Ordered rules; the first rule with a matching keyword wins.
const PARTNER_RULES: &[(&[&str], Partner)] = &[
    (&["qualcomm", "cadmus", "qc"], Partner::Qualcomm),
    (&["strx"], Partner::Amd),
    (&["lnl"], Partner::Intel),
];

/// Classify a device identifier (usually a file name) by case-insensitive
/// keyword match.
pub fn classify(identifier: &str) -> Partner {
    let lower = identifier.to_lowercase();

    PARTNER_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, partner)| *partner)
        .unwrap_or(Partner::Unknown)
}

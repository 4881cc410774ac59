use sha2::{Digest, Sha256};

use crate::config::TargetKind;

/// Leading-character budget hashed for section targets. Keeps volatile page
/// regions further down (recommendation widgets, footers) out of the digest.
pub const SECTION_CHAR_BUDGET: usize = 40_000;

/// Which region of the normalized text feeds the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPolicy {
    /// Hash only the first `SECTION_CHAR_BUDGET` characters.
    Section,
    /// Hash the whole text.
    Full,
}

impl From<TargetKind> for RegionPolicy {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Section => RegionPolicy::Section,
            TargetKind::Full => RegionPolicy::Full,
        }
    }
}

/// Stable SHA-256 hex digest over the selected region. Identical normalized
/// input always produces an identical digest; collisions read as "no
/// change", an accepted false-negative risk.
pub fn fingerprint(text: &str, policy: RegionPolicy) -> String {
    let region = match policy {
        RegionPolicy::Section => leading_chars(text, SECTION_CHAR_BUDGET),
        RegionPolicy::Full => text,
    };
    let mut hasher = Sha256::new();
    hasher.update(region.as_bytes());
    hex::encode(hasher.finalize())
}

// Budget counts characters, not bytes; the cut always lands on a char
// boundary.
fn leading_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

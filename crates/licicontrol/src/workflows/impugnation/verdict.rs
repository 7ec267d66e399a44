use serde::{Deserialize, Serialize};

/// Conclusion of an impugnation review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Procedente,
    Improcedente,
    ParcialmenteProcedente,
    Undetermined,
}

impl Verdict {
    /// Reads the verdict out of free-text analysis. "IMPROCEDENTE" and "PARCIALMENTE
    /// PROCEDENTE" both contain "PROCEDENTE", so the longer forms are checked first.
    pub fn detect(analysis: &str) -> Self {
        let upper = analysis.to_uppercase();
        if upper.contains("PARCIALMENTE PROCEDENTE") {
            Verdict::ParcialmenteProcedente
        } else if upper.contains("IMPROCEDENTE") {
            Verdict::Improcedente
        } else if upper.contains("PROCEDENTE") {
            Verdict::Procedente
        } else {
            Verdict::Undetermined
        }
    }
}

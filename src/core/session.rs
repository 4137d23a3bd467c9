use serde::{Deserialize, Serialize};

/// Session the report is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub year: u16,
    pub grand_prix_name: String,
    /// Session code as shown in the selector: `FP1`, `FP2`, `FP3`, `Q`, `S`, `R`.
    pub session_type: String,
    pub event_name: String,
    /// Number of classified drivers, when the host knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_size: Option<usize>,
}

impl SessionMetadata {
    #[must_use]
    pub fn new(
        year: u16,
        grand_prix_name: impl Into<String>,
        session_type: impl Into<String>,
        event_name: impl Into<String>,
    ) -> Self {
        Self {
            year,
            grand_prix_name: grand_prix_name.into(),
            session_type: session_type.into(),
            event_name: event_name.into(),
            roster_size: None,
        }
    }

    #[must_use]
    pub fn with_roster_size(mut self, roster_size: usize) -> Self {
        self.roster_size = Some(roster_size);
        self
    }

    /// `F1_Report_<grandPrixName>_<sessionType>.<extension>`
    ///
    /// Spaces are kept; path-unsafe and control characters become `_`.
    #[must_use]
    pub fn report_filename(&self, extension: &str) -> String {
        format!(
            "F1_Report_{}_{}.{extension}",
            filename_part(&self.grand_prix_name),
            filename_part(&self.session_type)
        )
    }

    /// Cover line identifying the session, e.g. `2024 Monaco Grand Prix | Q`.
    #[must_use]
    pub fn session_line(&self) -> String {
        format!(
            "{} {} | {}",
            self.year, self.grand_prix_name, self.session_type
        )
    }
}

fn filename_part(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| {
            if ch.is_control() || matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                ch
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::SessionMetadata;

    #[test]
    fn filename_follows_report_pattern() {
        let session = SessionMetadata::new(2024, "Monaco", "Q", "Monaco Grand Prix");
        assert_eq!(session.report_filename("pdf"), "F1_Report_Monaco_Q.pdf");
    }

    #[test]
    fn filename_replaces_unsafe_characters() {
        let session = SessionMetadata::new(2024, "Emilia Romagna", "FP1/2", "x");
        assert_eq!(
            session.report_filename("pdf"),
            "F1_Report_Emilia Romagna_FP1_2.pdf"
        );
    }

    #[test]
    fn filename_keeps_spaces_in_grand_prix_name() {
        let session = SessionMetadata::new(2024, "Abu Dhabi", "R", "Abu Dhabi Grand Prix");
        assert_eq!(session.report_filename("pdf"), "F1_Report_Abu Dhabi_R.pdf");

        let session = SessionMetadata::new(2024, " Saudi Arabian ", "Q\t1", "x");
        assert_eq!(session.report_filename("pdf"), "F1_Report_Saudi Arabian_Q_1.pdf");
    }
}

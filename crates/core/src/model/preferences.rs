use serde::{Deserialize, Serialize};

/// Per-user email notification switches.
///
/// Saved as a whole record. A stored record missing some switches keeps the
/// ones it has and takes the defaults for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub new_lessons: bool,
    pub progress_report: bool,
    pub community_activity: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            new_lessons: true,
            progress_report: true,
            community_activity: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_string(&NotificationPreferences::default()).unwrap();
        assert_eq!(
            json,
            r#"{"newLessons":true,"progressReport":true,"communityActivity":false}"#
        );
    }

    #[test]
    fn partial_record_keeps_stored_switches() {
        let parsed: NotificationPreferences =
            serde_json::from_str(r#"{"newLessons":false}"#).unwrap();
        assert!(!parsed.new_lessons);
        assert!(parsed.progress_report);
        assert!(!parsed.community_activity);
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let parsed = serde_json::from_str::<NotificationPreferences>(r#"{"newLessons":"no"}"#);
        assert!(parsed.is_err());
    }
}

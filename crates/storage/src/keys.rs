//! Durable key layout.
//!
//! Session keys are global; every other key is a per-identity partition
//! suffixed with the user's email.

const PREFIX: &str = "cs-studio";

pub const SESSION_TOKEN: &str = "cs-studio-token";
pub const SESSION_NAME: &str = "cs-studio-user-name";
pub const SESSION_EMAIL: &str = "cs-studio-user-email";

/// The keys removed on logout or failed rehydration.
pub const SESSION_KEYS: [&str; 3] = [SESSION_TOKEN, SESSION_NAME, SESSION_EMAIL];

#[must_use]
pub fn completed_courses(email: &str) -> String {
    format!("{PREFIX}-completed-courses-{email}")
}

#[must_use]
pub fn completed_lessons(email: &str) -> String {
    format!("{PREFIX}-completed-lessons-{email}")
}

#[must_use]
pub fn user_photo(email: &str) -> String {
    format!("{PREFIX}-user-photo-{email}")
}

#[must_use]
pub fn user_bio(email: &str) -> String {
    format!("{PREFIX}-user-bio-{email}")
}

#[must_use]
pub fn notifications(email: &str) -> String {
    format!("{PREFIX}-notifications-{email}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_keys_are_suffixed_with_email() {
        assert_eq!(
            completed_lessons("ada@studio.dev"),
            "cs-studio-completed-lessons-ada@studio.dev"
        );
        assert_eq!(
            notifications("ada@studio.dev"),
            "cs-studio-notifications-ada@studio.dev"
        );
    }
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("email cannot be empty")]
    EmptyEmail,
}

/// Validated email (trimmed, non-empty). Used as the partition key for all
/// persisted user state, so it is never rewritten after login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Create a validated email.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::EmptyEmail` if the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::EmptyEmail);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed-in user: display fields plus the email partition key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    name: String,
    email: Email,
    initials: String,
    photo_url: Option<String>,
    bio: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(name: impl Into<String>, email: Email) -> Self {
        let name = name.into();
        let initials = initials(&name);
        Self {
            name,
            email,
            initials,
            photo_url: None,
            bio: None,
        }
    }

    #[must_use]
    pub fn with_photo_url(mut self, photo_url: Option<String>) -> Self {
        self.photo_url = photo_url;
        self
    }

    #[must_use]
    pub fn with_bio(mut self, bio: Option<String>) -> Self {
        self.bio = bio;
        self
    }

    /// Replace the display name and recompute initials.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.initials = initials(&self.name);
    }

    pub fn set_bio(&mut self, bio: impl Into<String>) {
        self.bio = Some(bio.into());
    }

    pub fn set_photo_url(&mut self, photo_url: impl Into<String>) {
        self.photo_url = Some(photo_url.into());
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn initials(&self) -> &str {
        &self.initials
    }

    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }
}

/// Uppercased first letter of each whitespace-separated word, at most two.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

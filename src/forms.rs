//! Form controllers
//!
//! Validation and shaping of user input for login, measurement entry,
//! post/comment composition, and profile editing. Validation always runs
//! before any remote call; a form that fails validation never reaches the
//! gateway.

use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

// Compile regex patterns once at startup. The patterns are hardcoded and
// always valid, so expect() carries an explicit reason.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

fn require_non_empty(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyRequiredField(field))
    } else {
        Ok(())
    }
}

fn parse_metric(value: &str, field: &'static str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyRequiredField(field));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber(field))
}

fn optional_url(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Login credentials as typed into the sign-in screen.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.username, "username")?;
        require_non_empty(&self.password, "password")
    }
}

/// The nine measurement fields as entered, still strings.
#[derive(Debug, Clone, Default)]
pub struct MeasurementForm {
    pub height: String,
    pub weight: String,
    pub arm: String,
    pub legs: String,
    pub waist: String,
    pub abdomen: String,
    pub calf: String,
    pub back: String,
    pub torso: String,
}

/// A measurement form that passed validation: all nine metrics numeric.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementInput {
    pub height: f64,
    pub weight: f64,
    pub arm: f64,
    pub legs: f64,
    pub waist: f64,
    pub abdomen: f64,
    pub calf: f64,
    pub back: f64,
    pub torso: f64,
}

impl MeasurementForm {
    pub fn validate(&self) -> Result<MeasurementInput, ValidationError> {
        Ok(MeasurementInput {
            height: parse_metric(&self.height, "height")?,
            weight: parse_metric(&self.weight, "weight")?,
            arm: parse_metric(&self.arm, "arm")?,
            legs: parse_metric(&self.legs, "legs")?,
            waist: parse_metric(&self.waist, "waist")?,
            abdomen: parse_metric(&self.abdomen, "abdomen")?,
            calf: parse_metric(&self.calf, "calf")?,
            back: parse_metric(&self.back, "back")?,
            torso: parse_metric(&self.torso, "torso")?,
        })
    }
}

/// New-post composition (admin only; the feed enforces the role).
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub content: String,
    pub image_url: String,
    pub video_url: String,
}

impl PostForm {
    pub fn validate(&self) -> Result<ValidatedPost, ValidationError> {
        require_non_empty(&self.content, "content")?;
        Ok(ValidatedPost {
            content: self.content.trim().to_string(),
            image_url: optional_url(&self.image_url),
            video_url: optional_url(&self.video_url),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

/// Comment composition under one post.
#[derive(Debug, Clone, Default)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<String, ValidationError> {
        require_non_empty(&self.text, "comment")?;
        Ok(self.text.trim().to_string())
    }
}

/// Local profile draft, distinct from the committed session user. Credential
/// fields left blank mean "keep the current credential".
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub display_name: String,
    pub username: String,
    pub new_credential: String,
    pub confirm_credential: String,
}

impl ProfileDraft {
    pub fn wants_credential_change(&self) -> bool {
        !self.new_credential.is_empty() || !self.confirm_credential.is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.display_name, "name")?;
        require_non_empty(&self.username, "username")?;

        if self.wants_credential_change() {
            if self.new_credential.len() < 6 {
                return Err(ValidationError::CredentialTooShort);
            }
            if self.new_credential != self.confirm_credential {
                return Err(ValidationError::CredentialMismatch);
            }
        }
        Ok(())
    }
}

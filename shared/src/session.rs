use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile returned by the identity service for a bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture_url: Option<String>,
}

/// Read-only copy of the visitor's session. The identity service owns the
/// real data; credits are refreshed after each billed call and stay
/// unknown until the first fetch answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub credits_remaining: Option<u32>,
}

impl Session {
    pub fn new(profile: &UserProfile, access_token: impl Into<String>) -> Self {
        Self {
            user_id: profile.id.clone(),
            access_token: access_token.into(),
            credits_remaining: None,
        }
    }

    pub fn apply_credits(&mut self, credits: u32) {
        log::debug!(
            "credits for {}: {:?} -> {}",
            self.user_id,
            self.credits_remaining,
            credits
        );
        self.credits_remaining = Some(credits);
    }
}

/// Hands out the bearer token right before a call is made.
pub trait TokenSource {
    fn access_token(&self) -> Option<String>;
}

impl TokenSource for Option<String> {
    fn access_token(&self) -> Option<String> {
        self.clone().filter(|t| !t.is_empty())
    }
}

/// Triggers a refresh of the cached credits counter. Fire and forget.
pub trait CreditsRefresher {
    fn refresh(&self, user_id: &str);
}

#[derive(Debug, Deserialize)]
struct CreditsRow {
    credits: i64,
}

/// Reads the credit count from either a PostgREST row list
/// (`[{"credits": 3}]`) or a bare object (`{"credits": 3}`).
pub fn parse_credits(body: &str) -> Result<u32, TransportError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;
    let row = match value {
        Value::Array(mut rows) if !rows.is_empty() => rows.swap_remove(0),
        Value::Array(_) => {
            return Err(TransportError::Decode("no profile row".to_string()));
        }
        other => other,
    };
    let row: CreditsRow =
        serde_json::from_value(row).map_err(|e| TransportError::Decode(e.to_string()))?;
    Ok(row.credits.clamp(0, i64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credits_from_row_list() {
        assert_eq!(parse_credits(r#"[{"credits": 12, "user_id": "u"}]"#), Ok(12));
    }

    #[test]
    fn test_parse_credits_from_object() {
        assert_eq!(parse_credits(r#"{"credits": 3}"#), Ok(3));
    }

    #[test]
    fn test_negative_credits_clamp_to_zero() {
        assert_eq!(parse_credits(r#"[{"credits": -4}]"#), Ok(0));
    }

    #[test]
    fn test_unknown_user_is_an_error() {
        assert!(parse_credits("[]").is_err());
        assert!(parse_credits(r#"{"detail": "nope"}"#).is_err());
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        assert_eq!(Some(String::new()).access_token(), None);
        assert_eq!(Some("abc".to_string()).access_token(), Some("abc".to_string()));
        assert_eq!(None::<String>.access_token(), None);
    }

    #[test]
    fn test_session_tracks_credits() {
        let profile = UserProfile {
            id: "u-1".into(),
            email: "a@b.c".into(),
            name: "A".into(),
            picture_url: None,
        };
        let mut session = Session::new(&profile, "tok");
        assert_eq!(session.credits_remaining, None);
        session.apply_credits(9);
        assert_eq!(session.credits_remaining, Some(9));
        session.apply_credits(0);
        assert_eq!(session.credits_remaining, Some(0));
        assert_eq!(session.user_id, "u-1");
    }
}

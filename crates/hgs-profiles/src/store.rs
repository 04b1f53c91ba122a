use hgs_models::RecipientProfile;
use serde::Serialize;
use tracing::debug;

use crate::error::ProfileError;

/// A read-only source of recipient profiles keyed by user id.
pub trait ProfileSource: Send + Sync {
    /// All known user ids, in a stable order.
    fn user_ids(&self) -> Result<Vec<String>, ProfileError>;

    /// The user's recipients in stored order, or `None` for an unknown user.
    fn profiles_for(&self, user_id: &str) -> Result<Option<Vec<RecipientProfile>>, ProfileError>;
}

/// Result of looking a user up in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProfileLookup {
    Found {
        user_id: String,
        recipient_count: usize,
        recipients: Vec<RecipientProfile>,
    },
    UnknownUser {
        error: String,
        #[serde(skip)]
        requested: String,
        available_users: Vec<String>,
    },
}

impl ProfileLookup {
    pub fn profiles(&self) -> Option<&[RecipientProfile]> {
        match self {
            Self::Found { recipients, .. } => Some(recipients),
            Self::UnknownUser { .. } => None,
        }
    }

    pub fn into_profiles(self) -> Option<Vec<RecipientProfile>> {
        match self {
            Self::Found { recipients, .. } => Some(recipients),
            Self::UnknownUser { .. } => None,
        }
    }

    /// The payload handed to agents as the result of the profile tool.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
    }
}

/// Recipient Profile Store: profile lookup by user id over any source.
pub struct ProfileStore {
    source: Box<dyn ProfileSource>,
    default_user_id: String,
}

impl ProfileStore {
    pub fn new(source: Box<dyn ProfileSource>, default_user_id: &str) -> Self {
        Self {
            source,
            default_user_id: default_user_id.to_string(),
        }
    }

    pub fn default_user_id(&self) -> &str {
        &self.default_user_id
    }

    pub fn user_ids(&self) -> Result<Vec<String>, ProfileError> {
        self.source.user_ids()
    }

    /// Look up a user's recipients. An empty id means the default user.
    pub fn lookup(&self, user_id: &str) -> Result<ProfileLookup, ProfileError> {
        let trimmed = user_id.trim();
        let user_id = if trimmed.is_empty() {
            self.default_user_id.as_str()
        } else {
            trimmed
        };

        match self.source.profiles_for(user_id)? {
            Some(recipients) => {
                debug!(user_id, count = recipients.len(), "Loaded recipient profiles");
                Ok(ProfileLookup::Found {
                    user_id: user_id.to_string(),
                    recipient_count: recipients.len(),
                    recipients,
                })
            }
            None => {
                let available_users = self.source.user_ids()?;
                debug!(user_id, known = available_users.len(), "Unknown user id");
                Ok(ProfileLookup::UnknownUser {
                    error: format!("User ID '{user_id}' not found"),
                    requested: user_id.to_string(),
                    available_users,
                })
            }
        }
    }

    /// Every user and their recipients, in source order.
    pub fn all(&self) -> Result<Vec<(String, Vec<RecipientProfile>)>, ProfileError> {
        let mut users = Vec::new();
        for user_id in self.source.user_ids()? {
            let profiles = self.source.profiles_for(&user_id)?.unwrap_or_default();
            users.push((user_id, profiles));
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::BuiltinProfiles;

    fn store() -> ProfileStore {
        ProfileStore::new(Box::new(BuiltinProfiles::new()), "family_smith_123")
    }

    #[test]
    fn known_user_returns_profiles_unmodified() {
        let lookup = store().lookup("user_johnson_456").unwrap();
        let expected = BuiltinProfiles::new()
            .profiles_for("user_johnson_456")
            .unwrap()
            .unwrap();
        assert_eq!(lookup.profiles(), Some(expected.as_slice()));
    }

    #[test]
    fn unknown_user_lists_known_ids() {
        let lookup = store().lookup("mystery_user").unwrap();
        match &lookup {
            ProfileLookup::UnknownUser {
                requested,
                available_users,
                ..
            } => {
                assert_eq!(requested, "mystery_user");
                assert_eq!(available_users.len(), 5);
                assert!(available_users.contains(&"student_alex_321".to_string()));
            }
            other => panic!("Expected UnknownUser, got {other:?}"),
        }

        let payload = lookup.to_payload();
        assert_eq!(payload["error"], "User ID 'mystery_user' not found");
        assert_eq!(payload["available_users"].as_array().unwrap().len(), 5);
        assert!(payload.get("requested").is_none());
    }

    #[test]
    fn empty_id_resolves_to_default_user() {
        let lookup = store().lookup("").unwrap();
        match lookup {
            ProfileLookup::Found {
                user_id,
                recipient_count,
                ..
            } => {
                assert_eq!(user_id, "family_smith_123");
                assert_eq!(recipient_count, 3);
            }
            other => panic!("Expected Found, got {other:?}"),
        }
    }

    #[test]
    fn found_payload_shape() {
        let payload = store().lookup("student_alex_321").unwrap().to_payload();
        assert_eq!(payload["user_id"], "student_alex_321");
        assert_eq!(payload["recipient_count"], 2);
        assert_eq!(payload["recipients"][0]["name"], "Best Friend Emma");
    }

    #[test]
    fn all_users_in_order() {
        let all = store().all().unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].0, "family_smith_123");
        assert_eq!(all[4].1.len(), 4);
    }
}

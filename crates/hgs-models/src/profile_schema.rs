/// The SQLite table a profile database must provide.
///
/// List columns hold JSON arrays of strings. `position` keeps the
/// recipients of one user in their original order.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS recipient_profiles (
///     user_id         TEXT NOT NULL,
///     position        INTEGER NOT NULL,
///     name            TEXT NOT NULL,
///     interests_json  TEXT NOT NULL DEFAULT '[]',
///     past_gifts_json TEXT NOT NULL DEFAULT '[]',
///     dislikes_json   TEXT NOT NULL DEFAULT '[]',
///     PRIMARY KEY (user_id, position)
/// );
/// ```
pub const PROFILE_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS recipient_profiles (
    user_id         TEXT NOT NULL,
    position        INTEGER NOT NULL,
    name            TEXT NOT NULL,
    interests_json  TEXT NOT NULL DEFAULT '[]',
    past_gifts_json TEXT NOT NULL DEFAULT '[]',
    dislikes_json   TEXT NOT NULL DEFAULT '[]',
    PRIMARY KEY (user_id, position)
);
CREATE INDEX IF NOT EXISTS idx_profiles_user ON recipient_profiles(user_id);
";

/// One raw row of `recipient_profiles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    pub user_id: String,
    pub position: i64,
    pub name: String,
    pub interests_json: String,
    pub past_gifts_json: String,
    pub dislikes_json: String,
}

impl ProfileRow {
    pub fn from_profile(
        user_id: &str,
        position: i64,
        profile: &crate::RecipientProfile,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            user_id: user_id.to_string(),
            position,
            name: profile.name.clone(),
            interests_json: serde_json::to_string(&profile.interests)?,
            past_gifts_json: serde_json::to_string(&profile.past_gifts)?,
            dislikes_json: serde_json::to_string(&profile.dislikes)?,
        })
    }

    pub fn into_profile(self) -> Result<crate::RecipientProfile, serde_json::Error> {
        Ok(crate::RecipientProfile {
            name: self.name,
            interests: serde_json::from_str(&self.interests_json)?,
            past_gifts: serde_json::from_str(&self.past_gifts_json)?,
            dislikes: serde_json::from_str(&self.dislikes_json)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecipientProfile;

    #[test]
    fn row_conversion_preserves_lists() {
        let profile = RecipientProfile::new("Wife", &["Yoga", "Travel"], &["Yoga Mat"], &["Perfume"]);
        let row = ProfileRow::from_profile("user_johnson_456", 0, &profile).unwrap();
        assert_eq!(row.interests_json, r#"["Yoga","Travel"]"#);
        assert_eq!(row.into_profile().unwrap(), profile);
    }

    #[test]
    fn malformed_list_column_is_an_error() {
        let row = ProfileRow {
            user_id: "u".to_string(),
            position: 0,
            name: "X".to_string(),
            interests_json: "not json".to_string(),
            past_gifts_json: "[]".to_string(),
            dislikes_json: "[]".to_string(),
        };
        assert!(row.into_profile().is_err());
    }
}

use std::sync::Mutex;

use hgs_models::profile_schema::{ProfileRow, PROFILE_TABLE_DDL};
use hgs_models::RecipientProfile;
use rusqlite::Connection;

use crate::error::ProfileError;
use crate::store::ProfileSource;

/// Read-only SQLite profile accessor.
///
/// The database is maintained outside HGS; this type never writes to it.
/// Access is synchronized via `Mutex` since `rusqlite::Connection` is not `Sync`.
pub struct SqliteProfiles {
    conn: Mutex<Connection>,
}

impl SqliteProfiles {
    /// Open a read-only connection to a profile database.
    pub fn open(path: &str) -> Result<Self, ProfileError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database with the schema applied.
    /// The in-memory DB is writable so tests can seed data.
    pub fn open_in_memory() -> Result<Self, ProfileError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(PROFILE_TABLE_DDL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ProfileError> {
        self.conn
            .lock()
            .map_err(|e| ProfileError::Unavailable(format!("SQLite mutex poisoned: {e}")))
    }

    /// Insert a profile row. Only meaningful on an in-memory database.
    pub fn insert(&self, row: &ProfileRow) -> Result<(), ProfileError> {
        self.lock()?.execute(
            "INSERT OR REPLACE INTO recipient_profiles \
             (user_id, position, name, interests_json, past_gifts_json, dislikes_json) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.user_id,
                row.position,
                row.name,
                row.interests_json,
                row.past_gifts_json,
                row.dislikes_json,
            ],
        )?;
        Ok(())
    }

    /// Seed a user's recipients in order. Test helper.
    pub fn seed_user(&self, user_id: &str, profiles: &[RecipientProfile]) -> Result<(), ProfileError> {
        for (position, profile) in profiles.iter().enumerate() {
            self.insert(&ProfileRow::from_profile(user_id, position as i64, profile)?)?;
        }
        Ok(())
    }

    fn rows_for(&self, user_id: &str) -> Result<Vec<ProfileRow>, ProfileError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT user_id, position, name, interests_json, past_gifts_json, dislikes_json \
             FROM recipient_profiles WHERE user_id = ?1 ORDER BY position",
        )?;

        let rows = stmt
            .query_map(rusqlite::params![user_id], |row| {
                Ok(ProfileRow {
                    user_id: row.get(0)?,
                    position: row.get(1)?,
                    name: row.get(2)?,
                    interests_json: row.get(3)?,
                    past_gifts_json: row.get(4)?,
                    dislikes_json: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

impl ProfileSource for SqliteProfiles {
    fn user_ids(&self) -> Result<Vec<String>, ProfileError> {
        let conn = self.lock()?;
        // Users in order of first appearance.
        let mut stmt = conn.prepare_cached(
            "SELECT user_id FROM recipient_profiles GROUP BY user_id ORDER BY MIN(rowid)",
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    fn profiles_for(&self, user_id: &str) -> Result<Option<Vec<RecipientProfile>>, ProfileError> {
        let rows = self.rows_for(user_id)?;
        if rows.is_empty() {
            return Ok(None);
        }
        let profiles = rows
            .into_iter()
            .map(ProfileRow::into_profile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(profiles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ProfileLookup, ProfileStore};

    fn seeded() -> SqliteProfiles {
        let db = SqliteProfiles::open_in_memory().unwrap();
        db.seed_user(
            "user_lee_900",
            &[
                RecipientProfile::new("Sister", &["Climbing", "Podcasts"], &["Chalk Bag"], &["Perfume"]),
                RecipientProfile::new("Nephew", &["Dinosaurs"], &[], &[]),
            ],
        )
        .unwrap();
        db.seed_user(
            "user_kim_901",
            &[RecipientProfile::new("Partner", &["Tea"], &[], &["Mugs"])],
        )
        .unwrap();
        db
    }

    #[test]
    fn reads_profiles_in_position_order() {
        let profiles = seeded().profiles_for("user_lee_900").unwrap().unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "Sister");
        assert_eq!(profiles[0].interests, vec!["Climbing", "Podcasts"]);
        assert_eq!(profiles[1].name, "Nephew");
    }

    #[test]
    fn unknown_user_is_none() {
        assert!(seeded().profiles_for("user_nobody").unwrap().is_none());
    }

    #[test]
    fn user_ids_in_insertion_order() {
        assert_eq!(seeded().user_ids().unwrap(), vec!["user_lee_900", "user_kim_901"]);
    }

    #[test]
    fn corrupt_list_column_surfaces_json_error() {
        let db = SqliteProfiles::open_in_memory().unwrap();
        db.insert(&ProfileRow {
            user_id: "broken".to_string(),
            position: 0,
            name: "X".to_string(),
            interests_json: "{oops".to_string(),
            past_gifts_json: "[]".to_string(),
            dislikes_json: "[]".to_string(),
        })
        .unwrap();
        assert!(matches!(db.profiles_for("broken"), Err(ProfileError::Json(_))));
    }

    #[test]
    fn store_over_sqlite_reports_unknown_users() {
        let store = ProfileStore::new(Box::new(seeded()), "user_lee_900");
        match store.lookup("ghost").unwrap() {
            ProfileLookup::UnknownUser { available_users, .. } => {
                assert_eq!(available_users, vec!["user_lee_900", "user_kim_901"]);
            }
            other => panic!("Expected UnknownUser, got {other:?}"),
        }
    }
}

pub mod builtin;
pub mod error;
pub mod sqlite;
pub mod store;

pub use builtin::BuiltinProfiles;
pub use error::ProfileError;
pub use sqlite::SqliteProfiles;
pub use store::{ProfileLookup, ProfileSource, ProfileStore};

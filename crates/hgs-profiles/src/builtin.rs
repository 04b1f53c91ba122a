//! Demo profile table compiled into the binary.
//!
//! Stands in for a real database. Each entry is a user id followed by that
//! user's recipients, in the order they are presented.

use std::sync::OnceLock;

use hgs_models::RecipientProfile;

use crate::error::ProfileError;
use crate::store::ProfileSource;

type Table = Vec<(String, Vec<RecipientProfile>)>;

fn table() -> &'static Table {
    static TABLE: OnceLock<Table> = OnceLock::new();
    TABLE.get_or_init(|| {
        let p = RecipientProfile::new;
        vec![
            // Traditional family gift shopping
            (
                "family_smith_123".to_string(),
                vec![
                    p("Dad", &["Coffee", "Gadgets"], &["Smart Speaker"], &["Socks", "Tie"]),
                    p("Mom", &["Gardening", "Reading"], &[], &["Heavy Jewelry", "Anything Red"]),
                    p("Brother", &["Baking", "Sci-Fi"], &[], &["Video Games"]),
                ],
            ),
            // Spouse and children
            (
                "user_johnson_456".to_string(),
                vec![
                    p(
                        "Wife",
                        &["Yoga", "Photography", "Travel"],
                        &["Camera Lens", "Yoga Mat"],
                        &["Jewelry", "Perfume"],
                    ),
                    p("Daughter", &["Art", "Music", "Anime"], &["Drawing Tablet"], &["Clothes", "Makeup"]),
                    p(
                        "Son",
                        &["Gaming", "Robotics", "Coding"],
                        &["Raspberry Pi"],
                        &["Books", "Sports Equipment"],
                    ),
                ],
            ),
            // Office gift exchange
            (
                "corporate_hr_789".to_string(),
                vec![
                    p(
                        "Team Lead Sarah",
                        &["Leadership Books", "Coffee", "Wellness"],
                        &["Planner"],
                        &["Generic Mugs", "Candy"],
                    ),
                    p(
                        "Developer Mike",
                        &["Mechanical Keyboards", "Tech Gadgets"],
                        &["USB Hub"],
                        &["Office Supplies", "Gift Cards"],
                    ),
                    p(
                        "Designer Lisa",
                        &["Art Supplies", "Plants", "Stationery"],
                        &["Succulent Set"],
                        &["Tech Gadgets", "Books"],
                    ),
                ],
            ),
            // Friends and roommates
            (
                "student_alex_321".to_string(),
                vec![
                    p(
                        "Best Friend Emma",
                        &["K-pop", "Skincare", "Boba Tea"],
                        &["BTS Album"],
                        &["Books", "Formal Wear"],
                    ),
                    p(
                        "Roommate Jordan",
                        &["Cooking", "Board Games", "Hiking"],
                        &["Cast Iron Skillet"],
                        &["Electronics", "Candles"],
                    ),
                ],
            ),
            // Grandparents and relatives
            (
                "user_martinez_555".to_string(),
                vec![
                    p(
                        "Grandma",
                        &["Knitting", "Crossword Puzzles", "Family Photos"],
                        &["Digital Photo Frame"],
                        &["Electronics (complex)", "Loud Items"],
                    ),
                    p(
                        "Grandpa",
                        &["Woodworking", "History", "Classic Cars"],
                        &["Tool Set"],
                        &["Technology", "Modern Art"],
                    ),
                    p(
                        "Aunt Mary",
                        &["Wine", "Cooking", "Travel"],
                        &["Wine Aerator"],
                        &["Sweet Desserts", "Romance Novels"],
                    ),
                    p("Uncle Bob", &["Golf", "BBQ", "Sports"], &["Golf Balls"], &["Books", "Clothing"]),
                ],
            ),
        ]
    })
}

/// Read-only view over the compiled-in demo profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProfiles;

impl BuiltinProfiles {
    pub fn new() -> Self {
        Self
    }
}

impl ProfileSource for BuiltinProfiles {
    fn user_ids(&self) -> Result<Vec<String>, ProfileError> {
        Ok(table().iter().map(|(id, _)| id.clone()).collect())
    }

    fn profiles_for(&self, user_id: &str) -> Result<Option<Vec<RecipientProfile>>, ProfileError> {
        Ok(table()
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, profiles)| profiles.clone()))
    }
}

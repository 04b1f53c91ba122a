use serde::{Deserialize, Serialize};

/// Long-term memory profile for a gift recipient.
///
/// Profiles are static data: loaded once, never mutated. `name` is the
/// identity within a user's list but uniqueness is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipientProfile {
    #[serde(alias = "recipient_name")]
    pub name: String,
    #[serde(default, alias = "persistent_interests")]
    pub interests: Vec<String>,
    #[serde(default, alias = "past_successful_gifts")]
    pub past_gifts: Vec<String>,
    #[serde(default, alias = "disliked_categories")]
    pub dislikes: Vec<String>,
}

impl RecipientProfile {
    pub fn new(name: &str, interests: &[&str], past_gifts: &[&str], dislikes: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            name: name.to_string(),
            interests: owned(interests),
            past_gifts: owned(past_gifts),
            dislikes: owned(dislikes),
        }
    }

    /// Case-insensitive name comparison, used to pair gift ideas with profiles.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }

    /// Returns the first disliked category mentioned in `text`, if any.
    ///
    /// Matching is case-insensitive and only counts whole words, so a dislike
    /// of "Tie" does not match "Tiered Cake Stand".
    pub fn mentioned_dislike(&self, text: &str) -> Option<&str> {
        let haystack = normalize_words(text);
        self.dislikes
            .iter()
            .find(|dislike| {
                let needle = normalize_words(dislike);
                !needle.is_empty() && contains_phrase(&haystack, &needle)
            })
            .map(|s| s.as_str())
    }
}

fn normalize_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window.iter().zip(needle).all(|(a, b)| a == b || is_plural_of(a, b)))
}

// "Socks" should catch "sock", and "Candles" should catch "candle".
fn is_plural_of(word: &str, base: &str) -> bool {
    word.strip_suffix('s') == Some(base) || base.strip_suffix('s') == Some(word)
}

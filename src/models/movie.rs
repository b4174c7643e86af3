use serde::{Deserialize, Serialize};

/// Movie returned to the client, resolved from a canonical `movie` fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
}

impl MovieRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Record for an id with no canonical fact: the id doubles as the title
    pub fn untitled(id: &str) -> Self {
        Self::new(id, id)
    }

    /// Record standing for a liked genre, e.g. `sci-fi` → `Sci Fi`
    pub fn genre(value: &str) -> Self {
        Self::new(value, title_case(&value.replace('-', " ")))
    }

    /// Placeholder shown when a user has watched nothing
    pub fn none_watched() -> Self {
        Self::new("none", "No movies watched")
    }
}

/// Upper-cases the first letter of each word and lower-cases the rest
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("sci fi"), "Sci Fi");
        assert_eq!(title_case("DRAMA"), "Drama");
        assert_eq!(title_case("film noir 2"), "Film Noir 2");
    }

    #[test]
    fn test_genre_record() {
        let record = MovieRecord::genre("sci-fi");
        assert_eq!(record.id, "sci-fi");
        assert_eq!(record.title, "Sci Fi");
    }

    #[test]
    fn test_untitled_uses_id() {
        assert_eq!(MovieRecord::untitled("m1"), MovieRecord::new("m1", "m1"));
    }
}

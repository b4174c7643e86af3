use crate::{
    engine::query,
    error::{AppError, AppResult},
    models::{Intent, Relation},
};

/// Maps an intent to exactly one knowledge base query
///
/// | relation      | target | query                          |
/// |---------------|--------|--------------------------------|
/// | `Likes`       | genre  | stored preference for the genre |
/// | `Watched`     | -      | movies the subject watched     |
/// | `SimilarUser` | -      | users similar to the subject   |
/// | anything else | -      | movies recommended to subject  |
pub fn to_query(intent: &Intent) -> AppResult<String> {
    let subject = intent
        .subject
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(AppError::MissingSubject)?;

    let query = match (intent.relation, intent.genre()) {
        (Relation::Likes, Some(genre)) => query::likes_genre(subject, genre),
        (Relation::Watched, _) => query::watched(subject),
        (Relation::SimilarUser, _) => query::similar_users(subject),
        _ => query::recommend_to(subject),
    };

    tracing::debug!(relation = %intent.relation, query = %query, "Mapped intent to query");

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttributeType, TargetAttribute};

    #[test]
    fn test_missing_subject() {
        let intent = Intent::new(None, Relation::Any);
        assert!(matches!(to_query(&intent), Err(AppError::MissingSubject)));

        let blank = Intent {
            subject: Some("  ".to_string()),
            ..Intent::new(None, Relation::Watched)
        };
        assert!(matches!(to_query(&blank), Err(AppError::MissingSubject)));
    }

    #[test]
    fn test_watched() {
        let intent = Intent::new(Some("alice"), Relation::Watched);
        assert_eq!(to_query(&intent).unwrap(), "!(watched alice $movie)");
    }

    #[test]
    fn test_likes_genre() {
        let intent = Intent::new(Some("alice"), Relation::Likes)
            .with_target(TargetAttribute::genre("sci-fi"));
        assert_eq!(
            to_query(&intent).unwrap(),
            r#"!(match &self (preference alice "sci-fi") "sci-fi")"#
        );
    }

    #[test]
    fn test_similar_users() {
        let intent = Intent::new(Some("bob"), Relation::SimilarUser);
        assert_eq!(to_query(&intent).unwrap(), "!(similar-users bob $user)");
    }

    #[test]
    fn test_likes_without_genre_recommends() {
        let no_target = Intent::new(Some("alice"), Relation::Likes);
        assert_eq!(to_query(&no_target).unwrap(), "!(recommend-to alice $movie)");

        let director = Intent::new(Some("alice"), Relation::Likes)
            .with_target(TargetAttribute::new(AttributeType::Director, "nolan"));
        assert_eq!(to_query(&director).unwrap(), "!(recommend-to alice $movie)");
    }

    #[test]
    fn test_any_recommends() {
        let intent = Intent::new(Some("eve"), Relation::Any);
        assert_eq!(to_query(&intent).unwrap(), "!(recommend-to eve $movie)");
    }
}

use crate::{
    engine::{query, ReasoningEngine},
    models::{ExplanationBundle, MovieRecord},
    services::normalizer::execute_simple_list,
};

pub const NO_EXPLANATION: &str = "No explanation available.";

/// Collects explanations for each movie, in input order
///
/// Each movie gets the genre, director and collaborative explanations, in
/// that order. A movie with none of them gets [`NO_EXPLANATION`].
pub fn explain(
    engine: &dyn ReasoningEngine,
    subject: &str,
    movies: &[MovieRecord],
) -> ExplanationBundle {
    let bundle: ExplanationBundle = movies
        .iter()
        .map(|movie| explain_movie(engine, subject, &movie.id))
        .collect();

    tracing::debug!(subject = %subject, movies = movies.len(), "Explanations collected");

    bundle
}

fn explain_movie(engine: &dyn ReasoningEngine, subject: &str, movie_id: &str) -> Vec<String> {
    let queries = [
        query::explain_genre(subject, movie_id),
        query::explain_director(subject, movie_id),
        query::explain_collab(subject, movie_id),
    ];

    let explanations: Vec<String> = queries
        .iter()
        .flat_map(|q| execute_simple_list(engine, q))
        .collect();

    if explanations.is_empty() {
        vec![NO_EXPLANATION.to_string()]
    } else {
        explanations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AtomSpace, MockReasoningEngine};
    use crate::error::EngineError;
    use crate::models::Term;

    #[test]
    fn test_no_movies() {
        let mut engine = MockReasoningEngine::new();
        engine.expect_run().never();
        assert!(explain(&engine, "alice", &[]).is_empty());
    }

    #[test]
    fn test_placeholder_when_nothing_found() {
        let mut engine = MockReasoningEngine::new();
        engine
            .expect_run()
            .times(3)
            .returning(|_| Ok(vec![Term::Sequence(vec![])]));

        let bundle = explain(&engine, "alice", &[MovieRecord::untitled("m1")]);
        assert_eq!(bundle, vec![vec![NO_EXPLANATION.to_string()]]);
    }

    #[test]
    fn test_engine_errors_degrade_to_placeholder() {
        let mut engine = MockReasoningEngine::new();
        engine.expect_run().returning(|_| Err(EngineError::Poisoned));

        let bundle = explain(&engine, "alice", &[MovieRecord::untitled("m1")]);
        assert_eq!(bundle, vec![vec![NO_EXPLANATION.to_string()]]);
    }

    #[test]
    fn test_order_genre_director_collab() {
        let mut engine = MockReasoningEngine::new();
        engine.expect_run().returning(|q: &str| {
            let text = if q.starts_with("!(explain-genre") {
                "genre match"
            } else if q.starts_with("!(explain-director") {
                "director match"
            } else {
                "similar users liked it"
            };
            Ok(vec![Term::Sequence(vec![Term::primitive(text)])])
        });

        let bundle = explain(&engine, "alice", &[MovieRecord::untitled("m1")]);
        assert_eq!(
            bundle,
            vec![vec![
                "genre match".to_string(),
                "director match".to_string(),
                "similar users liked it".to_string(),
            ]]
        );
    }

    #[test]
    fn test_output_follows_movie_order() {
        let space = AtomSpace::from_source(
            r#"
            (explain-genre alice m2 "You like sci-fi")
            (explain-collab alice m1 "bob liked it")
            "#,
        )
        .unwrap();

        let movies = vec![
            MovieRecord::untitled("m2"),
            MovieRecord::untitled("m3"),
            MovieRecord::untitled("m1"),
        ];
        let bundle = explain(&space, "alice", &movies);
        assert_eq!(
            bundle,
            vec![
                vec!["You like sci-fi".to_string()],
                vec![NO_EXPLANATION.to_string()],
                vec!["bob liked it".to_string()],
            ]
        );
    }
}

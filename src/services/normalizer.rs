use crate::{
    engine::{query, ReasoningEngine},
    error::EngineError,
    models::{MovieRecord, RawResultSet, Term},
};

/// Flattens engine output into a set of plain values
///
/// Sequences and compound terms are descended recursively; every other leaf
/// is stringified. Null values, empty wrappers and blank strings are dropped.
pub fn flatten(output: &[Term]) -> RawResultSet {
    let mut set = RawResultSet::new();
    for term in output {
        collect_leaves(term, &mut set);
    }
    set
}

fn collect_leaves(term: &Term, set: &mut RawResultSet) {
    match term {
        Term::Null => {}
        Term::Sequence(items) | Term::Compound(items) => {
            items.iter().for_each(|item| collect_leaves(item, set));
        }
        Term::Primitive(value) => {
            set.insert(value.as_str());
        }
    }
}

/// Runs a query and flattens its output
///
/// An engine failure is logged and yields an empty set.
pub fn execute_simple_list(engine: &dyn ReasoningEngine, query: &str) -> RawResultSet {
    match engine.run(query) {
        Ok(output) => {
            let results = flatten(&output);
            if results.is_empty() {
                tracing::debug!(query = %query, "Query returned no results");
            } else {
                tracing::debug!(query = %query, results = results.len(), "Query completed");
            }
            results
        }
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "Knowledge base query failed");
            RawResultSet::new()
        }
    }
}

/// Runs a query whose results are movie ids and resolves them to records
pub fn execute_query(engine: &dyn ReasoningEngine, query: &str) -> Vec<MovieRecord> {
    let ids = execute_simple_list(engine, query);
    resolve_movies(engine, &ids)
}

/// Resolves movie ids to records through their canonical `movie` facts
///
/// A missing fact degrades to `title = id`. An engine failure on any lookup
/// abandons the batch and yields an empty list.
pub fn resolve_movies(engine: &dyn ReasoningEngine, ids: &RawResultSet) -> Vec<MovieRecord> {
    match try_resolve_movies(engine, ids) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                ids = ids.len(),
                error = %e,
                "Movie lookup failed, dropping batch"
            );
            Vec::new()
        }
    }
}

fn try_resolve_movies(
    engine: &dyn ReasoningEngine,
    ids: &RawResultSet,
) -> Result<Vec<MovieRecord>, EngineError> {
    let mut records = Vec::with_capacity(ids.len());

    for id in ids.iter().filter(|id| !id.trim().is_empty()) {
        let output = engine.run(&query::movie_details(id))?;

        let title = first_compound(&output)
            .and_then(|children| children.get(1))
            .map(Term::to_string)
            .filter(|title| !title.is_empty());

        match title {
            Some(title) => records.push(MovieRecord::new(id.as_str(), title)),
            None => {
                tracing::debug!(movie_id = %id, "No movie details found");
                records.push(MovieRecord::untitled(id));
            }
        }
    }

    Ok(records)
}

/// First non-empty compound term at the top level or one sequence down
fn first_compound(output: &[Term]) -> Option<&[Term]> {
    output.iter().find_map(|term| match term {
        Term::Compound(children) if !children.is_empty() => Some(children.as_slice()),
        Term::Sequence(items) => items.iter().find_map(|item| match item {
            Term::Compound(children) if !children.is_empty() => Some(children.as_slice()),
            _ => None,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AtomSpace, MockReasoningEngine};

    fn p(value: &str) -> Term {
        Term::primitive(value)
    }

    #[test]
    fn test_flatten_nested_empties() {
        let output = vec![
            Term::Sequence(vec![]),
            Term::Sequence(vec![Term::Null, Term::Sequence(vec![])]),
        ];
        assert!(flatten(&output).is_empty());
    }

    #[test]
    fn test_flatten_mixed_leaves() {
        let output = vec![Term::Sequence(vec![
            p("m1"),
            Term::Compound(vec![p("m2"), Term::Sequence(vec![p("m1"), p("")])]),
            Term::Compound(vec![]),
            Term::Null,
        ])];
        assert_eq!(flatten(&output).into_vec(), vec!["m1", "m2"]);
    }

    #[test]
    fn test_flatten_deep_nesting_terminates() {
        let mut term = p("deep");
        for _ in 0..500 {
            term = Term::Sequence(vec![term, Term::Null]);
        }
        assert_eq!(flatten(&[term]).into_vec(), vec!["deep"]);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let output = vec![Term::Sequence(vec![
            p("b"),
            Term::Compound(vec![p("a"), p("b")]),
        ])];
        let once = flatten(&output);
        let twice = flatten(&once.to_terms());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_execute_simple_list_absorbs_engine_errors() {
        let mut engine = MockReasoningEngine::new();
        engine
            .expect_run()
            .returning(|_| Err(EngineError::MalformedQuery("boom".to_string())));
        assert!(execute_simple_list(&engine, "!(watched alice $m)").is_empty());
    }

    #[test]
    fn test_resolve_empty_set() {
        let mut engine = MockReasoningEngine::new();
        engine.expect_run().never();
        assert!(resolve_movies(&engine, &RawResultSet::new()).is_empty());
    }

    #[test]
    fn test_resolve_missing_fact_uses_id() {
        let mut engine = MockReasoningEngine::new();
        engine
            .expect_run()
            .withf(|q: &str| q.contains("(movie m1 $title"))
            .times(1)
            .returning(|_| Ok(vec![Term::Sequence(vec![])]));

        let ids: RawResultSet = ["m1"].into_iter().collect();
        assert_eq!(
            resolve_movies(&engine, &ids),
            vec![MovieRecord::new("m1", "m1")]
        );
    }

    #[test]
    fn test_resolve_takes_second_field_as_title() {
        let mut engine = MockReasoningEngine::new();
        engine.expect_run().returning(|_| {
            Ok(vec![Term::Sequence(vec![Term::Compound(vec![
                p("movie"),
                p("Inception"),
                p("sci-fi"),
            ])])])
        });

        let ids: RawResultSet = ["m2"].into_iter().collect();
        assert_eq!(
            resolve_movies(&engine, &ids),
            vec![MovieRecord::new("m2", "Inception")]
        );
    }

    #[test]
    fn test_resolve_fails_soft_for_whole_batch() {
        let mut engine = MockReasoningEngine::new();
        engine
            .expect_run()
            .withf(|q: &str| q.contains("(movie m1 "))
            .returning(|_| Ok(vec![]));
        engine
            .expect_run()
            .withf(|q: &str| q.contains("(movie m2 "))
            .returning(|_| Err(EngineError::Poisoned));

        let ids: RawResultSet = ["m1", "m2"].into_iter().collect();
        assert!(resolve_movies(&engine, &ids).is_empty());
    }

    #[test]
    fn test_execute_query_against_atom_space() {
        let space = AtomSpace::from_source(
            r#"
            (movie m1 "The Matrix" sci-fi wachowski 8.7)
            (watched alice m1)
            (watched alice m9)
            "#,
        )
        .unwrap();

        let records = execute_query(&space, &query::watched("alice"));
        assert_eq!(
            records,
            vec![
                MovieRecord::new("m1", "The Matrix"),
                MovieRecord::new("m9", "m9"),
            ]
        );
    }
}

use crate::{
    engine::{query, ReasoningEngine},
    error::AppResult,
    models::{MovieRecord, QueryAnswer, RecommendationReport, Relation},
    services::{
        explanations::explain,
        intent_parser::IntentParser,
        normalizer::{execute_query, execute_simple_list, resolve_movies},
        query_mapper::to_query,
    },
};

pub const NO_PREFERENCE: &str = "No preference found";

/// Generates the full recommendation report for a user
///
/// Recommended movies come with their explanations, alongside similar users
/// and the user's watch history.
pub fn recommend_for(engine: &dyn ReasoningEngine, user: &str) -> RecommendationReport {
    let recommendations = execute_query(engine, &query::recommend_to(user));
    let explanations = explain(engine, user, &recommendations);
    let similar_users = execute_simple_list(engine, &query::similar_users(user)).into_vec();

    let mut watched = execute_query(engine, &query::watched(user));
    if watched.is_empty() {
        watched.push(MovieRecord::none_watched());
    }

    tracing::info!(
        user = %user,
        recommendations = recommendations.len(),
        similar_users = similar_users.len(),
        "Recommendation report built"
    );

    RecommendationReport {
        recommendations,
        explanations,
        similar_users,
        watched,
    }
}

/// Answers a free-text question against the knowledge base
pub async fn answer_question(
    parser: &IntentParser,
    engine: &dyn ReasoningEngine,
    question: &str,
    assumed_subject: Option<&str>,
) -> AppResult<QueryAnswer> {
    let intent = parser.parse(question, assumed_subject).await?;
    let query = to_query(&intent)?;
    let results = execute_simple_list(engine, &query);

    // A Likes question with a genre answers yes/no with the genre itself
    let recommendations = match (intent.relation, &intent.target_attribute) {
        (Relation::Likes, Some(target)) if !results.is_empty() => {
            vec![MovieRecord::genre(&target.value)]
        }
        (Relation::Likes, Some(_)) => Vec::new(),
        _ => resolve_movies(engine, &results),
    };

    let explanations = if intent.relation == Relation::Likes {
        let found = results.into_vec();
        if found.is_empty() {
            vec![vec![NO_PREFERENCE.to_string()]]
        } else {
            vec![found]
        }
    } else {
        let subject = intent.subject.as_deref().unwrap_or_default();
        explain(engine, subject, &recommendations)
    };

    tracing::info!(
        relation = %intent.relation,
        query = %query,
        recommendations = recommendations.len(),
        "Question answered"
    );

    Ok(QueryAnswer {
        parsed_query: intent,
        recommendations,
        explanations,
    })
}

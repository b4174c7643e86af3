use crate::{
    engine::{query, ReasoningEngine},
    error::{AppError, AppResult},
    models::{is_symbol, RawResultSet},
    services::normalizer::execute_simple_list,
};

/// True when the user has watched something or stated a preference
pub fn user_exists(engine: &dyn ReasoningEngine, user: &str) -> bool {
    let watched = execute_simple_list(engine, &query::watched(user));
    let preferences = execute_simple_list(engine, &query::preferences(user));
    let exists = !watched.is_empty() || !preferences.is_empty();

    tracing::debug!(user = %user, exists, "Checked user existence");

    exists
}

/// Adds a user through their genre preferences
pub fn add_user(engine: &dyn ReasoningEngine, user: &str, preferences: &[String]) -> AppResult<()> {
    for genre in preferences {
        insert_fact(engine, &query::preference_fact(user, genre))?;
    }
    tracing::info!(user = %user, preferences = preferences.len(), "Added new user");
    Ok(())
}

/// Records a genre preference, adding the user first when unknown
pub fn add_preference(engine: &dyn ReasoningEngine, user: &str, genre: &str) -> AppResult<()> {
    if !user_exists(engine, user) {
        add_user(engine, user, &[])?;
    }
    insert_fact(engine, &query::preference_fact(user, genre))?;
    tracing::info!(user = %user, genre = %genre, "Genre preference added");
    Ok(())
}

/// Registers an explicit `(user NAME)` fact
///
/// The name is trimmed and lower-cased. Returns the stored name.
pub fn register_user(engine: &dyn ReasoningEngine, username: &str) -> AppResult<String> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(AppError::InvalidInput("Username is required".to_string()));
    }
    validate_symbol("Username", &username)?;

    if !execute_simple_list(engine, &query::registered_user(&username)).is_empty() {
        return Err(AppError::Conflict(format!(
            "User '{}' already exists",
            username
        )));
    }

    insert_fact(engine, &query::user_fact(&username))?;
    tracing::info!(user = %username, "Registered user");
    Ok(username)
}

pub fn add_rating(
    engine: &dyn ReasoningEngine,
    user: &str,
    movie_id: &str,
    rating: &str,
) -> AppResult<()> {
    insert_fact(engine, &query::rating_fact(user, movie_id, rating))?;
    tracing::info!(user = %user, movie_id = %movie_id, rating = %rating, "Rating added");
    Ok(())
}

/// Users that have watched at least one movie
pub fn list_users(engine: &dyn ReasoningEngine) -> RawResultSet {
    let users = execute_simple_list(engine, query::all_users());
    if users.is_empty() {
        tracing::warn!("No users found in knowledge base");
    }
    users
}

/// Ids of every movie in the knowledge base
pub fn list_movies(engine: &dyn ReasoningEngine) -> RawResultSet {
    execute_simple_list(engine, query::all_movies())
}

/// Rejects values that would change the shape of a fact or query
pub fn validate_symbol(field: &str, value: &str) -> AppResult<()> {
    if !is_symbol(value) {
        return Err(AppError::InvalidInput(format!(
            "{} must be a single word without brackets or quotes",
            field
        )));
    }
    Ok(())
}

/// Insertion failures are surfaced, unlike query failures
fn insert_fact(engine: &dyn ReasoningEngine, fact: &str) -> AppResult<()> {
    engine.run(fact).map_err(|e| {
        tracing::error!(fact = %fact, error = %e, "Failed to add fact");
        AppError::Engine(e)
    })?;
    Ok(())
}

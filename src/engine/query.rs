//! Query and fact strings understood by the reasoning engine.

/// `(preference USER "GENRE")` match returning the genre itself
pub fn likes_genre(subject: &str, genre: &str) -> String {
    format!(
        r#"!(match &self (preference {} "{}") "{}")"#,
        subject, genre, genre
    )
}

pub fn watched(subject: &str) -> String {
    format!("!(watched {} $movie)", subject)
}

pub fn similar_users(subject: &str) -> String {
    format!("!(similar-users {} $user)", subject)
}

pub fn recommend_to(subject: &str) -> String {
    format!("!(recommend-to {} $movie)", subject)
}

pub fn preferences(subject: &str) -> String {
    format!("!(preference {} $genre)", subject)
}

/// Canonical movie fact lookup: `(movie id title genre director rating)`
pub fn movie_details(movie_id: &str) -> String {
    format!(
        "!(match &self (movie {id} $title $genre $director $rating) (movie {id} $title $genre $director $rating))",
        id = movie_id
    )
}

pub fn explain_genre(subject: &str, movie_id: &str) -> String {
    format!("!(explain-genre {} {} $explanation)", subject, movie_id)
}

pub fn explain_director(subject: &str, movie_id: &str) -> String {
    format!("!(explain-director {} {} $explanation)", subject, movie_id)
}

pub fn explain_collab(subject: &str, movie_id: &str) -> String {
    format!("!(explain-collab {} {} $explanation)", subject, movie_id)
}

pub fn registered_user(username: &str) -> String {
    format!("!(match &self (user {u}) {u})", u = username)
}

pub fn all_users() -> &'static str {
    "!(match &self (watched $user $movie) $user)"
}

pub fn all_movies() -> &'static str {
    "!(match &self (movie $id $title $genre $director $rating) $id)"
}

pub fn user_fact(username: &str) -> String {
    format!("(user {})", username)
}

pub fn preference_fact(subject: &str, genre: &str) -> String {
    format!("(preference {} {})", subject, genre)
}

pub fn rating_fact(subject: &str, movie_id: &str, rating: &str) -> String {
    format!("(user-rating {} {} {})", subject, movie_id, rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parser::{parse_program, Statement};

    #[test]
    fn test_query_shapes() {
        assert_eq!(watched("alice"), "!(watched alice $movie)");
        assert_eq!(
            likes_genre("alice", "sci-fi"),
            r#"!(match &self (preference alice "sci-fi") "sci-fi")"#
        );
        assert_eq!(
            movie_details("m1"),
            "!(match &self (movie m1 $title $genre $director $rating) (movie m1 $title $genre $director $rating))"
        );
        assert_eq!(
            explain_collab("bob", "m2"),
            "!(explain-collab bob m2 $explanation)"
        );
    }

    #[test]
    fn test_builders_produce_parseable_programs() {
        for query in [
            likes_genre("alice", "sci-fi"),
            similar_users("alice"),
            recommend_to("alice"),
            registered_user("alice"),
            all_users().to_string(),
            all_movies().to_string(),
        ] {
            let program = parse_program(&query).unwrap();
            assert!(matches!(program.as_slice(), [Statement::Query(_)]), "{}", query);
        }

        let program = parse_program(&rating_fact("alice", "m1", "5")).unwrap();
        assert!(matches!(program.as_slice(), [Statement::Fact(_)]));
    }
}

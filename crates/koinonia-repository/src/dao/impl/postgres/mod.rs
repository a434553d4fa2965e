//! PostgreSQL DAO implementations (sqlx).

mod comment_dao_impl;
mod interaction_dao_impl;
mod like_dao_impl;
mod post_dao_impl;
mod rows;
mod user_dao_impl;

pub use comment_dao_impl::PgCommentDaoImpl;
pub use interaction_dao_impl::PgInteractionDaoImpl;
pub use like_dao_impl::PgLikeDaoImpl;
pub use post_dao_impl::PgPostDaoImpl;
pub use user_dao_impl::PgUserDaoImpl;

/// Builds an `ILIKE` pattern matching `term` anywhere, with its own
/// wildcards taken literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

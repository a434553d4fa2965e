//! DAO implementations.
//!
//! Trait definitions live in the parent `dao/` module. Implementations are
//! organized by backing store.

mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{
    PgCommentDaoImpl, PgInteractionDaoImpl, PgLikeDaoImpl, PgPostDaoImpl, PgUserDaoImpl,
};

use koinonia_core::{CommentThread, CommentWithAuthor};

/// Groups comments, ordered oldest first, into threads.
///
/// Top-level comments keep their order; each reply is attached to its
/// parent. Replies whose parent is not in the input are dropped.
pub(crate) fn assemble_threads(
    comments: impl IntoIterator<Item = CommentWithAuthor>,
) -> Vec<CommentThread> {
    let mut threads: Vec<CommentThread> = Vec::new();
    let mut replies: Vec<CommentWithAuthor> = Vec::new();

    for entry in comments {
        if entry.comment.parent_id.is_some() {
            replies.push(entry);
        } else {
            threads.push(CommentThread {
                comment: entry.comment,
                author: entry.author,
                replies: Vec::new(),
            });
        }
    }

    for reply in replies {
        if let Some(thread) = threads
            .iter_mut()
            .find(|t| Some(t.comment.id) == reply.comment.parent_id)
        {
            thread.replies.push(reply);
        }
    }

    threads
}

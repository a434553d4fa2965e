//! Interaction entity.

use crate::{CommentId, InteractionId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of engagement recorded for analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Like,
    Comment,
    Share,
    Bookmark,
}

impl InteractionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Share => "share",
            Self::Bookmark => "bookmark",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized interaction type.
#[derive(Debug, Error)]
#[error("Unknown interaction type: {0}")]
pub struct UnknownInteractionType(pub String);

impl FromStr for InteractionType {
    type Err = UnknownInteractionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "like" => Ok(Self::Like),
            "comment" => Ok(Self::Comment),
            "share" => Ok(Self::Share),
            "bookmark" => Ok(Self::Bookmark),
            other => Err(UnknownInteractionType(other.to_string())),
        }
    }
}

/// A recorded engagement event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: InteractionId,
    pub user_id: UserId,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    pub interaction_type: InteractionType,
    /// Dwell time in seconds.
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an interaction.
#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub user_id: UserId,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    pub interaction_type: InteractionType,
    pub duration: Option<i32>,
}

impl NewInteraction {
    #[must_use]
    pub fn into_interaction(self, id: InteractionId, now: DateTime<Utc>) -> Interaction {
        Interaction {
            id,
            user_id: self.user_id,
            post_id: self.post_id,
            comment_id: self.comment_id,
            interaction_type: self.interaction_type,
            duration: self.duration,
            created_at: now,
        }
    }
}

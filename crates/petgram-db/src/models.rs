//! Database row types. These map directly to SQLite rows and are distinct
//! from the petgram-types API models; conversion happens through the
//! `into_*` methods so the password hash stays inside the db layer.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, Utc};
use petgram_types::models::{
    Account, Chat, Comment, DirectMessage, Follow, LikedComment, LikedPost, Post, SavedPost,
    SharedPost, Story,
};
use uuid::Uuid;

pub struct AccountRow {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: String,
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
    pub is_private: bool,
    pub is_verified: bool,
    pub created_at: String,
}

pub struct PostRow {
    pub id: String,
    pub account_id: String,
    pub content: String,
    pub description: String,
    pub created_at: String,
}

pub struct StoryRow {
    pub id: String,
    pub account_id: String,
    pub content: String,
    pub created_at: String,
}

pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub account_id: String,
    pub content: String,
    pub replied_to: Option<String>,
    pub created_at: String,
}

pub struct FollowRow {
    pub id: String,
    pub follower_id: String,
    pub followed_id: String,
}

/// Shared row shape for liked_posts, shared_posts and saved_posts.
pub struct PostMarkRow {
    pub id: String,
    pub post_id: String,
    pub account_id: String,
}

pub struct CommentMarkRow {
    pub id: String,
    pub comment_id: String,
    pub account_id: String,
}

pub struct ChatRow {
    pub id: String,
    pub title: String,
}

pub struct DirectMessageRow {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub message: String,
    pub created_at: String,
}

/// SQLite stores timestamps either as RFC 3339 (our inserts) or as
/// "YYYY-MM-DD HH:MM:SS" (the column defaults). Accept both.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| anyhow!("Corrupt timestamp '{}': {}", raw, e))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse()
        .map_err(|e| anyhow!("Corrupt id '{}': {}", raw, e))
}

impl AccountRow {
    pub fn into_account(self) -> Result<Account> {
        Ok(Account {
            id: parse_id(&self.id)?,
            email: self.email,
            username: self.username,
            name: self.name,
            bio: self.bio,
            profile_pic: self.profile_pic,
            is_private: self.is_private,
            is_verified: self.is_verified,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl PostRow {
    pub fn into_post(self) -> Result<Post> {
        let content: Vec<String> = serde_json::from_str(&self.content)
            .map_err(|e| anyhow!("Corrupt post content on '{}': {}", self.id, e))?;
        Ok(Post {
            id: parse_id(&self.id)?,
            account_id: parse_id(&self.account_id)?,
            content,
            description: self.description,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl StoryRow {
    pub fn into_story(self) -> Result<Story> {
        Ok(Story {
            id: parse_id(&self.id)?,
            account_id: parse_id(&self.account_id)?,
            content: self.content,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl CommentRow {
    pub fn into_comment(self) -> Result<Comment> {
        let replied_to = match &self.replied_to {
            Some(raw) => Some(parse_id(raw)?),
            None => None,
        };
        Ok(Comment {
            id: parse_id(&self.id)?,
            post_id: parse_id(&self.post_id)?,
            account_id: parse_id(&self.account_id)?,
            content: self.content,
            replied_to,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl FollowRow {
    pub fn into_follow(self) -> Result<Follow> {
        Ok(Follow {
            id: parse_id(&self.id)?,
            follower_id: parse_id(&self.follower_id)?,
            followed_id: parse_id(&self.followed_id)?,
        })
    }
}

impl PostMarkRow {
    pub fn into_liked_post(self) -> Result<LikedPost> {
        Ok(LikedPost {
            id: parse_id(&self.id)?,
            post_id: parse_id(&self.post_id)?,
            account_id: parse_id(&self.account_id)?,
        })
    }

    pub fn into_shared_post(self) -> Result<SharedPost> {
        Ok(SharedPost {
            id: parse_id(&self.id)?,
            post_id: parse_id(&self.post_id)?,
            account_id: parse_id(&self.account_id)?,
        })
    }

    pub fn into_saved_post(self) -> Result<SavedPost> {
        Ok(SavedPost {
            id: parse_id(&self.id)?,
            post_id: parse_id(&self.post_id)?,
            account_id: parse_id(&self.account_id)?,
        })
    }
}

impl CommentMarkRow {
    pub fn into_liked_comment(self) -> Result<LikedComment> {
        Ok(LikedComment {
            id: parse_id(&self.id)?,
            comment_id: parse_id(&self.comment_id)?,
            account_id: parse_id(&self.account_id)?,
        })
    }
}

impl ChatRow {
    pub fn into_chat(self, member_ids: Vec<String>) -> Result<Chat> {
        let members = member_ids
            .iter()
            .map(|m| parse_id(m))
            .collect::<Result<Vec<_>>>()?;
        Ok(Chat {
            id: parse_id(&self.id)?,
            title: self.title,
            members,
        })
    }
}

impl DirectMessageRow {
    pub fn into_direct_message(self) -> Result<DirectMessage> {
        Ok(DirectMessage {
            id: parse_id(&self.id)?,
            chat_id: parse_id(&self.chat_id)?,
            sender_id: parse_id(&self.sender_id)?,
            message: self.message,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_and_sqlite_timestamps() {
        let rfc = parse_timestamp("2025-06-01T12:30:00+00:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2025-06-01T12:30:00+00:00");

        let sqlite = parse_timestamp("2025-06-01 12:30:00").unwrap();
        assert_eq!(rfc, sqlite);

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn post_content_round_trips_through_json() {
        let row = PostRow {
            id: Uuid::new_v4().to_string(),
            account_id: Uuid::new_v4().to_string(),
            content: r#"["a.jpg","b.jpg"]"#.to_string(),
            description: "two pics".to_string(),
            created_at: "2025-06-01 12:30:00".to_string(),
        };
        let post = row.into_post().unwrap();
        assert_eq!(post.content, vec!["a.jpg", "b.jpg"]);
    }
}

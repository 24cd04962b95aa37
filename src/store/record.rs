// Blog record types and the flat-file row codec

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for `created_date` / `updated_date` columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Backing file columns, in file order
pub const COLUMNS: [&str; 11] = [
    "_id",
    "user_id",
    "author",
    "title",
    "tags",
    "blogpost",
    "created_date",
    "updated_date",
    "comments",
    "likes",
    "comments_count",
];

/// One blog post and its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogRecord {
    pub id: String,
    pub author: String,
    pub title: String,
    pub tags: Vec<String>,
    pub body: String,
    pub created_at: NaiveDate,
    pub updated_at: Option<NaiveDate>,
    pub comments: Vec<String>,
    pub likes: u64,
    pub comment_count: u64,
}

/// Raw row as it appears in the backing file.
///
/// List columns are JSON string arrays so entries may contain commas.
/// `user_id` is reserved and always written empty.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct BlogRow {
    #[serde(rename = "_id")]
    id: String,
    user_id: String,
    author: String,
    title: String,
    tags: String,
    blogpost: String,
    created_date: String,
    updated_date: String,
    comments: String,
    likes: String,
    comments_count: String,
}

impl BlogRow {
    /// Decode a raw row, returning a human-readable reason on failure
    pub(super) fn into_record(self) -> Result<BlogRecord, String> {
        let created_at = parse_date("created_date", &self.created_date)?;
        let updated_at = if self.updated_date.is_empty() {
            None
        } else {
            Some(parse_date("updated_date", &self.updated_date)?)
        };

        Ok(BlogRecord {
            tags: parse_list("tags", &self.tags)?,
            comments: parse_list("comments", &self.comments)?,
            likes: parse_count("likes", &self.likes)?,
            comment_count: parse_count("comments_count", &self.comments_count)?,
            id: self.id,
            author: self.author,
            title: self.title,
            body: self.blogpost,
            created_at,
            updated_at,
        })
    }
}

impl From<&BlogRecord> for BlogRow {
    fn from(blog: &BlogRecord) -> Self {
        Self {
            id: blog.id.clone(),
            user_id: String::new(),
            author: blog.author.clone(),
            title: blog.title.clone(),
            tags: encode_list(&blog.tags),
            blogpost: blog.body.clone(),
            created_date: blog.created_at.format(DATE_FORMAT).to_string(),
            updated_date: blog
                .updated_at
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            comments: encode_list(&blog.comments),
            likes: blog.likes.to_string(),
            comments_count: blog.comment_count.to_string(),
        }
    }
}

fn encode_list(items: &[String]) -> String {
    // Serializing a slice of strings cannot fail
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn parse_list(column: &str, value: &str) -> Result<Vec<String>, String> {
    serde_json::from_str(value).map_err(|e| format!("invalid {column} value '{value}': {e}"))
}

fn parse_date(column: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("invalid {column} value '{value}': {e}"))
}

fn parse_count(column: &str, value: &str) -> Result<u64, String> {
    value
        .parse()
        .map_err(|e| format!("invalid {column} value '{value}': {e}"))
}

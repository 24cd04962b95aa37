// Template contexts

use minijinja::{context, Value};
use serde::Serialize;

use crate::store::{BlogRecord, DATE_FORMAT};

/// A record as the pages see it, tagged with its positional index
#[derive(Debug, Clone, Serialize)]
pub struct BlogView {
    pub index: usize,
    pub id: String,
    pub author: String,
    pub title: String,
    pub tags: Vec<String>,
    pub body: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub comments: Vec<String>,
    pub likes: u64,
    pub comment_count: u64,
}

impl BlogView {
    pub fn new(index: usize, blog: &BlogRecord) -> Self {
        Self {
            index,
            id: blog.id.clone(),
            author: blog.author.clone(),
            title: blog.title.clone(),
            tags: blog.tags.clone(),
            body: blog.body.clone(),
            created_at: blog.created_at.format(DATE_FORMAT).to_string(),
            updated_at: blog
                .updated_at
                .map(|d| d.format(DATE_FORMAT).to_string()),
            comments: blog.comments.clone(),
            likes: blog.likes,
            comment_count: blog.comment_count,
        }
    }

    pub fn list(blogs: &[BlogRecord]) -> Vec<Self> {
        blogs
            .iter()
            .enumerate()
            .map(|(index, blog)| Self::new(index, blog))
            .collect()
    }
}

/// Create and edit form context
#[derive(Debug, Clone)]
pub struct FormContext {
    blog: Option<BlogView>,
    known_tags: Vec<String>,
}

impl FormContext {
    pub fn blank(known_tags: &[String]) -> Self {
        Self {
            blog: None,
            known_tags: known_tags.to_vec(),
        }
    }

    pub fn prefilled(index: usize, blog: &BlogRecord, known_tags: &[String]) -> Self {
        Self {
            blog: Some(BlogView::new(index, blog)),
            known_tags: known_tags.to_vec(),
        }
    }

    pub fn to_value(&self) -> Value {
        // Joined with the edit separator so resubmitting keeps the same tags
        let tag_text = self
            .blog
            .as_ref()
            .map(|b| b.tags.join(","))
            .unwrap_or_default();
        context! {
            blog => &self.blog,
            tag_text => tag_text,
            known_tags => &self.known_tags,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorPageContext {
    status: u16,
    message: String,
}

impl ErrorPageContext {
    pub fn new(status: u16, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        let reason = hyper::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Error");
        context! {
            status => self.status,
            reason => reason,
            message => &self.message,
        }
    }
}

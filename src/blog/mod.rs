//! Blog operations
//!
//! [`BlogDesk`] owns the record store and the tag registry. Callers hold it
//! behind one lock, so each operation's load, mutate and save run as a unit.

mod form;
mod tags;

pub use form::BlogForm;
pub use tags::{parse_create_tags, parse_edit_tags, TagRegistry};

use chrono::NaiveDate;

use crate::error::{BlogError, Result};
use crate::store::{BlogRecord, RecordStore};

/// Store plus process-wide tag registry
#[derive(Debug)]
pub struct BlogDesk {
    store: RecordStore,
    tags: TagRegistry,
}

impl BlogDesk {
    pub const fn new(store: RecordStore, tags: TagRegistry) -> Self {
        Self { store, tags }
    }

    pub const fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn list(&self) -> Result<Vec<BlogRecord>> {
        self.store.load()
    }

    pub fn view(&self, index: usize) -> Result<BlogRecord> {
        let mut blogs = self.store.load()?;
        check_index(index, blogs.len())?;
        Ok(blogs.swap_remove(index))
    }

    /// Append a new post and persist. Returns its index and the stored record.
    pub fn create(&mut self, form: BlogForm, today: NaiveDate) -> Result<(usize, BlogRecord)> {
        let tags = parse_create_tags(&form.tags);
        self.tags.register_all(&tags);

        let blog = BlogRecord {
            id: self.store.generate_unique_id()?,
            author: form.author,
            title: form.title,
            tags,
            body: form.body,
            created_at: today,
            updated_at: None,
            comments: Vec::new(),
            likes: 0,
            comment_count: 0,
        };

        let mut blogs = self.store.load()?;
        blogs.push(blog.clone());
        self.store.save(&blogs)?;
        Ok((blogs.len() - 1, blog))
    }

    /// Replace the mutable fields of the post at `index` and persist.
    ///
    /// `id`, `created_at`, `comments`, `likes` and `comment_count` carry over.
    pub fn edit(&mut self, index: usize, form: BlogForm, today: NaiveDate) -> Result<BlogRecord> {
        let mut blogs = self.store.load()?;
        check_index(index, blogs.len())?;

        let tags = parse_edit_tags(&form.tags);
        self.tags.register_all(&tags);

        let blog = &mut blogs[index];
        blog.author = form.author;
        blog.title = form.title;
        blog.body = form.body;
        blog.tags = tags;
        blog.updated_at = Some(today);
        let updated = blog.clone();

        self.store.save(&blogs)?;
        Ok(updated)
    }

    /// Remove the post at `index`; later posts shift down by one.
    pub fn delete(&mut self, index: usize) -> Result<BlogRecord> {
        let mut blogs = self.store.load()?;
        check_index(index, blogs.len())?;
        let removed = blogs.remove(index);
        self.store.save(&blogs)?;
        Ok(removed)
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(BlogError::IndexOutOfRange { index, len })
    }
}

//! Flat-file record store
//!
//! The whole collection lives in one comma-separated file with a mandatory
//! header row. Every load reads the entire file and every save rewrites it.

mod record;

pub use record::{BlogRecord, COLUMNS, DATE_FORMAT};

use record::BlogRow;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{BlogError, Result};

/// Record store backed by a single delimited text file
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the full collection in file order.
    ///
    /// A missing file is an empty collection; an empty backing file is
    /// created as a side effect.
    pub fn load(&self) -> Result<Vec<BlogRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.create_empty()?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(BlogError::corrupt(&self.path, e)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| BlogError::corrupt(&self.path, e))?
            .clone();
        // Zero-byte file left behind by a previous load
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if headers.iter().ne(COLUMNS.iter().copied()) {
            return Err(BlogError::corrupt(
                &self.path,
                format!(
                    "expected header '{}', found '{}'",
                    COLUMNS.join(","),
                    headers.iter().collect::<Vec<_>>().join(",")
                ),
            ));
        }

        let mut blogs = Vec::new();
        for row in reader.deserialize::<BlogRow>() {
            let row = row.map_err(|e| BlogError::corrupt(&self.path, e))?;
            let blog = row
                .into_record()
                .map_err(|reason| BlogError::corrupt(&self.path, reason))?;
            blogs.push(blog);
        }
        Ok(blogs)
    }

    /// Overwrite the backing file with the full collection.
    ///
    /// Rows go to a sibling temporary file which is then renamed over the
    /// backing file, so readers see either the old or the new collection.
    pub fn save(&self, blogs: &[BlogRecord]) -> Result<()> {
        self.ensure_parent_dir()?;
        let tmp_path = self.temp_path();

        let file = File::create(&tmp_path).map_err(|e| BlogError::write(&self.path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer
            .write_record(COLUMNS)
            .map_err(|e| BlogError::write(&self.path, io::Error::other(e)))?;
        for blog in blogs {
            writer
                .serialize(BlogRow::from(blog))
                .map_err(|e| BlogError::write(&self.path, io::Error::other(e)))?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| BlogError::write(&self.path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| BlogError::write(&self.path, e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            BlogError::write(&self.path, e)
        })
    }

    /// Random v4 UUID not present in the persisted id column
    pub fn generate_unique_id(&self) -> Result<String> {
        let existing: HashSet<String> = self.load()?.into_iter().map(|blog| blog.id).collect();
        Ok(unique_id(&existing, Uuid::new_v4))
    }

    fn create_empty(&self) -> Result<()> {
        self.ensure_parent_dir()?;
        File::create(&self.path)
            .map(drop)
            .map_err(|e| BlogError::write(&self.path, e))
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BlogError::write(&self.path, e))?;
            }
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Draw from `next` until the value is not in `existing`.
///
/// Unbounded: with random UUIDs a collision is not expected to ever happen.
pub fn unique_id(existing: &HashSet<String>, mut next: impl FnMut() -> Uuid) -> String {
    loop {
        let id = next().to_string();
        if !existing.contains(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn blog(id: &str, tags: &[&str]) -> BlogRecord {
        BlogRecord {
            id: id.to_string(),
            author: "Ada".to_string(),
            title: format!("Post {id}"),
            tags: tags.iter().map(ToString::to_string).collect(),
            body: "Line one\nline \"two\", with comma".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            updated_at: None,
            comments: vec![],
            likes: 0,
            comment_count: 0,
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("blogs.csv"))
    }

    #[test]
    fn test_load_missing_file_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!dir.path().join("blogs.csv").exists());

        let blogs = store.load().unwrap();
        assert!(blogs.is_empty());
        assert!(dir.path().join("blogs.csv").exists());

        // The zero-byte file reads back as empty
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut edited = blog("b", &["z"]);
        edited.updated_at = NaiveDate::from_ymd_opt(2024, 2, 1);
        edited.likes = 3;
        edited.comment_count = 1;
        edited.comments = vec!["nice, really".to_string()];
        let blogs = vec![blog("a", &[]), edited, blog("c", &["has, comma", "x"])];

        store.save(&blogs).unwrap();
        assert_eq!(store.load().unwrap(), blogs);
    }

    #[test]
    fn test_save_empty_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[]).unwrap();

        let content = fs::read_to_string(dir.path().join("blogs.csv")).unwrap();
        assert_eq!(content.trim_end(), COLUMNS.join(","));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_previous_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[blog("a", &[]), blog("b", &[])]).unwrap();
        store.save(&[blog("c", &[])]).unwrap();

        let ids: Vec<_> = store.load().unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["c"]);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("data/nested/blogs.csv"));
        store.save(&[blog("a", &["t"])]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_load_wrong_column_count_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("blogs.csv"), "_id,author,title\n1,Ada,Hello\n").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, BlogError::StorageCorrupt { .. }), "got: {err}");
    }

    #[test]
    fn test_load_short_row_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("blogs.csv"), format!("{}\nabc,,Ada\n", COLUMNS.join(","))).unwrap();

        assert!(matches!(
            store.load(),
            Err(BlogError::StorageCorrupt { .. })
        ));
    }

    #[test]
    fn test_load_bad_date_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            dir.path().join("blogs.csv"),
            format!(
                "{}\nabc,,Ada,Hello,[],World,15/01/2024,,[],0,0\n",
                COLUMNS.join(",")
            ),
        )
        .unwrap();

        match store.load() {
            Err(BlogError::StorageCorrupt { reason, .. }) => {
                assert!(reason.contains("created_date"), "got: {reason}");
            }
            other => panic!("expected StorageCorrupt, got {other:?}"),
        }
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = RecordStore::new(blocker.join("blogs.csv"));

        assert!(matches!(
            store.save(&[blog("a", &[])]),
            Err(BlogError::StorageWriteError { .. })
        ));
    }

    #[test]
    fn test_generate_unique_id_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let id = store.generate_unique_id().unwrap();
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_generate_unique_id_avoids_persisted_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let blogs: Vec<_> = (0..20)
            .map(|_| blog(&Uuid::new_v4().to_string(), &[]))
            .collect();
        store.save(&blogs).unwrap();

        let id = store.generate_unique_id().unwrap();
        assert!(blogs.iter().all(|b| b.id != id));
    }

    #[test]
    fn test_unique_id_retries_on_collision() {
        let taken = Uuid::from_u128(1);
        let fresh = Uuid::from_u128(2);
        let existing: HashSet<String> = [taken.to_string()].into_iter().collect();

        let mut draws = vec![fresh, taken, taken].into_iter().rev();
        let mut calls = 0;
        let id = unique_id(&existing, || {
            calls += 1;
            draws.next().unwrap()
        });

        assert_eq!(id, fresh.to_string());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_unique_id_empty_collection() {
        let id = unique_id(&HashSet::new(), || Uuid::from_u128(7));
        assert_eq!(id, Uuid::from_u128(7).to_string());
    }
}

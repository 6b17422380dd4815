//! Kindle Vocabulary Builder reader.
//!
//! The device keeps its lookups in a SQLite file (`vocab.db`). Only two tables
//! matter here: `WORDS(id, stem, category)`, where `category = 0` marks words
//! still being learned, and `LOOKUPS(word_key, usage)` with one row per lookup.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};
use crate::models::WordRecord;

const UNMASTERED_WORDS_QUERY: &str = "
    SELECT stem, usage
    FROM WORDS AS w JOIN LOOKUPS AS l ON w.id = l.word_key
    WHERE w.category = 0";

/// Read-only handle on a Vocabulary Builder database
pub struct VocabDatabase {
    conn: Connection,
    path: PathBuf,
}

impl VocabDatabase {
    /// Open the database read-only. Nothing is created when the file is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| Error::VocabUnavailable {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Opened vocabulary database at {}", path.display());
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every lookup of a word that has not been mastered, in query order.
    ///
    /// A lookup without usage text yields an empty `usage`.
    pub fn unmastered_words(&self) -> Result<Vec<WordRecord>> {
        let mut statement = self.conn.prepare(UNMASTERED_WORDS_QUERY)?;
        let rows = statement.query_map([], |row| {
            Ok(WordRecord {
                word: row.get(0)?,
                usage: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?;

        let words = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        tracing::debug!("Read {} unmastered lookups", words.len());
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn seed_vocab_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "
            CREATE TABLE WORDS (id TEXT PRIMARY KEY, word TEXT, stem TEXT, lang TEXT,
                                category INTEGER DEFAULT 0, timestamp INTEGER DEFAULT 0);
            CREATE TABLE LOOKUPS (id TEXT PRIMARY KEY, word_key TEXT, book_key TEXT,
                                  usage TEXT, timestamp INTEGER DEFAULT 0);

            INSERT INTO WORDS (id, word, stem, category) VALUES
                ('en:running', 'running', 'run', 0),
                ('en:mastered', 'mastered', 'master', 100),
                ('en:ephemeral', 'ephemeral', 'ephemeral', 0),
                ('en:orphan', 'orphan', 'orphan', 0);
            INSERT INTO LOOKUPS (id, word_key, usage) VALUES
                ('l1', 'en:running', 'She was running late.'),
                ('l2', 'en:mastered', 'He mastered it.'),
                ('l3', 'en:ephemeral', NULL),
                ('l4', 'en:running', 'Running water.');
            ",
        )
        .unwrap();
    }

    #[test]
    fn unmastered_words_joins_lookups_and_skips_mastered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vocab.db");
        seed_vocab_db(&path);

        let db = VocabDatabase::open(&path).unwrap();
        let mut words = db.unmastered_words().unwrap();
        words.sort_by(|a, b| (&a.word, &a.usage).cmp(&(&b.word, &b.usage)));

        assert_eq!(
            words,
            vec![
                WordRecord::new("ephemeral", ""),
                WordRecord::new("run", "Running water."),
                WordRecord::new("run", "She was running late."),
            ]
        );
    }

    #[test]
    fn open_missing_file_is_unavailable_and_creates_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.db");

        let error = VocabDatabase::open(&path).err().unwrap();
        assert!(matches!(error, Error::VocabUnavailable { ref path, .. } if path.ends_with("missing.db")));
        assert!(!path.exists());
    }

    #[test]
    fn wrong_schema_surfaces_as_database_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE notes (id INTEGER);")
            .unwrap();

        let db = VocabDatabase::open(&path).unwrap();
        assert!(matches!(db.unmastered_words(), Err(Error::Database(_))));
    }

    #[test]
    fn connection_is_read_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vocab.db");
        seed_vocab_db(&path);

        let db = VocabDatabase::open(&path).unwrap();
        let write = db.conn.execute("DELETE FROM WORDS", []);
        assert!(write.is_err());
        assert_eq!(db.path(), path.as_path());
    }
}

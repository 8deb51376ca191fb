//! Counter store persisted as one small file per counter.
//!
//! Layout below the root directory:
//!
//! ```text
//! VERSION                                         layout version
//! .lock                                           exclusive lock for writers
//! {code}.counter                                  primary counters
//! prov/{code}/{prov}/{shard}/{owning_id}.counter  provenance counters
//! ```
//!
//! `shard` is `owning_id / 1000`, which keeps directories small without
//! requiring a scan to locate a record. Every record holds the decimal value
//! followed by a newline; a missing record reads as zero.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;

use super::{check_owning_id, CounterError, CounterHandler};
use crate::ontology::{EntityTypeCode, ProvenanceTypeCode};

const LAYOUT_VERSION: &str = "1";
const VERSION_FILE: &str = "VERSION";
const LOCK_FILE: &str = ".lock";
const RECORD_EXTENSION: &str = "counter";
const SHARD_WIDTH: u64 = 1000;

/// Counter store whose every increment survives a process restart.
///
/// Writers are serialized twice: by a mutex inside the process and by an
/// exclusive OS lock on the store directory, so several processes can share
/// one store without losing increments. No value is cached in memory; reads
/// always reflect what is on disk.
#[derive(Debug)]
pub struct DurableCounterHandler {
    root: PathBuf,
    lock: Mutex<File>,
}

impl DurableCounterHandler {
    /// Opens the store rooted at `root`, creating it when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CounterError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| persistence(&root, source))?;

        let lock_path = root.join(LOCK_FILE);
        let lock = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| persistence(&lock_path, source))?;

        {
            let _guard = DirectoryLock::acquire(&lock, &lock_path)?;
            ensure_layout_version(&root.join(VERSION_FILE))?;
        }

        tracing::debug!(root = %root.display(), "durable_counter_store_opened");
        Ok(Self {
            root,
            lock: Mutex::new(lock),
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(
        &self,
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    ) -> PathBuf {
        match provenance {
            Some(prov) => self
                .root
                .join("prov")
                .join(entity.as_str())
                .join(prov.as_str())
                .join((owning_id / SHARD_WIDTH).to_string())
                .join(format!("{owning_id}.{RECORD_EXTENSION}")),
            None => self
                .root
                .join(format!("{}.{RECORD_EXTENSION}", entity.as_str())),
        }
    }
}

impl CounterHandler for DurableCounterHandler {
    fn read_counter(
        &self,
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    ) -> Result<u64, CounterError> {
        check_owning_id(owning_id)?;
        read_record(&self.record_path(entity, provenance, owning_id))
    }

    fn increment_counter(
        &self,
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    ) -> Result<u64, CounterError> {
        check_owning_id(owning_id)?;
        let path = self.record_path(entity, provenance, owning_id);

        let lock = self.lock.lock();
        let _guard = DirectoryLock::acquire(&lock, &self.root.join(LOCK_FILE))?;

        let value = read_record(&path)?
            .checked_add(1)
            .ok_or(CounterError::Exhausted {
                entity,
                provenance,
                owning_id,
            })?;
        write_record(&path, value)?;

        tracing::debug!(
            entity = %entity,
            provenance = ?provenance,
            owning_id,
            value,
            "durable_counter_incremented"
        );
        Ok(value)
    }
}

/// Holds the exclusive OS lock on the store until dropped.
struct DirectoryLock<'a> {
    file: &'a File,
}

impl<'a> DirectoryLock<'a> {
    fn acquire(file: &'a File, path: &Path) -> Result<Self, CounterError> {
        fs2::FileExt::lock_exclusive(file).map_err(|source| persistence(path, source))?;
        Ok(Self { file })
    }
}

impl Drop for DirectoryLock<'_> {
    fn drop(&mut self) {
        if let Err(error) = fs2::FileExt::unlock(self.file) {
            tracing::error!(err.msg = %error, err.detail = ?error, "counter_store_unlock_error");
        }
    }
}

fn ensure_layout_version(path: &Path) -> Result<(), CounterError> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim() == LAYOUT_VERSION => Ok(()),
        Ok(content) => Err(CounterError::Corrupt {
            path: path.to_path_buf(),
            content,
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            write_atomically(path, LAYOUT_VERSION)
        }
        Err(source) => Err(persistence(path, source)),
    }
}

fn read_record(path: &Path) -> Result<u64, CounterError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => return Err(persistence(path, source)),
    };
    content
        .trim()
        .parse::<u64>()
        .map_err(|_| CounterError::Corrupt {
            path: path.to_path_buf(),
            content,
        })
}

fn write_record(path: &Path, value: u64) -> Result<(), CounterError> {
    write_atomically(path, &value.to_string())
}

/// Writes `content` to a sibling temp file, syncs it and renames it over
/// `path`, so readers only ever see the old or the new record.
fn write_atomically(path: &Path, content: &str) -> Result<(), CounterError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| persistence(dir, source))?;
    }

    let tmp_path = tmp_path_for(path);
    let written = (|| -> io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    written.map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        persistence(path, source)
    })
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn persistence(path: &Path, source: io::Error) -> CounterError {
    CounterError::PersistenceFailure {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::DurableCounterHandler;
    use crate::counter::{CounterError, CounterHandler};
    use crate::ontology::{EntityTypeCode, ProvenanceTypeCode};

    #[test]
    fn counters_survive_reopening_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let handler = DurableCounterHandler::open(dir.path()).expect("open");
            for _ in 0..3 {
                handler
                    .increment_entity_counter(EntityTypeCode::ResponsibleAgent)
                    .expect("increment");
            }
            handler
                .increment_counter(
                    EntityTypeCode::ResponsibleAgent,
                    Some(ProvenanceTypeCode::Snapshot),
                    2,
                )
                .expect("increment");
        }

        let reopened = DurableCounterHandler::open(dir.path()).expect("reopen");
        assert_eq!(
            reopened
                .read_entity_counter(EntityTypeCode::ResponsibleAgent)
                .expect("read"),
            3
        );
        assert_eq!(
            reopened
                .read_counter(
                    EntityTypeCode::ResponsibleAgent,
                    Some(ProvenanceTypeCode::Snapshot),
                    2
                )
                .expect("read"),
            1
        );
    }

    #[test]
    fn records_follow_the_documented_layout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handler = DurableCounterHandler::open(dir.path()).expect("open");
        handler
            .increment_entity_counter(EntityTypeCode::Citation)
            .expect("increment");
        handler
            .increment_counter(
                EntityTypeCode::Citation,
                Some(ProvenanceTypeCode::Snapshot),
                1234,
            )
            .expect("increment");

        let primary = fs::read_to_string(dir.path().join("ci.counter")).expect("primary record");
        assert_eq!(primary, "1\n");
        let snapshot = fs::read_to_string(dir.path().join("prov/ci/se/1/1234.counter"))
            .expect("provenance record");
        assert_eq!(snapshot, "1\n");
        let version = fs::read_to_string(dir.path().join("VERSION")).expect("version");
        assert_eq!(version.trim(), "1");
    }

    #[test]
    fn reads_do_not_create_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handler = DurableCounterHandler::open(dir.path()).expect("open");
        assert_eq!(
            handler
                .read_counter(
                    EntityTypeCode::Identifier,
                    Some(ProvenanceTypeCode::Snapshot),
                    7
                )
                .expect("read"),
            0
        );
        assert!(!dir.path().join("prov").exists());
        assert!(!dir.path().join("id.counter").exists());
    }

    #[test]
    fn failed_write_does_not_advance_the_counter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handler = DurableCounterHandler::open(dir.path()).expect("open");
        handler
            .increment_entity_counter(EntityTypeCode::BibliographicResource)
            .expect("increment");

        // a directory squatting on the temp path makes the write fail
        let blocker = dir.path().join("br.counter.tmp");
        fs::create_dir(&blocker).expect("blocker");
        let err = handler
            .increment_entity_counter(EntityTypeCode::BibliographicResource)
            .expect_err("write must fail");
        assert!(matches!(err, CounterError::PersistenceFailure { .. }));
        assert_eq!(
            handler
                .read_entity_counter(EntityTypeCode::BibliographicResource)
                .expect("read"),
            1
        );

        fs::remove_dir(&blocker).expect("remove blocker");
        assert_eq!(
            handler
                .increment_entity_counter(EntityTypeCode::BibliographicResource)
                .expect("increment"),
            2
        );
    }

    #[test]
    fn corrupt_records_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handler = DurableCounterHandler::open(dir.path()).expect("open");
        fs::write(dir.path().join("pl.counter"), "twelve\n").expect("write");
        let err = handler
            .increment_entity_counter(EntityTypeCode::PointerList)
            .expect_err("corrupt record");
        assert!(matches!(err, CounterError::Corrupt { content, .. } if content == "twelve\n"));
    }

    #[test]
    fn saturated_record_is_left_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handler = DurableCounterHandler::open(dir.path()).expect("open");
        let record = dir.path().join("de.counter");
        fs::write(&record, format!("{}\n", u64::MAX)).expect("write");

        let err = handler
            .increment_entity_counter(EntityTypeCode::DiscourseElement)
            .expect_err("no room left");
        assert!(matches!(
            err,
            CounterError::Exhausted { entity: EntityTypeCode::DiscourseElement, .. }
        ));
        assert_eq!(
            fs::read_to_string(&record).expect("record"),
            format!("{}\n", u64::MAX)
        );
    }

    #[test]
    fn unknown_layout_version_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("VERSION"), "9\n").expect("write");
        let err = DurableCounterHandler::open(dir.path()).expect_err("version mismatch");
        assert!(matches!(err, CounterError::Corrupt { .. }));
    }
}

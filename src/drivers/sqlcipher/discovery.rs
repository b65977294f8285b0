//! Candidate file tidying and encrypted-format detection.
//!
//! Discovery works on a raw file list from the host: side-files that SQLite
//! derives from a primary database (`-journal`, `-shm`, `-uid`, `-wal`) are
//! dropped when their primary is present, then each survivor's header is
//! sniffed. A plaintext SQLite header means the file belongs to the plaintext
//! driver; everything else is treated as encrypted and kept.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Header written by plaintext SQLite at offset 0 of every database file.
pub(crate) const SQLITE_MAGIC: [u8; 16] = *b"SQLite format 3\0";

/// Filename suffixes of side-files derived from a primary database.
const UNINTERESTING_SUFFIXES: [&str; 4] = ["-journal", "-shm", "-uid", "-wal"];

/// Drop derived side-files whose primary database is present in the set.
///
/// Input must already be sorted by path; output preserves that order minus
/// dropped entries. A file that merely ends in a reserved suffix but has no
/// primary counterpart in the set is kept as a standalone file.
pub fn tidy_database_list(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let membership: HashSet<PathBuf> = files.iter().cloned().collect();
    files
        .into_iter()
        .filter(|file| match sans_suffix(file) {
            Some(primary) => !membership.contains(&primary),
            None => true,
        })
        .collect()
}

/// The path with one reserved suffix stripped, or `None` if no suffix
/// matched (or the path is not valid UTF-8).
fn sans_suffix(file: &Path) -> Option<PathBuf> {
    let raw = file.to_str()?;
    UNINTERESTING_SUFFIXES
        .iter()
        .find_map(|suffix| raw.strip_suffix(suffix).map(PathBuf::from))
}

/// Whether `file` is in scope for this driver.
///
/// True iff the first 16 bytes do not match the plaintext SQLite magic. A
/// file shorter than the magic compares against zero padding and so fails
/// the match naturally. Read errors are logged and yield `false`: discovery
/// must never abort because one candidate is unreadable.
pub fn is_foreign_format(file: &Path) -> bool {
    match read_header(file) {
        Ok(header) => header != SQLITE_MAGIC,
        Err(err) => {
            tracing::warn!(path = %file.display(), error = %err, "unable to read database file header");
            false
        }
    }
}

fn read_header(file: &Path) -> io::Result<[u8; 16]> {
    let mut input = File::open(file)?;
    let mut header = [0u8; 16];
    let mut filled = 0;
    while filled < header.len() {
        let n = input.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(header)
}

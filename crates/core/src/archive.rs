//! Agent archive validation.
//!
//! Uploaded agents are zip archives. Validation happens entirely in memory and
//! must finish before anything is written to the object store or database.

use crate::error::{Error, Result};
use std::io::{Cursor, Read};

/// File extension required on declared archive names.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Content type used when storing archives.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Summary of a validated archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Member names in central directory order.
    pub members: Vec<String>,
}

impl ArchiveSummary {
    /// Whether the archive contains a member with this exact name.
    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// Default cap on the total uncompressed size of an archive's members.
pub const DEFAULT_MAX_UNPACKED_BYTES: u64 = 1024 * 1024 * 1024;

/// Check that a declared filename carries the archive extension.
///
/// The match is case-sensitive: `AGENT.ZIP` is rejected.
pub fn check_extension(filename: &str) -> Result<()> {
    if filename.ends_with(ARCHIVE_EXTENSION) {
        Ok(())
    } else {
        Err(Error::InvalidFormat(format!(
            "agent file must be a {ARCHIVE_EXTENSION} archive, got '{filename}'"
        )))
    }
}

/// Open the archive in memory and read every member to the end.
///
/// Reading a member to EOF verifies its CRC32, so a successful return means
/// every entry decompresses cleanly. When `required_member` is given it must
/// appear in the member list.
///
/// Members may expand to at most `max_unpacked_bytes` in total. Both the
/// sizes declared in the central directory and the bytes actually inflated
/// count against the limit, so a lying header cannot get past it.
///
/// This is CPU-bound; async callers should run it on a blocking thread.
pub fn verify_archive(
    data: &[u8],
    required_member: Option<&str>,
    max_unpacked_bytes: u64,
) -> Result<ArchiveSummary> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| Error::CorruptArchive(format!("cannot open archive: {e}")))?;

    let declared = (0..archive.len())
        .filter_map(|index| archive.by_index_raw(index).ok().map(|entry| entry.size()))
        .fold(0u64, u64::saturating_add);
    if declared > max_unpacked_bytes {
        return Err(too_large(max_unpacked_bytes));
    }

    let mut members = Vec::with_capacity(archive.len());
    let mut unpacked = 0u64;
    let mut buf = [0u8; 8192];
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::CorruptArchive(format!("cannot read entry {index}: {e}")))?;
        let name = entry.name().to_string();
        loop {
            let n = entry
                .read(&mut buf)
                .map_err(|e| Error::CorruptArchive(format!("entry '{name}' failed check: {e}")))?;
            if n == 0 {
                break;
            }
            unpacked += n as u64;
            if unpacked > max_unpacked_bytes {
                return Err(too_large(max_unpacked_bytes));
            }
        }
        members.push(name);
    }

    let summary = ArchiveSummary { members };

    if let Some(required) = required_member
        && !summary.contains(required)
    {
        return Err(Error::CorruptArchive(format!(
            "required file '{required}' is missing from the archive"
        )));
    }

    Ok(summary)
}

fn too_large(limit: u64) -> Error {
    Error::CorruptArchive(format!("archive expands beyond {limit} bytes"))
}

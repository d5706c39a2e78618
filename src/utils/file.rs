use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::core::models::{artifact_filename, ExportFormat};

/// How many later timestamps to try when the first name is taken.
const MAX_NAME_ATTEMPTS: i64 = 1000;

/// Writes `bytes` as `qr-<millis>.<ext>` in `dir`, never replacing an existing file.
///
/// A taken name moves the token forward one millisecond at a time, so every
/// name still reads as `qr-<digits>.<ext>`.
pub fn write_unique(
    dir: &Path,
    format: ExportFormat,
    timestamp_millis: i64,
    bytes: &[u8],
) -> io::Result<(PathBuf, String)> {
    for bump in 0..MAX_NAME_ATTEMPTS {
        let filename = artifact_filename(format, timestamp_millis + bump);
        let path = dir.join(&filename);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };

        if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = std::fs::remove_file(&path);
            return Err(e);
        }

        return Ok((path, filename));
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name near qr-{}.{}", timestamp_millis, format.extension()),
    ))
}

/// Output directory for CLI exports: explicit flag, then config, then the working directory.
pub fn resolve_output_dir(flag: Option<&Path>, configured: Option<&Path>) -> io::Result<PathBuf> {
    match flag.or(configured) {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir(),
    }
}

use crate::data::{Error, Report};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

/// Basic JSON exporter for a `Report`, indented by two spaces.
pub(crate) fn write_report<W: Write>(writer: W, report: &Report) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(writer, report)
}

/// Writes the report to `path`, creating its directory if needed.
///
/// The document is fully serialized first, then written to a temporary file
/// next to the target and renamed over it, so readers either see the previous
/// document or the new one, never a truncated one.
pub(crate) fn save_report(path: &Path, report: &Report) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(Error::io(&dir))?;

    let mut buffer = Vec::new();
    write_report(&mut buffer, report)?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(Error::io(&dir))?;
    tmp.write_all(&buffer).map_err(Error::io(tmp.path()))?;
    tmp.as_file().sync_all().map_err(Error::io(tmp.path()))?;
    // temp files are private, the dashboard needs to read this one
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(Error::io(tmp.path()))?;
    }
    debug!("persisting {} to {}", tmp.path().display(), path.display());
    tmp.persist(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Gzip,
}

impl ArchiveKind {
    fn extension(self) -> &'static str {
        match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::Gzip => "gz",
        }
    }
}

/// `games.csv` -> `games.csv.zip` / `games.csv.gz`
pub fn archive_path(path: &Path, kind: ArchiveKind) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(kind.extension());
    PathBuf::from(name)
}

/// Make sure `path` exists as a plain file, decompressing a sibling archive
/// in place when it does not.
pub fn ensure_plain(path: &Path, table: &'static str) -> Result<(), LoadError> {
    if path.is_file() {
        return Ok(());
    }

    for kind in [ArchiveKind::Zip, ArchiveKind::Gzip] {
        let archive = archive_path(path, kind);
        if archive.is_file() {
            tracing::debug!("Extracting {} into {}", archive.display(), path.display());
            return extract(&archive, path, kind);
        }
    }

    Err(LoadError::MissingSource {
        table,
        path: path.to_path_buf(),
    })
}

fn extract(archive: &Path, target: &Path, kind: ArchiveKind) -> Result<(), LoadError> {
    // Readers only ever see a complete file.
    let mut partial: OsString = target.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let result = match kind {
        ArchiveKind::Zip => extract_zip(archive, target, &partial),
        ArchiveKind::Gzip => extract_gzip(archive, &partial),
    };

    if let Err(e) = result {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    fs::rename(&partial, target).map_err(|e| LoadError::io(target, e))
}

fn extract_zip(archive: &Path, target: &Path, partial: &Path) -> Result<(), LoadError> {
    let archive_error = |message: String| LoadError::Archive {
        path: archive.to_path_buf(),
        message,
    };

    let file = File::open(archive).map_err(|e| LoadError::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;

    let wanted = target.file_name();
    let entry_name = zip
        .file_names()
        .find(|name| Path::new(name).file_name() == wanted)
        .or_else(|| zip.file_names().find(|name| name.ends_with(".csv")))
        .map(str::to_string)
        .ok_or_else(|| archive_error("no CSV entry in archive".to_string()))?;

    let mut entry = zip
        .by_name(&entry_name)
        .map_err(|e| archive_error(e.to_string()))?;
    let mut out = File::create(partial).map_err(|e| LoadError::io(partial, e))?;
    io::copy(&mut entry, &mut out).map_err(|e| archive_error(e.to_string()))?;
    Ok(())
}

fn extract_gzip(archive: &Path, partial: &Path) -> Result<(), LoadError> {
    let file = File::open(archive).map_err(|e| LoadError::io(archive, e))?;
    let mut decoder = GzDecoder::new(file);
    let mut out = File::create(partial).map_err(|e| LoadError::io(partial, e))?;
    io::copy(&mut decoder, &mut out).map_err(|e| LoadError::Archive {
        path: archive.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(())
}

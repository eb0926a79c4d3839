//! Archive naming, creation, listing and extraction.
//!
//! Archives are plain zip files named
//! `<profile-name>-<YYYYMMDD>-<HHMMSS>[ <suffix>].zip` inside the profile's
//! storage directory. The filesystem is the only record of which archives exist.

use crate::Result;
use crate::constants::ARCHIVE_EXTENSION;
use crate::error::BackupError;
use crate::path_util;
use crate::profile::Profile;
use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Returns the identifier `<name>-<YYYYMMDD>-<HHMMSS>` of an archive created at `now`.
///
/// Identifiers have one second resolution, two archives created within the
/// same second share an identifier.
pub fn archive_id(profile: &Profile, now: NaiveDateTime) -> String {
    format!("{}-{}", profile.name, now.format("%Y%m%d-%H%M%S"))
}

/// Returns the file name of a new archive created right now.
pub fn archive_filename(profile: &Profile, suffix: &str) -> String {
    archive_filename_at(profile, suffix, Local::now().naive_local())
}

/// Returns the file name of an archive created at `now`, with an optional suffix
/// placed between the identifier and the extension.
pub fn archive_filename_at(profile: &Profile, suffix: &str, now: NaiveDateTime) -> String {
    let id = archive_id(profile, now);
    let suffix = suffix.trim();
    if suffix.is_empty() {
        format!("{id}.{ARCHIVE_EXTENSION}")
    } else {
        format!("{id} {suffix}.{ARCHIVE_EXTENSION}")
    }
}

/// Returns true if `file_name` is an archive created from a profile called `profile_name`.
///
/// The name must be followed by a complete timestamp, so archives of a profile
/// called `game-2` are never mistaken for archives of `game`.
pub fn is_archive_of(profile_name: &str, file_name: &str) -> bool {
    let Some(rest) = file_name
        .strip_prefix(profile_name)
        .and_then(|rest| rest.strip_prefix('-'))
    else {
        return false;
    };
    let Some(stem) = rest.strip_suffix(ARCHIVE_EXTENSION) else {
        return false;
    };
    let Some(stem) = stem.strip_suffix('.') else {
        return false;
    };
    let bytes = stem.as_bytes();
    if bytes.len() < 15 {
        return false;
    }
    let (stamp, tail) = bytes.split_at(15);
    let digits = |range: &[u8]| range.iter().all(u8::is_ascii_digit);
    digits(&stamp[..8])
        && stamp[8] == b'-'
        && digits(&stamp[9..])
        && (tail.is_empty() || tail[0] == b' ')
}

/// Creates `storage/filename` from the profile's target.
///
/// A file target becomes a single entry named after the file; a directory
/// target contributes its contents, without the directory itself as root.
/// An existing archive with the same name is overwritten.
///
/// # Errors
/// [`BackupError::TargetMissing`] if the target is neither a file nor a
/// directory, [`BackupError::StorageMissing`] if the storage is not a directory.
pub fn store(profile: &Profile, filename: &str) -> Result<PathBuf> {
    let target = profile.target_path();
    let storage = profile.storage_path();
    if !target.is_file() && !target.is_dir() {
        return Err(BackupError::TargetMissing(target).into());
    }
    if !storage.is_dir() {
        return Err(BackupError::StorageMissing(storage).into());
    }

    let destination = storage.join(filename);
    let method = if profile.compression {
        CompressionMethod::Deflated
    } else {
        CompressionMethod::Stored
    };
    let options = SimpleFileOptions::default().compression_method(method);
    let file = File::create(&destination)
        .with_context(|| format!("Cannot create archive {}", destination.display()))?;
    if let Err(e) = write_archive(file, &target, &storage, options) {
        // Never leave a partial archive behind.
        if let Err(cleanup) = fs::remove_file(&destination) {
            warn!(
                archive = %destination.display(),
                error = %cleanup,
                "cannot remove partial archive"
            );
        }
        return Err(e);
    }

    info!(archive = %destination.display(), compression = profile.compression, "archive created");
    Ok(destination)
}

fn write_archive(
    file: File,
    target: &Path,
    storage: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut zip = ZipWriter::new(file);
    if target.is_file() {
        store_file(&mut zip, target, options)?;
    } else {
        store_dir(&mut zip, target, storage, options)?;
    }
    zip.finish()?;
    Ok(())
}

fn store_file(zip: &mut ZipWriter<File>, src: &Path, options: SimpleFileOptions) -> Result<()> {
    let name = src
        .file_name()
        .with_context(|| format!("Invalid file name {}", src.display()))?
        .to_string_lossy()
        .into_owned();
    add_file(zip, src, name, options)
}

fn add_file(
    zip: &mut ZipWriter<File>,
    src: &Path,
    name: String,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut f = File::open(src).with_context(|| format!("Cannot read {}", src.display()))?;
    zip.start_file(name, options)?;
    io::copy(&mut f, zip)?;
    Ok(())
}

/// Symbolic links are not descended into. A link to a regular file is stored
/// with the file's contents, any other link is skipped.
fn store_dir(
    zip: &mut ZipWriter<File>,
    src: &Path,
    storage: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let root = src.canonicalize()?;
    let storage = storage.canonicalize()?;

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !entry.path().starts_with(&storage));
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        let name = entry_name(path.strip_prefix(&root)?);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            zip.add_directory(name, options)?;
        } else if file_type.is_file() || fs::metadata(path).is_ok_and(|m| m.is_file()) {
            debug!(entry = %name, "adding file");
            add_file(zip, path, name, options)?;
        } else {
            warn!(entry = %name, "skipping entry that is not a regular file");
        }
    }
    Ok(())
}

/// Zip entry names always use `/`, whatever the platform separator is.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lists the archives of `profile`, oldest first.
///
/// A non-blank `filter` keeps only names containing it, ignoring case.
/// Archives are ordered by creation time, so the most recent one is last.
///
/// # Errors
/// [`BackupError::StorageMissing`] if the storage is not a directory.
pub fn find_archives(profile: &Profile, filter: &str) -> Result<Vec<String>> {
    let storage = profile.storage_path();
    if !storage.is_dir() {
        return Err(BackupError::StorageMissing(storage).into());
    }
    let filter = filter.trim().to_lowercase();

    let mut found: Vec<(SystemTime, String)> = vec![];
    for entry in fs::read_dir(&storage)
        .with_context(|| format!("Cannot read storage {}", storage.display()))?
    {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_archive_of(&profile.name, &name) {
            continue;
        }
        if !filter.is_empty() && !name.to_lowercase().contains(&filter) {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let created = metadata.created().or_else(|_| metadata.modified())?;
        found.push((created, name));
    }
    found.sort();
    Ok(found.into_iter().map(|(_, name)| name).collect())
}

/// Extracts `storage/filename` over the profile's target and returns the
/// directory it was extracted into.
///
/// A directory target receives the archive contents, a file target is
/// restored next to itself. When the target is gone, an archive holding a
/// single entry named like the target is treated as a file backup, anything
/// else recreates the target directory. Existing files are overwritten.
///
/// # Errors
/// [`BackupError::ArchiveMissing`] if the archive does not exist.
pub fn restore(profile: &Profile, filename: &str) -> Result<PathBuf> {
    let source = profile.storage_path().join(filename);
    if !source.is_file() {
        return Err(BackupError::ArchiveMissing(source).into());
    }
    let file = File::open(&source)
        .with_context(|| format!("Cannot open archive {}", source.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("Invalid zip archive {}", source.display()))?;

    let target = profile.target_path();
    let destination = if target.is_dir() {
        target
    } else if target.is_file() || holds_single_file(&archive, &target) {
        path_util::parent_dir(&target)
    } else {
        target
    };
    extract(&mut archive, &destination)?;

    info!(archive = %source.display(), destination = %destination.display(), "archive restored");
    Ok(destination)
}

fn holds_single_file<R: Read + Seek>(archive: &ZipArchive<R>, target: &Path) -> bool {
    let mut names = archive.file_names();
    match (names.next(), names.next()) {
        (Some(name), None) => Some(OsStr::new(name)) == target.file_name(),
        _ => false,
    }
}

fn extract<R: Read + Seek>(archive: &mut ZipArchive<R>, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination)?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            warn!(entry = entry.name(), "skipping entry outside of destination");
            continue;
        };
        let out = destination.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut f = File::create(&out)
            .with_context(|| format!("Cannot write {}", out.display()))?;
        io::copy(&mut entry, &mut f)?;
    }
    Ok(())
}

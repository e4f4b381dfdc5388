//! Utilities for feeding `rodio` sinks from local audio files.
//!
//! Opening/decoding a file and queueing it at a given start position is the
//! only seeking primitive the native backend uses.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use lofty::read_from_path;
use rodio::source::SkipDuration;
use rodio::{Decoder, Sink, Source};

use super::error::BackendError;

pub(super) type FileSource = SkipDuration<Decoder<BufReader<File>>>;

/// Map a playable URL to a local path. Only plain paths and `file://` URLs are local.
pub(super) fn local_path(url: &str) -> Result<PathBuf, BackendError> {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if url.is_empty() || url.contains("://") {
        return Err(BackendError::Unsupported(url.to_string()));
    }
    Ok(PathBuf::from(url))
}

/// Decode `path` and skip to `start_at`.
pub(super) fn decode_at(path: &Path, start_at: Duration) -> Result<FileSource, BackendError> {
    let url = path.display().to_string();
    let file = File::open(path).map_err(|source| BackendError::Open {
        url: url.clone(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| BackendError::Decode {
        url,
        reason: e.to_string(),
    })?;

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    Ok(source.skip_duration(start_at))
}

/// Replace whatever `sink` holds with `path` starting at `start_at`. The sink is left paused.
pub(super) fn requeue_at(sink: &Sink, path: &Path, start_at: Duration) -> Result<(), BackendError> {
    let source = decode_at(path, start_at)?;
    sink.clear();
    sink.append(source);
    sink.pause();
    Ok(())
}

/// Duration and title from the file's tags, when readable.
pub(super) fn probe_tags(path: &Path) -> (Option<Duration>, Option<String>) {
    let Ok(tagged) = read_from_path(path) else {
        return (None, None);
    };

    let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
    let title = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .and_then(|tag| tag.title().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty());

    (duration, title)
}

//! Tag copying using lofty
//!
//! The trimmed output is a fresh file with no metadata. Tags of the source
//! recording are carried over so the result still identifies as the same
//! episode. Track and disc counters no longer apply to the edited file and are
//! reset to 0; a multi-valued year keeps its first value.

use crate::error::RemovalError;
use crate::sink::{emit, LogSink};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::tag::{ItemKey, ItemValue, Tag, TagExt, TagItem};
use std::path::Path;

/// Text to write for `key` given the source value
pub fn copied_text(key: &ItemKey, value: &str) -> String {
    match key {
        ItemKey::TrackTotal | ItemKey::DiscNumber | ItemKey::DiscTotal => "0".to_string(),
        ItemKey::Year | ItemKey::RecordingDate => value
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        _ => value.to_string(),
    }
}

/// Copy the tags of `source` onto `target`
///
/// Text, locator and picture items are copied. Binary items, and keys the
/// target's tag format cannot hold, are skipped. Each key is reported to
/// `sink` as it is set.
///
/// # Returns
///
/// Number of items written (0 if the source has no tags; `target` is then
/// left untouched)
///
/// # Errors
///
/// Returns `RemovalError::TagError` if either file cannot be read or the
/// target cannot be written
pub fn copy_tags(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    sink: Option<&dyn LogSink>,
) -> Result<usize, RemovalError> {
    let source = source.as_ref();
    let target = target.as_ref();
    let tag_err = |path: &Path, e: lofty::error::LoftyError| {
        RemovalError::TagError(format!("{}: {}", path.display(), e))
    };

    let source_file = lofty::read_from_path(source).map_err(|e| tag_err(source, e))?;
    let Some(source_tag) = source_file.primary_tag().or_else(|| source_file.first_tag()) else {
        log::debug!("No tags in {}; nothing to copy", source.display());
        return Ok(0);
    };

    let target_file = lofty::read_from_path(target).map_err(|e| tag_err(target, e))?;
    let mut tag = Tag::new(target_file.primary_tag_type());

    let mut copied = 0;
    for item in source_tag.items() {
        let key = item.key();
        let value = match item.value() {
            ItemValue::Text(text) => ItemValue::Text(copied_text(key, text)),
            ItemValue::Locator(locator) => ItemValue::Locator(locator.clone()),
            _ => {
                log::debug!("Skipping binary tag item {:?}", key);
                continue;
            }
        };

        emit(sink, || format!("Setting {:?}", key));
        if tag.insert(TagItem::new(key.clone(), value)) {
            copied += 1;
        } else {
            log::debug!("{:?} has no equivalent in {:?}", key, tag.tag_type());
        }
    }

    for picture in source_tag.pictures() {
        tag.push_picture(picture.clone());
        copied += 1;
    }

    tag.save_to_path(target, WriteOptions::default())
        .map_err(|e| tag_err(target, e))?;
    emit(sink, || format!("{} saved", target.display()));

    Ok(copied)
}

//! Slideshow tagging for notebook cells.
//!
//! Slide renderers read `metadata.slideshow.slide_type` on every cell. This
//! module owns that one key: it only ever stores a recognized role, keeps any
//! other fields found under `slideshow`, and removes the key instead of
//! leaving an empty object behind.

use serde_json::Map;
use serde_json::Value;
use slide_layout_protocol::Cell;
use slide_layout_protocol::Metadata;
use tracing::debug;
use tracing::warn;

use crate::host::NotebookHost;

pub const SLIDESHOW_KEY: &str = "slideshow";
pub const SLIDE_TYPE_KEY: &str = "slide_type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideRole {
    /// Starts a new horizontal slide
    Slide,
    /// Starts a vertical slide below the current one
    Subslide,
    /// Revealed step by step within the current slide
    Fragment,
    /// Not shown in the slideshow
    Skip,
    /// Speaker notes
    Notes,
}

impl SlideRole {
    pub const ALL: [SlideRole; 5] = [
        SlideRole::Slide,
        SlideRole::Subslide,
        SlideRole::Fragment,
        SlideRole::Skip,
        SlideRole::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlideRole::Slide => "slide",
            SlideRole::Subslide => "subslide",
            SlideRole::Fragment => "fragment",
            SlideRole::Skip => "skip",
            SlideRole::Notes => "notes",
        }
    }

    /// Exact, case-sensitive match against the stored spelling.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == s)
    }
}

impl std::str::FromStr for SlideRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Invalid slide role '{s}'. Use: slide, subslide, fragment, skip, notes")
        })
    }
}

impl std::fmt::Display for SlideRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a cell's `slideshow` key.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideshowUpdate {
    /// Delete the key from the cell metadata.
    Remove,
    /// Replace the key with this object. Never empty.
    Set(Map<String, Value>),
}

/// Computes the new `slideshow` entry for a cell.
///
/// `existing` is the cell's current `slideshow` value; anything that is not
/// a JSON object counts as absent. `requested` of `None`, `""` or any string
/// outside [`SlideRole::ALL`] clears `slide_type`. Fields other than
/// `slide_type` are carried over untouched. The input is never modified.
pub fn set_slide_role(existing: Option<&Value>, requested: Option<&str>) -> SlideshowUpdate {
    let mut entry = match existing {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    match requested.and_then(SlideRole::parse) {
        Some(role) => {
            entry.insert(
                SLIDE_TYPE_KEY.to_string(),
                Value::String(role.as_str().to_string()),
            );
        }
        None => {
            entry.remove(SLIDE_TYPE_KEY);
        }
    }

    if entry.is_empty() {
        SlideshowUpdate::Remove
    } else {
        SlideshowUpdate::Set(entry)
    }
}

/// Writes `update` into `metadata` as a single insert or remove.
pub fn apply_slideshow_update(metadata: &mut Metadata, update: SlideshowUpdate) {
    match update {
        SlideshowUpdate::Remove => {
            metadata.remove(SLIDESHOW_KEY);
        }
        SlideshowUpdate::Set(entry) => {
            metadata.insert(SLIDESHOW_KEY.to_string(), Value::Object(entry));
        }
    }
}

/// Normalizes the slide role of the cell at `index` with one metadata read
/// and one metadata write through the host. Returns `false` without touching
/// anything when there is no such cell.
pub fn set_cell_slide<H>(host: &mut H, index: usize, role: Option<&str>) -> bool
where
    H: NotebookHost + ?Sized,
{
    let Some(current) = host.cell_metadata(index) else {
        debug!(index, "no target cell, slide role left unchanged");
        return false;
    };

    if let Some(requested) = role {
        if !requested.is_empty() && SlideRole::parse(requested).is_none() {
            warn!("unrecognized slide role '{requested}', clearing slide_type");
        }
    }

    let mut metadata = current.clone();
    let update = set_slide_role(metadata.get(SLIDESHOW_KEY), role);
    apply_slideshow_update(&mut metadata, update);
    host.set_cell_metadata(index, metadata).is_ok()
}

/// The recognized role stored on `cell`, if any.
pub fn slide_role_of(cell: &Cell) -> Option<SlideRole> {
    cell.metadata
        .get(SLIDESHOW_KEY)?
        .get(SLIDE_TYPE_KEY)?
        .as_str()
        .and_then(SlideRole::parse)
}

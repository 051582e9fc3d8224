use crate::PhotoError;

/// Named resolution URLs for a photo.
///
/// Only `original` is guaranteed to be non-empty; every other rendition may be missing upstream
/// and is represented by an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhotoSrc {
    pub original: String,
    pub large2x: String,
    pub large: String,
    pub medium: String,
    pub small: String,
    pub portrait: String,
    pub landscape: String,
    pub tiny: String,
}

impl PhotoSrc {
    /// Creates a source set that only carries the original rendition.
    pub fn original(url: impl Into<String>) -> Self {
        Self {
            original: url.into(),
            ..Self::default()
        }
    }

    /// Picks the smallest rendition that is nominally at least `rendered_width` pixels wide.
    ///
    /// Nominal widths: `medium` 350, `large` 940, `large2x` 1880. Empty renditions are skipped
    /// and `original` is the final fallback.
    pub fn for_width(&self, rendered_width: f64) -> &str {
        let ladder: [(f64, &str); 3] = [
            (350.0, self.medium.as_str()),
            (940.0, self.large.as_str()),
            (1880.0, self.large2x.as_str()),
        ];
        ladder
            .iter()
            .filter(|(nominal, url)| rendered_width <= *nominal && !url.is_empty())
            .map(|(_, url)| *url)
            .next()
            .unwrap_or(self.original.as_str())
    }
}

/// A photo record as delivered by the upstream source. Immutable once fetched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Photo {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub src: PhotoSrc,
    #[cfg_attr(feature = "serde", serde(default))]
    pub alt: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub photographer: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub photographer_url: String,
    /// Landing page of the photo on the upstream site.
    #[cfg_attr(feature = "serde", serde(default))]
    pub url: Option<String>,
    /// Average color, used as a placeholder while the image loads (e.g. `"#7A6F5C"`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub avg_color: Option<String>,
}

impl Photo {
    pub fn new(id: u64, width: u32, height: u32, original: impl Into<String>) -> Self {
        Self {
            id,
            width,
            height,
            src: PhotoSrc::original(original),
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    pub fn with_photographer(mut self, photographer: impl Into<String>) -> Self {
        self.photographer = photographer.into();
        self
    }

    /// `width / height`. Only meaningful for photos that pass [`Photo::validate`].
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn validate(&self) -> Result<(), PhotoError> {
        if self.width == 0 || self.height == 0 {
            return Err(PhotoError::InvalidDimensions {
                id: self.id,
                width: self.width,
                height: self.height,
            });
        }
        if self.src.original.is_empty() {
            return Err(PhotoError::MissingOriginal { id: self.id });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Identity of a photo list: its length plus an FNV-1a fingerprint over `(id, width, height)`.
///
/// Used as the photo component of cache keys. Two lists with the same count but different
/// photos get different ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhotoSetId {
    pub len: usize,
    pub fingerprint: u64,
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl PhotoSetId {
    pub fn of(photos: &[Photo]) -> Self {
        let mut h = FNV_OFFSET;
        for p in photos {
            for word in [p.id, p.width as u64, p.height as u64] {
                for byte in word.to_le_bytes() {
                    h ^= byte as u64;
                    h = h.wrapping_mul(FNV_PRIME);
                }
            }
        }
        Self {
            len: photos.len(),
            fingerprint: h,
        }
    }
}

/// A laid-out photo. Produced by the layout calculator and read-only downstream.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridItem {
    /// Position of the source photo in the slice that was laid out.
    pub index: usize,
    pub photo_id: u64,
    pub column: usize,
    pub column_span: usize,
    /// Offset from the top of the grid.
    pub top: f64,
    /// Offset from the left edge of the container.
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl GridItem {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A render record handed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement<'a> {
    pub photo: &'a Photo,
    pub index: usize,
    pub column: usize,
    pub column_span: usize,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl<'a> Placement<'a> {
    pub fn new(photo: &'a Photo, item: &GridItem) -> Self {
        Self {
            photo,
            index: item.index,
            column: item.column,
            column_span: item.column_span,
            top: item.top,
            left: item.left,
            width: item.width,
            height: item.height,
        }
    }

    /// The image URL best suited to this placement's rendered width.
    pub fn image_url(&self) -> &'a str {
        self.photo.src.for_width(self.width)
    }
}

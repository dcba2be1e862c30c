use base64::{Engine as _, engine::general_purpose::STANDARD};
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::numeric::{parse_numeric, text_or_number};

/// A catalog entry describing one Big Thing.
///
/// Ratings and coordinates travel as text. Use [`BigThing::rating_value`],
/// [`BigThing::latitude_value`] and [`BigThing::longitude_value`] for their
/// numeric form; malformed values read as `0.0`.
///
/// # Examples
/// ```
/// use bigthings_core::BigThing;
///
/// let json = r#"[{
///     "id": "12",
///     "name": "The Big Banana",
///     "location": "Coffs Harbour, NSW",
///     "description": "A very large banana.",
///     "rating": "4.2",
///     "latitude": "-30.2762",
///     "longitude": "153.1352",
///     "image": "bigbanana.jpg"
/// }]"#;
///
/// let records: Vec<BigThing> = serde_json::from_str(json)?;
/// assert_eq!(records[0].rating_value(), 4.2);
/// assert!(!records[0].is_favorite());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigThing {
    /// Server-assigned identifier, or a UUID for local-only submissions.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text location label such as a town and state.
    #[serde(default)]
    pub location: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Average rating as text.
    #[serde(default, deserialize_with = "text_or_number")]
    pub rating: String,
    /// Latitude in decimal degrees, as text.
    #[serde(default, deserialize_with = "text_or_number")]
    pub latitude: String,
    /// Longitude in decimal degrees, as text.
    #[serde(default, deserialize_with = "text_or_number")]
    pub longitude: String,
    /// Image filename relative to the catalog's image directory, or an inline
    /// Base64 payload for local submissions.
    #[serde(default)]
    pub image: String,
    /// Whether the record is marked as a favorite.
    #[serde(
        default,
        rename = "isFavorite",
        skip_serializing_if = "Option::is_none"
    )]
    pub favorite: Option<bool>,
    /// Whether the user has visited the location.
    #[serde(default, rename = "isVisited", skip_serializing_if = "Option::is_none")]
    pub visited: Option<bool>,
    /// Whether the user has already rated the record.
    #[serde(default, rename = "hasRated", skip_serializing_if = "Option::is_none")]
    pub rated: Option<bool>,
}

impl BigThing {
    /// Rating parsed as a number, `0.0` when absent or malformed.
    #[must_use]
    pub fn rating_value(&self) -> f64 {
        parse_numeric(&self.rating)
    }

    /// Latitude parsed as a number, `0.0` when absent or malformed.
    #[must_use]
    pub fn latitude_value(&self) -> f64 {
        parse_numeric(&self.latitude)
    }

    /// Longitude parsed as a number, `0.0` when absent or malformed.
    #[must_use]
    pub fn longitude_value(&self) -> f64 {
        parse_numeric(&self.longitude)
    }

    /// Map position with `x = longitude` and `y = latitude`.
    ///
    /// # Examples
    /// ```
    /// use bigthings_core::BigThing;
    ///
    /// let thing: BigThing = serde_json::from_str(
    ///     r#"{"id": "1", "name": "Big Prawn", "latitude": "-28.86", "longitude": 153.58}"#,
    /// )?;
    /// let coord = thing.coordinate();
    /// assert_eq!((coord.x, coord.y), (153.58, -28.86));
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    #[must_use]
    pub fn coordinate(&self) -> Coord<f64> {
        Coord {
            x: self.longitude_value(),
            y: self.latitude_value(),
        }
    }

    /// Whether the record carries the favorite flag.
    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.favorite.unwrap_or(false)
    }

    /// Whether the record carries the visited flag.
    #[must_use]
    pub fn is_visited(&self) -> bool {
        self.visited.unwrap_or(false)
    }

    /// Classify the image field.
    #[must_use]
    pub fn image_ref(&self) -> ImageRef<'_> {
        ImageRef::classify(&self.image)
    }

    /// Case-insensitive substring match against the name or location.
    ///
    /// The needle must already be lower-cased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.location.to_lowercase().contains(needle)
    }
}

/// Where a record's image lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// The record has no image.
    None,
    /// A filename served from the catalog's image directory.
    Remote(&'a str),
    /// An inline Base64-encoded image, as produced by local submissions.
    Inline(&'a str),
}

impl<'a> ImageRef<'a> {
    /// Classify a raw image field.
    ///
    /// Filenames carry an extension and Base64 never contains `.`. A value
    /// without one counts as inline only when it decodes as standard Base64
    /// to bytes starting with a JPEG, PNG, GIF or WebP signature, so short
    /// extensionless names such as `abcd` stay remote.
    ///
    /// # Examples
    /// ```
    /// use bigthings_core::ImageRef;
    ///
    /// assert_eq!(ImageRef::classify(""), ImageRef::None);
    /// assert_eq!(ImageRef::classify("bigbanana.jpg"), ImageRef::Remote("bigbanana.jpg"));
    /// assert_eq!(ImageRef::classify("/9j/4AAQ"), ImageRef::Inline("/9j/4AAQ"));
    /// assert_eq!(ImageRef::classify("banana"), ImageRef::Remote("banana"));
    /// assert_eq!(ImageRef::classify("abcd"), ImageRef::Remote("abcd"));
    /// ```
    #[must_use]
    pub fn classify(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::None;
        }
        if trimmed.contains('.') {
            return Self::Remote(trimmed);
        }
        match STANDARD.decode(trimmed) {
            Ok(bytes) if has_image_signature(&bytes) => Self::Inline(trimmed),
            _ => Self::Remote(trimmed),
        }
    }

    /// Decode inline image bytes; `None` for remote or missing images.
    #[must_use]
    pub fn decode_inline(&self) -> Option<Vec<u8>> {
        match self {
            Self::Inline(data) => STANDARD.decode(data).ok(),
            Self::None | Self::Remote(_) => None,
        }
    }
}

const IMAGE_SIGNATURES: [&[u8]; 4] = [
    b"\xff\xd8\xff",
    b"\x89PNG\r\n\x1a\n",
    b"GIF8",
    b"RIFF",
];

fn has_image_signature(bytes: &[u8]) -> bool {
    IMAGE_SIGNATURES
        .iter()
        .any(|signature| bytes.starts_with(signature))
}

/// A record merged with its local cache state.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// The catalog record.
    pub record: BigThing,
    /// Whether the local cache holds the record as a favorite.
    pub favorite: bool,
    /// The rating the user submitted from this device, if any.
    pub local_rating: Option<f64>,
}

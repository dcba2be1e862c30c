//! Validated submissions of new catalog entries.
//!
//! Form input arrives as optional text; blank strings count as absent. A
//! submission needs a name plus either a coordinate pair or an address.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::BigThing;

/// Location label used when a submission carries only coordinates.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Description used when a submission omits one.
pub const MISSING_DESCRIPTION: &str = "No description provided";

/// Rating assigned to freshly submitted records.
pub const INITIAL_RATING: &str = "0.0";

/// Coordinate text used when a submission carries only an address.
const MISSING_COORDINATE: &str = "0.0";

/// Errors returned by [`SubmissionBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The name was absent or blank.
    #[error("a name is required")]
    MissingName,
    /// Neither a full coordinate pair nor an address was supplied.
    #[error("either a latitude and longitude or an address is required")]
    MissingLocation,
    /// A coordinate was not a number within its valid range.
    #[error("{axis} {value:?} is not a valid coordinate")]
    InvalidCoordinate {
        /// Which axis failed validation.
        axis: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Where a submitted Big Thing is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionLocation {
    /// Decimal-degree coordinates kept in their submitted text form.
    Coordinates {
        /// Latitude in `-90..=90`.
        latitude: String,
        /// Longitude in `-180..=180`.
        longitude: String,
    },
    /// A free-text street address.
    Address(String),
}

/// A validated new catalog entry ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBigThing {
    name: String,
    location: SubmissionLocation,
    description: Option<String>,
    photo: Option<Vec<u8>>,
}

impl NewBigThing {
    /// Start building a submission with the given name.
    pub fn builder(name: impl Into<String>) -> SubmissionBuilder {
        SubmissionBuilder::new(name)
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coordinates or address.
    #[must_use]
    pub const fn location(&self) -> &SubmissionLocation {
        &self.location
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Raw photo bytes, if any.
    #[must_use]
    pub fn photo(&self) -> Option<&[u8]> {
        self.photo.as_deref()
    }

    /// Build the JSON body sent to the catalog's submit action.
    ///
    /// # Examples
    /// ```
    /// use bigthings_core::NewBigThing;
    ///
    /// let submission = NewBigThing::builder("Big Lobster")
    ///     .address("Kingston SE, SA")
    ///     .photo(b"jpeg".to_vec())
    ///     .build()?;
    /// let body = serde_json::to_value(submission.payload()).unwrap();
    /// assert_eq!(body["address"], "Kingston SE, SA");
    /// assert_eq!(body["image"], "anBlZw==");
    /// assert!(body.get("latitude").is_none());
    /// # Ok::<(), bigthings_core::SubmissionError>(())
    /// ```
    #[must_use]
    pub fn payload(&self) -> SubmissionPayload<'_> {
        let (latitude, longitude, address) = match &self.location {
            SubmissionLocation::Coordinates {
                latitude,
                longitude,
            } => (Some(latitude.as_str()), Some(longitude.as_str()), None),
            SubmissionLocation::Address(address) => (None, None, Some(address.as_str())),
        };
        SubmissionPayload {
            name: &self.name,
            latitude,
            longitude,
            address,
            description: self.description(),
            image: self.encoded_photo(),
        }
    }

    /// Synthesise the local record shown after a successful submission.
    ///
    /// The record gets a fresh UUID and a zero rating; the catalog is not
    /// re-fetched to learn the server-assigned identifier.
    #[must_use]
    pub fn to_local_record(&self) -> BigThing {
        let (location, latitude, longitude) = match &self.location {
            SubmissionLocation::Coordinates {
                latitude,
                longitude,
            } => (UNKNOWN_LOCATION.to_owned(), latitude.clone(), longitude.clone()),
            SubmissionLocation::Address(address) => (
                address.clone(),
                MISSING_COORDINATE.to_owned(),
                MISSING_COORDINATE.to_owned(),
            ),
        };
        BigThing {
            id: Uuid::new_v4().to_string(),
            name: self.name.clone(),
            location,
            description: self
                .description
                .clone()
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_owned()),
            rating: INITIAL_RATING.to_owned(),
            latitude,
            longitude,
            image: self.encoded_photo().unwrap_or_default(),
            favorite: Some(false),
            visited: Some(false),
            rated: None,
        }
    }

    fn encoded_photo(&self) -> Option<String> {
        self.photo.as_ref().map(|bytes| STANDARD.encode(bytes))
    }
}

/// Wire body for the catalog's submit action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload<'a> {
    /// Display name.
    pub name: &'a str,
    /// Latitude text, when submitting coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<&'a str>,
    /// Longitude text, when submitting coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<&'a str>,
    /// Street address, when submitting without coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// Base64-encoded photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Collects form input for a [`NewBigThing`].
///
/// Blank strings are treated as missing. Coordinates win over an address when
/// both latitude and longitude are present.
#[derive(Debug, Clone, Default)]
pub struct SubmissionBuilder {
    name: String,
    latitude: Option<String>,
    longitude: Option<String>,
    address: Option<String>,
    description: Option<String>,
    photo: Option<Vec<u8>>,
}

impl SubmissionBuilder {
    /// Start a submission with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the coordinate pair.
    #[must_use]
    pub fn coordinates(self, latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        self.latitude(latitude).longitude(longitude)
    }

    /// Set the latitude text.
    #[must_use]
    pub fn latitude(mut self, latitude: impl Into<String>) -> Self {
        self.latitude = non_blank(latitude.into());
        self
    }

    /// Set the longitude text.
    #[must_use]
    pub fn longitude(mut self, longitude: impl Into<String>) -> Self {
        self.longitude = non_blank(longitude.into());
        self
    }

    /// Set the street address.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = non_blank(address.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    /// Attach encoded image bytes, such as a JPEG.
    #[must_use]
    pub fn photo(mut self, bytes: Vec<u8>) -> Self {
        self.photo = (!bytes.is_empty()).then_some(bytes);
        self
    }

    /// Validate the collected input.
    ///
    /// # Errors
    /// Returns [`SubmissionError`] when the name is blank, no location is
    /// given, or a coordinate is not a number within range.
    pub fn build(self) -> Result<NewBigThing, SubmissionError> {
        let name = non_blank(self.name).ok_or(SubmissionError::MissingName)?;
        let location = match (self.latitude, self.longitude, self.address) {
            (Some(latitude), Some(longitude), _) => {
                validate_coordinate("latitude", &latitude, 90.0)?;
                validate_coordinate("longitude", &longitude, 180.0)?;
                SubmissionLocation::Coordinates {
                    latitude,
                    longitude,
                }
            }
            (_, _, Some(address)) => SubmissionLocation::Address(address),
            _ => return Err(SubmissionError::MissingLocation),
        };
        Ok(NewBigThing {
            name,
            location,
            description: self.description,
            photo: self.photo,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_owned())
    }
}

fn validate_coordinate(axis: &'static str, raw: &str, limit: f64) -> Result<(), SubmissionError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && (-limit..=limit).contains(&value) => Ok(()),
        _ => Err(SubmissionError::InvalidCoordinate {
            axis,
            value: raw.to_owned(),
        }),
    }
}

//! In-memory `CatalogService` and `LocalCache` implementations used by unit,
//! doc and behaviour tests.

use std::cell::{Cell, RefCell};

use crate::{BigThing, CacheError, CatalogError, CatalogService, LocalCache, NewBigThing};

/// In-memory `LocalCache` with the same duplicate rules as the SQLite cache.
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    favorites: Vec<BigThing>,
    ratings: Vec<(String, f64)>,
}

impl MemoryCache {
    /// Number of stored ratings.
    pub fn rating_count(&self) -> usize {
        self.ratings.len()
    }
}

impl LocalCache for MemoryCache {
    fn is_favorite(&self, id: &str) -> Result<bool, CacheError> {
        Ok(self.favorites.iter().any(|record| record.id == id))
    }

    fn add_favorite(&mut self, record: &BigThing) -> Result<(), CacheError> {
        if self.is_favorite(&record.id)? {
            return Err(CacheError::DuplicateFavorite {
                id: record.id.clone(),
            });
        }
        let mut stored = record.clone();
        stored.favorite = Some(true);
        self.favorites.push(stored);
        Ok(())
    }

    fn list_favorites(&self) -> Result<Vec<BigThing>, CacheError> {
        Ok(self.favorites.clone())
    }

    fn rating(&self, id: &str) -> Result<Option<f64>, CacheError> {
        Ok(self
            .ratings
            .iter()
            .find(|(rated, _)| rated == id)
            .map(|(_, value)| *value))
    }

    fn add_rating(&mut self, id: &str, value: f64) -> Result<(), CacheError> {
        if self.has_rating(id)? {
            return Err(CacheError::DuplicateRating { id: id.to_owned() });
        }
        self.ratings.push((id.to_owned(), value));
        Ok(())
    }

    fn reset(&mut self) -> Result<(), CacheError> {
        self.favorites.clear();
        self.ratings.clear();
        Ok(())
    }
}

/// Scripted `CatalogService` that records every call.
///
/// Failures are armed through `&self` so tests can change behaviour after the
/// stub has been moved into a session. An armed failure stays armed until it
/// is cleared.
#[derive(Debug, Default)]
pub struct StubCatalog {
    records: RefCell<Vec<BigThing>>,
    list_error: RefCell<Option<CatalogError>>,
    fetch_error: RefCell<Option<CatalogError>>,
    rating_error: RefCell<Option<CatalogError>>,
    submit_error: RefCell<Option<CatalogError>>,
    list_calls: Cell<usize>,
    fetch_calls: Cell<usize>,
    ratings: RefCell<Vec<(String, f64)>>,
    submissions: RefCell<Vec<NewBigThing>>,
}

impl StubCatalog {
    /// Serve `records` from listing and detail requests.
    pub fn with_records(records: Vec<BigThing>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    /// Serve records decoded from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::with_records(serde_json::from_str(json)?))
    }

    /// Replace the records served by later requests.
    pub fn set_records(&self, records: Vec<BigThing>) {
        self.records.replace(records);
    }

    /// Make listing fail with `error`, or succeed again with `None`.
    pub fn fail_listing(&self, error: Option<CatalogError>) {
        self.list_error.replace(error);
    }

    /// Make detail downloads fail with `error`, or succeed again with `None`.
    pub fn fail_fetching(&self, error: Option<CatalogError>) {
        self.fetch_error.replace(error);
    }

    /// Make rating submissions fail with `error`, or succeed again with `None`.
    pub fn fail_rating(&self, error: Option<CatalogError>) {
        self.rating_error.replace(error);
    }

    /// Make record submissions fail with `error`, or succeed again with `None`.
    pub fn fail_submitting(&self, error: Option<CatalogError>) {
        self.submit_error.replace(error);
    }

    /// Number of listing requests received.
    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    /// Number of detail requests received.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.get()
    }

    /// Ratings received, including rejected ones, in call order.
    pub fn submitted_ratings(&self) -> Vec<(String, f64)> {
        self.ratings.borrow().clone()
    }

    /// Submissions received, including rejected ones, in call order.
    pub fn submissions(&self) -> Vec<NewBigThing> {
        self.submissions.borrow().clone()
    }

    fn armed(slot: &RefCell<Option<CatalogError>>) -> Result<(), CatalogError> {
        slot.borrow().clone().map_or(Ok(()), Err)
    }
}

impl CatalogService for StubCatalog {
    fn list_records(&self) -> Result<Vec<BigThing>, CatalogError> {
        self.list_calls.set(self.list_calls.get() + 1);
        Self::armed(&self.list_error)?;
        Ok(self.records.borrow().clone())
    }

    fn fetch_record(&self, id: &str) -> Result<Vec<BigThing>, CatalogError> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        Self::armed(&self.fetch_error)?;
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|record| record.id == id)
            .cloned()
            .collect())
    }

    fn submit_rating(&self, id: &str, rating: f64) -> Result<(), CatalogError> {
        self.ratings.borrow_mut().push((id.to_owned(), rating));
        Self::armed(&self.rating_error)
    }

    fn submit_record(&self, submission: &NewBigThing) -> Result<(), CatalogError> {
        self.submissions.borrow_mut().push(submission.clone());
        Self::armed(&self.submit_error)
    }
}

/// Build a record with the given identifier, name, location and rating.
pub fn big_thing(id: &str, name: &str, location: &str, rating: &str) -> BigThing {
    BigThing {
        id: id.to_owned(),
        name: name.to_owned(),
        location: location.to_owned(),
        description: String::new(),
        rating: rating.to_owned(),
        latitude: String::new(),
        longitude: String::new(),
        image: String::new(),
        favorite: None,
        visited: None,
        rated: None,
    }
}

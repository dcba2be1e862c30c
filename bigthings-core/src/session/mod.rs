//! View-state aggregator combining the remote catalog with the local cache.
//!
//! A [`CatalogSession`] owns the records fetched this session, the detail
//! records downloaded on demand, the current search query and sort order, and
//! the latest user-facing [`Notice`]. Front ends either poll the accessors or
//! subscribe to [`SessionEvent`]s.

use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info, warn};

use crate::view::visible_records;
use crate::{
    BigThing, CacheError, CatalogEntry, CatalogError, CatalogService, LocalCache, NewBigThing,
    SortOrder, SubmissionBuilder,
};

mod error;
mod event;

pub use error::SessionError;
pub use event::{Notice, SessionEvent};

/// Highest accepted rating.
pub const MAX_RATING: f64 = 5.0;

/// Result of a successful local rating.
///
/// The local write has always happened by the time this value exists; the
/// remote outcome is reported separately because the two writes are not
/// transactional.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingOutcome {
    /// The rating stored locally.
    pub rating: f64,
    /// Outcome of submitting the rating to the catalog.
    pub remote: Result<(), CatalogError>,
}

impl RatingOutcome {
    /// Whether the catalog accepted the rating.
    #[must_use]
    pub const fn remote_accepted(&self) -> bool {
        self.remote.is_ok()
    }
}

/// Session state over a catalog service `C` and a local cache `S`.
///
/// # Examples
///
/// ```rust
/// use bigthings_core::CatalogSession;
/// use bigthings_core::test_support::{MemoryCache, StubCatalog};
///
/// let catalog = StubCatalog::from_json(r#"[
///     {"id": "1", "name": "Big Banana", "location": "Coffs Harbour", "rating": "3.9"},
///     {"id": "2", "name": "Big Prawn", "location": "Ballina", "rating": "4.4"}
/// ]"#)
/// .expect("valid catalog");
/// let mut session = CatalogSession::new(catalog, MemoryCache::default());
///
/// session.refresh()?;
/// session.toggle_sort_order();
/// let names: Vec<_> = session.visible_records().iter().map(|r| r.name.as_str()).collect();
/// assert_eq!(names, ["Big Prawn", "Big Banana"]);
/// # Ok::<(), bigthings_core::SessionError>(())
/// ```
#[derive(Debug)]
pub struct CatalogSession<C, S> {
    catalog: C,
    cache: S,
    records: Vec<BigThing>,
    downloaded: Vec<BigThing>,
    query: String,
    sort: SortOrder,
    notice: Option<Notice>,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl<C, S> CatalogSession<C, S>
where
    C: CatalogService,
    S: LocalCache,
{
    /// Start an empty session.
    pub fn new(catalog: C, cache: S) -> Self {
        Self {
            catalog,
            cache,
            records: Vec::new(),
            downloaded: Vec::new(),
            query: String::new(),
            sort: SortOrder::default(),
            notice: None,
            subscribers: Vec::new(),
        }
    }

    /// Register a listener for state changes.
    ///
    /// Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    /// The catalog service.
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The local cache.
    pub const fn cache(&self) -> &S {
        &self.cache
    }

    /// Records from the latest successful refresh plus local submissions.
    pub fn records(&self) -> &[BigThing] {
        &self.records
    }

    /// Detail records downloaded this session.
    pub fn downloaded(&self) -> &[BigThing] {
        &self.downloaded
    }

    /// The current search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The current sort order.
    pub const fn sort_order(&self) -> SortOrder {
        self.sort
    }

    /// The latest notice, if one is pending.
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Take the pending notice, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Replace the record list with a fresh copy of the catalog.
    ///
    /// On failure the previous list is kept untouched.
    pub fn refresh(&mut self) -> Result<usize, SessionError> {
        match self.catalog.list_records() {
            Ok(records) => {
                let count = records.len();
                info!("loaded {count} records from the catalog");
                self.records = records;
                self.emit(SessionEvent::RecordsReplaced { count });
                Ok(count)
            }
            Err(err) => {
                warn!("catalog refresh failed: {err}");
                self.raise(format!("Failed to load Big Things: {err}"));
                Err(err.into())
            }
        }
    }

    /// Download the full detail for `id`, returning the newly added records.
    ///
    /// A second request for the same identifier is refused without contacting
    /// the catalog.
    pub fn download_record(&mut self, id: &str) -> Result<&[BigThing], SessionError> {
        if self.downloaded.iter().any(|record| record.id == id) {
            self.raise(format!("Big Thing with ID {id} has already been downloaded."));
            return Err(SessionError::AlreadyDownloaded { id: id.to_owned() });
        }

        let fetched = match self.catalog.fetch_record(id) {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!("detail download for {id} failed: {err}");
                self.raise(format!("Failed to download Big Thing {id}: {err}"));
                return Err(err.into());
            }
        };

        let start = self.downloaded.len();
        for record in fetched {
            if !self.downloaded.iter().any(|held| held.id == record.id) {
                self.downloaded.push(record);
            }
        }
        let count = self.downloaded.len() - start;
        debug!("downloaded {count} detail records for {id}");
        self.emit(SessionEvent::DetailDownloaded {
            id: id.to_owned(),
            count,
        });
        Ok(&self.downloaded[start..])
    }

    /// Store the record with identifier `id` as a favorite.
    pub fn favorite(&mut self, id: &str) -> Result<(), SessionError> {
        let mut record = self.find(id)?.clone();
        record.favorite = Some(true);

        match self.cache.add_favorite(&record) {
            Ok(()) => {
                info!("added {id} to favorites");
                self.emit(SessionEvent::FavoriteAdded { id: id.to_owned() });
                self.raise(format!("{} added to favorites", record.name));
                Ok(())
            }
            Err(err @ CacheError::DuplicateFavorite { .. }) => {
                self.raise(format!("{} is already a favorite", record.name));
                Err(err.into())
            }
            Err(err) => {
                warn!("storing favorite {id} failed: {err}");
                self.raise(format!("Failed to save favorite: {err}"));
                Err(err.into())
            }
        }
    }

    /// Favorites held by the local cache, in insertion order.
    pub fn favorites(&self) -> Result<Vec<BigThing>, SessionError> {
        Ok(self.cache.list_favorites()?)
    }

    /// Rate the record with identifier `id`.
    ///
    /// The rating is committed locally first and then submitted to the
    /// catalog. A failed remote submission is logged and reported in the
    /// returned [`RatingOutcome`]; the local rating is kept.
    ///
    /// The catalog accepts one decimal place, so the rating is rounded to
    /// that precision before either write.
    pub fn rate(&mut self, id: &str, rating: f64) -> Result<RatingOutcome, SessionError> {
        if !(0.0..=MAX_RATING).contains(&rating) {
            self.raise(format!("Rating must be between 0 and {MAX_RATING}"));
            return Err(SessionError::RatingOutOfRange { rating });
        }
        let rating = round_to_tenth(rating);
        let name = self.find(id)?.name.clone();

        match self.cache.add_rating(id, rating) {
            Ok(()) => {}
            Err(err @ CacheError::DuplicateRating { .. }) => {
                self.raise(format!("Rating already submitted for {name}"));
                return Err(err.into());
            }
            Err(err) => {
                warn!("storing rating for {id} failed: {err}");
                self.raise(format!("Failed to save rating: {err}"));
                return Err(err.into());
            }
        }
        self.emit(SessionEvent::RatingSaved {
            id: id.to_owned(),
            rating,
        });

        let remote = self.catalog.submit_rating(id, rating);
        match &remote {
            Ok(()) => {
                info!("rating {rating:.1} for {id} accepted by the catalog");
                self.raise("Rating submitted successfully");
            }
            Err(err) => {
                warn!("rating for {id} kept locally; catalog submission failed: {err}");
                self.emit(SessionEvent::RemoteRatingFailed { id: id.to_owned() });
                self.raise(format!("Failed to submit rating: {err}"));
            }
        }
        Ok(RatingOutcome { rating, remote })
    }

    /// Submit a new record and append its local copy on success.
    pub fn submit(&mut self, submission: &NewBigThing) -> Result<&BigThing, SessionError> {
        if let Err(err) = self.catalog.submit_record(submission) {
            warn!("submission of {} failed: {err}", submission.name());
            self.raise(format!("Failed to submit Big Thing: {err}"));
            return Err(err.into());
        }

        let record = submission.to_local_record();
        info!("submitted {} as local record {}", record.name, record.id);
        self.emit(SessionEvent::RecordAdded {
            id: record.id.clone(),
        });
        self.raise("Big Thing submitted successfully!");
        self.records.push(record);
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Validate form input and submit it.
    ///
    /// Validation failures raise a notice and never reach the catalog.
    pub fn submit_form(&mut self, form: SubmissionBuilder) -> Result<&BigThing, SessionError> {
        let submission = match form.build() {
            Ok(submission) => submission,
            Err(err) => {
                debug!("submission rejected before sending: {err}");
                self.raise(format!("Invalid submission: {err}"));
                return Err(err.into());
            }
        };
        self.submit(&submission)
    }

    /// Wipe the local cache.
    pub fn reset_cache(&mut self) -> Result<(), SessionError> {
        if let Err(err) = self.cache.reset() {
            warn!("cache reset failed: {err}");
            self.raise(format!("Failed to clear local data: {err}"));
            return Err(err.into());
        }
        info!("local cache cleared");
        self.emit(SessionEvent::CacheReset);
        self.raise("Local data cleared");
        Ok(())
    }

    /// Set the search query applied by [`Self::visible_records`].
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.emit(SessionEvent::ViewChanged);
    }

    /// Set the sort order applied by [`Self::visible_records`].
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort = order;
        self.emit(SessionEvent::ViewChanged);
    }

    /// Flip between name and rating order, returning the new order.
    pub fn toggle_sort_order(&mut self) -> SortOrder {
        self.set_sort_order(self.sort.toggle());
        self.sort
    }

    /// Records matching the query, in the selected order.
    pub fn visible_records(&self) -> Vec<&BigThing> {
        visible_records(&self.records, &self.query, self.sort)
    }

    /// Visible records merged with their local favorite and rating state.
    pub fn entries(&self) -> Result<Vec<CatalogEntry>, SessionError> {
        self.visible_records()
            .into_iter()
            .map(|record| -> Result<CatalogEntry, SessionError> {
                Ok(CatalogEntry {
                    favorite: self.cache.is_favorite(&record.id)?,
                    local_rating: self.cache.rating(&record.id)?,
                    record: record.clone(),
                })
            })
            .collect()
    }

    fn find(&self, id: &str) -> Result<&BigThing, SessionError> {
        self.records
            .iter()
            .chain(&self.downloaded)
            .find(|record| record.id == id)
            .ok_or_else(|| SessionError::UnknownRecord { id: id.to_owned() })
    }

    fn raise(&mut self, message: impl Into<String>) {
        let notice = Notice::new(message);
        debug!("notice: {notice}");
        self.emit(SessionEvent::Notice(notice.clone()));
        self.notice = Some(notice);
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

//! Behavioural tests for `SqliteLocalCache` using rstest-bdd.

use std::{cell::RefCell, path::PathBuf};

use bigthings_core::{BigThing, CacheError, LocalCache, SqliteLocalCache, test_support::big_thing};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const BANANA_ID: &str = "2";

/// Shared state for SQLite cache scenarios.
#[derive(Debug)]
struct CacheWorld {
    temp_dir: TempDir,
    cache: RefCell<Option<SqliteLocalCache>>,
    last_error: RefCell<Option<CacheError>>,
}

impl CacheWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            cache: RefCell::new(None),
            last_error: RefCell::new(None),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("cache.db")
    }

    fn open(&self) {
        // Release the previous handle before opening a new one.
        self.cache.replace(None);
        let cache = SqliteLocalCache::open(self.db_path()).expect("open SQLite cache");
        self.cache.replace(Some(cache));
    }

    fn with_cache<T>(&self, action: impl FnOnce(&mut SqliteLocalCache) -> T) -> T {
        let mut borrowed = self.cache.borrow_mut();
        let cache = borrowed
            .as_mut()
            .expect("cache should be opened by a given step");
        action(cache)
    }

    fn record(&self, result: Result<(), CacheError>) {
        self.last_error.replace(result.err());
    }
}

#[fixture]
fn world() -> CacheWorld {
    CacheWorld::new()
}

fn banana() -> BigThing {
    big_thing(BANANA_ID, "Big Banana", "Coffs Harbour, NSW", "3.9")
}

#[given("a SQLite cache file in a temporary directory")]
fn given_cache(world: &CacheWorld) {
    world.open();
}

#[when("I store the Big Banana as a favorite")]
fn when_favorite(world: &CacheWorld) {
    let result = world.with_cache(|cache| cache.add_favorite(&banana()));
    world.record(result);
}

#[when("I store the Big Banana as a favorite again")]
fn when_favorite_again(world: &CacheWorld) {
    when_favorite(world);
}

#[when("I reopen the SQLite cache")]
fn when_reopen(world: &CacheWorld) {
    world.open();
}

#[when("I rate the Big Banana 4.0")]
fn when_rate_four(world: &CacheWorld) {
    let result = world.with_cache(|cache| cache.add_rating(BANANA_ID, 4.0));
    world.record(result);
}

#[when("I rate the Big Banana 1.0")]
fn when_rate_one(world: &CacheWorld) {
    let result = world.with_cache(|cache| cache.add_rating(BANANA_ID, 1.0));
    world.record(result);
}

#[when("I reset the SQLite cache")]
fn when_reset(world: &CacheWorld) {
    let result = world.with_cache(LocalCache::reset);
    world.record(result);
    assert!(world.db_path().exists(), "reset should recreate the file");
}

#[then("the Big Banana is listed as a favorite")]
fn then_banana_listed(world: &CacheWorld) {
    let favorites = world.with_cache(|cache| cache.list_favorites().expect("list favorites"));
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "Big Banana");
    assert!(favorites[0].is_favorite());
}

#[then("a duplicate favorite error is returned")]
fn then_duplicate_favorite(world: &CacheWorld) {
    assert!(matches!(
        *world.last_error.borrow(),
        Some(CacheError::DuplicateFavorite { .. })
    ));
}

#[then("exactly one favorite is listed")]
fn then_one_favorite(world: &CacheWorld) {
    let favorites = world.with_cache(|cache| cache.list_favorites().expect("list favorites"));
    assert_eq!(favorites.len(), 1);
}

#[then("no favorites are listed")]
fn then_no_favorites(world: &CacheWorld) {
    let favorites = world.with_cache(|cache| cache.list_favorites().expect("list favorites"));
    assert!(favorites.is_empty());
}

#[then("a duplicate rating error is returned")]
fn then_duplicate_rating(world: &CacheWorld) {
    assert!(matches!(
        *world.last_error.borrow(),
        Some(CacheError::DuplicateRating { .. })
    ));
}

#[then("the Big Banana rating is 4.0")]
fn then_rating_kept(world: &CacheWorld) {
    let rating = world.with_cache(|cache| cache.rating(BANANA_ID).expect("read rating"));
    assert_eq!(rating, Some(4.0));
}

#[then("the Big Banana has no rating")]
fn then_no_rating(world: &CacheWorld) {
    let rated = world.with_cache(|cache| cache.has_rating(BANANA_ID).expect("read rating"));
    assert!(!rated);
}

#[scenario(path = "tests/features/sqlite_cache.feature", index = 0)]
fn favorites_persist(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_cache.feature", index = 1)]
fn duplicate_favorite_rejected(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_cache.feature", index = 2)]
fn duplicate_rating_rejected(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_cache.feature", index = 3)]
fn reset_empties_store(world: CacheWorld) {
    let _ = world;
}

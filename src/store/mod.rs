//! # Resource Store
//!
//! Parameterized CRUD access to the four record kinds (beer, brewery,
//! picture, user). The store owns all persisted state; nothing above it
//! caches records.
//!
//! The bundled backend is in-memory. A relational backend only has to
//! implement [`ResourceStore`].

pub mod crypto;
pub mod errors;
pub mod memory;
pub mod models;
pub mod query;
pub mod views;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use models::{
    Beer, BeerInput, Brewery, BreweryDetails, BreweryInput, NewBrewery, NewUser, Picture,
    PictureInput, RecordKind, User, UserUpdate,
};
pub use query::{BeerQuery, Page, Pagination};
pub use views::{InMemoryViewCounter, ViewCounter};

/// Storage operations behind the HTTP resource API
pub trait ResourceStore: Send + Sync {
    // Breweries

    fn list_breweries(&self) -> StoreResult<Vec<Brewery>>;

    fn get_brewery(&self, id: u64) -> StoreResult<Option<Brewery>>;

    /// Create a brewery pointing at two existing pictures
    fn create_brewery(&self, input: BreweryInput) -> StoreResult<Brewery>;

    /// Store both picture references, then the brewery pointing at them
    fn create_brewery_with_pictures(&self, input: NewBrewery) -> StoreResult<Brewery>;

    fn update_brewery(&self, id: u64, input: BreweryInput) -> StoreResult<Brewery>;

    /// Delete a brewery. Its pictures are left in place.
    fn delete_brewery(&self, id: u64) -> StoreResult<()>;

    // Pictures

    fn list_pictures(&self) -> StoreResult<Vec<Picture>>;

    fn get_picture(&self, id: u64) -> StoreResult<Option<Picture>>;

    fn create_picture(&self, input: PictureInput) -> StoreResult<Picture>;

    fn update_picture(&self, id: u64, input: PictureInput) -> StoreResult<Picture>;

    fn delete_picture(&self, id: u64) -> StoreResult<()>;

    // Beers

    fn list_beers(&self, query: &BeerQuery) -> StoreResult<Page<Beer>>;

    fn create_beer(&self, input: BeerInput) -> StoreResult<Beer>;

    fn update_beer(&self, id: u64, input: BeerInput) -> StoreResult<Beer>;

    fn delete_beer(&self, id: u64) -> StoreResult<()>;

    // Users

    fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Create a user, hashing the supplied password
    fn create_user(&self, input: NewUser) -> StoreResult<User>;

    fn update_user(&self, id: u64, input: UserUpdate) -> StoreResult<User>;

    fn delete_user(&self, id: u64) -> StoreResult<()>;
}

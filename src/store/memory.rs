//! # In-Memory Store
//!
//! `ResourceStore` backed by ordered maps behind one `RwLock`.
//! Ids are assigned per record kind, starting at 1, and never reused.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::crypto::{hash_password, validate_password};
use super::errors::{StoreError, StoreResult};
use super::models::{
    Beer, BeerInput, Brewery, BreweryInput, NewBrewery, NewUser, Picture, PictureInput,
    RecordKind, User, UserUpdate,
};
use super::query::{BeerQuery, Page};
use super::ResourceStore;

/// One table: rows keyed by id plus the next id to hand out
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn replace(&mut self, kind: RecordKind, id: u64, row: T) -> StoreResult<T> {
        match self.rows.get_mut(&id) {
            Some(existing) => {
                *existing = row.clone();
                Ok(row)
            }
            None => Err(StoreError::not_found(kind, id)),
        }
    }

    fn remove(&mut self, kind: RecordKind, id: u64) -> StoreResult<()> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(kind, id))
    }
}

#[derive(Debug)]
struct Tables {
    beers: Table<Beer>,
    breweries: Table<Brewery>,
    pictures: Table<Picture>,
    users: Table<User>,
}

impl Tables {
    fn new() -> Self {
        Self {
            beers: Table::new(),
            breweries: Table::new(),
            pictures: Table::new(),
            users: Table::new(),
        }
    }

    fn insert_picture(&mut self, data: String) -> Picture {
        let id = self.pictures.allocate_id();
        let picture = Picture { id, data };
        self.pictures.rows.insert(id, picture.clone());
        picture
    }

    fn require_picture(&self, id: u64) -> StoreResult<()> {
        if self.pictures.rows.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference {
                kind: RecordKind::Picture,
                id,
            })
        }
    }

    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.users
            .rows
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != except)
    }
}

/// In-memory resource store
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::poisoned())
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::poisoned())
    }
}

impl ResourceStore for InMemoryStore {
    fn list_breweries(&self) -> StoreResult<Vec<Brewery>> {
        Ok(self.read()?.breweries.all())
    }

    fn get_brewery(&self, id: u64) -> StoreResult<Option<Brewery>> {
        Ok(self.read()?.breweries.get(id))
    }

    fn create_brewery(&self, input: BreweryInput) -> StoreResult<Brewery> {
        let mut tables = self.write()?;
        tables.require_picture(input.profile_picture_id)?;
        tables.require_picture(input.banner_picture_id)?;

        let id = tables.breweries.allocate_id();
        let brewery = Brewery {
            id,
            name: input.name,
            address: input.address,
            profile_picture_id: input.profile_picture_id,
            banner_picture_id: input.banner_picture_id,
        };
        tables.breweries.rows.insert(id, brewery.clone());
        Ok(brewery)
    }

    fn create_brewery_with_pictures(&self, input: NewBrewery) -> StoreResult<Brewery> {
        let mut tables = self.write()?;
        let profile = tables.insert_picture(input.profile_picture);
        let banner = tables.insert_picture(input.banner_picture);

        let id = tables.breweries.allocate_id();
        let brewery = Brewery {
            id,
            name: input.name,
            address: input.address,
            profile_picture_id: profile.id,
            banner_picture_id: banner.id,
        };
        tables.breweries.rows.insert(id, brewery.clone());
        Ok(brewery)
    }

    fn update_brewery(&self, id: u64, input: BreweryInput) -> StoreResult<Brewery> {
        let mut tables = self.write()?;
        if !tables.breweries.rows.contains_key(&id) {
            return Err(StoreError::not_found(RecordKind::Brewery, id));
        }
        tables.require_picture(input.profile_picture_id)?;
        tables.require_picture(input.banner_picture_id)?;

        let brewery = Brewery {
            id,
            name: input.name,
            address: input.address,
            profile_picture_id: input.profile_picture_id,
            banner_picture_id: input.banner_picture_id,
        };
        tables.breweries.replace(RecordKind::Brewery, id, brewery)
    }

    fn delete_brewery(&self, id: u64) -> StoreResult<()> {
        self.write()?.breweries.remove(RecordKind::Brewery, id)
    }

    fn list_pictures(&self) -> StoreResult<Vec<Picture>> {
        Ok(self.read()?.pictures.all())
    }

    fn get_picture(&self, id: u64) -> StoreResult<Option<Picture>> {
        Ok(self.read()?.pictures.get(id))
    }

    fn create_picture(&self, input: PictureInput) -> StoreResult<Picture> {
        Ok(self.write()?.insert_picture(input.data))
    }

    fn update_picture(&self, id: u64, input: PictureInput) -> StoreResult<Picture> {
        let picture = Picture {
            id,
            data: input.data,
        };
        self.write()?
            .pictures
            .replace(RecordKind::Picture, id, picture)
    }

    fn delete_picture(&self, id: u64) -> StoreResult<()> {
        self.write()?.pictures.remove(RecordKind::Picture, id)
    }

    fn list_beers(&self, query: &BeerQuery) -> StoreResult<Page<Beer>> {
        let tables = self.read()?;
        let matching: Vec<Beer> = tables
            .beers
            .rows
            .values()
            .filter(|beer| query.matches(beer))
            .cloned()
            .collect();
        Ok(Page::paginate(matching, query))
    }

    fn create_beer(&self, input: BeerInput) -> StoreResult<Beer> {
        let mut tables = self.write()?;
        let id = tables.beers.allocate_id();
        let beer = Beer {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            brewery_id: input.brewery_id,
        };
        tables.beers.rows.insert(id, beer.clone());
        Ok(beer)
    }

    fn update_beer(&self, id: u64, input: BeerInput) -> StoreResult<Beer> {
        let beer = Beer {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            brewery_id: input.brewery_id,
        };
        self.write()?.beers.replace(RecordKind::Beer, id, beer)
    }

    fn delete_beer(&self, id: u64) -> StoreResult<()> {
        self.write()?.beers.remove(RecordKind::Beer, id)
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users.all())
    }

    fn create_user(&self, input: NewUser) -> StoreResult<User> {
        validate_password(&input.password)?;
        // Hash outside the lock; argon2 is deliberately slow.
        let password_hash = hash_password(&input.password)?;

        let mut tables = self.write()?;
        if tables.email_taken(&input.email, None) {
            return Err(StoreError::Conflict(format!(
                "Email already registered: {}",
                input.email
            )));
        }

        let id = tables.users.allocate_id();
        let user = User {
            id,
            username: input.username,
            email: input.email,
            role: input.role,
            password_hash,
            created_at: Utc::now(),
        };
        tables.users.rows.insert(id, user.clone());
        Ok(user)
    }

    fn update_user(&self, id: u64, input: UserUpdate) -> StoreResult<User> {
        let new_hash = match &input.password {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let mut tables = self.write()?;
        if tables.email_taken(&input.email, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "Email already registered: {}",
                input.email
            )));
        }

        let user = tables
            .users
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::User, id))?;
        user.username = input.username;
        user.email = input.email;
        if let Some(hash) = new_hash {
            user.password_hash = hash;
        }
        Ok(user.clone())
    }

    fn delete_user(&self, id: u64) -> StoreResult<()> {
        self.write()?.users.remove(RecordKind::User, id)
    }
}

//! # Aggregator
//!
//! Builds aggregated brewery views: a brewery plus the display URLs of its
//! profile and banner pictures.
//!
//! Picture lookups for a batch are scattered with at most
//! `max_in_flight_lookups` outstanding, each tagged with the index of its
//! brewery and its slot, then gathered back by that tag. Output order is
//! always the order of the brewery list, whatever order lookups finish in.
//!
//! A failed lookup degrades to `null` for that one field. Only a failure of
//! the primary fetch fails the operation.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::observability::{Event, MetricsRegistry};
use crate::store::Brewery;

use super::client::ResourceApi;
use super::errors::{BridgeError, BridgeResult};

/// A brewery with both picture references resolved to display URLs.
///
/// Built per request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreweryView {
    #[serde(flatten)]
    pub brewery: Brewery,
    pub profile_picture_url: Option<String>,
    pub banner_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

/// Which picture of a brewery a lookup resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Profile,
    Banner,
}

impl Slot {
    fn as_str(&self) -> &'static str {
        match self {
            Slot::Profile => "profile",
            Slot::Banner => "banner",
        }
    }
}

/// Resolved URLs for one brewery, filled in as lookups complete
#[derive(Debug, Clone, Default)]
struct Urls {
    profile: Option<String>,
    banner: Option<String>,
}

impl Urls {
    fn set(&mut self, slot: Slot, url: Option<String>) {
        match slot {
            Slot::Profile => self.profile = url,
            Slot::Banner => self.banner = url,
        }
    }
}

/// Aggregation operations over a [`ResourceApi`]
pub struct Aggregator<A: ResourceApi + ?Sized> {
    api: Arc<A>,
    max_in_flight: usize,
    metrics: Arc<MetricsRegistry>,
}

impl<A: ResourceApi + ?Sized> Aggregator<A> {
    /// `max_in_flight` is clamped to at least 1
    pub fn new(api: Arc<A>, max_in_flight: usize, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            api,
            max_in_flight: max_in_flight.max(1),
            metrics,
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// List every brewery with its two picture URLs
    pub async fn list_with_images(&self) -> BridgeResult<Vec<BreweryView>> {
        let breweries = self.api.list_breweries().await?;

        let lookups: Vec<(usize, Slot, u64)> = breweries
            .iter()
            .enumerate()
            .flat_map(|(index, brewery)| {
                [
                    (index, Slot::Profile, brewery.profile_picture_id),
                    (index, Slot::Banner, brewery.banner_picture_id),
                ]
            })
            .collect();

        self.metrics.add_lookups(lookups.len() as u64);
        debug!(
            breweries = breweries.len(),
            lookups = lookups.len(),
            max_in_flight = self.max_in_flight,
            "resolving brewery pictures"
        );

        let mut urls = vec![Urls::default(); breweries.len()];
        let mut resolved = stream::iter(lookups)
            .map(|(index, slot, picture_id)| {
                let brewery_id = breweries[index].id;
                async move {
                    let url = self.lookup(brewery_id, slot, picture_id).await;
                    (index, slot, url)
                }
            })
            .buffer_unordered(self.max_in_flight);

        while let Some((index, slot, url)) = resolved.next().await {
            urls[index].set(slot, url);
        }
        drop(resolved);

        Ok(breweries
            .into_iter()
            .zip(urls)
            .map(|(brewery, urls)| BreweryView {
                brewery,
                profile_picture_url: urls.profile,
                banner_picture_url: urls.banner,
                views: None,
            })
            .collect())
    }

    /// One brewery with its two picture URLs and view count
    pub async fn get_one_with_images(&self, id: u64) -> BridgeResult<BreweryView> {
        let details = self
            .api
            .get_brewery(id)
            .await?
            .ok_or(BridgeError::NotFound(id))?;

        let brewery = details.brewery;
        self.metrics.add_lookups(2);
        let (profile, banner) = tokio::join!(
            self.lookup(brewery.id, Slot::Profile, brewery.profile_picture_id),
            self.lookup(brewery.id, Slot::Banner, brewery.banner_picture_id),
        );

        Ok(BreweryView {
            brewery,
            profile_picture_url: profile,
            banner_picture_url: banner,
            views: details.views,
        })
    }

    /// Delete a brewery. Its pictures are left in place.
    pub async fn delete(&self, id: u64) -> BridgeResult<u64> {
        let deleted = self.api.delete_brewery(id).await?;
        if deleted != id {
            warn!(
                requested = id,
                reported = deleted,
                "resource API reported a different deleted id"
            );
        }
        Ok(id)
    }

    async fn lookup(&self, brewery_id: u64, slot: Slot, picture_id: u64) -> Option<String> {
        match self.api.picture_url(picture_id).await {
            Ok(url) => url,
            Err(e) => {
                self.metrics.increment_lookup_failures();
                warn!(
                    event = %Event::LookupFailed,
                    brewery_id,
                    picture_id,
                    slot = slot.as_str(),
                    error = %e,
                    "picture lookup failed, using null url"
                );
                None
            }
        }
    }
}

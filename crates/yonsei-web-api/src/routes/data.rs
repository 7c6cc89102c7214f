use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use reqwest::header;
use tokio::sync::RwLock;
use yonsei_menu_api::{raw, CafeteriaSnapshot, Campus, MenuCache, weekday_index};

use crate::config::MenuSourceConfig;

mod data;
use data::*;

/// menu data changes during the day, so entries only live an hour
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct MenuManager {
    client: reqwest::Client,
    source: MenuSourceConfig,
    cache: Arc<RwLock<MenuCache>>,
}

impl MenuManager {
    pub fn new(source: MenuSourceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(MenuCache::default())),
            source,
        }
    }

    /// Snapshot for one campus and date, from cache when a live entry exists,
    /// otherwise scraped fresh. `None` means the menu source was unreachable
    /// or unparseable; an empty day still comes back as a snapshot.
    pub async fn get_menus(
        &self, campus: Campus, date: Option<NaiveDate>,
    ) -> Option<CafeteriaSnapshot> {
        let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

        if let Some(snapshot) = self.cached(campus, &date).await {
            return Some(snapshot);
        }

        match self.fetch_menus(campus, date).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::error!("could not fetch menus for {campus} on {date}: {err}");
                None
            },
        }
    }

    pub async fn cached(
        &self, campus: Campus, date: &NaiveDate,
    ) -> Option<CafeteriaSnapshot> {
        self.cache.read().await.get(campus, date).cloned()
    }

    async fn fetch_menus(
        &self, campus: Campus, date: NaiveDate,
    ) -> Result<CafeteriaSnapshot, MenuFetchError> {
        let html = self.client.get(&self.source.url)
            .header(header::USER_AGENT, &self.source.user_agent)
            .header(header::REFERER, &self.source.referer)
            .send().await?
            .error_for_status()?
        .text().await?;

        let week = raw::extract_week_data(&html)?;

        // days without service are not an error and not worth caching
        let Some(day) = week.get(weekday_index(&date)).and_then(Option::as_ref) else {
            tracing::info!("no menu data for {date}");
            return Ok(CafeteriaSnapshot::empty(campus, date));
        };

        let snapshot = CafeteriaSnapshot::from_day(campus, date, day);
        self.store(snapshot.clone()).await;

        Ok(snapshot)
    }

    async fn store(&self, snapshot: CafeteriaSnapshot) {
        let key = MenuCache::key(snapshot.campus, &snapshot.date);
        self.cache.write().await.insert(snapshot);

        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            tokio::time::sleep(CACHE_TTL).await;
            if cache.write().await.remove(&key).is_some() {
                tracing::debug!("evicted menu cache entry {key}");
            }
        });
    }
}

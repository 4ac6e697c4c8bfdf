//! Data layer: index caching, last-query memoization and denormalization.

use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use serde_json::Value;

use crate::api::RecordSource;
use crate::error::Error;
use crate::model::Fields;
use crate::model::Indexes;
use crate::model::Query;
use crate::model::RawPage;
use crate::model::Record;
use crate::model::RecordPage;
use crate::response::Response;

/// The last served query and its result.
#[derive(Debug, Clone)]
struct Memo {
    key: String,
    page: RecordPage,
    cached_at: DateTime<Utc>,
}

/// Wraps a [`RecordSource`] with the two caches the grid relies on.
///
/// - Index tables are fetched once and kept until [`invalidate_indexes`](Self::invalidate_indexes).
/// - Record pages live in a single slot keyed by the canonical query string.
///   A repeated query is answered from the slot; any other query, a forced
///   update, or a mutation through this layer replaces or clears it.
pub struct DataLayer {
    source: Arc<dyn RecordSource>,
    indexes: Option<Indexes>,
    last: Option<Memo>,
}

impl DataLayer {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    pub fn from_arc(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            indexes: None,
            last: None,
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &Arc<dyn RecordSource> {
        &self.source
    }

    /// Returns the index tables, fetching both concurrently on first use.
    pub async fn get_indexes(&mut self) -> Result<&Indexes, Error> {
        let indexes = match self.indexes.take() {
            Some(indexes) => indexes,
            None => {
                log::debug!("fetching index tables");
                let (sellers, customers) =
                    futures::try_join!(self.source.fetch_sellers(), self.source.fetch_customers())?;
                Indexes::new(sellers, customers)
            }
        };
        Ok(self.indexes.insert(indexes))
    }

    /// The cached index tables, if they were loaded.
    pub fn indexes(&self) -> Option<&Indexes> {
        self.indexes.as_ref()
    }

    /// Drops the cached index tables; the next [`get_indexes`](Self::get_indexes) refetches.
    pub fn invalidate_indexes(&mut self) {
        self.indexes = None;
    }

    /// Returns the denormalized records for `query`.
    ///
    /// When `query` serializes to the memoized key and `force_update` is
    /// false, the memoized page is returned without touching the source.
    pub async fn get_records(&mut self, query: &Query, force_update: bool) -> Result<Response<RecordPage>, Error> {
        let key = query.to_query_string();

        if !force_update {
            if let Some(memo) = self.last.as_ref().filter(|m| m.key == key) {
                log::debug!("records cache hit for '{}'", key);
                return Ok(Response::cache_hit(memo.page.clone(), memo.cached_at));
            }
        }

        log::debug!("fetching records for '{}'", key);
        let raw = self.source.fetch_records(query).await?;
        let page = self.denormalize(raw);

        self.last = Some(Memo {
            key,
            page: page.clone(),
            cached_at: Utc::now(),
        });

        if force_update {
            Ok(Response::bypassed(page))
        } else {
            Ok(Response::cache_miss(page))
        }
    }

    /// Clears the memoized page.
    pub fn invalidate_records(&mut self) {
        self.last = None;
    }

    /// Resolves foreign keys in a raw page against the cached index tables.
    pub fn denormalize(&self, raw: RawPage) -> RecordPage {
        if self.indexes.is_none() {
            log::warn!("denormalizing {} records before index tables were loaded", raw.items.len());
        }
        RecordPage {
            total: raw.total,
            items: raw
                .items
                .into_iter()
                .map(|item| Record::from_raw(item, self.indexes.as_ref()))
                .collect(),
        }
    }

    pub async fn create_record(&mut self, fields: &Fields) -> Result<Value, Error> {
        let created = self.source.create_record(fields).await?;
        self.invalidate_records();
        Ok(created)
    }

    pub async fn update_record(&mut self, id: &str, fields: &Fields) -> Result<Value, Error> {
        let updated = self.source.update_record(id, fields).await?;
        self.invalidate_records();
        Ok(updated)
    }

    pub async fn delete_record(&mut self, id: &str) -> Result<(), Error> {
        self.source.delete_record(id).await?;
        self.invalidate_records();
        Ok(())
    }
}

//! In-memory record source for unit tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;

use crate::api::RecordSource;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Fields;
use crate::model::IndexTable;
use crate::model::Query;
use crate::model::RawPage;
use crate::model::RawRecord;

pub(crate) struct MockSource {
    records: Mutex<Vec<RawRecord>>,
    queries: Mutex<Vec<Query>>,
    failure: Mutex<Option<String>>,
    record_fetches: AtomicUsize,
    index_fetches: AtomicUsize,
}

impl MockSource {
    /// `n` records; record `i` has seller `(i-1) % 3 + 1` and customer `(i-1) % 5 + 1`.
    pub(crate) fn with_records(n: usize) -> Arc<Self> {
        let records = (1..=n)
            .map(|i| RawRecord {
                receipt_id: json!(i),
                date: json!(format!("2024-01-{:02}", (i - 1) % 28 + 1)),
                seller_id: json!((i - 1) % 3 + 1),
                customer_id: json!((i - 1) % 5 + 1),
                total_amount: json!(i * 10),
            })
            .collect();
        Arc::new(Self {
            records: Mutex::new(records),
            queries: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            record_fetches: AtomicUsize::new(0),
            index_fetches: AtomicUsize::new(0),
        })
    }

    pub(crate) fn fail_next(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub(crate) fn record_fetches(&self) -> usize {
        self.record_fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn index_fetches(&self) -> usize {
        self.index_fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn last_query(&self) -> Option<Query> {
        self.queries.lock().unwrap().last().cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), Error> {
        match self.failure.lock().unwrap().take() {
            Some(message) => Err(ApiError::http(500, message).into()),
            None => Ok(()),
        }
    }

    fn table(prefix: &str, n: usize) -> IndexTable {
        (1..=n).map(|i| (i.to_string(), format!("{prefix} {i}"))).collect()
    }
}

#[async_trait]
impl RecordSource for MockSource {
    async fn fetch_sellers(&self) -> Result<IndexTable, Error> {
        self.index_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(Self::table("Seller", 3))
    }

    async fn fetch_customers(&self) -> Result<IndexTable, Error> {
        self.index_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(Self::table("Customer", 5))
    }

    async fn fetch_records(&self, query: &Query) -> Result<RawPage, Error> {
        self.record_fetches.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        self.check()?;

        let records = self.records.lock().unwrap();
        let total = records.len();
        let limit = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(total.max(1));
        let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let items = records
            .iter()
            .skip((page.max(1) - 1) * limit)
            .take(limit)
            .cloned()
            .collect();
        Ok(RawPage { total, items })
    }

    async fn create_record(&self, fields: &Fields) -> Result<Value, Error> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let id = records.len() + 1;
        records.push(RawRecord {
            receipt_id: json!(id),
            date: fields.get("date").cloned().unwrap_or(Value::Null),
            seller_id: json!(1),
            customer_id: json!(1),
            total_amount: fields.get("total").cloned().unwrap_or(Value::Null),
        });
        Ok(json!({ "receipt_id": id }))
    }

    async fn update_record(&self, id: &str, fields: &Fields) -> Result<Value, Error> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| crate::model::value_key(&r.receipt_id) == id)
            .ok_or_else(|| Error::from(ApiError::http(404, "not found")))?;
        if let Some(total) = fields.get("total") {
            record.total_amount = total.clone();
        }
        Ok(json!({ "receipt_id": id }))
    }

    async fn delete_record(&self, id: &str) -> Result<(), Error> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| crate::model::value_key(&r.receipt_id) != id);
        if records.len() == before {
            return Err(ApiError::http(404, "not found").into());
        }
        Ok(())
    }
}

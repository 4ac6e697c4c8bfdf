//! Record source trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::model::Fields;
use crate::model::IndexTable;
use crate::model::Query;
use crate::model::RawPage;

/// The server-side operations the grid depends on.
///
/// [`ServerApi`](crate::ServerApi) talks HTTP; tests and alternative hosts can
/// plug in any other implementation with the same contract.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches the seller id to name table.
    async fn fetch_sellers(&self) -> Result<IndexTable, Error>;

    /// Fetches the customer id to name table.
    async fn fetch_customers(&self) -> Result<IndexTable, Error>;

    /// Fetches one page of raw records matching `query`.
    async fn fetch_records(&self, query: &Query) -> Result<RawPage, Error>;

    /// Creates a record and returns the server's representation of it.
    async fn create_record(&self, fields: &Fields) -> Result<Value, Error>;

    /// Updates the record with `id` and returns the server's representation.
    async fn update_record(&self, id: &str, fields: &Fields) -> Result<Value, Error>;

    /// Deletes the record with `id`.
    async fn delete_record(&self, id: &str) -> Result<(), Error>;
}

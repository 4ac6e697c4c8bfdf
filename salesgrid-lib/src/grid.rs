//! The grid orchestrator: plugins, table and data layer wired to a redraw cycle.

use crate::api::RecordSource;
use crate::config::GridConfig;
use crate::config::PluginKind;
use crate::data::DataLayer;
use crate::error::Error;
use crate::model::Query;
use crate::model::Record;
use crate::model::RecordPage;
use crate::model::Schema;
use crate::plugins::Editing;
use crate::plugins::Filtering;
use crate::plugins::Pagination;
use crate::plugins::Plugin;
use crate::plugins::Searching;
use crate::plugins::Sorting;
use crate::plugins::editing::SubmitOutcome;
use crate::table::Table;
use crate::table::init_table;
use crate::view::Node;

/// A query ready to fetch, tagged with its redraw sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedrawRequest {
    pub seq: u64,
    pub query: Query,
}

/// A sales records grid.
///
/// Every user intent mutates plugin state and, where the rows depend on it,
/// runs a redraw: build the query, fetch through the data layer, render the
/// rows and update pagination.
///
/// A redraw is two halves, [`prepare_redraw`](Self::prepare_redraw) and
/// [`complete_redraw`](Self::complete_redraw). Only the most recently
/// prepared request is applied; results of older ones are dropped, so a
/// slow response can never overwrite a newer one.
///
/// # Example
///
/// ```ignore
/// use salesgrid_lib::{Grid, ServerApi};
/// use salesgrid_lib::config::GridConfig;
///
/// let api = ServerApi::builder().base_url("http://localhost:3002/api").build()?;
/// let mut grid = Grid::new(api, &schema, GridConfig::default());
/// grid.start().await?;
/// grid.toggle_sort("date").await?;
/// println!("{}", salesgrid_lib::view::to_text(&grid.container()));
/// ```
pub struct Grid {
    data: DataLayer,
    table: Table,
    editing: Editing,
    searching: Searching,
    filtering: Filtering,
    sorting: Sorting,
    pagination: Pagination,
    apply_order: Vec<PluginKind>,
    issued: u64,
    applied: u64,
    rows: Vec<Record>,
}

impl Grid {
    pub fn new(source: impl RecordSource + 'static, schema: &Schema, config: GridConfig) -> Self {
        Self::with_data(DataLayer::new(source), schema, config)
    }

    /// Builds the grid over an existing data layer.
    pub fn with_data(data: DataLayer, schema: &Schema, config: GridConfig) -> Self {
        let mut editing = Editing::new();
        let mut searching = Searching::new();
        let mut filtering = Filtering::new();
        let mut sorting = Sorting::new();
        let mut pagination = Pagination::new(config.pagination);

        // Same order as PluginKind::ALL.
        let table = init_table(
            schema,
            config.table,
            &mut [&mut editing, &mut searching, &mut filtering, &mut sorting, &mut pagination],
        );

        Self {
            data,
            table,
            editing,
            searching,
            filtering,
            sorting,
            pagination,
            apply_order: config.apply_order,
            issued: 0,
            applied: 0,
            rows: Vec::new(),
        }
    }

    // ===== Lifecycle

    /// Loads the index tables, hands them to filtering and editing, then draws.
    pub async fn start(&mut self) -> Result<(), Error> {
        let indexes = self.data.get_indexes().await?.clone();
        self.filtering.update(&indexes);
        self.editing.update(&indexes);
        self.refresh_fragment(PluginKind::Filtering);
        self.redraw().await
    }

    /// Threads an empty query through the plugins in apply order.
    pub fn build_query(&self) -> Query {
        self.apply_order
            .iter()
            .fold(Query::new(), |query, &kind| self.plugin(kind).apply(query))
    }

    /// Starts a redraw: issues the next sequence number and builds the query.
    pub fn prepare_redraw(&mut self) -> RedrawRequest {
        self.issued += 1;
        RedrawRequest {
            seq: self.issued,
            query: self.build_query(),
        }
    }

    /// Finishes a redraw with the fetched page.
    ///
    /// Returns `false`, leaving the grid untouched, when `seq` is not the
    /// latest prepared request.
    pub fn complete_redraw(&mut self, seq: u64, page: RecordPage) -> bool {
        if seq != self.issued || seq <= self.applied {
            log::debug!("discarding stale redraw {} (latest {})", seq, self.issued);
            return false;
        }
        self.rows = page.items;
        self.table.render(&self.rows);
        self.pagination.update(page.total);
        self.refresh_fragment(PluginKind::Pagination);
        self.applied = seq;
        true
    }

    /// Fetches (memoized) and renders the rows for the current state.
    pub async fn redraw(&mut self) -> Result<(), Error> {
        self.redraw_with(false).await
    }

    /// Like [`redraw`](Self::redraw) but always goes to the source.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.redraw_with(true).await
    }

    async fn redraw_with(&mut self, force_update: bool) -> Result<(), Error> {
        let requested = self.pagination.page();
        self.fetch_and_apply(force_update).await?;

        // The total shrank below the requested page; show the last page instead.
        if self.pagination.page() != requested {
            log::debug!("page {} out of range, moving to {}", requested, self.pagination.page());
            self.fetch_and_apply(force_update).await?;
        }
        Ok(())
    }

    async fn fetch_and_apply(&mut self, force_update: bool) -> Result<(), Error> {
        let request = self.prepare_redraw();
        let page = self.data.get_records(&request.query, force_update).await?;
        self.complete_redraw(request.seq, page.into_inner());
        Ok(())
    }

    // ===== Sorting

    /// Cycles the sort order of `field`. Returns `false` if it is not sortable.
    pub async fn toggle_sort(&mut self, field: &str) -> Result<bool, Error> {
        if !self.sorting.toggle(field) {
            return Ok(false);
        }
        self.refresh_fragment(PluginKind::Sorting);
        self.redraw().await?;
        Ok(true)
    }

    // ===== Pagination

    pub async fn first_page(&mut self) -> Result<(), Error> {
        self.pagination.first();
        self.redraw().await
    }

    pub async fn prev_page(&mut self) -> Result<(), Error> {
        self.pagination.prev();
        self.redraw().await
    }

    pub async fn next_page(&mut self) -> Result<(), Error> {
        self.pagination.next();
        self.redraw().await
    }

    pub async fn last_page(&mut self) -> Result<(), Error> {
        self.pagination.last();
        self.redraw().await
    }

    pub async fn goto_page(&mut self, page: usize) -> Result<(), Error> {
        self.pagination.goto(page);
        self.redraw().await
    }

    /// Changes the page size. Returns `false` if it was already `limit`.
    pub async fn set_limit(&mut self, limit: usize) -> Result<bool, Error> {
        if !self.pagination.set_limit(limit) {
            return Ok(false);
        }
        self.redraw().await?;
        Ok(true)
    }

    // ===== Filtering and search

    /// Sets a filter input (`name`, or `nameFrom`/`nameTo` for ranges).
    ///
    /// Returns `false` if nothing changed.
    pub async fn set_filter(&mut self, key: &str, value: &str) -> Result<bool, Error> {
        if !self.filtering.set(key, value) {
            return Ok(false);
        }
        self.refresh_fragment(PluginKind::Filtering);
        self.redraw().await?;
        Ok(true)
    }

    pub async fn clear_filter(&mut self, key: &str) -> Result<bool, Error> {
        if !self.filtering.clear(key) {
            return Ok(false);
        }
        self.refresh_fragment(PluginKind::Filtering);
        self.redraw().await?;
        Ok(true)
    }

    pub async fn search(&mut self, term: &str) -> Result<bool, Error> {
        if !self.searching.set(term) {
            return Ok(false);
        }
        self.refresh_fragment(PluginKind::Searching);
        self.redraw().await?;
        Ok(true)
    }

    /// Clears the search term and every filter, then redraws.
    pub async fn reset_all(&mut self) -> Result<(), Error> {
        self.searching.reset();
        self.filtering.clear_all();
        self.refresh_fragment(PluginKind::Searching);
        self.refresh_fragment(PluginKind::Filtering);
        self.redraw().await
    }

    // ===== Editing

    pub fn open_add(&mut self) {
        self.editing.open_add(self.table.schema());
    }

    /// Opens the edit form for the displayed record `id`. Returns `false` if no row has it.
    pub fn open_edit(&mut self, id: &str) -> bool {
        match self.rows.iter().find(|r| r.key().as_deref() == Some(id)) {
            Some(record) => self.editing.open_edit(self.table.schema(), record),
            None => false,
        }
    }

    /// Opens the delete confirmation for the displayed record `id`.
    pub fn open_delete(&mut self, id: &str) -> bool {
        match self.rows.iter().find(|r| r.key().as_deref() == Some(id)) {
            Some(record) => self.editing.open_delete(record),
            None => false,
        }
    }

    pub fn set_form_field(&mut self, name: &str, value: &str) -> bool {
        self.editing.set_field(name, value)
    }

    /// Submits the open modal; a saved change triggers a full redraw.
    pub async fn submit_modal(&mut self) -> Result<SubmitOutcome, Error> {
        let outcome = self.editing.submit(&mut self.data).await;
        if outcome == SubmitOutcome::Saved {
            self.redraw().await?;
        }
        Ok(outcome)
    }

    /// Closes any open modal.
    pub fn escape(&mut self) -> bool {
        self.editing.escape()
    }

    // ===== Views and state

    pub fn container(&self) -> Node {
        self.table.container()
    }

    pub fn modal_view(&self) -> Option<Node> {
        self.editing.modal_view()
    }

    /// Records currently rendered.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn schema(&self) -> &Schema {
        self.table.schema()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn data(&self) -> &DataLayer {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataLayer {
        &mut self.data
    }

    pub fn sorting(&self) -> &Sorting {
        &self.sorting
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn filtering(&self) -> &Filtering {
        &self.filtering
    }

    pub fn searching(&self) -> &Searching {
        &self.searching
    }

    pub fn editing(&self) -> &Editing {
        &self.editing
    }

    /// Sequence number of the last applied redraw; 0 before the first.
    pub fn applied_seq(&self) -> u64 {
        self.applied
    }

    fn plugin(&self, kind: PluginKind) -> &dyn Plugin {
        match kind {
            PluginKind::Editing => &self.editing,
            PluginKind::Searching => &self.searching,
            PluginKind::Filtering => &self.filtering,
            PluginKind::Sorting => &self.sorting,
            PluginKind::Pagination => &self.pagination,
        }
    }

    fn refresh_fragment(&mut self, kind: PluginKind) {
        let node = self.plugin(kind).view(self.table.schema());
        self.table.set_fragment(kind.index(), node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use crate::model::EditKind;
    use crate::model::FilterKind;
    use crate::testing::MockSource;
    use crate::view::to_text;

    fn schema() -> Schema {
        Schema::from_columns([
            Column::new("date", "Date").sortable().filter(FilterKind::Text).edit(EditKind::Date),
            Column::new("customer", "Customer")
                .filter(FilterKind::Text)
                .edit(EditKind::Select)
                .options("customers"),
            Column::new("seller", "Seller")
                .filter(FilterKind::Select)
                .options("sellers")
                .edit(EditKind::Select),
            Column::new("total", "Total").sortable().filter(FilterKind::Range).edit(EditKind::Number),
        ])
        .unwrap()
    }

    fn grid(n: usize) -> (Grid, std::sync::Arc<MockSource>) {
        let source = MockSource::with_records(n);
        let grid = Grid::with_data(DataLayer::from_arc(source.clone()), &schema(), GridConfig::default());
        (grid, source)
    }

    #[tokio::test]
    async fn test_start_renders_first_page() {
        let (mut grid, source) = grid(23);
        grid.start().await.unwrap();

        assert_eq!(grid.rows().len(), 10);
        assert_eq!(grid.pagination().page_count(), 3);
        assert_eq!(grid.rows()[0].display("seller"), "Seller 1");
        assert_eq!(grid.filtering().options_for("seller"), &["Seller 1", "Seller 2", "Seller 3"]);
        assert_eq!(source.index_fetches(), 2);
        assert_eq!(grid.schema().names().last(), Some(&"actions"));
    }

    #[tokio::test]
    async fn test_query_in_apply_order() {
        let (mut grid, source) = grid(5);
        grid.start().await.unwrap();
        grid.toggle_sort("total").await.unwrap();
        grid.set_filter("seller", "Seller 2").await.unwrap();
        grid.search("x").await.unwrap();

        let query = source.last_query().unwrap();
        assert_eq!(
            query.to_query_string(),
            "filter%5Bseller%5D=Seller+2&limit=10&page=1&search=x&sort=total%3Aup"
        );
        assert_eq!(grid.build_query(), query);
    }

    #[test]
    fn test_apply_order_limits_contributors() {
        let source = MockSource::with_records(0);
        let config = GridConfig::default().with_apply_order(vec![PluginKind::Searching]);
        let grid = Grid::with_data(DataLayer::from_arc(source), &schema(), config);
        assert!(grid.build_query().is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_state_hits_memo() {
        let (mut grid, source) = grid(23);
        grid.start().await.unwrap();
        grid.redraw().await.unwrap();
        assert_eq!(source.record_fetches(), 1);

        grid.refresh().await.unwrap();
        assert_eq!(source.record_fetches(), 2);
    }

    #[tokio::test]
    async fn test_out_of_range_page_moves_to_last() {
        let (mut grid, source) = grid(23);
        grid.start().await.unwrap();
        grid.goto_page(4).await.unwrap();

        assert_eq!(grid.pagination().page(), 3);
        assert_eq!(grid.rows().len(), 3);
        assert_eq!(source.last_query().unwrap().get("page"), Some("3"));
        assert_eq!(grid.pagination().status(), "Showing 21 to 23 of 23 entries");
    }

    #[test]
    fn test_stale_redraw_discarded() {
        let (mut grid, _) = grid(0);
        let first = grid.prepare_redraw();
        let second = grid.prepare_redraw();
        let page = |total| RecordPage {
            total,
            items: vec![Record::new().set("id", total)],
        };

        assert!(grid.complete_redraw(second.seq, page(2)));
        assert!(!grid.complete_redraw(first.seq, page(1)));
        assert_eq!(grid.rows()[0].key().as_deref(), Some("2"));
        assert_eq!(grid.applied_seq(), second.seq);
        assert!(!grid.complete_redraw(second.seq, page(3)));
    }

    #[tokio::test]
    async fn test_edit_and_delete_flow() {
        let (mut grid, source) = grid(12);
        grid.start().await.unwrap();

        assert!(!grid.open_edit("99"));
        assert!(grid.open_edit("2"));
        assert!(grid.set_form_field("total", "999"));
        assert_eq!(grid.submit_modal().await.unwrap(), SubmitOutcome::Saved);
        assert!(grid.modal_view().is_none());
        assert_eq!(grid.rows()[1].display("total"), "999");

        assert!(grid.open_delete("1"));
        source.fail_next("boom");
        assert_eq!(grid.submit_modal().await.unwrap(), SubmitOutcome::Failed);
        assert!(grid.editing().is_open());
        assert!(to_text(&grid.modal_view().unwrap()).contains("Error deleting record. Please try again."));

        assert_eq!(grid.submit_modal().await.unwrap(), SubmitOutcome::Saved);
        assert_eq!(grid.pagination().total(), 11);
        assert!(!grid.escape());
    }

    #[tokio::test]
    async fn test_reset_all() {
        let (mut grid, _) = grid(3);
        grid.start().await.unwrap();
        grid.set_filter("totalFrom", "10").await.unwrap();
        grid.search("abc").await.unwrap();

        grid.reset_all().await.unwrap();
        let query = grid.build_query();
        assert_eq!(query.len(), 2);
        assert!(!grid.filtering().is_active());
        assert_eq!(grid.searching().term(), "");
    }

    #[tokio::test]
    async fn test_container_text() {
        let (mut grid, _) = grid(2);
        grid.start().await.unwrap();
        grid.toggle_sort("date").await.unwrap();

        let text = to_text(&grid.container());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[Add New Record]");
        assert_eq!(lines[1], "[Search] [Reset all filters]");
        assert_eq!(lines[3], "Date [↑] | Customer | Seller | Total [↕] | Actions");
        assert_eq!(lines[4], "2024-01-01 | Customer 1 | Seller 1 | 10 | [Edit] [Delete]");
        assert!(lines.last().unwrap().contains("Showing 1 to 2 of 2 entries"));
    }
}

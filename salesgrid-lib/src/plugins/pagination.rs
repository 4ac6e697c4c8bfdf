//! Page navigation, page-size selection and the "Showing x to y" status.

use super::Plugin;
use crate::model::Query;
use crate::model::Schema;
use crate::table::Contribution;
use crate::util::pages_to_show;
use crate::view::Node;

/// Pagination defaults.
///
/// # Example
///
/// ```
/// use salesgrid_lib::plugins::PaginationConfig;
///
/// let config = PaginationConfig::default()
///     .with_default_limit(20)
///     .with_window(7);
/// assert_eq!(config.options, vec![10, 20, 50, 100]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Rows per page before the user picks another size.
    ///
    /// Default: 10
    pub default_limit: usize,

    /// Page sizes offered in the selector.
    ///
    /// Default: `[10, 20, 50, 100]`
    pub options: Vec<usize>,

    /// Number of page buttons shown around the current page.
    ///
    /// Default: 5
    pub window: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            options: vec![10, 20, 50, 100],
            window: 5,
        }
    }
}

impl PaginationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_options(mut self, options: Vec<usize>) -> Self {
        self.options = options;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

#[derive(Debug)]
pub struct Pagination {
    config: PaginationConfig,
    limit: usize,
    page: usize,
    page_count: usize,
    total: usize,
    pages: Vec<usize>,
}

impl Pagination {
    pub fn new(config: PaginationConfig) -> Self {
        let limit = config.default_limit.max(1);
        Self {
            config,
            limit,
            page: 1,
            page_count: 0,
            total: 0,
            pages: Vec::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// `ceil(total / limit)` as of the last [`update`](Self::update).
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Page numbers currently shown as buttons.
    pub fn pages(&self) -> &[usize] {
        &self.pages
    }

    pub fn first(&mut self) {
        self.page = 1;
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn next(&mut self) {
        self.page = (self.page + 1).min(self.page_count.max(1));
    }

    pub fn last(&mut self) {
        self.page = self.page_count.max(1);
    }

    /// Jumps to `page`. The page is clamped against the page count on the next update.
    pub fn goto(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changes the page size and returns to the first page.
    ///
    /// Returns `false` when `limit` equals the current size, in which case
    /// the page is kept.
    pub fn set_limit(&mut self, limit: usize) -> bool {
        let limit = limit.max(1);
        if limit == self.limit {
            return false;
        }
        self.limit = limit;
        self.page = 1;
        true
    }

    /// Recomputes page count, visible pages and status from the server total.
    ///
    /// The current page is clamped into `[1, page_count]`; returns `true`
    /// when that moved it.
    pub fn update(&mut self, total: usize) -> bool {
        self.total = total;
        self.page_count = total.div_ceil(self.limit);

        let clamped = self.page.clamp(1, self.page_count.max(1));
        let moved = clamped != self.page;
        self.page = clamped;
        self.pages = pages_to_show(self.page, self.page_count, self.config.window);
        moved
    }

    /// First and last row numbers shown, 1-based. `(0, 0)` when empty.
    pub fn range(&self) -> (usize, usize) {
        if self.total == 0 {
            return (0, 0);
        }
        let from = (self.page - 1) * self.limit + 1;
        let to = (self.page * self.limit).min(self.total);
        (from.min(to), to)
    }

    pub fn status(&self) -> String {
        let (from, to) = self.range();
        format!("Showing {} to {} of {} entries", from, to, self.total)
    }

    fn nav_button(name: &str, glyph: &str) -> Node {
        Node::button(glyph)
            .class("pagination-button")
            .attr("type", "submit")
            .name(name)
    }

    fn page_label(&self, page: usize) -> Node {
        Node::new("label")
            .class("pagination-button")
            .attr("aria-label", format!("Goto page {page}"))
            .child(Node::input("radio", "page", page.to_string()).flag("checked", page == self.page))
    }

    fn limit_selector(&self) -> Node {
        let options = self.config.options.iter().map(|&option| {
            Node::new("option")
                .attr("value", option.to_string())
                .flag("selected", option == self.limit)
                .text(option.to_string())
        });
        Node::div()
            .class("dropdown-select rows-per-page")
            .child(Node::new("select").name("rowsPerPage").children(options))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PaginationConfig::default())
    }
}

impl Plugin for Pagination {
    fn name(&self) -> &'static str {
        "pagination"
    }

    fn attach(&mut self, schema: &mut Schema) -> Contribution {
        Contribution::After(self.view(schema))
    }

    fn apply(&self, query: Query) -> Query {
        query.with("limit", self.limit).with("page", self.page)
    }

    fn view(&self, _schema: &Schema) -> Node {
        let pages = Node::div()
            .class("pagination-pages")
            .children(self.pages.iter().map(|&page| self.page_label(page)));

        Node::new("form")
            .name("pagination")
            .class("pagination-container")
            .child(
                Node::div()
                    .class("pagination-controls")
                    .child(Self::nav_button("first", "«"))
                    .child(Self::nav_button("prev", "‹"))
                    .child(pages)
                    .child(Self::nav_button("next", "›"))
                    .child(Self::nav_button("last", "»")),
            )
            .child(
                Node::div()
                    .class("pagination-settings")
                    .child(Node::div().class("pagination-status").text(self.status()))
                    .child(self.limit_selector()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::to_text;

    #[test]
    fn test_page_count_and_clamp() {
        let mut pagination = Pagination::default();
        pagination.goto(4);
        assert_eq!(pagination.apply(Query::new()).get("page"), Some("4"));

        assert!(pagination.update(23));
        assert_eq!(pagination.page_count(), 3);
        assert_eq!(pagination.page(), 3);
        assert_eq!(pagination.pages(), &[1, 2, 3]);
        assert_eq!(pagination.status(), "Showing 21 to 23 of 23 entries");
    }

    #[test]
    fn test_navigation_bounds() {
        let mut pagination = Pagination::default();
        pagination.update(95);

        pagination.prev();
        assert_eq!(pagination.page(), 1);
        pagination.last();
        assert_eq!(pagination.page(), 10);
        pagination.next();
        assert_eq!(pagination.page(), 10);
        pagination.first();
        pagination.next();
        assert_eq!(pagination.page(), 2);
    }

    #[test]
    fn test_set_limit_resets_page() {
        let mut pagination = Pagination::default();
        pagination.update(100);
        pagination.goto(5);

        assert!(!pagination.set_limit(10));
        assert_eq!(pagination.page(), 5);
        assert!(pagination.set_limit(50));
        assert_eq!(pagination.page(), 1);

        let query = pagination.apply(Query::new());
        assert_eq!(query.get("limit"), Some("50"));
        assert_eq!(query.get("page"), Some("1"));
    }

    #[test]
    fn test_empty_total() {
        let mut pagination = Pagination::default();
        pagination.goto(3);
        pagination.update(0);
        assert_eq!(pagination.page(), 1);
        assert!(pagination.pages().is_empty());
        assert_eq!(pagination.status(), "Showing 0 to 0 of 0 entries");
        pagination.next();
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_window_follows_page() {
        let mut pagination = Pagination::default();
        pagination.goto(5);
        pagination.update(100);
        assert_eq!(pagination.pages(), &[3, 4, 5, 6, 7]);
        assert_eq!(pagination.status(), "Showing 41 to 50 of 100 entries");
    }

    #[test]
    fn test_view() {
        let mut pagination = Pagination::new(PaginationConfig::new().with_options(vec![10, 20]));
        pagination.goto(2);
        pagination.update(23);
        let view = pagination.view(&Schema::default());

        assert_eq!(
            to_text(&view),
            "[«] [‹] 1 *2 3 [›] [»] Showing 11 to 20 of 23 entries <10>"
        );
        let radio = view
            .find(&|n| n.get_attr("checked").is_some())
            .unwrap();
        assert_eq!(radio.get_attr("value"), Some("2"));
    }
}

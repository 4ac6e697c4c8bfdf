//! Grid configuration

use crate::plugins::PaginationConfig;
use crate::table::TableOptions;

/// The behavior plugins, in the order they are attached to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    Editing,
    Searching,
    Filtering,
    Sorting,
    Pagination,
}

impl PluginKind {
    /// Attachment order; also the default query order.
    pub const ALL: [PluginKind; 5] = [
        PluginKind::Editing,
        PluginKind::Searching,
        PluginKind::Filtering,
        PluginKind::Sorting,
        PluginKind::Pagination,
    ];

    /// Position of this plugin's fragment in the table.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Configuration for a [`Grid`](crate::Grid).
///
/// # Example
///
/// ```
/// use salesgrid_lib::config::{GridConfig, PluginKind};
/// use salesgrid_lib::plugins::PaginationConfig;
///
/// let config = GridConfig::default()
///     .with_pagination(PaginationConfig::default().with_default_limit(20))
///     .with_apply_order(vec![PluginKind::Pagination, PluginKind::Sorting]);
/// assert_eq!(config.pagination.default_limit, 20);
/// ```
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Container name and class.
    pub table: TableOptions,

    /// Page size, size options and page window.
    pub pagination: PaginationConfig,

    /// Order in which plugins contribute to the query. Later plugins win
    /// on shared keys; plugins left out contribute nothing.
    ///
    /// Default: [`PluginKind::ALL`]
    pub apply_order: Vec<PluginKind>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            table: TableOptions::default(),
            pagination: PaginationConfig::default(),
            apply_order: PluginKind::ALL.to_vec(),
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableOptions) -> Self {
        self.table = table;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_apply_order(mut self, order: Vec<PluginKind>) -> Self {
        self.apply_order = order;
        self
    }
}

//! Table core: plugin composition and row rendering.
//!
//! [`init_table`] copies the caller's schema, lets each plugin extend the
//! copy and contribute one fragment, then assembles the container as
//! `[before fragments..., row body, after fragments...]`. [`Table::render`]
//! replaces the row body wholesale.

use crate::model::Column;
use crate::model::Record;
use crate::model::Schema;
use crate::plugins::Plugin;
use crate::util::class_names;
use crate::view::Content;
use crate::view::Node;

/// Where a plugin's fragment goes relative to the row body.
#[derive(Debug, Clone, PartialEq)]
pub enum Contribution {
    Before(Node),
    After(Node),
}

impl Contribution {
    pub fn node(&self) -> &Node {
        match self {
            Self::Before(node) | Self::After(node) => node,
        }
    }

    pub fn is_before(&self) -> bool {
        matches!(self, Self::Before(_))
    }

    /// The same insertion point holding `node`.
    fn replace(&self, node: Node) -> Self {
        match self {
            Self::Before(_) => Self::Before(node),
            Self::After(_) => Self::After(node),
        }
    }
}

/// Container name and extra class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub name: String,
    pub class_name: String,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}

/// A composed table: the extended schema, plugin fragments and current rows.
#[derive(Debug, Clone)]
pub struct Table {
    options: TableOptions,
    schema: Schema,
    fragments: Vec<Contribution>,
    rows: Vec<Node>,
}

/// Builds a table from `schema`, invoking each plugin's `attach` once in order.
///
/// The schema is cloned first, so plugins only ever see and extend the copy.
/// Fragment `i` belongs to `plugins[i]` and can be replaced later with
/// [`Table::set_fragment`].
pub fn init_table(schema: &Schema, options: TableOptions, plugins: &mut [&mut dyn Plugin]) -> Table {
    let mut schema = schema.clone();
    let fragments = plugins
        .iter_mut()
        .map(|plugin| {
            let contribution = plugin.attach(&mut schema);
            log::debug!(
                "plugin '{}' attached {}",
                plugin.name(),
                if contribution.is_before() { "before" } else { "after" }
            );
            contribution
        })
        .collect();

    Table {
        options,
        schema,
        fragments,
        rows: Vec::new(),
    }
}

impl Table {
    /// The schema after every plugin extended it.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fragments(&self) -> &[Contribution] {
        &self.fragments
    }

    /// Replaces fragment `index`, keeping its insertion point.
    ///
    /// Returns `false` when there is no such fragment.
    pub fn set_fragment(&mut self, index: usize, node: Node) -> bool {
        match self.fragments.get_mut(index) {
            Some(slot) => {
                *slot = slot.replace(node);
                true
            }
            None => false,
        }
    }

    /// Replaces the row body with one row per record.
    pub fn render(&mut self, records: &[Record]) {
        self.rows = records
            .iter()
            .map(|record| row(self.schema.iter().map(|column| body_cell(column, record)), ""))
            .collect();
    }

    pub fn rows(&self) -> &[Node] {
        &self.rows
    }

    /// The row body slot.
    pub fn body(&self) -> Node {
        Node::div()
            .class("table-content")
            .role("rowgroup")
            .data("name", "rows")
            .children(self.rows.iter().cloned())
    }

    /// The assembled container.
    pub fn container(&self) -> Node {
        let before = self.fragments.iter().filter(|f| f.is_before());
        let after = self.fragments.iter().filter(|f| !f.is_before());

        Node::div()
            .name(self.options.name.as_str())
            .class(class_names(["table", self.options.class_name.as_str()]))
            .style("--columns", self.schema.template())
            .role("table")
            .children(before.map(|f| f.node().clone()))
            .child(self.body())
            .children(after.map(|f| f.node().clone()))
    }
}

/// A `table-row` with the given cells and extra classes.
pub fn row(cells: impl IntoIterator<Item = Node>, class_name: &str) -> Node {
    Node::div()
        .class(class_names(["table-row", class_name]))
        .role("row")
        .children(cells)
}

/// A `table-column` cell tagged with the column name.
pub fn cell(name: &str, content: impl Into<Content>, role: &str) -> Node {
    let node = Node::div().class("table-column").role(role).data("name", name);
    match content.into() {
        Content::Text(text) => node.text(text),
        Content::Node(child) => node.child(child),
    }
}

fn body_cell(column: &Column, record: &Record) -> Node {
    cell(&column.name, column.cell(record), "cell")
}

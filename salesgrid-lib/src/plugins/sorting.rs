//! Column sorting with a header row of toggles.

use std::fmt;

use super::Plugin;
use crate::model::Query;
use crate::model::Schema;
use crate::table::Contribution;
use crate::table::cell;
use crate::table::row;
use crate::util::capitalize;
use crate::view::Node;

/// Sort direction of the active field. Toggling cycles `None → Up → Down → None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    None,
    Up,
    Down,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Up,
            Self::Up => Self::Down,
            Self::Down => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    fn glyph(&self) -> &'static str {
        match self {
            Self::None => "↕",
            Self::Up => "↑",
            Self::Down => "↓",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// At most one field is sorted at a time.
#[derive(Debug, Default)]
pub struct Sorting {
    field: Option<String>,
    order: SortOrder,
    sortable: Vec<String>,
}

impl Sorting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances `field`'s order; every other field goes back to `None`.
    ///
    /// Returns `false` for fields that are not sortable.
    pub fn toggle(&mut self, field: &str) -> bool {
        if !self.sortable.iter().any(|f| f == field) {
            return false;
        }
        let current = self.order_of(field);
        self.field = Some(field.to_string());
        self.order = current.next();
        true
    }

    pub fn order_of(&self, field: &str) -> SortOrder {
        match &self.field {
            Some(active) if active == field => self.order,
            _ => SortOrder::None,
        }
    }

    /// The active `(field, order)`, if any field is sorted.
    pub fn active(&self) -> Option<(&str, SortOrder)> {
        match (&self.field, self.order) {
            (Some(field), order) if order != SortOrder::None => Some((field.as_str(), order)),
            _ => None,
        }
    }

    pub fn sortable(&self) -> &[String] {
        &self.sortable
    }
}

impl Plugin for Sorting {
    fn name(&self) -> &'static str {
        "sorting"
    }

    fn attach(&mut self, schema: &mut Schema) -> Contribution {
        self.sortable = schema.iter().filter(|c| c.sort).map(|c| c.name.clone()).collect();
        Contribution::Before(self.view(schema))
    }

    fn apply(&self, query: Query) -> Query {
        match self.active() {
            Some((field, order)) => query.with("sort", format!("{field}:{order}")),
            None => query,
        }
    }

    fn view(&self, schema: &Schema) -> Node {
        let headers = schema.iter().map(|column| {
            let label = column.header();
            if !column.sort {
                return cell(&column.name, label, "columnheader");
            }
            let order = self.order_of(&column.name);
            let toggle = Node::button(order.glyph())
                .class("icon")
                .attr("type", "button")
                .name("sort")
                .attr("aria-label", format!("Sort by {}", column.name))
                .data("field", column.name.as_str())
                .data("value", order.as_str())
                .data("name", format!("sortBy{}", capitalize(&column.name)));
            let content = Node::div().class("sortable").text(label).child(toggle);
            cell(&column.name, content, "columnheader")
        });
        row(headers, "header-row")
    }
}

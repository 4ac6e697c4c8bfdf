//! Per-column filters in a row under the header.

use std::collections::BTreeMap;

use super::Plugin;
use crate::model::FilterKind;
use crate::model::Indexes;
use crate::model::Query;
use crate::model::Schema;
use crate::table::Contribution;
use crate::table::cell;
use crate::view::Node;

#[derive(Debug, Clone)]
struct FilterField {
    column: String,
    kind: FilterKind,
    options: Option<String>,
}

impl FilterField {
    /// Query keys this field writes: `name`, or `nameFrom`/`nameTo` for ranges.
    fn keys(&self) -> Vec<String> {
        match self.kind {
            FilterKind::Range => vec![format!("{}From", self.column), format!("{}To", self.column)],
            FilterKind::Text | FilterKind::Select => vec![self.column.clone()],
        }
    }
}

/// Filter values keyed by input name.
///
/// Text and select filters use the column name; range filters use
/// `<name>From` and `<name>To`. Each non-empty value is sent as
/// `filter[<key>]`.
#[derive(Debug, Default)]
pub struct Filtering {
    fields: Vec<FilterField>,
    values: BTreeMap<String, String>,
    options: BTreeMap<String, Vec<String>>,
}

impl Filtering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every input key the filter row accepts, in column order.
    pub fn keys(&self) -> Vec<String> {
        self.fields.iter().flat_map(FilterField::keys).collect()
    }

    pub fn accepts(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.keys().iter().any(|k| k == key))
    }

    /// Sets a filter value; an empty value clears it.
    ///
    /// Returns `false` when nothing changed or `key` is not a filter input.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        if !self.accepts(key) {
            return false;
        }
        let value = value.trim();
        if value.is_empty() {
            return self.values.remove(key).is_some();
        }
        self.values.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Clears one input, or both inputs of a range column when given its name.
    pub fn clear(&mut self, key: &str) -> bool {
        let keys = match self.fields.iter().find(|f| f.column == key) {
            Some(field) => field.keys(),
            None => vec![key.to_string()],
        };
        keys.iter().fold(false, |changed, k| self.values.remove(k).is_some() || changed)
    }

    pub fn clear_all(&mut self) -> bool {
        let changed = !self.values.is_empty();
        self.values.clear();
        changed
    }

    pub fn is_active(&self) -> bool {
        !self.values.is_empty()
    }

    /// Fills select filters from the index tables they name.
    pub fn update(&mut self, indexes: &Indexes) {
        for field in self.fields.iter().filter(|f| f.kind == FilterKind::Select) {
            let Some(name) = field.options.as_deref() else {
                continue;
            };
            match indexes.get(name) {
                Some(table) => {
                    self.options.insert(name.to_string(), table.names());
                }
                None => log::warn!("filter '{}' names unknown option set '{}'", field.column, name),
            }
        }
    }

    /// Choices of the select filter on `column`.
    pub fn options_for(&self, column: &str) -> &[String] {
        self.fields
            .iter()
            .find(|f| f.column == column)
            .and_then(|f| f.options.as_ref())
            .and_then(|name| self.options.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn text_filter(&self, name: &str) -> Node {
        Node::new("label")
            .class("filter-wrapper")
            .child(
                Node::input("text", name, self.get(name).unwrap_or_default())
                    .class("input")
                    .attr("placeholder", "Search"),
            )
            .child(
                Node::button("×")
                    .class("icon")
                    .attr("type", "submit")
                    .name("clear")
                    .data("name", name),
            )
    }

    fn select_filter(&self, name: &str) -> Node {
        let selected = self.get(name).unwrap_or_default();
        let choices = self.options_for(name).iter().map(|option| {
            Node::new("option")
                .attr("value", option.as_str())
                .flag("selected", option == selected)
                .text(option.as_str())
        });
        Node::new("label").class("dropdown-select").data("name", name).child(
            Node::new("select")
                .name(name)
                .child(Node::new("option").attr("value", "").flag("selected", selected.is_empty()))
                .children(choices),
        )
    }

    fn range_filter(&self, name: &str) -> Node {
        let input = |key: String, placeholder: &str| {
            Node::input("text", key.as_str(), self.get(&key).unwrap_or_default())
                .class("input")
                .attr("placeholder", placeholder)
        };
        Node::div()
            .class("range-inputs")
            .child(input(format!("{name}From"), "from"))
            .child(input(format!("{name}To"), "to"))
    }
}

impl Plugin for Filtering {
    fn name(&self) -> &'static str {
        "filtering"
    }

    fn attach(&mut self, schema: &mut Schema) -> Contribution {
        self.fields = schema
            .iter()
            .filter_map(|column| {
                column.filter.map(|kind| FilterField {
                    column: column.name.clone(),
                    kind,
                    options: column.options.clone(),
                })
            })
            .collect();
        Contribution::Before(self.view(schema))
    }

    fn apply(&self, query: Query) -> Query {
        query.merge(
            self.keys()
                .into_iter()
                .filter_map(|key| self.values.get(&key).map(|value| (format!("filter[{key}]"), value.clone()))),
        )
    }

    fn view(&self, schema: &Schema) -> Node {
        let cells = schema.iter().map(|column| {
            let content = match column.filter {
                Some(FilterKind::Text) => self.text_filter(&column.name),
                Some(FilterKind::Select) => self.select_filter(&column.name),
                Some(FilterKind::Range) => self.range_filter(&column.name),
                None => return cell(&column.name, "", "cell"),
            };
            cell(&column.name, content, "cell")
        });
        Node::new("form")
            .name("filter")
            .class("table-row filter-row")
            .role("row")
            .children(cells)
    }
}

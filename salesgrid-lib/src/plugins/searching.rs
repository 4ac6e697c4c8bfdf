//! Free-text search bar.

use super::Plugin;
use crate::model::Query;
use crate::model::Schema;
use crate::table::Contribution;
use crate::view::Node;

#[derive(Debug, Default)]
pub struct Searching {
    term: String,
}

impl Searching {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Replaces the search term. Returns `true` if it changed.
    pub fn set(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term == self.term {
            return false;
        }
        self.term = term.to_string();
        true
    }

    pub fn reset(&mut self) -> bool {
        self.set("")
    }
}

impl Plugin for Searching {
    fn name(&self) -> &'static str {
        "searching"
    }

    fn attach(&mut self, schema: &mut Schema) -> Contribution {
        Contribution::Before(self.view(schema))
    }

    fn apply(&self, query: Query) -> Query {
        if self.term.is_empty() {
            query
        } else {
            query.with("search", &self.term)
        }
    }

    fn view(&self, _schema: &Schema) -> Node {
        Node::new("form")
            .name("search")
            .class("search-bar")
            .child(
                Node::new("label").class("search-wrapper").child(
                    Node::input("text", "search", self.term.as_str())
                        .class("input")
                        .attr("placeholder", "Search"),
                ),
            )
            .child(
                Node::button("Reset all filters")
                    .class("button reset-wrapper")
                    .attr("type", "reset"),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::to_text;

    #[test]
    fn test_apply_only_when_set() {
        let mut searching = Searching::new();
        assert!(searching.apply(Query::new()).is_empty());

        assert!(searching.set(" Smith "));
        assert_eq!(searching.apply(Query::new()).get("search"), Some("Smith"));
        assert!(!searching.set("Smith"));
    }

    #[test]
    fn test_reset() {
        let mut searching = Searching::new();
        searching.set("x");
        assert!(searching.reset());
        assert!(!searching.reset());
        assert!(!searching.apply(Query::new()).contains_key("search"));
    }

    #[test]
    fn test_view_shows_term() {
        let mut searching = Searching::new();
        assert_eq!(to_text(&searching.view(&Schema::default())), "[Search] [Reset all filters]");
        searching.set("Ann");
        assert_eq!(to_text(&searching.view(&Schema::default())), "[Ann] [Reset all filters]");
    }
}

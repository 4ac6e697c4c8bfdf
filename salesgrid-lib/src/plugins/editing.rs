//! Add/edit/delete through modal forms.
//!
//! At most one modal is open. Opening another replaces it, escape closes
//! it, a successful submit closes it, and a failed submit keeps it open
//! with a notice.

use chrono::NaiveDate;
use serde_json::Number;
use serde_json::Value;

use super::Plugin;
use crate::data::DataLayer;
use crate::error::Error;
use crate::error::FieldValidationError;
use crate::model::Column;
use crate::model::EditKind;
use crate::model::Fields;
use crate::model::Indexes;
use crate::model::Record;
use crate::model::Schema;
use crate::table::Contribution;
use crate::view::Content;
use crate::view::Node;

/// Name of the column holding the Edit/Delete buttons.
pub const ACTIONS_COLUMN: &str = "actions";

const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Form
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: EditKind,
    pub required: bool,
    pub value: String,
    /// Choices for select fields.
    pub options: Vec<String>,
}

impl FormField {
    fn from_column(column: &Column, indexes: Option<&Indexes>, record: Option<&Record>) -> Self {
        let mut kind = column.edit.unwrap_or_default();
        let mut options = Vec::new();
        if kind == EditKind::Select {
            match column.options.as_deref() {
                Some(name) => {
                    options = indexes
                        .and_then(|idx| idx.get(name))
                        .map(|table| table.names())
                        .unwrap_or_default();
                }
                None => kind = EditKind::Text,
            }
        }

        Self {
            name: column.name.clone(),
            label: column.header().to_string(),
            kind,
            required: column.required,
            value: record.map(|r| r.display(&column.name)).unwrap_or_default(),
            options,
        }
    }

    /// Parses the raw input into the JSON value sent to the server.
    fn coerce(&self) -> Result<Value, FieldValidationError> {
        let raw = self.value.trim();
        if raw.is_empty() {
            if self.required {
                return Err(FieldValidationError::required(&self.name));
            }
            return Ok(match self.kind {
                EditKind::Date | EditKind::Number => Value::Null,
                EditKind::Text | EditKind::Select => Value::String(String::new()),
            });
        }

        match self.kind {
            EditKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(|_| Value::String(raw.to_string()))
                .map_err(|_| FieldValidationError::new(&self.name, "must be a date (YYYY-MM-DD)")),
            EditKind::Number => parse_number(raw)
                .ok_or_else(|| FieldValidationError::new(&self.name, "must be a number")),
            EditKind::Text | EditKind::Select => Ok(Value::String(raw.to_string())),
        }
    }

    fn view(&self) -> Node {
        let id = format!("field-{}", self.name);
        let control = match self.kind {
            EditKind::Select => {
                let choices = self.options.iter().map(|option| {
                    Node::new("option")
                        .attr("value", option.as_str())
                        .flag("selected", *option == self.value)
                        .text(option.as_str())
                });
                Node::new("select")
                    .attr("id", id.as_str())
                    .name(self.name.as_str())
                    .flag("required", self.required)
                    .child(
                        Node::new("option")
                            .attr("value", "")
                            .flag("selected", self.value.is_empty())
                            .text("Select..."),
                    )
                    .children(choices)
            }
            _ => Node::input(self.kind.input_type(), self.name.as_str(), self.value.as_str())
                .attr("id", id.as_str())
                .flag("required", self.required),
        };

        Node::div()
            .class("form-field")
            .child(Node::new("label").attr("for", id).text(self.label.as_str()))
            .child(control)
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Value::from(int));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number)
}

/// An add or edit form over every column except the actions column.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub title: String,
    pub submit_label: String,
    fields: Vec<FormField>,
}

impl Form {
    /// Builds fields from `schema`, seeded from `record` when editing.
    pub fn for_schema(schema: &Schema, indexes: Option<&Indexes>, record: Option<&Record>) -> Self {
        Self {
            title: String::new(),
            submit_label: "Save".to_string(),
            fields: schema
                .iter()
                .filter(|column| column.name != ACTIONS_COLUMN)
                .map(|column| FormField::from_column(column, indexes, record))
                .collect(),
        }
    }

    pub fn titled(mut self, title: impl Into<String>, submit_label: impl Into<String>) -> Self {
        self.title = title.into();
        self.submit_label = submit_label.into();
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }

    /// Sets a field's raw input. Returns `false` for unknown fields.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Validates required fields and coerces typed ones.
    ///
    /// Every failing field is reported, not just the first.
    pub fn values(&self) -> Result<Fields, Vec<FieldValidationError>> {
        let mut fields = Fields::new();
        let mut errors = Vec::new();
        for field in &self.fields {
            match field.coerce() {
                Ok(value) => {
                    fields.insert(field.name.clone(), value);
                }
                Err(error) => errors.push(error),
            }
        }
        if errors.is_empty() { Ok(fields) } else { Err(errors) }
    }

    pub fn view(&self) -> Node {
        Node::new("form")
            .class("modal-form")
            .children(self.fields.iter().map(FormField::view))
            .child(
                Node::div()
                    .class("form-actions")
                    .child(Node::button("Cancel").class("button").attr("type", "button").name("cancel"))
                    .child(
                        Node::button(self.submit_label.as_str())
                            .class("button button-add")
                            .attr("type", "submit"),
                    ),
            )
    }
}

// =============================================================================
// Modal state
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Add(Form),
    Edit { id: String, form: Form },
    ConfirmDelete { id: String },
}

impl Modal {
    pub fn form(&self) -> Option<&Form> {
        match self {
            Self::Add(form) | Self::Edit { form, .. } => Some(form),
            Self::ConfirmDelete { .. } => None,
        }
    }

    fn form_mut(&mut self) -> Option<&mut Form> {
        match self {
            Self::Add(form) | Self::Edit { form, .. } => Some(form),
            Self::ConfirmDelete { .. } => None,
        }
    }
}

/// What a submit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No modal was open.
    Idle,
    /// The server accepted the change; the modal is closed.
    Saved,
    /// Validation failed; the modal stays open with a notice.
    Invalid,
    /// The server call failed; the modal stays open with a notice.
    Failed,
}

enum Pending {
    Create(Fields),
    Update(String, Fields),
    Delete(String),
}

#[derive(Debug, Default)]
pub struct Editing {
    modal: Option<Modal>,
    notice: Option<String>,
    indexes: Option<Indexes>,
}

impl Editing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the index tables used for select choices.
    pub fn update(&mut self, indexes: &Indexes) {
        self.indexes = Some(indexes.clone());
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_some()
    }

    /// The error shown in the open modal.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn show(&mut self, modal: Modal) {
        if self.modal.is_some() {
            log::debug!("replacing open modal");
        }
        self.modal = Some(modal);
        self.notice = None;
    }

    pub fn open_add(&mut self, schema: &Schema) {
        let form = Form::for_schema(schema, self.indexes.as_ref(), None).titled("Add New Record", "Create");
        self.show(Modal::Add(form));
    }

    /// Opens the edit form for `record`. Returns `false` if it has no id.
    pub fn open_edit(&mut self, schema: &Schema, record: &Record) -> bool {
        let Some(id) = record.key() else {
            return false;
        };
        let form = Form::for_schema(schema, self.indexes.as_ref(), Some(record)).titled("Edit Record", "Update");
        self.show(Modal::Edit { id, form });
        true
    }

    /// Opens the delete confirmation for `record`. Returns `false` if it has no id.
    pub fn open_delete(&mut self, record: &Record) -> bool {
        let Some(id) = record.key() else {
            return false;
        };
        self.show(Modal::ConfirmDelete { id });
        true
    }

    /// Sets a field of the open form. Returns `false` with no form open or an unknown field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        self.modal
            .as_mut()
            .and_then(Modal::form_mut)
            .is_some_and(|form| form.set(name, value))
    }

    pub fn close(&mut self) {
        self.modal = None;
        self.notice = None;
    }

    /// Closes any open modal. Returns whether one was open.
    pub fn escape(&mut self) -> bool {
        let was_open = self.is_open();
        self.close();
        was_open
    }

    /// Submits the open modal through `data`.
    ///
    /// Failures are logged and turned into the notice; they never propagate.
    pub async fn submit(&mut self, data: &mut DataLayer) -> SubmitOutcome {
        let pending = match &self.modal {
            None => return SubmitOutcome::Idle,
            Some(Modal::Add(form)) => form.values().map(Pending::Create),
            Some(Modal::Edit { id, form }) => form.values().map(|fields| Pending::Update(id.clone(), fields)),
            Some(Modal::ConfirmDelete { id }) => Ok(Pending::Delete(id.clone())),
        };

        let pending = match pending {
            Ok(pending) => pending,
            Err(errors) => {
                self.notice = Some(Error::Validation(errors).to_string());
                return SubmitOutcome::Invalid;
            }
        };

        let (verb, result) = match &pending {
            Pending::Create(fields) => ("creating", data.create_record(fields).await.map(|_| ())),
            Pending::Update(id, fields) => ("updating", data.update_record(id, fields).await.map(|_| ())),
            Pending::Delete(id) => ("deleting", data.delete_record(id).await),
        };

        match result {
            Ok(()) => {
                self.close();
                SubmitOutcome::Saved
            }
            Err(e) => {
                log::error!("Error {} record: {}", verb, e);
                self.notice = Some(format!("Error {verb} record. Please try again."));
                SubmitOutcome::Failed
            }
        }
    }

    /// The open modal as a node, if any.
    pub fn modal_view(&self) -> Option<Node> {
        let modal = self.modal.as_ref()?;
        let notice = self
            .notice
            .as_deref()
            .map(|text| Node::div().class("modal-notice").role("alert").text(text));

        let node = match modal {
            Modal::Add(form) | Modal::Edit { form, .. } => overlay(
                Node::div().class("modal-content"),
                &form.title,
                true,
                notice.into_iter().chain([form.view()]),
            ),
            Modal::ConfirmDelete { .. } => {
                let actions = Node::div()
                    .class("form-actions")
                    .child(Node::button("Cancel").class("button").attr("type", "button").name("cancel"))
                    .child(
                        Node::button("Delete")
                            .class("button button-delete")
                            .attr("type", "button")
                            .name("confirm"),
                    );
                let message = Node::new("p")
                    .text("Are you sure you want to delete this record? This action cannot be undone.");
                overlay(
                    Node::div().class("modal-content modal-small"),
                    "Confirm Action",
                    false,
                    notice.into_iter().chain([message, actions]),
                )
            }
        };
        Some(node)
    }
}

fn overlay(content: Node, title: &str, closable: bool, body: impl IntoIterator<Item = Node>) -> Node {
    let mut header = Node::div().class("modal-header").child(Node::new("h2").text(title));
    if closable {
        header = header.child(Node::button("×").class("modal-close").name("close"));
    }
    Node::div().class("modal-overlay").child(
        content
            .child(header)
            .child(Node::div().class("modal-body").children(body)),
    )
}

fn action_buttons(record: &Record) -> Content {
    let Some(id) = record.key() else {
        return Content::Text(String::new());
    };
    Node::div()
        .class("table-actions")
        .child(Node::button("Edit").class("button").name("edit").data("id", id.as_str()))
        .child(
            Node::button("Delete")
                .class("button button-delete")
                .name("delete")
                .data("id", id),
        )
        .into()
}

impl Plugin for Editing {
    fn name(&self) -> &'static str {
        "editing"
    }

    fn attach(&mut self, schema: &mut Schema) -> Contribution {
        if !schema.contains(ACTIONS_COLUMN) {
            let actions = Column::new(ACTIONS_COLUMN, "Actions")
                .size("1fr")
                .renderer(|_, record, _, _| action_buttons(record));
            if let Err(e) = schema.push(actions) {
                log::warn!("could not add actions column: {}", e);
            }
        }
        Contribution::Before(self.view(schema))
    }

    fn view(&self, _schema: &Schema) -> Node {
        Node::div().class("table-controls").child(
            Node::button("Add New Record")
                .class("button button-add")
                .name("add"),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::FilterKind;
    use crate::model::IndexTable;
    use crate::model::Query;
    use crate::testing::MockSource;
    use crate::view::to_text;

    fn schema() -> Schema {
        let mut schema = Schema::from_columns([
            Column::new("date", "Date").edit(EditKind::Date).required(),
            Column::new("customer", "Customer").edit(EditKind::Select).options("customers"),
            Column::new("seller", "Seller").filter(FilterKind::Select).options("sellers").edit(EditKind::Select),
            Column::new("total", "Total").edit(EditKind::Number),
            Column::new("note", "Note").edit(EditKind::Select),
        ])
        .unwrap();
        Editing::new().attach(&mut schema);
        schema
    }

    fn indexes() -> Indexes {
        Indexes::new(
            IndexTable::from_iter([("1", "Seller 1"), ("2", "Seller 2")]),
            IndexTable::from_iter([("1", "Customer 1")]),
        )
    }

    fn editing() -> Editing {
        let mut editing = Editing::new();
        editing.update(&indexes());
        editing
    }

    fn record() -> Record {
        Record::new()
            .set("id", 1)
            .set("date", "2024-01-01")
            .set("seller", "Seller 2")
            .set("customer", "Customer 1")
            .set("total", 10)
    }

    #[test]
    fn test_attach_adds_actions_once() {
        let mut schema = schema();
        assert_eq!(schema.names().last(), Some(&ACTIONS_COLUMN));
        Editing::new().attach(&mut schema);
        assert_eq!(schema.names().iter().filter(|n| **n == ACTIONS_COLUMN).count(), 1);

        let buttons = schema.get(ACTIONS_COLUMN).unwrap().cell(&record());
        let node = buttons.as_node().unwrap();
        assert_eq!(to_text(node), "[Edit] [Delete]");
        assert!(node.find(&|n| n.get_data("id") == Some("1")).is_some());
    }

    #[test]
    fn test_form_fields() {
        let form = Form::for_schema(&schema(), Some(&indexes()), None);
        let names: Vec<_> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["date", "customer", "seller", "total", "note"]);

        let seller = &form.fields()[2];
        assert_eq!(seller.kind, EditKind::Select);
        assert_eq!(seller.options, vec!["Seller 1", "Seller 2"]);
        assert_eq!(form.fields()[4].kind, EditKind::Text);
    }

    #[test]
    fn test_form_values_coerce() {
        let mut form = Form::for_schema(&schema(), Some(&indexes()), Some(&record()));
        assert_eq!(form.get("seller"), Some("Seller 2"));

        form.set("total", "12.5");
        let values = form.values().unwrap();
        assert_eq!(values["date"], json!("2024-01-01"));
        assert_eq!(values["total"], json!(12.5));

        form.set("total", "");
        assert_eq!(form.values().unwrap()["total"], Value::Null);
        form.set("total", "7");
        assert_eq!(form.values().unwrap()["total"], json!(7));
    }

    #[test]
    fn test_form_values_report_every_error() {
        let mut form = Form::for_schema(&schema(), None, None);
        form.set("total", "abc");
        let errors = form.values().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldValidationError::required("date"),
                FieldValidationError::new("total", "must be a number"),
            ]
        );

        form.set("date", "01/02/2024");
        assert_eq!(form.values().unwrap_err()[0].message, "must be a date (YYYY-MM-DD)");
    }

    #[test]
    fn test_one_modal_at_a_time() {
        let mut editing = editing();
        editing.open_add(&schema());
        assert!(matches!(editing.modal(), Some(Modal::Add(_))));

        assert!(editing.open_delete(&record()));
        assert!(matches!(editing.modal(), Some(Modal::ConfirmDelete { id }) if id == "1"));

        assert!(!editing.open_edit(&schema(), &Record::new()));
        assert!(editing.escape());
        assert!(!editing.is_open());
        assert!(!editing.escape());
    }

    #[test]
    fn test_modal_view() {
        let mut editing = editing();
        assert!(editing.modal_view().is_none());

        editing.open_edit(&schema(), &record());
        let view = editing.modal_view().unwrap();
        assert!(view.has_class("modal-overlay"));
        let title = view.find(&|n| n.tag == "h2").unwrap();
        assert_eq!(title.text_content(), "Edit Record");
        let date = view.find_by_name("date").unwrap();
        assert_eq!(date.get_attr("type"), Some("date"));
        assert_eq!(date.get_attr("required"), Some("required"));

        editing.open_delete(&record());
        let confirm = editing.modal_view().unwrap();
        assert!(confirm.text_content().contains("cannot be undone"));
    }

    #[tokio::test]
    async fn test_submit_invalid_keeps_modal() {
        let source = MockSource::with_records(2);
        let mut data = DataLayer::from_arc(source.clone());
        let mut editing = editing();
        editing.open_add(&schema());

        assert_eq!(editing.submit(&mut data).await, SubmitOutcome::Invalid);
        assert!(editing.is_open());
        assert_eq!(editing.notice(), Some("Validation failed: date: is required"));
        assert_eq!(source.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_modal() {
        let source = MockSource::with_records(2);
        let mut data = DataLayer::from_arc(source.clone());
        let mut editing = editing();
        editing.open_delete(&record());

        source.fail_next("down");
        assert_eq!(editing.submit(&mut data).await, SubmitOutcome::Failed);
        assert!(editing.is_open());
        assert_eq!(editing.notice(), Some("Error deleting record. Please try again."));

        assert_eq!(editing.submit(&mut data).await, SubmitOutcome::Saved);
        assert!(!editing.is_open());
        assert!(editing.notice().is_none());
        assert_eq!(source.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_create_invalidates_memo() {
        let source = MockSource::with_records(2);
        let mut data = DataLayer::from_arc(source.clone());
        data.get_records(&Query::new(), false).await.unwrap();

        let mut editing = editing();
        editing.open_add(&schema());
        assert!(editing.set_field("date", "2024-02-02"));
        assert!(!editing.set_field("actions", "x"));

        assert_eq!(editing.submit(&mut data).await, SubmitOutcome::Saved);
        let page = data.get_records(&Query::new(), false).await.unwrap();
        assert!(page.cache.is_miss());
        assert_eq!(page.data().total, 3);
    }

    #[tokio::test]
    async fn test_submit_idle() {
        let source = MockSource::with_records(0);
        let mut data = DataLayer::from_arc(source);
        assert_eq!(Editing::new().submit(&mut data).await, SubmitOutcome::Idle);
    }
}

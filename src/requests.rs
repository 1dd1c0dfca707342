//! Request bodies. Absent optional fields are left out of the JSON body.

use crate::entities::CatalogItem;
use crate::error::{PyrusError, Result};
use crate::time::{Date, Time};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of `/auth`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_key: Option<String>,
}

/// Reference to a person by id or by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PersonRef {
    Id { id: i64 },
    Email { email: String },
}

impl From<i64> for PersonRef {
    fn from(id: i64) -> Self {
        PersonRef::Id { id }
    }
}

impl From<&str> for PersonRef {
    fn from(email: &str) -> Self {
        PersonRef::Email {
            email: email.to_string(),
        }
    }
}

impl From<String> for PersonRef {
    fn from(email: String) -> Self {
        PersonRef::Email { email }
    }
}

/// New value of a form field, addressed by id or by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: Value,
}

impl FieldUpdate {
    pub fn by_id(id: i64, value: impl Into<Value>) -> Self {
        FieldUpdate {
            id: Some(id),
            name: None,
            value: value.into(),
        }
    }

    pub fn by_name(name: impl Into<String>, value: impl Into<Value>) -> Self {
        FieldUpdate {
            id: None,
            name: Some(name.into()),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalChoice {
    Approved,
    Rejected,
    Revoked,
    Acknowledged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskAction {
    Finished,
    Reopened,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Email,
    Telegram,
    Web,
    Facebook,
    Vk,
    Viber,
    MobileApp,
    WebWidget,
    MoySklad,
    Zadarma,
    AmoCrm,
    Instagram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelRef {
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
}

/// Output format of the task registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
    Csv,
}

/// Comparison applied by a registry filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOperator {
    Equals(Value),
    GreaterThan(String),
    LessThan(String),
    Range(String, String),
    IsIn(Vec<String>),
}

/// Registry filter on a single form field
#[derive(Debug, Clone, PartialEq)]
pub struct FormRegisterFilter {
    pub field_id: i64,
    pub operator: FilterOperator,
}

impl FormRegisterFilter {
    pub fn equals(field_id: i64, value: impl Into<Value>) -> Self {
        Self::new(field_id, FilterOperator::Equals(value.into()))
    }

    pub fn greater_than(field_id: i64, value: impl ToString) -> Self {
        Self::new(field_id, FilterOperator::GreaterThan(value.to_string()))
    }

    pub fn less_than(field_id: i64, value: impl ToString) -> Self {
        Self::new(field_id, FilterOperator::LessThan(value.to_string()))
    }

    pub fn range(field_id: i64, from: impl ToString, to: impl ToString) -> Self {
        Self::new(
            field_id,
            FilterOperator::Range(from.to_string(), to.to_string()),
        )
    }

    pub fn is_in<I, S>(field_id: i64, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::new(
            field_id,
            FilterOperator::IsIn(values.into_iter().map(|v| v.to_string()).collect()),
        )
    }

    fn new(field_id: i64, operator: FilterOperator) -> Self {
        FormRegisterFilter { field_id, operator }
    }

    /// Query key, `fld{field_id}`
    pub fn key(&self) -> String {
        format!("fld{}", self.field_id)
    }

    /// Encoded filter value
    pub fn encode(&self) -> Value {
        match &self.operator {
            FilterOperator::Equals(value) => value.clone(),
            FilterOperator::GreaterThan(v) => Value::String(format!("gt{}", v)),
            FilterOperator::LessThan(v) => Value::String(format!("lt{}", v)),
            FilterOperator::Range(from, to) => Value::String(format!("gt{},lt{}", from, to)),
            FilterOperator::IsIn(values) => Value::String(values.join(",")),
        }
    }
}

/// Filters of `/forms/{id}/register`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormRegisterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_before: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_after: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_before: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_after: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<Time>,
    /// Only these fields are returned, in this order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ResponseFormat>,
    /// CSV only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    /// CSV only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_format: Option<bool>,
    /// CSV only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(flatten)]
    filters: BTreeMap<String, Value>,
}

impl FormRegisterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_steps(mut self, steps: Vec<i32>) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn with_include_archived(mut self, include_archived: bool) -> Self {
        self.include_archived = Some(include_archived);
        self
    }

    /// Add a field filter; a later filter on the same field replaces the earlier one
    pub fn with_filter(mut self, filter: FormRegisterFilter) -> Self {
        self.filters.insert(filter.key(), filter.encode());
        self
    }

    pub fn with_modified_before(mut self, time: impl Into<Time>) -> Self {
        self.modified_before = Some(time.into());
        self
    }

    pub fn with_modified_after(mut self, time: impl Into<Time>) -> Self {
        self.modified_after = Some(time.into());
        self
    }

    pub fn with_closed_before(mut self, time: impl Into<Time>) -> Self {
        self.closed_before = Some(time.into());
        self
    }

    pub fn with_closed_after(mut self, time: impl Into<Time>) -> Self {
        self.closed_after = Some(time.into());
        self
    }

    pub fn with_created_before(mut self, time: impl Into<Time>) -> Self {
        self.created_before = Some(time.into());
        self
    }

    pub fn with_created_after(mut self, time: impl Into<Time>) -> Self {
        self.created_after = Some(time.into());
        self
    }

    pub fn with_field_ids(mut self, field_ids: Vec<i64>) -> Self {
        self.field_ids = Some(field_ids);
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_simple_format(mut self, simple_format: bool) -> Self {
        self.simple_format = Some(simple_format);
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Encoded filters keyed by `fld{id}`
    pub fn filters(&self) -> &BTreeMap<String, Value> {
        &self.filters
    }

    /// Whether the registry should be returned as CSV text
    pub fn is_csv(&self) -> bool {
        self.format == Some(ResponseFormat::Csv)
    }
}

fn check_due(due: Option<&Time>, due_date: Option<&Date>, duration: Option<i32>) -> Result<()> {
    if due.is_some() && due_date.is_some() {
        return Err(PyrusError::invalid_argument(
            "either due_date or due can be set",
        ));
    }
    if duration.is_some() && due.is_none() {
        return Err(PyrusError::invalid_argument(
            "duration can only be used with due",
        ));
    }
    Ok(())
}

/// Body of `/tasks/{id}/comments`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskCommentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_choice: Option<ApprovalChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_steps: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<TaskAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reassign_to: Option<PersonRef>,
    /// Guids returned by the upload endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_updates: Option<Vec<FieldUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approvals_added: Option<Vec<Vec<PersonRef>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approvals_removed: Option<Vec<Vec<PersonRef>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approvals_rerequested: Option<Vec<Vec<PersonRef>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants_added: Option<Vec<PersonRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants_removed: Option<Vec<PersonRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribers_added: Option<Vec<PersonRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribers_removed: Option<Vec<PersonRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribers_rerequested: Option<Vec<PersonRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<Time>,
    /// Minutes, requires `due`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_datetime_utc: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_schedule: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_list_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_list_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_minutes: Option<i32>,
}

impl TaskCommentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_approval_choice(mut self, choice: ApprovalChoice) -> Self {
        self.approval_choice = Some(choice);
        self
    }

    pub fn with_approval_steps(mut self, steps: Vec<i32>) -> Self {
        self.approval_steps = Some(steps);
        self
    }

    pub fn with_action(mut self, action: TaskAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_reassign_to(mut self, person: impl Into<PersonRef>) -> Self {
        self.reassign_to = Some(person.into());
        self
    }

    pub fn with_attachments(mut self, guids: Vec<String>) -> Self {
        self.attachments = Some(guids);
        self
    }

    pub fn with_field_updates(mut self, updates: Vec<FieldUpdate>) -> Self {
        self.field_updates = Some(updates);
        self
    }

    pub fn with_approvals_added(mut self, steps: Vec<Vec<PersonRef>>) -> Self {
        self.approvals_added = Some(steps);
        self
    }

    pub fn with_approvals_removed(mut self, steps: Vec<Vec<PersonRef>>) -> Self {
        self.approvals_removed = Some(steps);
        self
    }

    pub fn with_approvals_rerequested(mut self, steps: Vec<Vec<PersonRef>>) -> Self {
        self.approvals_rerequested = Some(steps);
        self
    }

    pub fn with_participants_added(mut self, persons: Vec<PersonRef>) -> Self {
        self.participants_added = Some(persons);
        self
    }

    pub fn with_participants_removed(mut self, persons: Vec<PersonRef>) -> Self {
        self.participants_removed = Some(persons);
        self
    }

    pub fn with_subscribers_added(mut self, persons: Vec<PersonRef>) -> Self {
        self.subscribers_added = Some(persons);
        self
    }

    pub fn with_subscribers_removed(mut self, persons: Vec<PersonRef>) -> Self {
        self.subscribers_removed = Some(persons);
        self
    }

    pub fn with_subscribers_rerequested(mut self, persons: Vec<PersonRef>) -> Self {
        self.subscribers_rerequested = Some(persons);
        self
    }

    pub fn with_due_date(mut self, date: impl Into<Date>) -> Self {
        self.due_date = Some(date.into());
        self
    }

    pub fn with_due(mut self, due: impl Into<Time>, duration: Option<i32>) -> Self {
        self.due = Some(due.into());
        self.duration = duration;
        self
    }

    /// Schedule the task for a date; clears any other scheduling
    pub fn with_scheduled_date(mut self, date: impl Into<Date>) -> Self {
        self.scheduled_date = Some(date.into());
        self.scheduled_datetime_utc = None;
        self.cancel_schedule = None;
        self
    }

    /// Schedule the task for a moment; clears any other scheduling
    pub fn with_scheduled_datetime_utc(mut self, time: impl Into<Time>) -> Self {
        self.scheduled_datetime_utc = Some(time.into());
        self.scheduled_date = None;
        self.cancel_schedule = None;
        self
    }

    /// Cancel the schedule; clears any other scheduling
    pub fn with_cancel_schedule(mut self) -> Self {
        self.cancel_schedule = Some(true);
        self.scheduled_date = None;
        self.scheduled_datetime_utc = None;
        self
    }

    pub fn with_added_list_ids(mut self, ids: Vec<i64>) -> Self {
        self.added_list_ids = Some(ids);
        self
    }

    pub fn with_removed_list_ids(mut self, ids: Vec<i64>) -> Self {
        self.removed_list_ids = Some(ids);
        self
    }

    pub fn with_channel(mut self, channel_type: ChannelType) -> Self {
        self.channel = Some(ChannelRef { channel_type });
        self
    }

    pub fn with_spent_minutes(mut self, minutes: i32) -> Self {
        self.spent_minutes = Some(minutes);
        self
    }

    pub fn scheduled_date(&self) -> Option<Date> {
        self.scheduled_date
    }

    pub fn scheduled_datetime_utc(&self) -> Option<Time> {
        self.scheduled_datetime_utc
    }

    pub fn cancel_schedule(&self) -> bool {
        self.cancel_schedule == Some(true)
    }

    /// Check argument combinations the API rejects
    pub fn validate(&self) -> Result<()> {
        check_due(self.due.as_ref(), self.due_date.as_ref(), self.duration)?;
        if matches!(self.spent_minutes, Some(m) if m < 0) {
            return Err(PyrusError::invalid_argument(
                "spent_minutes must not be negative",
            ));
        }
        Ok(())
    }
}

/// Body of `/tasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_datetime_utc: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<PersonRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approvals: Option<Vec<Vec<PersonRef>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribers: Option<Vec<PersonRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<PersonRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_defaults: Option<bool>,
}

impl CreateTaskRequest {
    /// Simple task with a text
    pub fn simple(text: impl Into<String>) -> Self {
        CreateTaskRequest {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Task based on a form template
    pub fn from_form(form_id: i64, fields: Vec<FieldUpdate>) -> Self {
        CreateTaskRequest {
            form_id: Some(form_id),
            fields: Some(fields),
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_parent_task_id(mut self, parent_task_id: i64) -> Self {
        self.parent_task_id = Some(parent_task_id);
        self
    }

    pub fn with_due_date(mut self, date: impl Into<Date>) -> Self {
        self.due_date = Some(date.into());
        self
    }

    pub fn with_due(mut self, due: impl Into<Time>, duration: Option<i32>) -> Self {
        self.due = Some(due.into());
        self.duration = duration;
        self
    }

    pub fn with_scheduled_date(mut self, date: impl Into<Date>) -> Self {
        self.scheduled_date = Some(date.into());
        self.scheduled_datetime_utc = None;
        self
    }

    pub fn with_scheduled_datetime_utc(mut self, time: impl Into<Time>) -> Self {
        self.scheduled_datetime_utc = Some(time.into());
        self.scheduled_date = None;
        self
    }

    pub fn with_attachments(mut self, guids: Vec<String>) -> Self {
        self.attachments = Some(guids);
        self
    }

    pub fn with_responsible(mut self, person: impl Into<PersonRef>) -> Self {
        self.responsible = Some(person.into());
        self
    }

    pub fn with_approvals(mut self, steps: Vec<Vec<PersonRef>>) -> Self {
        self.approvals = Some(steps);
        self
    }

    pub fn with_subscribers(mut self, persons: Vec<PersonRef>) -> Self {
        self.subscribers = Some(persons);
        self
    }

    pub fn with_participants(mut self, persons: Vec<PersonRef>) -> Self {
        self.participants = Some(persons);
        self
    }

    pub fn with_list_ids(mut self, ids: Vec<i64>) -> Self {
        self.list_ids = Some(ids);
        self
    }

    pub fn with_fill_defaults(mut self, fill_defaults: bool) -> Self {
        self.fill_defaults = Some(fill_defaults);
        self
    }

    pub fn scheduled_date(&self) -> Option<Date> {
        self.scheduled_date
    }

    pub fn scheduled_datetime_utc(&self) -> Option<Time> {
        self.scheduled_datetime_utc
    }

    /// Check argument combinations the API rejects
    pub fn validate(&self) -> Result<()> {
        check_due(self.due.as_ref(), self.due_date.as_ref(), self.duration)
    }
}

/// Body of `PUT /catalogs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCatalogRequest {
    pub name: String,
    pub catalog_headers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CatalogItem>>,
}

impl CreateCatalogRequest {
    pub fn new<I, S>(name: impl Into<String>, catalog_headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CreateCatalogRequest {
            name: name.into(),
            catalog_headers: catalog_headers.into_iter().map(Into::into).collect(),
            items: None,
        }
    }

    pub fn with_items(mut self, items: Vec<CatalogItem>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PyrusError::invalid_argument("catalog name must not be empty"));
        }
        check_item_widths(&self.catalog_headers, self.items.as_deref())
    }
}

/// Body of `POST /catalogs/{id}`.
///
/// Every item and text column that should remain must be listed; the rest
/// are deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncCatalogRequest {
    /// Apply the changes instead of only reporting them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_headers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CatalogItem>>,
}

impl SyncCatalogRequest {
    pub fn new<I, S>(catalog_headers: I, items: Vec<CatalogItem>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SyncCatalogRequest {
            apply: None,
            catalog_headers: Some(catalog_headers.into_iter().map(Into::into).collect()),
            items: Some(items),
        }
    }

    pub fn with_apply(mut self, apply: bool) -> Self {
        self.apply = Some(apply);
        self
    }

    pub fn validate(&self) -> Result<()> {
        match &self.catalog_headers {
            Some(headers) => check_item_widths(headers, self.items.as_deref()),
            None => Ok(()),
        }
    }
}

fn check_item_widths(headers: &[String], items: Option<&[CatalogItem]>) -> Result<()> {
    let Some(items) = items else {
        return Ok(());
    };
    match items.iter().find(|item| item.width() != headers.len()) {
        Some(item) => Err(PyrusError::invalid_argument(format!(
            "catalog item {:?} has {} values, expected {}",
            item.values.as_deref().unwrap_or_default(),
            item.width(),
            headers.len()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_register_filters_encoding() {
        let request = FormRegisterRequest::new()
            .with_filter(FormRegisterFilter::equals(1, "abc"))
            .with_filter(FormRegisterFilter::greater_than(2, 10))
            .with_filter(FormRegisterFilter::less_than(3, 5.5))
            .with_filter(FormRegisterFilter::range(4, 1, 9))
            .with_filter(FormRegisterFilter::is_in(5, [7, 8, 9]))
            .with_include_archived(true);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "include_archived": true,
                "fld1": "abc",
                "fld2": "gt10",
                "fld3": "lt5.5",
                "fld4": "gt1,lt9",
                "fld5": "7,8,9"
            })
        );
    }

    #[test]
    fn test_register_csv_format() {
        let request = FormRegisterRequest::new()
            .with_format(ResponseFormat::Csv)
            .with_delimiter(";")
            .with_modified_after(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        assert!(request.is_csv());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["format"], "csv");
        assert_eq!(json["delimiter"], ";");
        assert_eq!(json["modified_after"], "2024-03-01T00:00:00Z");
        assert!(!FormRegisterRequest::new().is_csv());
    }

    #[test]
    fn test_comment_request_serialization() {
        let request = TaskCommentRequest::new()
            .with_text("Looks good")
            .with_approval_choice(ApprovalChoice::Approved)
            .with_reassign_to("boss@example.com")
            .with_approvals_added(vec![vec![PersonRef::from(3i64), PersonRef::from("x@y.z")]])
            .with_field_updates(vec![FieldUpdate::by_id(4, 12), FieldUpdate::by_name("Sum", "9")])
            .with_channel(ChannelType::MobileApp);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "text": "Looks good",
                "approval_choice": "approved",
                "reassign_to": {"email": "boss@example.com"},
                "field_updates": [{"id": 4, "value": 12}, {"name": "Sum", "value": "9"}],
                "approvals_added": [[{"id": 3}, {"email": "x@y.z"}]],
                "channel": {"type": "mobile_app"}
            })
        );
    }

    #[test]
    fn test_comment_schedule_options_are_exclusive() {
        let request = TaskCommentRequest::new()
            .with_scheduled_date(Date::from_ymd(2024, 5, 1).unwrap())
            .with_cancel_schedule();
        assert!(request.cancel_schedule());
        assert!(request.scheduled_date().is_none());

        let request = request
            .with_scheduled_datetime_utc(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        assert!(!request.cancel_schedule());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, json!({"scheduled_datetime_utc": "2024-05-01T09:00:00Z"}));
    }

    #[test]
    fn test_due_validation() {
        let due = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let date = Date::from_ymd(2024, 5, 1).unwrap();

        let both = TaskCommentRequest::new().with_due(due, None).with_due_date(date);
        assert!(matches!(both.validate(), Err(PyrusError::InvalidArgument(_))));

        let mut orphan = CreateTaskRequest::simple("x");
        orphan.duration = Some(30);
        assert!(orphan.validate().is_err());

        let ok = CreateTaskRequest::simple("x").with_due(due, Some(30));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_create_task_serialization() {
        let request = CreateTaskRequest::from_form(321, vec![FieldUpdate::by_id(1, "Paper")])
            .with_responsible(15i64)
            .with_due_date(Date::from_ymd(2024, 6, 30).unwrap())
            .with_list_ids(vec![9]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "form_id": 321,
                "fields": [{"id": 1, "value": "Paper"}],
                "responsible": {"id": 15},
                "due_date": "2024-06-30",
                "list_ids": [9]
            })
        );
    }

    #[test]
    fn test_catalog_requests() {
        let request = CreateCatalogRequest::new("Cities", ["City", "Country"])
            .with_items(vec![CatalogItem::from_values(["Oslo", "NO"])]);
        assert!(request.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "Cities",
                "catalog_headers": ["City", "Country"],
                "items": [{"values": ["Oslo", "NO"]}]
            })
        );

        let sync = SyncCatalogRequest::new(["City"], vec![CatalogItem::from_values(["Oslo", "NO"])]);
        assert!(matches!(sync.validate(), Err(PyrusError::InvalidArgument(_))));
        assert!(CreateCatalogRequest::new(" ", ["City"]).validate().is_err());
    }
}

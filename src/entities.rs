//! Value objects decoded from API payloads.
//!
//! Every optional key is probed for presence: a missing key becomes `None`,
//! so list-valued fields distinguish "omitted" (`None`) from "present but
//! empty" (`Some(vec![])`).

use crate::time::{Date, Time};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A user, bot or role participating in tasks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// "user", "bot" or "role"
    #[serde(rename = "type")]
    pub person_type: Option<String>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub banned: Option<bool>,
    pub position: Option<String>,
    pub skype: Option<String>,
    pub phone: Option<String>,
    pub avatar_id: Option<i64>,
    pub status: Option<String>,
}

impl Person {
    /// "First Last", skipping missing parts
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Role {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub member_ids: Option<Vec<i64>>,
    pub banned: Option<bool>,
}

/// Contacts of a single organization
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Organization {
    pub organization_id: Option<i64>,
    pub name: Option<String>,
    pub persons: Option<Vec<Person>>,
    pub roles: Option<Vec<Role>>,
    pub department_catalog_id: Option<i64>,
}

/// Attachment metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct File {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub size: Option<i64>,
    pub md5: Option<String>,
    pub url: Option<String>,
    pub version: Option<i32>,
    pub root_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Approval {
    pub person: Option<Person>,
    /// "approved", "rejected", "acknowledged" or "waiting"
    pub approval_choice: Option<String>,
    pub step: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscriber {
    pub person: Option<Person>,
    pub approval_choice: Option<String>,
}

/// Communication channel a comment arrived through
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Channel {
    #[serde(rename = "type")]
    pub channel_type: Option<String>,
    pub to: Option<Value>,
}

/// A choice of a multiple-choice field
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChoiceOption {
    pub choice_id: Option<i64>,
    pub choice_value: Option<String>,
    pub deleted: Option<bool>,
}

/// Field settings other than nested children
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormFieldInfo {
    pub required_step: Option<i32>,
    pub immutable_step: Option<i32>,
    pub options: Option<Vec<ChoiceOption>>,
    pub catalog_id: Option<i64>,
    pub decimal_places: Option<i32>,
    pub code: Option<String>,
}

/// Shape of a form field within the field tree
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Table whose columns are themselves fields
    Table { columns: Vec<FormField> },
    /// Titled group of nested fields
    Title { fields: Vec<FormField> },
    Leaf,
}

/// A node of a form's field tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawFormField")]
pub struct FormField {
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Wire type such as "text", "table" or "title"
    pub field_type: Option<String>,
    /// Empty when the key is absent
    pub tooltip: String,
    pub info: Option<FormFieldInfo>,
    /// Field value as sent by the server, shape depends on the field type
    pub value: Option<Value>,
    pub parent_id: Option<i64>,
    pub row_id: Option<i64>,
    pub kind: FieldKind,
}

#[derive(Deserialize)]
struct RawFormField {
    id: Option<i64>,
    name: Option<String>,
    #[serde(rename = "type")]
    field_type: Option<String>,
    tooltip: Option<String>,
    info: Option<RawFieldInfo>,
    value: Option<Value>,
    parent_id: Option<i64>,
    row_id: Option<i64>,
}

#[derive(Deserialize)]
struct RawFieldInfo {
    #[serde(flatten)]
    settings: FormFieldInfo,
    columns: Option<Vec<FormField>>,
    fields: Option<Vec<FormField>>,
}

impl From<RawFormField> for FormField {
    fn from(raw: RawFormField) -> Self {
        let (info, columns, fields) = match raw.info {
            Some(info) => (Some(info.settings), info.columns, info.fields),
            None => (None, None, None),
        };

        let kind = match raw.field_type.as_deref() {
            Some("table") => FieldKind::Table {
                columns: columns.unwrap_or_default(),
            },
            Some("title") => FieldKind::Title {
                fields: fields.unwrap_or_default(),
            },
            _ => FieldKind::Leaf,
        };

        FormField {
            id: raw.id,
            name: raw.name,
            field_type: raw.field_type,
            tooltip: raw.tooltip.unwrap_or_default(),
            info,
            value: raw.value,
            parent_id: raw.parent_id,
            row_id: raw.row_id,
            kind,
        }
    }
}

/// A row of a table field value
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableRow {
    pub row_id: Option<i64>,
    pub cells: Option<Vec<FormField>>,
    pub delete: Option<bool>,
}

impl FormField {
    /// Direct children: table columns or title group members
    pub fn children(&self) -> &[FormField] {
        match &self.kind {
            FieldKind::Table { columns } => columns,
            FieldKind::Title { fields } => fields,
            FieldKind::Leaf => &[],
        }
    }

    /// Depth-first search of this field and its descendants
    pub fn find(&self, id: i64) -> Option<&FormField> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Rows of a table field value, if the value has that shape
    pub fn table_rows(&self) -> Option<Vec<TableRow>> {
        match (&self.kind, &self.value) {
            (FieldKind::Table { .. }, Some(value)) => Vec::<TableRow>::deserialize(value).ok(),
            _ => None,
        }
    }
}

/// Task template definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Form {
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Step number to step name, ordered by step number
    pub steps: Option<BTreeMap<u32, String>>,
    pub fields: Option<Vec<FormField>>,
    pub default_person_id: Option<i64>,
    pub deleted_or_closed: Option<bool>,
    pub folder: Option<Vec<String>>,
    pub access_levels: Option<Value>,
}

impl Form {
    /// Find a field anywhere in the field tree
    pub fn find_field(&self, id: i64) -> Option<&FormField> {
        self.fields
            .as_deref()?
            .iter()
            .find_map(|field| field.find(id))
    }
}

/// A single work item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub text: Option<String>,
    pub subject: Option<String>,
    pub create_date: Option<Time>,
    pub last_modified_date: Option<Time>,
    pub close_date: Option<Time>,
    pub author: Option<Person>,
    pub responsible: Option<Person>,
    pub due_date: Option<Date>,
    pub due: Option<Time>,
    pub duration: Option<i32>,
    pub scheduled_date: Option<Date>,
    pub scheduled_datetime_utc: Option<Time>,
    pub form_id: Option<i64>,
    pub attachments: Option<Vec<File>>,
    pub fields: Option<Vec<FormField>>,
    pub approvals: Option<Vec<Vec<Approval>>>,
    pub subscribers: Option<Vec<Subscriber>>,
    pub participants: Option<Vec<Person>>,
    pub parent_task_id: Option<i64>,
    pub linked_task_ids: Option<Vec<i64>>,
    pub list_ids: Option<Vec<i64>>,
    pub current_step: Option<i32>,
    pub is_closed: Option<bool>,
}

/// Comment on a task
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskComment {
    pub id: Option<i64>,
    pub text: Option<String>,
    pub subject: Option<String>,
    pub create_date: Option<Time>,
    pub author: Option<Person>,
    pub reassigned_to: Option<Person>,
    pub field_updates: Option<Vec<FormField>>,
    pub approval_choice: Option<String>,
    pub approval_step: Option<i32>,
    pub action: Option<String>,
    pub attachments: Option<Vec<File>>,
    pub added_list_ids: Option<Vec<i64>>,
    pub removed_list_ids: Option<Vec<i64>>,
    pub approvals_added: Option<Vec<Vec<Approval>>>,
    pub subscribers_added: Option<Vec<Person>>,
    pub participants_added: Option<Vec<Person>>,
    pub due_date: Option<Date>,
    pub due: Option<Time>,
    pub duration: Option<i32>,
    pub channel: Option<Channel>,
    pub spent_minutes: Option<i32>,
}

/// Task with its comment history, oldest first
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskWithComments {
    #[serde(flatten)]
    pub task: Task,
    pub comments: Option<Vec<TaskComment>>,
}

/// Short task description returned by list endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskHeader {
    pub id: Option<i64>,
    pub text: Option<String>,
    pub create_date: Option<Time>,
    pub last_modified_date: Option<Time>,
    pub close_date: Option<Time>,
    pub author: Option<Person>,
    pub responsible: Option<Person>,
    pub due_date: Option<Date>,
    pub due: Option<Time>,
    pub duration: Option<i32>,
}

/// Task list, possibly with nested lists
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskList {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub children: Option<Vec<TaskList>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub header_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl CatalogItem {
    /// New item for create/sync requests
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CatalogItem {
            item_id: None,
            values: Some(values.into_iter().map(Into::into).collect()),
            deleted: None,
        }
    }

    /// Number of values, zero when the key was absent
    pub fn width(&self) -> usize {
        self.values.as_ref().map_or(0, Vec::len)
    }
}

/// Managed reference list with versioned items
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catalog {
    pub catalog_id: Option<i64>,
    pub name: Option<String>,
    pub version: Option<i64>,
    pub deleted: Option<bool>,
    pub catalog_headers: Option<Vec<CatalogHeader>>,
    pub items: Option<Vec<CatalogItem>>,
}

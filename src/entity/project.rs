// src/entity/project.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize, Note, NoteTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort weight used by the "Highest Priority" ordering.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "high" => Ok(Priority::High),
            "medium" | "med" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// Work-progress marker. Independent of [`Status`]; only the deliver action
/// moves both together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Stage {
    #[default]
    #[serde(rename = "First Stage")]
    First,
    #[serde(rename = "Middle Stage")]
    Middle,
    #[serde(rename = "Final Stage")]
    Final,
    Delivered,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::First => write!(f, "First Stage"),
            Stage::Middle => write!(f, "Middle Stage"),
            Stage::Final => write!(f, "Final Stage"),
            Stage::Delivered => write!(f, "Delivered"),
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "first stage" | "first" => Ok(Stage::First),
            "middle stage" | "middle" => Ok(Stage::Middle),
            "final stage" | "final" => Ok(Stage::Final),
            "delivered" => Ok(Stage::Delivered),
            _ => Err(format!("Invalid stage: {}", s)),
        }
    }
}

/// Lifecycle state. Decides which dashboard tab a project shows up under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    Active,
    Revision,
    Delivered,
}

impl Status {
    /// Group order in the project list.
    pub const ORDER: [Status; 3] = [Status::Active, Status::Revision, Status::Delivered];
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Active => write!(f, "Active"),
            Status::Revision => write!(f, "Revision"),
            Status::Delivered => write!(f, "Delivered"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "active" => Ok(Status::Active),
            "revision" => Ok(Status::Revision),
            "delivered" => Ok(Status::Delivered),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub priority: Priority,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub last_updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_link: Option<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Project {
    /// Build a project from creation input, stamped at `now`.
    pub fn new(data: NewProject, now: DateTime<Utc>) -> Self {
        let delivered_at = (data.status == Status::Delivered).then_some(now);
        Self {
            id: Uuid::new_v4(),
            title: data.title,
            client_name: data.client_name,
            description: data.description,
            price: data.price,
            priority: data.priority,
            start_date: data.start_date,
            end_date: data.end_date,
            stage: data.stage,
            status: data.status,
            created_at: now,
            delivered_at,
            last_updated_at: now,
            website_link: data.website_link,
            notes: Vec::new(),
        }
    }

    /// Short id for display, like a git abbreviated hash.
    pub fn short_id(&self) -> String {
        self.id.to_string()[..7].to_string()
    }

    pub fn is_delivered(&self) -> bool {
        self.status == Status::Delivered
    }

    /// Number of notes carrying `tag`.
    pub fn note_count(&self, tag: NoteTag) -> usize {
        self.notes.iter().filter(|n| n.has_tag(tag)).count()
    }
}

/// Creation input, as handed over by the form. Fields are trusted.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub client_name: String,
    pub description: Option<String>,
    pub price: f64,
    pub priority: Priority,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub stage: Stage,
    pub status: Status,
    pub website_link: Option<String>,
}

impl NewProject {
    /// Input with the form's defaults: Medium priority, First Stage, Active.
    pub fn new(
        title: impl Into<String>,
        client_name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            client_name: client_name.into(),
            description: None,
            price: 0.0,
            priority: Priority::default(),
            start_date,
            end_date,
            stage: Stage::default(),
            status: Status::default(),
            website_link: None,
        }
    }
}

/// Partial update payload. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub description: Option<Option<String>>, // Some(None) to clear, Some(Some(s)) to set
    pub price: Option<f64>,
    pub priority: Option<Priority>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub stage: Option<Stage>,
    pub status: Option<Status>,
    pub website_link: Option<Option<String>>, // Some(None) to clear, Some(Some(s)) to set
    pub notes: Option<Vec<Note>>,
}

impl ProjectUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

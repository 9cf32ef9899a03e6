//! Filter, sort and group pipeline behind the project list.
//!
//! The pipeline is a pure function of the collection, the view parameters and
//! the current instant. Calendar questions (which month was something
//! delivered in, is a deadline past) are answered in the time zone of `now`.

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::dates::remaining_days;
use crate::entity::{normalize, Priority, Project, Stage, Status};

/// Top-level dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Running,
    Delivered,
    Revision,
}

impl Tab {
    /// Label of the tab's value total.
    pub fn total_label(self) -> &'static str {
        match self {
            Tab::Running => "Total Running Value",
            Tab::Delivered => "Total Delivered Value",
            Tab::Revision => "Total Value",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tab::Running => write!(f, "running"),
            Tab::Delivered => write!(f, "delivered"),
            Tab::Revision => write!(f, "revision"),
        }
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "running" => Ok(Tab::Running),
            "delivered" => Ok(Tab::Delivered),
            "revision" => Ok(Tab::Revision),
            _ => Err(format!("Invalid tab: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortBy {
    #[default]
    #[serde(rename = "Nearest Deadline")]
    NearestDeadline,
    #[serde(rename = "Highest Priority")]
    HighestPriority,
    #[serde(rename = "Recently Updated")]
    RecentlyUpdated,
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortBy::NearestDeadline => write!(f, "Nearest Deadline"),
            SortBy::HighestPriority => write!(f, "Highest Priority"),
            SortBy::RecentlyUpdated => write!(f, "Recently Updated"),
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "nearest deadline" | "deadline" => Ok(SortBy::NearestDeadline),
            "highest priority" | "priority" => Ok(SortBy::HighestPriority),
            "recently updated" | "updated" | "recent" => Ok(SortBy::RecentlyUpdated),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// Everything the list view is parameterized by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewParams {
    pub tab: Tab,
    /// `None` means all stages.
    pub stage: Option<Stage>,
    /// `None` means all priorities.
    pub priority: Option<Priority>,
    pub sort_by: SortBy,
    pub only_overdue: bool,
    /// Zero-based delivery month (0 = January); `None` means all months.
    pub month: Option<u32>,
    pub year: i32,
}

impl ViewParams {
    /// Default view: running tab, no filters, nearest deadline first, and the
    /// delivered period set to the month and year of `now`.
    pub fn current<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            tab: Tab::default(),
            stage: None,
            priority: None,
            sort_by: SortBy::default(),
            only_overdue: false,
            month: Some(now.month0()),
            year: now.year(),
        }
    }
}

/// Parse a filter value where "All" means no filter.
pub fn parse_filter<T>(s: &str) -> Result<Option<T>, String>
where
    T: std::str::FromStr<Err = String>,
{
    if normalize(s) == "all" {
        return Ok(None);
    }
    s.parse().map(Some)
}

/// Parse a delivery month: "All", a zero-based index "0".."11", or a month
/// name such as "jan" or "January".
pub fn parse_month(s: &str) -> Result<Option<u32>, String> {
    let trimmed = s.trim();
    if normalize(trimmed) == "all" {
        return Ok(None);
    }
    if let Ok(index) = trimmed.parse::<u32>() {
        return if index < 12 {
            Ok(Some(index))
        } else {
            Err(format!("Invalid month: {} (expected 0-11)", s))
        };
    }
    trimmed
        .parse::<chrono::Month>()
        .map(|m| Some(m.number_from_month() - 1))
        .map_err(|_| format!("Invalid month: {}", s))
}

/// One status bucket of the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusGroup<'a> {
    pub status: Status,
    pub projects: Vec<&'a Project>,
}

/// The ordered, grouped project list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectView<'a> {
    pub groups: Vec<StatusGroup<'a>>,
}

impl<'a> ProjectView<'a> {
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.projects.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All projects in display order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Project> + '_ {
        self.groups.iter().flat_map(|g| g.projects.iter().copied())
    }
}

/// Counters and the value total shown next to the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub running: usize,
    pub delivered: usize,
    pub revision: usize,
    /// Sum of prices on the active tab, before stage/priority/overdue filters.
    pub tab_total: f64,
    pub tab_total_label: &'static str,
}

fn delivered_in_period<Tz: TimeZone>(project: &Project, params: &ViewParams, tz: &Tz) -> bool {
    if project.status != Status::Delivered {
        return false;
    }
    let Some(delivered_at) = project.delivered_at else {
        return false;
    };
    let local = delivered_at.with_timezone(tz);
    let month_match = params.month.map_or(true, |m| local.month0() == m);
    month_match && local.year() == params.year
}

fn in_tab<Tz: TimeZone>(project: &Project, params: &ViewParams, tz: &Tz) -> bool {
    match params.tab {
        Tab::Running => matches!(project.status, Status::Active | Status::Revision),
        Tab::Delivered => delivered_in_period(project, params, tz),
        Tab::Revision => project.status == Status::Revision,
    }
}

/// Run the list pipeline: tab, stage, priority and overdue filters, then the
/// chosen sort, then grouping into Active, Revision, Delivered buckets with
/// empty buckets left out.
pub fn query<'a, Tz: TimeZone>(
    projects: &'a [Project],
    params: &ViewParams,
    now: &DateTime<Tz>,
) -> ProjectView<'a> {
    let tz = now.timezone();

    let mut filtered: Vec<&Project> = projects
        .iter()
        .filter(|p| in_tab(p, params, &tz))
        .filter(|p| params.stage.map_or(true, |s| p.stage == s))
        .filter(|p| params.priority.map_or(true, |pr| p.priority == pr))
        .filter(|p| {
            !params.only_overdue
                || (p.status != Status::Delivered && remaining_days(p.end_date, now) < 0)
        })
        .collect();

    match params.sort_by {
        SortBy::NearestDeadline => filtered.sort_by(|a, b| a.end_date.cmp(&b.end_date)),
        SortBy::HighestPriority => {
            filtered.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight()))
        }
        SortBy::RecentlyUpdated => {
            filtered.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at))
        }
    }

    let groups = Status::ORDER
        .iter()
        .filter_map(|&status| {
            let members: Vec<&Project> = filtered
                .iter()
                .copied()
                .filter(|p| p.status == status)
                .collect();
            (!members.is_empty()).then_some(StatusGroup {
                status,
                projects: members,
            })
        })
        .collect();

    ProjectView { groups }
}

/// Counts for the three tabs and the value total of the active tab.
///
/// The total only applies the tab-level filter; stage, priority and overdue
/// narrowing do not change it.
pub fn stats<Tz: TimeZone>(projects: &[Project], params: &ViewParams, tz: &Tz) -> DashboardStats {
    let running = projects
        .iter()
        .filter(|p| matches!(p.status, Status::Active | Status::Revision))
        .count();
    let delivered = projects
        .iter()
        .filter(|p| delivered_in_period(p, params, tz))
        .count();
    let revision = projects
        .iter()
        .filter(|p| p.status == Status::Revision)
        .count();
    let tab_total = projects
        .iter()
        .filter(|p| in_tab(p, params, tz))
        .map(|p| p.price)
        .sum();

    DashboardStats {
        running,
        delivered,
        revision,
        tab_total,
        tab_total_label: params.tab.total_label(),
    }
}

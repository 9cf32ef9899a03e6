//! The project store: sole writer of the project collection.
//!
//! Every mutation goes through here so the lifecycle rules hold uniformly, and
//! every operation writes the whole collection back through the
//! [`KeyValueStore`] before returning.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entity::{NewProject, Note, NoteTag, Project, ProjectUpdate, Stage, Status};
use crate::error::{DpccError, Result};
use crate::storage::{load_projects, save_projects, KeyValueStore};

pub struct ProjectStore<K: KeyValueStore, C: Clock = SystemClock> {
    kv: K,
    key: String,
    clock: C,
    projects: Vec<Project>,
}

impl<K: KeyValueStore> ProjectStore<K> {
    /// Load the collection stored under `key`, using the system clock.
    pub fn open(kv: K, key: impl Into<String>) -> Self {
        Self::with_clock(kv, key, SystemClock)
    }
}

impl<K: KeyValueStore, C: Clock> ProjectStore<K, C> {
    pub fn with_clock(kv: K, key: impl Into<String>, clock: C) -> Self {
        let key = key.into();
        let projects = load_projects(&kv, &key);
        Self {
            kv,
            key,
            clock,
            projects,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == *id)
    }

    /// Resolve a full UUID or an unambiguous prefix of one.
    pub fn resolve(&self, id: &str) -> Result<&Project> {
        let needle = id.trim().to_lowercase();
        if needle.is_empty() {
            return Err(DpccError::ProjectNotFound(id.to_string()));
        }

        let mut matches = self
            .projects
            .iter()
            .filter(|p| p.id.to_string().starts_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(project), None) => Ok(project),
            (Some(_), Some(_)) => Err(DpccError::AmbiguousId(id.to_string())),
            (None, _) => Err(DpccError::ProjectNotFound(id.to_string())),
        }
    }

    /// Create a project and append it to the collection.
    pub fn create(&mut self, data: NewProject) -> Result<Project> {
        let project = Project::new(data, self.clock.now());
        tracing::debug!(id = %project.id, title = %project.title, "created project");
        self.projects.push(project.clone());
        self.persist()?;
        Ok(project)
    }

    /// Merge `updates` onto the project with `id`.
    ///
    /// An unknown id is a no-op and returns `Ok(None)`. `lastUpdatedAt` moves
    /// even when `updates` is empty. A status change into Delivered stamps
    /// `deliveredAt`; a change to any other status clears it.
    pub fn update(&mut self, id: &Uuid, updates: ProjectUpdate) -> Result<Option<Project>> {
        let now = self.clock.now();
        let updated = self
            .projects
            .iter_mut()
            .find(|p| p.id == *id)
            .map(|project| {
                apply_update(project, updates, now);
                project.clone()
            });

        match &updated {
            Some(project) => tracing::debug!(id = %project.id, status = %project.status, "updated project"),
            None => tracing::debug!(%id, "update for unknown project ignored"),
        }

        self.persist()?;
        Ok(updated)
    }

    /// Record that work happened without changing any field.
    pub fn touch(&mut self, id: &Uuid) -> Result<Option<Project>> {
        self.update(id, ProjectUpdate::default())
    }

    /// Mark a project delivered, moving status and stage together.
    pub fn deliver(&mut self, id: &Uuid) -> Result<Option<Project>> {
        self.update(
            id,
            ProjectUpdate {
                status: Some(Status::Delivered),
                stage: Some(Stage::Delivered),
                ..ProjectUpdate::default()
            },
        )
    }

    /// Send a delivered project back for revision.
    pub fn reopen(&mut self, id: &Uuid) -> Result<Option<Project>> {
        self.update(id, ProjectUpdate::status(Status::Revision))
    }

    /// Append a note. Blank content is ignored and returns `Ok(None)`.
    pub fn add_note(
        &mut self,
        id: &Uuid,
        content: &str,
        tags: impl IntoIterator<Item = NoteTag>,
    ) -> Result<Option<Project>> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        let Some(project) = self.get(id) else {
            return self.update(id, ProjectUpdate::default());
        };

        let mut notes = project.notes.clone();
        notes.push(Note::new(content.to_string(), tags, self.clock.now()));

        self.update(
            id,
            ProjectUpdate {
                notes: Some(notes),
                ..ProjectUpdate::default()
            },
        )
    }

    /// Remove the project with `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: &Uuid) -> Result<bool> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != *id);
        let removed = self.projects.len() != before;
        if removed {
            tracing::debug!(%id, "deleted project");
        }
        self.persist()?;
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        save_projects(&self.kv, &self.key, &self.projects)
    }
}

fn apply_update(project: &mut Project, updates: ProjectUpdate, now: DateTime<Utc>) {
    let previous_status = project.status;

    if let Some(title) = updates.title {
        project.title = title;
    }
    if let Some(client_name) = updates.client_name {
        project.client_name = client_name;
    }
    if let Some(description) = updates.description {
        project.description = description;
    }
    if let Some(price) = updates.price {
        project.price = price;
    }
    if let Some(priority) = updates.priority {
        project.priority = priority;
    }
    if let Some(start_date) = updates.start_date {
        project.start_date = start_date;
    }
    if let Some(end_date) = updates.end_date {
        project.end_date = end_date;
    }
    if let Some(stage) = updates.stage {
        project.stage = stage;
    }
    if let Some(website_link) = updates.website_link {
        project.website_link = website_link;
    }
    if let Some(notes) = updates.notes {
        project.notes = notes;
    }

    match updates.status {
        Some(Status::Delivered) if previous_status != Status::Delivered => {
            project.delivered_at = Some(now);
        }
        Some(Status::Active | Status::Revision) => {
            project.delivered_at = None;
        }
        _ => {}
    }
    if let Some(status) = updates.status {
        project.status = status;
    }

    // Never move backwards, even if the wall clock does.
    project.last_updated_at = now.max(project.last_updated_at);
}

mod note;
mod project;

pub use note::{Note, NoteTag};
pub use project::{NewProject, Priority, Project, ProjectUpdate, Stage, Status};

/// Normalize user input for enum parsing: "first-stage", "First_Stage" and
/// "first stage" all compare equal.
pub(crate) fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

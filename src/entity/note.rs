// src/entity/note.rs
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::normalize;

/// Category a note is filed under in the notes drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoteTag {
    Clarification,
    #[serde(rename = "Update Message")]
    UpdateMessage,
    #[serde(rename = "Follow Up")]
    FollowUp,
    Delivery,
    #[serde(rename = "Meeting Summary")]
    MeetingSummary,
    #[serde(rename = "Fixing Update")]
    FixingUpdate,
    #[serde(rename = "Extend Message")]
    ExtendMessage,
    #[serde(rename = "Ask For Additional Charge")]
    AskForAdditionalCharge,
    #[serde(rename = "Hyper Client Convenience")]
    HyperClientConvenience,
}

impl NoteTag {
    /// All tags in drawer order.
    pub const ALL: [NoteTag; 9] = [
        NoteTag::Clarification,
        NoteTag::UpdateMessage,
        NoteTag::FollowUp,
        NoteTag::Delivery,
        NoteTag::MeetingSummary,
        NoteTag::FixingUpdate,
        NoteTag::ExtendMessage,
        NoteTag::AskForAdditionalCharge,
        NoteTag::HyperClientConvenience,
    ];
}

impl std::fmt::Display for NoteTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteTag::Clarification => write!(f, "Clarification"),
            NoteTag::UpdateMessage => write!(f, "Update Message"),
            NoteTag::FollowUp => write!(f, "Follow Up"),
            NoteTag::Delivery => write!(f, "Delivery"),
            NoteTag::MeetingSummary => write!(f, "Meeting Summary"),
            NoteTag::FixingUpdate => write!(f, "Fixing Update"),
            NoteTag::ExtendMessage => write!(f, "Extend Message"),
            NoteTag::AskForAdditionalCharge => write!(f, "Ask For Additional Charge"),
            NoteTag::HyperClientConvenience => write!(f, "Hyper Client Convenience"),
        }
    }
}

impl std::str::FromStr for NoteTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "clarification" => Ok(NoteTag::Clarification),
            "update message" | "update" => Ok(NoteTag::UpdateMessage),
            "follow up" | "followup" => Ok(NoteTag::FollowUp),
            "delivery" => Ok(NoteTag::Delivery),
            "meeting summary" | "meeting" => Ok(NoteTag::MeetingSummary),
            "fixing update" | "fix" => Ok(NoteTag::FixingUpdate),
            "extend message" | "extend" => Ok(NoteTag::ExtendMessage),
            "ask for additional charge" | "additional charge" => {
                Ok(NoteTag::AskForAdditionalCharge)
            }
            "hyper client convenience" | "hyper client" => Ok(NoteTag::HyperClientConvenience),
            _ => Err(format!("Invalid note tag: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tags: BTreeSet<NoteTag>,
}

impl Note {
    pub fn new(content: String, tags: impl IntoIterator<Item = NoteTag>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            timestamp,
            tags: tags.into_iter().collect(),
        }
    }

    pub fn has_tag(&self, tag: NoteTag) -> bool {
        self.tags.contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_tag_parse_accepts_display_and_short_forms() {
        assert_eq!("Follow Up".parse::<NoteTag>().unwrap(), NoteTag::FollowUp);
        assert_eq!("follow-up".parse::<NoteTag>().unwrap(), NoteTag::FollowUp);
        assert_eq!(
            "ask_for_additional_charge".parse::<NoteTag>().unwrap(),
            NoteTag::AskForAdditionalCharge
        );
        assert!("gossip".parse::<NoteTag>().is_err());
    }

    #[test]
    fn test_note_tag_serializes_with_display_spelling() {
        let json = serde_json::to_string(&NoteTag::HyperClientConvenience).unwrap();
        assert_eq!(json, "\"Hyper Client Convenience\"");

        for tag in NoteTag::ALL {
            let parsed: NoteTag = tag.to_string().parse().unwrap();
            assert_eq!(parsed, tag);
        }
    }

    #[test]
    fn test_note_allows_multiple_tags() {
        let note = Note::new(
            "Client wants a new hero image".to_string(),
            [NoteTag::Clarification, NoteTag::ExtendMessage, NoteTag::Clarification],
            Utc::now(),
        );
        assert_eq!(note.tags.len(), 2);
        assert!(note.has_tag(NoteTag::ExtendMessage));
        assert!(!note.has_tag(NoteTag::Delivery));
    }
}

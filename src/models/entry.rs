use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Prefix marking a symptom tag as a mood, e.g. `mood:irritable`.
pub const MOOD_TAG_PREFIX: &str = "mood:";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub flow: Flow,
    pub symptoms: Vec<String>,
    pub notes: Option<String>,
}

/// Self-reported flow intensity, ordered by severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Spotting,
    Light,
    Medium,
    Heavy,
    VeryHeavy,
}

impl Flow {
    pub const ALL: [Flow; 5] = [
        Flow::Spotting,
        Flow::Light,
        Flow::Medium,
        Flow::Heavy,
        Flow::VeryHeavy,
    ];
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: i64,
    pub date: NaiveDate,
    pub flow: Flow,
    pub symptoms: Vec<String>,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the stored field untouched.
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub date: Option<NaiveDate>,
    pub flow: Option<Flow>,
    pub symptoms: Option<Vec<String>>,
    pub notes: Option<Option<String>>,
}

impl PeriodEntry {
    pub fn apply(&mut self, changes: EntryChanges) {
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(flow) = changes.flow {
            self.flow = flow;
        }
        if let Some(symptoms) = changes.symptoms {
            self.symptoms = symptoms;
        }
        if let Some(notes) = changes.notes {
            self.notes = notes;
        }
    }

    /// Mood tags on this entry with the prefix stripped.
    pub fn moods(&self) -> impl Iterator<Item = &str> {
        self.symptoms
            .iter()
            .filter_map(|tag| tag.strip_prefix(MOOD_TAG_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> PeriodEntry {
        PeriodEntry {
            id: 1,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            flow: Flow::Light,
            symptoms: vec!["Cramps".into(), "mood:tired".into()],
            notes: None,
        }
    }

    #[test]
    fn test_flow_serializes_snake_case() {
        assert_eq!(serde_json::to_value(Flow::VeryHeavy).unwrap(), "very_heavy");
        let flow: Flow = serde_json::from_str("\"spotting\"").unwrap();
        assert_eq!(flow, Flow::Spotting);
    }

    #[test]
    fn test_flow_rejects_unknown_level() {
        assert!(serde_json::from_str::<Flow>("\"torrential\"").is_err());
    }

    #[test]
    fn test_flow_is_ordered_by_severity() {
        assert!(Flow::Spotting < Flow::Light);
        assert!(Flow::Heavy < Flow::VeryHeavy);
        let mut sorted = Flow::ALL;
        sorted.sort();
        assert_eq!(sorted, Flow::ALL);
    }

    #[test]
    fn test_apply_replaces_only_given_fields() {
        let mut e = entry();
        e.apply(EntryChanges {
            flow: Some(Flow::Heavy),
            ..Default::default()
        });
        assert_eq!(e.flow, Flow::Heavy);
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(e.symptoms.len(), 2);
        assert_eq!(e.notes, None);
    }

    #[test]
    fn test_apply_can_clear_notes() {
        let mut e = PeriodEntry {
            notes: Some("x".into()),
            ..entry()
        };
        e.apply(EntryChanges::default());
        assert_eq!(e.notes.as_deref(), Some("x"));

        e.apply(EntryChanges {
            notes: Some(None),
            ..Default::default()
        });
        assert_eq!(e.notes, None);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["date"], "2024-01-01");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_moods_strip_prefix() {
        let e = entry();
        assert_eq!(e.moods().collect::<Vec<_>>(), vec!["tired"]);
    }
}

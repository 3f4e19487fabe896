//! Day record type

use serde::{Deserialize, Serialize};

/// The unique entry for a calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// Identity assigned by the store
    pub id: i64,
    /// Date key (YYYY-MM-DD)
    pub date_str: String,
    /// Who is scheduled
    pub who: Option<String>,
    /// Lesson topic or notes
    pub lesson: Option<String>,
}

impl Day {
    /// True when neither field carries visible text
    pub fn is_blank(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.who) && blank(&self.lesson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(who: Option<&str>, lesson: Option<&str>) -> Day {
        Day {
            id: 1,
            date_str: "2024-03-01".to_string(),
            who: who.map(String::from),
            lesson: lesson.map(String::from),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(day(Some("Ana"), None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "dateStr": "2024-03-01",
                "who": "Ana",
                "lesson": null,
            })
        );
    }

    #[test]
    fn test_is_blank() {
        assert!(day(None, None).is_blank());
        assert!(day(Some("  "), Some("")).is_blank());
        assert!(!day(Some("Ana"), None).is_blank());
        assert!(!day(None, Some("Fractions")).is_blank());
    }
}

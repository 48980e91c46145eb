use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used for turns: sortable as a plain string, microsecond precision.
pub const TURN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One question/answer exchange persisted for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    user_key: String,
    date_time: String,
    question: String,
    answer: String,
}

impl ConversationTurn {
    pub fn new(user_key: String, date_time: String, question: String, answer: String) -> Self {
        Self {
            user_key,
            date_time,
            question,
            answer,
        }
    }

    /// Create a turn stamped with the current UTC time.
    pub fn now(user_key: String, question: String, answer: String) -> Self {
        Self::at(Utc::now(), user_key, question, answer)
    }

    pub fn at(instant: DateTime<Utc>, user_key: String, question: String, answer: String) -> Self {
        Self::new(user_key, format_timestamp(instant), question, answer)
    }

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    pub fn date_time(&self) -> &str {
        &self.date_time
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TURN_TIMESTAMP_FORMAT).to_string()
}

/// Order turns chronologically by their timestamp.
///
/// The sort is stable, so turns sharing a timestamp keep the order the store
/// returned them in.
pub fn sort_chronologically(turns: &mut [ConversationTurn]) {
    turns.sort_by(|a, b| a.date_time.cmp(&b.date_time));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn turn(ts: &str, q: &str) -> ConversationTurn {
        ConversationTurn::new("u".into(), ts.into(), q.into(), String::new())
    }

    #[test]
    fn timestamp_has_microsecond_precision() {
        let instant = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap()
            + chrono::Duration::microseconds(42);
        let turn = ConversationTurn::at(instant, "demoUser".into(), "q".into(), "a".into());
        assert_eq!(turn.date_time(), "2023-04-05 06:07:08.000042");
    }

    #[test]
    fn sort_orders_by_timestamp_and_is_stable() {
        let mut turns = vec![
            turn("2023-01-02 00:00:00.000000", "second"),
            turn("2023-01-01 00:00:00.000000", "first-a"),
            turn("2023-01-01 00:00:00.000000", "first-b"),
        ];
        sort_chronologically(&mut turns);
        let order: Vec<_> = turns.iter().map(|t| t.question()).collect();
        assert_eq!(order, vec!["first-a", "first-b", "second"]);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(turn("2023-01-01 00:00:00.000000", "q")).unwrap();
        assert!(json.get("userKey").is_some());
        assert!(json.get("dateTime").is_some());
    }
}

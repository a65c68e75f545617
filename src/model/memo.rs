use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-form note, independent of tasks.
///
/// `id` is the creation time in epoch milliseconds and doubles as the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: i64,
    pub text: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Memo {
    pub fn new(id: i64, text: String, timestamp: DateTime<Utc>) -> Self {
        Memo {
            id,
            text,
            timestamp,
        }
    }
}

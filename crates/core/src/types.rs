use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Length of a generated collection session id.
pub const SESSION_ID_LEN: usize = 7;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Short lowercase base-36 identifier for one collection wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let id = (0..SESSION_ID_LEN)
            .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! One-shot, severity-tagged messages shown to the visitor on the next
//! rendered page.

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Success,
  Info,
  Warning,
  Error,
}

impl Level {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Success => "success",
      Self::Info => "info",
      Self::Warning => "warning",
      Self::Error => "error",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub level:   Level,
  pub message: String,
}

impl Notice {
  pub fn new(level: Level, message: impl Into<String>) -> Self {
    Self { level, message: message.into() }
  }
}

/// Serialise a notice queue as a compact JSON array.
pub fn encode_notices(notices: &[Notice]) -> Result<String> {
  Ok(serde_json::to_string(notices)?)
}

pub fn decode_notices(s: &str) -> Result<Vec<Notice>> {
  Ok(serde_json::from_str(s)?)
}

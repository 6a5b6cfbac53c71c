use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
  pub level: Option<String>,
  pub filters: Option<String>,
}

use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
  #[serde(default = "default_user_agent")]
  pub user_agent: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_user_agent() -> String {
  DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
  10
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self {
      user_agent: default_user_agent(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

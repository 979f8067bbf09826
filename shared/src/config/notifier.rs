//! Out-of-band notification configuration

use serde::{Deserialize, Serialize};

/// Sender settings for origin-change notices
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Address notices are sent from
    pub from: String,

    /// SMTP relay host
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            from: String::from("security@simple-auth.local"),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
        }
    }
}

fn default_smtp_host() -> String {
    String::from("localhost")
}

fn default_smtp_port() -> u16 {
    25
}

//! Team document: agents plus free-form roles and squads
//!
//! Agents are the only entries with operations (spawn/dismiss status flips);
//! roles and squads are carried verbatim for the dashboard to render.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{new_id, now_iso, required};
use crate::types::Result;

pub const AGENT_STATUS_IDLE: &str = "idle";
pub const AGENT_STATUS_ACTIVE: &str = "active";
pub const AGENT_STATUS_DISMISSED: &str = "dismissed";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_agent_status")]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_agent_status() -> String {
    AGENT_STATUS_IDLE.to_string()
}

/// Create input for `POST /api/agents`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgent {
    pub name: Option<String>,
    pub role: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Agent {
    pub fn new(input: NewAgent) -> Result<Self> {
        let name = required(input.name, "name")?;
        let now = now_iso();
        Ok(Self {
            id: new_id("agent"),
            name,
            role: input.role,
            status: default_agent_status(),
            tags: input.tags.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

/// The persisted team document shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDocument {
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub roles: Vec<Value>,
    #[serde(default)]
    pub squads: Vec<Value>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

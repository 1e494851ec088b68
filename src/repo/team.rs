//! Team repository
//!
//! The team document is shaped differently from the four entity collections
//! (agents plus free-form roles and squads), so it gets its own plumbing over
//! the same storage port instead of the generic `Collection`.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::bus::{ChangeEvent, EventBus};
use crate::model::team::{AGENT_STATUS_ACTIVE, AGENT_STATUS_DISMISSED};
use crate::model::{now_iso, Agent, NewAgent, TeamDocument};
use crate::store::CollectionStore;
use crate::types::{HearthError, Result};

const COLLECTION: &str = "team";

pub struct TeamRepository {
    store: Arc<dyn CollectionStore>,
    guard: Mutex<()>,
    bus: EventBus,
}

impl TeamRepository {
    pub fn new(store: Arc<dyn CollectionStore>, bus: EventBus) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
            bus,
        }
    }

    async fn load(&self) -> Result<TeamDocument> {
        let Some(doc) = self.store.load(COLLECTION).await? else {
            return Ok(TeamDocument::default());
        };
        serde_json::from_value(doc)
            .map_err(|e| HearthError::Storage(format!("malformed team document: {}", e)))
    }

    async fn save(&self, doc: &TeamDocument) -> Result<()> {
        let value = serde_json::to_value(doc)
            .map_err(|e| HearthError::Storage(format!("serialize team: {}", e)))?;
        self.store.save(COLLECTION, value).await
    }

    /// Full team document for `GET /api/team`.
    pub async fn document(&self) -> Result<TeamDocument> {
        let _guard = self.guard.lock().await;
        self.load().await
    }

    pub async fn agents(&self) -> Result<Vec<Agent>> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.agents)
    }

    pub async fn get_agent(&self, id: &str) -> Result<Agent> {
        let _guard = self.guard.lock().await;
        self.load()
            .await?
            .agents
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found(id))
    }

    pub async fn create_agent(&self, input: NewAgent) -> Result<Agent> {
        let _guard = self.guard.lock().await;
        let agent = Agent::new(input)?;
        let mut doc = self.load().await?;
        doc.agents.push(agent.clone());
        self.save(&doc).await?;
        self.bus.publish(ChangeEvent::AgentCreated {
            agent: agent.clone(),
        });
        Ok(agent)
    }

    /// Flip the agent to active.
    pub async fn spawn(&self, id: &str) -> Result<Agent> {
        let agent = self.set_status(id, AGENT_STATUS_ACTIVE).await?;
        self.bus.publish(ChangeEvent::AgentSpawned {
            agent: agent.clone(),
        });
        Ok(agent)
    }

    /// Flip the agent to dismissed.
    pub async fn dismiss(&self, id: &str) -> Result<Agent> {
        let agent = self.set_status(id, AGENT_STATUS_DISMISSED).await?;
        self.bus.publish(ChangeEvent::AgentDismissed {
            agent: agent.clone(),
        });
        Ok(agent)
    }

    async fn set_status(&self, id: &str, status: &str) -> Result<Agent> {
        let _guard = self.guard.lock().await;
        let mut doc = self.load().await?;
        let Some(agent) = doc.agents.iter_mut().find(|a| a.id == id) else {
            return Err(not_found(id));
        };
        agent.status = status.to_string();
        agent.updated_at = now_iso();
        let updated = agent.clone();
        self.save(&doc).await?;
        Ok(updated)
    }
}

fn not_found(id: &str) -> HearthError {
    HearthError::NotFound {
        kind: "Agent",
        id: id.to_string(),
    }
}

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Environment;
use crate::models::{BuilderKind, ProductConfig};

use super::{AdvancedStructure, Editor, EditorError, Mutation};

/// Typed error for "resource not found" - lets the API error handler
/// downcast instead of matching on strings.
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// One advanced-builder session
#[derive(Debug, Clone)]
pub struct BuilderSession {
    pub id: Uuid,
    pub editor: Editor,
    /// Encoded structure, refreshed after every applied mutation
    pub encoded: String,
    pub revision: u64,
    pub auto_update: bool,
    /// Form state re-rendered when auto-update is on
    pub config: Option<ProductConfig>,
    pub environment: Environment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing snapshot of a session
#[derive(Debug, Clone, Serialize)]
pub struct BuilderView {
    pub id: Uuid,
    pub kind: BuilderKind,
    pub structure: AdvancedStructure,
    pub target: usize,
    pub param: &'static str,
    pub encoded: String,
    pub revision: u64,
    pub auto_update: bool,
    pub updated_at: DateTime<Utc>,
}

impl BuilderSession {
    fn new(structure: AdvancedStructure, auto_update: bool) -> Result<Self> {
        let editor = Editor::with_structure(structure);
        let encoded = editor.structure().encode()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            editor,
            encoded,
            revision: 0,
            auto_update,
            config: None,
            environment: Environment::default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn kind(&self) -> BuilderKind {
        self.editor.structure().kind()
    }

    pub fn view(&self) -> BuilderView {
        BuilderView {
            id: self.id,
            kind: self.kind(),
            structure: self.editor.structure().clone(),
            target: self.editor.target(),
            param: self.kind().param_name(),
            encoded: self.encoded.clone(),
            revision: self.revision,
            auto_update: self.auto_update,
            updated_at: self.updated_at,
        }
    }
}

/// In-memory builder sessions. Each session is mutated under the write
/// lock, so edits to one structure are applied one at a time.
#[derive(Clone, Default)]
pub struct BuilderStore {
    sessions: Arc<RwLock<HashMap<Uuid, BuilderSession>>>,
}

impl BuilderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session holding an empty container 0
    pub async fn create(&self, kind: BuilderKind, auto_update: bool) -> Result<BuilderView> {
        self.create_with(AdvancedStructure::new(kind), auto_update).await
    }

    /// Start a session from an existing structure
    pub async fn create_with(&self, structure: AdvancedStructure, auto_update: bool) -> Result<BuilderView> {
        let session = BuilderSession::new(structure, auto_update)?;
        let view = session.view();
        self.sessions.write().await.insert(session.id, session);
        tracing::debug!("Created {:?} builder {}", view.kind, view.id);
        Ok(view)
    }

    /// Full copy of a session, including attached form state
    pub async fn get(&self, id: Uuid) -> Result<BuilderSession> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| NotFoundError::new("builder", &id.to_string()).into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| NotFoundError::new("builder", &id.to_string()).into())
    }

    /// Update auto-update and the attached form state
    pub async fn update_settings(
        &self,
        id: Uuid,
        auto_update: Option<bool>,
        config: Option<ProductConfig>,
        environment: Option<Environment>,
    ) -> Result<BuilderSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::new("builder", &id.to_string()))?;
        if let Some(auto_update) = auto_update {
            session.auto_update = auto_update;
        }
        if config.is_some() {
            session.config = config;
        }
        if let Some(environment) = environment {
            session.environment = environment;
        }
        session.updated_at = Utc::now();
        Ok(session.clone())
    }

    /// Apply one editor operation. On success the structure is re-encoded
    /// and the revision bumped; rejected or no-op edits leave both alone.
    pub async fn mutate<F>(&self, id: Uuid, op: F) -> Result<(BuilderSession, Mutation)>
    where
        F: FnOnce(&mut Editor) -> std::result::Result<Mutation, EditorError>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::new("builder", &id.to_string()))?;

        // Edit a copy so a failed re-encode cannot leave a half-applied change
        let mut editor = session.editor.clone();
        let mutation = op(&mut editor)?;
        if mutation == Mutation::Applied {
            session.encoded = editor.structure().encode()?;
            session.editor = editor;
            session.revision += 1;
            session.updated_at = Utc::now();
        }
        Ok((session.clone(), mutation))
    }

    /// Drop sessions idle for longer than `ttl_secs`. Returns how many were removed.
    pub async fn sweep_idle(&self, ttl_secs: i64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(ttl_secs);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.updated_at >= cutoff);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

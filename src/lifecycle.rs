use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::client::scoped;
use crate::error::{Error, Result};

/// A closed set of status strings an entity moves through.
pub trait Status: Copy + Eq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn can_transition_to(&self, _next: Self) -> bool {
        true
    }

    /// Case-insensitive lookup of a status string.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw))
    }

    fn allowed_next(&self) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|s| *s != *self && self.can_transition_to(*s))
            .collect()
    }
}

pub trait Entity: Clone + Debug + DeserializeOwned {
    type Status: Status;

    const KIND: &'static str;

    fn id(&self) -> &str;

    fn status(&self) -> Self::Status;

    /// Text fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Value matched by the category dropdown. Each entity picks the field
    /// its page groups on.
    fn category(&self) -> Option<&str> {
        None
    }

    fn label(&self) -> &str {
        self.id()
    }
}

/// Remote endpoints behind a lifecycle view.
#[allow(async_fn_in_trait)]
pub trait LifecycleBackend<E: Entity> {
    async fn fetch_all(&self) -> Result<Vec<E>>;

    async fn update_status(&self, id: &str, status: E::Status, note: Option<&str>) -> Result<E>;

    async fn assign(&self, _id: &str, _actor_id: &str) -> Result<E> {
        Err(Error::Unsupported(format!("{} cannot be assigned", E::KIND)))
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        Err(Error::Unsupported(format!("{} cannot be deleted", E::KIND)))
    }
}

/// Confirmation dialog shown before destructive actions.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Prompt for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone)]
pub struct ListFilter<S> {
    pub search: Option<String>,
    pub status: Option<S>,
    pub category: Option<String>,
}

impl<S> Default for ListFilter<S> {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            category: None,
        }
    }
}

impl<S: Status> ListFilter<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }

    /// Status filter from a dropdown value; empty or `all` clears it.
    pub fn status_str(mut self, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            self.status = None;
            return Ok(self);
        }
        self.status = Some(
            S::parse(raw).ok_or_else(|| Error::Unsupported(format!("Unknown status: {}", raw)))?,
        );
        Ok(self)
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().is_empty() || category.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(category)
        };
        self
    }

    pub fn matches<E: Entity<Status = S>>(&self, entity: &E) -> bool {
        if let Some(status) = self.status {
            if entity.status() != status {
                return false;
            }
        }

        if let Some(category) = &self.category {
            match entity.category() {
                Some(value) if value.trim().eq_ignore_ascii_case(category.trim()) => {}
                _ => return false,
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                entity
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Local copy of one entity list plus the mutations that reconcile it.
pub struct LifecycleView<E: Entity, B> {
    backend: B,
    items: Vec<E>,
    scope: CancellationToken,
}

impl<E, B> LifecycleView<E, B>
where
    E: Entity,
    B: LifecycleBackend<E>,
{
    pub fn new(backend: B) -> Self {
        Self::with_scope(backend, CancellationToken::new())
    }

    pub fn with_scope(backend: B, scope: CancellationToken) -> Self {
        Self {
            backend,
            items: Vec::new(),
            scope,
        }
    }

    pub fn with_items(backend: B, items: Vec<E>) -> Self {
        let mut view = Self::new(backend);
        view.items = items;
        view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn scope(&self) -> CancellationToken {
        self.scope.clone()
    }

    /// Stops in-flight calls; nothing that completes afterwards is applied.
    pub fn close(&self) {
        self.scope.cancel();
    }

    pub fn filtered(&self, filter: &ListFilter<E::Status>) -> Vec<&E> {
        self.items.iter().filter(|e| filter.matches(*e)).collect()
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let items = scoped(&self.scope, self.backend.fetch_all()).await?;
        self.ensure_open()?;
        debug!(kind = E::KIND, count = items.len(), "Loaded entities");
        self.items = items;
        Ok(())
    }

    pub async fn list(&mut self, filter: &ListFilter<E::Status>) -> Result<Vec<E>> {
        self.refresh().await?;
        Ok(self.filtered(filter).into_iter().cloned().collect())
    }

    #[instrument(skip(self, note), fields(kind = E::KIND))]
    pub async fn transition(&mut self, id: &str, status: E::Status, note: Option<&str>) -> Result<E> {
        let current = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("{} {} is not loaded", E::KIND, id)))?
            .status();
        if current != status && !current.can_transition_to(status) {
            return Err(Error::InvalidTransition {
                kind: E::KIND,
                from: current.as_str(),
                to: status.as_str(),
            });
        }

        let updated = scoped(&self.scope, self.backend.update_status(id, status, note)).await?;
        self.ensure_open()?;
        self.replace(id, updated.clone());
        info!(kind = E::KIND, id, status = status.as_str(), "Status updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn assign(&mut self, id: &str, actor_id: &str) -> Result<E> {
        if self.get(id).is_none() {
            return Err(Error::NotFound(format!("{} {} is not loaded", E::KIND, id)));
        }

        let updated = scoped(&self.scope, self.backend.assign(id, actor_id)).await?;
        self.ensure_open()?;
        self.replace(id, updated.clone());
        info!(kind = E::KIND, id, actor_id, "Assignment updated");
        Ok(updated)
    }

    /// Returns `Ok(false)` when the operator declines the confirmation.
    #[instrument(skip(self, prompt), fields(kind = E::KIND))]
    pub async fn remove<P>(&mut self, id: &str, prompt: &P) -> Result<bool>
    where
        P: Prompt + ?Sized,
    {
        let entity = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("{} {} is not loaded", E::KIND, id)))?;
        let message = format!(
            "Delete {} \"{}\"? This cannot be undone.",
            E::KIND,
            entity.label()
        );
        if !prompt.confirm(&message) {
            debug!(kind = E::KIND, id, "Deletion declined");
            return Ok(false);
        }

        scoped(&self.scope, self.backend.delete(id)).await?;
        self.ensure_open()?;
        self.items.retain(|e| e.id() != id);
        info!(kind = E::KIND, id, "Deleted");
        Ok(true)
    }

    fn replace(&mut self, id: &str, entity: E) -> bool {
        match self.items.iter_mut().find(|e| e.id() == id) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.scope.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::lifecycle::{Entity, LifecycleBackend, LifecycleView};
use crate::models::user::User;
use crate::services::directory_service::DirectoryService;

/// Actor picker attached to a lifecycle list. Candidates are loaded once;
/// rows stay busy while their assignment call is in flight, and are released
/// even when that call is dropped before it finishes.
#[derive(Debug, Default)]
pub struct AssignmentPanel {
    candidates: Vec<User>,
    busy: Mutex<HashSet<String>>,
}

/// Marks one row busy until dropped.
struct BusyRow<'a> {
    busy: &'a Mutex<HashSet<String>>,
    entity_id: String,
}

impl Drop for BusyRow<'_> {
    fn drop(&mut self) {
        lock(self.busy).remove(&self.entity_id);
    }
}

fn lock(busy: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    busy.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AssignmentPanel {
    pub fn new(candidates: Vec<User>) -> Self {
        Self {
            candidates,
            busy: Mutex::new(HashSet::new()),
        }
    }

    pub async fn load(directory: &DirectoryService) -> Result<Self> {
        let employees = directory.employees().await?;
        debug!(count = employees.len(), "Loaded assignment candidates");
        Ok(Self::new(
            employees.into_iter().filter(|e| e.is_active).collect(),
        ))
    }

    pub fn candidates(&self) -> &[User] {
        &self.candidates
    }

    /// `(id, name)` pairs for the dropdown.
    pub fn options(&self) -> Vec<(&str, &str)> {
        self.candidates
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect()
    }

    pub fn is_busy(&self, entity_id: &str) -> bool {
        lock(&self.busy).contains(entity_id)
    }

    pub fn can_assign(&self, entity_id: &str) -> bool {
        !self.candidates.is_empty() && !self.is_busy(entity_id)
    }

    /// Assigns `actor_id` to the entity and patches the view with the
    /// server's copy. Returns `Ok(None)` when assignment is disabled.
    pub async fn assign<E, B>(
        &self,
        view: &mut LifecycleView<E, B>,
        entity_id: &str,
        actor_id: &str,
    ) -> Result<Option<E>>
    where
        E: Entity,
        B: LifecycleBackend<E>,
    {
        if !self.can_assign(entity_id) {
            debug!(entity_id, "Assignment disabled for row");
            return Ok(None);
        }
        if !self.candidates.iter().any(|c| c.id == actor_id) {
            return Err(Error::NotFound(format!(
                "{} is not an assignable employee",
                actor_id
            )));
        }
        let Some(_row) = self.claim(entity_id) else {
            return Ok(None);
        };

        let updated = view.assign(entity_id, actor_id).await?;
        info!(kind = E::KIND, entity_id, actor_id, "Assigned");
        Ok(Some(updated))
    }

    fn claim(&self, entity_id: &str) -> Option<BusyRow<'_>> {
        if !lock(&self.busy).insert(entity_id.to_string()) {
            return None;
        }
        Some(BusyRow {
            busy: &self.busy,
            entity_id: entity_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticket::{Priority, Ticket, TicketStatus};
    use crate::models::user::{ActorRef, Role, UserSettings};
    use std::cell::Cell;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct AssigningBackend {
        calls: Cell<usize>,
        gate: Option<Arc<Notify>>,
    }

    impl AssigningBackend {
        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                calls: Cell::new(0),
                gate: Some(gate),
            }
        }
    }

    impl LifecycleBackend<Ticket> for AssigningBackend {
        async fn fetch_all(&self) -> Result<Vec<Ticket>> {
            Ok(vec![open_ticket("1")])
        }

        async fn update_status(
            &self,
            _id: &str,
            _status: TicketStatus,
            _note: Option<&str>,
        ) -> Result<Ticket> {
            Err(Error::Unsupported("not used".into()))
        }

        async fn assign(&self, id: &str, actor_id: &str) -> Result<Ticket> {
            self.calls.set(self.calls.get() + 1);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let mut ticket = open_ticket(id);
            ticket.assigned_to = Some(ActorRef::new(actor_id));
            ticket.status = TicketStatus::InProgress;
            Ok(ticket)
        }
    }

    fn open_ticket(id: &str) -> Ticket {
        Ticket {
            id: id.into(),
            title: "Renew visa".into(),
            description: String::new(),
            priority: Priority::High,
            status: TicketStatus::Open,
            assigned_to: None,
            tags: Vec::new(),
            category: None,
            created_at: None,
        }
    }

    fn employee(id: &str, name: &str) -> User {
        User {
            id: id.into(),
            name: name.into(),
            email: format!("{}@firm.ae", id),
            phone: None,
            role: Role::Employee,
            address: None,
            is_active: true,
            nationality: None,
            department: None,
            position: None,
            company_name: None,
            partner_type: None,
            bank_name: None,
            account_number: None,
            iban: None,
            trade_license_number: None,
            settings: UserSettings::default(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn zero_candidates_disables_assignment() {
        let backend = AssigningBackend::default();
        let mut view = LifecycleView::with_items(backend, vec![open_ticket("1")]);
        let panel = AssignmentPanel::new(Vec::new());

        assert!(panel.options().is_empty());
        assert!(!panel.can_assign("1"));
        let outcome = panel.assign(&mut view, "1", "e1").await.unwrap();
        assert!(outcome.is_none());
        assert_eq!(view.backend().calls.get(), 0);
        assert!(view.items()[0].assigned_to.is_none());
    }

    #[tokio::test]
    async fn assignment_patches_view_and_releases_row() {
        let backend = AssigningBackend::default();
        let mut view = LifecycleView::with_items(backend, vec![open_ticket("1")]);
        let panel = AssignmentPanel::new(vec![employee("e1", "Nadia"), employee("e2", "Karim")]);

        let updated = panel.assign(&mut view, "1", "e2").await.unwrap().unwrap();
        assert_eq!(updated.assigned_to.as_ref().unwrap().id, "e2");
        assert_eq!(view.items()[0].status, TicketStatus::InProgress);
        assert!(!panel.is_busy("1"));

        // re-assignment is just another call
        panel.assign(&mut view, "1", "e1").await.unwrap();
        assert_eq!(view.items()[0].assigned_to.as_ref().unwrap().id, "e1");
        assert_eq!(view.backend().calls.get(), 2);
    }

    #[tokio::test]
    async fn unknown_actor_is_rejected() {
        let backend = AssigningBackend::default();
        let mut view = LifecycleView::with_items(backend, vec![open_ticket("1")]);
        let panel = AssignmentPanel::new(vec![employee("e1", "Nadia")]);

        let err = panel.assign(&mut view, "1", "e9").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(view.backend().calls.get(), 0);
    }

    #[tokio::test]
    async fn row_is_busy_while_the_call_is_in_flight() {
        let gate = Arc::new(Notify::new());
        let mut view =
            LifecycleView::with_items(AssigningBackend::gated(gate.clone()), vec![open_ticket("1")]);
        let panel = AssignmentPanel::new(vec![employee("e1", "Nadia")]);

        let (outcome, ()) = tokio::join!(panel.assign(&mut view, "1", "e1"), async {
            tokio::task::yield_now().await;
            assert!(panel.is_busy("1"));
            assert!(!panel.can_assign("1"));
            assert!(panel.can_assign("2"));
            gate.notify_one();
        });

        assert!(outcome.unwrap().is_some());
        assert!(!panel.is_busy("1"));
    }

    #[tokio::test]
    async fn dropped_call_releases_the_row() {
        let gate = Arc::new(Notify::new());
        let mut view =
            LifecycleView::with_items(AssigningBackend::gated(gate.clone()), vec![open_ticket("1")]);
        let panel = AssignmentPanel::new(vec![employee("e1", "Nadia")]);

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), panel.assign(&mut view, "1", "e1")).await;
        assert!(timed_out.is_err());
        assert!(!panel.is_busy("1"));
        assert!(panel.can_assign("1"));
        assert!(view.items()[0].assigned_to.is_none());

        gate.notify_one();
        let retried = panel.assign(&mut view, "1", "e1").await.unwrap();
        assert_eq!(retried.unwrap().assigned_to.unwrap().id, "e1");
        assert_eq!(view.backend().calls.get(), 2);
    }
}

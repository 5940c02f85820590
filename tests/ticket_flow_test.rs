mod common;

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};
use ops_portal::{
    assignment::AssignmentPanel,
    lifecycle::{ListFilter, Status},
    models::ticket::TicketStatus,
};
use serde_json::{json, Value as JsonValue};

use common::{portal, spawn_backend, Hits};

#[derive(Clone)]
struct Backend {
    tickets: Arc<Mutex<Vec<JsonValue>>>,
    employees: Arc<Vec<JsonValue>>,
    writes: Hits,
}

impl Backend {
    fn new(employees: Vec<JsonValue>) -> Self {
        Self {
            tickets: Arc::new(Mutex::new(vec![
                json!({"_id": "1", "title": "Printer jam", "status": "open", "priority": "low"}),
                json!({"_id": "2", "title": "Payroll access", "status": "open", "priority": "high", "category": "hr"}),
                json!({"_id": "3", "title": "Locked record", "status": "open", "priority": "medium"}),
            ])),
            employees: Arc::new(employees),
            writes: Hits::default(),
        }
    }

    fn statuses(&self) -> Vec<(String, String)> {
        self.tickets
            .lock()
            .unwrap()
            .iter()
            .map(|t| {
                (
                    t["_id"].as_str().unwrap().to_string(),
                    t["status"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }
}

async fn list_tickets(State(b): State<Backend>) -> Json<JsonValue> {
    let tickets = b.tickets.lock().unwrap().clone();
    Json(json!({"success": true, "data": tickets}))
}

async fn update_status(
    State(b): State<Backend>,
    Path(id): Path<String>,
    Json(body): Json<JsonValue>,
) -> (StatusCode, Json<JsonValue>) {
    b.writes.bump();
    if id == "3" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"success": false, "message": "Ticket is locked by another operator"})),
        );
    }
    let mut tickets = b.tickets.lock().unwrap();
    match tickets.iter_mut().find(|t| t["_id"] == id) {
        Some(ticket) => {
            ticket["status"] = body["status"].clone();
            (StatusCode::OK, Json(json!({"success": true, "data": ticket.clone()})))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Ticket not found"})),
        ),
    }
}

async fn assign_ticket(
    State(b): State<Backend>,
    Path(id): Path<String>,
    Json(body): Json<JsonValue>,
) -> Json<JsonValue> {
    b.writes.bump();
    let employee_id = body["assignedTo"].as_str().unwrap_or_default().to_string();
    let employee = b
        .employees
        .iter()
        .find(|e| e["_id"] == employee_id)
        .cloned()
        .unwrap_or(JsonValue::Null);
    let mut tickets = b.tickets.lock().unwrap();
    let ticket = tickets.iter_mut().find(|t| t["_id"] == id).unwrap();
    ticket["assignedTo"] = employee;
    if ticket["status"] == "open" {
        ticket["status"] = json!("in_progress");
    }
    Json(json!({"success": true, "data": ticket.clone()}))
}

async fn delete_ticket(State(b): State<Backend>, Path(id): Path<String>) -> Json<JsonValue> {
    b.writes.bump();
    b.tickets.lock().unwrap().retain(|t| t["_id"] != id);
    Json(json!({"success": true, "message": "Ticket deleted"}))
}

async fn list_employees(State(b): State<Backend>) -> Json<JsonValue> {
    Json(json!({"success": true, "data": *b.employees}))
}

fn routes(backend: Backend) -> Router {
    Router::new()
        .route("/tickets", get(list_tickets))
        .route("/tickets/:id/status", patch(update_status))
        .route("/tickets/:id/assign", patch(assign_ticket))
        .route("/tickets/:id", delete(delete_ticket))
        .route("/employees", get(list_employees))
        .with_state(backend)
}

fn employee(id: &str, name: &str) -> JsonValue {
    json!({"_id": id, "name": name, "email": format!("{}@firm.ae", id), "role": "employee"})
}

#[tokio::test]
async fn resolving_one_ticket_leaves_the_others_alone() {
    let backend = Backend::new(Vec::new());
    let base = spawn_backend(routes(backend.clone())).await;
    let portal = portal(&base);

    let mut tickets = portal.tickets();
    tickets.refresh().await.expect("load tickets");

    let updated = tickets
        .transition("1", TicketStatus::Resolved, None)
        .await
        .expect("transition");
    assert_eq!(updated.status, TicketStatus::Resolved);

    let local: Vec<_> = tickets
        .items()
        .iter()
        .map(|t| (t.id.as_str(), t.status.as_str()))
        .collect();
    assert_eq!(
        local,
        vec![("1", "resolved"), ("2", "open"), ("3", "open")]
    );
    assert_eq!(backend.statuses()[0].1, "resolved");
}

#[tokio::test]
async fn ids_with_reserved_characters_reach_their_own_route() {
    let backend = Backend::new(Vec::new());
    backend.tickets.lock().unwrap().push(
        json!({"_id": "HR/42?urgent#top", "title": "Odd id", "status": "open", "priority": "low"}),
    );
    let base = spawn_backend(routes(backend.clone())).await;
    let portal = portal(&base);

    let mut tickets = portal.tickets();
    tickets.refresh().await.expect("load tickets");

    let updated = tickets
        .transition("HR/42?urgent#top", TicketStatus::Resolved, None)
        .await
        .expect("transition");
    assert_eq!(updated.id, "HR/42?urgent#top");
    assert_eq!(
        backend.statuses(),
        vec![
            ("1".to_string(), "open".to_string()),
            ("2".to_string(), "open".to_string()),
            ("3".to_string(), "open".to_string()),
            ("HR/42?urgent#top".to_string(), "resolved".to_string()),
        ]
    );
    assert_eq!(backend.writes.count(), 1);
}

#[tokio::test]
async fn failed_transition_keeps_local_state() {
    let backend = Backend::new(Vec::new());
    let base = spawn_backend(routes(backend.clone())).await;
    let portal = portal(&base);

    let mut tickets = portal.tickets();
    tickets.refresh().await.expect("load tickets");

    let err = tickets
        .transition("3", TicketStatus::Closed, Some("duplicate"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Ticket is locked by another operator");
    assert_eq!(tickets.get("3").unwrap().status, TicketStatus::Open);
}

#[tokio::test]
async fn filters_combine_search_and_category() {
    let backend = Backend::new(Vec::new());
    let base = spawn_backend(routes(backend)).await;
    let portal = portal(&base);

    let mut tickets = portal.tickets();
    let hr_only = tickets
        .list(&ListFilter::new().search("payroll").category("HR"))
        .await
        .expect("list");
    assert_eq!(hr_only.len(), 1);
    assert_eq!(hr_only[0].id, "2");

    let none = tickets.filtered(&ListFilter::new().search("printer").category("hr"));
    assert!(none.is_empty());
}

#[tokio::test]
async fn deleting_removes_exactly_one_ticket() {
    let backend = Backend::new(Vec::new());
    let base = spawn_backend(routes(backend.clone())).await;
    let portal = portal(&base);

    let mut tickets = portal.tickets();
    tickets.refresh().await.expect("load tickets");

    let declined = tickets.remove("2", &|_: &str| false).await.expect("remove");
    assert!(!declined);
    assert_eq!(backend.writes.count(), 0);

    let removed = tickets.remove("2", &|_: &str| true).await.expect("remove");
    assert!(removed);
    let ids: Vec<_> = tickets.items().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(backend.statuses().len(), 2);
}

#[tokio::test]
async fn no_employees_means_nothing_to_assign() {
    let backend = Backend::new(Vec::new());
    let base = spawn_backend(routes(backend.clone())).await;
    let portal = portal(&base);

    let mut tickets = portal.tickets();
    tickets.refresh().await.expect("load tickets");
    let panel = AssignmentPanel::load(&portal.directory_service)
        .await
        .expect("load employees");

    assert!(panel.options().is_empty());
    assert!(!panel.can_assign("1"));
    let outcome = panel.assign(&mut tickets, "1", "e1").await.expect("assign");
    assert!(outcome.is_none());
    assert_eq!(backend.writes.count(), 0);
}

#[tokio::test]
async fn assigning_an_open_ticket_starts_it() {
    let backend = Backend::new(vec![employee("e1", "Nadia"), employee("e2", "Karim")]);
    let base = spawn_backend(routes(backend.clone())).await;
    let portal = portal(&base);

    let mut tickets = portal.tickets();
    tickets.refresh().await.expect("load tickets");
    let panel = AssignmentPanel::load(&portal.directory_service)
        .await
        .expect("load employees");
    assert_eq!(panel.options(), vec![("e1", "Nadia"), ("e2", "Karim")]);

    let updated = panel
        .assign(&mut tickets, "1", "e2")
        .await
        .expect("assign")
        .expect("assignment enabled");
    let assignee = updated.assigned_to.expect("assignee");
    assert_eq!(assignee.id, "e2");
    assert_eq!(assignee.display_name(), "Karim");
    assert_eq!(tickets.get("1").unwrap().status, TicketStatus::InProgress);
    assert_eq!(tickets.get("2").unwrap().assigned_to, None);
}

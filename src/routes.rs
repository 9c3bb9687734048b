use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::balance::{compute_balance_from_event, resolve_split};
use crate::error::{AppError, AppResult};
use crate::schemas::{
    Calculation, Event, EventDetails, EventSummary, Expense, NewEvent, NewExpense, Participant,
};
use crate::settings::Validation;
use crate::settlement::calculate_settlements;
use crate::store::EventStore;
use crate::validation;

type Store = web::Data<dyn EventStore>;

pub fn configure(cfg: &mut web::ServiceConfig, debug_routes: bool) {
    // Malformed bodies get the same `{error}` JSON as every other rejection.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    );
    cfg.service(root)
        .service(health_check)
        .service(create_event)
        .service(get_event)
        .service(delete_event)
        .service(add_user)
        .service(remove_user)
        .service(add_expense)
        .service(remove_expense)
        .service(calculate_event_balances);
    if debug_routes {
        cfg.service(get_all_data);
    }
}

#[get("/")]
async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Bill Splitter API is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "create_event": "POST /api/events",
            "get_event": "GET /api/events/{event_id}",
        }
    }))
}

#[get("/api/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "message": "Bill Splitter API is running",
    }))
}

#[post("/api/events")]
async fn create_event(store: Store, json: web::Json<NewEvent>) -> AppResult<HttpResponse> {
    let (name, description) = validation::event_fields(json.into_inner());
    let event = Event::new(name, description);
    let summary = EventSummary::from(&event);
    store.create_event(event).await?;
    tracing::info!(id = %summary.id, "event created");
    Ok(HttpResponse::Created().json(summary))
}

#[get("/api/events/{id}")]
async fn get_event(store: Store, id: web::Path<String>) -> AppResult<HttpResponse> {
    let event = store.get_event(&id).await?;
    let balances = compute_balance_from_event(&event);
    let settlements = calculate_settlements(&balances);

    let expenses = event
        .expenses
        .iter()
        .map(|expense| Expense {
            split_with: resolve_split(expense, &event.participants)
                .into_iter()
                .cloned()
                .collect(),
            ..expense.clone()
        })
        .collect();

    Ok(HttpResponse::Ok().json(EventDetails {
        users: event
            .participants
            .iter()
            .map(|name| Participant { name: name.clone() })
            .collect(),
        total_expenses: event.total_expenses(),
        expenses,
        balances,
        settlements,
        id: event.id,
        name: event.name,
        description: event.description,
        created_at: event.created_at,
    }))
}

#[delete("/api/events/{id}")]
async fn delete_event(store: Store, id: web::Path<String>) -> AppResult<HttpResponse> {
    store.delete_event(&id).await?;
    tracing::info!(id = %id, "event deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/events/{id}/users")]
async fn add_user(
    store: Store,
    id: web::Path<String>,
    json: web::Json<Participant>,
) -> AppResult<HttpResponse> {
    let name = validation::participant_name(&json.name)?;
    store.add_participant(&id, &name).await?;
    Ok(HttpResponse::Created().json(Participant { name }))
}

#[delete("/api/events/{id}/users/{name}")]
async fn remove_user(
    store: Store,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (id, name) = path.into_inner();
    store.remove_participant(&id, &name).await?;
    tracing::info!(%id, %name, "participant removed");
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/events/{id}/expenses")]
async fn add_expense(
    store: Store,
    rules: web::Data<Validation>,
    id: web::Path<String>,
    json: web::Json<NewExpense>,
) -> AppResult<HttpResponse> {
    let event = store.get_event(&id).await?;
    let NewExpense {
        description,
        amount,
        paid_by,
        split_with,
    } = validation::expense(json.into_inner(), &event, rules.strict_participants)?;
    let expense = Expense {
        id: uuid::Uuid::new_v4().to_string(),
        description,
        amount,
        paid_by,
        split_with,
        created_at: Utc::now(),
    };
    store.add_expense(&event.id, expense.clone()).await?;
    Ok(HttpResponse::Created().json(expense))
}

#[delete("/api/events/{id}/expenses/{expense_id}")]
async fn remove_expense(
    store: Store,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (id, expense_id) = path.into_inner();
    store.remove_expense(&id, &expense_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/events/{id}/calculate")]
async fn calculate_event_balances(
    store: Store,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let event = store.get_event(&id).await?;
    let balances = compute_balance_from_event(&event);
    let settlements = calculate_settlements(&balances);
    Ok(HttpResponse::Ok().json(Calculation {
        balances,
        settlements,
    }))
}

#[get("/api/debug/all-data")]
async fn get_all_data(store: Store) -> AppResult<HttpResponse> {
    let events: Vec<_> = store
        .list_events()
        .await?
        .into_iter()
        .map(|event| {
            json!({
                "id": event.id,
                "name": event.name,
                "created_at": event.created_at,
                "users": event.participants,
                "expenses": event.expenses.iter().map(|e| json!({
                    "description": e.description,
                    "amount": e.amount,
                    "paid_by": e.paid_by,
                    "split_with": e.split_with,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "total_events": events.len(),
        "events": events,
    })))
}

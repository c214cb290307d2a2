//! In-process stand-in for the event service.
//!
//! Serves the `/api` surface the dashboard talks to from an in-memory store on
//! an ephemeral port, and records every request it receives so tests can
//! assert on method, path, headers and body.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use pingpong_hub::config::HubConfig;
use pingpong_hub::AppState;

pub const EMAIL: &str = "desk@club.test";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "tok-desk";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct Data {
    requests: Vec<Recorded>,
    events: Vec<Value>,
    players: Vec<Value>,
    tables: HashMap<String, Vec<Value>>,
    registrations: HashMap<String, Vec<Value>>,
    failures: HashMap<(Method, String), (StatusCode, String)>,
    import_result: Option<Value>,
    token_revoked: bool,
    next_id: i64,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone)]
pub struct FakeService {
    pub url: String,
    data: Arc<Mutex<Data>>,
}

impl FakeService {
    pub async fn start() -> Self {
        let data = Arc::new(Mutex::new(Data::default()));
        let app = Router::new().fallback(handle).with_state(data.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            data,
        }
    }

    pub fn config(&self) -> HubConfig {
        HubConfig {
            api_url: self.url.clone(),
            request_timeout_secs: Some(5),
            ..HubConfig::default()
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.config()).unwrap()
    }

    /// State with a logged-in agent.
    pub async fn signed_in(&self) -> AppState {
        let state = self.state();
        let response = state.api.login(EMAIL, PASSWORD).await.unwrap();
        state.auth.login(response).await;
        state
    }

    /// Signed in with `event` selected.
    pub async fn signed_in_with_event(&self, event: &Value) -> AppState {
        let state = self.signed_in().await;
        let event = serde_json::from_value(event.clone()).unwrap();
        state.active_event.set_active(Some(event)).await;
        state
    }

    // ---------------------------------------------------------------------
    // Seeding
    // ---------------------------------------------------------------------

    pub fn add_event(&self, name: &str, tables_count: u32) -> Value {
        let mut data = self.data.lock().unwrap();
        let id = format!("evt-{}", data.next_id());
        let event = json!({
            "id": id,
            "name": name,
            "tables_count": tables_count,
            "location": null,
            "starts_at": null,
        });
        data.events.push(event.clone());
        event
    }

    pub fn add_player(&self, full_name: &str) -> Value {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        let player = json!({
            "id": id,
            "full_name": full_name,
            "phone_number": format!("+1555{:04}", id),
            "is_playing": false,
        });
        data.players.push(player.clone());
        player
    }

    pub fn add_table(&self, event: &Value, position: u32) -> Value {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        let event_id = id_of(&event["id"]);
        let table = free_table(id, &event["id"], position);
        data.tables.entry(event_id).or_default().push(table.clone());
        table
    }

    pub fn add_registration(&self, event: &Value, player: &Value) -> Value {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        let registration = json!({
            "id": id,
            "event_id": event["id"],
            "player_id": player["id"],
            "player": player,
        });
        data.registrations
            .entry(id_of(&event["id"]))
            .or_default()
            .push(registration.clone());
        registration
    }

    /// Answer `method path` with `status` and a raw body from now on.
    pub fn stub(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.data
            .lock()
            .unwrap()
            .failures
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub fn set_import_result(&self, result: Value) {
        self.data.lock().unwrap().import_result = Some(result);
    }

    /// Every authenticated request answers 401 from now on.
    pub fn revoke_token(&self) {
        self.data.lock().unwrap().token_revoked = true;
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn requests(&self) -> Vec<Recorded> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Non-GET requests, in order, as `"METHOD /path"`.
    pub fn writes(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::GET)
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.data.lock().unwrap().requests.clear();
    }

    pub fn tables_of(&self, event: &Value) -> Vec<Value> {
        let data = self.data.lock().unwrap();
        data.tables
            .get(&id_of(&event["id"]))
            .cloned()
            .unwrap_or_default()
    }

    pub fn registrations_of(&self, event: &Value) -> Vec<Value> {
        let data = self.data.lock().unwrap();
        data.registrations
            .get(&id_of(&event["id"]))
            .cloned()
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<Value> {
        self.data.lock().unwrap().events.clone()
    }
}

fn id_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn free_table(id: i64, event_id: &Value, position: u32) -> Value {
    json!({
        "id": id,
        "event_id": event_id,
        "status": "free",
        "position": position,
        "label": null,
        "current_assignment_id": null,
        "assignment_status": null,
        "assignment_created_at": null,
        "started_at": null,
        "notified_at": null,
        "ended_at": null,
        "player1": null,
        "player2": null,
    })
}

const ASSIGNMENT_FIELDS: [&str; 7] = [
    "current_assignment_id",
    "assignment_status",
    "assignment_created_at",
    "started_at",
    "notified_at",
    "player1",
    "player2",
];

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn detail(status: StatusCode, message: &str) -> Response {
    reply(status, json!({ "detail": message }))
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

async fn handle(
    State(data): State<Arc<Mutex<Data>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header(CONTENT_TYPE);
    let is_json = content_type
        .as_deref()
        .is_some_and(|c| c.starts_with("application/json"));
    let body: Value = if is_json {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    } else {
        Value::Null
    };

    let mut data = data.lock().unwrap();
    let authorization = header(AUTHORIZATION);
    data.requests.push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        content_type,
        body: body.clone(),
    });

    if let Some((status, text)) = data.failures.get(&(method.clone(), path.clone())) {
        return (*status, text.clone()).into_response();
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let segments = segments.as_slice();

    match (method.as_str(), segments) {
        ("POST", ["auth", "login"]) => {
            if body["email"] == EMAIL && body["password"] == PASSWORD {
                reply(
                    StatusCode::OK,
                    json!({
                        "agent": {"id": 1, "full_name": "Front Desk", "email": EMAIL},
                        "token": TOKEN,
                    }),
                )
            } else {
                detail(StatusCode::UNAUTHORIZED, "Invalid credentials")
            }
        }
        ("POST", ["agents"]) => reply(
            StatusCode::CREATED,
            json!({"id": 2, "full_name": body["full_name"], "email": body["email"]}),
        ),
        _ if data.token_revoked => detail(StatusCode::UNAUTHORIZED, "Token expired"),
        _ if authorization.as_deref() != Some(format!("Bearer {}", TOKEN).as_str()) => {
            detail(StatusCode::UNAUTHORIZED, "Not authenticated")
        }

        // Events
        ("GET", ["events"]) => reply(StatusCode::OK, Value::from(data.events.clone())),
        ("POST", ["events"]) => {
            let id = format!("evt-{}", data.next_id());
            let event = json!({
                "id": id,
                "name": body["name"],
                "tables_count": body["tables_count"],
                "location": body["location"],
                "starts_at": body["starts_at"],
            });
            data.events.push(event.clone());
            reply(StatusCode::CREATED, event)
        }
        ("DELETE", ["events", event_id]) => {
            data.events.retain(|e| id_of(&e["id"]) != *event_id);
            data.tables.remove(*event_id);
            data.registrations.remove(*event_id);
            StatusCode::NO_CONTENT.into_response()
        }

        // Tables
        ("GET", ["events", event_id, "tables", "board"]) => reply(
            StatusCode::OK,
            Value::from(data.tables.get(*event_id).cloned().unwrap_or_default()),
        ),
        ("POST", ["events", event_id, "tables", "seed"]) => {
            let Some(event) = data.events.iter().find(|e| id_of(&e["id"]) == *event_id).cloned()
            else {
                return detail(StatusCode::NOT_FOUND, "Event not found");
            };
            let count = body["count"]
                .as_u64()
                .or_else(|| event["tables_count"].as_u64())
                .unwrap_or(0) as u32;
            let start_at = body["start_at"].as_u64().unwrap_or(1) as u32;
            if body["reset"] == true {
                data.tables.remove(*event_id);
            }
            let mut created = Vec::new();
            for position in start_at..start_at + count {
                let id = data.next_id();
                created.push(free_table(id, &event["id"], position));
            }
            data.tables
                .entry(event_id.to_string())
                .or_default()
                .extend(created.clone());
            reply(StatusCode::CREATED, Value::from(created))
        }
        ("POST", ["events", event_id, "tables", "pos", position]) => {
            let Ok(position) = position.parse::<u32>() else {
                return detail(StatusCode::UNPROCESSABLE_ENTITY, "Invalid position");
            };
            let id = data.next_id();
            let table = free_table(id, &Value::from(event_id.to_string()), position);
            data.tables
                .entry(event_id.to_string())
                .or_default()
                .push(table.clone());
            reply(StatusCode::CREATED, table)
        }
        ("POST", ["events", event_id, "tables", "swap"]) => {
            let a = id_of(&body["table_a_id"]);
            let b = id_of(&body["table_b_id"]);
            let tables = data.tables.entry(event_id.to_string()).or_default();
            let (Some(ia), Some(ib)) = (
                tables.iter().position(|t| id_of(&t["id"]) == a),
                tables.iter().position(|t| id_of(&t["id"]) == b),
            ) else {
                return detail(StatusCode::NOT_FOUND, "Table not found");
            };
            for field in ASSIGNMENT_FIELDS {
                let left = tables[ia][field].clone();
                tables[ia][field] = tables[ib][field].clone();
                tables[ib][field] = left;
            }
            StatusCode::NO_CONTENT.into_response()
        }
        ("DELETE", ["events", event_id, "tables", table_id]) => {
            if let Some(tables) = data.tables.get_mut(*event_id) {
                tables.retain(|t| id_of(&t["id"]) != *table_id);
            }
            StatusCode::NO_CONTENT.into_response()
        }
        ("POST", ["events", event_id, "tables", table_id, action]) => {
            table_action(&mut data, event_id, table_id, action, &body)
        }
        ("POST", ["events", event_id, "assignments", assignment_id, "move"]) => {
            let target = id_of(&body["new_table_id"]);
            let tables = data.tables.entry(event_id.to_string()).or_default();
            let source = tables
                .iter()
                .position(|t| id_of(&t["current_assignment_id"]) == *assignment_id);
            let dest = tables.iter().position(|t| id_of(&t["id"]) == target);
            let (Some(source), Some(dest)) = (source, dest) else {
                return detail(StatusCode::NOT_FOUND, "Assignment not found");
            };
            if tables[dest]["status"] != "free" {
                return detail(StatusCode::CONFLICT, "Target table is occupied");
            }
            for field in ASSIGNMENT_FIELDS {
                tables[dest][field] = tables[source][field].take();
            }
            tables[dest]["status"] = json!("occupied");
            tables[source]["status"] = json!("free");
            StatusCode::NO_CONTENT.into_response()
        }

        // Registrations
        ("GET", ["events", event_id, "registrations"]) => reply(
            StatusCode::OK,
            Value::from(data.registrations.get(*event_id).cloned().unwrap_or_default()),
        ),
        ("POST", ["events", event_id, "registrations"]) => {
            let player_id = id_of(&body["player_id"]);
            let Some(player) = data.players.iter().find(|p| id_of(&p["id"]) == player_id).cloned()
            else {
                return detail(StatusCode::NOT_FOUND, "Player not found");
            };
            let already = data
                .registrations
                .get(*event_id)
                .is_some_and(|regs| regs.iter().any(|r| id_of(&r["player_id"]) == player_id));
            if already {
                return detail(StatusCode::BAD_REQUEST, "Player already registered");
            }
            let id = data.next_id();
            let registration = json!({
                "id": id,
                "event_id": event_id,
                "player_id": player["id"],
                "created_at": now(),
                "player": player,
            });
            data.registrations
                .entry(event_id.to_string())
                .or_default()
                .push(registration.clone());
            reply(StatusCode::CREATED, registration)
        }
        ("DELETE", ["events", event_id, "registrations", registration_id]) => {
            if let Some(regs) = data.registrations.get_mut(*event_id) {
                regs.retain(|r| id_of(&r["id"]) != *registration_id);
            }
            StatusCode::NO_CONTENT.into_response()
        }

        // Players
        ("GET", ["players"]) => reply(StatusCode::OK, Value::from(data.players.clone())),
        ("POST", ["players"]) => {
            let id = data.next_id();
            let player = json!({
                "id": id,
                "full_name": body["full_name"],
                "phone_number": body["phone_number"],
                "is_playing": false,
            });
            data.players.push(player.clone());
            reply(StatusCode::CREATED, player)
        }
        ("DELETE", ["players", "id", player_id]) => {
            data.players.retain(|p| id_of(&p["id"]) != *player_id);
            StatusCode::NO_CONTENT.into_response()
        }
        ("POST", ["players", "import"]) => {
            let result = data.import_result.clone().unwrap_or_else(|| {
                json!({"total_rows": 0, "created": 0, "skipped": 0, "errors": []})
            });
            reply(StatusCode::OK, result)
        }

        _ => detail(StatusCode::NOT_FOUND, "Not Found"),
    }
}

fn table_action(
    data: &mut Data,
    event_id: &str,
    table_id: &str,
    action: &str,
    body: &Value,
) -> Response {
    let assignment_id = data.next_id();
    let players = data.players.clone();
    let Some(table) = data
        .tables
        .get_mut(event_id)
        .and_then(|tables| tables.iter_mut().find(|t| id_of(&t["id"]) == table_id))
    else {
        return detail(StatusCode::NOT_FOUND, "Table not found");
    };

    let seated: Vec<String> = [&table["player1"], &table["player2"]]
        .iter()
        .filter(|p| !p.is_null())
        .map(|p| id_of(&p["id"]))
        .collect();

    let response = match action {
        "assign" => {
            if table["status"] != "free" {
                return detail(StatusCode::CONFLICT, "Table is occupied");
            }
            let slim = |key: &str| {
                let wanted = id_of(&body[key]);
                players
                    .iter()
                    .find(|p| id_of(&p["id"]) == wanted)
                    .map(|p| json!({"id": p["id"], "full_name": p["full_name"]}))
                    .unwrap_or(Value::Null)
            };
            table["status"] = json!("occupied");
            table["current_assignment_id"] = json!(assignment_id);
            table["assignment_status"] = json!("active");
            table["assignment_created_at"] = json!(now());
            table["player1"] = slim("player1_id");
            table["player2"] = slim("player2_id");
            if body["notify"] == true {
                table["notified_at"] = json!(now());
            }
            reply(StatusCode::CREATED, json!({"id": assignment_id}))
        }
        "free" => {
            table["status"] = json!("free");
            for field in ASSIGNMENT_FIELDS {
                table[field] = Value::Null;
            }
            reply(StatusCode::OK, table.clone())
        }
        "notify" => {
            table["notified_at"] = json!(now());
            reply(StatusCode::OK, table.clone())
        }
        "start-timer" => {
            table["started_at"] = json!(now());
            reply(StatusCode::OK, table.clone())
        }
        _ => return detail(StatusCode::NOT_FOUND, "Not Found"),
    };

    let playing = action == "assign";
    let now_seated: Vec<String> = [&table["player1"], &table["player2"]]
        .iter()
        .filter(|p| !p.is_null())
        .map(|p| id_of(&p["id"]))
        .collect();
    let touched = if playing { now_seated } else { seated };
    if matches!(action, "assign" | "free") {
        for player in data.players.iter_mut() {
            if touched.contains(&id_of(&player["id"])) {
                player["is_playing"] = json!(playing);
            }
        }
    }
    response
}

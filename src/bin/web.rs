//! Single binary web server: REST surface over the in-memory document store.
//! Run with: cargo run --bin web
//!
//! Plays both external collaborators: document writes through the API invoke
//! the matching engine handler with before/after snapshots (event delivery),
//! and bracket generation is exposed as a synchronous callable. Seed routes
//! (creating users, tournaments, matches, registrations) stand in for the
//! scheduling/registration flows the engine does not own.
//! Override bind with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use matchpoint_engine::models::{EngineError, MatchRecord, TournamentMatch};
use matchpoint_engine::store::{
    from_doc, match_path, registration_path, tournament_match_path, tournament_matches_collection,
    tournament_path, user_path, Document, DocumentStore, MemoryStore, Patch,
};
use matchpoint_engine::{
    generate_bracket, on_match_updated, on_registration_created, on_registration_deleted,
    on_tournament_match_updated,
};
use serde::Deserialize;
use serde_json::{json, Value};

type AppState = Data<MemoryStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBracketBody {
    #[serde(default)]
    caller_id: Option<String>,
}

/// Path segment: a single document id.
#[derive(Deserialize)]
struct IdPath {
    id: String,
}

/// Path segments: tournament id plus a child id (registration user or match).
#[derive(Deserialize)]
struct TournamentChildPath {
    id: String,
    child_id: String,
}

fn error_response(err: &EngineError) -> HttpResponse {
    let body = json!({ "error": err.kind(), "message": err.to_string() });
    match err {
        EngineError::InvalidArgument(_) | EngineError::FailedPrecondition(_) => {
            HttpResponse::BadRequest().json(body)
        }
        EngineError::Unauthenticated => HttpResponse::Unauthorized().json(body),
        EngineError::PermissionDenied(_) => HttpResponse::Forbidden().json(body),
        EngineError::NotFound(_) => HttpResponse::NotFound().json(body),
        EngineError::Internal(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "not-found", "message": format!("{what} not found") }))
}

/// Body must be a JSON object to become a document.
fn as_document(body: Value) -> Result<Document, HttpResponse> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(HttpResponse::BadRequest()
            .json(json!({ "error": "invalid-argument", "message": "expected a JSON object" }))),
    }
}

/// Partial update fields as a set-only patch.
fn patch_from(fields: &Document) -> Patch {
    let mut patch = Patch::new();
    for (field, value) in fields {
        patch = patch.set(field, value.clone());
    }
    patch
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "matchpoint-engine",
    })
}

/// Seed/replace a player profile document.
#[post("/api/users/{id}")]
async fn api_put_user(state: AppState, path: Path<IdPath>, body: Json<Value>) -> HttpResponse {
    let doc = match as_document(body.into_inner()) {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };
    state.set(&user_path(&path.id), doc.clone());
    HttpResponse::Ok().json(doc)
}

#[get("/api/users/{id}")]
async fn api_get_user(state: AppState, path: Path<IdPath>) -> HttpResponse {
    match state.get(&user_path(&path.id)) {
        Ok(Some(doc)) => HttpResponse::Ok().json(doc),
        Ok(None) => not_found("User"),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({ "error": "internal", "message": e.to_string() })),
    }
}

/// Seed/replace a tournament document.
#[post("/api/tournaments/{id}")]
async fn api_put_tournament(state: AppState, path: Path<IdPath>, body: Json<Value>) -> HttpResponse {
    let doc = match as_document(body.into_inner()) {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };
    state.set(&tournament_path(&path.id), doc.clone());
    HttpResponse::Ok().json(doc)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    match state.get(&tournament_path(&path.id)) {
        Ok(Some(doc)) => HttpResponse::Ok().json(doc),
        Ok(None) => not_found("Tournament"),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({ "error": "internal", "message": e.to_string() })),
    }
}

/// Register a user for a tournament; fires the registration-created handler.
#[post("/api/tournaments/{id}/registrations/{child_id}")]
async fn api_create_registration(state: AppState, path: Path<TournamentChildPath>) -> HttpResponse {
    let doc_path = registration_path(&path.id, &path.child_id);
    let mut doc = Document::new();
    doc.insert(
        "registeredAt".to_string(),
        json!(chrono::Utc::now().to_rfc3339()),
    );
    state.set(&doc_path, doc.clone());
    if let Err(e) = on_registration_created(state.as_ref(), &path.id, &path.child_id) {
        return error_response(&e);
    }
    HttpResponse::Ok().json(doc)
}

/// Withdraw a registration; fires the registration-deleted handler.
#[delete("/api/tournaments/{id}/registrations/{child_id}")]
async fn api_delete_registration(state: AppState, path: Path<TournamentChildPath>) -> HttpResponse {
    let doc_path = registration_path(&path.id, &path.child_id);
    if !state.delete(&doc_path) {
        return not_found("Registration");
    }
    if let Err(e) = on_registration_deleted(state.as_ref(), &path.id, &path.child_id) {
        return error_response(&e);
    }
    HttpResponse::Ok().json(json!({ "deleted": true }))
}

/// The synchronous callable: generate the tournament's bracket.
#[post("/api/tournaments/{id}/bracket/generate")]
async fn api_generate_bracket(
    state: AppState,
    path: Path<IdPath>,
    body: Option<Json<GenerateBracketBody>>,
) -> HttpResponse {
    let caller = body.as_ref().and_then(|b| b.caller_id.clone());
    match generate_bracket(state.as_ref(), &path.id, caller.as_deref()) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_tournament_matches(state: AppState, path: Path<IdPath>) -> HttpResponse {
    match state.query(&tournament_matches_collection(&path.id), &[]) {
        Ok(matches) => {
            let list: Vec<Value> = matches
                .into_iter()
                .map(|(id, mut doc)| {
                    doc.insert("id".to_string(), json!(id));
                    Value::Object(doc)
                })
                .collect();
            HttpResponse::Ok().json(list)
        }
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({ "error": "internal", "message": e.to_string() })),
    }
}

/// Seed/replace a casual match document.
#[post("/api/matches/{id}")]
async fn api_put_match(state: AppState, path: Path<IdPath>, body: Json<Value>) -> HttpResponse {
    let doc = match as_document(body.into_inner()) {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };
    state.set(&match_path(&path.id), doc.clone());
    HttpResponse::Ok().json(doc)
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    match state.get(&match_path(&path.id)) {
        Ok(Some(doc)) => HttpResponse::Ok().json(doc),
        Ok(None) => not_found("Match"),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({ "error": "internal", "message": e.to_string() })),
    }
}

/// Update a casual match and deliver the change to the stats handler.
#[put("/api/matches/{id}")]
async fn api_update_match(state: AppState, path: Path<IdPath>, body: Json<Value>) -> HttpResponse {
    let fields = match as_document(body.into_inner()) {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };
    let doc_path = match_path(&path.id);
    let before_doc = match state.get(&doc_path) {
        Ok(Some(doc)) => doc,
        Ok(None) => return not_found("Match"),
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "internal", "message": e.to_string() }))
        }
    };
    if let Err(e) = state.update(&doc_path, patch_from(&fields)) {
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "internal", "message": e.to_string() }));
    }
    let after_doc = match state.get(&doc_path) {
        Ok(Some(doc)) => doc,
        _ => return not_found("Match"),
    };

    let before: MatchRecord = match from_doc(before_doc) {
        Ok(m) => m,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "internal", "message": e.to_string() }))
        }
    };
    let after: MatchRecord = match from_doc(after_doc.clone()) {
        Ok(m) => m,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "internal", "message": e.to_string() }))
        }
    };
    if let Err(e) = on_match_updated(state.as_ref(), &path.id, &before, &after) {
        return error_response(&e);
    }
    HttpResponse::Ok().json(after_doc)
}

/// Update a tournament match and deliver the change to the bracket advancer.
#[put("/api/tournaments/{id}/matches/{child_id}")]
async fn api_update_tournament_match(
    state: AppState,
    path: Path<TournamentChildPath>,
    body: Json<Value>,
) -> HttpResponse {
    let fields = match as_document(body.into_inner()) {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };
    let doc_path = tournament_match_path(&path.id, &path.child_id);
    let before_doc = match state.get(&doc_path) {
        Ok(Some(doc)) => doc,
        Ok(None) => return not_found("Tournament match"),
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "internal", "message": e.to_string() }))
        }
    };
    if let Err(e) = state.update(&doc_path, patch_from(&fields)) {
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "internal", "message": e.to_string() }));
    }
    let after_doc = match state.get(&doc_path) {
        Ok(Some(doc)) => doc,
        _ => return not_found("Tournament match"),
    };

    let before: TournamentMatch = match from_doc(before_doc) {
        Ok(m) => m,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "internal", "message": e.to_string() }))
        }
    };
    let after: TournamentMatch = match from_doc(after_doc.clone()) {
        Ok(m) => m,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "internal", "message": e.to_string() }))
        }
    };
    if let Err(e) =
        on_tournament_match_updated(state.as_ref(), &path.id, &path.child_id, &before, &after)
    {
        return error_response(&e);
    }
    HttpResponse::Ok().json(after_doc)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(MemoryStore::new());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_put_user)
            .service(api_get_user)
            .service(api_put_tournament)
            .service(api_get_tournament)
            .service(api_create_registration)
            .service(api_delete_registration)
            .service(api_generate_bracket)
            .service(api_list_tournament_matches)
            .service(api_put_match)
            .service(api_get_match)
            .service(api_update_match)
            .service(api_update_tournament_match)
    })
    .bind(bind)?
    .run()
    .await
}

//! In-memory stand-in for the speed-dating REST API.
//!
//! Seeded with one account (`Admin`) and one speed-dating event. Form
//! validation failures answer 400 with the `errors.children` body the real
//! server produces, so clients can be tested against it end to end.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const SEEDED_USERNAME: &str = "Admin";
pub const SEEDED_EMAIL: &str = "dario.anongba@epfl.ch";
pub const SEEDED_FACEBOOK_ID: &str = "1";
pub const SEEDED_EVENT_ID: u32 = 1;

/// Form fields in the order the sign-up form declares them.
pub const FORM_FIELDS: [&str; 8] = [
    "email",
    "username",
    "firstName",
    "lastName",
    "gender",
    "birthDate",
    "facebookId",
    "plainPassword",
];

const BIRTH_DATE_INPUT: &str = "%d/%m/%Y";
const BIRTH_DATE_OUTPUT: &str = "%Y-%m-%dT00:00:00+0100";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: u32,
    pub zip_code: u32,
    pub city: String,
    pub province: String,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Establishment {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: Address,
    pub phone_number: String,
    pub max_seats: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u32,
    pub name: String,
    pub location: Location,
    pub max_people: u32,
    pub date_begin: String,
    pub date_end: String,
    pub base_price: f64,
    pub state: String,
    pub description: String,
    pub image_path: String,
    pub men_seats: u32,
    pub women_seats: u32,
    pub men_registered: u32,
    pub women_registered: u32,
    pub min_age: u32,
    pub max_age: u32,
    pub establishment: Establishment,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub facebook_id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub home_phone: String,
    pub mobile_phone: String,
    pub address: String,
    pub profession: String,
    pub locked: bool,
    pub enabled: bool,
    pub gender: String,
    pub birth_date: String,
    pub locations_of_interest: Vec<Location>,
    pub events_attended: Vec<Event>,
}

/// Sign-up form. Absent fields read as empty and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserForm {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: String,
    pub facebook_id: String,
    pub plain_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub event: u32,
}

#[derive(Clone, Debug)]
struct Registration {
    username: String,
    event: u32,
}

#[derive(Debug)]
pub struct Store {
    users: BTreeMap<String, User>,
    events: BTreeMap<u32, Event>,
    registrations: HashMap<u32, Registration>,
    next_user_id: u32,
    next_registration_id: u32,
}

impl Store {
    pub fn seeded() -> Self {
        let lausanne = Location {
            id: 1,
            name: "Lausanne".to_string(),
        };
        let admin = User {
            id: 1,
            facebook_id: SEEDED_FACEBOOK_ID.to_string(),
            username: SEEDED_USERNAME.to_string(),
            email: SEEDED_EMAIL.to_string(),
            first_name: "Dario".to_string(),
            last_name: "Anongba".to_string(),
            home_phone: String::new(),
            mobile_phone: "0797771111".to_string(),
            address: "Avenue de la Gare 1, 1003 Lausanne".to_string(),
            profession: "Student".to_string(),
            locked: false,
            enabled: true,
            gender: "male".to_string(),
            birth_date: "1993-02-18T00:00:00+0100".to_string(),
            locations_of_interest: vec![lausanne.clone()],
            events_attended: Vec::new(),
        };
        let event = Event {
            kind: "speed_dating".to_string(),
            id: SEEDED_EVENT_ID,
            name: "Speed dating 20-30 ans".to_string(),
            location: lausanne,
            max_people: 20,
            date_begin: "2015-12-24T19:00:00+0100".to_string(),
            date_end: "2015-12-24T23:00:00+0100".to_string(),
            base_price: 25.5,
            state: "pending".to_string(),
            description: "Rencontres rapides autour d'un verre.".to_string(),
            image_path: "images/events/1.jpg".to_string(),
            men_seats: 10,
            women_seats: 10,
            men_registered: 0,
            women_registered: 0,
            min_age: 20,
            max_age: 30,
            establishment: Establishment {
                id: 1,
                name: "Le Bourg".to_string(),
                kind: "bar".to_string(),
                address: Address {
                    street: "Rue de Bourg".to_string(),
                    number: 51,
                    zip_code: 1003,
                    city: "Lausanne".to_string(),
                    province: "Vaud".to_string(),
                    country: "Suisse".to_string(),
                },
                phone_number: "021 311 11 11".to_string(),
                max_seats: 40,
            },
        };
        Self {
            users: BTreeMap::from([(admin.username.clone(), admin)]),
            events: BTreeMap::from([(event.id, event)]),
            registrations: HashMap::new(),
            next_user_id: 2,
            next_registration_id: 1,
        }
    }

    /// Field messages for `form`, empty when the form is acceptable.
    fn validate(&self, form: &UserForm) -> BTreeMap<&'static str, Vec<&'static str>> {
        let mut errors: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
        let required = [
            ("email", &form.email),
            ("username", &form.username),
            ("firstName", &form.first_name),
            ("lastName", &form.last_name),
            ("plainPassword", &form.plain_password),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.entry(field).or_default().push("This value should not be blank.");
            }
        }
        if !matches!(form.gender.as_str(), "male" | "female") {
            errors.entry("gender").or_default().push("Choose a valid gender");
        }
        if NaiveDate::parse_from_str(&form.birth_date, BIRTH_DATE_INPUT).is_err() {
            errors.entry("birthDate").or_default().push("This value is not valid.");
        }
        if self.users.values().any(|user| user.email == form.email) {
            errors.entry("email").or_default().push("The email is already used");
        }
        if self.users.contains_key(&form.username) {
            errors.entry("username").or_default().push("The username is already used");
        }
        errors
    }

    fn registration_errors(&self, form: &RegistrationForm) -> BTreeMap<&'static str, Vec<&'static str>> {
        let mut errors: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
        if !self.users.contains_key(&form.username) {
            errors.entry("username").or_default().push("This value is not valid.");
        }
        if !self.events.contains_key(&form.event) {
            errors.entry("event").or_default().push("This value is not valid.");
        }
        let already = self
            .registrations
            .values()
            .any(|r| r.username == form.username && r.event == form.event);
        if already {
            errors.entry("event").or_default().push("Already registered to this event");
        }
        errors
    }

    /// Adjust the registered counter of `event` for a user of `gender`.
    fn count(&mut self, event: u32, gender: &str, delta: i32) {
        if let Some(event) = self.events.get_mut(&event) {
            let counter = match gender {
                "female" => &mut event.women_registered,
                _ => &mut event.men_registered,
            };
            *counter = counter.saturating_add_signed(delta);
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/{username}", get(get_user).delete(delete_user))
        .route("/api/users/{username}/events", get(registered_events))
        .route("/api/facebook/users/{facebook_id}", get(get_user_by_facebook_id))
        .route("/api/events", get(list_events))
        .route("/api/events/{id}", get(get_event))
        .route("/api/registrations", post(register))
        .route("/api/registrations/{id}", delete(unregister))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The 400 body of a failed form, with every declared field present.
pub fn validation_body(fields: &[&str], errors: &BTreeMap<&'static str, Vec<&'static str>>) -> Value {
    let children: Map<String, Value> = fields
        .iter()
        .map(|field| {
            let child = match errors.get(*field) {
                Some(messages) => json!({ "errors": messages }),
                None => json!({}),
            };
            (field.to_string(), child)
        })
        .collect();
    json!({
        "code": 400,
        "message": "Validation Failed",
        "errors": { "children": children },
    })
}

fn bad_request(fields: &[&str], errors: &BTreeMap<&'static str, Vec<&'static str>>) -> Response {
    tracing::info!(?errors, "rejected form");
    (StatusCode::BAD_REQUEST, Json(validation_body(fields, errors))).into_response()
}

async fn get_user(State(db): State<Db>, Path(username): Path<String>) -> Result<Json<User>, StatusCode> {
    let store = db.read().await;
    store.users.get(&username).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_user_by_facebook_id(
    State(db): State<Db>,
    Path(facebook_id): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let store = db.read().await;
    store
        .users
        .values()
        .find(|user| user.facebook_id == facebook_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_user(State(db): State<Db>, Json(form): Json<UserForm>) -> Response {
    let mut store = db.write().await;
    let errors = store.validate(&form);
    if !errors.is_empty() {
        return bad_request(&FORM_FIELDS, &errors);
    }
    // Validated above, so the date parses.
    let birth_date = match NaiveDate::parse_from_str(&form.birth_date, BIRTH_DATE_INPUT) {
        Ok(date) => date.format(BIRTH_DATE_OUTPUT).to_string(),
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    let user = User {
        id: store.next_user_id,
        facebook_id: form.facebook_id,
        username: form.username,
        email: form.email,
        first_name: form.first_name,
        last_name: form.last_name,
        home_phone: String::new(),
        mobile_phone: String::new(),
        address: String::new(),
        profession: String::new(),
        locked: false,
        enabled: true,
        gender: form.gender,
        birth_date,
        locations_of_interest: Vec::new(),
        events_attended: Vec::new(),
    };
    store.next_user_id += 1;
    store.users.insert(user.username.clone(), user.clone());
    tracing::info!(username = %user.username, id = user.id, "created user");
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn delete_user(State(db): State<Db>, Path(username): Path<String>) -> StatusCode {
    let mut store = db.write().await;
    let Some(user) = store.users.remove(&username) else {
        return StatusCode::NOT_FOUND;
    };
    let dropped: Vec<u32> = store
        .registrations
        .iter()
        .filter(|(_, r)| r.username == username)
        .map(|(id, _)| *id)
        .collect();
    for id in dropped {
        if let Some(registration) = store.registrations.remove(&id) {
            store.count(registration.event, &user.gender, -1);
        }
    }
    tracing::info!(%username, "deleted user");
    StatusCode::NO_CONTENT
}

async fn registered_events(
    State(db): State<Db>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Event>>, StatusCode> {
    let store = db.read().await;
    if !store.users.contains_key(&username) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut ids: Vec<u32> = store
        .registrations
        .values()
        .filter(|r| r.username == username)
        .map(|r| r.event)
        .collect();
    ids.sort_unstable();
    Ok(Json(ids.iter().filter_map(|id| store.events.get(id)).cloned().collect()))
}

async fn list_events(State(db): State<Db>) -> Json<Vec<Event>> {
    let store = db.read().await;
    Json(store.events.values().cloned().collect())
}

async fn get_event(State(db): State<Db>, Path(id): Path<u32>) -> Result<Json<Event>, StatusCode> {
    let store = db.read().await;
    store.events.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn register(State(db): State<Db>, Json(form): Json<RegistrationForm>) -> Response {
    let mut store = db.write().await;
    let errors = store.registration_errors(&form);
    if !errors.is_empty() {
        return bad_request(&["username", "event"], &errors);
    }
    let id = store.next_registration_id;
    store.next_registration_id += 1;
    let gender = store
        .users
        .get(&form.username)
        .map(|user| user.gender.clone())
        .unwrap_or_default();
    store.count(form.event, &gender, 1);
    store.registrations.insert(
        id,
        Registration {
            username: form.username,
            event: form.event,
        },
    );
    tracing::info!(id, "created registration");
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/registrations/{id}"))],
    )
        .into_response()
}

async fn unregister(State(db): State<Db>, Path(id): Path<u32>) -> StatusCode {
    let mut store = db.write().await;
    let Some(registration) = store.registrations.remove(&id) else {
        return StatusCode::NOT_FOUND;
    };
    let gender = store
        .users
        .get(&registration.username)
        .map(|user| user.gender.clone())
        .unwrap_or_default();
    store.count(registration.event, &gender, -1);
    StatusCode::NO_CONTENT
}

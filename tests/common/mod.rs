//! In-process stand-in for the pet-store API.
//!
//! Mirrors the responses of the hosted service closely enough for the full
//! scenario catalogue to pass: echoing create/update, one successful read
//! and delete before the pet is gone, and the 405/415 rejections.

#![allow(dead_code)]

use petstore_scenarios::fixture::{SAMPLE_PET_ID, sample_pet};
use petstore_scenarios::model::{Pet, PetStatus};
use petstore_scenarios::{PetStoreClient, SuiteConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, Respond, ResponseTemplate};

pub const API_PREFIX: &str = "/v2";

/// Matches requests whose body is empty.
pub struct EmptyBody;

impl Match for EmptyBody {
    fn matches(&self, request: &Request) -> bool {
        request.body.is_empty()
    }
}

/// Echoes the request body back as JSON.
pub struct EchoJson;

impl Respond for EchoJson {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(request.body.clone(), "application/json")
    }
}

pub fn api_path(suffix: &str) -> String {
    format!("{API_PREFIX}{suffix}")
}

pub fn client_for(server: &MockServer) -> PetStoreClient {
    let config = SuiteConfig {
        base_url: format!("{}{API_PREFIX}", server.uri()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    PetStoreClient::new(&config).unwrap()
}

pub fn pet_with_status(id: i64, status: PetStatus) -> Pet {
    let mut pet = sample_pet();
    pet.id = id;
    pet.status = status;
    pet
}

pub fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "code": 1,
        "type": "error",
        "message": "Pet not found",
    }))
}

pub async fn mount_create_and_update(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(api_path("/pet")))
        .and(header("content-type", "application/json"))
        .and(EmptyBody)
        .respond_with(ResponseTemplate::new(405))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/pet")))
        .and(header("content-type", "application/json"))
        .respond_with(EchoJson)
        .with_priority(2)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/pet")))
        .respond_with(ResponseTemplate::new(415))
        .with_priority(3)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(api_path("/pet")))
        .and(header("content-type", "application/json"))
        .respond_with(EchoJson)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(api_path("/pet/5")))
        .respond_with(ResponseTemplate::new(405))
        .mount(server)
        .await;
}

/// The pet can be read and deleted exactly once; afterwards both are 404.
pub async fn mount_item(server: &MockServer) {
    let item = api_path(&format!("/pet/{SAMPLE_PET_ID}"));

    Mock::given(method("GET"))
        .and(path(item.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_pet()))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(item.clone()))
        .respond_with(not_found())
        .with_priority(2)
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(item.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "type": "unknown",
            "message": SAMPLE_PET_ID.to_string(),
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(item))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(2)
        .mount(server)
        .await;
}

pub async fn mount_find_by_status(server: &MockServer) {
    let find = api_path("/pet/findByStatus");

    Mock::given(method("GET"))
        .and(path(find.clone()))
        .and(query_param("status", "available"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            pet_with_status(1, PetStatus::Available),
            pet_with_status(2, PetStatus::Available),
        ]))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(find.clone()))
        .and(query_param("status", "pending"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vec![pet_with_status(3, PetStatus::Pending)]),
        )
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(find.clone()))
        .and(query_param("status", "sold"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(find))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .with_priority(5)
        .mount(server)
        .await;
}

/// A server that behaves like the hosted pet store for one full run.
pub async fn pet_store() -> MockServer {
    let server = MockServer::start().await;
    mount_create_and_update(&server).await;
    mount_item(&server).await;
    mount_find_by_status(&server).await;
    server
}

//! # Pet lifecycle scenarios
//!
//! Each scenario sends its request(s) and checks the response. Scenarios run
//! in ascending priority: create, read, update, delete, then the status
//! queries and the negative paths that reuse the now-stale id.
//!
//! A failing scenario does not stop the run. Later scenarios that need the
//! captured pet id fail on their own if create never produced one.

use std::fmt::{self, Display};
use std::time::Instant;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::{Result, SuiteError};
use crate::fixture::{UPDATED_PET_NAME, sample_pet};
use crate::http::client::PetStoreClient;
use crate::http::method::HttpMethod;
use crate::http::request::RequestInput;
use crate::http::response::HttpResponse;
use crate::model::{Pet, PetStatus};
use crate::testing::{Assertion, AssertionResult, RunReport, ScenarioOutcome};

pub const PET_PATH: &str = "/pet";
pub const PET_ITEM_PATH: &str = "/pet/{id}";
pub const FIND_BY_STATUS_PATH: &str = "/pet/findByStatus";

pub const PET_NOT_FOUND: &str = "Pet not found";

/// Id used by the wrong-verb update; any id works since the route rejects PUT.
const ITEM_UPDATE_ID: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scenario {
    CreatePet,
    GetPet,
    UpdatePet,
    DeletePet,
    FindByStatus,
    FindByUnknownQuery,
    GetDeletedPet,
    CreateWithoutBody,
    CreateWithWrongContentType,
    UpdateItemPath,
    DeleteDeletedPet,
}

impl Scenario {
    pub const ALL: [Scenario; 11] = [
        Scenario::CreatePet,
        Scenario::GetPet,
        Scenario::UpdatePet,
        Scenario::DeletePet,
        Scenario::FindByStatus,
        Scenario::FindByUnknownQuery,
        Scenario::GetDeletedPet,
        Scenario::CreateWithoutBody,
        Scenario::CreateWithWrongContentType,
        Scenario::UpdateItemPath,
        Scenario::DeleteDeletedPet,
    ];

    pub fn priority(self) -> u8 {
        match self {
            Scenario::CreatePet => 0,
            Scenario::GetPet => 1,
            Scenario::UpdatePet => 2,
            Scenario::DeletePet => 3,
            Scenario::FindByStatus => 4,
            Scenario::FindByUnknownQuery => 5,
            Scenario::GetDeletedPet => 6,
            Scenario::CreateWithoutBody => 7,
            Scenario::CreateWithWrongContentType => 8,
            Scenario::UpdateItemPath => 9,
            Scenario::DeleteDeletedPet => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::CreatePet => "create_pet",
            Scenario::GetPet => "get_pet",
            Scenario::UpdatePet => "update_pet",
            Scenario::DeletePet => "delete_pet",
            Scenario::FindByStatus => "find_by_status",
            Scenario::FindByUnknownQuery => "find_by_unknown_query",
            Scenario::GetDeletedPet => "get_deleted_pet",
            Scenario::CreateWithoutBody => "create_without_body",
            Scenario::CreateWithWrongContentType => "create_with_wrong_content_type",
            Scenario::UpdateItemPath => "update_item_path",
            Scenario::DeleteDeletedPet => "delete_deleted_pet",
        }
    }

    pub fn from_name(name: &str) -> Option<Scenario> {
        Scenario::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::CreatePet => "POST /pet with the sample pet",
            Scenario::GetPet => "GET /pet/{id} returns the created pet",
            Scenario::UpdatePet => "PUT /pet renames the pet",
            Scenario::DeletePet => "DELETE /pet/{id} echoes the id",
            Scenario::FindByStatus => "GET /pet/findByStatus filters by each status",
            Scenario::FindByUnknownQuery => "GET /pet/findByStatus with an unknown query is empty",
            Scenario::GetDeletedPet => "GET /pet/{id} after delete is 404",
            Scenario::CreateWithoutBody => "POST /pet without a body is 405",
            Scenario::CreateWithWrongContentType => "POST /pet with a text body is 415",
            Scenario::UpdateItemPath => "PUT /pet/{id} is 405",
            Scenario::DeleteDeletedPet => "DELETE /pet/{id} after delete is 404",
        }
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State carried from one scenario to the next.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    pub pet: Pet,
    pub pet_id: Option<i64>,
}

impl ScenarioContext {
    pub fn new(pet: Pet) -> Self {
        Self { pet, pet_id: None }
    }

    pub fn require_id(&self) -> Result<i64> {
        self.pet_id.ok_or(SuiteError::MissingPetId)
    }
}

/// Field-by-field expectations for a pet echoed back by the service.
pub fn pet_assertions(pet: &Pet) -> Vec<Assertion> {
    let mut assertions = vec![
        Assertion::json_eq("id", pet.id),
        Assertion::json_eq("category.id", pet.category.id),
        Assertion::json_eq("category.name", pet.category.name.as_str()),
        Assertion::json_eq("name", pet.name.as_str()),
        Assertion::json_eq("photoUrls", pet.photo_urls.clone()),
    ];
    for (i, tag) in pet.tags.iter().enumerate() {
        assertions.push(Assertion::json_eq(&format!("tags[{i}].id"), tag.id));
        assertions.push(Assertion::json_eq(&format!("tags[{i}].name"), tag.name.as_str()));
    }
    assertions.push(Assertion::json_eq("status", pet.status.as_str()));
    assertions
}

fn check(response: &HttpResponse, assertions: &[Assertion]) -> Vec<AssertionResult> {
    assertions.iter().map(|a| a.evaluate(response)).collect()
}

fn check_pet(response: &HttpResponse, status: u16, pet: &Pet) -> Vec<AssertionResult> {
    let mut assertions = vec![Assertion::status(status)];
    assertions.extend(pet_assertions(pet));
    check(response, &assertions)
}

pub async fn run_scenario(
    client: &mut PetStoreClient,
    ctx: &mut ScenarioContext,
    scenario: Scenario,
) -> ScenarioOutcome {
    info!(scenario = scenario.name(), priority = scenario.priority(), "running scenario");
    let started = Instant::now();

    let (assertions, error) = match execute(client, ctx, scenario).await {
        Ok(assertions) => (assertions, None),
        Err(err) => (Vec::new(), Some(err.to_string())),
    };

    let passed = error.is_none() && assertions.iter().all(|a| a.passed);
    let outcome = ScenarioOutcome {
        scenario: scenario.name().to_string(),
        priority: scenario.priority(),
        passed,
        assertions,
        error,
        duration_ms: started.elapsed().as_millis(),
    };

    if outcome.passed {
        info!(scenario = scenario.name(), duration_ms = outcome.duration_ms, "scenario passed");
    } else {
        if let Some(ref error) = outcome.error {
            warn!(scenario = scenario.name(), %error, "scenario errored");
        }
        for failed in outcome.failed_assertions() {
            warn!(scenario = scenario.name(), "{}", failed.message);
        }
    }

    outcome
}

async fn execute(
    client: &mut PetStoreClient,
    ctx: &mut ScenarioContext,
    scenario: Scenario,
) -> Result<Vec<AssertionResult>> {
    match scenario {
        Scenario::CreatePet => {
            let input = RequestInput::new(HttpMethod::Post, PET_PATH)
                .accept_json()
                .json_body(&ctx.pet)?;
            let response = client.send(input).await?;
            let results = check_pet(&response, 200, &ctx.pet);
            if let Some(id) = response.json().ok().and_then(|body| body["id"].as_i64()) {
                ctx.pet_id = Some(id);
            }
            Ok(results)
        }
        Scenario::GetPet => {
            let input = RequestInput::new(HttpMethod::Get, PET_ITEM_PATH)
                .path_param("id", ctx.require_id()?)
                .accept_json();
            let response = client.send(input).await?;
            Ok(check_pet(&response, 200, &ctx.pet))
        }
        Scenario::UpdatePet => {
            ctx.pet.name = UPDATED_PET_NAME.to_string();
            let input = RequestInput::new(HttpMethod::Put, PET_PATH)
                .accept_json()
                .json_body(&ctx.pet)?;
            let response = client.send(input).await?;
            Ok(check_pet(&response, 200, &ctx.pet))
        }
        Scenario::DeletePet => {
            let id = ctx.require_id()?;
            let input = RequestInput::new(HttpMethod::Delete, PET_ITEM_PATH)
                .path_param("id", id)
                .accept_json();
            let response = client.send(input).await?;
            Ok(check(
                &response,
                &[Assertion::status(200), Assertion::json_eq("message", id)],
            ))
        }
        Scenario::FindByStatus => {
            let mut results = Vec::new();
            for status in PetStatus::ALL {
                results.extend(find_by_status(client, status).await?);
            }
            Ok(results)
        }
        Scenario::FindByUnknownQuery => {
            let input = RequestInput::new(HttpMethod::Get, FIND_BY_STATUS_PATH)
                .query("insider", "insiderCaseStudy")
                .accept_json();
            let response = client.send(input).await?;
            Ok(check(&response, &[Assertion::status(200), Assertion::body_eq("[]")]))
        }
        Scenario::GetDeletedPet => {
            let input = RequestInput::new(HttpMethod::Get, PET_ITEM_PATH)
                .path_param("id", ctx.require_id()?)
                .accept_json();
            let response = client.send(input).await?;
            Ok(check(
                &response,
                &[Assertion::status(404), Assertion::json_eq("message", PET_NOT_FOUND)],
            ))
        }
        Scenario::CreateWithoutBody => {
            let input = RequestInput::new(HttpMethod::Post, PET_PATH).content_type_json();
            let response = client.send(input).await?;
            Ok(check(&response, &[Assertion::status(405)]))
        }
        Scenario::CreateWithWrongContentType => {
            let body = json!({ "hello": "world" }).to_string();
            let input = RequestInput::new(HttpMethod::Post, PET_PATH).text_body(body);
            let response = client.send(input).await?;
            Ok(check(&response, &[Assertion::status(415)]))
        }
        Scenario::UpdateItemPath => {
            let input = RequestInput::new(HttpMethod::Put, PET_ITEM_PATH)
                .path_param("id", ITEM_UPDATE_ID)
                .json_body(&ctx.pet)?;
            let response = client.send(input).await?;
            Ok(check(&response, &[Assertion::status(405)]))
        }
        Scenario::DeleteDeletedPet => {
            let input = RequestInput::new(HttpMethod::Delete, PET_ITEM_PATH)
                .path_param("id", ctx.require_id()?)
                .accept_json();
            let response = client.send(input).await?;
            Ok(check(&response, &[Assertion::status(404)]))
        }
    }
}

/// Query one status and expect every returned pet to carry it.
async fn find_by_status(client: &mut PetStoreClient, status: PetStatus) -> Result<Vec<AssertionResult>> {
    let input = RequestInput::new(HttpMethod::Get, FIND_BY_STATUS_PATH)
        .query("status", status.as_str())
        .accept_json();
    let response = client.send(input).await?;

    let mut assertions = vec![Assertion::status(200), Assertion::json_array("")];
    let count = response
        .json()
        .ok()
        .as_ref()
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    for i in 0..count {
        assertions.push(Assertion::json_eq(&format!("[{i}].status"), status.as_str()));
    }

    Ok(check(&response, &assertions))
}

/// Run the given scenarios in priority order against a fresh sample pet.
/// Duplicates are run once.
pub async fn run_suite(client: &mut PetStoreClient, scenarios: &[Scenario]) -> RunReport {
    let mut ordered = scenarios.to_vec();
    ordered.sort_by_key(|s| s.priority());
    ordered.dedup();

    let mut report = RunReport {
        base_url: client.base_url().to_string(),
        ..Default::default()
    };
    let mut ctx = ScenarioContext::new(sample_pet());
    let started = Instant::now();

    for scenario in ordered {
        let outcome = run_scenario(client, &mut ctx, scenario).await;
        report.push(outcome);
    }

    report.duration_ms = started.elapsed().as_millis();
    report.exchanges = client.history_mut().drain();
    info!(
        total = report.total,
        passed = report.passed,
        failed = report.failed,
        "suite finished"
    );
    report
}

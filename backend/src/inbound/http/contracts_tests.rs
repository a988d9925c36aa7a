//! Tests for the contract handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{ContractTimeline, StartContractResponse};
use crate::domain::workflow::{CONTRACT_STARTED, Step, project};
use crate::domain::{ContractStatus, TaskStatus};
use crate::inbound::http::test_utils::{MockPorts, sample_summary, sample_task};
use crate::inbound::http::validation::json_config;

async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .app_data(json_config())
            .service(
                web::scope("/api")
                    .service(start_contract)
                    .service(list_contracts)
                    .service(contracts_by_user)
                    .service(contract_timeline),
            ),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn start_contract_returns_created_with_the_id() {
    let mut ports = MockPorts::default();
    ports
        .workflow
        .expect_start_contract()
        .withf(|request| {
            request.doctor_name == "Dr. Ayşe Demir"
                && request.start_date == "2025-04-01"
                && request.created_by == UserId::new(1)
        })
        .times(1)
        .return_once(|_| {
            Ok(StartContractResponse {
                contract_id: ContractId::new(5),
                message: CONTRACT_STARTED,
            })
        });

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post().uri("/api/contracts").set_json(json!({
            "doctor_name": "Dr. Ayşe Demir",
            "doctor_role": "Kardiyoloji Uzmanı",
            "start_date": "2025-04-01",
            "created_by": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": CONTRACT_STARTED, "contract_id": 5}));
}

#[rstest]
#[actix_web::test]
async fn missing_intake_fields_never_reach_the_service() {
    let (status, body) = call(
        MockPorts::default(),
        actix_test::TestRequest::post().uri("/api/contracts").set_json(json!({
            "doctor_name": "Dr. Ayşe Demir",
            "start_date": "2025-04-01",
            "created_by": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "doctor_role");
}

#[rstest]
#[actix_web::test]
async fn unreadable_bodies_use_the_error_envelope() {
    let (status, body) = call(
        MockPorts::default(),
        actix_test::TestRequest::post()
            .uri("/api/contracts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "malformed_body");
}

#[rstest]
#[actix_web::test]
async fn service_validation_errors_map_to_bad_request() {
    let mut ports = MockPorts::default();
    ports
        .workflow
        .expect_start_contract()
        .return_once(|_| Err(Error::invalid_request("start_date must be a calendar date")));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post().uri("/api/contracts").set_json(json!({
            "doctor_name": "Dr. Ayşe Demir",
            "doctor_role": "Kardiyoloji Uzmanı",
            "start_date": "01.04.2025",
            "created_by": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "start_date must be a calendar date");
}

#[rstest]
#[actix_web::test]
async fn listing_keeps_service_order() {
    let mut ports = MockPorts::default();
    ports.workflow_query.expect_list_contracts().return_once(|| {
        Ok(vec![
            sample_summary(2, ContractStatus::MerkezHakedis),
            sample_summary(1, ContractStatus::MaliGmy),
        ])
    });

    let (status, body) = call(ports, actix_test::TestRequest::get().uri("/api/contracts")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|contract| contract["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(body[0]["created_by_name"], "Ahmet Yılmaz");
}

#[rstest]
#[actix_web::test]
async fn contracts_by_user_parses_the_path() {
    let mut ports = MockPorts::default();
    ports
        .workflow_query
        .expect_contracts_created_by()
        .with(eq(UserId::new(3)))
        .return_once(|_| Ok(Vec::new()));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri("/api/contracts/by-user/3"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[rstest]
#[case("/api/contracts/by-user/abc", "user_id")]
#[case("/api/contracts/0/timeline", "contract_id")]
#[actix_web::test]
async fn malformed_ids_are_rejected(#[case] uri: &str, #[case] field: &str) {
    let (status, body) = call(MockPorts::default(), actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn timeline_lists_every_step() {
    let tasks = vec![sample_task(1, Step::MaliGmy, TaskStatus::Completed)];
    let timeline = ContractTimeline {
        contract: sample_summary(1, ContractStatus::MerkezHakedis),
        timeline: project(&tasks),
        tasks,
    };
    let mut ports = MockPorts::default();
    ports
        .workflow_query
        .expect_timeline()
        .with(eq(ContractId::new(1)))
        .return_once(move |_| Ok(timeline));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri("/api/contracts/1/timeline"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contract"]["created_by"], "Ahmet Yılmaz");
    assert_eq!(body["contract"]["current_status"], "MERKEZ_HAKEDIS");
    let steps = body["timeline"].as_array().expect("timeline array");
    assert_eq!(steps.len(), Step::ALL.len());
    assert_eq!(steps[0]["id"], "MALI_GMY");
    assert_eq!(steps[0]["status"], "COMPLETED");
    assert_eq!(steps[1]["status"], "WAITING");
    assert_eq!(body["tasks"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn unknown_contract_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .workflow_query
        .expect_timeline()
        .return_once(|_| Err(Error::not_found("contract 9 not found")));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri("/api/contracts/9/timeline"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[allow(unused_imports)]
use crate::json::{JsonStatus, Status};

use crate::{error::SheetError, workflow::step::Step};

// Helper struct for testing
#[derive(serde::Serialize)]
struct TestData {
    field1: String,
    field2: i32,
}

#[test]
fn test_new() {
    let test_data = TestData {
        field1: "test".to_string(),
        field2: 42,
    };
    let status = JsonStatus::new(Status::Ok, test_data);
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":\"Ok\""));
    assert!(json.contains("\"field1\":\"test\""));
    assert!(json.contains("\"field2\":42"));
}

#[test]
fn test_new_empty() {
    let status = JsonStatus::new_empty(Status::Ok);
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":\"Ok\""));
    assert!(json.contains("\"data\":[]"));
}

#[test]
fn test_error() {
    let status = JsonStatus::error("Something went wrong");
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":{\"Error\":\"Something went wrong\"}"));
    assert!(json.contains("\"data\":[]"));
}

#[test]
fn test_ok_with_message() {
    let status = JsonStatus::ok(Some("Operation successful"));
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":\"Ok\""));
    assert!(json.contains("\"data\":[\"Operation successful\"]"));
}

#[test]
fn test_ok_without_message() {
    let status: JsonStatus = JsonStatus::ok(None::<String>);
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":\"Ok\""));
    assert!(json.contains("\"data\":[]"));
}

#[test]
fn test_from_sheet_error() {
    let status: JsonStatus = SheetError::StepAborted(Step::AwaitAbility).into();
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":{\"Error\":\"no valid reply to the ability prompt\"}"));
}

#[test]
fn test_from_anyhow_error() {
    let error = anyhow::anyhow!("Custom error message").context("while loading");
    let status = JsonStatus::from_anyhow(error);
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":{\"Error\":"));
    assert!(json.contains("while loading: Custom error message"));
}

#[test]
fn test_into_raw_json() {
    use rocket::response::content::RawJson;

    let test_data = TestData {
        field1: "raw json test".to_string(),
        field2: 400,
    };
    let status = JsonStatus::data_owned(test_data);
    let raw_json: RawJson<String> = status.into();
    let json_str = raw_json.0;
    assert!(json_str.contains("\"status\":\"Ok\""));
    assert!(json_str.contains("\"field1\":\"raw json test\""));
    assert!(json_str.contains("\"field2\":400"));
}

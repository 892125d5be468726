mod support;

use std::time::Duration;

use medcost_lib::models::prediction_types::SingleOutcome;
use medcost_lib::models::record_types::SingleForm;
use medcost_lib::services::api_client::PredictionClient;
use medcost_lib::services::flows::{SingleFlow, NO_VALUE, STATUS_COMPUTING};
use medcost_lib::services::ui_slots::{FlowKind, MemorySlots};
use support::MockApi;

fn form(age: &str, sex: &str, bmi: &str, children: &str, smoker: &str, region: &str) -> SingleForm {
    SingleForm {
        age: age.to_string(),
        sex: sex.to_string(),
        bmi: bmi.to_string(),
        children: children.to_string(),
        smoker: smoker.to_string(),
        region: region.to_string(),
    }
}

fn valid_form() -> SingleForm {
    form("30", "male", "25.4", "2", "no", "northeast")
}

#[tokio::test]
async fn valid_record_is_posted_and_prediction_formatted() {
    let api = MockApi::json(200, serde_json::json!({ "prediction": 4321.9 }));
    let flow = SingleFlow::new(PredictionClient::new(&api.base_url));
    let slots = MemorySlots::new();

    let outcome = flow.submit(&valid_form(), &slots).await;

    assert_eq!(
        outcome,
        SingleOutcome::Predicted {
            prediction: 4321.9,
            formatted: "$4,321.90".to_string()
        }
    );

    let request = api.take_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/predict");
    assert!(request
        .header("content-type")
        .is_some_and(|ct| ct.starts_with("application/json")));
    assert_eq!(
        request.body_json(),
        serde_json::json!({
            "data": {
                "age": 30,
                "sex": "male",
                "bmi": 25.4,
                "children": 2,
                "smoker": "no",
                "region": "northeast"
            }
        })
    );

    let view = slots.single_result().unwrap();
    assert_eq!(view.value, "$4,321.90");
    assert!(view.details.contains("\"region\": \"northeast\""));
    assert_eq!(slots.statuses(FlowKind::Single), vec![STATUS_COMPUTING, ""]);
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn invalid_record_never_reaches_the_api() {
    let api = MockApi::json(200, serde_json::json!({ "prediction": 1.0 }));
    let flow = SingleFlow::new(PredictionClient::new(&api.base_url));
    let slots = MemorySlots::new();

    let outcome = flow
        .submit(&form("-1", "", "25", "0", "no", "southeast"), &slots)
        .await;

    let errors = match outcome {
        SingleOutcome::Invalid { errors } => errors,
        other => panic!("expected validation failure, got {other:?}"),
    };
    assert!(errors.contains(&"Invalid age".to_string()));
    assert!(errors.contains(&"Missing sex".to_string()));
    assert!(!api.received_request());

    let view = slots.single_result().unwrap();
    assert_eq!(view.value, NO_VALUE);
    assert_eq!(view.details, "Invalid age | Missing sex");
    assert!(slots.statuses(FlowKind::Single).is_empty());
}

#[tokio::test]
async fn api_detail_is_shown_and_status_cleared() {
    let api = MockApi::json(500, serde_json::json!({ "detail": "Model not loaded: missing file" }));
    let flow = SingleFlow::new(PredictionClient::new(&api.base_url));
    let slots = MemorySlots::new();

    let outcome = flow.submit(&valid_form(), &slots).await;

    assert_eq!(
        outcome,
        SingleOutcome::Failed {
            message: "Model not loaded: missing file".to_string()
        }
    );
    let view = slots.single_result().unwrap();
    assert_eq!(view.value, NO_VALUE);
    assert_eq!(view.details, "Model not loaded: missing file");
    assert_eq!(slots.statuses(FlowKind::Single), vec![STATUS_COMPUTING, ""]);
}

#[tokio::test]
async fn structured_detail_is_serialized_into_the_message() {
    let api = MockApi::json(
        422,
        serde_json::json!({ "detail": { "error": "Missing features", "missing": ["bmi"] } }),
    );
    let flow = SingleFlow::new(PredictionClient::new(&api.base_url));
    let slots = MemorySlots::new();

    let outcome = flow.submit(&valid_form(), &slots).await;

    let message = match outcome {
        SingleOutcome::Failed { message } => message,
        other => panic!("expected API failure, got {other:?}"),
    };
    assert!(message.contains("Missing features"));
    assert!(message.contains("bmi"));
}

#[tokio::test]
async fn raw_body_is_used_when_error_has_no_detail() {
    let api = MockApi::serve_once(502, "text/plain", "Bad Gateway");
    let flow = SingleFlow::new(PredictionClient::new(&api.base_url));
    let slots = MemorySlots::new();

    let outcome = flow.submit(&valid_form(), &slots).await;

    assert_eq!(
        outcome,
        SingleOutcome::Failed {
            message: "Bad Gateway".to_string()
        }
    );
}

#[tokio::test]
async fn network_failure_resolves_into_the_result_slot() {
    let flow = SingleFlow::new(PredictionClient::new(&support::unreachable_base_url()));
    let slots = MemorySlots::new();

    let outcome = flow.submit(&valid_form(), &slots).await;

    assert!(matches!(outcome, SingleOutcome::Failed { .. }));
    assert_eq!(slots.single_result().unwrap().value, NO_VALUE);
    assert_eq!(slots.statuses(FlowKind::Single), vec![STATUS_COMPUTING, ""]);
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn malformed_success_body_is_a_failure() {
    let api = MockApi::json(200, serde_json::json!({ "result": 12 }));
    let flow = SingleFlow::new(PredictionClient::new(&api.base_url));
    let slots = MemorySlots::new();

    let outcome = flow.submit(&valid_form(), &slots).await;

    let message = match outcome {
        SingleOutcome::Failed { message } => message,
        other => panic!("expected decode failure, got {other:?}"),
    };
    assert!(message.starts_with("Unexpected API response"));
}

#[tokio::test]
async fn second_submission_while_in_flight_is_rejected() {
    let api = MockApi::serve_once_after(
        Duration::from_millis(200),
        200,
        "application/json",
        r#"{"prediction": 10.0}"#,
    );
    let flow = SingleFlow::new(PredictionClient::new(&api.base_url));
    let slots = MemorySlots::new();
    let form = valid_form();

    let (first, second) = tokio::join!(flow.submit(&form, &slots), flow.submit(&form, &slots));

    assert!(matches!(first, SingleOutcome::Predicted { .. }));
    assert_eq!(second, SingleOutcome::Busy);
    assert!(!flow.is_busy());
}

use payment_advisor::advisor::{
    dispatch, AdvisorService, JsonRpcRequest, RecommendationRequest, RosterFile,
};
use serde_json::{json, Value};

fn roster_json() -> Value {
    json!({
        "schools": [
            {
                "id": 1,
                "name": "Harbor Institute",
                "priority": 1,
                "examDay": 0,
                "resultDay": 4,
                "enrollmentFeeDeadline": 10,
                "tuitionDeadline": 20,
                "enrollmentFee": 300000,
                "tuition": 900000
            },
            {
                "id": 2,
                "name": "Valley College",
                "priority": 2,
                "examDay": 0,
                "resultDay": 3,
                "enrollmentFeeDeadline": 6,
                "tuitionDeadline": 15,
                "enrollmentFee": 250000,
                "tuition": 800000
            }
        ],
        "states": [
            { "schoolId": 1, "passStatus": "failed" },
            { "schoolId": 2, "passStatus": "passed" }
        ]
    })
}

#[test]
fn recommendation_request_accepts_camel_case_fields() {
    let mut payload = roster_json();
    payload["today"] = json!(5);

    let request: RecommendationRequest = serde_json::from_value(payload).expect("request parses");

    assert_eq!(request.schools.len(), 2);
    assert!(!request.states[1].enrollment_fee_paid);
}

#[test]
fn recommendation_serializes_with_tagged_actions() {
    let mut payload = roster_json();
    payload["today"] = json!(5);
    let request: RecommendationRequest = serde_json::from_value(payload).expect("request parses");

    let result = AdvisorService::default()
        .recommend(&request)
        .expect("valid roster");
    let value = serde_json::to_value(&result).expect("serializes");

    assert_eq!(value["action"], json!({ "type": "payEnrollmentFee", "schoolId": 2 }));
    assert_eq!(value["urgency"], json!(1));
    assert!(value["reason"].as_str().is_some_and(|reason| reason.contains("Valley College")));
    assert_eq!(value["allRecommendations"][0]["action"]["type"], json!("payEnrollmentFee"));
}

#[test]
fn rpc_dispatch_round_trips_through_json() {
    let mut params = roster_json();
    params["startDay"] = json!(5);
    params["days"] = json!(3);
    let raw = json!({
        "jsonrpc": "2.0",
        "method": "getWeeklyRecommendations",
        "params": params,
        "id": "weekly-1"
    });
    let request: JsonRpcRequest = serde_json::from_value(raw).expect("rpc request parses");

    let response = dispatch(&AdvisorService::default(), request);
    let value = serde_json::to_value(&response).expect("serializes");

    assert_eq!(value["jsonrpc"], json!("2.0"));
    assert_eq!(value["id"], json!("weekly-1"));
    assert!(value.get("error").is_none());
    let days = value["result"]["recommendations"].as_array().expect("days");
    assert_eq!(days.len(), 3);
    assert_eq!(days[1]["result"]["action"]["type"], json!("payEnrollmentFee"));
    assert_eq!(days[2]["result"]["action"]["type"], json!("doNothing"));
    assert_eq!(value["result"]["upcomingAnnouncements"], json!([]));
}

#[test]
fn roster_file_tolerates_missing_states() {
    let payload = json!({ "schools": roster_json()["schools"].clone() });

    let file: RosterFile = serde_json::from_value(payload).expect("roster parses");

    assert_eq!(file.schools.len(), 2);
    assert!(file.states.is_empty());
}

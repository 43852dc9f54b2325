//! Tests for the record-level endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::domain::ports::InMemoryDocumentStore;
use crate::inbound::http::test_utils::test_app;

#[fixture]
fn store() -> Arc<InMemoryDocumentStore> {
    Arc::new(InMemoryDocumentStore::new())
}

fn stored(store: &InMemoryDocumentStore, file: &str) -> Value {
    let bytes = store.contents(file).expect("document written");
    serde_json::from_slice(&bytes).expect("stored JSON")
}

async fn send(
    store: &Arc<InMemoryDocumentStore>,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(Arc::clone(store))).await;
    let res = actix_test::call_service(&app, request.to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn employees_get_ids_and_field_updates(store: Arc<InMemoryDocumentStore>) {
    let (status, created) = send(
        &store,
        actix_test::TestRequest::post()
            .uri("/api/v1/employees")
            .set_json(json!({"firstName": "Ana", "lastName": "Reyes", "position": "Welder"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("id").to_owned();
    assert!(id.starts_with("emp_"));

    let (status, _) = send(
        &store,
        actix_test::TestRequest::put()
            .uri("/api/v1/employees")
            .set_json(json!({"id": id, "key": "department", "newValue": "Machining"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let directory = stored(&store, "employees.json");
    assert_eq!(directory[0]["department"], "Machining");
    assert_eq!(directory[0]["dateResign"], "N/A");
}

#[rstest]
#[case(json!({"id": "emp_missing", "key": "department", "newValue": "x"}), StatusCode::NOT_FOUND)]
#[case(json!({"id": "emp_1", "key": "salary", "newValue": "x"}), StatusCode::BAD_REQUEST)]
#[case(json!({"id": "emp_1", "key": "id", "newValue": "emp_2"}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn bad_employee_updates_are_refused(#[case] body: Value, #[case] expected: StatusCode) {
    let store = Arc::new(InMemoryDocumentStore::new().with_file(
        "employees.json",
        r#"[{"id":"emp_1","firstName":"Ana","lastName":"Reyes","position":"Welder"}]"#,
    ));
    let before = store.contents("employees.json");
    let (status, error) = send(
        &store,
        actix_test::TestRequest::put()
            .uri("/api/v1/employees")
            .set_json(body),
    )
    .await;
    assert_eq!(status, expected);
    assert!(error["message"].is_string());
    assert_eq!(store.contents("employees.json"), before);
}

#[rstest]
#[actix_web::test]
async fn incomplete_employees_are_bad_requests(store: Arc<InMemoryDocumentStore>) {
    let (status, error) = send(
        &store,
        actix_test::TestRequest::post()
            .uri("/api/v1/employees")
            .set_json(json!({"firstName": "Ana"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["status"], "bad_request");
    assert_eq!(store.contents("employees.json"), None);
}

#[rstest]
#[actix_web::test]
async fn done_roster_ignores_repeats(store: Arc<InMemoryDocumentStore>) {
    let mark = || {
        actix_test::TestRequest::post()
            .uri("/api/v1/quota/done")
            .set_json(json!({"date": "2024-06-03", "name": "Ben"}))
    };
    let (_, first) = send(&store, mark()).await;
    let (status, second) = send(&store, mark()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["added"], true);
    assert_eq!(second["added"], false);
    assert_eq!(
        stored(&store, "doneemployees.json"),
        json!({"2024-06-03": ["Ben"]})
    );
}

#[rstest]
#[actix_web::test]
async fn saving_assignments_appends_history(store: Arc<InMemoryDocumentStore>) {
    let roster = json!([{
        "lname": "Reyes", "fname": "Ana", "position": "Welder", "department": "Fab",
        "project": "Pier 4", "dateFrom": "2024-06-01", "dateTo": "2024-06-05", "numDays": 4
    }]);
    let (status, _) = send(
        &store,
        actix_test::TestRequest::put()
            .uri("/api/v1/assignments")
            .set_json(roster),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored(&store, "empassign.json")[0]["project"], "Pier 4");
    let history = stored(&store, "empassign2.json");
    assert_eq!(history[0]["timestamp"], "2024-06-03 09:00:00");

    let (status, found) = send(
        &store,
        actix_test::TestRequest::get().uri("/api/v1/assignments/history?project=pier"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn absence_requests_need_a_known_manager_code(store: Arc<InMemoryDocumentStore>) {
    let request = |code: &str| {
        actix_test::TestRequest::post()
            .uri("/api/v1/absences")
            .set_json(json!({
                "lastName": "Reyes", "firstName": "Ana", "reason": "Fever",
                "dateFrom": "2024-06-03", "dateTo": "2024-06-05", "managerCode": code
            }))
    };
    let (status, _) = send(&store, request("WRONG")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.contents("absences.json"), None);

    let (status, _) = send(&store, request("EXP0310")).await;
    assert_eq!(status, StatusCode::OK);
    let book = stored(&store, "absences.json");
    let filed = &book["pending"][0];
    assert_eq!(filed["managerCode"], "******");
    assert_eq!(filed["numDays"], 3);
    assert_eq!(filed["actionTaken"], "Choose");
    assert_eq!(filed["dateLogged"], "2024-06-03");

    let (status, _) = send(
        &store,
        actix_test::TestRequest::post()
            .uri("/api/v1/absences/pending/0")
            .set_json(json!({"action": "Valid"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let book = stored(&store, "absences.json");
    assert_eq!(book["pending"], json!([]));
    assert_eq!(book["approved"][0]["actionTaken"], "Valid");
}

#[rstest]
#[actix_web::test]
async fn leave_refresh_enrols_tenured_employees() {
    let store = Arc::new(InMemoryDocumentStore::new().with_file(
        "employees.json",
        r#"[{"id":"emp_1","firstName":"Ana","lastName":"Reyes","position":"Welder","startDate":"2020-01-15"},
            {"id":"emp_2","firstName":"Ben","lastName":"Cruz","position":"Driver","startDate":"2024-05-01"}]"#,
    ));
    let (status, ledger) = send(
        &store,
        actix_test::TestRequest::post().uri("/api/v1/leave-credits/refresh"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ledger = ledger.as_array().expect("ledger array");
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0]["fname"], "Ana");
    assert_eq!(ledger[0]["remaining"], 5);
}

#[rstest]
#[actix_web::test]
async fn daily_weeks_merge_by_range_and_year() {
    let store = Arc::new(InMemoryDocumentStore::new().with_file(
        "daily.json",
        r#"[{"year":2024,"weekRange":"Jun 4 - Jun 10","projectName":"Brackets",
             "rows":[{"description":"A","status":"GOOD","tuesday":"5"}]}]"#,
    ));
    let (status, _) = send(
        &store,
        actix_test::TestRequest::post()
            .uri("/api/v1/machining/daily")
            .set_json(json!([
                {"year": "2024", "weekRange": "Jun 4 - Jun 10", "projectName": "Brackets v2",
                 "rows": [{"description": "B", "status": "NOT GOOD", "tuesday": "1,200"},
                          {"description": "LT TOTAL OUTPUT", "tuesday": "1,200"}]},
                {"year": 2024, "weekRange": "Jun 11 - Jun 17", "projectName": "Shafts", "rows": []}
            ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sheet = stored(&store, "daily.json");
    assert_eq!(sheet.as_array().map(Vec::len), Some(2));
    assert_eq!(sheet[0]["year"], 2024);
    assert_eq!(sheet[0]["projectName"], "Brackets v2");
    assert_eq!(sheet[0]["rows"].as_array().map(Vec::len), Some(1));
    assert_eq!(sheet[1]["weekRange"], "Jun 11 - Jun 17");
}

#[rstest]
#[actix_web::test]
async fn daily_weeks_with_bad_cells_are_refused(store: Arc<InMemoryDocumentStore>) {
    let (status, error) = send(
        &store,
        actix_test::TestRequest::post()
            .uri("/api/v1/machining/daily")
            .set_json(json!([{"year": 2024, "weekRange": "Jun 4 - Jun 10",
                              "rows": [{"description": "A", "status": "GOOD", "friday": "lots"}]}])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["status"], "bad_request");
    assert_eq!(store.contents("daily.json"), None);
}

#[rstest]
#[actix_web::test]
async fn payroll_appends_records_and_overwrites_lists(store: Arc<InMemoryDocumentStore>) {
    let (status, _) = send(
        &store,
        actix_test::TestRequest::post()
            .uri("/api/v1/payroll")
            .set_json(json!({"fullName": "Ana Reyes", "monthly": 18000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payroll = stored(&store, "payroll.json");
    assert_eq!(payroll[0]["department"], "Unknown");
    assert_eq!(payroll[0]["daily"], 0);
    assert_eq!(payroll[0]["prevIncrease"], "N/A");

    let (status, _) = send(
        &store,
        actix_test::TestRequest::post().uri("/api/v1/payroll").set_json(json!([
            {"fullName": "Ben Cruz", "department": "Machining"},
            {"fullName": "Ana Santos", "department": "HR"}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored(&store, "payroll.json").as_array().map(Vec::len), Some(2));

    let (status, found) = send(
        &store,
        actix_test::TestRequest::get().uri("/api/v1/payroll?department=hr&name=ana"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([{"fullName": "Ana Santos", "department": "HR",
        "monthly": "", "daily": "", "allowance": "", "lastIncrease": "", "prevIncrease": ""}]));
}

#[rstest]
#[actix_web::test]
async fn todo_actions_answer_the_task_list(store: Arc<InMemoryDocumentStore>) {
    let task = json!({"text": "Renew permits", "time": "2024-06-03 09:00", "completed": false});
    let action = |name: &str, task: &Value| {
        actix_test::TestRequest::post()
            .uri("/api/v1/todo")
            .set_json(json!({"action": name, "task": task}))
    };

    let (status, tasks) = send(&store, action("add", &task)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks, json!([task]));

    let mut done = task.clone();
    done["completed"] = json!(true);
    let (_, tasks) = send(&store, action("update", &done)).await;
    assert_eq!(tasks[0]["completed"], true);

    let (status, tasks) = send(
        &store,
        actix_test::TestRequest::post()
            .uri("/api/v1/todo")
            .set_json(json!({"action": "load"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().map(Vec::len), Some(1));

    let (_, tasks) = send(&store, action("delete", &task)).await;
    assert_eq!(tasks, json!([]));

    let (status, error) = send(&store, action("archive", &task)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["status"], "bad_request");
}

#[rstest]
#[actix_web::test]
async fn machining_jobs_hide_finished_work_unless_dated() {
    let store = Arc::new(InMemoryDocumentStore::new().with_file(
        "machining.json",
        r#"[{"machineType":"CNC","records":[
              {"date":"2024-06-03","itemName":"Shaft","status":"DONE"},
              {"date":"2024-06-03","itemName":"Gear","status":"ONGOING"}]}]"#,
    ));
    let (status, open) = send(
        &store,
        actix_test::TestRequest::get().uri("/api/v1/machining/jobs"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(open[0]["records"][0]["itemName"], "Gear");

    let (_, done) = send(
        &store,
        actix_test::TestRequest::get().uri("/api/v1/machining/jobs?date=2024-06-03"),
    )
    .await;
    assert_eq!(done[0]["records"][0]["itemName"], "Shaft");
    assert_eq!(done[0]["records"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn offenses_replace_the_employee_file(store: Arc<InMemoryDocumentStore>) {
    let record = |description: &str| {
        actix_test::TestRequest::post().uri("/api/v1/offenses").set_json(json!({
            "fname": "Ana", "lname": "Reyes",
            "offenses": [{"date": "2024-06-03", "type": "Tardiness", "description": description}]
        }))
    };
    send(&store, record("Late")).await;
    let (status, _) = send(&store, record("Late twice")).await;
    assert_eq!(status, StatusCode::OK);
    let book = stored(&store, "offenses.json");
    assert_eq!(book.as_array().map(Vec::len), Some(1));
    assert_eq!(book[0]["offenses"][0]["description"], "Late twice");
    assert_eq!(book[0]["offenses"][0]["type"], "Tardiness");
}

#[rstest]
#[actix_web::test]
async fn vehicle_bookings_refuse_overlaps(store: Arc<InMemoryDocumentStore>) {
    let book = |start: &str, end: &str| {
        actix_test::TestRequest::post().uri("/api/v1/schedule").set_json(json!({
            "date": "2024-06-03", "vehicle": "Van", "plate": "ABC 123", "employee": "Ana",
            "startTime": start, "endTime": end, "purpose": "Delivery", "destination": "Cebu"
        }))
    };
    let (status, _) = send(&store, book("08:00", "10:00")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, error) = send(&store, book("09:30", "11:00")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        error["message"]
            .as_str()
            .is_some_and(|message| message.contains("Van"))
    );
    let schedule = stored(&store, "schedule.json");
    assert_eq!(schedule.as_array().map(Vec::len), Some(1));
    assert_eq!(schedule[0]["month"], 6);

    let (status, _) = send(
        &store,
        actix_test::TestRequest::delete().uri("/api/v1/schedule/0"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored(&store, "schedule.json"), json!([]));
}

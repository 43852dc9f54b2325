//! Record-level endpoints that apply one typed edit server-side.
//!
//! ```text
//! GET  /api/v1/employees                      Employee directory
//! POST /api/v1/employees                      Add an employee, returns its id
//! PUT  /api/v1/employees {id,key,newValue}    Overwrite one column
//! POST /api/v1/quota/done {date,name}         Mark an operator as called out
//! PUT  /api/v1/assignments                    Replace roster, append history
//! GET  /api/v1/assignments/history            Search the assignment history
//! POST /api/v1/absences                       File an absence request
//! POST /api/v1/absences/pending/{index}       Record a manager decision
//! POST /api/v1/leave-credits/refresh          Enrol and purge leave credits
//! POST /api/v1/machining/daily                Merge weekly output sheets
//! GET  /api/v1/machining/jobs?date=           Open jobs, or jobs done on a date
//! GET  /api/v1/payroll?department=&name=      Filtered payroll table
//! POST /api/v1/payroll                        Overwrite with a list, append one record
//! POST /api/v1/todo {action,task?}            add, load, update or delete a task
//! POST /api/v1/offenses                       Replace one employee's offenses
//! POST /api/v1/schedule                       Book a vehicle
//! DELETE /api/v1/schedule/{index}             Cancel a booking
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::documents::{etag, saved};
use super::error::decode_json;
use crate::domain::records::{
    Absence, AbsenceBook, AbsenceMutation, AssignmentHistory, AssignmentRoster, Booking,
    DailyMutation, DailySheet, DailyWeek, DoneRoster, Employee, EmployeeDirectory,
    EmployeeMutation, HistoryFilter, MachiningBoard, OffenseBook, OffenseFile, OffenseMutation,
    Payroll, PayrollFilter, PayrollMutation, PayrollSubmission, ScheduleMutation, TodoList,
    TodoRequest, VehicleSchedule,
};
use crate::domain::{CollectionDocument, Mutation, Revision};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Body of `PUT /employees`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    /// Employee id.
    pub id: String,
    /// Column to overwrite, e.g. `department`.
    pub key: String,
    /// New value; non-strings are stored as JSON text.
    pub new_value: Value,
}

/// Body of `POST /quota/done`.
#[derive(Debug, Deserialize)]
pub struct DoneRequest {
    /// Shift date, `YYYY-MM-DD`.
    pub date: String,
    /// Operator name.
    pub name: String,
}

/// Body of `POST /absences/pending/{index}`.
#[derive(Debug, Deserialize)]
pub struct AbsenceDecision {
    /// One of the form's action labels.
    pub action: String,
}

/// Query of `GET /machining/jobs`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobsQuery {
    /// Completion date; blank lists open jobs.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
struct Created {
    status: &'static str,
    id: String,
    revision: String,
}

#[derive(Debug, Serialize)]
struct Marked {
    status: &'static str,
    added: bool,
    revision: String,
}

async fn apply<D, M>(state: &HttpState, mutation: M) -> ApiResult<Revision>
where
    D: CollectionDocument,
    M: Mutation<D>,
{
    let (_, revision) = state
        .book
        .store::<D>()
        .update(move |document| mutation.apply(document))
        .await?;
    Ok(revision)
}

/// Current employee directory.
#[get("/employees")]
pub async fn list_employees(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let snapshot = state
        .book
        .store::<EmployeeDirectory>()
        .load_or_default()
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(etag(&snapshot.revision))
        .json(&snapshot.document))
}

/// Add an employee under a fresh `emp_` id.
#[post("/employees")]
pub async fn add_employee(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let employee: Employee = decode_json(&body)?;
    let (id, revision) = state
        .book
        .store::<EmployeeDirectory>()
        .update(move |directory| directory.add(employee))
        .await?;
    Ok(HttpResponse::Created()
        .insert_header(etag(&revision))
        .json(Created {
            status: "ok",
            id,
            revision: revision.to_string(),
        }))
}

/// Overwrite one column of an employee.
#[put("/employees")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let EmployeeUpdate { id, key, new_value } = decode_json(&body)?;
    let mutation = EmployeeMutation::Update {
        id,
        key,
        value: new_value,
    };
    let revision = apply::<EmployeeDirectory, _>(&state, mutation).await?;
    Ok(saved(&revision))
}

/// Add an operator to a date's done roster. Repeats are ignored.
#[post("/quota/done")]
pub async fn mark_done(state: web::Data<HttpState>, body: web::Bytes) -> ApiResult<HttpResponse> {
    let DoneRequest { date, name } = decode_json(&body)?;
    let (added, revision) = state
        .book
        .store::<DoneRoster>()
        .update(move |roster| roster.mark_done(&date, &name))
        .await?;
    Ok(HttpResponse::Ok().insert_header(etag(&revision)).json(Marked {
        status: "ok",
        added,
        revision: revision.to_string(),
    }))
}

/// Replace the assignment roster and stamp every entry into the history.
#[put("/assignments")]
pub async fn save_assignments(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let roster: AssignmentRoster = decode_json(&body)?;
    let revision = state.assignments.save_roster(roster).await?;
    Ok(saved(&revision))
}

/// Assignment history rows matching every supplied criterion.
#[get("/assignments/history")]
pub async fn search_history(
    state: web::Data<HttpState>,
    filter: web::Query<HistoryFilter>,
) -> ApiResult<HttpResponse> {
    let history = state
        .book
        .store::<AssignmentHistory>()
        .load_or_default()
        .await?
        .document;
    Ok(HttpResponse::Ok().json(history.search(&filter)))
}

/// File an absence request. The typed `managerCode` must be on the
/// configured list and is masked before storage.
#[post("/absences")]
pub async fn file_absence(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let mut request: Absence = decode_json(&body)?;
    let manager_code = request.manager_code.take().unwrap_or_default();
    let mutation = AbsenceMutation::File {
        request,
        manager_code,
        codes: state.manager_codes.clone(),
        today: state.clock.utc().date_naive(),
    };
    let revision = apply::<AbsenceBook, _>(&state, mutation).await?;
    Ok(saved(&revision))
}

/// Record a decision on a pending absence request.
#[post("/absences/pending/{index}")]
pub async fn decide_absence(
    state: web::Data<HttpState>,
    path: web::Path<usize>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let AbsenceDecision { action } = decode_json(&body)?;
    let mutation = AbsenceMutation::TakeAction {
        index: path.into_inner(),
        action,
        today: state.clock.utc().date_naive(),
    };
    let revision = apply::<AbsenceBook, _>(&state, mutation).await?;
    Ok(saved(&revision))
}

/// Enrol tenured employees and purge last year's leave dates.
#[post("/leave-credits/refresh")]
pub async fn refresh_leave(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let snapshot = state.leave.refresh().await?;
    Ok(HttpResponse::Ok()
        .insert_header(etag(&snapshot.revision))
        .json(&snapshot.document))
}

/// Merge weekly output sheets into the stored ones by week and year.
#[post("/machining/daily")]
pub async fn merge_daily(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let weeks: Vec<DailyWeek> = decode_json(&body)?;
    let revision = apply::<DailySheet, _>(&state, DailyMutation::Merge(weeks)).await?;
    Ok(saved(&revision))
}

/// The job board as the machining page shows it.
#[get("/machining/jobs")]
pub async fn machining_jobs(
    state: web::Data<HttpState>,
    query: web::Query<JobsQuery>,
) -> ApiResult<HttpResponse> {
    let board = state
        .book
        .store::<MachiningBoard>()
        .load_or_default()
        .await?
        .document;
    Ok(HttpResponse::Ok().json(board.visible(query.date.as_deref())))
}

/// Payroll records matching the department and name filters.
#[get("/payroll")]
pub async fn list_payroll(
    state: web::Data<HttpState>,
    filter: web::Query<PayrollFilter>,
) -> ApiResult<HttpResponse> {
    let snapshot = state.book.store::<Payroll>().load_or_default().await?;
    Ok(HttpResponse::Ok()
        .insert_header(etag(&snapshot.revision))
        .json(snapshot.document.filtered(&filter)))
}

/// Replace the payroll with a submitted list, or append a single record.
#[post("/payroll")]
pub async fn submit_payroll(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let submission: PayrollSubmission = decode_json(&body)?;
    let revision = apply::<Payroll, _>(&state, PayrollMutation::from(submission)).await?;
    Ok(saved(&revision))
}

/// Apply one to-do action and answer the resulting list.
#[post("/todo")]
pub async fn todo_action(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let request: TodoRequest = decode_json(&body)?;
    let store = state.book.store::<TodoList>();
    let (tasks, revision) = match request.into_mutation() {
        Some(mutation) => {
            store
                .update(move |list| {
                    mutation.apply(list)?;
                    Ok(list.clone())
                })
                .await?
        }
        None => {
            let snapshot = store.load_or_default().await?;
            (snapshot.document, snapshot.revision)
        }
    };
    Ok(HttpResponse::Ok().insert_header(etag(&revision)).json(tasks))
}

/// Replace one employee's offense table.
#[post("/offenses")]
pub async fn record_offenses(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let file: OffenseFile = decode_json(&body)?;
    let revision = apply::<OffenseBook, _>(&state, OffenseMutation::Record(file)).await?;
    Ok(saved(&revision))
}

/// Book a vehicle when it is free for the whole window.
#[post("/schedule")]
pub async fn book_vehicle(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let booking: Booking = decode_json(&body)?;
    let revision = apply::<VehicleSchedule, _>(&state, ScheduleMutation::Book(booking)).await?;
    Ok(saved(&revision))
}

/// Cancel a booking.
#[delete("/schedule/{index}")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    path: web::Path<usize>,
) -> ApiResult<HttpResponse> {
    let mutation = ScheduleMutation::Cancel {
        index: path.into_inner(),
    };
    let revision = apply::<VehicleSchedule, _>(&state, mutation).await?;
    Ok(saved(&revision))
}

/// Mount the record endpoints.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_employees)
        .service(add_employee)
        .service(update_employee)
        .service(mark_done)
        .service(save_assignments)
        .service(search_history)
        .service(file_absence)
        .service(decide_absence)
        .service(refresh_leave)
        .service(merge_daily)
        .service(machining_jobs)
        .service(list_payroll)
        .service(submit_payroll)
        .service(todo_action)
        .service(record_offenses)
        .service(book_vehicle)
        .service(cancel_booking);
}

#[cfg(test)]
mod tests;

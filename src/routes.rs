use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;

use crate::api::CourseApi;
use crate::error::AppError;
use crate::models::Semester;
use crate::state::AppState;
use crate::views::DeleteAlert;
use crate::views::course_form::{CourseForm, CourseFormInput, FormAction, Mode};
use crate::views::course_list::{self, CourseList};
use crate::views::instance_form::{InstanceForm, InstanceFormInput};
use crate::views::instance_list::{self, InstanceList, InstanceQuery};

#[derive(Deserialize)]
struct InstanceFilterInput {
    #[serde(default)]
    year: String,
    #[serde(default)]
    semester: String,
}

/// `?alert=<code>` left by a failed delete. Unknown codes are ignored.
#[derive(Deserialize)]
struct AlertParams {
    alert: Option<String>,
}

impl AlertParams {
    fn delete_alert(&self) -> Option<DeleteAlert> {
        self.alert.as_deref().and_then(DeleteAlert::from_code)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(list_courses))
        .route("/courses/new", get(new_course).post(submit_new_course))
        .route(
            "/courses/edit/{course_id}",
            get(edit_course).post(submit_edit_course),
        )
        .route("/courses/delete/{course_id}", post(delete_course))
        .route("/instances", get(list_current_instances).post(search_instances))
        .route("/instances/new", get(new_instance).post(create_instance))
        .route("/instances/{year}/{semester}", get(list_instances))
        .route(
            "/instances/{year}/{semester}/{course_id}/delete",
            post(delete_instance),
        )
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> AppError {
    AppError::NotFound
}

fn parse_query(year: &str, semester: &str) -> Result<InstanceQuery, AppError> {
    let year = year
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest(format!("invalid year: {}", year)))?;
    let semester = semester
        .parse::<Semester>()
        .map_err(AppError::BadRequest)?;
    Ok(InstanceQuery::new(year, semester))
}

async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<AlertParams>,
) -> Html<String> {
    Html(
        CourseList::load(state.api.as_ref())
            .await
            .with_alert(params.delete_alert())
            .render(),
    )
}

async fn delete_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Redirect {
    match course_list::delete_course(state.api.as_ref(), &course_id).await {
        Ok(()) => Redirect::to("/"),
        Err(alert) => Redirect::to(&alert.redirect_path("/")),
    }
}

async fn new_course(State(state): State<AppState>) -> Html<String> {
    Html(CourseForm::load(state.api.as_ref(), Mode::Create).await.render())
}

async fn edit_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Html<String> {
    Html(
        CourseForm::load(state.api.as_ref(), Mode::Edit(course_id))
            .await
            .render(),
    )
}

async fn submit_new_course(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    course_form_action(state.api.as_ref(), Mode::Create, pairs).await
}

async fn submit_edit_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    course_form_action(state.api.as_ref(), Mode::Edit(course_id), pairs).await
}

async fn course_form_action(
    api: &dyn CourseApi,
    mode: Mode,
    pairs: Vec<(String, String)>,
) -> Response {
    let input = CourseFormInput::from_pairs(pairs);
    let action = input.action.clone();
    let mut form = CourseForm::from_input(api, mode, input).await;

    match action {
        FormAction::Search => {}
        FormAction::Add(id) => form.add_prerequisite(&id),
        FormAction::Remove(id) => form.remove_prerequisite(&id),
        FormAction::Save => {
            if form.save(api).await {
                return Redirect::to("/").into_response();
            }
        }
    }

    Html(form.render()).into_response()
}

async fn list_current_instances(State(state): State<AppState>) -> Html<String> {
    Html(
        InstanceList::load(state.api.as_ref(), InstanceQuery::current())
            .await
            .render(),
    )
}

async fn list_instances(
    State(state): State<AppState>,
    Path((year, semester)): Path<(String, String)>,
    Query(params): Query<AlertParams>,
) -> Result<Html<String>, AppError> {
    let query = parse_query(&year, &semester)?;
    Ok(Html(
        InstanceList::load(state.api.as_ref(), query)
            .await
            .with_alert(params.delete_alert())
            .render(),
    ))
}

/// A filter change is a new query: redirect to its page so exactly one
/// fetch serves it. A blank field falls back to the default filter.
async fn search_instances(Form(input): Form<InstanceFilterInput>) -> Result<Redirect, AppError> {
    if input.year.trim().is_empty() || input.semester.trim().is_empty() {
        return Ok(Redirect::to("/instances"));
    }
    let query = parse_query(&input.year, &input.semester)?;
    Ok(Redirect::to(&query.path()))
}

async fn delete_instance(
    State(state): State<AppState>,
    Path((year, semester, course_id)): Path<(String, String, String)>,
) -> Result<Redirect, AppError> {
    let query = parse_query(&year, &semester)?;

    let redirect = match instance_list::delete_instance(state.api.as_ref(), query, &course_id).await
    {
        Ok(()) => Redirect::to(&query.path()),
        Err(alert) => Redirect::to(&alert.redirect_path(&query.path())),
    };
    Ok(redirect)
}

async fn new_instance(State(state): State<AppState>) -> Html<String> {
    Html(InstanceForm::load(state.api.as_ref()).await.render())
}

async fn create_instance(
    State(state): State<AppState>,
    Form(input): Form<InstanceFormInput>,
) -> Response {
    let api = state.api.as_ref();
    let mut form = InstanceForm::load(api).await;
    form.apply(input);

    if form.submit(api).await {
        return Redirect::to("/instances").into_response();
    }
    Html(form.render()).into_response()
}

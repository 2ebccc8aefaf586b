use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use frontend::api::{CourseApi, HttpCourseApi};
use frontend::error::ApiError;
use frontend::models::{Course, NewCourseInstance, Semester};

/// Requests seen by the fake backend: method, path, JSON body.
type Log = Arc<Mutex<Vec<(Method, String, Option<Value>)>>>;

async fn record(log: &Log, method: Method, uri: &Uri, body: Option<Value>) {
    log.lock()
        .await
        .push((method, uri.path().to_string(), body));
}

async fn list_courses(State(log): State<Log>, method: Method, uri: Uri) -> Json<Value> {
    record(&log, method, &uri, None).await;
    Json(json!([
        {"courseId": "CS101", "title": "Basics", "description": "", "prerequisites": []},
        {"courseId": "CS209", "title": "Intro", "prerequisites": ["CS101"]}
    ]))
}

async fn create_course(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&log, method, &uri, Some(body)).await;
    StatusCode::CREATED
}

async fn get_course(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    Path(course_id): Path<String>,
) -> axum::response::Response {
    record(&log, method, &uri, None).await;
    if course_id == "CS 209" {
        Json(json!({"courseId": "CS 209", "title": "Spaced", "description": null, "prerequisites": null}))
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Not Found", "message": "Course not found"})),
        )
            .into_response()
    }
}

async fn update_course(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    Json(body): Json<Value>,
) -> StatusCode {
    record(&log, method, &uri, Some(body)).await;
    StatusCode::OK
}

async fn delete_course(State(log): State<Log>, method: Method, uri: Uri) -> impl IntoResponse {
    record(&log, method, &uri, None).await;
    (StatusCode::CONFLICT, "Course is a prerequisite for other courses")
}

async fn create_instance(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&log, method, &uri, Some(body)).await;
    (StatusCode::BAD_REQUEST, Json(json!("Course does not exist")))
}

async fn list_instances(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    Path((year, _semester)): Path<(i32, u8)>,
) -> Json<Value> {
    record(&log, method, &uri, None).await;
    if year == 2020 {
        return Json(json!({"unexpected": "shape"}));
    }
    Json(json!([{"id": 7, "courseId": "CS209", "year": year, "semester": 2}]))
}

async fn get_instance(State(log): State<Log>, method: Method, uri: Uri) -> Json<Value> {
    record(&log, method, &uri, None).await;
    Json(json!({"id": "abc", "courseId": "CS209", "year": 2025, "semester": 1}))
}

async fn delete_instance(State(log): State<Log>, method: Method, uri: Uri) -> StatusCode {
    record(&log, method, &uri, None).await;
    StatusCode::NO_CONTENT
}

async fn spawn_backend() -> (HttpCourseApi, Log) {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/{course_id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/api/instances", axum::routing::post(create_instance))
        .route("/api/instances/{year}/{semester}", get(list_instances))
        .route(
            "/api/instances/{year}/{semester}/{course_id}",
            get(get_instance).delete(delete_instance),
        )
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = HttpCourseApi::new(&format!("http://{}/api", addr)).unwrap();
    (api, log)
}

#[tokio::test]
async fn test_course_reads() {
    let (api, log) = spawn_backend().await;

    let courses = api.get_all_courses().await.unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[1].prerequisites, vec!["CS101"]);
    assert_eq!(courses[1].description, "");

    let spaced = api.get_course_by_id("CS 209").await.unwrap();
    assert_eq!(spaced.title, "Spaced");
    assert!(spaced.prerequisites.is_empty());

    let err = api.get_course_by_id("NOPE").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.message(), Some("Course not found"));

    let seen = log.lock().await;
    assert_eq!(seen[0].0, Method::GET);
    assert_eq!(seen[0].1, "/api/courses");
    assert_eq!(seen[1].1, "/api/courses/CS%20209");
}

#[tokio::test]
async fn test_course_writes_send_whole_entity() {
    let (api, log) = spawn_backend().await;
    let course = Course {
        course_id: "CS209".to_string(),
        title: "Intro".to_string(),
        description: String::new(),
        prerequisites: vec!["CS101".to_string()],
    };

    api.create_course(&course).await.unwrap();
    api.update_course("CS209", &course).await.unwrap();

    let seen = log.lock().await;
    let expected = json!({
        "courseId": "CS209",
        "title": "Intro",
        "description": "",
        "prerequisites": ["CS101"]
    });
    assert_eq!(seen[0], (Method::POST, "/api/courses".to_string(), Some(expected.clone())));
    assert_eq!(seen[1], (Method::PUT, "/api/courses/CS209".to_string(), Some(expected)));
}

#[tokio::test]
async fn test_delete_course_conflict_is_distinguished() {
    let (api, log) = spawn_backend().await;

    let err = api.delete_course("CS101").await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.message(), Some("Course is a prerequisite for other courses"));

    let seen = log.lock().await;
    assert_eq!(seen[0].0, Method::DELETE);
    assert_eq!(seen[0].1, "/api/courses/CS101");
}

#[tokio::test]
async fn test_instance_operations() {
    let (api, log) = spawn_backend().await;

    let err = api
        .create_course_instance(&NewCourseInstance {
            course_id: "CS209".to_string(),
            year: 2025,
            semester: Semester::Second,
        })
        .await
        .unwrap_err();
    assert!(!err.is_conflict());
    assert_eq!(err.user_message("Failed to create course instance"), "Course does not exist");

    let instances = api
        .get_course_instances_by_year_and_semester(2025, Semester::Second)
        .await
        .unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].id.as_deref(), Some("7"));

    let one = api
        .get_course_instance(2025, Semester::First, "CS209")
        .await
        .unwrap();
    assert_eq!(one.id.as_deref(), Some("abc"));

    api.delete_course_instance(2025, Semester::First, "CS209")
        .await
        .unwrap();

    let seen = log.lock().await;
    assert_eq!(
        seen[0],
        (
            Method::POST,
            "/api/instances".to_string(),
            Some(json!({"courseId": "CS209", "year": 2025, "semester": 2}))
        )
    );
    assert_eq!(seen[1].1, "/api/instances/2025/2");
    assert_eq!(seen[2].1, "/api/instances/2025/1/CS209");
    assert_eq!(seen[3], (Method::DELETE, "/api/instances/2025/1/CS209".to_string(), None));
}

#[tokio::test]
async fn test_unexpected_body_is_a_decode_error() {
    let (api, _log) = spawn_backend().await;

    let err = api
        .get_course_instances_by_year_and_semester(2020, Semester::First)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpCourseApi::new(&format!("http://{}/api", addr)).unwrap();
    let err = api.get_all_courses().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.user_message("Failed to save course"), "Failed to save course");
}

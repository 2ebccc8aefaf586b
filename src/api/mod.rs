pub mod memory;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url, header};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, AppError};
use crate::models::{Course, CourseInstance, NewCourseInstance, Semester};

pub use memory::InMemoryCourseApi;

/// Operations the backend exposes for courses and their instances.
/// Every call is a single attempt; callers decide how to present failures.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn get_all_courses(&self) -> Result<Vec<Course>, ApiError>;
    async fn get_course_by_id(&self, course_id: &str) -> Result<Course, ApiError>;
    async fn create_course(&self, course: &Course) -> Result<(), ApiError>;
    async fn update_course(&self, course_id: &str, course: &Course) -> Result<(), ApiError>;
    async fn delete_course(&self, course_id: &str) -> Result<(), ApiError>;

    async fn create_course_instance(&self, instance: &NewCourseInstance) -> Result<(), ApiError>;
    async fn get_course_instances_by_year_and_semester(
        &self,
        year: i32,
        semester: Semester,
    ) -> Result<Vec<CourseInstance>, ApiError>;
    async fn get_course_instance(
        &self,
        year: i32,
        semester: Semester,
        course_id: &str,
    ) -> Result<CourseInstance, ApiError>;
    async fn delete_course_instance(
        &self,
        year: i32,
        semester: Semester,
        course_id: &str,
    ) -> Result<(), ApiError>;
}

pub struct HttpCourseApi {
    client: Client,
    base_url: Url,
}

impl HttpCourseApi {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid API_BASE_URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "API_BASE_URL '{}' cannot carry a path",
                base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Joins `segments` onto the base path, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} {}", status, response.url());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status,
            message: error_message(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Extracts the human-readable part of a backend error body.
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => Some(s).filter(|s| !s.is_empty()),
        Ok(serde_json::Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| {
                map.get(*key)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
            })
            .map(str::to_string),
        Ok(_) => Some(trimmed.to_string()),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl CourseApi for HttpCourseApi {
    async fn get_all_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.send_json(self.client.get(self.url(&["courses"]))).await
    }

    async fn get_course_by_id(&self, course_id: &str) -> Result<Course, ApiError> {
        self.send_json(self.client.get(self.url(&["courses", course_id])))
            .await
    }

    async fn create_course(&self, course: &Course) -> Result<(), ApiError> {
        self.send(self.client.post(self.url(&["courses"])).json(course))
            .await?;
        Ok(())
    }

    async fn update_course(&self, course_id: &str, course: &Course) -> Result<(), ApiError> {
        self.send(self.client.put(self.url(&["courses", course_id])).json(course))
            .await?;
        Ok(())
    }

    async fn delete_course(&self, course_id: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(&["courses", course_id])))
            .await?;
        Ok(())
    }

    async fn create_course_instance(&self, instance: &NewCourseInstance) -> Result<(), ApiError> {
        self.send(self.client.post(self.url(&["instances"])).json(instance))
            .await?;
        Ok(())
    }

    async fn get_course_instances_by_year_and_semester(
        &self,
        year: i32,
        semester: Semester,
    ) -> Result<Vec<CourseInstance>, ApiError> {
        let (year, semester) = (year.to_string(), semester.to_string());
        self.send_json(self.client.get(self.url(&["instances", year.as_str(), semester.as_str()])))
            .await
    }

    async fn get_course_instance(
        &self,
        year: i32,
        semester: Semester,
        course_id: &str,
    ) -> Result<CourseInstance, ApiError> {
        let (year, semester) = (year.to_string(), semester.to_string());
        self.send_json(
            self.client
                .get(self.url(&["instances", year.as_str(), semester.as_str(), course_id])),
        )
        .await
    }

    async fn delete_course_instance(
        &self,
        year: i32,
        semester: Semester,
        course_id: &str,
    ) -> Result<(), ApiError> {
        let (year, semester) = (year.to_string(), semester.to_string());
        self.send(
            self.client
                .delete(self.url(&["instances", year.as_str(), semester.as_str(), course_id])),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(error_message(""), None);
        assert_eq!(error_message("  \n"), None);
        assert_eq!(
            error_message(r#""Course already exists""#).as_deref(),
            Some("Course already exists")
        );
        assert_eq!(
            error_message(r#"{"error":"Conflict","message":"Course is in use"}"#).as_deref(),
            Some("Course is in use")
        );
        assert_eq!(
            error_message(r#"{"error":"Bad Request"}"#).as_deref(),
            Some("Bad Request")
        );
        assert_eq!(error_message(r#"{"status":500}"#), None);
        assert_eq!(error_message(r#"{"message":""}"#), None);
        assert_eq!(
            error_message(r#"{"message":"","error":"Bad Request"}"#).as_deref(),
            Some("Bad Request")
        );
        assert_eq!(error_message(r#""""#), None);
        assert_eq!(
            error_message("Internal Server Error").as_deref(),
            Some("Internal Server Error")
        );
    }

    #[test]
    fn test_url_encodes_each_segment() {
        let api = HttpCourseApi::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            api.url(&["courses", "CS 209"]).as_str(),
            "http://localhost:8080/api/courses/CS%20209"
        );
        assert_eq!(
            api.url(&["courses", "A/B"]).as_str(),
            "http://localhost:8080/api/courses/A%2FB"
        );
        assert_eq!(
            api.url(&["instances", "2025", "2"]).as_str(),
            "http://localhost:8080/api/instances/2025/2"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(HttpCourseApi::new("mailto:admin@example.com").is_err());
        assert!(HttpCourseApi::new("not a url").is_err());
    }
}

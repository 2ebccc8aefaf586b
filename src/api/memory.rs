use async_trait::async_trait;
use axum::http::StatusCode;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::CourseApi;
use crate::error::ApiError;
use crate::models::{Course, CourseInstance, NewCourseInstance, Semester};

/// In-process stand-in for the REST backend. Mirrors the backend's
/// observable rules: 404 for unknown ids, 409 for duplicates and for
/// deleting a course that another course lists as a prerequisite.
#[derive(Default)]
pub struct InMemoryCourseApi {
    courses: RwLock<Vec<Course>>,
    instances: RwLock<Vec<CourseInstance>>,
}

fn rejected(status: StatusCode, message: impl Into<String>) -> ApiError {
    ApiError::Status {
        status,
        message: Some(message.into()),
    }
}

impl InMemoryCourseApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(courses: Vec<Course>) -> Self {
        Self {
            courses: RwLock::new(courses),
            instances: RwLock::default(),
        }
    }
}

#[async_trait]
impl CourseApi for InMemoryCourseApi {
    async fn get_all_courses(&self) -> Result<Vec<Course>, ApiError> {
        Ok(self.courses.read().await.clone())
    }

    async fn get_course_by_id(&self, course_id: &str) -> Result<Course, ApiError> {
        self.courses
            .read()
            .await
            .iter()
            .find(|c| c.course_id == course_id)
            .cloned()
            .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "Course not found"))
    }

    async fn create_course(&self, course: &Course) -> Result<(), ApiError> {
        if course.course_id.trim().is_empty() || course.title.trim().is_empty() {
            return Err(rejected(
                StatusCode::BAD_REQUEST,
                "Course ID and title are required",
            ));
        }

        let mut courses = self.courses.write().await;
        if courses.iter().any(|c| c.course_id == course.course_id) {
            return Err(rejected(
                StatusCode::CONFLICT,
                format!("Course {} already exists", course.course_id),
            ));
        }
        courses.push(course.clone());
        Ok(())
    }

    async fn update_course(&self, course_id: &str, course: &Course) -> Result<(), ApiError> {
        let mut courses = self.courses.write().await;
        let existing = courses
            .iter_mut()
            .find(|c| c.course_id == course_id)
            .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "Course not found"))?;

        *existing = Course {
            course_id: course_id.to_string(),
            ..course.clone()
        };
        Ok(())
    }

    async fn delete_course(&self, course_id: &str) -> Result<(), ApiError> {
        let mut courses = self.courses.write().await;
        if courses.iter().any(|c| c.has_prerequisite(course_id)) {
            return Err(rejected(
                StatusCode::CONFLICT,
                "Course is a prerequisite for other courses",
            ));
        }

        let before = courses.len();
        courses.retain(|c| c.course_id != course_id);
        if courses.len() == before {
            return Err(rejected(StatusCode::NOT_FOUND, "Course not found"));
        }
        Ok(())
    }

    async fn create_course_instance(&self, instance: &NewCourseInstance) -> Result<(), ApiError> {
        let known = self
            .courses
            .read()
            .await
            .iter()
            .any(|c| c.course_id == instance.course_id);
        if !known {
            return Err(rejected(StatusCode::BAD_REQUEST, "Course does not exist"));
        }

        let mut instances = self.instances.write().await;
        let duplicate = instances.iter().any(|i| {
            i.year == instance.year
                && i.semester == instance.semester
                && i.course_id == instance.course_id
        });
        if duplicate {
            return Err(rejected(
                StatusCode::CONFLICT,
                "Course instance already exists",
            ));
        }

        instances.push(CourseInstance {
            id: Some(Uuid::new_v4().to_string()),
            course_id: instance.course_id.clone(),
            year: instance.year,
            semester: instance.semester,
        });
        Ok(())
    }

    async fn get_course_instances_by_year_and_semester(
        &self,
        year: i32,
        semester: Semester,
    ) -> Result<Vec<CourseInstance>, ApiError> {
        Ok(self
            .instances
            .read()
            .await
            .iter()
            .filter(|i| i.year == year && i.semester == semester)
            .cloned()
            .collect())
    }

    async fn get_course_instance(
        &self,
        year: i32,
        semester: Semester,
        course_id: &str,
    ) -> Result<CourseInstance, ApiError> {
        self.instances
            .read()
            .await
            .iter()
            .find(|i| i.year == year && i.semester == semester && i.course_id == course_id)
            .cloned()
            .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "Course instance not found"))
    }

    async fn delete_course_instance(
        &self,
        year: i32,
        semester: Semester,
        course_id: &str,
    ) -> Result<(), ApiError> {
        let mut instances = self.instances.write().await;
        let before = instances.len();
        instances.retain(|i| !(i.year == year && i.semester == semester && i.course_id == course_id));
        if instances.len() == before {
            return Err(rejected(StatusCode::NOT_FOUND, "Course instance not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, prerequisites: &[&str]) -> Course {
        Course {
            course_id: id.to_string(),
            title: format!("{} title", id),
            description: String::new(),
            prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_delete_referenced_course_conflicts() {
        let api = InMemoryCourseApi::with_courses(vec![
            course("CS101", &[]),
            course("CS209", &["CS101"]),
        ]);

        let err = api.delete_course("CS101").await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(api.get_all_courses().await.unwrap().len(), 2);

        api.delete_course("CS209").await.unwrap();
        api.delete_course("CS101").await.unwrap();
        assert!(api.get_all_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_instance_lifecycle() {
        let api = InMemoryCourseApi::with_courses(vec![course("CS209", &[])]);
        let new = NewCourseInstance {
            course_id: "CS209".to_string(),
            year: 2025,
            semester: Semester::Second,
        };

        api.create_course_instance(&new).await.unwrap();
        assert!(api.create_course_instance(&new).await.unwrap_err().is_conflict());

        let found = api
            .get_course_instance(2025, Semester::Second, "CS209")
            .await
            .unwrap();
        assert!(found.id.is_some());
        assert!(
            api.get_course_instances_by_year_and_semester(2025, Semester::First)
                .await
                .unwrap()
                .is_empty()
        );

        api.delete_course_instance(2025, Semester::Second, "CS209")
            .await
            .unwrap();
        let err = api
            .delete_course_instance(2025, Semester::Second, "CS209")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_update_keeps_route_id() {
        let api = InMemoryCourseApi::with_courses(vec![course("CS209", &[])]);
        let mut changed = course("OTHER", &[]);
        changed.title = "Renamed".to_string();

        api.update_course("CS209", &changed).await.unwrap();
        let stored = api.get_course_by_id("CS209").await.unwrap();
        assert_eq!(stored.title, "Renamed");
        assert!(api.get_course_by_id("OTHER").await.is_err());
    }
}

use tracing::{error, info};

use crate::api::CourseApi;
use crate::models::Course;
use crate::views::{DeleteAlert, Fetched};
use crate::views::layout::{self, escape, href};

pub const FETCH_FAILED: &str = "Failed to fetch courses";
pub const DELETE_CONFLICT: &str = "Cannot delete course: It is a prerequisite for other courses";
pub const DELETE_FAILED: &str = "Failed to delete course";
const CONFIRM_DELETE: &str = "Are you sure you want to delete this course?";

pub struct CourseList {
    pub courses: Fetched<Vec<Course>>,
    pub alert: Option<String>,
}

impl CourseList {
    pub async fn load(api: &dyn CourseApi) -> Self {
        let result = api.get_all_courses().await;
        Self {
            courses: Fetched::from_result(result, "courses", FETCH_FAILED),
            alert: None,
        }
    }

    pub fn with_alert(mut self, alert: Option<DeleteAlert>) -> Self {
        self.alert = alert.map(|a| alert_message(a).to_string());
        self
    }

    pub fn render(&self) -> String {
        let mut html = String::new();
        if let Some(alert) = &self.alert {
            html.push_str(&layout::alert(alert));
        }

        match &self.courses {
            Fetched::Failed(message) => html.push_str(&layout::error_block(message)),
            Fetched::Loaded(courses) => {
                html.push_str(
                    r#"<div class="card-header"><h2>Courses</h2><a href="/courses/new">Add New Course</a></div>"#,
                );
                if courses.is_empty() {
                    html.push_str(
                        r#"<div class="card"><p class="muted">No courses found. Create your first course!</p></div>"#,
                    );
                } else {
                    html.push_str(r#"<div class="grid">"#);
                    for course in courses {
                        html.push_str(&render_card(course));
                    }
                    html.push_str("</div>");
                }
            }
        }

        layout::page("Courses", &html)
    }
}

fn render_card(course: &Course) -> String {
    let id = escape(&course.course_id);
    let prerequisites = if course.prerequisites.is_empty() {
        String::new()
    } else {
        let badges: String = course
            .prerequisites
            .iter()
            .map(|p| format!(r#"<span class="badge">{}</span>"#, escape(p)))
            .collect();
        format!(
            r#"<div class="prerequisites"><h4>Prerequisites:</h4><div>{}</div></div>"#,
            badges
        )
    };

    format!(
        r#"<article class="card" id="course-{id}" data-key="{id}">
<div class="card-header">
<div><h3>{title}</h3><p class="course-id">{id}</p></div>
<div>
<a href="{edit}">Edit</a>
<form class="inline" method="post" action="{delete}" {confirm}><button type="submit">Delete</button></form>
</div>
</div>
<p class="muted">{description}</p>
{prerequisites}
</article>"#,
        id = id,
        title = escape(&course.title),
        edit = escape(&href(&["courses", "edit", course.course_id.as_str()])),
        delete = escape(&href(&["courses", "delete", course.course_id.as_str()])),
        confirm = layout::confirm_attr(CONFIRM_DELETE),
        description = escape(&course.description),
        prerequisites = prerequisites,
    )
}

fn alert_message(alert: DeleteAlert) -> &'static str {
    match alert {
        DeleteAlert::Conflict => DELETE_CONFLICT,
        DeleteAlert::Failed => DELETE_FAILED,
    }
}

/// Issues the delete. A 409 means another course still lists this one as
/// a prerequisite.
pub async fn delete_course(api: &dyn CourseApi, course_id: &str) -> Result<(), DeleteAlert> {
    match api.delete_course(course_id).await {
        Ok(()) => {
            info!("deleted course {}", course_id);
            Ok(())
        }
        Err(e) => {
            error!("Error deleting course {}: {}", course_id, e);
            if e.is_conflict() {
                Err(DeleteAlert::Conflict)
            } else {
                Err(DeleteAlert::Failed)
            }
        }
    }
}

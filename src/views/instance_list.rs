use chrono::{Datelike, Local};
use tracing::{error, info};

use crate::api::CourseApi;
use crate::models::{CourseInstance, MAX_YEAR, MIN_YEAR, Semester};
use crate::views::{DeleteAlert, Fetched};
use crate::views::layout::{self, escape, href};

pub const FETCH_FAILED: &str = "Failed to fetch course instances";
pub const DELETE_FAILED: &str = "Failed to delete course instance";
const CONFIRM_DELETE: &str = "Are you sure you want to delete this course instance?";

/// Year and semester a list page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceQuery {
    pub year: i32,
    pub semester: Semester,
}

impl InstanceQuery {
    pub fn new(year: i32, semester: Semester) -> Self {
        Self { year, semester }
    }

    /// Current local year, first semester.
    pub fn current() -> Self {
        Self::new(Local::now().year(), Semester::First)
    }

    pub fn path(&self) -> String {
        let (year, semester) = (self.year.to_string(), self.semester.to_string());
        href(&["instances", year.as_str(), semester.as_str()])
    }
}

pub struct InstanceList {
    pub query: InstanceQuery,
    pub instances: Fetched<Vec<CourseInstance>>,
    pub alert: Option<String>,
}

impl InstanceList {
    pub async fn load(api: &dyn CourseApi, query: InstanceQuery) -> Self {
        let result = api
            .get_course_instances_by_year_and_semester(query.year, query.semester)
            .await;
        Self {
            query,
            instances: Fetched::from_result(result, "course instances", FETCH_FAILED),
            alert: None,
        }
    }

    /// Instance deletes have no conflict case, so every alert reads the same.
    pub fn with_alert(mut self, alert: Option<DeleteAlert>) -> Self {
        self.alert = alert.map(|_| DELETE_FAILED.to_string());
        self
    }

    pub fn render(&self) -> String {
        let InstanceQuery { year, semester } = self.query;
        let mut html = String::new();

        html.push_str(
            r#"<div class="card-header"><h2>Course Instances</h2><a href="/instances/new">Add New Instance</a></div>"#,
        );
        html.push_str(&self.render_filter());

        if let Some(alert) = &self.alert {
            html.push_str(&layout::alert(alert));
        }

        match &self.instances {
            Fetched::Failed(message) => html.push_str(&layout::error_block(message)),
            Fetched::Loaded(instances) if instances.is_empty() => {
                html.push_str(&format!(
                    r#"<div class="card"><p class="muted">No course instances found for {} semester {}.</p></div>"#,
                    year, semester
                ));
            }
            Fetched::Loaded(instances) => {
                html.push_str(&format!(
                    r#"<div class="grid"><h3>Course Instances for {} - Semester {}</h3>"#,
                    year, semester
                ));
                for instance in instances {
                    html.push_str(&render_card(instance));
                }
                html.push_str("</div>");
            }
        }

        layout::page("Course Instances", &html)
    }

    fn render_filter(&self) -> String {
        let options: String = Semester::ALL
            .iter()
            .map(|s| {
                let selected = if *s == self.query.semester { " selected" } else { "" };
                format!(r#"<option value="{s}"{selected}>{s}</option>"#)
            })
            .collect();

        format!(
            r#"<div class="card">
<h3>Filter by Year and Semester</h3>
<form method="post" action="/instances">
<div class="field"><label for="year">Year</label><input id="year" name="year" type="number" value="{year}" placeholder="2024" min="{min}" max="{max}"/></div>
<div class="field"><label for="semester">Semester</label><select id="semester" name="semester">{options}</select></div>
<button type="submit">Search</button>
</form>
</div>"#,
            year = self.query.year,
            min = MIN_YEAR,
            max = MAX_YEAR,
            options = options,
        )
    }
}

fn render_card(instance: &CourseInstance) -> String {
    let key = instance.id.as_deref().unwrap_or(&instance.course_id);
    let (year, semester) = (instance.year.to_string(), instance.semester.to_string());
    let delete = href(&[
        "instances",
        year.as_str(),
        semester.as_str(),
        instance.course_id.as_str(),
        "delete",
    ]);

    format!(
        r#"<article class="card" data-key="{key}">
<div class="card-header">
<div><h3>{course_id}</h3><p class="muted">Year: {year} | Semester: {semester}</p></div>
<form class="inline" method="post" action="{delete}" {confirm}><button type="submit">Delete</button></form>
</div>
</article>"#,
        key = escape(key),
        course_id = escape(&instance.course_id),
        year = instance.year,
        semester = instance.semester,
        delete = escape(&delete),
        confirm = layout::confirm_attr(CONFIRM_DELETE),
    )
}

pub async fn delete_instance(
    api: &dyn CourseApi,
    query: InstanceQuery,
    course_id: &str,
) -> Result<(), DeleteAlert> {
    match api
        .delete_course_instance(query.year, query.semester, course_id)
        .await
    {
        Ok(()) => {
            info!(
                "deleted course instance {} {}/{}",
                course_id, query.year, query.semester
            );
            Ok(())
        }
        Err(e) => {
            error!("Error deleting instance {}: {}", course_id, e);
            Err(DeleteAlert::Failed)
        }
    }
}

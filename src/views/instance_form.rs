use serde::Deserialize;
use tracing::{error, info, warn};

use crate::api::CourseApi;
use crate::models::{Course, MAX_YEAR, MIN_YEAR, NewCourseInstance, Semester, year_in_range};
use crate::views::instance_list::InstanceQuery;
use crate::views::layout::{self, escape};

pub const CREATE_FAILED: &str = "Failed to create course instance";
pub const YEAR_OUT_OF_RANGE: &str = "Year must be between 2020 and 2030";
pub const COURSE_REQUIRED: &str = "Select a course";
const CREATING: &str = "Creating...";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceFormInput {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub semester: String,
}

pub struct InstanceForm {
    pub course_id: String,
    pub year: i32,
    pub semester: Semester,
    pub available: Vec<Course>,
    pub error: Option<String>,
}

impl InstanceForm {
    /// Empty selection, current year, first semester.
    pub fn new() -> Self {
        let InstanceQuery { year, semester } = InstanceQuery::current();
        Self {
            course_id: String::new(),
            year,
            semester,
            available: Vec::new(),
            error: None,
        }
    }

    pub async fn load(api: &dyn CourseApi) -> Self {
        let mut form = Self::new();
        form.available = fetch_available(api).await;
        form
    }

    /// Applies posted fields. A year or semester that does not parse keeps
    /// the default and leaves a message for the user.
    pub fn apply(&mut self, input: InstanceFormInput) {
        self.course_id = input.course_id.trim().to_string();
        if let Ok(semester) = input.semester.parse::<Semester>() {
            self.semester = semester;
        }
        match input.year.trim().parse::<i32>() {
            Ok(year) if year_in_range(year) => self.year = year,
            Ok(year) => {
                self.year = year;
                self.error = Some(YEAR_OUT_OF_RANGE.to_string());
            }
            Err(_) => self.error = Some(YEAR_OUT_OF_RANGE.to_string()),
        }
    }

    /// Submission is possible only once a course is chosen.
    pub fn can_submit(&self) -> bool {
        !self.course_id.is_empty()
    }

    pub async fn submit(&mut self, api: &dyn CourseApi) -> bool {
        if self.error.is_some() {
            return false;
        }
        if !self.can_submit() {
            self.error = Some(COURSE_REQUIRED.to_string());
            return false;
        }

        let instance = NewCourseInstance {
            course_id: self.course_id.clone(),
            year: self.year,
            semester: self.semester,
        };
        match api.create_course_instance(&instance).await {
            Ok(()) => {
                info!(
                    "created course instance {} {}/{}",
                    instance.course_id, instance.year, instance.semester
                );
                true
            }
            Err(e) => {
                error!("Error creating instance: {}", e);
                self.error = Some(e.user_message(CREATE_FAILED));
                false
            }
        }
    }

    pub fn render(&self) -> String {
        let error = self
            .error
            .as_deref()
            .map(layout::error_block)
            .unwrap_or_default();

        let courses: String = self
            .available
            .iter()
            .map(|c| {
                let selected = if c.course_id == self.course_id { " selected" } else { "" };
                format!(
                    r#"<option value="{id}"{selected}>{id} - {title}</option>"#,
                    id = escape(&c.course_id),
                    title = escape(&c.title),
                )
            })
            .collect();

        let semesters: String = Semester::ALL
            .iter()
            .map(|s| {
                let selected = if *s == self.semester { " selected" } else { "" };
                format!(r#"<option value="{s}"{selected}>{s}</option>"#)
            })
            .collect();

        let html = format!(
            r#"<div class="card">
<h2>Create New Course Instance</h2>
<form method="post" action="/instances/new" {pending}>
{error}
<div class="field">
<label for="courseId">Course</label>
<select id="courseId" name="courseId" onchange="this.form.elements.create.disabled = !this.value;">
<option value="">Select a course</option>
{courses}
</select>
</div>
<div class="field">
<label for="year">Year</label>
<input id="year" name="year" type="number" value="{year}" min="{min}" max="{max}" required/>
</div>
<div class="field">
<label for="semester">Semester</label>
<select id="semester" name="semester">{semesters}</select>
</div>
<div>
<button type="submit" name="create" value="1"{disabled}>Create Instance</button>
<a href="/instances">Cancel</a>
</div>
</form>
</div>"#,
            pending = layout::pending_attr("create", CREATING),
            error = error,
            courses = courses,
            year = self.year,
            min = MIN_YEAR,
            max = MAX_YEAR,
            semesters = semesters,
            disabled = if self.can_submit() { "" } else { " disabled" },
        );

        layout::page("Create New Course Instance", &html)
    }
}

impl Default for InstanceForm {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_available(api: &dyn CourseApi) -> Vec<Course> {
    match api.get_all_courses().await {
        Ok(courses) => courses,
        Err(e) => {
            warn!("Error fetching available courses: {}", e);
            Vec::new()
        }
    }
}

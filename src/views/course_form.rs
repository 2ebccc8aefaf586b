//! Create/edit form for a single course, including the prerequisite picker.
//!
//! The page is stateless between requests: every button posts the whole
//! form back, and the button that was pressed selects the [`FormAction`].

use tracing::{error, info, warn};

use crate::api::CourseApi;
use crate::models::Course;
use crate::views::layout::{self, escape, href};

pub const FETCH_COURSE_FAILED: &str = "Failed to fetch course details";
pub const SAVE_FAILED: &str = "Failed to save course";
pub const REQUIRED_FIELDS: &str = "Course ID and title are required";
const SAVING: &str = "Saving...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Search,
    Add(String),
    Remove(String),
    Save,
}

/// A posted course form, decoded from its raw field pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFormInput {
    pub draft: Course,
    pub filter: String,
    pub action: FormAction,
}

impl CourseFormInput {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut draft = Course::default();
        let mut filter = String::new();
        let mut action = FormAction::Save;

        for (key, value) in pairs {
            match key.as_str() {
                "courseId" => draft.course_id = value.trim().to_string(),
                "title" => draft.title = value,
                "description" => draft.description = value,
                "prerequisite" => {
                    draft.add_prerequisite(&value);
                }
                "prerequisiteFilter" => filter = value,
                "search" => action = FormAction::Search,
                "add" => action = FormAction::Add(value),
                "remove" => action = FormAction::Remove(value),
                _ => {}
            }
        }

        Self {
            draft,
            filter,
            action,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CourseForm {
    pub mode: Mode,
    pub draft: Course,
    pub filter: String,
    pub available: Vec<Course>,
    pub error: Option<String>,
}

impl CourseForm {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            draft: Course::default(),
            filter: String::new(),
            available: Vec::new(),
            error: None,
        }
    }

    /// Activation: the picker list and, when editing, the course itself.
    /// The two fetches run concurrently and fill disjoint fields.
    pub async fn load(api: &dyn CourseApi, mode: Mode) -> Self {
        let mut form = Self::new(mode);

        match form.mode.clone() {
            Mode::Create => form.available = fetch_available(api).await,
            Mode::Edit(course_id) => {
                let (available, course) =
                    tokio::join!(fetch_available(api), api.get_course_by_id(&course_id));
                form.available = available;
                match course {
                    Ok(course) => form.draft = course,
                    Err(e) => {
                        error!("Error fetching course {}: {}", course_id, e);
                        form.error = Some(FETCH_COURSE_FAILED.to_string());
                    }
                }
            }
        }

        form
    }

    /// Rebuilds the form from a post. In edit mode the id always comes
    /// from the route; the disabled input is never submitted.
    pub async fn from_input(api: &dyn CourseApi, mode: Mode, input: CourseFormInput) -> Self {
        let mut form = Self::new(mode);
        form.draft = input.draft;
        form.filter = input.filter;
        if let Mode::Edit(course_id) = &form.mode {
            form.draft.course_id = course_id.clone();
            // The disabled id input is not posted, so self-reference is checked here.
            form.draft.remove_prerequisite(course_id);
        }
        form.available = fetch_available(api).await;
        form
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Edit(_))
    }

    /// Courses offered by the picker for the current filter text.
    pub fn suggestions(&self) -> Vec<&Course> {
        let needle = self.filter.to_lowercase();
        self.available
            .iter()
            .filter(|c| c.course_id.to_lowercase().contains(&needle))
            .filter(|c| c.course_id != self.draft.course_id)
            .filter(|c| !self.draft.has_prerequisite(&c.course_id))
            .collect()
    }

    pub fn add_prerequisite(&mut self, id: &str) {
        if self.draft.add_prerequisite(id) {
            self.filter.clear();
        }
    }

    pub fn remove_prerequisite(&mut self, id: &str) {
        self.draft.remove_prerequisite(id);
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.draft.course_id.trim().is_empty() || self.draft.title.trim().is_empty() {
            return Err(REQUIRED_FIELDS.to_string());
        }
        Ok(())
    }

    /// Creates or updates depending on mode. On failure the form keeps its
    /// contents and carries the message to show.
    pub async fn save(&mut self, api: &dyn CourseApi) -> bool {
        self.error = None;
        if let Err(message) = self.validate() {
            self.error = Some(message);
            return false;
        }

        let result = match &self.mode {
            Mode::Create => api.create_course(&self.draft).await,
            Mode::Edit(course_id) => api.update_course(course_id, &self.draft).await,
        };

        match result {
            Ok(()) => {
                info!("saved course {}", self.draft.course_id);
                true
            }
            Err(e) => {
                error!("Error saving course {}: {}", self.draft.course_id, e);
                self.error = Some(e.user_message(SAVE_FAILED));
                false
            }
        }
    }

    fn action_path(&self) -> String {
        match &self.mode {
            Mode::Create => "/courses/new".to_string(),
            Mode::Edit(course_id) => href(&["courses", "edit", course_id.as_str()]),
        }
    }

    pub fn render(&self) -> String {
        let heading = if self.is_editing() {
            "Edit Course"
        } else {
            "Create New Course"
        };
        let submit = if self.is_editing() {
            "Update Course"
        } else {
            "Create Course"
        };

        let error = self
            .error
            .as_deref()
            .map(layout::error_block)
            .unwrap_or_default();

        let html = format!(
            r#"<div class="card">
<h2>{heading}</h2>
<form method="post" action="{action}" {pending}>
<button type="submit" name="save" value="1" hidden tabindex="-1" aria-hidden="true"></button>
{error}
<div class="field">
<label for="courseId">Course ID</label>
<input id="courseId" name="courseId" value="{course_id}" placeholder="e.g., CS 209" required{disabled}/>
</div>
<div class="field">
<label for="title">Title</label>
<input id="title" name="title" value="{title}" placeholder="e.g., Introduction to Computer Programming" required/>
</div>
<div class="field">
<label for="description">Description</label>
<textarea id="description" name="description" rows="4" placeholder="Course description...">{description}</textarea>
</div>
<div class="field">
<label for="prerequisiteFilter">Prerequisites</label>
<div>
<input id="prerequisiteFilter" name="prerequisiteFilter" value="{filter}" placeholder="Search for prerequisite courses..."/>
<button type="submit" name="search" value="1" formnovalidate>Search</button>
</div>
{suggestions}
{chosen}
</div>
<div>
<button type="submit" name="save" value="1">{submit}</button>
<a href="/">Cancel</a>
</div>
</form>
</div>"#,
            heading = heading,
            action = escape(&self.action_path()),
            pending = layout::pending_attr("save", SAVING),
            error = error,
            course_id = escape(&self.draft.course_id),
            disabled = if self.is_editing() { " disabled" } else { "" },
            title = escape(&self.draft.title),
            description = escape(&self.draft.description),
            filter = escape(&self.filter),
            suggestions = self.render_suggestions(),
            chosen = self.render_chosen(),
            submit = submit,
        );

        layout::page(heading, &html)
    }

    fn render_suggestions(&self) -> String {
        if self.filter.is_empty() {
            return String::new();
        }
        let suggestions = self.suggestions();
        if suggestions.is_empty() {
            return String::new();
        }

        let items: String = suggestions
            .iter()
            .map(|c| {
                format!(
                    r#"<button type="submit" name="add" value="{id}" formnovalidate><strong>{id}</strong> <span class="muted">{title}</span></button>"#,
                    id = escape(&c.course_id),
                    title = escape(&c.title),
                )
            })
            .collect();
        format!(r#"<div class="suggestions">{}</div>"#, items)
    }

    fn render_chosen(&self) -> String {
        if self.draft.prerequisites.is_empty() {
            return String::new();
        }

        let badges: String = self
            .draft
            .prerequisites
            .iter()
            .map(|p| {
                format!(
                    r#"<span class="badge">{id}<input type="hidden" name="prerequisite" value="{id}"/><button type="submit" name="remove" value="{id}" formnovalidate aria-label="Remove {id}">&times;</button></span>"#,
                    id = escape(p),
                )
            })
            .collect();
        format!(r#"<div class="chosen">{}</div>"#, badges)
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

use std::sync::Arc;

use crate::api::CourseApi;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CourseApi>,
}

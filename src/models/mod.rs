pub mod course;
pub mod instance;

pub use course::Course;
pub use instance::{
    CourseInstance, MAX_YEAR, MIN_YEAR, NewCourseInstance, Semester, year_in_range,
};

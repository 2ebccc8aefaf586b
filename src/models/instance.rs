use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2030;

/// Semester number. Only 1 and 2 exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Semester {
    #[default]
    First,
    Second,
}

impl Semester {
    pub const ALL: [Semester; 2] = [Semester::First, Semester::Second];

    pub fn number(self) -> u8 {
        match self {
            Semester::First => 1,
            Semester::Second => 2,
        }
    }
}

impl TryFrom<u8> for Semester {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Semester::First),
            2 => Ok(Semester::Second),
            other => Err(format!("invalid semester: {}", other)),
        }
    }
}

impl From<Semester> for u8 {
    fn from(value: Semester) -> Self {
        value.number()
    }
}

impl std::str::FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid semester: {}", s))?;
        Semester::try_from(n)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInstance {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opaque_id"
    )]
    pub id: Option<String>,
    pub course_id: String,
    pub year: i32,
    pub semester: Semester,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseInstance {
    pub course_id: String,
    pub year: i32,
    pub semester: Semester,
}

pub fn year_in_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// The backend's instance id is only a rendering key; accept a string or a number.
fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semester_rejects_out_of_range() {
        assert_eq!("2".parse::<Semester>(), Ok(Semester::Second));
        assert!("3".parse::<Semester>().is_err());
        assert!("x".parse::<Semester>().is_err());
        assert!(serde_json::from_str::<Semester>("0").is_err());
    }

    #[test]
    fn test_instance_accepts_numeric_id() {
        let inst: CourseInstance = serde_json::from_str(
            r#"{"id":42,"courseId":"CS209","year":2025,"semester":2}"#,
        )
        .unwrap();
        assert_eq!(inst.id.as_deref(), Some("42"));
        assert_eq!(inst.semester, Semester::Second);
    }

    #[test]
    fn test_new_instance_wire_shape() {
        let body = serde_json::to_value(NewCourseInstance {
            course_id: "CS209".to_string(),
            year: 2025,
            semester: Semester::Second,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"courseId": "CS209", "year": 2025, "semester": 2})
        );
    }

    #[test]
    fn test_year_bounds() {
        assert!(year_in_range(2020));
        assert!(year_in_range(2030));
        assert!(!year_in_range(2031));
        assert!(!year_in_range(2019));
    }
}

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prerequisites: Vec<String>,
}

impl Course {
    /// Appends `id` to the prerequisite list. Returns false (and leaves the
    /// list untouched) for an empty id, the course's own id, or a duplicate.
    pub fn add_prerequisite(&mut self, id: &str) -> bool {
        if id.is_empty() || id == self.course_id || self.has_prerequisite(id) {
            return false;
        }
        self.prerequisites.push(id.to_string());
        true
    }

    pub fn remove_prerequisite(&mut self, id: &str) {
        self.prerequisites.retain(|p| p != id);
    }

    pub fn has_prerequisite(&self, id: &str) -> bool {
        self.prerequisites.iter().any(|p| p == id)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

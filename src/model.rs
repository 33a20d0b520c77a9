use chrono::NaiveDateTime;

pub const NO_DUE_DATE: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: usize,
    pub course_title: String,
    pub task_type: String,
    pub label: String,
    pub due_date: String,
    pub is_completed: bool,
    pub completed_at: Option<NaiveDateTime>,
}

impl Task {
    pub fn status(&self) -> &'static str {
        match self.is_completed {
            true => "Completed",
            false => "Pending",
        }
    }
}

/// Fields collected by the add flow, before the store assigns an id.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub course_title: String,
    pub task_type: String,
    pub label: String,
    pub due_date: String,
}

impl NewTask {
    pub fn new(
        course_title: impl Into<String>,
        task_type: impl Into<String>,
        label: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        NewTask {
            course_title: course_title.into(),
            task_type: task_type.into(),
            label: label.into(),
            due_date: due_date.into(),
        }
    }
}

use chrono::Local;

use crate::error::StoreError;
use crate::model::{NewTask, Task, NO_DUE_DATE};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// In-memory task list. Ids start at 1 and are never handed out twice.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: usize,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore {
            tasks: vec![],
            next_id: 1,
        }
    }

    pub fn add(&mut self, draft: NewTask) -> &Task {
        let due_date = match draft.due_date.trim().is_empty() {
            true => NO_DUE_DATE.to_string(),
            false => draft.due_date,
        };
        let task = Task {
            id: self.next_id,
            course_title: draft.course_title,
            task_type: draft.task_type,
            label: draft.label,
            due_date,
            is_completed: false,
            completed_at: None,
        };
        self.next_id += 1;

        log::debug!("Adding task {} ({:?})", task.id, task.label);
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn find_by_id(&self, id: usize) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn delete(&mut self, id: usize) -> StoreResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;

        log::debug!("Deleting task {}", id);
        Ok(self.tasks.remove(index))
    }

    pub fn toggle_completed(&mut self, id: usize) -> StoreResult<&Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;

        task.is_completed = !task.is_completed;
        task.completed_at = match task.is_completed {
            true => Some(Local::now().naive_local()),
            false => None,
        };

        log::debug!("Task {} is now {}", id, task.status());
        Ok(task)
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

//! # Board State
//!
//! In-memory copy of one board: its lists and, per list, its tasks in
//! position order. The view renders from here.
//!
//! Two kinds of input change it:
//!
//! - **Drag end** (`apply_drag_end`): the user's own move, applied at once and
//!   returned as the `MoveRequest` to send.
//! - **Server tasks** (`apply_event`, `apply_task`): confirmed responses and
//!   broadcast events, merged by task id.
//!
//! Both paths renumber the affected lists so positions always equal the index
//! in the list, which is the arithmetic the server applies for the same move.
//! Merging is idempotent: the same event applied twice leaves the same state.

use std::collections::HashMap;

use uuid::Uuid;

use crate::shared::api::UpdateTaskRequest;
use crate::shared::{BoardEvent, Task, TaskList};

/// What a dragged task was dropped on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// A list container; the task goes to the end of the list
    List(Uuid),
    /// Another task; the dragged task takes that task's index
    Task(Uuid),
}

/// A move to persist with `PUT /api/tasks/{task_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub task_id: Uuid,
    pub list_id: Uuid,
    pub position: i64,
}

impl MoveRequest {
    pub fn to_update(&self) -> UpdateTaskRequest {
        UpdateTaskRequest::move_to(self.list_id, self.position)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    board_id: Uuid,
    lists: Vec<TaskList>,
    tasks: HashMap<Uuid, Vec<Task>>,
}

impl BoardState {
    pub fn new(board_id: Uuid, mut lists: Vec<TaskList>) -> Self {
        lists.sort_by_key(|list| list.position);
        let tasks = lists.iter().map(|list| (list.id, Vec::new())).collect();
        Self {
            board_id,
            lists,
            tasks,
        }
    }

    /// Build from a server snapshot of lists and tasks
    pub fn from_snapshot(board_id: Uuid, lists: Vec<TaskList>, tasks: Vec<Task>) -> Self {
        let mut state = Self::new(board_id, lists);
        let mut by_list: HashMap<Uuid, Vec<Task>> = HashMap::new();
        for task in tasks {
            by_list.entry(task.list_id).or_default().push(task);
        }
        for (list_id, tasks) in by_list {
            state.set_list_tasks(list_id, tasks);
        }
        state
    }

    pub fn board_id(&self) -> Uuid {
        self.board_id
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    /// Tasks of a list in position order (empty for an unknown list)
    pub fn tasks(&self, list_id: Uuid) -> &[Task] {
        self.tasks.get(&list_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        let (list_id, index) = self.locate(task_id)?;
        self.tasks.get(&list_id).and_then(|tasks| tasks.get(index))
    }

    pub fn task_count(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }

    /// Replace a list's tasks with a server copy
    pub fn set_list_tasks(&mut self, list_id: Uuid, mut tasks: Vec<Task>) {
        tasks.sort_by_key(|task| task.position);
        renumber(&mut tasks);
        self.tasks.insert(list_id, tasks);
    }

    /// Apply a drop locally and describe the move to persist
    ///
    /// The dragged task leaves its list first; the drop index is then read
    /// from the list as it stands without it. Returns `None`, leaving the
    /// state untouched, when the dragged task or the drop target is unknown.
    pub fn apply_drag_end(&mut self, active: Uuid, target: DropTarget) -> Option<MoveRequest> {
        let (source_list, source_index) = self.locate(active)?;
        let moved = self.tasks.get_mut(&source_list)?.remove(source_index);

        let destination = match target {
            DropTarget::List(list_id) => self.tasks.get(&list_id).map(|tasks| (list_id, tasks.len())),
            DropTarget::Task(over) => self.locate(over),
        };

        let Some((target_list, target_index)) = destination else {
            // Put it back where it was.
            if let Some(tasks) = self.tasks.get_mut(&source_list) {
                tasks.insert(source_index, moved);
            }
            return None;
        };

        let tasks = self.tasks.entry(target_list).or_default();
        tasks.insert(target_index, moved);
        renumber(tasks);
        if let Some(task) = tasks.get_mut(target_index) {
            task.list_id = target_list;
        }
        if source_list != target_list {
            if let Some(tasks) = self.tasks.get_mut(&source_list) {
                renumber(tasks);
            }
        }

        Some(MoveRequest {
            task_id: active,
            list_id: target_list,
            position: target_index as i64,
        })
    }

    /// Merge a broadcast event; events for other boards are ignored
    ///
    /// Returns whether the event belonged to this board.
    pub fn apply_event(&mut self, event: &BoardEvent) -> bool {
        if event.board_id() != self.board_id {
            return false;
        }
        match event {
            BoardEvent::TaskCreated { task, .. } | BoardEvent::TaskUpdated { task, .. } => {
                self.apply_task(task.clone());
            }
            BoardEvent::TaskDeleted { task_id, .. } => {
                self.remove_task(*task_id);
            }
        }
        true
    }

    /// Insert or replace a task at its server position
    pub fn apply_task(&mut self, task: Task) {
        let previous_list = self.take(task.id);

        let list_id = task.list_id;
        let tasks = self.tasks.entry(list_id).or_default();
        let index = usize::try_from(task.position).unwrap_or(0).min(tasks.len());
        tasks.insert(index, task);
        renumber(tasks);

        if let Some(previous) = previous_list.filter(|previous| *previous != list_id) {
            if let Some(tasks) = self.tasks.get_mut(&previous) {
                renumber(tasks);
            }
        }
    }

    pub fn remove_task(&mut self, task_id: Uuid) -> Option<Task> {
        let (list_id, index) = self.locate(task_id)?;
        let tasks = self.tasks.get_mut(&list_id)?;
        let removed = tasks.remove(index);
        renumber(tasks);
        Some(removed)
    }

    fn take(&mut self, task_id: Uuid) -> Option<Uuid> {
        let (list_id, index) = self.locate(task_id)?;
        self.tasks.get_mut(&list_id)?.remove(index);
        Some(list_id)
    }

    fn locate(&self, task_id: Uuid) -> Option<(Uuid, usize)> {
        self.tasks.iter().find_map(|(list_id, tasks)| {
            tasks
                .iter()
                .position(|task| task.id == task_id)
                .map(|index| (*list_id, index))
        })
    }
}

fn renumber(tasks: &mut [Task]) {
    for (index, task) in tasks.iter_mut().enumerate() {
        task.position = index as i64;
    }
}

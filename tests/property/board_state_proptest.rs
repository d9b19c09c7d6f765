//! Property-based tests for the client board state
//!
//! Random drag sequences must keep every list dense and never lose or
//! duplicate a task; merging server echoes must be idempotent.

use chrono::Utc;
use proptest::prelude::*;
use taskboard::client::{BoardState, DropTarget};
use taskboard::shared::{BoardEvent, Task, TaskList};
use uuid::Uuid;

const LISTS: usize = 3;

fn board(sizes: &[usize]) -> BoardState {
    let board_id = Uuid::new_v4();
    let now = Utc::now();
    let lists: Vec<TaskList> = (0..LISTS)
        .map(|i| TaskList {
            id: Uuid::new_v4(),
            board_id,
            title: format!("List {i}"),
            position: i as i64,
            created_at: now,
        })
        .collect();

    let mut tasks = Vec::new();
    for (list, size) in lists.iter().zip(sizes) {
        for position in 0..*size {
            tasks.push(Task {
                id: Uuid::new_v4(),
                board_id,
                list_id: list.id,
                title: format!("{} #{position}", list.title),
                description: String::new(),
                assigned_to: Vec::new(),
                position: position as i64,
                created_at: now,
                updated_at: now,
            });
        }
    }
    BoardState::from_snapshot(board_id, lists, tasks)
}

fn all_task_ids(state: &BoardState) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = state
        .lists()
        .iter()
        .flat_map(|list| state.tasks(list.id).iter().map(|task| task.id))
        .collect();
    ids.sort();
    ids
}

fn assert_dense(state: &BoardState) -> Result<(), TestCaseError> {
    for list in state.lists() {
        let tasks = state.tasks(list.id);
        for (index, task) in tasks.iter().enumerate() {
            prop_assert_eq!(task.position, index as i64);
            prop_assert_eq!(task.list_id, list.id);
        }
    }
    Ok(())
}

/// A drag: which task (by global index), onto a list or onto a task
fn drag() -> impl Strategy<Value = (usize, bool, usize)> {
    (0..64usize, any::<bool>(), 0..64usize)
}

fn resolve(state: &BoardState, (active, onto_list, over): (usize, bool, usize)) -> Option<(Uuid, DropTarget)> {
    let ids = all_task_ids(state);
    if ids.is_empty() {
        return None;
    }
    let active = ids[active % ids.len()];
    let target = if onto_list {
        DropTarget::List(state.lists()[over % LISTS].id)
    } else {
        DropTarget::Task(ids[over % ids.len()])
    };
    Some((active, target))
}

proptest! {
    #[test]
    fn drags_keep_lists_dense(
        sizes in prop::collection::vec(0..6usize, LISTS),
        drags in prop::collection::vec(drag(), 1..20),
    ) {
        let mut state = board(&sizes);
        let before = all_task_ids(&state);

        for drag in drags {
            if let Some((active, target)) = resolve(&state, drag) {
                if let Some(request) = state.apply_drag_end(active, target) {
                    let task = state.task(active).unwrap();
                    prop_assert_eq!(task.list_id, request.list_id);
                    prop_assert_eq!(task.position, request.position);
                }
            }
            assert_dense(&state)?;
        }

        prop_assert_eq!(all_task_ids(&state), before);
    }

    #[test]
    fn echoed_update_is_idempotent(
        sizes in prop::collection::vec(1..6usize, LISTS),
        drag in drag(),
    ) {
        let mut state = board(&sizes);
        let Some((active, target)) = resolve(&state, drag) else {
            return Ok(());
        };
        state.apply_drag_end(active, target);
        let optimistic: Vec<Vec<(Uuid, i64)>> = state
            .lists()
            .iter()
            .map(|list| state.tasks(list.id).iter().map(|t| (t.id, t.position)).collect())
            .collect();

        let echo = BoardEvent::task_updated(state.task(active).cloned().unwrap());
        state.apply_event(&echo);
        state.apply_event(&echo);

        let merged: Vec<Vec<(Uuid, i64)>> = state
            .lists()
            .iter()
            .map(|list| state.tasks(list.id).iter().map(|t| (t.id, t.position)).collect())
            .collect();
        prop_assert_eq!(merged, optimistic);
        assert_dense(&state)?;
    }
}

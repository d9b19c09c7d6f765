/**
 * Task Ordering
 *
 * Positions within a list are kept dense: sorted ascending they are exactly
 * `0..n`. Every move is expressed as a `MovePlan`, a set of range shifts over
 * neighbouring tasks followed by the placement of the moved task.
 *
 * # Same-list moves
 *
 * - forward (`to > from`): positions in `(from, to]` shift down by one
 * - backward (`to < from`): positions in `[to, from)` shift up by one
 * - equal: nothing changes
 *
 * # Cross-list moves
 *
 * Positions after `from` in the source list shift down by one, positions at
 * or after `to` in the destination list shift up by one, and the task is
 * placed at `to` in the destination list.
 *
 * Planning is pure; `tasks::db` executes a plan inside one transaction.
 */

use uuid::Uuid;

/// Where a task sits: its list and its rank within that list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub list_id: Uuid,
    pub position: i64,
}

impl Slot {
    pub fn new(list_id: Uuid, position: i64) -> Self {
        Self { list_id, position }
    }
}

/// Adds `delta` to every position in `from..=to` of one list
///
/// `to == None` leaves the range open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeShift {
    pub list_id: Uuid,
    pub from: i64,
    pub to: Option<i64>,
    pub delta: i64,
}

impl RangeShift {
    /// Whether a task at `slot` is moved by this shift
    pub fn covers(&self, slot: Slot) -> bool {
        slot.list_id == self.list_id
            && slot.position >= self.from
            && self.to.map_or(true, |to| slot.position <= to)
    }
}

/// Shifts to apply to the other tasks, then the moved task's new slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub shifts: Vec<RangeShift>,
    pub placement: Slot,
}

impl MovePlan {
    /// True when neither the task nor any neighbour changes
    pub fn is_noop(&self, current: Slot) -> bool {
        self.shifts.is_empty() && self.placement == current
    }
}

/// Plan moving a task from `current` to `requested` in `target_list`.
///
/// `siblings` is the number of tasks in the target list other than the moved
/// task. The requested position is clamped to `0..=siblings`, so dropping past
/// the end of a list appends. Callers reject negative positions before
/// planning.
pub fn plan_move(current: Slot, target_list: Uuid, requested: i64, siblings: i64) -> MovePlan {
    let target = requested.clamp(0, siblings.max(0));
    let placement = Slot::new(target_list, target);

    if target_list == current.list_id {
        let shifts = if target > current.position {
            vec![RangeShift {
                list_id: current.list_id,
                from: current.position + 1,
                to: Some(target),
                delta: -1,
            }]
        } else if target < current.position {
            vec![RangeShift {
                list_id: current.list_id,
                from: target,
                to: Some(current.position - 1),
                delta: 1,
            }]
        } else {
            Vec::new()
        };
        return MovePlan { shifts, placement };
    }

    MovePlan {
        shifts: vec![
            RangeShift {
                list_id: current.list_id,
                from: current.position + 1,
                to: None,
                delta: -1,
            },
            RangeShift {
                list_id: target_list,
                from: target,
                to: None,
                delta: 1,
            },
        ],
        placement,
    }
}

/// Shift that closes the gap left by removing the task at `removed`
pub fn plan_removal(removed: Slot) -> RangeShift {
    RangeShift {
        list_id: removed.list_id,
        from: removed.position + 1,
        to: None,
        delta: -1,
    }
}

use crate::model::task::Task;

/// Single-slot undo: a deep copy of the task list taken before the most
/// recent mutating command. Not a stack.
#[derive(Debug, Clone, Default)]
pub struct UndoBuffer {
    slot: Option<Vec<Task>>,
}

impl UndoBuffer {
    pub fn new() -> Self {
        UndoBuffer { slot: None }
    }

    /// Copy `tasks` into the slot, replacing any earlier snapshot
    pub fn snapshot(&mut self, tasks: &[Task]) {
        self.slot = Some(tasks.to_vec());
    }

    /// Take the snapshot out, leaving the slot empty
    pub fn restore(&mut self) -> Option<Vec<Task>> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

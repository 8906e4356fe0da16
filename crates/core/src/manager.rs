use chrono::{DateTime, Utc};

use crate::countdown::StatusBoard;
use crate::error::TaskError;
use crate::model::Task;
use crate::prompt::TaskSubmission;
use crate::store::TaskStore;

/// Authoritative in-memory task collection layered over a [`TaskStore`].
///
/// Every mutation touches the store and the in-memory list together; when
/// the store rejects a change the memory side is rolled back so the two
/// never drift. The countdown board is rebuilt after every mutation and on
/// each clock tick.
pub struct TaskManager<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
    board: StatusBoard,
}

impl<S: TaskStore> TaskManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            board: StatusBoard::default(),
        }
    }

    /// Replace the in-memory collection with the store's contents.
    pub fn load(&mut self, now: DateTime<Utc>) -> Result<(), TaskError> {
        self.tasks = self.store.list_all()?;
        self.board.rebuild(&self.tasks, now);
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn board(&self) -> &StatusBoard {
        &self.board
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Refresh every countdown against the current clock.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.board.rebuild(&self.tasks, now);
    }

    /// Validate a submission and append the stored task to the collection.
    pub fn add(
        &mut self,
        submission: TaskSubmission,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskError> {
        let (text, deadline) = submission.into_fields()?;
        let task = self.store.create(&text, &deadline)?;
        tracing::debug!(task_id = task.id.as_str(), "created task");
        self.tasks.push(task.clone());
        self.board.rebuild(&self.tasks, now);
        Ok(task)
    }

    /// Flip a task's completion flag, returning the new state.
    pub fn toggle(&mut self, id: &str, now: DateTime<Utc>) -> Result<bool, TaskError> {
        let index = self.index_of(id)?;
        let next = !self.tasks[index].completed;
        self.tasks[index].completed = next;
        if let Err(err) = self.store.set_completed(id, next) {
            self.tasks[index].completed = !next;
            self.board.rebuild(&self.tasks, now);
            tracing::warn!(task_id = id, error = %err, "store rejected toggle, rolled back");
            return Err(err.into());
        }
        tracing::debug!(task_id = id, completed = next, "toggled task");
        self.board.rebuild(&self.tasks, now);
        Ok(next)
    }

    /// Mark a task completed regardless of its current state.
    pub fn mark_complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<(), TaskError> {
        let index = self.index_of(id)?;
        let previous = self.tasks[index].completed;
        self.tasks[index].completed = true;
        if let Err(err) = self.store.set_completed(id, true) {
            self.tasks[index].completed = previous;
            self.board.rebuild(&self.tasks, now);
            tracing::warn!(task_id = id, error = %err, "store rejected completion, rolled back");
            return Err(err.into());
        }
        tracing::debug!(task_id = id, "marked task complete");
        self.board.rebuild(&self.tasks, now);
        Ok(())
    }

    /// Replace a task's text and deadline, keeping its id and completion.
    ///
    /// The store commits first; memory only changes once the row is safe.
    pub fn edit(
        &mut self,
        id: &str,
        submission: TaskSubmission,
        now: DateTime<Utc>,
    ) -> Result<(), TaskError> {
        let (text, deadline) = submission.into_fields()?;
        let index = self.index_of(id)?;
        let completed = self.tasks[index].completed;
        self.store.replace_fields(id, &text, &deadline, completed)?;
        tracing::debug!(task_id = id, "edited task");
        self.tasks[index].text = text;
        self.tasks[index].deadline = deadline;
        self.board.rebuild(&self.tasks, now);
        Ok(())
    }

    /// Remove a task, restoring it at its old position if the store fails.
    pub fn delete(&mut self, id: &str, now: DateTime<Utc>) -> Result<Task, TaskError> {
        let index = self.index_of(id)?;
        let task = self.tasks.remove(index);
        if let Err(err) = self.store.remove(id) {
            self.tasks.insert(index, task);
            self.board.rebuild(&self.tasks, now);
            tracing::warn!(task_id = id, error = %err, "store rejected delete, restored task");
            return Err(err.into());
        }
        tracing::debug!(task_id = id, "deleted task");
        self.board.rebuild(&self.tasks, now);
        Ok(task)
    }

    fn index_of(&self, id: &str) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| TaskError::UnknownId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::countdown::TimeLeft;
    use crate::store::StoreError;

    /// In-memory store with a switch for simulating persistence failures.
    struct MemoryStore {
        rows: RefCell<Vec<Task>>,
        counter: Cell<u32>,
        fail: Rc<Cell<bool>>,
    }

    impl MemoryStore {
        fn new() -> (Self, Rc<Cell<bool>>) {
            let fail = Rc::new(Cell::new(false));
            (
                Self {
                    rows: RefCell::new(Vec::new()),
                    counter: Cell::new(0),
                    fail: Rc::clone(&fail),
                },
                fail,
            )
        }

        fn guard(&self) -> Result<(), StoreError> {
            if self.fail.get() {
                return Err(StoreError::Unavailable("store offline".into()));
            }
            Ok(())
        }

        fn snapshot(&self) -> Vec<Task> {
            self.rows.borrow().clone()
        }
    }

    impl TaskStore for MemoryStore {
        fn list_all(&self) -> Result<Vec<Task>, StoreError> {
            self.guard()?;
            Ok(self.rows.borrow().clone())
        }

        fn create(&self, text: &str, deadline: &str) -> Result<Task, StoreError> {
            self.guard()?;
            let n = self.counter.get() + 1;
            self.counter.set(n);
            let task = Task {
                id: format!("task-{n}"),
                text: text.to_string(),
                completed: false,
                deadline: deadline.to_string(),
            };
            self.rows.borrow_mut().push(task.clone());
            Ok(task)
        }

        fn set_completed(&self, id: &str, completed: bool) -> Result<(), StoreError> {
            self.guard()?;
            let mut rows = self.rows.borrow_mut();
            let row = rows
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| StoreError::MissingRow(id.to_string()))?;
            row.completed = completed;
            Ok(())
        }

        fn replace_fields(
            &self,
            id: &str,
            text: &str,
            deadline: &str,
            completed: bool,
        ) -> Result<(), StoreError> {
            self.guard()?;
            let mut rows = self.rows.borrow_mut();
            let row = rows
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| StoreError::MissingRow(id.to_string()))?;
            row.text = text.to_string();
            row.deadline = deadline.to_string();
            row.completed = completed;
            Ok(())
        }

        fn remove(&self, id: &str) -> Result<(), StoreError> {
            self.guard()?;
            self.rows.borrow_mut().retain(|task| task.id != id);
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2031, 3, 1, 12, 0, 0)
            .single()
            .expect("timestamp")
    }

    fn submission(text: &str, deadline: &str) -> TaskSubmission {
        TaskSubmission::new(text, deadline)
    }

    fn manager_with_tasks(
        specs: &[(&str, &str)],
    ) -> (TaskManager<MemoryStore>, Rc<Cell<bool>>) {
        let (store, fail) = MemoryStore::new();
        let mut manager = TaskManager::new(store);
        for (text, deadline) in specs {
            manager
                .add(submission(text, deadline), now())
                .expect("seed task");
        }
        (manager, fail)
    }

    #[test]
    fn load_pulls_existing_rows() {
        let (store, _fail) = MemoryStore::new();
        store
            .create("Existing", "2031-03-01T14:00:00Z")
            .expect("seed row");

        let mut manager = TaskManager::new(store);
        manager.load(now()).expect("load");

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.tasks()[0].text, "Existing");
        assert_eq!(
            manager.board().status("task-1"),
            Some(TimeLeft::Counting {
                hours: 2,
                minutes: 0,
                seconds: 0
            })
        );
    }

    #[test]
    fn add_appends_in_order_with_store_ids() {
        let (mut manager, _fail) = manager_with_tasks(&[]);

        let first = manager
            .add(submission("First", "2031-03-01T14:00:00Z"), now())
            .expect("add first");
        let second = manager
            .add(submission("Second", "2031-03-01T15:00:00Z"), now())
            .expect("add second");

        assert_eq!(first.id, "task-1");
        assert_eq!(second.id, "task-2");
        assert_eq!(manager.tasks().len(), 2);
        assert_eq!(manager.tasks()[0].text, "First");
        assert_eq!(manager.tasks()[1].text, "Second");
        assert_eq!(manager.store.snapshot(), manager.tasks().to_vec());
    }

    #[test]
    fn add_populates_the_board_immediately() {
        let (mut manager, _fail) = manager_with_tasks(&[]);
        manager
            .add(submission("Soon", "2031-03-01T14:05:10Z"), now())
            .expect("add");

        assert_eq!(
            manager.board().status("task-1"),
            Some(TimeLeft::Counting {
                hours: 2,
                minutes: 5,
                seconds: 10
            })
        );
    }

    #[test]
    fn add_rejects_blank_text() {
        let (mut manager, _fail) = manager_with_tasks(&[]);
        let err = manager
            .add(submission("   ", "2031-03-01T14:00:00Z"), now())
            .unwrap_err();

        assert!(matches!(err, TaskError::EmptyText));
        assert!(manager.is_empty());
        assert!(manager.store.snapshot().is_empty());
    }

    #[test]
    fn add_rejects_blank_deadline() {
        let (mut manager, _fail) = manager_with_tasks(&[]);
        let err = manager
            .add(submission("Ship the report", "  "), now())
            .unwrap_err();

        assert!(matches!(err, TaskError::EmptyDeadline));
        assert!(manager.is_empty());
    }

    #[test]
    fn toggle_flips_and_flips_back() {
        let (mut manager, _fail) = manager_with_tasks(&[("Task", "2031-03-01T14:00:00Z")]);

        assert_eq!(manager.toggle("task-1", now()).expect("toggle on"), true);
        assert!(manager.tasks()[0].completed);
        assert_eq!(manager.board().status("task-1"), Some(TimeLeft::Done));

        assert_eq!(manager.toggle("task-1", now()).expect("toggle off"), false);
        assert!(!manager.tasks()[0].completed);
        assert_eq!(
            manager.board().status("task-1"),
            Some(TimeLeft::Counting {
                hours: 2,
                minutes: 0,
                seconds: 0
            })
        );
    }

    #[test]
    fn toggle_rolls_back_when_store_fails() {
        let (mut manager, fail) = manager_with_tasks(&[("Task", "2031-03-01T14:00:00Z")]);

        fail.set(true);
        let err = manager.toggle("task-1", now()).unwrap_err();
        fail.set(false);

        assert!(matches!(
            err,
            TaskError::Store(StoreError::Unavailable(_))
        ));
        assert!(!manager.tasks()[0].completed);
        assert!(!manager.store.snapshot()[0].completed);
        assert_eq!(
            manager.board().status("task-1"),
            Some(TimeLeft::Counting {
                hours: 2,
                minutes: 0,
                seconds: 0
            })
        );
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let (mut manager, _fail) = manager_with_tasks(&[("Task", "2031-03-01T14:00:00Z")]);

        manager.mark_complete("task-1", now()).expect("first mark");
        manager.mark_complete("task-1", now()).expect("second mark");

        assert!(manager.tasks()[0].completed);
        assert_eq!(manager.board().status("task-1"), Some(TimeLeft::Done));
    }

    #[test]
    fn completed_tasks_stay_in_the_collection() {
        let (mut manager, _fail) = manager_with_tasks(&[
            ("Keep", "2031-03-01T14:00:00Z"),
            ("Donelike", "2031-03-01T15:00:00Z"),
        ]);

        manager.mark_complete("task-2", now()).expect("mark");

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get("task-2").map(|t| t.completed), Some(true));
    }

    #[test]
    fn mark_complete_rolls_back_when_store_fails() {
        let (mut manager, fail) = manager_with_tasks(&[("Task", "2031-03-01T14:00:00Z")]);

        fail.set(true);
        let err = manager.mark_complete("task-1", now()).unwrap_err();
        fail.set(false);

        assert!(matches!(err, TaskError::Store(_)));
        assert!(!manager.tasks()[0].completed);
    }

    #[test]
    fn edit_preserves_id_and_completion() {
        let (mut manager, _fail) = manager_with_tasks(&[("Draft", "2031-03-01T14:00:00Z")]);
        manager.mark_complete("task-1", now()).expect("mark");

        manager
            .edit(
                "task-1",
                submission("Final", "2031-04-01T09:00:00Z"),
                now(),
            )
            .expect("edit");

        let task = manager.get("task-1").expect("task present");
        assert_eq!(task.text, "Final");
        assert_eq!(task.deadline, "2031-04-01T09:00:00Z");
        assert!(task.completed);
        assert_eq!(manager.board().status("task-1"), Some(TimeLeft::Done));
        assert_eq!(manager.store.snapshot(), manager.tasks().to_vec());
    }

    #[test]
    fn edit_keeps_incomplete_tasks_incomplete_in_the_store() {
        let (mut manager, _fail) = manager_with_tasks(&[("Draft", "2031-03-01T14:00:00Z")]);

        manager
            .edit("task-1", submission("Final", "2031-04-01T09:00:00Z"), now())
            .expect("edit");

        assert!(!manager.store.snapshot()[0].completed);
        assert_eq!(manager.store.snapshot(), manager.tasks().to_vec());
    }

    #[test]
    fn edit_unknown_id_leaves_collection_untouched() {
        let (mut manager, _fail) = manager_with_tasks(&[("Only", "2031-03-01T14:00:00Z")]);

        let err = manager
            .edit("missing", submission("New", "2031-03-01T15:00:00Z"), now())
            .unwrap_err();

        assert!(matches!(err, TaskError::UnknownId(_)));
        assert_eq!(manager.tasks()[0].text, "Only");
    }

    #[test]
    fn edit_store_failure_leaves_memory_untouched() {
        let (mut manager, fail) = manager_with_tasks(&[("Draft", "2031-03-01T14:00:00Z")]);

        fail.set(true);
        let err = manager
            .edit("task-1", submission("Final", "2031-04-01T09:00:00Z"), now())
            .unwrap_err();
        fail.set(false);

        assert!(matches!(err, TaskError::Store(_)));
        assert_eq!(manager.tasks()[0].text, "Draft");
        assert_eq!(manager.tasks()[0].deadline, "2031-03-01T14:00:00Z");
    }

    #[test]
    fn delete_removes_from_collection_and_board() {
        let (mut manager, _fail) = manager_with_tasks(&[
            ("First", "2031-03-01T14:00:00Z"),
            ("Second", "2031-03-01T15:00:00Z"),
            ("Third", "2031-03-01T16:00:00Z"),
        ]);

        let removed = manager.delete("task-2", now()).expect("delete");

        assert_eq!(removed.text, "Second");
        let texts: Vec<&str> = manager.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Third"]);
        assert_eq!(manager.board().status("task-2"), None);
        assert!(manager.board().status("task-1").is_some());
        assert!(manager.board().status("task-3").is_some());
    }

    #[test]
    fn delete_restores_position_when_store_fails() {
        let (mut manager, fail) = manager_with_tasks(&[
            ("First", "2031-03-01T14:00:00Z"),
            ("Second", "2031-03-01T15:00:00Z"),
            ("Third", "2031-03-01T16:00:00Z"),
        ]);

        fail.set(true);
        let err = manager.delete("task-2", now()).unwrap_err();
        fail.set(false);

        assert!(matches!(err, TaskError::Store(_)));
        let texts: Vec<&str> = manager.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
        assert_eq!(manager.store.snapshot(), manager.tasks().to_vec());
        assert!(manager.board().status("task-2").is_some());
    }

    #[test]
    fn unknown_ids_are_rejected_without_side_effects() {
        let (mut manager, _fail) = manager_with_tasks(&[("Only", "2031-03-01T14:00:00Z")]);

        assert!(matches!(
            manager.toggle("missing", now()),
            Err(TaskError::UnknownId(_))
        ));
        assert!(matches!(
            manager.mark_complete("missing", now()),
            Err(TaskError::UnknownId(_))
        ));
        assert!(matches!(
            manager.delete("missing", now()),
            Err(TaskError::UnknownId(_))
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn tick_moves_tasks_between_buckets() {
        let (mut manager, _fail) = manager_with_tasks(&[("Soon", "2031-03-01T12:00:01Z")]);

        assert_eq!(
            manager.board().status("task-1"),
            Some(TimeLeft::Counting {
                hours: 0,
                minutes: 0,
                seconds: 1
            })
        );

        manager.tick(now() + chrono::Duration::seconds(2));
        assert_eq!(manager.board().status("task-1"), Some(TimeLeft::Expired));
    }
}

//! Thread-safe in-memory task store.

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{
        Activity, ActivityEvent, ActivityId, NewActivity, NewTask, Priority, ReferenceId,
        ReferenceType, Task, TaskId, TaskKind, TaskStatus, UserId,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Tasks and activity logs live in hash maps behind a read-write lock;
/// identifiers come from atomic monotonic counters, one per entity type.
/// Identifiers are process-local; a durable deployment would need a
/// different allocator.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<StoreState>>,
    task_ids: Arc<AtomicU64>,
    activity_ids: Arc<AtomicU64>,
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: HashMap<TaskId, Task>,
    activities: HashMap<TaskId, Vec<Activity>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the demo fixture.
    ///
    /// The fixture mirrors the original workforce data set: invoicing
    /// and pickup tasks on orders 101 and 102, a cancelled payment
    /// collection on order 103, and a duplicated sales-person assignment
    /// on entity 201. Deadlines land one day after the given clock's
    /// now.
    #[must_use]
    pub fn with_seed_data(clock: &impl Clock) -> Self {
        let store = Self::new();
        let deadline = clock.utc() + Duration::days(1);

        let task1 = store.seed_task(
            ReferenceId::new(101),
            TaskKind::CreateInvoice,
            UserId::new(1),
            TaskStatus::Assigned,
            Priority::High,
            deadline,
        );
        store.seed_task(
            ReferenceId::new(101),
            TaskKind::ArrangePickup,
            UserId::new(1),
            TaskStatus::Completed,
            Priority::High,
            deadline,
        );
        let task3 = store.seed_task(
            ReferenceId::new(102),
            TaskKind::CreateInvoice,
            UserId::new(2),
            TaskStatus::Assigned,
            Priority::Medium,
            deadline,
        );
        let task4 = store.seed_task(
            ReferenceId::new(201),
            TaskKind::AssignCustomerToSalesPerson,
            UserId::new(2),
            TaskStatus::Assigned,
            Priority::Low,
            deadline,
        );
        // Duplicate active assignment on entity 201; the reassignment
        // engine is expected to collapse it.
        let task5 = store.seed_task(
            ReferenceId::new(201),
            TaskKind::AssignCustomerToSalesPerson,
            UserId::new(3),
            TaskStatus::Assigned,
            Priority::Low,
            deadline,
        );
        store.seed_task(
            ReferenceId::new(103),
            TaskKind::CollectPayment,
            UserId::new(1),
            TaskStatus::Cancelled,
            Priority::Medium,
            deadline,
        );

        store.seed_activity(clock, task1, "Task created for ORDER 101", UserId::new(1001));
        store.seed_activity(clock, task3, "Task created for ORDER 102", UserId::new(1001));
        store.seed_activity(clock, task4, "Task created for ENTITY 201", UserId::new(1002));
        store.seed_activity(clock, task5, "Task created for ENTITY 201", UserId::new(1002));

        store
    }

    fn seed_task(
        &self,
        reference_id: ReferenceId,
        kind: TaskKind,
        assignee_id: UserId,
        status: TaskStatus,
        priority: Priority,
        deadline: chrono::DateTime<chrono::Utc>,
    ) -> TaskId {
        let id = TaskId::new(self.task_ids.fetch_add(1, Ordering::Relaxed) + 1);
        // Seed kinds always match their catalog reference type, so the
        // draft constructor cannot reject them.
        let Ok(draft) = NewTask::new(
            reference_id,
            kind.reference_type(),
            kind,
            assignee_id,
            deadline,
        ) else {
            return id;
        };
        let task = Task::from_draft(
            id,
            draft
                .with_status(status)
                .with_priority(priority)
                .with_description("This is a seed task."),
        );
        if let Ok(mut state) = self.state.write() {
            state.tasks.insert(id, task);
        }
        id
    }

    fn seed_activity(&self, clock: &impl Clock, task_id: TaskId, message: &str, actor: UserId) {
        let id = ActivityId::new(self.activity_ids.fetch_add(1, Ordering::Relaxed) + 1);
        let activity = Activity::from_draft(
            id,
            NewActivity::new(
                task_id,
                clock.utc(),
                ActivityEvent::TaskCreated,
                message,
                Some(actor),
            ),
        );
        if let Ok(mut state) = self.state.write() {
            state.activities.entry(task_id).or_default().push(activity);
        }
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, draft: NewTask) -> TaskStoreResult<Task> {
        let id = TaskId::new(self.task_ids.fetch_add(1, Ordering::Relaxed) + 1);
        let task = Task::from_draft(id, draft);
        let mut state = self.write()?;
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_reference(
        &self,
        reference_id: ReferenceId,
        reference_type: ReferenceType,
    ) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| {
                task.reference_id() == reference_id && task.reference_type() == reference_type
            })
            .cloned()
            .collect())
    }

    async fn find_by_assignees(&self, assignee_ids: &[UserId]) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| assignee_ids.contains(&task.assignee_id()))
            .cloned()
            .collect())
    }

    async fn find_by_priority(&self, priority: Priority) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.priority() == priority)
            .cloned()
            .collect())
    }

    async fn activities_for(&self, task_id: TaskId) -> TaskStoreResult<Vec<Activity>> {
        let state = self.read()?;
        Ok(state.activities.get(&task_id).cloned().unwrap_or_default())
    }

    async fn append_activity(&self, draft: NewActivity) -> TaskStoreResult<Activity> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&draft.task_id()) {
            return Err(TaskStoreError::UnknownTask(draft.task_id()));
        }
        let id = ActivityId::new(self.activity_ids.fetch_add(1, Ordering::Relaxed) + 1);
        let task_id = draft.task_id();
        let activity = Activity::from_draft(id, draft);
        state
            .activities
            .entry(task_id)
            .or_default()
            .push(activity.clone());
        Ok(activity)
    }
}

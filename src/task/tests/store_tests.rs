//! Contract tests for the in-memory task store.

use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{
        ActivityEvent, NewActivity, NewTask, Priority, ReferenceId, ReferenceType, TaskId,
        TaskKind, TaskStatus, UserId,
    },
    ports::{TaskStore, TaskStoreError},
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

fn invoice_draft(reference_id: u64, assignee_id: u64) -> NewTask {
    NewTask::new(
        ReferenceId::new(reference_id),
        ReferenceType::Order,
        TaskKind::CreateInvoice,
        UserId::new(assignee_id),
        Utc::now() + Duration::days(1),
    )
    .expect("valid draft")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_allocates_strictly_increasing_ids(store: InMemoryTaskStore) {
    let first = store.insert(invoice_draft(101, 1)).await.expect("insert");
    let second = store.insert(invoice_draft(102, 1)).await.expect("insert");
    let third = store.insert(invoice_draft(103, 2)).await.expect("insert");

    assert_eq!(first.id(), TaskId::new(1));
    assert!(first.id() < second.id());
    assert!(second.id() < third.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_unknown_task(store: InMemoryTaskStore) {
    let task = store.insert(invoice_draft(101, 1)).await.expect("insert");
    let mut phantom = task.clone();
    phantom.set_status(TaskStatus::Started);

    store.update(&phantom).await.expect("update stored task");

    let missing = crate::task::domain::Task::from_draft(TaskId::new(99), invoice_draft(101, 1));
    let result = store.update(&missing).await;
    assert!(matches!(result, Err(TaskStoreError::NotFound(id)) if id == TaskId::new(99)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_by_reference_matches_both_fields(store: InMemoryTaskStore) {
    store.insert(invoice_draft(101, 1)).await.expect("insert");
    store.insert(invoice_draft(101, 2)).await.expect("insert");
    store.insert(invoice_draft(102, 1)).await.expect("insert");

    let tasks = store
        .find_by_reference(ReferenceId::new(101), ReferenceType::Order)
        .await
        .expect("lookup");
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.reference_id() == ReferenceId::new(101)));

    let entity_tasks = store
        .find_by_reference(ReferenceId::new(101), ReferenceType::Entity)
        .await
        .expect("lookup");
    assert!(entity_tasks.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_by_assignees_returns_membership(store: InMemoryTaskStore) {
    store.insert(invoice_draft(101, 1)).await.expect("insert");
    store.insert(invoice_draft(102, 2)).await.expect("insert");
    store.insert(invoice_draft(103, 3)).await.expect("insert");

    let tasks = store
        .find_by_assignees(&[UserId::new(1), UserId::new(3)])
        .await
        .expect("lookup");
    assert_eq!(tasks.len(), 2);
    assert!(
        tasks
            .iter()
            .all(|t| t.assignee_id() == UserId::new(1) || t.assignee_id() == UserId::new(3))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_by_priority_filters(store: InMemoryTaskStore) {
    store
        .insert(invoice_draft(101, 1).with_priority(Priority::High))
        .await
        .expect("insert");
    store
        .insert(invoice_draft(102, 1).with_priority(Priority::Low))
        .await
        .expect("insert");

    let high = store
        .find_by_priority(Priority::High)
        .await
        .expect("lookup");
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].priority(), Priority::High);

    let medium = store
        .find_by_priority(Priority::Medium)
        .await
        .expect("lookup");
    assert!(medium.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn append_activity_rejects_unknown_task(store: InMemoryTaskStore) {
    let draft = NewActivity::new(
        TaskId::new(42),
        Utc::now(),
        ActivityEvent::CommentAdded,
        "orphan",
        Some(UserId::new(1)),
    );

    let result = store.append_activity(draft).await;
    assert!(matches!(result, Err(TaskStoreError::UnknownTask(id)) if id == TaskId::new(42)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activities_are_returned_in_append_order(store: InMemoryTaskStore) {
    let task = store.insert(invoice_draft(101, 1)).await.expect("insert");

    for message in ["first", "second", "third"] {
        store
            .append_activity(NewActivity::new(
                task.id(),
                Utc::now(),
                ActivityEvent::CommentAdded,
                message,
                Some(UserId::new(1)),
            ))
            .await
            .expect("append");
    }

    let activities = store.activities_for(task.id()).await.expect("lookup");
    let messages: Vec<&str> = activities.iter().map(|a| a.message()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
    assert!(activities[0].id() < activities[1].id());
    assert!(activities[1].id() < activities[2].id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activities_for_task_without_log_is_empty(store: InMemoryTaskStore) {
    let task = store.insert(invoice_draft(101, 1)).await.expect("insert");
    let activities = store.activities_for(task.id()).await.expect("lookup");
    assert!(activities.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seed_data_reproduces_the_workforce_fixture() {
    let store = InMemoryTaskStore::with_seed_data(&DefaultClock);

    let order_101 = store
        .find_by_reference(ReferenceId::new(101), ReferenceType::Order)
        .await
        .expect("lookup");
    assert_eq!(order_101.len(), 2);

    let entity_201 = store
        .find_by_reference(ReferenceId::new(201), ReferenceType::Entity)
        .await
        .expect("lookup");
    assert_eq!(entity_201.len(), 2);
    assert!(
        entity_201
            .iter()
            .all(|t| t.kind() == TaskKind::AssignCustomerToSalesPerson
                && t.status() == TaskStatus::Assigned),
        "entity 201 carries the duplicate active pair"
    );

    let order_103 = store
        .find_by_reference(ReferenceId::new(103), ReferenceType::Order)
        .await
        .expect("lookup");
    assert_eq!(order_103.len(), 1);
    assert_eq!(order_103[0].status(), TaskStatus::Cancelled);

    // Four of the six seed tasks carry a creation activity.
    let mut creation_logs = 0;
    for id in 1..=6 {
        let activities = store
            .activities_for(TaskId::new(id))
            .await
            .expect("lookup");
        if !activities.is_empty() {
            assert_eq!(activities[0].event(), ActivityEvent::TaskCreated);
            creation_logs += 1;
        }
    }
    assert_eq!(creation_logs, 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_after_seeding_continues_the_id_sequence() {
    let store = InMemoryTaskStore::with_seed_data(&DefaultClock);
    let task = store.insert(invoice_draft(104, 9)).await.expect("insert");
    assert_eq!(task.id(), TaskId::new(7));
}

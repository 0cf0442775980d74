//! Integration tests for the follow-up service with a pinned clock.

use chrono::{Days, NaiveDate};
use leadbook_core::clock::FixedClock;
use leadbook_core::display::relative_day_label;
use leadbook_core::error::CrmError;
use leadbook_core::models::{CreateFollowup, CreateLead, FollowupStatus, Priority, UpdateFollowup};
use leadbook_core::repository::{LeadRepository, PriorityFilter};
use leadbook_core::schedule::DashboardStats;
use leadbook_db::StoreHandle;
use leadbook_db::repository::{SurrealFollowupRepository, SurrealLeadRepository};
use leadbook_service::{FollowupService, ServiceConfig};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service = FollowupService<SurrealFollowupRepository<Db>, FixedClock>;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 10)
}

/// Spin up in-memory DB, run migrations, create one lead.
async fn setup() -> (Service, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    leadbook_db::run_migrations(&db).await.unwrap();

    let lead = SurrealLeadRepository::new(db.clone())
        .create(CreateLead {
            name: "Karthik".into(),
            phone: Some("98450 12345".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let svc = FollowupService::new(
        SurrealFollowupRepository::new(db),
        FixedClock(today()),
        ServiceConfig::default(),
    );
    (svc, lead.id)
}

async fn add(
    svc: &Service,
    lead_id: Uuid,
    on: NaiveDate,
    reminder_days: u32,
    priority: Priority,
) -> Uuid {
    svc.create(CreateFollowup {
        lead_id,
        followup_date: on,
        followup_time: None,
        notes: None,
        priority: Some(priority),
        reminder_days: Some(reminder_days),
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn reminder_included_while_today_is_inside_window() {
    let (svc, lead_id) = setup().await;
    // Window [06-09, 06-12] contains 06-10.
    let inside = add(&svc, lead_id, date(2024, 6, 12), 3, Priority::Medium).await;
    // Window [06-14, 06-15] starts after today.
    add(&svc, lead_id, date(2024, 6, 15), 1, Priority::Medium).await;
    // Window ended yesterday.
    add(&svc, lead_id, date(2024, 6, 9), 5, Priority::Medium).await;
    // Due today with no lead time.
    let due_today = add(&svc, lead_id, today(), 0, Priority::Low).await;

    let reminders = svc.todays_reminders().await.unwrap();
    let ids: Vec<_> = reminders.iter().map(|r| r.followup.id).collect();
    assert_eq!(ids, vec![due_today, inside]);
    assert_eq!(
        reminders[0].lead.as_ref().map(|l| l.name.as_str()),
        Some("Karthik")
    );

    let inside_row = &reminders[1].followup;
    assert_eq!(relative_day_label(inside_row.followup_date, svc.today()), "In 2 days");
}

#[tokio::test]
async fn reminders_skip_non_pending() {
    let (svc, lead_id) = setup().await;
    let done = add(&svc, lead_id, today(), 0, Priority::High).await;
    let cancelled = add(&svc, lead_id, today(), 2, Priority::High).await;
    svc.mark_complete(done).await.unwrap();
    svc.cancel(cancelled).await.unwrap();

    assert!(svc.todays_reminders().await.unwrap().is_empty());
}

#[tokio::test]
async fn upcoming_uses_inclusive_default_window() {
    let (svc, lead_id) = setup().await;
    let edge = today().checked_add_days(Days::new(7)).unwrap();
    let beyond = today().checked_add_days(Days::new(8)).unwrap();

    let t = add(&svc, lead_id, today(), 0, Priority::Medium).await;
    let e = add(&svc, lead_id, edge, 0, Priority::Medium).await;
    add(&svc, lead_id, beyond, 0, Priority::Medium).await;
    add(&svc, lead_id, date(2024, 6, 9), 0, Priority::Medium).await;

    let upcoming = svc.upcoming(None).await.unwrap();
    let ids: Vec<_> = upcoming.iter().map(|r| r.followup.id).collect();
    assert_eq!(ids, vec![t, e]);

    let wider = svc.upcoming(Some(8)).await.unwrap();
    assert_eq!(wider.len(), 3);

    let only_today = svc.upcoming(Some(0)).await.unwrap();
    assert_eq!(only_today.len(), 1);
    assert_eq!(only_today[0].followup.id, t);
}

#[tokio::test]
async fn upcoming_with_huge_window_still_matches() {
    let (svc, lead_id) = setup().await;
    let soon = add(&svc, lead_id, date(2024, 6, 12), 0, Priority::Medium).await;

    assert_eq!(svc.upcoming(Some(7)).await.unwrap().len(), 1);
    let far = svc.upcoming(Some(3_000_000)).await.unwrap();
    let ids: Vec<_> = far.iter().map(|r| r.followup.id).collect();
    assert_eq!(ids, vec![soon]);
}

#[tokio::test]
async fn list_for_lead_filters_and_orders_by_date() {
    let (svc, lead_id) = setup().await;
    let other_lead = Uuid::new_v4();
    let late = add(&svc, lead_id, date(2024, 7, 1), 0, Priority::Low).await;
    add(&svc, other_lead, date(2024, 6, 1), 0, Priority::Low).await;
    let early = add(&svc, lead_id, date(2024, 6, 5), 0, Priority::High).await;

    let mine = svc.list_for_lead(lead_id).await.unwrap();
    let ids: Vec<_> = mine.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![early, late]);
    assert!(mine.iter().all(|f| f.lead_id == lead_id));

    let theirs = svc.list_for_lead(other_lead).await.unwrap();
    assert_eq!(theirs.len(), 1);
    assert!(svc.list_for_lead(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_all_joins_lead_summary() {
    let (svc, lead_id) = setup().await;
    let orphan_lead = Uuid::new_v4();
    let second = add(&svc, lead_id, date(2024, 6, 20), 0, Priority::Medium).await;
    let first = add(&svc, orphan_lead, date(2024, 6, 2), 0, Priority::Medium).await;
    let done = add(&svc, lead_id, date(2024, 6, 11), 0, Priority::Medium).await;
    svc.mark_complete(done).await.unwrap();

    let all = svc.list_all().await.unwrap();
    let ids: Vec<_> = all.iter().map(|r| r.followup.id).collect();
    assert_eq!(ids, vec![first, done, second]);

    assert!(all[0].lead.is_none());
    let summary = all[2].lead.as_ref().unwrap();
    assert_eq!(summary.id, lead_id);
    assert_eq!(summary.name, "Karthik");
    assert_eq!(summary.phone.as_deref(), Some("98450 12345"));
    assert_eq!(all[1].followup.status, FollowupStatus::Completed);
}

#[tokio::test]
async fn overdue_lists_pending_before_today() {
    let (svc, lead_id) = setup().await;
    let older = add(&svc, lead_id, date(2024, 6, 1), 0, Priority::Low).await;
    let late = add(&svc, lead_id, date(2024, 6, 8), 0, Priority::Low).await;
    let done = add(&svc, lead_id, date(2024, 6, 5), 0, Priority::Low).await;
    add(&svc, lead_id, today(), 0, Priority::Low).await;
    svc.mark_complete(done).await.unwrap();

    let overdue = svc.overdue().await.unwrap();
    let ids: Vec<_> = overdue.iter().map(|r| r.followup.id).collect();
    assert_eq!(ids, vec![older, late]);
    assert_eq!(relative_day_label(overdue[1].followup.followup_date, svc.today()), "2 days ago");
}

#[tokio::test]
async fn by_priority_filters_pending() {
    let (svc, lead_id) = setup().await;
    let high = add(&svc, lead_id, date(2024, 6, 11), 0, Priority::High).await;
    add(&svc, lead_id, date(2024, 6, 12), 0, Priority::Low).await;
    let closed = add(&svc, lead_id, date(2024, 6, 13), 0, Priority::High).await;
    svc.cancel(closed).await.unwrap();

    let only_high = svc
        .by_priority(PriorityFilter::Only(Priority::High))
        .await
        .unwrap();
    assert_eq!(only_high.len(), 1);
    assert_eq!(only_high[0].followup.id, high);

    let all = svc.by_priority(PriorityFilter::All).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn dashboard_stats_and_bucket_shift() {
    let (svc, lead_id) = setup().await;
    let yesterday = add(&svc, lead_id, date(2024, 6, 9), 0, Priority::High).await;
    add(&svc, lead_id, date(2024, 6, 20), 0, Priority::Medium).await;
    let done = add(&svc, lead_id, date(2024, 6, 1), 0, Priority::High).await;
    svc.mark_complete(done).await.unwrap();

    let stats = svc.dashboard_stats().await.unwrap();
    assert_eq!(
        stats,
        DashboardStats {
            total: 3,
            pending: 2,
            today_count: 0,
            high_priority: 1,
            overdue: 1,
        }
    );

    svc.update(
        yesterday,
        UpdateFollowup {
            followup_date: Some(today()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let shifted = svc.dashboard_stats().await.unwrap();
    assert_eq!(shifted.overdue, 0);
    assert_eq!(shifted.today_count, 1);
    assert_eq!(shifted.total, 3);
}

#[tokio::test]
async fn mark_complete_is_idempotent_on_status() {
    let (svc, lead_id) = setup().await;
    let id = add(&svc, lead_id, today(), 0, Priority::Medium).await;

    let first = svc.mark_complete(id).await.unwrap();
    let second = svc.mark_complete(id).await.unwrap();

    assert_eq!(first.status, FollowupStatus::Completed);
    assert_eq!(second.status, FollowupStatus::Completed);
    assert!(second.completed_at.unwrap() >= first.completed_at.unwrap());
}

#[tokio::test]
async fn cancel_changes_only_status() {
    let (svc, lead_id) = setup().await;
    let id = add(&svc, lead_id, date(2024, 6, 12), 3, Priority::High).await;

    let cancelled = svc.cancel(id).await.unwrap();
    assert_eq!(cancelled.status, FollowupStatus::Cancelled);
    assert_eq!(cancelled.completed_at, None);
    assert_eq!(cancelled.priority, Priority::High);
    assert_eq!(cancelled.reminder_days, 3);
}

#[tokio::test]
async fn uninitialized_store_surfaces_not_initialized() {
    let svc = FollowupService::new(
        SurrealFollowupRepository::<Db>::new(StoreHandle::uninitialized()),
        FixedClock(today()),
        ServiceConfig::default(),
    );

    assert!(matches!(
        svc.todays_reminders().await,
        Err(CrmError::NotInitialized)
    ));
    assert!(matches!(
        svc.dashboard_stats().await,
        Err(CrmError::NotInitialized)
    ));
}

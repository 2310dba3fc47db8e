//! PostgreSQL-backed catalog tests. Require `DATABASE_URL`; run with
//! `cargo test -p releasegate-db -- --ignored`.

use releasegate_core::activity::{ActivityRecord, ActivitySink};
use releasegate_core::error::CoreError;
use releasegate_core::release::{ReleaseStatus, StatusId};
use releasegate_core::rules::{EvaluationContext, RuleSet};
use releasegate_core::selector::ReleaseSelector;
use releasegate_core::storage::ReleaseStore;
use releasegate_db::models::application::CreateApplication;
use releasegate_db::models::condition::CreateCondition;
use releasegate_db::models::release::{CreateRelease, UpdateRelease};
use releasegate_db::store::{Catalog, PgCatalog};
use serde_json::json;
use sqlx::PgPool;

async fn seed_application(catalog: &PgCatalog) -> i64 {
    catalog
        .create_application(&CreateApplication {
            name: "fleet-app".into(),
            description: Some("Driver companion".into()),
        })
        .await
        .unwrap()
        .id
}

fn release(code: &str, condition_ids: Vec<i64>) -> CreateRelease {
    CreateRelease {
        version_name: format!("{code}.0"),
        version_code: code.into(),
        status: None,
        condition_ids,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn status_lookup_matches_enum_discriminants(pool: PgPool) {
    for status in ReleaseStatus::ALL {
        let id: Option<StatusId> =
            sqlx::query_scalar("SELECT id FROM release_statuses WHERE name = $1")
                .bind(status.as_str())
                .fetch_optional(&pool)
                .await
                .unwrap();
        assert_eq!(id, Some(status.id()), "{status} id mismatch");
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn release_round_trips_condition_order(pool: PgPool) {
    let catalog = PgCatalog::new(pool);
    let app = seed_application(&catalog).await;
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let condition = catalog
            .create_condition(
                app,
                &CreateCondition {
                    name: name.into(),
                    rules: RuleSet::default(),
                },
            )
            .await
            .unwrap();
        ids.push(condition.id);
    }
    let attached = vec![ids[2], ids[0], ids[1]];

    let created = catalog
        .create_release(app, &release("7", attached.clone()))
        .await
        .unwrap();
    let loaded = catalog.get_release(app, created.id).await.unwrap().unwrap();
    assert_eq!(loaded.condition_ids, attached);

    let updated = catalog
        .update_release(
            app,
            created.id,
            &UpdateRelease {
                condition_ids: Some(vec![ids[1]]),
                status: Some(ReleaseStatus::Deprecated),
                ..UpdateRelease::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.condition_ids, vec![ids[1]]);
    assert_eq!(updated.status, ReleaseStatus::Deprecated);
    assert!(catalog.list_active_releases(app).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deleting_condition_detaches_release(pool: PgPool) {
    let catalog = PgCatalog::new(pool);
    let app = seed_application(&catalog).await;
    let condition = catalog
        .create_condition(
            app,
            &CreateCondition {
                name: "gate".into(),
                rules: RuleSet::default(),
            },
        )
        .await
        .unwrap();
    let created = catalog
        .create_release(app, &release("1", vec![condition.id]))
        .await
        .unwrap();

    assert!(catalog.delete_condition(app, condition.id).await.unwrap());
    let loaded = catalog.get_release(app, created.id).await.unwrap().unwrap();
    assert!(loaded.condition_ids.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn legacy_rule_rows_are_adapted(pool: PgPool) {
    let catalog = PgCatalog::new(pool.clone());
    let app = seed_application(&catalog).await;
    let legacy = json!({"country": "us", "company_id": "12"});
    let (condition_id,): (i64,) = sqlx::query_as(
        "INSERT INTO conditions (application_id, name, rules) VALUES ($1, 'legacy', $2) RETURNING id",
    )
    .bind(app)
    .bind(&legacy)
    .fetch_one(&pool)
    .await
    .unwrap();
    catalog
        .create_release(app, &release("3", vec![condition_id]))
        .await
        .unwrap();

    let selector = ReleaseSelector::new(&catalog);
    let matching = EvaluationContext::new()
        .with_country("US")
        .with_company_id(12);
    let other = EvaluationContext::new()
        .with_country("US")
        .with_company_id(13);
    assert!(selector.select_latest(app, &matching).await.unwrap().is_some());
    assert!(selector.select_latest(app, &other).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn invalid_foreign_key_is_a_validation_error(pool: PgPool) {
    let catalog = PgCatalog::new(pool);
    let app = seed_application(&catalog).await;
    let result = catalog.create_release(app, &release("1", vec![999_999])).await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn rejects_conditions_from_other_applications(pool: PgPool) {
    let catalog = PgCatalog::new(pool);
    let app = seed_application(&catalog).await;
    let other = seed_application(&catalog).await;
    let foreign = catalog
        .create_condition(
            other,
            &CreateCondition {
                name: "elsewhere".into(),
                rules: RuleSet::default(),
            },
        )
        .await
        .unwrap();

    let result = catalog
        .create_release(app, &release("1", vec![foreign.id]))
        .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
    // The release insert rolled back with the attachment.
    assert!(catalog.list_releases(app, None).await.unwrap().is_empty());

    let existing = catalog.create_release(app, &release("2", vec![])).await.unwrap();
    let result = catalog
        .update_release(
            app,
            existing.id,
            &UpdateRelease {
                condition_ids: Some(vec![foreign.id]),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
    let reloaded = catalog.get_release(app, existing.id).await.unwrap().unwrap();
    assert!(reloaded.condition_ids.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn activity_is_listed_newest_first(pool: PgPool) {
    let catalog = PgCatalog::new(pool);
    let app = seed_application(&catalog).await;
    for n in 0..3 {
        catalog
            .record(
                &ActivityRecord::new("update.check")
                    .with_application(app)
                    .with_payload(json!({"n": n})),
            )
            .await
            .unwrap();
    }

    let page = catalog.list_activity(Some(app), 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].payload, json!({"n": 2}));
    assert!(catalog.list_activity(Some(app + 1), 10, 0).await.unwrap().is_empty());
}

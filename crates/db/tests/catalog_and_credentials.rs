//! Integration tests for catalog bulk operations and credential resolution:
//! - per-index error isolation with partial commit
//! - partial-delete reporting
//! - the resolver's ordering and active-row filtering

use sqlx::PgPool;

use seekr_db::models::api_key::CreateUserApiKey;
use seekr_db::models::credential::{SaveCredential, UpdateCredential};
use seekr_db::models::service_catalog::{CreateServiceCatalogEntry, UpdateServiceCatalogEntry};
use seekr_db::models::user::CreateUser;
use seekr_db::repositories::{
    ApiKeyRepo, CredentialRepo, ServiceCatalogRepo, UserRepo, UserSettingsRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str) -> (i64, i64) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            username: email.split('@').next().unwrap().to_string(),
            password_hash: "argon2-hash".to_string(),
            full_name: None,
        },
    )
    .await
    .unwrap();
    let settings = UserSettingsRepo::get_or_create(pool, user.id).await.unwrap();
    (user.id, settings.id)
}

fn entry(slug: &str, category: &str) -> CreateServiceCatalogEntry {
    CreateServiceCatalogEntry {
        name: slug.to_string(),
        slug: slug.to_string(),
        category: category.to_string(),
        provider: "openai".to_string(),
        description: None,
        default_config: Some(serde_json::json!({"model": "gpt-4o-mini"})),
        is_active: None,
    }
}

// ---------------------------------------------------------------------------
// Catalog bulk operations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn bulk_create_isolates_duplicate_slug_by_index(pool: PgPool) {
    let outcome = ServiceCatalogRepo::bulk_create(
        &pool,
        &[
            entry("alpha", "llm"),
            entry("alpha", "llm"), // duplicate of index 0, same batch
            entry("beta", "search"),
        ],
    )
    .await
    .unwrap();

    assert_eq!(outcome.items.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);
    assert!(outcome.is_partial());

    // The successful subset committed.
    assert_eq!(ServiceCatalogRepo::list(&pool).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_update_reports_missing_ids(pool: PgPool) {
    let created = ServiceCatalogRepo::bulk_create(&pool, &[entry("alpha", "llm")])
        .await
        .unwrap();
    let id = created.items[0].id;

    let outcome = ServiceCatalogRepo::bulk_update(
        &pool,
        &[
            UpdateServiceCatalogEntry {
                id,
                name: Some("Alpha v2".to_string()),
                slug: None,
                category: None,
                provider: None,
                description: None,
                default_config: None,
                is_active: None,
            },
            UpdateServiceCatalogEntry {
                id: 9999,
                name: Some("ghost".to_string()),
                slug: None,
                category: None,
                provider: None,
                description: None,
                default_config: None,
                is_active: None,
            },
        ],
    )
    .await
    .unwrap();

    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].name, "Alpha v2");
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_many_counts_and_reports_missing(pool: PgPool) {
    let created = ServiceCatalogRepo::bulk_create(
        &pool,
        &[entry("alpha", "llm"), entry("beta", "search")],
    )
    .await
    .unwrap();
    let ids: Vec<i64> = created.items.iter().map(|e| e.id).collect();

    let outcome = ServiceCatalogRepo::delete_many(&pool, &[ids[0], ids[1], 9999])
        .await
        .unwrap();
    assert_eq!(outcome.deleted_count, 2);
    assert_eq!(outcome.missing_ids, vec![9999]);
}

#[sqlx::test(migrations = "./migrations")]
async fn catalog_delete_cascades_to_credentials(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let created = ServiceCatalogRepo::bulk_create(&pool, &[entry("alpha", "llm")])
        .await
        .unwrap();
    let service_id = created.items[0].id;

    ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &CreateUserApiKey {
            title: "work".to_string(),
            encrypted_api_key: "ct".to_string(),
            service_ids: vec![service_id],
        },
    )
    .await
    .unwrap();

    ServiceCatalogRepo::delete_many(&pool, &[service_id])
        .await
        .unwrap();
    assert!(CredentialRepo::list_by_user(&pool, user_id)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Credential save/update and resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn save_bulk_upserts_on_service_key_pair(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let created = ServiceCatalogRepo::bulk_create(&pool, &[entry("alpha", "llm")])
        .await
        .unwrap();
    let service_id = created.items[0].id;
    let key = ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &CreateUserApiKey {
            title: "work".to_string(),
            encrypted_api_key: "ct".to_string(),
            service_ids: vec![service_id],
        },
    )
    .await
    .unwrap();

    // Re-saving the same (service, key) pair updates in place.
    let outcome = CredentialRepo::save_bulk(
        &pool,
        user_id,
        settings_id,
        &[SaveCredential {
            service_id,
            api_key_id: key.id,
            config: Some(serde_json::json!({"temperature": 0.9})),
            is_default: Some(true),
        }],
    )
    .await
    .unwrap();
    assert!(outcome.errors.is_empty());

    let all = CredentialRepo::list_by_user(&pool, user_id).await.unwrap();
    assert_eq!(all.len(), 1, "upsert must not duplicate the pair");
    assert!(all[0].is_default);
    assert_eq!(all[0].config["temperature"], 0.9);
}

#[sqlx::test(migrations = "./migrations")]
async fn save_bulk_collects_invalid_references_by_index(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let created = ServiceCatalogRepo::bulk_create(&pool, &[entry("alpha", "llm")])
        .await
        .unwrap();
    let service_id = created.items[0].id;
    let key = ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &CreateUserApiKey {
            title: "work".to_string(),
            encrypted_api_key: "ct".to_string(),
            service_ids: vec![service_id],
        },
    )
    .await
    .unwrap();

    let outcome = CredentialRepo::save_bulk(
        &pool,
        user_id,
        settings_id,
        &[
            SaveCredential {
                service_id: 9999, // unknown service
                api_key_id: key.id,
                config: None,
                is_default: None,
            },
            SaveCredential {
                service_id,
                api_key_id: 9999, // not the user's key
                config: None,
                is_default: None,
            },
            SaveCredential {
                service_id,
                api_key_id: key.id,
                config: None,
                is_default: None,
            },
        ],
    )
    .await
    .unwrap();

    assert_eq!(outcome.items.len(), 1);
    let failed: Vec<usize> = outcome.errors.iter().map(|e| e.index).collect();
    assert_eq!(failed, vec![0, 1]);
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_update_is_scoped_to_the_user(pool: PgPool) {
    let (owner_id, owner_settings) = seed_user(&pool, "owner@test.io").await;
    let (other_id, _) = seed_user(&pool, "other@test.io").await;
    let created = ServiceCatalogRepo::bulk_create(&pool, &[entry("alpha", "llm")])
        .await
        .unwrap();
    let service_id = created.items[0].id;
    ApiKeyRepo::create_with_services(
        &pool,
        owner_id,
        owner_settings,
        &CreateUserApiKey {
            title: "work".to_string(),
            encrypted_api_key: "ct".to_string(),
            service_ids: vec![service_id],
        },
    )
    .await
    .unwrap();
    let credential_id = CredentialRepo::list_by_user(&pool, owner_id).await.unwrap()[0].id;

    let outcome = CredentialRepo::bulk_update(
        &pool,
        other_id,
        &[UpdateCredential {
            id: credential_id,
            config: None,
            is_default: Some(true),
        }],
    )
    .await
    .unwrap();
    assert!(outcome.all_failed());
}

#[sqlx::test(migrations = "./migrations")]
async fn resolution_prefers_default_then_oldest_and_skips_inactive(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let created = ServiceCatalogRepo::bulk_create(
        &pool,
        &[entry("first-llm", "llm"), entry("second-llm", "llm")],
    )
    .await
    .unwrap();
    let (first, second) = (created.items[0].id, created.items[1].id);

    ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &CreateUserApiKey {
            title: "old".to_string(),
            encrypted_api_key: "old-ct".to_string(),
            service_ids: vec![first],
        },
    )
    .await
    .unwrap();
    let new_key = ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &CreateUserApiKey {
            title: "new".to_string(),
            encrypted_api_key: "new-ct".to_string(),
            service_ids: vec![second],
        },
    )
    .await
    .unwrap();

    // Nothing marked default yet: oldest credential row wins.
    let rows = CredentialRepo::find_for_resolution(&pool, user_id, "llm")
        .await
        .unwrap();
    assert_eq!(rows[0].service_id, first);

    // Marking the newer credential default promotes it.
    let newer = CredentialRepo::list_by_user(&pool, user_id).await.unwrap()[1].id;
    CredentialRepo::bulk_update(
        &pool,
        user_id,
        &[UpdateCredential {
            id: newer,
            config: None,
            is_default: Some(true),
        }],
    )
    .await
    .unwrap();
    let rows = CredentialRepo::find_for_resolution(&pool, user_id, "llm")
        .await
        .unwrap();
    assert_eq!(rows[0].service_id, second);
    assert_eq!(rows[0].encrypted_api_key, "new-ct");

    // Deactivating the key behind the default drops it from resolution.
    sqlx::query("UPDATE user_api_keys SET is_active = FALSE WHERE id = $1")
        .bind(new_key.id)
        .execute(&pool)
        .await
        .unwrap();
    let rows = CredentialRepo::find_for_resolution(&pool, user_id, "llm")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].encrypted_api_key, "old-ct");
}

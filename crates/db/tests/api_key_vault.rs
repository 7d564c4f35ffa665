//! Integration tests for the vault-key repositories against a real database:
//! - atomic create with service-reference validation
//! - full-replace service list updates
//! - delete cascading to credential links

use assert_matches::assert_matches;
use sqlx::PgPool;

use seekr_core::error::CoreError;
use seekr_db::models::api_key::{CreateUserApiKey, UpdateUserApiKey};
use seekr_db::models::service_catalog::CreateServiceCatalogEntry;
use seekr_db::models::user::CreateUser;
use seekr_db::repositories::{ApiKeyRepo, ServiceCatalogRepo, UserRepo, UserSettingsRepo};
use seekr_db::DbError;

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

fn catalog_entry(slug: &str, category: &str, is_active: bool) -> CreateServiceCatalogEntry {
    CreateServiceCatalogEntry {
        name: slug.to_string(),
        slug: slug.to_string(),
        category: category.to_string(),
        provider: "openai".to_string(),
        description: None,
        default_config: None,
        is_active: Some(is_active),
    }
}

async fn seed_services(pool: &PgPool) -> Vec<i64> {
    let outcome = ServiceCatalogRepo::bulk_create(
        pool,
        &[
            catalog_entry("openai-llm", "llm", true),
            catalog_entry("openai-embed", "embedding", true),
            catalog_entry("retired", "llm", false),
        ],
    )
    .await
    .unwrap();
    assert!(outcome.errors.is_empty());
    outcome.items.into_iter().map(|e| e.id).collect()
}

fn new_key(title: &str, service_ids: Vec<i64>) -> CreateUserApiKey {
    CreateUserApiKey {
        title: title.to_string(),
        encrypted_api_key: "b64-ciphertext".to_string(),
        service_ids,
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_links_one_credential_per_service(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let services = seed_services(&pool).await;

    let key = ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &new_key("work", vec![services[0], services[1]]),
    )
    .await
    .unwrap();

    let linked = ApiKeyRepo::service_ids_for_key(&pool, key.id).await.unwrap();
    assert_eq!(linked, vec![services[0], services[1]]);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_with_inactive_service_writes_nothing(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let services = seed_services(&pool).await;
    let inactive = services[2];

    let err = ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &new_key("work", vec![services[0], inactive]),
    )
    .await
    .unwrap_err();

    assert_matches!(
        err,
        DbError::Domain(CoreError::InvalidServiceReference { service_ids })
            if service_ids == vec![inactive]
    );
    // The whole create rolled back, including the key row.
    assert!(ApiKeyRepo::list_by_user(&pool, user_id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn create_with_empty_service_list_is_rejected(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;

    let err = ApiKeyRepo::create_with_services(&pool, user_id, settings_id, &new_key("work", vec![]))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Domain(CoreError::InvalidInput(_)));
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn update_replaces_the_service_list_wholesale(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let services = seed_services(&pool).await;

    let key = ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &new_key("work", vec![services[0]]),
    )
    .await
    .unwrap();

    ApiKeyRepo::update(
        &pool,
        user_id,
        key.id,
        &UpdateUserApiKey {
            service_ids: Some(vec![services[1]]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let linked = ApiKeyRepo::service_ids_for_key(&pool, key.id).await.unwrap();
    assert_eq!(linked, vec![services[1]], "old link must be gone");
}

#[sqlx::test(migrations = "./migrations")]
async fn update_rejects_invalid_service_list_and_keeps_old_links(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let services = seed_services(&pool).await;

    let key = ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &new_key("work", vec![services[0]]),
    )
    .await
    .unwrap();

    let err = ApiKeyRepo::update(
        &pool,
        user_id,
        key.id,
        &UpdateUserApiKey {
            title: Some("renamed".to_string()),
            service_ids: Some(vec![9999]),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Domain(CoreError::InvalidServiceReference { .. }));

    // The rename rolled back with the link replacement.
    let unchanged = ApiKeyRepo::find_by_id_for_user(&pool, user_id, key.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.title, "work");
    assert_eq!(
        ApiKeyRepo::service_ids_for_key(&pool, key.id).await.unwrap(),
        vec![services[0]]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn update_scoped_to_owner(pool: PgPool) {
    let (owner_id, owner_settings) = seed_user(&pool, "owner@test.io").await;
    let (other_id, _) = seed_user(&pool, "other@test.io").await;
    let services = seed_services(&pool).await;

    let key = ApiKeyRepo::create_with_services(
        &pool,
        owner_id,
        owner_settings,
        &new_key("work", vec![services[0]]),
    )
    .await
    .unwrap();

    let result = ApiKeyRepo::update(
        &pool,
        other_id,
        key.id,
        &UpdateUserApiKey {
            title: Some("stolen".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_to_credentials(pool: PgPool) {
    let (user_id, settings_id) = seed_user(&pool, "a@test.io").await;
    let services = seed_services(&pool).await;

    let key = ApiKeyRepo::create_with_services(
        &pool,
        user_id,
        settings_id,
        &new_key("work", vec![services[0], services[1]]),
    )
    .await
    .unwrap();

    assert!(ApiKeyRepo::delete(&pool, user_id, key.id).await.unwrap());

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_service_credential WHERE api_key_id = $1")
            .bind(key.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
}

//! Integration tests for multi-step workflows using mock endpoints

use std::sync::Arc;
use std::time::Duration;

use azctl_api::arm::ArmClient;
use azctl_api::auth::StaticTokenCredential;
use azctl_api::batch::BatchClient;
use azctl_api::keyvault::KeyVaultClient;
use azctl_core::CoreError;
use azctl_core::batch::{create_pool_and_wait, find_pool, virtual_machine_pool};
use azctl_core::management::{
    create_account_with_storage, delete_account_with_storage, ensure_region_capacity,
};
use azctl_core::vault::{authorize_application, broaden_secret_permissions, decrypt_text,
    encrypt_text};
use azctl_api::batch::ImageReference;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn arm_client(server: &MockServer) -> ArmClient {
    ArmClient::builder()
        .endpoint(server.uri())
        .subscription_id("sub-1")
        .credential(Arc::new(StaticTokenCredential::new("test-token")))
        .build()
        .unwrap()
}

fn batch_client(server: &MockServer) -> BatchClient {
    BatchClient::builder()
        .endpoint(server.uri())
        .credential(Arc::new(StaticTokenCredential::new("test-token")))
        .build()
        .unwrap()
}

fn account_json(name: &str, location: &str) -> serde_json::Value {
    json!({
        "id": format!("/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Batch/batchAccounts/{name}"),
        "name": name,
        "location": location,
        "properties": {}
    })
}

async fn mock_quota_and_accounts(server: &MockServer, quota: i64, existing: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(
            "/subscriptions/sub-1/providers/Microsoft.Batch/locations/westus/quotas",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accountQuota": quota})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/subscriptions/sub-1/providers/Microsoft.Batch/batchAccounts",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": existing})))
        .mount(server)
        .await;
}

// ============================================================================
// Region capacity
// ============================================================================

#[tokio::test]
async fn test_full_region_reports_quota_exceeded() {
    let server = MockServer::start().await;
    mock_quota_and_accounts(
        &server,
        2,
        vec![
            account_json("a", "westus"),
            account_json("b", "WestUS"),
            account_json("c", "eastus"),
        ],
    )
    .await;

    let err = ensure_region_capacity(&arm_client(&server), "westus")
        .await
        .unwrap_err();
    match err {
        CoreError::QuotaExceeded {
            region,
            quota,
            in_use,
        } => {
            assert_eq!(region, "westus");
            assert_eq!(quota, 2);
            assert_eq!(in_use, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_account_with_storage_orders_the_steps() {
    let server = MockServer::start().await;
    mock_quota_and_accounts(&server, 3, vec![account_json("other", "eastus")]).await;

    Mock::given(method("PUT"))
        .and(path(
            "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/stg",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/stg",
            "name": "stg",
            "location": "westus",
            "properties": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(
            "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Batch/batchAccounts/acct",
        ))
        .and(body_partial_json(json!({
            "properties": {
                "autoStorage": {
                    "storageAccountId": "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/stg"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json("acct", "westus")))
        .expect(1)
        .mount(&server)
        .await;

    let account = create_account_with_storage(&arm_client(&server), "rg", "westus", "acct", "stg")
        .await
        .unwrap();
    assert_eq!(account.name, "acct");
}

#[tokio::test]
async fn test_delete_reports_orphaned_storage() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"/batchAccounts/acct$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"/storageAccounts/stg$"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": "InternalError", "message": "storage is busy"}
        })))
        .mount(&server)
        .await;

    let err = delete_account_with_storage(&arm_client(&server), "rg", "acct", "stg")
        .await
        .unwrap_err();
    match err {
        CoreError::PartialDelete {
            account, storage, ..
        } => {
            assert_eq!(account, "acct");
            assert_eq!(storage, "stg");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// Pools
// ============================================================================

#[tokio::test]
async fn test_create_pool_and_wait_submits_then_polls() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/pools/render"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pools"))
        .and(body_partial_json(json!({"id": "render"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pools/render"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "render",
            "allocationState": "steady"
        })))
        .mount(&server)
        .await;

    let params = virtual_machine_pool(
        "render",
        "STANDARD_D1_V2",
        2,
        ImageReference {
            publisher: "canonical".to_string(),
            offer: "ubuntu-24_04-lts".to_string(),
            sku: "server".to_string(),
            version: None,
        },
        "batch.node.ubuntu 24.04",
    );
    let pool = create_pool_and_wait(
        &batch_client(&server),
        &params,
        Duration::from_secs(5),
        Duration::from_millis(10),
        None,
    )
    .await
    .unwrap();
    assert_eq!(pool.id, "render");
}

#[tokio::test]
async fn test_existing_pool_is_not_resubmitted() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/pools/render"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    // no POST mock mounted: a create attempt would 404 and fail the test
    Mock::given(method("GET"))
        .and(path("/pools/render"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "render",
            "allocationState": "steady"
        })))
        .mount(&server)
        .await;

    let params = virtual_machine_pool(
        "render",
        "STANDARD_D1_V2",
        2,
        ImageReference {
            publisher: "canonical".to_string(),
            offer: "ubuntu-24_04-lts".to_string(),
            sku: "server".to_string(),
            version: None,
        },
        "batch.node.ubuntu 24.04",
    );
    create_pool_and_wait(
        &batch_client(&server),
        &params,
        Duration::from_secs(5),
        Duration::from_millis(10),
        None,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_find_pool_ignores_case() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": "Render-Pool"},
                {"id": "other"}
            ]
        })))
        .mount(&server)
        .await;

    let client = batch_client(&server);
    let pool = find_pool(&client, "render-pool").await.unwrap();
    assert_eq!(pool.id, "Render-Pool");

    let err = find_pool(&client, "absent").await.unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Vault access policies
// ============================================================================

fn vault_json(policies: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/kv",
        "name": "kv",
        "location": "westus",
        "properties": {
            "tenantId": "tenant-1",
            "sku": {"family": "A", "name": "standard"},
            "accessPolicies": policies
        }
    })
}

#[tokio::test]
async fn test_authorize_application_preserves_other_policies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/vaults/kv$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vault_json(json!([
            {"tenantId": "tenant-1", "objectId": "existing", "permissions": {"secrets": ["get"]}}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"/vaults/kv$"))
        .and(body_partial_json(json!({
            "properties": {
                "accessPolicies": [
                    {"objectId": "existing"},
                    {
                        "objectId": "app-1",
                        "permissions": {"secrets": ["get", "list"]}
                    }
                ]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(vault_json(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    authorize_application(&arm_client(&server), "rg", "kv", "tenant-1", "app-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_broaden_secret_permissions_requires_existing_policy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/vaults/kv$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vault_json(json!([]))))
        .mount(&server)
        .await;

    let err = broaden_secret_permissions(&arm_client(&server), "rg", "kv", "app-1")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_broaden_secret_permissions_enables_deployment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/vaults/kv$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vault_json(json!([
            {"tenantId": "tenant-1", "objectId": "app-1", "permissions": {"keys": ["get"], "secrets": ["get"]}}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"/vaults/kv$"))
        .and(body_partial_json(json!({
            "properties": {
                "enabledForDeployment": true,
                "enabledForTemplateDeployment": true,
                "accessPolicies": [
                    {
                        "objectId": "app-1",
                        "permissions": {
                            "keys": ["get"],
                            "secrets": ["get", "list", "set", "delete", "backup", "restore", "recover", "purge"]
                        }
                    }
                ]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(vault_json(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    broaden_secret_permissions(&arm_client(&server), "rg", "kv", "app-1")
        .await
        .unwrap();
}

// ============================================================================
// Text encryption
// ============================================================================

#[tokio::test]
async fn test_text_encryption_round_trip_frames_utf16() {
    let server = MockServer::start().await;

    // "Hi" as UTF-16: big-endian BOM then one 16-bit unit per char
    let utf16_payload: &[u8] = &[0xfe, 0xff, 0x00, b'H', 0x00, b'i'];
    let encoded = URL_SAFE_NO_PAD.encode(utf16_payload);

    Mock::given(method("POST"))
        .and(path("/keys/app-key/encrypt"))
        .and(body_partial_json(json!({"alg": "RSA-OAEP", "value": encoded})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kid": "https://kv.vault.azure.net/keys/app-key/v1",
            "value": "Y2lwaGVy"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/keys/app-key/decrypt"))
        .and(body_partial_json(json!({"alg": "RSA-OAEP", "value": "Y2lwaGVy"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kid": "https://kv.vault.azure.net/keys/app-key/v1",
            "value": encoded
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = KeyVaultClient::new(Arc::new(StaticTokenCredential::new("test-token"))).unwrap();
    let ciphertext = encrypt_text(&client, &server.uri(), "app-key", "Hi")
        .await
        .unwrap();
    assert_eq!(ciphertext, b"cipher");

    let text = decrypt_text(&client, &server.uri(), "app-key", &ciphertext)
        .await
        .unwrap();
    assert_eq!(text, "Hi");
}

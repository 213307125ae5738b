//! Integration tests for the onboarding HTTP API.
//!
//! Each test spins up the real axum app on a random port and drives the
//! REST contract with a plain HTTP client, mock telephony throughout.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use voiceline::config::Settings;
use voiceline::providers::storage::FileStorage;
use voiceline::providers::telephony::MockNumberProvider;
use voiceline::server::{AppState, app};
use voiceline::store::EntityStore;

struct TestServer {
    base: String,
    client: reqwest::Client,
    /// Keeps the upload directory alive for the duration of the test.
    _upload_dir: tempfile::TempDir,
}

/// Start the app on a random port with a fresh store and a 1 MB upload cap.
async fn start_server() -> TestServer {
    let upload_dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        upload_dir: upload_dir.path().to_path_buf(),
        max_file_size_mb: 1,
        ..Default::default()
    };

    let state = AppState {
        store: Arc::new(EntityStore::new()),
        storage: Arc::new(FileStorage::new(settings.upload_dir.clone())),
        numbers: Arc::new(MockNumberProvider),
        settings: Arc::new(settings),
    };

    let router = app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base: format!("http://127.0.0.1:{port}/api/v1"),
        client: reqwest::Client::new(),
        _upload_dir: upload_dir,
    }
}

impl TestServer {
    async fn create_business(&self, name: &str) -> Value {
        let resp = self
            .client
            .post(format!("{}/business", self.base))
            .json(&json!({ "name": name, "description": "A test business" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
        resp.json().await.unwrap()
    }

    async fn upload(&self, business_id: &str, filename: &str, bytes: Vec<u8>) -> reqwest::Response {
        let form = Form::new().part("files", Part::bytes(bytes).file_name(filename.to_string()));
        self.client
            .post(format!("{}/knowledge-base/upload/{business_id}", self.base))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    async fn purchase(&self, business_id: &str, number: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/phone-numbers/purchase/{business_id}", self.base))
            .json(&json!({ "phone_number": number }))
            .send()
            .await
            .unwrap()
    }

    async fn create_assistant(&self, business_id: &str, name: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/voice-assistant/{business_id}", self.base))
            .json(&json!({
                "name": name,
                "first_message": "Hello! How can I help?",
                "system_prompt": "You are a helpful assistant.",
                "model_provider": "anthropic",
                "model_name": "claude-3-5-sonnet-20241022",
                "voice": "rachel",
                "end_call_message": "Goodbye!",
                "max_call_duration_seconds": 300,
            }))
            .send()
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn full_onboarding_flow() {
    let srv = start_server().await;

    // Wizard session
    let resp = srv
        .client
        .post(format!("{}/onboarding/session", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let session: Value = resp.json().await.unwrap();
    assert_eq!(session["current_step"], 1);
    let session_id = session["id"].as_str().unwrap().to_string();

    // Step 1: business
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    let resp = srv
        .client
        .patch(format!("{}/onboarding/session/{session_id}", srv.base))
        .json(&json!({ "current_step": 2, "business_id": &business_id }))
        .send()
        .await
        .unwrap();
    let session: Value = resp.json().await.unwrap();
    assert_eq!(session["current_step"], 2);
    assert_eq!(session["business_id"].as_str().unwrap(), business_id);

    // Step 2: knowledge base
    let resp = srv.upload(&business_id, "menu.pdf", vec![0u8; 1024]).await;
    assert_eq!(resp.status().as_u16(), 200);
    let uploaded: Value = resp.json().await.unwrap();
    assert_eq!(uploaded["total_files"], 1);
    assert_eq!(uploaded["files"][0]["file_size"], 1024);
    assert_eq!(uploaded["files"][0]["file_type"], ".pdf");

    let listed: Value = srv
        .client
        .get(format!("{}/knowledge-base/{business_id}", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Step 3: phone number
    let available: Value = srv
        .client
        .get(format!("{}/phone-numbers/available?area_code=415", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(available["total"].as_u64().unwrap() > 0);

    let resp = srv.purchase(&business_id, "+14155550000").await;
    assert_eq!(resp.status().as_u16(), 200);
    let purchased: Value = resp.json().await.unwrap();
    assert_eq!(purchased["phone_number"], "+14155550000");
    // Friendly name defaults to the business name.
    assert_eq!(purchased["friendly_name"], "Acme");
    assert_eq!(purchased["status"], "active");

    let numbers: Value = srv
        .client
        .get(format!("{}/phone-numbers/{business_id}", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(numbers.as_array().unwrap().len(), 1);

    // Step 4: assistant
    let resp = srv.create_assistant(&business_id, "Ava").await;
    assert_eq!(resp.status().as_u16(), 201);
    let assistants: Value = srv
        .client
        .get(format!("{}/voice-assistant/{business_id}", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(assistants.as_array().unwrap().len(), 1);
    assert_eq!(assistants[0]["name"], "Ava");

    // Complete
    let resp = srv
        .client
        .post(format!("{}/onboarding/complete", srv.base))
        .json(&json!({ "business_id": &business_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let completed: Value = resp.json().await.unwrap();
    assert_eq!(
        completed["dashboard_url"].as_str().unwrap(),
        format!("/dashboard/{business_id}")
    );
}

#[tokio::test]
async fn complete_requires_all_three_pieces() {
    let srv = start_server().await;
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    let complete = |srv: &TestServer| {
        srv.client
            .post(format!("{}/onboarding/complete", srv.base))
            .json(&json!({ "business_id": &business_id }))
            .send()
    };

    // Missing everything: knowledge base is checked first.
    let resp = complete(&srv).await.unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Knowledge base"));

    let resp = srv.upload(&business_id, "menu.pdf", vec![1u8; 64]).await;
    assert_eq!(resp.status().as_u16(), 200);
    let resp = complete(&srv).await.unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Phone number"));

    assert_eq!(srv.purchase(&business_id, "+14155550000").await.status().as_u16(), 200);
    let resp = complete(&srv).await.unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Voice assistant"));

    assert_eq!(srv.create_assistant(&business_id, "Ava").await.status().as_u16(), 201);
    let resp = complete(&srv).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn unknown_business_is_not_found_everywhere() {
    let srv = start_server().await;
    let ghost = uuid::Uuid::new_v4();

    let gets = [
        format!("{}/business/{ghost}", srv.base),
        format!("{}/knowledge-base/{ghost}", srv.base),
        format!("{}/phone-numbers/{ghost}", srv.base),
        format!("{}/voice-assistant/{ghost}", srv.base),
    ];
    for url in gets {
        let resp = srv.client.get(&url).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), 404, "GET {url}");
    }

    let resp = srv.upload(&ghost.to_string(), "menu.pdf", vec![0u8; 16]).await;
    assert_eq!(resp.status().as_u16(), 404);

    let resp = srv.purchase(&ghost.to_string(), "+14155550000").await;
    assert_eq!(resp.status().as_u16(), 404);

    let resp = srv
        .client
        .post(format!("{}/onboarding/complete", srv.base))
        .json(&json!({ "business_id": ghost }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn duplicate_filenames_get_distinct_storage_paths() {
    let srv = start_server().await;
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    let first: Value = srv
        .upload(&business_id, "menu.pdf", b"first".to_vec())
        .await
        .json()
        .await
        .unwrap();
    let second: Value = srv
        .upload(&business_id, "menu.pdf", b"second".to_vec())
        .await
        .json()
        .await
        .unwrap();

    let first_path = first["files"][0]["storage_path"].as_str().unwrap();
    let second_path = second["files"][0]["storage_path"].as_str().unwrap();
    assert_ne!(first_path, second_path);

    // Delete the first copy; the second stays readable.
    let first_id = first["files"][0]["id"].as_str().unwrap();
    let second_id = second["files"][0]["id"].as_str().unwrap();
    let resp = srv
        .client
        .delete(format!("{}/knowledge-base/{business_id}/{first_id}", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = srv
        .client
        .get(format!("{}/knowledge-base/{business_id}/{second_id}", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"second");
}

#[tokio::test]
async fn upload_rejects_disallowed_type_and_oversize() {
    let srv = start_server().await;
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    let resp = srv.upload(&business_id, "virus.exe", vec![0u8; 16]).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains(".exe"));

    // The test server caps uploads at 1 MB.
    let resp = srv
        .upload(&business_id, "big.pdf", vec![0u8; 1_500_000])
        .await;
    assert_eq!(resp.status().as_u16(), 400);

    let listed: Value = srv
        .client
        .get(format!("{}/knowledge-base/{business_id}", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn partial_business_update_keeps_unset_fields() {
    let srv = start_server().await;
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    let resp = srv
        .client
        .patch(format!("{}/business/{business_id}", srv.base))
        .json(&json!({ "name": "Acme Corp" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();

    assert_eq!(updated["name"], "Acme Corp");
    assert_eq!(updated["description"], business["description"]);
    let before = chrono::DateTime::parse_from_rfc3339(business["updated_at"].as_str().unwrap())
        .unwrap();
    let after = chrono::DateTime::parse_from_rfc3339(updated["updated_at"].as_str().unwrap())
        .unwrap();
    assert!(after >= before);

    let resp = srv
        .client
        .patch(format!("{}/business/{business_id}", srv.base))
        .json(&json!({ "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn delete_business_cascades_over_http() {
    let srv = start_server().await;
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    srv.upload(&business_id, "menu.pdf", vec![0u8; 32]).await;
    srv.purchase(&business_id, "+14155550000").await;
    srv.create_assistant(&business_id, "Ava").await;

    let resp = srv
        .client
        .delete(format!("{}/business/{business_id}", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = srv
        .client
        .get(format!("{}/business/{business_id}", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    // Second delete is a 404, not a second cascade.
    let resp = srv
        .client
        .delete(format!("{}/business/{business_id}", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn search_limit_is_bounded() {
    let srv = start_server().await;

    let resp = srv
        .client
        .get(format!("{}/phone-numbers/available?limit=5", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["total"], 5);
    assert_eq!(body["numbers"].as_array().unwrap().len(), 5);

    for bad in ["0", "51"] {
        let resp = srv
            .client
            .get(format!("{}/phone-numbers/available?limit={bad}", srv.base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400, "limit={bad}");
    }
}

#[tokio::test]
async fn mock_search_is_deterministic_over_http() {
    let srv = start_server().await;
    let url = format!("{}/phone-numbers/available?area_code=415&limit=3", srv.base);

    let first: Value = srv.client.get(&url).send().await.unwrap().json().await.unwrap();
    let second: Value = srv.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first["numbers"][0]["phone_number"], "+14155550000");
}

#[tokio::test]
async fn provider_status_reports_mock() {
    let srv = start_server().await;
    let status: Value = srv
        .client
        .get(format!("{}/phone-numbers/status", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["configured"], false);
    assert_eq!(status["provider"], "mock");
}

#[tokio::test]
async fn phone_number_can_be_released() {
    let srv = start_server().await;
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    let purchased: Value = srv
        .purchase(&business_id, "+14155550000")
        .await
        .json()
        .await
        .unwrap();
    let phone_id = purchased["id"].as_str().unwrap();

    let resp = srv
        .client
        .delete(format!("{}/phone-numbers/{business_id}/{phone_id}", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let numbers: Value = srv
        .client
        .get(format!("{}/phone-numbers/{business_id}", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(numbers.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn assistant_crud_roundtrip() {
    let srv = start_server().await;
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    let created: Value = srv
        .create_assistant(&business_id, "Ava")
        .await
        .json()
        .await
        .unwrap();
    let assistant_id = created["id"].as_str().unwrap();

    let resp = srv
        .client
        .patch(format!(
            "{}/voice-assistant/{business_id}/{assistant_id}",
            srv.base
        ))
        .json(&json!({ "voice": "josh", "max_call_duration_seconds": 600 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["voice"], "josh");
    assert_eq!(updated["max_call_duration_seconds"], 600);
    assert_eq!(updated["name"], "Ava");

    let resp = srv
        .client
        .delete(format!(
            "{}/voice-assistant/{business_id}/{assistant_id}",
            srv.base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = srv
        .client
        .get(format!(
            "{}/voice-assistant/{business_id}/{assistant_id}",
            srv.base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn assistant_validation_rejects_bad_fields() {
    let srv = start_server().await;
    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();

    // Out-of-range call duration
    let resp = srv
        .client
        .post(format!("{}/voice-assistant/{business_id}", srv.base))
        .json(&json!({
            "name": "Ava",
            "first_message": "Hi",
            "system_prompt": "Help.",
            "model_provider": "anthropic",
            "model_name": "claude-3-5-sonnet-20241022",
            "voice": "rachel",
            "end_call_message": "Bye",
            "max_call_duration_seconds": 10,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    // Unknown enum value is a deserialization failure, not a 500.
    let resp = srv
        .client
        .post(format!("{}/voice-assistant/{business_id}", srv.base))
        .json(&json!({
            "name": "Ava",
            "first_message": "Hi",
            "system_prompt": "Help.",
            "model_provider": "aol",
            "model_name": "claude-3-5-sonnet-20241022",
            "voice": "rachel",
            "end_call_message": "Bye",
            "max_call_duration_seconds": 300,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn options_catalog_is_served() {
    let srv = start_server().await;
    let options: Value = srv
        .client
        .get(format!("{}/voice-assistant/options", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(options["providers"].as_array().unwrap().len(), 4);
    assert_eq!(options["voices"].as_array().unwrap().len(), 17);

    let config: Value = srv
        .client
        .get(format!("{}/config/onboarding", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(config["steps"].as_array().unwrap().len(), 4);
    assert!(config["voiceAssistant"]["defaults"]["systemPrompt"]
        .as_str()
        .unwrap()
        .contains("{business_name}"));
}

#[tokio::test]
async fn session_lifecycle_is_independent_of_business() {
    let srv = start_server().await;

    let resp = srv
        .client
        .get(format!("{}/onboarding/session/{}", srv.base, uuid::Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let session: Value = srv
        .client
        .post(format!("{}/onboarding/session", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session_id = session["id"].as_str().unwrap();

    let business = srv.create_business("Acme").await;
    let business_id = business["id"].as_str().unwrap().to_string();
    srv.client
        .patch(format!("{}/onboarding/session/{session_id}", srv.base))
        .json(&json!({ "business_id": &business_id }))
        .send()
        .await
        .unwrap();

    // Deleting the business orphans the session reference but keeps it.
    srv.client
        .delete(format!("{}/business/{business_id}", srv.base))
        .send()
        .await
        .unwrap();

    let survived: Value = srv
        .client
        .get(format!("{}/onboarding/session/{session_id}", srv.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(survived["business_id"].as_str().unwrap(), business_id);
}

//! End-to-end tests for the signing pipeline
//!
//! Drives the same router `main` serves: sign a stored document, then check
//! the artifact, the digests, and the audit trail against each other.

use axum::http::StatusCode;
use axum_test::TestServer;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lopdf::{dictionary, Document, Object, Stream};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

use signet_server::config::{Config, DatabaseConfig, ServerConfig, StorageConfig};
use signet_server::db;
use signet_server::routes;
use signet_server::signing::{sha256_hex, SignResponse};
use signet_server::state::AppState;

// ============================================================================
// Test Harness
// ============================================================================

struct TestApp {
    server: TestServer,
    documents_dir: PathBuf,
    artifacts_dir: PathBuf,
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let documents_dir = dir.path().join("documents");
    let artifacts_dir = dir.path().join("signed");
    let database_url = format!("sqlite://{}", dir.path().join("signet.db").display());

    let config = Config {
        server: ServerConfig {
            port: 0,
            max_body_bytes: 10 * 1024 * 1024,
        },
        storage: StorageConfig {
            documents_dir: documents_dir.clone(),
            artifacts_dir: artifacts_dir.clone(),
        },
        database: DatabaseConfig { url: database_url },
    };

    let pool = db::create_pool(&config.database.url).await.unwrap();
    let state = AppState::new(config, pool).await.unwrap();
    let server = TestServer::new(routes::app(state)).unwrap();

    TestApp {
        server,
        documents_dir,
        artifacts_dir,
        _dir: dir,
    }
}

/// A one-page blank PDF with an A4 media box
fn blank_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0i64.into(), 0i64.into(), 595i64.into(), 842i64.into()],
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A solid-color PNG encoded as a data URL
fn signature_data_url(rgba: [u8; 4]) -> String {
    let img = image::RgbaImage::from_pixel(100, 40, image::Rgba(rgba));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
    format!("data:image/png;base64,{}", BASE64.encode(bytes))
}

fn sign_body(document_id: &str, signature: &str) -> Value {
    json!({
        "documentId": document_id,
        "signature": signature,
        "coords": {
            "xPercent": 0.3,
            "yPercent": 0.4,
            "widthPercent": 0.2,
            "heightPercent": 0.08,
        },
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_sign_happy_path() {
    let app = spawn_app().await;

    let source = blank_pdf();
    std::fs::write(app.documents_dir.join("sample.pdf"), &source).unwrap();

    let response = app
        .server
        .post("/api/v1/sign")
        .json(&sign_body("sample.pdf", &signature_data_url([20, 20, 160, 255])))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: SignResponse = response.json();

    assert!(body.success);
    assert_eq!(body.hash_before, sha256_hex(&source));
    assert_ne!(body.hash_before, body.hash_after);

    // The artifact the URL points at must hash to hashAfter.
    let key = body.url.strip_prefix("/files/signed/").unwrap();
    let artifact = std::fs::read(app.artifacts_dir.join(key)).unwrap();
    assert_ne!(artifact.len(), source.len());
    assert_eq!(sha256_hex(&artifact), body.hash_after);

    // And the served bytes must be those exact bytes.
    let served = app.server.get(&body.url).await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(sha256_hex(&served.as_bytes().to_vec()), body.hash_after);

    // The source was never touched.
    let source_after = std::fs::read(app.documents_dir.join("sample.pdf")).unwrap();
    assert_eq!(sha256_hex(&source_after), body.hash_before);

    // Exactly one audit record, carrying both digests.
    let audit = app
        .server
        .get("/api/v1/audit")
        .add_query_param("documentId", "sample.pdf")
        .await;
    assert_eq!(audit.status_code(), StatusCode::OK);
    let audit: Value = audit.json();
    assert_eq!(audit["total"], 1);
    assert_eq!(audit["records"][0]["hashBefore"], body.hash_before.as_str());
    assert_eq!(audit["records"][0]["hashAfter"], body.hash_after.as_str());
    assert_eq!(audit["records"][0]["artifactKey"], key);

    let record = app
        .server
        .get(&format!("/api/v1/audit/{}", body.audit_id))
        .await;
    assert_eq!(record.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_repeated_signs_leave_source_stable() {
    let app = spawn_app().await;

    let source = blank_pdf();
    std::fs::write(app.documents_dir.join("sample.pdf"), &source).unwrap();

    let signature = signature_data_url([20, 20, 160, 255]);
    let first: SignResponse = app
        .server
        .post("/api/v1/sign")
        .json(&sign_body("sample.pdf", &signature))
        .await
        .json();
    let second: SignResponse = app
        .server
        .post("/api/v1/sign")
        .json(&sign_body("sample.pdf", &signature))
        .await
        .json();

    assert_eq!(first.hash_before, second.hash_before);
    assert_ne!(first.url, second.url);

    let audit: Value = app
        .server
        .get("/api/v1/audit")
        .add_query_param("documentId", "sample.pdf")
        .await
        .json();
    assert_eq!(audit["total"], 2);
}

#[tokio::test]
async fn test_concurrent_signs_produce_distinct_artifacts() {
    let app = spawn_app().await;

    std::fs::write(app.documents_dir.join("sample.pdf"), blank_pdf()).unwrap();

    // Distinct signature images, so the artifacts must differ too.
    let (first, second) = tokio::join!(
        async {
            app.server
                .post("/api/v1/sign")
                .json(&sign_body("sample.pdf", &signature_data_url([20, 20, 160, 255])))
                .await
        },
        async {
            app.server
                .post("/api/v1/sign")
                .json(&sign_body("sample.pdf", &signature_data_url([160, 20, 20, 255])))
                .await
        }
    );
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::OK);

    let first: SignResponse = first.json();
    let second: SignResponse = second.json();

    assert_ne!(first.url, second.url);
    assert_ne!(first.hash_after, second.hash_after);
    assert_eq!(first.hash_before, second.hash_before);

    let audit: Value = app
        .server
        .get("/api/v1/audit")
        .add_query_param("documentId", "sample.pdf")
        .await
        .json();
    assert_eq!(audit["total"], 2);
}

#[tokio::test]
async fn test_sign_unknown_document() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/v1/sign")
        .json(&sign_body("missing.pdf", &signature_data_url([0, 0, 0, 255])))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], "DOCUMENT_NOT_FOUND");
}

#[tokio::test]
async fn test_sign_rejects_invalid_placement() {
    let app = spawn_app().await;

    std::fs::write(app.documents_dir.join("sample.pdf"), blank_pdf()).unwrap();

    let response = app
        .server
        .post("/api/v1/sign")
        .json(&json!({
            "documentId": "sample.pdf",
            "signature": signature_data_url([0, 0, 0, 255]),
            "coords": {
                "xPercent": 0.9,
                "yPercent": 0.4,
                "widthPercent": 0.5,
                "heightPercent": 0.08,
            },
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_PLACEMENT");
}

#[tokio::test]
async fn test_sign_rejects_malformed_payload() {
    let app = spawn_app().await;

    std::fs::write(app.documents_dir.join("sample.pdf"), blank_pdf()).unwrap();

    let response = app
        .server
        .post("/api/v1/sign")
        .json(&sign_body("sample.pdf", "not a data url"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "SIGNATURE_DECODE_FAILED");
}

#[tokio::test]
async fn test_sign_rejects_page_out_of_range() {
    let app = spawn_app().await;

    std::fs::write(app.documents_dir.join("sample.pdf"), blank_pdf()).unwrap();

    let mut body = sign_body("sample.pdf", &signature_data_url([0, 0, 0, 255]));
    body["page"] = json!(5);

    let response = app.server.post("/api/v1/sign").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAGE_NOT_FOUND");
}

#[tokio::test]
async fn test_documents_listing_and_serving() {
    let app = spawn_app().await;

    let source = blank_pdf();
    std::fs::write(app.documents_dir.join("sample.pdf"), &source).unwrap();

    let list: Value = app.server.get("/api/v1/documents").await.json();
    assert_eq!(list["total"], 1);
    assert_eq!(list["documents"][0]["id"], "sample.pdf");

    let served = app.server.get("/files/documents/sample.pdf").await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.as_bytes().to_vec(), source);

    let missing = app.server.get("/files/signed/missing.pdf").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

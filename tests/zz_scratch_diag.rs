//! TEMP diagnostic — remove after use.
use std::path::PathBuf;
use tempfile::TempDir;

use signet_server::config::{Config, DatabaseConfig, ServerConfig, StorageConfig};
use signet_server::db;
use signet_server::signing::{SigningService, SignRequest, PlacementBox};
use signet_server::storage::FileStore;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

fn sig(rgba: [u8; 4]) -> String {
    let img = image::RgbaImage::from_pixel(100, 40, image::Rgba(rgba));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", BASE64.encode(bytes))
}

fn blank_pdf() -> Vec<u8> {
    use lopdf::{dictionary, Document, Object, Stream};
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0i64.into(), 0i64.into(), 595i64.into(), 842i64.into()],
        "Contents" => content_id,
    });
    doc.objects.insert(pages_id, Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    }));
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[tokio::test]
async fn diag_service_concurrent() {
    let dir = TempDir::new().unwrap();
    let documents_dir: PathBuf = dir.path().join("documents");
    let artifacts_dir: PathBuf = dir.path().join("signed");
    let database_url = format!("sqlite://{}", dir.path().join("signet.db").display());
    let _ = Config {
        server: ServerConfig { port: 0, max_body_bytes: 10*1024*1024 },
        storage: StorageConfig { documents_dir: documents_dir.clone(), artifacts_dir: artifacts_dir.clone() },
        database: DatabaseConfig { url: database_url.clone() },
    };
    let docs = FileStore::open(documents_dir.clone()).await.unwrap();
    let arts = FileStore::open(artifacts_dir.clone()).await.unwrap();
    std::fs::write(documents_dir.join("sample.pdf"), blank_pdf()).unwrap();
    let pool = db::create_pool(&database_url).await.unwrap();
    let svc = SigningService::new(docs, arts, pool);

    let coords = PlacementBox { x_percent: 0.3, y_percent: 0.4, width_percent: 0.2, height_percent: 0.08 };
    let r1 = SignRequest { document_id: "sample.pdf".into(), signature: sig([20,20,160,255]), coords, page: 1 };
    let r2 = SignRequest { document_id: "sample.pdf".into(), signature: sig([160,20,20,255]), coords, page: 1 };

    eprintln!("DIAG: starting concurrent sign");
    let (a, b) = tokio::join!(svc.sign_document(r1), svc.sign_document(r2));
    eprintln!("DIAG: done a={:?} b={:?}", a.is_ok(), b.is_ok());
    a.unwrap();
    b.unwrap();
}

use axum_test::TestServer;
use serde_json::json;
use signet_server::config::{Config as C2, DatabaseConfig as D2, ServerConfig as S2, StorageConfig as St2};
use signet_server::state::AppState;
use signet_server::routes;

async fn spawn() -> (TestServer, TempDir) {
    let dir = TempDir::new().unwrap();
    let documents_dir = dir.path().join("documents");
    let artifacts_dir = dir.path().join("signed");
    let database_url = format!("sqlite://{}", dir.path().join("signet.db").display());
    let config = C2 {
        server: S2 { port: 0, max_body_bytes: 10*1024*1024 },
        storage: St2 { documents_dir: documents_dir.clone(), artifacts_dir: artifacts_dir.clone() },
        database: D2 { url: database_url.clone() },
    };
    std::fs::create_dir_all(&documents_dir).unwrap();
    std::fs::write(documents_dir.join("sample.pdf"), blank_pdf()).unwrap();
    let pool = db::create_pool(&database_url).await.unwrap();
    let state = AppState::new(config, pool).await.unwrap();
    let server = TestServer::new(routes::app(state)).unwrap();
    (server, dir)
}

fn body(sigv: &str) -> serde_json::Value {
    json!({"documentId":"sample.pdf","signature":sigv,"coords":{"xPercent":0.3,"yPercent":0.4,"widthPercent":0.2,"heightPercent":0.08}})
}

#[tokio::test(flavor = "current_thread")]
async fn diag_http_concurrent_current() {
    let (server, _d) = spawn().await;
    eprintln!("DIAG current: start");
    let (a, b) = tokio::join!(
        async { server.post("/api/v1/sign").json(&body(&sig([20,20,160,255]))).await },
        async { server.post("/api/v1/sign").json(&body(&sig([160,20,20,255]))).await },
    );
    eprintln!("DIAG current: done {} {}", a.status_code(), b.status_code());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn diag_http_concurrent_multi() {
    let (server, _d) = spawn().await;
    eprintln!("DIAG multi: start");
    let (a, b) = tokio::join!(
        async { server.post("/api/v1/sign").json(&body(&sig([20,20,160,255]))).await },
        async { server.post("/api/v1/sign").json(&body(&sig([160,20,20,255]))).await },
    );
    eprintln!("DIAG multi: done {} {}", a.status_code(), b.status_code());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn diag_http_transport_concurrent() {
    let dir = TempDir::new().unwrap();
    let documents_dir = dir.path().join("documents");
    let artifacts_dir = dir.path().join("signed");
    let database_url = format!("sqlite://{}", dir.path().join("signet.db").display());
    let config = C2 {
        server: S2 { port: 0, max_body_bytes: 10*1024*1024 },
        storage: St2 { documents_dir: documents_dir.clone(), artifacts_dir: artifacts_dir.clone() },
        database: D2 { url: database_url.clone() },
    };
    std::fs::create_dir_all(&documents_dir).unwrap();
    std::fs::write(documents_dir.join("sample.pdf"), blank_pdf()).unwrap();
    let pool = db::create_pool(&database_url).await.unwrap();
    let state = AppState::new(config, pool).await.unwrap();
    let server = axum_test::TestServer::builder()
        .http_transport()
        .build(routes::app(state))
        .unwrap();
    eprintln!("DIAG httpT: start");
    let (a, b) = tokio::join!(
        async { server.post("/api/v1/sign").json(&body(&sig([20,20,160,255]))).await },
        async { server.post("/api/v1/sign").json(&body(&sig([160,20,20,255]))).await },
    );
    eprintln!("DIAG httpT: done {} {}", a.status_code(), b.status_code());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn diag_http_health_join() {
    let (server, _d) = spawn().await;
    eprintln!("DIAG health: start");
    let (a, b) = tokio::join!(
        async { server.get("/health").await.status_code() },
        async { server.get("/health").await.status_code() },
    );
    eprintln!("DIAG health: done {} {}", a, b);
}

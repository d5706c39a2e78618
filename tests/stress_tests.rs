use signalqr::export::{DirectorySink, ExportPipeline};
use signalqr::{DocumentCapability, ExportFormat, QrSession, RenderOptions};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[test]
fn test_rapid_duplicate_exports_each_deliver() {
    let temp_dir = TempDir::new().unwrap();
    let num_threads = 8;
    let exports_per_thread = 10;

    let mut session = QrSession::new(RenderOptions::default());
    session.set_text("https://example.com");
    let surface = session.capture().unwrap();

    let pipeline = Arc::new(ExportPipeline::new(95, DocumentCapability::detect()));
    let barrier = Arc::new(Barrier::new(num_threads));
    let mut handles = vec![];

    for _ in 0..num_threads {
        let barrier = Arc::clone(&barrier);
        let pipeline = Arc::clone(&pipeline);
        let surface = Arc::clone(&surface);
        let dir = temp_dir.path().to_path_buf();

        handles.push(thread::spawn(move || {
            barrier.wait();
            let start = Instant::now();
            let mut names = Vec::new();

            for _ in 0..exports_per_thread {
                let mut sink = DirectorySink::new(&dir);
                let receipt = pipeline
                    .export(ExportFormat::Jpg, Some(surface.as_ref()), &mut sink)
                    .into_result()
                    .unwrap();
                names.push(receipt.filename);
            }

            (start.elapsed(), names)
        }));
    }

    let mut all_names = HashSet::new();
    let mut total_time = Duration::ZERO;
    for handle in handles {
        let (elapsed, names) = handle.join().unwrap();
        total_time += elapsed;
        all_names.extend(names);
    }

    // Same-millisecond clicks still get their own files
    assert_eq!(all_names.len(), num_threads * exports_per_thread);
    assert_eq!(
        std::fs::read_dir(temp_dir.path()).unwrap().count(),
        num_threads * exports_per_thread
    );

    println!(
        "{} exports, average {:?} per thread",
        all_names.len(),
        total_time / num_threads as u32
    );
}

#[test]
fn test_many_text_changes_keep_surface_current() {
    let mut session = QrSession::new(RenderOptions { size: 120, include_margin: true });
    let start = Instant::now();

    for i in 0..500 {
        let text = format!("https://example.com/item/{}", i);
        session.set_text(text.clone());

        let surface = session.capture().unwrap();
        assert_eq!(surface.text(), text);
        assert_eq!(surface.revision(), session.revision());
    }

    session.clear();
    assert!(!session.exports_enabled());
    println!("500 renders took {:?}", start.elapsed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_api_exports() {
    use axum::{body::Body, http::{Request, StatusCode}};
    use signalqr::{create_routes, AppConfig, AppState};
    use tower::util::ServiceExt;

    let state = AppState::from_config(&AppConfig::default(), DocumentCapability::detect());
    state.session.write().await.set_text("concurrent");
    let app = create_routes(state);

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let request = Request::builder()
                .uri("/api/export/jpg")
                .body(Body::empty())
                .unwrap();
            app.oneshot(request).await.unwrap().status()
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }
}

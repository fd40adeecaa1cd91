//! Startup sequence and over-the-wire serving.

use std::time::Duration;

use university_connect::lifecycle::Shutdown;
use university_connect::{Application, MountTable, StartupError};

mod common;

#[tokio::test]
async fn unreachable_database_aborts_startup_before_binding() {
    let root = tempfile::tempdir().unwrap();
    let certs = root.path().join("certificates");

    // Reserve a free port, then release it for the startup attempt.
    let port = {
        let reserved = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        reserved.local_addr().unwrap().port()
    };

    let mut config = common::test_config(&certs);
    config.server.port = port;

    let result = Application::bootstrap(config, MountTable::standard()).await;
    assert!(matches!(result, Err(StartupError::Database(_))));

    // The certificates directory is prepared before the database is tried.
    assert!(certs.is_dir());

    // Nothing is listening.
    assert!(tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_err());
}

#[tokio::test]
async fn certificate_path_blocked_by_a_file_aborts_startup() {
    let root = tempfile::tempdir().unwrap();
    let certs = root.path().join("certificates");
    std::fs::write(&certs, b"oops").unwrap();

    let result = Application::bootstrap(common::test_config(&certs), MountTable::standard()).await;
    assert!(matches!(result, Err(StartupError::Certificates { .. })));
}

#[tokio::test]
async fn serves_over_tcp_until_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cert123.pdf"), b"%PDF-1.4").unwrap();

    let server = common::build_server(common::test_config(dir.path()), MountTable::standard()).await;
    let shutdown = Shutdown::new();
    let addr = common::spawn_server(server, &shutdown).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get(format!("http://{}/api/talent-marketplace", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["group"], "talent-marketplace");

    let res = client
        .get(format!("http://{}/certificates/cert123.pdf", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"%PDF-1.4");

    let res = client
        .get(format!("http://{}/api/nope", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let after = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
        .get(format!("http://{}/api/auth", addr))
        .send()
        .await;
    assert!(after.is_err(), "server should stop accepting after shutdown");
}

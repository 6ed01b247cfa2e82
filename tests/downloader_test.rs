// tests/downloader_test.rs

mod common;

use common::*;
use cx_img_dl::{config::ConflictPolicy, downloader::execute_tasks, models::ImageTask};
use mockito::Server;
use std::{
    fs,
    net::TcpListener,
    path::Path,
    time::{Duration, Instant},
};

fn task(url: String, dir: &Path, index: usize) -> ImageTask {
    ImageTask {
        url,
        target_dir: dir.to_path_buf(),
        subject: "线性代数".to_string(),
        topic: "行列式".to_string(),
        index,
    }
}

#[tokio::test]
async fn test_batch_continues_after_individual_failures() {
    // --- 1. Arrange (准备阶段) ---
    let mut server = Server::new_async().await;
    let server_url = server.url();
    let mut mocks = Vec::new();
    for i in 1..=5 {
        let status = if i == 2 || i == 4 { 404 } else { 200 };
        mocks.push(
            server
                .mock("GET", format!("/sv-w8/doc/p/{}.png", i).as_str())
                .with_status(status)
                .with_body(format!("page-{}", i))
                .expect(1)
                .create_async()
                .await,
        );
    }
    let output = tempfile::tempdir().unwrap();
    let tasks: Vec<ImageTask> = (1..=5)
        .map(|i| task(format!("{}/sv-w8/doc/p/{}.png", server_url, i), output.path(), i))
        .collect();
    let (context, mut rx) = test_context(test_config(&server_url));

    // --- 2. Act (执行阶段) ---
    let outcome = execute_tasks(&context, &tasks).await;

    // --- 3. Assert (断言阶段) ---
    for mock in &mocks {
        mock.assert_async().await;
    }
    assert_eq!(outcome.attempted, 5);
    assert_eq!(outcome.succeeded, 3);
    assert_eq!(outcome.failed, 2);
    assert!(outcome.is_success());

    for i in [1, 3, 5] {
        assert!(output.path().join(format!("线性代数-行列式-{}.png", i)).exists());
    }
    for i in [2, 4] {
        assert!(!output.path().join(format!("线性代数-行列式-{}.png", i)).exists());
    }

    let lines = drain(&mut rx);
    assert!(contains_line(&lines, "[1/5] 正在下载"));
    assert!(contains_line(&lines, "状态码: 404"));
    assert!(contains_line(&lines, "成功下载 3/5 张图片"));
}

#[tokio::test]
async fn test_relative_url_resolves_against_base_url() {
    // --- 1. Arrange (准备阶段) ---
    let mut server = Server::new_async().await;
    let image_mock = server
        .mock("GET", "/star3/origin/answer.jpg")
        .with_status(200)
        .with_body(b"answer")
        .expect(1)
        .create_async()
        .await;
    let output = tempfile::tempdir().unwrap();
    let tasks = vec![task("/star3/origin/answer.jpg".to_string(), output.path(), 1)];
    let (context, _rx) = test_context(test_config(&server.url()));

    // --- 2. Act (执行阶段) ---
    let outcome = execute_tasks(&context, &tasks).await;

    // --- 3. Assert (断言阶段) ---
    image_mock.assert_async().await;
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(
        fs::read(output.path().join("线性代数-行列式-1.jpg")).unwrap(),
        b"answer"
    );
}

#[tokio::test]
async fn test_all_failures_is_not_success() {
    // --- 1. Arrange (准备阶段) ---
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sv-w8/doc/p/1.png")
        .with_status(500)
        .create_async()
        .await;
    let output = tempfile::tempdir().unwrap();
    let tasks = vec![task(format!("{}/sv-w8/doc/p/1.png", server.url()), output.path(), 1)];
    let (context, _rx) = test_context(test_config(&server.url()));

    // --- 2. Act (执行阶段) ---
    let outcome = execute_tasks(&context, &tasks).await;

    // --- 3. Assert (断言阶段) ---
    assert_eq!(outcome.failed, 1);
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn test_existing_file_is_overwritten_by_default() {
    // --- 1. Arrange (准备阶段) ---
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sv-w8/doc/p/1.png")
        .with_status(200)
        .with_body(b"new")
        .create_async()
        .await;
    let output = tempfile::tempdir().unwrap();
    let target = output.path().join("线性代数-行列式-1.png");
    fs::write(&target, b"old").unwrap();
    let tasks = vec![task(format!("{}/sv-w8/doc/p/1.png", server.url()), output.path(), 1)];
    let (context, _rx) = test_context(test_config(&server.url()));

    // --- 2. Act (执行阶段) ---
    let outcome = execute_tasks(&context, &tasks).await;

    // --- 3. Assert (断言阶段) ---
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(fs::read(&target).unwrap(), b"new");
}

#[tokio::test]
async fn test_skip_policy_keeps_existing_file_without_request() {
    // --- 1. Arrange (准备阶段) ---
    let mut server = Server::new_async().await;
    let image_mock = server
        .mock("GET", "/sv-w8/doc/p/1.png")
        .expect(0)
        .create_async()
        .await;
    let output = tempfile::tempdir().unwrap();
    let target = output.path().join("线性代数-行列式-1.png");
    fs::write(&target, b"old").unwrap();
    let tasks = vec![task(format!("{}/sv-w8/doc/p/1.png", server.url()), output.path(), 1)];
    let mut config = test_config(&server.url());
    config.on_conflict = ConflictPolicy::Skip;
    let (context, mut rx) = test_context(config);

    // --- 2. Act (执行阶段) ---
    let outcome = execute_tasks(&context, &tasks).await;

    // --- 3. Assert (断言阶段) ---
    image_mock.assert_async().await;
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.succeeded, 0);
    assert!(!outcome.is_success());
    assert_eq!(fs::read(&target).unwrap(), b"old");
    assert!(contains_line(&drain(&mut rx), "已跳过 1 个已存在的文件"));
}

#[tokio::test]
async fn test_rename_policy_writes_numbered_copy() {
    // --- 1. Arrange (准备阶段) ---
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sv-w8/doc/p/1.png")
        .with_status(200)
        .with_body(b"new")
        .create_async()
        .await;
    let output = tempfile::tempdir().unwrap();
    fs::write(output.path().join("线性代数-行列式-1.png"), b"old").unwrap();
    let tasks = vec![task(format!("{}/sv-w8/doc/p/1.png", server.url()), output.path(), 1)];
    let mut config = test_config(&server.url());
    config.on_conflict = ConflictPolicy::Rename;
    let (context, _rx) = test_context(config);

    // --- 2. Act (执行阶段) ---
    let outcome = execute_tasks(&context, &tasks).await;

    // --- 3. Assert (断言阶段) ---
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(
        fs::read(output.path().join("线性代数-行列式-1 (1).png")).unwrap(),
        b"new"
    );
    assert_eq!(
        fs::read(output.path().join("线性代数-行列式-1.png")).unwrap(),
        b"old"
    );
}

#[tokio::test]
async fn test_hanging_download_times_out_and_batch_continues() {
    // --- 1. Arrange (准备阶段) ---
    // 只监听不应答的端口：连接能建立，但永远收不到响应
    let silent = TcpListener::bind("127.0.0.1:0").unwrap();
    let silent_url = format!("http://{}/sv-w8/doc/p/1.png", silent.local_addr().unwrap());

    let mut server = Server::new_async().await;
    let second_mock = server
        .mock("GET", "/sv-w8/doc/p/2.png")
        .with_status(200)
        .with_body(b"page-two")
        .expect(1)
        .create_async()
        .await;
    let output = tempfile::tempdir().unwrap();
    let tasks = vec![
        task(silent_url, output.path(), 1),
        task(format!("{}/sv-w8/doc/p/2.png", server.url()), output.path(), 2),
    ];
    let mut config = test_config(&server.url());
    config.timeout = Duration::from_secs(1);
    let (context, mut rx) = test_context(config);

    // --- 2. Act (执行阶段) ---
    let outcome = execute_tasks(&context, &tasks).await;

    // --- 3. Assert (断言阶段) ---
    second_mock.assert_async().await;
    assert_eq!(outcome.attempted, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.succeeded, 1);
    assert!(!output.path().join("线性代数-行列式-1.png").exists());
    assert!(output.path().join("线性代数-行列式-2.png").exists());

    let lines = drain(&mut rx);
    assert!(contains_line(&lines, "网络连接超时"));
    assert!(!contains_line(&lines, "网络请求失败"));
    drop(silent);
}

#[tokio::test]
async fn test_refused_connection_is_reported_as_connection_error() {
    // --- 1. Arrange (准备阶段) ---
    // 先占用一个端口再释放，之后对它的连接会被拒绝
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let output = tempfile::tempdir().unwrap();
    let tasks = vec![task(format!("http://{}/sv-w8/doc/p/1.png", addr), output.path(), 1)];
    let (context, mut rx) = test_context(test_config("http://127.0.0.1:9"));

    // --- 2. Act (执行阶段) ---
    let outcome = execute_tasks(&context, &tasks).await;

    // --- 3. Assert (断言阶段) ---
    assert_eq!(outcome.failed, 1);
    let lines = drain(&mut rx);
    assert!(contains_line(&lines, "无法建立连接"));
    assert!(contains_line(&lines, "原因: 无法建立连接"));
}

#[tokio::test]
async fn test_delay_is_enforced_between_downloads() {
    // --- 1. Arrange (准备阶段) ---
    let mut server = Server::new_async().await;
    let server_url = server.url();
    for i in 1..=3 {
        server
            .mock("GET", format!("/sv-w8/doc/p/{}.png", i).as_str())
            .with_status(200)
            .with_body(b"page")
            .create_async()
            .await;
    }
    let output = tempfile::tempdir().unwrap();
    let tasks: Vec<ImageTask> = (1..=3)
        .map(|i| task(format!("{}/sv-w8/doc/p/{}.png", server_url, i), output.path(), i))
        .collect();
    let mut config = test_config(&server_url);
    config.download_delay = Duration::from_millis(300);
    let (context, _rx) = test_context(config);

    // --- 2. Act (执行阶段) ---
    let started = Instant::now();
    let outcome = execute_tasks(&context, &tasks).await;
    let elapsed = started.elapsed();

    // --- 3. Assert (断言阶段) ---
    assert_eq!(outcome.succeeded, 3);
    // 三张图片之间有两次间隔，第一张之前不等待
    assert!(elapsed >= Duration::from_millis(600), "耗时 {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(900 + 2000), "耗时 {:?}", elapsed);
}

// tests/session_probe_test.rs

mod common;

use common::*;
use cx_img_dl::client::SessionStatus;
use mockito::Server;

const PROBE_PATH: &str = "/mooc-ans/mycourse/studentstudy";

#[tokio::test]
async fn test_probe_accepts_ok_response() {
    let mut server = Server::new_async().await;
    let probe_mock = server
        .mock("GET", PROBE_PATH)
        .match_header("cookie", EXPECTED_COOKIE_HEADER)
        .with_status(200)
        .create_async()
        .await;
    let (context, _rx) = test_context(test_config(&server.url()));

    let status = context.http_client.probe_session().await.unwrap();

    probe_mock.assert_async().await;
    assert_eq!(status, SessionStatus::Valid);
}

#[tokio::test]
async fn test_probe_detects_login_redirect_without_following() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", PROBE_PATH)
        .with_status(302)
        .with_header("location", "https://passport2.chaoxing.com/login?refer=x")
        .create_async()
        .await;
    let (context, _rx) = test_context(test_config(&server.url()));

    let status = context.http_client.probe_session().await.unwrap();

    assert_eq!(status, SessionStatus::Invalid);
}

#[tokio::test]
async fn test_probe_reports_unrecognised_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", PROBE_PATH)
        .with_status(503)
        .create_async()
        .await;
    let (context, _rx) = test_context(test_config(&server.url()));

    let status = context.http_client.probe_session().await.unwrap();

    assert_eq!(status, SessionStatus::Unknown(503));
}

//! Tests for the Twilio sender using mockito for HTTP mocking.

use lifeline_relay::services::sms::{ DeliveryError, MessageSender, TwilioSender };
use mockito::{ Matcher, Server };

const MESSAGES_PATH: &str = "/2010-04-01/Accounts/AC123/Messages.json";

fn sender(base_url: String) -> TwilioSender {
    TwilioSender::new(
        reqwest::Client::new(),
        base_url,
        "AC123".into(),
        "secret".into(),
        "+15550009999".into()
    )
}

#[tokio::test]
async fn send_posts_form_and_returns_sid() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", MESSAGES_PATH)
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .match_body(
            Matcher::AllOf(
                vec![
                    Matcher::UrlEncoded("To".into(), "+15551234567".into()),
                    Matcher::UrlEncoded("From".into(), "+15550009999".into()),
                    Matcher::UrlEncoded("Body".into(), "help needed".into())
                ]
            )
        )
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sid":"SM0001","status":"queued"}"#)
        .create_async().await;

    let id = sender(server.url()).send("+15551234567", "help needed").await.unwrap();

    mock.assert_async().await;
    assert_eq!(id, "SM0001");
}

#[tokio::test]
async fn provider_rejection_carries_status_and_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", MESSAGES_PATH)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":21211,"message":"The 'To' number is not valid.","status":400}"#)
        .create_async().await;

    let err = sender(server.url()).send("bogus", "help").await.unwrap_err();

    match err {
        DeliveryError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "The 'To' number is not valid.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rejection_without_json_body_uses_status_text() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("POST", MESSAGES_PATH).with_status(401).create_async().await;

    let err = sender(server.url()).send("+1", "help").await.unwrap_err();
    assert!(matches!(err, DeliveryError::Rejected { status: 401, ref message } if message == "Unauthorized"));
}

#[tokio::test]
async fn unreachable_provider_is_transport_error() {
    let err = sender("http://127.0.0.1:1".into()).send("+1", "help").await.unwrap_err();
    assert!(matches!(err, DeliveryError::Transport(_)));
}

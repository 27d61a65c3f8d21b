//! Round trips through the reqwest transport against a local mock server.

use integrations_aws_ses_query::mocks::TestFixtures;
use integrations_aws_ses_query::{EmailMessage, SesClient, SesConfig, SesError};
use std::net::TcpListener;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, bulk: bool) -> SesClient {
    let config = SesConfig::builder()
        .credentials("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
        .endpoint_url(server.uri())
        .bulk_mode(bulk)
        .trigger_errors(false)
        .user_agent("ses-roundtrip-test")
        .build()
        .expect("valid config");
    SesClient::new(config)
}

#[tokio::test]
async fn test_get_send_quota_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("Action", "GetSendQuota"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .and(header("user-agent", "ses-roundtrip-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TestFixtures::send_quota_xml()))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, false);
    let quota = client.get_send_quota().await.unwrap();

    assert_eq!(quota.max_24_hour_send, 200.0);
    assert_eq!(quota.request_id, "quota-request-id");
}

#[tokio::test]
async fn test_send_email_posts_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("Action=SendEmail"))
        .and(body_string_contains("Destination.ToAddresses.member.1=to%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TestFixtures::send_email_xml(
            "SendEmail",
            "wire-msg",
            "wire-req",
        )))
        .expect(2)
        .mount(&server)
        .await;

    let mut client = client_for(&server, true);
    for _ in 0..2 {
        let mut message = EmailMessage::new()
            .set_from("from@example.com")
            .add_to("to@example.com")
            .set_subject("Over the wire")
            .set_text("Body");
        let response = client.send_email(&mut message).await.unwrap();
        assert_eq!(response.message_id, "wire-msg");
    }
    assert!(client.has_retained_handler());
}

#[tokio::test]
async fn test_service_error_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(query_param("EmailAddress", "gone@example.com"))
        .respond_with(ResponseTemplate::new(400).set_body_string(TestFixtures::error_xml(
            "Sender",
            "InvalidParameterValue",
            "Unknown address",
            "delete-req",
        )))
        .mount(&server)
        .await;

    let mut client = client_for(&server, false);
    let err = client
        .delete_verified_email_address("gone@example.com")
        .await
        .unwrap_err();

    assert!(err.is_service());
    assert_eq!(err.error_code(), Some("InvalidParameterValue"));
    assert_eq!(err.request_id(), Some("delete-req"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = SesConfig::builder()
        .credentials("AKIDEXAMPLE", "secret")
        .endpoint_url(format!("http://127.0.0.1:{}", port))
        .trigger_errors(false)
        .build()
        .unwrap();
    let mut client = SesClient::new(config);

    let err = client.get_send_statistics().await.unwrap_err();
    assert!(matches!(err, SesError::Transport { ref code, .. } if code == "connect"));
}

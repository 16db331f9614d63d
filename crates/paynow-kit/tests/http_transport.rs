use std::time::Duration;

use mockito::{Matcher, Server};
use paynow_kit::{
    client::PaypayClient,
    config::ClientConfig,
    endpoint::Endpoints,
    errors::{Error, TransportErrorCode, ValidationError},
    http_transport::{HttpPaypayClient, HttpTransport},
    params::{AuthorizeRequest, CaptureRequest, RefundRequest},
    response::ResultStatus,
};
use serde_json::json;

fn config_for(base: &str) -> ClientConfig {
    ClientConfig::builder()
        .merchant_ccid("M1")
        .secret("S1")
        .endpoints(Endpoints {
            production: format!("{base}/paynow/v2"),
            test: format!("{base}/test-paynow/v2"),
        })
        .build()
}

fn client_for(base: &str) -> HttpPaypayClient {
    PaypayClient::new(config_for(base), HttpTransport::new())
}

fn authorize_request() -> AuthorizeRequest {
    AuthorizeRequest::builder()
        .order_id("T1")
        .item_id("I1")
        .amount("1000")
        .build()
}

fn shift_jis(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    assert!(!had_errors);
    bytes.into_owned()
}

#[tokio::test]
async fn test_authorize_returns_markup_untouched() {
    let mut server = Server::new_async().await;
    let page = shift_jis("<html><body>PayPayでお支払い</body></html>");

    let mock = server
        .mock("POST", "/test-paynow/v2/Authorize/paypay")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "text/html; charset=Shift_JIS")
        .with_body(page.clone())
        .expect(1)
        .create_async()
        .await;

    let result = client_for(&server.url())
        .authorize(authorize_request())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.status, ResultStatus::Success);
    assert_eq!(result.order_id, "T1");
    assert_eq!(result.payload.as_deref(), Some(page.as_slice()));
}

#[tokio::test]
async fn test_request_body_carries_verifiable_hash() {
    let mut server = Server::new_async().await;
    let client = client_for(&server.url());
    let prepared = client.prepare(authorize_request()).unwrap();
    assert!(prepared.envelope.verify("S1"));

    let mock = server
        .mock("POST", "/test-paynow/v2/Authorize/paypay")
        .match_body(Matcher::PartialJson(json!({
            "params": {
                "orderId": "T1",
                "merchantCcid": "M1",
                "serviceOptionType": "online",
                "txnVersion": "2.0.0",
                "dummyRequest": "1",
                "accountingType": "0",
                "amount": "1000",
                "itemId": "I1",
            },
            "authHash": prepared.envelope.auth_hash(),
        })))
        .with_status(200)
        .with_body("<html></html>")
        .expect(1)
        .create_async()
        .await;

    client.send(prepared).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_json_failure_is_decoded_from_shift_jis() {
    let mut server = Server::new_async().await;
    let body = shift_jis(
        r#"{"result":{"mstatus":"failure","vResultCode":"NH18","merrMsg":"売上済みです","orderId":"T1"}}"#,
    );

    server
        .mock("POST", "/test-paynow/v2/Capture/paypay")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let result = client_for(&server.url())
        .capture(CaptureRequest::builder().order_id("T1").build())
        .await
        .unwrap();

    assert_eq!(result.status, ResultStatus::Failure);
    assert_eq!(result.result_code, "NH18");
    assert_eq!(result.error_message(), "売上済みです");
    assert!(result.payload.is_none());
}

#[tokio::test]
async fn test_non_200_is_a_transport_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/test-paynow/v2/Refund/paypay")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let err = client_for(&server.url())
        .refund(RefundRequest::builder().order_id("T1").build())
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    match err {
        Error::Transport(err) => {
            assert_eq!(err.code, TransportErrorCode::Status(500));
            assert_eq!(err.message, "Internal Server Error");
            assert_eq!(err.details.as_deref(), Some(b"upstream exploded".as_slice()));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_a_network_error() {
    let err = client_for("http://127.0.0.1:1")
        .authorize(authorize_request())
        .await
        .unwrap_err();

    match err {
        Error::Transport(err) => {
            assert_eq!(err.code, TransportErrorCode::Network);
            assert_eq!(err.code.to_string(), "NETWORK_ERROR");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_a_network_error() {
    // Accepts the connection and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let client = PaypayClient::new(
        config_for(&format!("http://{addr}")),
        HttpTransport::new().timeout(Duration::from_millis(200)),
    );
    let err = client.authorize(authorize_request()).await.unwrap_err();

    match err {
        Error::Transport(err) => assert_eq!(err.code, TransportErrorCode::Network),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_request_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = client_for(&server.url())
        .authorize(
            AuthorizeRequest::builder()
                .order_id("T1")
                .item_id("I1")
                .amount("10000000")
                .build(),
        )
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err,
        Error::Validation(ValidationError::OutOfRange { field: "amount", .. })
    ));
}

use paynow_kit::{
    client::PaypayClient,
    config::ClientConfig,
    http_transport::HttpTransport,
    params::{AuthorizeRequest, CancelRequest},
    utils::generate_order_id,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::builder()
        .merchant_ccid(std::env::var("MERCHANT_CCID").expect("MERCHANT_CCID not set"))
        .secret(std::env::var("MERCHANT_KEY").expect("MERCHANT_KEY not set"))
        .build();
    let client = PaypayClient::new(config, HttpTransport::new());

    let order_id = generate_order_id("DEMO");
    tracing::info!("Authorizing order {order_id} against the test gateway");

    let result = client
        .authorize(
            AuthorizeRequest::builder()
                .order_id(order_id.clone())
                .item_id("DEMOITEM")
                .item_name("Demo item")
                .amount("100")
                .success_url("https://example.com/success")
                .cancel_url("https://example.com/cancel")
                .error_url("https://example.com/error")
                .build(),
        )
        .await;

    match result {
        Ok(result) if result.is_success() => {
            let size = result.payload.as_ref().map_or(0, |page| page.len());
            tracing::info!("Got a {size} byte payment page for {order_id}");
        }
        Ok(result) => {
            tracing::warn!(
                "Gateway rejected {order_id} [{}]: {}",
                result.result_code,
                result.error_message()
            );
            return;
        }
        Err(err) => {
            tracing::error!("Authorize failed: {err}");
            return;
        }
    }

    // Nobody paid, so the order can still be cancelled.
    match client
        .cancel(CancelRequest::builder().order_id(order_id.clone()).build())
        .await
    {
        Ok(result) => tracing::info!(
            "Cancel {order_id}: {:?} {}",
            result.status,
            result.result_code
        ),
        Err(err) => tracing::error!("Cancel failed: {err}"),
    }
}

// core/src/gateway/sigilopay.rs

//! HTTP client for the SigiloPay PIX gateway.
//!
//! Endpoints (relative to `GatewayConfig::base_url`):
//!   POST `/gateway/pix/receive`         opens a charge
//!   GET  `/gateway/transaction/{id}`    reads its state
//! Both authenticate with the `x-public-key` / `x-secret-key` header pair.

use super::{PixCharge, PixChargeRequest, PixGateway, PixStatus};
use crate::config::GatewayConfig;
use crate::error::{CheckoutError, CheckoutResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use reqwest::{Client, Method, StatusCode, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const METADATA_SOURCE: &str = "robux-store";

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct PixReceivePayload<'a> {
  identifier: String,
  #[serde(with = "rust_decimal::serde::float")]
  amount: Decimal,
  client: PayloadClient<'a>,
  products: Vec<PayloadProduct<'a>>,
  metadata: PayloadMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct PayloadClient<'a> {
  name: &'a str,
  email: &'a str,
  phone: &'a str,
  document: &'a str,
}

#[derive(Debug, Serialize)]
struct PayloadProduct<'a> {
  id: &'a str,
  name: &'a str,
  quantity: u32,
  #[serde(with = "rust_decimal::serde::float")]
  price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayloadMetadata<'a> {
  source: &'static str,
  product_id: &'a str,
  quantity: String,
  roblox_user: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PixReceiveResponse {
  transaction_id: Option<String>,
  status: Option<String>,
  pix: Option<PixBlock>,
  order: Option<OrderBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct PixBlock {
  code: Option<String>,
  base64: Option<String>,
  image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OrderBlock {
  url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionResponse {
  transaction_id: Option<String>,
  status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  message: Option<String>,
}

// ==================== Client ====================

#[derive(Debug, Clone)]
pub struct SigiloPayClient {
  http: Client,
  config: GatewayConfig,
}

impl SigiloPayClient {
  pub fn new(config: GatewayConfig) -> CheckoutResult<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| CheckoutError::Internal(format!("failed to build gateway HTTP client: {}", e)))?;
    Ok(Self { http, config })
  }

  pub fn config(&self) -> &GatewayConfig {
    &self.config
  }

  fn endpoint(&self, segments: &[&str]) -> CheckoutResult<Url> {
    let mut url = Url::parse(&self.config.base_url)
      .map_err(|e| CheckoutError::GatewayConfiguration(format!("invalid gateway base URL: {}", e)))?;
    url
      .path_segments_mut()
      .map_err(|_| CheckoutError::GatewayConfiguration("gateway base URL cannot carry a path".to_string()))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  /// Sends an authenticated request and decodes a success body into `T`.
  /// Non-success statuses become `GatewayRequest` carrying the provider's `message`.
  async fn call<T: DeserializeOwned>(
    &self,
    method: Method,
    url: Url,
    body: Option<&PixReceivePayload<'_>>,
    fallback_message: &str,
  ) -> CheckoutResult<T> {
    let (public_key, secret_key) = self.config.credentials()?;

    let mut request = self
      .http
      .request(method, url)
      .header("x-public-key", public_key)
      .header("x-secret-key", secret_key);
    if let Some(body) = body {
      request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    debug!(http_status = status.as_u16(), "SigiloPay responded.");

    if !status.is_success() {
      let message = provider_message(&text).unwrap_or_else(|| fallback_message.to_string());
      warn!(http_status = status.as_u16(), %message, "SigiloPay rejected the request.");
      return Err(CheckoutError::GatewayRequest {
        status: Some(status.as_u16()),
        message,
      });
    }

    decode_body(status, &text)
  }
}

#[async_trait]
impl PixGateway for SigiloPayClient {
  #[instrument(
    name = "sigilopay::submit_pix_payment",
    skip(self, request),
    fields(product_id = %request.product_id, amount = %request.amount, identifier = tracing::field::Empty),
    err(Display)
  )]
  async fn submit_pix_payment(&self, request: &PixChargeRequest) -> CheckoutResult<PixCharge> {
    // Fail on configuration before building anything that could reach the network.
    self.config.credentials()?;

    let identifier = client_identifier(Utc::now(), &mut OsRng);
    tracing::Span::current().record("identifier", identifier.as_str());
    let payload = build_payload(request, identifier);
    let url = self.endpoint(&["gateway", "pix", "receive"])?;

    info!("Opening PIX charge.");
    let data: PixReceiveResponse = self
      .call(Method::POST, url, Some(&payload), "Failed to create PIX payment")
      .await?;

    let charge = charge_from_response(data)?;
    info!(transaction_id = %charge.transaction_id, raw_status = ?charge.raw_status, "PIX charge opened.");
    Ok(charge)
  }

  #[instrument(name = "sigilopay::fetch_pix_status", skip(self), err(Display))]
  async fn fetch_pix_status(&self, transaction_id: &str) -> CheckoutResult<PixStatus> {
    self.config.credentials()?;
    let url = self.endpoint(&["gateway", "transaction", transaction_id])?;

    let data: TransactionResponse = self
      .call(Method::GET, url, None, "Failed to check payment status")
      .await?;

    let status = PixStatus::from_raw(
      data.transaction_id.unwrap_or_else(|| transaction_id.to_string()),
      data.status,
    );
    debug!(raw_status = ?status.raw_status, status = %status.status, "PIX status fetched.");
    Ok(status)
  }
}

// ==================== Helpers ====================

fn build_payload(request: &PixChargeRequest, identifier: String) -> PixReceivePayload<'_> {
  PixReceivePayload {
    identifier,
    amount: request.amount,
    client: PayloadClient {
      name: &request.buyer.name,
      email: &request.buyer.email,
      phone: &request.buyer.phone,
      document: &request.buyer.document,
    },
    products: vec![PayloadProduct {
      id: &request.product_id,
      name: &request.product_name,
      quantity: request.quantity,
      price: request.unit_price(),
    }],
    metadata: PayloadMetadata {
      source: METADATA_SOURCE,
      product_id: &request.product_id,
      quantity: request.quantity.to_string(),
      roblox_user: &request.buyer.roblox_user,
    },
  }
}

fn charge_from_response(data: PixReceiveResponse) -> CheckoutResult<PixCharge> {
  let transaction_id = data
    .transaction_id
    .filter(|id| !id.trim().is_empty())
    .ok_or_else(|| CheckoutError::GatewayRequest {
      status: None,
      message: "Gateway response is missing transactionId".to_string(),
    })?;
  let pix = data.pix.unwrap_or_default();

  Ok(PixCharge {
    transaction_id,
    raw_status: data.status,
    pix_code: pix.code,
    pix_qr_base64: pix.base64.or(pix.image),
    order_url: data.order.and_then(|o| o.url),
  })
}

fn provider_message(body: &str) -> Option<String> {
  serde_json::from_str::<ErrorBody>(body)
    .ok()
    .and_then(|b| b.message)
    .filter(|m| !m.trim().is_empty())
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> CheckoutResult<T> {
  serde_json::from_str(body).map_err(|e| {
    CheckoutError::GatewayTransport(format!(
      "unreadable gateway response (HTTP {}): {}",
      status.as_u16(),
      e
    ))
  })
}

/// Tags a charge: `robux_{unix_millis}_{6 base-36 chars}`.
pub fn client_identifier(now: DateTime<Utc>, rng: &mut impl RngCore) -> String {
  const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
  let mut n = rng.next_u64();
  let suffix: String = (0..6)
    .map(|_| {
      let c = ALPHABET[(n % 36) as usize] as char;
      n /= 36;
      c
    })
    .collect();
  format!("robux_{}_{}", now.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::BuyerInfo;
  use chrono::TimeZone;
  use rust_decimal_macros::dec;
  use serde_json::json;

  fn charge_request() -> PixChargeRequest {
    PixChargeRequest {
      amount: dec!(49.90),
      product_id: "pkg-1700".to_string(),
      product_name: "1800 Robux".to_string(),
      quantity: 1,
      buyer: BuyerInfo {
        name: "Ana".to_string(),
        email: "a@x.com".to_string(),
        phone: "11999999999".to_string(),
        document: "12345678900".to_string(),
        roblox_user: "ana123".to_string(),
      },
    }
  }

  #[test]
  fn payload_matches_gateway_contract() {
    let request = charge_request();
    let payload = serde_json::to_value(build_payload(&request, "robux_1_abc".to_string())).unwrap();
    assert_eq!(
      payload,
      json!({
        "identifier": "robux_1_abc",
        "amount": 49.9,
        "client": {"name": "Ana", "email": "a@x.com", "phone": "11999999999", "document": "12345678900"},
        "products": [{"id": "pkg-1700", "name": "1800 Robux", "quantity": 1, "price": 49.9}],
        "metadata": {"source": "robux-store", "productId": "pkg-1700", "quantity": "1", "robloxUser": "ana123"}
      })
    );
  }

  #[test]
  fn charge_response_prefers_base64_then_image() {
    let data: PixReceiveResponse = serde_json::from_value(json!({
      "transactionId": "tx1",
      "status": "WAITING_PAYMENT",
      "pix": {"code": "000201...", "image": "iVBOR..."},
      "order": {"url": "https://pay.example/tx1"}
    }))
    .unwrap();
    let charge = charge_from_response(data).unwrap();
    assert_eq!(charge.transaction_id, "tx1");
    assert_eq!(charge.raw_status.as_deref(), Some("WAITING_PAYMENT"));
    assert_eq!(charge.pix_code.as_deref(), Some("000201..."));
    assert_eq!(charge.pix_qr_base64.as_deref(), Some("iVBOR..."));
    assert_eq!(charge.order_url.as_deref(), Some("https://pay.example/tx1"));
  }

  #[test]
  fn charge_without_transaction_id_is_rejected() {
    let err = charge_from_response(PixReceiveResponse::default()).unwrap_err();
    assert!(err.is_gateway_request());
  }

  #[test]
  fn provider_message_is_extracted_when_present() {
    assert_eq!(provider_message(r#"{"message":"Invalid document"}"#).as_deref(), Some("Invalid document"));
    assert_eq!(provider_message(r#"{"message":""}"#), None);
    assert_eq!(provider_message("<html>502</html>"), None);
  }

  #[test]
  fn identifier_carries_timestamp_and_suffix() {
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let id = client_identifier(now, &mut OsRng);
    let parts: Vec<&str> = id.split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "robux");
    assert_eq!(parts[1], "1700000000000");
    assert_eq!(parts[2].len(), 6);
    assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
  }

  #[test]
  fn transaction_id_is_escaped_into_a_single_path_segment() {
    let client = SigiloPayClient::new(GatewayConfig::new("pk", "sk").with_base_url("https://gw.example/api/v1")).unwrap();
    let url = client.endpoint(&["gateway", "transaction", "a/b c"]).unwrap();
    assert_eq!(url.as_str(), "https://gw.example/api/v1/gateway/transaction/a%2Fb%20c");
  }

  #[tokio::test]
  async fn missing_credentials_fail_before_any_request() {
    // Unroutable base URL: reaching the network would surface as a transport error instead.
    let client = SigiloPayClient::new(GatewayConfig::unconfigured().with_base_url("http://127.0.0.1:9")).unwrap();

    let err = client.submit_pix_payment(&charge_request()).await.unwrap_err();
    assert!(matches!(err, CheckoutError::GatewayConfiguration(_)));

    let err = client.fetch_pix_status("tx1").await.unwrap_err();
    assert!(matches!(err, CheckoutError::GatewayConfiguration(_)));
  }

  // --- Loopback gateway: one canned response per test ---

  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::{TcpListener, TcpStream};
  use tokio::task::JoinHandle;

  /// Serves a single HTTP response and hands back the raw request it received.
  async fn serve_once(status_line: &'static str, body: &'static str) -> (GatewayConfig, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/v1", listener.local_addr().unwrap());
    let task = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let request = read_request(&mut socket).await;
      let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
      );
      socket.write_all(response.as_bytes()).await.unwrap();
      socket.shutdown().await.ok();
      request
    });
    (GatewayConfig::new("pk_test", "sk_test").with_base_url(base_url), task)
  }

  async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
      let n = socket.read(&mut chunk).await.unwrap();
      if n == 0 {
        break;
      }
      buf.extend_from_slice(&chunk[..n]);
      if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let content_length = head
          .lines()
          .find_map(|line| line.strip_prefix("content-length:"))
          .and_then(|v| v.trim().parse::<usize>().ok())
          .unwrap_or(0);
        if buf.len() >= end + 4 + content_length {
          break;
        }
      }
    }
    String::from_utf8_lossy(&buf).into_owned()
  }

  #[tokio::test]
  async fn opened_charge_is_decoded_from_gateway_json() {
    let (config, server) = serve_once(
      "200 OK",
      r#"{"transactionId":"tx1","status":"WAITING_PAYMENT","pix":{"code":"00020126...","base64":"iVBORw0KGgo="},"order":{"url":"https://pay.example/tx1"}}"#,
    )
    .await;
    let client = SigiloPayClient::new(config).unwrap();

    let charge = client.submit_pix_payment(&charge_request()).await.unwrap();
    assert_eq!(charge.transaction_id, "tx1");
    assert_eq!(charge.raw_status.as_deref(), Some("WAITING_PAYMENT"));
    assert_eq!(charge.pix_code.as_deref(), Some("00020126..."));
    assert_eq!(charge.qr_code_data_uri().as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));
    assert_eq!(charge.order_url.as_deref(), Some("https://pay.example/tx1"));

    let request = server.await.unwrap();
    let lowered = request.to_lowercase();
    assert!(lowered.starts_with("post /api/v1/gateway/pix/receive "), "{}", request);
    assert!(lowered.contains("x-public-key: pk_test"));
    assert!(lowered.contains("x-secret-key: sk_test"));
    assert!(request.contains(r#""robloxUser":"ana123""#), "{}", request);
    assert!(request.contains(r#""source":"robux-store""#), "{}", request);
  }

  #[tokio::test]
  async fn rejection_carries_provider_message() {
    let (config, server) = serve_once("400 Bad Request", r#"{"message":"Invalid document"}"#).await;
    let client = SigiloPayClient::new(config).unwrap();

    let err = client.submit_pix_payment(&charge_request()).await.unwrap_err();
    match err {
      CheckoutError::GatewayRequest { status, message } => {
        assert_eq!(status, Some(400));
        assert_eq!(message, "Invalid document");
      }
      other => panic!("expected a gateway rejection, got {:?}", other),
    }
    server.await.unwrap();
  }

  #[tokio::test]
  async fn rejection_without_message_uses_fallback() {
    let (config, server) = serve_once("502 Bad Gateway", "<html>upstream down</html>").await;
    let client = SigiloPayClient::new(config).unwrap();

    let err = client.fetch_pix_status("tx1").await.unwrap_err();
    match err {
      CheckoutError::GatewayRequest { status, message } => {
        assert_eq!(status, Some(502));
        assert_eq!(message, "Failed to check payment status");
      }
      other => panic!("expected a gateway rejection, got {:?}", other),
    }
    server.await.unwrap();
  }

  #[tokio::test]
  async fn transaction_status_is_fetched_and_normalized() {
    let (config, server) = serve_once("200 OK", r#"{"transactionId":"tx1","status":"COMPLETED"}"#).await;
    let client = SigiloPayClient::new(config).unwrap();

    let status = client.fetch_pix_status("tx1").await.unwrap();
    assert_eq!(status.transaction_id, "tx1");
    assert_eq!(status.raw_status.as_deref(), Some("COMPLETED"));
    assert_eq!(status.status, crate::models::OrderStatus::Paid);

    let request = server.await.unwrap();
    assert!(request.to_lowercase().starts_with("get /api/v1/gateway/transaction/tx1 "), "{}", request);
  }

  #[tokio::test]
  async fn unreadable_success_body_is_a_transport_error() {
    let (config, server) = serve_once("200 OK", "not json").await;
    let client = SigiloPayClient::new(config).unwrap();

    let err = client.fetch_pix_status("tx1").await.unwrap_err();
    assert!(matches!(err, CheckoutError::GatewayTransport(_)), "{:?}", err);
    server.await.unwrap();
  }
}

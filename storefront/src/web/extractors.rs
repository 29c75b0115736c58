// storefront/src/web/extractors.rs

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Proof that the request carried `Authorization: Bearer <ADMIN_TOKEN>`.
///
/// With no `ADMIN_TOKEN` configured every request is refused.
#[derive(Debug)]
pub struct AdminAccess;

impl FromRequest for AdminAccess {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    futures_util::future::ready(check_admin(req))
  }
}

fn check_admin(req: &HttpRequest) -> Result<AdminAccess, AppError> {
  let expected = req
    .app_data::<web::Data<AppState>>()
    .and_then(|state| state.admin_token.clone());
  let expected = match expected {
    Some(token) => token,
    None => {
      warn!("Admin request refused: ADMIN_TOKEN is not configured.");
      return Err(AppError::Unauthorized("Admin access is not configured".to_string()));
    }
  };

  let presented = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(str::trim);

  match presented {
    Some(token) if tokens_match(token.as_bytes(), expected.as_bytes()) => Ok(AdminAccess),
    _ => {
      warn!("Admin request refused: missing or wrong bearer token.");
      Err(AppError::Unauthorized("Admin token required".to_string()))
    }
  }
}

/// Compares every byte regardless of where the first mismatch is.
fn tokens_match(presented: &[u8], expected: &[u8]) -> bool {
  presented.len() == expected.len()
    && presented
      .iter()
      .zip(expected)
      .fold(0u8, |acc, (a, b)| acc | (a ^ b))
      == 0
}

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::application::WalletService;
use crate::domain::{Amount, AmountError, Balance, Deposit, Withdrawal};
use crate::storage::LedgerStore;

use super::ApiError;

/// Body of deposit and withdraw requests.
/// `amount` accepts a JSON number or a decimal string; a missing amount is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct AmountRequest {
    #[serde(default)]
    pub amount: Option<Amount>,
}

impl AmountRequest {
    fn amount(&self) -> Result<Amount, AmountError> {
        self.amount.ok_or(AmountError::Missing)
    }
}

/// `Json` extractor whose rejections use the API error body.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Both the lowercase paths and the PascalCase ones older clients call
/// (`/OnlineWallet/Balance`) are served.
pub fn routes<S: LedgerStore + 'static>() -> Router<Arc<WalletService<S>>> {
    Router::new()
        .route("/balance", get(balance::<S>))
        .route("/Balance", get(balance::<S>))
        .route("/deposit", post(deposit::<S>))
        .route("/Deposit", post(deposit::<S>))
        .route("/withdraw", post(withdraw::<S>))
        .route("/Withdraw", post(withdraw::<S>))
}

async fn balance<S: LedgerStore>(
    State(service): State<Arc<WalletService<S>>>,
) -> Result<Json<Balance>, ApiError> {
    Ok(Json(service.get_balance().await?))
}

async fn deposit<S: LedgerStore>(
    State(service): State<Arc<WalletService<S>>>,
    AppJson(request): AppJson<AmountRequest>,
) -> Result<Json<Balance>, ApiError> {
    let deposit = Deposit::new(request.amount()?)?;
    Ok(Json(service.deposit_funds(deposit).await?))
}

async fn withdraw<S: LedgerStore>(
    State(service): State<Arc<WalletService<S>>>,
    AppJson(request): AppJson<AmountRequest>,
) -> Result<Json<Balance>, ApiError> {
    let withdrawal = Withdrawal::new(request.amount()?)?;
    Ok(Json(service.withdraw_funds(withdrawal).await?))
}

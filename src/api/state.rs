use std::sync::Arc;

use crate::auth::AuthService;
use crate::db::Database;
use crate::money::AmountLimits;
use crate::payment::PaymentGateway;
use crate::store::WalletStore;
use crate::wallet::{BalanceReporter, FundingEngine, TransferEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WalletStore>,
    /// Present when running against PostgreSQL; used by the health check
    pub db: Option<Arc<Database>>,
    pub auth: Arc<AuthService>,
    pub transfers: TransferEngine,
    pub funding: FundingEngine,
    pub balances: BalanceReporter,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WalletStore>,
        db: Option<Arc<Database>>,
        auth: Arc<AuthService>,
        gateway: Arc<dyn PaymentGateway>,
        limits: AmountLimits,
    ) -> Self {
        Self {
            transfers: TransferEngine::new(store.clone(), limits),
            funding: FundingEngine::new(store.clone(), gateway, limits),
            balances: BalanceReporter::new(store.clone()),
            store,
            db,
            auth,
        }
    }
}

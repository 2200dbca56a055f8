use crate::cost::TransactionCostModel;
use crate::error::EnvironmentError;
use configuration::Config;
use core_types::{AccountType, Instrument, Order};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// The read-only capabilities a pre-trade validator consults.
///
/// Implementations must be safe for concurrent reads; validators hold them as
/// `Arc<dyn Environment>` and may be called from many threads at once.
pub trait Environment: Send + Sync {
    /// Looks up contract reference data for `instrument_id`.
    fn get_instrument(&self, instrument_id: &str) -> Result<Instrument, EnvironmentError>;

    /// Estimates the fees `order` would pay under the fee model of `account_type`.
    fn get_order_transaction_cost(
        &self,
        account_type: AccountType,
        order: &Order,
    ) -> Result<Decimal, EnvironmentError>;

    /// Risk buffer applied on top of exchange margin.
    fn margin_multiplier(&self) -> Decimal;
}

/// An in-memory environment built from the loaded configuration.
#[derive(Debug, Clone)]
pub struct SimulatedEnvironment {
    instruments: HashMap<String, Instrument>,
    cost_model: TransactionCostModel,
    margin_multiplier: Decimal,
}

impl SimulatedEnvironment {
    pub fn new(
        instruments: impl IntoIterator<Item = Instrument>,
        cost_model: TransactionCostModel,
        margin_multiplier: Decimal,
    ) -> Self {
        Self {
            instruments: instruments
                .into_iter()
                .map(|i| (i.instrument_id.clone(), i))
                .collect(),
            cost_model,
            margin_multiplier,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let env = Self::new(
            config.instruments.iter().map(|i| i.to_instrument()),
            TransactionCostModel::from_config(&config.commission, &config.instruments),
            config.base.margin_multiplier,
        );
        tracing::debug!(
            instruments = env.instruments.len(),
            margin_multiplier = %env.margin_multiplier,
            "Simulated environment ready."
        );
        env
    }

    /// All registered instruments, ordered by id.
    pub fn instruments(&self) -> Vec<&Instrument> {
        let mut all: Vec<_> = self.instruments.values().collect();
        all.sort_by(|a, b| a.instrument_id.cmp(&b.instrument_id));
        all
    }

    fn check_account_type(
        instrument: &Instrument,
        requested: AccountType,
    ) -> Result<(), EnvironmentError> {
        if instrument.account_type != requested {
            return Err(EnvironmentError::AccountTypeMismatch {
                instrument_id: instrument.instrument_id.clone(),
                requested: requested.to_string(),
                actual: instrument.account_type.to_string(),
            });
        }
        Ok(())
    }
}

impl Environment for SimulatedEnvironment {
    fn get_instrument(&self, instrument_id: &str) -> Result<Instrument, EnvironmentError> {
        self.instruments
            .get(instrument_id)
            .cloned()
            .ok_or_else(|| EnvironmentError::InstrumentNotFound(instrument_id.to_string()))
    }

    fn get_order_transaction_cost(
        &self,
        account_type: AccountType,
        order: &Order,
    ) -> Result<Decimal, EnvironmentError> {
        match account_type {
            AccountType::Stock => {
                // Stocks need no reference data to price, so unregistered ids are fine.
                if let Some(instrument) = self.instruments.get(&order.instrument_id) {
                    Self::check_account_type(instrument, AccountType::Stock)?;
                }
                self.cost_model.stock_cost(order)
            }
            AccountType::Future => {
                let instrument = self.get_instrument(&order.instrument_id)?;
                Self::check_account_type(&instrument, AccountType::Future)?;
                self.cost_model.future_cost(order, &instrument)
            }
            AccountType::Unrecognized => Ok(Decimal::ZERO),
        }
    }

    fn margin_multiplier(&self) -> Decimal {
        self.margin_multiplier
    }
}

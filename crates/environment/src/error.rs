use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    #[error("Instrument {instrument_id} trades under {actual} accounts, not {requested}")]
    AccountTypeMismatch {
        instrument_id: String,
        requested: String,
        actual: String,
    },

    #[error("Transaction cost for {0} does not fit in a decimal")]
    Overflow(String),
}

use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    Base, Commission, CommissionType, Config, FutureCommission, InstrumentConfig,
    StockCommission,
};

/// Loads and validates the configuration stored at `path`.
///
/// Values may be overridden from the environment with the `TOLLGATE`
/// prefix, e.g. `TOLLGATE_BASE__MARGIN_MULTIPLIER=1.5`.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading configuration.");

    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("TOLLGATE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    finish(builder)
}

/// Parses configuration from an in-memory TOML document.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

/// Command-line flag selecting the configuration file.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    pub config: std::path::PathBuf,
}

#[cfg(feature = "clap")]
impl ConfigArgs {
    pub fn load(&self) -> Result<Config, ConfigError> {
        load_config_from(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::AccountType;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [base]
        margin_multiplier = 1.2

        [commission.stock]
        commission_rate = 0.0003
        commission_multiplier = 1
        min_commission = 5
        tax_rate = 0.001
        tax_multiplier = 1

        [[instruments]]
        instrument_id = "000001.XSHE"
        account_type = "STOCK"

        [[instruments]]
        instrument_id = "IF2406"
        account_type = "FUTURE"
        contract_multiplier = 300
        margin_rate = 0.12
        commission_rate = 0.000023

        [[instruments]]
        instrument_id = "RB2410"
        account_type = "FUTURE"
        contract_multiplier = 10
        margin_rate = 0.09
        commission_type = "BY_VOLUME"
        commission_rate = 3
    "#;

    #[test]
    fn parses_full_document() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.base.margin_multiplier, dec!(1.2));
        assert_eq!(config.commission.stock.commission_rate, dec!(0.0003));
        assert_eq!(config.instruments.len(), 3);

        let rebar = &config.instruments[2];
        assert_eq!(rebar.account_type, AccountType::Future);
        assert_eq!(rebar.commission_type, Some(CommissionType::ByVolume));
        assert_eq!(rebar.to_instrument().contract_multiplier, dec!(10));

        let stock = config.instruments[0].to_instrument();
        assert_eq!(stock.contract_multiplier, dec!(1));
        assert_eq!(stock.margin_rate, dec!(1));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.base.margin_multiplier, dec!(1));
        assert_eq!(config.commission.stock.min_commission, dec!(5));
        assert_eq!(config.commission.future.commission_type, CommissionType::ByMoney);
        assert!(config.instruments.is_empty());
    }

    #[test]
    fn rejects_margin_multiplier_below_one() {
        let err = parse_config("[base]\nmargin_multiplier = 0.8\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("margin_multiplier")));
    }

    #[test]
    fn rejects_duplicate_instruments() {
        let doc = r#"
            [[instruments]]
            instrument_id = "IF2406"
            account_type = "FUTURE"

            [[instruments]]
            instrument_id = "IF2406"
            account_type = "FUTURE"
        "#;
        assert!(matches!(parse_config(doc), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_fee_overrides_on_stock_instruments() {
        let doc = r#"
            [[instruments]]
            instrument_id = "000001.XSHE"
            account_type = "STOCK"
            commission_rate = 0.0001
        "#;
        let err = parse_config(doc).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("000001.XSHE")));
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.instruments[1].instrument_id, "IF2406");
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_config_from("/nonexistent/tollgate.toml").unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        // SAFETY: std serializes environment access, and no other test here
        // asserts on the margin multiplier of a file-loaded config.
        unsafe { std::env::set_var("TOLLGATE_BASE__MARGIN_MULTIPLIER", "1.5") };
        let loaded = load_config_from(file.path());
        unsafe { std::env::remove_var("TOLLGATE_BASE__MARGIN_MULTIPLIER") };

        let config = loaded.unwrap();
        assert_eq!(config.base.margin_multiplier, dec!(1.5));
        assert_eq!(config.commission.stock.min_commission, dec!(5));
    }
}

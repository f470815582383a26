use clap::Subcommand;

use super::Output;
use crate::config::Config;
use crate::error::AppResult;
use crate::format::{format_currency, slugify};

#[derive(Subcommand, Debug)]
pub enum FmtCommand {
    /// Turn text into a URL slug
    Slug { text: String },

    /// Format an amount as whole currency units
    Currency {
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// ISO 4217 code (defaults to display.currency)
        #[arg(long)]
        code: Option<String>,
    },
}

pub fn run(command: FmtCommand, config: &Config) -> AppResult<Output> {
    match command {
        FmtCommand::Slug { text } => Ok(Output::text(slugify(&text))),
        FmtCommand::Currency { amount, code } => {
            let code = code.unwrap_or_else(|| config.display.currency.clone());
            Ok(Output::text(format_currency(amount, &code)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;

    #[test]
    fn currency_uses_configured_default() {
        let mut config = Config::default();
        let out = run(FmtCommand::Currency { amount: 1000.0, code: None }, &config).unwrap();
        assert_eq!(out.render().unwrap(), "$1,000");

        config.display = DisplayConfig {
            currency: "GBP".into(),
        };
        let out = run(FmtCommand::Currency { amount: -20.0, code: None }, &config).unwrap();
        assert_eq!(out.render().unwrap(), "-£20");
    }

    #[test]
    fn explicit_code_wins() {
        let out = run(
            FmtCommand::Currency {
                amount: 0.0,
                code: Some("USD".into()),
            },
            &Config::default(),
        )
        .unwrap();
        assert_eq!(out.render().unwrap(), "$0");
    }

    #[test]
    fn bad_code_is_an_error() {
        let result = run(
            FmtCommand::Currency {
                amount: 5.0,
                code: Some("dollars".into()),
            },
            &Config::default(),
        );
        assert!(result.is_err());
    }
}

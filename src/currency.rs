//! The currency used to display amounts of money.
//!
//! Amounts are stored without a currency, the server picks one currency at
//! start-up and every page formats money with it.

use std::{fmt::Display, str::FromStr};

use numfmt::{Formatter, Precision};
use serde::{Deserialize, Serialize};

/// A currency that amounts can be displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    #[default]
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Japanese Yen
    Jpy,
    /// Indian Rupee
    Inr,
    /// Canadian Dollar
    Cad,
    /// Australian Dollar
    Aud,
    /// Bangladeshi Taka
    Bdt,
    /// Chinese Yuan
    Cny,
    /// South Korean Won
    Krw,
    /// Brazilian Real
    Brl,
    /// Russian Ruble
    Rub,
    /// South African Rand
    Zar,
    /// Mexican Peso
    Mxn,
    /// Singapore Dollar
    Sgd,
    /// New Zealand Dollar
    Nzd,
    /// Swiss Franc
    Chf,
}

impl Currency {
    /// Every supported currency.
    pub const ALL: [Currency; 17] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Inr,
        Currency::Cad,
        Currency::Aud,
        Currency::Bdt,
        Currency::Cny,
        Currency::Krw,
        Currency::Brl,
        Currency::Rub,
        Currency::Zar,
        Currency::Mxn,
        Currency::Sgd,
        Currency::Nzd,
        Currency::Chf,
    ];

    /// The ISO 4217 code, e.g. "USD".
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Inr => "INR",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Bdt => "BDT",
            Currency::Cny => "CNY",
            Currency::Krw => "KRW",
            Currency::Brl => "BRL",
            Currency::Rub => "RUB",
            Currency::Zar => "ZAR",
            Currency::Mxn => "MXN",
            Currency::Sgd => "SGD",
            Currency::Nzd => "NZD",
            Currency::Chf => "CHF",
        }
    }

    /// The symbol placed before amounts, e.g. "$".
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd | Currency::Mxn => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy | Currency::Cny => "¥",
            Currency::Inr => "₹",
            Currency::Cad => "C$",
            Currency::Aud => "A$",
            Currency::Bdt => "৳",
            Currency::Krw => "₩",
            Currency::Brl => "R$",
            Currency::Rub => "₽",
            Currency::Zar => "R",
            Currency::Sgd => "S$",
            Currency::Nzd => "NZ$",
            Currency::Chf => "Fr",
        }
    }

    /// The English name of the currency.
    pub fn name(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
            Currency::Jpy => "Japanese Yen",
            Currency::Inr => "Indian Rupee",
            Currency::Cad => "Canadian Dollar",
            Currency::Aud => "Australian Dollar",
            Currency::Bdt => "Bangladeshi Taka",
            Currency::Cny => "Chinese Yuan",
            Currency::Krw => "South Korean Won",
            Currency::Brl => "Brazilian Real",
            Currency::Rub => "Russian Ruble",
            Currency::Zar => "South African Rand",
            Currency::Mxn => "Mexican Peso",
            Currency::Sgd => "Singapore Dollar",
            Currency::Nzd => "New Zealand Dollar",
            Currency::Chf => "Swiss Franc",
        }
    }

    /// Format `amount` rounded to whole units, e.g. "$1,235".
    pub fn format_rounded(&self, amount: f64) -> String {
        format_money(self.symbol(), amount.round(), 0)
    }

    /// Format `amount` with two decimal places, e.g. "$1,234.56".
    pub fn format(&self, amount: f64) -> String {
        format_money(self.symbol(), amount, 2)
    }
}

fn format_money(symbol: &str, amount: f64, decimals: u8) -> String {
    let magnitude = amount.abs();

    // numfmt renders zero as "0" regardless of the prefix and precision.
    if magnitude < 0.5 * 10f64.powi(-i32::from(decimals)) {
        return format!("{symbol}{:.*}", usize::from(decimals), 0.0);
    }

    let prefix = if amount < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_owned()
    };

    let formatter = match Formatter::currency(&prefix) {
        Ok(formatter) => formatter.precision(Precision::Decimals(decimals)),
        Err(error) => {
            tracing::warn!("Could not create currency formatter for {prefix:?}: {error:?}");
            return format!("{prefix}{magnitude:.*}", usize::from(decimals));
        }
    };
    let mut formatted_string = formatter.fmt_string(magnitude);

    // numfmt omits trailing zeros, so "12.30" is rendered as "12.3".
    if decimals > 0 {
        if !formatted_string.contains('.') {
            formatted_string.push('.');
        }

        let fraction_digits = formatted_string
            .rsplit_once('.')
            .map(|(_, fraction)| fraction.len())
            .unwrap_or_default();

        for _ in fraction_digits..usize::from(decimals) {
            formatted_string.push('0');
        }
    }

    formatted_string
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The error returned when a string is not a supported currency code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unsupported currency code {0:?}")]
pub struct ParseCurrencyError(String);

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCurrencyError(s.to_owned()))
    }
}

use std::fmt::Write;

use chrono::{
    format::{Item, StrftimeItems},
    NaiveDate,
};

use crate::error::CoreError;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    /// Formats `amount` with two decimals; negatives carry a leading `-`.
    fn format_amount(&self, amount: f64) -> String;

    /// Formats an unsigned amount with an explicit `+` or `-` prefix.
    fn format_signed(&self, amount: f64, negative: bool) -> String {
        let sign = if negative { '-' } else { '+' };
        format!("{sign}{}", self.format_amount(amount.abs()))
    }
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Prefixes amounts with a currency symbol, e.g. `$1234.50`.
#[derive(Debug, Clone)]
pub struct SymbolFormatter {
    symbol: String,
}

impl SymbolFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    /// Picks a symbol for an ISO 4217 code, falling back to the code itself.
    pub fn for_currency(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let symbol = match code.as_str() {
            "USD" | "CAD" | "AUD" | "NZD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" | "CNY" => "¥".to_string(),
            "BRL" => "R$".to_string(),
            _ => format!("{code} "),
        };
        Self { symbol }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl Default for SymbolFormatter {
    fn default() -> Self {
        Self::new("$")
    }
}

impl CurrencyFormatter for SymbolFormatter {
    fn format_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.symbol, amount)
        }
    }
}

/// Formats dates with a `chrono` strftime pattern.
#[derive(Debug, Clone)]
pub struct PatternDateFormatter {
    pattern: String,
}

impl PatternDateFormatter {
    pub const ISO: &'static str = "%Y-%m-%d";

    /// Accepts a strftime pattern only if it renders a calendar date.
    pub fn new(pattern: impl Into<String>) -> Result<Self, CoreError> {
        let pattern = pattern.into();
        let parses = StrftimeItems::new(&pattern).all(|item| !matches!(item, Item::Error));
        let renders = NaiveDate::from_ymd_opt(2000, 1, 31)
            .and_then(|sample| render(&pattern, sample))
            .is_some();
        if !parses || !renders {
            return Err(CoreError::Validation(format!(
                "invalid date format `{pattern}`"
            )));
        }
        Ok(Self { pattern })
    }

    fn known(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
        }
    }

    /// Short numeric date layout customary for `locale` (BCP 47 tag).
    pub fn for_locale(locale: &str) -> Self {
        let normalized = locale.trim().replace('_', "-").to_ascii_lowercase();
        let pattern = match normalized.as_str() {
            "en-us" | "en" => "%-m/%-d/%Y",
            "de-de" | "de" | "ru-ru" | "pl-pl" => "%d.%m.%Y",
            "en-gb" | "fr-fr" | "es-es" | "it-it" | "pt-br" | "pt-pt" => "%d/%m/%Y",
            _ => Self::ISO,
        };
        Self::known(pattern)
    }
}

impl Default for PatternDateFormatter {
    fn default() -> Self {
        Self::known(Self::ISO)
    }
}

impl DateFormatter for PatternDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        render(&self.pattern, date).unwrap_or_else(|| date.format(Self::ISO).to_string())
    }
}

fn render(pattern: &str, date: NaiveDate) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}

// Pure string formatters shared by the store and the command line.
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{AppError, AppResult};

pub const DEFAULT_CURRENCY_CODE: &str = "USD";

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));
static NON_SLUG_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-]").expect("static slug pattern"));
static HYPHEN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("static hyphen pattern"));

/// Currency symbols the en-US locale places in front of an amount.
/// Anything else renders as the ISO code followed by a no-break space.
const EN_US_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("INR", "₹"),
    ("CAD", "CA$"),
    ("AUD", "A$"),
    ("NZD", "NZ$"),
    ("HKD", "HK$"),
    ("MXN", "MX$"),
    ("BRL", "R$"),
    ("CNY", "CN¥"),
    ("KRW", "₩"),
    ("ILS", "₪"),
    ("TWD", "NT$"),
    ("VND", "₫"),
    ("PHP", "₱"),
    ("XAF", "FCFA"),
];

/// Format `amount` the way an en-US currency formatter with zero fraction
/// digits would, e.g. `format_currency(1000.0, "USD") == "$1,000"`.
pub fn format_currency(amount: f64, currency_code: &str) -> AppResult<String> {
    if !amount.is_finite() {
        return Err(AppError::invalid(format!(
            "cannot format non-finite amount {}",
            amount
        )));
    }

    let code = currency_code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::invalid(format!(
            "invalid currency code: {:?}",
            currency_code
        )));
    }

    let prefix = EN_US_SYMBOLS
        .iter()
        .find(|(iso, _)| *iso == code)
        .map(|(_, symbol)| symbol.to_string())
        .unwrap_or_else(|| format!("{}\u{a0}", code));

    // f64::round is half away from zero, matching the locale formatter.
    // Display prints the shortest round-trip digits and never an exponent.
    let digits = format!("{}", amount.abs().round());
    let sign = if amount.is_sign_negative() { "-" } else { "" };

    Ok(format!("{}{}{}", sign, prefix, group_thousands(&digits)))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Turn arbitrary text into a lowercase, hyphen-separated, URL-safe slug.
///
/// Accents are stripped by canonical decomposition before anything else, so
/// `"Café Déjà Vu"` becomes `"cafe-deja-vu"`. The result only ever contains
/// `[a-z0-9_-]`, never starts or ends with a hyphen and never repeats one,
/// which makes the function idempotent.
pub fn slugify(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();
    let lowered = stripped.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(lowered.trim(), "-");
    let cleaned = NON_SLUG_CHAR.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUN.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

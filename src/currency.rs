// 💱 Currency - display symbol, decimals and en-US formatting
//
// One display currency per session; no conversion. Every amount a host shows
// goes through CurrencyFormat so zero-decimal currencies (JPY, KRW, ...) are
// rendered without a fraction.

use crate::money::{round_to, to_fixed};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "USD";

/// Currencies displayed without minor units
pub const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "JPY", "KRW", "UZS", "IDR", "VND", "IRR", "MMK", "RWF", "BIF", "GNF", "ISK", "PYG", "CLP",
    "IQD", "LBP", "MGA",
];

/// ISO 3166-1 alpha-2 country → ISO 4217 currency
pub const REGION_CURRENCY: &[(&str, &str)] = &[
    ("US", "USD"), ("GB", "GBP"), ("CA", "CAD"), ("AU", "AUD"), ("NZ", "NZD"),
    ("DE", "EUR"), ("FR", "EUR"), ("IT", "EUR"), ("ES", "EUR"), ("NL", "EUR"),
    ("BE", "EUR"), ("AT", "EUR"), ("PT", "EUR"), ("IE", "EUR"), ("FI", "EUR"),
    ("GR", "EUR"), ("SK", "EUR"), ("SI", "EUR"), ("EE", "EUR"), ("LV", "EUR"),
    ("LT", "EUR"), ("LU", "EUR"), ("MT", "EUR"), ("CY", "EUR"), ("HR", "EUR"),
    ("CH", "CHF"), ("SE", "SEK"), ("NO", "NOK"), ("DK", "DKK"),
    ("PL", "PLN"), ("CZ", "CZK"), ("HU", "HUF"), ("RO", "RON"),
    ("BG", "BGN"), ("RS", "RSD"), ("IS", "ISK"), ("AL", "ALL"), ("MK", "MKD"),
    ("RU", "RUB"), ("UA", "UAH"), ("TR", "TRY"), ("BY", "BYN"),
    ("JP", "JPY"), ("CN", "CNY"), ("KR", "KRW"), ("IN", "INR"),
    ("ID", "IDR"), ("TH", "THB"), ("VN", "VND"), ("MY", "MYR"),
    ("PH", "PHP"), ("SG", "SGD"), ("HK", "HKD"), ("TW", "TWD"),
    ("BD", "BDT"), ("PK", "PKR"), ("LK", "LKR"), ("MM", "MMK"),
    ("SA", "SAR"), ("AE", "AED"), ("QA", "QAR"), ("KW", "KWD"),
    ("BH", "BHD"), ("OM", "OMR"), ("JO", "JOD"), ("IQ", "IQD"),
    ("IR", "IRR"), ("IL", "ILS"), ("EG", "EGP"), ("LB", "LBP"),
    ("UZ", "UZS"), ("KZ", "KZT"), ("AZ", "AZN"), ("AM", "AMD"), ("GE", "GEL"),
    ("MX", "MXN"), ("BR", "BRL"), ("AR", "ARS"), ("CL", "CLP"),
    ("CO", "COP"), ("PE", "PEN"), ("UY", "UYU"),
    ("ZA", "ZAR"), ("NG", "NGN"), ("KE", "KES"), ("GH", "GHS"),
    ("TZ", "TZS"), ("ET", "ETB"), ("MA", "MAD"), ("TN", "TND"), ("DZ", "DZD"),
];

/// Currencies offered in pickers, sorted by code
pub const COMMON_CURRENCIES: &[(&str, &str)] = &[
    ("AED", "UAE Dirham"),
    ("AMD", "Armenian Dram"),
    ("ARS", "Argentine Peso"),
    ("AUD", "Australian Dollar"),
    ("AZN", "Azerbaijani Manat"),
    ("BDT", "Bangladeshi Taka"),
    ("BGN", "Bulgarian Lev"),
    ("BHD", "Bahraini Dinar"),
    ("BRL", "Brazilian Real"),
    ("BYN", "Belarusian Ruble"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CLP", "Chilean Peso"),
    ("CNY", "Chinese Yuan"),
    ("COP", "Colombian Peso"),
    ("CZK", "Czech Koruna"),
    ("DKK", "Danish Krone"),
    ("DZD", "Algerian Dinar"),
    ("EGP", "Egyptian Pound"),
    ("ETB", "Ethiopian Birr"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("GEL", "Georgian Lari"),
    ("GHS", "Ghanaian Cedi"),
    ("HKD", "Hong Kong Dollar"),
    ("HUF", "Hungarian Forint"),
    ("IDR", "Indonesian Rupiah"),
    ("ILS", "Israeli Shekel"),
    ("INR", "Indian Rupee"),
    ("IRR", "Iranian Rial"),
    ("ISK", "Icelandic Krona"),
    ("JOD", "Jordanian Dinar"),
    ("JPY", "Japanese Yen"),
    ("KES", "Kenyan Shilling"),
    ("KRW", "South Korean Won"),
    ("KWD", "Kuwaiti Dinar"),
    ("KZT", "Kazakhstani Tenge"),
    ("LKR", "Sri Lankan Rupee"),
    ("MAD", "Moroccan Dirham"),
    ("MXN", "Mexican Peso"),
    ("MYR", "Malaysian Ringgit"),
    ("NGN", "Nigerian Naira"),
    ("NOK", "Norwegian Krone"),
    ("NZD", "New Zealand Dollar"),
    ("OMR", "Omani Rial"),
    ("PEN", "Peruvian Sol"),
    ("PHP", "Philippine Peso"),
    ("PKR", "Pakistani Rupee"),
    ("PLN", "Polish Zloty"),
    ("QAR", "Qatari Riyal"),
    ("RON", "Romanian Leu"),
    ("RUB", "Russian Ruble"),
    ("SAR", "Saudi Riyal"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("THB", "Thai Baht"),
    ("TND", "Tunisian Dinar"),
    ("TRY", "Turkish Lira"),
    ("TWD", "Taiwan Dollar"),
    ("TZS", "Tanzanian Shilling"),
    ("UAH", "Ukrainian Hryvnia"),
    ("USD", "US Dollar"),
    ("UYU", "Uruguayan Peso"),
    ("UZS", "Uzbekistani Som"),
    ("VND", "Vietnamese Dong"),
    ("ZAR", "South African Rand"),
];

/// en-US narrow symbols; anything missing falls back to the ISO code
const NARROW_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"), ("CAD", "$"), ("AUD", "$"), ("NZD", "$"), ("HKD", "$"),
    ("SGD", "$"), ("TWD", "$"), ("MXN", "$"), ("ARS", "$"), ("CLP", "$"),
    ("COP", "$"), ("UYU", "$"), ("BRL", "R$"), ("EUR", "€"), ("GBP", "£"),
    ("JPY", "¥"), ("CNY", "¥"), ("KRW", "₩"), ("INR", "₹"), ("ILS", "₪"),
    ("VND", "₫"), ("NGN", "₦"), ("PHP", "₱"), ("UAH", "₴"), ("RUB", "₽"),
    ("TRY", "₺"), ("KZT", "₸"), ("GEL", "₾"), ("AZN", "₼"), ("PYG", "₲"),
    ("GHS", "GH₵"), ("EGP", "E£"), ("LBP", "L£"), ("ZAR", "R"), ("PLN", "zł"),
    ("SEK", "kr"), ("NOK", "kr"), ("DKK", "kr"), ("ISK", "kr"), ("CZK", "Kč"),
    ("HUF", "Ft"), ("RON", "lei"), ("MYR", "RM"), ("IDR", "Rp"), ("PKR", "Rs"),
    ("LKR", "Rs"), ("MMK", "K"), ("RWF", "RF"), ("BGN", "лв."), ("UZS", "сўм"),
    ("THB", "฿"), ("BDT", "৳"), ("AMD", "֏"),
];

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("currency code must be 3 ASCII letters, got '{0}'")]
    InvalidCode(String),
}

// ============================================================================
// CURRENCY
// ============================================================================

/// Anything that can render money for display
pub trait CurrencyFormat {
    fn symbol(&self) -> &str;

    /// Fraction digits shown (0 or 2)
    fn decimals(&self) -> u32;

    /// Grouped number without symbol, e.g. "1,234.50"
    fn format_amount(&self, value: Decimal) -> String {
        group_en_us(value, self.decimals())
    }

    /// Symbol and number, e.g. "$ 1,234.50"
    fn display(&self, value: Decimal) -> String {
        format!("{} {}", self.symbol(), self.format_amount(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub decimals: u32,
}

impl Currency {
    /// Accepts any 3-letter code; unknown codes render with the code as symbol
    pub fn parse(code: &str) -> Result<Self, CurrencyError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyError::InvalidCode(code.to_string()));
        }

        let code = code.to_ascii_uppercase();
        let decimals = if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) { 0 } else { 2 };

        Ok(Currency {
            symbol: narrow_symbol(&code),
            code,
            decimals,
        })
    }

    /// Human name when the code is in the common list
    pub fn name(&self) -> Option<&'static str> {
        COMMON_CURRENCIES
            .iter()
            .find(|(code, _)| *code == self.code)
            .map(|(_, name)| *name)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency {
            code: DEFAULT_CURRENCY.to_string(),
            symbol: "$".to_string(),
            decimals: 2,
        }
    }
}

impl CurrencyFormat for Currency {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u32 {
        self.decimals
    }
}

/// Currency for a country code; USD when unknown
pub fn currency_for_region(country: &str) -> &'static str {
    let country = country.trim().to_ascii_uppercase();
    REGION_CURRENCY
        .iter()
        .find(|(region, _)| *region == country)
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_CURRENCY)
}

/// Narrow symbol if it is Latin or a currency sign, else the code itself
fn narrow_symbol(code: &str) -> String {
    let symbol = NARROW_SYMBOLS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| *s)
        .unwrap_or(code);

    let displayable = symbol
        .chars()
        .all(|c| c <= '\u{024F}' || ('\u{20A0}'..='\u{20CF}').contains(&c));

    if displayable {
        symbol.to_string()
    } else {
        code.to_string()
    }
}

/// en-US grouping: "," every three integer digits, "." before the fraction
pub fn group_en_us(value: Decimal, decimals: u32) -> String {
    let rounded = round_to(value, decimals);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = to_fixed(rounded.abs(), decimals);

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

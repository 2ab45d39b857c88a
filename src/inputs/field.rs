//! Editable input fields and lenient numeric parsing

use std::fmt;
use std::str::FromStr;

/// The nine editable numeric inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    CustomerBase,
    MultiPurchaseRate,
    InactiveCustomersCount,
    Aov,
    PurchaseFrequency,
    Ltv,
    MultiPurchaseImprovement,
    ChurnReduction,
    PurchaseFreqImprovement,
}

impl InputField {
    pub const ALL: [InputField; 9] = [
        InputField::CustomerBase,
        InputField::MultiPurchaseRate,
        InputField::InactiveCustomersCount,
        InputField::Aov,
        InputField::PurchaseFrequency,
        InputField::Ltv,
        InputField::MultiPurchaseImprovement,
        InputField::ChurnReduction,
        InputField::PurchaseFreqImprovement,
    ];

    /// Wire key used in the save request and accepted by the shell
    pub fn key(self) -> &'static str {
        match self {
            InputField::CustomerBase => "customerBase",
            InputField::MultiPurchaseRate => "multiPurchaseRate",
            InputField::InactiveCustomersCount => "inactiveCustomersCount",
            InputField::Aov => "aov",
            InputField::PurchaseFrequency => "purchaseFrequency",
            InputField::Ltv => "ltv",
            InputField::MultiPurchaseImprovement => "multiPurchaseImprovement",
            InputField::ChurnReduction => "churnReduction",
            InputField::PurchaseFreqImprovement => "purchaseFreqImprovement",
        }
    }

    /// Human label, as used in the CSV export
    pub fn label(self) -> &'static str {
        match self {
            InputField::CustomerBase => "Customer Base",
            InputField::MultiPurchaseRate => "Multi-Purchase Rate (%)",
            InputField::InactiveCustomersCount => "Inactive Customers",
            InputField::Aov => "AOV",
            InputField::PurchaseFrequency => "Purchase Frequency",
            InputField::Ltv => "LTV",
            InputField::MultiPurchaseImprovement => "Multi-Purchase Rate Improvement (%)",
            InputField::ChurnReduction => "Churn Reduction (%)",
            InputField::PurchaseFreqImprovement => "Purchase Freq Improvement",
        }
    }

    /// Whole-number fields take only the integer prefix of their input
    pub fn is_integer(self) -> bool {
        matches!(self, InputField::CustomerBase | InputField::InactiveCustomersCount)
    }

    /// Parse raw text for this field. Unparseable or non-finite text yields 0.
    pub fn parse(self, raw: &str) -> f64 {
        let parsed = if self.is_integer() {
            parse_leading_integer(raw)
        } else {
            parse_leading_float(raw)
        };
        parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for InputField {
    type Err = String;

    /// Accepts the wire key in any case, with or without `_`/`-` separators
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        InputField::ALL
            .iter()
            .copied()
            .find(|f| f.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Longest `[+-]digits` prefix after leading whitespace. Parsed as a float so
/// values beyond `i64` keep their magnitude for the caller to saturate.
fn parse_leading_integer(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let sign = sign_len(s);
    let digits = digits_len(&s[sign..]);
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse::<f64>().ok()
}

/// Longest decimal prefix (`[+-]digits[.digits][e[+-]digits]`) after leading whitespace
fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = sign_len(s);

    let int_digits = digits_len(&s[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_len(&s[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let exp_start = end + 1;
        let exp_sign = sign_len(&s[exp_start..]);
        let exp_digits = digits_len(&s[exp_start + exp_sign..]);
        if exp_digits > 0 {
            end = exp_start + exp_sign + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn sign_len(s: &str) -> usize {
    usize::from(s.starts_with('+') || s.starts_with('-'))
}

fn digits_len(s: &str) -> usize {
    s.bytes().take_while(|b| b.is_ascii_digit()).count()
}

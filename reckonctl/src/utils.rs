use anyhow::{anyhow, Result};

use reckon::{Currency, Decimal};

pub fn confirm() -> Result<bool> {
    println!("Do you really want to do that?");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(input.trim() == "yes")
}

pub fn parse_currency(code: &str) -> Result<Currency> {
    Currency::from_code(code.to_uppercase().as_str())
        .ok_or_else(|| anyhow!("Unknown currency: {code}"))
}

/// Currency code followed by the amount at cent precision
pub fn format_amount(currency: Currency, value: Decimal) -> String {
    format!("{} {:.2}", currency.code(), value.round_dp(2))
}

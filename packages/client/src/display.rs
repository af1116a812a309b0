use sdk::cosmwasm_std::{Coin, Uint128};

/// Render `amount` of the smallest unit with `decimals` places as a decimal
/// number rounded half up to `precision` places
pub fn format_amount(amount: Uint128, decimals: u32, precision: u32) -> String {
    let amount = amount.u128();

    let Some(unit) = 10u128.checked_pow(decimals) else {
        return amount.to_string();
    };

    if precision >= decimals {
        let fraction = amount % unit;
        let fraction = if decimals == 0 {
            String::new()
        } else {
            format!("{fraction:0>width$}", width = decimals as usize)
        };
        join(amount / unit, fraction, precision)
    } else {
        let divisor = 10u128.pow(decimals - precision);
        let scale = 10u128.pow(precision);
        let rounded = amount / divisor + u128::from(amount % divisor >= divisor.div_ceil(2));
        let fraction = if precision == 0 {
            String::new()
        } else {
            format!("{:0>width$}", rounded % scale, width = precision as usize)
        };
        join(rounded / scale, fraction, precision)
    }
}

pub fn format_coin(coin: &Coin, decimals: u32, precision: u32) -> String {
    format!(
        "{} {}",
        format_amount(coin.amount, decimals, precision),
        coin.denom
    )
}

fn join(whole: u128, mut fraction: String, precision: u32) -> String {
    if precision == 0 {
        whole.to_string()
    } else {
        let width = precision as usize;
        while fraction.len() < width {
            fraction.push('0');
        }
        format!("{whole}.{fraction}")
    }
}

//! Return volatility used for forecast bands and risk tiers

use statrs::statistics::Statistics;

/// Trading days per year
pub const TRADING_DAYS: f64 = 252.0;

/// Window of the rolling volatility behind the risk tier
pub const RISK_WINDOW: usize = 20;

/// Calculate returns from a price series
pub fn calculate_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return Vec::new();
    }

    prices.windows(2).map(|w| (w[1] / w[0]) - 1.0).collect()
}

/// Sample standard deviation of daily returns over the whole series.
///
/// NaN when there are fewer than two returns.
pub fn daily_volatility(prices: &[f64]) -> f64 {
    calculate_returns(prices).std_dev()
}

/// Annualize a daily return standard deviation, in percent
pub fn annualize_daily_volatility(daily_volatility: f64) -> f64 {
    daily_volatility * TRADING_DAYS.sqrt() * 100.0
}

/// Annualized volatility (percent) of the most recent `window` daily returns.
///
/// `None` until `window` returns exist.
pub fn recent_annualized_volatility(prices: &[f64], window: usize) -> Option<f64> {
    let returns = calculate_returns(prices);
    if window < 2 || returns.len() < window {
        return None;
    }

    let recent = &returns[returns.len() - window..];
    Some(annualize_daily_volatility(recent.std_dev()))
}

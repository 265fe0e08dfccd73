use jiff::SpanRelativeTo;
use myrmex_optimizer::solver::solver_params::DepositPolicy;

/// Accepts `30s`, `PT1M30S`, `1h 30m` or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(format!("Invalid duration `{input}`"))
}

pub fn parse_deposit_policy(input: &str) -> Result<DepositPolicy, String> {
    match input.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "all_ants" | "all" => Ok(DepositPolicy::AllAnts),
        "iteration_best" | "elitist" => Ok(DepositPolicy::IterationBest),
        "global_best" => Ok(DepositPolicy::GlobalBest),
        _ => Err(format!(
            "Invalid deposit policy `{input}`, expected one of all-ants, iteration-best, global-best"
        )),
    }
}

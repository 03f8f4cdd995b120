use crate::model::ForecastResult;

/// Render each entry as `HH:MM | <temp><symbol> | <Title Cased description>`.
pub fn format_forecast(result: &ForecastResult) -> Vec<String> {
    let symbol = result.units.symbol();

    result
        .entries
        .iter()
        .map(|e| {
            format!(
                "{} | {}{} | {}",
                e.time_of_day,
                e.temperature,
                symbol,
                title_case(&e.description)
            )
        })
        .collect()
}

/// Upper-case the first letter of each word and lower-case the rest.
/// A word starts after any non-alphabetic character.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }

    out
}

/// Whether a formatted line should be highlighted.
pub fn mentions_rain(line: &str) -> bool {
    line.to_lowercase().contains("rain")
}

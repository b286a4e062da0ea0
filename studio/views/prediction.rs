use netdeck::{PredictionResult, INPUT_SIZE};

use crate::render::html_escape;

const BAR_WIDTH: f64 = 260.0;

/// Renders the scores as bars, the predicted digit and, for dataset
/// samples, the expected digit.
pub fn prediction_result(result: &PredictionResult, expected: Option<u8>) -> String {
    let rows: String = result
        .scores
        .iter()
        .enumerate()
        .map(|(digit, &score)| {
            let width = (score.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH) as u32;
            let dim = if digit != result.prediction { " dim" } else { "" };
            format!(
                r#"<tr><td style="width:40px;font-weight:600">{}</td><td><div class="bar-wrap"><div class="bar-fill{}" style="width:{}px"></div></div></td><td class="prob-pct">{:.1}%</td></tr>"#,
                digit, dim, width, score
            )
        })
        .collect();

    let verdict = match expected {
        Some(label) if label as usize == result.prediction => {
            format!(r#"Expected: {} <span class="correct">correct</span>"#, label)
        }
        Some(label) => format!(r#"Expected: {} <span class="incorrect">incorrect</span>"#, label),
        None => String::new(),
    };

    format!(
        r#"<div class="result-card"><h2>Prediction</h2>
<div class="prediction-hero">{hero}</div>
<div class="prediction-sub">{verdict}</div>
<table class="prob-table"><tbody>{rows}</tbody></table></div>"#,
        hero = result.prediction,
        verdict = verdict,
        rows = rows,
    )
}

/// 28×28 preview of an input vector.
pub fn digit_preview(input: &[f64]) -> String {
    if input.len() != INPUT_SIZE {
        return String::new();
    }
    let cells: String = input
        .iter()
        .map(|v| {
            let shade = 255 - (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!(r#"<span style="background:rgb({0},{0},{0})"></span>"#, shade)
        })
        .collect();
    format!(r#"<div class="digit">{}</div>"#, cells)
}

pub fn error_html(msg: &str) -> String {
    format!(r#"<div class="result-card"><h2>Error</h2><div class="error-box">{}</div></div>"#, html_escape(msg))
}

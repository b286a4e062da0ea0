use std::io::Cursor;
use tiny_http::{Request, Response};

use log::{info, warn};
use rand::Rng;
use netdeck::{NetworkDetail, NetworkId, Prediction, Split, INPUT_SIZE};

use crate::render::{html_escape, render_page, Page};
use crate::state::SharedState;
use crate::util::form::{form_get, parse_form};
use crate::util::image::image_bytes_to_digit_input;
use crate::util::multipart::{extract_boundary, MultipartForm};
use crate::views::network::network_record;
use crate::views::prediction::{digit_preview, error_html, prediction_result};

/// What the user asked to predict.
#[derive(Debug, Clone, PartialEq)]
enum PredictInput {
    /// A dataset sample; `None` picks a random index.
    Sample { split: Split, index: Option<usize> },
    Values(Vec<f64>),
}

// ---------------------------------------------------------------------------
// GET /networks/:id
// ---------------------------------------------------------------------------

pub fn handle_get(id: NetworkId, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(build_detail_page(&state, id, ""))
}

// ---------------------------------------------------------------------------
// POST /networks/:id/predict
// ---------------------------------------------------------------------------

pub fn handle_predict(id: NetworkId, request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let mut body: Vec<u8> = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body) {
        warn!("could not read prediction form: {e}");
    }

    let result_html = match read_input(&content_type, &body) {
        Ok(input) => run_prediction(&state, id, input),
        Err(msg) => error_html(&msg),
    };
    crate::routes::html_response(build_detail_page(&state, id, &result_html))
}

fn read_input(content_type: &str, body: &[u8]) -> Result<PredictInput, String> {
    if content_type.starts_with("multipart/form-data") {
        let boundary = extract_boundary(content_type).ok_or("Invalid multipart request.")?;
        let form = MultipartForm::parse(body, &boundary);
        let bytes = form.file("image").ok_or("No image file was uploaded.")?;
        return image_bytes_to_digit_input(bytes)
            .map(PredictInput::Values)
            .map_err(|e| format!("Could not read image: {}", e));
    }

    let pairs = parse_form(&String::from_utf8_lossy(body));
    match form_get(&pairs, "source").unwrap_or("sample") {
        "values" => parse_input_values(form_get(&pairs, "values").unwrap_or("")).map(PredictInput::Values),
        _ => {
            let split = form_get(&pairs, "split")
                .unwrap_or("test")
                .parse::<Split>()
                .map_err(|e| e.to_string())?;
            let index = match form_get(&pairs, "index").map(str::trim).filter(|s| !s.is_empty()) {
                None => None,
                Some(raw) => Some(
                    raw.parse::<usize>()
                        .map_err(|_| format!("Sample index must be a whole number, got '{}'", raw))?,
                ),
            };
            Ok(PredictInput::Sample { split, index })
        }
    }
}

/// Parses pixel values separated by commas or whitespace.
fn parse_input_values(raw: &str) -> Result<Vec<f64>, String> {
    let values = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f64>().map_err(|_| format!("'{}' is not a number", t)))
        .collect::<Result<Vec<f64>, String>>()?;
    if values.len() != INPUT_SIZE {
        return Err(format!("Expected {} values, got {}", INPUT_SIZE, values.len()));
    }
    Ok(values)
}

fn run_prediction(state: &SharedState, id: NetworkId, input: PredictInput) -> String {
    let prediction = Prediction::new(state.repo.clone(), id);
    let outcome = match input {
        PredictInput::Sample { split, index } => {
            let index = index.unwrap_or_else(|| rand::thread_rng().gen_range(0..split.sample_count()));
            prediction
                .predict_sample(split, index)
                .map(|(sample, result)| {
                    let heading = format!("<h2>{} sample #{}</h2>", split, index);
                    (heading, sample.input, result, Some(sample.expected_output))
                })
        }
        PredictInput::Values(values) => prediction
            .predict(&values)
            .map(|result| ("<h2>Input</h2>".to_owned(), values, result, None)),
    };

    match outcome {
        Ok((heading, input, result, expected)) => {
            info!("network {id} predicted {}", result.prediction);
            format!(
                r#"<div class="columns"><div class="result-card">{}{}</div>{}</div>"#,
                heading,
                digit_preview(&input),
                prediction_result(&result, expected)
            )
        }
        Err(e) => error_html(&e.into_field_error("Failed to predict").error),
    }
}

// ---------------------------------------------------------------------------
// Page builder
// ---------------------------------------------------------------------------

fn build_detail_page(state: &SharedState, id: NetworkId, result_html: &str) -> String {
    let detail = NetworkDetail::new(state.repo.clone(), id);
    let snapshot = detail.snapshot();
    let flash = state.take_flash();

    let content = match &snapshot.network {
        Some(network) => format!(
            r#"<p><a href="/">&larr; All networks</a></p>
<div class="columns"><div>{record}</div><div>{forms}</div></div>
{result}"#,
            record = network_record(network),
            forms = predict_forms(id),
            result = result_html,
        ),
        None => format!(
            r#"<p><a href="/">&larr; All networks</a></p><div class="error-box">{}</div>"#,
            html_escape(snapshot.error.as_deref().unwrap_or("Network not found"))
        ),
    };

    render_page(Page::Details, &state.backend, flash.as_ref(), |html| {
        html.replace("{{CONTENT}}", &content)
    })
}

fn predict_forms(id: NetworkId) -> String {
    format!(
        r#"<div class="panel">
  <h2>Predict</h2>
  <form method="post" action="/networks/{id}/predict">
    <input type="hidden" name="source" value="sample">
    <label for="split">Dataset sample</label>
    <select id="split" name="split">
      <option value="test">test</option>
      <option value="train">train</option>
    </select>
    <label for="index">Index</label>
    <input type="number" id="index" name="index" min="0" placeholder="random">
    <div class="hint">Leave blank for a random sample.</div>
    <p><button class="btn btn-primary" type="submit">Predict sample</button></p>
  </form>
  <form method="post" action="/networks/{id}/predict">
    <input type="hidden" name="source" value="values">
    <label for="values">Input values</label>
    <textarea id="values" name="values" rows="3" placeholder="{size} comma-separated values in [0, 1]"></textarea>
    <p><button class="btn" type="submit">Predict values</button></p>
  </form>
  <form method="post" action="/networks/{id}/predict" enctype="multipart/form-data">
    <label for="image">Digit image</label>
    <input type="file" id="image" name="image" accept="image/*">
    <div class="hint">Resized to 28×28 grayscale.</div>
    <p><button class="btn" type="submit">Predict image</button></p>
  </form>
</div>"#,
        id = id,
        size = INPUT_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StudioState;
    use netdeck::InMemoryRepository;
    use std::sync::Arc;

    #[test]
    fn sample_form_defaults_to_a_random_test_sample() {
        let input = read_input("application/x-www-form-urlencoded", b"source=sample&split=test&index=").unwrap();
        assert_eq!(input, PredictInput::Sample { split: Split::Test, index: None });
        let input = read_input("", b"split=train&index=42").unwrap();
        assert_eq!(input, PredictInput::Sample { split: Split::Train, index: Some(42) });
        assert!(read_input("", b"index=-1").is_err());
    }

    #[test]
    fn values_must_fill_the_input_layer() {
        assert_eq!(parse_input_values("0.5, 1").unwrap_err(), "Expected 784 values, got 2");
        assert!(parse_input_values("a,b").is_err());
        let raw = vec!["0.25"; INPUT_SIZE].join(",");
        assert_eq!(parse_input_values(&raw).unwrap().len(), INPUT_SIZE);
    }

    #[test]
    fn multipart_without_a_file_is_reported() {
        let body = b"--B\r\nContent-Disposition: form-data; name=\"image\"; filename=\"\"\r\n\r\n\r\n--B--\r\n";
        assert_eq!(
            read_input("multipart/form-data; boundary=B", body).unwrap_err(),
            "No image file was uploaded."
        );
    }

    #[test]
    fn predicts_values_against_the_in_memory_backend() {
        let state = Arc::new(StudioState::new(Arc::new(InMemoryRepository::with_demo_networks()), "in-memory"));
        let html = run_prediction(&state, NetworkId(1), PredictInput::Values(vec![0.0; INPUT_SIZE]));
        assert!(html.contains("prediction-hero"));
    }

    #[test]
    fn unknown_network_shows_the_error() {
        let state = Arc::new(StudioState::new(Arc::new(InMemoryRepository::new()), "in-memory"));
        let html = build_detail_page(&state, NetworkId(5), "");
        assert!(html.contains("Network not found"));
        assert!(!html.contains("Predict sample"));
    }
}

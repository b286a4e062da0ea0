use netdeck::{NetworkDetails, NetworkSummary};

use crate::render::html_escape;

pub fn shape_label(layer_sizes: &[usize]) -> String {
    layer_sizes.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ")
}

pub fn cost_label(cost: Option<f64>) -> String {
    cost.map(|c| format!("{:.4}", c)).unwrap_or_else(|| "n/a".to_owned())
}

/// Card shown for each network on the list page.
pub fn network_card(network: &NetworkSummary) -> String {
    format!(
        r#"<div class="card">
  <h3>{name}</h3>
  <dl>
    <dt>Shape</dt><dd>{shape}</dd>
    <dt>Training epochs</dt><dd>{epochs}</dd>
    <dt>Correct predictions</dt><dd>{correct}</dd>
    <dt>Cost</dt><dd>{cost}</dd>
  </dl>
  <div class="actions">
    <a class="btn" href="/networks/{id}">View</a>
    <a class="btn btn-danger" href="/?delete={id}">Delete</a>
  </div>
</div>"#,
        name    = html_escape(&network.name),
        shape   = shape_label(&network.layer_sizes),
        epochs  = network.training_epochs,
        correct = network.correct_predictions,
        cost    = cost_label(network.cost),
        id      = network.id,
    )
}

/// Full record table for the detail page.
pub fn network_record(network: &NetworkDetails) -> String {
    let summary = &network.summary;
    let activations = network
        .activations
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"<div class="panel">
  <h1>{name}</h1>
  <table class="record">
    <tr><th>Id</th><td>{id}</td></tr>
    <tr><th>Created</th><td>{created}</td></tr>
    <tr><th>Shape</th><td>{shape}</td></tr>
    <tr><th>Activations</th><td>{activations}</td></tr>
    <tr><th>Training epochs</th><td>{epochs}</td></tr>
    <tr><th>Correct predictions</th><td>{correct}</td></tr>
    <tr><th>Cost</th><td>{cost}</td></tr>
  </table>
</div>"#,
        name        = html_escape(&summary.name),
        id          = summary.id,
        created     = html_escape(&network.created_at),
        shape       = shape_label(&summary.layer_sizes),
        activations = if activations.is_empty() { "n/a".to_owned() } else { activations },
        epochs      = summary.training_epochs,
        correct     = summary.correct_predictions,
        cost        = cost_label(summary.cost),
    )
}

use netdeck::shape::{ACTIVATIONS_FIELD, NAME_FIELD, SHAPE_FIELD};
use netdeck::{FieldError, NetworkSummary};

use crate::render::html_escape;

/// Raw values of the create form, echoed back when validation fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateForm {
    pub name: String,
    pub shape: String,
    pub activations: String,
}

pub fn create_modal(form: &CreateForm, errors: &[FieldError]) -> String {
    let error_for = |field: &str| -> String {
        errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| format!(r#"<div class="field-error">{}</div>"#, html_escape(&e.error)))
            .collect()
    };
    // Errors on fields the form does not show, e.g. a transport failure.
    let general: String = errors
        .iter()
        .filter(|e| ![NAME_FIELD, SHAPE_FIELD, ACTIVATIONS_FIELD].contains(&e.field.as_str()))
        .map(|e| format!(r#"<div class="error-box">{}</div>"#, html_escape(&e.error)))
        .collect();

    format!(
        r#"<div class="modal-backdrop">
<form class="modal" method="post" action="/networks">
  <h2>Create Network</h2>
  {general}
  <label for="name">Name</label>
  <input type="text" id="name" name="name" value="{name}" autofocus>
  {name_err}
  <label for="shape">Shape</label>
  <input type="text" id="shape" name="shape" value="{shape}" placeholder="784,16,10">
  <div class="hint">Comma-separated layer sizes; 784 inputs and 10 outputs.</div>
  {shape_err}
  <label for="activations">Activations</label>
  <input type="text" id="activations" name="activations" value="{activations}" placeholder="relu,sigmoid">
  <div class="hint">One of relu, sigmoid or none per weight layer. Leave blank for relu with a sigmoid output.</div>
  {activations_err}
  <div class="buttons">
    <a class="btn" href="/">Cancel</a>
    <button class="btn btn-primary" type="submit">Create</button>
  </div>
</form>
</div>"#,
        general         = general,
        name            = html_escape(&form.name),
        name_err        = error_for(NAME_FIELD),
        shape           = html_escape(&form.shape),
        shape_err       = error_for(SHAPE_FIELD),
        activations     = html_escape(&form.activations),
        activations_err = error_for(ACTIVATIONS_FIELD),
    )
}

/// Asks for an explicit confirmation before the delete is posted.
pub fn delete_confirm_modal(network: &NetworkSummary) -> String {
    format!(
        r#"<div class="modal-backdrop">
<form class="modal" method="post" action="/networks/{id}/delete">
  <h2>Delete Network</h2>
  <p>Delete <strong>{name}</strong>? This cannot be undone.</p>
  <div class="buttons">
    <a class="btn" href="/">Cancel</a>
    <button class="btn btn-danger" type="submit">Delete</button>
  </div>
</form>
</div>"#,
        id   = network.id,
        name = html_escape(&network.name),
    )
}

use std::io::Cursor;
use tiny_http::{Request, Response};

use log::{info, warn};
use netdeck::shape::validate_new_network;
use netdeck::{FieldError, NetworkId};

use crate::render::{html_escape, render_page, Page};
use crate::state::{FlashMessage, SharedState};
use crate::util::form::{form_get, parse_form};
use crate::views::modals::{create_modal, delete_confirm_modal, CreateForm};
use crate::views::network::network_card;

// ---------------------------------------------------------------------------
// GET /   (?modal=create  |  ?delete=ID)
// ---------------------------------------------------------------------------

pub fn handle_list(query: &str, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    // The failure is kept in the list snapshot and rendered below.
    let _ = state.networks.fetch();

    let q_pairs = parse_form(query);
    let modal = if form_get(&q_pairs, "modal") == Some("create") {
        create_modal(&CreateForm::default(), &[])
    } else if let Some(raw) = form_get(&q_pairs, "delete") {
        match raw.parse::<NetworkId>().ok().and_then(|id| state.networks.find(id)) {
            Some(network) => delete_confirm_modal(&network),
            None => {
                state.set_flash(FlashMessage::error("Network not found"));
                String::new()
            }
        }
    } else {
        String::new()
    };

    crate::routes::html_response(build_list_page(&state, &modal))
}

// ---------------------------------------------------------------------------
// POST /networks
// ---------------------------------------------------------------------------

pub fn handle_create(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    if let Err(e) = request.as_reader().read_to_string(&mut body) {
        warn!("could not read create form: {e}");
    }
    let pairs = parse_form(&body);
    let form = CreateForm {
        name:        form_get(&pairs, "name").unwrap_or("").to_owned(),
        shape:       form_get(&pairs, "shape").unwrap_or("").to_owned(),
        activations: form_get(&pairs, "activations").unwrap_or("").to_owned(),
    };

    let network = match validate_new_network(&form.name, &form.shape, &form.activations) {
        Ok(network) => network,
        Err(errors) => return form_with_errors(&state, &form, &errors),
    };

    match state.networks.add(&network.name, network.layer_sizes, network.activations) {
        Ok(()) => {
            info!("created network '{}'", network.name);
            state.set_flash(FlashMessage::success(format!("Network '{}' created.", network.name)));
            crate::routes::redirect("/")
        }
        Err(error) => form_with_errors(&state, &form, &[error]),
    }
}

fn form_with_errors(
    state: &SharedState,
    form: &CreateForm,
    errors: &[FieldError],
) -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(build_list_page(state, &create_modal(form, errors)))
}

// ---------------------------------------------------------------------------
// POST /networks/:id/delete
// ---------------------------------------------------------------------------

pub fn handle_delete(id: NetworkId, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let label = state
        .networks
        .find(id)
        .map(|n| n.name)
        .unwrap_or_else(|| format!("#{}", id));

    match state.networks.delete(id) {
        Ok(()) => {
            info!("deleted network {id}");
            state.set_flash(FlashMessage::success(format!("Network '{}' deleted.", label)));
        }
        Err(error) => state.set_flash(FlashMessage::error(error.error)),
    }
    crate::routes::redirect("/")
}

// ---------------------------------------------------------------------------
// Page builder
// ---------------------------------------------------------------------------

fn build_list_page(state: &SharedState, modal: &str) -> String {
    let snapshot = state.networks.snapshot();
    let flash = state.take_flash();

    let mut content = String::from(
        r#"<div class="toolbar"><h1>Networks</h1><a class="btn btn-primary" href="/?modal=create">Create Network</a></div>"#,
    );
    if snapshot.status.is_loading() {
        content.push_str(r#"<div class="notice">Loading networks…</div>"#);
    }
    if let Some(error) = &snapshot.error {
        content.push_str(&format!(r#"<div class="flash flash-error">{}</div>"#, html_escape(&error.error)));
    }
    if snapshot.networks.is_empty() {
        content.push_str(r#"<div class="notice">No networks yet.</div>"#);
    } else {
        let cards: String = snapshot.networks.iter().map(network_card).collect();
        content.push_str(&format!(r#"<div class="grid">{}</div>"#, cards));
    }

    render_page(Page::Networks, &state.backend, flash.as_ref(), |html| {
        html.replace("{{MODAL}}", modal).replace("{{CONTENT}}", &content)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StudioState;
    use netdeck::shape::{NAME_FIELD, SHAPE_FIELD};
    use netdeck::{Activation, InMemoryRepository, NetworkRepository, NewNetwork};
    use std::sync::Arc;
    use tiny_http::{Method, TestRequest};

    fn demo_state() -> SharedState {
        let state = Arc::new(StudioState::new(Arc::new(InMemoryRepository::with_demo_networks()), "in-memory"));
        state.networks.fetch().unwrap();
        state
    }

    #[test]
    fn list_page_has_a_card_per_network() {
        let state = demo_state();
        let html = build_list_page(&state, "");
        assert_eq!(html.matches(r#"<div class="card">"#).count(), 10);
        assert!(html.contains("Demo 1"));
    }

    #[test]
    fn deleting_redirects_with_a_flash() {
        let state = demo_state();
        let response = handle_delete(NetworkId(1), state.clone());
        assert_eq!(response.status_code().0, 303);
        assert!(state.networks.find(NetworkId(1)).is_none());
        let flash = state.take_flash().unwrap();
        assert_eq!(flash.text, "Network 'Demo 1' deleted.");
    }

    fn post_create(state: &SharedState, body: &'static str) -> (u16, String) {
        let mut request: Request = TestRequest::new()
            .with_method(Method::Post)
            .with_path("/networks")
            .with_body(body)
            .into();
        let response = handle_create(&mut request, state.clone());
        let status = response.status_code().0;
        let html = String::from_utf8(response.into_reader().into_inner()).unwrap();
        (status, html)
    }

    fn field_error_after(html: &str, input_id: &str, message: &str) -> bool {
        match (html.find(&format!(r#"id="{}""#, input_id)), html.find(message)) {
            (Some(input), Some(error)) => input < error,
            _ => false,
        }
    }

    #[test]
    fn create_redirects_and_lists_the_new_network() {
        let state = demo_state();
        let (status, _) = post_create(&state, "name=Net+A&shape=784%2C16%2C10&activations=");
        assert_eq!(status, 303);
        let created = state.networks.snapshot().networks.into_iter().find(|n| n.name == "Net A").unwrap();
        assert_eq!(created.layer_sizes, vec![784, 16, 10]);
        assert_eq!(state.take_flash().unwrap().text, "Network 'Net A' created.");
    }

    #[test]
    fn duplicate_name_is_shown_on_the_name_field() {
        let state = demo_state();
        let (status, html) = post_create(&state, "name=Demo+3&shape=784,16,10");
        assert_eq!(status, 200);
        assert!(html.contains(r#"value="Demo 3""#));
        assert!(field_error_after(&html, NAME_FIELD, "Network with this name already exists"));
        assert_eq!(state.networks.snapshot().networks.len(), 10);
    }

    #[test]
    fn bad_shape_never_reaches_the_repository() {
        let state = demo_state();
        let (status, html) = post_create(&state, "name=Net+B&shape=784,16,9");
        assert_eq!(status, 200);
        assert!(field_error_after(&html, SHAPE_FIELD, "Output layer must have 10 neurons"));
        assert!(state.networks.snapshot().networks.iter().all(|n| n.name != "Net B"));
        assert!(state.take_flash().is_none());
    }

    #[test]
    fn braces_in_names_are_rendered_literally() {
        let repo = Arc::new(InMemoryRepository::new());
        for name in ["Alpha {{v1", "Beta}} net", "{{MODAL}}"] {
            let network = NewNetwork {
                name: name.into(),
                layer_sizes: vec![784, 10],
                activations: vec![Activation::Sigmoid],
            };
            repo.create_network(&network).unwrap();
        }
        let state = Arc::new(StudioState::new(repo, "in-memory"));
        state.networks.fetch().unwrap();

        let html = build_list_page(&state, &delete_confirm_modal(&state.networks.snapshot().networks[0]));
        assert_eq!(html.matches(r#"<div class="card">"#).count(), 3);
        assert!(html.contains("Alpha &#123;&#123;v1"));
        assert!(html.contains("Beta&#125;&#125; net"));
        assert!(html.contains("&#123;&#123;MODAL&#125;&#125;"));
        assert_eq!(html.matches(r#"class="modal-backdrop""#).count(), 1);
    }
}

use crate::activation::Activation;
use crate::api::error::FieldError;
use crate::api::types::{NewNetwork, INPUT_SIZE, OUTPUT_SIZE};

pub const SHAPE_FIELD: &str = "shape";
pub const NAME_FIELD: &str = "name";
pub const ACTIVATIONS_FIELD: &str = "activations";

/// Parses a comma-separated list of layer sizes such as `"784, 16, 10"`.
///
/// Every token is trimmed and must parse as a non-negative integer; an empty
/// or whitespace-only input is rejected.
pub fn parse_shape(input: &str) -> Result<Vec<usize>, FieldError> {
    if input.trim().is_empty() {
        return Err(FieldError::new(SHAPE_FIELD, "Shape cannot be empty"));
    }
    input
        .split(',')
        .map(|token| token.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| {
            FieldError::new(SHAPE_FIELD, "Shape must be a comma-separated list of positive integers")
        })
}

/// Checks the fixed input/output dimensions and that no layer is empty.
pub fn validate_layers(layers: &[usize]) -> Result<(), FieldError> {
    if layers.len() < 2 {
        return Err(FieldError::new(SHAPE_FIELD, "Network must have at least 2 layers"));
    }
    if layers[0] != INPUT_SIZE {
        return Err(FieldError::new(
            SHAPE_FIELD,
            format!("Input layer must have {INPUT_SIZE} neurons"),
        ));
    }
    if layers[layers.len() - 1] != OUTPUT_SIZE {
        return Err(FieldError::new(
            SHAPE_FIELD,
            format!("Output layer must have {OUTPUT_SIZE} neurons"),
        ));
    }
    if layers.contains(&0) {
        return Err(FieldError::new(SHAPE_FIELD, "Layer sizes must be positive integers"));
    }
    Ok(())
}

/// Returns the trimmed name, or an error when nothing is left.
pub fn validate_name(input: &str) -> Result<String, FieldError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(FieldError::new(NAME_FIELD, "Name cannot be empty"));
    }
    Ok(name.to_owned())
}

/// Parses a comma-separated activation list for a network with
/// `layer_count` layers. A blank input selects [`Activation::defaults_for`].
pub fn parse_activations(input: &str, layer_count: usize) -> Result<Vec<Activation>, FieldError> {
    if input.trim().is_empty() {
        return Ok(Activation::defaults_for(layer_count));
    }
    let activations = input
        .split(',')
        .map(|token| token.parse::<Activation>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FieldError::new(ACTIVATIONS_FIELD, format!("Invalid activation functions: {e}")))?;
    validate_activation_count(&activations, layer_count)?;
    Ok(activations)
}

pub fn validate_activation_count(activations: &[Activation], layer_count: usize) -> Result<(), FieldError> {
    let expected = layer_count.saturating_sub(1);
    if activations.len() != expected {
        return Err(FieldError::new(
            ACTIVATIONS_FIELD,
            format!("Expected {expected} activations (one per weight layer), got {}", activations.len()),
        ));
    }
    Ok(())
}

/// Validates the create form as a whole and reports every failing field.
///
/// Activations are only checked once the shape is known to be valid, since
/// their expected count depends on it.
pub fn validate_new_network(
    name: &str,
    shape: &str,
    activations: &str,
) -> Result<NewNetwork, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = validate_name(name).map_err(|e| errors.push(e)).ok();
    let layer_sizes = parse_shape(shape)
        .and_then(|layers| validate_layers(&layers).map(|_| layers))
        .map_err(|e| errors.push(e))
        .ok();
    let activations = layer_sizes.as_ref().and_then(|layers| {
        parse_activations(activations, layers.len()).map_err(|e| errors.push(e)).ok()
    });

    match (name, layer_sizes, activations) {
        (Some(name), Some(layer_sizes), Some(activations)) if errors.is_empty() => {
            Ok(NewNetwork { name, layer_sizes, activations })
        }
        _ => Err(errors),
    }
}

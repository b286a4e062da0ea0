pub mod validate;

pub use validate::{
    parse_activations, parse_shape, validate_activation_count, validate_layers, validate_name,
    validate_new_network, ACTIVATIONS_FIELD, NAME_FIELD, SHAPE_FIELD,
};

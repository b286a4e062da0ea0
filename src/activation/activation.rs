use serde::{Deserialize, Serialize};
use std::f64::consts::E;
use std::fmt;
use std::str::FromStr;

/// Activation applied after each weight layer of a network.
///
/// Serialized with the lower-case names the backend understands
/// (`"relu"`, `"sigmoid"`, `"none"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    /// Identity; the layer output is the raw weighted sum.
    None,
}

impl Activation {
    /// Element-wise activation.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => if x > 0.0 { x } else { 0.0 },
            Activation::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            Activation::None => x,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::None => "none",
        }
    }

    /// Activations used when the user leaves the field blank: ReLU on every
    /// hidden layer and a sigmoid on the output layer.
    pub fn defaults_for(layer_count: usize) -> Vec<Activation> {
        let weight_layers = layer_count.saturating_sub(1);
        (0..weight_layers)
            .map(|i| if i + 1 == weight_layers { Activation::Sigmoid } else { Activation::Relu })
            .collect()
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(Activation::Relu),
            "sigmoid" => Ok(Activation::Sigmoid),
            "none" => Ok(Activation::None),
            other => Err(format!("unknown activation '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_sigmoid_on_the_output_layer() {
        assert_eq!(
            Activation::defaults_for(4),
            vec![Activation::Relu, Activation::Relu, Activation::Sigmoid]
        );
        assert_eq!(Activation::defaults_for(2), vec![Activation::Sigmoid]);
        assert!(Activation::defaults_for(1).is_empty());
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(" ReLU ".parse::<Activation>(), Ok(Activation::Relu));
        assert_eq!("none".parse::<Activation>(), Ok(Activation::None));
        assert!("softmax".parse::<Activation>().is_err());
    }

    #[test]
    fn serializes_with_backend_names() {
        let json = serde_json::to_string(&vec![Activation::Relu, Activation::None]).unwrap();
        assert_eq!(json, r#"["relu","none"]"#);
    }

    #[test]
    fn element_wise_functions() {
        assert_eq!(Activation::Relu.function(-2.0), 0.0);
        assert_eq!(Activation::None.function(-2.0), -2.0);
        assert!((Activation::Sigmoid.function(0.0) - 0.5).abs() < 1e-12);
    }
}

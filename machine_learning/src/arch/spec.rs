use serde::{Deserialize, Serialize};

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Sigmoid { amp: f32 },
    Relu,
    Tanh,
}

/// The specification for the `Layer` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        dim: (usize, usize),
        act_fn: Option<ActFnSpec>,
    },
}

/// The specification for a whole network, stored next to its weights in a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Sequential { layers: Vec<LayerSpec> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_spec_json_layout() {
        let spec = ModelSpec::Sequential {
            layers: vec![
                LayerSpec::Dense {
                    dim: (4, 2),
                    act_fn: Some(ActFnSpec::Relu),
                },
                LayerSpec::Dense {
                    dim: (2, 1),
                    act_fn: None,
                },
            ],
        };

        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            json,
            r#"{"sequential":{"layers":[{"dense":{"dim":[4,2],"act_fn":"relu"}},{"dense":{"dim":[2,1],"act_fn":null}}]}}"#
        );

        let back: ModelSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}

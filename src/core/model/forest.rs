//! 다중 출력 결정 트리 앙상블 (랜덤 포레스트 형식)
//!
//! 각 리프가 9개 출력을 함께 저장하므로 한 번의 순회로 모든 물성을 얻는다.
//! 분기 규칙은 `x[feature] <= threshold` 이면 왼쪽.
//!
//! scikit-learn 트리는 입력을 float32로 변환한 뒤 f64 임계값과 비교한다.
//! 그런 모델을 내보낼 때는 `cast_features_f32: true`로 두어야 임계값에 걸친 입력이 같은 쪽으로 간다.
//! 기본값은 f64 그대로 비교.

use super::MultiOutputRegressor;
use crate::core::error::ArtifactError;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeParams {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// 루트는 0번, 자식 인덱스는 항상 부모보다 큼
    pub nodes: Vec<NodeParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub trees: Vec<TreeParams>,
    /// 비교 전에 특징을 f32로 반올림
    #[serde(default)]
    pub cast_features_f32: bool,
}

impl ForestParams {
    pub fn new(trees: Vec<TreeParams>) -> Self {
        Self {
            trees,
            cast_features_f32: false,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(Array1<f64>),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf(&self, x: &ArrayView1<'_, f64>, cast_f32: bool) -> &Array1<f64> {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = if cast_f32 {
                        f64::from(x[*feature] as f32)
                    } else {
                        x[*feature]
                    };
                    idx = if value <= *threshold { *left } else { *right };
                }
                Node::Leaf(value) => return value,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForestModel {
    trees: Vec<Tree>,
    input_width: usize,
    output_width: usize,
    cast_features_f32: bool,
}

impl ForestModel {
    pub fn from_params(
        params: ForestParams,
        input_width: usize,
        output_width: usize,
    ) -> Result<Self, ArtifactError> {
        if params.trees.is_empty() {
            return Err(ArtifactError::invalid("forest", "no trees"));
        }

        let trees = params
            .trees
            .into_iter()
            .enumerate()
            .map(|(t, tree)| Self::build_tree(t, tree, input_width, output_width))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            input_width,
            output_width,
            cast_features_f32: params.cast_features_f32,
        })
    }

    fn build_tree(
        t: usize,
        tree: TreeParams,
        input_width: usize,
        output_width: usize,
    ) -> Result<Tree, ArtifactError> {
        let what = || format!("forest tree {t}");
        let len = tree.nodes.len();
        if len == 0 {
            return Err(ArtifactError::invalid(what(), "empty tree"));
        }

        let mut nodes = Vec::with_capacity(len);
        for (idx, node) in tree.nodes.into_iter().enumerate() {
            let node = match node {
                NodeParams::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= input_width {
                        return Err(ArtifactError::invalid(
                            what(),
                            format!("node {idx} splits on feature {feature}, input width is {input_width}"),
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(ArtifactError::invalid(what(), format!("node {idx} threshold is not finite")));
                    }
                    // 자식이 항상 뒤에 있어야 순회가 종료됨
                    for child in [left, right] {
                        if child <= idx || child >= len {
                            return Err(ArtifactError::invalid(
                                what(),
                                format!("node {idx} has invalid child {child}"),
                            ));
                        }
                    }
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    }
                }
                NodeParams::Leaf { value } => {
                    if value.len() != output_width {
                        return Err(ArtifactError::invalid(
                            what(),
                            format!("leaf {idx} has {} outputs, expected {output_width}", value.len()),
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite()) {
                        return Err(ArtifactError::invalid(what(), format!("leaf {idx} is not finite")));
                    }
                    Node::Leaf(Array1::from(value))
                }
            };
            nodes.push(node);
        }

        Ok(Tree { nodes })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl MultiOutputRegressor for ForestModel {
    fn kind(&self) -> &'static str {
        "forest"
    }

    fn input_width(&self) -> usize {
        self.input_width
    }

    fn output_width(&self) -> usize {
        self.output_width
    }

    fn forward(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut sum = Array1::<f64>::zeros(self.output_width);
        for tree in &self.trees {
            sum += tree.leaf(&x, self.cast_features_f32);
        }
        sum / self.trees.len() as f64
    }
}

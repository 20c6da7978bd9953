use super::{TraitLayer, split_rank4};
use crate::nn::{LayerTypeDescriptor, NetworkError, ParamStore};
use crate::tensor::Tensor;

/// Leaky ReLU 激活层
///
/// forward: f(x) = x if x > 0, else negative_slope * x
///
/// 当 negative_slope = 0 时，等价于标准 ReLU；为 1 时等价于恒等映射
#[derive(Debug, Clone, PartialEq)]
pub struct LeakyReLU {
    name: String,
    /// 负半轴斜率
    negative_slope: f32,
}

impl LeakyReLU {
    pub fn new(name: &str, negative_slope: f32) -> Result<Self, NetworkError> {
        if !negative_slope.is_finite() || negative_slope < 0.0 {
            return Err(NetworkError::InvalidArchitecture(format!(
                "{name}的negative_slope应为非负有限数，但得到: {negative_slope}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            negative_slope,
        })
    }

    pub fn negative_slope(&self) -> f32 {
        self.negative_slope
    }
}

impl TraitLayer for LeakyReLU {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NetworkError> {
        split_rank4(input_shape, &self.name)?;
        Ok(input_shape.to_vec())
    }

    fn forward(&self, input: &Tensor, _params: &ParamStore) -> Result<Tensor, NetworkError> {
        self.output_shape(input.shape())?;
        let slope = self.negative_slope;
        Ok(input.where_with_f32(
            |x| x > 0.0,
            |x| x,         // x > 0 时保持原值
            |x| slope * x, // x <= 0 时乘以 slope
        ))
    }

    fn type_descriptor(&self) -> LayerTypeDescriptor {
        LayerTypeDescriptor::LeakyReLU {
            negative_slope: self.negative_slope,
        }
    }
}

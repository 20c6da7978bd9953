/*
 * @Description  : 参数初始化策略
 *
 * 卷积核形状为 [C_out, C_in, kH, kW]：
 * - fan_in  = C_in * kH * kW
 * - fan_out = C_out * kH * kW
 */

use crate::tensor::Tensor;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// 参数初始化策略
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Init {
    /// 常数初始化
    Constant { value: f32 },
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// Kaiming/He 初始化（适用于 `ReLU` 系激活），`std = sqrt(2 / fan_in)`
    #[default]
    Kaiming,
    /// Xavier/Glorot 初始化，`std = sqrt(2 / (fan_in + fan_out))`
    Xavier,
}

impl Init {
    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant { value } => Tensor::full(*value, shape),
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
            Self::Kaiming => {
                let (fan_in, _) = fans(shape);
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
            Self::Xavier => {
                let (fan_in, fan_out) = fans(shape);
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
        }
    }
}

/// 计算 (fan_in, fan_out)；空形状按 1 处理
fn fans(shape: &[usize]) -> (usize, usize) {
    match shape {
        [] => (1, 1),
        [n] => (*n, *n),
        [out, inp, rest @ ..] => {
            let receptive = rest.iter().product::<usize>();
            ((inp * receptive).max(1), (out * receptive).max(1))
        }
    }
}

/*
 * @Description  : 张量（Tensor）：网络中流动的唯一数据载体，底层为 ndarray 的动态维度数组
 *
 * 约定：
 * - 网络中的张量一律为 4 阶 [batch, channel, row, column]（Batch-First）
 * - 所有构造函数都产生标准（行优先、连续）内存布局，卷积等内核可直接按平坦切片访问
 */

use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;

use crate::errors::TensorError;

mod batch;
mod filter;
mod image;
mod index;
mod property;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量。
    /// 若为标量，`shape`可以是[]、[1]、[1,1]...；
    /// 若为网络输入/输出，`shape`为[batch, channel, H, W]。
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        Self::from_vec(data.to_vec(), shape)
    }

    /// 与`new`相同，但直接接管`data`的所有权，避免一次拷贝
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Tensor {
        let data_len = data.len();
        let data = Array::from_shape_vec(IxDyn(shape), data).unwrap_or_else(|_| {
            panic!(
                "{}",
                TensorError::DataShapeMismatch {
                    data_len,
                    shape: shape.to_vec(),
                }
            )
        });
        Tensor { data }
    }

    /// 创建一个所有元素都为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    pub fn zeros(shape: &[usize]) -> Tensor {
        Self::full(0.0, shape)
    }

    pub fn ones(shape: &[usize]) -> Tensor {
        Self::full(1.0, shape)
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间（使用指定的 RNG，便于复现）
    pub fn uniform_with_rng(min: f32, max: f32, shape: &[usize], rng: &mut StdRng) -> Tensor {
        let dist = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| dist.sample(rng))
            .collect::<Vec<_>>();
        Tensor::from_vec(data, shape)
    }

    /// 创建一个服从正态分布的随机张量（Box-Muller 变换，使用指定的 RNG）
    pub fn normal_with_rng(mean: f32, std_dev: f32, shape: &[usize], rng: &mut StdRng) -> Tensor {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            // u1 取不到 0，避免 ln(0)
            let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
            let u2: f32 = rng.gen_range(0.0..1.0);
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor::from_vec(data, shape)
    }
}

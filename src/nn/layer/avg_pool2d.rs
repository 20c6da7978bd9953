/*
 * @Description  : AvgPool2d (2D 平均池化) 层
 *
 * - 输入格式：[batch_size, channels, H, W]
 * - 输出格式：[batch_size, channels, H', W']
 * - 无可学习参数
 *
 * 输出尺寸计算：
 * H' = (H - kernel_h) / stride_h + 1
 * W' = (W - kernel_w) / stride_w + 1
 *
 * 与 PyTorch 的 nn.AvgPool2d 不同，这里要求窗口恰好铺满输入（不允许向下取整丢弃边缘），
 * 从而保证 2×2 下采样严格把尺寸减半。
 */

use super::{TraitLayer, split_rank4};
use crate::nn::{LayerTypeDescriptor, NetworkError, ParamStore};
use crate::tensor::Tensor;
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct AvgPool2d {
    name: String,
    /// 池化窗口大小 (kH, kW)
    kernel_size: (usize, usize),
    /// 步长 (sH, sW)
    stride: (usize, usize),
}

impl AvgPool2d {
    /// 创建 AvgPool2d 层
    ///
    /// # 参数
    /// - `kernel_size`: 池化窗口大小 (kH, kW)
    /// - `stride`: 步长 (sH, sW)，若为 None 则默认等于 kernel_size
    pub fn new(
        name: &str,
        kernel_size: (usize, usize),
        stride: Option<(usize, usize)>,
    ) -> Result<Self, NetworkError> {
        let stride = stride.unwrap_or(kernel_size);
        if kernel_size.0 == 0 || kernel_size.1 == 0 || stride.0 == 0 || stride.1 == 0 {
            return Err(NetworkError::InvalidArchitecture(format!(
                "{name}的池化窗口与步长须大于0，得到窗口 {kernel_size:?}，步长 {stride:?}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            kernel_size,
            stride,
        })
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub fn stride(&self) -> (usize, usize) {
        self.stride
    }
}

impl TraitLayer for AvgPool2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NetworkError> {
        let (batch_size, c, h, w) = split_rank4(input_shape, &self.name)?;
        let (k_h, k_w) = self.kernel_size;
        let (s_h, s_w) = self.stride;
        if h < k_h || w < k_w || (h - k_h) % s_h != 0 || (w - k_w) % s_w != 0 {
            return Err(NetworkError::InvalidArchitecture(format!(
                "{}的池化窗口 {k_h}x{k_w}（步长 {s_h}x{s_w}）无法恰好铺满 {h}x{w} 的输入",
                self.name
            )));
        }
        Ok(vec![batch_size, c, (h - k_h) / s_h + 1, (w - k_w) / s_w + 1])
    }

    fn forward(&self, input: &Tensor, _params: &ParamStore) -> Result<Tensor, NetworkError> {
        let out_shape = self.output_shape(input.shape())?;
        let (batch_size, c, out_h, out_w) = (out_shape[0], out_shape[1], out_shape[2], out_shape[3]);
        let (in_h, in_w) = (input.shape()[2], input.shape()[3]);
        let (k_h, k_w) = self.kernel_size;
        let (s_h, s_w) = self.stride;
        let area = (k_h * k_w) as f32;
        let x = input.data_as_slice();
        let single_sample_size = c * in_h * in_w;

        // Rayon 并行处理每个 batch 样本
        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|bi| {
                let xs = &x[bi * single_sample_size..(bi + 1) * single_sample_size];
                let mut sample_data = Vec::with_capacity(c * out_h * out_w);
                for ci in 0..c {
                    let plane = &xs[ci * in_h * in_w..(ci + 1) * in_h * in_w];
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let mut sum = 0.0f32;
                            for kh in 0..k_h {
                                let row = (oh * s_h + kh) * in_w;
                                for kw in 0..k_w {
                                    sum += plane[row + ow * s_w + kw];
                                }
                            }
                            sample_data.push(sum / area);
                        }
                    }
                }
                sample_data
            })
            .collect();

        Ok(Tensor::from_vec(batch_results.concat(), &out_shape))
    }

    fn type_descriptor(&self) -> LayerTypeDescriptor {
        LayerTypeDescriptor::AvgPool2d {
            kernel_size: self.kernel_size,
            stride: self.stride,
        }
    }
}

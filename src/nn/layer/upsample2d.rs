/*
 * @Description  : Upsample2d (2D 最近邻上采样) 层
 *
 * - 输入格式：[batch_size, channels, H, W]
 * - 输出格式：[batch_size, channels, H*s, W*s]
 * - 每个输入像素被复制到对应的 s×s 输出块中，无可学习参数
 *
 * 等价于 PyTorch 的 nn.Upsample(scale_factor=s)（默认 mode="nearest"）
 */

use super::{TraitLayer, split_rank4};
use crate::nn::{LayerTypeDescriptor, NetworkError, ParamStore};
use crate::tensor::Tensor;
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Upsample2d {
    name: String,
    scale_factor: usize,
}

impl Upsample2d {
    pub fn new(name: &str, scale_factor: usize) -> Result<Self, NetworkError> {
        if scale_factor == 0 {
            return Err(NetworkError::InvalidArchitecture(format!(
                "{name}的放大倍数须大于0"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            scale_factor,
        })
    }

    pub fn scale_factor(&self) -> usize {
        self.scale_factor
    }
}

impl TraitLayer for Upsample2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NetworkError> {
        let (batch_size, c, h, w) = split_rank4(input_shape, &self.name)?;
        Ok(vec![batch_size, c, h * self.scale_factor, w * self.scale_factor])
    }

    fn forward(&self, input: &Tensor, _params: &ParamStore) -> Result<Tensor, NetworkError> {
        let out_shape = self.output_shape(input.shape())?;
        let (batch_size, c, out_h, out_w) = (out_shape[0], out_shape[1], out_shape[2], out_shape[3]);
        let (in_h, in_w) = (input.shape()[2], input.shape()[3]);
        let s = self.scale_factor;
        let x = input.data_as_slice();
        let single_sample_size = c * in_h * in_w;

        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|bi| {
                let xs = &x[bi * single_sample_size..(bi + 1) * single_sample_size];
                let mut sample_data = Vec::with_capacity(c * out_h * out_w);
                for ci in 0..c {
                    let plane = &xs[ci * in_h * in_w..(ci + 1) * in_h * in_w];
                    for oh in 0..out_h {
                        let row = &plane[(oh / s) * in_w..(oh / s + 1) * in_w];
                        sample_data.extend((0..out_w).map(|ow| row[ow / s]));
                    }
                }
                sample_data
            })
            .collect();

        Ok(Tensor::from_vec(batch_results.concat(), &out_shape))
    }

    fn type_descriptor(&self) -> LayerTypeDescriptor {
        LayerTypeDescriptor::Upsample2d {
            scale_factor: self.scale_factor,
        }
    }
}

/*
 * @Description  : Sequential：按顺序求值的层列表
 *
 * 构造时用一个 batch=1 的符号形状把整条层链走一遍，
 * 相邻层的通道数、空间尺寸不一致会在此时直接报错，而不是留到前向推理。
 */

use super::layer::{AvgPool2d, Conv2d, Layer, LeakyReLU, TraitLayer, Upsample2d};
use super::{Module, NetworkError, ParamSpec, ParamStore, StageSpec};
use crate::tensor::Tensor;

#[derive(Debug, Clone, PartialEq)]
pub struct Sequential {
    name: String,
    layers: Vec<Layer>,
    /// 单样本输入形状 [C, H, W]
    input_shape: Vec<usize>,
    /// 单样本输出形状 [C, H, W]
    output_shape: Vec<usize>,
}

impl Sequential {
    /// 由现成的层列表构造，并静态检查整条层链
    pub fn new(name: &str, layers: Vec<Layer>, input_shape: [usize; 3]) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::InvalidArchitecture(format!(
                "{name}至少需要1个层"
            )));
        }
        let mut shape = vec![1, input_shape[0], input_shape[1], input_shape[2]];
        for layer in &layers {
            shape = layer.output_shape(&shape)?;
        }
        Ok(Self {
            name: name.to_string(),
            layers,
            input_shape: input_shape.to_vec(),
            output_shape: shape[1..].to_vec(),
        })
    }

    /// 按阶段声明展开为具体的层：
    /// 卷积块 → `conv{n}` + `act{n}`；下采样 → `pool{n}`；上采样 → `up{n}`
    pub fn from_stages(
        name: &str,
        stages: &[StageSpec],
        input_shape: [usize; 3],
        negative_slope: f32,
    ) -> Result<Self, NetworkError> {
        let (mut n_conv, mut n_pool, mut n_up) = (0, 0, 0);
        let mut layers: Vec<Layer> = Vec::with_capacity(stages.len() * 2);
        for stage in stages {
            match *stage {
                StageSpec::ConvBlock {
                    in_channels,
                    out_channels,
                } => {
                    n_conv += 1;
                    let conv_name = format!("{name}.conv{n_conv}");
                    layers.push(Conv2d::same_3x3(&conv_name, in_channels, out_channels)?.into());
                    let act_name = format!("{name}.act{n_conv}");
                    layers.push(LeakyReLU::new(&act_name, negative_slope)?.into());
                }
                StageSpec::Conv {
                    in_channels,
                    out_channels,
                } => {
                    n_conv += 1;
                    let conv_name = format!("{name}.conv{n_conv}");
                    layers.push(Conv2d::same_3x3(&conv_name, in_channels, out_channels)?.into());
                }
                StageSpec::Downsample { factor } => {
                    n_pool += 1;
                    let pool_name = format!("{name}.pool{n_pool}");
                    layers.push(AvgPool2d::new(&pool_name, (factor, factor), None)?.into());
                }
                StageSpec::Upsample { factor } => {
                    n_up += 1;
                    let up_name = format!("{name}.up{n_up}");
                    layers.push(Upsample2d::new(&up_name, factor)?.into());
                }
            }
        }
        Self::new(name, layers, input_shape)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// 单样本输入形状 [C, H, W]
    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    /// 单样本输出形状 [C, H, W]
    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    /// 每一层在给定 batch 下的 (输入形状, 输出形状)
    pub fn layer_shapes(&self, batch_size: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
        let mut shape = vec![batch_size];
        shape.extend_from_slice(&self.input_shape);
        let mut shapes = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            // 构造时已校验过整条链，这里不会失败
            let next = layer.output_shape(&shape).unwrap_or_else(|_| shape.clone());
            shapes.push((shape, next.clone()));
            shape = next;
        }
        shapes
    }

    /// 校验实际输入：必须是 [batch>=1, C, H, W] 且 C/H/W 与声明一致
    pub fn check_input(&self, input: &Tensor) -> Result<(), NetworkError> {
        let shape = input.shape();
        if shape.len() != 4 || shape[0] == 0 || shape[1..] != self.input_shape[..] {
            let mut expected = vec![shape.first().copied().unwrap_or(0).max(1)];
            expected.extend_from_slice(&self.input_shape);
            return Err(NetworkError::ShapeMismatch {
                expected,
                got: shape.to_vec(),
                message: format!(
                    "{}的输入须为 [batch>=1, {}, {}, {}]",
                    self.name, self.input_shape[0], self.input_shape[1], self.input_shape[2]
                ),
            });
        }
        Ok(())
    }

    /// 逐层前向计算
    pub fn forward(&self, params: &ParamStore, input: &Tensor) -> Result<Tensor, NetworkError> {
        self.check_input(input)?;
        let (first, rest) = self.layers.split_first().ok_or_else(|| {
            NetworkError::InvalidArchitecture(format!("{}至少需要1个层", self.name))
        })?;
        let mut x = first.forward(input, params)?;
        log::debug!("{} → {:?}", first.name(), x.shape());
        for layer in rest {
            x = layer.forward(&x, params)?;
            log::debug!("{} → {:?}", layer.name(), x.shape());
        }
        Ok(x)
    }
}

impl Module for Sequential {
    fn param_specs(&self) -> Vec<ParamSpec> {
        self.layers.iter().flat_map(TraitLayer::param_specs).collect()
    }
}

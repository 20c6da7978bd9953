/*
 * @Description  : Conv2d (2D 卷积) 层 - PyTorch 风格
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, out_channels, H', W']
 *
 * 输出尺寸计算：
 * H' = (H + 2*padding_h - kernel_h) / stride_h + 1
 * W' = (W + 2*padding_w - kernel_w) / stride_w + 1
 *
 * 计算：output = conv2d(x, K) + b
 * - 卷积核参数 `<name>.weight`：[out_channels, in_channels, kernel_h, kernel_w]
 * - 偏置参数 `<name>.bias`：[out_channels]（可选）
 * - 使用 Rayon 在 batch 维度并行；每个样本内部的累加顺序固定，结果与线程调度无关
 */

use super::{TraitLayer, split_rank4};
use crate::nn::{LayerTypeDescriptor, NetworkError, ParamRole, ParamSpec, ParamStore};
use crate::tensor::Tensor;
use rayon::prelude::*;

/// Conv2d (2D 卷积) 层（只含结构声明，参数数值存放于 ParamStore）
#[derive(Debug, Clone, PartialEq)]
pub struct Conv2d {
    name: String,
    in_channels: usize,
    out_channels: usize,
    /// 卷积核大小 (kernel_h, kernel_w)
    kernel_size: (usize, usize),
    /// 步长 (stride_h, stride_w)
    stride: (usize, usize),
    /// 零填充 (padding_h, padding_w)
    padding: (usize, usize),
    use_bias: bool,
}

impl Conv2d {
    /// 创建新的 Conv2d 层
    ///
    /// # 参数
    /// - `name`: 层名称，亦为参数名前缀
    /// - `in_channels`: 输入通道数
    /// - `out_channels`: 输出通道数
    /// - `kernel_size`: 卷积核大小 (kH, kW)
    /// - `stride`: 步长 (sH, sW)
    /// - `padding`: 填充 (pH, pW)
    /// - `use_bias`: 是否使用偏置
    pub fn new(
        name: &str,
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        use_bias: bool,
    ) -> Result<Self, NetworkError> {
        if in_channels == 0 || out_channels == 0 {
            return Err(NetworkError::InvalidArchitecture(format!(
                "{name}的通道数须大于0，得到 {in_channels}→{out_channels}"
            )));
        }
        if kernel_size.0 == 0 || kernel_size.1 == 0 || stride.0 == 0 || stride.1 == 0 {
            return Err(NetworkError::InvalidArchitecture(format!(
                "{name}的卷积核大小与步长须大于0，得到核 {kernel_size:?}，步长 {stride:?}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
            use_bias,
        })
    }

    /// 保持空间尺寸不变的 3×3 卷积（步长1、填充1、带偏置）
    pub fn same_3x3(
        name: &str,
        in_channels: usize,
        out_channels: usize,
    ) -> Result<Self, NetworkError> {
        Self::new(name, in_channels, out_channels, (3, 3), (1, 1), (1, 1), true)
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub fn stride(&self) -> (usize, usize) {
        self.stride
    }

    pub fn padding(&self) -> (usize, usize) {
        self.padding
    }

    pub fn weight_name(&self) -> String {
        format!("{}.weight", self.name)
    }

    /// 偏置参数名（无偏置时为 None）
    pub fn bias_name(&self) -> Option<String> {
        self.use_bias.then(|| format!("{}.bias", self.name))
    }

    fn kernel_shape(&self) -> Vec<usize> {
        vec![
            self.out_channels,
            self.in_channels,
            self.kernel_size.0,
            self.kernel_size.1,
        ]
    }

    /// 取出并校验参数（参数可能被外部替换过，这里再确认一次形状）
    fn fetch_param<'a>(
        params: &'a ParamStore,
        name: &str,
        expected: &[usize],
    ) -> Result<&'a Tensor, NetworkError> {
        let value = params.require(name)?;
        if value.shape() != expected {
            return Err(NetworkError::ParameterShapeMismatch {
                name: name.to_string(),
                expected: expected.to_vec(),
                got: value.shape().to_vec(),
            });
        }
        Ok(value)
    }

    /// 执行卷积运算（Rayon 并行版本）。零填充在取值时按越界处理，不额外复制输入
    fn convolve(&self, input: &Tensor, kernel: &Tensor, bias: Option<&Tensor>) -> Tensor {
        let (batch_size, in_c, in_h, in_w) = (
            input.shape()[0],
            input.shape()[1],
            input.shape()[2],
            input.shape()[3],
        );
        let out_c = self.out_channels;
        let (k_h, k_w) = self.kernel_size;
        let (stride_h, stride_w) = self.stride;
        let (pad_h, pad_w) = (self.padding.0 as isize, self.padding.1 as isize);
        let out_h = (in_h + 2 * self.padding.0 - k_h) / stride_h + 1;
        let out_w = (in_w + 2 * self.padding.1 - k_w) / stride_w + 1;

        let x = input.data_as_slice();
        let k = kernel.data_as_slice();
        let b = bias.map(|t| t.data_as_slice());
        let in_plane = in_h * in_w;
        let out_plane = out_h * out_w;
        let single_sample_size = in_c * in_plane;

        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|bi| {
                let xs = &x[bi * single_sample_size..(bi + 1) * single_sample_size];
                let mut sample_data = vec![0.0f32; out_c * out_plane];
                for oc in 0..out_c {
                    let plane = &mut sample_data[oc * out_plane..(oc + 1) * out_plane];
                    if let Some(b) = b {
                        plane.fill(b[oc]);
                    }
                    for ic in 0..in_c {
                        let xp = &xs[ic * in_plane..(ic + 1) * in_plane];
                        for kh in 0..k_h {
                            for kw in 0..k_w {
                                let w = k[((oc * in_c + ic) * k_h + kh) * k_w + kw];
                                for oh in 0..out_h {
                                    let ih = (oh * stride_h + kh) as isize - pad_h;
                                    if ih < 0 || ih >= in_h as isize {
                                        continue;
                                    }
                                    let row = &xp[ih as usize * in_w..(ih as usize + 1) * in_w];
                                    let out_row = &mut plane[oh * out_w..(oh + 1) * out_w];
                                    for (ow, out_val) in out_row.iter_mut().enumerate() {
                                        let iw = (ow * stride_w + kw) as isize - pad_w;
                                        if iw >= 0 && iw < in_w as isize {
                                            *out_val += w * row[iw as usize];
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                sample_data
            })
            .collect();

        // 合并结果
        Tensor::from_vec(
            batch_results.concat(),
            &[batch_size, out_c, out_h, out_w],
        )
    }
}

impl TraitLayer for Conv2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NetworkError> {
        let (batch_size, c, h, w) = split_rank4(input_shape, &self.name)?;
        if c != self.in_channels {
            return Err(NetworkError::ShapeMismatch {
                expected: vec![self.in_channels],
                got: vec![c],
                message: format!(
                    "{}的输入通道数 {c} 与卷积核输入通道数 {} 不匹配",
                    self.name, self.in_channels
                ),
            });
        }
        let (k_h, k_w) = self.kernel_size;
        let (pad_h, pad_w) = self.padding;
        if h + 2 * pad_h < k_h || w + 2 * pad_w < k_w {
            return Err(NetworkError::InvalidArchitecture(format!(
                "{}的卷积输出尺寸无效：输入 {h}x{w}，核 {k_h}x{k_w}，填充 {:?}",
                self.name, self.padding
            )));
        }
        let out_h = (h + 2 * pad_h - k_h) / self.stride.0 + 1;
        let out_w = (w + 2 * pad_w - k_w) / self.stride.1 + 1;
        Ok(vec![batch_size, self.out_channels, out_h, out_w])
    }

    fn forward(&self, input: &Tensor, params: &ParamStore) -> Result<Tensor, NetworkError> {
        self.output_shape(input.shape())?;
        let kernel = Self::fetch_param(params, &self.weight_name(), &self.kernel_shape())?;
        let bias = match self.bias_name() {
            Some(name) => Some(Self::fetch_param(params, &name, &[self.out_channels])?),
            None => None,
        };
        Ok(self.convolve(input, kernel, bias))
    }

    fn param_specs(&self) -> Vec<ParamSpec> {
        let mut specs = vec![ParamSpec::new(
            &self.weight_name(),
            &self.kernel_shape(),
            ParamRole::Weight,
        )];
        if let Some(name) = self.bias_name() {
            specs.push(ParamSpec::new(&name, &[self.out_channels], ParamRole::Bias));
        }
        specs
    }

    fn type_descriptor(&self) -> LayerTypeDescriptor {
        LayerTypeDescriptor::Conv2d {
            in_channels: self.in_channels,
            out_channels: self.out_channels,
            kernel_size: self.kernel_size,
            stride: self.stride,
            padding: self.padding,
        }
    }
}

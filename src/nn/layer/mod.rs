/*
 * @Description  : Layer 模块 - 网络中按顺序执行的各类变换
 *
 * 本网络的层图是固定的顺序结构（无分支、无循环），因此每一层就是一个带标签的变体，
 * 由 Sequential 严格按顺序逐层求值，无需通用的数据流图。
 *
 * 所有层均采用 Batch-First 格式：输入/输出为 [batch, C, H, W]。
 */

mod avg_pool2d;
mod conv2d;
mod leaky_relu;
mod upsample2d;

pub use avg_pool2d::AvgPool2d;
pub use conv2d::Conv2d;
pub use leaky_relu::LeakyReLU;
pub use upsample2d::Upsample2d;

use super::{LayerTypeDescriptor, NetworkError, ParamSpec, ParamStore};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Conv2d(Conv2d),
    LeakyReLU(LeakyReLU),
    AvgPool2d(AvgPool2d),
    Upsample2d(Upsample2d),
}

#[enum_dispatch(Layer)]
pub trait TraitLayer {
    /// 层名称（如 `encoder.conv1`），同时作为其参数名的前缀
    fn name(&self) -> &str;

    /// 根据输入形状 [batch, C, H, W] 推导输出形状；输入不合法时返回错误。
    /// 构造网络时据此静态检查整条层链，前向推理时据此校验实际输入。
    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NetworkError>;

    /// 前向计算。参数只读，不修改任何内部状态
    fn forward(&self, input: &Tensor, params: &ParamStore) -> Result<Tensor, NetworkError>;

    /// 本层声明的可学习参数（无参数的层返回空）
    fn param_specs(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    /// 含类型特定参数的描述（用于序列化、可视化）
    fn type_descriptor(&self) -> LayerTypeDescriptor;
}

/// 拆出 4 阶形状 (batch, C, H, W)
pub(in crate::nn) fn split_rank4(
    input_shape: &[usize],
    layer_name: &str,
) -> Result<(usize, usize, usize, usize), NetworkError> {
    match input_shape {
        &[b, c, h, w] => Ok((b, c, h, w)),
        _ => Err(NetworkError::ShapeMismatch {
            expected: Vec::new(),
            got: input_shape.to_vec(),
            message: format!(
                "{layer_name}的输入必须是 4D [batch, C, H, W]，单样本请使用 [1, C, H, W]"
            ),
        }),
    }
}

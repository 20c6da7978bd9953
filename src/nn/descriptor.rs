/*
 * @Description  : 网络描述符（Network Descriptor）
 *                 统一的中间表示（IR），用于序列化、结构检查和调试输出
 */

use super::layer::TraitLayer;
use super::{NetworkError, Sequential};
use serde::{Deserialize, Serialize};

/// 网络的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 网络名称
    pub name: String,
    /// 所有层描述（按求值顺序）
    pub layers: Vec<LayerDescriptor>,
}

/// 层描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// 在整个网络中的序号（从 0 开始）
    pub index: usize,
    /// 所属组件（encoder / decoder）
    pub stage: String,
    /// 层名称
    pub name: String,
    /// 层类型
    pub layer_type: LayerTypeDescriptor,
    /// 输入形状（batch 记为 1）
    pub input_shape: Vec<usize>,
    /// 输出形状（batch 记为 1）
    pub output_shape: Vec<usize>,
    /// 参数量（仅卷积层有意义）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_count: Option<usize>,
}

/// 层类型描述（包含类型特定参数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerTypeDescriptor {
    Conv2d {
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
    },
    LeakyReLU {
        negative_slope: f32,
    },
    AvgPool2d {
        kernel_size: (usize, usize),
        stride: (usize, usize),
    },
    Upsample2d {
        scale_factor: usize,
    },
}

impl LayerTypeDescriptor {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Conv2d { .. } => "Conv2d",
            Self::LeakyReLU { .. } => "LeakyReLU",
            Self::AvgPool2d { .. } => "AvgPool2d",
            Self::Upsample2d { .. } => "Upsample2d",
        }
    }
}

impl NetworkDescriptor {
    /// 创建新的网络描述符
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            layers: Vec::new(),
        }
    }

    /// 依次描述若干个顺序组件（如编码器、解码器）
    pub(in crate::nn) fn from_bodies(name: &str, bodies: &[&Sequential]) -> Self {
        let mut descriptor = Self::new(name);
        for body in bodies {
            for (layer, (input_shape, output_shape)) in
                body.layers().iter().zip(body.layer_shapes(1))
            {
                let specs = layer.param_specs();
                let param_count = (!specs.is_empty())
                    .then(|| specs.iter().map(|s| s.numel()).sum::<usize>());
                descriptor.add_layer(LayerDescriptor {
                    index: descriptor.layers.len(),
                    stage: body.name().to_string(),
                    name: layer.name().to_string(),
                    layer_type: layer.type_descriptor(),
                    input_shape,
                    output_shape,
                    param_count,
                });
            }
        }
        descriptor
    }

    /// 添加层描述
    pub fn add_layer(&mut self, layer: LayerDescriptor) {
        self.layers.push(layer);
    }

    /// 获取总参数量
    pub fn total_params(&self) -> usize {
        self.layers.iter().filter_map(|l| l.param_count).sum()
    }

    /// 静态检查形状链：
    /// - 相邻两层：前一层的输出形状 == 后一层的输入形状
    /// - 卷积层：声明的输入/输出通道数与其实际输入/输出形状的通道维一致
    pub fn check_shape_chain(&self) -> Result<(), NetworkError> {
        for pair in self.layers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.output_shape != next.input_shape {
                return Err(NetworkError::ShapeMismatch {
                    expected: next.input_shape.clone(),
                    got: prev.output_shape.clone(),
                    message: format!("{}的输出无法衔接{}的输入", prev.name, next.name),
                });
            }
        }
        for layer in &self.layers {
            if let LayerTypeDescriptor::Conv2d {
                in_channels,
                out_channels,
                ..
            } = layer.layer_type
            {
                let got = vec![
                    layer.input_shape.get(1).copied().unwrap_or(0),
                    layer.output_shape.get(1).copied().unwrap_or(0),
                ];
                if got != [in_channels, out_channels] {
                    return Err(NetworkError::ShapeMismatch {
                        expected: vec![in_channels, out_channels],
                        got,
                        message: format!("{}的通道声明与其输入/输出形状不符", layer.name),
                    });
                }
            }
        }
        Ok(())
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

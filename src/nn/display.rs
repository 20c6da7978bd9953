/*
 * @Description  : 网络结构的显示格式化
 */

use super::{LayerDescriptor, LayerTypeDescriptor, NetworkDescriptor};
use std::fmt;

/// 格式化单个层的显示，格式为：`[序号] 名称  类型(细节)  输入形状 → 输出形状  参数量`
pub(in crate::nn) fn format_layer_display(layer: &LayerDescriptor) -> String {
    let detail = match &layer.layer_type {
        LayerTypeDescriptor::Conv2d {
            in_channels,
            out_channels,
            kernel_size,
            ..
        } => format!(
            "{in_channels}→{out_channels}, {}×{}",
            kernel_size.0, kernel_size.1
        ),
        LayerTypeDescriptor::LeakyReLU { negative_slope } => format!("slope={negative_slope}"),
        LayerTypeDescriptor::AvgPool2d { kernel_size, .. } => {
            format!("{}×{}", kernel_size.0, kernel_size.1)
        }
        LayerTypeDescriptor::Upsample2d { scale_factor } => format!("×{scale_factor}"),
    };
    format!(
        "[{:>2}] {:<16} {:<10} {:<14} {:?} → {:?}  {}",
        layer.index,
        layer.name,
        layer.layer_type.type_name(),
        detail,
        layer.input_shape,
        layer.output_shape,
        layer.param_count.unwrap_or(0)
    )
}

impl fmt::Display for NetworkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (v{})", self.name, self.version)?;
        for layer in &self.layers {
            writeln!(f, "{}", format_layer_display(layer))?;
        }
        write!(f, "总参数量: {}", self.total_params())
    }
}

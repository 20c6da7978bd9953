/*
 * @Description  : Module trait 定义
 */

use super::ParamSpec;

/// 模块 trait：能够列出自身全部参数声明的组件（Sequential、Encoder、Decoder、IisptNet）
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（各模块的输入约束不同）
/// - `new()` **不是** trait 方法（参数各异）
/// - `param_specs()` 只返回声明（名称、形状、角色），参数数值由 ParamStore 持有
pub trait Module {
    /// 按声明顺序获取所有参数的声明
    fn param_specs(&self) -> Vec<ParamSpec>;

    /// 获取参数的标量总数
    fn num_params(&self) -> usize {
        self.param_specs().iter().map(ParamSpec::numel).sum()
    }
}

/*
 * @Description  : 网络模块的错误类型
 *
 * 本网络没有可恢复的运行时逻辑，所有错误都是结构性的（形状、参数声明），
 * 一旦出现即为致命错误：调用方须提供符合约定的输入或参数。
 */

use thiserror::Error;

/// 网络构造、参数加载与前向推理的错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// 输入或相邻层之间的形状（通道数、空间尺寸、阶数）不一致
    #[error("形状不匹配：期望{expected:?}，实际得到{got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    /// 载入的参数形状与结构声明不符
    #[error("参数`{name}`形状不匹配：声明为{expected:?}，载入的为{got:?}")]
    ParameterShapeMismatch {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("未声明的参数`{0}`")]
    UnknownParameter(String),
    #[error("参数存储中缺少参数`{0}`")]
    MissingParameter(String),
    #[error("参数`{0}`重复声明")]
    DuplicateParameter(String),
    #[error("无效的网络结构：{0}")]
    InvalidArchitecture(String),
    #[error("无效的配置：{0}")]
    InvalidConfig(String),
}

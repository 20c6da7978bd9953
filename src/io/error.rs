//! PFM 读写错误类型定义

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PfmError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 头部格式错误（magic、宽高、比例因子）
    #[error("PFM 头部格式错误: {0}")]
    HeaderError(String),

    /// 像素数据不足
    #[error("PFM 像素数据不完整: 期望 {expected} 字节, 实际 {got} 字节")]
    Truncated { expected: usize, got: usize },

    /// 通道数不符合要求
    #[error("{name}的通道数须为{expected}，实际为{got}")]
    ChannelMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// 多张图的尺寸不一致
    #[error("图像尺寸不一致: 期望 {expected:?}, 实际 {got:?}")]
    SizeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// 张量无法转换为图像
    #[error("张量错误: {0}")]
    Tensor(#[from] crate::errors::TensorError),
}

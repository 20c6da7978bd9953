use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    #[error("数据长度{data_len}与形状{shape:?}所需的元素个数不一致")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },
    #[error("张量须为{expected}阶，但得到形状为{shape:?}的张量")]
    RankMismatch { expected: usize, shape: Vec<usize> },

    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsitentShape,
}

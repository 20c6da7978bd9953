/*
 * @Description  : 沿 batch 维（第 0 维）拆分、合并 4 阶张量
 */

use super::Tensor;
use crate::errors::{ComparisonOperator, TensorError};
use ndarray::{Axis, concatenate};

impl Tensor {
    /// 取出第`index`个样本，结果仍为 4 阶：[1, C, H, W]
    pub fn select_batch(&self, index: usize) -> Result<Tensor, TensorError> {
        self.ensure_rank4()?;
        let batch_size = self.shape()[0];
        if index >= batch_size {
            return Err(TensorError::ValueMustSatisfyComparison {
                value_name: "batch_index".to_string(),
                operator: ComparisonOperator::LessThan,
                threshold: batch_size,
            });
        }
        let sample = self
            .data
            .slice_axis(Axis(0), (index..index + 1).into())
            .to_owned();
        // slice 的结果可能不是标准布局，统一整理成连续内存
        Ok(Tensor::from_vec(
            sample.iter().copied().collect(),
            sample.shape(),
        ))
    }

    /// 将若干个 [b_i, C, H, W] 张量沿 batch 维拼接为 [Σb_i, C, H, W]
    pub fn stack_batch(tensors: &[&Tensor]) -> Result<Tensor, TensorError> {
        let first = tensors.first().ok_or(TensorError::EmptyList)?;
        first.ensure_rank4()?;
        if tensors
            .iter()
            .any(|t| t.dimension() != 4 || t.shape()[1..] != first.shape()[1..])
        {
            return Err(TensorError::InconsitentShape);
        }
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = concatenate(Axis(0), &views).map_err(|_| TensorError::InconsitentShape)?;
        let shape = data.shape().to_vec();
        Ok(Tensor::from_vec(data.iter().copied().collect(), &shape))
    }

    pub(crate) fn ensure_rank4(&self) -> Result<(), TensorError> {
        if self.dimension() != 4 {
            return Err(TensorError::RankMismatch {
                expected: 4,
                shape: self.shape().to_vec(),
            });
        }
        Ok(())
    }
}

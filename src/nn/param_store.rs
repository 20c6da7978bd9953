/*
 * @Description  : 参数存储（ParamStore）
 *
 * 网络结构只声明参数（名称 + 形状 + 角色），数值统一存放于此。
 * 前向推理只读访问；写入只能经由 `set`/`load`，并且必须与声明的形状一致。
 */

use super::NetworkError;
use crate::tensor::Tensor;
use std::collections::HashMap;

/// 参数在层中的角色，决定其初始化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRole {
    /// 卷积核 [C_out, C_in, kH, kW]，按 `NetConfig::init` 初始化
    Weight,
    /// 偏置 [C_out]，恒为零初始化
    Bias,
}

/// 参数声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub shape: Vec<usize>,
    pub role: ParamRole,
}

impl ParamSpec {
    pub fn new(name: &str, shape: &[usize], role: ParamRole) -> Self {
        Self {
            name: name.to_string(),
            shape: shape.to_vec(),
            role,
        }
    }

    /// 该参数包含的标量个数
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

/// 按声明顺序保存的具名参数集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamStore {
    entries: Vec<(String, Tensor)>,
    index: HashMap<String, usize>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明一个新参数并给定初值（仅在构造网络时使用）
    pub(crate) fn declare(&mut self, name: &str, value: Tensor) -> Result<(), NetworkError> {
        if self.index.contains_key(name) {
            return Err(NetworkError::DuplicateParameter(name.to_string()));
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), value));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// 与`get`相同，但参数缺失时返回错误（前向推理用）
    pub fn require(&self, name: &str) -> Result<&Tensor, NetworkError> {
        self.get(name)
            .ok_or_else(|| NetworkError::MissingParameter(name.to_string()))
    }

    /// 替换单个参数的值，形状必须与已声明的一致
    pub fn set(&mut self, name: &str, value: Tensor) -> Result<(), NetworkError> {
        let slot = self.check_replacement(name, &value)?;
        self.entries[slot].1 = value;
        Ok(())
    }

    /// 批量载入参数：先全部校验，全部通过后才整体替换（要么全成功，要么什么都不改）。
    /// 返回被替换的参数个数。
    pub fn load<I>(&mut self, params: I) -> Result<usize, NetworkError>
    where
        I: IntoIterator<Item = (String, Tensor)>,
    {
        let mut staged = Vec::new();
        for (name, value) in params {
            match self.check_replacement(&name, &value) {
                Ok(slot) => staged.push((slot, value)),
                Err(e) => {
                    log::warn!("拒绝载入参数：{e}");
                    return Err(e);
                }
            }
        }
        let count = staged.len();
        for (slot, value) in staged {
            self.entries[slot].1 = value;
        }
        Ok(count)
    }

    fn check_replacement(&self, name: &str, value: &Tensor) -> Result<usize, NetworkError> {
        let &slot = self
            .index
            .get(name)
            .ok_or_else(|| NetworkError::UnknownParameter(name.to_string()))?;
        let declared = self.entries[slot].1.shape();
        if declared != value.shape() {
            return Err(NetworkError::ParameterShapeMismatch {
                name: name.to_string(),
                expected: declared.to_vec(),
                got: value.shape().to_vec(),
            });
        }
        Ok(slot)
    }

    /// 按声明顺序遍历 (名称, 值)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// 参数（张量）个数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有参数的标量总数
    pub fn num_scalars(&self) -> usize {
        self.entries.iter().map(|(_, t)| t.size()).sum()
    }
}

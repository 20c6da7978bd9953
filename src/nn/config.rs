/*
 * @Description  : 网络构造配置（可由 JSON 读入）
 *
 * ```json
 * { "seed": 42, "negative_slope": 0.1, "init": { "type": "Kaiming" } }
 * ```
 * 缺省字段取默认值。
 */

use super::{Init, NetworkError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// 参数初始化所用随机数种子；相同种子构造出的网络参数逐位相同
    pub seed: u64,
    /// 所有 LeakyReLU 的负半轴斜率（1.0 即恒等映射）
    pub negative_slope: f32,
    /// 卷积核初始化策略（偏置恒为零）
    pub init: Init,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            negative_slope: 0.1,
            init: Init::Kaiming,
        }
    }
}

impl NetConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_negative_slope(mut self, negative_slope: f32) -> Self {
        self.negative_slope = negative_slope;
        self
    }

    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if !self.negative_slope.is_finite() || self.negative_slope < 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "negative_slope应为非负有限数，但得到: {}",
                self.negative_slope
            )));
        }
        if let Init::Normal { mean, std } = self.init {
            if !mean.is_finite() || !std.is_finite() || std < 0.0 {
                return Err(NetworkError::InvalidConfig(format!(
                    "正态初始化的参数无效：mean={mean}，std={std}"
                )));
            }
        }
        Ok(())
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| NetworkError::InvalidConfig(format!("JSON 解析失败: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, NetworkError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NetworkError::InvalidConfig(format!("JSON 序列化失败: {e}")))
    }
}

/*
 * @Description  : 编码器、解码器与完整的 IISPT 去噪网络
 *
 * forward(input) = Decoder(Encoder(input))
 * - 输入 [B, 7, 32, 32]：强度 RGB、表面法线 XYZ、深度
 * - 输出 [B, 3, 32, 32]：强度 RGB，不做任何钳制
 *
 * 前向推理是 (参数, 输入) 的纯函数：`&self` 只读，网络可在多线程间共享；
 * 修改参数需要 `&mut self`，与推理的互斥由借用规则保证。
 */

use super::{
    DECODER_STAGES, ENCODER_STAGES, INPUT_CHANNELS, LATENT_CHANNELS, LATENT_SIZE, Module,
    NetConfig, NetworkDescriptor, NetworkError, OUTPUT_CHANNELS, PATCH_SIZE, ParamRole, ParamSpec,
    ParamStore, Sequential,
};
use crate::nn::layer::Layer;
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn ensure_output_shape(body: &Sequential, expected: [usize; 3]) -> Result<(), NetworkError> {
    if body.output_shape() != expected {
        return Err(NetworkError::ShapeMismatch {
            expected: expected.to_vec(),
            got: body.output_shape().to_vec(),
            message: format!("{}的输出形状与约定不符", body.name()),
        });
    }
    Ok(())
}

/// 编码器：[B, 7, 32, 32] → [B, 80, 8, 8]
#[derive(Debug, Clone, PartialEq)]
pub struct Encoder {
    body: Sequential,
}

impl Encoder {
    pub fn new(config: &NetConfig) -> Result<Self, NetworkError> {
        let body = Sequential::from_stages(
            "encoder",
            ENCODER_STAGES,
            [INPUT_CHANNELS, PATCH_SIZE, PATCH_SIZE],
            config.negative_slope,
        )?;
        ensure_output_shape(&body, [LATENT_CHANNELS, LATENT_SIZE, LATENT_SIZE])?;
        Ok(Self { body })
    }

    pub fn forward(&self, params: &ParamStore, input: &Tensor) -> Result<Tensor, NetworkError> {
        self.body.forward(params, input)
    }

    pub fn body(&self) -> &Sequential {
        &self.body
    }
}

impl Module for Encoder {
    fn param_specs(&self) -> Vec<ParamSpec> {
        self.body.param_specs()
    }
}

/// 解码器：[B, 80, 8, 8] → [B, 3, 32, 32]
#[derive(Debug, Clone, PartialEq)]
pub struct Decoder {
    body: Sequential,
}

impl Decoder {
    pub fn new(config: &NetConfig) -> Result<Self, NetworkError> {
        let body = Sequential::from_stages(
            "decoder",
            DECODER_STAGES,
            [LATENT_CHANNELS, LATENT_SIZE, LATENT_SIZE],
            config.negative_slope,
        )?;
        ensure_output_shape(&body, [OUTPUT_CHANNELS, PATCH_SIZE, PATCH_SIZE])?;
        Ok(Self { body })
    }

    pub fn forward(&self, params: &ParamStore, latent: &Tensor) -> Result<Tensor, NetworkError> {
        self.body.forward(params, latent)
    }

    pub fn body(&self) -> &Sequential {
        &self.body
    }
}

impl Module for Decoder {
    fn param_specs(&self) -> Vec<ParamSpec> {
        self.body.param_specs()
    }
}

/// IISPT 间接光照去噪网络
///
/// # 使用示例
/// ```
/// use iispt_net::nn::IisptNet;
/// use iispt_net::tensor::Tensor;
///
/// let net = IisptNet::new().unwrap();
/// let output = net.forward(&Tensor::ones(&[2, 7, 32, 32])).unwrap();
/// assert_eq!(output.shape(), &[2, 3, 32, 32]);
/// ```
#[derive(Debug, Clone)]
pub struct IisptNet {
    config: NetConfig,
    encoder: Encoder,
    decoder: Decoder,
    params: ParamStore,
}

impl IisptNet {
    /// 以默认配置（seed=42、LeakyReLU 斜率 0.1、Kaiming 初始化）构造
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_config(NetConfig::default())
    }

    pub fn with_config(config: NetConfig) -> Result<Self, NetworkError> {
        config.validate()?;
        let encoder = Encoder::new(&config)?;
        let decoder = Decoder::new(&config)?;
        if encoder.body().output_shape() != decoder.body().input_shape() {
            return Err(NetworkError::ShapeMismatch {
                expected: decoder.body().input_shape().to_vec(),
                got: encoder.body().output_shape().to_vec(),
                message: "编码器输出与解码器输入不衔接".to_string(),
            });
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut params = ParamStore::new();
        for spec in encoder.param_specs().into_iter().chain(decoder.param_specs()) {
            let value = match spec.role {
                ParamRole::Weight => config.init.generate_with_rng(&spec.shape, &mut rng),
                ParamRole::Bias => Tensor::zeros(&spec.shape),
            };
            params.declare(&spec.name, value)?;
        }

        log::info!(
            "IisptNet 构建完成：{} 个参数张量，共 {} 个标量（seed={}）",
            params.len(),
            params.num_scalars(),
            config.seed
        );

        Ok(Self {
            config,
            encoder,
            decoder,
            params,
        })
    }

    /// 前向推理：[B, 7, 32, 32] → [B, 3, 32, 32]
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, NetworkError> {
        let latent = self.encode(input)?;
        self.decode(&latent)
    }

    /// 仅执行编码器：[B, 7, 32, 32] → [B, 80, 8, 8]
    pub fn encode(&self, input: &Tensor) -> Result<Tensor, NetworkError> {
        self.encoder.forward(&self.params, input)
    }

    /// 仅执行解码器：[B, 80, 8, 8] → [B, 3, 32, 32]
    pub fn decode(&self, latent: &Tensor) -> Result<Tensor, NetworkError> {
        self.decoder.forward(&self.params, latent)
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// 编码器与解码器的全部层（按求值顺序）
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.encoder
            .body()
            .layers()
            .iter()
            .chain(self.decoder.body().layers())
    }

    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    pub fn parameter(&self, name: &str) -> Option<&Tensor> {
        self.params.get(name)
    }

    /// 按声明顺序列出所有参数名
    pub fn parameter_names(&self) -> Vec<&str> {
        self.params.names().collect()
    }

    /// 替换单个参数（形状须与声明一致）
    pub fn set_parameter(&mut self, name: &str, value: Tensor) -> Result<(), NetworkError> {
        self.params.set(name, value)
    }

    /// 批量载入外部提供的参数（全部校验通过后才整体替换）
    pub fn load_parameters<I>(&mut self, params: I) -> Result<usize, NetworkError>
    where
        I: IntoIterator<Item = (String, Tensor)>,
    {
        let count = self.params.load(params)?;
        log::debug!("已载入 {count} 个参数");
        Ok(count)
    }

    /// 生成结构描述（层类型、逐层形状、参数量）
    pub fn describe(&self) -> NetworkDescriptor {
        NetworkDescriptor::from_bodies("IisptNet", &[self.encoder.body(), self.decoder.body()])
    }

    /// 人类可读的结构摘要
    pub fn summary(&self) -> String {
        self.describe().to_string()
    }
}

impl Module for IisptNet {
    fn param_specs(&self) -> Vec<ParamSpec> {
        [self.encoder.param_specs(), self.decoder.param_specs()].concat()
    }
}

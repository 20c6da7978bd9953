/*
 * @Description  : 负责去噪网络（neural network）的结构声明、参数存储与前向推理
 *
 * 结构声明（层序列、通道数、卷积核尺寸）在构造时确定且不可变；
 * 参数数值统一存放于 ParamStore，仅可由外部（如训练器、参数加载器）修改。
 */

mod architecture;
mod config;
mod descriptor;
mod display;
mod error;
mod init;
pub mod layer;
mod module;
mod network;
mod param_store;
mod sequential;

pub use architecture::{
    DECODER_STAGES, ENCODER_STAGES, INPUT_CHANNELS, KERNEL_SIZE, LATENT_CHANNELS, LATENT_SIZE,
    OUTPUT_CHANNELS, PATCH_SIZE, StageSpec,
};
pub use config::NetConfig;
pub use descriptor::{LayerDescriptor, LayerTypeDescriptor, NetworkDescriptor};
pub use error::NetworkError;
pub use init::Init;
pub use layer::{AvgPool2d, Conv2d, Layer, LeakyReLU, TraitLayer, Upsample2d};
pub use module::Module;
pub use network::{Decoder, Encoder, IisptNet};
pub use param_store::{ParamRole, ParamSpec, ParamStore};
pub use sequential::Sequential;

#[cfg(test)]
mod tests;

//! # IISPT Net
//!
//! `iispt_net`是IISPT（Intelligent Indirect Scene Path Tracing）渲染器中间接光照去噪网络的纯rust实现。
//! 网络输入为含噪声的渲染图块（7个通道：强度RGB、表面法线XYZ、深度），
//! 输出为同一图块去噪后的强度估计（3个通道：RGB）。
//!
//! 网络结构固定：编码器（Encoder）将`[batch, 7, 32, 32]`压缩为`[batch, 80, 8, 8]`的潜在张量，
//! 解码器（Decoder）再将其还原为`[batch, 3, 32, 32]`。
//!
//! ```ignore
//! use iispt_net::nn::IisptNet;
//! use iispt_net::tensor::Tensor;
//!
//! let net = IisptNet::new()?;
//! let patch = Tensor::ones(&[1, 7, 32, 32]);
//! let denoised = net.forward(&patch)?; // [1, 3, 32, 32]
//! ```

pub mod errors;
pub mod io;
pub mod nn;
pub mod tensor;
pub mod utils;

/*
 * @Description  : 去噪网络的结构声明（一次定义、不可变）
 *
 * 编码器：                                  解码器：
 *   [B,  7, 32, 32]                           [B, 80,  8,  8]
 *   conv 7→16   + LeakyReLU                   conv 80→100 + LeakyReLU
 *   conv 16→32  + LeakyReLU                   conv 100→50 + LeakyReLU
 *   avg_pool 2x2        → 16x16               upsample x2         → 16x16
 *   conv 32→64  + LeakyReLU                   conv 50→64  + LeakyReLU
 *   conv 64→50  + LeakyReLU                   conv 64→32  + LeakyReLU
 *   avg_pool 2x2        → 8x8                 upsample x2         → 32x32
 *   conv 50→100 + LeakyReLU                   conv 32→16  + LeakyReLU
 *   conv 100→80 + LeakyReLU                   conv 16→8   + LeakyReLU
 *   [B, 80,  8,  8]                           conv 8→3（无激活，输出为无界回归值）
 *                                             [B,  3, 32, 32]
 */

use serde::{Deserialize, Serialize};

/// 输入通道：强度 RGB（0..=2）、表面法线 XYZ（3..=5）、深度（6）
pub const INPUT_CHANNELS: usize = 7;
/// 输出通道：强度 RGB
pub const OUTPUT_CHANNELS: usize = 3;
/// 图块边长（须能被 4 整除，才能经过两次减半再两次加倍）
pub const PATCH_SIZE: usize = 32;
pub const LATENT_CHANNELS: usize = 80;
pub const LATENT_SIZE: usize = PATCH_SIZE / 4;
/// 所有卷积均为 3×3、步长1、填充1，保持空间尺寸不变
pub const KERNEL_SIZE: usize = 3;

/// 一个阶段的声明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage")]
pub enum StageSpec {
    /// 卷积块：3×3 卷积 + LeakyReLU
    ConvBlock {
        in_channels: usize,
        out_channels: usize,
    },
    /// 不带激活的 3×3 卷积（解码器最后一层）
    Conv {
        in_channels: usize,
        out_channels: usize,
    },
    /// 按`factor`×`factor`不重叠块取平均的下采样
    Downsample { factor: usize },
    /// 最近邻复制的上采样
    Upsample { factor: usize },
}

const fn block(in_channels: usize, out_channels: usize) -> StageSpec {
    StageSpec::ConvBlock {
        in_channels,
        out_channels,
    }
}

pub const ENCODER_STAGES: &[StageSpec] = &[
    block(INPUT_CHANNELS, 16),
    block(16, 32),
    StageSpec::Downsample { factor: 2 }, // 16x16
    block(32, 64),
    block(64, 50),
    StageSpec::Downsample { factor: 2 }, // 8x8
    block(50, 100),
    block(100, LATENT_CHANNELS),
];

pub const DECODER_STAGES: &[StageSpec] = &[
    block(LATENT_CHANNELS, 100), // 8x8
    block(100, 50),
    StageSpec::Upsample { factor: 2 }, // 16x16
    block(50, 64),
    block(64, 32),
    StageSpec::Upsample { factor: 2 }, // 32x32
    block(32, 16),
    block(16, 8),
    StageSpec::Conv {
        in_channels: 8,
        out_channels: OUTPUT_CHANNELS,
    },
];

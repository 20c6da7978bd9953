use super::Tensor;
use crate::errors::{ComparisonOperator, TensorError};
use image::{Rgb, RgbImage};

impl Tensor {
    /// 将网络输出中第`batch_index`个样本（[C>=3, H, W]的前3个通道）转换为8位RGB预览图。
    /// 每个值先被钳制到[0, 1]，再线性映射到[0, 255]；
    /// 网络本身不做任何钳制，这里是唯一钳制的地方。
    pub fn to_rgb_preview(&self, batch_index: usize) -> Result<RgbImage, TensorError> {
        let sample = self.select_batch(batch_index)?;
        let shape = sample.shape();
        let (channels, height, width) = (shape[1], shape[2], shape[3]);
        if channels < 3 {
            return Err(TensorError::ValueMustSatisfyComparison {
                value_name: "通道数".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 3,
            });
        }

        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut imgbuf = RgbImage::new(width as u32, height as u32);
        for y in 0..height {
            for x in 0..width {
                let r = to_u8(sample[[0, 0, y, x]]);
                let g = to_u8(sample[[0, 1, y, x]]);
                let b = to_u8(sample[[0, 2, y, x]]);
                imgbuf.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
            }
        }
        Ok(imgbuf)
    }
}

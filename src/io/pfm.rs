/*
 * @Description  : PFM（Portable Float Map）图像的读写，以及与网络张量的互相转换
 *
 * 文件布局：
 * ```text
 * PF|Pf\n            # PF=3通道，Pf=1通道
 * <width> <height>\n
 * <scale>\n          # 负数=小端序，正数=大端序；绝对值不参与像素换算
 * <f32 像素...>      # 行序自下而上，每行内按通道交错
 * ```
 * 内存中的 `PfmImage::data` 统一按自上而下、通道交错存放。
 */

use super::PfmError;
use crate::nn::{INPUT_CHANNELS, OUTPUT_CHANNELS};
use crate::tensor::Tensor;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct PfmImage {
    width: usize,
    height: usize,
    /// 1（灰度，如深度）或 3（RGB、法线 XYZ）
    channels: usize,
    /// 长度为 width * height * channels，自上而下、通道交错
    data: Vec<f32>,
}

impl PfmImage {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, PfmError> {
        if channels != 1 && channels != 3 {
            return Err(PfmError::HeaderError(format!(
                "通道数须为1或3，实际为{channels}"
            )));
        }
        let expected = sample_count(width, height, channels)?;
        if data.len() != expected {
            return Err(PfmError::Truncated {
                expected: expected.saturating_mul(4),
                got: data.len().saturating_mul(4),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// 第 (x, y) 个像素的第 c 个通道，y 自上而下计
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[(y * self.width + x) * self.channels + c]
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PfmError> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PfmError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read<R: Read>(mut reader: R) -> Result<Self, PfmError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PfmError> {
        let mut cursor = HeaderCursor { bytes, pos: 0 };
        let channels = match cursor.token()? {
            "PF" => 3,
            "Pf" => 1,
            other => {
                return Err(PfmError::HeaderError(format!(
                    "不支持的 magic `{other}`"
                )));
            }
        };
        let width = parse_dimension(cursor.token()?, "宽度")?;
        let height = parse_dimension(cursor.token()?, "高度")?;
        let scale_token = cursor.token()?;
        let scale: f32 = scale_token
            .parse()
            .map_err(|_| PfmError::HeaderError(format!("无法解析比例因子 `{scale_token}`")))?;
        if scale == 0.0 || !scale.is_finite() {
            return Err(PfmError::HeaderError(format!("比例因子无效: {scale}")));
        }
        let little_endian = scale < 0.0;
        // 比例因子之后恰有一个空白字节，随后即为像素数据
        let body = &bytes[cursor.pos + 1..];

        let expected = sample_count(width, height, channels)?
            .checked_mul(4)
            .ok_or_else(|| oversized(width, height))?;
        let row_len = width * channels;
        if body.len() < expected {
            return Err(PfmError::Truncated {
                expected,
                got: body.len(),
            });
        }

        let mut data = vec![0.0f32; row_len * height];
        for (i, chunk) in body[..expected].chunks_exact(4).enumerate() {
            let raw = [chunk[0], chunk[1], chunk[2], chunk[3]];
            let value = if little_endian {
                f32::from_le_bytes(raw)
            } else {
                f32::from_be_bytes(raw)
            };
            // 文件中第 0 行是图像最底行
            let (file_row, col) = (i / row_len, i % row_len);
            data[(height - 1 - file_row) * row_len + col] = value;
        }
        log::debug!("读取 PFM: {width}x{height}，{channels} 通道");
        Self::new(width, height, channels, data)
    }

    /// 以小端序（scale = -1）写出
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), PfmError> {
        let magic = if self.channels == 3 { "PF" } else { "Pf" };
        write!(writer, "{magic}\n{} {}\n-1\n", self.width, self.height)?;
        let row_len = self.width * self.channels;
        for row in self.data.chunks_exact(row_len.max(1)).rev() {
            for value in row {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PfmError> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4 + 32);
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    fn ensure_channels(&self, name: &str, expected: usize) -> Result<(), PfmError> {
        if self.channels != expected {
            return Err(PfmError::ChannelMismatch {
                name: name.to_string(),
                expected,
                got: self.channels,
            });
        }
        Ok(())
    }
}

struct HeaderCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    /// 跳过空白后读取一个 ASCII 记号
    fn token(&mut self) -> Result<&'a str, PfmError> {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        if start == self.pos || self.pos >= self.bytes.len() {
            return Err(PfmError::HeaderError("头部不完整".to_string()));
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| PfmError::HeaderError("头部含有非 ASCII 字符".to_string()))
    }
}

fn oversized(width: usize, height: usize) -> PfmError {
    PfmError::HeaderError(format!("图像尺寸 {width}x{height} 过大"))
}

/// width * height * channels，溢出时视为头部错误
fn sample_count(width: usize, height: usize, channels: usize) -> Result<usize, PfmError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| oversized(width, height))
}

fn parse_dimension(token: &str, what: &str) -> Result<usize, PfmError> {
    match token.parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(PfmError::HeaderError(format!("{what}无效: `{token}`"))),
    }
}

/// 将渲染器输出的三张图拼为网络输入 [1, 7, H, W]：
/// 通道 0..=2 为强度 RGB，3..=5 为法线 XYZ，6 为深度
pub fn assemble_input(
    intensity: &PfmImage,
    normals: &PfmImage,
    depth: &PfmImage,
) -> Result<Tensor, PfmError> {
    intensity.ensure_channels("强度图", 3)?;
    normals.ensure_channels("法线图", 3)?;
    depth.ensure_channels("深度图", 1)?;
    let size = (intensity.width, intensity.height);
    for other in [normals, depth] {
        if (other.width, other.height) != size {
            return Err(PfmError::SizeMismatch {
                expected: size,
                got: (other.width, other.height),
            });
        }
    }

    let (width, height) = size;
    let plane = width * height;
    let mut data = vec![0.0f32; INPUT_CHANNELS * plane];
    let sources = [(intensity, 0usize), (normals, 3), (depth, 6)];
    for (image, first_channel) in sources {
        for c in 0..image.channels {
            let dst = &mut data[(first_channel + c) * plane..(first_channel + c + 1) * plane];
            for (p, value) in dst.iter_mut().enumerate() {
                *value = image.data[p * image.channels + c];
            }
        }
    }
    Ok(Tensor::from_vec(data, &[1, INPUT_CHANNELS, height, width]))
}

/// 将网络输出中第`batch_index`个样本转换为 3 通道 PFM 图像（数值原样保留，不做钳制）
pub fn output_to_pfm(output: &Tensor, batch_index: usize) -> Result<PfmImage, PfmError> {
    let sample = output.select_batch(batch_index)?;
    let (channels, height, width) = (sample.shape()[1], sample.shape()[2], sample.shape()[3]);
    if channels != OUTPUT_CHANNELS {
        return Err(PfmError::ChannelMismatch {
            name: "网络输出".to_string(),
            expected: OUTPUT_CHANNELS,
            got: channels,
        });
    }
    let mut data = Vec::with_capacity(channels * height * width);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                data.push(sample[[0, c, y, x]]);
            }
        }
    }
    PfmImage::new(width, height, channels, data)
}

/*
 * @Description  : 与渲染器交换图块数据的文件格式
 */

mod error;
mod pfm;

pub use error::PfmError;
pub use pfm::{PfmImage, assemble_input, output_to_pfm};

#[cfg(test)]
mod tests;

use crate::assert_err;
use crate::io::{PfmError, PfmImage, assemble_input, output_to_pfm};
use crate::tensor::Tensor;

/// 手工拼一个大端序（scale > 0）的 2x2 单通道文件，文件中先存最底行
fn big_endian_gray_2x2() -> Vec<u8> {
    let mut bytes = b"Pf\n2 2\n1.0\n".to_vec();
    for v in [3.0f32, 4.0, 1.0, 2.0] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    bytes
}

#[test]
fn test_read_big_endian_flips_rows() {
    let image = PfmImage::from_bytes(&big_endian_gray_2x2()).unwrap();
    assert_eq!((image.width(), image.height(), image.channels()), (2, 2, 1));
    // 自上而下：第一行为 1, 2
    assert_eq!(image.data(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(image.get(1, 1, 0), 4.0);
}

#[test]
fn test_write_then_read_rgb() {
    let data = (0..18).map(|v| v as f32 * 0.5 - 2.0).collect::<Vec<_>>();
    let image = PfmImage::new(3, 2, 3, data).unwrap();
    let bytes = image.to_bytes().unwrap();
    assert!(bytes.starts_with(b"PF\n3 2\n-1\n"));
    assert_eq!(PfmImage::from_bytes(&bytes).unwrap(), image);
}

#[test]
fn test_written_rows_are_bottom_to_top() {
    let image = PfmImage::new(1, 2, 1, vec![10.0, 20.0]).unwrap();
    let bytes = image.to_bytes().unwrap();
    let body = &bytes[b"Pf\n1 2\n-1\n".len()..];
    assert_eq!(&body[..4], &20.0f32.to_le_bytes());
    assert_eq!(&body[4..], &10.0f32.to_le_bytes());
}

#[test]
fn test_malformed_headers() {
    assert_err!(
        PfmImage::from_bytes(b"P6\n2 2\n-1\n"),
        PfmError::HeaderError(msg) if msg.contains("P6")
    );
    assert_err!(
        PfmImage::from_bytes(b"PF\n0 2\n-1\n"),
        PfmError::HeaderError(msg) if msg.contains("宽度")
    );
    assert_err!(
        PfmImage::from_bytes(b"PF\n2 2\nabc\n"),
        PfmError::HeaderError(_)
    );
    assert_err!(PfmImage::from_bytes(b"PF\n2"), PfmError::HeaderError(_));
}

#[test]
fn test_truncated_body() {
    let mut bytes = b"Pf\n2 2\n-1\n".to_vec();
    bytes.extend_from_slice(&1.0f32.to_le_bytes());
    assert_err!(
        PfmImage::from_bytes(&bytes),
        PfmError::Truncated {
            expected: 16,
            got: 4
        }
    );
}

#[test]
fn test_new_rejects_bad_channels_and_length() {
    assert_err!(PfmImage::new(1, 1, 2, vec![0.0; 2]), PfmError::HeaderError(_));
    assert_err!(PfmImage::new(2, 2, 3, vec![0.0; 5]), PfmError::Truncated { .. });
}

#[test]
fn test_assemble_input_channel_order() {
    // 2x1 图像
    let intensity = PfmImage::new(2, 1, 3, vec![0.1, 0.2, 0.3, 1.1, 1.2, 1.3]).unwrap();
    let normals = PfmImage::new(2, 1, 3, vec![0.0, 0.0, 1.0, 0.0, 1.0, 0.0]).unwrap();
    let depth = PfmImage::new(2, 1, 1, vec![5.0, 6.0]).unwrap();
    let input = assemble_input(&intensity, &normals, &depth).unwrap();

    assert_eq!(input.shape(), &[1, 7, 1, 2]);
    assert_eq!(input[[0, 0, 0, 0]], 0.1);
    assert_eq!(input[[0, 2, 0, 1]], 1.3);
    assert_eq!(input[[0, 5, 0, 0]], 1.0);
    assert_eq!(input[[0, 4, 0, 1]], 1.0);
    assert_eq!(input[[0, 6, 0, 1]], 6.0);
}

#[test]
fn test_assemble_input_errors() {
    let rgb = PfmImage::new(2, 2, 3, vec![0.0; 12]).unwrap();
    let gray = PfmImage::new(2, 2, 1, vec![0.0; 4]).unwrap();
    let small_gray = PfmImage::new(1, 2, 1, vec![0.0; 2]).unwrap();

    assert_err!(
        assemble_input(&gray, &rgb, &gray),
        PfmError::ChannelMismatch { expected: 3, got: 1, .. }
    );
    assert_err!(
        assemble_input(&rgb, &rgb, &rgb),
        PfmError::ChannelMismatch { expected: 1, got: 3, .. }
    );
    assert_err!(
        assemble_input(&rgb, &rgb, &small_gray),
        PfmError::SizeMismatch {
            expected: (2, 2),
            got: (1, 2)
        }
    );
}

#[test]
fn test_output_to_pfm_keeps_unclamped_values() {
    let mut output = Tensor::zeros(&[2, 3, 2, 2]);
    output[[1, 0, 0, 1]] = -0.5;
    output[[1, 2, 1, 0]] = 7.5;
    let image = output_to_pfm(&output, 1).unwrap();
    assert_eq!((image.width(), image.height(), image.channels()), (2, 2, 3));
    assert_eq!(image.get(1, 0, 0), -0.5);
    assert_eq!(image.get(0, 1, 2), 7.5);

    assert_err!(output_to_pfm(&output, 2), PfmError::Tensor(_));
    assert_err!(
        output_to_pfm(&Tensor::zeros(&[1, 7, 2, 2]), 0),
        PfmError::ChannelMismatch { expected: 3, got: 7, .. }
    );
}

#[test]
fn test_oversized_header_is_rejected() {
    // width * height * 3 * 4 溢出 usize
    let mut bytes = b"PF\n6148914691236517206 2\n-1\n".to_vec();
    bytes.extend_from_slice(&[0u8; 64]);
    assert_err!(
        PfmImage::from_bytes(&bytes),
        PfmError::HeaderError(msg) if msg.contains("过大")
    );

    // 仅在乘以 4 字节时溢出
    let mut bytes = format!("Pf\n{} 1\n-1\n", usize::MAX / 2).into_bytes();
    bytes.extend_from_slice(&[0u8; 16]);
    assert_err!(
        PfmImage::from_bytes(&bytes),
        PfmError::HeaderError(msg) if msg.contains("过大")
    );

    assert_err!(
        PfmImage::new(usize::MAX, 2, 3, Vec::new()),
        PfmError::HeaderError(msg) if msg.contains("过大")
    );
}

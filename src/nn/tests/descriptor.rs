/*
 * @Description  : NetworkDescriptor 单元测试：静态检查形状链、JSON 往返、摘要输出
 */

use crate::assert_err;
use crate::nn::{IisptNet, LayerTypeDescriptor, Module, NetworkDescriptor, NetworkError};

#[test]
fn test_describe_layers() {
    let net = IisptNet::new().unwrap();
    let desc = net.describe();
    assert_eq!(desc.name, "IisptNet");
    assert_eq!(desc.layers.len(), 29);
    assert_eq!(desc.layers.len(), net.layers().count());

    let first = &desc.layers[0];
    assert_eq!(first.index, 0);
    assert_eq!(first.stage, "encoder");
    assert_eq!(first.name, "encoder.conv1");
    assert_eq!(first.input_shape, vec![1, 7, 32, 32]);
    assert_eq!(first.output_shape, vec![1, 16, 32, 32]);
    assert_eq!(first.param_count, Some(16 * 7 * 9 + 16));

    let last = desc.layers.last().unwrap();
    assert_eq!(last.index, 28);
    assert_eq!(last.stage, "decoder");
    assert_eq!(last.name, "decoder.conv7");
    assert_eq!(last.output_shape, vec![1, 3, 32, 32]);

    // 激活层、池化层没有参数
    assert_eq!(desc.layers[1].param_count, None);
    assert_eq!(desc.total_params(), net.num_params());
    assert_eq!(desc.total_params(), 340_671);
}

#[test]
fn test_shape_chain_static_inspection() {
    let desc = IisptNet::new().unwrap().describe();
    assert!(desc.check_shape_chain().is_ok());

    // 相邻卷积层：前者输出通道 == 后者输入通道
    let convs = desc
        .layers
        .iter()
        .filter_map(|l| match l.layer_type {
            LayerTypeDescriptor::Conv2d {
                in_channels,
                out_channels,
                ..
            } => Some((in_channels, out_channels)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(convs.len(), 13);
    for pair in convs.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
    }

    // 编码器输出恰为 8x8，网络输出恰为 32x32
    let latent = desc
        .layers
        .iter()
        .rfind(|l| l.stage == "encoder")
        .unwrap();
    assert_eq!(latent.output_shape, vec![1, 80, 8, 8]);
}

#[test]
fn test_shape_chain_detects_tampering() {
    let mut desc = IisptNet::new().unwrap().describe();
    desc.layers[5].input_shape = vec![1, 33, 16, 16];
    assert_err!(
        desc.check_shape_chain(),
        NetworkError::ShapeMismatch { got, .. } if got == &[1, 32, 16, 16]
    );

    let mut desc = IisptNet::new().unwrap().describe();
    if let LayerTypeDescriptor::Conv2d { out_channels, .. } = &mut desc.layers[0].layer_type {
        *out_channels = 17;
    }
    assert_err!(
        desc.check_shape_chain(),
        NetworkError::ShapeMismatch { expected, .. } if expected == &[7, 17]
    );
}

#[test]
fn test_descriptor_json_roundtrip() {
    let desc = IisptNet::new().unwrap().describe();
    let json = desc.to_json().unwrap();
    assert!(json.contains(r#""type": "Conv2d""#));
    assert!(json.contains(r#""type": "Upsample2d""#));
    let restored = NetworkDescriptor::from_json(&json).unwrap();
    assert_eq!(restored, desc);
    assert!(NetworkDescriptor::from_json("{}").is_err());
}

#[test]
fn test_summary() {
    let net = IisptNet::new().unwrap();
    let summary = net.summary();
    let lines = summary.lines().collect::<Vec<_>>();
    // 标题 + 29 层 + 总参数量
    assert_eq!(lines.len(), 31);
    assert!(lines[0].starts_with("IisptNet"));
    assert!(lines[1].contains("encoder.conv1"));
    assert!(lines[1].contains("7→16, 3×3"));
    assert!(summary.contains("decoder.up1"));
    assert!(summary.contains("slope=0.1"));
    assert!(lines[30].ends_with("340671"));
}

#[test]
fn test_empty_descriptor() {
    let desc = NetworkDescriptor::new("empty");
    assert_eq!(desc.total_params(), 0);
    assert!(desc.check_shape_chain().is_ok());
    assert_eq!(desc.to_string(), format!("empty (v{})\n总参数量: 0", desc.version));
}

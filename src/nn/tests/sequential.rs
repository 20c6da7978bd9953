use crate::assert_err;
use crate::nn::layer::{Layer, TraitLayer, Upsample2d};
use crate::nn::{
    DECODER_STAGES, ENCODER_STAGES, Module, NetworkError, ParamStore, Sequential, StageSpec,
};
use crate::tensor::Tensor;

#[test]
fn test_from_stages_layer_names() {
    let encoder = Sequential::from_stages("encoder", ENCODER_STAGES, [7, 32, 32], 0.1).unwrap();
    let names = encoder.layers().iter().map(|l| l.name()).collect::<Vec<_>>();
    assert_eq!(
        names,
        [
            "encoder.conv1",
            "encoder.act1",
            "encoder.conv2",
            "encoder.act2",
            "encoder.pool1",
            "encoder.conv3",
            "encoder.act3",
            "encoder.conv4",
            "encoder.act4",
            "encoder.pool2",
            "encoder.conv5",
            "encoder.act5",
            "encoder.conv6",
            "encoder.act6",
        ]
    );
    assert_eq!(encoder.output_shape(), &[80, 8, 8]);

    let decoder = Sequential::from_stages("decoder", DECODER_STAGES, [80, 8, 8], 0.1).unwrap();
    assert_eq!(decoder.layers().len(), 15);
    // 最后一层为不带激活的卷积
    assert!(matches!(decoder.layers().last(), Some(Layer::Conv2d(c)) if c.name() == "decoder.conv7"));
    assert_eq!(decoder.output_shape(), &[3, 32, 32]);
}

#[test]
fn test_layer_shapes_follow_batch() {
    let encoder = Sequential::from_stages("encoder", ENCODER_STAGES, [7, 32, 32], 0.1).unwrap();
    let shapes = encoder.layer_shapes(5);
    assert_eq!(shapes[0], (vec![5, 7, 32, 32], vec![5, 16, 32, 32]));
    assert_eq!(shapes[4], (vec![5, 32, 32, 32], vec![5, 32, 16, 16]));
    assert_eq!(shapes.last().unwrap().1, vec![5, 80, 8, 8]);
}

#[test]
fn test_construction_rejects_broken_chains() {
    let stages = [
        StageSpec::ConvBlock {
            in_channels: 3,
            out_channels: 4,
        },
        StageSpec::ConvBlock {
            in_channels: 5,
            out_channels: 6,
        },
    ];
    assert_err!(
        Sequential::from_stages("seq", &stages, [3, 8, 8], 0.1),
        NetworkError::ShapeMismatch(
            [5],
            [4],
            "seq.conv2的输入通道数 4 与卷积核输入通道数 5 不匹配"
        )
    );

    // 奇数尺寸无法被 2x2 池化恰好铺满
    let stages = [StageSpec::Downsample { factor: 2 }];
    assert_err!(
        Sequential::from_stages("seq", &stages, [3, 7, 7], 0.1),
        NetworkError::InvalidArchitecture(_)
    );

    assert_err!(
        Sequential::new("seq", Vec::new(), [3, 8, 8]),
        NetworkError::InvalidArchitecture(msg) if msg.contains("至少需要1个层")
    );
    assert_err!(
        Sequential::from_stages("seq", ENCODER_STAGES, [7, 32, 32], -1.0),
        NetworkError::InvalidArchitecture(_)
    );
}

#[test]
fn test_check_input() {
    let up: Layer = Upsample2d::new("up", 2).unwrap().into();
    let seq = Sequential::new("seq", vec![up], [2, 4, 4]).unwrap();
    assert_eq!(seq.output_shape(), &[2, 8, 8]);
    assert!(seq.check_input(&Tensor::zeros(&[3, 2, 4, 4])).is_ok());

    assert_err!(
        seq.check_input(&Tensor::zeros(&[3, 1, 4, 4])),
        NetworkError::ShapeMismatch([3, 2, 4, 4], [3, 1, 4, 4], "seq的输入须为 [batch>=1, 2, 4, 4]")
    );
    assert_err!(
        seq.check_input(&Tensor::zeros(&[0, 2, 4, 4])),
        NetworkError::ShapeMismatch { expected, .. } if expected == &[1, 2, 4, 4]
    );
    assert_err!(
        seq.forward(&ParamStore::new(), &Tensor::zeros(&[2, 4, 4])),
        NetworkError::ShapeMismatch { .. }
    );
}

#[test]
fn test_param_specs_in_declaration_order() {
    let encoder = Sequential::from_stages("encoder", ENCODER_STAGES, [7, 32, 32], 0.1).unwrap();
    let specs = encoder.param_specs();
    assert_eq!(specs.len(), 12);
    assert_eq!(specs[0].name, "encoder.conv1.weight");
    assert_eq!(specs[11].name, "encoder.conv6.bias");
    assert_eq!(encoder.num_params(), 170_190);
}

#[test]
fn test_single_layer_forward() {
    let up: Layer = Upsample2d::new("up", 2).unwrap().into();
    let seq = Sequential::new("seq", vec![up], [1, 1, 2]).unwrap();
    let output = seq
        .forward(&ParamStore::new(), &Tensor::new(&[3.0, -1.0], &[1, 1, 1, 2]))
        .unwrap();
    assert_eq!(output.shape(), &[1, 1, 2, 4]);
    assert_eq!(
        output.data_as_slice(),
        &[3.0, 3.0, -1.0, -1.0, 3.0, 3.0, -1.0, -1.0]
    );
}

use crate::assert_err;
use crate::nn::layer::{LeakyReLU, TraitLayer};
use crate::nn::{LayerTypeDescriptor, NetworkError, ParamStore};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_leaky_relu_forward() -> Result<(), NetworkError> {
    let act = LeakyReLU::new("act", 0.1)?;
    let input = Tensor::new(&[-2.0, -0.5, 0.0, 0.5, 3.0, -10.0], &[1, 1, 2, 3]);
    let output = act.forward(&input, &ParamStore::new())?;
    let expected = [-0.2, -0.05, 0.0, 0.5, 3.0, -1.0];
    for (got, exp) in output.data_as_slice().iter().zip(expected) {
        assert_abs_diff_eq!(*got, exp, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_leaky_relu_special_slopes() -> Result<(), NetworkError> {
    let input = Tensor::new(&[-3.0, 2.0], &[1, 1, 1, 2]);
    // 斜率 0 即 ReLU
    let relu = LeakyReLU::new("relu", 0.0)?;
    assert_eq!(
        relu.forward(&input, &ParamStore::new())?.data_as_slice(),
        &[0.0, 2.0]
    );
    // 斜率 1 即恒等映射
    let identity = LeakyReLU::new("identity", 1.0)?;
    assert_eq!(identity.forward(&input, &ParamStore::new())?, input);
    Ok(())
}

#[test]
fn test_leaky_relu_invalid_slope() {
    assert_err!(
        LeakyReLU::new("act", -0.1),
        NetworkError::InvalidArchitecture("act的negative_slope应为非负有限数，但得到: -0.1")
    );
    assert_err!(LeakyReLU::new("act", f32::NAN), NetworkError::InvalidArchitecture(_));
}

#[test]
fn test_leaky_relu_requires_rank4() {
    let act = LeakyReLU::new("act", 0.1).unwrap();
    assert_err!(
        act.forward(&Tensor::zeros(&[2, 3]), &ParamStore::new()),
        NetworkError::ShapeMismatch { expected, got, .. } if expected.is_empty() && got == &[2, 3]
    );
    assert!(act.param_specs().is_empty());
    assert_eq!(
        act.type_descriptor(),
        LayerTypeDescriptor::LeakyReLU {
            negative_slope: 0.1
        }
    );
}

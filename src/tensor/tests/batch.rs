use crate::assert_err;
use crate::errors::{ComparisonOperator, TensorError};
use crate::tensor::Tensor;

fn arange(shape: &[usize]) -> Tensor {
    let n = shape.iter().product::<usize>();
    Tensor::from_vec((0..n).map(|x| x as f32).collect(), shape)
}

#[test]
fn test_select_batch() {
    let t = arange(&[3, 2, 2, 2]);
    let s = t.select_batch(1).unwrap();
    assert_eq!(s.shape(), &[1, 2, 2, 2]);
    assert_eq!(
        s.data_as_slice(),
        &[8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0]
    );

    assert_eq!(
        t.select_batch(3),
        Err(TensorError::ValueMustSatisfyComparison {
            value_name: "batch_index".to_string(),
            operator: ComparisonOperator::LessThan,
            threshold: 3,
        })
    );
    assert_err!(
        arange(&[2, 2]).select_batch(0),
        TensorError::RankMismatch { expected: 4, .. }
    );
}

#[test]
fn test_stack_batch_roundtrip_of_samples() {
    let t = arange(&[3, 2, 2, 2]);
    let samples = (0..3)
        .map(|i| t.select_batch(i).unwrap())
        .collect::<Vec<_>>();
    let refs = samples.iter().collect::<Vec<_>>();
    assert_eq!(Tensor::stack_batch(&refs).unwrap(), t);
}

#[test]
fn test_stack_batch_errors() {
    assert_eq!(Tensor::stack_batch(&[]), Err(TensorError::EmptyList));

    let a = Tensor::zeros(&[1, 2, 2, 2]);
    let b = Tensor::zeros(&[1, 3, 2, 2]);
    assert_eq!(
        Tensor::stack_batch(&[&a, &b]),
        Err(TensorError::InconsitentShape)
    );
}

use super::Tensor;
use std::ops::{Index, IndexMut};

// 引用式索引：[batch, channel, row, column]
impl Index<[usize; 4]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 4]) -> &Self::Output {
        &self.data[&index[..]]
    }
}

impl IndexMut<[usize; 4]> for Tensor {
    fn index_mut(&mut self, index: [usize; 4]) -> &mut Self::Output {
        &mut self.data[&index[..]]
    }
}

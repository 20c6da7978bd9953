/*
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法，所以不会需要用到mut
 */

use super::Tensor;

impl Tensor {
    /// 若为网络中的图块张量，`shape`为[batch, channel, H, W]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    /// 即`shape()`的元素个数--如：形状为`[]`的标量阶数为0，向量阶数为1，矩阵阶数为2，以此类推
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 按行优先顺序返回底层数据
    pub fn data_as_slice(&self) -> &[f32] {
        // 所有构造函数都保证了标准内存布局
        self.data
            .as_slice()
            .expect("张量数据须为连续的行优先内存布局")
    }

    /// 取出底层数据（行优先）
    pub fn into_vec(self) -> Vec<f32> {
        if self.data.is_standard_layout() {
            self.data.into_raw_vec()
        } else {
            self.data.iter().copied().collect()
        }
    }
}

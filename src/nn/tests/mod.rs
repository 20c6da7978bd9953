mod descriptor;
mod layer_leaky_relu;
mod sequential;

use crate::nn::ParamStore;
use crate::tensor::Tensor;

/// 以给定的 (名称, 值) 构造参数存储（单层测试用）
fn store_with(entries: Vec<(&str, Tensor)>) -> ParamStore {
    let mut store = ParamStore::new();
    for (name, value) in entries {
        store.declare(name, value).unwrap();
    }
    store
}

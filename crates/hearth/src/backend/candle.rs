use candle_core::{Device, Tensor};
use crate::error::BackendError;
use crate::tensor::{TensorBuffer, TensorData};

fn widen<T: Copy, U: From<T>>(values: &[T]) -> Vec<U> {
    values.iter().map(|&v| U::from(v)).collect()
}

impl TensorBuffer {
    /// Copy this buffer into a candle tensor on `device`.
    ///
    /// candle has no `i8`, `i16`, `i32` or `u16` storage, so those widen
    /// losslessly to `i64` / `u32`. `u64` has no lossless candle counterpart
    /// and is rejected.
    pub fn to_candle(&self, device: &Device) -> Result<Tensor, BackendError> {
        let shape = self.shape().to_vec();
        let tensor = match self.data() {
            TensorData::I8(values) => Tensor::from_vec(widen::<i8, i64>(values), shape, device),
            TensorData::I16(values) => Tensor::from_vec(widen::<i16, i64>(values), shape, device),
            TensorData::I32(values) => Tensor::from_vec(widen::<i32, i64>(values), shape, device),
            TensorData::I64(values) => Tensor::from_vec(values.clone(), shape, device),
            TensorData::U8(values) => Tensor::from_vec(values.clone(), shape, device),
            TensorData::U16(values) => Tensor::from_vec(widen::<u16, u32>(values), shape, device),
            TensorData::U32(values) => Tensor::from_vec(values.clone(), shape, device),
            TensorData::U64(_) => {
                return Err(BackendError(format!("candle cannot hold {} without loss", self.element_type())));
            }
            TensorData::F32(values) => Tensor::from_vec(values.clone(), shape, device),
            TensorData::F16(values) => Tensor::from_vec(values.clone(), shape, device),
        };
        tensor.map_err(|e| BackendError(e.to_string()))
    }
}

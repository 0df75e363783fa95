use ndarray::Array2;

use crate::error::Result;

use super::validate_shapes;

/// Stack crops by computing the arithmetic mean at each pixel.
pub fn mean_stack(crops: &[Array2<f32>]) -> Result<Array2<f32>> {
    validate_shapes(crops)?;

    let (h, w) = crops[0].dim();
    let n = crops.len() as f32;

    let mut sum = Array2::<f32>::zeros((h, w));
    for crop in crops {
        sum += crop;
    }
    sum /= n;

    Ok(sum)
}

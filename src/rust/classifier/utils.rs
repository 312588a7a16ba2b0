use ndarray::Array1;

/// Scales a vector of class weights so it sums to one.
pub(crate) fn normalize_weights(vec: &Array1<f32>) -> Array1<f32> {
    let total: f32 = vec.sum();
    if total > 1e-10 {
        vec / total
    } else {
        Array1::zeros(vec.len())
    }
}

pub(crate) fn average_vectors(vectors: &[Array1<f32>], width: usize) -> Array1<f32> {
    if vectors.is_empty() {
        return Array1::zeros(width);
    }
    let sum = vectors.iter().fold(Array1::zeros(vectors[0].len()), |acc, v| acc + v);
    sum / vectors.len() as f32
}

/// Index of the first maximum.
pub(crate) fn argmax(values: &Array1<f32>) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

//! Similarity Ranker — cosine scoring of chunk embeddings against a query embedding.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("candidate {index} has dimension {actual}, query has dimension {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Cosine similarity of two equal-length vectors.
///
/// Sums are accumulated in `f64` so large components do not overflow.
/// Returns 0.0 when either vector has zero norm, and never returns NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    if score.is_finite() {
        score as f32
    } else {
        0.0
    }
}

/// Scores every candidate against the query, in candidate order.
pub fn score_all(query: &[f32], candidates: &[Vec<f32>]) -> Result<Vec<(usize, f32)>, RankError> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            if candidate.len() != query.len() {
                return Err(RankError::DimensionMismatch {
                    index,
                    expected: query.len(),
                    actual: candidate.len(),
                });
            }
            Ok((index, cosine_similarity(query, candidate)))
        })
        .collect()
}

/// Returns the indices of the `k` candidates most similar to `query`,
/// highest score first. Equal scores keep their original order.
///
/// `k <= 0` selects nothing; `k` past the candidate count selects everything.
pub fn top_k_similar(
    query: &[f32],
    candidates: &[Vec<f32>],
    k: i64,
) -> Result<Vec<usize>, RankError> {
    let mut scored = score_all(query, candidates)?;
    if k <= 0 {
        return Ok(Vec::new());
    }

    // sort_by is stable, so ties stay in index order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let k = usize::try_from(k).unwrap_or(usize::MAX);
    Ok(scored.into_iter().take(k).map(|(index, _)| index).collect())
}

//! Pixel matching: normalized cross-correlation and the darkness check.

use image::{GenericImageView, GrayImage};

/// Best zero-mean normalized cross-correlation of `template` over every
/// placement inside `haystack`, in `[-1.0, 1.0]`.
///
/// Returns `None` when the template does not fit. Placements where either
/// side has no variance score 0.0.
pub fn best_match_score<I>(haystack: &I, template: &GrayImage) -> Option<f32>
where
    I: GenericImageView<Pixel = image::Luma<u8>>,
{
    let (hw, hh) = haystack.dimensions();
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > hw || th > hh {
        return None;
    }

    let n = (tw * th) as f64;
    let t_mean = template.as_raw().iter().map(|&v| v as f64).sum::<f64>() / n;
    let t_centered: Vec<f64> = template.as_raw().iter().map(|&v| v as f64 - t_mean).collect();
    let t_energy: f64 = t_centered.iter().map(|v| v * v).sum();

    let mut best = f64::NEG_INFINITY;
    for oy in 0..=(hh - th) {
        for ox in 0..=(hw - tw) {
            let mut sum = 0.0;
            let mut sum_sq = 0.0;
            let mut cross = 0.0;
            for ty in 0..th {
                for tx in 0..tw {
                    let v = haystack.get_pixel(ox + tx, oy + ty).0[0] as f64;
                    sum += v;
                    sum_sq += v * v;
                    cross += v * t_centered[(ty * tw + tx) as usize];
                }
            }
            let w_energy = sum_sq - sum * sum / n;
            let denom = (w_energy * t_energy).sqrt();
            let score = if denom > f64::EPSILON {
                cross / denom
            } else {
                0.0
            };
            best = best.max(score);
        }
    }

    Some(best.clamp(-1.0, 1.0) as f32)
}

/// A frame is a transition when its total intensity is below `threshold`.
pub fn is_dark(intensity_sum: u64, threshold: u64) -> bool {
    intensity_sum < threshold
}

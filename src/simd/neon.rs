//! NEON kernels for aarch64 (2×f64 / 4×f32 lanes).

use core::arch::aarch64::*;

/// Dot product of two f64 slices, two FMA accumulators.
#[inline]
pub fn dot_f64(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    let body = n / 4 * 4;

    let mut sum = unsafe {
        let ap = a.as_ptr();
        let bp = b.as_ptr();
        let mut acc0 = vdupq_n_f64(0.0);
        let mut acc1 = vdupq_n_f64(0.0);
        let mut i = 0;
        while i < body {
            acc0 = vfmaq_f64(acc0, vld1q_f64(ap.add(i)), vld1q_f64(bp.add(i)));
            acc1 = vfmaq_f64(acc1, vld1q_f64(ap.add(i + 2)), vld1q_f64(bp.add(i + 2)));
            i += 4;
        }
        vaddvq_f64(vaddq_f64(acc0, acc1))
    };

    for i in body..n {
        sum += a[i] * b[i];
    }
    sum
}

/// Dot product of two f32 slices, two FMA accumulators.
#[inline]
pub fn dot_f32(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    let body = n / 8 * 8;

    let mut sum = unsafe {
        let ap = a.as_ptr();
        let bp = b.as_ptr();
        let mut acc0 = vdupq_n_f32(0.0);
        let mut acc1 = vdupq_n_f32(0.0);
        let mut i = 0;
        while i < body {
            acc0 = vfmaq_f32(acc0, vld1q_f32(ap.add(i)), vld1q_f32(bp.add(i)));
            acc1 = vfmaq_f32(acc1, vld1q_f32(ap.add(i + 4)), vld1q_f32(bp.add(i + 4)));
            i += 8;
        }
        vaddvq_f32(vaddq_f32(acc0, acc1))
    };

    for i in body..n {
        sum += a[i] * b[i];
    }
    sum
}

/// AXPY: `y[i] -= alpha * x[i]` for f64.
#[inline]
pub fn axpy_neg_f64(y: &mut [f64], alpha: f64, x: &[f64]) {
    debug_assert_eq!(y.len(), x.len());
    let n = y.len();
    let body = n / 2 * 2;

    unsafe {
        let va = vdupq_n_f64(alpha);
        let mut i = 0;
        while i < body {
            let vy = vld1q_f64(y.as_ptr().add(i));
            let vx = vld1q_f64(x.as_ptr().add(i));
            vst1q_f64(y.as_mut_ptr().add(i), vfmsq_f64(vy, va, vx));
            i += 2;
        }
    }

    for i in body..n {
        y[i] -= alpha * x[i];
    }
}

/// AXPY: `y[i] -= alpha * x[i]` for f32.
#[inline]
pub fn axpy_neg_f32(y: &mut [f32], alpha: f32, x: &[f32]) {
    debug_assert_eq!(y.len(), x.len());
    let n = y.len();
    let body = n / 4 * 4;

    unsafe {
        let va = vdupq_n_f32(alpha);
        let mut i = 0;
        while i < body {
            let vy = vld1q_f32(y.as_ptr().add(i));
            let vx = vld1q_f32(x.as_ptr().add(i));
            vst1q_f32(y.as_mut_ptr().add(i), vfmsq_f32(vy, va, vx));
            i += 4;
        }
    }

    for i in body..n {
        y[i] -= alpha * x[i];
    }
}

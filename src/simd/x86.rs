//! x86_64 kernels: AVX when enabled at compile time, SSE2 otherwise.
//!
//! SSE2 is part of the x86_64 baseline, so the SSE2 paths need no runtime
//! detection. The AVX paths are only compiled with `target_feature = "avx"`.

use core::arch::x86_64::*;

/// Dot product of two f64 slices.
#[inline]
pub fn dot_f64(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    let ap = a.as_ptr();
    let bp = b.as_ptr();

    #[cfg(target_feature = "avx")]
    let (mut sum, tail) = unsafe {
        let body = n / 8 * 8;
        let mut acc0 = _mm256_setzero_pd();
        let mut acc1 = _mm256_setzero_pd();
        let mut i = 0;
        while i < body {
            acc0 = _mm256_add_pd(acc0, _mm256_mul_pd(_mm256_loadu_pd(ap.add(i)), _mm256_loadu_pd(bp.add(i))));
            acc1 = _mm256_add_pd(acc1, _mm256_mul_pd(_mm256_loadu_pd(ap.add(i + 4)), _mm256_loadu_pd(bp.add(i + 4))));
            i += 8;
        }
        let acc = _mm256_add_pd(acc0, acc1);
        let pair = _mm_add_pd(_mm256_castpd256_pd128(acc), _mm256_extractf128_pd(acc, 1));
        let hi = _mm_unpackhi_pd(pair, pair);
        (_mm_cvtsd_f64(_mm_add_sd(pair, hi)), body)
    };

    #[cfg(not(target_feature = "avx"))]
    let (mut sum, tail) = unsafe {
        let body = n / 4 * 4;
        let mut acc0 = _mm_setzero_pd();
        let mut acc1 = _mm_setzero_pd();
        let mut i = 0;
        while i < body {
            acc0 = _mm_add_pd(acc0, _mm_mul_pd(_mm_loadu_pd(ap.add(i)), _mm_loadu_pd(bp.add(i))));
            acc1 = _mm_add_pd(acc1, _mm_mul_pd(_mm_loadu_pd(ap.add(i + 2)), _mm_loadu_pd(bp.add(i + 2))));
            i += 4;
        }
        let acc = _mm_add_pd(acc0, acc1);
        let hi = _mm_unpackhi_pd(acc, acc);
        (_mm_cvtsd_f64(_mm_add_sd(acc, hi)), body)
    };

    for i in tail..n {
        sum += a[i] * b[i];
    }
    sum
}

/// Dot product of two f32 slices.
#[inline]
pub fn dot_f32(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    let ap = a.as_ptr();
    let bp = b.as_ptr();

    #[cfg(target_feature = "avx")]
    let (mut sum, tail) = unsafe {
        let body = n / 8 * 8;
        let mut acc = _mm256_setzero_ps();
        let mut i = 0;
        while i < body {
            acc = _mm256_add_ps(acc, _mm256_mul_ps(_mm256_loadu_ps(ap.add(i)), _mm256_loadu_ps(bp.add(i))));
            i += 8;
        }
        let quad = _mm_add_ps(_mm256_castps256_ps128(acc), _mm256_extractf128_ps(acc, 1));
        (hsum_ps(quad), body)
    };

    #[cfg(not(target_feature = "avx"))]
    let (mut sum, tail) = unsafe {
        let body = n / 8 * 8;
        let mut acc0 = _mm_setzero_ps();
        let mut acc1 = _mm_setzero_ps();
        let mut i = 0;
        while i < body {
            acc0 = _mm_add_ps(acc0, _mm_mul_ps(_mm_loadu_ps(ap.add(i)), _mm_loadu_ps(bp.add(i))));
            acc1 = _mm_add_ps(acc1, _mm_mul_ps(_mm_loadu_ps(ap.add(i + 4)), _mm_loadu_ps(bp.add(i + 4))));
            i += 8;
        }
        (hsum_ps(_mm_add_ps(acc0, acc1)), body)
    };

    for i in tail..n {
        sum += a[i] * b[i];
    }
    sum
}

/// Horizontal sum of the four lanes of `v`.
#[inline(always)]
unsafe fn hsum_ps(v: __m128) -> f32 {
    let hi = _mm_movehl_ps(v, v);
    let pair = _mm_add_ps(v, hi);
    let odd = _mm_shuffle_ps(pair, pair, 1);
    _mm_cvtss_f32(_mm_add_ss(pair, odd))
}

/// AXPY: `y[i] -= alpha * x[i]` for f64.
#[inline]
pub fn axpy_neg_f64(y: &mut [f64], alpha: f64, x: &[f64]) {
    debug_assert_eq!(y.len(), x.len());
    let n = y.len();
    let yp = y.as_mut_ptr();
    let xp = x.as_ptr();

    #[cfg(target_feature = "avx")]
    let tail = unsafe {
        let body = n / 4 * 4;
        let va = _mm256_set1_pd(alpha);
        let mut i = 0;
        while i < body {
            let vy = _mm256_loadu_pd(yp.add(i));
            let vx = _mm256_loadu_pd(xp.add(i));
            _mm256_storeu_pd(yp.add(i), _mm256_sub_pd(vy, _mm256_mul_pd(va, vx)));
            i += 4;
        }
        body
    };

    #[cfg(not(target_feature = "avx"))]
    let tail = unsafe {
        let body = n / 2 * 2;
        let va = _mm_set1_pd(alpha);
        let mut i = 0;
        while i < body {
            let vy = _mm_loadu_pd(yp.add(i));
            let vx = _mm_loadu_pd(xp.add(i));
            _mm_storeu_pd(yp.add(i), _mm_sub_pd(vy, _mm_mul_pd(va, vx)));
            i += 2;
        }
        body
    };

    for i in tail..n {
        y[i] -= alpha * x[i];
    }
}

/// AXPY: `y[i] -= alpha * x[i]` for f32.
#[inline]
pub fn axpy_neg_f32(y: &mut [f32], alpha: f32, x: &[f32]) {
    debug_assert_eq!(y.len(), x.len());
    let n = y.len();
    let yp = y.as_mut_ptr();
    let xp = x.as_ptr();

    #[cfg(target_feature = "avx")]
    let tail = unsafe {
        let body = n / 8 * 8;
        let va = _mm256_set1_ps(alpha);
        let mut i = 0;
        while i < body {
            let vy = _mm256_loadu_ps(yp.add(i));
            let vx = _mm256_loadu_ps(xp.add(i));
            _mm256_storeu_ps(yp.add(i), _mm256_sub_ps(vy, _mm256_mul_ps(va, vx)));
            i += 8;
        }
        body
    };

    #[cfg(not(target_feature = "avx"))]
    let tail = unsafe {
        let body = n / 4 * 4;
        let va = _mm_set1_ps(alpha);
        let mut i = 0;
        while i < body {
            let vy = _mm_loadu_ps(yp.add(i));
            let vx = _mm_loadu_ps(xp.add(i));
            _mm_storeu_ps(yp.add(i), _mm_sub_ps(vy, _mm_mul_ps(va, vx)));
            i += 4;
        }
        body
    };

    for i in tail..n {
        y[i] -= alpha * x[i];
    }
}

//! Vector primitives that operate in place on scratch regions, and the
//! elementwise kernels composed from them.
//!
//! Every primitive works over whole slices, the way the device's vector unit
//! works over whole scratch buffers. Binary primitives require both operands
//! to have the same length.

mod hard_sigmoid;

pub use hard_sigmoid::{hard_sigmoid_scalar, HardSigmoidKernelOp};

use crate::dtypes::Dtype;

/// A fused elementwise transform applied to one tile in scratch memory.
///
/// `io` holds the tile and receives the result. `temp` is a second region of
/// the same length the kernel may clobber. Both are always the full region,
/// even on a short tail tile; only the leading elements are copied out.
pub trait ElementwiseKernel<E: Dtype>: Send + Sync {
    fn compute(&self, io: &mut [E], temp: &mut [E]);
}

#[inline]
pub fn multiply_scalar<E: Dtype>(dst: &mut [E], value: E) {
    for x in dst.iter_mut() {
        *x = *x * value;
    }
}

#[inline]
pub fn add_scalar<E: Dtype>(dst: &mut [E], value: E) {
    for x in dst.iter_mut() {
        *x = *x + value;
    }
}

#[inline]
pub fn assign<E: Dtype>(dst: &mut [E], value: E) {
    dst.fill(value);
}

#[inline]
pub fn zeros<E: Dtype>(dst: &mut [E]) {
    dst.fill(E::zero());
}

/// `dst[i] = min(dst[i], rhs[i])`. NaN in either operand gives NaN.
#[inline]
pub fn minimum<E: Dtype>(dst: &mut [E], rhs: &[E]) {
    debug_assert_eq!(dst.len(), rhs.len());
    for (x, &y) in dst.iter_mut().zip(rhs.iter()) {
        *x = nan_min(*x, y);
    }
}

/// `dst[i] = max(dst[i], rhs[i])`. NaN in either operand gives NaN.
#[inline]
pub fn maximum<E: Dtype>(dst: &mut [E], rhs: &[E]) {
    debug_assert_eq!(dst.len(), rhs.len());
    for (x, &y) in dst.iter_mut().zip(rhs.iter()) {
        *x = nan_max(*x, y);
    }
}

// `Float::min`/`max` return the non-NaN operand, which would turn a NaN
// input into a clamp bound.
#[inline(always)]
fn nan_min<E: Dtype>(x: E, y: E) -> E {
    if x.is_nan() || y.is_nan() {
        E::nan()
    } else if y < x {
        y
    } else {
        x
    }
}

#[inline(always)]
fn nan_max<E: Dtype>(x: E, y: E) -> E {
    if x.is_nan() || y.is_nan() {
        E::nan()
    } else if y > x {
        y
    } else {
        x
    }
}

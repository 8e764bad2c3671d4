use super::{add_scalar, assign, maximum, minimum, multiply_scalar, zeros, ElementwiseKernel};
use crate::dtypes::Dtype;

/// [Hard Sigmoid](https://pytorch.org/docs/stable/generated/torch.nn.Hardsigmoid.html),
/// `clamp(x / 6 + 1 / 2, 0, 1)`.
///
/// Computed as six vector steps over the tile: scale by `1/6`, shift by `1/2`,
/// fill `temp` with ones, take the minimum, fill `temp` with zeros, take the
/// maximum. The order is fixed so results match the device bit for bit.
///
/// NaN stays NaN. `+inf` maps to 1 and `-inf` to 0.
#[derive(Debug, Default, Copy, Clone)]
pub struct HardSigmoidKernelOp;

impl<E: Dtype> ElementwiseKernel<E> for HardSigmoidKernelOp {
    fn compute(&self, io: &mut [E], temp: &mut [E]) {
        debug_assert_eq!(io.len(), temp.len());
        multiply_scalar(io, constant(1.0 / 6.0));
        add_scalar(io, constant(0.5));
        assign(temp, E::one());
        minimum(io, temp);
        zeros(temp);
        maximum(io, temp);
    }
}

/// Scalar reference of [HardSigmoidKernelOp], rounding after every step the
/// same way the vector pipeline does.
pub fn hard_sigmoid_scalar<E: Dtype>(x: E) -> E {
    let mut io = [x];
    let mut temp = [E::zero()];
    HardSigmoidKernelOp.compute(&mut io, &mut temp);
    io[0]
}

#[inline(always)]
fn constant<E: Dtype>(x: f64) -> E {
    // every Dtype is a float that can represent (a rounding of) any finite f64
    E::from_f64(x).unwrap_or_else(E::nan)
}

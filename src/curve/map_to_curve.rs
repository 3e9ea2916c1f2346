//! Fouque-Tibouchi map to BN254 G1, matching the evmbls verifier family.
//!
//! For curve y² = x³ + 3 the map tries the three candidate x-coordinates
//!   x1 = (sqrt(-3) - 1)/2 - t·w
//!   x2 = -1 - x1
//!   x3 = 1 + 1/w²          with w = sqrt(-3)·t / (t² + 4)
//! and takes the first whose RHS is a square. The square root is the
//! principal root a^((p+1)/4) and the sign of y follows the Legendre symbol
//! of t, byte-compatible with the on-chain implementation. Constant-time
//! behavior is not a goal; inputs are public hash outputs.

use ark_bn254::{Fq, G1Affine};
use ark_ff::{Field, LegendreSymbol, MontFp, One, Zero};

/// sqrt(-3), principal root.
const SQRT_NEG_3: Fq =
    MontFp!("4407920970296243842837207485651524041948558517760411303933");

/// (sqrt(-3) - 1) / 2
const SQRT_NEG_3_MINUS_1_HALVED: Fq =
    MontFp!("2203960485148121921418603742825762020974279258880205651966");

pub(super) fn map_to_g1(t: Fq) -> G1Affine {
    // w = sqrt(-3)·t / (t² + 4); inv0 convention, zero maps through x1
    let denominator = t.square() + Fq::from(4u64);
    let w = SQRT_NEG_3 * t * denominator.inverse().unwrap_or_else(Fq::zero);

    let x1 = SQRT_NEG_3_MINUS_1_HALVED - t * w;
    let x2 = -Fq::one() - x1;
    let x3 = Fq::one() + w.square().inverse().unwrap_or_else(Fq::zero);

    let flip_y = t.legendre() == LegendreSymbol::QuadraticNonResidue;
    for x in [x1, x2, x3] {
        let y_squared = x * x.square() + Fq::from(3u64);
        if let Some(y) = y_squared.sqrt() {
            let y = if flip_y { -y } else { y };
            return G1Affine::new_unchecked(x, y);
        }
    }
    // one of the three candidates is always square for this curve
    unreachable!("Fouque-Tibouchi candidate exhaustion")
}

//! GF(256) Reed-Solomon decoding for the ECC 200 error correction scheme.
//!
//! The field is fixed at 8 bits per symbol with primitive polynomial
//! `1 + x^2 + x^3 + x^5 + x^8`, first consecutive root exponent `B0 = 1`
//! and primitive root exponent `1` — the ECC 200 convention, not the CCSDS
//! basis some Reed-Solomon implementations default to. Parity length varies
//! per symbol size (see the IEC 16022 size table) but the field itself does
//! not, so the log/antilog tables are computed once and reused.

mod gf;

use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::instrument;

pub use gf::GfTables;

/// Total codeword alphabet size for an 8-bit symbol field (`2^8 - 1`).
pub const FIELD_SIZE: usize = 255;

/// Errors produced while decoding a Reed-Solomon block.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsError {
    #[error("received word length {len} exceeds the field size ({FIELD_SIZE})")]
    WordTooLong { len: usize },
    #[error("too many erasures ({count}) for {parity} parity symbols")]
    TooManyErasures { count: usize, parity: usize },
    #[error("error-plus-erasure locator degree does not match its root count")]
    UncorrectableLocator,
    #[error("Forney denominator vanished while evaluating an error location")]
    ZeroForneyDenominator,
    #[error("corrected error count exceeds the code's error-correcting capacity")]
    TooManyErrors,
    #[error("pad region of a shortened codeword is non-zero after correction")]
    NonZeroPadRegion,
}

/// Outcome of a successful decode: error/erasure counts for unused-error-correction
/// accounting (spec §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RsOutcome {
    pub errors: usize,
    pub erasures: usize,
}

/// A Reed-Solomon decoder bound to the ECC 200 GF(256) field.
///
/// Stateless beyond the precomputed log/antilog tables, so one instance can
/// be reused across every symbol size a caller decodes.
pub struct ReedSolomonDecoder {
    tables: GfTables,
}

impl Default for ReedSolomonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReedSolomonDecoder {
    pub fn new() -> Self {
        Self {
            tables: GfTables::ecc200(),
        }
    }

    /// Decode and correct `word` (data codewords followed by parity
    /// codewords, in that order, matching spec §4.10's convention)
    /// in place. `erasures` are indices into `word` whose values are
    /// already known to be unreliable.
    ///
    /// On success, `word[..word.len() - parity_len]` holds the corrected
    /// data codewords and the pad region (positions beyond the original
    /// `data_len` spec data length, if the code is shortened) is verified
    /// to be zero.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, word), fields(word_len = word.len(), parity_len)))]
    pub fn decode(
        &self,
        word: &mut [u8],
        parity_len: usize,
        erasures: &[usize],
    ) -> Result<RsOutcome, RsError> {
        if word.len() > FIELD_SIZE {
            return Err(RsError::WordTooLong { len: word.len() });
        }
        if erasures.len() >= parity_len {
            return Err(RsError::TooManyErasures {
                count: erasures.len(),
                parity: parity_len,
            });
        }

        let data_len = word.len() - parity_len;
        let n = word.len();
        let nmk = parity_len;
        let a0 = FIELD_SIZE as i32;
        let alpha = &self.tables.alpha_to;
        let index = &self.tables.index_of;

        let modnn = |mut x: i32| -> i32 {
            while x >= FIELD_SIZE as i32 {
                x -= FIELD_SIZE as i32;
                x = (x >> 8) + (x & FIELD_SIZE as i32);
            }
            x
        };

        let mut data = vec![0i32; n];
        for (i, &b) in word.iter().enumerate() {
            data[i] = b as i32;
        }

        // Syndromes: S_j = data(alpha^j), j = 1..=nmk, in polynomial form.
        let mut s = vec![0i32; nmk + 1];
        for sj in s.iter_mut().skip(1) {
            *sj = data[0];
        }
        for j in 1..n {
            if data[j] == 0 {
                continue;
            }
            let tmp = index[data[j] as usize];
            for i in 1..=nmk {
                let x = modnn(tmp + (i as i32 - 1) * j as i32);
                s[i] ^= alpha[x as usize];
            }
        }

        let mut syn_error = 0;
        for sj in s.iter_mut().skip(1) {
            syn_error |= *sj;
            *sj = index[*sj as usize];
        }
        if syn_error == 0 {
            return Ok(RsOutcome {
                errors: 0,
                erasures: erasures.len(),
            });
        }

        let no_eras = erasures.len();
        let mut lambda = vec![0i32; nmk + 1];
        lambda[0] = 1;
        if no_eras > 0 {
            let x = modnn(erasures[0] as i32);
            lambda[1] = alpha[x as usize];
            for i in 1..no_eras {
                let u = modnn(erasures[i] as i32);
                for j in (1..=i + 1).rev() {
                    let tmp = index[lambda[j - 1] as usize];
                    if tmp != a0 {
                        let tmp2 = modnn(u + tmp);
                        lambda[j] ^= alpha[tmp2 as usize];
                    }
                }
            }
        }

        let mut b = vec![0i32; nmk + 1];
        for (i, bi) in b.iter_mut().enumerate() {
            *bi = index[lambda[i] as usize];
        }

        let mut el = no_eras;
        let mut r = no_eras;
        while r + 1 <= nmk {
            r += 1;
            let mut discr_r = 0;
            for i in 0..r {
                if lambda[i] != 0 && s[r - i] != a0 {
                    let x = modnn(index[lambda[i] as usize] + s[r - i]);
                    discr_r ^= alpha[x as usize];
                }
            }
            let discr_r = index[discr_r as usize];
            if discr_r == a0 {
                for ci in (0..nmk).rev() {
                    b[ci + 1] = b[ci];
                }
                b[0] = a0;
            } else {
                let mut t = vec![0i32; nmk + 1];
                t[0] = lambda[0];
                for i in 0..nmk {
                    if b[i] != a0 {
                        let x = modnn(discr_r + b[i]);
                        t[i + 1] = lambda[i + 1] ^ alpha[x as usize];
                    } else {
                        t[i + 1] = lambda[i + 1];
                    }
                }
                if 2 * el <= r + no_eras - 1 {
                    el = r + no_eras - el;
                    for i in 0..=nmk {
                        let x = modnn(index[lambda[i] as usize] - discr_r + FIELD_SIZE as i32);
                        b[i] = if lambda[i] == 0 { a0 } else { x };
                    }
                } else {
                    for ci in (0..nmk).rev() {
                        b[ci + 1] = b[ci];
                    }
                    b[0] = a0;
                }
                lambda[..nmk + 1].copy_from_slice(&t[..nmk + 1]);
            }
        }

        let mut deg_lambda = 0;
        for (i, l) in lambda.iter_mut().enumerate() {
            *l = index[*l as usize];
            if *l != a0 {
                deg_lambda = i;
            }
        }

        // Chien search.
        let mut reg = vec![0i32; nmk + 1];
        reg[1..=nmk].copy_from_slice(&lambda[1..=nmk]);
        let mut root = vec![0i32; nmk];
        let mut loc = vec![0i32; nmk];
        let mut count = 0usize;
        let mut k = FIELD_SIZE as i32 - 1;
        for i in 1..=FIELD_SIZE {
            let mut q = 1;
            for j in (1..=deg_lambda).rev() {
                if reg[j] != a0 {
                    let x = modnn(reg[j] + j as i32);
                    reg[j] = x;
                    q ^= alpha[x as usize];
                }
            }
            if q != 0 {
                k = modnn(FIELD_SIZE as i32 + k - 1);
                continue;
            }
            root[count] = i as i32;
            loc[count] = k;
            count += 1;
            if count == deg_lambda {
                break;
            }
            k = modnn(FIELD_SIZE as i32 + k - 1);
        }
        if deg_lambda != count {
            return Err(RsError::UncorrectableLocator);
        }

        // Error evaluator polynomial omega(x) = s(x)*lambda(x) mod x^(n-k).
        let mut omega = vec![0i32; nmk + 1];
        let mut deg_omega = 0;
        for i in 0..nmk {
            let mut tmp = 0;
            let jmax = deg_lambda.min(i);
            for j in (0..=jmax).rev() {
                if s[i + 1 - j] != a0 && lambda[j] != a0 {
                    let x = modnn(s[i + 1 - j] + lambda[j]);
                    tmp ^= alpha[x as usize];
                }
            }
            if tmp != 0 {
                deg_omega = i;
            }
            omega[i] = index[tmp as usize];
        }
        omega[nmk] = a0;

        for j in (0..count).rev() {
            let mut num1 = 0;
            for i in (0..=deg_omega).rev() {
                if omega[i] != a0 {
                    let x = modnn(omega[i] + i as i32 * root[j]);
                    num1 ^= alpha[x as usize];
                }
            }
            let x = modnn(root[j] * 0 + FIELD_SIZE as i32); // (B0-1) == 0
            let num2 = alpha[x as usize];

            let min_value = deg_lambda.min(nmk - 1);
            let mut den = 0;
            let mut i = (min_value as i32) & !1;
            while i >= 0 {
                let ii = i as usize;
                if lambda[ii + 1] != a0 {
                    let x = modnn(lambda[ii + 1] + i * root[j]);
                    den ^= alpha[x as usize];
                }
                i -= 2;
            }
            if den == 0 {
                return Err(RsError::ZeroForneyDenominator);
            }
            if num1 != 0 {
                let x = modnn(index[num1 as usize] + index[num2 as usize] + FIELD_SIZE as i32
                    - index[den as usize]);
                let loc_j = loc[j] as usize;
                data[loc_j] ^= alpha[x as usize];
            }
        }

        if count as f64 - no_eras as f64 > ((nmk - no_eras) as f64 / 2.0).floor() {
            return Err(RsError::TooManyErrors);
        }
        for &d in data.iter().take(n).skip(data_len) {
            if d != 0 {
                return Err(RsError::NonZeroPadRegion);
            }
        }

        for (slot, &d) in word.iter_mut().zip(data.iter()) {
            *slot = d as u8;
        }

        Ok(RsOutcome {
            errors: count,
            erasures: no_eras,
        })
    }
}

/// Fraction of error-correction capacity left unused after a decode,
/// clipped to `[0, 1]` (spec §4.10).
pub fn unused_error_correction(codewords: usize, parity: usize, outcome: RsOutcome) -> f64 {
    if codewords <= parity {
        return 0.0;
    }
    let capacity = 8.0 * (codewords - parity) as f64;
    let used = (outcome.erasures + 2 * outcome.errors) as f64;
    (1.0 - used / capacity).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(tables: &GfTables, data: &[u8], parity_len: usize) -> Vec<u8> {
        // Systematic encoder: parity = remainder of data(x)*x^parity_len / g(x).
        let gg = gf::generator_poly(tables, parity_len);
        let mut reg = vec![0i32; parity_len];
        for &d in data {
            let feedback = tables.index_of[(d as i32 ^ reg[0]) as usize];
            if feedback != FIELD_SIZE as i32 {
                for j in 1..parity_len {
                    reg[j - 1] = reg[j]
                        ^ tables.alpha_to
                            [((feedback + gg[parity_len - j]) % FIELD_SIZE as i32) as usize];
                }
                reg[parity_len - 1] =
                    tables.alpha_to[((feedback + gg[0]) % FIELD_SIZE as i32) as usize];
            } else {
                reg.rotate_left(1);
                reg[parity_len - 1] = 0;
            }
        }
        let mut out = data.to_vec();
        out.extend(reg.iter().map(|&x| x as u8));
        out
    }

    #[test]
    fn uncorrupted_word_decodes_with_no_errors() {
        let rs = ReedSolomonDecoder::new();
        let data = b"123".to_vec();
        let mut word = encode(&rs.tables, &data, 5);
        let before = word.clone();
        let outcome = rs.decode(&mut word, 5, &[]).unwrap();
        assert_eq!(outcome, RsOutcome { errors: 0, erasures: 0 });
        assert_eq!(word, before);
    }

    #[test]
    fn single_byte_error_is_corrected() {
        let rs = ReedSolomonDecoder::new();
        let data: Vec<u8> = (0..10).collect();
        let mut word = encode(&rs.tables, &data, 7);
        let original = word.clone();
        word[3] ^= 0xA5;
        let outcome = rs.decode(&mut word, 7, &[]).unwrap();
        assert_eq!(outcome.errors, 1);
        assert_eq!(word, original);
    }

    #[test]
    fn erasure_at_known_position_is_corrected() {
        let rs = ReedSolomonDecoder::new();
        let data: Vec<u8> = (0..10).collect();
        let mut word = encode(&rs.tables, &data, 7);
        let original = word.clone();
        word[5] = 0;
        let outcome = rs.decode(&mut word, 7, &[5]).unwrap();
        assert_eq!(outcome.erasures, 1);
        assert_eq!(word, original);
    }

    #[test]
    fn too_many_errors_is_rejected() {
        let rs = ReedSolomonDecoder::new();
        let data: Vec<u8> = (0..10).collect();
        let mut word = encode(&rs.tables, &data, 5); // corrects up to 2 errors
        word[0] ^= 1;
        word[1] ^= 1;
        word[2] ^= 1;
        let result = rs.decode(&mut word, 5, &[]);
        assert!(result.is_err());
    }

    #[test]
    fn unused_error_correction_is_full_when_clean() {
        let u = unused_error_correction(20, 5, RsOutcome::default());
        assert!((u - 1.0).abs() < 1e-9);
    }
}

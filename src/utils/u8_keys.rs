//! Byte-key search over the sorted key tables of the narrow node layouts.
//!
//! The 16-wide table gets a SIMD equality scan on platforms that have one
//! (SSE2, NEON), with binary search as the portable fallback. The 4-wide
//! table is always scanned linearly; at that width a branchy binary search
//! loses to the straight-line compare.

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
#[inline]
fn x86_64_sse2_find_key_16(key: u8, keys: &[u8; 16], num_children: usize) -> Option<usize> {
    use std::arch::x86_64::{
        __m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_movemask_epi8, _mm_set1_epi8,
    };

    let bitfield = unsafe {
        let key_vec = _mm_set1_epi8(key as i8);
        let cmp = _mm_cmpeq_epi8(key_vec, _mm_loadu_si128(keys.as_ptr() as *const __m128i));
        // Lanes beyond the populated count hold filler and must not match.
        let mask = (1i32 << num_children) - 1;
        _mm_movemask_epi8(cmp) & mask
    };

    if bitfield != 0 {
        return Some(bitfield.trailing_zeros() as usize);
    }
    None
}

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
#[inline]
fn x86_64_sse2_lower_bound_16(key: u8, keys: &[u8; 16], num_children: usize) -> Option<usize> {
    use std::arch::x86_64::{
        __m128i, _mm_cmplt_epi8, _mm_loadu_si128, _mm_movemask_epi8, _mm_set1_epi8,
        _mm_xor_si128,
    };

    let bitfield = unsafe {
        // cmplt is a signed compare; flipping the sign bit of both sides
        // turns it into the unsigned byte order the key tables are sorted by.
        let bias = _mm_set1_epi8(-128);
        let key_vec = _mm_xor_si128(_mm_set1_epi8(key as i8), bias);
        let keys_vec = _mm_xor_si128(_mm_loadu_si128(keys.as_ptr() as *const __m128i), bias);
        let cmp = _mm_cmplt_epi8(key_vec, keys_vec);
        let mask = (1i32 << num_children) - 1;
        _mm_movemask_epi8(cmp) & mask
    };

    if bitfield != 0 {
        return Some(bitfield.trailing_zeros() as usize);
    }
    None
}

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
#[inline]
fn aarch64_neon_find_key_16(key: u8, keys: &[u8; 16], num_children: usize) -> Option<usize> {
    use std::arch::aarch64::*;
    unsafe {
        let key_vec = vdupq_n_u8(key);
        let keys_vec = vld1q_u8(keys.as_ptr());
        let cmp = vceqq_u8(key_vec, keys_vec);

        // NEON has no movemask; narrow the 8-bit lanes to 4-bit nibbles and
        // read the result out of a single 64-bit lane instead.
        let narrowed = vshrn_n_u16::<4>(vreinterpretq_u16_u8(cmp));
        let matches = vget_lane_u64::<0>(vreinterpret_u64_u8(narrowed));

        if matches != 0 {
            let idx = (matches.trailing_zeros() >> 2) as usize;
            if idx < num_children {
                return Some(idx);
            }
        }
        None
    }
}

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
#[inline]
fn aarch64_neon_lower_bound_16(key: u8, keys: &[u8; 16], num_children: usize) -> Option<usize> {
    use std::arch::aarch64::*;
    unsafe {
        let key_vec = vdupq_n_u8(key);
        let keys_vec = vld1q_u8(keys.as_ptr());
        // vclt is an unsigned compare, so no sign-bias dance is needed here.
        let cmp = vcltq_u8(key_vec, keys_vec);

        let narrowed = vshrn_n_u16::<4>(vreinterpretq_u16_u8(cmp));
        let matches = vget_lane_u64::<0>(vreinterpret_u64_u8(narrowed));

        if matches != 0 {
            let idx = (matches.trailing_zeros() >> 2) as usize;
            if idx < num_children {
                return Some(idx);
            }
        }
        None
    }
}

fn binary_find_key(key: u8, keys: &[u8], num_children: usize) -> Option<usize> {
    let mut left = 0;
    let mut right = num_children;
    while left < right {
        let mid = (left + right) / 2;
        match keys[mid].cmp(&key) {
            std::cmp::Ordering::Less => left = mid + 1,
            std::cmp::Ordering::Equal => return Some(mid),
            std::cmp::Ordering::Greater => right = mid,
        }
    }
    None
}

/// Position of `key` in a sorted key table, or `None` if absent. Only the
/// first `num_children` entries are meaningful; the rest is filler.
#[allow(unreachable_code)]
pub fn u8_keys_find_key_position<const WIDTH: usize>(
    key: u8,
    keys: &[u8; WIDTH],
    num_children: usize,
) -> Option<usize> {
    if WIDTH <= 4 {
        return (0..num_children).find(|&i| keys[i] == key);
    }

    if WIDTH == 16 {
        #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
        {
            return x86_64_sse2_find_key_16(key, keys[..16].try_into().unwrap(), num_children);
        }

        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        {
            return aarch64_neon_find_key_16(key, keys[..16].try_into().unwrap(), num_children);
        }
    }

    binary_find_key(key, keys, num_children)
}

/// Position at which `key` keeps a sorted key table sorted when inserted;
/// `num_children` when it belongs at the end.
#[allow(unreachable_code)]
pub fn u8_keys_find_insert_position<const WIDTH: usize>(
    key: u8,
    keys: &[u8; WIDTH],
    num_children: usize,
) -> usize {
    if WIDTH == 16 {
        #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
        {
            return x86_64_sse2_lower_bound_16(key, keys[..16].try_into().unwrap(), num_children)
                .unwrap_or(num_children);
        }

        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        {
            return aarch64_neon_lower_bound_16(key, keys[..16].try_into().unwrap(), num_children)
                .unwrap_or(num_children);
        }
    }

    (0..num_children)
        .find(|&i| key < keys[i])
        .unwrap_or(num_children)
}

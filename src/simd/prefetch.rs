//! Software prefetch hints.
//!
//! A hint never faults and never changes program results; on targets without a
//! supported instruction it compiles to nothing.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{_mm_prefetch, _MM_HINT_NTA};

/// Requests the cache line holding `value` with a non-temporal hint.
///
/// Takes a reference so the address is always inside a live allocation.
#[inline(always)]
pub fn prefetch_nta(value: &f64) {
    let ptr = value as *const f64;

    #[cfg(target_arch = "x86_64")]
    unsafe {
        _mm_prefetch::<_MM_HINT_NTA>(ptr as *const i8);
    }

    // PLDL1STRM: prefetch for load, L1, streaming (non-temporal)
    #[cfg(target_arch = "aarch64")]
    unsafe {
        std::arch::asm!(
            "prfm pldl1strm, [{addr}]",
            addr = in(reg) ptr,
            options(nostack, readonly, preserves_flags)
        );
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    let _ = ptr;
}

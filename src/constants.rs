//! Architectural constants of the vector core.

/// Maximum vector length: the width, in words, of every vector register.
pub const MVL: u32 = 64;

/// Number of scalar registers in the SRF.
pub const SRF_COUNT: usize = 8;

/// Number of vector registers in the VRF.
pub const VRF_COUNT: usize = 8;

/// Size of SDMEM in words (2^13, about 32 KiB).
pub const SDMEM_WORDS: u32 = 1 << 13;

/// Default size of VDMEM in words. Implementations must support at least this many;
/// the harness may request a larger size when constructing `WordMemory`.
pub const VDMEM_WORDS_MIN: u32 = 1 << 17;

/// Maximum number of instructions IMEM can hold.
pub const IMEM_MAX: usize = 1 << 16;

//! Shared inputs for the SafeStr benchmarks.

/// A NUL-terminated buffer of `len` copies of `fill`, with `needle` at
/// every `stride`-th position.
#[must_use]
pub fn haystack(len: usize, fill: u8, needle: u8, stride: usize) -> Vec<u8> {
    let mut buf: Vec<u8> = (0..len)
        .map(|i| if stride > 0 && i % stride == 0 { needle } else { fill })
        .collect();
    buf.push(0);
    buf
}

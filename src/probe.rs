// Quadratic probe sequence over a bucket array of fixed length.
//
// Yields `(start + k^2) % len` for k = 0, 1, 2, ... The offset is advanced by
// the odd number `2k - 1` each step, so no square is ever materialised and
// nothing overflows for any `len` that fits in memory.
#[derive(Clone, Debug)]
pub(crate) struct QuadraticProbe {
    start: usize,
    // k^2 % len
    offset: usize,
    // 2k + 1 % len, the increment taking offset from k^2 to (k+1)^2
    step: usize,
    len: usize,
}

impl QuadraticProbe {
    pub fn new(hash: u64, len: usize) -> Self {
        assert!(len > 0, "probe over an empty bucket array");
        let start = (hash % len as u64) as usize;
        QuadraticProbe {
            start,
            offset: 0,
            step: 1 % len,
            len,
        }
    }
}

impl Iterator for QuadraticProbe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let i = wrap_add(self.start, self.offset, self.len);
        self.offset = wrap_add(self.offset, self.step, self.len);
        self.step = wrap_add(self.step, 2 % self.len, self.len);
        Some(i)
    }
}

// (a + b) % len for a, b < len without overflow.
#[inline]
fn wrap_add(a: usize, b: usize, len: usize) -> usize {
    if a >= len - b {
        a - (len - b)
    } else {
        a + b
    }
}

//! Strided 4-D tensor views over `f32` buffers.
//!
//! `TensorView` borrows an NHWC buffer with shape `[batch, rows, cols, channels]`.
//! Strides count elements between consecutive batches, rows and columns; the
//! channel stride is always 1 so one grid cell's channels form a contiguous
//! slice. Strides larger than the packed extent represent padding.

use crate::util::{YoloDecError, YoloDecResult};

pub mod preprocess;

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed NHWC tensor view with explicit strides.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    shape: [usize; 4],
    strides: [usize; 3],
}

impl<'a> TensorView<'a> {
    /// Creates a packed view where strides follow directly from `shape`.
    pub fn from_slice(data: &'a [f32], shape: [usize; 4]) -> YoloDecResult<Self> {
        let strides = packed_strides(shape)?;
        Self::new(data, shape, strides)
    }

    /// Creates a view with explicit `[batch, row, col]` element strides.
    pub fn new(data: &'a [f32], shape: [usize; 4], strides: [usize; 3]) -> YoloDecResult<Self> {
        let needed = required_len(shape, strides)?;
        if data.len() < needed {
            return Err(YoloDecError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            shape,
            strides,
        })
    }

    /// Returns `[batch, rows, cols, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    /// Returns the `[batch, row, col]` element strides.
    pub fn strides(&self) -> [usize; 3] {
        self.strides
    }

    pub fn rows(&self) -> usize {
        self.shape[1]
    }

    pub fn cols(&self) -> usize {
        self.shape[2]
    }

    pub fn channels(&self) -> usize {
        self.shape[3]
    }

    /// Returns the backing slice including any padding.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the element at `(batch, row, col, channel)` if it is in bounds.
    pub fn get(&self, batch: usize, row: usize, col: usize, channel: usize) -> Option<f32> {
        let [b, r, c, ch] = self.shape;
        if batch >= b || row >= r || col >= c || channel >= ch {
            return None;
        }
        let idx = self.offset(batch, row, col)?.checked_add(channel)?;
        self.data.get(idx).copied()
    }

    /// Returns the contiguous channel block of batch 0 at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&'a [f32]> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        let start = self.offset(0, row, col)?;
        let end = start.checked_add(self.channels())?;
        self.data.get(start..end)
    }

    fn offset(&self, batch: usize, row: usize, col: usize) -> Option<usize> {
        let [bs, rs, cs] = self.strides;
        batch
            .checked_mul(bs)?
            .checked_add(row.checked_mul(rs)?)?
            .checked_add(col.checked_mul(cs)?)
    }
}

/// Owned, packed NHWC tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedTensor {
    data: Vec<f32>,
    shape: [usize; 4],
}

impl OwnedTensor {
    /// Wraps a packed buffer whose length must equal the product of `shape`.
    pub fn new(data: Vec<f32>, shape: [usize; 4]) -> YoloDecResult<Self> {
        let needed = packed_len(shape)?;
        if data.len() < needed {
            return Err(YoloDecError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(YoloDecError::InvalidDimensions { shape });
        }
        Ok(Self { data, shape })
    }

    /// Creates a zero-filled tensor.
    pub fn zeros(shape: [usize; 4]) -> YoloDecResult<Self> {
        let len = packed_len(shape)?;
        Ok(Self {
            data: vec![0.0; len],
            shape,
        })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Sets the element at `(batch, row, col, channel)`.
    pub fn set(
        &mut self,
        batch: usize,
        row: usize,
        col: usize,
        channel: usize,
        value: f32,
    ) -> YoloDecResult<()> {
        let [b, r, c, ch] = self.shape;
        let checks = [(batch, b), (row, r), (col, c), (channel, ch)];
        for (index, len) in checks {
            if index >= len {
                return Err(YoloDecError::IndexOutOfBounds {
                    index,
                    len,
                    context: "tensor axis",
                });
            }
        }
        let idx = ((batch * r + row) * c + col) * ch + channel;
        self.data[idx] = value;
        Ok(())
    }

    /// Returns a borrowed packed view.
    pub fn view(&self) -> TensorView<'_> {
        let [_, r, c, ch] = self.shape;
        TensorView {
            data: &self.data,
            shape: self.shape,
            strides: [r * c * ch, c * ch, ch],
        }
    }
}

fn packed_len(shape: [usize; 4]) -> YoloDecResult<usize> {
    if shape.iter().any(|&d| d == 0) {
        return Err(YoloDecError::InvalidDimensions { shape });
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(YoloDecError::InvalidDimensions { shape })
}

fn packed_strides(shape: [usize; 4]) -> YoloDecResult<[usize; 3]> {
    packed_len(shape)?;
    let [_, r, c, ch] = shape;
    Ok([r * c * ch, c * ch, ch])
}

fn required_len(shape: [usize; 4], strides: [usize; 3]) -> YoloDecResult<usize> {
    if shape.iter().any(|&d| d == 0) {
        return Err(YoloDecError::InvalidDimensions { shape });
    }
    let [b, r, c, ch] = shape;
    let [bs, rs, cs] = strides;
    if cs < ch {
        return Err(YoloDecError::InvalidStride {
            axis: 2,
            stride: cs,
            min: ch,
        });
    }
    let min_rs = c
        .checked_mul(cs)
        .ok_or(YoloDecError::InvalidDimensions { shape })?;
    if rs < min_rs {
        return Err(YoloDecError::InvalidStride {
            axis: 1,
            stride: rs,
            min: min_rs,
        });
    }
    let min_bs = r
        .checked_mul(rs)
        .ok_or(YoloDecError::InvalidDimensions { shape })?;
    if b > 1 && bs < min_bs {
        return Err(YoloDecError::InvalidStride {
            axis: 0,
            stride: bs,
            min: min_bs,
        });
    }
    (b - 1)
        .checked_mul(bs)
        .and_then(|v| v.checked_add((r - 1).checked_mul(rs)?))
        .and_then(|v| v.checked_add((c - 1).checked_mul(cs)?))
        .and_then(|v| v.checked_add(ch))
        .ok_or(YoloDecError::InvalidDimensions { shape })
}

//! FFT overlap-add block convolution for long feedforward kernels.
//!
//! The transform size is the next power of two at or above
//! `CONVOLVE_BASE + 2 * kernel_len`. Each FFT consumes up to
//! `fft_size - kernel_len + 1` new input samples, so the linear convolution
//! of one chunk fits without wrap-around; the `kernel_len - 1` sample tail is
//! carried into the next chunk.

use crate::error::{AnalysisError, Result};
use crate::fft::Fft;

/// Base block length added to twice the kernel length when sizing the FFT.
pub const CONVOLVE_BASE: usize = 512;

/// FFT size used for a kernel of `kernel_len` taps.
pub fn convolution_size(kernel_len: usize) -> usize {
    (CONVOLVE_BASE + 2 * kernel_len).next_power_of_two()
}

/// Streaming overlap-add convolver with a fixed kernel.
#[derive(Debug, Clone)]
pub struct BlockConvolver {
    fft: Fft,
    /// Interleaved spectrum of the zero-padded kernel
    kernel_spectrum: Vec<f64>,
    kernel_len: usize,
    /// Largest chunk one transform can take
    block_size: usize,
    /// Interleaved scratch of `2 * fft_size`
    work: Vec<f64>,
    /// Tail carried into the next chunk, `kernel_len - 1` samples
    overlap: Vec<f64>,
}

impl BlockConvolver {
    /// Prepares a convolver for `kernel`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::EmptyKernel`] for an empty kernel.
    pub fn new(kernel: &[f64]) -> Result<Self> {
        if kernel.is_empty() {
            return Err(AnalysisError::EmptyKernel);
        }
        let size = convolution_size(kernel.len());
        let fft = Fft::new(size)?;
        let kernel_spectrum = fft.forward_real(kernel);

        Ok(Self {
            kernel_spectrum,
            kernel_len: kernel.len(),
            block_size: size - kernel.len() + 1,
            work: vec![0.0; 2 * size],
            overlap: vec![0.0; kernel.len() - 1],
            fft,
        })
    }

    /// FFT size in complex points.
    pub fn fft_size(&self) -> usize {
        self.fft.size()
    }

    /// Kernel length in taps.
    pub fn kernel_len(&self) -> usize {
        self.kernel_len
    }

    /// Maximum number of input samples per transform.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Clears the carried tail.
    pub fn reset(&mut self) {
        self.overlap.fill(0.0);
    }

    /// Convolves `input` into `output`, continuing from previous calls.
    ///
    /// Processes `min(input.len(), output.len())` samples in chunks of at most
    /// [`block_size`](Self::block_size).
    pub fn process(&mut self, input: &[f64], output: &mut [f64]) {
        let n = input.len().min(output.len());
        let mut pos = 0;
        while pos < n {
            let m = (n - pos).min(self.block_size);
            self.process_chunk(&input[pos..pos + m], &mut output[pos..pos + m]);
            pos += m;
        }
    }

    fn process_chunk(&mut self, input: &[f64], output: &mut [f64]) {
        let m = input.len();
        let size = self.fft.size();

        self.work.fill(0.0);
        for (i, &x) in input.iter().enumerate() {
            self.work[2 * i] = x;
        }
        // Scratch length always matches the engine
        let _ = self.fft.transform(&mut self.work, false);

        for (w, k) in self.work.chunks_exact_mut(2).zip(self.kernel_spectrum.chunks_exact(2)) {
            let re = w[0] * k[0] - w[1] * k[1];
            let im = w[0] * k[1] + w[1] * k[0];
            w[0] = re;
            w[1] = im;
        }
        let _ = self.fft.transform(&mut self.work, true);

        let scale = 1.0 / size as f64;
        let tail = self.overlap.len();
        for (i, y) in output.iter_mut().enumerate() {
            let carried = if i < tail { self.overlap[i] } else { 0.0 };
            *y = self.work[2 * i] * scale + carried;
        }

        // Shift the old tail down by m and add this chunk's spill-over
        for i in 0..tail {
            let carried = if i + m < tail { self.overlap[i + m] } else { 0.0 };
            self.overlap[i] = carried + self.work[2 * (m + i)] * scale;
        }
    }
}

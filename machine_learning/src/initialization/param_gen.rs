/// Draws the initial values of a network's parameters, a bounded amount at a time.
pub trait ParamGen {
    /// Samples at most `n` parameters, `None` once the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;

    /// Samples exactly `n` parameters.
    ///
    /// # Returns
    /// `None` if the generator can't provide `n` more values.
    fn sample_exact(&mut self, n: usize) -> Option<Vec<f32>> {
        if n == 0 {
            return Some(Vec::new());
        }

        self.sample(n).filter(|sample| sample.len() == n)
    }
}

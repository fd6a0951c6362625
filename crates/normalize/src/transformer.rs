/// A stage that may learn state from a corpus (`fit`) and then maps inputs
/// to outputs one at a time (`transform`).
pub trait Transformer {
    type Input;
    type Output;

    /// Learns from `inputs`. Stateless stages return themselves unchanged.
    fn fit<I>(self, _inputs: I) -> Self
    where
        I: IntoIterator<Item = Self::Input>,
        Self: Sized,
    {
        self
    }

    fn transform_one(&self, input: Self::Input) -> Self::Output;

    /// Lazily maps every input; nothing is consumed until the result is
    /// iterated.
    fn transform<'a, I>(&'a self, inputs: I) -> impl Iterator<Item = Self::Output> + 'a
    where
        I: IntoIterator<Item = Self::Input>,
        I::IntoIter: 'a,
        Self: Sized,
    {
        inputs.into_iter().map(move |input| self.transform_one(input))
    }
}

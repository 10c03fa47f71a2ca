//! Truncated credit assignment across recurrent steps.
//!
//! A recurrent unit's latent output depends on every earlier input through
//! the hidden state. Readout heads only ever see a [`Detached`] copy of that
//! latent, so a trainer that differentiates the readout stops at the current
//! step and never unrolls through `(h, c)` into previous steps.
//!
//! The wrapper has no numeric effect on the forward pass. It exists so the
//! truncation is visible in signatures: a head that takes `&Detached<_>`
//! cannot be handed the live recurrent state by mistake.

/// A value severed from the recurrent history that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Detached<T>(T);

impl<T> Detached<T> {
    /// Sever `value` from its history. Takes ownership of a copy, never a view
    /// into recurrent state.
    pub fn sever(value: T) -> Self {
        Self(value)
    }

    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sever_keeps_values() {
        let latent = array![0.25f32, -0.5];
        let detached = Detached::sever(latent.clone());
        assert_eq!(detached.get(), &latent);
        assert_eq!(detached.into_inner(), latent);
    }
}

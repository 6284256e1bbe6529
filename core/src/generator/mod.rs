use crate::*;
pub use balanced::*;

mod balanced;

/// Strategy that materialises mines onto a fresh grid.
pub trait GridGenerator {
    /// Returns an annotated grid holding `config.mines` mines, none of them on a
    /// `protected` cell.
    fn generate(
        &self,
        config: &GameConfig,
        protected: &ProtectedCells,
        rng: &mut impl RandomSource,
    ) -> Grid;
}

use std::ops::{Add, AddAssign, Mul};

/// A constraint penalty evaluated on both sides of a proposal. Lower is preferred.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Psi {
    /// Penalty of the plan after the move.
    pub new: f64,
    /// Penalty of the plan before the move.
    pub old: f64,
}

impl Psi {
    #[inline] pub fn new(new: f64, old: f64) -> Self { Self { new, old } }

    /// Change in penalty caused by the move (`new - old`).
    #[inline] pub fn delta(&self) -> f64 { self.new - self.old }

    /// The `(new, old)` pair.
    #[inline] pub fn as_tuple(&self) -> (f64, f64) { (self.new, self.old) }
}

impl From<Psi> for (f64, f64) {
    fn from(psi: Psi) -> Self { psi.as_tuple() }
}

impl Add for Psi {
    type Output = Psi;
    fn add(self, rhs: Psi) -> Psi { Psi::new(self.new + rhs.new, self.old + rhs.old) }
}

impl AddAssign for Psi {
    fn add_assign(&mut self, rhs: Psi) {
        self.new += rhs.new;
        self.old += rhs.old;
    }
}

impl Mul<f64> for Psi {
    type Output = Psi;
    fn mul(self, weight: f64) -> Psi { Psi::new(self.new * weight, self.old * weight) }
}

impl std::iter::Sum for Psi {
    fn sum<I: Iterator<Item = Psi>>(iter: I) -> Psi { iter.fold(Psi::default(), Add::add) }
}

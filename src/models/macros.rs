use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul};

use serde::{Deserialize, Serialize};

/// Calories (kcal) plus protein, carbs and fat (grams).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    pub const ZERO: Macros = Macros {
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
    };

    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Multiply every field by `factor`.
    #[inline]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }

    /// True when all four fields are within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &Macros, tolerance: f64) -> bool {
        (self.calories - other.calories).abs() <= tolerance
            && (self.protein - other.protein).abs() <= tolerance
            && (self.carbs - other.carbs).abs() <= tolerance
            && (self.fat - other.fat).abs() <= tolerance
    }

    /// All fields are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .into_iter()
            .all(|v| v.is_finite() && v >= 0.0)
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, rhs: f64) -> Macros {
        self.scale(rhs)
    }
}

impl Div<f64> for Macros {
    type Output = Macros;

    fn div(self, rhs: f64) -> Macros {
        Macros {
            calories: self.calories / rhs,
            protein: self.protein / rhs,
            carbs: self.carbs / rhs,
            fat: self.fat / rhs,
        }
    }
}

impl Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Macros {
        iter.fold(Macros::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Macros> for Macros {
    fn sum<I: Iterator<Item = &'a Macros>>(iter: I) -> Macros {
        iter.copied().sum()
    }
}

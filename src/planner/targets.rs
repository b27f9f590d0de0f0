use serde::{Deserialize, Serialize};

use crate::models::{DayType, Macros};

/// Supplies a day's target macros, typically derived from TDEE, goal and
/// diet protocol. `None` means the target cannot be computed (missing
/// profile or goal settings).
pub trait TargetMacroSource {
    fn target_for(&self, day_type: DayType) -> Option<Macros>;
}

impl<F> TargetMacroSource for F
where
    F: Fn(DayType) -> Option<Macros>,
{
    fn target_for(&self, day_type: DayType) -> Option<Macros> {
        self(day_type)
    }
}

/// Targets fixed up front: a normal-day target plus optional carb-cycling
/// overrides. Low and high days fall back to the normal target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedTargets {
    #[serde(default)]
    pub normal: Option<Macros>,
    #[serde(default)]
    pub low: Option<Macros>,
    #[serde(default)]
    pub high: Option<Macros>,
}

impl FixedTargets {
    /// Same target for every day type.
    pub fn uniform(target: Macros) -> Self {
        Self {
            normal: Some(target),
            low: None,
            high: None,
        }
    }
}

impl TargetMacroSource for FixedTargets {
    fn target_for(&self, day_type: DayType) -> Option<Macros> {
        match day_type {
            DayType::Normal => self.normal,
            DayType::Low => self.low.or(self.normal),
            DayType::High => self.high.or(self.normal),
        }
    }
}

/// Mean of the available targets across `day_types`; `None` if none resolve.
pub fn average_target(source: &dyn TargetMacroSource, day_types: &[DayType]) -> Option<Macros> {
    let targets: Vec<Macros> = day_types
        .iter()
        .filter_map(|&t| source.target_for(t))
        .collect();
    if targets.is_empty() {
        return None;
    }
    let total: Macros = targets.iter().sum();
    Some(total / targets.len() as f64)
}

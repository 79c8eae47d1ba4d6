#[cfg(feature = "serde")]
use serde_with::DisplayFromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(strum::Display, strum::EnumString))]
pub enum Sex {
    #[default]
    #[cfg_attr(feature = "serde", strum(serialize = "M"))]
    Male,
    #[cfg_attr(feature = "serde", strum(serialize = "F"))]
    Female,
}

#[cfg_attr(feature = "serde", cfg_eval::cfg_eval, serde_with::serde_as)]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct User {
    pub id: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub age: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: f64,
    #[cfg_attr(feature = "serde", serde_as(as = "DisplayFromStr"), serde(default))]
    pub sex: Sex,
    #[cfg_attr(feature = "serde", serde(default))]
    pub activity_calories: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_calories: i32,
    #[cfg_attr(feature = "serde", serde(default, rename = "isSelected"))]
    pub selected: bool,
}

impl User {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: String::new(),
            age: 0,
            height: 0,
            weight: 0.0,
            sex: Sex::default(),
            activity_calories: 0,
            total_calories: 0,
            selected: false,
        }
    }

    /// Mifflin-St Jeor estimate from the current body stats.
    pub fn basal_metabolic_rate(&self) -> f64 {
        let base = 10.0 * self.weight + 6.25 * f64::from(self.height) - 5.0 * f64::from(self.age);
        match self.sex {
            Sex::Male => base + 5.0,
            Sex::Female => base - 161.0,
        }
    }

    /// Derives `total_calories` from the other fields. Truncates toward zero.
    pub fn recompute_total_calories(&mut self) {
        self.total_calories =
            (self.basal_metabolic_rate() + f64::from(self.activity_calories)) as i32;
    }
}

use crate::user::User;

/// One user's slice of the shared food portion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Share {
    pub user_id: u32,
    pub name: String,
    pub grams: f64,
}

impl Share {
    /// Nearest whole gram, as shown to the user.
    pub fn rounded_grams(&self) -> i64 {
        self.grams.round() as i64
    }
}

/// Splits `total_food_weight` grams across `selected` in proportion to each
/// user's calorie total. When the calorie totals sum to zero every share is
/// zero. Rounding of the individual shares is left to the caller, so the
/// rounded values may drift from the input weight by a gram or two.
pub fn allocate(selected: &[User], total_food_weight: f64, two_meals: bool) -> Vec<Share> {
    let total_calories: i32 = selected.iter().map(|user| user.total_calories).sum();

    selected
        .iter()
        .map(|user| {
            let base = if total_calories > 0 {
                f64::from(user.total_calories) / f64::from(total_calories) * total_food_weight
            } else {
                0.0
            };
            Share {
                user_id: user.id,
                name: user.name.clone(),
                grams: if two_meals { base / 2.0 } else { base },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_calories(id: u32, total_calories: i32) -> User {
        let mut user = User::new(id);
        user.name = format!("user-{}", id);
        user.total_calories = total_calories;
        user
    }

    #[test]
    fn shares_are_proportional_to_calorie_totals() {
        let users = [
            user_with_calories(1, 2000),
            user_with_calories(2, 1000),
            user_with_calories(3, 1000),
        ];

        let shares = allocate(&users, 800.0, false);

        assert_eq!(shares[0].grams, 400.0);
        assert_eq!(shares[1].grams, 200.0);
        assert_eq!(shares[2].grams, 200.0);
    }

    #[test]
    fn shares_sum_to_the_input_weight() {
        let users = [
            user_with_calories(1, 1948),
            user_with_calories(2, 1345),
            user_with_calories(3, 1782),
        ];

        let shares = allocate(&users, 500.0, false);
        let sum: f64 = shares.iter().map(|share| share.grams).sum();
        assert!((sum - 500.0).abs() < 1e-9);
    }

    #[test]
    fn two_meal_split_halves_every_share() {
        let users = [user_with_calories(1, 1500), user_with_calories(2, 500)];

        let single = allocate(&users, 600.0, false);
        let halved = allocate(&users, 600.0, true);

        for (full, half) in single.iter().zip(&halved) {
            assert_eq!(half.grams, full.grams / 2.0);
        }
        let sum: f64 = halved.iter().map(|share| share.grams).sum();
        assert!((sum - 300.0).abs() < 1e-9);
    }

    #[test]
    fn no_selected_users_yields_no_shares() {
        assert_eq!(allocate(&[], 500.0, false), vec![]);
    }

    #[test]
    fn zero_calorie_roster_yields_zero_shares() {
        let users = [user_with_calories(1, 0), user_with_calories(2, 0)];

        let shares = allocate(&users, 500.0, false);

        assert_eq!(shares.len(), 2);
        assert!(shares.iter().all(|share| share.grams == 0.0));
    }

    #[test]
    fn rounded_grams_rounds_to_nearest() {
        let test_data = [(151.5, 152), (151.49, 151), (0.0, 0), (99.999, 100)];

        for (grams, expected) in test_data {
            let share = Share {
                user_id: 1,
                name: String::new(),
                grams,
            };
            assert_eq!(share.rounded_grams(), expected);
        }
    }
}

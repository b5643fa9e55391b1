use serde::{Deserialize, Serialize};

use crate::planner::selector::SelectedRecipe;

/// Meal slot a selected recipe is served in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Other,
}

/// A keyword rule: a course containing any keyword goes to `slot`.
#[derive(Debug, Clone, Copy)]
pub struct CourseRule {
    pub keywords: &'static [&'static str],
    pub slot: MealSlot,
}

impl CourseRule {
    fn matches(&self, course_lower: &str) -> bool {
        self.keywords.iter().any(|k| course_lower.contains(*k))
    }
}

/// Evaluated top to bottom, first match wins. Unmatched courses are `Other`.
pub const COURSE_RULES: &[CourseRule] = &[
    CourseRule { keywords: &["breakfast"], slot: MealSlot::Breakfast },
    CourseRule { keywords: &["main", "lunch"], slot: MealSlot::Lunch },
    CourseRule { keywords: &["dinner", "side"], slot: MealSlot::Dinner },
];

pub fn classify_course(course: &str) -> MealSlot {
    let lowered = course.to_lowercase();
    COURSE_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or(MealSlot::Other, |rule| rule.slot)
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MealsByCourse {
    pub breakfast: Vec<SelectedRecipe>,
    pub lunch: Vec<SelectedRecipe>,
    pub dinner: Vec<SelectedRecipe>,
    pub other: Vec<SelectedRecipe>,
}

impl MealsByCourse {
    pub fn slot(&self, slot: MealSlot) -> &[SelectedRecipe] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Other => &self.other,
        }
    }

    pub fn len(&self) -> usize {
        self.breakfast.len() + self.lunch.len() + self.dinner.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions the selection into meal slots, preserving input order in each.
pub fn bucket_by_course(selected: Vec<SelectedRecipe>) -> MealsByCourse {
    let mut buckets = MealsByCourse::default();
    for recipe in selected {
        let target = match classify_course(&recipe.course) {
            MealSlot::Breakfast => &mut buckets.breakfast,
            MealSlot::Lunch => &mut buckets.lunch,
            MealSlot::Dinner => &mut buckets.dinner,
            MealSlot::Other => &mut buckets.other,
        };
        target.push(recipe);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_catalog::Diet;

    fn selected(name: &str, course: &str) -> SelectedRecipe {
        SelectedRecipe {
            name: name.to_string(),
            estimated_calories: 100.0,
            ingredients: Vec::new(),
            steps: Vec::new(),
            prep_time: String::new(),
            cook_time: String::new(),
            total_time: String::new(),
            cuisine: String::new(),
            course: course.to_string(),
            diet: Diet::default(),
        }
    }

    #[test]
    fn test_keyword_priority() {
        assert_eq!(classify_course("North Indian Breakfast"), MealSlot::Breakfast);
        assert_eq!(classify_course("Main Course"), MealSlot::Lunch);
        assert_eq!(classify_course("Lunch"), MealSlot::Lunch);
        assert_eq!(classify_course("DINNER"), MealSlot::Dinner);
        assert_eq!(classify_course("Side Dish"), MealSlot::Dinner);
        assert_eq!(classify_course("Dessert"), MealSlot::Other);
        assert_eq!(classify_course(""), MealSlot::Other);
        // Several keywords: the earliest rule decides.
        assert_eq!(classify_course("Breakfast or Main"), MealSlot::Breakfast);
        assert_eq!(classify_course("Side for Lunch"), MealSlot::Lunch);
    }

    #[test]
    fn test_bucketing_is_an_ordered_partition() {
        let input = vec![
            selected("A", "breakfast"),
            selected("B", "Main Course"),
            selected("C", "dinner"),
            selected("D", "Snack"),
            selected("E", "Breakfast"),
        ];
        let buckets = bucket_by_course(input);
        let names = |slot: MealSlot| buckets.slot(slot).iter().map(|r| r.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(MealSlot::Breakfast), vec!["A", "E"]);
        assert_eq!(names(MealSlot::Lunch), vec!["B"]);
        assert_eq!(names(MealSlot::Dinner), vec!["C"]);
        assert_eq!(names(MealSlot::Other), vec!["D"]);
        assert_eq!(buckets.len(), 5);
    }

    #[test]
    fn test_empty_selection_gives_empty_buckets() {
        assert!(bucket_by_course(Vec::new()).is_empty());
    }
}

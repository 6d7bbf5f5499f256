use crate::task::TaskCategory;

// "medicin" is a stem on purpose: it covers medicina, medicine and
// medicinal in one entry.
const MEDICINE_KEYWORDS: &[&str] = &["medicin", "pastilla", "píldora", "medicamento", "pill"];

const MEAL_KEYWORDS: &[&str] = &[
    "comer",
    "comida",
    "almuerzo",
    "almorzar",
    "desayuno",
    "desayunar",
    "cena",
    "merienda",
    "breakfast",
    "lunch",
    "dinner",
    "meal",
];

/// Classify the utterance. Medicine keywords are checked before meal
/// keywords, so medicine wins when both appear. Expects the lowercased
/// transcript.
pub fn extract_category(normalized: &str) -> TaskCategory {
    if MEDICINE_KEYWORDS.iter().any(|k| normalized.contains(k)) {
        TaskCategory::Medicine
    } else if MEAL_KEYWORDS.iter().any(|k| normalized.contains(k)) {
        TaskCategory::Meal
    } else {
        TaskCategory::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medicine_keywords() {
        assert_eq!(
            extract_category("tomar mi medicina"),
            TaskCategory::Medicine
        );
        assert_eq!(extract_category("tomar la pastilla"), TaskCategory::Medicine);
        assert_eq!(extract_category("take my pills"), TaskCategory::Medicine);
    }

    #[test]
    fn test_meal_keywords() {
        assert_eq!(extract_category("hora de almorzar"), TaskCategory::Meal);
        assert_eq!(extract_category("preparar la cena"), TaskCategory::Meal);
        assert_eq!(extract_category("eat lunch"), TaskCategory::Meal);
    }

    #[test]
    fn test_medicine_wins_over_meal() {
        assert_eq!(
            extract_category("tomar la pastilla después de la cena"),
            TaskCategory::Medicine
        );
    }

    #[test]
    fn test_defaults_to_general() {
        assert_eq!(extract_category("llamar a mi hija"), TaskCategory::General);
        assert_eq!(extract_category(""), TaskCategory::General);
    }
}

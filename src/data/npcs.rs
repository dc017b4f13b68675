use crate::shared::*;

/// (id, name, birthday season, birthday day, portrait index)
///
/// Several townsfolk share a birthday on purpose; those days cycle portraits
/// on the billboard.
const TOWNSFOLK: &[(&str, &str, Season, u8, u32)] = &[
    ("margaret", "Margaret", Season::Spring, 14, 0),
    ("marco", "Marco", Season::Summer, 8, 1),
    ("lily", "Lily", Season::Spring, 22, 2),
    ("old_tom", "Old Tom", Season::Winter, 3, 3),
    ("elena", "Elena", Season::Fall, 18, 4),
    ("mira", "Mira", Season::Summer, 19, 5),
    ("doc", "Doc", Season::Winter, 14, 6),
    ("mayor_rex", "Mayor Rex", Season::Summer, 28, 7),
    ("sam", "Sam", Season::Summer, 4, 8),
    ("nora", "Nora", Season::Fall, 7, 9),
    // Shared birthdays
    ("pip", "Pip", Season::Spring, 3, 10),
    ("hazel", "Hazel", Season::Spring, 3, 11),
    ("bram", "Bram", Season::Spring, 10, 12),
    ("juniper", "Juniper", Season::Spring, 10, 13),
    ("otto", "Otto", Season::Spring, 10, 14),
    ("wren", "Wren", Season::Spring, 5, 15),
    ("rosa", "Rosa", Season::Summer, 8, 16),
    ("finn", "Finn", Season::Fall, 18, 17),
    ("ivy", "Ivy", Season::Winter, 14, 18),
    ("clem", "Clem", Season::Winter, 14, 19),
];

/// Populate the NpcRegistry with every townsperson and their birthday.
pub fn populate_npcs(registry: &mut NpcRegistry) {
    for &(id, name, birthday_season, birthday_day, portrait_index) in TOWNSFOLK {
        registry.insert(NpcDef {
            id: id.into(),
            name: name.into(),
            birthday_season,
            birthday_day,
            portrait_index,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birthdays_are_valid_days() {
        for &(id, _, _, day, portrait) in TOWNSFOLK {
            assert!((1..=DAYS_PER_SEASON).contains(&day), "{} born on day {}", id, day);
            assert!(portrait < PORTRAIT_COLUMNS * PORTRAIT_ROWS, "{}", id);
        }
    }

    #[test]
    fn test_spring_has_shared_birthdays() {
        let mut registry = NpcRegistry::default();
        populate_npcs(&mut registry);
        assert_eq!(registry.birthdays_on(Season::Spring, 3).len(), 2);
        assert_eq!(registry.birthdays_on(Season::Spring, 10).len(), 3);
        assert_eq!(registry.birthdays_on(Season::Spring, 5).len(), 1);
    }
}

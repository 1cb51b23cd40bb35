use evalnat_tools::model::{CompetencyKey, Level, PartialRecord, ResultsMap, Subject, UnitId};
use evalnat_tools::registry::SchoolRegistry;

fn partial(id: &str, name: &str, entries: &[(Level, Subject, &str, f64)]) -> PartialRecord {
    let results: ResultsMap = entries
        .iter()
        .map(|(level, subject, key, value)| (CompetencyKey::new(*level, *subject, *key), *value))
        .collect();
    PartialRecord {
        id: id.into(),
        name: name.into(),
        results,
    }
}

#[test]
fn records_from_distinct_units_are_unioned() {
    let registry = SchoolRegistry::new().merge(vec![
        partial("0070116N", "Ecole A", &[(Level::Cp, Subject::French, "Lecture", 50.0)]),
        partial("0070116N", "Ecole A", &[(Level::Cm2, Subject::Maths, "Calcul", 70.0)]),
    ]);

    assert_eq!(registry.len(), 1);
    let school = &registry.all()[0];
    let keys: Vec<String> = school.results.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["CP_FR_Lecture", "CM2_MA_Calcul"]);
}

#[test]
fn empty_partials_never_create_records() {
    let mut registry = SchoolRegistry::new();
    assert!(!registry.absorb(partial("0070116N", "Ecole A", &[])));
    assert!(registry.is_empty());

    assert!(registry.absorb(partial(
        "0070116N",
        "Ecole A",
        &[(Level::Cp, Subject::French, "Lecture", 50.0)],
    )));
    assert!(!registry.absorb(partial("0070116N", "Ecole A", &[])));
    assert_eq!(registry.get("0070116N").map(|school| school.results.len()), Some(1));
}

#[test]
fn colliding_keys_keep_the_latest_value() {
    let registry = SchoolRegistry::new().merge(vec![
        partial("0070116N", "", &[(Level::Cp, Subject::French, "Lecture", 50.0)]),
        partial("0070116N", "Ecole A", &[(Level::Cp, Subject::French, "Lecture", 55.0)]),
        partial("0070116N", "Autre nom", &[(Level::Cp, Subject::French, "Ecriture", 10.0)]),
    ]);

    let school = registry.get("0070116N").expect("school");
    assert_eq!(school.name, "Ecole A");
    assert_eq!(
        school.get(&CompetencyKey::new(Level::Cp, Subject::French, "Lecture")),
        Some(55.0)
    );
    assert_eq!(school.results.len(), 2);
}

#[test]
fn schools_keep_insertion_order() {
    let registry = SchoolRegistry::new().merge(vec![
        partial("0070222B", "Ecole B", &[(Level::Ce1, Subject::French, "Lecture", 1.0)]),
        partial("0070116N", "Ecole A", &[(Level::Ce1, Subject::French, "Lecture", 2.0)]),
        partial("0070222B", "Ecole B", &[(Level::Ce2, Subject::French, "Lecture", 3.0)]),
    ]);

    let ids: Vec<_> = registry.all().iter().map(|school| school.id.as_str()).collect();
    assert_eq!(ids, vec!["0070222B", "0070116N"]);
}

#[test]
fn grouping_is_recomputed_after_each_merge() {
    let registry = SchoolRegistry::new().merge(vec![partial(
        "0070116N",
        "Ecole A",
        &[(Level::Cp, Subject::French, "Lecture", 50.0)],
    )]);
    assert_eq!(registry.by_level_subject().len(), 1);

    let registry = registry.merge(vec![partial(
        "0070222B",
        "Ecole B",
        &[
            (Level::Cp, Subject::French, "Ecriture", 20.0),
            (Level::Cp, Subject::Maths, "Calcul", 30.0),
        ],
    )]);
    let groups = registry.by_level_subject();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[&UnitId::new(Level::Cp, Subject::French)].len(), 2);
    assert_eq!(groups[&UnitId::new(Level::Cp, Subject::Maths)].len(), 1);
}

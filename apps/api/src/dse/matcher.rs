//! Program Matcher: scores a student's DSE results against every program in
//! the catalog and ranks the outcome.
//!
//! Pure and synchronous: no I/O, no shared mutable state. Calling it twice
//! with the same inputs yields the same list.

use serde::{Deserialize, Serialize};

use crate::dse::catalog::{Catalog, InterchangeableGroup, Program, University};
use crate::dse::scores::StudentScores;

/// One program scored for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramMatch {
    pub university: String,
    pub abbreviation: String,
    pub program: Program,
    pub score: f64,
    pub qualified: bool,
    pub missing_requirements: Vec<String>,
}

/// An unqualified program close to the student's reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearMiss {
    pub abbreviation: String,
    pub program: String,
    pub code: String,
    pub score: f64,
    /// Points short of `min_score`; 0 when only a subject requirement failed.
    pub shortfall: f64,
    pub first_missing: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total: usize,
    pub qualified_count: usize,
    pub best_qualified_score: Option<f64>,
    pub near_misses: Vec<NearMiss>,
}

/// Scores every catalog program and returns one match per program:
/// qualified first, then by descending aggregate. Ties keep catalog order.
pub fn match_programs(scores: &StudentScores, catalog: &Catalog) -> Vec<ProgramMatch> {
    let mut matches: Vec<ProgramMatch> = catalog
        .programs()
        .map(|(uni, program)| score_program(scores, uni, program, &catalog.interchangeable_groups))
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| {
        b.qualified
            .cmp(&a.qualified)
            .then_with(|| b.score.total_cmp(&a.score))
    });

    tracing::debug!(
        programs = matches.len(),
        qualified = matches.iter().filter(|m| m.qualified).count(),
        "Scored DSE results against catalog"
    );

    matches
}

fn score_program(
    scores: &StudentScores,
    uni: &University,
    program: &Program,
    groups: &[InterchangeableGroup],
) -> ProgramMatch {
    let mut aggregate = 0.0_f64;
    let mut missing_requirements = Vec::new();

    for (subject, grade) in scores.core() {
        let points = grade.points();
        aggregate += f64::from(points);
        if let Some(&required) = program.core_requirements.get(subject) {
            if points < required {
                missing_requirements.push(format!("{subject}: need {required}, got {points}"));
            }
        }
    }

    for (subject, grade) in scores.electives() {
        aggregate += f64::from(grade.points()) * program.weight_for(subject, groups);
    }

    let accepts_electives = program.elective_requirements.is_empty()
        || program
            .elective_requirements
            .iter()
            .any(|accepted| scores.has_elective(accepted));
    if !accepts_electives {
        missing_requirements.push(format!(
            "Need one of: {}",
            program.elective_requirements.join(", ")
        ));
    }

    let qualified = aggregate >= program.min_score && missing_requirements.is_empty();

    ProgramMatch {
        university: uni.university.clone(),
        abbreviation: uni.abbreviation.clone(),
        program: program.clone(),
        score: aggregate,
        qualified,
        missing_requirements,
    }
}

/// Condenses a ranked match list for display: counts plus the `top_n`
/// unqualified programs with the smallest shortfall.
pub fn summarize(matches: &[ProgramMatch], top_n: usize) -> MatchSummary {
    let qualified_count = matches.iter().filter(|m| m.qualified).count();
    let best_qualified_score = matches
        .iter()
        .filter(|m| m.qualified)
        .map(|m| m.score)
        .reduce(f64::max);

    let mut near_misses: Vec<NearMiss> = matches
        .iter()
        .filter(|m| !m.qualified)
        .map(|m| NearMiss {
            abbreviation: m.abbreviation.clone(),
            program: m.program.name.clone(),
            code: m.program.code.clone(),
            score: m.score,
            shortfall: (m.program.min_score - m.score).max(0.0),
            first_missing: m.missing_requirements.first().cloned(),
        })
        .collect();
    near_misses.sort_by(|a, b| a.shortfall.total_cmp(&b.shortfall));
    near_misses.truncate(top_n);

    MatchSummary {
        total: matches.len(),
        qualified_count,
        best_qualified_score,
        near_misses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn student(core: [&str; 4], electives: [(&str, &str); 2]) -> StudentScores {
        let mut raw: BTreeMap<String, String> = ["English", "Chinese", "Mathematics", "Liberal Studies"]
            .iter()
            .zip(core)
            .map(|(s, g)| (s.to_string(), g.to_string()))
            .collect();
        for (s, g) in electives {
            raw.insert(s.to_string(), g.to_string());
        }
        let chosen: Vec<String> = electives.iter().map(|(s, _)| s.to_string()).collect();
        StudentScores::parse(&raw, &chosen).unwrap()
    }

    fn reference_student() -> StudentScores {
        student(["5", "5", "5*", "4"], [("Physics", "5"), ("Chemistry", "4")])
    }

    fn program(code: &str, min_score: f64) -> Program {
        Program {
            name: format!("Program {code}"),
            code: code.to_string(),
            min_score,
            weighted_subjects: BTreeMap::new(),
            core_requirements: BTreeMap::new(),
            elective_requirements: vec![],
        }
    }

    fn catalog(programs: Vec<Program>) -> Catalog {
        Catalog {
            interchangeable_groups: vec![InterchangeableGroup {
                key: "M1/M2".to_string(),
                members: vec!["M1".to_string(), "M2".to_string()],
            }],
            universities: vec![University {
                university: "Test University".to_string(),
                abbreviation: "TU".to_string(),
                programs,
            }],
        }
    }

    #[test]
    fn test_reference_scenario_qualifies_with_29() {
        let matches = match_programs(&reference_student(), &catalog(vec![program("A", 25.0)]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 29.0);
        assert!(matches[0].qualified);
        assert!(matches[0].missing_requirements.is_empty());
    }

    #[test]
    fn test_explicit_zero_weight_is_honored() {
        let mut p = program("A", 0.0);
        p.weighted_subjects.insert("Physics".to_string(), 0.0);
        let matches = match_programs(&reference_student(), &catalog(vec![p]));
        // 20 core + Physics 5 * 0 + Chemistry 4 * 1
        assert_eq!(matches[0].score, 24.0);
    }

    #[test]
    fn test_zero_group_weight_is_honored() {
        let s = student(["5", "5", "5*", "4"], [("M1", "5"), ("Chemistry", "4")]);
        let mut p = program("A", 0.0);
        p.weighted_subjects.insert("M1/M2".to_string(), 0.0);
        let matches = match_programs(&s, &catalog(vec![p]));
        assert_eq!(matches[0].score, 24.0);
    }

    #[test]
    fn test_core_minimum_failure_blocks_qualification() {
        let mut p = program("A", 25.0);
        p.core_requirements.insert("Mathematics".to_string(), 7);
        let matches = match_programs(&reference_student(), &catalog(vec![p]));
        assert_eq!(matches[0].score, 29.0);
        assert!(!matches[0].qualified);
        assert!(matches[0]
            .missing_requirements
            .contains(&"Mathematics: need 7, got 6".to_string()));
    }

    #[test]
    fn test_core_minimum_met_exactly_is_fine() {
        let mut p = program("A", 0.0);
        p.core_requirements.insert("Mathematics".to_string(), 6);
        let matches = match_programs(&reference_student(), &catalog(vec![p]));
        assert!(matches[0].qualified);
    }

    #[test]
    fn test_elective_restriction_not_met() {
        let humanities = student(["5", "5", "5*", "4"], [("Geography", "5"), ("History", "5")]);
        let mut p = program("SCI", 0.0);
        p.elective_requirements = vec![
            "Physics".to_string(),
            "Chemistry".to_string(),
            "Biology".to_string(),
        ];
        let matches = match_programs(&humanities, &catalog(vec![p]));
        assert!(!matches[0].qualified);
        assert_eq!(
            matches[0].missing_requirements,
            vec!["Need one of: Physics, Chemistry, Biology".to_string()]
        );
    }

    #[test]
    fn test_one_accepted_elective_is_enough() {
        let mut p = program("SCI", 0.0);
        p.elective_requirements = vec!["Biology".to_string(), "Chemistry".to_string()];
        let matches = match_programs(&reference_student(), &catalog(vec![p]));
        assert!(matches[0].qualified);
    }

    #[test]
    fn test_aggregate_below_minimum_is_unqualified_without_missing_entries() {
        let matches = match_programs(&reference_student(), &catalog(vec![program("A", 30.0)]));
        assert!(!matches[0].qualified);
        assert!(matches[0].missing_requirements.is_empty());
    }

    #[test]
    fn test_explicit_elective_weight() {
        let mut p = program("A", 0.0);
        p.weighted_subjects.insert("Physics".to_string(), 2.0);
        let matches = match_programs(&reference_student(), &catalog(vec![p]));
        // 20 core + 5*2 + 4
        assert_eq!(matches[0].score, 34.0);
    }

    #[test]
    fn test_interchangeable_group_weight() {
        let s = student(["4", "4", "4", "4"], [("M2", "5"), ("Economics", "3")]);
        let mut p = program("A", 0.0);
        p.weighted_subjects.insert("M1/M2".to_string(), 1.5);
        let matches = match_programs(&s, &catalog(vec![p]));
        assert_eq!(matches[0].score, 16.0 + 7.5 + 3.0);
    }

    #[test]
    fn test_core_subjects_are_never_weighted() {
        let mut p = program("A", 0.0);
        p.weighted_subjects.insert("Mathematics".to_string(), 5.0);
        let matches = match_programs(&reference_student(), &catalog(vec![p]));
        assert_eq!(matches[0].score, 29.0);
    }

    #[test]
    fn test_u_contributes_zero_regardless_of_weight() {
        let s = student(["U", "U", "U", "U"], [("M1", "U"), ("Physics", "U")]);
        let mut p = program("A", 0.0);
        p.weighted_subjects.insert("Physics".to_string(), 3.0);
        p.weighted_subjects.insert("M1/M2".to_string(), 2.0);
        let matches = match_programs(&s, &catalog(vec![p]));
        assert_eq!(matches[0].score, 0.0);
    }

    #[test]
    fn test_unrestricted_zero_minimum_program_always_qualifies() {
        let s = student(["U", "U", "U", "U"], [("Geography", "U"), ("History", "U")]);
        let matches = match_programs(&s, &catalog(vec![program("OPEN", 0.0)]));
        assert!(matches[0].qualified);
    }

    #[test]
    fn test_empty_catalog_returns_empty_list() {
        let matches = match_programs(&reference_student(), &Catalog::default());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_ordering_partitions_and_sorts() {
        let mut strict = program("STRICT", 0.0);
        strict.core_requirements.insert("English".to_string(), 7);
        let mut weighted = program("WEIGHTED", 20.0);
        weighted.weighted_subjects.insert("Physics".to_string(), 2.0);
        let cat = catalog(vec![
            program("HIGH", 40.0),
            program("LOW", 10.0),
            strict,
            weighted,
            program("MID", 29.0),
        ]);
        let matches = match_programs(&reference_student(), &cat);
        let codes: Vec<&str> = matches.iter().map(|m| m.program.code.as_str()).collect();
        assert_eq!(codes, vec!["WEIGHTED", "LOW", "MID", "HIGH", "STRICT"]);

        let first_unqualified = matches.iter().position(|m| !m.qualified).unwrap();
        assert!(matches[first_unqualified..].iter().all(|m| !m.qualified));
        for group in [&matches[..first_unqualified], &matches[first_unqualified..]] {
            assert!(group.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let cat = catalog(vec![
            program("FIRST", 0.0),
            program("SECOND", 0.0),
            program("THIRD", 0.0),
        ]);
        let matches = match_programs(&reference_student(), &cat);
        let codes: Vec<&str> = matches.iter().map(|m| m.program.code.as_str()).collect();
        assert_eq!(codes, vec!["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn test_result_length_matches_bundled_catalog() {
        let bundled = Catalog::bundled().unwrap();
        let matches = match_programs(&reference_student(), &bundled);
        assert_eq!(matches.len(), bundled.program_count());
    }

    #[test]
    fn test_matching_is_idempotent() {
        let bundled = Catalog::bundled().unwrap();
        let s = reference_student();
        let first = serde_json::to_value(match_programs(&s, &bundled)).unwrap();
        let second = serde_json::to_value(match_programs(&s, &bundled)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_counts_and_near_misses() {
        let mut strict = program("STRICT", 0.0);
        strict.core_requirements.insert("English".to_string(), 7);
        let cat = catalog(vec![
            program("OK", 20.0),
            program("FAR", 40.0),
            program("CLOSE", 30.0),
            strict,
        ]);
        let matches = match_programs(&reference_student(), &cat);
        let summary = summarize(&matches, 2);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.qualified_count, 1);
        assert_eq!(summary.best_qualified_score, Some(29.0));
        let codes: Vec<&str> = summary.near_misses.iter().map(|n| n.code.as_str()).collect();
        assert_eq!(codes, vec!["STRICT", "CLOSE"]);
        assert_eq!(
            summary.near_misses[0].first_missing.as_deref(),
            Some("English: need 7, got 5")
        );
        assert_eq!(summary.near_misses[1].shortfall, 1.0);
    }

    #[test]
    fn test_summary_of_nothing_qualified() {
        let matches = match_programs(&reference_student(), &catalog(vec![program("FAR", 40.0)]));
        let summary = summarize(&matches, 5);
        assert_eq!(summary.qualified_count, 0);
        assert_eq!(summary.best_qualified_score, None);
        assert_eq!(summary.near_misses.len(), 1);
    }
}

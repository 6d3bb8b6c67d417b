//! Test and benchmark helpers: synthetic salary data and fixtures.

use std::path::Path;

use rand::prelude::*;

use crate::data::io::{save_csv, DatasetLoadError};
use crate::data::{FeatureRecord, SalaryTable};

/// Default tolerance for comparing `f64` predictions.
pub const DEFAULT_TOLERANCE_F64: f64 = 1e-9;

pub const EDUCATION_LEVELS: [&str; 4] = ["High School", "Bachelor", "Master", "PhD"];
pub const LOCATIONS: [&str; 3] = ["Rural", "Suburban", "Urban"];
pub const JOB_TITLES: [&str; 4] = ["Analyst", "Director", "Engineer", "Manager"];
pub const GENDERS: [&str; 2] = ["Female", "Male"];

/// Generate a synthetic salary table.
///
/// Salaries grow with education, seniority of the job title, location and
/// experience, plus uniform noise. All salaries are positive.
pub fn synthetic_table(rows: usize, seed: u64) -> SalaryTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table = SalaryTable::default();

    for _ in 0..rows {
        let edu = rng.random_range(0..EDUCATION_LEVELS.len());
        let loc = rng.random_range(0..LOCATIONS.len());
        let job = rng.random_range(0..JOB_TITLES.len());
        let gender = rng.random_range(0..GENDERS.len());
        let experience = rng.random_range(0..=30) as f64;
        let age = (22.0 + experience + rng.random_range(0..=8) as f64).min(80.0);

        let job_factor = [0.0, 60_000.0, 25_000.0, 40_000.0][job];
        let salary = 30_000.0
            + 15_000.0 * edu as f64
            + job_factor
            + 8_000.0 * loc as f64
            + 2_500.0 * experience
            + rng.random_range(-5_000.0..5_000.0);

        table.push(
            FeatureRecord {
                education: EDUCATION_LEVELS[edu].to_owned(),
                experience,
                location: LOCATIONS[loc].to_owned(),
                job_title: JOB_TITLES[job].to_owned(),
                age,
                gender: GENDERS[gender].to_owned(),
            },
            salary,
        );
    }
    table
}

/// The single-profile scenario: `[Bachelors, 5, Urban, Engineer, 29, Male, 600000]`
/// repeated `rows` times with small numeric jitter.
pub fn scenario_table(rows: usize, seed: u64) -> SalaryTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table = SalaryTable::default();
    for _ in 0..rows {
        let experience = (5.0 + rng.random_range(-1.0..=1.0_f64)).max(0.0);
        let age = 29.0 + rng.random_range(-1.0..=1.0_f64);
        let salary = 600_000.0 * (1.0 + rng.random_range(-0.05..=0.05_f64));
        table.push(
            FeatureRecord {
                education: "Bachelors".into(),
                experience,
                location: "Urban".into(),
                job_title: "Engineer".into(),
                age,
                gender: "Male".into(),
            },
            salary,
        );
    }
    table
}

/// A record inside every synthetic vocabulary.
pub fn sample_record() -> FeatureRecord {
    FeatureRecord {
        education: "Bachelor".into(),
        experience: 5.0,
        location: "Urban".into(),
        job_title: "Engineer".into(),
        age: 29.0,
        gender: "Male".into(),
    }
}

/// Write `table` as a CSV dataset at `path`.
pub fn write_dataset(table: &SalaryTable, path: impl AsRef<Path>) -> Result<(), DatasetLoadError> {
    save_csv(table, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{AGE_RANGE, EXPERIENCE_RANGE};

    #[test]
    fn synthetic_rows_are_valid_inputs() {
        let table = synthetic_table(200, 1);
        assert_eq!(table.len(), 200);
        for (record, salary) in table.rows() {
            assert!(record.validate().is_ok(), "{record:?}");
            assert!(salary > 0.0);
            assert!(EXPERIENCE_RANGE.contains(&record.experience));
            assert!(AGE_RANGE.contains(&record.age));
        }
    }

    #[test]
    fn deterministic_for_seed() {
        assert_eq!(synthetic_table(20, 9), synthetic_table(20, 9));
        assert_eq!(scenario_table(20, 9), scenario_table(20, 9));
    }
}

//! Mock applicant population for the fairness dashboard.
//!
//! Approval is drawn independently of every attribute, so a correct audit
//! should report near-parity across groups.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub const DEFAULT_APPLICANTS: u32 = 1_000;
pub const MAX_APPLICANTS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Bangkok,
    Upcountry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockApplicant {
    pub id: u32,
    pub gender: Gender,
    pub region: Region,
    pub score: u16,
    pub approved: bool,
}

impl MockApplicant {
    fn draw<R>(id: u32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let gender = if rng.gen::<f64>() > 0.5 {
            Gender::Male
        } else {
            Gender::Female
        };
        let region = if rng.gen::<f64>() > 0.4 {
            Region::Upcountry
        } else {
            Region::Bangkok
        };
        let score = 300 + (rng.gen::<f64>() * 550.0).floor() as u16;
        let approved = rng.gen::<f64>() > 0.15;

        Self {
            id,
            gender,
            region,
            score,
            approved,
        }
    }
}

/// Approval counts for one protected group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupApproval {
    pub approved: u32,
    pub total: u32,
    /// Whole-percent approval rate; 0 for an empty group.
    pub rate: u32,
}

impl GroupApproval {
    fn tally<'a>(applicants: impl Iterator<Item = &'a MockApplicant>) -> Self {
        let (approved, total) = applicants.fold((0, 0), |(approved, total), applicant| {
            (approved + u32::from(applicant.approved), total + 1)
        });
        let rate = if total == 0 {
            0
        } else {
            (f64::from(approved) / f64::from(total) * 100.0 + 0.5).floor() as u32
        };

        Self {
            approved,
            total,
            rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderBreakdown {
    pub male: GroupApproval,
    pub female: GroupApproval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBreakdown {
    pub bangkok: GroupApproval,
    pub upcountry: GroupApproval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessAudit {
    pub total: u32,
    pub gender: GenderBreakdown,
    pub region: RegionBreakdown,
}

impl FairnessAudit {
    pub fn from_applicants(applicants: &[MockApplicant]) -> Self {
        let by_gender = |gender| {
            GroupApproval::tally(applicants.iter().filter(move |a| a.gender == gender))
        };
        let by_region = |region| {
            GroupApproval::tally(applicants.iter().filter(move |a| a.region == region))
        };

        Self {
            total: applicants.len() as u32,
            gender: GenderBreakdown {
                male: by_gender(Gender::Male),
                female: by_gender(Gender::Female),
            },
            region: RegionBreakdown {
                bangkok: by_region(Region::Bangkok),
                upcountry: by_region(Region::Upcountry),
            },
        }
    }

    pub fn gender_disparate_impact(&self) -> f64 {
        disparate_impact(self.gender.male.rate, self.gender.female.rate)
    }

    pub fn region_disparate_impact(&self) -> f64 {
        disparate_impact(self.region.bangkok.rate, self.region.upcountry.rate)
    }
}

/// Lower approval rate over the higher one; 1.0 means parity.
pub fn disparate_impact(a: u32, b: u32) -> f64 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    if high == 0 {
        1.0
    } else {
        f64::from(low) / f64::from(high)
    }
}

pub fn generate_applicants<R>(rng: &mut R, count: u32) -> Vec<MockApplicant>
where
    R: Rng + ?Sized,
{
    (1..=count).map(|id| MockApplicant::draw(id, rng)).collect()
}

pub fn generate_fairness_audit<R>(rng: &mut R, count: u32) -> FairnessAudit
where
    R: Rng + ?Sized,
{
    FairnessAudit::from_applicants(&generate_applicants(rng, count))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FairnessError {
    #[error("applicant count must be between 1 and {max}, got {0}", max = MAX_APPLICANTS)]
    PopulationOutOfRange(u32),
}

pub fn validate_population(count: u32) -> Result<u32, FairnessError> {
    if (1..=MAX_APPLICANTS).contains(&count) {
        Ok(count)
    } else {
        Err(FairnessError::PopulationOutOfRange(count))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub seed: Option<u64>,
    pub applicants: Option<u32>,
}

/// Audit endpoint backing the fairness dashboard.
pub fn fairness_router() -> Router {
    Router::new().route("/api/v1/fairness/audit", get(audit_handler))
}

pub(crate) async fn audit_handler(Query(query): Query<AuditQuery>) -> Response {
    let count = match validate_population(query.applicants.unwrap_or(DEFAULT_APPLICANTS)) {
        Ok(count) => count,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let mut rng = match query.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let audit = generate_fairness_audit(&mut rng, count);

    info!(
        applicants = count,
        gender_di = audit.gender_disparate_impact(),
        region_di = audit.region_disparate_impact(),
        "fairness audit generated"
    );

    (StatusCode::OK, Json(audit)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_partition_the_population() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let audit = generate_fairness_audit(&mut rng, DEFAULT_APPLICANTS);

        assert_eq!(audit.total, 1000);
        assert_eq!(audit.gender.male.total + audit.gender.female.total, 1000);
        assert_eq!(audit.region.bangkok.total + audit.region.upcountry.total, 1000);
        assert!(audit.gender.male.approved <= audit.gender.male.total);
    }

    #[test]
    fn applicant_scores_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let applicants = generate_applicants(&mut rng, 2_000);

        assert!(applicants
            .iter()
            .all(|applicant| (300..850).contains(&applicant.score)));
        assert_eq!(applicants.first().map(|a| a.id), Some(1));
        assert_eq!(applicants.last().map(|a| a.id), Some(2_000));
    }

    #[test]
    fn rates_are_rounded_percentages() {
        let applicant = |id, approved| MockApplicant {
            id,
            gender: Gender::Female,
            region: Region::Bangkok,
            score: 600,
            approved,
        };
        let applicants = vec![applicant(1, true), applicant(2, true), applicant(3, false)];

        let audit = FairnessAudit::from_applicants(&applicants);

        assert_eq!(
            audit.gender.female,
            GroupApproval {
                approved: 2,
                total: 3,
                rate: 67
            }
        );
        assert_eq!(audit.gender.male, GroupApproval::default());
        assert_eq!(audit.gender_disparate_impact(), 0.0);
        assert_eq!(audit.region_disparate_impact(), 0.0);
    }

    #[test]
    fn disparate_impact_is_symmetric() {
        assert_eq!(disparate_impact(80, 100), 0.8);
        assert_eq!(disparate_impact(100, 80), 0.8);
        assert_eq!(disparate_impact(0, 0), 1.0);
    }

    #[test]
    fn population_bounds_are_enforced() {
        assert_eq!(validate_population(1), Ok(1));
        assert_eq!(
            validate_population(0),
            Err(FairnessError::PopulationOutOfRange(0))
        );
        assert!(validate_population(MAX_APPLICANTS + 1).is_err());
    }
}

use serde::Serialize;

use crate::models::candidate::EmploymentHistory;

/// The two employment lists shown to a candidate.
///
/// Records are split by `is_cdl_employment` alone. The "3 years" and "7 years"
/// labels are guidance for the candidate; dates are not checked.
#[derive(Debug, Clone, Serialize)]
pub struct EmploymentBuckets {
    /// All jobs in the last 3 years (`is_cdl_employment == false`).
    pub recent_all_jobs: Vec<EmploymentHistory>,
    /// CDL jobs in the last 7 years (`is_cdl_employment == true`).
    pub cdl_seven_year: Vec<EmploymentHistory>,
}

pub fn partition_history(history: Vec<EmploymentHistory>) -> EmploymentBuckets {
    let (cdl_seven_year, recent_all_jobs) = history
        .into_iter()
        .partition(|record| record.is_cdl_employment);
    EmploymentBuckets {
        recent_all_jobs,
        cdl_seven_year,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    pub(crate) fn record(company: &str, year: i32, cdl: bool) -> EmploymentHistory {
        EmploymentHistory {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            company_name: company.to_string(),
            company_address_street: None,
            company_address_city: None,
            company_address_state: None,
            company_address_zip: None,
            supervisor_name: None,
            supervisor_phone: None,
            supervisor_email: None,
            start_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            end_date: None,
            reason_for_leaving: None,
            cdl_required: cdl,
            is_cdl_employment: cdl,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_partition_by_flag_only() {
        // A 2012 record flagged non-CDL still lands in the 3-year list.
        let buckets = partition_history(vec![
            record("Acme Freight", 2024, true),
            record("Corner Store", 2023, false),
            record("Old Haulers", 2012, false),
        ]);
        assert_eq!(buckets.cdl_seven_year.len(), 1);
        assert_eq!(buckets.recent_all_jobs.len(), 2);
        assert_eq!(buckets.recent_all_jobs[1].company_name, "Old Haulers");
    }

    #[test]
    fn test_partition_keeps_order_and_exclusivity() {
        let buckets = partition_history(vec![
            record("A", 2024, true),
            record("B", 2022, true),
            record("C", 2021, false),
        ]);
        let names: Vec<_> = buckets
            .cdl_seven_year
            .iter()
            .map(|r| r.company_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(buckets
            .recent_all_jobs
            .iter()
            .all(|r| !r.is_cdl_employment));
    }

    #[test]
    fn test_partition_empty() {
        let buckets = partition_history(vec![]);
        assert!(buckets.recent_all_jobs.is_empty());
        assert!(buckets.cdl_seven_year.is_empty());
    }
}

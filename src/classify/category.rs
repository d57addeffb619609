//! Per-account category assignment and counting

use super::AccountGroup;
use crate::filter::RecordPredicate;
use crate::record::ServiceLineType;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Outcome category of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// TV removed without its access bearer
    PeoOnly,
    /// TV over copper removed together with the copper access bearer
    PeoWithCopper,
    /// TV over fiber removed together with the fiber access bearer
    PeoWithFiber,
    /// No TV line in scope
    Unclassified,
}

/// Counts per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub peo_only: u64,
    pub peo_with_copper: u64,
    pub peo_with_fiber: u64,
}

impl CategoryCounts {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Add one to the bucket of `category`; Unclassified has no bucket
    pub fn record(&mut self, category: Category) {
        match category {
            Category::PeoOnly => self.peo_only += 1,
            Category::PeoWithCopper => self.peo_with_copper += 1,
            Category::PeoWithFiber => self.peo_with_fiber += 1,
            Category::Unclassified => {}
        }
    }

    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::PeoOnly => self.peo_only,
            Category::PeoWithCopper => self.peo_with_copper,
            Category::PeoWithFiber => self.peo_with_fiber,
            Category::Unclassified => 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.peo_only + self.peo_with_copper + self.peo_with_fiber
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

impl Add for CategoryCounts {
    type Output = CategoryCounts;

    fn add(self, other: CategoryCounts) -> CategoryCounts {
        CategoryCounts {
            peo_only: self.peo_only + other.peo_only,
            peo_with_copper: self.peo_with_copper + other.peo_with_copper,
            peo_with_fiber: self.peo_with_fiber + other.peo_with_fiber,
        }
    }
}

impl AddAssign for CategoryCounts {
    fn add_assign(&mut self, other: CategoryCounts) {
        *self = *self + other;
    }
}

impl Sum for CategoryCounts {
    fn sum<I: Iterator<Item = CategoryCounts>>(iter: I) -> Self {
        iter.fold(CategoryCounts::zero(), Add::add)
    }
}

impl AccountGroup<'_> {
    /// Bucket a TV line of this account lands in
    ///
    /// A TV line follows its medium's paired category when that medium is paired on
    /// the account and falls back to PEO only otherwise. Access bearer and other
    /// lines are never counted.
    pub fn destination(&self, kind: &ServiceLineType) -> Option<Category> {
        match kind {
            ServiceLineType::ServiceCopper if self.has_paired_copper => Some(Category::PeoWithCopper),
            ServiceLineType::ServiceFiber if self.has_paired_fiber => Some(Category::PeoWithFiber),
            ServiceLineType::ServiceCopper | ServiceLineType::ServiceFiber => Some(Category::PeoOnly),
            _ => None,
        }
    }

    /// Categories of the account, decided from every member of the group
    ///
    /// Usually a single category; an account with both pairings on record is in both
    /// paired categories. Accounts without any TV line are Unclassified.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .records
            .iter()
            .filter_map(|r| self.destination(&r.service_line_type))
            .collect();
        categories.sort();
        categories.dedup();

        if categories.is_empty() {
            categories.push(Category::Unclassified);
        }
        categories
    }
}

/// Contribution of one account group
///
/// Categories come from the whole group; only members accepted by `counted` add to
/// the numbers.
pub fn classify_group<P: RecordPredicate + ?Sized>(group: &AccountGroup<'_>, counted: &P) -> CategoryCounts {
    let mut counts = CategoryCounts::zero();
    for record in group.records.iter().filter(|r| counted.matches(r)) {
        if let Some(category) = group.destination(&record.service_line_type) {
            counts.record(category);
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::group_by_account;
    use crate::record::{ChurnReason, DisconnectionRecord};
    use chrono::NaiveDate;

    struct Everything;

    impl RecordPredicate for Everything {
        fn matches(&self, _record: &DisconnectionRecord) -> bool {
            true
        }
    }

    struct InMonth(u32);

    impl RecordPredicate for InMonth {
        fn matches(&self, record: &DisconnectionRecord) -> bool {
            record.churn_month() == Some(self.0)
        }
    }

    fn line(account: &str, kind: ServiceLineType, month: u32) -> DisconnectionRecord {
        DisconnectionRecord::new(
            account,
            NaiveDate::from_ymd_opt(2024, month, 10),
            NaiveDate::from_ymd_opt(2019, 1, 1),
            kind,
            "RTO - GL",
            ChurnReason::NonPayment,
        )
    }

    #[test]
    fn test_copper_pair_counts_copper_tv_lines() {
        let records = vec![
            line("X", ServiceLineType::InfraCopper, 3),
            line("X", ServiceLineType::ServiceCopper, 4),
            line("X", ServiceLineType::ServiceCopper, 4),
        ];
        let groups = group_by_account(&records);

        assert_eq!(groups[0].categories(), vec![Category::PeoWithCopper]);
        let counts = classify_group(&groups[0], &Everything);
        assert_eq!(counts, CategoryCounts { peo_only: 0, peo_with_copper: 2, peo_with_fiber: 0 });
    }

    #[test]
    fn test_fine_scope_shrinks_count_not_category() {
        let records = vec![
            line("X", ServiceLineType::InfraCopper, 3),
            line("X", ServiceLineType::ServiceCopper, 4),
        ];
        let groups = group_by_account(&records);

        // March holds only the bearer line: category stays, contribution drops to zero
        assert_eq!(groups[0].categories(), vec![Category::PeoWithCopper]);
        assert_eq!(classify_group(&groups[0], &InMonth(3)), CategoryCounts::zero());
        assert_eq!(classify_group(&groups[0], &InMonth(4)).peo_with_copper, 1);
    }

    #[test]
    fn test_tv_only_account() {
        let records = vec![
            line("Y", ServiceLineType::ServiceFiber, 5),
            line("Y", ServiceLineType::ServiceCopper, 5),
        ];
        let groups = group_by_account(&records);

        assert_eq!(groups[0].categories(), vec![Category::PeoOnly]);
        assert_eq!(classify_group(&groups[0], &Everything).peo_only, 2);
    }

    #[test]
    fn test_unpaired_medium_falls_back_to_peo_only() {
        let records = vec![
            line("M", ServiceLineType::InfraCopper, 5),
            line("M", ServiceLineType::ServiceCopper, 5),
            line("M", ServiceLineType::ServiceFiber, 5),
        ];
        let groups = group_by_account(&records);

        assert_eq!(groups[0].categories(), vec![Category::PeoOnly, Category::PeoWithCopper]);
        let counts = classify_group(&groups[0], &Everything);
        assert_eq!(counts, CategoryCounts { peo_only: 1, peo_with_copper: 1, peo_with_fiber: 0 });
    }

    #[test]
    fn test_bearer_only_account_is_unclassified() {
        let records = vec![
            line("B", ServiceLineType::InfraFiber, 5),
            line("B", ServiceLineType::Other("V-VOICE FTTH".into()), 5),
        ];
        let groups = group_by_account(&records);

        assert_eq!(groups[0].categories(), vec![Category::Unclassified]);
        assert!(classify_group(&groups[0], &Everything).is_zero());
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_counts_arithmetic() {
        let a = CategoryCounts { peo_only: 1, peo_with_copper: 2, peo_with_fiber: 3 };
        let b = CategoryCounts { peo_only: 10, peo_with_copper: 0, peo_with_fiber: 1 };
        let sum: CategoryCounts = vec![a, b].into_iter().sum();
        assert_eq!(sum, CategoryCounts { peo_only: 11, peo_with_copper: 2, peo_with_fiber: 4 });
        assert_eq!(sum.total(), 17);
        assert_eq!(sum.get(Category::PeoWithFiber), 4);
        assert_eq!(sum.get(Category::Unclassified), 0);
    }

    #[test]
    fn test_category_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Category::PeoWithCopper).expect("serialize"), "\"PEO_WITH_COPPER\"");
    }
}
